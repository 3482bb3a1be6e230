//! Common types for the clockseed environment abstraction.

use crate::error::EnvError;
use chrono::{NaiveTime, Timelike};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Wall-clock instant at millisecond resolution.
///
/// Only the time of day matters to seed derivation, so the date is dropped
/// at the boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Timestamp {
    /// Hour of day (0-23)
    pub hour: u8,

    /// Minute (0-59)
    pub minute: u8,

    /// Second (0-59)
    pub second: u8,

    /// Millisecond (0-999)
    pub millisecond: u16,
}

impl Timestamp {
    /// Local midnight, 00:00:00.000.
    pub const MIDNIGHT: Timestamp = Timestamp {
        hour: 0,
        minute: 0,
        second: 0,
        millisecond: 0,
    };

    /// Creates a timestamp from its parts, rejecting out-of-range values.
    pub fn new(hour: u8, minute: u8, second: u8, millisecond: u16) -> Result<Self, EnvError> {
        if hour > 23 {
            return Err(EnvError::invalid_timestamp("hour", hour.into()));
        }
        if minute > 59 {
            return Err(EnvError::invalid_timestamp("minute", minute.into()));
        }
        if second > 59 {
            return Err(EnvError::invalid_timestamp("second", second.into()));
        }
        if millisecond > 999 {
            return Err(EnvError::invalid_timestamp("millisecond", millisecond.into()));
        }
        Ok(Self {
            hour,
            minute,
            second,
            millisecond,
        })
    }

    /// Creates a timestamp from a chrono time of day.
    ///
    /// Sub-millisecond precision is truncated. chrono encodes a leap second
    /// as a nanosecond value past 1e9; that millisecond is clamped to 999.
    pub fn from_naive_time(time: NaiveTime) -> Self {
        let millisecond = (time.nanosecond() / 1_000_000).min(999) as u16;
        Self {
            hour: time.hour() as u8,
            minute: time.minute() as u8,
            second: time.second() as u8,
            millisecond,
        }
    }

    /// Converts back to a chrono time of day.
    pub fn to_naive_time(&self) -> NaiveTime {
        // Fields are range-checked on every construction path.
        NaiveTime::from_hms_milli_opt(
            self.hour.into(),
            self.minute.into(),
            self.second.into(),
            self.millisecond.into(),
        )
        .unwrap_or_default()
    }

    /// Milliseconds elapsed since local midnight.
    pub fn millis_since_midnight(&self) -> u32 {
        u32::from(self.hour) * 3_600_000
            + u32::from(self.minute) * 60_000
            + u32::from(self.second) * 1_000
            + u32::from(self.millisecond)
    }

    /// Builds a timestamp from milliseconds since midnight, wrapping at 24h.
    pub fn from_millis_since_midnight(millis: u64) -> Self {
        let ms = millis % 86_400_000;
        Self {
            hour: (ms / 3_600_000) as u8,
            minute: (ms / 60_000 % 60) as u8,
            second: (ms / 1_000 % 60) as u8,
            millisecond: (ms % 1_000) as u16,
        }
    }
}

impl From<NaiveTime> for Timestamp {
    fn from(time: NaiveTime) -> Self {
        Self::from_naive_time(time)
    }
}

impl std::fmt::Display for Timestamp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{:02}:{:02}:{:02}.{:03}",
            self.hour, self.minute, self.second, self.millisecond
        )
    }
}

/// Identifier for a host scene.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SceneId(pub Uuid);

impl SceneId {
    /// Creates a new random SceneId.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Creates a deterministic SceneId from a seed (for simulation).
    pub fn from_seed(seed: u64) -> Self {
        Self(uuid_from_seed(seed))
    }
}

impl Default for SceneId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for SceneId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "scene:{}", &self.0.to_string()[..8])
    }
}

/// Identifier for a host object that may carry modifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ObjectId(pub Uuid);

impl ObjectId {
    /// Creates a new random ObjectId.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Creates a deterministic ObjectId from a seed (for simulation).
    pub fn from_seed(seed: u64) -> Self {
        // Salted so object and scene ids never collide for the same seed
        Self(uuid_from_seed(seed ^ 0x6f626a6563740000))
    }
}

impl Default for ObjectId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for ObjectId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "object:{}", &self.0.to_string()[..8])
    }
}

fn uuid_from_seed(seed: u64) -> Uuid {
    let mut bytes = [0u8; 16];
    bytes[0..8].copy_from_slice(&seed.to_le_bytes());
    bytes[8..16].copy_from_slice(&seed.wrapping_mul(0x517cc1b727220a95).to_le_bytes());
    Uuid::from_bytes(bytes)
}

/// Kind of a modifier attached to an object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ModifierKind {
    /// Procedural node graph; may read seed fields through drivers.
    Procedural,

    /// Anything else (subdivision, array, ...).
    Other,
}

impl ModifierKind {
    /// Returns true if this modifier evaluates a procedural-generation graph.
    pub fn is_procedural(&self) -> bool {
        match self {
            ModifierKind::Procedural => true,
            ModifierKind::Other => false,
        }
    }
}

/// Host lifecycle channels a handler can subscribe to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum TriggerKind {
    /// Timed playback is about to start
    PlaybackStart,

    /// A session/container finished loading
    LoadComplete,

    /// The dependency graph was re-evaluated for a scene
    StateChange,
}

impl TriggerKind {
    /// Returns all trigger kinds.
    pub fn all() -> [TriggerKind; 3] {
        [
            TriggerKind::PlaybackStart,
            TriggerKind::LoadComplete,
            TriggerKind::StateChange,
        ]
    }

    /// Returns the channel name.
    pub fn name(&self) -> &'static str {
        match self {
            TriggerKind::PlaybackStart => "playback_start",
            TriggerKind::LoadComplete => "load_complete",
            TriggerKind::StateChange => "state_change",
        }
    }
}

impl std::fmt::Display for TriggerKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// A single event dispatched by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HostEvent {
    /// Playback started
    PlaybackStart,

    /// Session load completed
    LoadComplete,

    /// Dependency graph update for one scene
    StateChange { scene: SceneId },
}

impl HostEvent {
    /// Returns the channel this event is delivered on.
    pub fn trigger(&self) -> TriggerKind {
        match self {
            HostEvent::PlaybackStart => TriggerKind::PlaybackStart,
            HostEvent::LoadComplete => TriggerKind::LoadComplete,
            HostEvent::StateChange { .. } => TriggerKind::StateChange,
        }
    }
}

/// Stable name identifying a subscribed handler.
///
/// Subscription checks compare these names instead of function pointers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct HandlerId(pub &'static str);

impl std::fmt::Display for HandlerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Description of a user-invokable command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OperatorSpec {
    /// Registry id, e.g. `seed.generate_static`
    pub idname: &'static str,

    /// Button label
    pub label: &'static str,

    /// Tooltip
    pub description: &'static str,
}

/// Outcome reported back to the host after running an operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum OperatorResult {
    Finished,
    Cancelled,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timestamp_validation() {
        assert!(Timestamp::new(23, 59, 59, 999).is_ok());
        assert!(Timestamp::new(24, 0, 0, 0).is_err());
        assert!(Timestamp::new(0, 60, 0, 0).is_err());
        assert!(Timestamp::new(0, 0, 60, 0).is_err());
        assert!(Timestamp::new(0, 0, 0, 1000).is_err());
    }

    #[test]
    fn test_timestamp_truncates_sub_millisecond() {
        let time = NaiveTime::from_hms_nano_opt(14, 30, 45, 123_987_654).unwrap();
        let ts = Timestamp::from_naive_time(time);
        assert_eq!(ts, Timestamp::new(14, 30, 45, 123).unwrap());
    }

    #[test]
    fn test_timestamp_leap_second_clamped() {
        let time = NaiveTime::from_hms_milli_opt(23, 59, 59, 1_500).unwrap();
        let ts = Timestamp::from_naive_time(time);
        assert_eq!(ts.millisecond, 999);
        assert_eq!(ts.second, 59);
    }

    #[test]
    fn test_millis_since_midnight_wraps() {
        let ts = Timestamp::new(23, 59, 59, 999).unwrap();
        let next = Timestamp::from_millis_since_midnight(u64::from(ts.millis_since_midnight()) + 1);
        assert_eq!(next, Timestamp::MIDNIGHT);
    }

    #[test]
    fn test_timestamp_display() {
        let ts = Timestamp::new(9, 5, 3, 7).unwrap();
        assert_eq!(ts.to_string(), "09:05:03.007");
    }

    #[test]
    fn test_deterministic_ids() {
        assert_eq!(SceneId::from_seed(7), SceneId::from_seed(7));
        assert_ne!(SceneId::from_seed(7), SceneId::from_seed(8));
        assert_ne!(SceneId::from_seed(7).0, ObjectId::from_seed(7).0);
    }

    #[test]
    fn test_event_trigger_mapping() {
        let scene = SceneId::from_seed(1);
        assert_eq!(HostEvent::PlaybackStart.trigger(), TriggerKind::PlaybackStart);
        assert_eq!(HostEvent::LoadComplete.trigger(), TriggerKind::LoadComplete);
        assert_eq!(HostEvent::StateChange { scene }.trigger(), TriggerKind::StateChange);
    }
}
