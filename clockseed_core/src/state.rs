//! Snapshot of the seed fields on one scene.

use crate::seed::SeedCapture;
use clockseed_env::{SceneHost, SceneId, SeedField};
use serde::{Deserialize, Serialize};

/// Value of the "uninitialized" sentinel for both seed slots.
///
/// A seed derived at exactly midnight is also 0 and therefore reads as
/// uninitialized.
pub const UNSET: i64 = 0;

/// The six seed fields of a scene, read at one point in time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SceneSeeds {
    pub static_seed: i64,
    pub dynamic_seed: i64,
    pub hour: i64,
    pub minute: i64,
    pub second: i64,
    pub millisecond: i64,
}

impl SceneSeeds {
    /// Reads all six fields. `None` if the host does not know the scene.
    pub fn read<H: SceneHost + ?Sized>(host: &H, scene: SceneId) -> Option<Self> {
        let get = |field| host.field(scene, field);
        Some(Self {
            static_seed: get(SeedField::StaticSeed)?,
            dynamic_seed: get(SeedField::DynamicSeed)?,
            hour: get(SeedField::Hour)?,
            minute: get(SeedField::Minute)?,
            second: get(SeedField::Second)?,
            millisecond: get(SeedField::Millisecond)?,
        })
    }

    /// Returns the value of one field.
    pub fn get(&self, field: SeedField) -> i64 {
        match field {
            SeedField::StaticSeed => self.static_seed,
            SeedField::DynamicSeed => self.dynamic_seed,
            SeedField::Hour => self.hour,
            SeedField::Minute => self.minute,
            SeedField::Second => self.second,
            SeedField::Millisecond => self.millisecond,
        }
    }

    /// True once the static slot holds a non-sentinel value.
    pub fn static_initialized(&self) -> bool {
        self.static_seed != UNSET
    }

    /// True once the dynamic slot holds a non-sentinel value.
    pub fn dynamic_initialized(&self) -> bool {
        self.dynamic_seed != UNSET
    }

    /// True if the dynamic slot and its components all come from `capture`.
    pub fn dynamic_matches(&self, capture: &SeedCapture) -> bool {
        self.dynamic_seed == capture.seed.as_field()
            && self.hour == i64::from(capture.time.hour)
            && self.minute == i64::from(capture.time.minute)
            && self.second == i64::from(capture.time.second)
            && self.millisecond == i64::from(capture.time.millisecond)
    }
}
