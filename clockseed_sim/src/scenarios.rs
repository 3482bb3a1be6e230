//! Session scenarios exercising the seed propagation policy.

/// Scenario identifiers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScenarioId {
    /// SEED-001: file load seeds both slots on every scene
    LoadSession,

    /// SEED-002: playback refreshes the dynamic slot from one sample
    PlaybackFanout,

    /// SEED-003: "Generate New Seed" updates cache, statics, dependents
    ManualGenerate,

    /// SEED-004: state-change handler initializes once, then idles
    LazyInit,

    /// SEED-005: midnight seed collides with the uninitialized sentinel
    MidnightSentinel,

    /// SEED-006: register/unregister twice, events ignored after teardown
    Registration,

    /// SEED-007: load, repeated play/generate with clock jitter
    FullSession,
}

impl ScenarioId {
    /// Returns a list of all scenarios.
    pub fn all() -> Vec<ScenarioId> {
        vec![
            ScenarioId::LoadSession,
            ScenarioId::PlaybackFanout,
            ScenarioId::ManualGenerate,
            ScenarioId::LazyInit,
            ScenarioId::MidnightSentinel,
            ScenarioId::Registration,
            ScenarioId::FullSession,
        ]
    }

    /// Returns the scenario name.
    pub fn name(&self) -> &'static str {
        match self {
            ScenarioId::LoadSession => "load_session",
            ScenarioId::PlaybackFanout => "playback_fanout",
            ScenarioId::ManualGenerate => "manual_generate",
            ScenarioId::LazyInit => "lazy_init",
            ScenarioId::MidnightSentinel => "midnight_sentinel",
            ScenarioId::Registration => "registration",
            ScenarioId::FullSession => "full_session",
        }
    }

    /// Returns a description of the scenario.
    pub fn description(&self) -> &'static str {
        match self {
            ScenarioId::LoadSession => "Load sets static == dynamic != 0 on all scenes",
            ScenarioId::PlaybackFanout => "One clock sample per play, same dynamic seed everywhere",
            ScenarioId::ManualGenerate => "Cache set, statics written, procedural objects tagged, frame re-set",
            ScenarioId::LazyInit => "Zeroed slots initialized once; second update is a no-op",
            ScenarioId::MidnightSentinel => "Seed 0 at 00:00:00.000 is re-initialized on every update",
            ScenarioId::Registration => "Idempotent wiring; no effect after unregister",
            ScenarioId::FullSession => "Load, play and generate cycles with random clock jitter",
        }
    }

    /// Returns true if the scenario pins the clock instead of using the seed.
    pub fn fixed_clock(&self) -> bool {
        matches!(self, ScenarioId::MidnightSentinel)
    }
}

impl std::fmt::Display for ScenarioId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl std::str::FromStr for ScenarioId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "load_session" | "load" | "seed-001" => Ok(ScenarioId::LoadSession),
            "playback_fanout" | "playback" | "seed-002" => Ok(ScenarioId::PlaybackFanout),
            "manual_generate" | "generate" | "seed-003" => Ok(ScenarioId::ManualGenerate),
            "lazy_init" | "lazy" | "seed-004" => Ok(ScenarioId::LazyInit),
            "midnight_sentinel" | "midnight" | "seed-005" => Ok(ScenarioId::MidnightSentinel),
            "registration" | "seed-006" => Ok(ScenarioId::Registration),
            "full_session" | "session" | "seed-007" => Ok(ScenarioId::FullSession),
            _ => Err(format!("Unknown scenario: {}", s)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_names_round_trip() {
        for scenario in ScenarioId::all() {
            assert_eq!(scenario.name().parse::<ScenarioId>().unwrap(), scenario);
        }
    }

    #[test]
    fn test_aliases() {
        assert_eq!("SEED-003".parse::<ScenarioId>().unwrap(), ScenarioId::ManualGenerate);
        assert_eq!("midnight".parse::<ScenarioId>().unwrap(), ScenarioId::MidnightSentinel);
        assert!("split_brain".parse::<ScenarioId>().is_err());
    }
}
