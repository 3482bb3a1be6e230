//! Seed fields exposed on every host scene.

use crate::error::EnvError;
use serde::{Deserialize, Serialize};

/// One of the six integer fields attached to a scene.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum SeedField {
    /// Seed fixed for the session; refreshed on load or explicit generation
    StaticSeed,

    /// Seed refreshed whenever playback starts
    DynamicSeed,

    Hour,
    Minute,
    Second,
    Millisecond,
}

impl SeedField {
    /// All fields, in registration order.
    pub const ALL: [SeedField; 6] = [
        SeedField::StaticSeed,
        SeedField::DynamicSeed,
        SeedField::Hour,
        SeedField::Minute,
        SeedField::Second,
        SeedField::Millisecond,
    ];

    /// The fields written together with the dynamic seed.
    pub const DYNAMIC: [SeedField; 5] = [
        SeedField::DynamicSeed,
        SeedField::Hour,
        SeedField::Minute,
        SeedField::Second,
        SeedField::Millisecond,
    ];

    /// Short name used by drivers and snapshots.
    pub fn name(&self) -> &'static str {
        match self {
            SeedField::StaticSeed => "static_seed",
            SeedField::DynamicSeed => "dynamic_seed",
            SeedField::Hour => "hour",
            SeedField::Minute => "minute",
            SeedField::Second => "second",
            SeedField::Millisecond => "millisecond",
        }
    }

    /// Property name registered on the host scene type.
    pub fn property_name(&self) -> &'static str {
        match self {
            SeedField::StaticSeed => "clock_static_seed",
            SeedField::DynamicSeed => "clock_seed",
            SeedField::Hour => "clock_hour",
            SeedField::Minute => "clock_minute",
            SeedField::Second => "clock_second",
            SeedField::Millisecond => "clock_millisecond",
        }
    }

    /// Full property definition for host registration.
    pub fn spec(&self) -> FieldSpec {
        match self {
            SeedField::StaticSeed => FieldSpec {
                field: *self,
                label: "Static Seed",
                description: "Static seed set on load",
                min: None,
                max: None,
            },
            SeedField::DynamicSeed => FieldSpec {
                field: *self,
                label: "Dynamic Seed",
                description: "Dynamic seed that updates on play",
                min: None,
                max: None,
            },
            SeedField::Hour => FieldSpec::bounded(*self, "Hour", 23),
            SeedField::Minute => FieldSpec::bounded(*self, "Minute", 59),
            SeedField::Second => FieldSpec::bounded(*self, "Second", 59),
            SeedField::Millisecond => FieldSpec::bounded(*self, "Millisecond", 999),
        }
    }
}

impl std::fmt::Display for SeedField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl std::str::FromStr for SeedField {
    type Err = EnvError;

    /// Accepts both the short name and the `clock_` property name.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SeedField::ALL
            .into_iter()
            .find(|field| field.name() == s || field.property_name() == s)
            .ok_or_else(|| EnvError::UnknownField(s.to_string()))
    }
}

/// Host property definition for one seed field.
///
/// Every field defaults to 0 and is animatable, so external drivers can
/// bind to it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FieldSpec {
    pub field: SeedField,

    /// UI label
    pub label: &'static str,

    /// Tooltip
    pub description: &'static str,

    /// Hard lower bound, if any
    pub min: Option<i64>,

    /// Hard upper bound, if any
    pub max: Option<i64>,
}

impl FieldSpec {
    /// Default value before first initialization.
    pub const DEFAULT: i64 = 0;

    fn bounded(field: SeedField, label: &'static str, max: i64) -> Self {
        Self {
            field,
            label,
            description: "",
            min: Some(0),
            max: Some(max),
        }
    }

    /// Specs for all six fields.
    pub fn all() -> Vec<FieldSpec> {
        SeedField::ALL.iter().map(SeedField::spec).collect()
    }

    /// Clamps a value into this field's hard bounds.
    pub fn clamp(&self, value: i64) -> i64 {
        let value = self.min.map_or(value, |min| value.max(min));
        self.max.map_or(value, |max| value.min(max))
    }
}
