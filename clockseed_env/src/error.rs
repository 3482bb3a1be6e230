//! Error types for the clockseed environment abstraction.

use thiserror::Error;

/// Errors that can occur at the host boundary.
///
/// Seed propagation itself never fails; these only surface where raw input
/// (timestamps, field names, ids) crosses into typed values.
#[derive(Debug, Error)]
pub enum EnvError {
    /// A timestamp component was out of range
    #[error("Invalid timestamp: {field}={value}")]
    InvalidTimestamp { field: &'static str, value: u32 },

    /// Field name does not match any seed field
    #[error("Unknown seed field: {0}")]
    UnknownField(String),

    /// Scene is not known to the host
    #[error("Unknown scene: {0}")]
    UnknownScene(String),

    /// Operator is not registered with the host
    #[error("Unknown operator: {0}")]
    UnknownOperator(String),
}

impl EnvError {
    /// Creates an invalid timestamp error.
    pub fn invalid_timestamp(field: &'static str, value: u32) -> Self {
        Self::InvalidTimestamp { field, value }
    }

    /// Creates an unknown scene error.
    pub fn unknown_scene(scene: impl std::fmt::Display) -> Self {
        Self::UnknownScene(scene.to_string())
    }
}
