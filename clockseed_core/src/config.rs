//! Propagation policy configuration.

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Errors loading a [`SeedConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Configuration for the seed propagator.
///
/// Defaults reproduce the full propagation behavior; the switches exist for
/// hosts that drive re-evaluation themselves.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SeedConfig {
    /// Re-set the active scene's frame after explicit generation (default: true)
    pub refresh_frame_on_generate: bool,

    /// Tag owners of procedural modifiers after explicit generation (default: true)
    pub tag_procedural_objects: bool,

    /// Lazily initialize zeroed slots on state-change events (default: true)
    pub lazy_init: bool,
}

impl Default for SeedConfig {
    fn default() -> Self {
        Self {
            refresh_frame_on_generate: true,
            tag_procedural_objects: true,
            lazy_init: true,
        }
    }
}

impl SeedConfig {
    /// Parses a JSON config; missing keys take their defaults.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Loads a JSON config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json_str(&json)
    }
}
