//! JSON exporter for scenario traces.
//!
//! Exports one frame per dispatched event so a run can be inspected or
//! diffed after the fact.

use crate::world::SimWorld;
use clockseed_core::{SceneSeeds, SeedCapture};
use clockseed_env::Timestamp;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Write;

/// Seed fields of one scene at one step.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SceneFrame {
    pub scene: String,
    pub seeds: SceneSeeds,
    pub dirty_count: u64,
}

/// State of the whole session after one event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimFrame {
    /// Step index within the run
    pub step: u32,

    /// What happened ("load", "play", "generate", ...)
    pub event: String,

    /// Virtual wall clock after the event
    pub clock: Timestamp,

    /// Capture written by the event, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub capture: Option<SeedCapture>,

    /// Total clock samples so far
    pub clock_samples: u64,

    pub scenes: Vec<SceneFrame>,
}

/// Complete scenario export.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimExport {
    /// Scenario name
    pub scenario: String,

    /// Seed used
    pub seed: u64,

    /// All frames
    pub frames: Vec<SimFrame>,

    /// Final results
    pub passed: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub failure_reason: Option<String>,
}

impl SimExport {
    /// Creates a new export container.
    pub fn new(scenario: &str, seed: u64) -> Self {
        Self {
            scenario: scenario.to_string(),
            seed,
            frames: Vec::new(),
            passed: false,
            failure_reason: None,
        }
    }

    /// Records the world state after an event.
    pub fn record(&mut self, event: &str, capture: Option<SeedCapture>, world: &SimWorld) {
        let scenes = world
            .host
            .all_scenes()
            .iter()
            .filter_map(|scene| {
                world.seeds(scene.id).map(|seeds| SceneFrame {
                    scene: scene.name.clone(),
                    seeds,
                    dirty_count: scene.dirty_count,
                })
            })
            .collect();

        self.frames.push(SimFrame {
            step: self.frames.len() as u32,
            event: event.to_string(),
            clock: world.context.peek(),
            capture,
            clock_samples: world.context.sample_count(),
            scenes,
        });
    }

    /// Finalizes the export.
    pub fn finalize(&mut self, passed: bool, failure_reason: Option<String>) {
        self.passed = passed;
        self.failure_reason = failure_reason;
    }

    /// Writes to a JSON file.
    pub fn write_to_file(&self, path: &str) -> std::io::Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        let mut file = File::create(path)?;
        file.write_all(json.as_bytes())?;
        Ok(())
    }
}
