//! clockseed Core - time-derived seeds for procedural scenes
//!
//! Turns the wall-clock time of day into an integer seed and keeps the seed
//! fields of every host scene in sync with three lifecycle events plus one
//! explicit user action:
//! 1. **Derivation**: `HHMMSSmmm`-style composite integer, injective per ms
//! 2. **Propagation**: which slot (static/dynamic) is written, when, where
//! 3. **Wiring**: idempotent registration of fields, operator and handlers

pub mod addon;
pub mod config;
pub mod panel;
pub mod propagator;
pub mod seed;
pub mod state;

// Re-export key types for convenience
pub use addon::{SeedAddon, RegistrationReport, GENERATE_OPERATOR};
pub use config::{ConfigError, SeedConfig};
pub use panel::SeedPanel;
pub use propagator::SeedPropagator;
pub use seed::{derive_seed, Seed, SeedCapture};
pub use state::SceneSeeds;
