//! clockseed Simulation Harness
//!
//! An in-memory host application with the seed generator plugged in, so
//! the propagation policy can be driven through realistic sessions without
//! a real host.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │                         SimWorld                         │
//! │  ┌──────────────┐   local_time()   ┌──────────────────┐  │
//! │  │  SimContext  │◄─────────────────│  SeedPropagator  │  │
//! │  │ virtual clock│                  └────────▲─────────┘  │
//! │  └──────────────┘                           │ handle()   │
//! │                          subscribed? ┌──────┴─────────┐  │
//! │  load() / play() / depsgraph() ────► │    dispatch    │  │
//! │                                      └──────┬─────────┘  │
//! │  ┌──────────────────────────────────────────▼─────────┐  │
//! │  │ SimHost: scenes, objects, fields, subscriptions    │  │
//! │  └────────────────────────────────────────────────────┘  │
//! └──────────────────────────────────────────────────────────┘
//! ```
//!
//! # Usage
//!
//! ```ignore
//! use clockseed_sim::{ScenarioRunner, scenarios::ScenarioId};
//!
//! let runner = ScenarioRunner::new(42, 3);
//! let result = runner.run(ScenarioId::FullSession);
//! assert!(result.passed);
//! ```

mod context;
mod exporter;
mod host;
mod runner;
pub mod scenarios;
mod world;

pub use context::SimContext;
pub use exporter::{SceneFrame, SimExport, SimFrame};
pub use host::{SimHost, SimObject, SimScene};
pub use runner::{ScenarioMetrics, ScenarioResult, ScenarioRunner};
pub use world::{DispatchStats, SimConfig, SimWorld};
