//! clockseed Environment Abstraction Layer
//!
//! This crate provides the seams between the seed propagation policy and the
//! outside world, so the same policy runs against a real host application or
//! against the in-memory simulator:
//! - Time (`SeedContext::local_time()`)
//! - Scene state (`SceneHost`: read/write seed fields, dirty tagging, frames)
//! - Registration (`HostRegistry`: fields, operators, event subscriptions)
//!
//! # Example
//!
//! ```ignore
//! use clockseed_env::{SeedContext, SceneHost, SeedField};
//!
//! fn stamp_all<Ctx: SeedContext, H: SceneHost>(ctx: &Ctx, host: &mut H) {
//!     let now = ctx.local_time();
//!     for scene in host.scenes() {
//!         host.set_field(scene, SeedField::Hour, now.hour.into());
//!     }
//! }
//! ```

mod context;
mod error;
mod fields;
mod host;
mod system_impl;
mod types;

pub use context::SeedContext;
pub use error::EnvError;
pub use fields::{FieldSpec, SeedField};
pub use host::{HostRegistry, SceneHost};
pub use system_impl::SystemContext;
pub use types::{
    HandlerId, HostEvent, ModifierKind, ObjectId, OperatorResult, OperatorSpec, SceneId,
    Timestamp, TriggerKind,
};
