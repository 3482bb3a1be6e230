//! Clock context trait for clockseed.

use crate::types::Timestamp;

/// The wall-clock interface seed derivation samples from.
///
/// # Implementations
///
/// - **Production**: `SystemContext` - local time via `chrono::Local`
/// - **Simulation**: `SimContext` - settable virtual clock
///
/// # Determinism
///
/// Every call is one clock sample. Callers that need several fields from
/// the same instant must read once and reuse the result.
pub trait SeedContext: Send + Sync + 'static {
    /// Returns the current local time of day.
    fn local_time(&self) -> Timestamp;

    /// Returns a label for logging ("system", "sim", ...).
    fn name(&self) -> &str;
}
