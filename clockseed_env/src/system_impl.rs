//! Production implementation of SeedContext using the local wall clock.

use crate::context::SeedContext;
use crate::types::Timestamp;
use std::sync::Arc;

/// Production context backed by the operating system's local time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemContext;

impl SystemContext {
    /// Creates a new SystemContext.
    pub fn new() -> Self {
        Self
    }

    /// Creates an Arc-wrapped context for sharing.
    pub fn shared() -> Arc<Self> {
        Arc::new(Self::new())
    }
}

impl SeedContext for SystemContext {
    fn local_time(&self) -> Timestamp {
        Timestamp::from_naive_time(chrono::Local::now().time())
    }

    fn name(&self) -> &str {
        "system"
    }
}
