//! Simulation context implementing SeedContext for deterministic testing.

use clockseed_env::{SeedContext, Timestamp};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Simulation context backed by a virtual wall clock.
///
/// This implements `SeedContext` using:
/// - A virtual time of day (milliseconds since midnight) set or advanced manually
/// - A sample counter, so tests can assert how often the clock was read
pub struct SimContext {
    /// Current virtual time (milliseconds since midnight)
    virtual_ms: Arc<Mutex<u64>>,

    /// Number of `local_time()` calls so far
    samples: Arc<Mutex<u64>>,
}

impl SimContext {
    /// Creates a new SimContext starting at the given time of day.
    pub fn new(start: Timestamp) -> Self {
        Self {
            virtual_ms: Arc::new(Mutex::new(start.millis_since_midnight().into())),
            samples: Arc::new(Mutex::new(0)),
        }
    }

    /// Creates an Arc-wrapped context for sharing.
    pub fn shared(start: Timestamp) -> Arc<Self> {
        Arc::new(Self::new(start))
    }

    /// Advances virtual time, wrapping past midnight.
    pub fn advance_time(&self, duration: Duration) {
        let mut time = self.virtual_ms.lock().unwrap();
        *time = (*time + duration.as_millis() as u64) % 86_400_000;
    }

    /// Sets the virtual time of day.
    pub fn set_time(&self, time: Timestamp) {
        let mut ms = self.virtual_ms.lock().unwrap();
        *ms = time.millis_since_midnight().into();
    }

    /// Returns the virtual time without counting it as a sample.
    pub fn peek(&self) -> Timestamp {
        Timestamp::from_millis_since_midnight(*self.virtual_ms.lock().unwrap())
    }

    /// Returns how many times the clock has been sampled.
    pub fn sample_count(&self) -> u64 {
        *self.samples.lock().unwrap()
    }
}

impl Clone for SimContext {
    fn clone(&self) -> Self {
        Self {
            virtual_ms: Arc::clone(&self.virtual_ms),
            samples: Arc::clone(&self.samples),
        }
    }
}

impl SeedContext for SimContext {
    fn local_time(&self) -> Timestamp {
        *self.samples.lock().unwrap() += 1;
        self.peek()
    }

    fn name(&self) -> &str {
        "sim"
    }
}
