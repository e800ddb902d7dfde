//! Clock Adapters
//!
//! Wall-clock time for production, a manually driven clock for tests.

use crate::ports::outbound::Clock;
use chrono::{DateTime, Duration, Utc};
use parking_lot::RwLock;

/// System UTC clock.
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Deterministic clock. Time only advances when told to.
#[derive(Debug)]
pub struct ManualClock {
    current: RwLock<DateTime<Utc>>,
}

impl ManualClock {
    /// Start at `start`.
    pub fn new(start: DateTime<Utc>) -> Self {
        Self {
            current: RwLock::new(start),
        }
    }

    /// Start at the current wall-clock time.
    pub fn starting_now() -> Self {
        Self::new(Utc::now())
    }

    /// Advance time.
    pub fn advance(&self, by: Duration) {
        *self.current.write() += by;
    }

    /// Set the time to a specific value.
    pub fn set(&self, at: DateTime<Utc>) {
        *self.current.write() = at;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.current.read()
    }
}
