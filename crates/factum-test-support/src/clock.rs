//! Test clock — deterministic `Clock` implementation.

use chrono::{DateTime, Utc};
use factum_core::clock::Clock;

/// A clock pinned to a fixed point in time.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock {
    now: DateTime<Utc>,
}

impl FixedClock {
    /// Creates a clock that always reports `now`.
    #[must_use]
    pub fn at(now: DateTime<Utc>) -> Self {
        Self { now }
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.now
    }
}
