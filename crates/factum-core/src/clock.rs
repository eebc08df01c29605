//! Clock abstraction for determinism.

use chrono::{DateTime, Utc};

/// Abstraction over system time so tests can stamp deterministic instants.
pub trait Clock: Send + Sync {
    /// Returns the current time.
    fn now(&self) -> DateTime<Utc>;
}

/// Production clock that delegates to the system clock. This is the single
/// place wall-clock time enters the domain model.
#[derive(Debug, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}
