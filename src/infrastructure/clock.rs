//! Wall-clock adapter for the quiet-down tracker.
//!
//! Tests use `MockClock` from `crate::infrastructure::mocks` instead (enabled in
//! test builds and with the `test-helpers` feature).

use crate::application::ports::Clock;
use std::time::Instant;

/// Monotonic clock reading `Instant::now()`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl SystemClock {
    pub fn new() -> Self {
        SystemClock
    }
}

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}
