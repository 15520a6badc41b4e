//! Mock clock for testing.

use crate::application::ports::Clock;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Manually driven clock.
///
/// Time only moves when a test calls [`advance`](MockClock::advance) or
/// [`set`](MockClock::set). Clones share the same reading, so a clone handed to
/// a logger can be advanced from the test body.
///
/// # Examples
///
/// ```
/// use tracing_httplog::infrastructure::mocks::MockClock;
/// use tracing_httplog::application::ports::Clock;
/// use std::time::{Duration, Instant};
///
/// let start = Instant::now();
/// let clock = MockClock::new(start);
/// let handle = clock.clone();
///
/// handle.advance(Duration::from_secs(11));
/// assert_eq!(clock.now(), start + Duration::from_secs(11));
/// assert_eq!(clock.elapsed(), Duration::from_secs(11));
/// ```
#[derive(Debug, Clone)]
pub struct MockClock {
    start: Instant,
    offset_nanos: Arc<AtomicU64>,
}

impl MockClock {
    /// Create a mock clock reading `start`.
    pub fn new(start: Instant) -> Self {
        Self {
            start,
            offset_nanos: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Move the clock forward.
    pub fn advance(&self, duration: Duration) {
        self.offset_nanos
            .fetch_add(to_nanos(duration), Ordering::SeqCst);
    }

    /// Jump to `instant`. Instants before the start clamp to the start.
    pub fn set(&self, instant: Instant) {
        let offset = instant.saturating_duration_since(self.start);
        self.offset_nanos.store(to_nanos(offset), Ordering::SeqCst);
    }

    /// Time advanced since creation.
    pub fn elapsed(&self) -> Duration {
        Duration::from_nanos(self.offset_nanos.load(Ordering::SeqCst))
    }
}

fn to_nanos(duration: Duration) -> u64 {
    u64::try_from(duration.as_nanos()).unwrap_or(u64::MAX)
}

impl Clock for MockClock {
    fn now(&self) -> Instant {
        self.start + self.elapsed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn test_mock_clock() {
        let start = Instant::now();
        let clock = MockClock::new(start);
        assert_eq!(clock.now(), start);

        clock.advance(Duration::from_secs(5));
        clock.advance(Duration::from_secs(5));
        assert_eq!(clock.now(), start + Duration::from_secs(10));

        clock.set(start + Duration::from_secs(100));
        assert_eq!(clock.now(), start + Duration::from_secs(100));

        clock.set(start);
        assert_eq!(clock.elapsed(), Duration::ZERO);
    }

    #[test]
    fn test_clones_share_reading() {
        let start = Instant::now();
        let clock = MockClock::new(start);
        let clone = clock.clone();

        thread::spawn(move || clone.advance(Duration::from_secs(3)))
            .join()
            .unwrap();

        assert_eq!(clock.now(), start + Duration::from_secs(3));
    }
}
