//! Observability metrics for request logging.
//!
//! Counts how many requests were logged, suppressed by quiet-down, or logged
//! because quiet-down did not apply to them.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Metrics tracking logging decisions.
///
/// All metrics use atomic operations for thread-safe updates and reads.
/// Clones share the same counters.
#[derive(Debug, Clone)]
pub struct Metrics {
    inner: Arc<MetricsInner>,
}

#[derive(Debug)]
struct MetricsInner {
    /// Quiet-down route occurrences that were logged
    requests_logged: AtomicU64,
    /// Quiet-down route occurrences inside an open silence window
    requests_suppressed: AtomicU64,
    /// Requests on routes not subject to quiet-down
    requests_exempt: AtomicU64,
}

impl Metrics {
    /// Create a new metrics tracker.
    pub fn new() -> Self {
        Self {
            inner: Arc::new(MetricsInner {
                requests_logged: AtomicU64::new(0),
                requests_suppressed: AtomicU64::new(0),
                requests_exempt: AtomicU64::new(0),
            }),
        }
    }

    pub(crate) fn record_logged(&self) {
        self.inner.requests_logged.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_suppressed(&self) {
        self.inner
            .requests_suppressed
            .fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_exempt(&self) {
        self.inner.requests_exempt.fetch_add(1, Ordering::Relaxed);
    }

    /// Quiet-down route occurrences that were logged.
    pub fn requests_logged(&self) -> u64 {
        self.inner.requests_logged.load(Ordering::Relaxed)
    }

    /// Quiet-down route occurrences that were suppressed.
    pub fn requests_suppressed(&self) -> u64 {
        self.inner.requests_suppressed.load(Ordering::Relaxed)
    }

    /// Requests that quiet-down did not apply to.
    pub fn requests_exempt(&self) -> u64 {
        self.inner.requests_exempt.load(Ordering::Relaxed)
    }

    /// Get a snapshot of all metrics.
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            requests_logged: self.requests_logged(),
            requests_suppressed: self.requests_suppressed(),
            requests_exempt: self.requests_exempt(),
        }
    }

    /// Reset all metrics to zero.
    pub fn reset(&self) {
        self.inner.requests_logged.store(0, Ordering::Relaxed);
        self.inner.requests_suppressed.store(0, Ordering::Relaxed);
        self.inner.requests_exempt.store(0, Ordering::Relaxed);
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

/// A point-in-time snapshot of metrics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MetricsSnapshot {
    pub requests_logged: u64,
    pub requests_suppressed: u64,
    pub requests_exempt: u64,
}

impl MetricsSnapshot {
    /// Fraction of quiet-down route occurrences that were suppressed (0.0 to 1.0).
    ///
    /// Returns 0.0 if no quiet-down route has been seen.
    pub fn suppression_rate(&self) -> f64 {
        let total = self.requests_logged.saturating_add(self.requests_suppressed);
        if total == 0 {
            0.0
        } else {
            self.requests_suppressed as f64 / total as f64
        }
    }

    /// Total number of requests seen.
    pub fn total_requests(&self) -> u64 {
        self.requests_logged
            .saturating_add(self.requests_suppressed)
            .saturating_add(self.requests_exempt)
    }
}
