//! Quiet-down coordination logic.
//!
//! The tracker decides, once per request, whether the request's record is
//! emitted. Routes outside the quiet-down list (or any route when the period
//! is zero) are always logged and never touch state. A quiet-down route is
//! logged on first sight and then at most once per period, the window being
//! re-anchored only by a logged occurrence.

use crate::application::metrics::Metrics;
use crate::application::ports::Storage;
use crate::application::registry::QuietDownRegistry;
use crate::domain::options::EffectiveOptions;
use crate::domain::window::{QuietDownWindow, WindowDecision};
use ahash::AHashSet;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Decision about whether a request is logged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuietDownDecision {
    /// Quiet-down route, logged; its silence window starts now.
    Log,
    /// Quiet-down route inside an open silence window.
    Suppress,
    /// Quiet-down does not apply; always logged.
    Exempt,
}

impl QuietDownDecision {
    /// Whether the record should be emitted.
    pub fn should_log(&self) -> bool {
        !matches!(self, QuietDownDecision::Suppress)
    }
}

impl From<WindowDecision> for QuietDownDecision {
    fn from(decision: WindowDecision) -> Self {
        match decision {
            WindowDecision::Log => QuietDownDecision::Log,
            WindowDecision::Suppress => QuietDownDecision::Suppress,
        }
    }
}

/// Coordinates quiet-down decisions for one middleware instance.
///
/// Each tracker owns its state, so several servers in one process do not
/// interfere with each other.
#[derive(Clone)]
pub struct QuietDownTracker<S>
where
    S: Storage<String, QuietDownWindow> + Clone,
{
    registry: QuietDownRegistry<S>,
    routes: Arc<AHashSet<String>>,
    period: Duration,
    metrics: Metrics,
}

impl<S> QuietDownTracker<S>
where
    S: Storage<String, QuietDownWindow> + Clone,
{
    /// Create a tracker for the quiet-down routes and period in `opts`.
    pub fn new(registry: QuietDownRegistry<S>, opts: &EffectiveOptions, metrics: Metrics) -> Self {
        Self {
            registry,
            routes: Arc::new(opts.quiet_down_routes().iter().cloned().collect()),
            period: opts.quiet_down_period(),
            metrics,
        }
    }

    /// Check whether quiet-down applies to `route`.
    pub fn is_quiet_down_route(&self, route: &str) -> bool {
        !self.period.is_zero() && self.routes.contains(route)
    }

    /// Decide for a request on `route` at `now`.
    ///
    /// # Performance
    /// Routes outside the quiet-down list cost one hash lookup and never
    /// allocate or lock.
    pub fn check_route_at(&self, route: &str, now: Instant) -> QuietDownDecision {
        if !self.is_quiet_down_route(route) {
            self.metrics.record_exempt();
            return QuietDownDecision::Exempt;
        }

        let decision = QuietDownDecision::from(self.registry.register(route, now, self.period));

        match decision {
            QuietDownDecision::Suppress => {
                self.metrics.record_suppressed();
                tracing::trace!(route, "request log suppressed by quiet-down");
            }
            _ => self.metrics.record_logged(),
        }

        decision
    }

    /// Decide for a request on `route` using the registry's clock.
    pub fn check_route(&self, route: &str) -> QuietDownDecision {
        self.check_route_at(route, self.registry.now())
    }

    /// Whether a request on `route` at `now` should be logged.
    pub fn should_log_at(&self, route: &str, now: Instant) -> bool {
        self.check_route_at(route, now).should_log()
    }

    /// Whether a request on `route` should be logged now.
    pub fn should_log(&self, route: &str) -> bool {
        self.check_route(route).should_log()
    }

    /// Length of the silence window. Zero disables quiet-down.
    pub fn period(&self) -> Duration {
        self.period
    }

    /// When `route` was last logged, if it is tracked.
    pub fn last_logged(&self, route: &str) -> Option<Instant> {
        self.registry.window(route).and_then(|w| w.last_logged())
    }

    /// Occurrences of `route` suppressed in its current window.
    pub fn suppressed_count(&self, route: &str) -> Option<u64> {
        self.registry.window(route).map(|w| w.suppressed())
    }

    /// Routes whose silence window is open at `now`, sorted.
    pub fn silenced_routes_at(&self, now: Instant) -> Vec<String> {
        let mut routes = Vec::new();
        self.registry.for_each(|route, window| {
            if window.is_silenced(now, self.period) {
                routes.push(route.clone());
            }
        });
        routes.sort();
        routes
    }

    /// Routes whose silence window is open now, sorted.
    pub fn silenced_routes(&self) -> Vec<String> {
        self.silenced_routes_at(self.registry.now())
    }

    /// Number of quiet-down routes seen so far.
    pub fn tracked_routes(&self) -> usize {
        self.registry.len()
    }

    /// Forget all windows; every quiet-down route logs again on next sight.
    pub fn reset(&self) {
        self.registry.clear();
    }

    pub fn registry(&self) -> &QuietDownRegistry<S> {
        &self.registry
    }

    pub fn metrics(&self) -> &Metrics {
        &self.metrics
    }
}
