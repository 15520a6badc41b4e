//! Registry of quiet-down windows.
//!
//! The registry maintains one silence window per quiet-down route that has
//! been seen at least once. Entries are created lazily and only overwritten
//! afterwards; nothing is evicted short of an explicit [`clear`].
//!
//! [`clear`]: QuietDownRegistry::clear

use crate::application::ports::{Clock, Storage};
use crate::domain::window::{QuietDownWindow, WindowDecision};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Registry managing all quiet-down state.
///
/// Uses the Storage port for concurrent access. Generic over the storage
/// implementation; in production, use `Arc<ShardedStorage>`.
#[derive(Clone)]
pub struct QuietDownRegistry<S>
where
    S: Storage<String, QuietDownWindow> + Clone,
{
    storage: S,
    clock: Arc<dyn Clock>,
}

impl<S> QuietDownRegistry<S>
where
    S: Storage<String, QuietDownWindow> + Clone,
{
    /// Create a new registry with storage and clock.
    pub fn new(storage: S, clock: Arc<dyn Clock>) -> Self {
        Self { storage, clock }
    }

    /// Current time according to the registry's clock.
    pub fn now(&self) -> Instant {
        self.clock.now()
    }

    /// Register an occurrence of `route` at `now`.
    ///
    /// The window is created on first sight. Lookup, decision and update run
    /// while the entry is held, so concurrent callers for the same route are
    /// serialized.
    pub fn register(&self, route: &str, now: Instant, period: Duration) -> WindowDecision {
        self.storage.with_entry_mut(
            route.to_string(),
            QuietDownWindow::new,
            |window| window.register(now, period),
        )
    }

    /// Snapshot of a route's window, if the route has been seen.
    pub fn window(&self, route: &str) -> Option<QuietDownWindow> {
        self.storage.with_entry(&route.to_string(), QuietDownWindow::clone)
    }

    /// Get the number of tracked routes.
    pub fn len(&self) -> usize {
        self.storage.len()
    }

    /// Check if the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.storage.is_empty()
    }

    /// Clear all tracked state.
    pub fn clear(&self) {
        self.storage.clear();
    }

    /// Iterate over all windows with a callback.
    pub fn for_each<F>(&self, f: F)
    where
        F: FnMut(&String, &QuietDownWindow),
    {
        self.storage.for_each(f);
    }
}
