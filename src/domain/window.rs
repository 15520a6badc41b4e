//! Silence windows for quiet-down routes.
//!
//! A window is anchored at the last logged occurrence of a route. While it is
//! open further occurrences are suppressed; the first occurrence after it
//! closes is logged and re-anchors the window. Suppressed occurrences never
//! move the anchor.

use std::time::{Duration, Instant};

/// Outcome of registering an occurrence with a window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowDecision {
    /// Emit the record; the window was (re)started at this occurrence.
    Log,
    /// Drop the record; the window is still open.
    Suppress,
}

impl WindowDecision {
    pub fn is_log(&self) -> bool {
        matches!(self, WindowDecision::Log)
    }

    pub fn is_suppress(&self) -> bool {
        matches!(self, WindowDecision::Suppress)
    }
}

/// Per-route quiet-down state.
///
/// # Example
/// ```
/// use tracing_httplog::QuietDownWindow;
/// use std::time::{Duration, Instant};
///
/// let period = Duration::from_secs(10);
/// let start = Instant::now();
/// let mut window = QuietDownWindow::new();
///
/// assert!(window.register(start, period).is_log());
/// assert!(window.register(start + Duration::from_secs(5), period).is_suppress());
/// assert!(window.register(start + Duration::from_secs(11), period).is_log());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QuietDownWindow {
    last_logged: Option<Instant>,
    suppressed: u64,
}

impl QuietDownWindow {
    /// Create a window that has not seen its route yet.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an occurrence at `now` and decide whether it is logged.
    pub fn register(&mut self, now: Instant, period: Duration) -> WindowDecision {
        match self.last_logged {
            None => {
                self.last_logged = Some(now);
                WindowDecision::Log
            }
            Some(anchor) if now.saturating_duration_since(anchor) >= period => {
                self.last_logged = Some(now);
                self.suppressed = 0;
                WindowDecision::Log
            }
            Some(_) => {
                self.suppressed = self.suppressed.saturating_add(1);
                WindowDecision::Suppress
            }
        }
    }

    /// When the route was last logged, if ever.
    pub fn last_logged(&self) -> Option<Instant> {
        self.last_logged
    }

    /// Occurrences suppressed since the window was last anchored.
    pub fn suppressed(&self) -> u64 {
        self.suppressed
    }

    /// Whether an occurrence at `now` would fall inside the open window.
    pub fn is_silenced(&self, now: Instant, period: Duration) -> bool {
        match self.last_logged {
            Some(anchor) => now.saturating_duration_since(anchor) < period,
            None => false,
        }
    }
}
