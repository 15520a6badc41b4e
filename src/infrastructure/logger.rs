//! HTTP logger facade for middleware.
//!
//! [`HttpLogger`] is what an HTTP middleware owns: the effective options
//! resolved once at startup, a quiet-down tracker with its own state, and
//! metrics. Per request it decides whether to log and assembles the record.

use crate::application::{
    metrics::Metrics,
    ports::{Clock, RecordWriter, Storage},
    registry::QuietDownRegistry,
    tracker::{QuietDownDecision, QuietDownTracker},
};
use crate::domain::headers::{filter_headers, Direction, HeaderFields};
use crate::domain::options::{EffectiveOptions, Options};
use crate::domain::record::{LogRecord, RequestLog};
use crate::domain::window::QuietDownWindow;
use crate::infrastructure::clock::SystemClock;
use crate::infrastructure::storage::ShardedStorage;

use std::panic::Location;
use std::sync::Arc;

/// Default storage for quiet-down windows.
pub type DefaultStorage = Arc<ShardedStorage<String, QuietDownWindow>>;

/// Builder for constructing an `HttpLogger`.
#[derive(Debug, Default)]
pub struct HttpLoggerBuilder {
    options: Options,
    clock: Option<Arc<dyn Clock>>,
}

impl HttpLoggerBuilder {
    /// Set the raw options; they are resolved by `build()`.
    pub fn with_options(mut self, options: Options) -> Self {
        self.options = options;
        self
    }

    /// Set a custom clock (mainly for testing).
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = Some(clock);
        self
    }

    /// Resolve the options and build the logger.
    ///
    /// Never fails: unset options fall back to defaults.
    pub fn build(self) -> HttpLogger {
        let clock = self.clock.unwrap_or_else(|| Arc::new(SystemClock::new()));
        HttpLogger::with_storage(Arc::new(ShardedStorage::new()), self.options.resolve(), clock)
    }
}

/// Request logging policy for one middleware instance.
///
/// Cloning is cheap and clones share options, quiet-down state and metrics.
///
/// # Example
/// ```
/// use tracing_httplog::{HttpLogger, Options, RequestLog};
///
/// let logger = HttpLogger::new(Options {
///     quiet_down_routes: vec!["/health".to_string()],
///     ..Options::default()
/// });
///
/// let health = RequestLog::new("GET", "/health").with_status(200);
/// assert!(logger.log_request(&health).is_some());
/// // silenced for the next five minutes
/// assert!(logger.log_request(&health).is_none());
///
/// let users = RequestLog::new("GET", "/users").with_status(200);
/// assert!(logger.log_request(&users).is_some());
/// assert!(logger.log_request(&users).is_some());
/// ```
#[derive(Clone)]
pub struct HttpLogger<S = DefaultStorage>
where
    S: Storage<String, QuietDownWindow> + Clone,
{
    options: Arc<EffectiveOptions>,
    tracker: QuietDownTracker<S>,
}

impl HttpLogger<DefaultStorage> {
    /// Create a builder for configuring the logger.
    pub fn builder() -> HttpLoggerBuilder {
        HttpLoggerBuilder::default()
    }

    /// Create a logger from raw options with the system clock.
    pub fn new(options: Options) -> Self {
        Self::builder().with_options(options).build()
    }

    /// Create a logger with a custom storage backend.
    pub fn with_storage<ST>(
        storage: ST,
        options: EffectiveOptions,
        clock: Arc<dyn Clock>,
    ) -> HttpLogger<ST>
    where
        ST: Storage<String, QuietDownWindow> + Clone,
    {
        let registry = QuietDownRegistry::new(storage, clock);
        let tracker = QuietDownTracker::new(registry, &options, Metrics::new());

        HttpLogger {
            options: Arc::new(options),
            tracker,
        }
    }
}

impl Default for HttpLogger<DefaultStorage> {
    fn default() -> Self {
        Self::new(Options::default())
    }
}

impl<S> HttpLogger<S>
where
    S: Storage<String, QuietDownWindow> + Clone,
{
    /// Decide whether a request on `route` is logged, updating quiet-down state.
    pub fn check_route(&self, route: &str) -> QuietDownDecision {
        self.tracker.check_route(route)
    }

    /// Whether a request on `route` should be logged now.
    pub fn should_log(&self, route: &str) -> bool {
        self.tracker.should_log(route)
    }

    /// Decide and, if eligible, assemble the record for a request.
    ///
    /// The caller's location is recorded when a source field is configured.
    #[track_caller]
    pub fn log_request(&self, request: &RequestLog) -> Option<LogRecord> {
        let source = Location::caller();
        if !self.tracker.should_log(&request.path) {
            return None;
        }
        Some(LogRecord::assemble(request, &self.options, Some(source)))
    }

    /// Decide, assemble and hand the record to `writer`.
    ///
    /// Returns whether a record was written.
    #[track_caller]
    pub fn log_with<W>(&self, request: &RequestLog, writer: &W) -> bool
    where
        W: RecordWriter + ?Sized,
    {
        match self.log_request(request) {
            Some(record) => {
                writer.write(&record);
                true
            }
            None => false,
        }
    }

    /// Apply the header redaction policy with this logger's options.
    pub fn filter_headers<I, K, V>(&self, headers: I, direction: Direction) -> HeaderFields
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        filter_headers(headers, &self.options, direction)
    }

    pub fn options(&self) -> &EffectiveOptions {
        &self.options
    }

    pub fn tracker(&self) -> &QuietDownTracker<S> {
        &self.tracker
    }

    pub fn metrics(&self) -> &Metrics {
        self.tracker.metrics()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::mocks::MockClock;
    use std::sync::Mutex;
    use std::time::{Duration, Instant};

    #[derive(Default)]
    struct VecWriter {
        records: Mutex<Vec<LogRecord>>,
    }

    impl RecordWriter for VecWriter {
        fn write(&self, record: &LogRecord) {
            self.records.lock().unwrap().push(record.clone());
        }
    }

    fn logger(options: Options) -> (HttpLogger, MockClock) {
        let clock = MockClock::new(Instant::now());
        let logger = HttpLogger::builder()
            .with_options(options)
            .with_clock(Arc::new(clock.clone()))
            .build();
        (logger, clock)
    }

    #[test]
    fn test_builder_resolves_options() {
        let (logger, _clock) = logger(Options {
            level_field_name: String::new(),
            hide_request_headers: vec!["X-Secret".to_string()],
            quiet_down_routes: vec!["/health".to_string()],
            ..Options::default()
        });

        assert_eq!(logger.options().level_field_name(), "level");
        assert_eq!(logger.options().hide_request_headers(), ["x-secret"]);
        assert_eq!(logger.tracker().period(), Duration::from_secs(300));
    }

    #[test]
    fn test_quiet_down_with_writer() {
        let (logger, clock) = logger(Options {
            quiet_down_routes: vec!["/health".to_string()],
            quiet_down_period: Duration::from_secs(10),
            ..Options::default()
        });
        let writer = VecWriter::default();
        let health = RequestLog::new("GET", "/health").with_status(200);

        assert!(logger.log_with(&health, &writer));
        clock.advance(Duration::from_secs(5));
        assert!(!logger.log_with(&health, &writer));
        clock.advance(Duration::from_secs(6));
        assert!(logger.log_with(&health, &writer));
        clock.advance(Duration::from_secs(4));
        assert!(!logger.log_with(&health, &writer));

        assert_eq!(writer.records.lock().unwrap().len(), 2);
        let snapshot = logger.metrics().snapshot();
        assert_eq!(snapshot.requests_logged, 2);
        assert_eq!(snapshot.requests_suppressed, 2);
    }

    #[test]
    fn test_source_is_call_site() {
        let (logger, _clock) = logger(Options {
            source_field_name: "source".to_string(),
            ..Options::default()
        });

        let line = line!() + 1;
        let record = logger.log_request(&RequestLog::new("GET", "/")).unwrap();
        assert_eq!(
            record.get_str("source"),
            Some(format!("{}:{}", file!(), line).as_str())
        );
    }

    #[test]
    fn test_clones_share_state() {
        let (logger, _clock) = logger(Options {
            quiet_down_routes: vec!["/health".to_string()],
            ..Options::default()
        });
        let clone = logger.clone();

        assert!(logger.should_log("/health"));
        assert!(!clone.should_log("/health"));
        assert_eq!(clone.metrics().requests_logged(), 1);
    }

    #[test]
    fn test_instances_are_independent() {
        let options = Options {
            quiet_down_routes: vec!["/health".to_string()],
            ..Options::default()
        };
        let (first, _) = logger(options.clone());
        let (second, _) = logger(options);

        assert!(first.should_log("/health"));
        assert!(second.should_log("/health"));
    }

    #[test]
    fn test_filter_headers_uses_options() {
        let (logger, _clock) = logger(Options {
            hide_request_headers: vec!["X-Internal".to_string()],
            ..Options::default()
        });

        let kept = logger.filter_headers(
            [("x-internal", "1"), ("Cookie", "a=b"), ("Accept", "*/*")],
            Direction::Request,
        );
        assert_eq!(kept.keys().collect::<Vec<_>>(), vec!["Accept"]);
    }

    #[test]
    fn test_default_logger() {
        let logger = HttpLogger::default();
        assert_eq!(logger.check_route("/anything"), QuietDownDecision::Exempt);
    }
}
