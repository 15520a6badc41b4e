//! # tracing-httplog
//!
//! Request logging policy for HTTP middleware on top of the `tracing` ecosystem.
//!
//! This crate decides *whether* a request gets logged and *with what fields*.
//! It does not encode or ship logs; records are handed to a [`RecordWriter`]
//! such as [`TracingWriter`], which emits them as `tracing` events.
//!
//! ## Quick Start
//!
//! ```rust
//! use tracing_httplog::{HttpLogger, Options, RequestLog, TracingWriter};
//! use std::time::Duration;
//!
//! // Resolve options once at startup
//! let logger = HttpLogger::new(Options {
//!     hide_request_headers: vec!["X-Api-Key".to_string()],
//!     quiet_down_routes: vec!["/health".to_string(), "/metrics".to_string()],
//!     quiet_down_period: Duration::from_secs(60),
//!     ..Options::default()
//! });
//! let writer = TracingWriter::for_options(logger.options());
//!
//! // Then, per request
//! let request = RequestLog::new("GET", "/users/42")
//!     .with_status(200)
//!     .with_request_header("Authorization", "Bearer secret")
//!     .with_request_header("X-Trace", "abc");
//! logger.log_with(&request, &writer);
//! ```
//!
//! ## Option Resolution
//!
//! [`Options::resolve`] fills unset values once:
//! - empty level field name becomes `"level"`
//! - empty message field name becomes `"message"`
//! - quiet-down routes without a period get a period of 5 minutes
//! - hidden header names are lower-cased
//!
//! Resolution never fails. Resolving already effective options is a no-op.
//!
//! ## Quiet-Down Routes
//!
//! High-frequency, low-value endpoints (health checks, metrics scrapes) can be
//! listed as quiet-down routes. The first occurrence of such a route is always
//! logged. After that the route is silenced for the quiet-down period; the
//! first occurrence after the period is logged again and starts a new window:
//!
//! ```text
//! period = 10s, route "/health"
//!
//! t=0   log       (first occurrence, window starts)
//! t=5   suppress  (window open, anchor stays at 0)
//! t=11  log       (window expired, new window starts)
//! t=15  suppress
//! ```
//!
//! Route matching is exact. State lives in the [`HttpLogger`] (or
//! [`QuietDownTracker`]) instance; two loggers never share windows. Concurrent
//! requests on the same route are serialized per route, so an expired window
//! is only ever reopened by one of them.
//!
//! ## Header Redaction
//!
//! Request headers are logged when [`Options::request_headers`] is set, minus
//! the sensitive set (`authorization`, `cookie`, `set-cookie`) and anything in
//! [`Options::hide_request_headers`]. Response headers are logged when
//! [`Options::response_headers`] is set; no redaction list applies to them.
//!
//! ```rust
//! use tracing_httplog::{filter_headers, Direction, Options};
//!
//! let opts = Options::default().resolve();
//! let kept = filter_headers(
//!     [("Authorization", "Bearer x"), ("X-Trace", "1")],
//!     &opts,
//!     Direction::Request,
//! );
//! assert_eq!(kept.keys().collect::<Vec<_>>(), ["X-Trace"]);
//! ```
//!
//! ## Observability
//!
//! ```rust
//! # use tracing_httplog::{HttpLogger, Options};
//! # let logger = HttpLogger::new(Options::default());
//! let snapshot = logger.metrics().snapshot();
//! println!("logged: {}", snapshot.requests_logged);
//! println!("suppressed: {}", snapshot.requests_suppressed);
//! println!("suppression rate: {:.2}%", snapshot.suppression_rate() * 100.0);
//! ```

// Domain layer - pure business logic
pub mod domain;

// Application layer - orchestration
pub mod application;

// Infrastructure layer - external adapters
pub mod infrastructure;

// Re-export commonly used types for convenience
pub use domain::{
    headers::{
        filter_header_map, filter_headers, is_sensitive_header, keep_header, Direction,
        HeaderFields, SENSITIVE_HEADERS,
    },
    level::{level_by_name, NEUTRAL_LEVEL},
    options::{
        resolve, EffectiveOptions, Options, DEFAULT_LEVEL_FIELD_NAME,
        DEFAULT_MESSAGE_FIELD_NAME, DEFAULT_QUIET_DOWN_PERIOD,
    },
    record::{FieldValue, LogRecord, RequestLog, REQUEST_FIELDS},
    window::{QuietDownWindow, WindowDecision},
};

pub use application::{
    metrics::{Metrics, MetricsSnapshot},
    ports::{Clock, RecordWriter, Storage},
    registry::QuietDownRegistry,
    tracker::{QuietDownDecision, QuietDownTracker},
};

pub use infrastructure::{
    clock::SystemClock,
    logger::{DefaultStorage, HttpLogger, HttpLoggerBuilder},
    storage::ShardedStorage,
    writer::{TracingWriter, TARGET},
};
