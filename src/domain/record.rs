//! Structured records for logged requests.
//!
//! A [`LogRecord`] is an ordered list of field name/value pairs plus a severity.
//! Field names for level, message, time and source come from
//! [`EffectiveOptions`]. Header maps are added only after passing the
//! redaction policy. Static tags come last and never replace another field.

use crate::domain::headers::{filter_headers, Direction, HeaderFields};
use crate::domain::options::EffectiveOptions;
use http::StatusCode;
use std::fmt;
use std::panic::Location;
use std::time::{Duration, SystemTime, UNIX_EPOCH};
use tracing::Level;

/// Value of a single record field.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Str(String),
    U64(u64),
    F64(f64),
    Time(SystemTime),
    Headers(HeaderFields),
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Str(s) => write!(f, "{:?}", s),
            FieldValue::U64(n) => write!(f, "{}", n),
            FieldValue::F64(n) => write!(f, "{:.3}", n),
            FieldValue::Time(t) => {
                let since = t.duration_since(UNIX_EPOCH).unwrap_or(Duration::ZERO);
                write!(f, "{}.{:03}", since.as_secs(), since.subsec_millis())
            }
            FieldValue::Headers(headers) => {
                f.write_str("{")?;
                for (i, (name, values)) in headers.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{:?}: {:?}", name, values)?;
                }
                f.write_str("}")
            }
        }
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        FieldValue::Str(s.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(s: String) -> Self {
        FieldValue::Str(s)
    }
}

impl From<u64> for FieldValue {
    fn from(n: u64) -> Self {
        FieldValue::U64(n)
    }
}

/// Facts about one request/response exchange, supplied by the middleware.
#[derive(Debug, Clone, Default)]
pub struct RequestLog {
    pub method: String,
    /// Route identifier; matched exactly against quiet-down routes.
    pub path: String,
    pub status: Option<u16>,
    pub duration: Option<Duration>,
    /// Explicit message; derived from method, path and status when absent.
    pub message: Option<String>,
    /// Explicit severity; derived from status when absent.
    pub level: Option<Level>,
    pub remote_addr: Option<String>,
    pub user_agent: Option<String>,
    pub content_length: Option<u64>,
    /// Unfiltered request headers.
    pub request_headers: Vec<(String, String)>,
    /// Unfiltered response headers.
    pub response_headers: Vec<(String, String)>,
    /// Time of the exchange; the system time is used when absent.
    pub time: Option<SystemTime>,
}

impl RequestLog {
    pub fn new(method: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            path: path.into(),
            ..Self::default()
        }
    }

    /// Describe an incoming [`http::Request`].
    ///
    /// Picks up method, path, headers, user agent and content length.
    pub fn from_request<B>(request: &http::Request<B>) -> Self {
        let headers = request.headers();
        let header_str = |name: http::header::HeaderName| {
            headers
                .get(name)
                .and_then(|v| v.to_str().ok())
                .map(str::to_string)
        };

        Self {
            method: request.method().as_str().to_string(),
            path: request.uri().path().to_string(),
            user_agent: header_str(http::header::USER_AGENT),
            content_length: header_str(http::header::CONTENT_LENGTH).and_then(|v| v.parse().ok()),
            request_headers: collect_headers(headers),
            ..Self::default()
        }
    }

    /// Record response details from an [`http::Response`].
    pub fn with_response<B>(mut self, response: &http::Response<B>) -> Self {
        self.status = Some(response.status().as_u16());
        self.response_headers = collect_headers(response.headers());
        self
    }

    pub fn with_status(mut self, status: u16) -> Self {
        self.status = Some(status);
        self
    }

    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = Some(duration);
        self
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    pub fn with_level(mut self, level: Level) -> Self {
        self.level = Some(level);
        self
    }

    pub fn with_remote_addr(mut self, addr: impl Into<String>) -> Self {
        self.remote_addr = Some(addr.into());
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    pub fn with_content_length(mut self, length: u64) -> Self {
        self.content_length = Some(length);
        self
    }

    pub fn with_request_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.request_headers.push((name.into(), value.into()));
        self
    }

    pub fn with_response_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.response_headers.push((name.into(), value.into()));
        self
    }

    pub fn with_time(mut self, time: SystemTime) -> Self {
        self.time = Some(time);
        self
    }

    /// Severity for this exchange.
    ///
    /// 5xx is an error, 4xx a warning, anything else uses `default`.
    pub fn severity(&self, default: Level) -> Level {
        if let Some(level) = self.level {
            return level;
        }
        match self.status {
            Some(status) if status >= 500 => Level::ERROR,
            Some(status) if status >= 400 => Level::WARN,
            _ => default,
        }
    }

    /// Message for this exchange.
    pub fn message(&self) -> String {
        if let Some(message) = &self.message {
            return message.clone();
        }
        match self.status {
            Some(status) => {
                let reason = StatusCode::from_u16(status)
                    .ok()
                    .and_then(|s| s.canonical_reason())
                    .unwrap_or("");
                format!("Response: {} {}", status, reason).trim_end().to_string()
            }
            None => format!("Request: {} {}", self.method, self.path),
        }
    }
}

fn collect_headers(headers: &http::HeaderMap) -> Vec<(String, String)> {
    headers
        .iter()
        .map(|(name, value)| {
            let value = match value.to_str() {
                Ok(v) => v.to_string(),
                Err(_) => "<binary>".to_string(),
            };
            (name.as_str().to_string(), value)
        })
        .collect()
}

/// Names of the fields filled from request facts; tags may not use them.
pub const REQUEST_FIELDS: &[&str] = &[
    "method",
    "path",
    "status",
    "duration_ms",
    "remote_addr",
    "user_agent",
    "content_length",
    "request_headers",
    "response_headers",
];

/// An assembled record ready for a writer.
#[derive(Debug, Clone, PartialEq)]
pub struct LogRecord {
    level: Level,
    fields: Vec<(String, FieldValue)>,
}

impl LogRecord {
    /// Assemble a record from request facts and effective options.
    ///
    /// `source` is the call-site location; it is only recorded when a source
    /// field name is configured.
    pub fn assemble(
        request: &RequestLog,
        opts: &EffectiveOptions,
        source: Option<&Location<'_>>,
    ) -> Self {
        let level = request.severity(opts.log_level());
        let mut record = Self {
            level,
            fields: Vec::with_capacity(8 + opts.tags().len()),
        };

        record.push(opts.level_field_name(), level.as_str());
        record.push(opts.message_field_name(), request.message());

        if let Some(name) = opts.time_field_name() {
            let time = request.time.unwrap_or_else(SystemTime::now);
            record.push(name, FieldValue::Time(time));
        }

        if let (Some(name), Some(location)) = (opts.source_field_name(), source) {
            record.push(name, format!("{}:{}", location.file(), location.line()));
        }

        record.push("method", request.method.as_str());
        record.push("path", request.path.as_str());
        if let Some(status) = request.status {
            record.push("status", u64::from(status));
        }
        if let Some(duration) = request.duration {
            record.push("duration_ms", FieldValue::F64(duration.as_secs_f64() * 1000.0));
        }

        if !opts.concise() {
            if let Some(addr) = &request.remote_addr {
                record.push("remote_addr", addr.as_str());
            }
            if let Some(user_agent) = &request.user_agent {
                record.push("user_agent", user_agent.as_str());
            }
            if let Some(length) = request.content_length {
                record.push("content_length", length);
            }
        }

        if opts.request_headers() {
            let headers = filter_headers(
                request.request_headers.iter().map(|(k, v)| (k, v.as_str())),
                opts,
                Direction::Request,
            );
            record.push("request_headers", FieldValue::Headers(headers));
        }

        if opts.response_headers() {
            let headers = filter_headers(
                request.response_headers.iter().map(|(k, v)| (k, v.as_str())),
                opts,
                Direction::Response,
            );
            record.push("response_headers", FieldValue::Headers(headers));
        }

        for (key, value) in opts.tags() {
            // tags never shadow configured or request fields
            if !record.contains(key) && !REQUEST_FIELDS.contains(&key.as_str()) {
                record.push(key, value.as_str());
            }
        }

        record
    }

    fn push(&mut self, name: &str, value: impl Into<FieldValue>) {
        self.fields.push((name.to_string(), value.into()));
    }

    fn contains(&self, name: &str) -> bool {
        self.fields.iter().any(|(n, _)| n == name)
    }

    pub fn level(&self) -> Level {
        self.level
    }

    /// Fields in emission order.
    pub fn fields(&self) -> &[(String, FieldValue)] {
        &self.fields
    }

    /// Look up a field by name.
    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.fields.iter().find(|(n, _)| n == name).map(|(_, v)| v)
    }

    /// Look up a string field by name.
    pub fn get_str(&self, name: &str) -> Option<&str> {
        match self.get(name) {
            Some(FieldValue::Str(s)) => Some(s),
            _ => None,
        }
    }

    pub fn get_u64(&self, name: &str) -> Option<u64> {
        match self.get(name) {
            Some(FieldValue::U64(n)) => Some(*n),
            _ => None,
        }
    }

    pub fn get_f64(&self, name: &str) -> Option<f64> {
        match self.get(name) {
            Some(FieldValue::F64(n)) => Some(*n),
            _ => None,
        }
    }
}

/// Renders `name=value` pairs. The alternate form puts one pair per line.
impl fmt::Display for LogRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let separator = if f.alternate() { "\n" } else { " " };
        for (i, (name, value)) in self.fields.iter().enumerate() {
            if i > 0 {
                f.write_str(separator)?;
            }
            write!(f, "{}={}", name, value)?;
        }
        Ok(())
    }
}
