//! Logging options and their resolution into effective options.
//!
//! [`Options`] is what the embedding application supplies. [`Options::resolve`]
//! fills unset values with defaults and normalizes header names once, producing
//! [`EffectiveOptions`], which is read-only for the rest of the process.
//!
//! Resolution never fails: absent or inconsistent values silently fall back to
//! defaults so that a logging misconfiguration cannot block server startup.

use std::collections::BTreeMap;
use std::time::Duration;
use tracing::Level;

/// Default field name for the log level.
pub const DEFAULT_LEVEL_FIELD_NAME: &str = "level";

/// Default field name for the message.
pub const DEFAULT_MESSAGE_FIELD_NAME: &str = "message";

/// Quiet-down period used when routes are configured without a period.
pub const DEFAULT_QUIET_DOWN_PERIOD: Duration = Duration::from_secs(5 * 60);

/// User-supplied logging options.
///
/// Every field may be left at its default. Call [`Options::resolve`] to obtain
/// the options used at request-serving time.
///
/// # Example
/// ```
/// use tracing_httplog::Options;
/// use std::time::Duration;
///
/// let effective = Options {
///     hide_request_headers: vec!["X-Api-Key".to_string()],
///     quiet_down_routes: vec!["/health".to_string()],
///     ..Options::default()
/// }
/// .resolve();
///
/// assert_eq!(effective.hide_request_headers(), ["x-api-key"]);
/// assert_eq!(effective.quiet_down_period(), Duration::from_secs(300));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default, deny_unknown_fields))]
pub struct Options {
    /// Field name for the log level. Some providers search for different names.
    pub level_field_name: String,

    /// Field name for the message.
    pub message_field_name: String,

    /// Field name for the timestamp. Empty disables the time field.
    pub time_field_name: String,

    /// Field name for the call-site location. Empty disables source logging.
    pub source_field_name: String,

    /// Render records across multiple lines.
    pub pretty: bool,

    /// Log fewer request details (remote address, user agent, content length).
    pub concise: bool,

    /// Static fields merged into every record, e.g. a build hash or environment.
    pub tags: BTreeMap<String, String>,

    /// Log request headers. Sensitive headers are always hidden.
    pub request_headers: bool,

    /// Additional request headers redacted from records.
    pub hide_request_headers: Vec<String>,

    /// Log response headers.
    pub response_headers: bool,

    /// Routes logged at most once per quiet-down period.
    pub quiet_down_routes: Vec<String>,

    /// Length of the silence window for quiet-down routes.
    #[cfg_attr(
        feature = "serde",
        serde(deserialize_with = "serde_support::duration_from_secs")
    )]
    pub quiet_down_period: Duration,

    /// Severity for records of successful requests.
    #[cfg_attr(
        feature = "serde",
        serde(deserialize_with = "serde_support::level_from_name")
    )]
    pub log_level: Level,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            level_field_name: DEFAULT_LEVEL_FIELD_NAME.to_string(),
            message_field_name: DEFAULT_MESSAGE_FIELD_NAME.to_string(),
            time_field_name: String::new(),
            source_field_name: String::new(),
            pretty: false,
            concise: true,
            tags: BTreeMap::new(),
            request_headers: true,
            hide_request_headers: Vec::new(),
            response_headers: false,
            quiet_down_routes: Vec::new(),
            quiet_down_period: Duration::ZERO,
            log_level: Level::INFO,
        }
    }
}

impl Options {
    /// Fill defaults and normalize, producing the effective options.
    ///
    /// - empty level field name becomes `"level"`
    /// - empty message field name becomes `"message"`
    /// - a non-empty quiet-down route list with a zero period gets 5 minutes
    /// - hidden request header names are lower-cased in place
    pub fn resolve(mut self) -> EffectiveOptions {
        if self.level_field_name.is_empty() {
            self.level_field_name = DEFAULT_LEVEL_FIELD_NAME.to_string();
        }

        if self.message_field_name.is_empty() {
            self.message_field_name = DEFAULT_MESSAGE_FIELD_NAME.to_string();
        }

        if !self.quiet_down_routes.is_empty() && self.quiet_down_period.is_zero() {
            self.quiet_down_period = DEFAULT_QUIET_DOWN_PERIOD;
        }

        for header in self.hide_request_headers.iter_mut() {
            header.make_ascii_lowercase();
        }

        tracing::debug!(
            level_field = %self.level_field_name,
            message_field = %self.message_field_name,
            quiet_down_routes = self.quiet_down_routes.len(),
            quiet_down_period_secs = self.quiet_down_period.as_secs(),
            hidden_headers = self.hide_request_headers.len(),
            "resolved http logging options"
        );

        EffectiveOptions { inner: self }
    }
}

/// Resolve raw options. Equivalent to [`Options::resolve`].
pub fn resolve(options: Options) -> EffectiveOptions {
    options.resolve()
}

/// Fully defaulted, normalized options used while serving requests.
///
/// Guarantees:
/// - level and message field names are non-empty
/// - a non-empty quiet-down route list comes with a non-zero period
/// - every hidden request header name is lower-case
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EffectiveOptions {
    inner: Options,
}

impl EffectiveOptions {
    pub fn level_field_name(&self) -> &str {
        &self.inner.level_field_name
    }

    pub fn message_field_name(&self) -> &str {
        &self.inner.message_field_name
    }

    /// Time field name, or `None` when time logging is disabled.
    pub fn time_field_name(&self) -> Option<&str> {
        non_empty(&self.inner.time_field_name)
    }

    /// Source field name, or `None` when source logging is disabled.
    pub fn source_field_name(&self) -> Option<&str> {
        non_empty(&self.inner.source_field_name)
    }

    pub fn pretty(&self) -> bool {
        self.inner.pretty
    }

    pub fn concise(&self) -> bool {
        self.inner.concise
    }

    pub fn tags(&self) -> &BTreeMap<String, String> {
        &self.inner.tags
    }

    pub fn request_headers(&self) -> bool {
        self.inner.request_headers
    }

    /// Lower-cased request header names hidden in addition to the sensitive set.
    pub fn hide_request_headers(&self) -> &[String] {
        &self.inner.hide_request_headers
    }

    pub fn response_headers(&self) -> bool {
        self.inner.response_headers
    }

    pub fn quiet_down_routes(&self) -> &[String] {
        &self.inner.quiet_down_routes
    }

    pub fn quiet_down_period(&self) -> Duration {
        self.inner.quiet_down_period
    }

    /// Whether quiet-down applies to any route at all.
    pub fn quiet_down_enabled(&self) -> bool {
        !self.inner.quiet_down_routes.is_empty() && !self.inner.quiet_down_period.is_zero()
    }

    pub fn log_level(&self) -> Level {
        self.inner.log_level
    }

    /// Turn back into raw options, e.g. to derive a modified configuration.
    pub fn into_options(self) -> Options {
        self.inner
    }
}

impl From<EffectiveOptions> for Options {
    fn from(effective: EffectiveOptions) -> Self {
        effective.into_options()
    }
}

impl From<Options> for EffectiveOptions {
    fn from(options: Options) -> Self {
        options.resolve()
    }
}

fn non_empty(s: &str) -> Option<&str> {
    if s.is_empty() {
        None
    } else {
        Some(s)
    }
}

#[cfg(feature = "serde")]
mod serde_support {
    use serde::{Deserialize, Deserializer};
    use std::time::Duration;
    use tracing::Level;

    pub(super) fn duration_from_secs<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        u64::deserialize(deserializer).map(Duration::from_secs)
    }

    pub(super) fn level_from_name<'de, D>(deserializer: D) -> Result<Level, D::Error>
    where
        D: Deserializer<'de>,
    {
        let name = String::deserialize(deserializer)?;
        Ok(crate::domain::level::level_by_name(&name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn blank() -> Options {
        Options {
            level_field_name: String::new(),
            message_field_name: String::new(),
            ..Options::default()
        }
    }

    #[test]
    fn test_empty_field_names_get_defaults() {
        let effective = blank().resolve();
        assert_eq!(effective.level_field_name(), "level");
        assert_eq!(effective.message_field_name(), "message");
    }

    #[test]
    fn test_custom_field_names_kept() {
        let effective = Options {
            level_field_name: "severity".to_string(),
            message_field_name: "msg".to_string(),
            ..Options::default()
        }
        .resolve();

        assert_eq!(effective.level_field_name(), "severity");
        assert_eq!(effective.message_field_name(), "msg");
    }

    #[test]
    fn test_quiet_down_period_defaults_when_routes_set() {
        let effective = Options {
            quiet_down_routes: vec!["/health".to_string()],
            ..Options::default()
        }
        .resolve();

        assert_eq!(effective.quiet_down_period(), DEFAULT_QUIET_DOWN_PERIOD);
        assert!(effective.quiet_down_enabled());
    }

    #[test]
    fn test_quiet_down_period_kept_when_set() {
        let effective = Options {
            quiet_down_routes: vec!["/health".to_string()],
            quiet_down_period: Duration::from_secs(10),
            ..Options::default()
        }
        .resolve();

        assert_eq!(effective.quiet_down_period(), Duration::from_secs(10));
    }

    #[test]
    fn test_quiet_down_period_zero_without_routes() {
        let effective = Options::default().resolve();
        assert_eq!(effective.quiet_down_period(), Duration::ZERO);
        assert!(!effective.quiet_down_enabled());
    }

    #[test]
    fn test_hide_headers_lower_cased() {
        let effective = Options {
            hide_request_headers: vec![
                "X-Api-Key".to_string(),
                "X-TRACE-TOKEN".to_string(),
                "already-lower".to_string(),
            ],
            ..Options::default()
        }
        .resolve();

        assert_eq!(
            effective.hide_request_headers(),
            ["x-api-key", "x-trace-token", "already-lower"]
        );
    }

    #[test]
    fn test_optional_field_names() {
        let effective = Options::default().resolve();
        assert_eq!(effective.time_field_name(), None);
        assert_eq!(effective.source_field_name(), None);

        let effective = Options {
            time_field_name: "time".to_string(),
            source_field_name: "source".to_string(),
            ..Options::default()
        }
        .resolve();
        assert_eq!(effective.time_field_name(), Some("time"));
        assert_eq!(effective.source_field_name(), Some("source"));
    }

    #[test]
    fn test_default_options() {
        let options = Options::default();
        assert!(options.concise);
        assert!(options.request_headers);
        assert!(!options.response_headers);
        assert_eq!(options.log_level, Level::INFO);
    }

    #[test]
    fn test_resolve_is_idempotent() {
        let first = Options {
            level_field_name: String::new(),
            hide_request_headers: vec!["Authorization-Extra".to_string()],
            quiet_down_routes: vec!["/metrics".to_string()],
            ..Options::default()
        }
        .resolve();

        let second = Options::from(first.clone()).resolve();
        assert_eq!(first, second);
    }

    #[test]
    fn test_from_options() {
        let effective: EffectiveOptions = blank().into();
        assert_eq!(effective.level_field_name(), "level");
    }
}
