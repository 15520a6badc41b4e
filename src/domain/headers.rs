//! Header redaction policy.
//!
//! Request headers are logged only when enabled, and never include the
//! sensitive set (`authorization`, `cookie`, `set-cookie`) or any header listed
//! in [`Options::hide_request_headers`](crate::Options::hide_request_headers).
//! Response headers are gated solely on their flag; no redaction list applies.
//! Names are compared case-insensitively.

use crate::domain::options::EffectiveOptions;
use http::HeaderMap;
use std::collections::BTreeMap;

/// Request headers that are never logged.
pub const SENSITIVE_HEADERS: &[&str] = &["authorization", "cookie", "set-cookie"];

/// Filtered headers, keyed by header name, repeated headers grouped in order.
pub type HeaderFields = BTreeMap<String, Vec<String>>;

/// Which side of the exchange headers belong to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Request,
    Response,
}

/// Check whether a header belongs to the built-in sensitive set.
pub fn is_sensitive_header(name: &str) -> bool {
    SENSITIVE_HEADERS
        .iter()
        .any(|sensitive| sensitive.eq_ignore_ascii_case(name))
}

/// Decide whether a single header may appear in a record.
pub fn keep_header(name: &str, opts: &EffectiveOptions, direction: Direction) -> bool {
    match direction {
        Direction::Request => {
            if !opts.request_headers() || is_sensitive_header(name) {
                return false;
            }
            // hide list is lower-cased during resolution
            let lowered = name.to_ascii_lowercase();
            !opts.hide_request_headers().contains(&lowered)
        }
        Direction::Response => opts.response_headers(),
    }
}

/// Apply the redaction policy to a set of headers.
///
/// Header names keep the casing they were supplied with.
///
/// # Example
/// ```
/// use tracing_httplog::{filter_headers, Direction, Options};
///
/// let opts = Options::default().resolve();
/// let headers = [("Authorization", "Bearer x"), ("X-Trace", "1")];
/// let kept = filter_headers(headers, &opts, Direction::Request);
///
/// assert_eq!(kept.len(), 1);
/// assert_eq!(kept["X-Trace"], ["1"]);
/// ```
pub fn filter_headers<I, K, V>(headers: I, opts: &EffectiveOptions, direction: Direction) -> HeaderFields
where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: Into<String>,
{
    let mut out = HeaderFields::new();

    let enabled = match direction {
        Direction::Request => opts.request_headers(),
        Direction::Response => opts.response_headers(),
    };
    if !enabled {
        return out;
    }

    for (name, value) in headers {
        let name = name.as_ref();
        if keep_header(name, opts, direction) {
            out.entry(name.to_string()).or_default().push(value.into());
        }
    }

    out
}

/// Apply the redaction policy to an [`http::HeaderMap`].
///
/// Values that are not valid visible ASCII are logged as `"<binary>"`.
pub fn filter_header_map(headers: &HeaderMap, opts: &EffectiveOptions, direction: Direction) -> HeaderFields {
    filter_headers(
        headers.iter().map(|(name, value)| {
            let value = match value.to_str() {
                Ok(v) => v.to_string(),
                Err(_) => "<binary>".to_string(),
            };
            (name.as_str(), value)
        }),
        opts,
        direction,
    )
}
