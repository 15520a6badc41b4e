//! Record writer backed by `tracing`.
//!
//! Emits each [`LogRecord`] as one tracing event at the record's level, under
//! the [`TARGET`] target, so that the subscriber stack of the application
//! decides encoding and transport. The rendered record is the event message;
//! `method`, `path`, `status` and `duration_ms` are also recorded as typed
//! event fields when present.

use crate::application::ports::RecordWriter;
use crate::domain::options::EffectiveOptions;
use crate::domain::record::LogRecord;
use tracing::Level;

/// Target of events emitted by [`TracingWriter`].
pub const TARGET: &str = "http";

macro_rules! emit {
    ($level:expr, $($fields:tt)*) => {
        match $level {
            Level::ERROR => tracing::error!(target: TARGET, $($fields)*),
            Level::WARN => tracing::warn!(target: TARGET, $($fields)*),
            Level::INFO => tracing::info!(target: TARGET, $($fields)*),
            Level::DEBUG => tracing::debug!(target: TARGET, $($fields)*),
            _ => tracing::trace!(target: TARGET, $($fields)*),
        }
    };
}

/// Writes records as tracing events.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingWriter {
    pretty: bool,
}

impl TracingWriter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Writer honoring the `pretty` option.
    pub fn for_options(opts: &EffectiveOptions) -> Self {
        Self {
            pretty: opts.pretty(),
        }
    }

    /// Render one field per line.
    pub fn with_pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }
}

impl RecordWriter for TracingWriter {
    fn write(&self, record: &LogRecord) {
        let rendered = if self.pretty {
            format!("{:#}", record)
        } else {
            record.to_string()
        };
        emit!(
            record.level(),
            method = record.get_str("method"),
            path = record.get_str("path"),
            status = record.get_u64("status"),
            duration_ms = record.get_f64("duration_ms"),
            fields = record.fields().len(),
            "{}",
            rendered
        );
    }
}
