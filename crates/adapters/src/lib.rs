//! # poolstats-adapters
//!
//! Metric sink implementations for the `MetricSink` port.
//! This crate depends on `ports`.

/// JSON-lines metric sink.
pub mod json_lines;
pub mod log_sink;
/// Key-prefixing sink wrapper.
pub mod prefixed;
pub mod statsd;

pub use json_lines::JsonLinesMetricSink;
pub use log_sink::{BufferedLogSink, LogSink, StderrLogSink};
pub use prefixed::PrefixedMetricSink;
pub use statsd::{DEFAULT_SETUP_RETRY_AFTER, StatsdKind, StatsdMetricSink, format_statsd_line};

/// Returns the adapters crate version.
#[must_use]
pub const fn adapters_crate_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
