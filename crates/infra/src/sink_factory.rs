//! Metric sink selection from configuration.

use poolstats_adapters::{JsonLinesMetricSink, PrefixedMetricSink, StatsdMetricSink};
use poolstats_app::StatsReporter;
use poolstats_config::{MetricsBackend, MetricsConfig};
use poolstats_ports::MetricSink;
use std::sync::Arc;

/// Build the metric sink described by `config`, or `None` when reporting is off.
///
/// - `statsd`: a sink only when a host or a port is set; the other value
///   falls back to `localhost` / `8125`.
/// - `json-lines`: always a sink writing to stderr.
/// - `disabled`: never a sink.
///
/// A configured prefix wraps the sink so every key becomes `<prefix>.<key>`.
/// Construction performs no I/O.
pub fn build_metric_sink(config: &MetricsConfig) -> Option<Arc<dyn MetricSink>> {
    let sink: Arc<dyn MetricSink> = match config.backend {
        MetricsBackend::Disabled => {
            tracing::debug!("metrics backend disabled");
            return None;
        },
        MetricsBackend::Statsd if !config.statsd_configured() => {
            tracing::debug!("statsd host and port unset; metrics disabled");
            return None;
        },
        MetricsBackend::Statsd => {
            let host = config.effective_host();
            let port = config.effective_port();
            tracing::info!(host, port, "metrics go to statsd");
            Arc::new(StatsdMetricSink::new(host, port))
        },
        MetricsBackend::JsonLines => {
            tracing::info!("metrics go to stderr as json lines");
            Arc::new(JsonLinesMetricSink::stderr())
        },
    };

    match config.prefix.as_deref() {
        Some(prefix) => {
            tracing::debug!(prefix, "metric keys are prefixed");
            Some(Arc::new(PrefixedMetricSink::new(sink, prefix)))
        },
        None => Some(sink),
    }
}

/// Build a reporter wired to the sink described by `config`.
pub fn build_stats_reporter(config: &MetricsConfig) -> StatsReporter {
    StatsReporter::new(build_metric_sink(config))
}
