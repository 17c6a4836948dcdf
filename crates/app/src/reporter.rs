//! Metrics reporter: launch statistics and node pool gauges.

use crate::aggregate::{NodeStateSnapshot, aggregate_node_states};
use poolstats_domain::{LaunchEvent, ProviderConfig};
use poolstats_ports::{MetricSink, NodeStatePort};
use std::sync::Arc;

/// Reports launch and pool statistics to an optional metric sink.
///
/// Without a sink every operation returns immediately.
#[derive(Clone, Default)]
pub struct StatsReporter {
    sink: Option<Arc<dyn MetricSink>>,
}

impl StatsReporter {
    /// Reporter emitting through `sink` (or nothing when `None`).
    #[must_use]
    pub fn new(sink: Option<Arc<dyn MetricSink>>) -> Self {
        Self { sink }
    }

    /// Reporter emitting through `sink`.
    #[must_use]
    pub fn with_sink(sink: Arc<dyn MetricSink>) -> Self {
        Self { sink: Some(sink) }
    }

    /// Reporter with reporting disabled.
    #[must_use]
    pub const fn disabled() -> Self {
        Self { sink: None }
    }

    /// True when a sink is configured.
    #[must_use]
    pub const fn is_enabled(&self) -> bool {
        self.sink.is_some()
    }

    /// Emit a timing and a counter for every key derived from `event`.
    pub fn record_launch(&self, event: &LaunchEvent) {
        let Some(sink) = self.sink.as_deref() else {
            tracing::debug!(subkey = %event.subkey, "metrics disabled; launch not recorded");
            return;
        };

        let keys = event.metric_keys();
        for key in &keys {
            sink.timing(key.as_str(), event.duration_ms);
            sink.increment(key.as_str());
        }

        tracing::debug!(
            subkey = %event.subkey,
            provider = %event.provider_name,
            duration_ms = event.duration_ms,
            keys = keys.len(),
            "launch recorded"
        );
    }

    /// Scan `store` once and emit one gauge per node state key, then the
    /// provider capacity gauge.
    ///
    /// Returns the snapshot that was emitted, or `None` without touching the
    /// store when reporting is disabled.
    pub fn update_node_stats(
        &self,
        store: &dyn NodeStatePort,
        provider: &ProviderConfig,
    ) -> Option<NodeStateSnapshot> {
        let Some(sink) = self.sink.as_deref() else {
            tracing::debug!(provider = %provider.name, "metrics disabled; node stats skipped");
            return None;
        };

        let snapshot = aggregate_node_states(store.node_iter(), provider);
        emit_snapshot(sink, &snapshot);

        tracing::debug!(
            provider = %provider.name,
            nodes = snapshot.node_count(),
            gauges = snapshot.len() + 1,
            "node stats updated"
        );
        Some(snapshot)
    }
}

impl std::fmt::Debug for StatsReporter {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        formatter
            .debug_struct("StatsReporter")
            .field("enabled", &self.is_enabled())
            .finish()
    }
}

fn emit_snapshot(sink: &dyn MetricSink, snapshot: &NodeStateSnapshot) {
    for (key, value) in snapshot.gauges() {
        sink.gauge(key.as_str(), value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use poolstats_domain::{NodeRecord, NodeState, PoolConfig};
    use poolstats_testkit::{InMemoryNodeStore, MetricCall, RecordingMetricSink};

    fn provider() -> ProviderConfig {
        ProviderConfig::new("p1")
            .with_pool("pool1", PoolConfig::with_max_servers(5))
            .with_pool("pool2", PoolConfig::default())
    }

    #[test]
    fn launch_emits_timing_then_counter_per_key() {
        let sink = RecordingMetricSink::shared();
        let reporter = StatsReporter::with_sink(sink.clone());

        reporter.record_launch(&LaunchEvent::new("ready", 42, "img1", "p1"));

        assert_eq!(
            sink.calls(),
            vec![
                MetricCall::Timing {
                    key: "pool.launch.provider.p1.ready".into(),
                    duration_ms: 42
                },
                MetricCall::Increment {
                    key: "pool.launch.provider.p1.ready".into()
                },
                MetricCall::Timing {
                    key: "pool.launch.image.img1.ready".into(),
                    duration_ms: 42
                },
                MetricCall::Increment {
                    key: "pool.launch.image.img1.ready".into()
                },
                MetricCall::Timing {
                    key: "pool.launch.ready".into(),
                    duration_ms: 42
                },
                MetricCall::Increment {
                    key: "pool.launch.ready".into()
                },
            ]
        );
    }

    #[test]
    fn disabled_reporter_never_requests_an_iterator() {
        let store = InMemoryNodeStore::new(vec![NodeRecord::new(NodeState::Ready, "a", "p1")]);
        let reporter = StatsReporter::disabled();

        assert!(!reporter.is_enabled());
        assert_eq!(reporter.update_node_stats(&store, &provider()), None);
        reporter.record_launch(&LaunchEvent::new("ready", 1, "img1", "p1"));
        assert_eq!(store.iter_requests(), 0);
        assert_eq!(store.records_pulled(), 0);
    }

    #[test]
    fn node_stats_are_emitted_as_gauges() {
        let sink = RecordingMetricSink::shared();
        let reporter = StatsReporter::with_sink(sink.clone());
        let store = InMemoryNodeStore::new(vec![
            NodeRecord::new(NodeState::Ready, "a", "p1"),
            NodeRecord::new(NodeState::Building, "a", "p1"),
        ]);

        let snapshot = reporter.update_node_stats(&store, &provider());

        assert_eq!(store.iter_requests(), 1);
        assert_eq!(store.records_pulled(), 2);
        assert_eq!(sink.gauge_value("pool.nodes.ready"), Some(1));
        assert_eq!(sink.gauge_value("pool.nodes.building"), Some(1));
        assert_eq!(sink.gauge_value("pool.nodes.deleting"), Some(0));
        assert_eq!(sink.gauge_value("pool.provider.p1.nodes.ready"), Some(1));
        assert_eq!(sink.gauge_value("pool.provider.p1.max_servers"), Some(5));
        assert_eq!(
            sink.gauges().len(),
            snapshot.map_or(0, |snapshot| snapshot.len() + 1)
        );
        assert!(
            sink.calls()
                .iter()
                .all(|call| matches!(call, MetricCall::Gauge { .. }))
        );
    }
}
