//! In-memory port implementations.
//!
//! These implementations are intended for:
//! - Unit/integration tests of the reporter and the sink factory
//! - Contract tests for the ports layer
//! - Local experimentation without a metrics backend

use poolstats_ports::{MetricSink, NodeIter, NodeRecord, NodeStatePort};
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

/// A metric sink that drops everything.
#[derive(Debug, Default)]
pub struct NoopMetricSink;

impl MetricSink for NoopMetricSink {
    fn timing(&self, _key: &str, _duration_ms: u64) {}

    fn increment(&self, _key: &str) {}

    fn gauge(&self, _key: &str, _value: u64) {}
}

/// One captured sink call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MetricCall {
    /// `timing(key, duration_ms)`.
    Timing {
        /// Metric key.
        key: String,
        /// Duration in milliseconds.
        duration_ms: u64,
    },
    /// `increment(key)`.
    Increment {
        /// Metric key.
        key: String,
    },
    /// `gauge(key, value)`.
    Gauge {
        /// Metric key.
        key: String,
        /// Gauge value.
        value: u64,
    },
}

impl MetricCall {
    /// Key of the call regardless of kind.
    pub fn key(&self) -> &str {
        match self {
            Self::Timing { key, .. } | Self::Increment { key } | Self::Gauge { key, .. } => key,
        }
    }
}

/// Metric sink that records every call in order.
#[derive(Debug, Default)]
pub struct RecordingMetricSink {
    calls: Mutex<Vec<MetricCall>>,
}

impl RecordingMetricSink {
    /// Create an empty recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty recorder behind an `Arc`.
    pub fn shared() -> Arc<Self> {
        Arc::new(Self::new())
    }

    /// Snapshot of all calls in emission order.
    pub fn calls(&self) -> Vec<MetricCall> {
        self.calls.lock().expect("recording sink lock").clone()
    }

    /// True when nothing has been recorded.
    pub fn is_empty(&self) -> bool {
        self.calls.lock().expect("recording sink lock").is_empty()
    }

    /// Gauge calls as `(key, value)` pairs in emission order.
    pub fn gauges(&self) -> Vec<(String, u64)> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                MetricCall::Gauge { key, value } => Some((key, value)),
                _ => None,
            })
            .collect()
    }

    /// Last value recorded for a gauge key.
    pub fn gauge_value(&self, key: &str) -> Option<u64> {
        self.gauges()
            .into_iter()
            .rev()
            .find(|(name, _)| name == key)
            .map(|(_, value)| value)
    }

    /// Distinct keys in first-seen order.
    pub fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = Vec::new();
        for call in self.calls() {
            if !keys.iter().any(|key| key == call.key()) {
                keys.push(call.key().to_owned());
            }
        }
        keys
    }

    fn push(&self, call: MetricCall) {
        self.calls.lock().expect("recording sink lock").push(call);
    }
}

impl MetricSink for RecordingMetricSink {
    fn timing(&self, key: &str, duration_ms: u64) {
        self.push(MetricCall::Timing {
            key: key.to_owned(),
            duration_ms,
        });
    }

    fn increment(&self, key: &str) {
        self.push(MetricCall::Increment {
            key: key.to_owned(),
        });
    }

    fn gauge(&self, key: &str, value: u64) {
        self.push(MetricCall::Gauge {
            key: key.to_owned(),
            value,
        });
    }
}

/// Iterator adapter counting how many items were pulled.
#[derive(Debug)]
pub struct CountingIter<I> {
    inner: I,
    pulled: Arc<AtomicUsize>,
}

impl<I> CountingIter<I> {
    /// Wrap `inner`, adding every yielded item to `pulled`.
    pub fn new(inner: I, pulled: Arc<AtomicUsize>) -> Self {
        Self { inner, pulled }
    }
}

impl<I: Iterator> Iterator for CountingIter<I> {
    type Item = I::Item;

    fn next(&mut self) -> Option<Self::Item> {
        let item = self.inner.next()?;
        self.pulled.fetch_add(1, Ordering::SeqCst);
        Some(item)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

/// Node state store holding a fixed list of records.
///
/// Tracks how often an iterator was requested and how many records were
/// pulled across all iterators.
#[derive(Debug, Default)]
pub struct InMemoryNodeStore {
    nodes: Vec<NodeRecord>,
    iter_requests: AtomicUsize,
    pulled: Arc<AtomicUsize>,
}

impl InMemoryNodeStore {
    /// Create a store over `nodes`.
    pub fn new(nodes: Vec<NodeRecord>) -> Self {
        Self {
            nodes,
            iter_requests: AtomicUsize::new(0),
            pulled: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Number of records held.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// True when the store holds no records.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Number of times `node_iter` was called.
    pub fn iter_requests(&self) -> usize {
        self.iter_requests.load(Ordering::SeqCst)
    }

    /// Total records pulled from all iterators handed out.
    pub fn records_pulled(&self) -> usize {
        self.pulled.load(Ordering::SeqCst)
    }
}

impl NodeStatePort for InMemoryNodeStore {
    fn node_iter(&self) -> NodeIter<'_> {
        self.iter_requests.fetch_add(1, Ordering::SeqCst);
        Box::new(CountingIter::new(
            self.nodes.iter().cloned(),
            Arc::clone(&self.pulled),
        ))
    }
}

impl FromIterator<NodeRecord> for InMemoryNodeStore {
    fn from_iter<T: IntoIterator<Item = NodeRecord>>(iter: T) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use poolstats_ports::NodeState;

    #[test]
    fn recorder_keeps_call_order() {
        let sink = RecordingMetricSink::new();
        sink.timing("a", 3);
        sink.increment("a");
        sink.gauge("b", 7);

        assert_eq!(
            sink.calls(),
            vec![
                MetricCall::Timing {
                    key: "a".into(),
                    duration_ms: 3
                },
                MetricCall::Increment { key: "a".into() },
                MetricCall::Gauge {
                    key: "b".into(),
                    value: 7
                },
            ]
        );
        assert_eq!(sink.keys(), vec!["a", "b"]);
        assert_eq!(sink.gauge_value("b"), Some(7));
        assert_eq!(sink.gauge_value("a"), None);
    }

    #[test]
    fn store_counts_requests_and_pulls() {
        let store: InMemoryNodeStore = [
            NodeRecord::new(NodeState::Ready, "small", "p1"),
            NodeRecord::new(NodeState::Hold, "small", "p1"),
        ]
        .into_iter()
        .collect();

        assert_eq!(store.iter_requests(), 0);
        let first = store.node_iter().next();
        assert_eq!(first.map(|node| node.state), Some(NodeState::Ready));
        assert_eq!(store.iter_requests(), 1);
        assert_eq!(store.records_pulled(), 1);

        assert_eq!(store.node_iter().count(), 2);
        assert_eq!(store.iter_requests(), 2);
        assert_eq!(store.records_pulled(), 3);
    }
}
