//! Contract-style tests for port traits using in-memory implementations.

use poolstats_ports::{MetricSink, NodeState, NodeStatePort};
use poolstats_testkit::fixtures::{mixed_pool, two_node_pool};
use poolstats_testkit::{InMemoryNodeStore, MetricCall, NoopMetricSink, RecordingMetricSink};
use std::sync::Arc;
use std::thread;

#[test]
fn node_store_iterators_are_independent_passes() {
    let store = InMemoryNodeStore::new(two_node_pool());

    let states: Vec<NodeState> = store.node_iter().map(|node| node.state).collect();
    assert_eq!(states, vec![NodeState::Ready, NodeState::Building]);
    assert_eq!(store.node_iter().count(), store.len());
    assert_eq!(store.iter_requests(), 2);
}

#[test]
fn node_store_is_usable_as_trait_object() {
    let store = InMemoryNodeStore::new(mixed_pool());
    let port: &dyn NodeStatePort = &store;

    let on_p2 = port
        .node_iter()
        .filter(|node| &*node.provider == "p2")
        .count();
    assert_eq!(on_p2, 2);
}

#[test]
fn metric_sinks_are_shareable_across_threads() {
    let recorder = RecordingMetricSink::shared();
    let recording: Arc<dyn MetricSink> = recorder.clone();
    let noop: Arc<dyn MetricSink> = Arc::new(NoopMetricSink);
    let sinks = vec![recording, noop];

    let handles: Vec<_> = sinks
        .into_iter()
        .map(|sink| thread::spawn(move || sink.increment("pool.launch.ready")))
        .collect();
    for handle in handles {
        handle.join().expect("sink thread panicked");
    }

    assert_eq!(
        recorder.calls(),
        vec![MetricCall::Increment {
            key: "pool.launch.ready".into()
        }]
    );
}
