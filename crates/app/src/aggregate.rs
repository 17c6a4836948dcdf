//! Full-scan aggregation of node records into per-state gauge values.

use poolstats_domain::{
    MetricKey, NodeRecord, NodeState, ProviderConfig, label_state_key, node_state_key,
    provider_max_servers_key, provider_state_key,
};
use std::collections::BTreeMap;
use std::collections::btree_map::Entry;

/// Result of one aggregation pass.
///
/// Holds a count for every seeded key (every state, globally and for the
/// configured provider) plus every label/provider key discovered during the
/// scan, and the provider's configured capacity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeStateSnapshot {
    counts: BTreeMap<MetricKey, u64>,
    max_servers_key: MetricKey,
    max_servers: u64,
    node_count: u64,
}

impl NodeStateSnapshot {
    /// Count for `key`, if the key was seeded or discovered.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<u64> {
        self.counts.get(key).copied()
    }

    /// Accumulated counts in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&MetricKey, u64)> + '_ {
        self.counts.iter().map(|(key, count)| (key, *count))
    }

    /// Number of accumulated keys (excluding the capacity gauge).
    #[must_use]
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    /// True when no key was accumulated.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Number of node records scanned.
    #[must_use]
    pub const fn node_count(&self) -> u64 {
        self.node_count
    }

    /// `pool.provider.<provider>.max_servers` key and its value.
    #[must_use]
    pub const fn max_servers(&self) -> (&MetricKey, u64) {
        (&self.max_servers_key, self.max_servers)
    }

    /// Every gauge to emit: accumulated counts in key order, then capacity.
    pub fn gauges(&self) -> impl Iterator<Item = (&MetricKey, u64)> + '_ {
        self.iter()
            .chain(std::iter::once((&self.max_servers_key, self.max_servers)))
    }
}

/// Aggregate node records for `provider`.
///
/// Seeds zero for every state under `pool.nodes.<state>` and
/// `pool.provider.<provider>.nodes.<state>`, then consumes `nodes` once.
/// Label keys and keys for providers other than `provider` are created on
/// first sight.
pub fn aggregate_node_states<I>(nodes: I, provider: &ProviderConfig) -> NodeStateSnapshot
where
    I: IntoIterator<Item = NodeRecord>,
{
    let mut counts = BTreeMap::new();
    for state in NodeState::ALL {
        counts.insert(node_state_key(state), 0);
        counts.insert(provider_state_key(&provider.name, state), 0);
    }

    let mut node_count = 0_u64;
    for node in nodes {
        node_count += 1;
        bump(&mut counts, node_state_key(node.state));
        bump(&mut counts, label_state_key(&node.label, node.state));
        bump(&mut counts, provider_state_key(&node.provider, node.state));
    }

    NodeStateSnapshot {
        counts,
        max_servers_key: provider_max_servers_key(&provider.name),
        max_servers: provider.total_max_servers(),
        node_count,
    }
}

fn bump(counts: &mut BTreeMap<MetricKey, u64>, key: MetricKey) {
    match counts.entry(key) {
        Entry::Occupied(mut entry) => *entry.get_mut() += 1,
        Entry::Vacant(entry) => {
            tracing::debug!(key = %entry.key(), "metric key not in provider config; created on scan");
            entry.insert(1);
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use poolstats_domain::PoolConfig;

    fn provider() -> ProviderConfig {
        ProviderConfig::new("p1")
            .with_pool("pool1", PoolConfig::with_max_servers(5))
            .with_pool("pool2", PoolConfig::default())
    }

    #[test]
    fn empty_scan_reports_every_seeded_state() {
        let snapshot = aggregate_node_states(Vec::<NodeRecord>::new(), &provider());

        assert_eq!(snapshot.len(), NodeState::ALL.len() * 2);
        assert_eq!(snapshot.node_count(), 0);
        for state in NodeState::ALL {
            assert_eq!(snapshot.get(node_state_key(state).as_str()), Some(0));
            assert_eq!(
                snapshot.get(provider_state_key("p1", state).as_str()),
                Some(0)
            );
        }
        assert!(snapshot.iter().all(|(key, _)| !key.as_str().contains(".label.")));
    }

    #[test]
    fn two_nodes_on_configured_provider() {
        let nodes = vec![
            NodeRecord::new(NodeState::Ready, "a", "p1"),
            NodeRecord::new(NodeState::Building, "a", "p1"),
        ];
        let snapshot = aggregate_node_states(nodes, &provider());

        assert_eq!(snapshot.get("pool.nodes.ready"), Some(1));
        assert_eq!(snapshot.get("pool.nodes.building"), Some(1));
        assert_eq!(snapshot.get("pool.nodes.deleting"), Some(0));
        assert_eq!(snapshot.get("pool.provider.p1.nodes.ready"), Some(1));
        assert_eq!(snapshot.get("pool.label.a.nodes.ready"), Some(1));
        assert_eq!(snapshot.get("pool.label.a.nodes.building"), Some(1));
        assert_eq!(snapshot.get("pool.label.a.nodes.deleting"), None);

        let (key, value) = snapshot.max_servers();
        assert_eq!(key.as_str(), "pool.provider.p1.max_servers");
        assert_eq!(value, 5);
    }

    #[test]
    fn foreign_provider_keys_are_created_lazily() {
        let nodes = vec![
            NodeRecord::new(NodeState::Hold, "gpu", "p2"),
            NodeRecord::new(NodeState::Hold, "gpu", "p2"),
        ];
        let snapshot = aggregate_node_states(nodes, &provider());

        assert_eq!(snapshot.get("pool.provider.p2.nodes.hold"), Some(2));
        assert_eq!(snapshot.get("pool.provider.p2.nodes.ready"), None);
        assert_eq!(snapshot.get("pool.provider.p1.nodes.hold"), Some(0));
        assert_eq!(snapshot.get("pool.nodes.hold"), Some(2));
    }

    #[test]
    fn capacity_gauge_is_emitted_last() {
        let snapshot = aggregate_node_states(Vec::<NodeRecord>::new(), &provider());
        let last = snapshot.gauges().last().map(|(key, value)| (key.as_str(), value));
        assert_eq!(last, Some(("pool.provider.p1.max_servers", 5)));
        assert_eq!(snapshot.gauges().count(), snapshot.len() + 1);
    }
}
