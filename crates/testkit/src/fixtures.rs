//! Canned pools, providers, and launch events shared by crate tests.

use poolstats_domain::{LaunchEvent, NodeRecord, NodeState, PoolConfig, ProviderConfig};

/// Provider `p1` with `pool1` capped at 5 servers and `pool2` unlimited.
pub fn provider_p1() -> ProviderConfig {
    ProviderConfig::new("p1")
        .with_pool("pool1", PoolConfig::with_max_servers(5))
        .with_pool("pool2", PoolConfig::default())
}

/// One ready and one building node of label `a` on provider `p1`.
pub fn two_node_pool() -> Vec<NodeRecord> {
    vec![
        NodeRecord::new(NodeState::Ready, "a", "p1"),
        NodeRecord::new(NodeState::Building, "a", "p1"),
    ]
}

/// A pool mixing labels and a provider that is not `p1`.
pub fn mixed_pool() -> Vec<NodeRecord> {
    vec![
        NodeRecord::new(NodeState::Ready, "small", "p1"),
        NodeRecord::new(NodeState::Ready, "small", "p1"),
        NodeRecord::new(NodeState::InUse, "large", "p1"),
        NodeRecord::new(NodeState::Deleting, "small", "p2"),
        NodeRecord::new(NodeState::Failed, "gpu", "p2"),
    ]
}

/// Launch carrying every optional field, with a requestor that needs sanitizing.
pub fn full_launch_event() -> LaunchEvent {
    LaunchEvent::new("success", 1200, "img1", "p1")
        .with_availability_zone("az1")
        .with_requestor("user:a.b")
}
