//! Node records and provider capacity configuration.

use crate::NodeState;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Snapshot of a single node as held by the state store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeRecord {
    /// Current lifecycle state.
    pub state: NodeState,
    /// Node type (label) requested for this node.
    #[serde(rename = "type")]
    pub label: Box<str>,
    /// Name of the provider that owns the node.
    pub provider: Box<str>,
}

impl NodeRecord {
    /// Build a node record.
    pub fn new(state: NodeState, label: impl Into<Box<str>>, provider: impl Into<Box<str>>) -> Self {
        Self {
            state,
            label: label.into(),
            provider: provider.into(),
        }
    }
}

/// Per-pool capacity settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PoolConfig {
    /// Maximum number of servers; `None` means no limit configured.
    pub max_servers: Option<u32>,
}

impl PoolConfig {
    /// Pool with a configured server limit.
    #[must_use]
    pub const fn with_max_servers(max_servers: u32) -> Self {
        Self {
            max_servers: Some(max_servers),
        }
    }
}

/// Static configuration for one provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderConfig {
    /// Provider name.
    pub name: Box<str>,
    /// Pools keyed by pool name.
    #[serde(default)]
    pub pools: BTreeMap<Box<str>, PoolConfig>,
}

impl ProviderConfig {
    /// Build a provider with no pools.
    pub fn new(name: impl Into<Box<str>>) -> Self {
        Self {
            name: name.into(),
            pools: BTreeMap::new(),
        }
    }

    /// Add (or replace) a pool.
    #[must_use]
    pub fn with_pool(mut self, name: impl Into<Box<str>>, pool: PoolConfig) -> Self {
        self.pools.insert(name.into(), pool);
        self
    }

    /// Total configured capacity across all pools.
    ///
    /// Pools without a limit contribute zero.
    #[must_use]
    pub fn total_max_servers(&self) -> u64 {
        self.pools
            .values()
            .filter_map(|pool| pool.max_servers)
            .map(u64::from)
            .sum()
    }
}
