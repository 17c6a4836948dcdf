//! # poolstats-domain
//!
//! Domain entities and metric naming for node pool statistics.
//!
//! - **States** - `NodeState`, the closed set of node lifecycle states
//! - **Nodes** - `NodeRecord`, `ProviderConfig`, `PoolConfig`
//! - **Metric keys** - `MetricKey`, `MetricKeySet`, `LaunchEvent` and key builders
//!
//! ## Dependency Rules
//!
//! - Depends only on `shared` crate
//! - Pure domain logic with no I/O

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

pub use poolstats_shared::shared_crate_version;

pub mod metric_key;
pub mod node;
pub mod states;

pub use metric_key::{
    LaunchEvent, METRIC_ROOT, MetricKey, MetricKeySet, label_state_key, node_state_key,
    provider_max_servers_key, provider_state_key, sanitize_segment,
};
pub use node::{NodeRecord, PoolConfig, ProviderConfig};
pub use states::{NodeState, UnknownNodeState};

/// Returns the domain crate version.
#[must_use]
pub const fn domain_crate_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
