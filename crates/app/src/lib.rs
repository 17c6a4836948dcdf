//! # poolstats-app
//!
//! Reporting use cases: launch statistics and node pool gauges.
//! This crate depends on `ports` and `domain`.

pub mod aggregate;
pub mod reporter;

pub use aggregate::{NodeStateSnapshot, aggregate_node_states};
pub use reporter::StatsReporter;

/// Returns the app crate version.
#[must_use]
pub const fn app_crate_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
