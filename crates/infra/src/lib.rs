//! # poolstats-infra
//!
//! Composition root: turns configuration into metric sinks and reporters.
//! This crate depends on `app`, `adapters`, `config`, `ports`, and `shared`.

/// Config loading helpers used by embedding hosts.
pub mod config_check;
/// Environment validation helpers.
pub mod env_check;
/// Metric sink selection.
pub mod sink_factory;

pub use config_check::{load_effective_config_json, reporter_from_env_map, reporter_from_std_env};
pub use env_check::{InfraError, InfraResult, validate_env_parsing};
pub use sink_factory::{build_metric_sink, build_stats_reporter};

/// Returns the infra crate version.
#[must_use]
pub const fn infra_crate_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
