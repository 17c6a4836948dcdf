//! # poolstats-config
//!
//! Configuration schema, validation, and loading for the metrics backend.
//! This crate depends on `shared` only.

/// Environment variable parsing and merging.
pub mod env;
/// Config loading helpers (env + file).
pub mod load;
/// Configuration schema types and helpers.
pub mod schema;

pub use schema::{
    CURRENT_CONFIG_VERSION, ConfigSchemaError, DEFAULT_STATSD_HOST, DEFAULT_STATSD_PORT,
    MetricsBackend, MetricsConfig, StatsConfig, ValidatedStatsConfig, parse_stats_config_json,
    parse_stats_config_toml,
};

pub use env::{
    ENV_METRICS_BACKEND, ENV_STATSD_HOST, ENV_STATSD_PORT, ENV_STATSD_PREFIX, EnvParseError,
    StatsEnv, apply_env_overrides,
};
pub use load::{
    ConfigFormat, detect_config_format, load_stats_config_from_path,
    load_stats_config_from_sources, load_stats_config_std_env, to_pretty_json, to_pretty_toml,
};

/// Returns the config crate version.
#[must_use]
pub const fn config_crate_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::*;
    use poolstats_shared::shared_crate_version;

    #[test]
    fn config_crate_compiles() {
        let version = config_crate_version();
        assert!(!version.is_empty());
    }

    #[test]
    fn config_can_use_shared() {
        assert!(!shared_crate_version().is_empty());
    }
}
