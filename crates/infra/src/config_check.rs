//! Config loading helpers for embedding hosts.

use crate::InfraResult;
use crate::sink_factory::build_stats_reporter;
use poolstats_app::StatsReporter;
use poolstats_config::{StatsEnv, load_stats_config_from_path, load_stats_config_std_env, to_pretty_json};
use poolstats_shared::ErrorEnvelope;
use std::collections::BTreeMap;
use std::path::Path;

/// Load and validate the effective config, returning deterministic pretty JSON.
pub fn load_effective_config_json(
    env: &BTreeMap<String, String>,
    config_path: Option<&Path>,
) -> InfraResult<String> {
    let env = StatsEnv::from_map(env).map_err(ErrorEnvelope::from)?;
    let config = load_stats_config_from_path(config_path, &env)?;
    to_pretty_json(&config)
}

/// Build a reporter from an env map and an optional config file.
pub fn reporter_from_env_map(
    env: &BTreeMap<String, String>,
    config_path: Option<&Path>,
) -> InfraResult<StatsReporter> {
    let env = StatsEnv::from_map(env).map_err(ErrorEnvelope::from)?;
    let config = load_stats_config_from_path(config_path, &env)?;
    Ok(build_stats_reporter(&config.metrics))
}

/// Build a reporter from the process environment and an optional config file.
pub fn reporter_from_std_env(config_path: Option<&Path>) -> InfraResult<StatsReporter> {
    let config = load_stats_config_std_env(config_path)?;
    Ok(build_stats_reporter(&config.metrics))
}
