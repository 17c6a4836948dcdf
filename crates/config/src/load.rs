//! Config loading helpers (env + file).
//!
//! The loader is responsible for deterministic merge order and surfacing
//! user-facing errors as typed `ErrorEnvelope`s.

use crate::{StatsConfig, StatsEnv, ValidatedStatsConfig, apply_env_overrides};
use poolstats_shared::{ErrorClass, ErrorCode, ErrorEnvelope};
use std::path::Path;

/// On-disk config encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    /// JSON document.
    Json,
    /// TOML document.
    Toml,
}

/// Load the stats config from sources using a deterministic precedence order.
///
/// Precedence (highest wins):
/// - env overrides (`StatsEnv`)
/// - config text (file content in `format`)
/// - defaults (`StatsConfig::default()`)
pub fn load_stats_config_from_sources(
    config_text: Option<&str>,
    format: ConfigFormat,
    env: &StatsEnv,
) -> Result<ValidatedStatsConfig, ErrorEnvelope> {
    let config = match config_text {
        None => StatsConfig::default(),
        Some(input) => parse_config_unvalidated(input, format)?,
    };

    // env is applied last and also validates/normalizes the resulting config.
    apply_env_overrides(config, env)
}

/// Load the stats config from an optional file path.
pub fn load_stats_config_from_path(
    config_path: Option<&Path>,
    env: &StatsEnv,
) -> Result<ValidatedStatsConfig, ErrorEnvelope> {
    let config = match config_path {
        None => StatsConfig::default(),
        Some(path) => {
            let format = detect_config_format(path)?;
            let config_text = read_config_file(path)?;
            parse_config_unvalidated(&config_text, format)?
        },
    };

    apply_env_overrides(config, env)
}

/// Load the stats config from std env and an optional file path.
pub fn load_stats_config_std_env(
    config_path: Option<&Path>,
) -> Result<ValidatedStatsConfig, ErrorEnvelope> {
    let env = StatsEnv::from_std_env().map_err(ErrorEnvelope::from)?;
    load_stats_config_from_path(config_path, &env)
}

/// Serialize the config as deterministic pretty JSON (with trailing newline).
pub fn to_pretty_json(config: &StatsConfig) -> Result<String, ErrorEnvelope> {
    let mut output = serde_json::to_string_pretty(config).map_err(|error| {
        ErrorEnvelope::unexpected(
            ErrorCode::new("config", "serialize_json"),
            format!("failed to serialize config: {error}"),
            ErrorClass::NonRetriable,
        )
    })?;
    output.push('\n');
    Ok(output)
}

/// Serialize the config as deterministic pretty TOML (with trailing newline).
pub fn to_pretty_toml(config: &StatsConfig) -> Result<String, ErrorEnvelope> {
    let mut output = toml::to_string_pretty(config).map_err(|error| {
        ErrorEnvelope::unexpected(
            ErrorCode::new("config", "serialize_toml"),
            format!("failed to serialize config TOML: {error}"),
            ErrorClass::NonRetriable,
        )
    })?;
    output.push('\n');
    Ok(output)
}

fn parse_config_unvalidated(input: &str, format: ConfigFormat) -> Result<StatsConfig, ErrorEnvelope> {
    match format {
        ConfigFormat::Json => serde_json::from_str(input).map_err(|error| {
            ErrorEnvelope::expected(
                ErrorCode::new("config", "invalid_json"),
                format!("invalid config JSON: {error}"),
            )
            .with_metadata("source", "config")
        }),
        ConfigFormat::Toml => toml::from_str(input).map_err(|error| {
            ErrorEnvelope::expected(
                ErrorCode::new("config", "invalid_toml"),
                format!("invalid config TOML: {error}"),
            )
            .with_metadata("source", "config")
        }),
    }
}

fn read_config_file(path: &Path) -> Result<String, ErrorEnvelope> {
    std::fs::read_to_string(path).map_err(|error| read_error_envelope(path, &error))
}

fn read_error_envelope(path: &Path, error: &std::io::Error) -> ErrorEnvelope {
    use std::io::ErrorKind;

    let message = format!("failed to read config file: {error}");
    let envelope = match error.kind() {
        ErrorKind::NotFound => {
            ErrorEnvelope::expected(ErrorCode::new("config", "config_file_not_found"), message)
        },
        ErrorKind::PermissionDenied => ErrorEnvelope::expected(
            ErrorCode::new("config", "config_file_permission_denied"),
            message,
        ),
        kind => {
            let class = match kind {
                ErrorKind::Interrupted | ErrorKind::TimedOut | ErrorKind::WouldBlock => {
                    ErrorClass::Retriable
                },
                _ => ErrorClass::NonRetriable,
            };
            ErrorEnvelope::unexpected(ErrorCode::new("config", "config_file_io"), message, class)
        },
    };
    envelope.with_metadata("path", path.to_string_lossy().to_string())
}

/// Pick the config format from a file extension (`.json` when absent).
pub fn detect_config_format(path: &Path) -> Result<ConfigFormat, ErrorEnvelope> {
    let ext = path
        .extension()
        .and_then(|value| value.to_str())
        .map(str::to_ascii_lowercase);
    match ext.as_deref() {
        None | Some("json") => Ok(ConfigFormat::Json),
        Some("toml") => Ok(ConfigFormat::Toml),
        Some(other) => Err(ErrorEnvelope::expected(
            ErrorCode::new("config", "unsupported_format"),
            "unsupported config format; use .json or .toml",
        )
        .with_metadata("extension", other.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MetricsBackend;
    use std::error::Error;
    use std::path::PathBuf;

    #[test]
    fn defaults_apply_without_sources() -> Result<(), Box<dyn Error>> {
        let config = load_stats_config_from_sources(None, ConfigFormat::Json, &StatsEnv::default())?;
        assert_eq!(config.as_ref(), &StatsConfig::default());
        Ok(())
    }

    #[test]
    fn env_wins_over_file_content() -> Result<(), Box<dyn Error>> {
        let env = StatsEnv {
            metrics_backend: Some(MetricsBackend::Disabled),
            ..StatsEnv::default()
        };
        let config = load_stats_config_from_sources(
            Some(r#"{"metrics":{"backend":"json-lines","prefix":"zuul"}}"#),
            ConfigFormat::Json,
            &env,
        )?;
        assert_eq!(config.metrics.backend, MetricsBackend::Disabled);
        assert_eq!(config.metrics.prefix.as_deref(), Some("zuul"));
        Ok(())
    }

    #[test]
    fn format_follows_extension() -> Result<(), Box<dyn Error>> {
        assert_eq!(
            detect_config_format(&PathBuf::from("stats.TOML"))?,
            ConfigFormat::Toml
        );
        assert_eq!(
            detect_config_format(&PathBuf::from("stats"))?,
            ConfigFormat::Json
        );
        let error = detect_config_format(&PathBuf::from("stats.yaml")).err();
        assert_eq!(
            error.map(|error| error.code),
            Some(ErrorCode::new("config", "unsupported_format"))
        );
        Ok(())
    }

    #[test]
    fn missing_file_has_stable_code() {
        let path = PathBuf::from("/definitely/not/here/stats.json");
        let error = load_stats_config_from_path(Some(&path), &StatsEnv::default()).err();
        assert_eq!(
            error.map(|error| error.code),
            Some(ErrorCode::new("config", "config_file_not_found"))
        );
    }

    #[test]
    fn transient_read_errors_are_retriable() {
        let path = PathBuf::from("stats.json");
        let timed_out = read_error_envelope(&path, &std::io::Error::from(std::io::ErrorKind::TimedOut));
        assert_eq!(timed_out.code, ErrorCode::new("config", "config_file_io"));
        assert_eq!(timed_out.class, ErrorClass::Retriable);

        let invalid = read_error_envelope(&path, &std::io::Error::from(std::io::ErrorKind::InvalidData));
        assert_eq!(invalid.class, ErrorClass::NonRetriable);

        let missing = read_error_envelope(&path, &std::io::Error::from(std::io::ErrorKind::NotFound));
        assert_eq!(missing.class, ErrorClass::NonRetriable);
        assert_eq!(
            missing.metadata.get("path").map(String::as_str),
            Some("stats.json")
        );
    }

    #[test]
    fn pretty_json_ends_with_newline() -> Result<(), Box<dyn Error>> {
        let output = to_pretty_json(&StatsConfig::default())?;
        assert!(output.ends_with("}\n"));
        assert!(!output.contains("host"));
        Ok(())
    }
}
