//! Environment variable parsing and env-to-config merging.
//!
//! `STATSD_*` variables that are empty or whitespace-only count as unset.
//! Any other value must be usable, otherwise loading fails with a typed error.

use crate::schema::{MetricsBackend, StatsConfig, ValidatedStatsConfig};
use poolstats_shared::{ErrorCode, ErrorEnvelope};
use std::collections::BTreeMap;
use std::fmt;

/// Env var: `StatsD` host.
pub const ENV_STATSD_HOST: &str = "STATSD_HOST";
/// Env var: `StatsD` port.
pub const ENV_STATSD_PORT: &str = "STATSD_PORT";
/// Env var: namespace prepended to every metric key.
pub const ENV_STATSD_PREFIX: &str = "STATSD_PREFIX";
/// Env var: metrics backend selection.
pub const ENV_METRICS_BACKEND: &str = "POOLSTATS_METRICS_BACKEND";

const ENV_VARS: [&str; 4] = [
    ENV_STATSD_HOST,
    ENV_STATSD_PORT,
    ENV_STATSD_PREFIX,
    ENV_METRICS_BACKEND,
];

/// Typed env-derived overrides for `StatsConfig`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatsEnv {
    /// Override for `metrics.host`.
    pub statsd_host: Option<Box<str>>,
    /// Override for `metrics.port`.
    pub statsd_port: Option<u16>,
    /// Override for `metrics.prefix`.
    pub statsd_prefix: Option<Box<str>>,
    /// Override for `metrics.backend`.
    pub metrics_backend: Option<MetricsBackend>,
}

impl StatsEnv {
    /// Parse env overrides from a key/value map (useful for tests and fixtures).
    pub fn from_map(map: &BTreeMap<String, String>) -> Result<Self, EnvParseError> {
        Ok(Self {
            statsd_host: parse_optional_trimmed_string(map, ENV_STATSD_HOST)?,
            statsd_port: parse_optional_port(map, ENV_STATSD_PORT)?,
            statsd_prefix: parse_optional_trimmed_string(map, ENV_STATSD_PREFIX)?,
            metrics_backend: parse_optional_backend(map, ENV_METRICS_BACKEND)?,
        })
    }

    /// Parse env overrides from the process environment.
    pub fn from_std_env() -> Result<Self, EnvParseError> {
        let mut map = BTreeMap::new();
        for name in ENV_VARS {
            if let Ok(value) = std::env::var(name) {
                map.insert(name.to_owned(), value);
            }
        }
        Self::from_map(&map)
    }

    /// True when no override is set.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.statsd_host.is_none()
            && self.statsd_port.is_none()
            && self.statsd_prefix.is_none()
            && self.metrics_backend.is_none()
    }
}

/// Apply env overrides to a base config (env wins over file/default values).
pub fn apply_env_overrides(
    base: StatsConfig,
    env: &StatsEnv,
) -> Result<ValidatedStatsConfig, ErrorEnvelope> {
    let mut config = base;
    let metrics = &mut config.metrics;

    if let Some(backend) = env.metrics_backend {
        metrics.backend = backend;
    }
    if let Some(host) = env.statsd_host.as_ref() {
        metrics.host = Some(host.clone());
    }
    if let Some(port) = env.statsd_port {
        metrics.port = Some(port);
    }
    if let Some(prefix) = env.statsd_prefix.as_ref() {
        metrics.prefix = Some(prefix.clone());
    }

    config.validate_and_normalize().map_err(Into::into)
}

/// Validation failures when parsing env variables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EnvParseError {
    /// An env var was present but empty after trimming.
    EmptyValue {
        /// Env var name.
        var: &'static str,
    },
    /// Port env var was not an integer in `1..=65535`.
    InvalidPort {
        /// Env var name.
        var: &'static str,
        /// Raw input value.
        value: String,
    },
    /// Enum env var had an invalid value.
    InvalidEnum {
        /// Env var name.
        var: &'static str,
        /// Raw input value.
        value: String,
    },
}

impl EnvParseError {
    fn error_code(&self) -> ErrorCode {
        match self {
            Self::EmptyValue { .. } => ErrorCode::new("config", "empty_env_var"),
            Self::InvalidPort { .. } => ErrorCode::new("config", "invalid_env_port"),
            Self::InvalidEnum { .. } => ErrorCode::new("config", "invalid_env_enum"),
        }
    }
}

impl fmt::Display for EnvParseError {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyValue { var } => write!(formatter, "{var} must be non-empty"),
            Self::InvalidPort { var, .. } => {
                write!(formatter, "{var} must be a port number in [1, 65535]")
            },
            Self::InvalidEnum { var, .. } => write!(formatter, "{var} has an unsupported value"),
        }
    }
}

impl std::error::Error for EnvParseError {}

impl From<EnvParseError> for ErrorEnvelope {
    fn from(error: EnvParseError) -> Self {
        let code = error.error_code();
        let message = error.to_string();
        let envelope = Self::expected(code, message);

        match error {
            EnvParseError::EmptyValue { var } => envelope.with_metadata("env_var", var),
            EnvParseError::InvalidPort { var, value } | EnvParseError::InvalidEnum { var, value } => {
                envelope
                    .with_metadata("env_var", var)
                    .with_metadata("value", value)
            },
        }
    }
}

fn non_blank<'a>(map: &'a BTreeMap<String, String>, var: &str) -> Option<&'a str> {
    map.get(var)
        .map(|raw| raw.trim())
        .filter(|value| !value.is_empty())
}

fn parse_optional_trimmed_string(
    map: &BTreeMap<String, String>,
    var: &'static str,
) -> Result<Option<Box<str>>, EnvParseError> {
    Ok(non_blank(map, var).map(|value| value.to_owned().into_boxed_str()))
}

fn parse_optional_port(
    map: &BTreeMap<String, String>,
    var: &'static str,
) -> Result<Option<u16>, EnvParseError> {
    let Some(trimmed) = non_blank(map, var) else {
        return Ok(None);
    };

    match trimmed.parse::<u16>() {
        Ok(port) if port != 0 => Ok(Some(port)),
        _ => Err(EnvParseError::InvalidPort {
            var,
            value: trimmed.to_owned(),
        }),
    }
}

fn parse_optional_backend(
    map: &BTreeMap<String, String>,
    var: &'static str,
) -> Result<Option<MetricsBackend>, EnvParseError> {
    let Some(raw) = map.get(var) else {
        return Ok(None);
    };
    if raw.trim().is_empty() {
        return Err(EnvParseError::EmptyValue { var });
    }

    MetricsBackend::parse(raw)
        .map(Some)
        .ok_or_else(|| EnvParseError::InvalidEnum {
            var,
            value: raw.clone(),
        })
}
