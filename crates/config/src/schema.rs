//! Stats configuration schema, defaults, validation, and normalization.
//!
//! - Deserialization uses `serde` (JSON or TOML).
//! - Validation is manual and returns typed errors mapped to `ErrorEnvelope`.
//! - Normalization trims string fields and drops empty ones.

use poolstats_shared::{ErrorCode, ErrorEnvelope};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Current supported configuration schema version.
pub const CURRENT_CONFIG_VERSION: u32 = 1;

/// Host used by the `StatsD` backend when only a port is configured.
pub const DEFAULT_STATSD_HOST: &str = "localhost";

/// Port used by the `StatsD` backend when only a host is configured.
pub const DEFAULT_STATSD_PORT: u16 = 8125;

/// Metrics backend selection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MetricsBackend {
    /// `StatsD` over UDP; enabled only when a host or port is configured.
    #[default]
    Statsd,
    /// One JSON object per metric, written to stderr.
    JsonLines,
    /// Reporting disabled regardless of other settings.
    Disabled,
}

impl MetricsBackend {
    /// Stable wire name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Statsd => "statsd",
            Self::JsonLines => "json-lines",
            Self::Disabled => "disabled",
        }
    }

    /// Parse a wire name (case-insensitive).
    #[must_use]
    pub fn parse(input: &str) -> Option<Self> {
        match input.trim().to_ascii_lowercase().as_str() {
            "statsd" => Some(Self::Statsd),
            "json-lines" | "json_lines" | "jsonl" => Some(Self::JsonLines),
            "disabled" | "none" | "off" => Some(Self::Disabled),
            _ => None,
        }
    }
}

impl fmt::Display for MetricsBackend {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

/// Top-level stats configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields, default)]
pub struct StatsConfig {
    /// Schema version.
    pub version: u32,
    /// Metrics backend settings.
    pub metrics: MetricsConfig,
}

impl Default for StatsConfig {
    fn default() -> Self {
        Self {
            version: CURRENT_CONFIG_VERSION,
            metrics: MetricsConfig::default(),
        }
    }
}

impl StatsConfig {
    /// Validate and normalize the config, returning a validated wrapper.
    pub fn validate_and_normalize(mut self) -> Result<ValidatedStatsConfig, ConfigSchemaError> {
        self.validate_version()?;
        self.metrics.normalize();
        self.metrics.validate()?;
        Ok(ValidatedStatsConfig { raw: self })
    }

    const fn validate_version(&self) -> Result<(), ConfigSchemaError> {
        if self.version != CURRENT_CONFIG_VERSION {
            return Err(ConfigSchemaError::UnsupportedVersion {
                found: self.version,
                supported: CURRENT_CONFIG_VERSION,
            });
        }
        Ok(())
    }
}

/// Metrics backend configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields, default)]
pub struct MetricsConfig {
    /// Backend selection.
    pub backend: MetricsBackend,
    /// `StatsD` host.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub host: Option<Box<str>>,
    /// `StatsD` port.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,
    /// Namespace prepended to every emitted key.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prefix: Option<Box<str>>,
}

impl MetricsConfig {
    /// `StatsD` config pointing at `host:port`.
    pub fn statsd(host: impl Into<Box<str>>, port: u16) -> Self {
        Self {
            backend: MetricsBackend::Statsd,
            host: Some(host.into()),
            port: Some(port),
            prefix: None,
        }
    }

    /// Config selecting the given backend with no connection settings.
    #[must_use]
    pub const fn with_backend(backend: MetricsBackend) -> Self {
        Self {
            backend,
            host: None,
            port: None,
            prefix: None,
        }
    }

    /// Set the key prefix.
    #[must_use]
    pub fn with_prefix(mut self, prefix: impl Into<Box<str>>) -> Self {
        self.prefix = Some(prefix.into());
        self
    }

    /// True when the `StatsD` backend has a host or port to talk to.
    #[must_use]
    pub const fn statsd_configured(&self) -> bool {
        self.host.is_some() || self.port.is_some()
    }

    /// Host after applying the backend default.
    #[must_use]
    pub fn effective_host(&self) -> &str {
        self.host.as_deref().unwrap_or(DEFAULT_STATSD_HOST)
    }

    /// Port after applying the backend default.
    #[must_use]
    pub fn effective_port(&self) -> u16 {
        self.port.unwrap_or(DEFAULT_STATSD_PORT)
    }

    fn normalize(&mut self) {
        self.host = normalize_optional(self.host.take());
        self.prefix = normalize_optional(self.prefix.take());
    }

    fn validate(&self) -> Result<(), ConfigSchemaError> {
        if self.port == Some(0) {
            return Err(ConfigSchemaError::InvalidPort { port: 0 });
        }

        if let Some(host) = self
            .host
            .as_deref()
            .filter(|host| host.chars().any(char::is_whitespace))
        {
            return Err(ConfigSchemaError::InvalidValue {
                field: "host",
                value: host.to_owned(),
                reason: "must not contain whitespace",
            });
        }

        if let Some(prefix) = self.prefix.as_deref() {
            if prefix.chars().any(char::is_whitespace) {
                return Err(ConfigSchemaError::InvalidValue {
                    field: "prefix",
                    value: prefix.to_owned(),
                    reason: "must not contain whitespace",
                });
            }
            if prefix.starts_with('.') || prefix.ends_with('.') {
                return Err(ConfigSchemaError::InvalidValue {
                    field: "prefix",
                    value: prefix.to_owned(),
                    reason: "must not start or end with '.'",
                });
            }
        }

        Ok(())
    }
}

fn normalize_optional(value: Option<Box<str>>) -> Option<Box<str>> {
    let value = value?;
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else if trimmed.len() == value.len() {
        Some(value)
    } else {
        Some(trimmed.into())
    }
}

/// Validated config wrapper.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedStatsConfig {
    raw: StatsConfig,
}

impl ValidatedStatsConfig {
    /// Borrow the raw config.
    #[must_use]
    pub const fn as_ref(&self) -> &StatsConfig {
        &self.raw
    }

    /// Consume the wrapper and return the raw config.
    #[must_use]
    pub fn into_inner(self) -> StatsConfig {
        self.raw
    }
}

impl AsRef<StatsConfig> for ValidatedStatsConfig {
    fn as_ref(&self) -> &StatsConfig {
        &self.raw
    }
}

impl std::ops::Deref for ValidatedStatsConfig {
    type Target = StatsConfig;

    fn deref(&self) -> &Self::Target {
        &self.raw
    }
}

/// Parse a stats config from a JSON string, applying validation and normalization.
pub fn parse_stats_config_json(input: &str) -> Result<ValidatedStatsConfig, ErrorEnvelope> {
    let config: StatsConfig = serde_json::from_str(input).map_err(|error| {
        ErrorEnvelope::expected(
            ErrorCode::new("config", "invalid_json"),
            format!("invalid config JSON: {error}"),
        )
    })?;

    config.validate_and_normalize().map_err(Into::into)
}

/// Parse a stats config from a TOML string, applying validation and normalization.
pub fn parse_stats_config_toml(input: &str) -> Result<ValidatedStatsConfig, ErrorEnvelope> {
    let config: StatsConfig = toml::from_str(input).map_err(|error| {
        ErrorEnvelope::expected(
            ErrorCode::new("config", "invalid_toml"),
            format!("invalid config TOML: {error}"),
        )
    })?;

    config.validate_and_normalize().map_err(Into::into)
}

/// Schema validation failures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSchemaError {
    /// The config version is not supported by this binary.
    UnsupportedVersion {
        /// Version found in the config.
        found: u32,
        /// Version supported by this crate.
        supported: u32,
    },
    /// The configured port cannot be used.
    InvalidPort {
        /// Port provided.
        port: u16,
    },
    /// A string field has an unusable value.
    InvalidValue {
        /// Field name under `metrics` (e.g. `prefix`).
        field: &'static str,
        /// Value provided.
        value: String,
        /// Human readable reason.
        reason: &'static str,
    },
}

impl ConfigSchemaError {
    fn error_code(&self) -> ErrorCode {
        match self {
            Self::UnsupportedVersion { .. } => ErrorCode::new("config", "unsupported_version"),
            Self::InvalidPort { .. } => ErrorCode::new("config", "invalid_port"),
            Self::InvalidValue { .. } => ErrorCode::new("config", "invalid_value"),
        }
    }
}

impl fmt::Display for ConfigSchemaError {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnsupportedVersion { found, supported } => {
                write!(
                    formatter,
                    "unsupported config version: {found} (supported: {supported})"
                )
            },
            Self::InvalidPort { port } => {
                write!(formatter, "metrics.port must be within [1, 65535] (got {port})")
            },
            Self::InvalidValue { field, reason, .. } => {
                write!(formatter, "metrics.{field} {reason}")
            },
        }
    }
}

impl std::error::Error for ConfigSchemaError {}

impl From<ConfigSchemaError> for ErrorEnvelope {
    fn from(error: ConfigSchemaError) -> Self {
        let code = error.error_code();
        let message = error.to_string();
        let envelope = Self::expected(code, message);

        match error {
            ConfigSchemaError::UnsupportedVersion { found, supported } => envelope
                .with_metadata("found", found.to_string())
                .with_metadata("supported", supported.to_string()),
            ConfigSchemaError::InvalidPort { port } => envelope
                .with_metadata("section", "metrics")
                .with_metadata("field", "port")
                .with_metadata("value", port.to_string()),
            ConfigSchemaError::InvalidValue { field, value, .. } => envelope
                .with_metadata("section", "metrics")
                .with_metadata("field", field)
                .with_metadata("value", value),
        }
    }
}
