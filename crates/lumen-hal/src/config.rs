//! Configuration management for Lumen.
//!
//! Supports loading configuration from:
//! 1. Configuration files (YAML)
//! 2. Environment variables (with `LUMEN_` prefix)
//!
//! Configuration precedence (highest to lowest):
//! 1. Environment variables
//! 2. Configuration file
//! 3. Default values

use std::fmt;
use std::path::Path;
use std::time::Duration;

use lumen_ir::{DEFAULT_SHOTS, Framework};
use serde::{Deserialize, Serialize};

use crate::gateway::{GatewayConfig, default_endpoint};

/// Complete configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Simulation service endpoints
    #[serde(default)]
    pub gateways: GatewaysConfig,
    /// Execution settings
    #[serde(default)]
    pub execution: ExecutionConfig,
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Endpoints of the per-framework simulation services.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewaysConfig {
    /// Strawberry Fields service
    #[serde(default = "default_strawberry_fields")]
    pub strawberry_fields: EndpointConfig,
    /// Perceval service
    #[serde(default = "default_perceval")]
    pub perceval: EndpointConfig,
}

/// A single simulation service.
#[derive(Clone, Serialize, Deserialize)]
pub struct EndpointConfig {
    /// Service URL (e.g., "http://localhost:8080")
    pub endpoint: String,
    /// Optional bearer token (set via `LUMEN_<FRAMEWORK>_TOKEN`)
    #[serde(default)]
    pub token: Option<String>,
}

impl fmt::Debug for EndpointConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EndpointConfig")
            .field("endpoint", &self.endpoint)
            .field("token", &"[REDACTED]")
            .finish()
    }
}

/// Execution settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecutionConfig {
    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,
    /// Shots the generated programs scale counts to
    #[serde(default = "default_shots")]
    pub shots: u32,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level: "trace", "debug", "info", "warn", "error"
    #[serde(default = "default_log_level")]
    pub level: String,
}

// Default value functions

fn default_strawberry_fields() -> EndpointConfig {
    EndpointConfig {
        endpoint: default_endpoint(Framework::StrawberryFields).to_string(),
        token: None,
    }
}

fn default_perceval() -> EndpointConfig {
    EndpointConfig {
        endpoint: default_endpoint(Framework::Perceval).to_string(),
        token: None,
    }
}

fn default_timeout() -> u64 {
    30
}

fn default_shots() -> u32 {
    DEFAULT_SHOTS
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for GatewaysConfig {
    fn default() -> Self {
        GatewaysConfig {
            strawberry_fields: default_strawberry_fields(),
            perceval: default_perceval(),
        }
    }
}

impl Default for ExecutionConfig {
    fn default() -> Self {
        ExecutionConfig {
            timeout_seconds: default_timeout(),
            shots: default_shots(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        LoggingConfig {
            level: default_log_level(),
        }
    }
}

impl Config {
    /// Load configuration from a YAML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::IoError(e.to_string()))?;
        Self::from_yaml(&contents)
    }

    /// Parse configuration from YAML text.
    pub fn from_yaml(contents: &str) -> Result<Self, ConfigError> {
        let config: Config = serde_yaml_ng::from_str(contents)
            .map_err(|e| ConfigError::ParseError(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration with the following precedence:
    /// 1. Load from file if provided
    /// 2. Apply environment variable overrides
    pub fn load(config_file: Option<&Path>) -> Result<Self, ConfigError> {
        let config = if let Some(path) = config_file {
            Self::from_file(path)?
        } else {
            Config::default()
        };

        let config = config.merge_vars(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    /// Merge variables from `lookup` into this configuration.
    ///
    /// Only variables that are set override the file-loaded (or default)
    /// values. Unparseable numbers are ignored.
    pub fn merge_vars(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        // Gateways
        if let Some(v) = lookup("LUMEN_STRAWBERRY_FIELDS_ENDPOINT") {
            self.gateways.strawberry_fields.endpoint = v;
        }
        if let Some(v) = lookup("LUMEN_STRAWBERRY_FIELDS_TOKEN") {
            self.gateways.strawberry_fields.token = Some(v);
        }
        if let Some(v) = lookup("LUMEN_PERCEVAL_ENDPOINT") {
            self.gateways.perceval.endpoint = v;
        }
        if let Some(v) = lookup("LUMEN_PERCEVAL_TOKEN") {
            self.gateways.perceval.token = Some(v);
        }

        // Execution
        if let Some(val) = lookup("LUMEN_TIMEOUT_SECS").and_then(|v| v.parse().ok()) {
            self.execution.timeout_seconds = val;
        }
        if let Some(val) = lookup("LUMEN_SHOTS").and_then(|v| v.parse().ok()) {
            self.execution.shots = val;
        }

        // Logging
        if let Some(v) = lookup("LUMEN_LOG_LEVEL") {
            self.logging.level = v;
        }

        self
    }

    /// Validate configuration values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        // Validate endpoints
        for (framework, endpoint) in [
            (Framework::StrawberryFields, &self.gateways.strawberry_fields),
            (Framework::Perceval, &self.gateways.perceval),
        ] {
            let url = endpoint.endpoint.as_str();
            if !(url.starts_with("http://") || url.starts_with("https://")) {
                return Err(ConfigError::ValidationError(format!(
                    "Invalid {framework} endpoint: {url}"
                )));
            }
            if let Some(ref token) = endpoint.token {
                if token.is_empty() {
                    return Err(ConfigError::ValidationError(format!(
                        "{framework} token must not be empty; omit the field to disable authentication"
                    )));
                }
            }
        }

        // Validate execution settings
        if self.execution.timeout_seconds == 0 {
            return Err(ConfigError::ValidationError(
                "timeout_seconds must be greater than 0".to_string(),
            ));
        }
        if self.execution.shots == 0 {
            return Err(ConfigError::ValidationError(
                "shots must be greater than 0".to_string(),
            ));
        }

        // Validate log level
        match self.logging.level.as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            other => {
                return Err(ConfigError::ValidationError(format!(
                    "Invalid log level: {other}"
                )));
            }
        }

        Ok(())
    }

    /// Request timeout.
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.execution.timeout_seconds)
    }

    /// Gateway configuration for `framework`.
    pub fn gateway_config(&self, framework: Framework) -> GatewayConfig {
        let endpoint = match framework {
            Framework::StrawberryFields => &self.gateways.strawberry_fields,
            Framework::Perceval => &self.gateways.perceval,
        };
        let config = GatewayConfig::new(framework)
            .with_endpoint(endpoint.endpoint.clone())
            .with_timeout(self.timeout());
        match &endpoint.token {
            Some(token) => config.with_token(token.clone()),
            None => config,
        }
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    IoError(String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Validation error: {0}")]
    ValidationError(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn vars(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.gateways.strawberry_fields.endpoint, "http://localhost:8080");
        assert_eq!(config.gateways.perceval.endpoint, "http://localhost:8081");
        assert_eq!(config.execution.timeout_seconds, 30);
        assert_eq!(config.execution.shots, 1000);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_validate_valid_config() {
        let config = Config::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_invalid_endpoint() {
        let mut config = Config::default();
        config.gateways.perceval.endpoint = "localhost:8081".to_string();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("Perceval"));
    }

    #[test]
    fn test_validate_invalid_log_level() {
        let mut config = Config::default();
        config.logging.level = "verbose".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_zero_timeout() {
        let mut config = Config::default();
        config.execution.timeout_seconds = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_from_yaml_partial() {
        let config = Config::from_yaml(
            "gateways:\n  perceval:\n    endpoint: http://sim.internal:9000\nexecution:\n  shots: 250\n",
        )
        .unwrap();
        assert_eq!(config.gateways.perceval.endpoint, "http://sim.internal:9000");
        assert_eq!(config.gateways.strawberry_fields.endpoint, "http://localhost:8080");
        assert_eq!(config.execution.shots, 250);
        assert_eq!(config.execution.timeout_seconds, 30);
    }

    #[test]
    fn test_from_yaml_rejects_garbage() {
        assert!(matches!(
            Config::from_yaml("gateways: [1, 2"),
            Err(ConfigError::ParseError(_))
        ));
    }

    #[test]
    fn test_merge_vars_overrides() {
        let config = Config::default().merge_vars(vars(&[
            ("LUMEN_STRAWBERRY_FIELDS_ENDPOINT", "https://sf.example.org"),
            ("LUMEN_TIMEOUT_SECS", "5"),
            ("LUMEN_SHOTS", "not-a-number"),
            ("LUMEN_LOG_LEVEL", "debug"),
        ]));
        assert_eq!(config.gateways.strawberry_fields.endpoint, "https://sf.example.org");
        assert_eq!(config.timeout(), Duration::from_secs(5));
        assert_eq!(config.execution.shots, 1000);
        assert_eq!(config.logging.level, "debug");
    }

    #[test]
    fn test_gateway_config() {
        let config = Config::default().merge_vars(vars(&[("LUMEN_PERCEVAL_TOKEN", "t0k3n")]));
        let gw = config.gateway_config(Framework::Perceval);
        assert_eq!(gw.endpoint, "http://localhost:8081");
        assert_eq!(gw.timeout, Duration::from_secs(30));
        assert_eq!(gw.token.as_deref(), Some("t0k3n"));
        assert!(!format!("{:?}", config.gateways.perceval).contains("t0k3n"));
    }
}
