//! Gateway trait and configuration.
//!
//! A [`Gateway`] carries generated source to a framework-specific
//! simulation service and brings back the raw response:
//!
//! ```text
//!   execute(source) ──→ POST {"code": source} ──→ raw JSON ──→ SimulationResults
//!      (async)              (bounded by timeout)                  (interpret)
//! ```
//!
//! The source text is sent unmodified. There is no automatic retry.

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use lumen_ir::Framework;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{GatewayError, GatewayResult};
use crate::result::SimulationResults;

/// Default request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Default service endpoint for `framework`.
pub fn default_endpoint(framework: Framework) -> &'static str {
    match framework {
        Framework::StrawberryFields => "http://localhost:8080",
        Framework::Perceval => "http://localhost:8081",
    }
}

/// Configuration for a gateway instance.
#[derive(Clone, Serialize, Deserialize)]
pub struct GatewayConfig {
    /// Name of the gateway.
    pub name: String,
    /// Framework whose code this gateway executes.
    pub framework: Framework,
    /// Service URL.
    pub endpoint: String,
    /// Request timeout.
    #[serde(with = "duration_secs")]
    pub timeout: Duration,
    /// Optional bearer token.
    #[serde(skip_serializing)]
    pub token: Option<String>,
    /// Additional configuration.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, Value>,
}

impl GatewayConfig {
    /// Configuration pointing at the default local service for `framework`.
    pub fn new(framework: Framework) -> Self {
        Self {
            name: framework.id().to_string(),
            framework,
            endpoint: default_endpoint(framework).to_string(),
            timeout: DEFAULT_TIMEOUT,
            token: None,
            extra: serde_json::Map::new(),
        }
    }

    /// Set the endpoint URL.
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Set the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the bearer token.
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Add extra configuration.
    pub fn with_extra(mut self, key: impl Into<String>, value: Value) -> Self {
        self.extra.insert(key.into(), value);
        self
    }
}

impl fmt::Debug for GatewayConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GatewayConfig")
            .field("name", &self.name)
            .field("framework", &self.framework)
            .field("endpoint", &self.endpoint)
            .field("timeout", &self.timeout)
            .field("token", &"[REDACTED]")
            .field("extra", &self.extra)
            .finish()
    }
}

mod duration_secs {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_u64(d.as_secs())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Duration, D::Error> {
        u64::deserialize(d).map(Duration::from_secs)
    }
}

/// Trait for simulation services.
///
/// # Contract
///
/// - `execute()` MUST send the source text unmodified.
/// - `execute()` MUST resolve to [`GatewayError::Timeout`] once the
///   configured timeout elapses.
/// - A payload with `"success": false` MUST surface as
///   [`GatewayError::SimulationFailed`]; [`check_payload`] implements this.
#[async_trait]
pub trait Gateway: Send + Sync {
    /// Get the name of this gateway.
    fn name(&self) -> &str;

    /// Framework whose code this gateway executes.
    fn framework(&self) -> Framework;

    /// Execute `source` and return the raw response payload.
    async fn execute(&self, source: &str) -> GatewayResult<Value>;

    /// Execute `source` and interpret the response.
    async fn simulate(&self, source: &str) -> GatewayResult<SimulationResults> {
        let raw = self.execute(source).await?;
        Ok(SimulationResults::interpret(&raw))
    }
}

/// Validate a decoded response payload.
///
/// Rejects anything that is not a JSON object, and turns an explicit
/// `"success": false` into [`GatewayError::SimulationFailed`].
pub fn check_payload(payload: Value) -> GatewayResult<Value> {
    let Value::Object(map) = &payload else {
        return Err(GatewayError::InvalidResponse(format!(
            "expected a JSON object, got {}",
            json_kind(&payload)
        )));
    };

    if map.get("success").and_then(Value::as_bool) == Some(false) {
        let message = map
            .get("error")
            .and_then(Value::as_str)
            .unwrap_or("Unknown server error")
            .to_string();
        let traceback = map
            .get("traceback")
            .and_then(Value::as_str)
            .map(str::to_string);
        return Err(GatewayError::SimulationFailed { message, traceback });
    }

    Ok(payload)
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
