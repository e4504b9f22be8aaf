//! Error types for the HAL crate.

use std::time::Duration;

use thiserror::Error;

/// Errors that can occur while executing generated source.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum GatewayError {
    /// The simulation service could not be reached.
    #[error("Network error: {0}")]
    Network(String),

    /// The service answered with a non-success HTTP status and no
    /// structured error payload.
    #[error("Server returned HTTP {status}: {message}")]
    Http { status: u16, message: String },

    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The response body is not a JSON object.
    #[error("Invalid response from server: {0}")]
    InvalidResponse(String),

    /// The service ran the code and reported a failure.
    #[error("Simulation failed: {message}")]
    SimulationFailed {
        message: String,
        traceback: Option<String>,
    },

    /// No response within the configured timeout.
    #[error("Simulation timed out after {}s", .0.as_secs_f64())]
    Timeout(Duration),

    /// The run was cancelled before it completed.
    #[error("Simulation cancelled")]
    Cancelled,

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// The run task ended abnormally.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl GatewayError {
    /// Server-side traceback, if the service sent one.
    pub fn traceback(&self) -> Option<&str> {
        match self {
            GatewayError::SimulationFailed { traceback, .. } => traceback.as_deref(),
            _ => None,
        }
    }
}

/// Result type for gateway operations.
pub type GatewayResult<T> = Result<T, GatewayError>;
