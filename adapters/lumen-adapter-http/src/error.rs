//! Error types for the HTTP gateway.

use std::time::Duration;

use lumen_hal::GatewayError;
use thiserror::Error;

/// Result type for HTTP gateway operations.
pub type HttpGatewayResult<T> = Result<T, HttpGatewayError>;

/// Errors that can occur when talking to a simulation service over HTTP.
#[derive(Debug, Error)]
pub enum HttpGatewayError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// No response within the configured timeout.
    #[error("Request timed out after {}s", .0.as_secs_f64())]
    Timeout(Duration),

    /// Endpoint URL is unusable.
    #[error("Invalid endpoint: {0}")]
    InvalidEndpoint(String),

    /// Service returned a non-success status without a structured error.
    #[error("API error ({status}): {message}")]
    ApiError { status: u16, message: String },

    /// Response body is not valid JSON.
    #[error("Invalid JSON response from server: {0}")]
    InvalidJson(String),
}

impl From<HttpGatewayError> for GatewayError {
    fn from(e: HttpGatewayError) -> Self {
        match e {
            HttpGatewayError::Timeout(after) => GatewayError::Timeout(after),
            HttpGatewayError::InvalidEndpoint(msg) => GatewayError::Configuration(msg),
            HttpGatewayError::ApiError { status, message } => {
                GatewayError::Http { status, message }
            }
            HttpGatewayError::InvalidJson(msg) => GatewayError::InvalidResponse(msg),
            HttpGatewayError::Http(_) => GatewayError::Network(e.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_display() {
        let err = HttpGatewayError::ApiError {
            status: 503,
            message: "service unavailable".into(),
        };
        assert!(err.to_string().contains("503"));
        assert!(err.to_string().contains("service unavailable"));
    }

    #[test]
    fn test_timeout_to_gateway() {
        let err: GatewayError = HttpGatewayError::Timeout(Duration::from_secs(2)).into();
        assert!(matches!(err, GatewayError::Timeout(d) if d == Duration::from_secs(2)));
    }

    #[test]
    fn test_invalid_json_to_gateway() {
        let err: GatewayError = HttpGatewayError::InvalidJson("<html>".into()).into();
        assert!(matches!(err, GatewayError::InvalidResponse(_)));
    }

    #[test]
    fn test_invalid_endpoint_to_gateway() {
        let err: GatewayError = HttpGatewayError::InvalidEndpoint("ftp://x".into()).into();
        assert!(matches!(err, GatewayError::Configuration(_)));
    }
}
