//! HTTP client for simulation services.
//!
//! A service accepts `POST <endpoint>` with `{"code": "<python source>"}`,
//! executes the code and answers with a JSON object.

use std::time::Duration;

use reqwest::Client;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, instrument};

use crate::error::{HttpGatewayError, HttpGatewayResult};

/// Connection establishment timeout.
const CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

/// Request body.
#[derive(Debug, Serialize)]
pub struct ExecuteRequest<'a> {
    /// Source text, sent unmodified.
    pub code: &'a str,
}

/// Simulation service client.
pub struct SimulationClient {
    /// HTTP client with timeouts configured.
    client: Client,
    /// Service URL (without trailing slash).
    endpoint: String,
    /// Total request timeout.
    timeout: Duration,
    /// Optional bearer token.
    token: Option<String>,
}

impl std::fmt::Debug for SimulationClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SimulationClient")
            .field("endpoint", &self.endpoint)
            .field("timeout", &self.timeout)
            .field("token", &"[REDACTED]")
            .finish()
    }
}

impl SimulationClient {
    /// Create a client for `endpoint` with a total request `timeout`.
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> HttpGatewayResult<Self> {
        let endpoint = endpoint.into().trim_end_matches('/').to_string();
        if !(endpoint.starts_with("http://") || endpoint.starts_with("https://")) {
            return Err(HttpGatewayError::InvalidEndpoint(endpoint));
        }

        let client = Client::builder()
            .timeout(timeout)
            .connect_timeout(CONNECT_TIMEOUT.min(timeout))
            .build()
            .map_err(HttpGatewayError::Http)?;

        Ok(Self {
            client,
            endpoint,
            timeout,
            token: None,
        })
    }

    /// Attach a bearer token to every request.
    pub fn with_token(mut self, token: Option<String>) -> Self {
        self.token = token;
        self
    }

    /// Service URL.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Post `code` and return the decoded response payload.
    ///
    /// A non-success status whose body carries `"success": false` is still
    /// returned as a payload, so that the service's error and traceback
    /// reach the caller intact.
    #[instrument(skip(self, code), fields(endpoint = %self.endpoint, len = code.len()))]
    pub async fn execute(&self, code: &str) -> HttpGatewayResult<Value> {
        debug!("POST {}", self.endpoint);

        let mut request = self.client.post(&self.endpoint).json(&ExecuteRequest { code });
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await.map_err(|e| self.map_transport(e))?;
        self.handle_response(response).await
    }

    /// Handle HTTP response: decode JSON or return an error.
    async fn handle_response(&self, response: reqwest::Response) -> HttpGatewayResult<Value> {
        let status = response.status();
        let body = response.text().await.map_err(|e| self.map_transport(e))?;

        let parsed = serde_json::from_str::<Value>(&body);
        if status.is_success() {
            return parsed.map_err(|e| {
                HttpGatewayError::InvalidJson(format!("{e}: {}", truncate(&body, 200)))
            });
        }

        match parsed {
            Ok(payload) if payload.get("success").and_then(Value::as_bool) == Some(false) => {
                Ok(payload)
            }
            _ => Err(HttpGatewayError::ApiError {
                status: status.as_u16(),
                message: body,
            }),
        }
    }

    fn map_transport(&self, e: reqwest::Error) -> HttpGatewayError {
        if e.is_timeout() {
            HttpGatewayError::Timeout(self.timeout)
        } else {
            HttpGatewayError::Http(e)
        }
    }
}

fn truncate(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((i, _)) => &text[..i],
        None => text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_non_http_endpoint() {
        let err = SimulationClient::new("localhost:8080", Duration::from_secs(1)).unwrap_err();
        assert!(matches!(err, HttpGatewayError::InvalidEndpoint(_)));
    }

    #[test]
    fn test_trims_trailing_slash() {
        let client = SimulationClient::new("http://localhost:8080/", Duration::from_secs(1)).unwrap();
        assert_eq!(client.endpoint(), "http://localhost:8080");
    }

    #[test]
    fn test_debug_redacts_token() {
        let client = SimulationClient::new("http://localhost:8080", Duration::from_secs(1))
            .unwrap()
            .with_token(Some("hunter2".into()));
        assert!(!format!("{client:?}").contains("hunter2"));
    }

    #[test]
    fn test_request_body() {
        let body = serde_json::to_string(&ExecuteRequest { code: "x = 1\n" }).unwrap();
        assert_eq!(body, r#"{"code":"x = 1\n"}"#);
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("abcdef", 3), "abc");
        assert_eq!(truncate("ab", 3), "ab");
        assert_eq!(truncate("ééé", 2), "éé");
    }
}
