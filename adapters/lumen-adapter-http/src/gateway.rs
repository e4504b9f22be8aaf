//! HTTP gateway.

use async_trait::async_trait;
use lumen_hal::{Gateway, GatewayConfig, GatewayResult, check_payload};
use lumen_ir::Framework;
use serde_json::Value;
use tracing::{debug, instrument};

use crate::client::SimulationClient;
use crate::error::HttpGatewayResult;

/// Gateway that posts generated source to a simulation service over HTTP.
pub struct HttpGateway {
    config: GatewayConfig,
    client: SimulationClient,
}

impl std::fmt::Debug for HttpGateway {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpGateway")
            .field("name", &self.config.name)
            .field("endpoint", &self.config.endpoint)
            .finish()
    }
}

impl HttpGateway {
    /// Create a gateway from its configuration.
    pub fn new(config: GatewayConfig) -> HttpGatewayResult<Self> {
        let client = SimulationClient::new(config.endpoint.clone(), config.timeout)?
            .with_token(config.token.clone());
        Ok(Self { config, client })
    }

    /// Create a gateway for the default local service of `framework`.
    pub fn local(framework: Framework) -> HttpGatewayResult<Self> {
        Self::new(GatewayConfig::new(framework))
    }

    /// The gateway configuration.
    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }
}

#[async_trait]
impl Gateway for HttpGateway {
    fn name(&self) -> &str {
        &self.config.name
    }

    fn framework(&self) -> Framework {
        self.config.framework
    }

    #[instrument(skip(self, source), fields(gateway = %self.config.name))]
    async fn execute(&self, source: &str) -> GatewayResult<Value> {
        let payload = self.client.execute(source).await?;
        debug!("Received response from {}", self.client.endpoint());
        check_payload(payload)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_local_gateway() {
        let gateway = HttpGateway::local(Framework::StrawberryFields).unwrap();
        assert_eq!(gateway.name(), "strawberryfields");
        assert_eq!(gateway.framework(), Framework::StrawberryFields);
        assert_eq!(gateway.config().endpoint, "http://localhost:8080");
    }

    #[test]
    fn test_invalid_endpoint() {
        let config = GatewayConfig::new(Framework::Perceval).with_endpoint("not a url");
        assert!(HttpGateway::new(config).is_err());
    }
}
