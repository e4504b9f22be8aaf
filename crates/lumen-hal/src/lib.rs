//! Lumen Execution Layer
//!
//! This crate connects generated programs to the simulation services that
//! run them, and turns whatever those services send back into a uniform
//! [`SimulationResults`].
//!
//! # Overview
//!
//! - A common [`Gateway`] trait for sending source to a service
//! - [`spawn_run`] to execute in the background with a cancellable
//!   [`RunHandle`]
//! - [`SimulationResults::interpret`] to normalize raw responses
//! - [`Config`] for endpoints, timeouts and shots, from YAML and `LUMEN_*`
//!   environment variables
//!
//! # Supported Services
//!
//! | Framework | Default Endpoint | Endpoint Variable |
//! |-----------|------------------|-------------------|
//! | Strawberry Fields | `http://localhost:8080` | `LUMEN_STRAWBERRY_FIELDS_ENDPOINT` |
//! | Perceval | `http://localhost:8081` | `LUMEN_PERCEVAL_ENDPOINT` |
//!
//! # Example: Running a Circuit
//!
//! ```ignore
//! use std::sync::Arc;
//!
//! use lumen_adapter_http::HttpGateway;
//! use lumen_hal::{Config, spawn_run};
//! use lumen_ir::{Circuit, Framework};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::load(None)?;
//!     let circuit = Circuit::interferometer();
//!     let source = lumen_codegen::generate(&circuit, Framework::Perceval);
//!
//!     let gateway = HttpGateway::new(config.gateway_config(Framework::Perceval))?;
//!     let run = spawn_run(Arc::new(gateway), source);
//!     println!("Run submitted: {}", run.id());
//!
//!     let results = run.wait().await?;
//!     if let Some((outcome, p)) = results.most_probable() {
//!         println!("Most probable: {outcome} ({p:.3})");
//!     }
//!     Ok(())
//! }
//! ```
//!
//! # Implementing a Custom Gateway
//!
//! ```ignore
//! use lumen_hal::{Gateway, GatewayResult};
//! use lumen_ir::Framework;
//! use async_trait::async_trait;
//! use serde_json::Value;
//!
//! struct LocalPython;
//!
//! #[async_trait]
//! impl Gateway for LocalPython {
//!     fn name(&self) -> &str { "local-python" }
//!
//!     fn framework(&self) -> Framework { Framework::StrawberryFields }
//!
//!     async fn execute(&self, source: &str) -> GatewayResult<Value> {
//!         // Run the source and return the response payload
//!         # todo!()
//!     }
//! }
//! ```

pub mod config;
pub mod error;
pub mod gateway;
pub mod result;
pub mod run;

pub use config::{Config, ConfigError};
pub use error::{GatewayError, GatewayResult};
pub use gateway::{DEFAULT_TIMEOUT, Gateway, GatewayConfig, check_payload, default_endpoint};
pub use result::SimulationResults;
pub use run::{RunHandle, RunId, RunStatus, spawn_run};
