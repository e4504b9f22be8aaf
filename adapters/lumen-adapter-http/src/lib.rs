//! Lumen Gateway for HTTP Simulation Services
//!
//! This crate provides a [`Gateway`] implementation that posts generated
//! Python source to a simulation service and returns its JSON answer.
//!
//! # Protocol
//!
//! - **Request**: `POST <endpoint>` with body `{"code": "<source>"}`
//! - **Response**: a JSON object with `success` and either top-level or
//!   `results`-nested fields (`probabilities`, `counts`, ...)
//! - **Failure**: `{"success": false, "error": ..., "traceback": ...}`,
//!   possibly with a 5xx status
//!
//! # Configuration
//!
//! Endpoints default to `http://localhost:8080` (Strawberry Fields) and
//! `http://localhost:8081` (Perceval); see `lumen_hal::Config` for the
//! `LUMEN_*` overrides.
//!
//! # Example
//!
//! ```ignore
//! use lumen_adapter_http::HttpGateway;
//! use lumen_hal::Gateway;
//! use lumen_ir::Framework;
//!
//! let gateway = HttpGateway::local(Framework::Perceval)?;
//! let results = gateway.simulate(&source).await?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod client;
mod error;
mod gateway;

pub use client::{ExecuteRequest, SimulationClient};
pub use error::{HttpGatewayError, HttpGatewayResult};
pub use gateway::HttpGateway;

// Re-export common HAL types for convenience.
pub use lumen_hal::{Gateway, GatewayConfig};
