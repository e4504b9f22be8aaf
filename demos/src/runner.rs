//! Execute generated source on the configured simulation service.

use std::sync::Arc;

use anyhow::Context;
use lumen_adapter_http::HttpGateway;
use lumen_hal::{Config, Gateway, GatewayError, SimulationResults, spawn_run};
use lumen_ir::Framework;
use tracing::{debug, info};

/// Run `source` on the `framework` service described by `config`.
///
/// Status transitions are logged as they happen. A failure reported by
/// the service keeps its Python traceback in the error context.
pub async fn run_source(
    config: &Config,
    framework: Framework,
    source: String,
) -> anyhow::Result<SimulationResults> {
    let gateway = HttpGateway::new(config.gateway_config(framework))
        .with_context(|| format!("cannot build {framework} gateway"))?;
    info!(endpoint = %gateway.config().endpoint, "submitting to {}", gateway.name());

    let gateway: Arc<dyn Gateway> = Arc::new(gateway);
    let handle = spawn_run(gateway, source);
    let run_id = handle.id();

    let mut status = handle.watch_status();
    let watcher = tokio::spawn(async move {
        while status.changed().await.is_ok() {
            let current = status.borrow_and_update().clone();
            debug!(run = %run_id, status = %current, "run status");
            if current.is_terminal() {
                break;
            }
        }
    });

    let outcome = handle.wait().await;
    watcher.abort();

    match outcome {
        Ok(results) => Ok(results),
        Err(GatewayError::SimulationFailed { message, traceback }) => {
            let context = traceback.unwrap_or_default();
            Err(anyhow::anyhow!("simulation failed: {message}\n{context}"))
        }
        Err(e) => Err(e).with_context(|| format!("run {run_id} did not complete")),
    }
}
