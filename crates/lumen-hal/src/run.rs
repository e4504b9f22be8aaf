//! Simulation run lifecycle.
//!
//! The run state machine:
//!
//! ```text
//!   spawn_run() ──→ Queued ──→ Running ──→ Completed
//!                     │           │
//!                     │           ├──→ Failed(reason)
//!                     │           │
//!                     └───────────┴──→ Cancelled
//! ```
//!
//! **Invariants:**
//! - A run starts in `Queued`.
//! - Transitions are monotonic; a run never moves backward.
//! - Terminal states (`Completed`, `Failed`, `Cancelled`) are permanent.

use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use lumen_ir::Framework;
use serde::{Deserialize, Serialize};
use tokio::sync::{Notify, watch};
use tokio::task::JoinHandle;
use tracing::{info, warn};
use uuid::Uuid;

use crate::error::{GatewayError, GatewayResult};
use crate::gateway::Gateway;
use crate::result::SimulationResults;

/// Unique identifier for a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RunId(pub Uuid);

impl RunId {
    /// Generate a fresh run ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for RunId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for RunId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Status of a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum RunStatus {
    /// Run is waiting to start.
    Queued,
    /// Request is in flight.
    Running,
    /// Run completed and results are available.
    Completed,
    /// Run failed with an error message.
    Failed(String),
    /// Run was cancelled.
    Cancelled,
}

impl RunStatus {
    /// Check if this is a terminal state.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            RunStatus::Completed | RunStatus::Failed(_) | RunStatus::Cancelled
        )
    }

    /// Check if the run is still pending (queued or running).
    pub fn is_pending(&self) -> bool {
        matches!(self, RunStatus::Queued | RunStatus::Running)
    }

    /// Check if the run completed successfully.
    pub fn is_success(&self) -> bool {
        matches!(self, RunStatus::Completed)
    }
}

impl fmt::Display for RunStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RunStatus::Queued => write!(f, "Queued"),
            RunStatus::Running => write!(f, "Running"),
            RunStatus::Completed => write!(f, "Completed"),
            RunStatus::Failed(msg) => write!(f, "Failed: {msg}"),
            RunStatus::Cancelled => write!(f, "Cancelled"),
        }
    }
}

/// Handle to an in-flight simulation run.
///
/// Dropping the handle does not cancel the run.
#[derive(Debug)]
pub struct RunHandle {
    id: RunId,
    framework: Framework,
    created_at: DateTime<Utc>,
    status: watch::Receiver<RunStatus>,
    cancel: Arc<Notify>,
    task: JoinHandle<GatewayResult<SimulationResults>>,
}

impl RunHandle {
    /// The run identifier.
    pub fn id(&self) -> RunId {
        self.id
    }

    /// Framework the run executes on.
    pub fn framework(&self) -> Framework {
        self.framework
    }

    /// Time the run was created.
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Current status.
    pub fn status(&self) -> RunStatus {
        self.status.borrow().clone()
    }

    /// A receiver that observes every status change.
    pub fn watch_status(&self) -> watch::Receiver<RunStatus> {
        self.status.clone()
    }

    /// Request cancellation.
    ///
    /// Aborts the in-flight request. Has no effect once the run is terminal.
    pub fn cancel(&self) {
        self.cancel.notify_one();
    }

    /// Wait for the run to finish.
    pub async fn wait(self) -> GatewayResult<SimulationResults> {
        match self.task.await {
            Ok(result) => result,
            Err(e) if e.is_cancelled() => Err(GatewayError::Cancelled),
            Err(e) => Err(GatewayError::Internal(e.to_string())),
        }
    }
}

/// Start executing `source` on `gateway` in a background task.
///
/// Must be called from within a tokio runtime.
pub fn spawn_run(gateway: Arc<dyn Gateway>, source: String) -> RunHandle {
    let id = RunId::new();
    let framework = gateway.framework();
    let (status_tx, status_rx) = watch::channel(RunStatus::Queued);
    let cancel = Arc::new(Notify::new());
    let cancelled = Arc::clone(&cancel);

    let task = tokio::spawn(async move {
        let outcome = tokio::select! {
            biased;
            () = cancelled.notified() => Err(GatewayError::Cancelled),
            result = async {
                status_tx.send_replace(RunStatus::Running);
                info!(run = %id, gateway = gateway.name(), "simulation run started");
                gateway.simulate(&source).await
            } => result,
        };

        let status = match &outcome {
            Ok(_) => RunStatus::Completed,
            Err(GatewayError::Cancelled) => RunStatus::Cancelled,
            Err(e) => RunStatus::Failed(e.to_string()),
        };
        match &status {
            RunStatus::Failed(reason) => warn!(run = %id, %reason, "simulation run failed"),
            other => info!(run = %id, status = %other, "simulation run finished"),
        }
        status_tx.send_replace(status);
        outcome
    });

    RunHandle {
        id,
        framework,
        created_at: Utc::now(),
        status: status_rx,
        cancel,
        task,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use serde_json::{Value, json};
    use std::time::Duration;

    /// Gateway that answers after a fixed delay.
    struct DelayGateway {
        delay: Duration,
        response: GatewayResult<Value>,
    }

    #[async_trait]
    impl Gateway for DelayGateway {
        fn name(&self) -> &str {
            "delay"
        }

        fn framework(&self) -> Framework {
            Framework::Perceval
        }

        async fn execute(&self, _source: &str) -> GatewayResult<Value> {
            tokio::time::sleep(self.delay).await;
            match &self.response {
                Ok(v) => Ok(v.clone()),
                Err(e) => Err(GatewayError::Network(e.to_string())),
            }
        }
    }

    fn gateway(delay_ms: u64, response: GatewayResult<Value>) -> Arc<dyn Gateway> {
        Arc::new(DelayGateway {
            delay: Duration::from_millis(delay_ms),
            response,
        })
    }

    #[test]
    fn test_run_status_terminal() {
        assert!(!RunStatus::Queued.is_terminal());
        assert!(!RunStatus::Running.is_terminal());
        assert!(RunStatus::Completed.is_terminal());
        assert!(RunStatus::Failed("error".into()).is_terminal());
        assert!(RunStatus::Cancelled.is_terminal());
        assert_eq!(RunStatus::Failed("boom".into()).to_string(), "Failed: boom");
    }

    #[tokio::test(start_paused = true)]
    async fn test_run_completes() {
        let handle = spawn_run(
            gateway(100, Ok(json!({"success": true, "probabilities": {"10": 1.0}}))),
            "print('hi')".into(),
        );
        assert_eq!(handle.status(), RunStatus::Queued);
        assert_eq!(handle.framework(), Framework::Perceval);

        let mut status = handle.watch_status();
        let results = handle.wait().await.unwrap();
        assert_eq!(results.probabilities["10"], 1.0);
        assert_eq!(*status.borrow_and_update(), RunStatus::Completed);
    }

    #[tokio::test(start_paused = true)]
    async fn test_run_failure_is_reported() {
        let handle = spawn_run(
            gateway(10, Err(GatewayError::Network("connection refused".into()))),
            String::new(),
        );
        let status = handle.watch_status();
        let err = handle.wait().await.unwrap_err();
        assert!(matches!(err, GatewayError::Network(_)));
        assert!(matches!(&*status.borrow(), RunStatus::Failed(msg) if msg.contains("connection refused")));
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_in_flight_run() {
        let handle = spawn_run(gateway(60_000, Ok(json!({}))), String::new());
        let mut status = handle.watch_status();

        // Let the task start its request.
        status
            .wait_for(|s| *s == RunStatus::Running)
            .await
            .unwrap();
        handle.cancel();

        let err = handle.wait().await.unwrap_err();
        assert!(matches!(err, GatewayError::Cancelled));
        assert_eq!(*status.borrow(), RunStatus::Cancelled);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_before_start() {
        let handle = spawn_run(gateway(10, Ok(json!({}))), String::new());
        handle.cancel();
        let status = handle.watch_status();
        assert!(matches!(handle.wait().await, Err(GatewayError::Cancelled)));
        assert_eq!(*status.borrow(), RunStatus::Cancelled);
    }
}
