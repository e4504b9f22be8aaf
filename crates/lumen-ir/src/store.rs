//! Observable circuit store.
//!
//! [`CircuitStore`] owns the working [`Circuit`] and publishes a
//! [`CircuitEvent`] after every effective change. Any number of observers
//! can subscribe; a slow observer that lags only loses old events, it never
//! blocks mutations.

use tokio::sync::broadcast;
use tracing::debug;

use crate::catalog::{Framework, OperationKind};
use crate::circuit::Circuit;
use crate::mode::ModeId;
use crate::operation::{OperationId, Parameters};

/// Capacity of the event channel.
const EVENT_CAPACITY: usize = 64;

/// A change to the store's circuit.
#[derive(Debug, Clone, PartialEq)]
pub enum CircuitEvent {
    /// An operation was placed.
    OperationAdded {
        id: OperationId,
        kind: OperationKind,
        mode: ModeId,
    },
    /// An operation was removed.
    OperationRemoved { id: OperationId },
    /// An operation's parameters, mode or position changed.
    OperationUpdated { id: OperationId },
    /// The number of modes changed.
    ModeCountChanged { mode_count: u32 },
    /// All operations were removed.
    Cleared,
    /// New source was generated from the circuit.
    SourceGenerated { framework: Framework },
}

/// Owner of the working circuit.
pub struct CircuitStore {
    circuit: Circuit,
    events: broadcast::Sender<CircuitEvent>,
}

impl Default for CircuitStore {
    fn default() -> Self {
        Self::new(Circuit::new())
    }
}

impl CircuitStore {
    /// Wrap an existing circuit.
    pub fn new(circuit: Circuit) -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self { circuit, events }
    }

    /// Subscribe to future change events.
    pub fn subscribe(&self) -> broadcast::Receiver<CircuitEvent> {
        self.events.subscribe()
    }

    /// Read-only view of the current circuit.
    pub fn circuit(&self) -> &Circuit {
        &self.circuit
    }

    /// A detached copy of the circuit, suitable for generation.
    pub fn snapshot(&self) -> Circuit {
        self.circuit.clone()
    }

    /// See [`Circuit::add_operation`].
    pub fn add_operation(
        &mut self,
        kind: OperationKind,
        mode: impl Into<ModeId>,
        parameters: Option<Parameters>,
    ) -> OperationId {
        let mode = mode.into();
        let id = self.circuit.add_operation(kind, mode, parameters);
        self.publish(CircuitEvent::OperationAdded { id, kind, mode });
        id
    }

    /// See [`Circuit::add_operation_at`].
    pub fn add_operation_at(
        &mut self,
        kind: OperationKind,
        mode: impl Into<ModeId>,
        position: f64,
        parameters: Option<Parameters>,
    ) -> OperationId {
        let mode = mode.into();
        let id = self
            .circuit
            .add_operation_at(kind, mode, position, parameters);
        self.publish(CircuitEvent::OperationAdded { id, kind, mode });
        id
    }

    /// See [`Circuit::remove_operation`].
    pub fn remove_operation(&mut self, id: OperationId) -> bool {
        let removed = self.circuit.remove_operation(id);
        if removed {
            self.publish(CircuitEvent::OperationRemoved { id });
        }
        removed
    }

    /// See [`Circuit::update_parameters`].
    pub fn update_parameters(&mut self, id: OperationId, parameters: Parameters) -> bool {
        let updated = self.circuit.update_parameters(id, parameters);
        if updated {
            self.publish(CircuitEvent::OperationUpdated { id });
        }
        updated
    }

    /// See [`Circuit::move_operation`].
    pub fn move_operation(&mut self, id: OperationId, mode: impl Into<ModeId>, position: f64) -> bool {
        let moved = self.circuit.move_operation(id, mode, position);
        if moved {
            self.publish(CircuitEvent::OperationUpdated { id });
        }
        moved
    }

    /// See [`Circuit::set_mode_count`].
    pub fn set_mode_count(&mut self, n: u32) -> u32 {
        let before = self.circuit.mode_count();
        let after = self.circuit.set_mode_count(n);
        if after != before {
            self.publish(CircuitEvent::ModeCountChanged { mode_count: after });
        }
        after
    }

    /// Add one mode, saturating at the maximum.
    pub fn add_mode(&mut self) -> u32 {
        self.set_mode_count(self.circuit.mode_count().saturating_add(1))
    }

    /// Remove one mode, saturating at the minimum.
    pub fn remove_mode(&mut self) -> u32 {
        self.set_mode_count(self.circuit.mode_count().saturating_sub(1))
    }

    /// Remove every operation and reset the generated source.
    pub fn clear(&mut self) {
        let had_content =
            !self.circuit.is_empty() || !self.circuit.last_generated_source().is_empty();
        self.circuit.clear();
        if had_content {
            self.publish(CircuitEvent::Cleared);
        }
    }

    /// Remember source generated for `framework`.
    pub fn record_source(&mut self, framework: Framework, source: impl Into<String>) {
        self.circuit.set_last_generated_source(source);
        self.publish(CircuitEvent::SourceGenerated { framework });
    }

    fn publish(&self, event: CircuitEvent) {
        debug!(?event, "circuit changed");
        // No subscribers is not an error.
        let _ = self.events.send(event);
    }
}
