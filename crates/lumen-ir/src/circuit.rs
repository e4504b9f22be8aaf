//! Circuit model: placed operations spread over a fixed number of modes.

use serde::{Deserialize, Serialize};

use crate::catalog::OperationKind;
use crate::mode::{self, DEFAULT_MODES, ModeId};
use crate::operation::{Operation, OperationId, Parameters};

/// A photonic circuit.
///
/// The circuit owns its operations. Insertion order carries no meaning:
/// consumers that need a deterministic traversal use [`Circuit::by_mode`].
///
/// Mutations never fail. Operations whose mode falls outside the current
/// mode count are kept but are dormant until the mode count grows again.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "CircuitRepr")]
pub struct Circuit {
    /// Number of parallel modes, always within `[MIN_MODES, MAX_MODES]`.
    mode_count: u32,
    /// Placed operations, in insertion order.
    operations: Vec<Operation>,
    /// Source text from the last generation; empty after any edit.
    #[serde(skip)]
    last_generated_source: String,
}

/// Wire form of a [`Circuit`]; the mode count is clamped on conversion.
#[derive(Deserialize)]
struct CircuitRepr {
    #[serde(default = "default_mode_count")]
    mode_count: u32,
    #[serde(default)]
    operations: Vec<Operation>,
}

fn default_mode_count() -> u32 {
    DEFAULT_MODES
}

impl From<CircuitRepr> for Circuit {
    fn from(repr: CircuitRepr) -> Self {
        Self {
            mode_count: mode::clamp_mode_count(repr.mode_count),
            operations: repr.operations,
            last_generated_source: String::new(),
        }
    }
}

impl Default for Circuit {
    fn default() -> Self {
        Self::new()
    }
}

impl Circuit {
    /// Create an empty circuit with the default number of modes.
    pub fn new() -> Self {
        Self::with_modes(DEFAULT_MODES)
    }

    /// Create an empty circuit with `mode_count` modes (clamped).
    pub fn with_modes(mode_count: u32) -> Self {
        Self {
            mode_count: mode::clamp_mode_count(mode_count),
            operations: vec![],
            last_generated_source: String::new(),
        }
    }

    // =========================================================================
    // Mutation
    // =========================================================================

    /// Place an operation at the end of its mode.
    ///
    /// `None` parameters means "use the catalog defaults". The mode is not
    /// validated here.
    pub fn add_operation(
        &mut self,
        kind: OperationKind,
        mode: impl Into<ModeId>,
        parameters: Option<Parameters>,
    ) -> OperationId {
        let position = self.next_position();
        self.add_operation_at(kind, mode, position, parameters)
    }

    /// Place an operation at an explicit position within its mode.
    pub fn add_operation_at(
        &mut self,
        kind: OperationKind,
        mode: impl Into<ModeId>,
        position: f64,
        parameters: Option<Parameters>,
    ) -> OperationId {
        let parameters = parameters.unwrap_or_else(|| kind.default_parameters());
        let op = Operation::with_parameters(kind, mode, position, parameters);
        let id = op.id;
        self.operations.push(op);
        self.last_generated_source.clear();
        id
    }

    /// Remove the operation with `id`. Returns `false` if it was absent.
    pub fn remove_operation(&mut self, id: OperationId) -> bool {
        let before = self.operations.len();
        self.operations.retain(|op| op.id != id);
        let removed = self.operations.len() != before;
        if removed {
            self.last_generated_source.clear();
        }
        removed
    }

    /// Replace the parameters of the operation with `id`.
    pub fn update_parameters(&mut self, id: OperationId, parameters: Parameters) -> bool {
        let Some(op) = self.operations.iter_mut().find(|op| op.id == id) else {
            return false;
        };
        op.parameters = parameters;
        self.last_generated_source.clear();
        true
    }

    /// Move the operation with `id` to another mode and/or position.
    pub fn move_operation(
        &mut self,
        id: OperationId,
        mode: impl Into<ModeId>,
        position: f64,
    ) -> bool {
        let Some(op) = self.operations.iter_mut().find(|op| op.id == id) else {
            return false;
        };
        op.mode = mode.into();
        op.position = position;
        self.last_generated_source.clear();
        true
    }

    /// Set the number of modes, clamped to `[MIN_MODES, MAX_MODES]`.
    ///
    /// Operations are never touched; shrinking only makes some dormant.
    /// Returns the effective mode count.
    pub fn set_mode_count(&mut self, n: u32) -> u32 {
        let n = mode::clamp_mode_count(n);
        if n != self.mode_count {
            self.mode_count = n;
            self.last_generated_source.clear();
        }
        self.mode_count
    }

    /// Add one mode (saturating at `MAX_MODES`).
    pub fn add_mode(&mut self) -> u32 {
        self.set_mode_count(self.mode_count.saturating_add(1))
    }

    /// Remove one mode (saturating at `MIN_MODES`).
    pub fn remove_mode(&mut self) -> u32 {
        self.set_mode_count(self.mode_count.saturating_sub(1))
    }

    /// Remove every operation and reset the generated source.
    pub fn clear(&mut self) {
        self.operations.clear();
        self.last_generated_source.clear();
    }

    /// Remember the source generated from this circuit.
    pub fn set_last_generated_source(&mut self, source: impl Into<String>) {
        self.last_generated_source = source.into();
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// Number of modes.
    pub fn mode_count(&self) -> u32 {
        self.mode_count
    }

    /// All operations, in insertion order.
    pub fn operations(&self) -> &[Operation] {
        &self.operations
    }

    /// Number of operations, dormant ones included.
    pub fn num_operations(&self) -> usize {
        self.operations.len()
    }

    /// Whether the circuit has no operations.
    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }

    /// Look up an operation by id.
    pub fn operation(&self, id: OperationId) -> Option<&Operation> {
        self.operations.iter().find(|op| op.id == id)
    }

    /// Source text from the last generation, empty if none since the last edit.
    pub fn last_generated_source(&self) -> &str {
        &self.last_generated_source
    }

    /// Whether `mode` is within the current mode count.
    #[inline]
    pub fn contains_mode(&self, mode: ModeId) -> bool {
        mode.0 < self.mode_count
    }

    /// Operations whose mode is out of range.
    pub fn dormant_operations(&self) -> impl Iterator<Item = &Operation> {
        self.operations
            .iter()
            .filter(|op| !self.contains_mode(op.mode))
    }

    /// Live operations grouped by mode and sorted by position.
    ///
    /// Returns exactly `mode_count` buckets. Dormant operations are
    /// excluded. The sort is stable, so equal positions keep their
    /// insertion order.
    pub fn by_mode(&self) -> Vec<Vec<&Operation>> {
        let mut buckets: Vec<Vec<&Operation>> = vec![Vec::new(); self.mode_count as usize];
        for op in &self.operations {
            if let Some(bucket) = buckets.get_mut(op.mode.index()) {
                bucket.push(op);
            }
        }
        for bucket in &mut buckets {
            bucket.sort_by(|a, b| a.position.total_cmp(&b.position));
        }
        buckets
    }

    fn next_position(&self) -> f64 {
        self.operations
            .iter()
            .map(|op| op.position)
            .filter(|p| p.is_finite())
            .fold(None, |acc: Option<f64>, p| Some(acc.map_or(p, |a| a.max(p))))
            .map_or(0.0, |max| max + 1.0)
    }

    // =========================================================================
    // Pre-built circuits
    // =========================================================================

    /// A laser feeding a single beam splitter on two modes.
    pub fn interferometer() -> Self {
        let mut circuit = Self::with_modes(2);
        circuit.add_operation(OperationKind::Laser, 0, None);
        circuit.add_operation(OperationKind::BeamSplitter, 0, None);
        circuit
    }

    /// A Mach-Zehnder interferometer: BS, phase shift on the upper arm, BS.
    pub fn mach_zehnder(phi: f64) -> Self {
        let mut circuit = Self::with_modes(2);
        circuit.add_operation(OperationKind::Laser, 0, None);
        circuit.add_operation(OperationKind::BeamSplitter, 0, None);
        circuit.add_operation(
            OperationKind::PhaseShifter,
            0,
            Some(Parameters::from([("phi".to_string(), phi)])),
        );
        circuit.add_operation(OperationKind::BeamSplitter, 0, None);
        circuit
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mode::{MAX_MODES, MIN_MODES};

    #[test]
    fn test_new_circuit() {
        let circuit = Circuit::new();
        assert_eq!(circuit.mode_count(), 2);
        assert!(circuit.is_empty());
        assert!(circuit.last_generated_source().is_empty());
    }

    #[test]
    fn test_add_operation_defaults() {
        let mut circuit = Circuit::new();
        let id = circuit.add_operation(OperationKind::KerrGate, 1, None);
        let op = circuit.operation(id).unwrap();
        assert_eq!(op.parameters, OperationKind::KerrGate.default_parameters());
        assert_eq!(op.mode, ModeId(1));
    }

    #[test]
    fn test_add_operation_does_not_validate_mode() {
        let mut circuit = Circuit::new();
        circuit.add_operation(OperationKind::Laser, 7, None);
        assert_eq!(circuit.num_operations(), 1);
        assert_eq!(circuit.dormant_operations().count(), 1);
    }

    #[test]
    fn test_positions_increase() {
        let mut circuit = Circuit::new();
        let a = circuit.add_operation(OperationKind::Laser, 0, None);
        let b = circuit.add_operation(OperationKind::PhaseShifter, 1, None);
        let pa = circuit.operation(a).unwrap().position;
        let pb = circuit.operation(b).unwrap().position;
        assert!(pb > pa);
    }

    #[test]
    fn test_remove_operation() {
        let mut circuit = Circuit::new();
        let id = circuit.add_operation(OperationKind::Laser, 0, None);
        assert!(circuit.remove_operation(id));
        assert!(circuit.is_empty());
        // Absent id is a no-op.
        assert!(!circuit.remove_operation(id));
    }

    #[test]
    fn test_mode_count_clamped() {
        let mut circuit = Circuit::new();
        assert_eq!(circuit.set_mode_count(0), MIN_MODES);
        assert_eq!(circuit.set_mode_count(100), MAX_MODES);
        assert_eq!(circuit.add_mode(), MAX_MODES);
        circuit.set_mode_count(1);
        assert_eq!(circuit.remove_mode(), MIN_MODES);
        assert_eq!(Circuit::with_modes(0).mode_count(), MIN_MODES);
    }

    #[test]
    fn test_shrinking_keeps_dormant_operations() {
        let mut circuit = Circuit::with_modes(4);
        circuit.add_operation(OperationKind::Laser, 3, None);
        circuit.set_mode_count(2);
        assert_eq!(circuit.num_operations(), 1);
        assert_eq!(circuit.dormant_operations().count(), 1);
        assert!(circuit.by_mode().iter().all(Vec::is_empty));

        circuit.set_mode_count(4);
        assert_eq!(circuit.dormant_operations().count(), 0);
        assert_eq!(circuit.by_mode()[3].len(), 1);
    }

    #[test]
    fn test_by_mode_sorts_stably() {
        let mut circuit = Circuit::with_modes(2);
        let late = circuit.add_operation_at(OperationKind::PhaseShifter, 0, 5.0, None);
        let first = circuit.add_operation_at(OperationKind::Laser, 0, 1.0, None);
        let tie_a = circuit.add_operation_at(OperationKind::KerrGate, 0, 3.0, None);
        let tie_b = circuit.add_operation_at(OperationKind::SqueezeGate, 0, 3.0, None);
        circuit.add_operation_at(OperationKind::Laser, 1, 0.0, None);

        let buckets = circuit.by_mode();
        assert_eq!(buckets.len(), 2);
        let ids: Vec<_> = buckets[0].iter().map(|op| op.id).collect();
        assert_eq!(ids, vec![first, tie_a, tie_b, late]);
        assert_eq!(buckets[1].len(), 1);
    }

    #[test]
    fn test_edits_clear_generated_source() {
        let mut circuit = Circuit::new();
        circuit.set_last_generated_source("prog = ...");
        let id = circuit.add_operation(OperationKind::Laser, 0, None);
        assert!(circuit.last_generated_source().is_empty());

        circuit.set_last_generated_source("prog = ...");
        circuit.update_parameters(id, Parameters::new());
        assert!(circuit.last_generated_source().is_empty());

        circuit.set_last_generated_source("prog = ...");
        circuit.clear();
        assert!(circuit.is_empty());
        assert!(circuit.last_generated_source().is_empty());
    }

    #[test]
    fn test_move_operation() {
        let mut circuit = Circuit::with_modes(3);
        let id = circuit.add_operation(OperationKind::PhaseShifter, 0, None);
        assert!(circuit.move_operation(id, 2, 10.0));
        let op = circuit.operation(id).unwrap();
        assert_eq!(op.mode, ModeId(2));
        assert_eq!(op.position, 10.0);
        assert!(!circuit.move_operation(OperationId::new(), 0, 0.0));
    }

    #[test]
    fn test_prebuilt_circuits() {
        let circuit = Circuit::interferometer();
        assert_eq!(circuit.mode_count(), 2);
        assert_eq!(circuit.num_operations(), 2);

        let mz = Circuit::mach_zehnder(0.3);
        assert_eq!(mz.by_mode()[0].len(), 4);
    }

    #[test]
    fn test_deserialize_clamps_mode_count() {
        let low: Circuit = serde_json::from_str(r#"{"mode_count":0,"operations":[]}"#).unwrap();
        assert_eq!(low.mode_count(), MIN_MODES);
        assert_eq!(low.by_mode().len(), 1);

        let high: Circuit =
            serde_json::from_str(r#"{"mode_count":1000000000,"operations":[]}"#).unwrap();
        assert_eq!(high.mode_count(), MAX_MODES);
        assert_eq!(high.by_mode().len(), MAX_MODES as usize);

        let missing: Circuit = serde_json::from_str("{}").unwrap();
        assert_eq!(missing.mode_count(), DEFAULT_MODES);
    }
}
