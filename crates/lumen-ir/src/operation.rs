//! Placed operations: an optical primitive bound to a mode and position.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::catalog::OperationKind;
use crate::mode::ModeId;

/// Parameter values keyed by name.
///
/// Ordered so that anything iterating a parameter set is deterministic.
pub type Parameters = BTreeMap<String, f64>;

/// Opaque unique identifier of a placed operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OperationId(pub Uuid);

impl OperationId {
    /// Generate a fresh random identifier.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for OperationId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for OperationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// An optical primitive placed on a circuit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Operation {
    /// Identity of this placement.
    pub id: OperationId,
    /// The primitive.
    pub kind: OperationKind,
    /// Wire the operation sits on.
    pub mode: ModeId,
    /// Ordering key within the mode; meaningless across modes.
    pub position: f64,
    /// User-supplied parameter values.
    pub parameters: Parameters,
}

impl Operation {
    /// Create an operation with the kind's default parameters.
    pub fn new(kind: OperationKind, mode: impl Into<ModeId>, position: f64) -> Self {
        Self::with_parameters(kind, mode, position, kind.default_parameters())
    }

    /// Create an operation with explicit parameters.
    pub fn with_parameters(
        kind: OperationKind,
        mode: impl Into<ModeId>,
        position: f64,
        parameters: Parameters,
    ) -> Self {
        Self {
            id: OperationId::new(),
            kind,
            mode: mode.into(),
            position,
            parameters,
        }
    }

    /// Value of a declared parameter, falling back to the catalog default.
    ///
    /// Returns `None` for keys the kind does not declare, even if the user
    /// stored a value under that key.
    pub fn parameter(&self, key: &str) -> Option<f64> {
        let default = self.kind.default_parameter(key)?;
        Some(self.parameters.get(key).copied().unwrap_or(default))
    }

    /// The kind's declared parameters, resolved against user values.
    ///
    /// Keys are exactly the declared set: missing values take their default
    /// and undeclared user keys are dropped.
    pub fn resolved_parameters(&self) -> Parameters {
        self.kind
            .parameter_defaults()
            .iter()
            .map(|(key, default)| {
                let value = self.parameters.get(*key).copied().unwrap_or(*default);
                ((*key).to_string(), value)
            })
            .collect()
    }

    /// Stored keys that the kind does not declare.
    pub fn undeclared_parameters(&self) -> impl Iterator<Item = &str> {
        self.parameters
            .keys()
            .map(String::as_str)
            .filter(|key| self.kind.default_parameter(key).is_none())
    }
}
