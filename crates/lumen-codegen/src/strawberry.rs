//! Strawberry Fields emitter.

use lumen_ir::{Framework, ModeId, Operation, OperationKind};

use crate::emitter::{FrameworkEmitter, GenerateOptions, SourceWriter, param, write_result_extraction};

/// Fock-space truncation for the `fock` backend.
pub const FOCK_CUTOFF_DIM: u32 = 5;

/// Photon-number cutoff used when enumerating outcome probabilities.
const PROBABILITY_CUTOFF: u32 = 3;

/// Emits a Strawberry Fields program.
///
/// Operations live inside a `with prog.context as q:` block. The engine is
/// `gaussian` unless a Kerr gate is present.
#[derive(Debug, Clone, Copy, Default)]
pub struct StrawberryFieldsEmitter;

impl StrawberryFieldsEmitter {
    /// Create a new emitter.
    pub fn new() -> Self {
        Self
    }
}

impl FrameworkEmitter for StrawberryFieldsEmitter {
    fn framework(&self) -> Framework {
        Framework::StrawberryFields
    }

    fn preamble(&self, w: &mut SourceWriter, mode_count: u32, live: &[&Operation]) {
        w.writeln("import strawberryfields as sf");
        w.writeln("from strawberryfields.ops import *");
        w.writeln("import numpy as np");
        w.writeln("import json");
        w.writeln("import time");
        w.blank();
        w.comment(&format!("Initialize program with {mode_count} modes"));
        w.writeln(&format!("prog = sf.Program({mode_count})"));
        w.blank();

        if live.iter().any(|op| op.kind == OperationKind::KerrGate) {
            w.comment("Create engine (Kerr gates are non-Gaussian, use the Fock backend)");
            w.writeln(&format!(
                "eng = sf.Engine(\"fock\", backend_options={{\"cutoff_dim\": {FOCK_CUTOFF_DIM}}})"
            ));
        } else {
            w.comment("Create engine");
            w.writeln("eng = sf.Engine(\"gaussian\")");
        }
        w.blank();

        w.comment("Circuit definition");
        w.writeln("with prog.context as q:");
        w.indent();
    }

    fn single_mode(&self, w: &mut SourceWriter, op: &Operation, mode: ModeId) {
        match op.kind {
            OperationKind::Laser => {
                w.comment("Coherent state (laser input)");
                w.writeln(&format!("Coherent(1.0) | q[{mode}]"));
            }
            OperationKind::PhaseShifter => {
                w.comment("Phase shift");
                w.writeln(&format!("Rgate({}) | q[{mode}]", param(op, "phi")));
            }
            OperationKind::SqueezeGate => {
                w.comment("Squeezing operation");
                w.writeln(&format!(
                    "Sgate({}, {}) | q[{mode}]",
                    param(op, "r"),
                    param(op, "theta")
                ));
            }
            OperationKind::DisplacementGate => {
                w.comment("Displacement operation");
                w.writeln(&format!(
                    "Dgate({}, {}) | q[{mode}]",
                    param(op, "r"),
                    param(op, "phi")
                ));
            }
            OperationKind::KerrGate => {
                w.comment("Kerr nonlinearity");
                w.writeln(&format!("Kgate({}) | q[{mode}]", param(op, "kappa")));
            }
            other => self.unsupported(w, other, mode),
        }
    }

    fn multi_mode(&self, w: &mut SourceWriter, op: &Operation, mode: ModeId, next: ModeId) {
        match op.kind {
            OperationKind::BeamSplitter => {
                w.comment(&format!("Beam splitter between mode {mode} and {next}"));
                w.writeln(&format!(
                    "BSgate({}, {}) | (q[{mode}], q[{next}])",
                    param(op, "theta"),
                    param(op, "phi")
                ));
            }
            other => self.unsupported(w, other, mode),
        }
    }

    fn measurement(&self, w: &mut SourceWriter, mode: ModeId) {
        w.writeln(&format!("MeasureFock() | q[{mode}]"));
    }

    fn epilogue(&self, w: &mut SourceWriter, mode_count: u32, options: &GenerateOptions) {
        w.dedent();
        w.blank();
        w.comment("Run the simulation");
        w.writeln("start_time = time.time()");
        w.writeln("result = eng.run(prog)");
        w.blank();

        w.comment("Extract outcome probabilities from the final state");
        w.writeln("probabilities_fallback = False");
        w.writeln("try:");
        w.indent();
        w.writeln("state = result.state");
        w.writeln("probabilities = {}");
        w.writeln(&format!(
            "for index in np.ndindex(*([{PROBABILITY_CUTOFF}] * {mode_count})):"
        ));
        w.indent();
        w.writeln("prob = float(np.real(state.fock_prob(list(index))))");
        w.writeln("if prob > 1e-12:");
        w.indent();
        w.writeln("probabilities[\"\".join(str(n) for n in index)] = prob");
        w.dedent();
        w.dedent();
        w.writeln("if not probabilities:");
        w.indent();
        w.writeln("raise ValueError(\"no Fock probabilities below the cutoff\")");
        w.dedent();
        w.dedent();

        write_result_extraction(w, mode_count, options);
    }
}
