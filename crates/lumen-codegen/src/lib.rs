//! Python Source Generators for Lumen
//!
//! This crate turns a [`Circuit`] into a self-contained Python program for
//! one of the supported photonic frameworks. Generation is pure: it never
//! fails, never performs I/O, and produces identical text for identical
//! circuits.
//!
//! # Supported Frameworks
//!
//! | Framework | Program | Measurement |
//! |-----------|---------|-------------|
//! | Strawberry Fields | `sf.Program(n)` + `gaussian`/`fock` engine | `MeasureFock() \| q[m]` |
//! | Perceval | `pcvl.Circuit(n)` + SLOS processor | `pcvl.Detector.pnr()` |
//!
//! Operations a framework cannot express are kept in the output as
//! comments so the program still runs.
//!
//! # Example
//!
//! ```rust
//! use lumen_codegen::generate;
//! use lumen_ir::{Circuit, Framework, OperationKind};
//!
//! let mut circuit = Circuit::new();
//! circuit.add_operation(OperationKind::Laser, 0, None);
//! circuit.add_operation(OperationKind::BeamSplitter, 0, None);
//!
//! let source = generate(&circuit, Framework::StrawberryFields);
//! assert!(source.contains("Coherent(1.0) | q[0]"));
//! assert!(source.contains("BSgate(0.5, 0.7853981633974483) | (q[0], q[1])"));
//! ```
//!
//! Every generated program defines `probabilities`, `counts`,
//! `photon_detections`, `simulation_time`, `success` and
//! `probabilities_fallback` at module level.

pub mod emitter;
pub mod literal;
pub mod perceval;
pub mod strawberry;

use lumen_ir::{Circuit, Framework};

pub use emitter::{FrameworkEmitter, GenerateOptions, SourceWriter, emit_circuit};
pub use perceval::PercevalEmitter;
pub use strawberry::StrawberryFieldsEmitter;

/// Emitter for `framework`.
pub fn emitter_for(framework: Framework) -> &'static dyn FrameworkEmitter {
    match framework {
        Framework::StrawberryFields => &StrawberryFieldsEmitter,
        Framework::Perceval => &PercevalEmitter,
    }
}

/// Generate a Python program for `framework` with default options.
pub fn generate(circuit: &Circuit, framework: Framework) -> String {
    generate_with(circuit, framework, &GenerateOptions::default())
}

/// Generate a Python program for `framework`.
pub fn generate_with(circuit: &Circuit, framework: Framework, options: &GenerateOptions) -> String {
    emit_circuit(emitter_for(framework), circuit, options)
}
