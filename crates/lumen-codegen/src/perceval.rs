//! Perceval emitter.

use lumen_ir::{Framework, ModeId, Operation, OperationKind};

use crate::emitter::{FrameworkEmitter, GenerateOptions, SourceWriter, param, write_result_extraction};

/// Emits a Perceval program.
///
/// Components are added to a flat `pcvl.Circuit`; detectors are collected
/// in a `detectors` dict and attached to the processor before sampling. The
/// input state is a single photon in mode 0.
#[derive(Debug, Clone, Copy, Default)]
pub struct PercevalEmitter;

impl PercevalEmitter {
    /// Create a new emitter.
    pub fn new() -> Self {
        Self
    }
}

impl FrameworkEmitter for PercevalEmitter {
    fn framework(&self) -> Framework {
        Framework::Perceval
    }

    fn preamble(&self, w: &mut SourceWriter, mode_count: u32, _live: &[&Operation]) {
        w.writeln("import perceval as pcvl");
        w.writeln("import numpy as np");
        w.writeln("import json");
        w.writeln("import time");
        w.blank();
        w.comment(&format!("Initialize circuit with {mode_count} modes"));
        w.writeln(&format!("circuit = pcvl.Circuit({mode_count})"));
        w.writeln("detectors = {}");
        w.blank();
    }

    fn single_mode(&self, w: &mut SourceWriter, op: &Operation, mode: ModeId) {
        match op.kind {
            OperationKind::PhaseShifter => {
                w.comment("Phase shift");
                w.writeln(&format!(
                    "circuit.add(({mode},), pcvl.PS(phi={}))",
                    param(op, "phi")
                ));
            }
            OperationKind::HalfWavePlate => {
                w.comment("Half wave plate");
                w.writeln(&format!(
                    "circuit.add(({mode},), pcvl.HWP({}))",
                    param(op, "theta")
                ));
            }
            OperationKind::QuarterWavePlate => {
                w.comment("Quarter wave plate");
                w.writeln(&format!(
                    "circuit.add(({mode},), pcvl.QWP({}))",
                    param(op, "theta")
                ));
            }
            OperationKind::TimeDelay => {
                w.comment("Time delay");
                w.writeln(&format!(
                    "circuit.add(({mode},), pcvl.TD({}))",
                    param(op, "delay")
                ));
            }
            other => self.unsupported(w, other, mode),
        }
    }

    fn multi_mode(&self, w: &mut SourceWriter, op: &Operation, mode: ModeId, next: ModeId) {
        let component = match op.kind {
            OperationKind::BeamSplitter => {
                w.comment(&format!("Beam splitter between mode {mode} and {next}"));
                format!(
                    "pcvl.BS(theta={}, phi_bl={})",
                    param(op, "theta"),
                    param(op, "phi")
                )
            }
            OperationKind::Permutation => {
                w.comment(&format!("Swap mode {mode} and {next}"));
                "pcvl.PERM([1, 0])".to_string()
            }
            OperationKind::PolarizingBeamSplitter => {
                w.comment(&format!(
                    "Polarizing beam splitter between mode {mode} and {next}"
                ));
                "pcvl.PBS()".to_string()
            }
            OperationKind::Unitary => {
                w.comment(&format!(
                    "Unitary on mode {mode} and {next} (identity placeholder)"
                ));
                "pcvl.Unitary(pcvl.Matrix([[1, 0], [0, 1]]))".to_string()
            }
            other => {
                self.unsupported(w, other, mode);
                return;
            }
        };
        w.writeln(&format!("circuit.add(({mode}, {next}), {component})"));
    }

    fn measurement(&self, w: &mut SourceWriter, mode: ModeId) {
        w.writeln(&format!("detectors[{mode}] = pcvl.Detector.pnr()"));
    }

    fn epilogue(&self, w: &mut SourceWriter, mode_count: u32, options: &GenerateOptions) {
        w.blank();
        w.comment("Input state: single photon in mode 0, vacuum in the others");
        w.writeln(&format!(
            "input_state = pcvl.BasicState([1] + [0] * ({mode_count} - 1))"
        ));
        w.blank();

        w.comment("Create processor and attach detectors");
        w.writeln("processor = pcvl.Processor(\"SLOS\", circuit)");
        w.writeln("for mode, detector in detectors.items():");
        w.indent();
        w.writeln("processor.add(mode, detector)");
        w.dedent();
        w.writeln("processor.with_input(input_state)");
        w.blank();

        w.comment("Run the simulation");
        w.writeln("start_time = time.time()");
        w.writeln("sampler = pcvl.algorithm.Sampler(processor)");
        w.blank();

        w.comment("Extract outcome probabilities");
        w.writeln("probabilities_fallback = False");
        w.writeln("try:");
        w.indent();
        w.writeln("sample_result = sampler.probs()");
        w.writeln("probabilities = {}");
        w.writeln("for state, prob in sample_result[\"results\"].items():");
        w.indent();
        w.writeln("probabilities[\"\".join(str(n) for n in state)] = float(prob)");
        w.dedent();
        w.writeln("if not probabilities:");
        w.indent();
        w.writeln("raise ValueError(\"sampler returned no outcomes\")");
        w.dedent();
        w.dedent();

        write_result_extraction(w, mode_count, options);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::emitter::emit_circuit;
    use lumen_ir::Circuit;

    fn generate(circuit: &Circuit) -> String {
        emit_circuit(&PercevalEmitter, circuit, &GenerateOptions::default())
    }

    #[test]
    fn test_preamble() {
        let source = generate(&Circuit::with_modes(4));
        assert!(source.starts_with("import perceval as pcvl\n"));
        assert!(source.contains("circuit = pcvl.Circuit(4)\n"));
        assert!(source.contains("input_state = pcvl.BasicState([1] + [0] * (4 - 1))"));
    }

    #[test]
    fn test_two_mode_components() {
        let mut circuit = Circuit::with_modes(4);
        circuit.add_operation(OperationKind::Permutation, 0, None);
        circuit.add_operation(OperationKind::PolarizingBeamSplitter, 1, None);
        circuit.add_operation(OperationKind::Unitary, 2, None);
        let source = generate(&circuit);
        assert!(source.contains("circuit.add((0, 1), pcvl.PERM([1, 0]))\n"));
        assert!(source.contains("circuit.add((1, 2), pcvl.PBS())\n"));
        assert!(source.contains(
            "circuit.add((2, 3), pcvl.Unitary(pcvl.Matrix([[1, 0], [0, 1]])))\n"
        ));
    }

    #[test]
    fn test_single_mode_components() {
        let mut circuit = Circuit::with_modes(2);
        circuit.add_operation(OperationKind::HalfWavePlate, 0, None);
        circuit.add_operation(OperationKind::QuarterWavePlate, 1, None);
        circuit.add_operation(OperationKind::TimeDelay, 1, None);
        let source = generate(&circuit);
        assert!(source.contains("circuit.add((0,), pcvl.HWP(0.0))\n"));
        assert!(source.contains("circuit.add((1,), pcvl.QWP(0.0))\n"));
        assert!(source.contains("circuit.add((1,), pcvl.TD(1.0))\n"));
    }

    #[test]
    fn test_continuous_variable_kinds_are_commented() {
        let mut circuit = Circuit::new();
        circuit.add_operation(OperationKind::Laser, 0, None);
        circuit.add_operation(OperationKind::KerrGate, 1, None);
        let source = generate(&circuit);
        assert!(source.contains("# Laser on mode 0: unsupported in Perceval (no native statement)"));
        assert!(source.contains("# Kerr Gate on mode 1: unsupported in Perceval (no native statement)"));
        assert!(!source.contains("Coherent"));
    }

    #[test]
    fn test_detector_per_mode() {
        let source = generate(&Circuit::with_modes(3));
        assert!(source.contains(
            "detectors[0] = pcvl.Detector.pnr()\ndetectors[1] = pcvl.Detector.pnr()\ndetectors[2] = pcvl.Detector.pnr()\n"
        ));
        assert_eq!(source.matches("pcvl.Detector.pnr()").count(), 3);
    }
}
