//! Shared emission machinery.
//!
//! Every framework walks the circuit the same way:
//!
//! 1. single-mode operations, in mode order then position order
//!    (unsupported kinds become comments, measurements are deferred);
//! 2. supported two-mode operations, in the same order, bound to the mode
//!    and its right neighbour;
//! 3. one measurement per mode.
//!
//! Framework-specific text is produced by a [`FrameworkEmitter`].

use lumen_ir::{Circuit, DEFAULT_SHOTS, Framework, ModeId, Operation, OperationKind};
use tracing::debug;

use crate::literal::{py_float, uniform_distribution};

/// Knobs that affect the generated program but not the circuit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GenerateOptions {
    /// Number of samples the generated program scales counts to.
    pub shots: u32,
}

impl Default for GenerateOptions {
    fn default() -> Self {
        Self {
            shots: DEFAULT_SHOTS,
        }
    }
}

/// Line-oriented Python source buffer.
#[derive(Debug, Default)]
pub struct SourceWriter {
    output: String,
    indent: usize,
}

impl SourceWriter {
    /// Create an empty writer at indentation level zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Write one line at the current indentation.
    pub fn writeln(&mut self, line: &str) {
        if !line.is_empty() {
            for _ in 0..self.indent {
                self.output.push_str("    ");
            }
            self.output.push_str(line);
        }
        self.output.push('\n');
    }

    /// Write a `#` comment line.
    pub fn comment(&mut self, text: &str) {
        self.writeln(&format!("# {text}"));
    }

    /// Write an empty line.
    pub fn blank(&mut self) {
        self.output.push('\n');
    }

    /// Increase indentation by one level.
    pub fn indent(&mut self) {
        self.indent += 1;
    }

    /// Decrease indentation by one level.
    pub fn dedent(&mut self) {
        self.indent = self.indent.saturating_sub(1);
    }

    /// Consume the writer and return the source text.
    pub fn finish(self) -> String {
        self.output
    }
}

/// Framework-specific statement producer.
///
/// The traversal order is fixed by [`emit_circuit`]; implementors only
/// decide what text each step produces.
pub trait FrameworkEmitter {
    /// Target framework.
    fn framework(&self) -> Framework;

    /// Whether the framework has a native statement for `kind`.
    fn supports(&self, kind: OperationKind) -> bool {
        kind.supported_by(self.framework())
    }

    /// Imports and program declaration.
    ///
    /// `live` holds every operation that will be traversed.
    fn preamble(&self, w: &mut SourceWriter, mode_count: u32, live: &[&Operation]);

    /// Statement for a supported single-mode operation.
    fn single_mode(&self, w: &mut SourceWriter, op: &Operation, mode: ModeId);

    /// Comment for a kind without a native statement.
    fn unsupported(&self, w: &mut SourceWriter, kind: OperationKind, mode: ModeId) {
        w.comment(&format!(
            "{} on mode {mode}: unsupported in {} (no native statement)",
            kind.label(),
            self.framework().display_name()
        ));
    }

    /// Statement for a supported two-mode operation on `mode` and `next`.
    fn multi_mode(&self, w: &mut SourceWriter, op: &Operation, mode: ModeId, next: ModeId);

    /// Comment for a two-mode operation on the last mode.
    fn dangling(&self, w: &mut SourceWriter, op: &Operation, mode: ModeId) {
        w.comment(&format!(
            "{} at mode {mode} has no adjacent mode to connect to",
            op.kind.label()
        ));
    }

    /// Measurement statement for one mode.
    fn measurement(&self, w: &mut SourceWriter, mode: ModeId);

    /// Run call and result extraction.
    fn epilogue(&self, w: &mut SourceWriter, mode_count: u32, options: &GenerateOptions);
}

/// Walk `circuit` with `emitter` and return the generated source.
pub fn emit_circuit(
    emitter: &dyn FrameworkEmitter,
    circuit: &Circuit,
    options: &GenerateOptions,
) -> String {
    let mode_count = circuit.mode_count();
    let buckets = circuit.by_mode();
    let live: Vec<&Operation> = buckets.iter().flatten().copied().collect();

    let mut w = SourceWriter::new();
    emitter.preamble(&mut w, mode_count, &live);

    // Pass 1: single-mode operations.
    for (mode, bucket) in modes(&buckets) {
        for op in bucket {
            if !emitter.supports(op.kind) {
                emitter.unsupported(&mut w, op.kind, mode);
            } else if op.kind.is_measurement() || op.kind.is_multi_mode() {
                continue;
            } else {
                emitter.single_mode(&mut w, op, mode);
            }
        }
    }

    // Pass 2: two-mode operations.
    for (mode, bucket) in modes(&buckets) {
        for op in bucket {
            if !op.kind.is_multi_mode() || !emitter.supports(op.kind) {
                continue;
            }
            let next = mode.next();
            if next.0 < mode_count {
                emitter.multi_mode(&mut w, op, mode, next);
            } else {
                emitter.dangling(&mut w, op, mode);
            }
        }
    }

    // Pass 3: measure every mode.
    w.comment("Measurements");
    for index in 0..mode_count {
        emitter.measurement(&mut w, ModeId(index));
    }

    emitter.epilogue(&mut w, mode_count, options);

    debug!(
        framework = %emitter.framework(),
        mode_count,
        live = live.len(),
        dormant = circuit.dormant_operations().count(),
        "generated source"
    );

    w.finish()
}

fn modes<'a, 'b>(
    buckets: &'a [Vec<&'b Operation>],
) -> impl Iterator<Item = (ModeId, &'a Vec<&'b Operation>)> {
    (0..).map(ModeId).zip(buckets)
}

/// Shared tail of every epilogue.
///
/// Expects to be called right after an indented `try:` block that assigns
/// `probabilities`, with the writer dedented back to the `try` level. Writes
/// the uniform fallback, then derives `counts`, `photon_detections`,
/// `simulation_time` and `success`.
pub(crate) fn write_result_extraction(
    w: &mut SourceWriter,
    mode_count: u32,
    options: &GenerateOptions,
) {
    w.writeln("except Exception as probs_error:");
    w.indent();
    w.writeln("print(\"Error computing probabilities:\", str(probs_error))");
    w.comment("Uniform distribution over the binary outcomes");
    w.writeln(&format!("probabilities = {}", uniform_distribution(mode_count)));
    w.writeln("probabilities_fallback = True");
    w.dedent();
    w.blank();

    w.comment(&format!("Scale probabilities to {} shots", options.shots));
    w.writeln(&format!("shots = {}", options.shots));
    w.writeln("counts = {}");
    w.writeln("for label, prob in probabilities.items():");
    w.indent();
    w.writeln("count = int(prob * shots)");
    w.writeln("if count > 0:");
    w.indent();
    w.writeln("counts[label] = count");
    w.dedent();
    w.dedent();
    w.blank();

    w.comment("Probability of detecting at least one photon in each mode");
    w.writeln("photon_detections = {}");
    w.writeln(&format!("for i in range({mode_count}):"));
    w.indent();
    w.writeln(
        "photon_detections[f\"mode_{i}\"] = sum(prob for label, prob in probabilities.items() if len(label) > i and label[i] != \"0\")",
    );
    w.dedent();
    w.blank();

    w.writeln("simulation_time = time.time() - start_time");
    w.writeln("success = True");
    w.blank();
    w.writeln("print(\"Probabilities:\", json.dumps(probabilities))");
    w.writeln("print(\"Counts:\", json.dumps(counts))");
    w.writeln("print(\"Simulation time:\", round(simulation_time, 4))");
}

/// Resolve a declared parameter for emission.
pub(crate) fn param(op: &Operation, key: &str) -> String {
    py_float(op.parameter(key).unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_writer_indentation() {
        let mut w = SourceWriter::new();
        w.writeln("with prog.context as q:");
        w.indent();
        w.comment("Phase shift");
        w.writeln("");
        w.dedent();
        w.dedent();
        w.writeln("done");
        assert_eq!(
            w.finish(),
            "with prog.context as q:\n    # Phase shift\n\ndone\n"
        );
    }

    #[test]
    fn test_default_options() {
        assert_eq!(GenerateOptions::default().shots, 1000);
    }
}
