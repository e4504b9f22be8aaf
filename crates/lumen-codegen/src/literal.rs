//! Python literal formatting.

use std::fmt::Write;

use lumen_ir::mode::clamp_mode_count;

/// Render a float as a Python float literal.
///
/// Finite values use the shortest representation that round-trips and
/// always carry a decimal point or exponent, so `1` renders as `1.0`.
pub fn py_float(value: f64) -> String {
    if value.is_nan() {
        "float('nan')".to_string()
    } else if value.is_infinite() {
        if value > 0.0 {
            "float('inf')".to_string()
        } else {
            "float('-inf')".to_string()
        }
    } else {
        format!("{value:?}")
    }
}

/// Binary outcome labels for `mode_count` modes, in ascending order.
///
/// `outcome_labels(2)` is `["00", "01", "10", "11"]`. The count is clamped
/// to the valid mode range first.
pub fn outcome_labels(mode_count: u32) -> Vec<String> {
    let mode_count = clamp_mode_count(mode_count);
    let width = mode_count as usize;
    (0..1_u64 << mode_count)
        .map(|n| format!("{n:0width$b}"))
        .collect()
}

/// Python dict literal of a uniform distribution over the binary outcomes
/// of `mode_count` modes.
pub fn uniform_distribution(mode_count: u32) -> String {
    let labels = outcome_labels(mode_count);
    #[allow(clippy::cast_precision_loss)]
    let p = 1.0 / labels.len() as f64;
    let value = py_float(p);

    let mut out = String::from("{");
    for (i, label) in labels.iter().enumerate() {
        if i > 0 {
            out.push_str(", ");
        }
        let _ = write!(out, "\"{label}\": {value}");
    }
    out.push('}');
    out
}
