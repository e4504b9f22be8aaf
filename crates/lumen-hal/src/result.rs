//! Interpretation of raw simulation responses.
//!
//! Services report results in several shapes: as top-level JSON fields,
//! nested one level under `"results"`, or as the `str()` of a Python dict.
//! [`SimulationResults::interpret`] accepts all of them. A field that cannot
//! be read is left empty; interpretation itself never fails.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

/// Shot count used when counts have to be derived from probabilities.
pub const SYNTHETIC_SHOTS: f64 = 1000.0;

/// Normalized outcome of one simulation run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SimulationResults {
    /// Whether the service reported success.
    pub success: bool,
    /// Probability per outcome label.
    pub probabilities: BTreeMap<String, f64>,
    /// Sample count per outcome label.
    pub counts: BTreeMap<String, u64>,
    /// Per-mode detection probability, keyed `mode_<i>`.
    pub photon_detections: BTreeMap<String, f64>,
    /// Wall-clock simulation time in seconds.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub simulation_time: Option<f64>,
    /// The program substituted a uniform distribution for real results.
    pub probabilities_fallback: bool,
    /// `counts` were derived from `probabilities` here, not reported.
    pub counts_synthesized: bool,
    /// Error message reported by the service.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl SimulationResults {
    /// Interpret a raw response payload.
    pub fn interpret(raw: &Value) -> Self {
        let probabilities = field(raw, "probabilities")
            .and_then(number_map)
            .unwrap_or_default();

        let reported_counts = field(raw, "counts").and_then(number_map).map(|m| {
            m.into_iter()
                .filter_map(|(k, v)| to_count(v).map(|c| (k, c)))
                .collect::<BTreeMap<_, _>>()
        });
        let counts_synthesized = reported_counts.is_none() && !probabilities.is_empty();
        let counts = reported_counts.unwrap_or_else(|| synthesize_counts(&probabilities));

        let photon_detections = field(raw, "photon_detections")
            .and_then(number_map)
            .unwrap_or_default();
        let simulation_time = field(raw, "simulation_time").and_then(coerce_f64);
        let probabilities_fallback = field(raw, "probabilities_fallback")
            .and_then(coerce_bool)
            .unwrap_or(false);
        let error = field(raw, "error").and_then(|v| match v {
            Value::String(s) if !s.is_empty() => Some(s.clone()),
            _ => None,
        });
        let success = field(raw, "success")
            .and_then(coerce_bool)
            .unwrap_or(error.is_none());

        debug!(
            outcomes = probabilities.len(),
            counts_synthesized, probabilities_fallback, "interpreted simulation response"
        );

        Self {
            success,
            probabilities,
            counts,
            photon_detections,
            simulation_time,
            probabilities_fallback,
            counts_synthesized,
            error,
        }
    }

    /// The most likely outcome.
    pub fn most_probable(&self) -> Option<(&str, f64)> {
        self.probabilities
            .iter()
            .max_by(|a, b| a.1.total_cmp(b.1))
            .map(|(k, v)| (k.as_str(), *v))
    }

    /// Sum of all counts.
    pub fn total_counts(&self) -> u64 {
        self.counts.values().sum()
    }

    /// Whether no outcome data was recovered.
    pub fn is_empty(&self) -> bool {
        self.probabilities.is_empty() && self.counts.is_empty()
    }
}

/// Look up `key` at the top level, then one level under `"results"`.
fn field<'a>(raw: &'a Value, key: &str) -> Option<&'a Value> {
    raw.get(key)
        .or_else(|| raw.get("results").and_then(|r| r.get(key)))
}

/// Read a string-keyed numeric map from an object or a dict literal.
///
/// Values that cannot be coerced to a number are dropped.
fn number_map(value: &Value) -> Option<BTreeMap<String, f64>> {
    match value {
        Value::Object(map) => Some(
            map.iter()
                .filter_map(|(k, v)| coerce_f64(v).map(|n| (k.clone(), n)))
                .collect(),
        ),
        Value::String(s) => parse_dict_literal(s).as_ref().and_then(number_map),
        _ => None,
    }
}

fn coerce_f64(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn coerce_bool(value: &Value) -> Option<bool> {
    match value {
        Value::Bool(b) => Some(*b),
        Value::String(s) => match s.trim() {
            "True" | "true" => Some(true),
            "False" | "false" => Some(false),
            _ => None,
        },
        _ => None,
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn to_count(value: f64) -> Option<u64> {
    if value.is_finite() && value >= 0.0 {
        Some(value as u64)
    } else {
        None
    }
}

/// Counts at [`SYNTHETIC_SHOTS`] shots, truncated, with zeros dropped.
fn synthesize_counts(probabilities: &BTreeMap<String, f64>) -> BTreeMap<String, u64> {
    probabilities
        .iter()
        .filter_map(|(k, p)| to_count(p * SYNTHETIC_SHOTS).map(|c| (k.clone(), c)))
        .filter(|(_, c)| *c > 0)
        .collect()
}

/// Parse the `str()` of a Python dict into JSON.
///
/// Handles single-quoted keys, `dict(...)` and `OrderedDict([...])`
/// wrappers, and numpy scalar reprs such as `np.float64(0.5)`.
fn parse_dict_literal(text: &str) -> Option<Value> {
    let mut body = text.trim();
    for wrapper in ["OrderedDict(", "dict("] {
        if let Some(inner) = body.strip_prefix(wrapper).and_then(|b| b.strip_suffix(')')) {
            body = inner.trim();
            break;
        }
    }

    let normalized = unwrap_numpy_scalars(&body.replace('\'', "\""));
    let normalized = normalized
        .replace("True", "true")
        .replace("False", "false")
        .replace("None", "null");

    if normalized.starts_with('[') {
        // OrderedDict repr: a list of (key, value) tuples.
        let as_json = normalized.replace('(', "[").replace(')', "]");
        let pairs: Vec<(String, Value)> = serde_json::from_str(&as_json).ok()?;
        return Some(Value::Object(pairs.into_iter().collect()));
    }

    serde_json::from_str(&normalized).ok()
}

/// Replace `np.float64(x)`-style wrappers with `x`.
fn unwrap_numpy_scalars(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(start) = rest.find("np.") {
        let after = &rest[start + 3..];
        let ident_len = after
            .find(|c: char| !c.is_ascii_alphanumeric() && c != '_')
            .unwrap_or(after.len());
        let open = start + 3 + ident_len;
        if rest[open..].starts_with('(') {
            if let Some(close) = rest[open..].find(')') {
                out.push_str(&rest[..start]);
                out.push_str(&rest[open + 1..open + close]);
                rest = &rest[open + close + 1..];
                continue;
            }
        }
        out.push_str(&rest[..open]);
        rest = &rest[open..];
    }
    out.push_str(rest);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_top_level_fields() {
        let raw = json!({
            "success": true,
            "probabilities": {"00": 0.5, "11": 0.5},
            "counts": {"00": 480, "11": 520},
            "photon_detections": {"mode_0": 0.5, "mode_1": 0.5},
            "simulation_time": 0.012,
        });
        let results = SimulationResults::interpret(&raw);
        assert!(results.success);
        assert_eq!(results.probabilities["00"], 0.5);
        assert_eq!(results.counts["11"], 520);
        assert_eq!(results.photon_detections["mode_1"], 0.5);
        assert_eq!(results.simulation_time, Some(0.012));
        assert!(!results.counts_synthesized);
        assert_eq!(results.total_counts(), 1000);
    }

    #[test]
    fn test_nested_string_literals() {
        let raw = json!({
            "success": true,
            "results": {
                "probabilities": "{'00': 0.25, '01': 0.75}",
                "counts": "{'00': 250, '01': 750}",
            }
        });
        let results = SimulationResults::interpret(&raw);
        assert_eq!(results.probabilities["01"], 0.75);
        assert_eq!(results.counts["00"], 250);
    }

    #[test]
    fn test_shapes_agree() {
        let top = json!({"probabilities": {"10": 0.4, "01": 0.6}});
        let nested = json!({"results": {"probabilities": {"10": 0.4, "01": 0.6}}});
        let literal = json!({"results": {"probabilities": "{'10': 0.4, '01': 0.6}"}});
        let a = SimulationResults::interpret(&top);
        assert_eq!(a, SimulationResults::interpret(&nested));
        assert_eq!(a, SimulationResults::interpret(&literal));
    }

    #[test]
    fn test_counts_synthesized_from_probabilities() {
        let raw = json!({"probabilities": {"00": 0.3333, "01": 0.6667, "11": 0.0001}});
        let results = SimulationResults::interpret(&raw);
        assert!(results.counts_synthesized);
        assert_eq!(results.counts["00"], 333);
        assert_eq!(results.counts["01"], 666);
        assert!(!results.counts.contains_key("11"));
    }

    #[test]
    fn test_ordered_dict_and_numpy_reprs() {
        let raw = json!({
            "probabilities": "OrderedDict([('00', np.float64(0.5)), ('11', np.float64(0.5))])"
        });
        let results = SimulationResults::interpret(&raw);
        assert_eq!(results.probabilities.len(), 2);
        assert_eq!(results.probabilities["11"], 0.5);

        let raw = json!({"probabilities": "dict({'0': 1.0})"});
        assert_eq!(SimulationResults::interpret(&raw).probabilities["0"], 1.0);
    }

    #[test]
    fn test_bad_values_are_dropped() {
        let raw = json!({
            "probabilities": {"00": "0.5", "01": "oops", "10": null, "11": 0.5},
            "counts": "not a dict",
            "simulation_time": "fast",
        });
        let results = SimulationResults::interpret(&raw);
        assert_eq!(results.probabilities.len(), 2);
        assert_eq!(results.probabilities["00"], 0.5);
        assert!(results.counts_synthesized);
        assert_eq!(results.simulation_time, None);
    }

    #[test]
    fn test_fallback_flag_and_error() {
        let raw = json!({
            "results": {"probabilities_fallback": "True"},
            "error": "state has no all_fock_probs",
        });
        let results = SimulationResults::interpret(&raw);
        assert!(results.probabilities_fallback);
        assert!(!results.success);
        assert_eq!(results.error.as_deref(), Some("state has no all_fock_probs"));
        assert!(results.is_empty());
    }

    #[test]
    fn test_most_probable() {
        let raw = json!({"probabilities": {"00": 0.2, "01": 0.7, "10": 0.1}});
        let results = SimulationResults::interpret(&raw);
        assert_eq!(results.most_probable(), Some(("01", 0.7)));
    }

    #[test]
    fn test_unwrap_numpy_scalars() {
        assert_eq!(unwrap_numpy_scalars("{\"a\": np.float64(0.1)}"), "{\"a\": 0.1}");
        assert_eq!(unwrap_numpy_scalars("np.pi"), "np.pi");
        assert_eq!(unwrap_numpy_scalars("plain"), "plain");
    }
}
