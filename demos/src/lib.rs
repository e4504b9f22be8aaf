//! Lumen Demo Suite
//!
//! Small programs that build photonic circuits, generate Python for both
//! supported frameworks and optionally execute it on a simulation service:
//!
//! - **Interferometer**: laser into a 50:50 beam splitter
//! - **Mach-Zehnder**: phase sweep between two beam splitters
//! - **Catalog**: element reference and framework coverage
//!
//! # Running against a service
//!
//! ```ignore
//! use lumen_demos::runner::run_source;
//! use lumen_hal::Config;
//!
//! let config = Config::load(None)?;
//! let results = run_source(&config, Framework::Perceval, source).await?;
//! ```

pub mod runner;

use std::path::Path;

use anyhow::Context;
use console::style;
use lumen_hal::SimulationResults;
use lumen_ir::{Circuit, CircuitStore};
use tracing_subscriber::EnvFilter;

/// Install the global tracing subscriber.
///
/// `RUST_LOG` wins over `default_level` when set.
pub fn init_tracing(default_level: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

/// Load a circuit from a JSON file.
pub fn load_circuit(path: &Path) -> anyhow::Result<Circuit> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("invalid circuit in {}", path.display()))
}

/// Wrap `circuit` in a store, overriding its mode count only when asked.
pub fn open_store(circuit: Circuit, modes: Option<u32>) -> CircuitStore {
    let mut store = CircuitStore::new(circuit);
    if let Some(modes) = modes {
        store.set_mode_count(modes);
    }
    store
}

/// Render a probability distribution as a sorted, one-line-per-outcome table.
///
/// Outcomes are ordered by descending probability, ties by label.
pub fn format_distribution(results: &SimulationResults, limit: usize) -> Vec<String> {
    let mut rows: Vec<(&String, &f64)> = results.probabilities.iter().collect();
    rows.sort_by(|a, b| b.1.total_cmp(a.1).then_with(|| a.0.cmp(b.0)));
    rows.into_iter()
        .take(limit)
        .map(|(label, p)| {
            let count = results.counts.get(label).copied().unwrap_or(0);
            let bar = "█".repeat(bar_width(*p));
            format!("|{label}⟩ {p:>8.4} {count:>6}  {bar}")
        })
        .collect()
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn bar_width(p: f64) -> usize {
    if p.is_finite() {
        (p.clamp(0.0, 1.0) * 30.0).round() as usize
    } else {
        0
    }
}

/// Print interpreted simulation results.
pub fn print_simulation_results(results: &SimulationResults) {
    print_section("Results");
    print_result("Success", results.success);
    if let Some(t) = results.simulation_time {
        print_result("Simulation time", format!("{:.3} ms", t * 1000.0));
    }
    if let Some((label, p)) = results.most_probable() {
        print_result("Most probable", format!("|{label}⟩ ({:.1}%)", p * 100.0));
    }
    print_result("Total counts", results.total_counts());
    if results.probabilities_fallback {
        print_warning("Probabilities are a uniform placeholder; the backend reported none");
    }
    if results.counts_synthesized {
        print_info("Counts were derived from probabilities");
    }

    println!();
    for row in format_distribution(results, 16) {
        println!("  {row}");
    }

    if !results.photon_detections.is_empty() {
        println!();
        for (mode, p) in &results.photon_detections {
            print_result(mode, format!("{p:.4}"));
        }
    }
}

/// Print a demo header.
pub fn print_header(title: &str) {
    println!();
    println!("{}", style("═".repeat(60)).cyan());
    println!("{}", style(format!("  {title}")).cyan().bold());
    println!("{}", style("═".repeat(60)).cyan());
    println!();
}

/// Print a demo section.
pub fn print_section(title: &str) {
    println!();
    println!("{}", style(format!("▶ {title}")).green().bold());
    println!("{}", style("─".repeat(40)).dim());
}

/// Print a result line.
pub fn print_result(label: &str, value: impl std::fmt::Display) {
    println!("  {} {}", style(format!("{label}:")).dim(), value);
}

/// Print a success message.
pub fn print_success(message: &str) {
    println!("{} {}", style("✓").green().bold(), message);
}

/// Print an info message.
pub fn print_info(message: &str) {
    println!("{} {}", style("ℹ").blue(), message);
}

/// Print a warning message.
pub fn print_warning(message: &str) {
    println!("{} {}", style("!").yellow().bold(), message);
}
