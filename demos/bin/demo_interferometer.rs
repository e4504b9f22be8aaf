//! Interferometer Demo
//!
//! Builds a laser plus beam splitter circuit, generates Python for the
//! chosen framework and optionally runs it on the simulation service.

use std::path::PathBuf;

use clap::Parser;
use lumen_codegen::{GenerateOptions, generate_with};
use lumen_demos::runner::run_source;
use lumen_demos::{
    init_tracing, load_circuit, open_store, print_header, print_info, print_result, print_section,
    print_simulation_results, print_success,
};
use lumen_hal::Config;
use lumen_ir::{Circuit, CircuitEvent, Framework};

#[derive(Parser, Debug)]
#[command(name = "demo-interferometer")]
#[command(about = "Generate and run a two-mode interferometer")]
struct Args {
    /// Target framework (strawberryfields, perceval)
    #[arg(short, long, default_value = "strawberryfields")]
    framework: Framework,

    /// Number of modes (clamped to 1..=8); defaults to the circuit's own
    #[arg(short, long)]
    modes: Option<u32>,

    /// Load the circuit from a JSON file instead
    #[arg(long)]
    circuit: Option<PathBuf>,

    /// Shots to scale counts to (overrides config)
    #[arg(short, long)]
    shots: Option<u32>,

    /// Execute on the simulation service
    #[arg(long)]
    run: bool,

    /// Configuration file (YAML)
    #[arg(long, env = "LUMEN_CONFIG")]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let config = Config::load(args.config.as_deref())?;
    init_tracing(&config.logging.level);

    print_header("Photonic Interferometer Demo");

    let circuit = match &args.circuit {
        Some(path) => load_circuit(path)?,
        None => Circuit::interferometer(),
    };
    let mut store = open_store(circuit, args.modes);
    let mut events = store.subscribe();

    print_section("Circuit");
    print_result("Modes", store.circuit().mode_count());
    print_result("Operations", store.circuit().num_operations());
    for op in store.circuit().operations() {
        let support = if op.kind.supported_by(args.framework) {
            "native"
        } else {
            "unsupported"
        };
        print_result(
            &format!("  {} @ mode {}", op.kind.label(), op.mode),
            format!("position {}, {support}", op.position),
        );
    }
    let dormant = store.circuit().dormant_operations().count();
    if dormant > 0 {
        print_info(&format!("{dormant} operation(s) sit outside the mode count and are skipped"));
    }

    let options = GenerateOptions {
        shots: args.shots.unwrap_or(config.execution.shots),
    };
    let source = generate_with(store.circuit(), args.framework, &options);
    store.record_source(args.framework, source.clone());

    print_section(&format!("Generated {} source", args.framework));
    println!("{source}");

    while let Ok(event) = events.try_recv() {
        if let CircuitEvent::SourceGenerated { framework } = event {
            print_success(&format!("Source generated for {framework}"));
        }
    }

    if args.run {
        let results = run_source(&config, args.framework, source).await?;
        print_simulation_results(&results);
        println!();
        print_success("Simulation complete!");
    } else {
        println!();
        print_info("Pass --run to execute on the simulation service");
    }

    Ok(())
}
