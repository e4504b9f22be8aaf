//! Mach-Zehnder Demo
//!
//! Sweeps the internal phase of a Mach-Zehnder interferometer and, for each
//! step, generates Python for both frameworks.

use std::f64::consts::PI;
use std::path::PathBuf;

use clap::Parser;
use lumen_codegen::generate;
use lumen_demos::runner::run_source;
use lumen_demos::{
    init_tracing, print_header, print_info, print_result, print_section, print_success,
    print_warning,
};
use lumen_hal::Config;
use lumen_ir::{Circuit, Framework};

#[derive(Parser, Debug)]
#[command(name = "demo-mach-zehnder")]
#[command(about = "Sweep the phase of a Mach-Zehnder interferometer")]
struct Args {
    /// Number of phase steps in [0, pi]
    #[arg(short, long, default_value = "5")]
    steps: u32,

    /// Execute every step on the Perceval service
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

    print_header("Mach-Zehnder Phase Sweep");

    let steps = args.steps.max(2);
    print_section("Setup");
    print_result("Phase steps", steps);
    print_result("Range", "0 to π");

    for step in 0..steps {
        let phi = PI * f64::from(step) / f64::from(steps - 1);
        let circuit = Circuit::mach_zehnder(phi);

        print_section(&format!("φ = {phi:.4}"));
        for framework in Framework::ALL {
            let source = generate(&circuit, framework);
            let unsupported = source.matches("unsupported in").count();
            print_result(
                framework.display_name(),
                format!("{} lines, {unsupported} unsupported", source.lines().count()),
            );
        }

        if args.run {
            let source = generate(&circuit, Framework::Perceval);
            match run_source(&config, Framework::Perceval, source).await {
                Ok(results) => match results.most_probable() {
                    Some((label, p)) => print_result("Most probable", format!("|{label}⟩ {p:.4}")),
                    None => print_warning("No outcomes reported"),
                },
                Err(e) => print_warning(&format!("{e:#}")),
            }
        }
    }

    println!();
    print_success("Sweep complete!");
    if !args.run {
        print_info("Pass --run to execute each step on the Perceval service");
    }
    Ok(())
}
