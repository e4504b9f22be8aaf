//! Element Catalog Demo
//!
//! Prints every optical element with its defaults, arity and framework
//! coverage.

use clap::Parser;
use lumen_demos::{print_header, print_result, print_section};
use lumen_ir::{Arity, Framework, OperationKind, parameter_display_name};

#[derive(Parser, Debug)]
#[command(name = "demo-catalog")]
#[command(about = "Show the optical element catalog")]
struct Args {
    /// Include the reference documentation of each element
    #[arg(long)]
    docs: bool,
}

fn main() {
    let args = Args::parse();

    print_header("Optical Element Catalog");

    for kind in OperationKind::ALL {
        print_section(&format!("{} ({})", kind.label(), kind.symbol()));
        print_result("Description", kind.description());
        print_result(
            "Arity",
            match kind.arity() {
                Arity::SingleMode => "single mode",
                Arity::DualMode => "mode and its right neighbour",
            },
        );
        for (key, value) in kind.parameter_defaults() {
            print_result(&format!("Default {}", parameter_display_name(key)), value);
        }
        let frameworks: Vec<&str> = Framework::ALL
            .into_iter()
            .filter(|f| kind.supported_by(*f))
            .map(Framework::display_name)
            .collect();
        print_result(
            "Supported by",
            if frameworks.is_empty() {
                "none".to_string()
            } else {
                frameworks.join(", ")
            },
        );

        if args.docs {
            for section in kind.documentation() {
                println!();
                println!("  {}", section.title);
                println!("  {}", section.content);
                if let Some(formula) = section.formula {
                    println!("    {formula}");
                }
            }
        }
    }
}
