//! Version command implementation.

use console::style;

/// Execute the version command.
pub fn execute() {
    let version = env!("CARGO_PKG_VERSION");

    println!(
        "{} {} - cost-model to QUBO compiler",
        style("qsel").cyan().bold(),
        style(format!("v{version}")).yellow()
    );
    println!();
    println!("Components:");
    println!("  qsel-qubo   Selection templates, polynomial expansion, QUBO and Ising forms");
    println!("  qsel-solve  Solver trait, exhaustive and annealing backends, sessions");
    println!("  qsel-cli    Command-line interface");
    println!();
    println!("License: {}", style(env!("CARGO_PKG_LICENSE")).dim());
}
