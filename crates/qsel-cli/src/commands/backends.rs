//! Backends command implementation.

use anyhow::Result;
use console::style;

use qsel_solve::{SessionConfig, SolverRegistry};

/// Execute the backends command.
pub fn execute() -> Result<()> {
    println!("{} Available backends:\n", style("qsel").cyan().bold());

    let registry = SolverRegistry::with_builtins();
    for name in registry.names() {
        let solver = registry.create(&SessionConfig::new(name.as_str()))?;
        let caps = solver.capabilities();

        println!(
            "  {} {} {}",
            style("●").green(),
            style(&name).bold(),
            if caps.exact { "(exact)" } else { "(heuristic)" }
        );
        println!("    Max variables: {}", caps.max_vars);
        println!(
            "    Seeded: {}",
            if caps.stochastic { "yes (--seed)" } else { "n/a" }
        );
        println!();
    }

    match SessionConfig::default_path() {
        Some(path) => println!("  Session file: {}", style(path.display()).dim()),
        None => println!("  Session file: {}", style("(no home directory)").dim()),
    }

    Ok(())
}
