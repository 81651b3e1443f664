//! Ising command implementation.

use anyhow::Result;
use console::style;

use super::common::{OutputFormat, ProblemArgs};

/// Execute the ising command.
pub fn execute(problem: &ProblemArgs, format: &str) -> Result<()> {
    let format = OutputFormat::parse(format)?;
    let compiled = problem.compile()?;
    let ising = compiled.qubo.to_ising();

    if format != OutputFormat::Table {
        println!("{}", format.render(&ising)?);
        return Ok(());
    }

    println!(
        "{} Ising form over {} spins (x = (1 - s)/2)",
        style("→").cyan().bold(),
        ising.num_spins()
    );
    println!();
    println!("  {}", style("Local fields").bold());
    for (i, h) in ising.h.iter().enumerate() {
        println!("    h_{i:<4} {h:>12}");
    }
    println!("  {}", style("Couplings").bold());
    for (i, j, c) in ising.couplings() {
        println!("    J_{i},{j:<3} {c:>12}");
    }
    println!();
    println!("  Offset: {}", ising.offset);

    Ok(())
}
