//! Compile command implementation.

use std::fs;

use anyhow::{Context, Result};
use console::style;
use serde::Serialize;

use qsel_qubo::{CompiledProblem, QuboDocument};

use super::common::{OutputFormat, ProblemArgs};

/// Serialized result of a compilation.
#[derive(Debug, Serialize)]
struct CompileReport {
    num_items: usize,
    select: usize,
    penalty: f64,
    polynomial: String,
    qubo: QuboDocument,
}

impl CompileReport {
    fn new(compiled: &CompiledProblem) -> Self {
        Self {
            num_items: compiled.instance.num_items(),
            select: compiled.template.select(),
            penalty: compiled.instance.penalty(),
            polynomial: compiled.polynomial.to_string(),
            qubo: compiled.qubo.to_document(),
        }
    }
}

/// Execute the compile command.
pub fn execute(problem: &ProblemArgs, format: &str, output: Option<&str>) -> Result<()> {
    let format = OutputFormat::parse(format)?;
    let compiled = problem.compile()?;
    let report = CompileReport::new(&compiled);

    if let Some(path) = output {
        let text = format.render(&report.qubo)?;
        fs::write(path, text).with_context(|| format!("Failed to write output: {path}"))?;
        println!(
            "{} Compiled {} items into {} QUBO entries",
            style("✓").green().bold(),
            report.num_items,
            compiled.qubo.len()
        );
        println!("  Output: {}", style(path).green());
        return Ok(());
    }

    match format {
        OutputFormat::Table => print_table(&compiled),
        _ => println!("{}", format.render(&report)?),
    }
    Ok(())
}

fn print_table(compiled: &CompiledProblem) {
    let instance = &compiled.instance;
    println!(
        "{} Selecting {} of {} items (P = {})",
        style("→").cyan().bold(),
        compiled.template.select(),
        instance.num_items(),
        instance.penalty()
    );
    println!("  Cost: {}", compiled.polynomial);
    println!();

    let header = format!("{:>4} {:>4} {:>12}", "i", "j", "Q_ij");
    println!("  {}", style(header).bold());
    for ((i, j), q) in compiled.qubo.entries() {
        let value = format!("{q:>12}");
        let value = if i == j {
            style(value).cyan()
        } else {
            style(value).dim()
        };
        println!("  {i:>4} {j:>4} {value}");
    }
    println!();
    println!("  Entries: {}", compiled.qubo.len());
    println!("  Offset:  {}", compiled.qubo.offset());
}
