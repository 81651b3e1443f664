//! Solve command implementation.

use std::time::Duration;

use anyhow::{Context, Result};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use tracing::debug;

use qsel_qubo::Selection;
use qsel_solve::{Session, SessionConfig, SessionSummary, Solution, SolverRegistry};

use super::common::{OutputFormat, ProblemArgs};

/// Command-line overrides applied on top of the session configuration.
#[derive(Debug, Default)]
pub struct Overrides {
    pub backend: Option<String>,
    pub seed: Option<u64>,
    pub reads: Option<usize>,
}

#[derive(Debug, Serialize)]
struct SolveReport {
    solution: Solution,
    selection: Selection,
    optimum: Selection,
    optimal: bool,
    session: SessionSummary,
}

/// Build the session configuration: file (or default location), then
/// environment, then flags.
pub fn session_config(path: Option<&str>, overrides: Overrides) -> Result<SessionConfig> {
    let mut config = match path {
        Some(path) => SessionConfig::from_yaml_file(path)
            .with_context(|| format!("Failed to load session configuration: {path}"))?
            .apply_env(|key| std::env::var(key).ok())?,
        None => SessionConfig::load().context("Failed to load session configuration")?,
    };
    if let Some(backend) = overrides.backend {
        config.backend = backend;
    }
    if let Some(seed) = overrides.seed {
        config.seed = Some(seed);
    }
    if let Some(reads) = overrides.reads {
        config.reads = Some(reads);
    }
    debug!(?config, "Resolved session configuration");
    Ok(config)
}

/// Execute the solve command.
pub async fn execute(
    problem: &ProblemArgs,
    session_path: Option<&str>,
    overrides: Overrides,
    format: &str,
) -> Result<()> {
    let format = OutputFormat::parse(format)?;
    let compiled = problem.compile()?;
    let config = session_config(session_path, overrides)?;

    let registry = SolverRegistry::with_builtins();
    let mut session = Session::open(config, &registry)?;

    let table = format == OutputFormat::Table;
    if table {
        println!(
            "{} Solving {} items on {}",
            style("→").cyan().bold(),
            compiled.instance.num_items(),
            style(session.backend()).yellow()
        );
    }

    let spinner = if table {
        ProgressBar::new_spinner()
    } else {
        ProgressBar::hidden()
    };
    spinner.set_style(ProgressStyle::default_spinner().template("{spinner:.cyan} {msg}")?);
    spinner.set_message(format!("Minimising {} variables...", compiled.qubo.num_vars()));
    spinner.enable_steady_tick(Duration::from_millis(100));

    let result = session.solve_compiled(&compiled).await;
    spinner.finish_and_clear();
    let (solution, selection) = result?;
    let summary = session.close();

    let optimum = compiled.optimum();
    let optimal = selection.feasible && selection.cost == optimum.cost;

    if !table {
        let report = SolveReport {
            solution,
            selection,
            optimum,
            optimal,
            session: summary,
        };
        println!("{}", format.render(&report)?);
        return Ok(());
    }

    println!(
        "{} Solved in {} ms ({} evaluations)",
        style("✓").green().bold(),
        solution.elapsed_ms,
        solution.evaluations
    );
    println!("  Assignment: {}", style(solution.bitstring()).cyan());
    println!("  Objective:  {}", solution.objective);
    println!(
        "  Selected:   {:?} (cost {})",
        selection.selected, selection.cost
    );
    if !selection.feasible {
        println!(
            "  {} Infeasible: expected exactly {} selected",
            style("!").yellow().bold(),
            compiled.template.select()
        );
    }
    if optimal {
        println!("  Optimal:    {}", style("yes").green());
    } else {
        println!(
            "  Optimal:    {} (cheapest: {:?}, cost {})",
            style("no").red(),
            optimum.selected,
            optimum.cost
        );
    }
    println!("  Session:    {}", style(summary.id).dim());

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_flags_override_file() {
        let mut file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
        writeln!(file, "backend: exhaustive\nseed: 1\nreads: 2").unwrap();
        let path = file.path().to_string_lossy().into_owned();

        let config = session_config(
            Some(&path),
            Overrides {
                backend: Some("anneal".into()),
                seed: None,
                reads: Some(9),
            },
        )
        .unwrap();
        assert_eq!(config.backend, "anneal");
        assert_eq!(config.seed, Some(1));
        assert_eq!(config.reads, Some(9));
    }

    #[test]
    fn test_missing_session_file() {
        let err = session_config(Some("/nonexistent/session.yaml"), Overrides::default())
            .unwrap_err();
        assert!(err.to_string().contains("session configuration"));
    }
}
