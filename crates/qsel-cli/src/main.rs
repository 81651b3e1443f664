//! qsel Command-Line Interface
//!
//! Compiles "choose the cheapest item" selection problems into QUBO form
//! and solves them on the reference backends.
//!
//! ```text
//!   costs, penalty ──→ compile ──→ QUBO ──→ solve ──→ selection
//!                                   │
//!                                   └──→ ising
//! ```

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

use clap::{Parser, Subcommand};
use console::style;
use tracing_subscriber::EnvFilter;

mod commands;

use commands::common::ProblemArgs;
use commands::{backends, compile, ising, solve, version};

/// qsel - compile selection cost models to QUBO and solve them
#[derive(Parser)]
#[command(name = "qsel")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compile a selection problem into a QUBO map
    Compile {
        #[command(flatten)]
        problem: ProblemArgs,

        /// Output format (table, json, yaml)
        #[arg(short, long, default_value = "table")]
        format: String,

        /// Write the QUBO document to a file instead of stdout
        #[arg(short, long)]
        output: Option<String>,
    },

    /// Compile and solve a selection problem
    Solve {
        #[command(flatten)]
        problem: ProblemArgs,

        /// Backend to use (exhaustive, anneal)
        #[arg(short, long)]
        backend: Option<String>,

        /// Session configuration file (YAML)
        #[arg(long)]
        session: Option<String>,

        /// RNG seed for stochastic backends
        #[arg(long)]
        seed: Option<u64>,

        /// Number of annealing reads
        #[arg(long)]
        reads: Option<usize>,

        /// Output format (table, json, yaml)
        #[arg(short, long, default_value = "table")]
        format: String,
    },

    /// Print the Ising form of a selection problem
    Ising {
        #[command(flatten)]
        problem: ProblemArgs,

        /// Output format (table, json, yaml)
        #[arg(short, long, default_value = "table")]
        format: String,
    },

    /// List available backends
    Backends,

    /// Show version information
    Version,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let result = match cli.command {
        Commands::Compile {
            problem,
            format,
            output,
        } => compile::execute(&problem, &format, output.as_deref()),

        Commands::Solve {
            problem,
            backend,
            session,
            seed,
            reads,
            format,
        } => {
            let overrides = solve::Overrides {
                backend,
                seed,
                reads,
            };
            solve::execute(&problem, session.as_deref(), overrides, &format).await
        }

        Commands::Ising { problem, format } => ising::execute(&problem, &format),

        Commands::Backends => backends::execute(),

        Commands::Version => {
            version::execute();
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("{} {:#}", style("Error:").red().bold(), e);
        std::process::exit(1);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(args).unwrap()
    }

    #[test]
    fn test_parse_compile_inline() {
        let cli = parse(&["qsel", "compile", "--costs", "4,3,7,2,9", "--penalty", "50"]);
        match cli.command {
            Commands::Compile {
                problem, format, ..
            } => {
                assert_eq!(problem.costs, vec![4.0, 3.0, 7.0, 2.0, 9.0]);
                assert_eq!(problem.penalty, Some(50.0));
                assert_eq!(format, "table");
            }
            _ => panic!("expected compile"),
        }
    }

    #[test]
    fn test_parse_negative_costs() {
        let cli = parse(&["qsel", "compile", "--costs", "-1,2.5", "--penalty", "-3"]);
        match cli.command {
            Commands::Compile { problem, .. } => {
                assert_eq!(problem.costs, vec![-1.0, 2.5]);
                assert_eq!(problem.penalty, Some(-3.0));
            }
            _ => panic!("expected compile"),
        }
    }

    #[test]
    fn test_parse_solve_options() {
        let cli = parse(&[
            "qsel", "solve", "-i", "problem.yaml", "-b", "anneal", "--seed", "7", "--reads", "3",
            "-f", "json",
        ]);
        match cli.command {
            Commands::Solve {
                problem,
                backend,
                seed,
                reads,
                format,
                session,
            } => {
                assert_eq!(problem.input.as_deref(), Some("problem.yaml"));
                assert_eq!(backend.as_deref(), Some("anneal"));
                assert_eq!(seed, Some(7));
                assert_eq!(reads, Some(3));
                assert_eq!(format, "json");
                assert!(session.is_none());
            }
            _ => panic!("expected solve"),
        }
    }

    #[test]
    fn test_input_conflicts_with_costs() {
        let result = Cli::try_parse_from([
            "qsel", "compile", "-i", "p.yaml", "--costs", "1,2", "--penalty", "9",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_parse_verbose() {
        let cli = parse(&["qsel", "-vv", "backends"]);
        assert_eq!(cli.verbose, 2);
        assert!(matches!(cli.command, Commands::Backends));
    }

    #[test]
    fn test_verify_cli() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
