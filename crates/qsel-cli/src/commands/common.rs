//! Shared helpers for CLI commands.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use clap::Args;
use serde::{Deserialize, Serialize};

use qsel_qubo::{
    CompiledProblem, ExpansionStrategy, PenaltyPolicy, QuboCompiler, SelectionTemplate,
};

/// Problem definition shared by `compile`, `solve` and `ising`.
#[derive(Debug, Clone, Args)]
pub struct ProblemArgs {
    /// Problem file (YAML or JSON) with `costs`, `penalty` and optional `size`, `select`
    #[arg(short, long, conflicts_with = "costs")]
    pub input: Option<String>,

    /// Comma-separated item costs, e.g. 4,3,7,2,9
    #[arg(long, value_delimiter = ',', allow_hyphen_values = true)]
    pub costs: Vec<f64>,

    /// Penalty weight P
    #[arg(short, long, allow_hyphen_values = true)]
    pub penalty: Option<f64>,

    /// Declared number of items (defaults to the number of costs)
    #[arg(long)]
    pub size: Option<usize>,

    /// Number of items to select
    #[arg(long)]
    pub select: Option<usize>,

    /// Penalty expansion (closed-form, algebraic)
    #[arg(long, default_value = "closed-form")]
    pub expansion: String,

    /// Penalty check (enforce, warn, skip)
    #[arg(long, default_value = "enforce")]
    pub penalty_policy: String,
}

/// On-disk problem definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProblemFile {
    /// Declared number of items.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<usize>,
    /// Item costs.
    pub costs: Vec<f64>,
    /// Penalty weight.
    pub penalty: f64,
    /// Items to select (one when absent).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub select: Option<usize>,
}

impl ProblemArgs {
    /// Merge the problem file (if any) with the command-line flags.
    ///
    /// Flags override values read from the file.
    pub fn resolve(&self) -> Result<ProblemFile> {
        let mut problem = match &self.input {
            Some(path) => load_problem(path)?,
            None => {
                if self.costs.is_empty() {
                    anyhow::bail!("No problem given: pass --costs and --penalty, or --input FILE");
                }
                let penalty = self
                    .penalty
                    .ok_or_else(|| anyhow::anyhow!("--penalty is required with --costs"))?;
                ProblemFile {
                    size: None,
                    costs: self.costs.clone(),
                    penalty,
                    select: None,
                }
            }
        };
        if let Some(penalty) = self.penalty {
            problem.penalty = penalty;
        }
        if self.size.is_some() {
            problem.size = self.size;
        }
        if self.select.is_some() {
            problem.select = self.select;
        }
        Ok(problem)
    }

    /// Build the compiler these flags describe.
    pub fn compiler(&self, select: usize) -> Result<QuboCompiler> {
        Ok(QuboCompiler::default()
            .with_template(SelectionTemplate::choose(select))
            .with_expansion(parse_expansion(&self.expansion)?)
            .with_penalty_policy(parse_penalty_policy(&self.penalty_policy)?))
    }

    /// Resolve and compile.
    pub fn compile(&self) -> Result<CompiledProblem> {
        let problem = self.resolve()?;
        let select = problem.select.unwrap_or(1);
        let size = problem.size.unwrap_or(problem.costs.len());
        self.compiler(select)?
            .compile(size, &problem.costs, problem.penalty)
            .context("Failed to compile selection problem")
    }
}

/// Load a problem from a YAML or JSON file.
pub fn load_problem(path: &str) -> Result<ProblemFile> {
    let path_obj = Path::new(path);

    if !path_obj.exists() {
        anyhow::bail!("File not found: {path}");
    }

    let source =
        fs::read_to_string(path).with_context(|| format!("Failed to read file: {path}"))?;

    let ext = path_obj.extension().and_then(|e| e.to_str()).unwrap_or("");

    match ext.to_lowercase().as_str() {
        "json" => serde_json::from_str(&source)
            .with_context(|| format!("Failed to parse JSON problem: {path}")),
        _ => serde_yaml_ng::from_str(&source)
            .with_context(|| format!("Failed to parse YAML problem: {path}")),
    }
}

/// Parse an expansion strategy name.
pub fn parse_expansion(name: &str) -> Result<ExpansionStrategy> {
    match name.to_lowercase().as_str() {
        "closed-form" | "closed" => Ok(ExpansionStrategy::ClosedForm),
        "algebraic" | "expand" => Ok(ExpansionStrategy::Algebraic),
        other => anyhow::bail!("Unknown expansion: '{other}'. Available: closed-form, algebraic"),
    }
}

/// Parse a penalty policy name.
pub fn parse_penalty_policy(name: &str) -> Result<PenaltyPolicy> {
    match name.to_lowercase().as_str() {
        "enforce" => Ok(PenaltyPolicy::Enforce),
        "warn" => Ok(PenaltyPolicy::Warn),
        "skip" => Ok(PenaltyPolicy::Skip),
        other => anyhow::bail!("Unknown penalty policy: '{other}'. Available: enforce, warn, skip"),
    }
}

/// Output format for command results.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Table,
    Json,
    Yaml,
}

impl OutputFormat {
    /// Parse a format name.
    pub fn parse(name: &str) -> Result<Self> {
        match name.to_lowercase().as_str() {
            "table" | "text" => Ok(Self::Table),
            "json" => Ok(Self::Json),
            "yaml" | "yml" => Ok(Self::Yaml),
            other => anyhow::bail!("Unknown format: '{other}'. Available: table, json, yaml"),
        }
    }

    /// Serialize `value` in this format. `Table` falls back to YAML.
    pub fn render<T: Serialize>(self, value: &T) -> Result<String> {
        match self {
            Self::Json => {
                serde_json::to_string_pretty(value).context("Failed to serialize result as JSON")
            }
            Self::Table | Self::Yaml => {
                serde_yaml_ng::to_string(value).context("Failed to serialize result as YAML")
            }
        }
    }
}
