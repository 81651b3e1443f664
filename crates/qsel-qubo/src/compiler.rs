//! End-to-end compilation: `{N, C, P}` → polynomial → QUBO map.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{QuboError, QuboResult};
use crate::extract::{Coefficients, extract};
use crate::instance::ProblemInstance;
use crate::polynomial::BinaryPolynomial;
use crate::qubo::QuboMatrix;
use crate::template::{ExpansionStrategy, SelectionTemplate};

/// What to do when the penalty does not dominate the costs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PenaltyPolicy {
    /// Fail with [`QuboError::InvalidPenalty`].
    #[default]
    Enforce,
    /// Log a warning and compile anyway.
    Warn,
    /// Do not check.
    Skip,
}

/// Compiler options.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct CompileOptions {
    /// Cost template (one-hot by default).
    #[serde(default)]
    pub template: SelectionTemplate,
    /// Expansion strategy for the penalty square.
    #[serde(default)]
    pub expansion: ExpansionStrategy,
    /// Penalty precondition handling.
    #[serde(default)]
    pub penalty_policy: PenaltyPolicy,
}

/// Stateless QUBO compiler.
#[derive(Debug, Clone, Default)]
pub struct QuboCompiler {
    options: CompileOptions,
}

impl QuboCompiler {
    /// Create a compiler with the given options.
    pub fn new(options: CompileOptions) -> Self {
        Self { options }
    }

    /// Select `k` items instead of one.
    pub fn with_template(mut self, template: SelectionTemplate) -> Self {
        self.options.template = template;
        self
    }

    /// Set the expansion strategy.
    pub fn with_expansion(mut self, expansion: ExpansionStrategy) -> Self {
        self.options.expansion = expansion;
        self
    }

    /// Set the penalty policy.
    pub fn with_penalty_policy(mut self, policy: PenaltyPolicy) -> Self {
        self.options.penalty_policy = policy;
        self
    }

    /// The active options.
    pub fn options(&self) -> &CompileOptions {
        &self.options
    }

    /// Compile `N` items with costs `C` and penalty `P`.
    pub fn compile(&self, n: usize, costs: &[f64], penalty: f64) -> QuboResult<CompiledProblem> {
        let instance = ProblemInstance::new(n, costs.to_vec(), penalty)?;
        self.compile_instance(instance)
    }

    /// Compile an already validated instance.
    pub fn compile_instance(&self, instance: ProblemInstance) -> QuboResult<CompiledProblem> {
        self.check_penalty(&instance)?;

        let template = self.options.template;
        let polynomial = template.instantiate(&instance, self.options.expansion)?;
        let coefficients = extract(&polynomial);
        let qubo = QuboMatrix::assemble(&coefficients, polynomial.constant());

        debug!(
            n = instance.num_items(),
            entries = qubo.len(),
            offset = qubo.offset(),
            "Compiled selection QUBO"
        );

        Ok(CompiledProblem {
            instance,
            template,
            polynomial,
            coefficients,
            qubo,
        })
    }

    fn check_penalty(&self, instance: &ProblemInstance) -> QuboResult<()> {
        if instance.penalty_dominates() {
            return Ok(());
        }
        let penalty = instance.penalty();
        let bound = instance.penalty_bound();
        match self.options.penalty_policy {
            PenaltyPolicy::Enforce => Err(QuboError::InvalidPenalty { penalty, bound }),
            PenaltyPolicy::Warn => {
                warn!(
                    penalty,
                    bound, "Penalty does not dominate the costs; the optimum may be infeasible"
                );
                Ok(())
            }
            PenaltyPolicy::Skip => Ok(()),
        }
    }
}

/// Compile with default options (one-hot, closed form, enforced penalty).
pub fn compile(n: usize, costs: &[f64], penalty: f64) -> QuboResult<CompiledProblem> {
    QuboCompiler::default().compile(n, costs, penalty)
}

/// Output of one compilation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompiledProblem {
    /// The validated instance.
    pub instance: ProblemInstance,
    /// The template it was compiled with.
    pub template: SelectionTemplate,
    /// Canonical polynomial over `X_0..X_{N-1}`.
    pub polynomial: BinaryPolynomial,
    /// Dense coefficients read off the polynomial.
    pub coefficients: Coefficients,
    /// QUBO map handed to solver backends.
    pub qubo: QuboMatrix,
}

impl CompiledProblem {
    /// Interpret a solver's bit assignment.
    pub fn decode(&self, assignment: &[bool]) -> QuboResult<Selection> {
        let objective = self.qubo.objective(assignment)?;
        let selected: Vec<usize> = assignment
            .iter()
            .enumerate()
            .filter(|(_, x)| **x)
            .map(|(i, _)| i)
            .collect();
        let cost = selected.iter().map(|&i| self.instance.costs()[i]).sum();
        Ok(Selection {
            feasible: selected.len() == self.template.select(),
            selected,
            cost,
            objective,
        })
    }

    /// Cheapest feasible selection, by sorting costs.
    ///
    /// Ties resolve to the lower index.
    pub fn optimum(&self) -> Selection {
        let costs = self.instance.costs();
        let mut order: Vec<usize> = (0..costs.len()).collect();
        order.sort_by(|&a, &b| costs[a].total_cmp(&costs[b]).then(a.cmp(&b)));
        let mut selected: Vec<usize> = order.into_iter().take(self.template.select()).collect();
        selected.sort_unstable();
        let cost: f64 = selected.iter().map(|&i| costs[i]).sum();
        Selection {
            feasible: true,
            selected,
            cost,
            objective: cost,
        }
    }
}

/// A decoded assignment.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Selection {
    /// Indices set to 1.
    pub selected: Vec<usize>,
    /// Whether exactly `k` items are selected.
    pub feasible: bool,
    /// Sum of the selected costs.
    pub cost: f64,
    /// Polynomial value at the assignment.
    pub objective: f64,
}
