//! The solver capability shared by every backend.
//!
//! A backend accepts a [`QuboMatrix`] (or a [`BinaryPolynomial`], which is
//! assembled into one) and returns a bit assignment together with the
//! objective it achieves. Backends do not interpret assignments; deciding
//! whether exactly one item was chosen is the caller's job
//! (see [`qsel_qubo::CompiledProblem::decode`]).
//!
//! ```text
//!   name() / capabilities() ──→ solve(qubo) ──→ Solution
//!        (sync, &ref)              (async)
//! ```

use std::fmt;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use qsel_qubo::{BinaryPolynomial, QuboMatrix};

use crate::error::{SolveError, SolveResult};

/// Static description of what a backend can do.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SolverCapabilities {
    /// Largest number of variables accepted.
    pub max_vars: usize,
    /// Whether the returned assignment is a proven global minimum.
    pub exact: bool,
    /// Whether results depend on a random seed.
    pub stochastic: bool,
}

impl SolverCapabilities {
    /// Reject problems larger than `max_vars`.
    pub fn check(&self, qubo: &QuboMatrix) -> SolveResult<()> {
        if qubo.num_vars() > self.max_vars {
            return Err(SolveError::ProblemTooLarge {
                num_vars: qubo.num_vars(),
                limit: self.max_vars,
            });
        }
        Ok(())
    }
}

/// Result of one solve call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Solution {
    /// Name of the backend that produced it.
    pub solver: String,
    /// Bit per variable, `X_0` first.
    pub assignment: Vec<bool>,
    /// Cost polynomial value (QUBO energy plus offset).
    pub objective: f64,
    /// Number of objective evaluations or spin-flip proposals.
    pub evaluations: u64,
    /// Wall-clock time spent in the backend.
    pub elapsed_ms: u64,
}

impl Solution {
    /// Assignment rendered as `0`/`1`, `X_0` first.
    pub fn bitstring(&self) -> String {
        self.assignment
            .iter()
            .map(|b| if *b { '1' } else { '0' })
            .collect()
    }

    /// Indices set to 1.
    pub fn selected(&self) -> Vec<usize> {
        self.assignment
            .iter()
            .enumerate()
            .filter(|(_, b)| **b)
            .map(|(i, _)| i)
            .collect()
    }
}

impl fmt::Display for Solution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} → {} (objective {})",
            self.solver,
            self.bitstring(),
            self.objective
        )
    }
}

/// A binary quadratic solver backend.
///
/// Implementations MUST be `Send + Sync` so a single instance can serve
/// several tasks, and MUST report an objective computed from the same
/// QUBO they were given (offset included).
#[async_trait]
pub trait QuadraticBinarySolver: Send + Sync {
    /// Backend name.
    fn name(&self) -> &str;

    /// Static capabilities, fixed at construction.
    fn capabilities(&self) -> &SolverCapabilities;

    /// Minimise the QUBO.
    async fn solve(&self, qubo: &QuboMatrix) -> SolveResult<Solution>;

    /// Minimise a degree-2 polynomial by assembling it into a QUBO first.
    async fn solve_polynomial(&self, poly: &BinaryPolynomial) -> SolveResult<Solution> {
        let qubo = QuboMatrix::from_polynomial(poly);
        self.solve(&qubo).await
    }
}

/// Change in energy from flipping bit `k` of `state`.
///
/// `dense` is the upper-triangular matrix from [`QuboMatrix::to_dense`].
pub(crate) fn flip_delta(dense: &[Vec<f64>], state: &[bool], k: usize) -> f64 {
    let mut delta = dense[k][k];
    for (j, on) in state.iter().enumerate() {
        if j == k || !*on {
            continue;
        }
        delta += if k < j { dense[k][j] } else { dense[j][k] };
    }
    if state[k] { -delta } else { delta }
}
