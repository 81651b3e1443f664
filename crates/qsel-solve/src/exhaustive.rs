//! Exhaustive enumeration backend.

use std::time::Instant;

use async_trait::async_trait;
use tracing::{debug, instrument};

use qsel_qubo::QuboMatrix;

use crate::error::{SolveError, SolveResult};
use crate::solver::{QuadraticBinarySolver, Solution, SolverCapabilities, flip_delta};

/// Default variable limit: 2^24 assignments.
pub const DEFAULT_MAX_VARS: usize = 24;

/// Largest `N` whose assignment count `2^N` fits the step counter.
pub const MAX_ENUMERABLE_VARS: usize = 63;

/// Relative tolerance under which two running energies count as tied.
const TIE_TOLERANCE: f64 = 1e-9;

/// Exact solver that walks all `2^N` assignments.
///
/// Assignments are visited in Gray-code order so each step costs one
/// incremental flip instead of a full evaluation. Among equal minima the
/// one with the smallest binary value (`X_0` as least significant bit)
/// wins, so results are deterministic.
#[derive(Debug, Clone)]
pub struct ExhaustiveSolver {
    name: String,
    capabilities: SolverCapabilities,
}

impl ExhaustiveSolver {
    /// Create a solver with the default limit.
    pub fn new() -> Self {
        Self::with_max_vars(DEFAULT_MAX_VARS)
    }

    /// Create a solver accepting at most `max_vars` variables.
    ///
    /// The limit is clamped to [`MAX_ENUMERABLE_VARS`].
    pub fn with_max_vars(max_vars: usize) -> Self {
        Self {
            name: "exhaustive".into(),
            capabilities: SolverCapabilities {
                max_vars: max_vars.min(MAX_ENUMERABLE_VARS),
                exact: true,
                stochastic: false,
            },
        }
    }

    #[instrument(skip(self, qubo), fields(n = qubo.num_vars()))]
    fn enumerate(&self, qubo: &QuboMatrix) -> SolveResult<Solution> {
        let start = Instant::now();
        let n = qubo.num_vars();
        let total = u32::try_from(n)
            .ok()
            .and_then(|bits| 1u64.checked_shl(bits))
            .filter(|_| n <= MAX_ENUMERABLE_VARS)
            .ok_or(SolveError::ProblemTooLarge {
                num_vars: n,
                limit: MAX_ENUMERABLE_VARS,
            })?;
        let dense = qubo.to_dense();

        // Energies closer than this are ties; the smaller binary value wins.
        let scale: f64 = dense.iter().flatten().map(|c| c.abs()).sum();
        let tolerance = TIE_TOLERANCE * scale.max(1.0);

        let mut state = vec![false; n];
        let mut energy = 0.0;
        let mut best_state = state.clone();
        let mut best_energy = energy;
        let mut best_value = 0u64;
        let mut value = 0u64;

        for step in 1..total {
            // Gray code: flip the lowest set bit of the step counter.
            let k = step.trailing_zeros() as usize;
            energy += flip_delta(&dense, &state, k);
            state[k] = !state[k];
            value ^= 1 << k;

            let improves = energy < best_energy - tolerance;
            let ties = !improves && energy <= best_energy + tolerance && value < best_value;
            if improves || ties {
                best_energy = energy;
                best_value = value;
                best_state.clone_from(&state);
            }
        }

        // Recompute exactly; the running sum accumulates rounding error.
        let objective = qubo.objective(&best_state)?;
        let elapsed = start.elapsed();
        debug!("Enumerated {} assignments in {:?}", total, elapsed);

        Ok(Solution {
            solver: self.name.clone(),
            assignment: best_state,
            objective,
            evaluations: total,
            elapsed_ms: elapsed.as_millis() as u64,
        })
    }
}

impl Default for ExhaustiveSolver {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl QuadraticBinarySolver for ExhaustiveSolver {
    fn name(&self) -> &str {
        &self.name
    }

    fn capabilities(&self) -> &SolverCapabilities {
        &self.capabilities
    }

    async fn solve(&self, qubo: &QuboMatrix) -> SolveResult<Solution> {
        self.capabilities.check(qubo)?;
        self.enumerate(qubo)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SolveError;

    #[tokio::test]
    async fn test_scenario_minimum() {
        let compiled = qsel_qubo::compile(5, &[4.0, 3.0, 7.0, 2.0, 9.0], 50.0).unwrap();
        let solution = ExhaustiveSolver::new().solve(&compiled.qubo).await.unwrap();
        assert_eq!(solution.bitstring(), "00010");
        assert_eq!(solution.objective, 2.0);
        assert_eq!(solution.evaluations, 32);
    }

    #[tokio::test]
    async fn test_ties_resolve_to_lowest_value() {
        let compiled = qsel_qubo::compile(3, &[5.0, 1.0, 1.0], 20.0).unwrap();
        let solution = ExhaustiveSolver::new().solve(&compiled.qubo).await.unwrap();
        assert_eq!(solution.selected(), vec![1]);
    }

    #[tokio::test]
    async fn test_fractional_ties_resolve_to_lowest_value() {
        for n in [2, 3, 4, 5, 8, 12] {
            for base in [0.1, 0.3, 0.35, 0.7, 1.1, 2.9] {
                let mut costs = vec![5.0; n];
                costs[n - 2] = base;
                costs[n - 1] = base;
                let penalty = costs.iter().sum::<f64>() + 1.37;
                let compiled = qsel_qubo::compile(n, &costs, penalty).unwrap();
                let solution = ExhaustiveSolver::new().solve(&compiled.qubo).await.unwrap();
                assert_eq!(solution.selected(), vec![n - 2], "n = {n}, base = {base}");
            }
        }
    }

    #[test]
    fn test_max_vars_clamped() {
        let solver = ExhaustiveSolver::with_max_vars(64);
        assert_eq!(solver.capabilities().max_vars, MAX_ENUMERABLE_VARS);
    }

    #[tokio::test]
    async fn test_too_large() {
        let costs = vec![1.0; 6];
        let compiled = qsel_qubo::compile(6, &costs, 10.0).unwrap();
        let result = ExhaustiveSolver::with_max_vars(5).solve(&compiled.qubo).await;
        assert!(matches!(
            result,
            Err(SolveError::ProblemTooLarge {
                num_vars: 6,
                limit: 5
            })
        ));
    }

    #[tokio::test]
    async fn test_solve_polynomial() {
        let compiled = qsel_qubo::compile(4, &[3.0, 1.0, 2.0, 4.0], 20.0).unwrap();
        let solution = ExhaustiveSolver::new()
            .solve_polynomial(&compiled.polynomial)
            .await
            .unwrap();
        assert_eq!(solution.selected(), vec![1]);
        assert_eq!(solution.objective, 1.0);
    }
}
