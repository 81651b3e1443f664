//! Concrete selection problem instances.

use serde::Serialize;

use crate::error::{QuboError, QuboResult};

/// A concrete instance `{N, C, P}` of the selection problem.
///
/// Construction checks that the cost vector has exactly `N` finite
/// entries and that the penalty is finite. Whether the penalty is large
/// enough is a separate question answered by [`penalty_bound`](Self::penalty_bound).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProblemInstance {
    num_items: usize,
    costs: Vec<f64>,
    penalty: f64,
}

impl ProblemInstance {
    /// Create an instance with `num_items` decision variables.
    pub fn new(num_items: usize, costs: Vec<f64>, penalty: f64) -> QuboResult<Self> {
        if num_items == 0 {
            return Err(QuboError::EmptyProblem);
        }
        if costs.len() != num_items {
            return Err(QuboError::DimensionMismatch {
                expected: num_items,
                actual: costs.len(),
            });
        }
        if let Some((i, c)) = costs.iter().enumerate().find(|(_, c)| !c.is_finite()) {
            return Err(QuboError::NonFiniteValue {
                what: format!("cost C_{i}"),
                value: *c,
            });
        }
        if !penalty.is_finite() {
            return Err(QuboError::NonFiniteValue {
                what: "penalty".into(),
                value: penalty,
            });
        }
        Ok(Self {
            num_items,
            costs,
            penalty,
        })
    }

    /// Create an instance sized by the cost vector.
    pub fn from_costs(costs: Vec<f64>, penalty: f64) -> QuboResult<Self> {
        Self::new(costs.len(), costs, penalty)
    }

    /// Number of decision variables `N`.
    pub fn num_items(&self) -> usize {
        self.num_items
    }

    /// Per-item costs in variable order.
    pub fn costs(&self) -> &[f64] {
        &self.costs
    }

    /// Penalty weight `P`.
    pub fn penalty(&self) -> f64 {
        self.penalty
    }

    /// Sum of all costs.
    pub fn cost_sum(&self) -> f64 {
        self.costs.iter().sum()
    }

    /// The value the penalty has to exceed: `Σ |C_i|`.
    ///
    /// Equals `Σ C_i` when all costs are non-negative. With negative costs
    /// the plain sum is not enough to keep two-hot assignments above the
    /// feasible optimum.
    pub fn penalty_bound(&self) -> f64 {
        self.costs.iter().map(|c| c.abs()).sum()
    }

    /// True when `P > Σ |C_i|` and `P > 0`.
    pub fn penalty_dominates(&self) -> bool {
        self.penalty > 0.0 && self.penalty > self.penalty_bound()
    }

    /// Index and cost of the cheapest item (lowest index on ties).
    pub fn cheapest(&self) -> (usize, f64) {
        self.costs
            .iter()
            .copied()
            .enumerate()
            .fold((0, self.costs[0]), |best, (i, c)| {
                if c < best.1 { (i, c) } else { best }
            })
    }
}
