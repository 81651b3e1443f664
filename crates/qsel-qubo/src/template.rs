//! The symbolic cost template and its instantiation.
//!
//! A [`SelectionTemplate`] stands for
//!
//! ```text
//! cost(N, C, P) = Σ_i C_i·X_i + P·(Σ_i X_i − k)²
//! ```
//!
//! with `k = 1` for the one-hot case. Expanding the square and folding
//! `X_i² = X_i` gives the closed form
//!
//! ```text
//! Σ_i (C_i + P·(1 − 2k))·X_i + Σ_{i<j} 2P·X_i·X_j + P·k²
//! ```
//!
//! so for `k = 1` every linear coefficient is `C_i − P`, every cross
//! coefficient is `2P` and the constant is `P`.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{QuboError, QuboResult};
use crate::instance::ProblemInstance;
use crate::polynomial::{BinaryPolynomial, LinearForm};
use crate::variable::upper_pairs;

/// How a template is turned into a concrete polynomial.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ExpansionStrategy {
    /// Write the closed-form coefficients directly.
    #[default]
    ClosedForm,
    /// Expand `P·(Σ X_i − k)²` term by term and add the cost form.
    Algebraic,
}

/// "Choose exactly `k` items at minimum total cost."
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectionTemplate {
    select: usize,
}

impl Default for SelectionTemplate {
    fn default() -> Self {
        Self::one_hot()
    }
}

impl SelectionTemplate {
    /// Choose exactly one item.
    pub fn one_hot() -> Self {
        Self { select: 1 }
    }

    /// Choose exactly `k` items.
    pub fn choose(k: usize) -> Self {
        Self { select: k }
    }

    /// Number of items the constraint selects.
    pub fn select(&self) -> usize {
        self.select
    }

    /// Folded coefficient of `X_i` for an item of cost `cost`.
    pub fn linear_coefficient(&self, cost: f64, penalty: f64) -> f64 {
        cost + penalty * (1.0 - 2.0 * self.select as f64)
    }

    /// Coefficient of every `X_i·X_j`, `i != j`.
    pub fn quadratic_coefficient(&self, penalty: f64) -> f64 {
        2.0 * penalty
    }

    /// Constant term `P·k²`.
    pub fn constant(&self, penalty: f64) -> f64 {
        let k = self.select as f64;
        penalty * k * k
    }

    /// Check that `k` items can be chosen out of `n`.
    pub fn check_size(&self, n: usize) -> QuboResult<()> {
        if self.select == 0 || self.select > n {
            return Err(QuboError::InvalidSelectionSize { k: self.select, n });
        }
        Ok(())
    }

    /// Substitute a concrete instance and expand into a polynomial in the
    /// decision variables only.
    pub fn instantiate(
        &self,
        instance: &ProblemInstance,
        strategy: ExpansionStrategy,
    ) -> QuboResult<BinaryPolynomial> {
        let n = instance.num_items();
        self.check_size(n)?;
        debug!(n, k = self.select, ?strategy, "Instantiating selection template");

        match strategy {
            ExpansionStrategy::ClosedForm => Ok(self.closed_form(instance)),
            ExpansionStrategy::Algebraic => self.expand(instance),
        }
    }

    fn closed_form(&self, instance: &ProblemInstance) -> BinaryPolynomial {
        let n = instance.num_items();
        let p = instance.penalty();
        let mut poly = BinaryPolynomial::new(n);

        // Indices come from 0..n, so the range checks cannot fail.
        for (i, &c) in instance.costs().iter().enumerate() {
            let _ = poly.add_linear(i, self.linear_coefficient(c, p));
        }
        let cross = self.quadratic_coefficient(p);
        for (i, j) in upper_pairs(n) {
            let _ = poly.add_product(i, j, cross);
        }
        poly.add_constant(self.constant(p));
        poly
    }

    fn expand(&self, instance: &ProblemInstance) -> QuboResult<BinaryPolynomial> {
        let n = instance.num_items();
        let mut penalty = LinearForm::uniform(n, 1.0, -(self.select as f64)).square();
        penalty.scale(instance.penalty());

        let mut poly = LinearForm::new(instance.costs().to_vec(), 0.0).to_polynomial();
        poly.merge(&penalty)?;
        Ok(poly)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scenario() -> ProblemInstance {
        ProblemInstance::from_costs(vec![4.0, 3.0, 7.0, 2.0, 9.0], 50.0).unwrap()
    }

    #[test]
    fn test_one_hot_coefficients() {
        let t = SelectionTemplate::one_hot();
        assert_eq!(t.linear_coefficient(4.0, 50.0), -46.0);
        assert_eq!(t.quadratic_coefficient(50.0), 100.0);
        assert_eq!(t.constant(50.0), 50.0);
    }

    #[test]
    fn test_closed_form_matches_expansion() {
        let inst = scenario();
        for k in 1..=5 {
            let t = SelectionTemplate::choose(k);
            let closed = t.instantiate(&inst, ExpansionStrategy::ClosedForm).unwrap();
            let expanded = t.instantiate(&inst, ExpansionStrategy::Algebraic).unwrap();
            assert_eq!(closed, expanded, "k = {k}");
        }
    }

    #[test]
    fn test_instantiated_polynomial() {
        let poly = SelectionTemplate::one_hot()
            .instantiate(&scenario(), ExpansionStrategy::ClosedForm)
            .unwrap();
        assert_eq!(poly.linear_terms(), &[-46.0, -47.0, -43.0, -48.0, -41.0]);
        assert_eq!(poly.quadratic(1, 4), 100.0);
        assert_eq!(poly.constant(), 50.0);
    }

    #[test]
    fn test_selection_size() {
        let inst = scenario();
        assert_eq!(
            SelectionTemplate::choose(6).instantiate(&inst, ExpansionStrategy::ClosedForm),
            Err(QuboError::InvalidSelectionSize { k: 6, n: 5 })
        );
        assert!(
            SelectionTemplate::choose(0)
                .instantiate(&inst, ExpansionStrategy::Algebraic)
                .is_err()
        );
    }
}
