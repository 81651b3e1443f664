//! Coefficient extraction from an expanded polynomial.

use serde::{Deserialize, Serialize};

use crate::polynomial::BinaryPolynomial;
use crate::variable::upper_pairs;

/// Dense linear and quadratic coefficients read off a polynomial.
///
/// Every `X_i` and every pair `(i, j)`, `i < j`, has exactly one entry,
/// zeros included.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Coefficients {
    /// Linear coefficient of each `X_i` (squares already folded in).
    pub linear: Vec<f64>,
    /// `(i, j, coeff)` for every `i < j`, in lexicographic order.
    pub quadratic: Vec<(usize, usize, f64)>,
}

impl Coefficients {
    /// Number of decision variables.
    pub fn num_vars(&self) -> usize {
        self.linear.len()
    }
}

/// Query every monomial coefficient of `poly`.
pub fn extract(poly: &BinaryPolynomial) -> Coefficients {
    let n = poly.num_vars();
    let linear = (0..n).map(|i| poly.linear(i)).collect();
    let quadratic = upper_pairs(n)
        .map(|(i, j)| (i, j, poly.quadratic(i, j)))
        .collect();
    Coefficients { linear, quadratic }
}
