//! Degree-2 polynomials over binary decision variables.
//!
//! Every variable lives in {0, 1}, so `X_i² = X_i`. [`BinaryPolynomial`]
//! applies that reduction on insertion: a product of a variable with
//! itself lands on the linear coefficient of that variable, never on a
//! quadratic slot. Cross terms are stored once per unordered pair with
//! the smaller index first.
//!
//! # Example
//!
//! ```rust
//! use qsel_qubo::polynomial::LinearForm;
//!
//! // (X_0 + X_1 - 1)² = -X_0 - X_1 + 2·X_0·X_1 + 1
//! let p = LinearForm::uniform(2, 1.0, -1.0).square();
//! assert_eq!(p.linear(0), -1.0);
//! assert_eq!(p.quadratic(0, 1), 2.0);
//! assert_eq!(p.constant(), 1.0);
//! ```

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{QuboError, QuboResult};
use crate::variable::VarId;

/// A polynomial of total degree at most 2 over `num_vars` binary variables.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BinaryPolynomial {
    num_vars: usize,
    constant: f64,
    /// Folded linear coefficients, one per variable.
    linear: Vec<f64>,
    /// Cross coefficients keyed by `(i, j)` with `i < j`.
    #[serde(with = "crate::variable::pair_map")]
    quadratic: BTreeMap<(usize, usize), f64>,
}

impl BinaryPolynomial {
    /// The zero polynomial over `num_vars` variables.
    pub fn new(num_vars: usize) -> Self {
        Self {
            num_vars,
            constant: 0.0,
            linear: vec![0.0; num_vars],
            quadratic: BTreeMap::new(),
        }
    }

    /// Number of decision variables.
    pub fn num_vars(&self) -> usize {
        self.num_vars
    }

    /// Add to the constant term.
    pub fn add_constant(&mut self, value: f64) {
        self.constant += value;
    }

    /// Add `coeff · X_var`.
    pub fn add_linear(&mut self, var: impl Into<VarId>, coeff: f64) -> QuboResult<()> {
        let var = self.check(var.into())?;
        self.linear[var] += coeff;
        Ok(())
    }

    /// Add `coeff · X_a · X_b`.
    ///
    /// When `a == b` the term is folded into the linear coefficient of `a`.
    pub fn add_product(
        &mut self,
        a: impl Into<VarId>,
        b: impl Into<VarId>,
        coeff: f64,
    ) -> QuboResult<()> {
        let a = self.check(a.into())?;
        let b = self.check(b.into())?;
        self.linear_or_cross(a, b, coeff);
        Ok(())
    }

    fn linear_or_cross(&mut self, i: usize, j: usize, coeff: f64) {
        if i == j {
            self.linear[i] += coeff;
        } else {
            *self.quadratic.entry((i.min(j), i.max(j))).or_insert(0.0) += coeff;
        }
    }

    /// Multiply every coefficient, including the constant, by `factor`.
    pub fn scale(&mut self, factor: f64) {
        self.constant *= factor;
        for c in &mut self.linear {
            *c *= factor;
        }
        for c in self.quadratic.values_mut() {
            *c *= factor;
        }
    }

    /// Add `other` into `self`.
    pub fn merge(&mut self, other: &Self) -> QuboResult<()> {
        if other.num_vars != self.num_vars {
            return Err(QuboError::DimensionMismatch {
                expected: self.num_vars,
                actual: other.num_vars,
            });
        }
        self.constant += other.constant;
        for (c, o) in self.linear.iter_mut().zip(&other.linear) {
            *c += o;
        }
        for (&pair, &c) in &other.quadratic {
            *self.quadratic.entry(pair).or_insert(0.0) += c;
        }
        Ok(())
    }

    /// The constant term.
    pub fn constant(&self) -> f64 {
        self.constant
    }

    /// Coefficient of the degree-1 monomial `X_i` (0 when out of range).
    pub fn linear(&self, i: usize) -> f64 {
        self.linear.get(i).copied().unwrap_or(0.0)
    }

    /// Coefficient of `X_i · X_j` for `i != j`, in either order.
    ///
    /// Returns 0 for `i == j`: squares are stored on the linear slot.
    pub fn quadratic(&self, i: usize, j: usize) -> f64 {
        if i == j {
            return 0.0;
        }
        self.quadratic
            .get(&(i.min(j), i.max(j)))
            .copied()
            .unwrap_or(0.0)
    }

    /// All linear coefficients in variable order.
    pub fn linear_terms(&self) -> &[f64] {
        &self.linear
    }

    /// Stored cross terms, ordered by `(i, j)`.
    pub fn quadratic_terms(&self) -> impl Iterator<Item = ((usize, usize), f64)> + '_ {
        self.quadratic.iter().map(|(&k, &v)| (k, v))
    }

    /// Highest degree with a non-zero coefficient.
    pub fn degree(&self) -> usize {
        if self.quadratic.values().any(|c| *c != 0.0) {
            2
        } else if self.linear.iter().any(|c| *c != 0.0) {
            1
        } else {
            0
        }
    }

    /// Evaluate at a bit assignment.
    pub fn evaluate(&self, assignment: &[bool]) -> QuboResult<f64> {
        if assignment.len() != self.num_vars {
            return Err(QuboError::AssignmentLength {
                expected: self.num_vars,
                actual: assignment.len(),
            });
        }
        let linear: f64 = self
            .linear
            .iter()
            .zip(assignment)
            .filter(|(_, x)| **x)
            .map(|(c, _)| c)
            .sum();
        let quadratic: f64 = self
            .quadratic
            .iter()
            .filter(|((i, j), _)| assignment[*i] && assignment[*j])
            .map(|(_, c)| c)
            .sum();
        Ok(self.constant + linear + quadratic)
    }

    fn check(&self, var: VarId) -> QuboResult<usize> {
        if var.0 < self.num_vars {
            Ok(var.0)
        } else {
            Err(QuboError::VariableOutOfRange {
                index: var.0,
                num_vars: self.num_vars,
            })
        }
    }
}

impl fmt::Display for BinaryPolynomial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let linear = self
            .linear
            .iter()
            .enumerate()
            .map(|(i, c)| (*c, VarId(i).to_string()));
        let quadratic = self
            .quadratic
            .iter()
            .map(|(&(i, j), c)| (*c, format!("{}·{}", VarId(i), VarId(j))));

        let mut first = true;
        for (coeff, monomial) in linear.chain(quadratic) {
            if coeff == 0.0 {
                continue;
            }
            write_signed(f, coeff, first)?;
            if coeff.abs() != 1.0 {
                write!(f, "{}·", coeff.abs())?;
            }
            write!(f, "{monomial}")?;
            first = false;
        }

        if self.constant != 0.0 {
            write_signed(f, self.constant, first)?;
            write!(f, "{}", self.constant.abs())?;
            first = false;
        }
        if first {
            write!(f, "0")?;
        }
        Ok(())
    }
}

fn write_signed(f: &mut fmt::Formatter<'_>, coeff: f64, first: bool) -> fmt::Result {
    match (first, coeff < 0.0) {
        (true, true) => write!(f, "-"),
        (true, false) => Ok(()),
        (false, true) => write!(f, " - "),
        (false, false) => write!(f, " + "),
    }
}

/// An affine form `Σ a_i·X_i + b`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinearForm {
    /// Coefficient `a_i` per variable.
    pub coeffs: Vec<f64>,
    /// The constant `b`.
    pub constant: f64,
}

impl LinearForm {
    /// Create from explicit coefficients.
    pub fn new(coeffs: Vec<f64>, constant: f64) -> Self {
        Self { coeffs, constant }
    }

    /// `coeff · Σ X_i + constant` over `num_vars` variables.
    pub fn uniform(num_vars: usize, coeff: f64, constant: f64) -> Self {
        Self::new(vec![coeff; num_vars], constant)
    }

    /// Number of variables.
    pub fn num_vars(&self) -> usize {
        self.coeffs.len()
    }

    /// The form as a degree-1 polynomial.
    pub fn to_polynomial(&self) -> BinaryPolynomial {
        let mut p = BinaryPolynomial::new(self.num_vars());
        p.linear.clone_from(&self.coeffs);
        p.constant = self.constant;
        p
    }

    /// Expand `(Σ a_i·X_i + b)²` term by term, reducing `X_i² = X_i`.
    pub fn square(&self) -> BinaryPolynomial {
        let n = self.num_vars();
        let mut p = BinaryPolynomial::new(n);
        for (i, a) in self.coeffs.iter().enumerate() {
            for (j, b) in self.coeffs.iter().enumerate() {
                p.linear_or_cross(i, j, a * b);
            }
            p.linear[i] += 2.0 * self.constant * a;
        }
        p.constant = self.constant * self.constant;
        p
    }
}
