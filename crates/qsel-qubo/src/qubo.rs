//! The canonical QUBO coefficient map.
//!
//! Keys are `(i, j)` with `i <= j`. A diagonal key `(i, i)` holds the
//! linear coefficient of `X_i` (with `X_i²` already folded in); an
//! off-diagonal key holds the coefficient of `X_i·X_j`. This is the
//! upper-triangular convention binary quadratic solvers expect, so the
//! map can be handed to any backend unchanged.
//!
//! The constant term of the cost polynomial is carried as
//! [`offset`](QuboMatrix::offset) and never stored as an entry.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{QuboError, QuboResult};
use crate::extract::{Coefficients, extract};
use crate::polynomial::BinaryPolynomial;
use crate::variable::qubo_entry_count;

/// Upper-triangular QUBO map with folded diagonal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(into = "QuboDocument", try_from = "QuboDocument")]
pub struct QuboMatrix {
    num_vars: usize,
    entries: BTreeMap<(usize, usize), f64>,
    offset: f64,
}

impl QuboMatrix {
    /// Merge linear coefficients (diagonal) and cross coefficients
    /// (off-diagonal) into one map.
    pub fn assemble(coefficients: &Coefficients, offset: f64) -> Self {
        let mut entries = BTreeMap::new();
        for (i, &c) in coefficients.linear.iter().enumerate() {
            entries.insert((i, i), c);
        }
        for &(i, j, c) in &coefficients.quadratic {
            entries.insert((i.min(j), i.max(j)), c);
        }
        Self {
            num_vars: coefficients.num_vars(),
            entries,
            offset,
        }
    }

    /// Extract and assemble in one step.
    pub fn from_polynomial(poly: &BinaryPolynomial) -> Self {
        Self::assemble(&extract(poly), poly.constant())
    }

    /// Number of decision variables.
    pub fn num_vars(&self) -> usize {
        self.num_vars
    }

    /// Constant term dropped from the entries.
    pub fn offset(&self) -> f64 {
        self.offset
    }

    /// Number of stored entries (`N + N(N−1)/2` when assembled densely).
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True if there are no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Coefficient for the unordered pair `{i, j}`.
    pub fn get(&self, i: usize, j: usize) -> Option<f64> {
        self.entries.get(&(i.min(j), i.max(j))).copied()
    }

    /// All entries ordered by key.
    pub fn entries(&self) -> impl Iterator<Item = ((usize, usize), f64)> + '_ {
        self.entries.iter().map(|(&k, &v)| (k, v))
    }

    /// Diagonal (linear) coefficients in variable order.
    pub fn diagonal(&self) -> Vec<f64> {
        (0..self.num_vars)
            .map(|i| self.get(i, i).unwrap_or(0.0))
            .collect()
    }

    /// `Σ_{i<=j} Q_ij·x_i·x_j`, without the offset.
    pub fn energy(&self, assignment: &[bool]) -> QuboResult<f64> {
        if assignment.len() != self.num_vars {
            return Err(QuboError::AssignmentLength {
                expected: self.num_vars,
                actual: assignment.len(),
            });
        }
        Ok(self
            .entries
            .iter()
            .filter(|((i, j), _)| assignment[*i] && assignment[*j])
            .map(|(_, c)| c)
            .sum())
    }

    /// Value of the cost polynomial: energy plus offset.
    pub fn objective(&self, assignment: &[bool]) -> QuboResult<f64> {
        Ok(self.energy(assignment)? + self.offset)
    }

    /// Dense upper-triangular matrix; the lower triangle is zero.
    pub fn to_dense(&self) -> Vec<Vec<f64>> {
        let mut m = vec![vec![0.0; self.num_vars]; self.num_vars];
        for (&(i, j), &c) in &self.entries {
            m[i][j] = c;
        }
        m
    }

    /// Serializable form with explicit `{i, j, value}` entries.
    pub fn to_document(&self) -> QuboDocument {
        self.clone().into()
    }

    /// True when every pair `i <= j < N` has an entry.
    pub fn is_dense(&self) -> bool {
        self.entries.len() == qubo_entry_count(self.num_vars)
    }
}

/// One `(i, j)` coefficient of a [`QuboDocument`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct QuboEntry {
    /// Row index.
    pub i: usize,
    /// Column index (`>= i`).
    pub j: usize,
    /// Coefficient.
    pub value: f64,
}

/// Wire form of a [`QuboMatrix`] for JSON/YAML interchange.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuboDocument {
    /// Number of decision variables.
    pub num_vars: usize,
    /// Constant term.
    #[serde(default)]
    pub offset: f64,
    /// Coefficients; pairs not listed are zero.
    pub entries: Vec<QuboEntry>,
}

impl From<QuboMatrix> for QuboDocument {
    fn from(q: QuboMatrix) -> Self {
        Self {
            num_vars: q.num_vars,
            offset: q.offset,
            entries: q
                .entries
                .into_iter()
                .map(|((i, j), value)| QuboEntry { i, j, value })
                .collect(),
        }
    }
}

impl TryFrom<QuboDocument> for QuboMatrix {
    type Error = QuboError;

    /// Entries given as `(j, i)` are normalised and repeated pairs
    /// accumulate. Only listed pairs are stored, so the result is dense
    /// only if the document lists every pair.
    fn try_from(doc: QuboDocument) -> QuboResult<Self> {
        let n = doc.num_vars;
        let mut entries = BTreeMap::new();
        for e in doc.entries {
            let index = e.i.max(e.j);
            if index >= n {
                return Err(QuboError::VariableOutOfRange { index, num_vars: n });
            }
            *entries.entry((e.i.min(e.j), index)).or_insert(0.0) += e.value;
        }
        Ok(Self {
            num_vars: n,
            entries,
            offset: doc.offset,
        })
    }
}
