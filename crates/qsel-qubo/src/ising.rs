//! QUBO → Ising conversion.
//!
//! Eigensolver backends work with spin Hamiltonians
//!
//! ```text
//! H(s) = offset + Σ_i h_i·s_i + Σ_{i<j} J_ij·s_i·s_j,   s_i ∈ {+1, −1}
//! ```
//!
//! The substitution `x_i = (1 − s_i)/2` maps bit 0 to spin +1 and bit 1 to
//! spin −1, so a `|0…0⟩` computational basis state is the all-zero
//! assignment. Energies are preserved exactly, offset included.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{QuboError, QuboResult};
use crate::qubo::QuboMatrix;

/// Spin-glass form of a QUBO.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IsingModel {
    /// Local fields `h_i`.
    pub h: Vec<f64>,
    /// Couplings `J_ij`, `i < j`.
    #[serde(with = "crate::variable::pair_map")]
    pub j: BTreeMap<(usize, usize), f64>,
    /// Constant energy shift.
    pub offset: f64,
}

impl IsingModel {
    /// Number of spins.
    pub fn num_spins(&self) -> usize {
        self.h.len()
    }

    /// Couplings as `(i, j, J_ij)` triples, ordered by pair.
    pub fn couplings(&self) -> Vec<(usize, usize, f64)> {
        self.j.iter().map(|(&(i, j), &c)| (i, j, c)).collect()
    }

    /// Energy of a spin configuration (`+1`/`−1` per spin). Any other
    /// spin value is a [`QuboError::InvalidSpin`].
    pub fn energy(&self, spins: &[i8]) -> QuboResult<f64> {
        if spins.len() != self.h.len() {
            return Err(QuboError::AssignmentLength {
                expected: self.h.len(),
                actual: spins.len(),
            });
        }
        let invalid = spins
            .iter()
            .enumerate()
            .find(|(_, s)| !matches!(**s, 1 | -1));
        if let Some((index, &value)) = invalid {
            return Err(QuboError::InvalidSpin { index, value });
        }
        let field: f64 = self
            .h
            .iter()
            .zip(spins)
            .map(|(h, s)| h * f64::from(*s))
            .sum();
        let coupling: f64 = self
            .j
            .iter()
            .map(|(&(i, j), c)| c * f64::from(spins[i]) * f64::from(spins[j]))
            .sum();
        Ok(self.offset + field + coupling)
    }
}

/// Spins for a bit assignment: `false → +1`, `true → −1`.
pub fn spins_from_bits(bits: &[bool]) -> Vec<i8> {
    bits.iter().map(|b| if *b { -1 } else { 1 }).collect()
}

/// Bits for a spin configuration: negative spins are set bits.
pub fn bits_from_spins(spins: &[i8]) -> Vec<bool> {
    spins.iter().map(|s| *s < 0).collect()
}

impl QuboMatrix {
    /// Convert to an [`IsingModel`] with identical energies.
    pub fn to_ising(&self) -> IsingModel {
        let mut h = vec![0.0; self.num_vars()];
        let mut j = BTreeMap::new();
        let mut offset = self.offset();

        for ((a, b), q) in self.entries() {
            if a == b {
                offset += q / 2.0;
                h[a] -= q / 2.0;
            } else {
                let quarter = q / 4.0;
                offset += quarter;
                h[a] -= quarter;
                h[b] -= quarter;
                *j.entry((a, b)).or_insert(0.0) += quarter;
            }
        }

        IsingModel { h, j, offset }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::Coefficients;

    #[test]
    fn test_single_variable() {
        // q·x with x = (1 - s)/2 → q/2 - (q/2)·s
        let q = QuboMatrix::assemble(
            &Coefficients {
                linear: vec![6.0],
                quadratic: vec![],
            },
            0.0,
        );
        let ising = q.to_ising();
        assert_eq!(ising.h, vec![-3.0]);
        assert_eq!(ising.offset, 3.0);
        assert_eq!(ising.energy(&[1]).unwrap(), 0.0);
        assert_eq!(ising.energy(&[-1]).unwrap(), 6.0);
    }

    #[test]
    fn test_energies_match() {
        let q = QuboMatrix::assemble(
            &Coefficients {
                linear: vec![-46.0, -47.0, -43.0],
                quadratic: vec![(0, 1, 100.0), (0, 2, 100.0), (1, 2, 100.0)],
            },
            50.0,
        );
        let ising = q.to_ising();
        assert_eq!(ising.couplings().len(), 3);
        for bits in 0..8u32 {
            let x: Vec<bool> = (0..3).map(|i| (bits >> i) & 1 == 1).collect();
            let e_qubo = q.objective(&x).unwrap();
            let e_ising = ising.energy(&spins_from_bits(&x)).unwrap();
            assert!((e_qubo - e_ising).abs() < 1e-9, "bits {bits:03b}");
        }
    }

    #[test]
    fn test_rejects_non_unit_spins() {
        let q = QuboMatrix::assemble(
            &Coefficients {
                linear: vec![6.0, 2.0],
                quadratic: vec![(0, 1, 4.0)],
            },
            0.0,
        );
        let ising = q.to_ising();
        for spins in [[1, 0], [5, 1], [-1, i8::MIN]] {
            assert!(
                matches!(ising.energy(&spins), Err(QuboError::InvalidSpin { .. })),
                "{spins:?}"
            );
        }
        assert!(matches!(
            ising.energy(&[1, 0]),
            Err(QuboError::InvalidSpin { index: 1, value: 0 })
        ));
    }

    #[test]
    fn test_spin_bit_roundtrip() {
        let bits = vec![true, false, true];
        assert_eq!(spins_from_bits(&bits), vec![-1, 1, -1]);
        assert_eq!(bits_from_spins(&spins_from_bits(&bits)), bits);
    }
}
