//! Decision variable identifiers.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Index of a binary decision variable `X_i`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct VarId(pub usize);

impl VarId {
    /// The raw index.
    pub fn index(self) -> usize {
        self.0
    }
}

impl From<usize> for VarId {
    fn from(index: usize) -> Self {
        Self(index)
    }
}

impl fmt::Display for VarId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "X_{}", self.0)
    }
}

/// Iterate over every unordered pair `(i, j)` with `i < j < n`.
pub fn upper_pairs(n: usize) -> impl Iterator<Item = (usize, usize)> {
    (0..n).flat_map(move |i| ((i + 1)..n).map(move |j| (i, j)))
}

/// Number of entries in a dense upper-triangular QUBO over `n` variables.
pub fn qubo_entry_count(n: usize) -> usize {
    n + n * n.saturating_sub(1) / 2
}

/// Serde adapter writing a pair-keyed map as `[i, j, value]` triples.
///
/// JSON object keys must be strings, so `(i, j)` keys cannot be written
/// as a map.
pub(crate) mod pair_map {
    use super::*;

    pub fn serialize<S: Serializer>(
        map: &BTreeMap<(usize, usize), f64>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        let triples: Vec<(usize, usize, f64)> =
            map.iter().map(|(&(i, j), &v)| (i, j, v)).collect();
        triples.serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<BTreeMap<(usize, usize), f64>, D::Error> {
        let triples = Vec::<(usize, usize, f64)>::deserialize(deserializer)?;
        Ok(triples.into_iter().map(|(i, j, v)| ((i, j), v)).collect())
    }
}
