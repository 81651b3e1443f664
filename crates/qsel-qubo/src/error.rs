//! Error types for the QUBO compiler.

use thiserror::Error;

/// Errors produced while building or evaluating a selection QUBO.
#[derive(Debug, Error, Clone, PartialEq)]
#[non_exhaustive]
pub enum QuboError {
    /// The problem has no decision variables.
    #[error("Problem is empty: at least one decision variable is required")]
    EmptyProblem,

    /// The cost vector length does not match the declared problem size.
    #[error("Dimension mismatch: expected {expected} costs, got {actual}")]
    DimensionMismatch {
        /// Declared number of decision variables.
        expected: usize,
        /// Length of the supplied cost vector.
        actual: usize,
    },

    /// The penalty weight is too small to dominate constraint violations.
    #[error("Invalid penalty {penalty}: must be greater than {bound} (sum of absolute costs)")]
    InvalidPenalty {
        /// The supplied penalty weight.
        penalty: f64,
        /// The bound the penalty has to exceed.
        bound: f64,
    },

    /// A cost or the penalty is NaN or infinite.
    #[error("Non-finite {what}: {value}")]
    NonFiniteValue {
        /// Which input was rejected.
        what: String,
        /// The offending value.
        value: f64,
    },

    /// The template asks for more (or fewer) selected items than possible.
    #[error("Cannot select {k} items out of {n}")]
    InvalidSelectionSize {
        /// Number of items the template selects.
        k: usize,
        /// Number of decision variables.
        n: usize,
    },

    /// A variable index lies outside `[0, num_vars)`.
    #[error("Variable X_{index} out of range for a problem with {num_vars} variables")]
    VariableOutOfRange {
        /// The offending index.
        index: usize,
        /// Number of decision variables.
        num_vars: usize,
    },

    /// An assignment has the wrong number of bits.
    #[error("Assignment has {actual} bits, expected {expected}")]
    AssignmentLength {
        /// Number of decision variables.
        expected: usize,
        /// Length of the supplied assignment.
        actual: usize,
    },

    /// A spin is neither `+1` nor `-1`.
    #[error("Spin s_{index} is {value}, expected +1 or -1")]
    InvalidSpin {
        /// Position of the spin.
        index: usize,
        /// The offending value.
        value: i8,
    },
}

/// Result type for QUBO compiler operations.
pub type QuboResult<T> = Result<T, QuboError>;
