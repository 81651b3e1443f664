//! Error types for the solver crate.

use thiserror::Error;

use qsel_qubo::QuboError;

/// Errors that can occur while configuring or running a solver.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SolveError {
    /// The problem or an assignment was malformed.
    #[error("QUBO error: {0}")]
    Qubo(#[from] QuboError),

    /// No backend is registered under the requested name.
    #[error("Backend not found: {0}")]
    BackendNotFound(String),

    /// The problem exceeds what the backend can handle.
    #[error("Problem with {num_vars} variables exceeds backend limit of {limit}")]
    ProblemTooLarge {
        /// Variables in the submitted problem.
        num_vars: usize,
        /// Largest problem the backend accepts.
        limit: usize,
    },

    /// A solver parameter is out of range.
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// I/O error while reading configuration.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML (de)serialization error.
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml_ng::Error),

    /// Generic backend error.
    #[error("Backend error: {0}")]
    Backend(String),
}

/// Result type for solver operations.
pub type SolveResult<T> = Result<T, SolveError>;
