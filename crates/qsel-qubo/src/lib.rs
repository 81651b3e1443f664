//! `qsel-qubo`: cost-model to QUBO compiler.
//!
//! Turns the selection problem "choose exactly one lowest-cost item among
//! N" into a Quadratic Unconstrained Binary Optimization problem:
//!
//! ```text
//! cost(X) = Σ_i C_i·X_i + P·(Σ_i X_i − 1)²
//! ```
//!
//! The compiler produces
//!
//! - a canonical [`BinaryPolynomial`] over `X_0..X_{N-1}` with `X_i² = X_i`
//!   folded in, and
//! - a [`QuboMatrix`] keyed by `(i, j)`, `i <= j`, whose diagonal holds the
//!   linear coefficients (`C_i − P`) and whose off-diagonal holds the cross
//!   coefficients (`2P`).
//!
//! Both are backend-agnostic; `qsel-solve` hands them to solver backends.
//!
//! # Quick start
//!
//! ```rust
//! use qsel_qubo::compile;
//!
//! let compiled = compile(5, &[4.0, 3.0, 7.0, 2.0, 9.0], 50.0).unwrap();
//! assert_eq!(compiled.qubo.len(), 15);
//! assert_eq!(compiled.qubo.get(3, 3), Some(-48.0));
//! assert_eq!(compiled.qubo.get(0, 1), Some(100.0));
//!
//! // Selecting only item 3 recovers its raw cost.
//! let x = [false, false, false, true, false];
//! assert_eq!(compiled.qubo.objective(&x).unwrap(), 2.0);
//! ```

pub mod compiler;
pub mod error;
pub mod extract;
pub mod instance;
pub mod ising;
pub mod polynomial;
pub mod qubo;
pub mod template;
pub mod variable;

pub use compiler::{
    CompileOptions, CompiledProblem, PenaltyPolicy, QuboCompiler, Selection, compile,
};
pub use error::{QuboError, QuboResult};
pub use extract::{Coefficients, extract};
pub use instance::ProblemInstance;
pub use ising::{IsingModel, bits_from_spins, spins_from_bits};
pub use polynomial::{BinaryPolynomial, LinearForm};
pub use qubo::{QuboDocument, QuboEntry, QuboMatrix};
pub use template::{ExpansionStrategy, SelectionTemplate};
pub use variable::VarId;
