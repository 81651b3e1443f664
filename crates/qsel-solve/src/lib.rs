//! `qsel-solve`: solver backends for selection QUBOs.
//!
//! This crate takes the [`QuboMatrix`](qsel_qubo::QuboMatrix) produced by
//! `qsel-qubo` and minimises it. It provides:
//!
//! - the [`QuadraticBinarySolver`] trait every backend implements,
//! - two reference backends: [`ExhaustiveSolver`] (exact, small `N`) and
//!   [`SimulatedAnnealer`] (stochastic, larger `N`),
//! - a [`SolverRegistry`] mapping backend names to factories, and
//! - explicit [`Session`]s that bind a configured backend for a series of
//!   solves.
//!
//! | Backend | Exact | Default limit |
//! |---------|-------|---------------|
//! | `exhaustive` | yes | 24 variables |
//! | `anneal` | no | 4096 variables |
//!
//! # Example
//!
//! ```rust
//! use qsel_solve::{Session, SessionConfig, SolverRegistry};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let compiled = qsel_qubo::compile(5, &[4.0, 3.0, 7.0, 2.0, 9.0], 50.0)?;
//!
//!     let registry = SolverRegistry::with_builtins();
//!     let mut session = Session::open(SessionConfig::new("exhaustive"), &registry)?;
//!     let (solution, selection) = session.solve_compiled(&compiled).await?;
//!     assert_eq!(solution.bitstring(), "00010");
//!     assert_eq!(selection.cost, 2.0);
//!
//!     let summary = session.close();
//!     assert_eq!(summary.solves, 1);
//!     Ok(())
//! }
//! ```
//!
//! # Implementing a Custom Backend
//!
//! ```ignore
//! use async_trait::async_trait;
//! use qsel_qubo::QuboMatrix;
//! use qsel_solve::{QuadraticBinarySolver, Solution, SolverCapabilities, SolveResult};
//!
//! struct RemoteAnnealer { /* ... */ }
//!
//! #[async_trait]
//! impl QuadraticBinarySolver for RemoteAnnealer {
//!     fn name(&self) -> &str { "remote" }
//!     fn capabilities(&self) -> &SolverCapabilities { &self.caps }
//!     async fn solve(&self, qubo: &QuboMatrix) -> SolveResult<Solution> {
//!         // submit qubo.to_document(), poll, decode
//!     }
//! }
//!
//! registry.register("remote", |config| Ok(Box::new(RemoteAnnealer::connect(config)?)));
//! ```

pub mod anneal;
pub mod config;
pub mod error;
pub mod exhaustive;
pub mod registry;
pub mod session;
pub mod solver;

pub use anneal::{AnnealConfig, SimulatedAnnealer};
pub use config::SessionConfig;
pub use error::{SolveError, SolveResult};
pub use exhaustive::ExhaustiveSolver;
pub use registry::SolverRegistry;
pub use session::{Session, SessionSummary};
pub use solver::{QuadraticBinarySolver, Solution, SolverCapabilities};
