//! CLI command implementations.

pub mod backends;
pub mod common;
pub mod compile;
pub mod ising;
pub mod solve;
pub mod version;
