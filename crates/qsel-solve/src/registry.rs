//! Solver registry for managing available backends.
//!
//! The [`SolverRegistry`] maps backend names to factories that build a
//! boxed [`QuadraticBinarySolver`] from a [`SessionConfig`].

use rustc_hash::FxHashMap;
use tracing::debug;

use crate::anneal::{AnnealConfig, SimulatedAnnealer};
use crate::config::SessionConfig;
use crate::error::{SolveError, SolveResult};
use crate::exhaustive::{ExhaustiveSolver, MAX_ENUMERABLE_VARS};
use crate::solver::QuadraticBinarySolver;

/// Factory function type for backends.
type SolverFactory =
    Box<dyn Fn(&SessionConfig) -> SolveResult<Box<dyn QuadraticBinarySolver>> + Send + Sync>;

/// Central registry of solver backends.
pub struct SolverRegistry {
    factories: FxHashMap<String, SolverFactory>,
}

impl SolverRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            factories: FxHashMap::default(),
        }
    }

    /// Registry with `exhaustive` and `anneal` registered.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        registry.register("exhaustive", |config| {
            let solver: Box<dyn QuadraticBinarySolver> = match config.max_vars {
                Some(limit) if limit > MAX_ENUMERABLE_VARS => {
                    return Err(SolveError::InvalidParameter(format!(
                        "max_vars {limit} exceeds the exhaustive limit of {MAX_ENUMERABLE_VARS}"
                    )));
                }
                Some(limit) => Box::new(ExhaustiveSolver::with_max_vars(limit)),
                None => Box::new(ExhaustiveSolver::new()),
            };
            Ok(solver)
        });
        registry.register("anneal", |config| {
            let defaults = AnnealConfig::default();
            let anneal = AnnealConfig {
                sweeps: config.sweeps.unwrap_or(defaults.sweeps),
                num_reads: config.reads.unwrap_or(defaults.num_reads),
                initial_temperature: extra_f64(config, "initial_temperature")?,
                final_temperature: extra_f64(config, "final_temperature")?,
                seed: config.seed,
            };
            let mut solver = SimulatedAnnealer::with_config(anneal);
            if let Some(limit) = config.max_vars {
                solver = solver.with_max_vars(limit);
            }
            let solver: Box<dyn QuadraticBinarySolver> = Box::new(solver);
            Ok(solver)
        });
        registry
    }

    /// Register a backend factory under `name`, replacing any previous one.
    pub fn register(
        &mut self,
        name: impl Into<String>,
        factory: impl Fn(&SessionConfig) -> SolveResult<Box<dyn QuadraticBinarySolver>>
        + Send
        + Sync
        + 'static,
    ) {
        let name = name.into();
        debug!("Registering solver backend: {}", name);
        self.factories.insert(name, Box::new(factory));
    }

    /// Build the backend named in `config`.
    pub fn create(&self, config: &SessionConfig) -> SolveResult<Box<dyn QuadraticBinarySolver>> {
        let factory = self
            .factories
            .get(&config.backend)
            .ok_or_else(|| SolveError::BackendNotFound(config.backend.clone()))?;
        factory(config)
    }

    /// True if `name` is registered.
    pub fn contains(&self, name: &str) -> bool {
        self.factories.contains_key(name)
    }

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.factories.keys().cloned().collect();
        names.sort();
        names
    }
}

impl Default for SolverRegistry {
    fn default() -> Self {
        Self::with_builtins()
    }
}

fn extra_f64(config: &SessionConfig, key: &str) -> SolveResult<Option<f64>> {
    match config.extra.get(key) {
        None => Ok(None),
        Some(value) => value.as_f64().map(Some).ok_or_else(|| {
            SolveError::Configuration(format!("{key} must be a number, got {value}"))
        }),
    }
}
