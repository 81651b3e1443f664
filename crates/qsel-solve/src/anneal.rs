//! Simulated annealing backend.
//!
//! Single-flip Metropolis sampling with a geometric temperature schedule.
//! Each read starts from a random assignment and performs `sweeps` passes
//! over all variables; the best assignment seen across all reads is
//! returned.

use std::time::Instant;

use async_trait::async_trait;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, instrument};

use qsel_qubo::QuboMatrix;

use crate::error::{SolveError, SolveResult};
use crate::solver::{QuadraticBinarySolver, Solution, SolverCapabilities, flip_delta};

/// Annealing schedule and sampling parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct AnnealConfig {
    /// Passes over all variables per read.
    pub sweeps: usize,
    /// Independent restarts.
    pub num_reads: usize,
    /// Starting temperature; derived from the coefficients when `None`.
    pub initial_temperature: Option<f64>,
    /// Final temperature; `initial / 1000` when `None`.
    pub final_temperature: Option<f64>,
    /// RNG seed; read `r` uses `seed + r`.
    pub seed: Option<u64>,
}

impl Default for AnnealConfig {
    fn default() -> Self {
        Self {
            sweeps: 1000,
            num_reads: 16,
            initial_temperature: None,
            final_temperature: None,
            seed: None,
        }
    }
}

impl AnnealConfig {
    fn validate(&self) -> SolveResult<()> {
        if self.sweeps == 0 {
            return Err(SolveError::InvalidParameter("sweeps must be at least 1".into()));
        }
        if self.num_reads == 0 {
            return Err(SolveError::InvalidParameter(
                "num_reads must be at least 1".into(),
            ));
        }
        for t in [self.initial_temperature, self.final_temperature]
            .into_iter()
            .flatten()
        {
            if !(t.is_finite() && t > 0.0) {
                return Err(SolveError::InvalidParameter(format!(
                    "temperature must be positive and finite, got {t}"
                )));
            }
        }
        Ok(())
    }
}

/// Simulated annealing sampler.
#[derive(Debug, Clone)]
pub struct SimulatedAnnealer {
    name: String,
    config: AnnealConfig,
    capabilities: SolverCapabilities,
}

impl SimulatedAnnealer {
    /// Create an annealer with default parameters.
    pub fn new() -> Self {
        Self::with_config(AnnealConfig::default())
    }

    /// Create an annealer with explicit parameters.
    pub fn with_config(config: AnnealConfig) -> Self {
        Self {
            name: "anneal".into(),
            config,
            capabilities: SolverCapabilities {
                max_vars: 4096,
                exact: false,
                stochastic: true,
            },
        }
    }

    /// Set the seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.config.seed = Some(seed);
        self
    }

    /// Set the number of reads.
    pub fn with_reads(mut self, num_reads: usize) -> Self {
        self.config.num_reads = num_reads;
        self
    }

    /// Set the number of sweeps per read.
    pub fn with_sweeps(mut self, sweeps: usize) -> Self {
        self.config.sweeps = sweeps;
        self
    }

    /// Override the variable limit.
    pub fn with_max_vars(mut self, max_vars: usize) -> Self {
        self.capabilities.max_vars = max_vars;
        self
    }

    /// Active parameters.
    pub fn config(&self) -> &AnnealConfig {
        &self.config
    }
}

impl Default for SimulatedAnnealer {
    fn default() -> Self {
        Self::new()
    }
}

/// Largest possible single-flip energy change.
fn max_flip_scale(dense: &[Vec<f64>]) -> f64 {
    let n = dense.len();
    (0..n)
        .map(|k| {
            (0..n)
                .map(|j| if k <= j { dense[k][j] } else { dense[j][k] })
                .map(f64::abs)
                .sum::<f64>()
        })
        .fold(0.0, f64::max)
}

/// Run every read and return `(best_state, best_energy)`.
fn run_reads(dense: &[Vec<f64>], config: &AnnealConfig) -> (Vec<bool>, f64) {
    let n = dense.len();
    let t_hot = config
        .initial_temperature
        .unwrap_or_else(|| max_flip_scale(dense).max(1e-9));
    let t_cold = config.final_temperature.unwrap_or(t_hot / 1000.0);
    let cooling = if config.sweeps > 1 {
        (t_cold / t_hot).powf(1.0 / (config.sweeps - 1) as f64)
    } else {
        1.0
    };

    let mut best_state = vec![false; n];
    let mut best_energy = f64::INFINITY;

    for read in 0..config.num_reads {
        let mut rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed.wrapping_add(read as u64)),
            None => StdRng::from_entropy(),
        };

        let mut state: Vec<bool> = (0..n).map(|_| rng.gen_bool(0.5)).collect();
        let mut energy = energy_of(dense, &state);
        if energy < best_energy {
            best_energy = energy;
            best_state.clone_from(&state);
        }

        let mut temp = t_hot;
        for _ in 0..config.sweeps {
            for k in 0..n {
                let delta = flip_delta(dense, &state, k);
                if delta <= 0.0 || rng.gen_bool((-delta / temp).exp().min(1.0)) {
                    state[k] = !state[k];
                    energy += delta;
                    if energy < best_energy {
                        best_energy = energy;
                        best_state.clone_from(&state);
                    }
                }
            }
            temp *= cooling;
        }
    }

    (best_state, best_energy)
}

fn energy_of(dense: &[Vec<f64>], state: &[bool]) -> f64 {
    let mut e = 0.0;
    for (i, row) in dense.iter().enumerate() {
        if !state[i] {
            continue;
        }
        for (j, q) in row.iter().enumerate().skip(i) {
            if state[j] {
                e += q;
            }
        }
    }
    e
}

#[async_trait]
impl QuadraticBinarySolver for SimulatedAnnealer {
    fn name(&self) -> &str {
        &self.name
    }

    fn capabilities(&self) -> &SolverCapabilities {
        &self.capabilities
    }

    #[instrument(skip(self, qubo), fields(n = qubo.num_vars()))]
    async fn solve(&self, qubo: &QuboMatrix) -> SolveResult<Solution> {
        self.capabilities.check(qubo)?;
        self.config.validate()?;

        let start = Instant::now();
        let dense = qubo.to_dense();
        let config = self.config.clone();
        let (assignment, _) = tokio::task::spawn_blocking(move || run_reads(&dense, &config))
            .await
            .map_err(|e| SolveError::Backend(format!("annealing task failed: {e}")))?;

        let objective = qubo.objective(&assignment)?;
        let elapsed = start.elapsed();
        let evaluations =
            (self.config.num_reads * self.config.sweeps * qubo.num_vars()) as u64;
        debug!(
            "Annealed {} reads x {} sweeps in {:?}",
            self.config.num_reads, self.config.sweeps, elapsed
        );

        Ok(Solution {
            solver: self.name.clone(),
            assignment,
            objective,
            evaluations,
            elapsed_ms: elapsed.as_millis() as u64,
        })
    }
}
