//! Explicit solver sessions.
//!
//! A session binds one configured backend (and any credentials it needs)
//! for a bounded stretch of work:
//!
//! ```text
//!   Session::open(config, &registry) ──→ solve() … solve() ──→ close()
//! ```
//!
//! Nothing is stored in process-wide state; callers hold the session and
//! closing it consumes it.

use std::fmt;
use std::time::Instant;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{info, instrument};
use uuid::Uuid;

use qsel_qubo::{CompiledProblem, QuboMatrix, Selection};

use crate::config::SessionConfig;
use crate::error::SolveResult;
use crate::registry::SolverRegistry;
use crate::solver::{QuadraticBinarySolver, Solution};

/// An open session on one backend.
pub struct Session {
    id: Uuid,
    config: SessionConfig,
    solver: Box<dyn QuadraticBinarySolver>,
    opened_at: DateTime<Utc>,
    started: Instant,
    solves: u64,
}

impl Session {
    /// Build the configured backend and open a session on it.
    pub fn open(config: SessionConfig, registry: &SolverRegistry) -> SolveResult<Self> {
        let solver = registry.create(&config)?;
        let id = Uuid::new_v4();
        info!(session = %id, backend = %config.backend, "Opened solver session");
        Ok(Self {
            id,
            config,
            solver,
            opened_at: Utc::now(),
            started: Instant::now(),
            solves: 0,
        })
    }

    /// Session identifier.
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Backend name.
    pub fn backend(&self) -> &str {
        self.solver.name()
    }

    /// The backend itself.
    pub fn solver(&self) -> &dyn QuadraticBinarySolver {
        self.solver.as_ref()
    }

    /// Configuration the session was opened with.
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// When the session was opened.
    pub fn opened_at(&self) -> DateTime<Utc> {
        self.opened_at
    }

    /// Solve calls made so far.
    pub fn solves(&self) -> u64 {
        self.solves
    }

    /// Minimise a QUBO on the session backend.
    #[instrument(skip(self, qubo), fields(session = %self.id))]
    pub async fn solve(&mut self, qubo: &QuboMatrix) -> SolveResult<Solution> {
        let solution = self.solver.solve(qubo).await?;
        self.solves += 1;
        Ok(solution)
    }

    /// Solve a compiled problem and decode the assignment.
    pub async fn solve_compiled(
        &mut self,
        compiled: &CompiledProblem,
    ) -> SolveResult<(Solution, Selection)> {
        let solution = self.solve(&compiled.qubo).await?;
        let selection = compiled.decode(&solution.assignment)?;
        Ok((solution, selection))
    }

    /// Close the session.
    pub fn close(self) -> SessionSummary {
        let summary = SessionSummary {
            id: self.id,
            backend: self.solver.name().to_string(),
            solves: self.solves,
            opened_at: self.opened_at,
            closed_at: Utc::now(),
            duration_ms: self.started.elapsed().as_millis() as u64,
        };
        info!(
            session = %summary.id,
            solves = summary.solves,
            "Closed solver session"
        );
        summary
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("id", &self.id)
            .field("backend", &self.solver.name())
            .field("config", &self.config)
            .field("opened_at", &self.opened_at)
            .field("solves", &self.solves)
            .finish()
    }
}

/// What a closed session did.
#[derive(Debug, Clone, Serialize)]
pub struct SessionSummary {
    /// Session identifier.
    pub id: Uuid,
    /// Backend name.
    pub backend: String,
    /// Number of solve calls.
    pub solves: u64,
    /// Open timestamp.
    pub opened_at: DateTime<Utc>,
    /// Close timestamp.
    pub closed_at: DateTime<Utc>,
    /// Session lifetime.
    pub duration_ms: u64,
}
