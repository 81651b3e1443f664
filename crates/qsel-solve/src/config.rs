//! Session configuration.
//!
//! Supports loading configuration from:
//! 1. Configuration files (YAML), by default `~/.qsel/session.yaml`
//! 2. Environment variables (with `QSEL_` prefix)
//!
//! Environment variables take precedence over the file, which takes
//! precedence over the defaults.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{SolveError, SolveResult};

/// Configuration for one solver session.
#[derive(Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Registered backend name.
    #[serde(default = "default_backend")]
    pub backend: String,
    /// Access token for remote backends. Never serialized.
    #[serde(default, skip_serializing)]
    pub token: Option<String>,
    /// RNG seed for stochastic backends.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
    /// Sweeps per read (annealing).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sweeps: Option<usize>,
    /// Number of reads (annealing).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reads: Option<usize>,
    /// Variable limit override.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_vars: Option<usize>,
    /// Backend-specific settings.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

fn default_backend() -> String {
    "exhaustive".into()
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self::new(default_backend())
    }
}

impl fmt::Debug for SessionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionConfig")
            .field("backend", &self.backend)
            .field("token", &self.token.as_ref().map(|_| "[REDACTED]"))
            .field("seed", &self.seed)
            .field("sweeps", &self.sweeps)
            .field("reads", &self.reads)
            .field("max_vars", &self.max_vars)
            .field("extra", &self.extra)
            .finish()
    }
}

impl SessionConfig {
    /// Create a configuration for the named backend.
    pub fn new(backend: impl Into<String>) -> Self {
        Self {
            backend: backend.into(),
            token: None,
            seed: None,
            sweeps: None,
            reads: None,
            max_vars: None,
            extra: serde_json::Map::new(),
        }
    }

    /// Set the access token.
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Set the RNG seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Set the number of reads.
    pub fn with_reads(mut self, reads: usize) -> Self {
        self.reads = Some(reads);
        self
    }

    /// Set the sweeps per read.
    pub fn with_sweeps(mut self, sweeps: usize) -> Self {
        self.sweeps = Some(sweeps);
        self
    }

    /// Add a backend-specific setting.
    pub fn with_extra(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.extra.insert(key.into(), value);
        self
    }

    /// Parse from YAML text.
    pub fn from_yaml_str(source: &str) -> SolveResult<Self> {
        Ok(serde_yaml_ng::from_str(source)?)
    }

    /// Load from a YAML file.
    pub fn from_yaml_file(path: impl AsRef<Path>) -> SolveResult<Self> {
        let path = path.as_ref();
        debug!("Loading session configuration from {}", path.display());
        let source = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&source)
    }

    /// Default file location: `~/.qsel/session.yaml`.
    pub fn default_path() -> Option<PathBuf> {
        dirs::home_dir().map(|home| home.join(".qsel").join("session.yaml"))
    }

    /// Load the default file if it exists, then apply the environment.
    pub fn load() -> SolveResult<Self> {
        let config = match Self::default_path() {
            Some(path) if path.exists() => Self::from_yaml_file(path)?,
            _ => Self::default(),
        };
        config.apply_env(|key| std::env::var(key).ok())
    }

    /// Apply `QSEL_BACKEND`, `QSEL_TOKEN`, `QSEL_SEED`, `QSEL_READS` and
    /// `QSEL_SWEEPS` overrides read through `lookup`.
    pub fn apply_env(mut self, lookup: impl Fn(&str) -> Option<String>) -> SolveResult<Self> {
        if let Some(backend) = lookup("QSEL_BACKEND") {
            self.backend = backend;
        }
        if let Some(token) = lookup("QSEL_TOKEN") {
            self.token = Some(token);
        }
        if let Some(seed) = lookup("QSEL_SEED") {
            self.seed = Some(parse_env("QSEL_SEED", &seed)?);
        }
        if let Some(reads) = lookup("QSEL_READS") {
            self.reads = Some(parse_env("QSEL_READS", &reads)?);
        }
        if let Some(sweeps) = lookup("QSEL_SWEEPS") {
            self.sweeps = Some(parse_env("QSEL_SWEEPS", &sweeps)?);
        }
        Ok(self)
    }

    /// Serialize to YAML (the token is omitted).
    pub fn to_yaml(&self) -> SolveResult<String> {
        Ok(serde_yaml_ng::to_string(self)?)
    }
}

fn parse_env<T: std::str::FromStr>(key: &str, value: &str) -> SolveResult<T> {
    value
        .trim()
        .parse()
        .map_err(|_| SolveError::Configuration(format!("{key}: cannot parse '{value}'")))
}
