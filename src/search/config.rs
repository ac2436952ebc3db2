//! Search configuration.

use crate::error::ConfigError;
use crate::local_search::Neighborhood;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Which acceptance strategy the driver runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum AcceptanceKind {
    /// Steepest descent: sweep the whole neighborhood, commit the most
    /// negative delta, stop at a local optimum.
    #[default]
    Best,
    /// Commit the first improving move in generator order, stop at a local
    /// optimum.
    First,
    /// Metropolis criterion with geometric cooling; never stops on a local
    /// optimum, so an iteration or time budget is required.
    Annealing,
    /// Best admissible move per sweep, worsening or not, with a short-term
    /// memory of recently removed edges. Never stops on a local optimum, so
    /// an iteration or time budget is required.
    Tabu,
}

/// How the initial tour is produced.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum InitialTour {
    /// Seeded uniform random permutation.
    #[default]
    Random,
    /// Greedy nearest-neighbor construction starting at city 0.
    NearestNeighbor,
    /// A caller-supplied permutation; validated against the instance size.
    Given(Vec<usize>),
}

/// What the driver does after a descent strategy reaches a local optimum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum RestartPolicy {
    /// Terminate at the first local optimum.
    #[default]
    None,
    /// Shuffle a random tour segment and resume, at most `max_restarts`
    /// times. The incumbent is kept across restarts.
    Shuffle {
        /// Number of diversification rounds before giving up.
        max_restarts: usize,
    },
}

/// Configuration for a local search run.
///
/// # Examples
///
/// ```
/// use tsp_ls::search::{AcceptanceKind, SearchConfig};
/// use tsp_ls::local_search::Neighborhood;
///
/// let config = SearchConfig::default()
///     .with_neighborhood(Neighborhood::Both)
///     .with_acceptance(AcceptanceKind::First)
///     .with_candidate_list_size(10)
///     .with_seed(42);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Neighborhood structure(s) enumerated each iteration.
    pub neighborhood: Neighborhood,

    /// Restrict 2-opt partners to each city's k nearest neighbors.
    /// `None` enumerates the full O(n²) neighborhood.
    pub candidate_list_size: Option<usize>,

    /// Acceptance strategy.
    pub acceptance: AcceptanceKind,

    /// Starting temperature for [`AcceptanceKind::Annealing`].
    pub initial_temperature: f64,

    /// Geometric cooling factor in (0, 1), applied once per iteration.
    pub cooling_rate: f64,

    /// Number of edges the tabu memory retains for
    /// [`AcceptanceKind::Tabu`]. Moves re-adding a remembered edge are
    /// skipped unless they would beat the incumbent.
    pub tabu_tenure: usize,

    /// Maximum iterations (hard budget). 0 = no limit.
    pub max_iterations: usize,

    /// Wall-clock budget, checked at the top of each iteration.
    pub time_limit: Option<Duration>,

    /// Random seed. Same seed + same input = identical accepted-move
    /// sequence. `None` seeds from entropy.
    pub seed: Option<u64>,

    /// Initial tour construction.
    pub initial: InitialTour,

    /// Diversification after a local optimum (descent strategies only).
    pub restart: RestartPolicy,

    /// Recompute the true tour cost from scratch every this many accepted
    /// moves and reconcile accumulated drift. 0 disables resynchronization.
    pub resync_interval: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            neighborhood: Neighborhood::TwoOpt,
            candidate_list_size: None,
            acceptance: AcceptanceKind::Best,
            initial_temperature: 100.0,
            cooling_rate: 0.95,
            tabu_tenure: 7,
            max_iterations: 0,
            time_limit: None,
            seed: None,
            initial: InitialTour::Random,
            restart: RestartPolicy::None,
            resync_interval: 1000,
        }
    }
}

impl SearchConfig {
    pub fn with_neighborhood(mut self, neighborhood: Neighborhood) -> Self {
        self.neighborhood = neighborhood;
        self
    }

    pub fn with_candidate_list_size(mut self, k: usize) -> Self {
        self.candidate_list_size = Some(k);
        self
    }

    pub fn with_acceptance(mut self, acceptance: AcceptanceKind) -> Self {
        self.acceptance = acceptance;
        self
    }

    pub fn with_initial_temperature(mut self, t: f64) -> Self {
        self.initial_temperature = t;
        self
    }

    pub fn with_cooling_rate(mut self, rate: f64) -> Self {
        self.cooling_rate = rate;
        self
    }

    pub fn with_tabu_tenure(mut self, tenure: usize) -> Self {
        self.tabu_tenure = tenure;
        self
    }

    pub fn with_max_iterations(mut self, n: usize) -> Self {
        self.max_iterations = n;
        self
    }

    pub fn with_time_limit(mut self, limit: Duration) -> Self {
        self.time_limit = Some(limit);
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_initial(mut self, initial: InitialTour) -> Self {
        self.initial = initial;
        self
    }

    pub fn with_restart(mut self, restart: RestartPolicy) -> Self {
        self.restart = restart;
        self
    }

    pub fn with_resync_interval(mut self, interval: usize) -> Self {
        self.resync_interval = interval;
        self
    }

    /// Validates option values.
    ///
    /// Instance-dependent checks (a `Given` tour's length, city id range)
    /// happen in [`optimize`](crate::search::optimize), which knows the
    /// instance size.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.candidate_list_size == Some(0) {
            return Err(ConfigError::InvalidOption(
                "candidate_list_size must be at least 1".into(),
            ));
        }
        if self.acceptance == AcceptanceKind::Annealing {
            if !self.initial_temperature.is_finite() || self.initial_temperature <= 0.0 {
                return Err(ConfigError::InvalidOption(format!(
                    "initial_temperature must be positive, got {}",
                    self.initial_temperature
                )));
            }
            if !(self.cooling_rate > 0.0 && self.cooling_rate < 1.0) {
                return Err(ConfigError::InvalidOption(format!(
                    "cooling_rate must be in (0, 1), got {}",
                    self.cooling_rate
                )));
            }
            if self.max_iterations == 0 && self.time_limit.is_none() {
                return Err(ConfigError::InvalidOption(
                    "annealing never reaches a local optimum; set max_iterations or time_limit"
                        .into(),
                ));
            }
        }
        if self.acceptance == AcceptanceKind::Tabu {
            if self.tabu_tenure == 0 {
                return Err(ConfigError::InvalidOption(
                    "tabu_tenure must be at least 1".into(),
                ));
            }
            if self.max_iterations == 0 && self.time_limit.is_none() {
                return Err(ConfigError::InvalidOption(
                    "tabu search accepts worsening moves; set max_iterations or time_limit".into(),
                ));
            }
        }
        Ok(())
    }
}
