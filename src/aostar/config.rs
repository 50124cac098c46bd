//! AO* configuration.

use crate::heuristics::Heuristic;

/// Configuration for [`AndOrSolver`](super::AndOrSolver).
///
/// # Examples
///
/// ```
/// use tsp_search::aostar::AndOrConfig;
/// use tsp_search::heuristics::Heuristic;
///
/// let config = AndOrConfig::default()
///     .with_max_iterations(50_000)
///     .with_heuristic(Heuristic::Nearest);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone)]
pub struct AndOrConfig {
    /// Maximum number of node selections before giving up on optimality.
    pub max_iterations: usize,

    /// Remaining-cost estimator.
    pub heuristic: Heuristic,

    /// Optional wall-clock limit in milliseconds.
    pub time_limit_ms: Option<u64>,
}

impl Default for AndOrConfig {
    fn default() -> Self {
        Self {
            max_iterations: 500_000,
            heuristic: Heuristic::Combined,
            time_limit_ms: None,
        }
    }
}

impl AndOrConfig {
    pub fn with_max_iterations(mut self, n: usize) -> Self {
        self.max_iterations = n;
        self
    }

    pub fn with_heuristic(mut self, heuristic: Heuristic) -> Self {
        self.heuristic = heuristic;
        self
    }

    pub fn with_time_limit_ms(mut self, ms: u64) -> Self {
        self.time_limit_ms = Some(ms);
        self
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), String> {
        if self.max_iterations == 0 {
            return Err("max_iterations must be at least 1".into());
        }
        if self.time_limit_ms == Some(0) {
            return Err("time_limit_ms must be positive or None".into());
        }
        Ok(())
    }
}
