//! A* configuration.

use crate::heuristics::Heuristic;

/// Configuration for [`AStarSolver`](super::AStarSolver).
///
/// # Examples
///
/// ```
/// use tsp_search::astar::AStarConfig;
/// use tsp_search::heuristics::Heuristic;
///
/// let config = AStarConfig::default()
///     .with_max_iterations(50_000)
///     .with_heuristic(Heuristic::Nearest);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone)]
pub struct AStarConfig {
    /// Maximum number of frontier pops before giving up on optimality.
    pub max_iterations: usize,

    /// Remaining-cost estimator.
    pub heuristic: Heuristic,

    /// Optional wall-clock limit in milliseconds.
    pub time_limit_ms: Option<u64>,
}

impl Default for AStarConfig {
    fn default() -> Self {
        Self {
            max_iterations: 1_000_000,
            heuristic: Heuristic::Combined,
            time_limit_ms: None,
        }
    }
}

impl AStarConfig {
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AStarConfig::default();
        assert_eq!(config.max_iterations, 1_000_000);
        assert_eq!(config.heuristic, Heuristic::Combined);
        assert!(config.time_limit_ms.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_zero_iterations() {
        assert!(AStarConfig::default().with_max_iterations(0).validate().is_err());
    }

    #[test]
    fn test_validate_zero_time_limit() {
        assert!(AStarConfig::default().with_time_limit_ms(0).validate().is_err());
    }
}
