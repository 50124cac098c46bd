//! Hill climbing configuration, neighborhoods, and acceptance rules.

/// Move applied to two interior positions `i < j` of a closed tour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Neighborhood {
    /// Exchange the cities at positions `i` and `j`.
    ///
    /// Weaker than 2-opt: it replaces up to four edges at once and keeps
    /// the segment between them in its original direction.
    #[default]
    Swap,

    /// Reverse the segment `tour[i..=j]` (true 2-opt).
    TwoOpt,
}

impl Neighborhood {
    /// Applies the move to `tour` in place.
    pub fn apply(self, tour: &mut [usize], i: usize, j: usize) {
        match self {
            Neighborhood::Swap => tour.swap(i, j),
            Neighborhood::TwoOpt => tour[i..=j].reverse(),
        }
    }
}

/// How the next tour is chosen.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Acceptance {
    /// Evaluate every neighbor and move to the cheapest one, stopping as
    /// soon as it is not strictly better than the current tour.
    #[default]
    Steepest,

    /// Draw one random neighbor per iteration. Improvements are always
    /// taken; a worse neighbor is taken with probability `exp(-delta / T)`.
    /// Runs to the iteration cap and keeps the best tour seen.
    Stochastic {
        /// Fixed temperature `T > 0`.
        temperature: f64,
    },
}

/// Configuration for [`HillClimbingSolver`](super::HillClimbingSolver).
///
/// # Examples
///
/// ```
/// use tsp_search::hill::{Acceptance, HillClimbingConfig, Neighborhood};
///
/// let config = HillClimbingConfig::default()
///     .with_neighborhood(Neighborhood::TwoOpt)
///     .with_acceptance(Acceptance::Stochastic { temperature: 1.0 })
///     .with_restarts(5)
///     .with_seed(42);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone)]
pub struct HillClimbingConfig {
    pub neighborhood: Neighborhood,

    pub acceptance: Acceptance,

    /// Maximum moves (steepest) or neighbor draws (stochastic) per climb.
    pub max_iterations: usize,

    /// Number of independent climbs; the best result is kept.
    ///
    /// Every climb after the first starts from a fresh random tour.
    pub restarts: usize,

    /// Closed tour used by the first climb instead of a random one.
    pub start_tour: Option<Vec<usize>>,

    /// Random seed for reproducibility.
    pub seed: Option<u64>,

    /// Optional wall-clock limit in milliseconds.
    pub time_limit_ms: Option<u64>,
}

impl Default for HillClimbingConfig {
    fn default() -> Self {
        Self {
            neighborhood: Neighborhood::Swap,
            acceptance: Acceptance::Steepest,
            max_iterations: 10_000,
            restarts: 1,
            start_tour: None,
            seed: None,
            time_limit_ms: None,
        }
    }
}

impl HillClimbingConfig {
    /// Stochastic climbing at a fixed temperature.
    pub fn stochastic(temperature: f64) -> Self {
        Self {
            acceptance: Acceptance::Stochastic { temperature },
            ..Self::default()
        }
    }

    pub fn with_neighborhood(mut self, neighborhood: Neighborhood) -> Self {
        self.neighborhood = neighborhood;
        self
    }

    pub fn with_acceptance(mut self, acceptance: Acceptance) -> Self {
        self.acceptance = acceptance;
        self
    }

    pub fn with_max_iterations(mut self, n: usize) -> Self {
        self.max_iterations = n;
        self
    }

    pub fn with_restarts(mut self, n: usize) -> Self {
        self.restarts = n;
        self
    }

    pub fn with_start_tour(mut self, tour: Vec<usize>) -> Self {
        self.start_tour = Some(tour);
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_time_limit_ms(mut self, ms: u64) -> Self {
        self.time_limit_ms = Some(ms);
        self
    }

    /// Validates the configuration.
    ///
    /// The start tour is checked against the instance at solve time.
    pub fn validate(&self) -> Result<(), String> {
        if self.max_iterations == 0 {
            return Err("max_iterations must be at least 1".into());
        }
        if self.restarts == 0 {
            return Err("restarts must be at least 1".into());
        }
        if let Acceptance::Stochastic { temperature } = self.acceptance {
            if !(temperature.is_finite() && temperature > 0.0) {
                return Err(format!("temperature must be positive, got {temperature}"));
            }
        }
        if self.time_limit_ms == Some(0) {
            return Err("time_limit_ms must be positive or None".into());
        }
        Ok(())
    }
}
