//! GA configuration.
//!
//! [`GaConfig`] holds all parameters that control the evolutionary loop.

use super::selection::Selection;

/// Configuration for the Genetic Algorithm.
///
/// # Defaults
///
/// ```
/// use tsp_search::ga::GaConfig;
///
/// let config = GaConfig::default();
/// assert_eq!(config.population_size, 100);
/// assert_eq!(config.max_generations, 500);
/// assert_eq!(config.elite_count, 1);
/// ```
///
/// # Builder Pattern
///
/// ```
/// use tsp_search::ga::{GaConfig, Selection};
///
/// let config = GaConfig::default()
///     .with_population_size(200)
///     .with_selection(Selection::TopTwo)
///     .with_mutation_rate(0.05)
///     .with_target_fitness(0.0);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone)]
pub struct GaConfig {
    /// Number of individuals in the population.
    pub population_size: usize,

    /// Maximum number of generations before termination.
    pub max_generations: usize,

    /// Selection strategy for choosing parents.
    pub selection: Selection,

    /// Number of best individuals copied unchanged into the next
    /// generation. 0 disables elitism.
    pub elite_count: usize,

    /// Probability of recombining a pair of parents (0.0–1.0).
    ///
    /// When crossover is not applied, the children are clones of the
    /// parents.
    pub crossover_rate: f64,

    /// Per-gene mutation probability (0.0–1.0).
    pub mutation_rate: f64,

    /// Generations without improvement of the best-ever fitness before
    /// stopping. 0 disables the check.
    pub stagnation_limit: usize,

    /// Stop as soon as the best fitness is at or below this value.
    pub target_fitness: Option<f64>,

    /// Whether to evaluate individuals in parallel using rayon.
    pub parallel: bool,

    /// Random seed for reproducibility. `None` uses a random seed.
    pub seed: Option<u64>,

    /// Optional wall-clock time limit in milliseconds, checked at the start
    /// of each generation.
    pub time_limit_ms: Option<u64>,
}

impl Default for GaConfig {
    fn default() -> Self {
        Self {
            population_size: 100,
            max_generations: 500,
            selection: Selection::default(),
            elite_count: 1,
            crossover_rate: 0.8,
            mutation_rate: 0.02,
            stagnation_limit: 0,
            target_fitness: None,
            parallel: true,
            seed: None,
            time_limit_ms: None,
        }
    }
}

impl GaConfig {
    pub fn with_population_size(mut self, n: usize) -> Self {
        self.population_size = n;
        self
    }

    pub fn with_max_generations(mut self, n: usize) -> Self {
        self.max_generations = n;
        self
    }

    pub fn with_selection(mut self, sel: Selection) -> Self {
        self.selection = sel;
        self
    }

    /// Keeps the single best individual (`true`) or none (`false`).
    pub fn with_elitism(mut self, elitism: bool) -> Self {
        self.elite_count = usize::from(elitism);
        self
    }

    pub fn with_elite_count(mut self, n: usize) -> Self {
        self.elite_count = n;
        self
    }

    pub fn with_crossover_rate(mut self, rate: f64) -> Self {
        self.crossover_rate = rate.clamp(0.0, 1.0);
        self
    }

    pub fn with_mutation_rate(mut self, rate: f64) -> Self {
        self.mutation_rate = rate.clamp(0.0, 1.0);
        self
    }

    /// Sets the stagnation limit (0 to disable).
    pub fn with_stagnation_limit(mut self, limit: usize) -> Self {
        self.stagnation_limit = limit;
        self
    }

    pub fn with_target_fitness(mut self, target: f64) -> Self {
        self.target_fitness = Some(target);
        self
    }

    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
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

    /// Preset for small instances: population 50, 200 generations, stops
    /// after 50 generations without improvement.
    pub fn fast() -> Self {
        Self {
            population_size: 50,
            max_generations: 200,
            stagnation_limit: 50,
            ..Self::default()
        }
    }

    /// Preset with population 100, 500 generations, stagnation limit 100.
    pub fn balanced() -> Self {
        Self {
            population_size: 100,
            max_generations: 500,
            stagnation_limit: 100,
            ..Self::default()
        }
    }

    /// Preset for larger instances: population 200, 1500 generations,
    /// stagnation limit 200.
    pub fn quality() -> Self {
        Self {
            population_size: 200,
            max_generations: 1_500,
            stagnation_limit: 200,
            ..Self::default()
        }
    }

    /// Parameters of the classic bit-vector knapsack exercise: population
    /// 10, 100 generations, roulette selection, crossover 0.8, per-bit
    /// mutation 0.01, single-best elitism.
    pub fn knapsack() -> Self {
        Self {
            population_size: 10,
            max_generations: 100,
            selection: Selection::Roulette,
            elite_count: 1,
            crossover_rate: 0.8,
            mutation_rate: 0.01,
            parallel: false,
            ..Self::default()
        }
    }

    /// Parameters of the integer-equation exercise: population 10, 200
    /// generations, the two best breed every child and both survive,
    /// crossover always applied, one gene reset with probability 0.2, stop
    /// at an exact solution (fitness 0).
    pub fn equation() -> Self {
        Self {
            population_size: 10,
            max_generations: 200,
            selection: Selection::TopTwo,
            elite_count: 2,
            crossover_rate: 1.0,
            mutation_rate: 0.2,
            target_fitness: Some(0.0),
            parallel: false,
            ..Self::default()
        }
    }

    /// Selects a preset based on the number of genes.
    ///
    /// - `genes < 20` → [`fast()`](Self::fast)
    /// - `20 ≤ genes < 100` → [`balanced()`](Self::balanced)
    /// - `genes ≥ 100` → [`quality()`](Self::quality)
    pub fn auto_select(genes: usize) -> Self {
        if genes < 20 {
            Self::fast()
        } else if genes < 100 {
            Self::balanced()
        } else {
            Self::quality()
        }
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), String> {
        if self.population_size < 2 {
            return Err("population_size must be at least 2".into());
        }
        if self.max_generations == 0 {
            return Err("max_generations must be at least 1".into());
        }
        if self.elite_count >= self.population_size {
            return Err(format!(
                "elite_count {} leaves no room for children in a population of {}",
                self.elite_count, self.population_size
            ));
        }
        if !(0.0..=1.0).contains(&self.crossover_rate) {
            return Err("crossover_rate must be in [0, 1]".into());
        }
        if !(0.0..=1.0).contains(&self.mutation_rate) {
            return Err("mutation_rate must be in [0, 1]".into());
        }
        if let Selection::Tournament(0) = self.selection {
            return Err("tournament size must be at least 1".into());
        }
        if self.target_fitness.is_some_and(f64::is_nan) {
            return Err("target_fitness must not be NaN".into());
        }
        if self.time_limit_ms == Some(0) {
            return Err("time_limit_ms must be positive or None".into());
        }
        Ok(())
    }
}
