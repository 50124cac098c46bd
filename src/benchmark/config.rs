//! Benchmark configuration.

/// Parameters of a benchmark sweep.
///
/// # Examples
///
/// ```
/// use tsp_search::benchmark::BenchmarkConfig;
///
/// let config = BenchmarkConfig::default().with_runs(10).with_base_seed(42);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct BenchmarkConfig {
    /// Runs of every solver on every instance. Run `r` uses seed
    /// `base_seed + r`.
    pub runs_per_solver: usize,

    pub base_seed: u64,

    /// Spread runs over rayon workers.
    pub parallel: bool,

    /// Keep every solver's trace events in its record.
    pub record_trace: bool,
}

impl Default for BenchmarkConfig {
    fn default() -> Self {
        Self {
            runs_per_solver: 5,
            base_seed: 0,
            parallel: true,
            record_trace: false,
        }
    }
}

impl BenchmarkConfig {
    pub fn with_runs(mut self, runs: usize) -> Self {
        self.runs_per_solver = runs;
        self
    }

    pub fn with_base_seed(mut self, seed: u64) -> Self {
        self.base_seed = seed;
        self
    }

    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn with_record_trace(mut self, record: bool) -> Self {
        self.record_trace = record;
        self
    }

    /// Seed of run `run`.
    pub fn seed_for(&self, run: usize) -> u64 {
        self.base_seed.wrapping_add(run as u64)
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), String> {
        if self.runs_per_solver == 0 {
            return Err("runs_per_solver must be at least 1".into());
        }
        Ok(())
    }
}
