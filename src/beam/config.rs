//! Beam search configuration and selection policies.

use rand::Rng;

/// How the children of a beam are generated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BeamPolicy {
    /// Members are partial tours from location 0; each child appends one
    /// unvisited location. Partial tours are ranked by their path cost and
    /// complete ones by their closed cost.
    #[default]
    Extend,

    /// Members are complete closed tours; each child swaps two interior
    /// positions (local beam search).
    Swap,
}

/// How the next beam is picked from the children.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum BeamSelection {
    /// Keep the `beam_width` cheapest children; ties keep generation order.
    #[default]
    TopK,

    /// Sample `beam_width` children without replacement with probability
    /// proportional to `exp(-cost / T)`.
    Boltzmann {
        /// Softmax temperature `T > 0`. Higher values flatten the
        /// distribution.
        temperature: f64,
    },
}

impl BeamSelection {
    /// Picks up to `k` indices into `costs`.
    ///
    /// For `Boltzmann` the weights are shifted by the minimum cost before
    /// exponentiation, which leaves the distribution unchanged but keeps the
    /// cheapest child's weight at 1. If the remaining weight still sums to
    /// zero the pick falls back to uniform.
    pub fn select<R: Rng + ?Sized>(self, costs: &[f64], k: usize, rng: &mut R) -> Vec<usize> {
        let k = k.min(costs.len());
        match self {
            BeamSelection::TopK => {
                let mut order: Vec<usize> = (0..costs.len()).collect();
                order.sort_by(|&a, &b| costs[a].total_cmp(&costs[b]));
                order.truncate(k);
                order
            }
            BeamSelection::Boltzmann { temperature } => {
                let min = costs.iter().copied().fold(f64::INFINITY, f64::min);
                let weights: Vec<f64> = costs
                    .iter()
                    .map(|&c| (-(c - min) / temperature).exp())
                    .collect();

                let mut remaining: Vec<usize> = (0..costs.len()).collect();
                let mut chosen = Vec::with_capacity(k);
                while chosen.len() < k {
                    let total: f64 = remaining.iter().map(|&i| weights[i]).sum();
                    let pos = if total > 0.0 && total.is_finite() {
                        let mut ball = rng.random_range(0.0..total);
                        let mut pos = remaining.len() - 1;
                        for (p, &i) in remaining.iter().enumerate() {
                            if ball < weights[i] {
                                pos = p;
                                break;
                            }
                            ball -= weights[i];
                        }
                        pos
                    } else {
                        rng.random_range(0..remaining.len())
                    };
                    chosen.push(remaining.remove(pos));
                }
                chosen
            }
        }
    }
}

/// Configuration for [`BeamSearchSolver`](super::BeamSearchSolver).
///
/// # Examples
///
/// ```
/// use tsp_search::beam::{BeamConfig, BeamSelection};
///
/// let config = BeamConfig::default()
///     .with_beam_width(5)
///     .with_selection(BeamSelection::Boltzmann { temperature: 1.0 })
///     .with_seed(42);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone)]
pub struct BeamConfig {
    /// Maximum number of members kept per iteration.
    pub beam_width: usize,

    /// Iteration cap. `Extend` needs `n - 1` iterations to close a tour.
    pub max_iterations: usize,

    pub policy: BeamPolicy,

    pub selection: BeamSelection,

    /// Random seed for reproducibility.
    pub seed: Option<u64>,

    /// Optional wall-clock limit in milliseconds.
    pub time_limit_ms: Option<u64>,
}

impl Default for BeamConfig {
    fn default() -> Self {
        Self {
            beam_width: 3,
            max_iterations: 100,
            policy: BeamPolicy::Extend,
            selection: BeamSelection::TopK,
            seed: None,
            time_limit_ms: None,
        }
    }
}

impl BeamConfig {
    /// Stochastic beam: `Extend` with Boltzmann selection.
    pub fn stochastic(temperature: f64) -> Self {
        Self {
            selection: BeamSelection::Boltzmann { temperature },
            ..Self::default()
        }
    }

    /// Local beam search over complete tours.
    pub fn local(beam_width: usize) -> Self {
        Self {
            beam_width,
            policy: BeamPolicy::Swap,
            ..Self::default()
        }
    }

    pub fn with_beam_width(mut self, k: usize) -> Self {
        self.beam_width = k;
        self
    }

    pub fn with_max_iterations(mut self, n: usize) -> Self {
        self.max_iterations = n;
        self
    }

    pub fn with_policy(mut self, policy: BeamPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_selection(mut self, selection: BeamSelection) -> Self {
        self.selection = selection;
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
    pub fn validate(&self) -> Result<(), String> {
        if self.beam_width == 0 {
            return Err("beam_width must be at least 1".into());
        }
        if self.max_iterations == 0 {
            return Err("max_iterations must be at least 1".into());
        }
        if let BeamSelection::Boltzmann { temperature } = self.selection {
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
