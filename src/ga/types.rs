//! Core trait definitions for the GA engine.
//!
//! [`Individual`] and [`GaProblem`] are the contract between the generic
//! evolutionary loop and a concrete chromosome encoding (tour permutations,
//! knapsack bit vectors).

use rand::Rng;

/// Fitness values. Lower is better (minimization).
///
/// Maximization problems negate their objective.
pub trait Fitness: PartialOrd + Copy + Send + Sync + std::fmt::Debug + 'static {
    /// Fitness of an individual that has not been evaluated yet.
    fn worst() -> Self;

    /// Converts the fitness to `f64` for history, targets, and roulette
    /// weights.
    fn to_f64(self) -> f64;
}

impl Fitness for f64 {
    fn worst() -> Self {
        f64::INFINITY
    }

    fn to_f64(self) -> f64 {
        self
    }
}

/// A fixed-length chromosome that carries its own fitness.
///
/// Fitness is a pure function of the genes: the engine computes it with
/// [`GaProblem::evaluate`] and stores it through
/// [`set_fitness`](Individual::set_fitness).
pub trait Individual: Clone + Send + Sync {
    type Fitness: Fitness;

    fn fitness(&self) -> Self::Fitness;

    fn set_fitness(&mut self, fitness: Self::Fitness);

    /// Natural roulette weight, for encodings whose objective is a
    /// non-negative quantity to maximize (e.g. knapsack value).
    ///
    /// `None` (the default) lets roulette derive a weight from the fitness
    /// by inversion.
    fn selection_weight(&self) -> Option<f64> {
        None
    }
}

/// A problem the GA can optimize.
///
/// `GaProblem` must be `Send + Sync` because the runner may evaluate the
/// population in parallel with rayon.
pub trait GaProblem: Send + Sync {
    type Individual: Individual;

    /// Creates a random, valid individual.
    fn create_individual<R: Rng>(&self, rng: &mut R) -> Self::Individual;

    /// Computes the fitness of an individual.
    fn evaluate(&self, individual: &Self::Individual) -> <Self::Individual as Individual>::Fitness;

    /// Recombines two parents into one or two children.
    ///
    /// The default clones both parents.
    fn crossover<R: Rng>(
        &self,
        parent1: &Self::Individual,
        parent2: &Self::Individual,
        _rng: &mut R,
    ) -> Vec<Self::Individual> {
        vec![parent1.clone(), parent2.clone()]
    }

    /// Mutates each gene independently with probability `gene_rate`.
    ///
    /// The default is a no-op.
    fn mutate<R: Rng>(&self, _individual: &mut Self::Individual, _gene_rate: f64, _rng: &mut R) {}
}
