//! Tours as GA chromosomes and the [`GeneticSolver`].

use super::config::GaConfig;
use super::operators::{order_crossover, order_single_point_crossover, swap_gene_mutation};
use super::runner::GaRunner;
use super::types::{GaProblem, Individual};
use crate::error::Result;
use crate::matrix::DistanceMatrix;
use crate::random::shuffle;
use crate::solver::{RunContext, SolveResult, SolveStatus, Solver};
use crate::tour::{close, closed_cost};
use rand::Rng;

/// Interior order of a closed tour (`1..n` in some order) with its cost.
#[derive(Debug, Clone, PartialEq)]
pub struct TourChromosome {
    pub interior: Vec<usize>,
    pub fitness: f64,
}

impl TourChromosome {
    pub fn new(interior: Vec<usize>) -> Self {
        Self {
            interior,
            fitness: f64::INFINITY,
        }
    }

    /// The closed tour `[0, interior…, 0]`.
    pub fn tour(&self) -> Vec<usize> {
        close(&self.interior)
    }
}

impl Individual for TourChromosome {
    type Fitness = f64;

    fn fitness(&self) -> f64 {
        self.fitness
    }

    fn set_fitness(&mut self, fitness: f64) {
        self.fitness = fitness;
    }
}

/// Recombination operator for tour chromosomes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TourCrossover {
    /// Single cut; the tail is refilled in the other parent's order.
    #[default]
    SinglePoint,
    /// Two-point order crossover (OX).
    Order,
}

/// The TSP over a borrowed matrix; fitness is the closed tour cost.
#[derive(Debug, Clone, Copy)]
pub struct TourProblem<'m> {
    matrix: &'m DistanceMatrix,
    crossover: TourCrossover,
}

impl<'m> TourProblem<'m> {
    pub fn new(matrix: &'m DistanceMatrix, crossover: TourCrossover) -> Self {
        Self { matrix, crossover }
    }
}

impl GaProblem for TourProblem<'_> {
    type Individual = TourChromosome;

    fn create_individual<R: Rng>(&self, rng: &mut R) -> TourChromosome {
        let mut interior: Vec<usize> = (1..self.matrix.len()).collect();
        shuffle(&mut interior, rng);
        TourChromosome::new(interior)
    }

    fn evaluate(&self, individual: &TourChromosome) -> f64 {
        closed_cost(&individual.interior, self.matrix)
    }

    fn crossover<R: Rng>(
        &self,
        parent1: &TourChromosome,
        parent2: &TourChromosome,
        rng: &mut R,
    ) -> Vec<TourChromosome> {
        let (a, b) = match self.crossover {
            TourCrossover::SinglePoint => {
                order_single_point_crossover(&parent1.interior, &parent2.interior, rng)
            }
            TourCrossover::Order => order_crossover(&parent1.interior, &parent2.interior, rng),
        };
        vec![TourChromosome::new(a), TourChromosome::new(b)]
    }

    fn mutate<R: Rng>(&self, individual: &mut TourChromosome, gene_rate: f64, rng: &mut R) {
        swap_gene_mutation(&mut individual.interior, gene_rate, rng);
    }
}

/// Genetic algorithm over tour permutations.
///
/// Location 0 is fixed at both ends; the chromosome is the interior order.
/// The status is `TargetReached` when the configured target cost was met,
/// `TimeLimit` when the clock ran out, and `Completed` otherwise.
///
/// # Examples
///
/// ```
/// use tsp_search::{DistanceMatrix, Solver};
/// use tsp_search::ga::{GaConfig, GeneticSolver};
///
/// let m = DistanceMatrix::from_rows(vec![
///     vec![0.0, 10.0, 15.0, 20.0],
///     vec![10.0, 0.0, 35.0, 25.0],
///     vec![15.0, 35.0, 0.0, 30.0],
///     vec![20.0, 25.0, 30.0, 0.0],
/// ]).unwrap();
/// let config = GaConfig::fast().with_seed(1).with_target_fitness(80.0);
/// let result = GeneticSolver::new(config).solve(&m).unwrap();
/// assert_eq!(result.cost, 80.0);
/// ```
#[derive(Debug, Clone, Default)]
pub struct GeneticSolver {
    config: GaConfig,
    crossover: TourCrossover,
}

impl GeneticSolver {
    pub fn new(config: GaConfig) -> Self {
        Self {
            config,
            crossover: TourCrossover::default(),
        }
    }

    pub fn with_crossover(mut self, crossover: TourCrossover) -> Self {
        self.crossover = crossover;
        self
    }

    pub fn config(&self) -> &GaConfig {
        &self.config
    }
}

impl Solver for GeneticSolver {
    fn name(&self) -> &str {
        "genetic"
    }

    fn solve_with(&self, matrix: &DistanceMatrix, ctx: &mut RunContext<'_>) -> Result<SolveResult> {
        if matrix.len() <= 1 {
            self.config.validate().map_err(crate::error::TspError::Config)?;
            return Ok(SolveResult::trivial());
        }

        let mut config = self.config.clone();
        config.seed = ctx.seed_or(config.seed);
        let problem = TourProblem::new(matrix, self.crossover);
        let result = GaRunner::run_observed(&problem, &config, |generation, best| {
            ctx.emit(generation, best.fitness, &best.tour());
        })?;

        let status = if result.target_reached {
            SolveStatus::TargetReached
        } else if result.timed_out {
            SolveStatus::TimeLimit
        } else {
            SolveStatus::Completed
        };

        Ok(SolveResult {
            tour: result.best.tour(),
            cost: result.best_fitness,
            steps: result.generations,
            status,
            optimal: false,
            initial_cost: result.fitness_history.first().copied(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ga::Selection;
    use crate::matrix::random_coords;
    use crate::random::create_rng;
    use crate::solver::TraceEvent;
    use crate::tour::{brute_force_optimum, cost_of, is_closed_tour};

    fn lab_matrix() -> DistanceMatrix {
        DistanceMatrix::from_rows(vec![
            vec![0.0, 10.0, 15.0, 20.0],
            vec![10.0, 0.0, 35.0, 25.0],
            vec![15.0, 35.0, 0.0, 30.0],
            vec![20.0, 25.0, 30.0, 0.0],
        ])
        .unwrap()
    }

    fn small_config() -> GaConfig {
        GaConfig::default()
            .with_population_size(40)
            .with_max_generations(150)
            .with_parallel(false)
    }

    #[test]
    fn test_lab_instance() {
        let solver = GeneticSolver::new(small_config().with_seed(3));
        let result = solver.solve(&lab_matrix()).unwrap();
        assert_eq!(result.cost, 80.0);
        assert!(is_closed_tour(&result.tour, 4));
        assert_eq!(result.status, SolveStatus::Completed);
    }

    #[test]
    fn test_target_reached() {
        let config = small_config().with_seed(5).with_target_fitness(80.0);
        let result = GeneticSolver::new(config).solve(&lab_matrix()).unwrap();
        assert_eq!(result.status, SolveStatus::TargetReached);
        assert!(result.steps < 150);
    }

    #[test]
    fn test_tour_is_valid_and_costed() {
        let mut rng = create_rng(9);
        let m = DistanceMatrix::from_coords(&random_coords(12, &mut rng));
        for crossover in [TourCrossover::SinglePoint, TourCrossover::Order] {
            let solver = GeneticSolver::new(small_config().with_seed(9)).with_crossover(crossover);
            let result = solver.solve(&m).unwrap();
            assert!(is_closed_tour(&result.tour, 12));
            assert!((cost_of(&result.tour, &m) - result.cost).abs() < 1e-9);
            assert!(result.cost <= result.initial_cost.unwrap());
        }
    }

    #[test]
    fn test_near_optimal_on_small_instance() {
        let mut rng = create_rng(21);
        let m = DistanceMatrix::from_coords(&random_coords(7, &mut rng));
        let (_, exact) = brute_force_optimum(&m);
        let config = small_config()
            .with_selection(Selection::Tournament(3))
            .with_seed(21);
        let result = GeneticSolver::new(config).solve(&m).unwrap();
        assert!(result.cost <= exact * 1.1, "{} vs {exact}", result.cost);
    }

    #[test]
    fn test_seed_override_is_reproducible() {
        let mut rng = create_rng(4);
        let m = DistanceMatrix::from_coords(&random_coords(10, &mut rng));
        let solver = GeneticSolver::new(small_config());
        let a = solver.solve_with(&m, &mut RunContext::new().with_seed(77)).unwrap();
        let b = solver.solve_with(&m, &mut RunContext::new().with_seed(77)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_trace_is_improving() {
        let mut rng = create_rng(14);
        let m = DistanceMatrix::from_coords(&random_coords(10, &mut rng));
        let mut events: Vec<TraceEvent> = Vec::new();
        let result = {
            let mut ctx = RunContext::new().with_seed(14).with_trace(&mut events);
            GeneticSolver::new(small_config()).solve_with(&m, &mut ctx).unwrap()
        };
        assert!(events.windows(2).all(|w| w[1].best_cost < w[0].best_cost));
        assert_eq!(events.last().unwrap().best_cost, result.cost);
        assert_eq!(events.last().unwrap().tour, result.tour);
    }

    #[test]
    fn test_generation_best_never_increases() {
        let mut rng = create_rng(8);
        let m = DistanceMatrix::from_coords(&random_coords(8, &mut rng));
        let config = small_config().with_seed(8);
        assert_eq!(config.elite_count, 1);

        let problem = TourProblem::new(&m, TourCrossover::SinglePoint);
        let run = GaRunner::run(&problem, &config).unwrap();
        assert_eq!(run.population_best.len(), run.generations + 1);
        for w in run.population_best.windows(2) {
            assert!(w[1] <= w[0], "{} after {}", w[1], w[0]);
        }

        let solver = GeneticSolver::new(config).with_crossover(TourCrossover::SinglePoint);
        let result = solver.solve(&m).unwrap();
        assert!(is_closed_tour(&result.tour, 8));
        assert_eq!(result.cost, run.best_fitness);
        assert_eq!(Some(result.cost), run.population_best.last().copied());
        assert!(result.cost <= result.initial_cost.unwrap());
    }

    #[test]
    fn test_trivial_and_two_cities() {
        let one = DistanceMatrix::from_rows(vec![vec![0.0]]).unwrap();
        assert_eq!(GeneticSolver::default().solve(&one).unwrap().tour, vec![0]);

        let two = DistanceMatrix::from_rows(vec![vec![0.0, 4.0], vec![6.0, 0.0]]).unwrap();
        let result = GeneticSolver::new(small_config().with_seed(1)).solve(&two).unwrap();
        assert_eq!(result.tour, vec![0, 1, 0]);
        assert_eq!(result.cost, 10.0);
    }
}
