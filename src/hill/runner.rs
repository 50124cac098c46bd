//! Hill climbing execution loop.

use super::config::{Acceptance, HillClimbingConfig, Neighborhood};
use crate::error::{Result, TspError};
use crate::matrix::DistanceMatrix;
use crate::random::rng_from;
use crate::solver::{Deadline, RunContext, SolveResult, SolveStatus, Solver};
use crate::tour::{cost_of, random_closed_tour, validate_closed_tour};
use log::{debug, trace};
use rand::rngs::StdRng;
use rand::Rng;

/// Outcome of one climb.
struct Climb {
    tour: Vec<usize>,
    cost: f64,
    steps: usize,
    status: SolveStatus,
}

/// Shared state of a multi-climb run.
struct Run<'c, 'a> {
    ctx: &'c mut RunContext<'a>,
    deadline: Deadline,
    /// Best cost over every climb so far; trace events fire below it.
    best_cost: f64,
    /// Steps spent by earlier climbs, so trace iterations keep increasing.
    offset: usize,
}

impl Run<'_, '_> {
    fn improved(&mut self, step: usize, cost: f64, tour: &[usize]) {
        if cost < self.best_cost {
            self.best_cost = cost;
            self.ctx.emit(self.offset + step, cost, tour);
        }
    }
}

/// Local search over closed tours.
///
/// Each climb starts from the configured start tour (first climb only) or a
/// uniform random one, and is improved by moves between interior positions
/// `1..n`. Location 0 stays fixed at both ends.
///
/// With [`Acceptance::Steepest`] the whole neighborhood is evaluated and the
/// first cheapest neighbor is taken while it is strictly better, so a climb
/// from a given start tour is deterministic. The climb ends with
/// [`SolveStatus::LocalOptimum`]. The returned tour is never worse than the
/// first start tour, whose cost is reported as `initial_cost`.
///
/// # Examples
///
/// ```
/// use tsp_search::{DistanceMatrix, Solver};
/// use tsp_search::hill::{HillClimbingConfig, HillClimbingSolver};
///
/// let m = DistanceMatrix::from_rows(vec![
///     vec![0.0, 10.0, 15.0, 20.0],
///     vec![10.0, 0.0, 35.0, 25.0],
///     vec![15.0, 35.0, 0.0, 30.0],
///     vec![20.0, 25.0, 30.0, 0.0],
/// ]).unwrap();
/// let solver = HillClimbingSolver::new(HillClimbingConfig::default().with_seed(7));
/// let result = solver.solve(&m).unwrap();
/// assert_eq!(result.cost, 80.0);
/// assert!(result.cost <= result.initial_cost.unwrap());
/// ```
#[derive(Debug, Clone, Default)]
pub struct HillClimbingSolver {
    config: HillClimbingConfig,
}

impl HillClimbingSolver {
    pub fn new(config: HillClimbingConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &HillClimbingConfig {
        &self.config
    }

    fn climb(
        &self,
        start: Vec<usize>,
        matrix: &DistanceMatrix,
        rng: &mut StdRng,
        run: &mut Run<'_, '_>,
    ) -> Climb {
        let cost = cost_of(&start, matrix);
        run.improved(0, cost, &start);
        match self.config.acceptance {
            Acceptance::Steepest => self.steepest(start, cost, matrix, run),
            Acceptance::Stochastic { temperature } => {
                self.stochastic(start, cost, temperature, matrix, rng, run)
            }
        }
    }

    fn steepest(
        &self,
        mut tour: Vec<usize>,
        mut cost: f64,
        matrix: &DistanceMatrix,
        run: &mut Run<'_, '_>,
    ) -> Climb {
        let n = matrix.len();
        let neighborhood = self.config.neighborhood;
        let mut candidate = tour.clone();
        let mut steps = 0usize;

        let status = loop {
            if steps >= self.config.max_iterations {
                break SolveStatus::IterationLimit;
            }
            if run.deadline.expired() {
                break SolveStatus::TimeLimit;
            }

            let mut best_move = None;
            let mut best_cost = cost;
            for i in 1..n {
                for j in (i + 1)..n {
                    candidate.copy_from_slice(&tour);
                    neighborhood.apply(&mut candidate, i, j);
                    let c = cost_of(&candidate, matrix);
                    if c < best_cost {
                        best_cost = c;
                        best_move = Some((i, j));
                    }
                }
            }

            let Some((i, j)) = best_move else {
                break SolveStatus::LocalOptimum;
            };
            neighborhood.apply(&mut tour, i, j);
            cost = best_cost;
            steps += 1;
            trace!("hill: step {steps} moved ({i}, {j}) to cost {cost:.4}");
            run.improved(steps, cost, &tour);
        };

        Climb {
            tour,
            cost,
            steps,
            status,
        }
    }

    fn stochastic(
        &self,
        start: Vec<usize>,
        start_cost: f64,
        temperature: f64,
        matrix: &DistanceMatrix,
        rng: &mut StdRng,
        run: &mut Run<'_, '_>,
    ) -> Climb {
        let n = matrix.len();
        if n < 3 {
            return Climb {
                tour: start,
                cost: start_cost,
                steps: 0,
                status: SolveStatus::LocalOptimum,
            };
        }

        let neighborhood = self.config.neighborhood;
        let mut current = start;
        let mut current_cost = start_cost;
        let mut best = current.clone();
        let mut best_cost = current_cost;
        let mut candidate = current.clone();
        let mut steps = 0usize;

        let status = loop {
            if steps >= self.config.max_iterations {
                break SolveStatus::Completed;
            }
            if run.deadline.expired() {
                break SolveStatus::TimeLimit;
            }
            steps += 1;

            let a = rng.random_range(1..n);
            let mut b = rng.random_range(1..n - 1);
            if b >= a {
                b += 1;
            }
            let (i, j) = (a.min(b), a.max(b));

            candidate.copy_from_slice(&current);
            neighborhood.apply(&mut candidate, i, j);
            let candidate_cost = cost_of(&candidate, matrix);
            let delta = candidate_cost - current_cost;

            // Metropolis rule at a fixed temperature
            let accept = delta < 0.0 || rng.random_range(0.0..1.0) < (-delta / temperature).exp();
            if !accept {
                continue;
            }
            std::mem::swap(&mut current, &mut candidate);
            current_cost = candidate_cost;

            if current_cost < best_cost {
                best.copy_from_slice(&current);
                best_cost = current_cost;
                run.improved(steps, best_cost, &best);
            }
        };

        Climb {
            tour: best,
            cost: best_cost,
            steps,
            status,
        }
    }
}

impl Solver for HillClimbingSolver {
    fn name(&self) -> &str {
        match (self.config.acceptance, self.config.neighborhood) {
            (Acceptance::Steepest, Neighborhood::Swap) => "hill_climbing",
            (Acceptance::Steepest, Neighborhood::TwoOpt) => "hill_climbing_2opt",
            (Acceptance::Stochastic { .. }, Neighborhood::Swap) => "hill_climbing_stochastic",
            (Acceptance::Stochastic { .. }, Neighborhood::TwoOpt) => "hill_climbing_stochastic_2opt",
        }
    }

    fn solve_with(&self, matrix: &DistanceMatrix, ctx: &mut RunContext<'_>) -> Result<SolveResult> {
        self.config.validate().map_err(TspError::Config)?;

        let n = matrix.len();
        if n <= 1 {
            return Ok(SolveResult::trivial());
        }
        if let Some(start) = &self.config.start_tour {
            validate_closed_tour(start, n)?;
        }

        let mut rng = rng_from(ctx.seed_or(self.config.seed));
        let mut run = Run {
            ctx,
            deadline: Deadline::after_ms(self.config.time_limit_ms),
            best_cost: f64::INFINITY,
            offset: 0,
        };

        let first = match &self.config.start_tour {
            Some(tour) => tour.clone(),
            None => random_closed_tour(n, &mut rng),
        };
        let initial_cost = cost_of(&first, matrix);
        let mut best = self.climb(first, matrix, &mut rng, &mut run);
        run.offset = best.steps;
        let mut climbs = 1usize;

        while climbs < self.config.restarts {
            if run.deadline.expired() {
                best.status = SolveStatus::TimeLimit;
                break;
            }
            let start = random_closed_tour(n, &mut rng);
            let climb = self.climb(start, matrix, &mut rng, &mut run);
            run.offset += climb.steps;
            climbs += 1;
            if climb.cost < best.cost {
                best = climb;
            }
        }

        debug!(
            "hill: best {:.4} from start {initial_cost:.4} over {climbs} climb(s), {} steps",
            best.cost, run.offset
        );

        Ok(SolveResult {
            tour: best.tour,
            cost: best.cost,
            steps: run.offset,
            status: best.status,
            optimal: false,
            initial_cost: Some(initial_cost),
        })
    }
}
