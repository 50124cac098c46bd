//! Beam search execution loop.

use super::config::{BeamConfig, BeamPolicy, BeamSelection};
use crate::error::{Result, TspError};
use crate::matrix::DistanceMatrix;
use crate::random::rng_from;
use crate::solver::{Deadline, RunContext, SolveResult, SolveStatus, Solver};
use crate::state::SearchState;
use crate::tour::{cost_of, nearest_neighbor_completion, random_closed_tour};
use log::{debug, trace};
use rand::rngs::StdRng;
use std::collections::HashSet;

const START: usize = 0;

struct Outcome {
    tour: Vec<usize>,
    cost: f64,
    steps: usize,
    status: SolveStatus,
    initial_cost: Option<f64>,
}

/// Best complete tour seen over every iteration.
#[derive(Default)]
struct Incumbent {
    best: Option<(Vec<usize>, f64)>,
}

impl Incumbent {
    fn offer(&mut self, step: usize, tour: &[usize], cost: f64, ctx: &mut RunContext<'_>) -> bool {
        if self.best.as_ref().is_some_and(|(_, best)| cost >= *best) {
            return false;
        }
        ctx.emit(step, cost, tour);
        self.best = Some((tour.to_vec(), cost));
        true
    }

    fn cost(&self) -> f64 {
        self.best.as_ref().map_or(f64::INFINITY, |(_, c)| *c)
    }
}

/// Beam search over partial or complete tours.
///
/// # Examples
///
/// ```
/// use tsp_search::{DistanceMatrix, Solver};
/// use tsp_search::beam::{BeamConfig, BeamSearchSolver};
/// use tsp_search::tour::nearest_neighbor_completion;
///
/// let m = DistanceMatrix::from_coords(&[(0.0, 0.0), (3.0, 0.0), (3.0, 4.0), (0.0, 4.0)]);
/// let greedy = BeamSearchSolver::new(BeamConfig::default().with_beam_width(1));
/// let result = greedy.solve(&m).unwrap();
/// assert_eq!(result.tour, nearest_neighbor_completion(&[0], &m));
/// ```
#[derive(Debug, Clone, Default)]
pub struct BeamSearchSolver {
    config: BeamConfig,
}

impl BeamSearchSolver {
    pub fn new(config: BeamConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &BeamConfig {
        &self.config
    }

    /// Grows partial tours from location 0 until every member is closed.
    fn extend(
        &self,
        matrix: &DistanceMatrix,
        rng: &mut StdRng,
        deadline: Deadline,
        ctx: &mut RunContext<'_>,
    ) -> Outcome {
        let n = matrix.len();
        let mut beam = vec![SearchState::root(n, START)];
        let mut incumbent = Incumbent::default();
        let mut steps = 0usize;

        let status = loop {
            if beam.iter().all(|s| s.is_complete(n)) {
                break SolveStatus::Completed;
            }
            if steps >= self.config.max_iterations {
                break SolveStatus::IterationLimit;
            }
            if deadline.expired() {
                break SolveStatus::TimeLimit;
            }
            steps += 1;

            let mut children = Vec::new();
            let mut costs = Vec::new();
            for member in &beam {
                for next in member.unvisited(n) {
                    let child = member.extend(next, matrix);
                    let cost = if child.is_complete(n) {
                        let (tour, cost) = child.closed(matrix);
                        incumbent.offer(steps, &tour, cost, ctx);
                        cost
                    } else {
                        child.g
                    };
                    children.push(child);
                    costs.push(cost);
                }
            }
            if children.is_empty() {
                break SolveStatus::Exhausted;
            }

            let keep = self.config.selection.select(&costs, self.config.beam_width, rng);
            trace!(
                "beam: iteration {steps}, {} children, kept {} (best kept {:.4})",
                children.len(),
                keep.len(),
                keep.iter().map(|&i| costs[i]).fold(f64::INFINITY, f64::min)
            );
            let mut slots: Vec<Option<SearchState>> = children.into_iter().map(Some).collect();
            beam = keep.into_iter().filter_map(|i| slots[i].take()).collect();
        };

        match incumbent.best {
            Some((tour, cost)) => Outcome {
                tour,
                cost,
                steps,
                status,
                initial_cost: None,
            },
            None => {
                // Budget ran out before any member closed; finish the
                // cheapest partial tour greedily.
                let prefix = beam
                    .iter()
                    .min_by(|a, b| a.g.total_cmp(&b.g))
                    .map(|s| s.path.clone())
                    .unwrap_or_else(|| vec![START]);
                let tour = nearest_neighbor_completion(&prefix, matrix);
                let cost = cost_of(&tour, matrix);
                Outcome {
                    tour,
                    cost,
                    steps,
                    status,
                    initial_cost: None,
                }
            }
        }
    }

    /// Local beam search: pairwise swaps of complete tours until no child
    /// beats the best tour seen.
    fn swap(
        &self,
        matrix: &DistanceMatrix,
        rng: &mut StdRng,
        deadline: Deadline,
        ctx: &mut RunContext<'_>,
    ) -> Outcome {
        let n = matrix.len();
        let mut incumbent = Incumbent::default();
        let mut beam: Vec<Vec<usize>> = (0..self.config.beam_width)
            .map(|_| random_closed_tour(n, rng))
            .collect();
        for tour in &beam {
            incumbent.offer(0, tour, cost_of(tour, matrix), ctx);
        }
        let initial_cost = incumbent.best.as_ref().map(|(_, cost)| *cost);
        let mut steps = 0usize;

        let status = loop {
            if steps >= self.config.max_iterations {
                break SolveStatus::IterationLimit;
            }
            if deadline.expired() {
                break SolveStatus::TimeLimit;
            }
            steps += 1;

            let mut seen: HashSet<Vec<usize>> = HashSet::new();
            let mut children = Vec::new();
            let mut costs = Vec::new();
            for member in &beam {
                for i in 1..n {
                    for j in (i + 1)..n {
                        let mut child = member.clone();
                        child.swap(i, j);
                        if seen.contains(&child) {
                            continue;
                        }
                        seen.insert(child.clone());
                        costs.push(cost_of(&child, matrix));
                        children.push(child);
                    }
                }
            }
            if children.is_empty() {
                break SolveStatus::LocalOptimum;
            }

            let round_best = costs
                .iter()
                .enumerate()
                .min_by(|a, b| a.1.total_cmp(b.1))
                .map(|(i, _)| i);
            let improved = match round_best {
                Some(i) => incumbent.offer(steps, &children[i], costs[i], ctx),
                None => false,
            };

            let keep = self.config.selection.select(&costs, self.config.beam_width, rng);
            let mut slots: Vec<Option<Vec<usize>>> = children.into_iter().map(Some).collect();
            beam = keep.into_iter().filter_map(|i| slots[i].take()).collect();

            if !improved {
                break SolveStatus::LocalOptimum;
            }
            trace!("beam: iteration {steps}, best {:.4}", incumbent.cost());
        };

        let (tour, cost) = incumbent.best.unwrap_or_else(|| {
            let tour = random_closed_tour(n, rng);
            let cost = cost_of(&tour, matrix);
            (tour, cost)
        });
        Outcome {
            tour,
            cost,
            steps,
            status,
            initial_cost,
        }
    }
}

impl Solver for BeamSearchSolver {
    fn name(&self) -> &str {
        match (self.config.policy, self.config.selection) {
            (BeamPolicy::Extend, BeamSelection::TopK) => "beam",
            (BeamPolicy::Extend, BeamSelection::Boltzmann { .. }) => "beam_stochastic",
            (BeamPolicy::Swap, BeamSelection::TopK) => "beam_swap",
            (BeamPolicy::Swap, BeamSelection::Boltzmann { .. }) => "beam_swap_stochastic",
        }
    }

    fn solve_with(&self, matrix: &DistanceMatrix, ctx: &mut RunContext<'_>) -> Result<SolveResult> {
        self.config.validate().map_err(TspError::Config)?;

        if matrix.len() <= 1 {
            return Ok(SolveResult::trivial());
        }

        let mut rng = rng_from(ctx.seed_or(self.config.seed));
        let deadline = Deadline::after_ms(self.config.time_limit_ms);
        let outcome = match self.config.policy {
            BeamPolicy::Extend => self.extend(matrix, &mut rng, deadline, ctx),
            BeamPolicy::Swap => self.swap(matrix, &mut rng, deadline, ctx),
        };
        debug!(
            "{}: {:?} after {} iterations, best {:.4}",
            self.name(),
            outcome.status,
            outcome.steps,
            outcome.cost
        );

        Ok(SolveResult {
            tour: outcome.tour,
            cost: outcome.cost,
            steps: outcome.steps,
            status: outcome.status,
            optimal: false,
            initial_cost: outcome.initial_cost,
        })
    }
}
