//! A* search loop.

use super::config::AStarConfig;
use crate::error::{Result, TspError};
use crate::matrix::DistanceMatrix;
use crate::solver::{Deadline, RunContext, SolveResult, SolveStatus, Solver};
use crate::state::{frontier_order, SearchState, StateKey};
use crate::tour::nearest_neighbor_completion;
use log::{debug, trace};
use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap};

const START: usize = 0;

/// Frontier entry; reversed ordering turns `BinaryHeap` into a min-heap.
struct Entry {
    f: f64,
    state: SearchState,
}

impl Entry {
    fn priority(&self) -> (f64, f64, &[usize]) {
        (self.f, self.state.g, self.state.path.as_slice())
    }
}

impl PartialEq for Entry {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Entry {}

impl PartialOrd for Entry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Entry {
    fn cmp(&self, other: &Self) -> Ordering {
        frontier_order(other.priority(), self.priority())
    }
}

/// Exact TSP by best-first search over partial tours.
///
/// The frontier is ordered by `f = g + h`, ties broken by `g` and then by
/// path, so runs are reproducible. A state whose key was already expanded
/// with a cost at most its own `g` is skipped as stale. Because every
/// heuristic here is exact on complete states, the first complete state
/// popped is an optimal tour and the search stops there.
///
/// When the iteration or time budget runs out first, the best complete tour
/// generated so far is returned (or a nearest-neighbor completion of the
/// most promising frontier state) with `optimal = false`.
///
/// # Examples
///
/// ```
/// use tsp_search::{DistanceMatrix, Solver};
/// use tsp_search::astar::AStarSolver;
///
/// let m = DistanceMatrix::from_rows(vec![
///     vec![0.0, 10.0, 15.0, 20.0],
///     vec![10.0, 0.0, 35.0, 25.0],
///     vec![15.0, 35.0, 0.0, 30.0],
///     vec![20.0, 25.0, 30.0, 0.0],
/// ]).unwrap();
/// let result = AStarSolver::default().solve(&m).unwrap();
/// assert_eq!(result.cost, 80.0);
/// assert!(result.optimal);
/// ```
#[derive(Debug, Clone, Default)]
pub struct AStarSolver {
    config: AStarConfig,
}

impl AStarSolver {
    pub fn new(config: AStarConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AStarConfig {
        &self.config
    }
}

impl Solver for AStarSolver {
    fn name(&self) -> &str {
        "astar"
    }

    fn solve_with(&self, matrix: &DistanceMatrix, ctx: &mut RunContext<'_>) -> Result<SolveResult> {
        self.config.validate().map_err(TspError::Config)?;

        let n = matrix.len();
        if n <= 1 {
            return Ok(SolveResult::trivial());
        }

        let heuristic = self.config.heuristic;
        let deadline = Deadline::after_ms(self.config.time_limit_ms);

        let root = SearchState::root(n, START);
        let root_h = heuristic.estimate(START, &root.unvisited(n), matrix, START);
        let mut frontier = BinaryHeap::new();
        frontier.push(Entry {
            f: root_h,
            state: root,
        });

        let mut expanded: HashMap<StateKey, f64> = HashMap::new();
        let mut incumbent: Option<(Vec<usize>, f64)> = None;
        let mut iterations = 0usize;

        let status = loop {
            if iterations >= self.config.max_iterations {
                break SolveStatus::IterationLimit;
            }
            if deadline.expired() {
                break SolveStatus::TimeLimit;
            }
            let Some(entry) = frontier.pop() else {
                break SolveStatus::Exhausted;
            };
            iterations += 1;

            if entry.state.is_complete(n) {
                let (tour, cost) = entry.state.closed(matrix);
                ctx.emit(iterations, cost, &tour);
                debug!("astar: optimal cost {cost:.4} after {iterations} expansions (n={n})");
                return Ok(SolveResult {
                    tour,
                    cost,
                    steps: iterations,
                    status: SolveStatus::Optimal,
                    optimal: true,
                    initial_cost: None,
                });
            }

            let key = entry.state.key();
            if expanded.get(&key).is_some_and(|&g| g <= entry.state.g) {
                continue;
            }
            expanded.insert(key, entry.state.g);

            let unvisited = entry.state.unvisited(n);
            for &next in &unvisited {
                let child = entry.state.extend(next, matrix);
                let rest: Vec<usize> = unvisited.iter().copied().filter(|&c| c != next).collect();

                if rest.is_empty() {
                    let (tour, cost) = child.closed(matrix);
                    if incumbent.as_ref().is_none_or(|(_, best)| cost < *best) {
                        trace!("astar: incumbent {cost:.4} at expansion {iterations}");
                        ctx.emit(iterations, cost, &tour);
                        incumbent = Some((tour, cost));
                    }
                }

                let f = child.g + heuristic.estimate(next, &rest, matrix, START);
                frontier.push(Entry { f, state: child });
            }
        };

        let (tour, cost) = match incumbent {
            Some(best) => best,
            None => {
                let prefix = frontier
                    .peek()
                    .map(|e| e.state.path.clone())
                    .unwrap_or_else(|| vec![START]);
                let tour = nearest_neighbor_completion(&prefix, matrix);
                let cost = crate::tour::cost_of(&tour, matrix);
                (tour, cost)
            }
        };
        debug!("astar: stopped with {status:?} after {iterations} expansions, best {cost:.4}");

        Ok(SolveResult {
            tour,
            cost,
            steps: iterations,
            status,
            optimal: false,
            initial_cost: None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::heuristics::Heuristic;
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

    #[test]
    fn test_lab_instance_optimal() {
        let result = AStarSolver::default().solve(&lab_matrix()).unwrap();
        assert_eq!(result.cost, 80.0);
        assert!(result.optimal);
        assert_eq!(result.status, SolveStatus::Optimal);
        assert!(is_closed_tour(&result.tour, 4));
        assert_eq!(cost_of(&result.tour, &lab_matrix()), 80.0);
    }

    #[test]
    fn test_trivial_instances() {
        for rows in [vec![], vec![vec![0.0]]] {
            let m = DistanceMatrix::from_rows(rows).unwrap();
            let result = AStarSolver::default().solve(&m).unwrap();
            assert_eq!(result.tour, vec![0]);
            assert_eq!(result.cost, 0.0);
            assert_eq!(result.status, SolveStatus::Trivial);
        }
    }

    #[test]
    fn test_two_cities() {
        let m = DistanceMatrix::from_rows(vec![vec![0.0, 3.0], vec![4.0, 0.0]]).unwrap();
        let result = AStarSolver::default().solve(&m).unwrap();
        assert_eq!(result.tour, vec![0, 1, 0]);
        assert_eq!(result.cost, 7.0);
    }

    #[test]
    fn test_matches_brute_force_on_random_instances() {
        let mut rng = create_rng(2024);
        for round in 0..20 {
            let n = 3 + round % 6;
            let m = DistanceMatrix::from_coords(&random_coords(n, &mut rng));
            let (_, exact) = brute_force_optimum(&m);
            let result = AStarSolver::default().solve(&m).unwrap();
            assert!(result.optimal);
            assert!(
                (result.cost - exact).abs() < 1e-9,
                "round {round}: astar {} vs exact {exact}",
                result.cost
            );
        }
    }

    #[test]
    fn test_all_heuristics_agree() {
        let mut rng = create_rng(5);
        let m = DistanceMatrix::from_coords(&random_coords(7, &mut rng));
        let (_, exact) = brute_force_optimum(&m);
        for heuristic in [Heuristic::Combined, Heuristic::Nearest, Heuristic::Zero] {
            let solver = AStarSolver::new(AStarConfig::default().with_heuristic(heuristic));
            let result = solver.solve(&m).unwrap();
            assert!((result.cost - exact).abs() < 1e-9, "{heuristic:?}");
        }
    }

    #[test]
    fn test_stronger_heuristic_expands_less() {
        let mut rng = create_rng(11);
        let m = DistanceMatrix::from_coords(&random_coords(8, &mut rng));
        let strong = AStarSolver::default().solve(&m).unwrap();
        let blind = AStarSolver::new(AStarConfig::default().with_heuristic(Heuristic::Zero))
            .solve(&m)
            .unwrap();
        assert!(strong.steps <= blind.steps);
    }

    #[test]
    fn test_iteration_cap_is_degraded() {
        let mut rng = create_rng(8);
        let m = DistanceMatrix::from_coords(&random_coords(9, &mut rng));
        let solver = AStarSolver::new(AStarConfig::default().with_max_iterations(3));
        let result = solver.solve(&m).unwrap();
        assert_eq!(result.status, SolveStatus::IterationLimit);
        assert!(!result.optimal);
        assert!(is_closed_tour(&result.tour, 9));
        assert!((cost_of(&result.tour, &m) - result.cost).abs() < 1e-9);
    }

    #[test]
    fn test_trace_ends_with_result() {
        let mut events: Vec<TraceEvent> = Vec::new();
        let result = {
            let mut ctx = RunContext::new().with_trace(&mut events);
            AStarSolver::default()
                .solve_with(&lab_matrix(), &mut ctx)
                .unwrap()
        };
        let last = events.last().unwrap();
        assert_eq!(last.best_cost, result.cost);
        assert_eq!(last.tour, result.tour);
    }

    #[test]
    fn test_invalid_config() {
        let solver = AStarSolver::new(AStarConfig::default().with_max_iterations(0));
        assert!(matches!(solver.solve(&lab_matrix()), Err(TspError::Config(_))));
    }
}
