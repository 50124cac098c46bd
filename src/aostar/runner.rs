//! AO* search loop.

use super::config::AndOrConfig;
use super::graph::{AndOrGraph, NodeId, Revision};
use crate::error::{Result, TspError};
use crate::matrix::DistanceMatrix;
use crate::solver::{Deadline, RunContext, SolveResult, SolveStatus, Solver};
use crate::state::{frontier_order, SearchState};
use crate::tour::{cost_of, nearest_neighbor_completion};
use log::{debug, trace};
use std::cmp::Ordering;
use std::collections::BinaryHeap;

const START: usize = 0;

/// Snapshot of a node's priority when it was (re)opened.
struct OpenEntry {
    cost: f64,
    g: f64,
    path: Vec<usize>,
    id: NodeId,
}

impl PartialEq for OpenEntry {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for OpenEntry {}

impl PartialOrd for OpenEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for OpenEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        frontier_order(
            (other.cost, other.g, &other.path[..]),
            (self.cost, self.g, &self.path[..]),
        )
    }
}

/// `open` / `closed` bookkeeping over graph node ids.
///
/// The heap may hold outdated snapshots; an entry is live only while its
/// node is open and its recorded cost still matches the graph.
#[derive(Default)]
struct OpenSet {
    heap: BinaryHeap<OpenEntry>,
    open: Vec<bool>,
    closed: Vec<bool>,
}

impl OpenSet {
    fn ensure(&mut self, id: NodeId) {
        if self.open.len() <= id {
            self.open.resize(id + 1, false);
            self.closed.resize(id + 1, false);
        }
    }

    fn open(&mut self, graph: &AndOrGraph, id: NodeId) {
        self.ensure(id);
        self.open[id] = true;
        self.closed[id] = false;
        let node = graph.node(id);
        self.heap.push(OpenEntry {
            cost: node.cost,
            g: node.state.g,
            path: node.state.path.clone(),
            id,
        });
    }

    fn pop(&mut self, graph: &AndOrGraph) -> Option<NodeId> {
        while let Some(entry) = self.heap.pop() {
            if self.open[entry.id] && entry.cost == graph.node(entry.id).cost {
                self.open[entry.id] = false;
                self.closed[entry.id] = true;
                return Some(entry.id);
            }
        }
        None
    }

    fn is_closed(&self, id: NodeId) -> bool {
        self.closed.get(id).copied().unwrap_or(false)
    }

    fn peek_live(&self, graph: &AndOrGraph) -> Option<NodeId> {
        self.heap
            .iter()
            .filter(|e| self.open[e.id] && e.cost == graph.node(e.id).cost)
            .max()
            .map(|e| e.id)
    }
}

/// Full outcome of an AO* run: the result plus the explored graph.
#[derive(Debug)]
pub struct AndOrSearch {
    pub result: SolveResult,
    pub graph: AndOrGraph,
    /// Root node of `graph`, if one was created.
    pub root: Option<NodeId>,
}

/// Exact TSP by AO* over an OR graph of partial tours.
///
/// Each iteration selects the open node of minimum cost (ties by `g`, then
/// path), closes it, and either accepts it as the solution when it closes
/// the tour, or expands one child per unvisited location. The expanded
/// node's cost is then revised from its children and the revision walks up
/// the parent links; an ancestor whose cost drops is reopened so it is
/// reconsidered. A node is solved when its best child is solved, and a
/// solved node's cost is final.
///
/// # Examples
///
/// ```
/// use tsp_search::{DistanceMatrix, Solver};
/// use tsp_search::aostar::AndOrSolver;
///
/// let m = DistanceMatrix::from_rows(vec![
///     vec![0.0, 10.0, 15.0, 20.0],
///     vec![10.0, 0.0, 35.0, 25.0],
///     vec![15.0, 35.0, 0.0, 30.0],
///     vec![20.0, 25.0, 30.0, 0.0],
/// ]).unwrap();
/// let result = AndOrSolver::default().solve(&m).unwrap();
/// assert_eq!(result.cost, 80.0);
/// ```
#[derive(Debug, Clone, Default)]
pub struct AndOrSolver {
    config: AndOrConfig,
}

impl AndOrSolver {
    pub fn new(config: AndOrConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AndOrConfig {
        &self.config
    }

    /// Runs AO* and keeps the explored graph for inspection.
    pub fn search(&self, matrix: &DistanceMatrix, ctx: &mut RunContext<'_>) -> Result<AndOrSearch> {
        self.config.validate().map_err(TspError::Config)?;

        let mut graph = AndOrGraph::new();
        let n = matrix.len();
        if n <= 1 {
            return Ok(AndOrSearch {
                result: SolveResult::trivial(),
                graph,
                root: None,
            });
        }

        let heuristic = self.config.heuristic;
        let deadline = Deadline::after_ms(self.config.time_limit_ms);

        let root_state = SearchState::root(n, START);
        let root_cost = heuristic.estimate(START, &root_state.unvisited(n), matrix, START);
        let root = graph.add_root(root_state, root_cost);
        let mut open = OpenSet::default();
        open.open(&graph, root);

        let mut incumbent: Option<(Vec<usize>, f64)> = None;
        let mut iterations = 0usize;

        let status = loop {
            if iterations >= self.config.max_iterations {
                break SolveStatus::IterationLimit;
            }
            if deadline.expired() {
                break SolveStatus::TimeLimit;
            }
            let Some(id) = open.pop(&graph) else {
                break SolveStatus::Exhausted;
            };
            iterations += 1;

            let state = &graph.node(id).state;
            if state.is_complete(n) {
                let (tour, cost) = state.closed(matrix);
                graph.mark_solved(id, cost);
                propagate(&mut graph, &mut open, id);
                ctx.emit(iterations, cost, &tour);
                debug!(
                    "aostar: solved at cost {cost:.4} after {iterations} selections, {} nodes",
                    graph.len()
                );
                let result = SolveResult {
                    tour,
                    cost,
                    steps: iterations,
                    status: SolveStatus::Optimal,
                    optimal: true,
                    initial_cost: None,
                };
                return Ok(AndOrSearch {
                    result,
                    graph,
                    root: Some(root),
                });
            }

            if graph.node(id).children.is_empty() {
                let parent = graph.node(id).state.clone();
                let unvisited = parent.unvisited(n);
                for &next in &unvisited {
                    let child = parent.extend(next, matrix);
                    let rest: Vec<usize> =
                        unvisited.iter().copied().filter(|&c| c != next).collect();
                    if rest.is_empty() {
                        let (tour, cost) = child.closed(matrix);
                        if incumbent.as_ref().is_none_or(|(_, best)| cost < *best) {
                            trace!("aostar: incumbent {cost:.4} at selection {iterations}");
                            ctx.emit(iterations, cost, &tour);
                            incumbent = Some((tour, cost));
                        }
                    }
                    let cost = child.g + heuristic.estimate(next, &rest, matrix, START);
                    let (child_id, inserted) = graph.add_child(id, child, cost);
                    if inserted {
                        open.open(&graph, child_id);
                    }
                }
            }

            propagate(&mut graph, &mut open, id);
        };

        let (tour, cost) = match incumbent {
            Some(best) => best,
            None => {
                let prefix = open
                    .peek_live(&graph)
                    .map(|id| graph.node(id).state.path.clone())
                    .unwrap_or_else(|| vec![START]);
                let tour = nearest_neighbor_completion(&prefix, matrix);
                let cost = cost_of(&tour, matrix);
                (tour, cost)
            }
        };
        debug!("aostar: stopped with {status:?} after {iterations} selections, best {cost:.4}");

        Ok(AndOrSearch {
            result: SolveResult {
                tour,
                cost,
                steps: iterations,
                status,
                optimal: false,
                initial_cost: None,
            },
            graph,
            root: Some(root),
        })
    }
}

/// Revises `from` and walks the revision up the parent chain.
///
/// Stops at the first ancestor whose cost and status did not change.
/// Ancestors whose cost dropped are reopened.
fn propagate(graph: &mut AndOrGraph, open: &mut OpenSet, from: NodeId) {
    graph.revise(from);
    let mut current = from;
    while let Some(parent) = graph.node(current).parent {
        match graph.revise(parent) {
            Revision::Unchanged => break,
            Revision::Lowered => {
                if open.is_closed(parent) {
                    open.open(graph, parent);
                }
            }
            Revision::Raised | Revision::Solved => {}
        }
        current = parent;
    }
}

impl Solver for AndOrSolver {
    fn name(&self) -> &str {
        "aostar"
    }

    fn solve_with(&self, matrix: &DistanceMatrix, ctx: &mut RunContext<'_>) -> Result<SolveResult> {
        self.search(matrix, ctx).map(|search| search.result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::astar::AStarSolver;
    use crate::matrix::random_coords;
    use crate::random::create_rng;
    use crate::tour::{brute_force_optimum, is_closed_tour};

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
    fn test_lab_instance() {
        let result = AndOrSolver::default().solve(&lab_matrix()).unwrap();
        assert_eq!(result.cost, 80.0);
        assert_eq!(result.status, SolveStatus::Optimal);
        assert!(is_closed_tour(&result.tour, 4));
    }

    #[test]
    fn test_root_solved_with_result_cost() {
        let search = AndOrSolver::default()
            .search(&lab_matrix(), &mut RunContext::new())
            .unwrap();
        let root = search.root.unwrap();
        let node = search.graph.node(root);
        assert!(node.solved);
        assert_eq!(node.cost, search.result.cost);
    }

    #[test]
    fn test_matches_brute_force() {
        let mut rng = create_rng(77);
        for round in 0..12 {
            let n = 3 + round % 5;
            let m = DistanceMatrix::from_coords(&random_coords(n, &mut rng));
            let (_, exact) = brute_force_optimum(&m);
            let result = AndOrSolver::default().solve(&m).unwrap();
            assert!(
                (result.cost - exact).abs() < 1e-9,
                "round {round}: aostar {} vs exact {exact}",
                result.cost
            );
        }
    }

    #[test]
    fn test_agrees_with_astar_on_asymmetric() {
        let m = DistanceMatrix::from_rows(vec![
            vec![0.0, 2.0, 9.0, 10.0],
            vec![1.0, 0.0, 6.0, 4.0],
            vec![15.0, 7.0, 0.0, 8.0],
            vec![6.0, 3.0, 12.0, 0.0],
        ])
        .unwrap();
        let ao = AndOrSolver::default().solve(&m).unwrap();
        let astar = AStarSolver::default().solve(&m).unwrap();
        assert_eq!(ao.cost, astar.cost);
        assert_eq!(ao.cost, brute_force_optimum(&m).1);
    }

    #[test]
    fn test_solved_nodes_carry_exact_costs() {
        let mut rng = create_rng(3);
        let m = DistanceMatrix::from_coords(&random_coords(7, &mut rng));
        let search = AndOrSolver::default()
            .search(&m, &mut RunContext::new())
            .unwrap();
        let mut solved = 0;
        for (id, node) in search.graph.nodes() {
            if !node.solved {
                continue;
            }
            solved += 1;
            let leaf = *search.graph.marked_path(id).last().unwrap();
            let (_, exact) = search.graph.node(leaf).state.closed(&m);
            assert!((node.cost - exact).abs() < 1e-9);
            assert!((node.cost - search.result.cost).abs() < 1e-9);
        }
        // Leaf plus every ancestor up to the root.
        assert_eq!(solved, 7);
    }

    #[test]
    fn test_iteration_cap_is_degraded() {
        let mut rng = create_rng(21);
        let m = DistanceMatrix::from_coords(&random_coords(9, &mut rng));
        let solver = AndOrSolver::new(AndOrConfig::default().with_max_iterations(2));
        let result = solver.solve(&m).unwrap();
        assert_eq!(result.status, SolveStatus::IterationLimit);
        assert!(!result.optimal);
        assert!(is_closed_tour(&result.tour, 9));
    }

    #[test]
    fn test_trivial() {
        let m = DistanceMatrix::from_rows(vec![vec![0.0]]).unwrap();
        let search = AndOrSolver::default()
            .search(&m, &mut RunContext::new())
            .unwrap();
        assert_eq!(search.result.tour, vec![0]);
        assert!(search.root.is_none());
        assert!(search.graph.is_empty());
    }
}
