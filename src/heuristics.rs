//! Lower-bound estimators for the cost of completing a tour.
//!
//! The search solvers estimate the remaining cost of a partial tour
//! `start → … → current` that still has to visit `unvisited` and return to
//! `start`. Any completion has the shape
//!
//! ```text
//! current → u₁ → u₂ → … → uₖ → start
//! ```
//!
//! and decomposes into three parts, each bounded from below:
//!
//! 1. the first edge `current → u₁` is at least the cheapest edge from
//!    `current` into `unvisited`;
//! 2. the Hamiltonian path `u₁ → … → uₖ` is a spanning tree of `unvisited`,
//!    so it costs at least the minimum spanning tree over `unvisited`
//!    (edge weights taken as the cheaper direction, which keeps the bound
//!    valid on asymmetric matrices);
//! 3. the last edge `uₖ → start` is at least the cheapest edge from
//!    `unvisited` back to `start`.
//!
//! The sum [`mst_lower_bound`] + [`nearest_bound`] therefore never exceeds
//! the true optimal completion cost, which is what A* and AO* need to
//! return optimal tours. With `unvisited` empty the bound is exactly the
//! return edge `current → start`.

use crate::matrix::DistanceMatrix;
use std::cmp::Ordering;
use std::collections::BinaryHeap;

/// Remaining-cost estimator used by the search solvers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[derive(serde::Serialize, serde::Deserialize)]
pub enum Heuristic {
    /// Minimum spanning tree over the unvisited set plus the nearest entry
    /// and exit edges. Admissible.
    #[default]
    Combined,

    /// Nearest entry and exit edges only. Admissible but weaker.
    Nearest,

    /// Always zero except for the final return edge: uniform-cost search.
    Zero,
}

impl Heuristic {
    /// Estimates the cost of finishing a tour from `current` through all of
    /// `unvisited` and back to `start`.
    pub fn estimate(
        &self,
        current: usize,
        unvisited: &[usize],
        matrix: &DistanceMatrix,
        start: usize,
    ) -> f64 {
        match self {
            Heuristic::Combined => combined_bound(current, unvisited, matrix, start),
            Heuristic::Nearest => nearest_bound(current, unvisited, matrix, start),
            Heuristic::Zero => {
                if unvisited.is_empty() {
                    matrix.get(current, start)
                } else {
                    0.0
                }
            }
        }
    }
}

/// Candidate edge on the Prim frontier, ordered as a min-heap entry.
#[derive(Debug, Clone, Copy)]
struct FrontierEdge {
    cost: f64,
    to: usize,
}

impl PartialEq for FrontierEdge {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for FrontierEdge {}

impl PartialOrd for FrontierEdge {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for FrontierEdge {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .cost
            .total_cmp(&self.cost)
            .then_with(|| other.to.cmp(&self.to))
    }
}

/// Total weight of a minimum spanning tree over `remaining`.
///
/// Prim's algorithm with an incremental frontier: pop the cheapest candidate
/// edge, skip it if its endpoint is already in the tree, otherwise add its
/// weight and push the edges leaving the new endpoint. Returns 0 for at most
/// one location.
pub fn mst_lower_bound(remaining: &[usize], matrix: &DistanceMatrix) -> f64 {
    let k = remaining.len();
    if k <= 1 {
        return 0.0;
    }

    // Indices below refer to positions in `remaining`.
    let mut in_tree = vec![false; k];
    let mut frontier = BinaryHeap::with_capacity(k * 2);
    in_tree[0] = true;
    for to in 1..k {
        frontier.push(FrontierEdge {
            cost: matrix.min_edge(remaining[0], remaining[to]),
            to,
        });
    }

    let mut total = 0.0;
    let mut added = 1;
    while let Some(edge) = frontier.pop() {
        if in_tree[edge.to] {
            continue;
        }
        in_tree[edge.to] = true;
        total += edge.cost;
        added += 1;
        if added == k {
            break;
        }
        for to in 0..k {
            if !in_tree[to] {
                frontier.push(FrontierEdge {
                    cost: matrix.min_edge(remaining[edge.to], remaining[to]),
                    to,
                });
            }
        }
    }
    total
}

/// Cheapest edge from `current` into `unvisited` plus the cheapest edge
/// from `unvisited` back to `start`.
///
/// Degenerates to the direct return edge when `unvisited` is empty.
pub fn nearest_bound(
    current: usize,
    unvisited: &[usize],
    matrix: &DistanceMatrix,
    start: usize,
) -> f64 {
    if unvisited.is_empty() {
        return matrix.get(current, start);
    }
    let enter = unvisited
        .iter()
        .map(|&u| matrix.get(current, u))
        .fold(f64::INFINITY, f64::min);
    let exit = unvisited
        .iter()
        .map(|&u| matrix.get(u, start))
        .fold(f64::INFINITY, f64::min);
    enter + exit
}

/// [`mst_lower_bound`] over `unvisited` plus [`nearest_bound`].
pub fn combined_bound(
    current: usize,
    unvisited: &[usize],
    matrix: &DistanceMatrix,
    start: usize,
) -> f64 {
    mst_lower_bound(unvisited, matrix) + nearest_bound(current, unvisited, matrix, start)
}
