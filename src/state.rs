//! Partial-tour search states shared by the A* and AO* solvers.

use crate::matrix::DistanceMatrix;
use std::cmp::Ordering;

/// Fixed-capacity bit set of visited locations.
///
/// Structural equality and hashing make it usable inside [`StateKey`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct VisitedSet {
    words: Vec<u64>,
}

impl VisitedSet {
    /// Empty set able to hold locations `0..n`.
    pub fn new(n: usize) -> Self {
        Self {
            words: vec![0; n.div_ceil(64)],
        }
    }

    #[inline]
    pub fn insert(&mut self, location: usize) {
        self.words[location / 64] |= 1u64 << (location % 64);
    }

    #[inline]
    pub fn contains(&self, location: usize) -> bool {
        self.words
            .get(location / 64)
            .is_some_and(|&w| w & (1u64 << (location % 64)) != 0)
    }

    pub fn len(&self) -> usize {
        self.words.iter().map(|w| w.count_ones() as usize).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.words.iter().all(|&w| w == 0)
    }
}

/// Canonical dedup key of a search state: current location, path taken,
/// and visited set.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StateKey {
    pub current: usize,
    pub path: Vec<usize>,
    pub visited: VisitedSet,
}

/// A partial tour rooted at the start location.
#[derive(Debug, Clone)]
pub struct SearchState {
    /// Location the partial tour currently ends at.
    pub current: usize,
    /// Locations visited so far, in order, starting with the start location.
    pub path: Vec<usize>,
    pub visited: VisitedSet,
    /// Cost of `path`.
    pub g: f64,
}

impl SearchState {
    /// The state that has only visited `start`.
    pub fn root(n: usize, start: usize) -> Self {
        let mut visited = VisitedSet::new(n);
        visited.insert(start);
        Self {
            current: start,
            path: vec![start],
            visited,
            g: 0.0,
        }
    }

    pub fn key(&self) -> StateKey {
        StateKey {
            current: self.current,
            path: self.path.clone(),
            visited: self.visited.clone(),
        }
    }

    /// Locations not yet visited, ascending.
    pub fn unvisited(&self, n: usize) -> Vec<usize> {
        (0..n).filter(|&c| !self.visited.contains(c)).collect()
    }

    /// True once every location has been visited (the return edge is not
    /// part of the state).
    pub fn is_complete(&self, n: usize) -> bool {
        self.path.len() == n
    }

    /// Child state that moves from `current` to `next`.
    pub fn extend(&self, next: usize, matrix: &DistanceMatrix) -> Self {
        let mut path = Vec::with_capacity(self.path.len() + 1);
        path.extend_from_slice(&self.path);
        path.push(next);
        let mut visited = self.visited.clone();
        visited.insert(next);
        Self {
            current: next,
            path,
            visited,
            g: self.g + matrix.get(self.current, next),
        }
    }

    /// Closed tour and its total cost, adding the return edge to `start`.
    pub fn closed(&self, matrix: &DistanceMatrix) -> (Vec<usize>, f64) {
        let start = self.path[0];
        let mut tour = self.path.clone();
        tour.push(start);
        (tour, self.g + matrix.get(self.current, start))
    }
}

/// Frontier order shared by the search solvers: `f` ascending, then `g`
/// ascending, then path lexicographic. Makes tie-breaking reproducible.
pub(crate) fn frontier_order(
    (f_a, g_a, path_a): (f64, f64, &[usize]),
    (f_b, g_b, path_b): (f64, f64, &[usize]),
) -> Ordering {
    f_a.total_cmp(&f_b)
        .then_with(|| g_a.total_cmp(&g_b))
        .then_with(|| path_a.cmp(path_b))
}
