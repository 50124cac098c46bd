//! Tour construction and evaluation.
//!
//! A tour is a sequence of location indices. An *open* tour lists each
//! location once with no return edge; a *closed* tour starts and ends at
//! location 0 and visits every other location exactly once in between, so a
//! closed tour over `n` locations has `n + 1` entries. Instances with at
//! most one location use the trivial tour `[0]`.

use crate::error::{Result, TspError};
use crate::matrix::DistanceMatrix;
use crate::random::shuffle;
use rand::Rng;

/// Sums `matrix[tour[k]][tour[k + 1]]` over consecutive pairs.
///
/// No return edge is added: a closed tour already carries it.
pub fn cost_of(tour: &[usize], matrix: &DistanceMatrix) -> f64 {
    tour.windows(2).map(|w| matrix.get(w[0], w[1])).sum()
}

/// Cost of the closed tour `0 → interior… → 0`.
pub fn closed_cost(interior: &[usize], matrix: &DistanceMatrix) -> f64 {
    match (interior.first(), interior.last()) {
        (Some(&first), Some(&last)) => {
            matrix.get(0, first) + cost_of(interior, matrix) + matrix.get(last, 0)
        }
        _ => 0.0,
    }
}

/// Wraps an interior order into a closed tour.
pub fn close(interior: &[usize]) -> Vec<usize> {
    let mut tour = Vec::with_capacity(interior.len() + 2);
    tour.push(0);
    tour.extend_from_slice(interior);
    tour.push(0);
    tour
}

/// Checks the closed-tour invariant for an instance of `n` locations.
pub fn is_closed_tour(tour: &[usize], n: usize) -> bool {
    validate_closed_tour(tour, n).is_ok()
}

/// Like [`is_closed_tour`] but explains what is wrong.
pub fn validate_closed_tour(tour: &[usize], n: usize) -> Result<()> {
    if n <= 1 {
        return if tour == [0] || tour == [0, 0] {
            Ok(())
        } else {
            Err(TspError::invalid_tour(format!(
                "expected [0] for a {n}-location instance, got {tour:?}"
            )))
        };
    }
    if tour.len() != n + 1 {
        return Err(TspError::invalid_tour(format!(
            "length {} does not match {n} locations",
            tour.len()
        )));
    }
    if tour[0] != 0 || tour[n] != 0 {
        return Err(TspError::invalid_tour("tour must start and end at 0"));
    }
    let mut seen = vec![false; n];
    seen[0] = true;
    for &city in &tour[1..n] {
        if city >= n {
            return Err(TspError::invalid_tour(format!("location {city} out of range")));
        }
        if seen[city] {
            return Err(TspError::invalid_tour(format!("location {city} repeated")));
        }
        seen[city] = true;
    }
    Ok(())
}

/// Rotates a cyclic order so that it starts at 0 and closes it.
///
/// `cycle` lists every location once, in visiting order, starting anywhere.
pub fn normalize_closed(cycle: &[usize]) -> Vec<usize> {
    let Some(start) = cycle.iter().position(|&c| c == 0) else {
        return cycle.to_vec();
    };
    let mut tour: Vec<usize> = cycle[start..].iter().chain(&cycle[..start]).copied().collect();
    tour.push(0);
    tour
}

/// Uniform random closed tour: location 0 fixed, interior shuffled.
pub fn random_closed_tour<R: Rng + ?Sized>(n: usize, rng: &mut R) -> Vec<usize> {
    if n <= 1 {
        return vec![0];
    }
    let mut interior: Vec<usize> = (1..n).collect();
    shuffle(&mut interior, rng);
    close(&interior)
}

/// Greedily extends `prefix` with the nearest unvisited location until the
/// tour is complete, then closes it.
///
/// `prefix` must start at 0. Ties go to the lowest index.
pub fn nearest_neighbor_completion(prefix: &[usize], matrix: &DistanceMatrix) -> Vec<usize> {
    let n = matrix.len();
    if n <= 1 {
        return vec![0];
    }
    let mut visited = vec![false; n];
    let mut tour = if prefix.is_empty() { vec![0] } else { prefix.to_vec() };
    for &c in &tour {
        visited[c] = true;
    }
    let mut current = *tour.last().unwrap_or(&0);
    while tour.len() < n {
        let mut next = None;
        let mut best = f64::INFINITY;
        for (city, &seen) in visited.iter().enumerate() {
            if !seen && matrix.get(current, city) < best {
                best = matrix.get(current, city);
                next = Some(city);
            }
        }
        let Some(city) = next else { break };
        visited[city] = true;
        tour.push(city);
        current = city;
    }
    tour.push(0);
    tour
}

/// Exact optimum by exhaustive enumeration with a simple cost cut.
///
/// Intended for small instances (reference answers in tests and reports);
/// the running time is factorial in `n`.
pub fn brute_force_optimum(matrix: &DistanceMatrix) -> (Vec<usize>, f64) {
    let n = matrix.len();
    if n <= 1 {
        return (vec![0], 0.0);
    }
    let mut best = (Vec::new(), f64::INFINITY);
    let mut path = vec![0];
    let mut used = vec![false; n];
    used[0] = true;
    enumerate(matrix, &mut path, &mut used, 0.0, &mut best);
    (best.0, best.1)
}

fn enumerate(
    matrix: &DistanceMatrix,
    path: &mut Vec<usize>,
    used: &mut [bool],
    cost: f64,
    best: &mut (Vec<usize>, f64),
) {
    let n = matrix.len();
    let last = path[path.len() - 1];
    if path.len() == n {
        let total = cost + matrix.get(last, 0);
        if total < best.1 {
            let mut tour = path.clone();
            tour.push(0);
            *best = (tour, total);
        }
        return;
    }
    for next in 1..n {
        if used[next] {
            continue;
        }
        let step = cost + matrix.get(last, next);
        if step >= best.1 {
            continue;
        }
        used[next] = true;
        path.push(next);
        enumerate(matrix, path, used, step, best);
        path.pop();
        used[next] = false;
    }
}
