//! Pairwise travel costs between locations.

use crate::error::{Result, TspError};
use rand::Rng;

/// Dense N×N travel-cost matrix.
///
/// Entries are non-negative and finite, the diagonal is zero, and the matrix
/// may be asymmetric (`get(i, j) != get(j, i)`). It is immutable after
/// construction; solvers only ever borrow it.
///
/// # Examples
///
/// ```
/// use tsp_search::DistanceMatrix;
///
/// let m = DistanceMatrix::from_coords(&[(0.0, 0.0), (3.0, 4.0)]);
/// assert_eq!(m.len(), 2);
/// assert!((m.get(0, 1) - 5.0).abs() < 1e-12);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct DistanceMatrix {
    n: usize,
    data: Vec<f64>,
}

impl DistanceMatrix {
    /// Builds a Euclidean matrix from planar coordinates.
    pub fn from_coords(coords: &[(f64, f64)]) -> Self {
        let n = coords.len();
        let mut data = vec![0.0; n * n];
        for i in 0..n {
            for j in 0..n {
                if i != j {
                    let dx = coords[i].0 - coords[j].0;
                    let dy = coords[i].1 - coords[j].1;
                    data[i * n + j] = (dx * dx + dy * dy).sqrt();
                }
            }
        }
        Self { n, data }
    }

    /// Builds a matrix from explicit rows.
    ///
    /// # Errors
    ///
    /// [`TspError::InvalidMatrix`] if the rows are not square, an entry is
    /// negative or non-finite, or a diagonal entry is nonzero.
    pub fn from_rows(rows: Vec<Vec<f64>>) -> Result<Self> {
        let n = rows.len();
        let mut data = Vec::with_capacity(n * n);
        for (i, row) in rows.into_iter().enumerate() {
            if row.len() != n {
                return Err(TspError::invalid_matrix(format!(
                    "row {i} has {} entries, expected {n}",
                    row.len()
                )));
            }
            for (j, &value) in row.iter().enumerate() {
                if !value.is_finite() {
                    return Err(TspError::invalid_matrix(format!(
                        "entry ({i}, {j}) is not finite"
                    )));
                }
                if value < 0.0 {
                    return Err(TspError::invalid_matrix(format!(
                        "entry ({i}, {j}) is negative: {value}"
                    )));
                }
                if i == j && value != 0.0 {
                    return Err(TspError::invalid_matrix(format!(
                        "diagonal entry ({i}, {i}) is {value}, expected 0"
                    )));
                }
            }
            data.extend(row);
        }
        Ok(Self { n, data })
    }

    /// Number of locations.
    #[inline]
    pub fn len(&self) -> usize {
        self.n
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.n == 0
    }

    /// Travel cost from `i` to `j`.
    #[inline]
    pub fn get(&self, i: usize, j: usize) -> f64 {
        self.data[i * self.n + j]
    }

    /// Outgoing costs of location `i`.
    pub fn row(&self, i: usize) -> &[f64] {
        &self.data[i * self.n..(i + 1) * self.n]
    }

    /// Cheaper of the two directions between `i` and `j`.
    #[inline]
    pub fn min_edge(&self, i: usize, j: usize) -> f64 {
        self.get(i, j).min(self.get(j, i))
    }

    pub fn is_symmetric(&self) -> bool {
        (0..self.n).all(|i| (i + 1..self.n).all(|j| self.get(i, j) == self.get(j, i)))
    }
}

/// Draws `n` points uniformly from the unit square.
pub fn random_coords<R: Rng + ?Sized>(n: usize, rng: &mut R) -> Vec<(f64, f64)> {
    (0..n)
        .map(|_| (rng.random_range(0.0..1.0), rng.random_range(0.0..1.0)))
        .collect()
}
