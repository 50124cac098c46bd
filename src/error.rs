//! Crate-wide error type.

use thiserror::Error;

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, TspError>;

/// Errors raised while building instances, validating configuration, or
/// persisting benchmark reports.
///
/// Running out of iterations or failing to reach a complete tour is *not*
/// an error: solvers report those through
/// [`SolveStatus`](crate::solver::SolveStatus) on a successful result.
#[derive(Debug, Error)]
pub enum TspError {
    /// Non-square, negative, non-finite, or nonzero-diagonal matrix.
    #[error("invalid distance matrix: {0}")]
    InvalidMatrix(String),

    /// A tour that does not fit the instance it is evaluated against.
    #[error("invalid tour: {0}")]
    InvalidTour(String),

    /// A solver or benchmark configuration failed validation.
    #[error("invalid configuration: {0}")]
    Config(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Csv(#[from] csv::Error),
}

impl TspError {
    pub fn invalid_matrix(message: impl Into<String>) -> Self {
        Self::InvalidMatrix(message.into())
    }

    pub fn invalid_tour(message: impl Into<String>) -> Self {
        Self::InvalidTour(message.into())
    }
}
