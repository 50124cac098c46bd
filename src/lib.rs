//! Classic TSP search strategies behind one solver contract.
//!
//! Every strategy borrows a [`DistanceMatrix`] and returns a closed tour
//! `[0, …, 0]` with its cost through the [`Solver`] trait:
//!
//! - **A\*** ([`astar`]): best-first over partial tours with an admissible
//!   MST + nearest-edge heuristic; proves optimality.
//! - **AO\*** ([`aostar`]): AND/OR graph search with upward cost revision
//!   and solved labelling over an arena of nodes.
//! - **Hill climbing** ([`hill`]): steepest-descent swap or 2-opt local
//!   search, with stochastic acceptance and random restarts.
//! - **Beam search** ([`beam`]): fixed-width breadth-first construction, or
//!   local beam search over swap neighbors; top-k or Boltzmann selection.
//! - **Genetic algorithm** ([`ga`]): a generic GA engine driven by a
//!   [`ga::GaProblem`], with tour, knapsack, and integer-equation encodings.
//!
//! [`benchmark::BenchmarkRunner`] runs any set of solvers over named
//! instances with seeded, optionally parallel repetitions and reports the
//! results as a table or CSV.
//!
//! # Example
//!
//! ```
//! use tsp_search::{DistanceMatrix, Solver, SolveStatus};
//! use tsp_search::astar::AStarSolver;
//!
//! let m = DistanceMatrix::from_rows(vec![
//!     vec![0.0, 10.0, 15.0, 20.0],
//!     vec![10.0, 0.0, 35.0, 25.0],
//!     vec![15.0, 35.0, 0.0, 30.0],
//!     vec![20.0, 25.0, 30.0, 0.0],
//! ]).unwrap();
//! let result = AStarSolver::default().solve(&m).unwrap();
//! assert_eq!(result.cost, 80.0);
//! assert_eq!(result.status, SolveStatus::Optimal);
//! ```
//!
//! # Logging
//!
//! The crate logs through the `log` facade (`debug!` per run, `trace!` per
//! iteration) and never installs a logger itself.

pub mod aostar;
pub mod astar;
pub mod beam;
pub mod benchmark;
pub mod error;
pub mod ga;
pub mod heuristics;
pub mod hill;
pub mod matrix;
pub mod random;
pub mod solver;
pub mod state;
pub mod tour;

pub use error::{Result, TspError};
pub use matrix::DistanceMatrix;
pub use solver::{RunContext, SolveResult, SolveStatus, Solver, TraceEvent, TraceFn, TraceSink};
