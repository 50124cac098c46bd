//! Benchmarking solvers against each other.
//!
//! [`BenchmarkRunner`] runs every registered solver on every named instance
//! `runs_per_solver` times, with seed `base_seed + run`, optionally on rayon
//! workers. The resulting [`BenchmarkReport`] answers which run was best,
//! what the proven optimum is, and how each solver did on average, and
//! persists per-run [`ComparisonRow`]s as CSV.

mod config;
mod report;
mod runner;

pub use config::BenchmarkConfig;
pub use report::{read_csv, read_csv_from, BenchmarkReport, ComparisonRow, SolverStats};
pub use runner::{standard_solvers, BenchmarkRecord, BenchmarkRunner, EXACT_TIME_LIMIT_MS};
