//! State-space A* over partial tours.
//!
//! States are partial tours rooted at location 0, ordered by
//! `f = g + h` where `h` is a [`Heuristic`](crate::heuristics::Heuristic)
//! estimate of the completion cost. With an admissible heuristic the first
//! complete tour popped from the frontier is optimal.
//!
//! # References
//!
//! - Hart, Nilsson & Raphael (1968), "A Formal Basis for the Heuristic
//!   Determination of Minimum Cost Paths"

mod config;
mod runner;

pub use config::AStarConfig;
pub use runner::AStarSolver;
