//! Hill climbing over closed tours.
//!
//! A single current tour is improved by local moves between two interior
//! positions. The default is the classic steepest-descent climber with a
//! position-swap neighborhood, which stops at the first local optimum.
//! True 2-opt segment reversal, stochastic (Metropolis-style) acceptance,
//! and random restarts are available through [`HillClimbingConfig`].
//!
//! # References
//!
//! - Russell & Norvig, *Artificial Intelligence: A Modern Approach*, §4.1
//! - Croes (1958), "A Method for Solving Traveling-Salesman Problems"

mod config;
mod runner;

pub use config::{Acceptance, HillClimbingConfig, Neighborhood};
pub use runner::HillClimbingSolver;
