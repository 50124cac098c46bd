//! Beam search for the TSP.
//!
//! Keeps at most `beam_width` candidates per iteration. Two neighbor
//! generators share the loop: [`BeamPolicy::Extend`] grows partial tours one
//! location at a time (width 1 is greedy nearest-neighbor), while
//! [`BeamPolicy::Swap`] runs local beam search over complete tours. The next
//! beam is chosen deterministically ([`BeamSelection::TopK`]) or by
//! Boltzmann sampling without replacement ([`BeamSelection::Boltzmann`]).
//!
//! # References
//!
//! - Lowerre (1976), "The HARPY Speech Recognition System"
//! - Russell & Norvig, *Artificial Intelligence: A Modern Approach*, §4.1.4

mod config;
mod runner;

pub use config::{BeamConfig, BeamPolicy, BeamSelection};
pub use runner::BeamSearchSolver;
