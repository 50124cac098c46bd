//! Genetic Algorithm framework.
//!
//! A generic GA engine built on trait-based abstractions, plus three problem
//! encodings: tour permutations ([`GeneticSolver`]), 0/1 knapsack bit
//! vectors ([`knapsack::KnapsackProblem`]), and bounded integer solutions of
//! a linear equation ([`equation::EquationProblem`]).
//!
//! # Core Traits
//!
//! - [`Individual`]: A candidate solution with associated fitness type
//! - [`GaProblem`]: Problem definition: initialization, evaluation, operators
//!
//! # Key Types
//!
//! - [`GaConfig`]: Algorithm parameters (population size, selection, presets)
//! - [`GaRunner`]: Executes the evolutionary loop
//! - [`GaResult`]: Final result with fitness history
//! - [`GeneticSolver`]: The GA behind the common [`Solver`](crate::Solver) contract
//!
//! # Submodules
//!
//! - [`operators`]: Crossover and mutation operators for bits and permutations
//! - [`knapsack`]: Bit-vector knapsack problem with a greedy baseline
//! - [`equation`]: Integer linear equation solved to zero residual
//!
//! # References
//!
//! - Holland (1975), *Adaptation in Natural and Artificial Systems*
//! - Goldberg (1989), *Genetic Algorithms in Search, Optimization, and Machine Learning*
//! - De Jong (2006), *Evolutionary Computation: A Unified Approach*

mod config;
pub mod equation;
pub mod knapsack;
pub mod operators;
mod runner;
mod selection;
mod tsp;
mod types;

pub use config::GaConfig;
pub use runner::{GaResult, GaRunner};
pub use selection::Selection;
pub use tsp::{GeneticSolver, TourChromosome, TourCrossover, TourProblem};
pub use types::{Fitness, GaProblem, Individual};
