//! GA evolutionary loop execution.
//!
//! [`GaRunner`] orchestrates the complete evolutionary process:
//! initialization → evaluation → selection → crossover → mutation → repeat.

use super::config::GaConfig;
use super::types::{Fitness, GaProblem, Individual};
use crate::error::{Result, TspError};
use crate::random::rng_from;
use crate::solver::Deadline;
use log::{debug, trace};
use rand::Rng;
use rayon::prelude::*;

/// Result of a GA run.
#[derive(Debug, Clone)]
pub struct GaResult<I: Individual> {
    /// The best individual found during the entire run.
    pub best: I,

    /// Best fitness value (same as `best.fitness()`).
    pub best_fitness: I::Fitness,

    /// Generations executed after the initial population.
    pub generations: usize,

    /// Stopped by the stagnation limit.
    pub stagnated: bool,

    /// Stopped because `target_fitness` was reached.
    pub target_reached: bool,

    /// Stopped by the time limit.
    pub timed_out: bool,

    /// Best-ever fitness after each generation; entry 0 is the initial
    /// population.
    pub fitness_history: Vec<f64>,

    /// Best fitness within each generation's population; entry 0 is the
    /// initial population.
    pub population_best: Vec<f64>,
}

/// Executes the GA evolutionary loop.
///
/// Each generation the population is sorted by fitness, the `elite_count`
/// best are carried over unchanged, and the rest is filled with children:
/// a pair of parents is selected, recombined with probability
/// `crossover_rate` (otherwise cloned), and every gene of every child is
/// mutated with probability `mutation_rate`.
pub struct GaRunner;

impl GaRunner {
    /// Runs the GA optimization.
    ///
    /// # Errors
    /// Returns [`TspError::Config`] when the configuration is invalid.
    pub fn run<P: GaProblem>(problem: &P, config: &GaConfig) -> Result<GaResult<P::Individual>> {
        Self::run_observed(problem, config, |_, _| {})
    }

    /// Runs the GA and calls `observer(generation, best)` every time the
    /// best-ever individual improves, starting with the initial population
    /// at generation 0.
    pub fn run_observed<P, F>(
        problem: &P,
        config: &GaConfig,
        mut observer: F,
    ) -> Result<GaResult<P::Individual>>
    where
        P: GaProblem,
        F: FnMut(usize, &P::Individual),
    {
        config.validate().map_err(TspError::Config)?;

        let mut rng = rng_from(config.seed);
        let deadline = Deadline::after_ms(config.time_limit_ms);
        let target = config.target_fitness;
        let reached = |ind: &P::Individual| target.is_some_and(|t| ind.fitness().to_f64() <= t);

        // 1. Initialize and evaluate
        let mut population: Vec<P::Individual> = (0..config.population_size)
            .map(|_| problem.create_individual(&mut rng))
            .collect();
        evaluate_population(problem, &mut population, config.parallel);

        // 2. Track best
        sort_by_fitness(&mut population);
        let mut best = population[0].clone();
        observer(0, &best);
        let mut fitness_history = Vec::with_capacity(config.max_generations + 1);
        let mut population_best = Vec::with_capacity(config.max_generations + 1);
        fitness_history.push(best.fitness().to_f64());
        population_best.push(best.fitness().to_f64());

        let mut generations = 0usize;
        let mut stagnation_counter = 0usize;
        let mut stagnated = false;
        let mut timed_out = false;
        let mut target_reached = reached(&best);

        // 3. Evolutionary loop
        while !target_reached && generations < config.max_generations {
            if deadline.expired() {
                timed_out = true;
                break;
            }

            let elite_count = config.elite_count.min(population.len());
            let mut next_gen: Vec<P::Individual> = population[..elite_count].to_vec();

            while next_gen.len() < config.population_size {
                let (p1, p2) = config.selection.select_pair(&population, &mut rng);
                let children = if rng.random_range(0.0..1.0) < config.crossover_rate {
                    problem.crossover(&population[p1], &population[p2], &mut rng)
                } else {
                    vec![population[p1].clone(), population[p2].clone()]
                };

                for mut child in children {
                    if next_gen.len() >= config.population_size {
                        break;
                    }
                    problem.mutate(&mut child, config.mutation_rate, &mut rng);
                    next_gen.push(child);
                }
            }

            // Elites keep their fitness
            evaluate_population(problem, &mut next_gen[elite_count..], config.parallel);
            sort_by_fitness(&mut next_gen);
            population = next_gen;
            generations += 1;

            let gen_best = &population[0];
            population_best.push(gen_best.fitness().to_f64());
            if gen_best.fitness() < best.fitness() {
                best = gen_best.clone();
                stagnation_counter = 0;
                observer(generations, &best);
                trace!("ga: generation {generations} improved to {:?}", best.fitness());
            } else {
                stagnation_counter += 1;
            }
            fitness_history.push(best.fitness().to_f64());

            target_reached = reached(&best);
            if config.stagnation_limit > 0 && stagnation_counter >= config.stagnation_limit {
                stagnated = true;
                break;
            }
        }

        debug!(
            "ga: best {:?} after {generations} generations (stagnated={stagnated}, target={target_reached}, timed_out={timed_out})",
            best.fitness()
        );

        Ok(GaResult {
            best_fitness: best.fitness(),
            best,
            generations,
            stagnated,
            target_reached,
            timed_out,
            fitness_history,
            population_best,
        })
    }
}

fn evaluate_population<P: GaProblem>(
    problem: &P,
    population: &mut [P::Individual],
    parallel: bool,
) {
    if parallel {
        population.par_iter_mut().for_each(|ind| {
            let f = problem.evaluate(ind);
            ind.set_fitness(f);
        });
    } else {
        for ind in population.iter_mut() {
            let f = problem.evaluate(ind);
            ind.set_fitness(f);
        }
    }
}

/// Stable ascending sort; incomparable fitness values compare equal.
fn sort_by_fitness<I: Individual>(population: &mut [I]) {
    population.sort_by(|a, b| {
        a.fitness()
            .partial_cmp(&b.fitness())
            .unwrap_or(std::cmp::Ordering::Equal)
    });
}

// ============================================================================
// Tests
// ============================================================================
