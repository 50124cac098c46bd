//! Parent selection strategies.
//!
//! # References
//!
//! - Goldberg (1989), *Genetic Algorithms in Search, Optimization, and
//!   Machine Learning*, ch. 1 (roulette wheel)
//! - Blickle & Thiele (1996), "A Comparison of Selection Schemes used in
//!   Evolutionary Algorithms"

use super::types::{Fitness, Individual};
use rand::Rng;

/// How parents are chosen. All strategies assume minimization.
///
/// # Examples
///
/// ```
/// use tsp_search::ga::Selection;
///
/// // Always breed the two fittest individuals
/// let sel = Selection::TopTwo;
///
/// // Fitness-proportionate, with replacement
/// let sel = Selection::Roulette;
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Selection {
    /// The two best individuals are the parents of every child.
    ///
    /// Strongest possible pressure; diversity comes from mutation only.
    TopTwo,

    /// Fitness-proportionate (roulette wheel) sampling with replacement.
    ///
    /// An individual that reports a
    /// [`selection_weight`](crate::ga::Individual::selection_weight) is
    /// drawn in proportion to it, so knapsack selections are drawn in
    /// proportion to their value. Otherwise, since lower fitness is better,
    /// the weight is `max_fitness - fitness + ε`, which keeps the worst
    /// individual selectable. When the weights sum to 0 the choice is
    /// uniform.
    #[default]
    Roulette,

    /// Pick `k` individuals uniformly at random and keep the best.
    Tournament(usize),
}

impl Selection {
    /// Selects one parent index.
    ///
    /// Returns 0 for an empty or single-individual population.
    pub fn select<I: Individual, R: Rng>(&self, population: &[I], rng: &mut R) -> usize {
        if population.len() <= 1 {
            return 0;
        }
        match self {
            Selection::TopTwo => best_two(population).0,
            Selection::Roulette => roulette(population, rng),
            Selection::Tournament(k) => tournament(population, *k, rng),
        }
    }

    /// Selects the two parents of the next pair of children.
    pub fn select_pair<I: Individual, R: Rng>(
        &self,
        population: &[I],
        rng: &mut R,
    ) -> (usize, usize) {
        match self {
            Selection::TopTwo => best_two(population),
            _ => (self.select(population, rng), self.select(population, rng)),
        }
    }
}

/// Indices of the two lowest-fitness individuals; ties keep the earlier one.
fn best_two<I: Individual>(population: &[I]) -> (usize, usize) {
    let mut first: Option<usize> = None;
    let mut second: Option<usize> = None;
    for (i, ind) in population.iter().enumerate() {
        let f = ind.fitness();
        match first {
            Some(b) if f >= population[b].fitness() => {
                if second.is_none_or(|s| f < population[s].fitness()) {
                    second = Some(i);
                }
            }
            _ => {
                second = first;
                first = Some(i);
            }
        }
    }
    let first = first.unwrap_or(0);
    (first, second.unwrap_or(first))
}

/// Roulette weights: the individual's own weight when it has one, else the
/// inverted fitness plus ε.
fn roulette_weights<I: Individual>(population: &[I]) -> Vec<f64> {
    const EPSILON: f64 = 1e-10;
    let max_fitness = population
        .iter()
        .map(|ind| ind.fitness().to_f64())
        .filter(|f| f.is_finite())
        .fold(f64::NEG_INFINITY, f64::max);

    population
        .iter()
        .map(|ind| {
            let w = match ind.selection_weight() {
                Some(w) => w,
                None => max_fitness - ind.fitness().to_f64() + EPSILON,
            };
            if w.is_finite() && w > 0.0 {
                w
            } else {
                0.0
            }
        })
        .collect()
}

fn roulette<I: Individual, R: Rng>(population: &[I], rng: &mut R) -> usize {
    let n = population.len();
    let weights = roulette_weights(population);

    let total: f64 = weights.iter().sum();
    if !(total.is_finite() && total > 0.0) {
        return rng.random_range(0..n);
    }

    let threshold = rng.random_range(0.0..total);
    let mut cumulative = 0.0;
    for (i, &w) in weights.iter().enumerate() {
        cumulative += w;
        if cumulative > threshold {
            return i;
        }
    }
    // Rounding can leave the threshold just past the last bucket.
    weights.iter().rposition(|&w| w > 0.0).unwrap_or(n - 1)
}

fn tournament<I: Individual, R: Rng>(population: &[I], k: usize, rng: &mut R) -> usize {
    let n = population.len();
    let mut best_idx = rng.random_range(0..n);
    for _ in 1..k.max(1) {
        let idx = rng.random_range(0..n);
        if population[idx].fitness() < population[best_idx].fitness() {
            best_idx = idx;
        }
    }
    best_idx
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::create_rng;

    #[derive(Clone)]
    struct TestInd {
        fit: f64,
    }

    impl Individual for TestInd {
        type Fitness = f64;
        fn fitness(&self) -> f64 {
            self.fit
        }
        fn set_fitness(&mut self, f: f64) {
            self.fit = f;
        }
    }

    fn make_population(fitnesses: &[f64]) -> Vec<TestInd> {
        fitnesses.iter().map(|&f| TestInd { fit: f }).collect()
    }

    #[test]
    fn test_top_two() {
        let pop = make_population(&[10.0, 5.0, 1.0, 8.0, 5.0]);
        let mut rng = create_rng(42);
        assert_eq!(Selection::TopTwo.select_pair(&pop, &mut rng), (2, 1));
        assert_eq!(Selection::TopTwo.select(&pop, &mut rng), 2);
    }

    #[test]
    fn test_top_two_with_ties() {
        let pop = make_population(&[3.0, 3.0, 3.0]);
        let mut rng = create_rng(0);
        assert_eq!(Selection::TopTwo.select_pair(&pop, &mut rng), (0, 1));
    }

    #[test]
    fn test_roulette_favors_best() {
        let pop = make_population(&[100.0, 50.0, 1.0, 80.0]);
        let mut rng = create_rng(42);
        let mut counts = [0u32; 4];
        for _ in 0..10_000 {
            counts[Selection::Roulette.select(&pop, &mut rng)] += 1;
        }
        assert!(counts[2] > counts[1]);
        assert!(counts[1] > counts[3]);
        assert!(counts[3] > counts[0]);
    }

    #[test]
    fn test_roulette_worst_keeps_positive_weight() {
        let weights = roulette_weights(&make_population(&[100.0, 50.0, 1.0, 80.0]));
        assert!(weights.iter().all(|&w| w > 0.0), "{weights:?}");
        assert!((weights[2] - 99.0).abs() < 1e-6);
    }

    // ---- Value-weighted individuals ----

    #[derive(Clone)]
    struct Valued {
        value: f64,
        feasible: bool,
    }

    impl Individual for Valued {
        type Fitness = f64;
        fn fitness(&self) -> f64 {
            if self.feasible {
                -self.value
            } else {
                0.0
            }
        }
        fn set_fitness(&mut self, _f: f64) {}
        fn selection_weight(&self) -> Option<f64> {
            Some(if self.feasible { self.value } else { 0.0 })
        }
    }

    #[test]
    fn test_roulette_is_value_proportional_when_all_feasible() {
        let pop = vec![
            Valued { value: 10.0, feasible: true },
            Valued { value: 11.0, feasible: true },
        ];
        let mut rng = create_rng(11);
        let mut counts = [0u32; 2];
        let n = 20_000;
        for _ in 0..n {
            counts[Selection::Roulette.select(&pop, &mut rng)] += 1;
        }
        let share = counts[0] as f64 / n as f64;
        assert!((share - 10.0 / 21.0).abs() < 0.02, "counts {counts:?}");
    }

    #[test]
    fn test_roulette_never_picks_infeasible_valued() {
        let pop = vec![
            Valued { value: 30.0, feasible: false },
            Valued { value: 2.0, feasible: true },
            Valued { value: 6.0, feasible: true },
        ];
        let mut rng = create_rng(7);
        let mut counts = [0u32; 3];
        let n = 20_000;
        for _ in 0..n {
            counts[Selection::Roulette.select(&pop, &mut rng)] += 1;
        }
        assert_eq!(counts[0], 0);
        let share = counts[2] as f64 / n as f64;
        assert!((share - 0.75).abs() < 0.02, "share {share}");
    }

    #[test]
    fn test_roulette_zero_total_is_uniform() {
        let pop = make_population(&[0.0, 0.0, 0.0, 0.0]);
        let mut rng = create_rng(42);
        let mut counts = [0u32; 4];
        for _ in 0..10_000 {
            counts[Selection::Roulette.select(&pop, &mut rng)] += 1;
        }
        for &c in &counts {
            assert!(c > 2_000, "expected uniform, got {counts:?}");
        }
    }

    #[test]
    fn test_tournament_favors_best() {
        let pop = make_population(&[10.0, 5.0, 1.0, 8.0]);
        let mut rng = create_rng(42);
        let mut counts = [0u32; 4];
        for _ in 0..10_000 {
            counts[Selection::Tournament(4).select(&pop, &mut rng)] += 1;
        }
        assert!(counts[2] > 6_000, "got {counts:?}");
    }

    #[test]
    fn test_single_individual() {
        let pop = make_population(&[5.0]);
        let mut rng = create_rng(42);
        for sel in [Selection::TopTwo, Selection::Roulette, Selection::Tournament(3)] {
            assert_eq!(sel.select(&pop, &mut rng), 0);
            assert_eq!(sel.select_pair(&pop, &mut rng), (0, 0));
        }
    }
}
