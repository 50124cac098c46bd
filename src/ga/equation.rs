//! Integer linear equation `Σ cᵢ·xᵢ = target` as a GA problem.
//!
//! Genes are bounded non-negative integers and fitness is the absolute
//! residual `|Σ cᵢ·xᵢ - target|`, so an exact solution has fitness 0. Use
//! it with [`GaConfig::equation`](crate::ga::GaConfig::equation), which
//! stops at that target.

use super::operators::{reset_one_gene, single_point_crossover};
use super::types::{GaProblem, Individual};
use crate::error::{Result, TspError};
use rand::Rng;

#[derive(Debug, Clone, PartialEq)]
pub struct EquationChromosome {
    pub genes: Vec<i64>,
    pub fitness: f64,
}

impl Individual for EquationChromosome {
    type Fitness = f64;

    fn fitness(&self) -> f64 {
        self.fitness
    }

    fn set_fitness(&mut self, fitness: f64) {
        self.fitness = fitness;
    }
}

/// Coefficients, right-hand side, and the upper gene bound.
///
/// # Examples
///
/// ```
/// use tsp_search::ga::equation::EquationProblem;
/// use tsp_search::ga::{GaConfig, GaRunner};
///
/// let problem = EquationProblem::lab();
/// let config = GaConfig::equation().with_max_generations(1_000).with_seed(1);
/// let result = GaRunner::run(&problem, &config).unwrap();
/// if result.target_reached {
///     assert_eq!(problem.residual(&result.best.genes), 0);
/// }
/// ```
#[derive(Debug, Clone)]
pub struct EquationProblem {
    coefficients: Vec<i64>,
    target: i64,
    max_gene: i64,
}

impl EquationProblem {
    /// # Errors
    /// [`TspError::Config`] for an empty coefficient list or a negative
    /// gene bound.
    pub fn new(coefficients: Vec<i64>, target: i64, max_gene: i64) -> Result<Self> {
        if coefficients.is_empty() {
            return Err(TspError::Config(
                "equation needs at least one coefficient".into(),
            ));
        }
        if max_gene < 0 {
            return Err(TspError::Config(format!(
                "max_gene must be non-negative, got {max_gene}"
            )));
        }
        Ok(Self {
            coefficients,
            target,
            max_gene,
        })
    }

    /// `a + 2b + 3c + 4d = 30` with every variable in `0..=10`.
    pub fn lab() -> Self {
        Self {
            coefficients: vec![1, 2, 3, 4],
            target: 30,
            max_gene: 10,
        }
    }

    pub fn len(&self) -> usize {
        self.coefficients.len()
    }

    pub fn is_empty(&self) -> bool {
        self.coefficients.is_empty()
    }

    /// `|Σ cᵢ·xᵢ - target|`.
    pub fn residual(&self, genes: &[i64]) -> i64 {
        let lhs: i64 = self.coefficients.iter().zip(genes).map(|(c, x)| c * x).sum();
        (lhs - self.target).abs()
    }
}

impl GaProblem for EquationProblem {
    type Individual = EquationChromosome;

    fn create_individual<R: Rng>(&self, rng: &mut R) -> EquationChromosome {
        EquationChromosome {
            genes: (0..self.len())
                .map(|_| rng.random_range(0..=self.max_gene))
                .collect(),
            fitness: f64::INFINITY,
        }
    }

    fn evaluate(&self, individual: &EquationChromosome) -> f64 {
        self.residual(&individual.genes) as f64
    }

    fn crossover<R: Rng>(
        &self,
        parent1: &EquationChromosome,
        parent2: &EquationChromosome,
        rng: &mut R,
    ) -> Vec<EquationChromosome> {
        let (a, b) = single_point_crossover(&parent1.genes, &parent2.genes, rng);
        vec![
            EquationChromosome {
                genes: a,
                fitness: f64::INFINITY,
            },
            EquationChromosome {
                genes: b,
                fitness: f64::INFINITY,
            },
        ]
    }

    /// `rate` is the chance that one gene of the child is redrawn.
    fn mutate<R: Rng>(&self, individual: &mut EquationChromosome, rate: f64, rng: &mut R) {
        reset_one_gene(&mut individual.genes, rate, 0..=self.max_gene, rng);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ga::{GaConfig, GaRunner};

    #[test]
    fn test_residual() {
        let problem = EquationProblem::lab();
        assert_eq!(problem.residual(&[0, 0, 0, 0]), 30);
        assert_eq!(problem.residual(&[1, 2, 3, 4]), 0);
        assert_eq!(problem.residual(&[10, 10, 10, 10]), 70);
    }

    #[test]
    fn test_reaches_exact_solution() {
        let problem = EquationProblem::lab();
        let config = GaConfig::equation().with_max_generations(2_000).with_seed(42);
        let result = GaRunner::run(&problem, &config).unwrap();
        assert!(result.target_reached);
        assert_eq!(result.best_fitness, 0.0);
        let genes = &result.best.genes;
        assert!(genes.iter().all(|g| (0..=10).contains(g)), "{genes:?}");
        let [a, b, c, d] = genes[..] else {
            panic!("expected four genes, got {genes:?}");
        };
        assert_eq!(a + 2 * b + 3 * c + 4 * d, 30);
        assert!(result.generations < 2_000);
    }

    #[test]
    fn test_top_two_survive_each_generation() {
        let problem = EquationProblem::lab();
        let config = GaConfig::equation()
            .with_target_fitness(-1.0)
            .with_max_generations(50)
            .with_seed(8);
        let result = GaRunner::run(&problem, &config).unwrap();
        assert!(!result.target_reached);
        for w in result.population_best.windows(2) {
            assert!(w[1] <= w[0]);
        }
    }

    #[test]
    fn test_invalid_problem() {
        assert!(EquationProblem::new(vec![], 3, 5).is_err());
        assert!(EquationProblem::new(vec![1], 3, -1).is_err());
        assert_eq!(EquationProblem::new(vec![2, 5], 7, 3).unwrap().len(), 2);
    }
}
