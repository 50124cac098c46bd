//! 0/1 knapsack as a bit-vector GA problem.
//!
//! Fitness is the negated total value of the selected items, or 0 when the
//! selection exceeds the capacity, so every feasible selection with positive
//! value beats every infeasible one. Under roulette selection a chromosome
//! is drawn in proportion to its value, and never when infeasible.

use super::operators::{bit_flip_mutation, single_point_crossover};
use super::types::{GaProblem, Individual};
use crate::error::{Result, TspError};
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Selection bits, one per item, with the penalised fitness.
#[derive(Debug, Clone, PartialEq)]
pub struct KnapsackChromosome {
    pub bits: Vec<bool>,
    pub fitness: f64,
}

impl Individual for KnapsackChromosome {
    type Fitness = f64;

    fn fitness(&self) -> f64 {
        self.fitness
    }

    fn set_fitness(&mut self, fitness: f64) {
        self.fitness = fitness;
    }

    fn selection_weight(&self) -> Option<f64> {
        Some((-self.fitness).max(0.0))
    }
}

/// A decoded selection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KnapsackSolution {
    /// Selected item indices, ascending.
    pub items: Vec<usize>,
    pub value: f64,
    pub weight: f64,
}

/// Items with weights and values, and a capacity.
#[derive(Debug, Clone)]
pub struct KnapsackProblem {
    weights: Vec<f64>,
    values: Vec<f64>,
    capacity: f64,
}

impl KnapsackProblem {
    /// # Errors
    /// [`TspError::Config`] when the lists differ in length or any number is
    /// negative or not finite.
    pub fn new(weights: Vec<f64>, values: Vec<f64>, capacity: f64) -> Result<Self> {
        if weights.len() != values.len() {
            return Err(TspError::Config(format!(
                "{} weights but {} values",
                weights.len(),
                values.len()
            )));
        }
        let valid = |x: &f64| x.is_finite() && *x >= 0.0;
        if !weights.iter().chain(&values).all(valid) || !valid(&capacity) {
            return Err(TspError::Config(
                "weights, values, and capacity must be finite and non-negative".into(),
            ));
        }
        Ok(Self {
            weights,
            values,
            capacity,
        })
    }

    pub fn len(&self) -> usize {
        self.weights.len()
    }

    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }

    pub fn capacity(&self) -> f64 {
        self.capacity
    }

    /// Items, total value, and total weight of a bit vector.
    pub fn decode(&self, bits: &[bool]) -> KnapsackSolution {
        let items: Vec<usize> = bits
            .iter()
            .enumerate()
            .filter_map(|(i, &b)| b.then_some(i))
            .collect();
        let value = items.iter().map(|&i| self.values[i]).sum();
        let weight = items.iter().map(|&i| self.weights[i]).sum();
        KnapsackSolution {
            items,
            value,
            weight,
        }
    }

    /// Greedy baseline: take items by descending value/weight ratio while
    /// they fit. Zero-weight items come first.
    pub fn greedy(&self) -> KnapsackSolution {
        let ratio = |i: usize| {
            if self.weights[i] > 0.0 {
                self.values[i] / self.weights[i]
            } else {
                f64::INFINITY
            }
        };
        let mut order: Vec<usize> = (0..self.len()).collect();
        order.sort_by(|&a, &b| ratio(b).total_cmp(&ratio(a)));

        let mut bits = vec![false; self.len()];
        let mut weight = 0.0;
        for i in order {
            if weight + self.weights[i] <= self.capacity {
                weight += self.weights[i];
                bits[i] = true;
            }
        }
        self.decode(&bits)
    }
}

impl GaProblem for KnapsackProblem {
    type Individual = KnapsackChromosome;

    fn create_individual<R: Rng>(&self, rng: &mut R) -> KnapsackChromosome {
        KnapsackChromosome {
            bits: (0..self.len()).map(|_| rng.random_bool(0.5)).collect(),
            fitness: f64::INFINITY,
        }
    }

    fn evaluate(&self, individual: &KnapsackChromosome) -> f64 {
        let solution = self.decode(&individual.bits);
        if solution.weight <= self.capacity {
            -solution.value
        } else {
            0.0
        }
    }

    fn crossover<R: Rng>(
        &self,
        parent1: &KnapsackChromosome,
        parent2: &KnapsackChromosome,
        rng: &mut R,
    ) -> Vec<KnapsackChromosome> {
        let (a, b) = single_point_crossover(&parent1.bits, &parent2.bits, rng);
        vec![
            KnapsackChromosome {
                bits: a,
                fitness: f64::INFINITY,
            },
            KnapsackChromosome {
                bits: b,
                fitness: f64::INFINITY,
            },
        ]
    }

    fn mutate<R: Rng>(&self, individual: &mut KnapsackChromosome, gene_rate: f64, rng: &mut R) {
        bit_flip_mutation(&mut individual.bits, gene_rate, rng);
    }
}
