//! Genetic operators for fixed-length chromosomes.
//!
//! # Crossover Operators
//!
//! - [`single_point_crossover`]: cut at one point and exchange tails
//! - [`order_single_point_crossover`]: single-point variant that keeps
//!   permutations valid
//! - [`order_crossover`] (OX): Davis (1985), two-point, preserves relative order
//!
//! # Mutation Operators
//!
//! - [`swap_gene_mutation`]: per-position swap with a random partner
//! - [`bit_flip_mutation`]: per-bit flip
//! - [`reset_one_gene`]: with some probability, redraw one integer gene
//!
//! # References
//!
//! - Holland (1975), *Adaptation in Natural and Artificial Systems*
//! - Davis (1985), "Applying Adaptive Algorithms to Epistatic Domains"
//! - Cicirello (2023), "Genetic Operators for Permutation Representation"

use rand::Rng;
use std::ops::RangeInclusive;

// ============================================================================
// Crossover operators
// ============================================================================

/// Single-point crossover.
///
/// Picks a cut `c` uniformly in `1..len` and returns
/// `(p1[..c] ++ p2[c..], p2[..c] ++ p1[c..])`. Chromosomes shorter than two
/// genes are returned unchanged.
///
/// # Panics
/// Panics if parents have different lengths.
pub fn single_point_crossover<T: Clone, R: Rng>(
    parent1: &[T],
    parent2: &[T],
    rng: &mut R,
) -> (Vec<T>, Vec<T>) {
    let n = parent1.len();
    assert_eq!(n, parent2.len(), "parents must have equal length");
    if n < 2 {
        return (parent1.to_vec(), parent2.to_vec());
    }
    let cut = rng.random_range(1..n);
    let child1 = parent1[..cut].iter().chain(&parent2[cut..]).cloned().collect();
    let child2 = parent2[..cut].iter().chain(&parent1[cut..]).cloned().collect();
    (child1, child2)
}

/// Order-preserving single-point crossover for permutations.
///
/// Child 1 keeps `p1[..c]` and appends the genes it is missing in the
/// order they appear in `p2`; child 2 is built the other way round. Both
/// children are permutations of the same gene set as the parents, which may
/// be any set of distinct indices (tour interiors use `1..n`).
///
/// # Panics
/// Panics if parents have different lengths.
pub fn order_single_point_crossover<R: Rng>(
    parent1: &[usize],
    parent2: &[usize],
    rng: &mut R,
) -> (Vec<usize>, Vec<usize>) {
    let n = parent1.len();
    assert_eq!(n, parent2.len(), "parents must have equal length");
    if n < 2 {
        return (parent1.to_vec(), parent2.to_vec());
    }
    let cut = rng.random_range(1..n);
    (
        order_fill(&parent1[..cut], parent2),
        order_fill(&parent2[..cut], parent1),
    )
}

/// `head` followed by the genes of `donor` not in `head`, in donor order.
fn order_fill(head: &[usize], donor: &[usize]) -> Vec<usize> {
    let size = donor.iter().chain(head).copied().max().map_or(0, |m| m + 1);
    let mut taken = vec![false; size];
    let mut child = Vec::with_capacity(donor.len());
    for &g in head {
        taken[g] = true;
        child.push(g);
    }
    for &g in donor {
        if !taken[g] {
            taken[g] = true;
            child.push(g);
        }
    }
    child
}

/// Order Crossover (OX) for permutations of `0..n` or any set of distinct
/// indices.
///
/// 1. Select a random segment `[start, end]` from parent1
/// 2. Copy segment to child at the same positions
/// 3. Fill remaining positions with elements from parent2, in their original
///    order starting after the segment, skipping elements already present
///
/// # Panics
/// Panics if parents have different lengths.
pub fn order_crossover<R: Rng>(
    parent1: &[usize],
    parent2: &[usize],
    rng: &mut R,
) -> (Vec<usize>, Vec<usize>) {
    let n = parent1.len();
    assert_eq!(n, parent2.len(), "parents must have equal length");
    if n < 2 {
        return (parent1.to_vec(), parent2.to_vec());
    }

    let (start, end) = random_segment(n, rng);
    (
        ox_build_child(parent1, parent2, start, end),
        ox_build_child(parent2, parent1, start, end),
    )
}

fn ox_build_child(template: &[usize], donor: &[usize], start: usize, end: usize) -> Vec<usize> {
    let n = template.len();
    let size = template.iter().copied().max().map_or(0, |m| m + 1);
    let mut child = template.to_vec();
    let mut in_segment = vec![false; size];
    for &g in &template[start..=end] {
        in_segment[g] = true;
    }

    let mut pos = (end + 1) % n;
    for offset in 0..n {
        let g = donor[(end + 1 + offset) % n];
        if !in_segment[g] {
            child[pos] = g;
            pos = (pos + 1) % n;
        }
    }
    child
}

// ============================================================================
// Mutation operators
// ============================================================================

/// Visits every position and, with probability `rate`, swaps it with a
/// uniformly chosen other position. Keeps permutations valid.
pub fn swap_gene_mutation<R: Rng>(genes: &mut [usize], rate: f64, rng: &mut R) {
    let n = genes.len();
    if n < 2 || rate <= 0.0 {
        return;
    }
    for i in 0..n {
        if rng.random_bool(rate.min(1.0)) {
            let mut j = rng.random_range(0..n - 1);
            if j >= i {
                j += 1;
            }
            genes.swap(i, j);
        }
    }
}

/// Flips every bit independently with probability `rate`.
pub fn bit_flip_mutation<R: Rng>(bits: &mut [bool], rate: f64, rng: &mut R) {
    if rate <= 0.0 {
        return;
    }
    for bit in bits.iter_mut() {
        if rng.random_bool(rate.min(1.0)) {
            *bit = !*bit;
        }
    }
}

/// With probability `rate`, replaces one uniformly chosen gene by a uniform
/// draw from `range`.
pub fn reset_one_gene<R: Rng>(
    genes: &mut [i64],
    rate: f64,
    range: RangeInclusive<i64>,
    rng: &mut R,
) {
    if genes.is_empty() || rate <= 0.0 || range.is_empty() {
        return;
    }
    if rng.random_bool(rate.min(1.0)) {
        let i = rng.random_range(0..genes.len());
        genes[i] = rng.random_range(range);
    }
}

// ============================================================================
// Helpers
// ============================================================================

/// Pick a random segment `[start, end]` within `0..n` where `start <= end`.
fn random_segment<R: Rng>(n: usize, rng: &mut R) -> (usize, usize) {
    let a = rng.random_range(0..n);
    let b = rng.random_range(0..n);
    (a.min(b), a.max(b))
}

// ============================================================================
// Tests
// ============================================================================
