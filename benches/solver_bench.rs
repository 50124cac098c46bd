//! Criterion benchmarks for the TSP solvers.
//!
//! Random Euclidean instances of a few sizes; exact searches stay small.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use tsp_search::aostar::AndOrSolver;
use tsp_search::astar::AStarSolver;
use tsp_search::beam::{BeamConfig, BeamSearchSolver};
use tsp_search::ga::{GaConfig, GeneticSolver};
use tsp_search::heuristics::mst_lower_bound;
use tsp_search::hill::{HillClimbingConfig, HillClimbingSolver, Neighborhood};
use tsp_search::matrix::random_coords;
use tsp_search::random::create_rng;
use tsp_search::{DistanceMatrix, Solver};

fn instance(n: usize) -> DistanceMatrix {
    let mut rng = create_rng(n as u64);
    DistanceMatrix::from_coords(&random_coords(n, &mut rng))
}

// ===========================================================================
// Benchmarks
// ===========================================================================

fn bench_exact(c: &mut Criterion) {
    let mut group = c.benchmark_group("exact");
    group.sample_size(10);

    for n in [6usize, 8, 10] {
        let m = instance(n);
        let astar = AStarSolver::default();
        let aostar = AndOrSolver::default();
        group.bench_with_input(BenchmarkId::new("astar", n), &m, |b, m| {
            b.iter(|| black_box(astar.solve(black_box(m))))
        });
        group.bench_with_input(BenchmarkId::new("aostar", n), &m, |b, m| {
            b.iter(|| black_box(aostar.solve(black_box(m))))
        });
    }
    group.finish();
}

fn bench_local(c: &mut Criterion) {
    let mut group = c.benchmark_group("local");
    group.sample_size(10);

    for n in [20usize, 50] {
        let m = instance(n);
        let solvers: [(&str, Box<dyn Solver>); 3] = [
            (
                "hill_swap",
                Box::new(HillClimbingSolver::new(HillClimbingConfig::default().with_seed(42))),
            ),
            (
                "hill_2opt",
                Box::new(HillClimbingSolver::new(
                    HillClimbingConfig::default()
                        .with_neighborhood(Neighborhood::TwoOpt)
                        .with_seed(42),
                )),
            ),
            (
                "beam_w5",
                Box::new(BeamSearchSolver::new(BeamConfig::default().with_beam_width(5))),
            ),
        ];
        for (name, solver) in &solvers {
            group.bench_with_input(BenchmarkId::new(*name, n), &m, |b, m| {
                b.iter(|| black_box(solver.solve(black_box(m))))
            });
        }
    }
    group.finish();
}

fn bench_genetic(c: &mut Criterion) {
    let mut group = c.benchmark_group("genetic");
    group.sample_size(10);

    for (n, pop, gen) in [(20usize, 50usize, 50usize), (50, 100, 30)] {
        let m = instance(n);
        let solver = GeneticSolver::new(
            GaConfig::default()
                .with_population_size(pop)
                .with_max_generations(gen)
                .with_seed(42),
        );
        group.bench_with_input(
            BenchmarkId::new(format!("p{pop}_g{gen}"), n),
            &m,
            |b, m| b.iter(|| black_box(solver.solve(black_box(m)))),
        );
    }
    group.finish();
}

fn bench_mst_bound(c: &mut Criterion) {
    let mut group = c.benchmark_group("mst_bound");
    for n in [10usize, 50, 100] {
        let m = instance(n);
        let remaining: Vec<usize> = (1..n).collect();
        group.bench_with_input(BenchmarkId::from_parameter(n), &m, |b, m| {
            b.iter(|| black_box(mst_lower_bound(black_box(&remaining), m)))
        });
    }
    group.finish();
}

criterion_group!(benches, bench_exact, bench_local, bench_genetic, bench_mst_bound);
criterion_main!(benches);
