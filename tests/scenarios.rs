//! Cross-solver scenarios through the public API.

use tsp_search::aostar::AndOrSolver;
use tsp_search::astar::AStarSolver;
use tsp_search::beam::{BeamConfig, BeamSearchSolver};
use tsp_search::benchmark::{read_csv, standard_solvers, BenchmarkConfig, BenchmarkRunner};
use tsp_search::ga::{GaConfig, GeneticSolver};
use tsp_search::hill::{HillClimbingConfig, HillClimbingSolver};
use tsp_search::matrix::random_coords;
use tsp_search::random::create_rng;
use tsp_search::tour::{brute_force_optimum, cost_of, is_closed_tour, normalize_closed};
use tsp_search::{DistanceMatrix, RunContext, SolveStatus, Solver};

use rand::Rng;

const LAB10: [(f64, f64); 10] = [
    (1.0, 1.0),
    (3.0, 5.0),
    (5.0, 8.0),
    (7.0, 6.0),
    (9.0, 3.0),
    (8.0, 1.0),
    (6.0, 3.0),
    (4.0, 2.0),
    (2.0, 4.0),
    (1.0, 7.0),
];

fn lab4() -> DistanceMatrix {
    DistanceMatrix::from_rows(vec![
        vec![0.0, 10.0, 15.0, 20.0],
        vec![10.0, 0.0, 35.0, 25.0],
        vec![15.0, 35.0, 0.0, 30.0],
        vec![20.0, 25.0, 30.0, 0.0],
    ])
    .unwrap()
}

fn asymmetric(n: usize, seed: u64) -> DistanceMatrix {
    let mut rng = create_rng(seed);
    let rows = (0..n)
        .map(|i| {
            (0..n)
                .map(|j| if i == j { 0.0 } else { rng.random_range(1.0..50.0) })
                .collect()
        })
        .collect();
    DistanceMatrix::from_rows(rows).unwrap()
}

// ---- Four-city lab instance ----

#[test]
fn lab4_exact_solvers_prove_80() {
    let m = lab4();
    let solvers: [Box<dyn Solver>; 2] = [
        Box::new(AStarSolver::default()),
        Box::new(AndOrSolver::default()),
    ];
    for solver in solvers {
        let result = solver.solve(&m).unwrap();
        assert_eq!(result.cost, 80.0, "{}", solver.name());
        assert_eq!(result.status, SolveStatus::Optimal);
        assert!(result.optimal);
        assert!(is_closed_tour(&result.tour, 4));
    }
}

#[test]
fn lab4_hill_climbing_reaches_80_from_any_seed() {
    let solver = HillClimbingSolver::default();
    for seed in 0..20 {
        let result = solver
            .solve_with(&lab4(), &mut RunContext::new().with_seed(seed))
            .unwrap();
        assert_eq!(result.cost, 80.0, "seed {seed}");
        assert_eq!(result.status, SolveStatus::LocalOptimum);
    }
}

// ---- Exactness and bounds ----

#[test]
fn exact_solvers_match_brute_force() {
    for seed in 0..20 {
        let m = if seed % 2 == 0 {
            let mut rng = create_rng(seed);
            DistanceMatrix::from_coords(&random_coords(7, &mut rng))
        } else {
            asymmetric(7, seed)
        };
        let (_, exact) = brute_force_optimum(&m);
        let a = AStarSolver::default().solve(&m).unwrap();
        let ao = AndOrSolver::default().solve(&m).unwrap();
        assert!((a.cost - exact).abs() < 1e-9, "astar seed {seed}");
        assert!((ao.cost - exact).abs() < 1e-9, "aostar seed {seed}");
        assert!((cost_of(&a.tour, &m) - a.cost).abs() < 1e-9);
    }
}

#[test]
fn heuristic_solvers_never_beat_the_optimum() {
    let m = asymmetric(8, 99);
    let (_, exact) = brute_force_optimum(&m);
    let solvers: Vec<Box<dyn Solver>> = vec![
        Box::new(HillClimbingSolver::new(HillClimbingConfig::default().with_restarts(3))),
        Box::new(HillClimbingSolver::new(HillClimbingConfig::stochastic(2.0))),
        Box::new(BeamSearchSolver::new(BeamConfig::default().with_beam_width(4))),
        Box::new(BeamSearchSolver::new(BeamConfig::local(4))),
        Box::new(GeneticSolver::new(GaConfig::fast().with_parallel(false))),
    ];
    for solver in &solvers {
        let result = solver
            .solve_with(&m, &mut RunContext::new().with_seed(3))
            .unwrap();
        assert!(is_closed_tour(&result.tour, 8), "{}", solver.name());
        assert!(result.cost >= exact - 1e-9, "{}", solver.name());
        assert!((cost_of(&result.tour, &m) - result.cost).abs() < 1e-9);
    }
}

#[test]
fn rotated_cycles_normalize_to_the_same_cost() {
    let m = DistanceMatrix::from_coords(&LAB10);
    let cycle = [3, 4, 5, 6, 7, 0, 8, 1, 9, 2];
    let tour = normalize_closed(&cycle);
    assert!(is_closed_tour(&tour, 10));
    for shift in 1..cycle.len() {
        let mut rotated = cycle.to_vec();
        rotated.rotate_left(shift);
        let other = normalize_closed(&rotated);
        assert_eq!(other, tour);
        assert_eq!(cost_of(&other, &m), cost_of(&tour, &m));
    }
}

// ---- Benchmark ----

#[test]
fn benchmark_end_to_end_with_csv() {
    let mut runner = BenchmarkRunner::new(BenchmarkConfig::default().with_runs(2).with_base_seed(7));
    runner
        .add_instance("lab4", lab4())
        .add_instance("lab10", DistanceMatrix::from_coords(&LAB10));
    for solver in standard_solvers(3) {
        runner.add_solver(solver);
    }
    let report = runner.run().unwrap();
    assert_eq!(report.records().len(), 2 * 7 * 2);

    assert_eq!(report.proven_optimum("lab4"), Some(80.0));
    let opt10 = report.proven_optimum("lab10").unwrap();
    for record in report.records() {
        let n = if record.instance == "lab4" { 4 } else { 10 };
        assert!(is_closed_tour(&record.tour, n));
        let opt = report.proven_optimum(&record.instance).unwrap();
        assert!(record.cost >= opt - 1e-9, "{} on {}", record.solver, record.instance);
    }
    let astar = report.best("lab10", "astar").unwrap();
    assert!((astar.cost - opt10).abs() < 1e-9);
    assert!(report.summary().contains("Instance lab10"));

    let path = std::env::temp_dir().join(format!("tsp-search-scenario-{}.csv", std::process::id()));
    report.write_csv(&path).unwrap();
    let rows = read_csv(&path).unwrap();
    std::fs::remove_file(&path).unwrap();
    assert_eq!(rows, report.comparison_rows());
    assert!(rows.iter().all(|r| r.optimal_value.is_some()));
}
