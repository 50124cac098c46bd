//! Benchmark runner: every solver on every instance, several seeded runs.

use super::config::BenchmarkConfig;
use super::report::BenchmarkReport;
use crate::aostar::{AndOrConfig, AndOrSolver};
use crate::astar::{AStarConfig, AStarSolver};
use crate::beam::{BeamConfig, BeamSearchSolver};
use crate::error::{Result, TspError};
use crate::ga::{GaConfig, GeneticSolver};
use crate::hill::{HillClimbingConfig, HillClimbingSolver};
use crate::matrix::DistanceMatrix;
use crate::solver::{RunContext, SolveStatus, Solver, TraceEvent};
use log::{debug, info};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::time::Instant;

/// Outcome of one `(instance, solver, run)` job. Written once.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BenchmarkRecord {
    pub instance: String,
    pub solver: String,
    pub run: usize,
    pub seed: u64,
    pub tour: Vec<usize>,
    pub cost: f64,
    pub steps: usize,
    pub status: SolveStatus,
    pub optimal: bool,
    pub initial_cost: Option<f64>,
    pub elapsed_ms: f64,
    /// Empty unless trace recording was enabled.
    pub trace: Vec<TraceEvent>,
}

/// Runs a set of solvers over a set of named instances.
///
/// # Examples
///
/// ```
/// use tsp_search::DistanceMatrix;
/// use tsp_search::astar::AStarSolver;
/// use tsp_search::benchmark::{BenchmarkConfig, BenchmarkRunner};
///
/// let m = DistanceMatrix::from_coords(&[(0.0, 0.0), (0.0, 3.0), (4.0, 3.0), (4.0, 0.0)]);
/// let mut runner = BenchmarkRunner::new(BenchmarkConfig::default().with_runs(2));
/// runner.add_instance("square", m);
/// runner.add_solver(Box::new(AStarSolver::default()));
/// let report = runner.run().unwrap();
/// assert_eq!(report.records().len(), 2);
/// assert_eq!(report.proven_optimum("square"), Some(14.0));
/// ```
pub struct BenchmarkRunner {
    config: BenchmarkConfig,
    instances: Vec<(String, DistanceMatrix)>,
    solvers: Vec<Box<dyn Solver>>,
}

impl BenchmarkRunner {
    pub fn new(config: BenchmarkConfig) -> Self {
        Self {
            config,
            instances: Vec::new(),
            solvers: Vec::new(),
        }
    }

    pub fn config(&self) -> &BenchmarkConfig {
        &self.config
    }

    pub fn add_instance(&mut self, name: impl Into<String>, matrix: DistanceMatrix) -> &mut Self {
        self.instances.push((name.into(), matrix));
        self
    }

    pub fn add_solver(&mut self, solver: Box<dyn Solver>) -> &mut Self {
        self.solvers.push(solver);
        self
    }

    /// Runs every job and collects the records in job order
    /// (instance, then solver, then run).
    ///
    /// # Errors
    ///
    /// [`TspError::Config`] for an invalid benchmark configuration, or the
    /// first error a solver returned.
    pub fn run(&self) -> Result<BenchmarkReport> {
        self.config.validate().map_err(TspError::Config)?;

        let runs = self.config.runs_per_solver;
        let jobs: Vec<(usize, usize, usize)> = (0..self.instances.len())
            .flat_map(|i| (0..self.solvers.len()).flat_map(move |s| (0..runs).map(move |r| (i, s, r))))
            .collect();
        info!(
            "benchmark: {} instances x {} solvers x {runs} runs",
            self.instances.len(),
            self.solvers.len()
        );

        let records = if self.config.parallel {
            jobs.par_iter()
                .map(|&(i, s, r)| self.run_job(i, s, r))
                .collect::<Result<Vec<_>>>()?
        } else {
            jobs.iter()
                .map(|&(i, s, r)| self.run_job(i, s, r))
                .collect::<Result<Vec<_>>>()?
        };

        Ok(BenchmarkReport::new(records))
    }

    fn run_job(&self, instance: usize, solver: usize, run: usize) -> Result<BenchmarkRecord> {
        let (name, matrix) = &self.instances[instance];
        let solver = &self.solvers[solver];
        let seed = self.config.seed_for(run);

        let mut trace: Vec<TraceEvent> = Vec::new();
        let start = Instant::now();
        let result = if self.config.record_trace {
            let mut ctx = RunContext::new().with_seed(seed).with_trace(&mut trace);
            solver.solve_with(matrix, &mut ctx)?
        } else {
            solver.solve_with(matrix, &mut RunContext::new().with_seed(seed))?
        };
        let elapsed_ms = start.elapsed().as_secs_f64() * 1_000.0;

        debug!(
            "{name}/{} run {run}: cost {:.4} ({:?}) in {elapsed_ms:.2} ms",
            solver.name(),
            result.cost,
            result.status
        );

        Ok(BenchmarkRecord {
            instance: name.clone(),
            solver: solver.name().to_string(),
            run,
            seed,
            tour: result.tour,
            cost: result.cost,
            steps: result.steps,
            status: result.status,
            optimal: result.optimal,
            initial_cost: result.initial_cost,
            elapsed_ms,
            trace,
        })
    }
}

/// Wall-clock budget of each exact search in [`standard_solvers`]. Exact
/// search grows factorially with the city count, so larger instances end
/// with [`SolveStatus::TimeLimit`] instead of stalling the suite.
pub const EXACT_TIME_LIMIT_MS: u64 = 10_000;

fn bounded_astar() -> AStarSolver {
    AStarSolver::new(AStarConfig::default().with_time_limit_ms(EXACT_TIME_LIMIT_MS))
}

fn bounded_and_or() -> AndOrSolver {
    AndOrSolver::new(AndOrConfig::default().with_time_limit_ms(EXACT_TIME_LIMIT_MS))
}

/// One of each strategy with its default configuration, plus the
/// stochastic hill climber and the swap beam. The exact searches are capped
/// at [`EXACT_TIME_LIMIT_MS`].
pub fn standard_solvers(beam_width: usize) -> Vec<Box<dyn Solver>> {
    vec![
        Box::new(bounded_astar()),
        Box::new(bounded_and_or()),
        Box::new(HillClimbingSolver::default()),
        Box::new(HillClimbingSolver::new(HillClimbingConfig::stochastic(1.0))),
        Box::new(BeamSearchSolver::new(
            BeamConfig::default().with_beam_width(beam_width),
        )),
        Box::new(BeamSearchSolver::new(BeamConfig::local(beam_width))),
        Box::new(GeneticSolver::new(GaConfig::fast())),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::beam::BeamConfig;
    use crate::tour::is_closed_tour;

    fn lab_matrix() -> DistanceMatrix {
        DistanceMatrix::from_rows(vec![
            vec![0.0, 10.0, 15.0, 20.0],
            vec![10.0, 0.0, 35.0, 25.0],
            vec![15.0, 35.0, 0.0, 30.0],
            vec![20.0, 25.0, 30.0, 0.0],
        ])
        .unwrap()
    }

    fn runner(config: BenchmarkConfig) -> BenchmarkRunner {
        let mut runner = BenchmarkRunner::new(config);
        runner
            .add_instance("lab4", lab_matrix())
            .add_solver(Box::new(AStarSolver::default()))
            .add_solver(Box::new(HillClimbingSolver::default()));
        runner
    }

    #[test]
    fn test_job_order_and_seeds() {
        let report = runner(BenchmarkConfig::default().with_runs(3).with_base_seed(10))
            .run()
            .unwrap();
        let records = report.records();
        assert_eq!(records.len(), 6);
        assert_eq!(records[0].solver, "astar");
        assert_eq!(records[3].solver, "hill_climbing");
        let seeds: Vec<u64> = records.iter().map(|r| r.seed).collect();
        assert_eq!(seeds, vec![10, 11, 12, 10, 11, 12]);
        assert!(records.iter().all(|r| is_closed_tour(&r.tour, 4)));
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let par = runner(BenchmarkConfig::default().with_runs(4)).run().unwrap();
        let seq = runner(BenchmarkConfig::default().with_runs(4).with_parallel(false))
            .run()
            .unwrap();
        let key = |r: &BenchmarkRecord| (r.solver.clone(), r.run, r.tour.clone(), r.cost);
        let a: Vec<_> = par.records().iter().map(key).collect();
        let b: Vec<_> = seq.records().iter().map(key).collect();
        assert_eq!(a, b);
    }

    #[test]
    fn test_trace_recording() {
        let report = runner(BenchmarkConfig::default().with_runs(1).with_record_trace(true))
            .run()
            .unwrap();
        for record in report.records() {
            let last = record.trace.last().unwrap();
            assert_eq!(last.best_cost, record.cost);
        }

        let silent = runner(BenchmarkConfig::default().with_runs(1)).run().unwrap();
        assert!(silent.records().iter().all(|r| r.trace.is_empty()));
    }

    #[test]
    fn test_invalid_config() {
        let err = runner(BenchmarkConfig::default().with_runs(0)).run();
        assert!(matches!(err, Err(TspError::Config(_))));
    }

    #[test]
    fn test_solver_error_propagates() {
        let mut runner = BenchmarkRunner::new(BenchmarkConfig::default().with_runs(1));
        runner
            .add_instance("lab4", lab_matrix())
            .add_solver(Box::new(BeamSearchSolver::new(
                BeamConfig::default().with_beam_width(0),
            )));
        assert!(runner.run().is_err());
    }

    #[test]
    fn test_standard_solvers_all_run() {
        let mut runner = BenchmarkRunner::new(BenchmarkConfig::default().with_runs(1));
        runner.add_instance("lab4", lab_matrix());
        for solver in standard_solvers(3) {
            runner.add_solver(solver);
        }
        let report = runner.run().unwrap();
        assert_eq!(report.records().len(), 7);
        assert!(report.records().iter().all(|r| r.cost >= 80.0));
        assert_eq!(report.proven_optimum("lab4"), Some(80.0));
    }

    #[test]
    fn test_exact_solvers_are_time_bounded() {
        assert_eq!(bounded_astar().config().time_limit_ms, Some(EXACT_TIME_LIMIT_MS));
        assert_eq!(bounded_and_or().config().time_limit_ms, Some(EXACT_TIME_LIMIT_MS));
        let names: Vec<String> = standard_solvers(3)
            .iter()
            .map(|s| s.name().to_string())
            .collect();
        assert_eq!(names[0], bounded_astar().name());
        assert_eq!(names[1], bounded_and_or().name());
    }
}
