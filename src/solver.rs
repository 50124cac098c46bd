//! The common solver contract.
//!
//! Every strategy implements [`Solver`]: it borrows a [`DistanceMatrix`] and
//! returns a closed tour with its cost. Run-time options that vary between
//! runs of the same solver (seed override, trace subscription) travel in a
//! [`RunContext`].

use crate::error::Result;
use crate::matrix::DistanceMatrix;
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};

/// How a solve call ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SolveStatus {
    /// Proven optimal (A*/AO* with an admissible heuristic).
    Optimal,
    /// Instance with at most one location.
    Trivial,
    /// Local search stopped at a tour with no improving neighbor.
    LocalOptimum,
    /// Heuristic search ran to its natural end.
    Completed,
    /// A configured target cost was reached.
    TargetReached,
    /// Iteration or generation cap hit; best-so-far returned.
    IterationLimit,
    /// Wall-clock budget hit; best-so-far returned.
    TimeLimit,
    /// Frontier/beam emptied without a complete tour; the returned tour is a
    /// greedy completion.
    Exhausted,
}

impl SolveStatus {
    /// True when the run stopped on a budget or an empty frontier rather
    /// than by its own termination rule.
    pub fn is_degraded(self) -> bool {
        matches!(
            self,
            SolveStatus::IterationLimit | SolveStatus::TimeLimit | SolveStatus::Exhausted
        )
    }
}

/// Outcome of one solve call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SolveResult {
    /// Closed tour starting and ending at location 0 (`[0]` when trivial).
    pub tour: Vec<usize>,
    pub cost: f64,
    /// Iterations, expansions, or generations, depending on the solver.
    pub steps: usize,
    pub status: SolveStatus,
    /// Whether `cost` is proven optimal.
    pub optimal: bool,
    /// Cost of the starting tour for local-search style solvers.
    pub initial_cost: Option<f64>,
}

impl SolveResult {
    /// Result for instances with at most one location.
    pub fn trivial() -> Self {
        Self {
            tour: vec![0],
            cost: 0.0,
            steps: 0,
            status: SolveStatus::Trivial,
            optimal: true,
            initial_cost: None,
        }
    }
}

/// One progress record: best cost known after `iteration`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TraceEvent {
    pub iteration: usize,
    pub best_cost: f64,
    pub tour: Vec<usize>,
}

/// Subscriber for solver progress.
pub trait TraceSink {
    fn record(&mut self, event: TraceEvent);
}

impl TraceSink for Vec<TraceEvent> {
    fn record(&mut self, event: TraceEvent) {
        self.push(event);
    }
}

/// Adapts a closure into a [`TraceSink`].
pub struct TraceFn<F>(pub F);

impl<F: FnMut(TraceEvent)> TraceSink for TraceFn<F> {
    fn record(&mut self, event: TraceEvent) {
        (self.0)(event)
    }
}

/// Per-run options handed to [`Solver::solve_with`].
#[derive(Default)]
pub struct RunContext<'a> {
    /// Overrides the solver's configured seed when set.
    pub seed: Option<u64>,
    trace: Option<&'a mut dyn TraceSink>,
}

impl<'a> RunContext<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_trace(mut self, sink: &'a mut dyn TraceSink) -> Self {
        self.trace = Some(sink);
        self
    }

    /// Seed for this run: the override, else the configured one.
    pub fn seed_or(&self, configured: Option<u64>) -> Option<u64> {
        self.seed.or(configured)
    }

    pub fn is_tracing(&self) -> bool {
        self.trace.is_some()
    }

    /// Sends a progress event; the tour is only copied when someone listens.
    pub fn emit(&mut self, iteration: usize, best_cost: f64, tour: &[usize]) {
        if let Some(sink) = self.trace.as_deref_mut() {
            sink.record(TraceEvent {
                iteration,
                best_cost,
                tour: tour.to_vec(),
            });
        }
    }
}

/// A TSP strategy.
///
/// Solvers are stateless apart from their configuration, so one instance can
/// serve many concurrent runs.
pub trait Solver: Send + Sync {
    /// Short identifier used in reports.
    fn name(&self) -> &str;

    /// Solves `matrix` with per-run options.
    ///
    /// # Errors
    ///
    /// Only configuration problems are errors; running out of budget is
    /// reported through [`SolveResult::status`].
    fn solve_with(&self, matrix: &DistanceMatrix, ctx: &mut RunContext<'_>) -> Result<SolveResult>;

    /// Solves `matrix` with the configured seed and no tracing.
    fn solve(&self, matrix: &DistanceMatrix) -> Result<SolveResult> {
        self.solve_with(matrix, &mut RunContext::default())
    }
}

/// Optional wall-clock budget, checked once per outer iteration.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Deadline(Option<Instant>);

impl Deadline {
    pub(crate) fn after_ms(limit_ms: Option<u64>) -> Self {
        Self(limit_ms.map(|ms| Instant::now() + Duration::from_millis(ms)))
    }

    pub(crate) fn expired(&self) -> bool {
        self.0.is_some_and(|at| Instant::now() >= at)
    }
}
