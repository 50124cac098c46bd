//! Aggregation and persistence of benchmark records.

use super::runner::BenchmarkRecord;
use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::fmt::Write as _;
use std::io;
use std::path::Path;

/// One CSV row per run: where the run started, the best cost known for the
/// instance, and what the run found.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonRow {
    pub algorithm: String,
    pub instance: String,
    /// Cost of the run's starting tour, for solvers that have one.
    pub start_value: Option<f64>,
    /// Proven optimum of the instance, when some solver proved one.
    pub optimal_value: Option<f64>,
    pub best_score: f64,
}

/// Aggregate over all runs of one solver on one instance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SolverStats {
    pub instance: String,
    pub solver: String,
    pub runs: usize,
    pub best: f64,
    pub mean: f64,
    pub worst: f64,
    /// Population standard deviation of the run costs.
    pub std_dev: f64,
    /// Share of runs that matched the reference cost, in `[0, 1]`.
    pub success_rate: f64,
    pub mean_elapsed_ms: f64,
    /// Runs that stopped on a budget or an empty frontier.
    pub degraded_runs: usize,
}

/// All records of a benchmark sweep, in job order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BenchmarkReport {
    records: Vec<BenchmarkRecord>,
}

impl BenchmarkReport {
    pub fn new(records: Vec<BenchmarkRecord>) -> Self {
        Self { records }
    }

    pub fn records(&self) -> &[BenchmarkRecord] {
        &self.records
    }

    /// Instance names in first-seen order.
    pub fn instances(&self) -> Vec<&str> {
        distinct(self.records.iter().map(|r| r.instance.as_str()))
    }

    /// Solver names in first-seen order.
    pub fn solvers(&self) -> Vec<&str> {
        distinct(self.records.iter().map(|r| r.solver.as_str()))
    }

    /// Records of one solver on one instance.
    pub fn runs<'a, 'q>(
        &'a self,
        instance: &'q str,
        solver: &'q str,
    ) -> impl Iterator<Item = &'a BenchmarkRecord> + 'q
    where
        'a: 'q,
    {
        self.records
            .iter()
            .filter(move |r| r.instance == instance && r.solver == solver)
    }

    /// Cheapest run of `solver` on `instance`; the earliest run wins ties.
    pub fn best(&self, instance: &str, solver: &str) -> Option<&BenchmarkRecord> {
        self.runs(instance, solver)
            .fold(None, |best: Option<&BenchmarkRecord>, r| match best {
                Some(b) if b.cost <= r.cost => Some(b),
                _ => Some(r),
            })
    }

    /// Lowest cost any solver proved optimal on `instance`.
    pub fn proven_optimum(&self, instance: &str) -> Option<f64> {
        self.records
            .iter()
            .filter(|r| r.instance == instance && r.optimal)
            .map(|r| r.cost)
            .min_by(f64::total_cmp)
    }

    /// Proven optimum, or else the best cost any solver found.
    pub fn reference_cost(&self, instance: &str) -> Option<f64> {
        self.proven_optimum(instance).or_else(|| {
            self.records
                .iter()
                .filter(|r| r.instance == instance)
                .map(|r| r.cost)
                .min_by(f64::total_cmp)
        })
    }

    /// One row per run, in job order.
    pub fn comparison_rows(&self) -> Vec<ComparisonRow> {
        self.records
            .iter()
            .map(|r| ComparisonRow {
                algorithm: r.solver.clone(),
                instance: r.instance.clone(),
                start_value: r.initial_cost,
                optimal_value: self.proven_optimum(&r.instance),
                best_score: r.cost,
            })
            .collect()
    }

    /// Per (instance, solver) statistics in first-seen order.
    pub fn stats(&self) -> Vec<SolverStats> {
        let mut out = Vec::new();
        for instance in self.instances() {
            let reference = self.reference_cost(instance);
            for solver in self.solvers() {
                let runs: Vec<&BenchmarkRecord> = self.runs(instance, solver).collect();
                if runs.is_empty() {
                    continue;
                }
                let count = runs.len() as f64;
                let costs: Vec<f64> = runs.iter().map(|r| r.cost).collect();
                let mean = costs.iter().sum::<f64>() / count;
                let variance = costs.iter().map(|c| (c - mean).powi(2)).sum::<f64>() / count;
                let hits = reference.map_or(0, |best| {
                    costs.iter().filter(|&&c| matches_cost(c, best)).count()
                });
                out.push(SolverStats {
                    instance: instance.to_string(),
                    solver: solver.to_string(),
                    runs: runs.len(),
                    best: costs.iter().copied().fold(f64::INFINITY, f64::min),
                    mean,
                    worst: costs.iter().copied().fold(f64::NEG_INFINITY, f64::max),
                    std_dev: variance.sqrt(),
                    success_rate: hits as f64 / count,
                    mean_elapsed_ms: runs.iter().map(|r| r.elapsed_ms).sum::<f64>() / count,
                    degraded_runs: runs.iter().filter(|r| r.status.is_degraded()).count(),
                });
            }
        }
        out
    }

    /// Plain-text table of [`stats`](Self::stats), one block per instance.
    pub fn summary(&self) -> String {
        let mut report = String::new();
        let stats = self.stats();
        for instance in self.instances() {
            let reference = match self.proven_optimum(instance) {
                Some(opt) => format!("optimum {opt:.4}"),
                None => "no proven optimum".to_string(),
            };
            let _ = writeln!(report, "Instance {instance} ({reference})");
            let _ = writeln!(report, "{}", "-".repeat(88));
            let _ = writeln!(
                report,
                "{:<22} {:>5} {:>12} {:>12} {:>10} {:>9} {:>10}",
                "Solver", "Runs", "Best", "Mean", "Std", "Success", "Time ms"
            );
            let _ = writeln!(report, "{}", "-".repeat(88));
            for s in stats.iter().filter(|s| s.instance == instance) {
                let degraded = if s.degraded_runs > 0 {
                    format!(" ({} degraded)", s.degraded_runs)
                } else {
                    String::new()
                };
                let _ = writeln!(
                    report,
                    "{:<22} {:>5} {:>12.4} {:>12.4} {:>10.4} {:>8.1}% {:>10.2}{degraded}",
                    s.solver,
                    s.runs,
                    s.best,
                    s.mean,
                    s.std_dev,
                    s.success_rate * 100.0,
                    s.mean_elapsed_ms
                );
            }
            report.push('\n');
        }
        report
    }

    /// Writes [`comparison_rows`](Self::comparison_rows) as CSV with a
    /// header row.
    ///
    /// # Errors
    ///
    /// [`TspError::Csv`](crate::TspError::Csv) on write failure.
    pub fn write_csv_to<W: io::Write>(&self, writer: W) -> Result<()> {
        let mut writer = csv::Writer::from_writer(writer);
        for row in self.comparison_rows() {
            writer.serialize(row)?;
        }
        writer.flush()?;
        Ok(())
    }

    /// Writes the comparison CSV to a file, replacing it.
    pub fn write_csv<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let file = std::fs::File::create(path)?;
        self.write_csv_to(io::BufWriter::new(file))
    }
}

/// Reads comparison rows written by [`BenchmarkReport::write_csv_to`].
pub fn read_csv_from<R: io::Read>(reader: R) -> Result<Vec<ComparisonRow>> {
    let mut reader = csv::Reader::from_reader(reader);
    let mut rows = Vec::new();
    for row in reader.deserialize() {
        rows.push(row?);
    }
    Ok(rows)
}

/// Reads comparison rows from a file.
pub fn read_csv<P: AsRef<Path>>(path: P) -> Result<Vec<ComparisonRow>> {
    let file = std::fs::File::open(path)?;
    read_csv_from(io::BufReader::new(file))
}

fn matches_cost(cost: f64, reference: f64) -> bool {
    (cost - reference).abs() <= 1e-9 * reference.abs().max(1.0)
}

fn distinct<'a>(names: impl Iterator<Item = &'a str>) -> Vec<&'a str> {
    let mut out: Vec<&str> = Vec::new();
    for name in names {
        if !out.contains(&name) {
            out.push(name);
        }
    }
    out
}
