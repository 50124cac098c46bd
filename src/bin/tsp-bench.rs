//! Runs every solver on a TSP instance and prints a comparison table.

use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, ValueEnum};
use env_logger::{fmt::Formatter, Builder, Target};
use log::{error, info, LevelFilter};
use tsp_search::benchmark::{standard_solvers, BenchmarkConfig, BenchmarkRunner};
use tsp_search::matrix::random_coords;
use tsp_search::random::create_rng;
use tsp_search::DistanceMatrix;

/// Coordinates of the ten-city lab instance.
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

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Instance {
    /// Four-city lab matrix (optimum 80).
    Lab4,
    /// Ten planar lab cities.
    Lab10,
    /// Uniform random cities in the unit square.
    Random,
}

#[derive(Debug, Parser)]
#[command(name = "tsp-bench", version, about = "Compare TSP search strategies")]
struct Cli {
    #[arg(long, value_enum, default_value_t = Instance::Lab4)]
    instance: Instance,

    /// City count for `--instance random`.
    #[arg(long, default_value_t = 10)]
    cities: usize,

    /// Base seed; run `r` uses `seed + r`.
    #[arg(long, default_value_t = 0)]
    seed: u64,

    #[arg(long, default_value_t = 5)]
    runs: usize,

    #[arg(long, default_value_t = 3)]
    beam_width: usize,

    /// Run jobs on one thread.
    #[arg(long)]
    sequential: bool,

    /// Also write per-run comparison rows to this CSV file.
    #[arg(long)]
    csv: Option<PathBuf>,

    /// More log output (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn init_logger(verbose: u8) -> io::Result<()> {
    let level = match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    let mut builder = Builder::new();
    builder
        .filter_level(level)
        .parse_default_env()
        .target(Target::Stderr)
        .format(|buf: &mut Formatter, record| {
            writeln!(
                buf,
                "{} {:<5} [{}] {}",
                buf.timestamp_millis(),
                record.level(),
                record.target(),
                record.args()
            )
        });
    builder.try_init().map_err(io::Error::other)
}

fn build_instance(cli: &Cli) -> tsp_search::Result<(String, DistanceMatrix)> {
    Ok(match cli.instance {
        Instance::Lab4 => (
            "lab4".to_string(),
            DistanceMatrix::from_rows(vec![
                vec![0.0, 10.0, 15.0, 20.0],
                vec![10.0, 0.0, 35.0, 25.0],
                vec![15.0, 35.0, 0.0, 30.0],
                vec![20.0, 25.0, 30.0, 0.0],
            ])?,
        ),
        Instance::Lab10 => ("lab10".to_string(), DistanceMatrix::from_coords(&LAB10)),
        Instance::Random => {
            let mut rng = create_rng(cli.seed);
            let coords = random_coords(cli.cities, &mut rng);
            (
                format!("random{}", cli.cities),
                DistanceMatrix::from_coords(&coords),
            )
        }
    })
}

fn run(cli: &Cli) -> tsp_search::Result<()> {
    let (name, matrix) = build_instance(cli)?;
    info!("instance {name} with {} locations", matrix.len());

    let config = BenchmarkConfig::default()
        .with_runs(cli.runs)
        .with_base_seed(cli.seed)
        .with_parallel(!cli.sequential);
    let mut runner = BenchmarkRunner::new(config);
    runner.add_instance(name, matrix);
    for solver in standard_solvers(cli.beam_width) {
        runner.add_solver(solver);
    }

    let report = runner.run()?;
    print!("{}", report.summary());

    if let Some(path) = &cli.csv {
        report.write_csv(path)?;
        info!("wrote {} rows to {}", report.records().len(), path.display());
    }
    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    if let Err(e) = init_logger(cli.verbose) {
        eprintln!("failed to initialise logging: {e}");
    }
    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}
