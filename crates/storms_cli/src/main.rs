pub mod compare;
pub mod histogram;
pub mod loader;
pub mod report;

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use std::fs::File;
use std::io::{self, BufWriter, IsTerminal};
use std::path::PathBuf;
use std::time::Instant;
use storms_core::{Simulation, SimulationConfig};
use tracing::{error, info};

use crate::report::RunReport;

#[derive(Parser)]
#[command(name = "energy-storms")]
#[command(about = "Simulates particle storms hitting a one-dimensional layer and reports the energy peak of each storm")]
struct Cli {
    #[command(flatten)]
    config: SimulationConfig,

    /// Emit logs as JSON lines
    #[arg(long)]
    log_json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the simulation and print the peak of every storm
    Run {
        /// Number of cells in the layer
        size: usize,
        /// Storm files, processed in order
        #[arg(required = true)]
        storms: Vec<PathBuf>,
        /// Write results as CSV, to the given file or stdout
        #[arg(long)]
        csv: Option<Option<PathBuf>>,
        /// Also write results as JSON to this file
        #[arg(long)]
        json: Option<PathBuf>,
        /// Print the final layer as a histogram (layers up to 35 cells)
        #[arg(long)]
        debug: bool,
    },
    /// Check that a parallel run reproduces the single-worker results
    Compare {
        /// Number of cells in the layer
        size: usize,
        /// Storm files, processed in order
        #[arg(required = true)]
        storms: Vec<PathBuf>,
    },
}

struct OutputOptions {
    csv: Option<Option<PathBuf>>,
    json: Option<PathBuf>,
    debug: bool,
}

fn run_simulation(
    size: usize,
    files: &[PathBuf],
    config: SimulationConfig,
    output: OutputOptions,
) -> anyhow::Result<()> {
    let storms = loader::read_storm_files(files)?;

    let start = Instant::now();
    let mut sim = Simulation::new(size, config)?;
    sim.run(storms);
    let elapsed = start.elapsed();

    info!(
        storms = sim.results().len(),
        duration_secs = elapsed.as_secs_f64(),
        "Simulation Complete"
    );

    if output.debug && output.csv.is_none() {
        let color = io::stdout().is_terminal();
        if let Some(plot) =
            histogram::render(&sim.layer_values(), &sim.positions(), &sim.maxima(), color)
        {
            print!("{}", plot);
        }
    }

    let report = RunReport::new(elapsed, sim.results());
    match &output.csv {
        Some(Some(path)) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create CSV file {}", path.display()))?;
            report.write_csv(BufWriter::new(file))?;
        }
        Some(None) => report.write_csv(io::stdout().lock())?,
        None => report.write_text(io::stdout().lock())?,
    }

    if let Some(path) = &output.json {
        let file = File::create(path)
            .with_context(|| format!("Failed to create JSON file {}", path.display()))?;
        report.write_json(BufWriter::new(file))?;
    }
    Ok(())
}

fn compare_workers(size: usize, files: &[PathBuf], config: SimulationConfig) -> anyhow::Result<()> {
    let storms = loader::read_storm_files(files)?;
    let comparisons = compare::compare_runs(size, &storms, &config)?;

    for c in &comparisons {
        println!(
            "{} {} {:.6} | {} {:.6} | {}",
            c.storm,
            c.sequential.position,
            c.sequential.energy,
            c.parallel.position,
            c.parallel.energy,
            if c.matches() { "ok" } else { "MISMATCH" }
        );
    }

    let mismatches = comparisons.iter().filter(|c| !c.matches()).count();
    if mismatches > 0 {
        bail!(
            "{} of {} storms differ between 1 and {} workers",
            mismatches,
            comparisons.len(),
            config.workers
        );
    }
    println!("Result match!");
    Ok(())
}

fn init_logging(json: bool) {
    let builder = tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_max_level(tracing::Level::INFO);
    if json {
        tracing::subscriber::set_global_default(builder.json().finish())
            .expect("setting default subscriber failed");
    } else {
        tracing::subscriber::set_global_default(builder.finish())
            .expect("setting default subscriber failed");
    }
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.log_json);

    // Configuration errors abort before any storm file is touched.
    if let Err(e) = cli.config.validate() {
        error!(error = %e, "Invalid configuration");
        std::process::exit(1);
    }

    info!(config = ?cli.config, "Starting energy storms");

    let result = match cli.command {
        Commands::Run {
            size,
            storms,
            csv,
            json,
            debug,
        } => run_simulation(size, &storms, cli.config, OutputOptions { csv, json, debug }),
        Commands::Compare { size, storms } => compare_workers(size, &storms, cli.config),
    };

    if let Err(e) = result {
        error!(error = %format!("{:#}", e), "Fatal Error");
        std::process::exit(1);
    }
}
