//! # Simulator
//!
//! Generates window sets of synthetic counter series, for exercising the delta aggregator.
//! Each series rises steadily, and may be afflicted by resets, spikes and sampling gaps.
//!
mod simulation;
mod simulation_elements;

use chrono::Utc;
use clap::Parser;
use miette::IntoDiagnostic;
use simulation::Simulation;
use std::path::PathBuf;
use tracing::{debug, info};
use trimmed_delta_common::{init_tracing, write_window_set};

/// [clap] derived struct to handle command line parameters.
#[derive(Debug, Parser)]
#[clap(author, version = trimmed_delta_common::VERSION, about)]
struct Cli {
    /// Path to the json simulation config file
    #[clap(long)]
    config: PathBuf,

    /// File to write the window set to, if not given the window set is written to stdout
    #[clap(long)]
    output: Option<PathBuf>,

    /// If set, the output is pretty-printed
    #[clap(long)]
    pretty: bool,

    /// Overrides the seed given in the config file
    #[clap(long)]
    seed: Option<u64>,
}

fn main() -> miette::Result<()> {
    let args = Cli::parse();

    init_tracing().into_diagnostic()?;
    debug!("{args:?}");

    let simulation = Simulation::load(&args.config).into_diagnostic()?;

    let seed = match args.seed {
        Some(seed) => seed,
        None => simulation
            .seed()
            .into_diagnostic()?
            .unwrap_or_else(|| Utc::now().timestamp_subsec_nanos() as u64),
    };
    info!("Using seed {seed}");

    let window_set = simulation.generate(seed).into_diagnostic()?;
    write_window_set(&window_set, args.output.as_deref(), args.pretty).into_diagnostic()?;
    Ok(())
}
