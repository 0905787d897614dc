//! # Delta Aggregator
//!
//! The Delta Aggregator component performs the following functions:
//! * Reads a window set, either from a file or from stdin.
//! * Dispatches each numeric window to the trimmed delta transform, skipping windows of other group types.
//! * Writes the deltas of each window as a new window set, either to a file or to stdout.
//! * Optionally writes the run's metrics to a file, in Prometheus text format.
//!
mod parameters;
mod trimmed_delta;
mod windows;

use clap::Parser;
use metrics::describe_counter;
use metrics_exporter_prometheus::PrometheusBuilder;
use miette::IntoDiagnostic;
use parameters::TrimParameters;
use std::{fs, path::PathBuf};
use tracing::{debug, info};
use trimmed_delta_common::{
    init_tracing,
    metrics::names::{
        GAP_RESETS, SAMPLES_READ, SAMPLES_REJECTED, WINDOWS_SKIPPED, WINDOWS_TRANSFORMED,
    },
    read_window_set, write_window_set,
};

/// [clap] derived struct to handle command line parameters.
#[derive(Debug, Parser)]
#[clap(author, version = trimmed_delta_common::VERSION, about)]
struct Cli {
    /// The window set to read, if not given the window set is read from stdin
    #[clap(long)]
    input: Option<PathBuf>,

    /// File to write the deltas to, if not given the deltas are written to stdout
    #[clap(long)]
    output: Option<PathBuf>,

    /// If set, the output is pretty-printed
    #[clap(long)]
    pretty: bool,

    /// File to write metrics to once the run completes, in Prometheus text format
    #[clap(long)]
    metrics_output: Option<PathBuf>,

    #[clap(flatten)]
    trim_parameters: TrimParameters,
}

fn describe_metrics() {
    describe_counter!(
        WINDOWS_TRANSFORMED,
        metrics::Unit::Count,
        "Number of windows transformed into deltas"
    );
    describe_counter!(
        WINDOWS_SKIPPED,
        metrics::Unit::Count,
        "Number of windows skipped, by reason"
    );
    describe_counter!(
        SAMPLES_READ,
        metrics::Unit::Count,
        "Number of samples read from transformed windows"
    );
    describe_counter!(
        SAMPLES_REJECTED,
        metrics::Unit::Count,
        "Number of samples rejected as resets or spikes"
    );
    describe_counter!(
        GAP_RESETS,
        metrics::Unit::Count,
        "Number of deltas zeroed because of the gap preceding them"
    );
}

fn main() -> miette::Result<()> {
    let args = Cli::parse();

    init_tracing().into_diagnostic()?;
    debug!("{args:?}");

    let thresholds = args.trim_parameters.thresholds().into_diagnostic()?;

    // Install recorder and register metrics
    let metrics_handle = args
        .metrics_output
        .as_ref()
        .map(|_| PrometheusBuilder::new().install_recorder())
        .transpose()
        .into_diagnostic()?;
    describe_metrics();

    let input = read_window_set(args.input.as_deref()).into_diagnostic()?;
    let output = windows::transform_windows(&input, &thresholds);
    write_window_set(&output, args.output.as_deref(), args.pretty).into_diagnostic()?;

    info!(
        "Wrote {} deltas",
        output
            .windows
            .iter()
            .map(|window| window.samples.len())
            .sum::<usize>()
    );

    if let (Some(handle), Some(path)) = (metrics_handle, args.metrics_output.as_deref()) {
        fs::write(path, handle.render()).into_diagnostic()?;
    }
    Ok(())
}
