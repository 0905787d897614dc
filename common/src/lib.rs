//! Types and helpers shared by the components of the trimmed delta pipeline.
pub mod io;
pub mod metrics;
pub mod schema;

use const_format::concatcp;
use thiserror::Error;
use tracing_subscriber::EnvFilter;

pub use io::{SchemaIoError, read_window_set, write_window_set};
pub use schema::{GroupType, SampleRecord, SampleValue, WindowRecord, WindowSet};

/// Sample timestamps, usually milliseconds since the epoch.
pub type Timestamp = i64;

/// Sample values once converted to floating point.
pub type Real = f64;

/// Version string reported by each component's `--version` flag.
pub const VERSION: &str = concatcp!(
    env!("CARGO_PKG_VERSION"),
    " (",
    git_version::git_version!(args = ["--always", "--dirty=-modified"], fallback = "unknown"),
    ")"
);

#[derive(Debug, Error)]
pub enum TracingInitError {
    #[error("Cannot install tracing subscriber: {0}")]
    Install(String),
}

/// Installs the standard tracing subscriber, writing to stderr so that stdout is left free for output.
///
/// The filter is taken from `RUST_LOG`, and defaults to `info` when unset or invalid.
pub fn init_tracing() -> Result<(), TracingInitError> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| TracingInitError::Install(e.to_string()))
}
