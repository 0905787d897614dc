//! Reads and writes [WindowSet] documents from files or the standard streams.
use crate::WindowSet;
use std::{
    fs::File,
    io::{self, BufReader, BufWriter, Read, Write},
    path::{Path, PathBuf},
};
use thiserror::Error;
use tracing::{debug, instrument};

#[derive(Debug, Error)]
pub enum SchemaIoError {
    #[error("Cannot open {0}: {1}")]
    Open(PathBuf, io::Error),
    #[error("Cannot create {0}: {1}")]
    Create(PathBuf, io::Error),
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error("Invalid window set: {0}")]
    Json(#[from] serde_json::Error),
}

/// Reads a window set from the given file, or from stdin if no path is given.
#[instrument(skip_all, level = "debug", err(level = "error"))]
pub fn read_window_set(path: Option<&Path>) -> Result<WindowSet, SchemaIoError> {
    let set: WindowSet = match path {
        Some(path) => {
            let file = File::open(path).map_err(|e| SchemaIoError::Open(path.to_owned(), e))?;
            serde_json::from_reader(BufReader::new(file))?
        }
        None => {
            let mut buffer = String::new();
            io::stdin().lock().read_to_string(&mut buffer)?;
            serde_json::from_str(&buffer)?
        }
    };
    debug!("Read {} windows", set.windows.len());
    Ok(set)
}

/// Writes a window set to the given file, or to stdout if no path is given.
#[instrument(skip_all, level = "debug", err(level = "error"))]
pub fn write_window_set(
    set: &WindowSet,
    path: Option<&Path>,
    pretty: bool,
) -> Result<(), SchemaIoError> {
    match path {
        Some(path) => {
            let file = File::create(path).map_err(|e| SchemaIoError::Create(path.to_owned(), e))?;
            write_to(set, BufWriter::new(file), pretty)
        }
        None => write_to(set, io::stdout().lock(), pretty),
    }
}

fn write_to<W: Write>(set: &WindowSet, mut writer: W, pretty: bool) -> Result<(), SchemaIoError> {
    if pretty {
        serde_json::to_writer_pretty(&mut writer, set)?;
    } else {
        serde_json::to_writer(&mut writer, set)?;
    }
    writeln!(writer)?;
    writer.flush()?;
    Ok(())
}
