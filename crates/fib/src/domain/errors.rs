//! Domain-specific errors.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum BundleError {
    #[error("Output file path is required.")]
    MissingOutput,
    #[error("Directory '{0}' does not exist.")]
    MissingDirectory(PathBuf),
    #[error("failed to list directory '{path}': {source}")]
    Listing {
        path: PathBuf,
        #[source]
        source: ignore::Error,
    },
    #[error("invalid ignore glob '{pattern}': {source}")]
    InvalidGlob {
        pattern: String,
        #[source]
        source: globset::Error,
    },
    #[error("failed to read '{path}': {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to write '{path}': {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

#[derive(Debug, Error)]
pub enum ResponseError {
    #[error("input closed while waiting for {0}")]
    InputClosed(&'static str),
    #[error(transparent)]
    Io(#[from] io::Error),
}
