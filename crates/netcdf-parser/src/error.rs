//! Error types for reading profiler day files.

use std::path::PathBuf;

use thiserror::Error;

/// Result type for NetCDF parser operations.
pub type NetCdfResult<T> = Result<T, NetCdfError>;

/// Error types for NetCDF parsing.
#[derive(Error, Debug)]
pub enum NetCdfError {
    /// File I/O error
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// The file exists but the NetCDF library refused to open it
    #[error("Failed to open {path}: {message}")]
    OpenFailed { path: PathBuf, message: String },

    /// Missing required dimension, variable or attribute
    #[error("Missing required data: {0}")]
    MissingData(String),

    /// Invalid data format
    #[error("Invalid data format: {0}")]
    InvalidFormat(String),
}

impl NetCdfError {
    /// True when the file could not be opened at all, as opposed to being
    /// opened and found to be malformed.
    pub fn is_open_failure(&self) -> bool {
        matches!(self, NetCdfError::OpenFailed { .. } | NetCdfError::IoError(_))
    }
}
