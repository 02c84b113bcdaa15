//! Error types for NetCDF parsing operations.

use std::path::PathBuf;

use plot_common::{PlotError, SelectionError};
use thiserror::Error;

/// Result type for NetCDF parser operations.
pub type NetCdfResult<T> = Result<T, NetCdfError>;

/// Error types for NetCDF parsing.
#[derive(Error, Debug)]
pub enum NetCdfError {
    /// Data file does not exist
    #[error("Data file not found: {}", .0.display())]
    NotFound(PathBuf),

    /// File I/O error
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// Missing required variable, dimension or attribute
    #[error("Missing required data: {0}")]
    MissingData(String),

    /// Invalid data format
    #[error("Invalid data format: {0}")]
    InvalidFormat(String),

    /// Coordinate selection matched nothing or was malformed
    #[error("Selection error: {0}")]
    Selection(#[from] SelectionError),
}

impl From<NetCdfError> for PlotError {
    fn from(err: NetCdfError) -> Self {
        match err {
            NetCdfError::NotFound(path) => PlotError::FileNotFound(path.display().to_string()),
            NetCdfError::Selection(e) => PlotError::SelectionError(e.to_string()),
            other => PlotError::DataReadError(other.to_string()),
        }
    }
}
