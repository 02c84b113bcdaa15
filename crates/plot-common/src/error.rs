//! Error taxonomy for the plotting pipeline.
//!
//! Every library crate has its own error enum; they all fold into
//! [`PlotError`] so the pipeline can report which stage failed.

use thiserror::Error;

/// Result type alias using PlotError.
pub type PlotResult<T> = Result<T, PlotError>;

/// Broad failure category of a [`PlotError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Configuration,
    Io,
    Selection,
    Rendering,
}

impl ErrorCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCategory::Configuration => "configuration",
            ErrorCategory::Io => "io",
            ErrorCategory::Selection => "selection",
            ErrorCategory::Rendering => "rendering",
        }
    }
}

/// Primary error type for plotting operations.
#[derive(Debug, Error)]
pub enum PlotError {
    // === Configuration Errors ===
    #[error("Unknown colormap: {0}")]
    UnknownColormap(String),

    #[error("Unknown projection type: {0}")]
    UnknownProjection(String),

    #[error("Invalid parameter value for '{param}': {message}")]
    InvalidParameter { param: String, message: String },

    // === I/O Errors ===
    #[error("Data file not found: {0}")]
    FileNotFound(String),

    #[error("Failed to read data: {0}")]
    DataReadError(String),

    #[error("Failed to write output: {0}")]
    WriteError(String),

    // === Selection Errors ===
    #[error("Selection failed: {0}")]
    SelectionError(String),

    // === Rendering Errors ===
    #[error("Rendering failed: {0}")]
    RenderError(String),

    #[error("Projection error: {0}")]
    ProjectionError(String),
}

impl PlotError {
    /// Category this error belongs to.
    pub fn category(&self) -> ErrorCategory {
        match self {
            PlotError::UnknownColormap(_)
            | PlotError::UnknownProjection(_)
            | PlotError::InvalidParameter { .. } => ErrorCategory::Configuration,

            PlotError::FileNotFound(_)
            | PlotError::DataReadError(_)
            | PlotError::WriteError(_) => ErrorCategory::Io,

            PlotError::SelectionError(_) => ErrorCategory::Selection,

            PlotError::RenderError(_) | PlotError::ProjectionError(_) => ErrorCategory::Rendering,
        }
    }

    /// Process exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self.category() {
            ErrorCategory::Configuration => 2,
            ErrorCategory::Io => 3,
            ErrorCategory::Selection => 4,
            ErrorCategory::Rendering => 5,
        }
    }

    pub fn invalid_parameter(param: impl Into<String>, message: impl Into<String>) -> Self {
        PlotError::InvalidParameter {
            param: param.into(),
            message: message.into(),
        }
    }
}

impl From<crate::selection::SelectionError> for PlotError {
    fn from(err: crate::selection::SelectionError) -> Self {
        PlotError::SelectionError(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_categories() {
        assert_eq!(
            PlotError::UnknownColormap("nope".into()).category(),
            ErrorCategory::Configuration
        );
        assert_eq!(
            PlotError::FileNotFound("a.nc".into()).category(),
            ErrorCategory::Io
        );
        assert_eq!(
            PlotError::SelectionError("empty".into()).category(),
            ErrorCategory::Selection
        );
        assert_eq!(
            PlotError::RenderError("boom".into()).category(),
            ErrorCategory::Rendering
        );
    }

    #[test]
    fn test_exit_codes_per_category() {
        assert_eq!(PlotError::invalid_parameter("canvas", "zero").exit_code(), 2);
        assert_eq!(PlotError::FileNotFound("a.nc".into()).exit_code(), 3);
        assert_eq!(PlotError::SelectionError("empty".into()).exit_code(), 4);
        assert_eq!(PlotError::ProjectionError("pole".into()).exit_code(), 5);
    }
}
