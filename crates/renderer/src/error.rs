//! Rendering error types.

use std::path::PathBuf;

use plot_common::PlotError;
use projection::ProjectionError;
use thiserror::Error;

pub type RenderResult<T> = Result<T, RenderError>;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("Unknown colormap '{name}' (available: {available})")]
    UnknownColormap { name: String, available: String },

    #[error("Invalid canvas size {width}x{height}: both dimensions must be positive")]
    InvalidCanvasSize { width: u32, height: u32 },

    #[error("Invalid levels: {0}")]
    InvalidLevels(String),

    #[error(transparent)]
    Projection(#[from] ProjectionError),

    /// No cell of the data could be projected onto the canvas
    #[error("Nothing to draw: {0}")]
    NothingToDraw(String),

    #[error("PNG encoding failed: {0}")]
    Encode(String),

    #[error("Failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl From<RenderError> for PlotError {
    fn from(err: RenderError) -> Self {
        match err {
            RenderError::UnknownColormap { name, .. } => PlotError::UnknownColormap(name),
            RenderError::InvalidCanvasSize { width, height } => PlotError::invalid_parameter(
                "canvas",
                format!("{}x{} must have positive width and height", width, height),
            ),
            RenderError::InvalidLevels(message) => PlotError::invalid_parameter("levels", message),
            RenderError::Projection(e) => e.into(),
            RenderError::Write { path, source } => {
                PlotError::WriteError(format!("{}: {}", path.display(), source))
            }
            other => PlotError::RenderError(other.to_string()),
        }
    }
}
