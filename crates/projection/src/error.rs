//! Projection error types.

use plot_common::PlotError;
use thiserror::Error;

pub type ProjectionResult<T> = Result<T, ProjectionError>;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ProjectionError {
    /// Type code or name with no registered projection
    #[error("Unknown projection type: {0}")]
    UnknownType(String),

    #[error("Invalid projection parameter '{param}': {message}")]
    InvalidParameter {
        param: &'static str,
        message: String,
    },

    /// The projection needs a hemisphere and the data has no finite latitudes
    #[error("Cannot infer hemisphere for {0} projection: no finite latitudes")]
    NoHemisphere(&'static str),
}

impl From<ProjectionError> for PlotError {
    fn from(err: ProjectionError) -> Self {
        match err {
            ProjectionError::UnknownType(code) => PlotError::UnknownProjection(code),
            ProjectionError::InvalidParameter { param, message } => {
                PlotError::invalid_parameter(param, message)
            }
            other => PlotError::ProjectionError(other.to_string()),
        }
    }
}
