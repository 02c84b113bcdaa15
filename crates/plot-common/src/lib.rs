//! Common types shared across the meshfill workspace.

pub mod bbox;
pub mod error;
pub mod selection;

pub use bbox::BoundingBox;
pub use error::{ErrorCategory, PlotError, PlotResult};
pub use selection::{unwrap_longitude, Axis, CoordinateRange, SelectionError};
