//! NetCDF reader for curvilinear climate model output.
//!
//! Reads a 2-D field together with its latitude/longitude coordinates and
//! cell bounds, and restricts it by typed coordinate ranges.
//!
//! # Grid conventions
//!
//! Coordinates are located through the CF `coordinates` attribute, the
//! variable's dimension names, or the conventional `lat`/`lon` names.
//! Cell corners come from the CF `bounds` attribute when present and are
//! derived from the centers otherwise. 1-D rectilinear axes are expanded to
//! the 2-D model.
//!
//! # Resource handling
//!
//! Prefer [`load_variable`] or [`with_dataset`]; both release the file
//! handle before returning, on success and on error.

pub mod error;
pub mod grid;
pub mod native;
pub mod variable;

pub use error::{NetCdfError, NetCdfResult};
pub use grid::CurvilinearGrid;
pub use native::{load_variable, silence_hdf5_errors, with_dataset, Dataset};
pub use variable::GridVariable;
