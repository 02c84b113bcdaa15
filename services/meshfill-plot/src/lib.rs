//! Render curvilinear NetCDF fields as mesh-fill PNG plots.
//!
//! The library half of the `meshfill-plot` binary: configuration loading and
//! the staged pipeline, exposed so integration tests can drive it directly.

pub mod config;
pub mod pipeline;

pub use config::{PlotConfig, Scenario};
pub use pipeline::{run, PlotReport};
