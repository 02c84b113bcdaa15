//! Image rendering for mesh-fill plots.
//!
//! - [`canvas`]: output surface, colormap and PNG export
//! - [`meshfill`]: the mesh-fill graphics method and its rasterizer
//! - [`levels`]: automatic level boundaries and fill color assignment
//! - [`colormap`]: named 256-entry colormaps
//! - [`png`]: indexed / RGBA PNG encoder

pub mod canvas;
pub mod colormap;
pub mod error;
pub mod levels;
pub mod meshfill;
pub mod png;

pub use canvas::{Canvas, DEFAULT_HEIGHT, DEFAULT_WIDTH};
pub use colormap::{Color, Colormap};
pub use error::{RenderError, RenderResult};
pub use meshfill::{Meshfill, RenderSummary};
