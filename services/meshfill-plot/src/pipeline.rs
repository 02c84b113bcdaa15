//! The mesh-fill pipeline: canvas, graphics method, data, render, export.

use std::path::PathBuf;

use netcdf_parser::{load_variable, GridVariable};
use plot_common::PlotResult;
use projection::Projection;
use renderer::{Canvas, Meshfill, RenderSummary};
use tracing::{debug, info};

use crate::config::{CanvasConfig, DataConfig, MeshfillConfig, PlotConfig};

/// Outcome of a successful run.
#[derive(Debug, Clone)]
pub struct PlotReport {
    pub output: PathBuf,
    pub width: u32,
    pub height: u32,
    pub summary: RenderSummary,
}

/// Create the canvas, applying explicit background dimensions when configured.
pub fn init_canvas(config: &CanvasConfig) -> PlotResult<Canvas> {
    let mut canvas = Canvas::new(&config.colormap)?;
    if let Some((width, height)) = config.dimensions() {
        canvas.set_background_dimensions(width, height)?;
    }
    debug!(
        width = canvas.width(),
        height = canvas.height(),
        colormap = %config.colormap,
        "Initialized canvas"
    );
    Ok(canvas)
}

/// Build a mesh-fill method from its configuration.
pub fn configure_meshfill(config: &MeshfillConfig) -> PlotResult<Meshfill> {
    let projection = Projection::from_code(config.projection)?;
    let mut method = Meshfill::new(format!("meshfill_proj_{}", config.projection));
    method.set_projection(projection);
    method.set_mesh(config.mesh);
    method.legend = config.legend;
    method.missing_color = config.missing_color;
    if let Some(levels) = &config.levels {
        method.set_levels(levels.clone())?;
    }
    if let Some(colors) = &config.fill_colors {
        method.set_fill_colors(colors.clone());
    }
    debug!(
        projection = %method.projection().kind(),
        mesh = method.mesh,
        "Configured graphics method"
    );
    Ok(method)
}

/// Read the configured variable. The file is closed before this returns.
pub fn load_data(config: &DataConfig) -> PlotResult<GridVariable> {
    let path = config.path();
    let data = load_variable(&path, &config.variable, &config.selections)?;
    let (nj, ni) = data.shape();
    info!(
        path = %path.display(),
        variable = %data.name,
        nj,
        ni,
        valid = data.valid_count(),
        "Loaded data"
    );
    Ok(data)
}

/// Run every stage and write the PNG.
pub fn run(config: &PlotConfig) -> PlotResult<PlotReport> {
    config.validate()?;

    let mut canvas = init_canvas(&config.canvas)?;
    let method = configure_meshfill(&config.meshfill)?;
    let data = load_data(&config.data)?;

    let summary = canvas.plot(&data, &method, config.canvas.background)?;
    canvas.png(&config.output.path)?;

    Ok(PlotReport {
        output: config.output.path.clone(),
        width: canvas.width(),
        height: canvas.height(),
        summary,
    })
}
