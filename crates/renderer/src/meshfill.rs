//! Mesh-fill graphics method.
//!
//! Every grid cell is drawn as the polygon spanned by its corners, filled
//! with the color of the level interval holding the cell's value. With
//! `mesh` enabled the cell outlines are stroked on top.
//!
//! Page layout (fractions of the canvas):
//! - data area: x in `[0.06, 0.94]`, y in `[0.06, 0.80]`
//! - legend: x in `[0.10, 0.90]`, y in `[0.86, 0.91]`

use netcdf_parser::GridVariable;
use plot_common::{unwrap_longitude, BoundingBox};
use projection::{MapProjection, Projection, ProjectionType};
use tiny_skia::{FillRule, Paint, PathBuilder, Rect, Stroke, Transform};
use tracing::debug;

use crate::canvas::Canvas;
use crate::colormap::{Color, Colormap};
use crate::error::{RenderError, RenderResult};
use crate::levels::{
    interval_index, nice_levels, spread_fill_colors, validate_levels, DEFAULT_INTERVALS,
};

/// Colormap index used for cells with a missing value.
pub const DEFAULT_MISSING_INDEX: u8 = 241;

const DATA_AREA: (f64, f64, f64, f64) = (0.06, 0.06, 0.94, 0.80);
const LEGEND_AREA: (f64, f64, f64, f64) = (0.10, 0.86, 0.90, 0.91);

/// Mesh-fill configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct Meshfill {
    pub name: String,
    projection: Projection,
    /// Stroke cell outlines
    pub mesh: bool,
    levels: Option<Vec<f64>>,
    fill_colors: Option<Vec<u8>>,
    pub missing_color: u8,
    pub mesh_color: Color,
    pub mesh_width: f32,
    pub legend: bool,
}

impl Default for Meshfill {
    fn default() -> Self {
        Self {
            name: "default".to_string(),
            projection: Projection::default(),
            mesh: false,
            levels: None,
            fill_colors: None,
            missing_color: DEFAULT_MISSING_INDEX,
            mesh_color: Color::BLACK,
            mesh_width: 1.0,
            legend: true,
        }
    }
}

impl Meshfill {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn projection(&self) -> &Projection {
        &self.projection
    }

    pub fn set_projection(&mut self, projection: Projection) {
        self.projection = projection;
    }

    pub fn set_mesh(&mut self, mesh: bool) {
        self.mesh = mesh;
    }

    pub fn levels(&self) -> Option<&[f64]> {
        self.levels.as_deref()
    }

    /// Use explicit level boundaries instead of automatic ones.
    pub fn set_levels(&mut self, levels: Vec<f64>) -> RenderResult<()> {
        validate_levels(&levels)?;
        self.levels = Some(levels);
        Ok(())
    }

    /// Colormap indices per level interval. Must match the interval count at render.
    pub fn set_fill_colors(&mut self, colors: Vec<u8>) {
        self.fill_colors = Some(colors);
    }

    /// Levels for `data`: the explicit ones, or nice levels over its range.
    pub fn resolve_levels(&self, data: &GridVariable) -> Vec<f64> {
        match &self.levels {
            Some(levels) => levels.clone(),
            None => match data.value_range() {
                Some((min, max)) => nice_levels(min, max, DEFAULT_INTERVALS),
                None => vec![0.0, 1.0],
            },
        }
    }

    fn resolve_fill_colors(&self, intervals: usize) -> RenderResult<Vec<u8>> {
        match &self.fill_colors {
            Some(colors) if colors.len() == intervals => Ok(colors.clone()),
            Some(colors) => Err(RenderError::InvalidLevels(format!(
                "{} fill colors for {} level intervals",
                colors.len(),
                intervals
            ))),
            None => Ok(spread_fill_colors(intervals)),
        }
    }
}

/// What a render call drew.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderSummary {
    pub projection: ProjectionType,
    pub levels: Vec<f64>,
    pub cells_drawn: usize,
    /// Cells with a corner the projection could not map
    pub cells_skipped: usize,
    /// Drawn cells with a missing value
    pub cells_missing: usize,
    /// Projected extent of the drawn cells
    pub extent: BoundingBox,
}

struct ProjectedCell {
    value: f64,
    points: Vec<(f64, f64)>,
}

/// Mean latitude of cells holding data, falling back to every cell.
fn data_mean_latitude(data: &GridVariable) -> Option<f64> {
    let (sum, count) = data
        .values
        .iter()
        .zip(data.grid.latitudes())
        .filter(|(v, lat)| v.is_finite() && lat.is_finite())
        .fold((0.0, 0usize), |(s, c), (_, lat)| (s + lat, c + 1));
    if count > 0 {
        Some(sum / count as f64)
    } else {
        data.grid.mean_latitude()
    }
}

fn project_cells<P: MapProjection>(
    data: &GridVariable,
    projector: &P,
) -> (Vec<ProjectedCell>, usize) {
    let cylindrical = projector.is_cylindrical();
    let lon0 = projector.central_longitude();
    let mut cells = Vec::with_capacity(data.values.len());
    let mut skipped = 0;

    for (idx, &value) in data.values.iter().enumerate() {
        let mut reference = None;
        let points: Option<Vec<(f64, f64)>> = data
            .grid
            .cell_corners(idx)
            .map(|(lat, lon)| {
                let lon = if cylindrical {
                    // First corner goes into the map's frame, the rest follow it.
                    let r = *reference.get_or_insert_with(|| unwrap_longitude(lon, lon0));
                    unwrap_longitude(lon, r)
                } else {
                    lon
                };
                projector.forward(lat, lon)
            })
            .collect();
        match points {
            Some(points) => cells.push(ProjectedCell { value, points }),
            None => skipped += 1,
        }
    }
    (cells, skipped)
}

fn area(width: u32, height: u32, fractions: (f64, f64, f64, f64)) -> BoundingBox {
    let (w, h) = (width as f64, height as f64);
    BoundingBox::new(
        fractions.0 * w,
        fractions.1 * h,
        fractions.2 * w,
        fractions.3 * h,
    )
}

fn solid_paint(color: Color) -> Paint<'static> {
    let mut paint = Paint::default();
    paint.set_color_rgba8(color.r, color.g, color.b, color.a);
    paint.anti_alias = false;
    paint
}

/// Draw `data` onto `canvas` with `method`.
pub fn render(
    canvas: &mut Canvas,
    data: &GridVariable,
    method: &Meshfill,
) -> RenderResult<RenderSummary> {
    let projector = method.projection().resolve(data_mean_latitude(data))?;
    let (cells, skipped) = project_cells(data, &projector);

    let extent = BoundingBox::from_points(cells.iter().flat_map(|c| c.points.iter().copied()))
        .ok_or_else(|| {
            RenderError::NothingToDraw(format!(
                "none of the {} cells of {} project under {}",
                data.values.len(),
                data.name,
                method.projection().kind()
            ))
        })?;

    let (width, height) = canvas.dimensions();
    let data_area = area(width, height, DATA_AREA);
    let (scale, offset_x, offset_y) = extent.fit_into(&data_area).ok_or_else(|| {
        RenderError::NothingToDraw(format!("projected extent {:?} cannot be scaled", extent))
    })?;
    let to_pixel = |(x, y): (f64, f64)| {
        (
            (offset_x + (x - extent.min_x) * scale) as f32,
            (offset_y + (extent.max_y - y) * scale) as f32,
        )
    };

    let levels = method.resolve_levels(data);
    validate_levels(&levels)?;
    let fill_colors = method.resolve_fill_colors(levels.len() - 1)?;
    debug!(
        levels = levels.len(),
        min = levels[0],
        max = levels[levels.len() - 1],
        scale,
        "Resolved mesh-fill layout"
    );

    let colormap = canvas.colormap().clone();
    let missing = colormap.color(method.missing_color);
    let mesh_paint = solid_paint(method.mesh_color);
    let stroke = Stroke {
        width: method.mesh_width,
        ..Stroke::default()
    };

    let pixmap = canvas.pixmap_mut();
    let mut cells_missing = 0;
    let mut outlines = Vec::new();

    for cell in &cells {
        let mut pb = PathBuilder::new();
        for (k, &point) in cell.points.iter().enumerate() {
            let (px, py) = to_pixel(point);
            if k == 0 {
                pb.move_to(px, py);
            } else {
                pb.line_to(px, py);
            }
        }
        pb.close();
        let Some(path) = pb.finish() else {
            continue;
        };

        let color = match interval_index(&levels, cell.value) {
            Some(k) => colormap.color(fill_colors[k]),
            None => {
                cells_missing += 1;
                missing
            }
        };
        pixmap.fill_path(
            &path,
            &solid_paint(color),
            FillRule::Winding,
            Transform::identity(),
            None,
        );

        if method.mesh {
            outlines.push(path);
        }
    }

    // Outlines go on after every fill so neighbours cannot paint over them.
    for path in &outlines {
        pixmap.stroke_path(path, &mesh_paint, &stroke, Transform::identity(), None);
    }

    if method.legend {
        draw_legend(pixmap, width, height, &colormap, &fill_colors, &mesh_paint);
    }

    Ok(RenderSummary {
        projection: method.projection().kind(),
        levels,
        cells_drawn: cells.len(),
        cells_skipped: skipped,
        cells_missing,
        extent,
    })
}

/// Horizontal color bar with one box per level interval.
fn draw_legend(
    pixmap: &mut tiny_skia::Pixmap,
    width: u32,
    height: u32,
    colormap: &Colormap,
    fill_colors: &[u8],
    outline: &Paint,
) {
    if fill_colors.is_empty() {
        return;
    }
    let bar = area(width, height, LEGEND_AREA);
    let box_width = bar.width() / fill_colors.len() as f64;
    let stroke = Stroke::default();

    for (k, &index) in fill_colors.iter().enumerate() {
        let x = bar.min_x + k as f64 * box_width;
        let Some(rect) = Rect::from_xywh(
            x as f32,
            bar.min_y as f32,
            box_width as f32,
            bar.height() as f32,
        ) else {
            continue;
        };
        pixmap.fill_rect(rect, &solid_paint(colormap.color(index)), Transform::identity(), None);
        let outline_path = PathBuilder::from_rect(rect);
        pixmap.stroke_path(&outline_path, outline, &stroke, Transform::identity(), None);
    }
}
