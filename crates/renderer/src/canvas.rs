//! Plotting canvas: output size, colormap and the RGBA pixel buffer.

use std::path::Path;

use netcdf_parser::GridVariable;
use tracing::{debug, info, warn};

use crate::colormap::{Color, Colormap};
use crate::error::{RenderError, RenderResult};
use crate::meshfill::{self, Meshfill, RenderSummary};
use crate::png::create_png_auto;

/// Canvas width when no background dimensions are set.
pub const DEFAULT_WIDTH: u32 = 814;
/// Canvas height when no background dimensions are set.
pub const DEFAULT_HEIGHT: u32 = 606;

/// A mutable rendering surface.
///
/// There is no interactive window; the background flag passed to
/// [`Canvas::plot`] is recorded for callers and logs.
pub struct Canvas {
    width: u32,
    height: u32,
    colormap: Colormap,
    background: bool,
    pixmap: tiny_skia::Pixmap,
    plots: usize,
}

impl std::fmt::Debug for Canvas {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Canvas")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("colormap", &self.colormap.name())
            .field("background", &self.background)
            .field("plots", &self.plots)
            .finish()
    }
}

fn new_pixmap(width: u32, height: u32) -> RenderResult<tiny_skia::Pixmap> {
    let mut pixmap = tiny_skia::Pixmap::new(width, height)
        .ok_or(RenderError::InvalidCanvasSize { width, height })?;
    pixmap.fill(Color::WHITE.to_skia());
    Ok(pixmap)
}

impl Canvas {
    /// Canvas of the default size using the named colormap.
    pub fn new(colormap: &str) -> RenderResult<Self> {
        Self::with_dimensions(DEFAULT_WIDTH, DEFAULT_HEIGHT, colormap)
    }

    pub fn with_dimensions(width: u32, height: u32, colormap: &str) -> RenderResult<Self> {
        let colormap = Colormap::named(colormap)?;
        let pixmap = new_pixmap(width, height)?;
        debug!(width, height, colormap = %colormap.name(), "Created canvas");
        Ok(Self {
            width,
            height,
            colormap,
            background: false,
            pixmap,
            plots: 0,
        })
    }

    /// Change the output size. Anything already drawn is discarded.
    pub fn set_background_dimensions(&mut self, width: u32, height: u32) -> RenderResult<()> {
        let pixmap = new_pixmap(width, height)?;
        if self.plots > 0 {
            warn!(
                plots = self.plots,
                "Resizing canvas after plotting; existing drawing is discarded"
            );
        }
        self.pixmap = pixmap;
        self.width = width;
        self.height = height;
        self.plots = 0;
        Ok(())
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn colormap(&self) -> &Colormap {
        &self.colormap
    }

    /// Whether the last plot was drawn in background mode.
    pub fn is_background(&self) -> bool {
        self.background
    }

    /// Number of plots drawn since the canvas was created or resized.
    pub fn plot_count(&self) -> usize {
        self.plots
    }

    pub(crate) fn pixmap_mut(&mut self) -> &mut tiny_skia::Pixmap {
        &mut self.pixmap
    }

    /// Draw `data` with the mesh-fill `method`.
    pub fn plot(
        &mut self,
        data: &GridVariable,
        method: &Meshfill,
        background: bool,
    ) -> RenderResult<RenderSummary> {
        self.background = background;
        let summary = meshfill::render(self, data, method)?;
        self.plots += 1;
        info!(
            variable = %data.name,
            method = %method.name,
            projection = %summary.projection,
            cells = summary.cells_drawn,
            skipped = summary.cells_skipped,
            missing = summary.cells_missing,
            background,
            "Plotted mesh-fill"
        );
        Ok(summary)
    }

    /// Straight (non-premultiplied) RGBA bytes, row-major.
    pub fn rgba_pixels(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.width as usize * self.height as usize * 4);
        for pixel in self.pixmap.pixels() {
            let c = pixel.demultiply();
            out.extend_from_slice(&[c.red(), c.green(), c.blue(), c.alpha()]);
        }
        out
    }

    /// RGBA at `(x, y)`, or `None` outside the canvas.
    pub fn pixel(&self, x: u32, y: u32) -> Option<Color> {
        let c = self.pixmap.pixel(x, y)?.demultiply();
        Some(Color::new(c.red(), c.green(), c.blue(), c.alpha()))
    }

    /// Encode the current contents as PNG.
    pub fn encode_png(&self) -> RenderResult<Vec<u8>> {
        create_png_auto(
            &self.rgba_pixels(),
            self.width as usize,
            self.height as usize,
        )
        .map_err(RenderError::Encode)
    }

    /// Write the current contents as PNG to `path`, replacing any existing file.
    pub fn png<P: AsRef<Path>>(&self, path: P) -> RenderResult<()> {
        let path = path.as_ref();
        let bytes = self.encode_png()?;
        std::fs::write(path, &bytes).map_err(|source| RenderError::Write {
            path: path.to_path_buf(),
            source,
        })?;
        info!(
            path = %path.display(),
            width = self.width,
            height = self.height,
            bytes = bytes.len(),
            "Wrote PNG"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_dimensions() {
        let canvas = Canvas::new("rainbow").unwrap();
        assert_eq!(canvas.dimensions(), (DEFAULT_WIDTH, DEFAULT_HEIGHT));
        assert_eq!(canvas.colormap().name(), "rainbow");
        assert!(!canvas.is_background());
    }

    #[test]
    fn test_zero_size_rejected() {
        assert!(matches!(
            Canvas::with_dimensions(0, 10, "rainbow"),
            Err(RenderError::InvalidCanvasSize { width: 0, height: 10 })
        ));
        let mut canvas = Canvas::new("rainbow").unwrap();
        assert!(canvas.set_background_dimensions(10, 0).is_err());
        assert_eq!(canvas.dimensions(), (DEFAULT_WIDTH, DEFAULT_HEIGHT));
    }

    #[test]
    fn test_set_background_dimensions() {
        let mut canvas = Canvas::new("rainbow").unwrap();
        canvas.set_background_dimensions(1200, 1091).unwrap();
        assert_eq!(canvas.dimensions(), (1200, 1091));
        assert_eq!(canvas.rgba_pixels().len(), 1200 * 1091 * 4);
    }

    #[test]
    fn test_starts_white() {
        let canvas = Canvas::with_dimensions(4, 3, "default").unwrap();
        assert_eq!(canvas.pixel(3, 2), Some(Color::WHITE));
        assert_eq!(canvas.pixel(4, 0), None);
    }

    #[test]
    fn test_unknown_colormap() {
        assert!(matches!(
            Canvas::new("nope"),
            Err(RenderError::UnknownColormap { .. })
        ));
    }
}
