//! SVG to PNG rasterisation with resvg.

use tracing::debug;

use crate::error::{RenderError, RenderResult};
use crate::figure::Figure;
use crate::png::create_png_auto;

/// Both artifacts of one figure.
#[derive(Debug, Clone)]
pub struct RenderedFigure {
    pub svg: String,
    pub png: Vec<u8>,
}

/// Straight-alpha RGBA pixels.
#[derive(Debug, Clone, PartialEq)]
pub struct RasterImage {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<u8>,
}

impl RasterImage {
    /// RGBA at `(x, y)`, if inside the image.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = (y as usize * self.width as usize + x as usize) * 4;
        self.pixels.get(i..i + 4).map(|p| [p[0], p[1], p[2], p[3]])
    }

    pub fn to_png(&self) -> RenderResult<Vec<u8>> {
        create_png_auto(&self.pixels, self.width as usize, self.height as usize)
    }
}

/// Parses and renders SVG documents. System fonts are loaded once, when the
/// rasteriser is built, and reused for every figure.
pub struct Rasterizer {
    options: usvg::Options<'static>,
}

impl Default for Rasterizer {
    fn default() -> Self {
        Self::new()
    }
}

impl Rasterizer {
    pub fn new() -> Self {
        let mut options = usvg::Options::default();
        options.fontdb_mut().load_system_fonts();
        debug!(faces = options.fontdb.len(), "Loaded system fonts");
        Self { options }
    }

    /// A rasteriser with no fonts loaded; text is dropped.
    pub fn without_fonts() -> Self {
        Self {
            options: usvg::Options::default(),
        }
    }

    pub fn font_count(&self) -> usize {
        self.options.fontdb.len()
    }

    /// Render `svg` at its declared size.
    pub fn rasterize(&self, svg: &str) -> RenderResult<RasterImage> {
        let tree = usvg::Tree::from_str(svg, &self.options)
            .map_err(|e| RenderError::Svg(e.to_string()))?;

        let size = tree.size().to_int_size();
        let (width, height) = (size.width(), size.height());
        let mut pixmap = tiny_skia::Pixmap::new(width, height)
            .ok_or_else(|| RenderError::Raster(format!("cannot allocate {}x{} canvas", width, height)))?;

        resvg::render(&tree, tiny_skia::Transform::identity(), &mut pixmap.as_mut());

        // tiny-skia stores premultiplied alpha; PNG wants straight alpha.
        let pixels = pixmap
            .pixels()
            .iter()
            .flat_map(|px| {
                let c = px.demultiply();
                [c.red(), c.green(), c.blue(), c.alpha()]
            })
            .collect();

        Ok(RasterImage {
            width,
            height,
            pixels,
        })
    }

    /// Render `svg` and encode it as PNG.
    pub fn render_png(&self, svg: &str) -> RenderResult<Vec<u8>> {
        let image = self.rasterize(svg)?;
        let png = image.to_png()?;
        debug!(
            width = image.width,
            height = image.height,
            bytes = png.len(),
            "Rasterised figure"
        );
        Ok(png)
    }

    /// Compose `figure` and rasterise it.
    pub fn render_figure(&self, figure: &Figure<'_>) -> RenderResult<RenderedFigure> {
        let svg = figure.to_svg()?;
        let png = self.render_png(&svg)?;
        Ok(RenderedFigure { svg, png })
    }
}
