//! tiny-skia based rasterizer (via resvg).

use crate::renderer::{RenderResult, RendererError, svg_scene};
use croqui_core::canvas::Surface;
use croqui_core::export::{ExportResult, RasterImage, Rasterizer};
use resvg::usvg;
use std::sync::Arc;
use tiny_skia::{Pixmap, Transform};

/// Largest raster side accepted, in pixels.
const MAX_SIDE: u32 = 16_384;

/// Families tried, in order, for the generic `sans-serif` fallback.
const SANS_SERIF_CANDIDATES: [&str; 6] = [
    "Arial",
    "Liberation Sans",
    "Helvetica",
    "DejaVu Sans",
    "Noto Sans",
    "FreeSans",
];

/// CPU rasterizer producing PNG images of a surface.
pub struct SkiaRasterizer {
    /// Font database shared by every export (loading system fonts is slow).
    fontdb: Arc<fontdb::Database>,
}

impl Default for SkiaRasterizer {
    fn default() -> Self {
        Self::new()
    }
}

impl SkiaRasterizer {
    /// Create a rasterizer using the fonts installed on the system.
    pub fn new() -> Self {
        let mut db = fontdb::Database::new();
        db.load_system_fonts();
        log::debug!("Loaded {} font faces for export", db.len());
        Self::with_fonts(db)
    }

    /// Create a rasterizer with an explicit font database.
    ///
    /// The generic `sans-serif` family is pointed at an installed face so
    /// text in a missing family still renders.
    pub fn with_fonts(mut db: fontdb::Database) -> Self {
        match sans_serif_fallback(&db) {
            Some(family) => {
                log::debug!("Using {family} as sans-serif fallback");
                db.set_sans_serif_family(family);
            }
            None => log::warn!("No font faces available; text will be missing from exports"),
        }
        Self { fontdb: Arc::new(db) }
    }

    /// Render `surface` into a pixmap at `scale` device pixels per unit.
    pub fn render_pixmap(&self, surface: &Surface, scale: f64) -> RenderResult<Pixmap> {
        let dims = surface.dimensions();
        let width = raster_side(dims.width, scale);
        let height = raster_side(dims.height, scale);
        if width > MAX_SIDE || height > MAX_SIDE {
            return Err(RendererError::Pixmap { width, height });
        }

        let svg = svg_scene(surface);
        let mut options = usvg::Options::default();
        options.fontdb = Arc::clone(&self.fontdb);
        let tree = usvg::Tree::from_data(svg.as_bytes(), &options)
            .map_err(|e| RendererError::Scene(e.to_string()))?;

        let mut pixmap = Pixmap::new(width, height).ok_or(RendererError::Pixmap { width, height })?;
        let transform = Transform::from_scale(scale as f32, scale as f32);
        resvg::render(&tree, transform, &mut pixmap.as_mut());
        Ok(pixmap)
    }
}

impl Rasterizer for SkiaRasterizer {
    fn rasterize(&mut self, surface: &Surface, scale: f64) -> ExportResult<RasterImage> {
        let pixmap = self.render_pixmap(surface, scale)?;
        let png = encode_png(&pixmap)?;
        Ok(RasterImage {
            png,
            width: pixmap.width(),
            height: pixmap.height(),
        })
    }
}

/// First preferred family that is installed, else any installed family.
fn sans_serif_fallback(db: &fontdb::Database) -> Option<String> {
    let installed: Vec<&str> = db
        .faces()
        .flat_map(|face| face.families.iter().map(|(name, _)| name.as_str()))
        .collect();
    SANS_SERIF_CANDIDATES
        .iter()
        .find(|candidate| installed.contains(*candidate))
        .or(installed.first())
        .map(|family| family.to_string())
}

/// Pixel count of one side after scaling (at least one pixel).
fn raster_side(length: f64, scale: f64) -> u32 {
    (length * scale).round().max(1.0) as u32
}

/// Encode a pixmap as 8-bit RGBA PNG.
pub fn encode_png(pixmap: &Pixmap) -> RenderResult<Vec<u8>> {
    // tiny-skia stores premultiplied alpha; PNG wants straight alpha.
    let mut rgba = Vec::with_capacity(pixmap.data().len());
    for pixel in pixmap.pixels() {
        let c = pixel.demultiply();
        rgba.extend_from_slice(&[c.red(), c.green(), c.blue(), c.alpha()]);
    }

    let mut png_data = Vec::new();
    {
        let mut encoder = png::Encoder::new(&mut png_data, pixmap.width(), pixmap.height());
        encoder.set_color(png::ColorType::Rgba);
        encoder.set_depth(png::BitDepth::Eight);
        let mut writer = encoder.write_header()?;
        writer.write_image_data(&rgba)?;
        writer.finish()?;
    }
    Ok(png_data)
}
