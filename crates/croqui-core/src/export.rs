//! PNG export with a temporary reference grid.

use crate::canvas::Surface;
use crate::shapes::{Drawable, GridLine, Rgba, ShapeId, grid_lines};
use std::ops::Deref;
use thiserror::Error;

/// Export errors.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("Rasterization failed: {0}")]
    Rasterize(String),
    #[error("PNG encoding failed: {0}")]
    Encode(String),
}

/// Result type for export operations.
pub type ExportResult<T> = Result<T, ExportError>;

/// An encoded raster image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RasterImage {
    /// PNG bytes.
    pub png: Vec<u8>,
    /// Image width in pixels.
    pub width: u32,
    /// Image height in pixels.
    pub height: u32,
}

/// The result of a finished export, ready to be downloaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportedImage {
    pub file_name: String,
    pub image: RasterImage,
}

/// Turns the current visual state of a surface into a PNG.
pub trait Rasterizer {
    /// Rasterize `surface` at `scale` device pixels per canvas unit.
    fn rasterize(&mut self, surface: &Surface, scale: f64) -> ExportResult<RasterImage>;
}

/// Export parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportOptions {
    /// Distance between grid lines.
    pub grid_spacing: f64,
    /// Grid stroke color.
    pub grid_color: Rgba,
    /// Background painted while rasterizing.
    pub background: Rgba,
    /// Pixel density multiplier.
    pub multiplier: f64,
    /// Name of the downloaded file.
    pub file_name: String,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            grid_spacing: 40.0,
            grid_color: GridLine::default_color(),
            background: Rgba::white(),
            multiplier: 2.0,
            file_name: "croqui.png".to_string(),
        }
    }
}

/// Grid lines and background swapped into a surface for the duration of an export.
///
/// Dropping the overlay removes the grid lines and restores the background,
/// so the surface returns to its pre-export state on every exit path.
struct GridOverlay<'a> {
    surface: &'a mut Surface,
    original_background: Rgba,
    grid_ids: Vec<ShapeId>,
}

impl<'a> GridOverlay<'a> {
    fn install(surface: &'a mut Surface, options: &ExportOptions) -> Self {
        let original_background = surface.background();
        let lines = grid_lines(
            surface.dimensions().size(),
            options.grid_spacing,
            options.grid_color,
        );
        let grid_ids = lines.into_iter().map(|line| surface.add(line)).collect();

        surface.raise_non_grid_to_front();
        surface.set_background(options.background);
        surface.render_all();

        Self {
            surface,
            original_background,
            grid_ids,
        }
    }
}

impl Deref for GridOverlay<'_> {
    type Target = Surface;

    fn deref(&self) -> &Surface {
        self.surface
    }
}

impl Drop for GridOverlay<'_> {
    fn drop(&mut self) {
        for id in self.grid_ids.drain(..) {
            self.surface.remove(id);
        }
        self.surface.set_background(self.original_background);
        self.surface.render_all();
    }
}

/// Rasterize `surface` with a reference grid baked in.
///
/// The grid lines and the white background only exist while the image is
/// produced; afterwards the object list and background are exactly as
/// before the call, even when rasterization fails.
pub fn export_with_grid<R: Rasterizer + ?Sized>(
    surface: &mut Surface,
    rasterizer: &mut R,
    options: &ExportOptions,
) -> ExportResult<ExportedImage> {
    let image = {
        let overlay = GridOverlay::install(surface, options);
        log::debug!(
            "Rasterizing {} objects ({} grid lines) at {}x",
            overlay.len(),
            overlay.grid_ids.len(),
            options.multiplier
        );
        rasterizer.rasterize(&overlay, options.multiplier)?
    };

    log::info!(
        "Exported {} ({}x{} px, {} bytes)",
        options.file_name,
        image.width,
        image.height,
        image.png.len()
    );
    Ok(ExportedImage {
        file_name: options.file_name.clone(),
        image,
    })
}

/// Number of grid lines on a surface (zero outside an export).
pub fn grid_line_count(surface: &Surface) -> usize {
    surface.objects().iter().filter(|o| o.is_grid_line()).count()
}

/// Whether every grid line is painted behind every user object.
pub fn grid_is_behind_content(objects: &[Drawable]) -> bool {
    let first_user = objects.iter().position(|o| !o.is_grid_line());
    match first_user {
        None => true,
        Some(index) => objects[index..].iter().all(|o| !o.is_grid_line()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::CanvasDimensions;
    use crate::shapes::{Stroke, TextBox};
    use kurbo::Point;

    /// Records what the surface looked like when it was rasterized.
    #[derive(Default)]
    struct RecordingRasterizer {
        grid_lines: usize,
        grid_behind: bool,
        background: Option<Rgba>,
        scale: f64,
        fail: bool,
    }

    impl Rasterizer for RecordingRasterizer {
        fn rasterize(&mut self, surface: &Surface, scale: f64) -> ExportResult<RasterImage> {
            self.grid_lines = grid_line_count(surface);
            self.grid_behind = grid_is_behind_content(surface.objects());
            self.background = Some(surface.background());
            self.scale = scale;
            if self.fail {
                return Err(ExportError::Rasterize("boom".to_string()));
            }
            let dims = surface.dimensions();
            Ok(RasterImage {
                png: vec![0x89, b'P', b'N', b'G'],
                width: (dims.width * scale).round() as u32,
                height: (dims.height * scale).round() as u32,
            })
        }
    }

    fn populated_surface() -> Surface {
        let mut surface = Surface::new(CanvasDimensions::new(200.0, 250.0));
        surface.set_background(Rgba::new(1, 2, 3, 4));
        surface.add(Stroke::from_points(vec![Point::ZERO, Point::new(50.0, 50.0)]));
        surface.add(TextBox::placeholder(Point::new(10.0, 10.0)));
        surface
    }

    #[test]
    fn test_export_bakes_grid_and_restores_state() {
        let mut surface = populated_surface();
        let before_objects = surface.objects().to_vec();
        let before_background = surface.background();

        let mut rasterizer = RecordingRasterizer::default();
        let exported = export_with_grid(&mut surface, &mut rasterizer, &ExportOptions::default())
            .expect("export");

        // 200 / 40 = 5 -> 6 vertical; 250 / 40 = 6 -> 7 horizontal.
        assert_eq!(rasterizer.grid_lines, 13);
        assert!(rasterizer.grid_behind);
        assert_eq!(rasterizer.background, Some(Rgba::white()));
        assert_eq!(rasterizer.scale, 2.0);

        assert_eq!(exported.file_name, "croqui.png");
        assert_eq!(exported.image.width, 400);
        assert_eq!(exported.image.height, 500);

        assert_eq!(surface.objects(), before_objects.as_slice());
        assert_eq!(surface.background(), before_background);
        assert_eq!(grid_line_count(&surface), 0);
    }

    #[test]
    fn test_failed_export_still_restores_state() {
        let mut surface = populated_surface();
        let before_ids = surface.ids();
        let before_background = surface.background();

        let mut rasterizer = RecordingRasterizer {
            fail: true,
            ..Default::default()
        };
        let result = export_with_grid(&mut surface, &mut rasterizer, &ExportOptions::default());

        assert!(matches!(result, Err(ExportError::Rasterize(_))));
        assert_eq!(surface.ids(), before_ids);
        assert_eq!(surface.background(), before_background);
    }

    #[test]
    fn test_empty_surface_exports_grid_only() {
        let mut surface = Surface::new(CanvasDimensions::new(80.0, 100.0));
        let mut rasterizer = RecordingRasterizer::default();
        let exported = export_with_grid(&mut surface, &mut rasterizer, &ExportOptions::default());

        assert!(exported.is_ok());
        assert_eq!(rasterizer.grid_lines, 3 + 3);
        assert!(surface.is_empty());
    }

    #[test]
    fn test_export_repaints() {
        let mut surface = populated_surface();
        let before = surface.revision();
        let mut rasterizer = RecordingRasterizer::default();
        export_with_grid(&mut surface, &mut rasterizer, &ExportOptions::default()).expect("export");
        assert!(surface.revision() >= before + 2);
    }

    #[test]
    fn test_grid_is_behind_content() {
        let grid = Drawable::from(GridLine::new(Point::ZERO, Point::new(0.0, 10.0)));
        let text = Drawable::from(TextBox::placeholder(Point::ZERO));
        assert!(grid_is_behind_content(&[grid.clone(), text.clone()]));
        assert!(!grid_is_behind_content(&[text.clone(), grid.clone()]));
        assert!(grid_is_behind_content(&[]));
    }
}
