//! The sketch context: one surface, one tool controller.
//!
//! Every operation that needs the surface checks that it exists first and
//! degrades to a logged no-op otherwise.

use crate::canvas::{CanvasDimensions, PointerOutcome, Surface};
use crate::export::{ExportOptions, ExportedImage, Rasterizer, export_with_grid};
use crate::shapes::{Rgba, ShapeId};
use crate::tools::{ToolController, ToolMode};
use kurbo::Point;
use thiserror::Error;

/// Sketch errors.
#[derive(Debug, Error, PartialEq)]
pub enum SketchError {
    #[error("drawing surface is not ready")]
    SurfaceNotReady,
    #[error("invalid canvas dimensions {width}x{height}")]
    InvalidDimensions { width: f64, height: f64 },
}

/// State composed by the UI loop and passed to every toolbar/pointer operation.
#[derive(Debug, Default)]
pub struct Sketch {
    surface: Option<Surface>,
    tools: ToolController,
    export_options: ExportOptions,
}

impl Sketch {
    /// Create a sketch with no surface yet, in Draw mode.
    pub fn new() -> Self {
        Self::default()
    }

    /// Construct the surface and configure it for the current mode.
    ///
    /// A surface that already exists is replaced.
    pub fn mount(&mut self, dimensions: CanvasDimensions) -> Result<(), SketchError> {
        if !dimensions.is_valid() {
            return Err(SketchError::InvalidDimensions {
                width: dimensions.width,
                height: dimensions.height,
            });
        }
        if self.surface.is_some() {
            log::info!("Replacing existing drawing surface");
            self.dispose();
        }

        let mut surface = Surface::new(dimensions);
        self.tools.apply(&mut surface);
        log::info!(
            "Drawing surface ready ({}x{}, mode {})",
            dimensions.width,
            dimensions.height,
            self.tools.mode().name()
        );
        self.surface = Some(surface);
        Ok(())
    }

    /// Destroy the surface and everything drawn on it.
    pub fn dispose(&mut self) {
        if self.surface.take().is_some() {
            self.tools.detach();
        }
    }

    pub fn is_ready(&self) -> bool {
        self.surface.is_some()
    }

    pub fn surface(&self) -> Option<&Surface> {
        self.surface.as_ref()
    }

    pub fn mode(&self) -> ToolMode {
        self.tools.mode()
    }

    fn surface_mut(&mut self, operation: &str) -> Option<&mut Surface> {
        if self.surface.is_none() {
            log::warn!("{operation} ignored: {}", SketchError::SurfaceNotReady);
        }
        self.surface.as_mut()
    }

    /// Resize the surface; a no-op before it is mounted.
    ///
    /// Dimensions that `mount` would refuse are ignored as well.
    pub fn resize(&mut self, width: f64, height: f64) {
        let dimensions = CanvasDimensions::new(width, height);
        if !dimensions.is_valid() {
            log::warn!(
                "resize ignored: {}",
                SketchError::InvalidDimensions { width, height }
            );
            return;
        }
        if let Some(surface) = self.surface_mut("resize") {
            surface.resize(width, height);
        }
    }

    /// Repaint the background and refresh the current tool against it.
    pub fn set_background(&mut self, color: Rgba) {
        let Some(surface) = self.surface.as_mut() else {
            log::warn!("background change ignored: {}", SketchError::SurfaceNotReady);
            return;
        };
        surface.set_background(color);
        self.tools.apply(surface);
    }

    /// Remove every object and return to Draw mode.
    pub fn clear_all(&mut self) {
        let Some(surface) = self.surface.as_mut() else {
            log::warn!("clear ignored: {}", SketchError::SurfaceNotReady);
            return;
        };
        surface.clear();
        self.tools.enter(surface, ToolMode::Draw);
        log::debug!("Cleared drawing");
    }

    /// Switch to `mode`.
    ///
    /// Without a surface the mode is only recorded and applied on mount.
    pub fn set_mode(&mut self, mode: ToolMode) {
        match self.surface.as_mut() {
            Some(surface) => self.tools.enter(surface, mode),
            None => {
                log::warn!(
                    "mode {} recorded but not applied: {}",
                    mode.name(),
                    SketchError::SurfaceNotReady
                );
                self.tools.set_pending(mode);
            }
        }
    }

    /// Text ↔ Draw.
    pub fn toggle_text(&mut self) {
        let mode = self.tools.toggle_text();
        self.set_mode(mode);
    }

    /// Eraser ↔ Draw.
    pub fn toggle_eraser(&mut self) {
        let mode = self.tools.toggle_eraser();
        self.set_mode(mode);
    }

    pub fn pointer_down(&mut self, point: Point) -> PointerOutcome {
        let Some(surface) = self.surface_mut("pointer down") else {
            return PointerOutcome::None;
        };
        let outcome = surface.pointer_down(point);
        if let PointerOutcome::TextInserted(_) = outcome {
            self.set_mode(ToolMode::Select);
        }
        outcome
    }

    pub fn pointer_move(&mut self, point: Point) -> PointerOutcome {
        match self.surface.as_mut() {
            Some(surface) => surface.pointer_move(point),
            None => PointerOutcome::None,
        }
    }

    pub fn pointer_up(&mut self, point: Point) -> PointerOutcome {
        match self.surface_mut("pointer up") {
            Some(surface) => surface.pointer_up(point),
            None => PointerOutcome::None,
        }
    }

    /// Edit the content of a text box.
    pub fn edit_text(&mut self, id: ShapeId, content: &str) {
        if let Some(surface) = self.surface_mut("text edit") {
            if !surface.set_text(id, content) {
                log::warn!("text edit ignored: {id} is not a text box");
            }
        }
    }

    /// Export the drawing with its reference grid.
    ///
    /// Returns `None` when there is no surface or rasterization failed; the
    /// drawing itself is left untouched either way.
    pub fn save<R: Rasterizer + ?Sized>(&mut self, rasterizer: &mut R) -> Option<ExportedImage> {
        let options = self.export_options.clone();
        let surface = self.surface_mut("save")?;
        match export_with_grid(surface, rasterizer, &options) {
            Ok(image) => Some(image),
            Err(e) => {
                log::error!("Export failed: {e}");
                None
            }
        }
    }
}
