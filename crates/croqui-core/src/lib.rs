//! Croqui Core Library
//!
//! Platform-agnostic core of the Croqui Fácil sketch pad: the drawing
//! surface and its objects, tool modes, and grid-overlay PNG export.

pub mod canvas;
pub mod export;
pub mod shapes;
pub mod sketch;
pub mod tools;

pub use canvas::{CanvasDimensions, ClickAction, PointerOutcome, Subscription, Surface};
pub use export::{ExportError, ExportOptions, ExportedImage, RasterImage, Rasterizer, export_with_grid};
pub use shapes::{Drawable, GridLine, Rgba, ShapeId, Stroke, TextBox};
pub use sketch::{Sketch, SketchError};
pub use tools::{Brush, InputConfig, ToolController, ToolMode};
