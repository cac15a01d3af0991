//! Croqui Render Library
//!
//! Rasterizes a sketch surface for PNG export. The scene is described as
//! SVG and rendered on the CPU with resvg/tiny-skia.

mod renderer;
mod skia_impl;

pub use renderer::{RenderResult, RendererError, svg_scene};
pub use skia_impl::{SkiaRasterizer, encode_png};
