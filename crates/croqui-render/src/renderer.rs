//! Scene description shared by rasterizers.

use croqui_core::canvas::Surface;
use croqui_core::shapes::{Drawable, GridLine, Rgba, ShapeTrait, Stroke, TextBox};
use croqui_core::export::ExportError;
use std::fmt::Write as _;
use thiserror::Error;

/// Renderer errors.
#[derive(Debug, Error)]
pub enum RendererError {
    #[error("Scene could not be parsed: {0}")]
    Scene(String),
    #[error("Cannot allocate a {width}x{height} pixmap")]
    Pixmap { width: u32, height: u32 },
    #[error("PNG encoding failed: {0}")]
    Encode(#[from] png::EncodingError),
}

/// Result type for renderer operations.
pub type RenderResult<T> = Result<T, RendererError>;

impl From<RendererError> for ExportError {
    fn from(err: RendererError) -> Self {
        match err {
            RendererError::Encode(e) => ExportError::Encode(e.to_string()),
            other => ExportError::Rasterize(other.to_string()),
        }
    }
}

/// Escape text for use inside SVG character data and attributes.
fn escape_xml(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}

/// `fill`/`stroke` attribute pair for a color, e.g. `stroke="#000000" stroke-opacity="0.05"`.
fn paint_attrs(kind: &str, color: Rgba) -> String {
    format!(
        "{kind}=\"{}\" {kind}-opacity=\"{:.3}\"",
        color.to_hex(),
        color.alpha()
    )
}

/// Build an SVG document for the surface in canvas units.
///
/// Objects are emitted in paint order over a full-size background rectangle.
pub fn svg_scene(surface: &Surface) -> String {
    let dims = surface.dimensions();
    let mut svg = String::new();
    let _ = writeln!(
        svg,
        "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{w}\" height=\"{h}\" viewBox=\"0 0 {w} {h}\">",
        w = dims.width,
        h = dims.height
    );
    let _ = writeln!(
        svg,
        "<rect x=\"0\" y=\"0\" width=\"{}\" height=\"{}\" {}/>",
        dims.width,
        dims.height,
        paint_attrs("fill", surface.background())
    );

    for object in surface.objects() {
        match object {
            Drawable::Stroke(stroke) => write_stroke(&mut svg, stroke),
            Drawable::GridLine(line) => write_grid_line(&mut svg, line),
            Drawable::TextBox(text) => write_text(&mut svg, text),
        }
    }

    svg.push_str("</svg>\n");
    svg
}

fn write_stroke(svg: &mut String, stroke: &Stroke) {
    if stroke.points.len() < 2 {
        return;
    }
    let _ = writeln!(
        svg,
        "<path d=\"{}\" fill=\"none\" {} stroke-width=\"{}\" stroke-linecap=\"round\" stroke-linejoin=\"round\"/>",
        stroke.to_path().to_svg(),
        paint_attrs("stroke", stroke.style.color),
        stroke.style.width
    );
}

fn write_grid_line(svg: &mut String, line: &GridLine) {
    let _ = writeln!(
        svg,
        "<line x1=\"{}\" y1=\"{}\" x2=\"{}\" y2=\"{}\" {} stroke-width=\"{}\"/>",
        line.start.x,
        line.start.y,
        line.end.x,
        line.end.y,
        paint_attrs("stroke", line.style.color),
        line.style.width
    );
}

fn write_text(svg: &mut String, text: &TextBox) {
    let _ = write!(
        svg,
        "<text font-family=\"{}, sans-serif\" font-size=\"{}\" {}>",
        escape_xml(&text.font_family),
        text.font_size,
        paint_attrs("fill", text.style.color)
    );
    for (i, line) in text.lines().iter().enumerate() {
        let baseline = text.position.y + i as f64 * text.line_height() + text.font_size;
        let _ = write!(
            svg,
            "<tspan x=\"{}\" y=\"{}\">{}</tspan>",
            text.position.x,
            baseline,
            escape_xml(line)
        );
    }
    svg.push_str("</text>\n");
}
