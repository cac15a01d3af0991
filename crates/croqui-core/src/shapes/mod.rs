//! Drawable objects held by the sketch surface.

mod grid;
mod stroke;
mod text;

pub use grid::{GridLine, grid_lines};
pub use stroke::Stroke;
pub use text::TextBox;

use kurbo::{BezPath, Point, Rect, Vec2};
use peniko::Color;
use uuid::Uuid;

/// RGBA8 color value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn black() -> Self {
        Self::new(0, 0, 0, 255)
    }

    pub const fn white() -> Self {
        Self::new(255, 255, 255, 255)
    }

    pub const fn transparent() -> Self {
        Self::new(0, 0, 0, 0)
    }

    /// Build a color from a CSS-style `rgba()` quadruple (alpha in 0.0..=1.0).
    pub fn from_css_rgba(r: u8, g: u8, b: u8, alpha: f64) -> Self {
        Self::new(r, g, b, (alpha.clamp(0.0, 1.0) * 255.0).round() as u8)
    }

    /// Alpha as a fraction in 0.0..=1.0.
    pub fn alpha(&self) -> f64 {
        self.a as f64 / 255.0
    }

    /// `#rrggbb` hex form (alpha dropped).
    pub fn to_hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl From<Color> for Rgba {
    fn from(color: Color) -> Self {
        let rgba = color.to_rgba8();
        Self {
            r: rgba.r,
            g: rgba.g,
            b: rgba.b,
            a: rgba.a,
        }
    }
}

impl From<Rgba> for Color {
    fn from(color: Rgba) -> Self {
        Color::from_rgba8(color.r, color.g, color.b, color.a)
    }
}

/// Stroke style shared by every drawable.
#[derive(Debug, Clone, PartialEq)]
pub struct ShapeStyle {
    /// Stroke (or text fill) color.
    pub color: Rgba,
    /// Stroke width.
    pub width: f64,
}

impl ShapeStyle {
    pub fn new(color: Rgba, width: f64) -> Self {
        Self { color, width }
    }
}

impl Default for ShapeStyle {
    fn default() -> Self {
        Self::new(Rgba::black(), 1.0)
    }
}

/// Unique identifier for drawables.
pub type ShapeId = Uuid;

/// Distance from a point to a line segment (a→b).
pub fn point_to_segment_dist(point: Point, a: Point, b: Point) -> f64 {
    let seg = Vec2::new(b.x - a.x, b.y - a.y);
    let pv = Vec2::new(point.x - a.x, point.y - a.y);
    let len_sq = seg.hypot2();
    if len_sq < f64::EPSILON {
        return pv.hypot();
    }
    let t = (pv.dot(seg) / len_sq).clamp(0.0, 1.0);
    let proj = Point::new(a.x + t * seg.x, a.y + t * seg.y);
    proj.distance(point)
}

/// Minimum distance from a point to a polyline.
pub fn point_to_polyline_dist(point: Point, points: &[Point]) -> f64 {
    match points {
        [] => f64::INFINITY,
        [only] => only.distance(point),
        _ => points
            .windows(2)
            .map(|w| point_to_segment_dist(point, w[0], w[1]))
            .fold(f64::INFINITY, f64::min),
    }
}

/// Common behaviour of every drawable variant.
pub trait ShapeTrait {
    /// Get the unique identifier.
    fn id(&self) -> ShapeId;

    /// Get the bounding box in canvas coordinates.
    fn bounds(&self) -> Rect;

    /// Check if a point hits this shape.
    fn hit_test(&self, point: Point, tolerance: f64) -> bool;

    /// Get the path representation for rendering.
    fn to_path(&self) -> BezPath;

    /// Get the style.
    fn style(&self) -> &ShapeStyle;

    /// Move the shape by an offset.
    fn translate(&mut self, delta: Vec2);
}

/// Any paintable item on the surface.
///
/// The variant doubles as the grid-line tag used by the export procedure.
#[derive(Debug, Clone, PartialEq)]
pub enum Drawable {
    Stroke(Stroke),
    TextBox(TextBox),
    GridLine(GridLine),
}

impl Drawable {
    fn inner(&self) -> &dyn ShapeTrait {
        match self {
            Drawable::Stroke(s) => s,
            Drawable::TextBox(s) => s,
            Drawable::GridLine(s) => s,
        }
    }

    fn inner_mut(&mut self) -> &mut dyn ShapeTrait {
        match self {
            Drawable::Stroke(s) => s,
            Drawable::TextBox(s) => s,
            Drawable::GridLine(s) => s,
        }
    }

    pub fn id(&self) -> ShapeId {
        self.inner().id()
    }

    pub fn bounds(&self) -> Rect {
        self.inner().bounds()
    }

    pub fn hit_test(&self, point: Point, tolerance: f64) -> bool {
        self.inner().hit_test(point, tolerance)
    }

    pub fn to_path(&self) -> BezPath {
        self.inner().to_path()
    }

    pub fn style(&self) -> &ShapeStyle {
        self.inner().style()
    }

    pub fn translate(&mut self, delta: Vec2) {
        self.inner_mut().translate(delta);
    }

    /// Grid lines are export scaffolding: never selectable, never evented.
    pub fn is_grid_line(&self) -> bool {
        matches!(self, Drawable::GridLine(_))
    }

    /// Whether pointer input can target this object.
    pub fn is_interactive(&self) -> bool {
        !self.is_grid_line()
    }

    pub fn as_text_box(&self) -> Option<&TextBox> {
        match self {
            Drawable::TextBox(t) => Some(t),
            _ => None,
        }
    }

    pub fn as_text_box_mut(&mut self) -> Option<&mut TextBox> {
        match self {
            Drawable::TextBox(t) => Some(t),
            _ => None,
        }
    }
}

impl From<Stroke> for Drawable {
    fn from(stroke: Stroke) -> Self {
        Drawable::Stroke(stroke)
    }
}

impl From<TextBox> for Drawable {
    fn from(text: TextBox) -> Self {
        Drawable::TextBox(text)
    }
}

impl From<GridLine> for Drawable {
    fn from(line: GridLine) -> Self {
        Drawable::GridLine(line)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rgba_peniko_conversion() {
        let color = Rgba::new(12, 34, 56, 200);
        let peniko: Color = color.into();
        assert_eq!(Rgba::from(peniko), color);
    }

    #[test]
    fn test_css_alpha() {
        let faint = Rgba::from_css_rgba(0, 0, 0, 0.05);
        assert_eq!(faint.a, 13);
        assert_eq!(Rgba::white().to_hex(), "#ffffff");
    }

    #[test]
    fn test_polyline_distance() {
        let points = [Point::new(0.0, 0.0), Point::new(10.0, 0.0), Point::new(10.0, 10.0)];
        assert!((point_to_polyline_dist(Point::new(5.0, 3.0), &points) - 3.0).abs() < 1e-9);
        assert!((point_to_polyline_dist(Point::new(12.0, 5.0), &points) - 2.0).abs() < 1e-9);
        assert!(point_to_polyline_dist(Point::ZERO, &[]).is_infinite());
    }

    #[test]
    fn test_grid_lines_are_not_interactive() {
        let line = GridLine::new(Point::new(0.0, 0.0), Point::new(0.0, 100.0));
        let drawable = Drawable::from(line);
        assert!(drawable.is_grid_line());
        assert!(!drawable.is_interactive());

        let stroke = Drawable::from(Stroke::from_points(vec![Point::ZERO, Point::new(5.0, 5.0)]));
        assert!(stroke.is_interactive());
    }
}
