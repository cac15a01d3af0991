//! Reference grid lines baked into exported images.

use super::{Rgba, ShapeId, ShapeStyle, ShapeTrait, point_to_segment_dist};
use kurbo::{BezPath, Line, Point, Rect, Shape as _, Size, Vec2};
use uuid::Uuid;

/// A single straight grid line.
#[derive(Debug, Clone, PartialEq)]
pub struct GridLine {
    pub(crate) id: ShapeId,
    /// Start point.
    pub start: Point,
    /// End point.
    pub end: Point,
    /// Style properties.
    pub style: ShapeStyle,
}

impl GridLine {
    /// Faint stroke used for grid lines (5% black).
    pub fn default_color() -> Rgba {
        Rgba::from_css_rgba(0, 0, 0, 0.05)
    }

    /// Create a new grid line with the default faint style.
    pub fn new(start: Point, end: Point) -> Self {
        Self {
            id: Uuid::new_v4(),
            start,
            end,
            style: ShapeStyle::new(Self::default_color(), 1.0),
        }
    }

    pub fn with_color(mut self, color: Rgba) -> Self {
        self.style.color = color;
        self
    }

    /// Get as a kurbo Line.
    pub fn as_kurbo(&self) -> Line {
        Line::new(self.start, self.end)
    }

    pub fn is_vertical(&self) -> bool {
        (self.start.x - self.end.x).abs() < f64::EPSILON
    }
}

impl ShapeTrait for GridLine {
    fn id(&self) -> ShapeId {
        self.id
    }

    fn bounds(&self) -> Rect {
        Rect::from_points(self.start, self.end)
    }

    fn hit_test(&self, point: Point, tolerance: f64) -> bool {
        point_to_segment_dist(point, self.start, self.end) <= tolerance + self.style.width / 2.0
    }

    fn to_path(&self) -> BezPath {
        self.as_kurbo().to_path(0.1)
    }

    fn style(&self) -> &ShapeStyle {
        &self.style
    }

    fn translate(&mut self, delta: Vec2) {
        self.start += delta;
        self.end += delta;
    }
}

/// Upper bound on the lines a single grid may hold.
const MAX_GRID_LINES: f64 = 100_000.0;

/// Lines of a square grid covering `size`, every `spacing` units.
///
/// Vertical lines come first (x = 0, spacing, ... up to the width inclusive),
/// then horizontal lines the same way along the height.
pub fn grid_lines(size: Size, spacing: f64, color: Rgba) -> Vec<GridLine> {
    let finite = spacing.is_finite() && size.width.is_finite() && size.height.is_finite();
    if !finite || spacing <= 0.0 || size.width < 0.0 || size.height < 0.0 {
        return Vec::new();
    }

    let columns = (size.width / spacing).floor();
    let rows = (size.height / spacing).floor();
    if columns + rows >= MAX_GRID_LINES {
        log::warn!("Grid of {}x{} lines skipped", columns, rows);
        return Vec::new();
    }
    let (columns, rows) = (columns as usize, rows as usize);

    let vertical = (0..=columns).map(|i| {
        let x = i as f64 * spacing;
        GridLine::new(Point::new(x, 0.0), Point::new(x, size.height)).with_color(color)
    });
    let horizontal = (0..=rows).map(|i| {
        let y = i as f64 * spacing;
        GridLine::new(Point::new(0.0, y), Point::new(size.width, y)).with_color(color)
    });

    vertical.chain(horizontal).collect()
}
