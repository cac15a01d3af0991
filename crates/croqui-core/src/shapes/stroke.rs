//! Freehand stroke.

use super::{ShapeId, ShapeStyle, ShapeTrait, point_to_polyline_dist};
use kurbo::{BezPath, Point, Rect, Vec2};
use uuid::Uuid;

/// A freehand stroke (series of points drawn with a brush).
#[derive(Debug, Clone, PartialEq)]
pub struct Stroke {
    pub(crate) id: ShapeId,
    /// Points in the stroke path.
    pub points: Vec<Point>,
    /// Brush color and width.
    pub style: ShapeStyle,
}

impl Stroke {
    /// Minimum spacing kept between consecutive points when a gesture ends.
    pub const DECIMATE_TOLERANCE: f64 = 0.4;

    /// Create a new empty stroke with the given brush.
    pub fn new(style: ShapeStyle) -> Self {
        Self {
            id: Uuid::new_v4(),
            points: Vec::new(),
            style,
        }
    }

    /// Create from existing points with the default style.
    pub fn from_points(points: Vec<Point>) -> Self {
        Self {
            id: Uuid::new_v4(),
            points,
            style: ShapeStyle::default(),
        }
    }

    /// Add a point to the path.
    pub fn add_point(&mut self, point: Point) {
        self.points.push(point);
    }

    /// Get the number of points.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Check if the path is empty.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Whether the stroke covers any distance at all.
    ///
    /// A press-and-release without movement yields a degenerate stroke that
    /// is discarded instead of being added to the surface.
    pub fn is_degenerate(&self) -> bool {
        match self.points.first() {
            None => true,
            Some(first) => self.points.iter().all(|p| p.distance(*first) < f64::EPSILON),
        }
    }

    /// Drop points closer than `tolerance` to the previously kept point.
    ///
    /// The last point is always kept so the stroke ends where the pointer
    /// was released.
    pub fn decimate(&mut self, tolerance: f64) {
        if self.points.len() < 3 {
            return;
        }

        let last = self.points[self.points.len() - 1];
        let mut kept = Vec::with_capacity(self.points.len());
        kept.push(self.points[0]);
        for point in &self.points[1..self.points.len() - 1] {
            if let Some(prev) = kept.last() {
                if prev.distance(*point) >= tolerance {
                    kept.push(*point);
                }
            }
        }
        kept.push(last);
        self.points = kept;
    }
}

impl ShapeTrait for Stroke {
    fn id(&self) -> ShapeId {
        self.id
    }

    fn bounds(&self) -> Rect {
        let Some(first) = self.points.first() else {
            return Rect::ZERO;
        };

        let half = self.style.width / 2.0;
        self.points
            .iter()
            .fold(Rect::from_points(*first, *first), |acc, p| {
                acc.union_pt(*p)
            })
            .inflate(half, half)
    }

    fn hit_test(&self, point: Point, tolerance: f64) -> bool {
        point_to_polyline_dist(point, &self.points) <= tolerance + self.style.width / 2.0
    }

    fn to_path(&self) -> BezPath {
        let mut path = BezPath::new();

        let Some(first) = self.points.first() else {
            return path;
        };

        path.move_to(*first);
        for point in self.points.iter().skip(1) {
            path.line_to(*point);
        }

        path
    }

    fn style(&self) -> &ShapeStyle {
        &self.style
    }

    fn translate(&mut self, delta: Vec2) {
        for point in &mut self.points {
            *point += delta;
        }
    }
}
