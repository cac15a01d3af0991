//! Editable text box.

use super::{Rgba, ShapeId, ShapeStyle, ShapeTrait};
use kurbo::{BezPath, Point, Rect, Shape as _, Vec2};
use uuid::Uuid;

/// A word-wrapped, editable text box.
#[derive(Debug, Clone, PartialEq)]
pub struct TextBox {
    pub(crate) id: ShapeId,
    /// Position (top-left corner of the box).
    pub position: Point,
    /// The text content.
    pub content: String,
    /// Wrapping width of the box.
    pub width: f64,
    /// Font size in canvas units.
    pub font_size: f64,
    /// Font family name handed to the renderer.
    pub font_family: String,
    /// Fill color of the glyphs (`width` is unused for text).
    pub style: ShapeStyle,
}

impl TextBox {
    /// Content of a freshly inserted text box.
    pub const PLACEHOLDER: &'static str = "Digite aqui...";
    pub const DEFAULT_FONT_SIZE: f64 = 22.0;
    pub const DEFAULT_WIDTH: f64 = 150.0;
    pub const DEFAULT_FONT_FAMILY: &'static str = "Arial";
    /// Line height as a multiple of the font size.
    pub const LINE_HEIGHT: f64 = 1.16;
    /// Average glyph advance as a multiple of the font size.
    const CHAR_WIDTH_FACTOR: f64 = 0.5;

    /// Create a new text box at `position`.
    pub fn new(position: Point, content: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            position,
            content: content.into(),
            width: Self::DEFAULT_WIDTH,
            font_size: Self::DEFAULT_FONT_SIZE,
            font_family: Self::DEFAULT_FONT_FAMILY.to_string(),
            style: ShapeStyle::new(Rgba::black(), 0.0),
        }
    }

    /// Text box with the placeholder content, as inserted by the text tool.
    pub fn placeholder(position: Point) -> Self {
        Self::new(position, Self::PLACEHOLDER)
    }

    /// Replace the text content.
    pub fn set_content(&mut self, content: impl Into<String>) {
        self.content = content.into();
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    /// Approximate advance of a run of `chars` characters.
    fn approximate_advance(&self, chars: usize) -> f64 {
        chars as f64 * self.font_size * Self::CHAR_WIDTH_FACTOR
    }

    /// Lines after greedy word wrapping at the box width.
    ///
    /// Explicit newlines are kept. A single word wider than the box stays on
    /// its own line rather than being split.
    pub fn lines(&self) -> Vec<String> {
        let mut lines = Vec::new();
        for paragraph in self.content.split('\n') {
            let mut current = String::new();
            for word in paragraph.split_whitespace() {
                if current.is_empty() {
                    current.push_str(word);
                    continue;
                }
                let candidate = current.chars().count() + 1 + word.chars().count();
                if self.approximate_advance(candidate) > self.width {
                    lines.push(std::mem::take(&mut current));
                    current.push_str(word);
                } else {
                    current.push(' ');
                    current.push_str(word);
                }
            }
            lines.push(current);
        }
        lines
    }

    /// Distance between consecutive baselines.
    pub fn line_height(&self) -> f64 {
        self.font_size * Self::LINE_HEIGHT
    }
}

impl ShapeTrait for TextBox {
    fn id(&self) -> ShapeId {
        self.id
    }

    fn bounds(&self) -> Rect {
        let lines = self.lines().len().max(1);
        Rect::from_origin_size(
            self.position,
            (self.width, lines as f64 * self.line_height()),
        )
    }

    fn hit_test(&self, point: Point, tolerance: f64) -> bool {
        self.bounds().inflate(tolerance, tolerance).contains(point)
    }

    fn to_path(&self) -> BezPath {
        self.bounds().to_path(0.1)
    }

    fn style(&self) -> &ShapeStyle {
        &self.style
    }

    fn translate(&mut self, delta: Vec2) {
        self.position += delta;
    }
}
