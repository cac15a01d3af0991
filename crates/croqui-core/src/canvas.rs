//! Sketch surface: dimensions, drawable list and pointer input.

use crate::shapes::{Drawable, Rgba, ShapeId, ShapeStyle, Stroke, TextBox};
use crate::tools::InputConfig;
use kurbo::{Point, Size};

/// Pointer tolerance used when looking for the object under the cursor.
pub const HIT_TOLERANCE: f64 = 4.0;

/// Logical size of the drawing surface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CanvasDimensions {
    pub width: f64,
    pub height: f64,
}

impl CanvasDimensions {
    /// Widest canvas the layout allows.
    pub const MAX_WIDTH: f64 = 800.0;
    /// Width / height ratio (4:5 portrait sheet).
    pub const ASPECT_RATIO: f64 = 0.8;
    /// Share of the viewport width the canvas may occupy.
    pub const VIEWPORT_FRACTION: f64 = 0.95;

    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Dimensions for a viewport of the given width.
    pub fn for_viewport(viewport_width: f64) -> Self {
        let width = (viewport_width * Self::VIEWPORT_FRACTION).min(Self::MAX_WIDTH);
        Self::new(width, width / Self::ASPECT_RATIO)
    }

    /// Both sides strictly positive and finite.
    pub fn is_valid(&self) -> bool {
        self.width.is_finite() && self.height.is_finite() && self.width > 0.0 && self.height > 0.0
    }

    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }
}

/// Behaviour attached to a mouse-down subscription.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickAction {
    /// Insert a placeholder text box when the press lands on empty canvas.
    InsertText,
}

/// Token for an installed mouse-down handler.
///
/// Not `Clone`: a handler can only be removed once, by handing the token
/// back to [`Surface::off`].
#[derive(Debug, PartialEq, Eq)]
#[must_use = "dropping a subscription leaves its handler installed"]
pub struct Subscription {
    id: u64,
}

/// What a pointer event did to the surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerOutcome {
    /// Nothing observable changed.
    None,
    /// A freehand gesture started or grew.
    Drawing,
    /// A freehand gesture finished and its stroke was appended.
    StrokeAdded(ShapeId),
    /// A mouse-down handler inserted (and selected) a text box.
    TextInserted(ShapeId),
    /// An existing object became the selection.
    Selected(ShapeId),
    /// The selection was cleared by pressing on empty canvas.
    SelectionCleared,
    /// The selected object was dragged.
    Moved(ShapeId),
}

/// In-flight pointer gesture.
#[derive(Debug, Clone, Default)]
enum Gesture {
    #[default]
    Idle,
    Drawing(Stroke),
    Moving { id: ShapeId, last: Point },
}

/// The drawing surface and the ordered list of objects painted on it.
#[derive(Debug, Clone)]
pub struct Surface {
    dimensions: CanvasDimensions,
    /// Objects in paint order (back to front).
    objects: Vec<Drawable>,
    background: Rgba,
    input: InputConfig,
    selection: Option<ShapeId>,
    mouse_down_handlers: Vec<(u64, ClickAction)>,
    next_handler_id: u64,
    gesture: Gesture,
    revision: u64,
}

impl Surface {
    /// Create an empty surface with a white background and input disabled.
    pub fn new(dimensions: CanvasDimensions) -> Self {
        Self {
            dimensions,
            objects: Vec::new(),
            background: Rgba::white(),
            input: InputConfig::default(),
            selection: None,
            mouse_down_handlers: Vec::new(),
            next_handler_id: 1,
            gesture: Gesture::Idle,
            revision: 0,
        }
    }

    pub fn dimensions(&self) -> CanvasDimensions {
        self.dimensions
    }

    /// Set new dimensions and repaint.
    pub fn resize(&mut self, width: f64, height: f64) {
        self.dimensions = CanvasDimensions::new(width, height);
        self.render_all();
    }

    pub fn background(&self) -> Rgba {
        self.background
    }

    /// Change the background color.
    ///
    /// An eraser brush already configured keeps its old color until the
    /// input is reconfigured (see `Sketch::set_background`).
    pub fn set_background(&mut self, color: Rgba) {
        self.background = color;
    }

    /// Request a full repaint.
    pub fn render_all(&mut self) {
        self.revision = self.revision.wrapping_add(1);
    }

    /// Counter bumped on every repaint request.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    // --- objects ---

    /// Append an object on top of the paint order.
    pub fn add(&mut self, object: impl Into<Drawable>) -> ShapeId {
        let object = object.into();
        let id = object.id();
        self.objects.push(object);
        id
    }

    /// Remove an object by identity.
    pub fn remove(&mut self, id: ShapeId) -> Option<Drawable> {
        let index = self.objects.iter().position(|o| o.id() == id)?;
        if self.selection == Some(id) {
            self.selection = None;
        }
        Some(self.objects.remove(index))
    }

    /// Remove every object and drop the selection.
    pub fn clear(&mut self) {
        self.objects.clear();
        self.selection = None;
        self.gesture = Gesture::Idle;
        self.render_all();
    }

    pub fn get(&self, id: ShapeId) -> Option<&Drawable> {
        self.objects.iter().find(|o| o.id() == id)
    }

    pub fn get_mut(&mut self, id: ShapeId) -> Option<&mut Drawable> {
        self.objects.iter_mut().find(|o| o.id() == id)
    }

    /// Objects in paint order (back to front).
    pub fn objects(&self) -> &[Drawable] {
        &self.objects
    }

    /// Ids in paint order.
    pub fn ids(&self) -> Vec<ShapeId> {
        self.objects.iter().map(Drawable::id).collect()
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Move an object to the top of the paint order.
    pub fn bring_to_front(&mut self, id: ShapeId) {
        if let Some(index) = self.objects.iter().position(|o| o.id() == id) {
            let object = self.objects.remove(index);
            self.objects.push(object);
        }
    }

    /// Move an object to the bottom of the paint order.
    pub fn send_to_back(&mut self, id: ShapeId) {
        if let Some(index) = self.objects.iter().position(|o| o.id() == id) {
            let object = self.objects.remove(index);
            self.objects.insert(0, object);
        }
    }

    /// Topmost interactive object under `point`.
    pub fn object_at(&self, point: Point) -> Option<ShapeId> {
        self.objects
            .iter()
            .rev()
            .filter(|o| o.is_interactive())
            .find(|o| o.hit_test(point, HIT_TOLERANCE))
            .map(Drawable::id)
    }

    /// Replace the content of a text box. Returns false if `id` is not a text box.
    pub fn set_text(&mut self, id: ShapeId, content: &str) -> bool {
        let Some(text) = self.get_mut(id).and_then(Drawable::as_text_box_mut) else {
            return false;
        };
        text.set_content(content);
        self.render_all();
        true
    }

    // --- selection ---

    /// Make `id` the active object. Ignored for unknown or non-interactive objects.
    pub fn select(&mut self, id: ShapeId) {
        if self.get(id).is_some_and(Drawable::is_interactive) {
            self.selection = Some(id);
        }
    }

    pub fn clear_selection(&mut self) {
        self.selection = None;
    }

    pub fn selected(&self) -> Option<ShapeId> {
        self.selection
    }

    // --- input configuration ---

    /// Replace the whole input configuration.
    ///
    /// Ends any gesture in flight; a half-drawn stroke is discarded.
    pub fn configure_input(&mut self, config: InputConfig) {
        self.input = config;
        self.gesture = Gesture::Idle;
        if !self.input.selection {
            self.selection = None;
        }
    }

    pub fn input(&self) -> &InputConfig {
        &self.input
    }

    /// Install a mouse-down handler.
    pub fn on_mouse_down(&mut self, action: ClickAction) -> Subscription {
        let id = self.next_handler_id;
        self.next_handler_id += 1;
        self.mouse_down_handlers.push((id, action));
        Subscription { id }
    }

    /// Remove the handler behind `subscription`.
    pub fn off(&mut self, subscription: Subscription) {
        self.mouse_down_handlers
            .retain(|(id, _)| *id != subscription.id);
    }

    /// Number of installed mouse-down handlers.
    pub fn mouse_down_handler_count(&self) -> usize {
        self.mouse_down_handlers.len()
    }

    // --- pointer input ---

    /// Primary button pressed at `point`.
    pub fn pointer_down(&mut self, point: Point) -> PointerOutcome {
        if self.input.drawing_mode {
            let Some(brush) = self.input.brush else {
                return PointerOutcome::None;
            };
            let mut stroke = Stroke::new(ShapeStyle::new(brush.color, brush.width));
            stroke.add_point(point);
            self.gesture = Gesture::Drawing(stroke);
            return PointerOutcome::Drawing;
        }

        let target = self.object_at(point);

        let mut inserted = None;
        let actions: Vec<ClickAction> = self.mouse_down_handlers.iter().map(|(_, a)| *a).collect();
        for action in actions {
            match action {
                ClickAction::InsertText if target.is_none() => {
                    let id = self.add(TextBox::placeholder(point));
                    self.selection = Some(id);
                    log::debug!("Inserted text box {id} at ({}, {})", point.x, point.y);
                    inserted = Some(id);
                }
                ClickAction::InsertText => {}
            }
        }
        if let Some(id) = inserted {
            self.render_all();
            return PointerOutcome::TextInserted(id);
        }

        if !self.input.selection {
            return PointerOutcome::None;
        }

        match target {
            Some(id) => {
                self.selection = Some(id);
                self.gesture = Gesture::Moving { id, last: point };
                self.render_all();
                PointerOutcome::Selected(id)
            }
            None => {
                let had_selection = self.selection.take().is_some();
                if had_selection {
                    self.render_all();
                    PointerOutcome::SelectionCleared
                } else {
                    PointerOutcome::None
                }
            }
        }
    }

    /// Pointer moved to `point` (button state is tracked by the gesture).
    pub fn pointer_move(&mut self, point: Point) -> PointerOutcome {
        match &mut self.gesture {
            Gesture::Idle => PointerOutcome::None,
            Gesture::Drawing(stroke) => {
                stroke.add_point(point);
                PointerOutcome::Drawing
            }
            Gesture::Moving { id, last } => {
                let id = *id;
                let delta = point - *last;
                *last = point;
                if let Some(object) = self.get_mut(id) {
                    object.translate(delta);
                }
                self.render_all();
                PointerOutcome::Moved(id)
            }
        }
    }

    /// Primary button released at `point`.
    pub fn pointer_up(&mut self, point: Point) -> PointerOutcome {
        match std::mem::take(&mut self.gesture) {
            Gesture::Drawing(mut stroke) => {
                stroke.add_point(point);
                if stroke.is_degenerate() {
                    return PointerOutcome::None;
                }
                stroke.decimate(Stroke::DECIMATE_TOLERANCE);
                let id = self.add(stroke);
                self.render_all();
                PointerOutcome::StrokeAdded(id)
            }
            Gesture::Moving { .. } | Gesture::Idle => PointerOutcome::None,
        }
    }

    /// Stroke currently being drawn, for live preview.
    pub fn stroke_in_progress(&self) -> Option<&Stroke> {
        match &self.gesture {
            Gesture::Drawing(stroke) => Some(stroke),
            _ => None,
        }
    }

    // --- export support ---

    /// Restack so every grid line sits behind every other object.
    ///
    /// User objects keep their relative order.
    pub(crate) fn raise_non_grid_to_front(&mut self) {
        let (grid, mut others): (Vec<Drawable>, Vec<Drawable>) =
            std::mem::take(&mut self.objects).into_iter().partition(Drawable::is_grid_line);
        self.objects = grid;
        self.objects.append(&mut others);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shapes::GridLine;
    use crate::tools::Brush;

    fn drawing_surface() -> Surface {
        let mut surface = Surface::new(CanvasDimensions::new(400.0, 500.0));
        surface.configure_input(InputConfig {
            drawing_mode: true,
            selection: false,
            brush: Some(Brush::new(Rgba::black(), 6.0)),
        });
        surface
    }

    fn selecting_surface() -> Surface {
        let mut surface = Surface::new(CanvasDimensions::new(400.0, 500.0));
        surface.configure_input(InputConfig {
            drawing_mode: false,
            selection: true,
            brush: None,
        });
        surface
    }

    #[test]
    fn test_viewport_dimensions() {
        let wide = CanvasDimensions::for_viewport(1920.0);
        assert_eq!(wide.width, 800.0);
        assert_eq!(wide.height, 1000.0);

        let narrow = CanvasDimensions::for_viewport(400.0);
        assert!((narrow.width - 380.0).abs() < 1e-9);
        assert!((narrow.height - narrow.width / 0.8).abs() < 1e-9);
    }

    #[test]
    fn test_dimension_validity() {
        assert!(CanvasDimensions::new(10.0, 10.0).is_valid());
        assert!(!CanvasDimensions::new(0.0, 10.0).is_valid());
        assert!(!CanvasDimensions::new(f64::NAN, 10.0).is_valid());
    }

    #[test]
    fn test_resize_sets_exact_dimensions() {
        let mut surface = Surface::new(CanvasDimensions::new(100.0, 125.0));
        let before = surface.revision();
        surface.resize(333.5, 416.875);
        assert_eq!(surface.dimensions(), CanvasDimensions::new(333.5, 416.875));
        assert!(surface.revision() > before);
    }

    #[test]
    fn test_add_remove_keeps_order() {
        let mut surface = Surface::new(CanvasDimensions::new(100.0, 100.0));
        let a = surface.add(TextBox::new(Point::ZERO, "a"));
        let b = surface.add(TextBox::new(Point::ZERO, "b"));
        let c = surface.add(TextBox::new(Point::ZERO, "c"));
        assert_eq!(surface.ids(), vec![a, b, c]);

        let removed = surface.remove(b);
        assert!(removed.is_some());
        assert_eq!(surface.ids(), vec![a, c]);
        assert!(surface.remove(b).is_none());
    }

    #[test]
    fn test_z_order() {
        let mut surface = Surface::new(CanvasDimensions::new(100.0, 100.0));
        let a = surface.add(TextBox::new(Point::ZERO, "a"));
        let b = surface.add(TextBox::new(Point::ZERO, "b"));

        surface.bring_to_front(a);
        assert_eq!(surface.ids(), vec![b, a]);

        surface.send_to_back(a);
        assert_eq!(surface.ids(), vec![a, b]);
    }

    #[test]
    fn test_object_at_prefers_front_and_skips_grid() {
        let mut surface = Surface::new(CanvasDimensions::new(400.0, 400.0));
        surface.add(GridLine::new(Point::new(50.0, 0.0), Point::new(50.0, 400.0)));
        assert_eq!(surface.object_at(Point::new(50.0, 10.0)), None);

        let back = surface.add(TextBox::new(Point::new(0.0, 0.0), "back"));
        let front = surface.add(TextBox::new(Point::new(20.0, 0.0), "front"));
        assert_eq!(surface.object_at(Point::new(30.0, 10.0)), Some(front));
        assert_eq!(surface.object_at(Point::new(5.0, 10.0)), Some(back));
    }

    #[test]
    fn test_freehand_gesture_appends_stroke() {
        let mut surface = drawing_surface();
        assert_eq!(surface.pointer_down(Point::new(10.0, 10.0)), PointerOutcome::Drawing);
        surface.pointer_move(Point::new(20.0, 20.0));
        assert!(surface.stroke_in_progress().is_some());

        let outcome = surface.pointer_up(Point::new(30.0, 25.0));
        let PointerOutcome::StrokeAdded(id) = outcome else {
            panic!("expected a stroke, got {outcome:?}");
        };
        assert_eq!(surface.len(), 1);
        assert!(surface.stroke_in_progress().is_none());

        let Some(Drawable::Stroke(stroke)) = surface.get(id) else {
            panic!("expected stroke");
        };
        assert_eq!(stroke.style.width, 6.0);
        assert_eq!(stroke.style.color, Rgba::black());
        assert_eq!(stroke.points.first(), Some(&Point::new(10.0, 10.0)));
        assert_eq!(stroke.points.last(), Some(&Point::new(30.0, 25.0)));
    }

    #[test]
    fn test_click_in_drawing_mode_adds_nothing() {
        let mut surface = drawing_surface();
        surface.pointer_down(Point::new(10.0, 10.0));
        assert_eq!(surface.pointer_up(Point::new(10.0, 10.0)), PointerOutcome::None);
        assert!(surface.is_empty());
    }

    #[test]
    fn test_text_handler_only_on_empty_canvas() {
        let mut surface = selecting_surface();
        let sub = surface.on_mouse_down(ClickAction::InsertText);

        let outcome = surface.pointer_down(Point::new(100.0, 100.0));
        let PointerOutcome::TextInserted(id) = outcome else {
            panic!("expected insertion, got {outcome:?}");
        };
        assert_eq!(surface.selected(), Some(id));
        surface.pointer_up(Point::new(100.0, 100.0));

        // Pressing on the new text box selects it instead of inserting another.
        assert_eq!(surface.pointer_down(Point::new(110.0, 105.0)), PointerOutcome::Selected(id));
        assert_eq!(surface.len(), 1);

        surface.off(sub);
        assert_eq!(surface.mouse_down_handler_count(), 0);
    }

    #[test]
    fn test_duplicate_handlers_duplicate_text() {
        let mut surface = selecting_surface();
        let first = surface.on_mouse_down(ClickAction::InsertText);
        let second = surface.on_mouse_down(ClickAction::InsertText);
        surface.pointer_down(Point::new(300.0, 300.0));
        assert_eq!(surface.len(), 2);

        surface.off(first);
        surface.off(second);
        assert_eq!(surface.mouse_down_handler_count(), 0);
    }

    #[test]
    fn test_drag_moves_selected_object() {
        let mut surface = selecting_surface();
        let id = surface.add(TextBox::new(Point::new(10.0, 10.0), "x"));

        assert_eq!(surface.pointer_down(Point::new(20.0, 20.0)), PointerOutcome::Selected(id));
        assert_eq!(surface.pointer_move(Point::new(30.0, 50.0)), PointerOutcome::Moved(id));
        surface.pointer_up(Point::new(30.0, 50.0));

        let text = surface.get(id).and_then(Drawable::as_text_box).map(|t| t.position);
        assert_eq!(text, Some(Point::new(20.0, 40.0)));
    }

    #[test]
    fn test_press_on_empty_clears_selection() {
        let mut surface = selecting_surface();
        let id = surface.add(TextBox::new(Point::new(10.0, 10.0), "x"));
        surface.select(id);
        assert_eq!(surface.pointer_down(Point::new(390.0, 490.0)), PointerOutcome::SelectionCleared);
        assert_eq!(surface.selected(), None);
    }

    #[test]
    fn test_set_text() {
        let mut surface = selecting_surface();
        let text = surface.add(TextBox::placeholder(Point::ZERO));
        let stroke = surface.add(Stroke::from_points(vec![Point::ZERO, Point::new(1.0, 1.0)]));

        assert!(surface.set_text(text, "Casa"));
        assert!(!surface.set_text(stroke, "nope"));
        let content = surface.get(text).and_then(Drawable::as_text_box).map(|t| t.content.clone());
        assert_eq!(content.as_deref(), Some("Casa"));
    }

    #[test]
    fn test_clear_empties_everything() {
        let mut surface = selecting_surface();
        let id = surface.add(TextBox::placeholder(Point::ZERO));
        surface.select(id);
        surface.clear();
        assert!(surface.is_empty());
        assert_eq!(surface.selected(), None);
    }

    #[test]
    fn test_raise_non_grid_keeps_relative_order() {
        let mut surface = Surface::new(CanvasDimensions::new(100.0, 100.0));
        let a = surface.add(TextBox::new(Point::ZERO, "a"));
        let g1 = surface.add(GridLine::new(Point::ZERO, Point::new(0.0, 100.0)));
        let b = surface.add(TextBox::new(Point::ZERO, "b"));
        let g2 = surface.add(GridLine::new(Point::ZERO, Point::new(100.0, 0.0)));

        surface.raise_non_grid_to_front();
        assert_eq!(surface.ids(), vec![g1, g2, a, b]);
    }
}
