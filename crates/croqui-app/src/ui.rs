//! Toolbar and canvas painting.

use croqui_core::canvas::Surface;
use croqui_core::shapes::{Drawable, Rgba, ShapeTrait, Stroke, TextBox};
use croqui_core::tools::ToolMode;
use egui::{Align2, Color32, FontId, Painter, Pos2, Rect, Stroke as EguiStroke, StrokeKind, vec2};
use kurbo::Point;

/// Spacing of the backdrop grid painted behind the live canvas.
const BACKDROP_GRID: f64 = 40.0;

/// Actions that can be triggered from the toolbar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiAction {
    /// Text ↔ Draw.
    ToggleText,
    /// Eraser ↔ Draw.
    ToggleEraser,
    /// Export `croqui.png`.
    Save,
    /// Remove everything and go back to Draw.
    ClearAll,
}

/// One toolbar button.
struct ToolbarButton {
    label: &'static str,
    action: UiAction,
    /// Mode this button toggles (highlighted while active).
    mode: Option<ToolMode>,
    fill: Color32,
    active_fill: Color32,
    text: Color32,
}

const TOOLBAR: [ToolbarButton; 4] = [
    ToolbarButton {
        label: "🅣 Inserir Texto",
        action: UiAction::ToggleText,
        mode: Some(ToolMode::Text),
        fill: Color32::from_rgb(0x00, 0x7b, 0xff),
        active_fill: Color32::from_rgb(0x17, 0xa2, 0xb8),
        text: Color32::WHITE,
    },
    ToolbarButton {
        label: "🧽 Borracha",
        action: UiAction::ToggleEraser,
        mode: Some(ToolMode::Eraser),
        fill: Color32::from_rgb(0xff, 0xc1, 0x07),
        active_fill: Color32::from_rgb(0xff, 0xcd, 0x39),
        text: Color32::from_rgb(0x33, 0x33, 0x33),
    },
    ToolbarButton {
        label: "💾 Salvar Croqui",
        action: UiAction::Save,
        mode: None,
        fill: Color32::from_rgb(0x28, 0xa7, 0x45),
        active_fill: Color32::from_rgb(0x28, 0xa7, 0x45),
        text: Color32::WHITE,
    },
    ToolbarButton {
        label: "🗑 Limpar Tudo",
        action: UiAction::ClearAll,
        mode: None,
        fill: Color32::from_rgb(0xdc, 0x35, 0x45),
        active_fill: Color32::from_rgb(0xdc, 0x35, 0x45),
        text: Color32::WHITE,
    },
];

/// Fill color of a toolbar button for the current mode.
fn button_fill(button: &ToolbarButton, mode: ToolMode) -> Color32 {
    if button.mode == Some(mode) {
        button.active_fill
    } else {
        button.fill
    }
}

/// Render the toolbar. Returns the action of the clicked button, if any.
pub fn render_toolbar(ui: &mut egui::Ui, mode: ToolMode) -> Option<UiAction> {
    let mut action = None;
    ui.horizontal_wrapped(|ui| {
        for button in &TOOLBAR {
            let label = egui::RichText::new(button.label)
                .size(18.0)
                .strong()
                .color(button.text);
            let widget = egui::Button::new(label)
                .fill(button_fill(button, mode))
                .min_size(vec2(140.0, 48.0));
            if ui.add(widget).clicked() {
                action = Some(button.action);
            }
        }
    });
    action
}

pub fn to_color32(color: Rgba) -> Color32 {
    Color32::from_rgba_unmultiplied(color.r, color.g, color.b, color.a)
}

/// Canvas point to screen position.
pub fn to_screen(origin: Pos2, point: Point) -> Pos2 {
    origin + vec2(point.x as f32, point.y as f32)
}

/// Screen position to canvas point.
pub fn to_canvas(origin: Pos2, pos: Pos2) -> Point {
    let offset = pos - origin;
    Point::new(offset.x as f64, offset.y as f64)
}

/// Paint the surface (background, backdrop grid, objects, selection) into `rect`.
pub fn paint_surface(painter: &Painter, rect: Rect, surface: &Surface) {
    let origin = rect.min;
    painter.rect_filled(rect, 0.0, Color32::WHITE);
    painter.rect_filled(rect, 0.0, to_color32(surface.background()));
    paint_backdrop_grid(painter, rect);

    for object in surface.objects() {
        match object {
            Drawable::Stroke(stroke) => paint_stroke(painter, origin, stroke),
            Drawable::TextBox(text) => paint_text(painter, origin, text),
            Drawable::GridLine(line) => {
                let stroke = EguiStroke::new(line.style.width as f32, to_color32(line.style.color));
                painter.line_segment([to_screen(origin, line.start), to_screen(origin, line.end)], stroke);
            }
        }
    }

    if let Some(stroke) = surface.stroke_in_progress() {
        paint_stroke(painter, origin, stroke);
    }

    if let Some(object) = surface.selected().and_then(|id| surface.get(id)) {
        let bounds = object.bounds();
        let selection = Rect::from_min_max(
            to_screen(origin, Point::new(bounds.x0, bounds.y0)),
            to_screen(origin, Point::new(bounds.x1, bounds.y1)),
        );
        painter.rect_stroke(
            selection,
            0.0,
            EguiStroke::new(1.0, Color32::from_rgb(59, 130, 246)),
            StrokeKind::Outside,
        );
    }
}

/// Faint squared-paper backdrop; display only, never part of the drawing.
fn paint_backdrop_grid(painter: &Painter, rect: Rect) {
    let stroke = EguiStroke::new(1.0, Color32::from_rgba_unmultiplied(0, 0, 0, 13));
    let mut x = BACKDROP_GRID as f32;
    while x < rect.width() {
        painter.line_segment([rect.min + vec2(x, 0.0), rect.min + vec2(x, rect.height())], stroke);
        x += BACKDROP_GRID as f32;
    }
    let mut y = BACKDROP_GRID as f32;
    while y < rect.height() {
        painter.line_segment([rect.min + vec2(0.0, y), rect.min + vec2(rect.width(), y)], stroke);
        y += BACKDROP_GRID as f32;
    }
}

fn paint_stroke(painter: &Painter, origin: Pos2, stroke: &Stroke) {
    let color = to_color32(stroke.style.color);
    let width = stroke.style.width as f32;
    let points: Vec<Pos2> = stroke.points.iter().map(|p| to_screen(origin, *p)).collect();

    // Round caps and joins, like the exported image.
    for point in &points {
        painter.circle_filled(*point, width / 2.0, color);
    }
    if points.len() >= 2 {
        painter.add(egui::Shape::line(points, EguiStroke::new(width, color)));
    }
}

fn paint_text(painter: &Painter, origin: Pos2, text: &TextBox) {
    let color = to_color32(text.style.color);
    let font = FontId::proportional(text.font_size as f32);
    for (i, line) in text.lines().into_iter().enumerate() {
        let top = Point::new(text.position.x, text.position.y + i as f64 * text.line_height());
        painter.text(to_screen(origin, top), Align2::LEFT_TOP, line, font.clone(), color);
    }
    if text.content().is_empty() {
        let bounds = text.bounds();
        let outline = Rect::from_min_size(
            to_screen(origin, Point::new(bounds.x0, bounds.y0)),
            vec2(bounds.width() as f32, bounds.height() as f32),
        );
        painter.rect_stroke(outline, 0.0, EguiStroke::new(1.0, Color32::LIGHT_GRAY), StrokeKind::Inside);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_active_button_fill() {
        let text_button = &TOOLBAR[0];
        assert_eq!(button_fill(text_button, ToolMode::Text), text_button.active_fill);
        assert_eq!(button_fill(text_button, ToolMode::Draw), text_button.fill);

        let save = &TOOLBAR[2];
        assert_eq!(button_fill(save, ToolMode::Eraser), save.fill);
    }

    #[test]
    fn test_toolbar_actions() {
        let actions: Vec<UiAction> = TOOLBAR.iter().map(|b| b.action).collect();
        assert_eq!(
            actions,
            vec![UiAction::ToggleText, UiAction::ToggleEraser, UiAction::Save, UiAction::ClearAll]
        );
    }

    #[test]
    fn test_coordinate_round_trip() {
        let origin = Pos2::new(12.0, 34.0);
        let point = Point::new(100.0, 100.0);
        let screen = to_screen(origin, point);
        assert_eq!(screen, Pos2::new(112.0, 134.0));
        assert_eq!(to_canvas(origin, screen), point);
    }

    #[test]
    fn test_color_conversion() {
        assert_eq!(to_color32(Rgba::black()), Color32::BLACK);
        assert_eq!(to_color32(Rgba::white()), Color32::WHITE);
    }
}
