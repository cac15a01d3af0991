//! Tool modes and the controller that applies them to the surface.

use crate::canvas::{ClickAction, Subscription, Surface};
use crate::shapes::Rgba;

/// Brush width used by the pencil.
pub const DRAW_WIDTH: f64 = 6.0;
/// Brush width used by the eraser.
pub const ERASER_WIDTH: f64 = 40.0;

/// Available tool modes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ToolMode {
    #[default]
    Draw,
    Eraser,
    Text,
    Select,
}

impl ToolMode {
    /// Get display name for this mode.
    pub fn name(self) -> &'static str {
        match self {
            ToolMode::Draw => "Draw",
            ToolMode::Eraser => "Eraser",
            ToolMode::Text => "Text",
            ToolMode::Select => "Select",
        }
    }

    /// Input configuration for this mode on a surface painted with `background`.
    pub fn input_config(self, background: Rgba) -> InputConfig {
        match self {
            ToolMode::Draw => InputConfig {
                drawing_mode: true,
                selection: false,
                brush: Some(Brush::new(Rgba::black(), DRAW_WIDTH)),
            },
            // Visual erase: paints with the background instead of removing objects.
            ToolMode::Eraser => InputConfig {
                drawing_mode: true,
                selection: false,
                brush: Some(Brush::new(background, ERASER_WIDTH)),
            },
            ToolMode::Text | ToolMode::Select => InputConfig {
                drawing_mode: false,
                selection: true,
                brush: None,
            },
        }
    }
}

/// Freehand brush settings.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Brush {
    pub color: Rgba,
    pub width: f64,
}

impl Brush {
    pub fn new(color: Rgba, width: f64) -> Self {
        Self { color, width }
    }
}

/// How the surface interprets pointer input.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct InputConfig {
    /// Pointer drags paint freehand strokes.
    pub drawing_mode: bool,
    /// Pointer presses select (and drag) objects.
    pub selection: bool,
    /// Brush for freehand strokes; `None` outside drawing modes.
    pub brush: Option<Brush>,
}

/// Tracks the active mode and owns the text-insertion subscription.
#[derive(Debug, Default)]
pub struct ToolController {
    mode: ToolMode,
    text_click: Option<Subscription>,
}

impl ToolController {
    /// Create a controller in Draw mode.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mode(&self) -> ToolMode {
        self.mode
    }

    /// Record a mode without touching any surface.
    ///
    /// Used while no surface exists; [`ToolController::apply`] configures it later.
    pub fn set_pending(&mut self, mode: ToolMode) {
        self.mode = mode;
    }

    /// Switch to `mode` and reconfigure `surface` for it.
    pub fn enter(&mut self, surface: &mut Surface, mode: ToolMode) {
        if self.mode != mode {
            log::debug!("Tool mode {} -> {}", self.mode.name(), mode.name());
        }
        self.mode = mode;
        self.apply(surface);
    }

    /// Configure `surface` for the current mode.
    ///
    /// The previous text-click subscription is always released before a new
    /// one is installed, so at most one is ever attached.
    pub fn apply(&mut self, surface: &mut Surface) {
        if let Some(subscription) = self.text_click.take() {
            surface.off(subscription);
        }

        surface.configure_input(self.mode.input_config(surface.background()));

        if self.mode == ToolMode::Text {
            self.text_click = Some(surface.on_mouse_down(ClickAction::InsertText));
        }

        surface.render_all();
    }

    /// Forget the subscription of a surface that is being discarded.
    pub fn detach(&mut self) {
        self.text_click = None;
    }

    /// Text ↔ Draw.
    pub fn toggle_text(&self) -> ToolMode {
        if self.mode == ToolMode::Text {
            ToolMode::Draw
        } else {
            ToolMode::Text
        }
    }

    /// Eraser ↔ Draw.
    pub fn toggle_eraser(&self) -> ToolMode {
        if self.mode == ToolMode::Eraser {
            ToolMode::Draw
        } else {
            ToolMode::Eraser
        }
    }

    /// Whether the text-insertion handler is currently installed.
    pub fn has_text_subscription(&self) -> bool {
        self.text_click.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::CanvasDimensions;

    fn surface() -> Surface {
        Surface::new(CanvasDimensions::new(400.0, 500.0))
    }

    #[test]
    fn test_default_mode() {
        let tools = ToolController::new();
        assert_eq!(tools.mode(), ToolMode::Draw);
        assert!(!tools.has_text_subscription());
    }

    #[test]
    fn test_draw_config() {
        let mut surface = surface();
        let mut tools = ToolController::new();
        tools.enter(&mut surface, ToolMode::Draw);

        let input = surface.input();
        assert!(input.drawing_mode);
        assert!(!input.selection);
        assert_eq!(input.brush, Some(Brush::new(Rgba::black(), 6.0)));
    }

    #[test]
    fn test_eraser_uses_background() {
        let mut surface = surface();
        surface.set_background(Rgba::new(250, 240, 230, 255));
        let mut tools = ToolController::new();
        tools.enter(&mut surface, ToolMode::Eraser);

        let brush = surface.input().brush.expect("eraser brush");
        assert_eq!(brush.width, 40.0);
        assert_eq!(brush.color, surface.background());
        assert!(!surface.input().selection);
    }

    #[test]
    fn test_text_and_select_config() {
        let mut surface = surface();
        let mut tools = ToolController::new();

        tools.enter(&mut surface, ToolMode::Text);
        assert!(!surface.input().drawing_mode);
        assert!(surface.input().selection);
        assert_eq!(surface.mouse_down_handler_count(), 1);

        tools.enter(&mut surface, ToolMode::Select);
        assert!(!surface.input().drawing_mode);
        assert!(surface.input().selection);
        assert_eq!(surface.input().brush, None);
        assert_eq!(surface.mouse_down_handler_count(), 0);
    }

    #[test]
    fn test_reentering_text_keeps_single_handler() {
        let mut surface = surface();
        let mut tools = ToolController::new();
        for _ in 0..5 {
            tools.enter(&mut surface, ToolMode::Text);
            assert_eq!(surface.mouse_down_handler_count(), 1);
        }
    }

    #[test]
    fn test_every_transition_sequence_keeps_invariant() {
        let modes = [ToolMode::Draw, ToolMode::Eraser, ToolMode::Text, ToolMode::Select];
        let mut surface = surface();
        let mut tools = ToolController::new();

        // All ordered sequences of length 3 over the four modes.
        for a in modes {
            for b in modes {
                for c in modes {
                    for mode in [a, b, c] {
                        tools.enter(&mut surface, mode);
                        let expected = usize::from(mode == ToolMode::Text);
                        assert_eq!(surface.mouse_down_handler_count(), expected);
                        assert_eq!(tools.has_text_subscription(), mode == ToolMode::Text);
                    }
                }
            }
        }
    }

    #[test]
    fn test_toggles() {
        let mut surface = surface();
        let mut tools = ToolController::new();

        assert_eq!(tools.toggle_text(), ToolMode::Text);
        tools.enter(&mut surface, ToolMode::Text);
        assert_eq!(tools.toggle_text(), ToolMode::Draw);
        assert_eq!(tools.toggle_eraser(), ToolMode::Eraser);

        tools.enter(&mut surface, ToolMode::Eraser);
        assert_eq!(tools.toggle_eraser(), ToolMode::Draw);
        assert_eq!(tools.toggle_text(), ToolMode::Text);
    }
}
