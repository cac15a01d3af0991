//! Main application state and the eframe frame loop.

use crate::file_ops;
use crate::ui::{self, UiAction};
use croqui_core::canvas::{CanvasDimensions, PointerOutcome};
use croqui_core::shapes::{ShapeId, TextBox};
use croqui_core::sketch::Sketch;
use croqui_render::SkiaRasterizer;
use kurbo::Point;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Application errors.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid config: {0}")]
    Json(#[from] serde_json::Error),
}

pub type AppResult<T> = Result<T, AppError>;

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub title: String,
    pub window_width: f32,
    pub window_height: f32,
    /// Where `croqui.png` is written. Falls back to the user's downloads folder.
    pub download_dir: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            title: "Croqui Fácil".to_string(),
            window_width: 900.0,
            window_height: 1100.0,
            download_dir: None,
        }
    }
}

impl AppConfig {
    /// `<config_dir>/croqui/config.json`, when the platform has a config dir.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("croqui").join("config.json"))
    }

    pub fn from_json(json: &str) -> AppResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read the config at `path`. A missing file yields the defaults.
    pub fn load_from(path: &Path) -> AppResult<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Load from the default location, logging and falling back to defaults on error.
    pub fn load() -> Self {
        let Some(path) = Self::default_path() else {
            return Self::default();
        };
        match Self::load_from(&path) {
            Ok(config) => {
                log::debug!("Config loaded from {}", path.display());
                config
            }
            Err(e) => {
                log::warn!("Ignoring config {}: {e}", path.display());
                Self::default()
            }
        }
    }

    pub fn download_dir(&self) -> PathBuf {
        self.download_dir
            .clone()
            .unwrap_or_else(file_ops::default_download_dir)
    }
}

/// Pointer state sampled once per frame.
#[derive(Debug, Clone, Copy, Default)]
struct PointerFrame {
    pressed: bool,
    released: bool,
    moved: bool,
    /// The press landed on the canvas.
    inside: bool,
    /// Pointer position in canvas coordinates.
    point: Option<Point>,
}

/// Text box being edited in the side panel.
struct TextEditState {
    id: ShapeId,
    buffer: String,
}

/// Main application struct.
pub struct CroquiApp {
    config: AppConfig,
    sketch: Sketch,
    rasterizer: SkiaRasterizer,
    /// A press started on the canvas and has not been released yet.
    pointer_held: bool,
    last_point: Point,
    text_edit: Option<TextEditState>,
    status: Option<String>,
}

impl CroquiApp {
    pub fn new(config: AppConfig) -> Self {
        Self {
            config,
            sketch: Sketch::new(),
            rasterizer: SkiaRasterizer::new(),
            pointer_held: false,
            last_point: Point::ZERO,
            text_edit: None,
            status: None,
        }
    }

    fn handle_action(&mut self, action: UiAction) {
        log::debug!("Toolbar action {action:?}");
        match action {
            UiAction::ToggleText => self.sketch.toggle_text(),
            UiAction::ToggleEraser => self.sketch.toggle_eraser(),
            UiAction::ClearAll => self.sketch.clear_all(),
            UiAction::Save => self.save(),
        }
        self.drop_stale_text_edit();
    }

    /// Close the side panel once its text box is no longer selected.
    fn drop_stale_text_edit(&mut self) {
        let selected = self.sketch.surface().and_then(|s| s.selected());
        if self.text_edit.as_ref().is_some_and(|edit| Some(edit.id) != selected) {
            self.text_edit = None;
        }
    }

    fn save(&mut self) {
        let Some(image) = self.sketch.save(&mut self.rasterizer) else {
            self.status = Some("Não foi possível salvar o croqui".to_string());
            return;
        };
        let dir = self.config.download_dir();
        self.status = match file_ops::download(&image, &dir) {
            Ok(path) => Some(format!("Salvo em {}", path.display())),
            Err(e) => {
                log::error!("Writing {} failed: {}", image.file_name, AppError::from(e));
                Some("Não foi possível salvar o croqui".to_string())
            }
        };
    }

    /// Mount on the first frame, resize whenever the viewport-derived size changes.
    fn sync_dimensions(&mut self, available_width: f32) -> Option<CanvasDimensions> {
        let wanted = CanvasDimensions::for_viewport(available_width as f64);
        match self.sketch.surface().map(|s| s.dimensions()) {
            Some(current) if current == wanted => {}
            Some(_) => self.sketch.resize(wanted.width, wanted.height),
            None => {
                if let Err(e) = self.sketch.mount(wanted) {
                    log::warn!("Canvas not mounted: {e}");
                    return None;
                }
            }
        }
        self.sketch.surface().map(|s| s.dimensions())
    }

    fn canvas(&mut self, ui: &mut egui::Ui) {
        let Some(dims) = self.sync_dimensions(ui.available_width()) else {
            return;
        };
        let size = egui::vec2(dims.width as f32, dims.height as f32);
        let (response, painter) = ui.allocate_painter(size, egui::Sense::click_and_drag());
        let rect = response.rect;

        let frame = ui.input(|i| {
            let pos = i.pointer.interact_pos();
            PointerFrame {
                pressed: i.pointer.primary_pressed(),
                released: i.pointer.primary_released(),
                moved: i.pointer.delta() != egui::Vec2::ZERO,
                inside: pos.is_some_and(|p| rect.contains(p)),
                point: pos.map(|p| ui::to_canvas(rect.min, p)),
            }
        });
        self.handle_pointer(frame);

        if let Some(surface) = self.sketch.surface() {
            ui::paint_surface(&painter, rect, surface);
        }
    }

    /// Feed one frame of pointer input to the sketch.
    ///
    /// Press, move and release are handled in that order and independently,
    /// so a click that starts and ends within one frame still closes its gesture.
    fn handle_pointer(&mut self, frame: PointerFrame) {
        if let Some(point) = frame.point {
            self.last_point = point;
        }
        let point = self.last_point;

        if frame.pressed && frame.inside {
            self.pointer_held = true;
            let outcome = self.sketch.pointer_down(point);
            self.on_outcome(outcome);
        }
        if self.pointer_held && frame.moved {
            self.sketch.pointer_move(point);
        }
        if self.pointer_held && frame.released {
            self.pointer_held = false;
            let outcome = self.sketch.pointer_up(point);
            self.on_outcome(outcome);
        }
    }

    fn on_outcome(&mut self, outcome: PointerOutcome) {
        match outcome {
            PointerOutcome::TextInserted(id) | PointerOutcome::Selected(id) => self.begin_text_edit(id),
            PointerOutcome::SelectionCleared => self.text_edit = None,
            _ => {}
        }
    }

    fn begin_text_edit(&mut self, id: ShapeId) {
        let content = self
            .sketch
            .surface()
            .and_then(|s| s.get(id))
            .and_then(|object| object.as_text_box())
            .map(|text| text.content().to_string());
        self.text_edit = content.map(|buffer| TextEditState { id, buffer });
    }

    fn text_panel(&mut self, ctx: &egui::Context) {
        let Some(edit) = self.text_edit.as_mut() else {
            return;
        };
        let mut changed = false;
        let mut close = false;
        egui::SidePanel::right("text_panel").show(ctx, |ui| {
            ui.heading("Texto");
            let input = egui::TextEdit::multiline(&mut edit.buffer)
                .hint_text(TextBox::PLACEHOLDER)
                .desired_rows(4);
            changed = ui.add(input).changed();
            close = ui.button("Concluir").clicked();
        });
        if changed {
            let (id, content) = (edit.id, edit.buffer.clone());
            self.sketch.edit_text(id, &content);
        }
        if close {
            self.text_edit = None;
        }
    }
}

impl eframe::App for CroquiApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.text_panel(ctx);

        egui::CentralPanel::default().show(ctx, |ui| {
            if let Some(action) = ui::render_toolbar(ui, self.sketch.mode()) {
                self.handle_action(action);
            }
            if let Some(status) = &self.status {
                ui.label(status);
            }
            ui.add_space(8.0);
            egui::ScrollArea::vertical().show(ui, |ui| self.canvas(ui));
        });
    }
}

/// Open the window and run the frame loop until it is closed.
pub fn run(config: AppConfig) -> Result<(), eframe::Error> {
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title(config.title.clone())
            .with_inner_size([config.window_width, config.window_height]),
        ..Default::default()
    };
    let title = config.title.clone();
    eframe::run_native(
        &title,
        options,
        Box::new(|_cc| Ok(Box::new(CroquiApp::new(config)))),
    )
}
