//! Croqui Fácil application
//!
//! Window, toolbar and live canvas on top of `croqui-core`, with PNG export
//! through `croqui-render`.

mod app;
mod file_ops;
mod ui;

pub use app::{AppConfig, AppError, AppResult, CroquiApp, run};
pub use file_ops::{default_download_dir, download};
pub use ui::UiAction;
