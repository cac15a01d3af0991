//! Writing exported images to disk.

use croqui_core::export::ExportedImage;
use std::fs;
use std::path::{Path, PathBuf};

/// Directory exports land in when none is configured.
pub fn default_download_dir() -> PathBuf {
    dirs::download_dir()
        .or_else(dirs::home_dir)
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Write `image` into `dir` under its own file name, replacing any previous file.
pub fn download(image: &ExportedImage, dir: &Path) -> std::io::Result<PathBuf> {
    if !dir.exists() {
        fs::create_dir_all(dir)?;
    }
    let path = dir.join(sanitize_file_name(&image.file_name));
    fs::write(&path, &image.image.png)?;
    log::info!("Saved {} ({} bytes)", path.display(), image.image.png.len());
    Ok(path)
}

/// Keep a download name inside its directory.
fn sanitize_file_name(name: &str) -> String {
    let safe: String = name
        .chars()
        .map(|c| if matches!(c, '/' | '\\' | ':') { '_' } else { c })
        .collect();
    if safe.is_empty() || safe == "." || safe == ".." {
        "croqui.png".to_string()
    } else {
        safe
    }
}
