use std::fs;
use std::path::{Path, PathBuf};

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use chrono::Local;
use tracing::info;

use crate::error::ExportError;
use crate::protocol::ImageSource;

/// Decode the displayed image and write it as a timestamped PNG under `dir`.
pub fn save_image(source: &ImageSource, dir: &Path) -> Result<PathBuf, ExportError> {
    let payload = source.payload().ok_or(ExportError::NoImage)?;
    let bytes = STANDARD.decode(payload)?;

    fs::create_dir_all(dir)?;
    let path = unique_path(dir, &Local::now().format("image-%Y%m%d-%H%M%S").to_string());
    fs::write(&path, &bytes)?;

    info!(path = %path.display(), bytes = bytes.len(), "saved image");
    Ok(path)
}

fn unique_path(dir: &Path, stem: &str) -> PathBuf {
    let first = dir.join(format!("{stem}.png"));
    if !first.exists() {
        return first;
    }
    (1..)
        .map(|n| dir.join(format!("{stem}-{n}.png")))
        .find(|p| !p.exists())
        .unwrap_or(first)
}
