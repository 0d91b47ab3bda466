//! Local photo library scanning.

use std::fs;
use std::path::{Path, PathBuf};

use crate::logger::{Log, LogLevel};

const SUPPORTED_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg"];

/// Whether a path has one of the displayable image extensions (case insensitive).
pub fn is_supported_image(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| {
            SUPPORTED_EXTENSIONS
                .iter()
                .any(|supported| ext.eq_ignore_ascii_case(supported))
        })
}

/// Return a sorted list of the image files directly inside `dir`.
///
/// A missing or empty directory is not an error: it yields an empty list and a
/// warning, and the frame shows its "no images" state.
pub fn load_photos(dir: &Path) -> Vec<PathBuf> {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) => {
            Log::log_widget(
                LogLevel::Warn,
                "photos",
                &format!("Cannot read photos directory {}: {}", dir.display(), e),
            );
            return Vec::new();
        }
    };

    let mut photos: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| path.is_file() && is_supported_image(path))
        .collect();
    photos.sort();

    if photos.is_empty() {
        Log::log_widget(
            LogLevel::Warn,
            "photos",
            &format!("No supported images found in {}", dir.display()),
        );
    }

    photos
}
