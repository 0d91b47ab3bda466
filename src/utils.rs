//! Path helpers shared across the codebase.

use std::path::{Path, PathBuf};

/// Expand a leading `~` to the home directory.
///
/// # Examples
/// ```
/// use photoframe::utils::expand_tilde;
/// assert_eq!(expand_tilde("/srv/photos"), std::path::PathBuf::from("/srv/photos"));
/// ```
pub fn expand_tilde(path: &str) -> PathBuf {
    if path == "~" {
        if let Some(home) = dirs::home_dir() {
            return home;
        }
    } else if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(rest);
        }
    }
    PathBuf::from(path)
}

/// Show a path the way a user would type it, with the home directory as `~`.
pub fn path_for_display(path: &Path) -> String {
    if let Some(home) = dirs::home_dir() {
        if let Ok(rest) = path.strip_prefix(&home) {
            if rest.as_os_str().is_empty() {
                return "~".to_string();
            }
            return format!("~/{}", rest.display());
        }
    }
    path.display().to_string()
}
