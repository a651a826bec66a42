//! Platform path helpers.
//!
//! Locations follow the platform conventions reported by the `dirs` crate,
//! with the system temp directory as a last resort when the platform reports
//! no home at all (containers, service accounts).

use std::path::PathBuf;

/// Directory name used under the platform data and config roots.
const APP_DIR: &str = "deepfake-detector";

/// Returns the data directory, used for exported trace files.
///
/// Typically `~/.local/share/deepfake-detector` on Linux.
#[must_use]
pub fn data_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join(APP_DIR)
}

/// Returns the path of the default configuration file.
///
/// Typically `~/.config/deepfake-detector/config.toml` on Linux. The file
/// need not exist.
#[must_use]
pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join(APP_DIR)
        .join("config.toml")
}

/// Expands a leading `~` to the home directory.
///
/// Paths without a tilde, and all paths when no home directory is known, are
/// returned unchanged.
///
/// # Examples
///
/// ```
/// use deepfake_detector::infrastructure::expand_tilde;
///
/// assert_eq!(expand_tilde("/absolute/path"), std::path::PathBuf::from("/absolute/path"));
/// ```
#[must_use]
pub fn expand_tilde(path: &str) -> PathBuf {
    let Some(home) = dirs::home_dir() else {
        return PathBuf::from(path);
    };

    if path == "~" {
        home
    } else if let Some(rest) = path.strip_prefix("~/") {
        home.join(rest)
    } else {
        PathBuf::from(path)
    }
}
