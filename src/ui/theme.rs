//! Theme management and ANSI escape sequence generation.
//!
//! Two themes are built in (`midnight`, the default, and `daylight`); custom
//! themes load from TOML files with the same shape:
//!
//! ```toml
//! name = "my-theme"
//!
//! [colors]
//! header_fg = "#06b6d4"
//! text_normal = "#e2e8f0"
//! text_dim = "#94a3b8"
//! border = "#334155"
//! alert = "#ef4444"
//! authentic = "#22c55e"
//! warning = "#f59e0b"
//! accent = "#06b6d4"
//! ```
//!
//! # Example
//!
//! ```rust
//! use deepfake_detector::ui::Theme;
//!
//! let theme = Theme::from_name("daylight").unwrap();
//! let line = format!("{}Bold{}", Theme::bold(), Theme::reset());
//! assert!(line.starts_with("\u{1b}[1m"));
//! assert_eq!(theme.name, "daylight");
//! ```

use crate::domain::{DetectorError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Name of the theme used when none is configured.
pub const DEFAULT_THEME: &str = "midnight";

/// Color scheme configuration for UI rendering.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Theme {
    /// Human-readable theme name.
    pub name: String,
    /// Color palette.
    pub colors: ThemeColors,
}

/// Color definitions, as hex strings (e.g. `"#06b6d4"`).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ThemeColors {
    /// Header text color.
    pub header_fg: String,
    /// Optional header background color.
    #[serde(default)]
    pub header_bg: Option<String>,

    /// Normal text color.
    pub text_normal: String,
    /// Secondary text (descriptions, footer).
    pub text_dim: String,

    /// Separator line color.
    pub border: String,

    /// Manipulated verdicts, failures and alert notifications.
    pub alert: String,
    /// Authentic verdicts.
    pub authentic: String,
    /// High feature values and warning notifications.
    pub warning: String,
    /// Progress bars and the analyze button.
    pub accent: String,
}

impl Theme {
    /// Loads a built-in theme by name.
    ///
    /// Returns `None` for unknown names.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        let toml_str = match name {
            "midnight" => include_str!("../../themes/midnight.toml"),
            "daylight" => include_str!("../../themes/daylight.toml"),
            _ => return None,
        };

        toml::from_str(toml_str).ok()
    }

    /// Loads a theme from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns [`DetectorError::Io`] if the file cannot be read and
    /// [`DetectorError::Config`] if it does not parse as a theme.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = fs::read_to_string(path)?;

        toml::from_str(&contents)
            .map_err(|e| DetectorError::Config(format!("failed to parse theme TOML: {e}")))
    }

    /// Palette with no hues at all, used if the built-in default is missing.
    fn monochrome() -> Self {
        let white = "#ffffff".to_string();
        Self {
            name: "monochrome".to_string(),
            colors: ThemeColors {
                header_fg: white.clone(),
                header_bg: None,
                text_normal: white.clone(),
                text_dim: "#a0a0a0".to_string(),
                border: "#606060".to_string(),
                alert: white.clone(),
                authentic: white.clone(),
                warning: white.clone(),
                accent: white,
            },
        }
    }

    /// Converts a hex color to RGB; malformed input yields white.
    fn hex_to_rgb(hex: &str) -> (u8, u8, u8) {
        let hex = hex.trim_start_matches('#').trim();

        if hex.len() != 6 || !hex.is_ascii() {
            return (255, 255, 255);
        }

        let r = u8::from_str_radix(&hex[0..2], 16).unwrap_or(255);
        let g = u8::from_str_radix(&hex[2..4], 16).unwrap_or(255);
        let b = u8::from_str_radix(&hex[4..6], 16).unwrap_or(255);

        (r, g, b)
    }

    /// ANSI 24-bit foreground escape for a hex color (`\x1b[38;2;r;g;bm`).
    #[must_use]
    pub fn fg(hex: &str) -> String {
        let (r, g, b) = Self::hex_to_rgb(hex);
        format!("\u{001b}[38;2;{r};{g};{b}m")
    }

    /// ANSI 24-bit background escape for a hex color (`\x1b[48;2;r;g;bm`).
    #[must_use]
    pub fn bg(hex: &str) -> String {
        let (r, g, b) = Self::hex_to_rgb(hex);
        format!("\u{001b}[48;2;{r};{g};{b}m")
    }

    /// ANSI bold (`\x1b[1m`).
    #[must_use]
    pub const fn bold() -> &'static str {
        "\u{001b}[1m"
    }

    /// ANSI dim (`\x1b[2m`).
    #[must_use]
    pub const fn dim() -> &'static str {
        "\u{001b}[2m"
    }

    /// ANSI reset (`\x1b[0m`), clearing all styling.
    #[must_use]
    pub const fn reset() -> &'static str {
        "\u{001b}[0m"
    }
}

impl Default for Theme {
    /// Returns the `midnight` theme.
    fn default() -> Self {
        Self::from_name(DEFAULT_THEME).unwrap_or_else(Self::monochrome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn built_in_themes_parse() {
        for name in ["midnight", "daylight"] {
            let theme = Theme::from_name(name).unwrap_or_else(|| panic!("{name} missing"));
            assert_eq!(theme.name, name);
        }
        assert!(Theme::from_name("solarized").is_none());
    }

    #[test]
    fn default_is_midnight() {
        let theme = Theme::default();
        assert_eq!(theme.name, DEFAULT_THEME);
        assert!(theme.colors.header_bg.is_none());
    }

    #[test]
    fn hex_conversion() {
        assert_eq!(Theme::fg("#06b6d4"), "\u{1b}[38;2;6;182;212m");
        assert_eq!(Theme::bg("ef4444"), "\u{1b}[48;2;239;68;68m");
        assert_eq!(Theme::fg("nope"), "\u{1b}[38;2;255;255;255m");
    }

    #[test]
    fn loads_custom_theme_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        let custom = toml::to_string(&Theme::monochrome()).unwrap();
        file.write_all(custom.as_bytes()).unwrap();

        let theme = Theme::from_file(file.path()).unwrap();
        assert_eq!(theme, Theme::monochrome());
    }

    #[test]
    fn malformed_theme_file_is_config_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"name = 3").unwrap();

        assert!(matches!(
            Theme::from_file(file.path()),
            Err(DetectorError::Config(_))
        ));
    }
}
