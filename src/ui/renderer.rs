//! Top-level rendering coordinator.
//!
//! Rendering is two steps:
//!
//! 1. **View Model Computation**: `Session` → `UIViewModel`
//! 2. **Component Rendering**: `UIViewModel` → ANSI text
//!
//! # Example
//!
//! ```rust
//! use deepfake_detector::app::Session;
//! use deepfake_detector::ui::{render_to_string, Theme};
//!
//! let session = Session::new(10 * 1024 * 1024, Theme::default());
//! let screen = render_to_string(&session, 80);
//! assert!(screen.contains("No Analysis Yet"));
//! ```

use crate::app::{Notification, Session, Severity};
use crate::ui::components;
use crate::ui::theme::Theme;

/// Renders the session to ANSI-styled text `cols` columns wide.
#[must_use]
pub fn render_to_string(session: &Session, cols: usize) -> String {
    let viewmodel = session.compute_viewmodel();
    components::render_screen(&viewmodel, &session.theme, cols)
}

/// Renders the session to stdout.
pub fn render(session: &Session, cols: usize) {
    print!("{}", render_to_string(session, cols));
}

/// Formats a notification as one styled line.
///
/// The tag and color follow the severity: `info` in the authentic color,
/// `warning` in the warning color, `alert` in the alert color.
#[must_use]
pub fn render_notification(notification: &Notification, theme: &Theme) -> String {
    let (tag, color) = match notification.severity {
        Severity::Info => ("info", &theme.colors.authentic),
        Severity::Warning => ("warning", &theme.colors.warning),
        Severity::Alert => ("alert", &theme.colors.alert),
    };

    format!(
        "{}{}[{tag}] {}{} {}{}{}",
        Theme::bold(),
        Theme::fg(color),
        notification.title,
        Theme::reset(),
        Theme::fg(&theme.colors.text_normal),
        notification.description,
        Theme::reset()
    )
}
