//! Composable UI component renderers.
//!
//! Each component appends its lines to a `String` buffer and ends every line
//! with a newline, so the assembled screen can be printed at once or inspected
//! in tests.
//!
//! # Components
//!
//! - [`header`]: Title and tagline
//! - [`upload`]: Selected file and the analyze button
//! - [`panel`]: Empty, loading, result, or failure panel
//! - [`footer`]: Disclaimer
//!
//! # Layout
//!
//! ```text
//! [Header]
//! [Border]
//! [Upload card]
//! [Border]
//! [Panel]
//! [Border]
//! [Footer]
//! ```

mod footer;
mod header;
mod panel;
mod upload;

use crate::ui::theme::Theme;
use crate::ui::viewmodel::UIViewModel;
use std::fmt::Write;

use footer::render_footer;
use header::render_header;
use panel::render_panel;
use upload::render_upload;

/// Appends a horizontal separator.
fn render_border(out: &mut String, color: &str, cols: usize) {
    let _ = writeln!(out, "{}{}{}", Theme::fg(color), "─".repeat(cols), Theme::reset());
}

/// Renders the full screen for a view model.
#[must_use]
pub fn render_screen(vm: &UIViewModel, theme: &Theme, cols: usize) -> String {
    let mut out = String::new();

    render_header(&mut out, &vm.header, theme, cols);
    render_border(&mut out, &theme.colors.border, cols);
    render_upload(&mut out, &vm.upload, theme, cols);
    render_border(&mut out, &theme.colors.border, cols);
    render_panel(&mut out, &vm.panel, theme, cols);
    render_border(&mut out, &theme.colors.border, cols);
    render_footer(&mut out, &vm.footer, theme, cols);

    out
}
