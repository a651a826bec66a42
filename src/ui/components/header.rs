//! Header component renderer.

use crate::ui::helpers::center;
use crate::ui::theme::Theme;
use crate::ui::viewmodel::HeaderInfo;
use std::fmt::Write;

/// Renders the centered title, bold in the header color, and the tagline.
pub fn render_header(out: &mut String, header: &HeaderInfo, theme: &Theme, cols: usize) {
    let background = theme
        .colors
        .header_bg
        .as_deref()
        .map(Theme::bg)
        .unwrap_or_default();

    let _ = writeln!(
        out,
        "{}{}{background}{}{}",
        Theme::bold(),
        Theme::fg(&theme.colors.header_fg),
        center(&header.title, cols),
        Theme::reset()
    );
    let _ = writeln!(
        out,
        "{}{}{}",
        Theme::fg(&theme.colors.text_dim),
        center(&header.subtitle, cols),
        Theme::reset()
    );
}
