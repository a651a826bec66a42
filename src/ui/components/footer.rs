//! Footer component renderer.

use crate::ui::helpers::center;
use crate::ui::theme::Theme;
use crate::ui::viewmodel::FooterInfo;
use std::fmt::Write;

/// Renders the disclaimer, dimmed and centered.
pub fn render_footer(out: &mut String, footer: &FooterInfo, theme: &Theme, cols: usize) {
    let _ = writeln!(
        out,
        "{}{}{}{}",
        Theme::dim(),
        Theme::fg(&theme.colors.text_dim),
        center(&footer.disclaimer, cols),
        Theme::reset()
    );
}
