//! Upload card renderer.
//!
//! Shows the selected file (or a prompt to choose one), the accepted formats,
//! and the analyze button. The button is drawn in the accent color when it
//! accepts clicks and dimmed otherwise.

use crate::ui::helpers::truncate;
use crate::ui::theme::Theme;
use crate::ui::viewmodel::UploadInfo;
use std::fmt::Write;

/// Columns reserved around the file name for the media type and size.
const NAME_MARGIN: usize = 30;

/// Renders the upload card.
pub fn render_upload(out: &mut String, upload: &UploadInfo, theme: &Theme, cols: usize) {
    let normal = Theme::fg(&theme.colors.text_normal);
    let dim = Theme::fg(&theme.colors.text_dim);
    let reset = Theme::reset();

    match &upload.file_name {
        Some(name) => {
            let name = truncate(name, cols.saturating_sub(NAME_MARGIN).max(12));
            let details = [upload.media_type.as_deref(), upload.size_label.as_deref()]
                .into_iter()
                .flatten()
                .collect::<Vec<_>>()
                .join(", ");
            let _ = writeln!(out, "  {normal}{}{name}{reset} {dim}({details}){reset}", Theme::bold());
        }
        None => {
            let _ = writeln!(out, "  {normal}Drop an image here or choose a file{reset}");
        }
    }

    let _ = writeln!(out, "  {dim}{}{reset}", upload.limit_label);

    let button = if upload.analyze_enabled {
        format!("{}{}", Theme::bold(), Theme::fg(&theme.colors.accent))
    } else {
        format!("{}{dim}", Theme::dim())
    };
    let _ = writeln!(out, "  {button}[ {} ]{reset}", upload.analyze_label);
}
