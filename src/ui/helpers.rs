//! Shared rendering utilities.
//!
//! Widths are counted in `char`s, which is exact for the text this crate
//! renders (ASCII labels plus block characters).

/// Centers `text` in a field of `cols` columns, padding with spaces on both
/// sides. Text wider than the field is returned unchanged.
#[must_use]
pub fn center(text: &str, cols: usize) -> String {
    let len = text.chars().count();
    let left = cols.saturating_sub(len) / 2;
    let right = cols.saturating_sub(left + len);
    format!("{}{text}{}", " ".repeat(left), " ".repeat(right))
}

/// Shortens `text` to at most `max` columns, marking the cut with `…`.
#[must_use]
pub fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    if max == 0 {
        return String::new();
    }
    let kept: String = text.chars().take(max - 1).collect();
    format!("{kept}…")
}

/// Horizontal progress bar of `width` cells for a 0-100 percentage.
///
/// # Example
///
/// ```rust
/// use deepfake_detector::ui::helpers::bar;
///
/// assert_eq!(bar(50, 10), "█████░░░░░");
/// ```
#[must_use]
pub fn bar(percent: u8, width: usize) -> String {
    let percent = usize::from(percent.min(100));
    let filled = (percent * width + 50) / 100;
    format!("{}{}", "█".repeat(filled), "░".repeat(width - filled))
}
