//! Results panel renderer.
//!
//! One of four views, chosen by the presentation state:
//!
//! - empty: a prompt to analyze something
//! - loading: progress text while the engine runs
//! - result: verdict, score and confidence bars, and the feature breakdown
//! - failure: the error and how to retry

use crate::ui::helpers::{bar, center};
use crate::ui::theme::Theme;
use crate::ui::viewmodel::{FailureView, PanelView, ResultView};
use std::fmt::Write;

/// Width of the score, confidence, and feature bars.
const BAR_WIDTH: usize = 20;

/// Renders whichever panel the view model selected.
pub fn render_panel(out: &mut String, panel: &PanelView, theme: &Theme, cols: usize) {
    match panel {
        PanelView::Empty(empty) => {
            render_centered_pair(out, &empty.message, &empty.subtitle, &theme.colors.text_normal, theme, cols);
        }
        PanelView::Loading(loading) => {
            render_centered_pair(out, &loading.message, &loading.subtitle, &theme.colors.accent, theme, cols);
        }
        PanelView::Result(result) => render_result(out, result, theme),
        PanelView::Failure(failure) => render_failure(out, failure, theme),
    }
}

fn render_centered_pair(
    out: &mut String,
    message: &str,
    subtitle: &str,
    color: &str,
    theme: &Theme,
    cols: usize,
) {
    let _ = writeln!(out);
    let _ = writeln!(out, "{}{}{}{}", Theme::bold(), Theme::fg(color), center(message, cols), Theme::reset());
    let _ = writeln!(
        out,
        "{}{}{}",
        Theme::fg(&theme.colors.text_dim),
        center(subtitle, cols),
        Theme::reset()
    );
    let _ = writeln!(out);
}

fn render_result(out: &mut String, result: &ResultView, theme: &Theme) {
    let verdict_color = if result.is_manipulated {
        &theme.colors.alert
    } else {
        &theme.colors.authentic
    };
    let normal = Theme::fg(&theme.colors.text_normal);
    let dim = Theme::fg(&theme.colors.text_dim);
    let accent = Theme::fg(&theme.colors.accent);
    let reset = Theme::reset();

    let _ = writeln!(out, "  {}{}{}{reset}", Theme::bold(), Theme::fg(verdict_color), result.headline);
    let _ = writeln!(out, "  {dim}{}{reset}", result.summary);
    let _ = writeln!(out);
    let _ = writeln!(
        out,
        "  {normal}{:<24}{reset}{}{}{reset} {:>3}%",
        "Manipulation score",
        Theme::fg(verdict_color),
        bar(result.score_percent, BAR_WIDTH),
        result.score_percent
    );
    let _ = writeln!(
        out,
        "  {normal}{:<24}{reset}{accent}{}{reset} {:>3}%",
        "Confidence",
        bar(result.confidence_percent, BAR_WIDTH),
        result.confidence_percent
    );
    let _ = writeln!(out);
    let _ = writeln!(out, "  {}{normal}Feature Analysis{reset}", Theme::bold());

    for feature in &result.features {
        let color = if feature.is_high {
            &theme.colors.warning
        } else {
            &theme.colors.authentic
        };
        let _ = writeln!(
            out,
            "  {normal}{:<24}{reset}{}{}{reset} {:>3}%",
            feature.name,
            Theme::fg(color),
            bar(feature.value_percent, BAR_WIDTH),
            feature.value_percent
        );
        let _ = writeln!(out, "    {dim}{}{reset}", feature.description);
    }
}

fn render_failure(out: &mut String, failure: &FailureView, theme: &Theme) {
    let reset = Theme::reset();
    let _ = writeln!(
        out,
        "  {}{}{} ({}){reset}",
        Theme::bold(),
        Theme::fg(&theme.colors.alert),
        failure.message,
        failure.kind
    );
    let _ = writeln!(out, "  {}{}{reset}", Theme::fg(&theme.colors.text_normal), failure.detail);
    let _ = writeln!(out, "  {}{}{reset}", Theme::fg(&theme.colors.text_dim), failure.hint);
}
