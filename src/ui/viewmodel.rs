//! View model types representing renderable UI state.
//!
//! View models are computed from the presentation state by
//! `Session::compute_viewmodel()` and consumed by the renderer. They hold no
//! business logic, only display-ready data: percentages are already rounded,
//! labels already chosen, and the analyze button already knows whether it is
//! enabled.
//!
//! # Example
//!
//! ```rust
//! use deepfake_detector::app::Session;
//! use deepfake_detector::ui::{PanelView, Theme};
//!
//! let session = Session::new(10 * 1024 * 1024, Theme::default());
//! let vm = session.compute_viewmodel();
//! assert!(matches!(vm.panel, PanelView::Empty(_)));
//! assert!(!vm.upload.analyze_enabled);
//! ```

use crate::domain::ErrorKind;
use serde::Serialize;

/// Complete UI view model for rendering.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UIViewModel {
    /// Title bar.
    pub header: HeaderInfo,

    /// Upload card: the selected file and the analyze button.
    pub upload: UploadInfo,

    /// Results panel, one of four mutually exclusive views.
    pub panel: PanelView,

    /// Disclaimer line.
    pub footer: FooterInfo,
}

/// Header display information.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HeaderInfo {
    /// Title text.
    pub title: String,
    /// Tagline under the title.
    pub subtitle: String,
}

/// Upload card display information.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UploadInfo {
    /// Selected file name, `None` when nothing is selected.
    pub file_name: Option<String>,

    /// Normalized media type of the selection.
    pub media_type: Option<String>,

    /// Human-readable size of the selection, e.g. `2 MB`.
    pub size_label: Option<String>,

    /// Accepted formats and size ceiling.
    pub limit_label: String,

    /// Whether the analyze button accepts clicks.
    ///
    /// `false` with no image and while an analysis is in flight.
    pub analyze_enabled: bool,

    /// `Analyze Image`, or `Analyzing...` while in flight.
    pub analyze_label: String,
}

/// Results panel content.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum PanelView {
    /// No analysis yet.
    Empty(EmptyState),
    /// Analysis in flight.
    Loading(LoadingInfo),
    /// Last analysis succeeded.
    Result(ResultView),
    /// Last analysis failed.
    Failure(FailureView),
}

/// Placeholder shown before any analysis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EmptyState {
    /// Primary message (e.g., "No Analysis Yet").
    pub message: String,

    /// Secondary explanatory text.
    pub subtitle: String,
}

/// Spinner text shown while analyzing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoadingInfo {
    /// Primary message.
    pub message: String,
    /// Secondary text.
    pub subtitle: String,
}

/// Display-ready analysis result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResultView {
    /// `score > 0.5`.
    pub is_manipulated: bool,

    /// Verdict headline.
    pub headline: String,

    /// Confidence sentence.
    pub summary: String,

    /// Overall score, 0-100.
    pub score_percent: u8,

    /// Confidence, 0-100.
    pub confidence_percent: u8,

    /// Per-feature rows in engine order.
    pub features: Vec<FeatureView>,
}

/// One feature row of the breakdown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FeatureView {
    /// Feature name.
    pub name: String,
    /// What the feature measures.
    pub description: String,
    /// Feature value, 0-100.
    pub value_percent: u8,
    /// `value > 0.5`; drawn with the warning color.
    pub is_high: bool,
}

/// Failure panel content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FailureView {
    /// Primary message.
    pub message: String,
    /// Engine-supplied detail.
    pub detail: String,
    /// Failure classification.
    pub kind: ErrorKind,
    /// What the user can do next.
    pub hint: String,
}

/// Footer display information.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FooterInfo {
    /// Disclaimer text.
    pub disclaimer: String,
}
