//! Presentation state and the session that owns it.
//!
//! [`PresentationState`] is the single source of truth for what the UI shows.
//! It is a tagged union, so combinations such as "loading while holding a
//! stale result" cannot be represented. [`Session`] wraps it together with the
//! request-id generation counter and upload limits, and exposes view model
//! computation for the rendering layer.
//!
//! Only the event handler mutates the state, through [`Session::transition`].
//!
//! # Example
//!
//! ```rust
//! use deepfake_detector::app::{PresentationState, Session};
//! use deepfake_detector::ui::Theme;
//!
//! let session = Session::new(10 * 1024 * 1024, Theme::default());
//! assert_eq!(session.state(), &PresentationState::Idle);
//! ```

use crate::domain::{AnalysisResult, ErrorKind, ImageHandle};
use crate::ui::theme::Theme;
use crate::ui::viewmodel::{
    EmptyState, FailureView, FeatureView, FooterInfo, HeaderInfo, LoadingInfo, PanelView,
    ResultView, UIViewModel, UploadInfo,
};
use serde::{Deserialize, Serialize};

/// What the user is currently looking at.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PresentationState {
    /// Nothing selected.
    Idle,

    /// An image is selected and ready to analyse.
    ImageSelected(ImageHandle),

    /// An analysis is in flight for `image`.
    Analyzing {
        /// Image under analysis.
        image: ImageHandle,
        /// Id of the outstanding engine request.
        request_id: u64,
    },

    /// The last analysis of `image` succeeded.
    Resulted(ImageHandle, AnalysisResult),

    /// The last analysis of `image` failed.
    Failed {
        /// Image whose analysis failed.
        image: ImageHandle,
        /// Failure classification.
        kind: ErrorKind,
        /// Engine-supplied detail.
        message: String,
    },
}

impl PresentationState {
    /// Variant name for logs.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::ImageSelected(_) => "image_selected",
            Self::Analyzing { .. } => "analyzing",
            Self::Resulted(..) => "resulted",
            Self::Failed { .. } => "failed",
        }
    }

    /// The held image, in every state except `Idle`.
    #[must_use]
    pub const fn image(&self) -> Option<&ImageHandle> {
        match self {
            Self::Idle => None,
            Self::ImageSelected(image)
            | Self::Analyzing { image, .. }
            | Self::Resulted(image, _)
            | Self::Failed { image, .. } => Some(image),
        }
    }

    /// The analysis result, only in `Resulted`.
    #[must_use]
    pub const fn result(&self) -> Option<&AnalysisResult> {
        match self {
            Self::Resulted(_, result) => Some(result),
            _ => None,
        }
    }

    /// Id of the outstanding request, only in `Analyzing`.
    #[must_use]
    pub const fn in_flight(&self) -> Option<u64> {
        match self {
            Self::Analyzing { request_id, .. } => Some(*request_id),
            _ => None,
        }
    }

    /// Whether an analysis is in flight.
    #[must_use]
    pub const fn is_analyzing(&self) -> bool {
        matches!(self, Self::Analyzing { .. })
    }
}

/// One user session: presentation state plus the bookkeeping around it.
#[derive(Debug, Clone)]
pub struct Session {
    state: PresentationState,

    /// Last request id handed out; ids start at 1.
    last_request_id: u64,

    /// Upload size ceiling in bytes.
    pub max_bytes: u64,

    /// Color scheme for rendering.
    pub theme: Theme,
}

impl Session {
    /// Creates an idle session.
    #[must_use]
    pub const fn new(max_bytes: u64, theme: Theme) -> Self {
        Self {
            state: PresentationState::Idle,
            last_request_id: 0,
            max_bytes,
            theme,
        }
    }

    /// Current presentation state.
    #[must_use]
    pub const fn state(&self) -> &PresentationState {
        &self.state
    }

    /// Replaces the presentation state.
    pub(crate) fn transition(&mut self, next: PresentationState) {
        tracing::debug!(from = self.state.name(), to = next.name(), "state transition");
        self.state = next;
    }

    /// Hands out the next request id.
    pub(crate) fn next_request_id(&mut self) -> u64 {
        self.last_request_id += 1;
        self.last_request_id
    }

    /// Computes the renderable view model for the current state.
    #[must_use]
    pub fn compute_viewmodel(&self) -> UIViewModel {
        UIViewModel {
            header: HeaderInfo {
                title: " DeepFake Detector ".to_string(),
                subtitle: "Upload an image to analyze it for potential AI manipulation".to_string(),
            },
            upload: self.compute_upload(),
            panel: self.compute_panel(),
            footer: FooterInfo {
                disclaimer: "For educational purposes only. Results should not be considered definitive proof of manipulation.".to_string(),
            },
        }
    }

    fn compute_upload(&self) -> UploadInfo {
        let image = self.state.image();
        let analyzing = self.state.is_analyzing();

        UploadInfo {
            file_name: image.map(|i| i.display_name().to_string()),
            media_type: image.map(|i| i.media_type().to_string()),
            size_label: image.map(|i| format_size(i.size())),
            limit_label: format!("Supports: JPG, PNG, WebP (Max: {})", format_size(self.max_bytes)),
            analyze_enabled: image.is_some() && !analyzing,
            analyze_label: if analyzing { "Analyzing..." } else { "Analyze Image" }.to_string(),
        }
    }

    fn compute_panel(&self) -> PanelView {
        match &self.state {
            PresentationState::Idle | PresentationState::ImageSelected(_) => {
                PanelView::Empty(EmptyState {
                    message: "No Analysis Yet".to_string(),
                    subtitle: "Upload an image and click \"Analyze\" to check if it's a potential deepfake.".to_string(),
                })
            }
            PresentationState::Analyzing { .. } => PanelView::Loading(LoadingInfo {
                message: "Analyzing Image".to_string(),
                subtitle: "Running deepfake detection algorithms...".to_string(),
            }),
            PresentationState::Resulted(_, result) => PanelView::Result(compute_result_view(result)),
            PresentationState::Failed { kind, message, .. } => PanelView::Failure(FailureView {
                message: "Analysis Failed".to_string(),
                detail: message.clone(),
                kind: *kind,
                hint: "Request the analysis again to retry.".to_string(),
            }),
        }
    }
}

/// Derives every display field of a result.
#[must_use]
pub fn compute_result_view(result: &AnalysisResult) -> ResultView {
    let is_manipulated = result.is_manipulated();
    let confidence_percent = result.confidence_percent();

    ResultView {
        is_manipulated,
        headline: if is_manipulated {
            "Potential Deepfake Detected"
        } else {
            "Likely Authentic Image"
        }
        .to_string(),
        summary: format!("Analysis completed with {confidence_percent}% confidence"),
        score_percent: result.score_percent(),
        confidence_percent,
        features: result
            .features
            .iter()
            .map(|feature| FeatureView {
                name: feature.name.clone(),
                description: feature.description.clone(),
                value_percent: feature.value_percent(),
                is_high: feature.is_high(),
            })
            .collect(),
    }
}

/// Formats a byte count with binary units, e.g. `10 MB` or `2.5 KB`.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn format_size(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["B", "KB", "MB", "GB"];

    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }

    if unit == 0 || (value.fract()).abs() < f64::EPSILON {
        format!("{value:.0} {}", UNITS[unit])
    } else {
        format!("{value:.1} {}", UNITS[unit])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{FeatureScore, ImageUpload, DEFAULT_MAX_BYTES};

    fn image(name: &str) -> ImageHandle {
        ImageHandle::from_upload(
            ImageUpload::new(Some(name.into()), "image/png", vec![1; 2048]),
            DEFAULT_MAX_BYTES,
        )
        .unwrap()
    }

    #[test]
    fn request_ids_increase() {
        let mut session = Session::new(DEFAULT_MAX_BYTES, Theme::default());
        assert_eq!(session.next_request_id(), 1);
        assert_eq!(session.next_request_id(), 2);
    }

    #[test]
    fn accessors_follow_variant() {
        let img = image("a.png");
        let analyzing = PresentationState::Analyzing {
            image: img.clone(),
            request_id: 5,
        };
        assert_eq!(analyzing.in_flight(), Some(5));
        assert_eq!(analyzing.image(), Some(&img));
        assert!(analyzing.result().is_none());
        assert!(PresentationState::Idle.image().is_none());
    }

    #[test]
    fn idle_viewmodel_shows_empty_panel_and_disabled_button() {
        let session = Session::new(DEFAULT_MAX_BYTES, Theme::default());
        let vm = session.compute_viewmodel();
        assert!(matches!(vm.panel, PanelView::Empty(_)));
        assert!(!vm.upload.analyze_enabled);
        assert_eq!(vm.upload.limit_label, "Supports: JPG, PNG, WebP (Max: 10 MB)");
    }

    #[test]
    fn analyzing_viewmodel_disables_button() {
        let mut session = Session::new(DEFAULT_MAX_BYTES, Theme::default());
        session.transition(PresentationState::Analyzing {
            image: image("a.png"),
            request_id: 1,
        });
        let vm = session.compute_viewmodel();
        assert!(matches!(vm.panel, PanelView::Loading(_)));
        assert!(!vm.upload.analyze_enabled);
        assert_eq!(vm.upload.analyze_label, "Analyzing...");
        assert_eq!(vm.upload.size_label.as_deref(), Some("2 KB"));
    }

    #[test]
    fn result_view_derives_percentages() {
        let result = AnalysisResult::new(
            0.82,
            0.91,
            vec![
                FeatureScore::new("Facial Inconsistencies", 0.734, "faces"),
                FeatureScore::new("Color Consistency", 0.21, "colors"),
            ],
        )
        .unwrap();
        let view = compute_result_view(&result);
        assert!(view.is_manipulated);
        assert_eq!(view.score_percent, 82);
        assert_eq!(view.confidence_percent, 91);
        assert_eq!(view.headline, "Potential Deepfake Detected");
        assert_eq!(view.features[0].value_percent, 73);
        assert!(view.features[0].is_high);
        assert!(!view.features[1].is_high);
    }

    #[test]
    fn sizes_format_with_binary_units() {
        assert_eq!(format_size(512), "512 B");
        assert_eq!(format_size(2 * 1024 * 1024), "2 MB");
        assert_eq!(format_size(1536), "1.5 KB");
    }
}
