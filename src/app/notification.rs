//! User-visible notifications raised by state transitions.
//!
//! The event handler never talks to a toast system directly. It emits
//! [`Notification`] values inside [`crate::app::Action::Notify`] and the
//! controller forwards them to a [`Notifier`].

use crate::domain::{AnalysisResult, ErrorKind};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Tone of a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Severity {
    /// Neutral outcome, e.g. an image that appears authentic.
    Info,
    /// Recoverable user mistake, e.g. analysing with nothing selected.
    Warning,
    /// Something the user must look at: a likely deepfake or a failure.
    Alert,
}

/// A `(title, description, severity)` triple plus its cause and timestamp.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    /// Short headline.
    pub title: String,
    /// Supporting sentence.
    pub description: String,
    /// Tone selecting how the notification is presented.
    pub severity: Severity,
    /// Error kind when the notification reports a failure.
    pub cause: Option<ErrorKind>,
    /// When the notification was raised.
    pub issued_at: DateTime<Utc>,
}

impl Notification {
    fn new(
        title: impl Into<String>,
        description: impl Into<String>,
        severity: Severity,
        cause: Option<ErrorKind>,
    ) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            severity,
            cause,
            issued_at: Utc::now(),
        }
    }

    /// Completion notice; alerting when the result classifies as manipulated.
    #[must_use]
    pub fn analysis_complete(result: &AnalysisResult) -> Self {
        let (title, severity) = if result.is_manipulated() {
            ("Potential deepfake detected", Severity::Alert)
        } else {
            ("Image appears authentic", Severity::Info)
        };
        Self::new(
            title,
            format!(
                "Analysis complete with {}% confidence.",
                result.confidence_percent()
            ),
            severity,
            None,
        )
    }

    /// Warning for an analyze request with no image.
    #[must_use]
    pub fn no_image_selected() -> Self {
        Self::new(
            "No image selected",
            "Please upload an image to analyze.",
            Severity::Warning,
            Some(ErrorKind::NoImageSelected),
        )
    }

    /// Warning for a rejected selection.
    #[must_use]
    pub fn invalid_image(reason: &str) -> Self {
        Self::new(
            "Invalid image",
            format!("The selected file cannot be analyzed: {reason}."),
            Severity::Warning,
            Some(ErrorKind::InvalidImage),
        )
    }

    /// Alert for an engine rejection.
    #[must_use]
    pub fn analysis_failed() -> Self {
        Self::new(
            "Analysis failed",
            "There was an error analyzing the image. Please try again.",
            Severity::Alert,
            Some(ErrorKind::AnalysisFailure),
        )
    }
}

/// Receiver of notifications.
pub trait Notifier {
    /// Presents one notification.
    fn notify(&mut self, notification: &Notification);
}

/// Notifier that records notifications as tracing events.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&mut self, notification: &Notification) {
        match notification.severity {
            Severity::Info => tracing::info!(
                title = %notification.title,
                description = %notification.description,
                "notification"
            ),
            Severity::Warning | Severity::Alert => tracing::warn!(
                title = %notification.title,
                description = %notification.description,
                severity = ?notification.severity,
                cause = ?notification.cause,
                "notification"
            ),
        }
    }
}

/// Collects notifications in order.
impl Notifier for Vec<Notification> {
    fn notify(&mut self, notification: &Notification) {
        self.push(notification.clone());
    }
}
