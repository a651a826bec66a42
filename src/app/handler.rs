//! Event handling and state transition logic.
//!
//! [`handle_event`] is the only place the presentation state changes. It is
//! synchronous and performs no I/O: every side effect (starting or aborting
//! an engine call, raising a notification) comes back as an [`Action`] for the
//! controller to execute.
//!
//! # Architecture
//!
//! ```text
//! Event -> handle_event -> Session::transition -> (should_render, Vec<Action>)
//!   ^                                                          |
//!   +---------------- EngineSettled(EngineResponse) <----------+
//! ```
//!
//! Two guards live here:
//!
//! - **single flight**: `AnalyzeRequested` while `Analyzing` does nothing
//! - **request ids**: an `EngineSettled` whose id is not the one stored in
//!   `Analyzing` is dropped, so results for a cleared, replaced or cancelled
//!   image never surface
//!
//! # Example
//!
//! ```rust
//! use deepfake_detector::app::{handle_event, Action, Event, PresentationState, Session};
//! use deepfake_detector::domain::ImageUpload;
//! use deepfake_detector::ui::Theme;
//!
//! let mut session = Session::new(10 * 1024 * 1024, Theme::default());
//! let upload = ImageUpload::new(Some("cat.png".into()), "image/png", vec![1, 2, 3]);
//!
//! handle_event(&mut session, Event::SelectImage(upload));
//! let (render, actions) = handle_event(&mut session, Event::AnalyzeRequested);
//!
//! assert!(render);
//! assert!(matches!(actions[..], [Action::SubmitAnalysis(_)]));
//! assert!(session.state().is_analyzing());
//! ```

use crate::app::{Action, Notification, PresentationState, Session};
use crate::domain::{DetectorError, ErrorKind, ImageHandle, ImageUpload};
use crate::engine::{EngineRequest, EngineResponse};

/// Inputs to the state machine.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    /// The user picked a file. Validated before it is stored.
    SelectImage(ImageUpload),

    /// The user removed the selected file.
    ClearImage,

    /// The user pressed the analyze button.
    AnalyzeRequested,

    /// The user abandoned the in-flight analysis.
    CancelAnalysis,

    /// Back to a fresh session.
    Reset,

    /// The engine finished a request, successfully or not.
    EngineSettled(EngineResponse),
}

impl Event {
    /// Variant name for spans.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::SelectImage(_) => "select_image",
            Self::ClearImage => "clear_image",
            Self::AnalyzeRequested => "analyze_requested",
            Self::CancelAnalysis => "cancel_analysis",
            Self::Reset => "reset",
            Self::EngineSettled(_) => "engine_settled",
        }
    }
}

/// Processes an event, mutates the session, and returns actions to execute.
///
/// The returned flag says whether the view changed and should be redrawn.
/// Notifications alone do not set it.
pub fn handle_event(session: &mut Session, event: Event) -> (bool, Vec<Action>) {
    let _span = tracing::debug_span!(
        "handle_event",
        event_type = event.name(),
        state = session.state().name()
    )
    .entered();

    match event {
        Event::SelectImage(upload) => select_image(session, upload),
        Event::ClearImage => {
            if matches!(session.state(), PresentationState::Idle) {
                return (false, vec![]);
            }
            let actions = cancel_in_flight(session);
            session.transition(PresentationState::Idle);
            (true, actions)
        }
        Event::AnalyzeRequested => request_analysis(session),
        Event::CancelAnalysis => {
            let PresentationState::Analyzing { image, request_id } = session.state() else {
                tracing::debug!("nothing to cancel");
                return (false, vec![]);
            };
            let (image, request_id) = (image.clone(), *request_id);

            tracing::info!(request_id, "analysis cancelled");
            session.transition(PresentationState::ImageSelected(image));
            (true, vec![Action::CancelAnalysis { request_id }])
        }
        Event::Reset => {
            let actions = cancel_in_flight(session);
            let changed = !matches!(session.state(), PresentationState::Idle);
            session.transition(PresentationState::Idle);
            (changed, actions)
        }
        Event::EngineSettled(response) => settle(session, response),
    }
}

fn select_image(session: &mut Session, upload: ImageUpload) -> (bool, Vec<Action>) {
    let image = match ImageHandle::from_upload(upload, session.max_bytes) {
        Ok(image) => image,
        Err(e) => {
            tracing::warn!(error = %e, "rejected image selection");
            let reason = match e {
                DetectorError::InvalidImage(reason) => reason,
                other => other.to_string(),
            };
            return (false, vec![Action::Notify(Notification::invalid_image(&reason))]);
        }
    };

    tracing::debug!(
        name = image.display_name(),
        media_type = image.media_type(),
        size = image.size(),
        "image selected"
    );

    let actions = cancel_in_flight(session);
    session.transition(PresentationState::ImageSelected(image));
    (true, actions)
}

fn request_analysis(session: &mut Session) -> (bool, Vec<Action>) {
    let image = match session.state() {
        PresentationState::Idle => {
            tracing::debug!("analyze requested with no image");
            return (false, vec![Action::Notify(Notification::no_image_selected())]);
        }
        PresentationState::Analyzing { request_id, .. } => {
            tracing::debug!(request_id, "analysis already in flight, ignoring");
            return (false, vec![]);
        }
        PresentationState::ImageSelected(image)
        | PresentationState::Resulted(image, _)
        | PresentationState::Failed { image, .. } => image.clone(),
    };

    let request_id = session.next_request_id();
    tracing::info!(request_id, image = image.display_name(), "submitting analysis");

    let request = EngineRequest::new(request_id, image.clone());
    session.transition(PresentationState::Analyzing { image, request_id });
    (true, vec![Action::SubmitAnalysis(request)])
}

fn settle(session: &mut Session, response: EngineResponse) -> (bool, Vec<Action>) {
    let expected = session.state().in_flight();
    if expected != Some(response.request_id()) {
        tracing::debug!(
            request_id = response.request_id(),
            expected = ?expected,
            "discarding stale engine response"
        );
        return (false, vec![]);
    }

    let Some(image) = session.state().image().cloned() else {
        return (false, vec![]);
    };

    match response {
        EngineResponse::Completed { request_id, result } => {
            tracing::info!(
                request_id,
                score = result.score,
                confidence = result.confidence,
                verdict = ?result.verdict(),
                "analysis complete"
            );
            let notification = Notification::analysis_complete(&result);
            session.transition(PresentationState::Resulted(image, result));
            (true, vec![Action::Notify(notification)])
        }
        EngineResponse::Failed { request_id, message } => {
            tracing::warn!(request_id, %message, "analysis failed");
            session.transition(PresentationState::Failed {
                image,
                kind: ErrorKind::AnalysisFailure,
                message,
            });
            (true, vec![Action::Notify(Notification::analysis_failed())])
        }
    }
}

/// Cancel action for the in-flight request, if any.
///
/// The caller's transition out of `Analyzing` is what invalidates the id.
fn cancel_in_flight(session: &Session) -> Vec<Action> {
    session
        .state()
        .in_flight()
        .map(|request_id| {
            tracing::debug!(request_id, "abandoning in-flight analysis");
            Action::CancelAnalysis { request_id }
        })
        .into_iter()
        .collect()
}
