//! Action execution against an engine and a notifier.
//!
//! The [`Controller`] owns the [`Session`] and is the only caller of
//! [`handle_event`]. It executes the returned actions: notifications go to
//! the [`Notifier`], analysis requests run on a spawned tokio task whose
//! [`AbortHandle`] is kept for cancellation, and the task's
//! [`EngineResponse`] comes back over an unbounded channel to be fed in as
//! [`Event::EngineSettled`].
//!
//! Aborting is best effort. A response that was already queued when the task
//! was aborted still arrives, and the handler's request-id guard discards it.
//!
//! # Example
//!
//! ```rust
//! use deepfake_detector::app::{Controller, Event, Notification, PresentationState, Session};
//! use deepfake_detector::domain::ImageUpload;
//! use deepfake_detector::engine::SimulatedEngine;
//! use deepfake_detector::ui::Theme;
//! use std::sync::Arc;
//! use std::time::Duration;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let engine = Arc::new(SimulatedEngine::with_seed(Duration::from_millis(5), 7));
//! let session = Session::new(10 * 1024 * 1024, Theme::default());
//! let mut controller = Controller::new(session, engine, Vec::<Notification>::new());
//!
//! controller.dispatch(Event::SelectImage(ImageUpload::new(None, "image/png", vec![1; 32])));
//! controller.dispatch(Event::AnalyzeRequested);
//! controller.settle().await;
//!
//! assert!(matches!(controller.session().state(), PresentationState::Resulted(..)));
//! assert_eq!(controller.notifier().len(), 1);
//! # }
//! ```

use crate::app::{handle_event, Action, Event, Notifier, Session};
use crate::domain::DetectorError;
use crate::engine::{AnalysisEngine, EngineRequest, EngineResponse, TraceContext};
use futures_util::FutureExt;
use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::AbortHandle;
use tracing::Instrument;
use tracing_opentelemetry::OpenTelemetrySpanExt;

/// Drives a [`Session`] with a concrete engine and notifier.
pub struct Controller<N: Notifier> {
    session: Session,
    engine: Arc<dyn AnalysisEngine>,
    notifier: N,
    responses_tx: mpsc::UnboundedSender<EngineResponse>,
    responses_rx: mpsc::UnboundedReceiver<EngineResponse>,
    inflight: Option<(u64, AbortHandle)>,
}

impl<N: Notifier> Controller<N> {
    /// Creates a controller around an idle or restored session.
    pub fn new(session: Session, engine: Arc<dyn AnalysisEngine>, notifier: N) -> Self {
        let (responses_tx, responses_rx) = mpsc::unbounded_channel();
        Self {
            session,
            engine,
            notifier,
            responses_tx,
            responses_rx,
            inflight: None,
        }
    }

    /// The session being driven.
    #[must_use]
    pub const fn session(&self) -> &Session {
        &self.session
    }

    /// The notification sink.
    #[must_use]
    pub const fn notifier(&self) -> &N {
        &self.notifier
    }

    /// Mutable access to the sink, for notices raised outside the handler.
    pub fn notifier_mut(&mut self) -> &mut N {
        &mut self.notifier
    }

    /// Id of the engine task still running, if any.
    #[must_use]
    pub fn pending_request(&self) -> Option<u64> {
        self.inflight.as_ref().map(|(id, _)| *id)
    }

    /// Handles one event and executes its actions.
    ///
    /// Returns whether the view should be redrawn. Spawning requires a tokio
    /// runtime when the event starts an analysis.
    pub fn dispatch(&mut self, event: Event) -> bool {
        let (should_render, actions) = handle_event(&mut self.session, event);

        for action in actions {
            self.execute(action);
        }

        should_render
    }

    /// Waits for the pending analysis to settle and applies it.
    ///
    /// Responses to requests that were cancelled in the meantime are applied
    /// too (the handler drops them) until the pending one arrives. Returns
    /// `false` immediately when nothing is pending.
    pub async fn settle(&mut self) -> bool {
        while let Some(pending) = self.pending_request() {
            let Some(response) = self.responses_rx.recv().await else {
                tracing::warn!(request_id = pending, "engine channel closed before settlement");
                self.inflight = None;
                return false;
            };

            let settled = response.request_id() == pending;
            if settled {
                self.inflight = None;
            }

            let should_render = self.dispatch(Event::EngineSettled(response));
            if settled {
                return should_render;
            }
        }

        false
    }

    fn execute(&mut self, action: Action) {
        match action {
            Action::Notify(notification) => self.notifier.notify(&notification),
            Action::SubmitAnalysis(request) => self.submit(request),
            Action::CancelAnalysis { request_id } => match self.inflight.take() {
                Some((id, handle)) if id == request_id => {
                    tracing::debug!(request_id, "aborting engine task");
                    handle.abort();
                }
                other => self.inflight = other,
            },
        }
    }

    fn submit(&mut self, request: EngineRequest) {
        let engine = Arc::clone(&self.engine);
        let responses = self.responses_tx.clone();
        let request_id = request.request_id;

        let span = match request.trace_context.as_ref().and_then(TraceContext::parent_context) {
            Some(parent) => {
                let span = tracing::info_span!(parent: None, "engine.analyze", request_id, engine = engine.name());
                span.set_parent(parent);
                span
            }
            None => tracing::info_span!("engine.analyze", request_id, engine = engine.name()),
        };

        let task = tokio::spawn(
            async move {
                let outcome = AssertUnwindSafe(engine.analyze(&request.image))
                    .catch_unwind()
                    .await
                    .unwrap_or_else(|payload| {
                        let message = panic_message(payload.as_ref());
                        tracing::error!(%message, "engine panicked");
                        Err(DetectorError::AnalysisFailure(format!("engine panicked: {message}")))
                    });
                let response = EngineResponse::from_outcome(request_id, outcome);

                if responses.send(response).is_err() {
                    tracing::debug!("controller dropped before the analysis settled");
                }
            }
            .instrument(span),
        );

        if let Some((stale, handle)) = self.inflight.replace((request_id, task.abort_handle())) {
            tracing::warn!(request_id = stale, "replacing untracked engine task");
            handle.abort();
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    payload
        .downcast_ref::<&str>()
        .map(|s| (*s).to_string())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "unknown panic".to_string())
}

impl<N: Notifier> Drop for Controller<N> {
    fn drop(&mut self) {
        if let Some((_, handle)) = self.inflight.take() {
            handle.abort();
        }
    }
}
