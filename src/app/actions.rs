//! Actions representing side effects to be executed by the controller.
//!
//! The event handler returns a `Vec<Action>` after each event. Actions are the
//! boundary between pure state transitions and effectful work: starting or
//! aborting an engine call, and presenting notifications.

use super::notification::Notification;
use crate::engine::EngineRequest;

/// Commands produced by the event handler.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// Presents a notification to the user.
    Notify(Notification),

    /// Starts an analysis on the engine.
    ///
    /// At most one of these is outstanding at any time; the handler refuses
    /// to emit another until the current request settles or is cancelled.
    SubmitAnalysis(EngineRequest),

    /// Aborts the in-flight analysis with the given request id.
    ///
    /// Aborting is best effort. The handler has already invalidated the id,
    /// so a response that still arrives is discarded.
    CancelAnalysis {
        /// Request being abandoned.
        request_id: u64,
    },
}
