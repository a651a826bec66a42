//! Application layer: the result presentation state machine.
//!
//! This module sits between the analysis engine and whatever renders the
//! result. It owns the single source of truth for what the user sees and
//! the rules for changing it.
//!
//! # Architecture
//!
//! ```text
//! User input -> Event -> handle_event -> Session mutation -> Actions
//!                  ^                                            |
//!                  |            Controller executes them        v
//!                  +---- EngineSettled <- engine task <- SubmitAnalysis
//!                                         Notifier    <- Notify
//! ```
//!
//! # Modules
//!
//! - [`actions`]: Side effect commands emitted by the event handler
//! - [`controller`]: Executes actions against an engine and a notifier
//! - [`handler`]: Transition table, single-flight and stale-response guards
//! - [`notification`]: Notification values and the notifier trait
//! - [`state`]: Presentation state, session, and view model computation

pub mod actions;
pub mod controller;
pub mod handler;
pub mod notification;
pub mod state;

pub use actions::Action;
pub use controller::Controller;
pub use handler::{handle_event, Event};
pub use notification::{Notification, Notifier, Severity, TracingNotifier};
pub use state::{compute_result_view, format_size, PresentationState, Session};
