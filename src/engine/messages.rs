//! Request and response envelope for analysis work.
//!
//! The state machine never calls an engine directly. It emits an
//! [`EngineRequest`] and later consumes the matching [`EngineResponse`]. Both
//! are serde types so the engine can move behind a process boundary without
//! changing the state machine. Requests also carry the submitting span's trace
//! context, so spans recorded while the engine runs link back to it.

use crate::domain::{AnalysisResult, DetectorError, ImageHandle};
use serde::{Deserialize, Serialize};

/// Distributed tracing context for linking engine spans to their submitter.
///
/// Captures the current trace and span IDs from OpenTelemetry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TraceContext {
    /// OpenTelemetry trace ID as a hex string.
    pub trace_id: String,

    /// Parent span ID for linking spans across the boundary.
    pub parent_span_id: String,
}

impl TraceContext {
    /// Creates a trace context from the current tracing span.
    ///
    /// Returns `None` when no OpenTelemetry layer is installed or the active
    /// span context is invalid.
    #[must_use]
    pub fn from_current() -> Option<Self> {
        use opentelemetry::trace::TraceContextExt;
        use tracing_opentelemetry::OpenTelemetrySpanExt;

        let otel_context = tracing::Span::current().context();
        let span_ref = otel_context.span();
        let span_context = span_ref.span_context();

        if !span_context.is_valid() {
            return None;
        }

        Some(Self {
            trace_id: format!("{:032x}", span_context.trace_id()),
            parent_span_id: format!("{:016x}", span_context.span_id()),
        })
    }

    /// Rebuilds the submitter as a remote OpenTelemetry parent.
    ///
    /// Pass the result to `OpenTelemetrySpanExt::set_parent` on a span
    /// created with `parent: None`; otherwise the current tracing span wins.
    /// Returns `None` if the stored IDs are not valid hex.
    #[must_use]
    pub fn parent_context(&self) -> Option<opentelemetry::Context> {
        use opentelemetry::trace::{
            SpanContext, SpanId, TraceContextExt, TraceFlags, TraceId, TraceState,
        };

        let trace_id = TraceId::from_hex(&self.trace_id).ok()?;
        let span_id = SpanId::from_hex(&self.parent_span_id).ok()?;

        let span_context = SpanContext::new(
            trace_id,
            span_id,
            TraceFlags::SAMPLED,
            true,
            TraceState::default(),
        );

        Some(opentelemetry::Context::new().with_remote_span_context(span_context))
    }
}

/// One analysis job handed to an engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineRequest {
    /// Generation number of the analysis; echoed back in the response.
    pub request_id: u64,

    /// Image to analyse.
    pub image: ImageHandle,

    /// Trace context of the submitting span.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trace_context: Option<TraceContext>,
}

impl EngineRequest {
    /// Creates a request tagged with the current trace context.
    #[must_use]
    pub fn new(request_id: u64, image: ImageHandle) -> Self {
        Self {
            request_id,
            image,
            trace_context: TraceContext::from_current(),
        }
    }
}

/// Settlement of an [`EngineRequest`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum EngineResponse {
    /// The engine produced a valid result.
    Completed {
        /// Request this result answers.
        request_id: u64,
        /// The analysis outcome.
        result: AnalysisResult,
    },

    /// The engine rejected the image or returned an invalid result.
    Failed {
        /// Request this failure answers.
        request_id: u64,
        /// Human-readable failure description.
        message: String,
    },
}

impl EngineResponse {
    /// Builds a response from an engine outcome, validating successful
    /// results so that an out-of-contract engine surfaces as a failure.
    #[must_use]
    pub fn from_outcome(request_id: u64, outcome: crate::domain::Result<AnalysisResult>) -> Self {
        match outcome.and_then(|result| result.validate().map(|()| result)) {
            Ok(result) => Self::Completed { request_id, result },
            Err(DetectorError::AnalysisFailure(message)) => Self::Failed {
                request_id,
                message,
            },
            Err(other) => Self::Failed {
                request_id,
                message: other.to_string(),
            },
        }
    }

    /// Request this response answers.
    #[must_use]
    pub const fn request_id(&self) -> u64 {
        match self {
            Self::Completed { request_id, .. } | Self::Failed { request_id, .. } => *request_id,
        }
    }
}
