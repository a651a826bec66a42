//! OpenTelemetry span export to a JSON lines file.
//!
//! Every finished span becomes one [`SpanRecord`] line in a rotating file.
//! The format is flat and self-describing so traces can be inspected with
//! `jq` or loaded back with serde:
//!
//! ```json
//! {"service":"deepfake-detector","trace_id":"4bf9...","span_id":"00f0...",
//!  "parent_span_id":"b7ad...","name":"engine.analyze","kind":"internal",
//!  "start":"2026-01-01T12:00:00.000001Z","duration_us":2500113,
//!  "attributes":{"request_id":1,"engine":"simulated"},"events":[],"status":"unset"}
//! ```

use super::file_writer::RotatingWriter;
use chrono::{DateTime, Utc};
use futures_util::future::BoxFuture;
use opentelemetry::trace::{SpanKind, Status, TraceError};
use opentelemetry::{Key, KeyValue, Value};
use opentelemetry_sdk::export::trace::{ExportResult, SpanData, SpanExporter};
use opentelemetry_sdk::resource::Resource;
use opentelemetry_sdk::trace::TracerProvider;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};

/// Service name recorded when the resource does not carry one.
const UNKNOWN_SERVICE: &str = "unknown_service";

/// One exported span.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpanRecord {
    /// `service.name` of the emitting resource.
    pub service: String,
    /// Trace id, 32 hex digits.
    pub trace_id: String,
    /// Span id, 16 hex digits.
    pub span_id: String,
    /// Parent span id; absent for root spans.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_span_id: Option<String>,
    /// Span name.
    pub name: String,
    /// `internal`, `server`, `client`, `producer` or `consumer`.
    pub kind: String,
    /// Start time.
    pub start: DateTime<Utc>,
    /// Wall-clock duration in microseconds.
    pub duration_us: u64,
    /// Span fields.
    pub attributes: BTreeMap<String, JsonValue>,
    /// Events recorded inside the span (tracing events become these).
    pub events: Vec<EventRecord>,
    /// `unset`, `ok` or `error`.
    pub status: String,
    /// Error description when `status` is `error`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// One event within a span.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventRecord {
    /// Event name (the message of a tracing event).
    pub name: String,
    /// When it happened.
    pub at: DateTime<Utc>,
    /// Event fields.
    pub attributes: BTreeMap<String, JsonValue>,
}

impl SpanRecord {
    /// Flattens SDK span data.
    #[must_use]
    pub fn from_span(span: &SpanData, service: &str) -> Self {
        let start: DateTime<Utc> = span.start_time.into();
        let duration_us = span
            .end_time
            .duration_since(span.start_time)
            .map_or(0, |d| u64::try_from(d.as_micros()).unwrap_or(u64::MAX));

        let parent_span_id = (span.parent_span_id != opentelemetry::trace::SpanId::INVALID)
            .then(|| format!("{:016x}", span.parent_span_id));

        let (status, error) = match &span.status {
            Status::Unset => ("unset", None),
            Status::Ok => ("ok", None),
            Status::Error { description } => ("error", Some(description.to_string())),
        };

        Self {
            service: service.to_string(),
            trace_id: format!("{:032x}", span.span_context.trace_id()),
            span_id: format!("{:016x}", span.span_context.span_id()),
            parent_span_id,
            name: span.name.to_string(),
            kind: kind_name(&span.span_kind).to_string(),
            start,
            duration_us,
            attributes: attributes_to_json(&span.attributes),
            events: span
                .events
                .iter()
                .map(|event| EventRecord {
                    name: event.name.to_string(),
                    at: event.timestamp.into(),
                    attributes: attributes_to_json(&event.attributes),
                })
                .collect(),
            status: status.to_string(),
            error,
        }
    }
}

const fn kind_name(kind: &SpanKind) -> &'static str {
    match kind {
        SpanKind::Internal => "internal",
        SpanKind::Server => "server",
        SpanKind::Client => "client",
        SpanKind::Producer => "producer",
        SpanKind::Consumer => "consumer",
    }
}

fn attributes_to_json(attributes: &[KeyValue]) -> BTreeMap<String, JsonValue> {
    attributes
        .iter()
        .map(|kv| (kv.key.to_string(), value_to_json(&kv.value)))
        .collect()
}

fn value_to_json(value: &Value) -> JsonValue {
    match value {
        Value::Bool(b) => JsonValue::Bool(*b),
        Value::I64(i) => JsonValue::from(*i),
        Value::F64(f) => serde_json::Number::from_f64(*f).map_or(JsonValue::Null, JsonValue::Number),
        Value::String(s) => JsonValue::String(s.as_str().to_string()),
        other => JsonValue::String(other.to_string()),
    }
}

fn service_name(resource: &Resource) -> String {
    resource
        .get(Key::from_static_str("service.name"))
        .map_or_else(|| UNKNOWN_SERVICE.to_string(), |v| v.to_string())
}

/// Span exporter writing [`SpanRecord`] lines through a [`RotatingWriter`].
#[derive(Debug)]
pub struct JsonLinesExporter {
    writer: RotatingWriter,
    service: String,
    is_shutdown: AtomicBool,
}

impl JsonLinesExporter {
    /// Creates an exporter appending to `path`.
    #[must_use]
    pub fn new(path: PathBuf, resource: &Resource) -> Self {
        Self {
            writer: RotatingWriter::new(path),
            service: service_name(resource),
            is_shutdown: AtomicBool::new(false),
        }
    }

    fn write_batch(&self, batch: &[SpanData]) -> ExportResult {
        for span in batch {
            let record = SpanRecord::from_span(span, &self.service);
            let line = serde_json::to_string(&record).map_err(|e| TraceError::from(e.to_string()))?;
            self.writer
                .write_line(&line)
                .map_err(|e| TraceError::from(e.to_string()))?;
        }
        Ok(())
    }
}

impl SpanExporter for JsonLinesExporter {
    fn export(&mut self, batch: Vec<SpanData>) -> BoxFuture<'static, ExportResult> {
        let outcome = if self.is_shutdown.load(Ordering::SeqCst) {
            Err(TraceError::from("exporter is shut down"))
        } else {
            self.write_batch(&batch)
        };

        Box::pin(std::future::ready(outcome))
    }

    fn shutdown(&mut self) {
        self.is_shutdown.store(true, Ordering::SeqCst);
    }

    fn set_resource(&mut self, resource: &Resource) {
        self.service = service_name(resource);
    }
}

/// Creates a tracer provider exporting every span as it ends.
#[must_use]
pub fn tracer_provider(path: PathBuf, resource: Resource) -> TracerProvider {
    let exporter = JsonLinesExporter::new(path, &resource);

    TracerProvider::builder()
        .with_config(opentelemetry_sdk::trace::Config::default().with_resource(resource))
        .with_simple_exporter(exporter)
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::TraceContext;
    use opentelemetry::trace::TracerProvider as _;
    use tracing_subscriber::layer::SubscriberExt;

    fn read_records(path: &std::path::Path) -> Vec<SpanRecord> {
        std::fs::read_to_string(path)
            .unwrap()
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect()
    }

    fn provider(path: PathBuf) -> TracerProvider {
        tracer_provider(
            path,
            Resource::new(vec![KeyValue::new("service.name", "detector-test")]),
        )
    }

    #[test]
    fn tracing_spans_become_records() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("spans.jsonl");
        let provider = provider(path.clone());
        let subscriber = tracing_subscriber::registry()
            .with(tracing_opentelemetry::layer().with_tracer(provider.tracer("test")));

        tracing::subscriber::with_default(subscriber, || {
            let outer = tracing::info_span!("handle_event", event_type = "analyze_requested");
            let _outer = outer.enter();
            let inner = tracing::info_span!("engine.analyze", request_id = 3_i64, engine = "simulated");
            let _inner = inner.enter();
            tracing::info!(score = 0.82, "analysis complete");
        });
        let _ = provider.force_flush();

        let records = read_records(&path);
        assert_eq!(records.len(), 2);

        let inner = &records[0];
        let outer = &records[1];
        assert_eq!(inner.name, "engine.analyze");
        assert_eq!(inner.service, "detector-test");
        assert_eq!(inner.attributes["request_id"], JsonValue::from(3));
        assert_eq!(inner.attributes["engine"], JsonValue::from("simulated"));
        assert_eq!(inner.parent_span_id.as_deref(), Some(outer.span_id.as_str()));
        assert_eq!(inner.trace_id, outer.trace_id);
        assert_eq!(inner.events.len(), 1);
        assert_eq!(inner.events[0].name, "analysis complete");
        assert!(outer.parent_span_id.is_none());
    }

    #[test]
    fn trace_context_parents_detached_work() {
        use tracing_opentelemetry::OpenTelemetrySpanExt;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("spans.jsonl");
        let provider = provider(path.clone());
        let subscriber = tracing_subscriber::registry()
            .with(tracing_opentelemetry::layer().with_tracer(provider.tracer("test")));

        tracing::subscriber::with_default(subscriber, || {
            let context = {
                let submit = tracing::info_span!("submit");
                let _submit = submit.enter();
                TraceContext::from_current()
            };
            let parent = context
                .expect("context inside an exported span")
                .parent_context()
                .expect("valid ids");

            let unrelated = tracing::info_span!("unrelated");
            let _unrelated = unrelated.enter();
            let worker = tracing::info_span!(parent: None, "worker");
            worker.set_parent(parent);
            drop(worker);
        });
        let _ = provider.force_flush();

        let records = read_records(&path);
        let submit = records.iter().find(|r| r.name == "submit").unwrap();
        let worker = records.iter().find(|r| r.name == "worker").unwrap();
        let unrelated = records.iter().find(|r| r.name == "unrelated").unwrap();
        assert_eq!(worker.trace_id, submit.trace_id);
        assert_eq!(worker.parent_span_id.as_deref(), Some(submit.span_id.as_str()));
        assert_ne!(worker.trace_id, unrelated.trace_id);
    }

    #[test]
    fn shut_down_exporter_refuses_batches() {
        let dir = tempfile::tempdir().unwrap();
        let mut exporter = JsonLinesExporter::new(dir.path().join("x.jsonl"), &Resource::empty());
        exporter.shutdown();

        let result = futures_util::FutureExt::now_or_never(exporter.export(vec![]));
        assert!(matches!(result, Some(Err(_))));
    }

    #[test]
    fn json_values_keep_their_types() {
        assert_eq!(value_to_json(&Value::Bool(true)), JsonValue::Bool(true));
        assert_eq!(value_to_json(&Value::I64(-4)), JsonValue::from(-4));
        assert_eq!(value_to_json(&Value::F64(f64::NAN)), JsonValue::Null);
        assert_eq!(value_to_json(&Value::from("x")), JsonValue::from("x"));
    }
}
