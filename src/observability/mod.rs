//! Logging and OpenTelemetry span export.
//!
//! Events and spans from the `tracing` macros used throughout the crate are
//! always formatted to stderr. Optionally they are also exported as
//! OpenTelemetry spans to a JSON lines file:
//!
//! ```text
//! tracing -> tracing-opentelemetry -> OpenTelemetry SDK -> JsonLinesExporter -> spans.jsonl
//! ```
//!
//! # Features
//!
//! - **File-Based Export**: spans written to `<data dir>/deepfake-detector/spans.jsonl`
//! - **Automatic Rotation**: files rotate at 10MB with 3 backups kept
//! - **Linked Engine Spans**: engine work carries the submitting span's
//!   trace context, so the two show up in one trace
//!
//! # Configuration
//!
//! The filter is controlled via:
//! 1. `RUST_LOG` environment variable (highest priority)
//! 2. `trace_level` config option
//! 3. Default: `"info"`
//!
//! Export is enabled by `trace_export`.
//!
//! # Modules
//!
//! - `init`: Subscriber setup
//! - `export`: Span records and the JSON lines exporter
//! - `file_writer`: Rotating file writer

mod export;
mod file_writer;
mod init;

pub use export::{tracer_provider, EventRecord, JsonLinesExporter, SpanRecord};
pub use file_writer::RotatingWriter;
pub use init::{init_tracing, trace_file, SERVICE_NAME};
