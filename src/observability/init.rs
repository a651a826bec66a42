//! Tracing initialization and subscriber setup.

use super::export;
use crate::Config;
use opentelemetry::trace::TracerProvider as _;
use opentelemetry_sdk::resource::Resource;
use std::path::PathBuf;
use tracing_opentelemetry::OpenTelemetryLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Service name attached to exported spans.
pub const SERVICE_NAME: &str = "deepfake-detector";

/// File receiving exported spans.
#[must_use]
pub fn trace_file() -> PathBuf {
    crate::infrastructure::data_dir().join("spans.jsonl")
}

/// Builds the event filter.
///
/// `RUST_LOG` wins over `trace_level`, which wins over `info`. An
/// unparsable directive falls back to `info`.
fn filter(config: &Config) -> EnvFilter {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return filter;
    }

    let level = config.trace_level.as_deref().unwrap_or("info");
    EnvFilter::try_new(level).unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Installs the global tracing subscriber.
///
/// The pipeline always has a compact formatter on stderr. With
/// `trace_export` set it also feeds an OpenTelemetry layer whose spans are
/// written to [`trace_file`].
///
/// Idempotent: only the first call installs anything. Returns `true` if this
/// call installed the subscriber.
///
/// # Example
///
/// ```rust
/// use deepfake_detector::observability::init_tracing;
/// use deepfake_detector::Config;
///
/// let config = Config {
///     trace_level: Some("debug".to_string()),
///     ..Default::default()
/// };
///
/// init_tracing(&config);
/// tracing::debug!("tracing is now active");
/// ```
pub fn init_tracing(config: &Config) -> bool {
    let trace_path = trace_file();
    let export_dir_error = if config.trace_export {
        trace_path
            .parent()
            .and_then(|dir| std::fs::create_dir_all(dir).err())
    } else {
        None
    };

    let otel_layer = (config.trace_export && export_dir_error.is_none()).then(|| {
        let resource = Resource::new(vec![opentelemetry::KeyValue::new(
            "service.name",
            SERVICE_NAME,
        )]);
        let provider = export::tracer_provider(trace_path.clone(), resource);
        OpenTelemetryLayer::new(provider.tracer(SERVICE_NAME))
    });

    let fmt_layer = tracing_subscriber::fmt::layer()
        .compact()
        .with_target(false)
        .with_writer(std::io::stderr);

    let installed = tracing_subscriber::registry()
        .with(filter(config))
        .with(fmt_layer)
        .with(otel_layer)
        .try_init()
        .is_ok();

    if let Some(e) = export_dir_error {
        tracing::warn!(path = %trace_path.display(), error = %e, "span export disabled");
    } else if installed && config.trace_export {
        tracing::debug!(path = %trace_path.display(), "exporting spans");
    }

    installed
}
