//! Deepfake detector: the core of an image manipulation-analysis front end.
//!
//! A user submits an image, triggers an analysis, and is shown the outcome as
//! a manipulation score, a confidence percentage, and a breakdown of
//! heuristic features. The crate provides:
//! - A validated analysis contract shared by every component
//! - A pluggable asynchronous analysis engine with a simulated stub
//! - A result presentation state machine with single-flight analysis and
//!   stale-response protection
//! - Terminal rendering of the resulting view model with theme support
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────┐
//! │  CLI (main.rs)                                      │  ← Entry point
//! └─────────────────────────────────────────────────────┘
//!                        │
//! ┌─────────────────────────────────────────────────────┐
//! │  Application Layer (app/)                           │  ← State machine
//! │  - Event handling and transition table              │
//! │  - Action execution (controller)                    │
//! │  - View model computation                           │
//! └─────────────────────────────────────────────────────┘
//!         │                    │                    │
//! ┌───────────────┐   ┌───────────────┐   ┌───────────────┐
//! │ UI Layer      │   │ Engine Layer  │   │ Image Source  │
//! │ (ui/)         │   │ (engine/)     │   │ (source)      │
//! │ - Rendering   │   │ - Trait       │   │ - File load   │
//! │ - Theming     │   │ - Simulated   │   │ - Sniffing    │
//! │               │   │ - Envelope    │   │               │
//! └───────────────┘   └───────────────┘   └───────────────┘
//!         │                    │                    │
//! ┌─────────────────────────────────────────────────────┐
//! │  Infrastructure & Domain Layers                     │
//! │  - Platform paths (infrastructure/)                 │
//! │  - Error types (domain/error)                       │
//! │  - Analysis contract (domain/analysis, domain/image)│
//! └─────────────────────────────────────────────────────┘
//!                        │
//! ┌─────────────────────────────────────────────────────┐
//! │  Observability (observability/)                     │
//! │  - tracing subscriber setup                         │
//! │  - OpenTelemetry span export to a JSON lines file   │
//! └─────────────────────────────────────────────────────┘
//! ```
//!
//! # Modules
//!
//! - [`app`]: Presentation state machine with event/action model
//! - [`domain`]: Analysis contract and error types
//! - [`engine`]: Analysis engine trait, simulated engine, request envelope
//! - [`infrastructure`]: Platform-specific utilities (paths)
//! - [`source`]: Loading images from disk
//! - [`ui`]: Terminal rendering with theme support
//! - [`observability`]: Tracing setup and span export
//!
//! # Configuration
//!
//! Settings come from defaults, a TOML file, or a string option map:
//!
//! ```toml
//! max_bytes = 10485760
//! simulated_latency_ms = 2500
//! simulated_failure_rate = 0.0
//! theme = "midnight"
//! trace_level = "debug"
//! trace_export = true
//! ```
//!
//! # Example
//!
//! ```rust
//! use deepfake_detector::{handle_event, initialize, Config, Event, PresentationState};
//! use deepfake_detector::domain::ImageUpload;
//!
//! let mut session = initialize(&Config::default());
//!
//! let upload = ImageUpload::new(Some("face.png".into()), "image/png", vec![0x89; 1024]);
//! let (render, actions) = handle_event(&mut session, Event::SelectImage(upload));
//!
//! assert!(render);
//! assert!(actions.is_empty());
//! assert!(matches!(session.state(), PresentationState::ImageSelected(_)));
//! ```

#![allow(clippy::multiple_crate_versions)]

pub mod app;
pub mod domain;
pub mod engine;
pub mod infrastructure;
pub mod observability;
pub mod source;
pub mod ui;

pub use app::{handle_event, Action, Controller, Event, PresentationState, Session};
pub use domain::{DetectorError, ErrorKind, Result, DEFAULT_MAX_BYTES};
pub use engine::{AnalysisEngine, SimulatedEngine};
pub use ui::Theme;

use engine::simulated::DEFAULT_LATENCY_MS;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use std::str::FromStr;

/// Runtime configuration.
///
/// Keys accept both `snake_case` and the `camelCase` spelling used by web
/// front ends (`maxBytes`, `simulatedLatencyMs`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Upload size ceiling in bytes. Default: 10 MiB.
    #[serde(alias = "maxBytes")]
    pub max_bytes: u64,

    /// Delay of the simulated engine in milliseconds. Default: 2500.
    #[serde(alias = "simulatedLatencyMs")]
    pub simulated_latency_ms: u64,

    /// Probability in `[0, 1]` that the simulated engine rejects an image.
    /// Default: 0.
    #[serde(alias = "simulatedFailureRate")]
    pub simulated_failure_rate: f64,

    /// Built-in theme name. Ignored if `theme_file` is set.
    #[serde(rename = "theme", alias = "theme_name")]
    pub theme_name: Option<String>,

    /// Path to a custom TOML theme file.
    #[serde(alias = "themeFile")]
    pub theme_file: Option<String>,

    /// Tracing filter directive (`info`, `debug`, `deepfake_detector=trace`).
    /// `RUST_LOG` takes precedence.
    #[serde(alias = "traceLevel")]
    pub trace_level: Option<String>,

    /// Export OpenTelemetry spans to a JSON lines file in the data directory.
    #[serde(alias = "traceExport")]
    pub trace_export: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_bytes: DEFAULT_MAX_BYTES,
            simulated_latency_ms: DEFAULT_LATENCY_MS,
            simulated_failure_rate: 0.0,
            theme_name: None,
            theme_file: None,
            trace_level: None,
            trace_export: false,
        }
    }
}

impl Config {
    /// Parses configuration from a string option map.
    ///
    /// Missing keys keep their defaults; unknown keys are ignored.
    ///
    /// # Errors
    ///
    /// Returns [`DetectorError::Config`] when a value does not parse or the
    /// result fails [`Config::validate`].
    ///
    /// # Example
    ///
    /// ```rust
    /// use std::collections::BTreeMap;
    /// use deepfake_detector::Config;
    ///
    /// let mut map = BTreeMap::new();
    /// map.insert("maxBytes".to_string(), "1024".to_string());
    /// map.insert("simulated_latency_ms".to_string(), "10".to_string());
    ///
    /// let config = Config::from_map(&map)?;
    /// assert_eq!(config.max_bytes, 1024);
    /// assert_eq!(config.simulated_latency_ms, 10);
    /// # Ok::<(), deepfake_detector::DetectorError>(())
    /// ```
    pub fn from_map(map: &BTreeMap<String, String>) -> Result<Self> {
        let defaults = Self::default();
        let get = |snake: &str, camel: &str| map.get(snake).or_else(|| map.get(camel));

        let config = Self {
            max_bytes: parse_option(get("max_bytes", "maxBytes"), "max_bytes")?
                .unwrap_or(defaults.max_bytes),
            simulated_latency_ms: parse_option(
                get("simulated_latency_ms", "simulatedLatencyMs"),
                "simulated_latency_ms",
            )?
            .unwrap_or(defaults.simulated_latency_ms),
            simulated_failure_rate: parse_option(
                get("simulated_failure_rate", "simulatedFailureRate"),
                "simulated_failure_rate",
            )?
            .unwrap_or(defaults.simulated_failure_rate),
            theme_name: get("theme", "theme_name").cloned(),
            theme_file: get("theme_file", "themeFile").cloned(),
            trace_level: get("trace_level", "traceLevel").cloned(),
            trace_export: parse_option(get("trace_export", "traceExport"), "trace_export")?
                .unwrap_or(defaults.trace_export),
        };

        config.validate()?;
        Ok(config)
    }

    /// Parses configuration from TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`DetectorError::Config`] on malformed TOML, unknown keys, or
    /// values that fail [`Config::validate`].
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: Self = toml::from_str(text)
            .map_err(|e| DetectorError::Config(format!("invalid configuration: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Loads configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns [`DetectorError::Io`] if the file cannot be read, otherwise
    /// as [`Config::from_toml_str`].
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        tracing::debug!(path = %path.display(), "loaded configuration file");
        Self::from_toml_str(&text)
    }

    /// Checks value ranges.
    ///
    /// # Errors
    ///
    /// Returns [`DetectorError::Config`] when `max_bytes` is zero or
    /// `simulated_failure_rate` is outside `[0, 1]`.
    pub fn validate(&self) -> Result<()> {
        if self.max_bytes == 0 {
            return Err(DetectorError::Config("max_bytes must be positive".to_string()));
        }

        if !(0.0..=1.0).contains(&self.simulated_failure_rate) {
            return Err(DetectorError::Config(format!(
                "simulated_failure_rate must be within [0, 1], got {}",
                self.simulated_failure_rate
            )));
        }

        Ok(())
    }

    /// Resolves the configured theme, falling back to the default.
    ///
    /// A theme file takes precedence over a theme name. Load failures are
    /// logged, not returned.
    #[must_use]
    pub fn theme(&self) -> Theme {
        if let Some(theme_file) = &self.theme_file {
            return Theme::from_file(infrastructure::expand_tilde(theme_file)).unwrap_or_else(|e| {
                tracing::warn!(theme_file = %theme_file, error = %e, "failed to load theme from file, using default");
                Theme::default()
            });
        }

        self.theme_name.as_ref().map_or_else(Theme::default, |theme_name| {
            Theme::from_name(theme_name).unwrap_or_else(|| {
                tracing::warn!(theme_name = %theme_name, "unknown theme, using default");
                Theme::default()
            })
        })
    }
}

fn parse_option<T>(value: Option<&String>, key: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    value
        .map(|raw| {
            raw.trim()
                .parse::<T>()
                .map_err(|e| DetectorError::Config(format!("invalid {key} {raw:?}: {e}")))
        })
        .transpose()
}

/// Creates an idle session from configuration.
///
/// Resolves the theme and applies the upload ceiling. Tracing is set up
/// separately with [`observability::init_tracing`].
///
/// # Example
///
/// ```rust
/// use deepfake_detector::{initialize, Config, PresentationState};
///
/// let config = Config { max_bytes: 2048, ..Default::default() };
/// let session = initialize(&config);
/// assert_eq!(session.max_bytes, 2048);
/// assert_eq!(session.state(), &PresentationState::Idle);
/// ```
#[must_use]
pub fn initialize(config: &Config) -> Session {
    tracing::debug!(max_bytes = config.max_bytes, "initializing session");
    Session::new(config.max_bytes, config.theme())
}
