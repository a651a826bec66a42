//! Analysis engine boundary.
//!
//! This module defines the [`AnalysisEngine`] capability: a single
//! asynchronous operation turning a validated image into an
//! [`AnalysisResult`]. The presentation state machine depends only on this
//! trait, so the bundled [`SimulatedEngine`] can be swapped for a real
//! inference backend without touching it.
//!
//! # Architecture
//!
//! - `messages`: Request/response envelope with trace context propagation
//! - `simulated`: Stub engine producing biased pseudo-random results
//!
//! # Example
//!
//! ```no_run
//! use deepfake_detector::engine::{AnalysisEngine, SimulatedEngine};
//! use deepfake_detector::domain::{ImageHandle, ImageUpload, DEFAULT_MAX_BYTES};
//!
//! # async fn run() -> deepfake_detector::Result<()> {
//! let engine = SimulatedEngine::new(std::time::Duration::from_millis(2500));
//! let image = ImageHandle::from_upload(
//!     ImageUpload::new(None, "image/png", std::fs::read("face.png")?),
//!     DEFAULT_MAX_BYTES,
//! )?;
//! let result = engine.analyze(&image).await?;
//! println!("score {}%", result.score_percent());
//! # Ok(())
//! # }
//! ```

pub mod messages;
pub mod simulated;

pub use messages::{EngineRequest, EngineResponse, TraceContext};
pub use simulated::SimulatedEngine;

use crate::domain::{AnalysisResult, ImageHandle, Result};
use async_trait::async_trait;

/// Pluggable analysis capability.
///
/// Implementations receive only handles that already passed upload
/// validation. They must not retry or cache; timeouts and cancellation are
/// the caller's responsibility.
#[async_trait]
pub trait AnalysisEngine: Send + Sync {
    /// Short engine name for logs.
    fn name(&self) -> &str;

    /// Analyses an image.
    ///
    /// # Errors
    ///
    /// Returns [`crate::DetectorError::AnalysisFailure`] when the image cannot
    /// be analysed (corrupt data, unsupported format, backend failure).
    async fn analyze(&self, image: &ImageHandle) -> Result<AnalysisResult>;
}
