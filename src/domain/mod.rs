//! Domain layer for the deepfake detector.
//!
//! This module contains the analysis contract: the types exchanged between an
//! image submission and its analysis outcome, independent of the engine that
//! produces results or the UI that displays them.
//!
//! # Organization
//!
//! - [`analysis`]: Analysis result, feature scores and derived display values
//! - [`error`]: Error types and result aliases
//! - [`image`]: Submitted image handles and upload validation
//!
//! # Examples
//!
//! ```
//! use deepfake_detector::domain::{AnalysisResult, FeatureScore, Result};
//!
//! fn sample() -> Result<AnalysisResult> {
//!     AnalysisResult::new(
//!         0.82,
//!         0.91,
//!         vec![FeatureScore::new("Blending Artifacts", 0.74, "Seams around merged regions.")],
//!     )
//! }
//!
//! assert_eq!(sample()?.score_percent(), 82);
//! # Ok::<(), deepfake_detector::DetectorError>(())
//! ```

pub mod analysis;
pub mod error;
pub mod image;

pub use analysis::{
    is_manipulated, to_percent, AnalysisResult, FeatureScore, Verdict, MANIPULATION_THRESHOLD,
};
pub use error::{DetectorError, ErrorKind, Result};
pub use image::{ImageHandle, ImageUpload, DEFAULT_MAX_BYTES};
