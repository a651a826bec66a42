//! Error types for the deepfake detector.
//!
//! This module defines the centralized error type [`DetectorError`], the
//! copyable [`ErrorKind`] stored in presentation state and notifications, and
//! a [`Result`] alias used throughout the crate. Errors are implemented with
//! the `thiserror` crate.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The main error type for detector operations.
///
/// Every user-facing variant maps onto an [`ErrorKind`]. None of them is fatal
/// to a session: the event handler turns each one into a state transition plus
/// a notification.
///
/// # Examples
///
/// ```
/// use deepfake_detector::domain::{DetectorError, ErrorKind};
///
/// let error = DetectorError::InvalidImage("unsupported media type text/plain".to_string());
/// assert_eq!(error.kind(), Some(ErrorKind::InvalidImage));
/// ```
#[derive(Debug, Error)]
pub enum DetectorError {
    /// The selected file failed the media-type, emptiness or size check.
    ///
    /// Raised at selection time; the image never reaches the engine.
    #[error("Invalid image: {0}")]
    InvalidImage(String),

    /// Analysis was requested while no image was selected.
    #[error("No image selected")]
    NoImageSelected,

    /// The analysis engine rejected the image or produced an unusable result.
    #[error("Analysis failed: {0}")]
    AnalysisFailure(String),

    /// Configuration is invalid or could not be parsed.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Filesystem or I/O operation failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl DetectorError {
    /// Returns the user-facing kind of this error, if it has one.
    ///
    /// Configuration and I/O errors are operator problems rather than session
    /// outcomes, so they carry no kind.
    #[must_use]
    pub const fn kind(&self) -> Option<ErrorKind> {
        match self {
            Self::InvalidImage(_) => Some(ErrorKind::InvalidImage),
            Self::NoImageSelected => Some(ErrorKind::NoImageSelected),
            Self::AnalysisFailure(_) => Some(ErrorKind::AnalysisFailure),
            Self::Config(_) | Self::Io(_) => None,
        }
    }
}

/// Serializable classification of user-facing errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorKind {
    /// Selected file is not an acceptable image.
    InvalidImage,
    /// Analyze requested with nothing selected.
    NoImageSelected,
    /// Engine rejected the analysis.
    AnalysisFailure,
}

impl ErrorKind {
    /// Stable lowercase name, used in log fields.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::InvalidImage => "invalid_image",
            Self::NoImageSelected => "no_image_selected",
            Self::AnalysisFailure => "analysis_failure",
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A specialized `Result` type for detector operations.
pub type Result<T> = std::result::Result<T, DetectorError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_and_io_errors_have_no_kind() {
        assert_eq!(DetectorError::Config("bad".into()).kind(), None);
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        assert_eq!(DetectorError::from(io).kind(), None);
    }

    #[test]
    fn messages_are_prefixed_by_category() {
        let error = DetectorError::AnalysisFailure("corrupt image".into());
        assert_eq!(error.to_string(), "Analysis failed: corrupt image");
        assert_eq!(DetectorError::NoImageSelected.to_string(), "No image selected");
    }
}
