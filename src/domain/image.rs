//! Submitted image model and upload validation.
//!
//! An [`ImageUpload`] is whatever the image source collaborator hands over:
//! bytes plus a declared media type. It only becomes an [`ImageHandle`] after
//! passing [`ImageHandle::from_upload`], so every handle the state machine or
//! the engine ever sees satisfies the upload invariants.

use super::error::{DetectorError, Result};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Default upload ceiling in bytes (10 MiB).
pub const DEFAULT_MAX_BYTES: u64 = 10 * 1024 * 1024;

/// Raw, unvalidated file selection.
#[derive(Clone, PartialEq, Eq)]
pub struct ImageUpload {
    /// File name as reported by the source, if known.
    pub name: Option<String>,
    /// Declared media type, e.g. `image/png`.
    pub media_type: String,
    /// File contents.
    pub bytes: Vec<u8>,
}

impl ImageUpload {
    /// Creates an upload from its parts.
    #[must_use]
    pub fn new(name: Option<String>, media_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name,
            media_type: media_type.into(),
            bytes,
        }
    }
}

impl std::fmt::Debug for ImageUpload {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImageUpload")
            .field("name", &self.name)
            .field("media_type", &self.media_type)
            .field("size", &self.bytes.len())
            .finish()
    }
}

/// Validated reference to a user-submitted image.
///
/// # Invariants
///
/// - `media_type` is `image/<subtype>` with a non-empty subtype
/// - the byte buffer is non-empty
/// - the size does not exceed the ceiling it was validated against
///
/// Cloning is cheap: the contents are shared. Deserialized handles go
/// through the same checks as [`ImageHandle::from_upload`], against
/// [`DEFAULT_MAX_BYTES`].
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawImageHandle")]
pub struct ImageHandle {
    name: Option<String>,
    media_type: String,
    bytes: Arc<[u8]>,
}

impl ImageHandle {
    /// Validates an upload against the media-type pattern and size ceiling.
    ///
    /// The media type is normalized to lowercase with any parameters
    /// (`; charset=...`) stripped.
    ///
    /// # Errors
    ///
    /// Returns [`DetectorError::InvalidImage`] when the media type is not an
    /// image type, the buffer is empty, or it is larger than `max_bytes`.
    ///
    /// # Examples
    ///
    /// ```
    /// use deepfake_detector::domain::{ImageHandle, ImageUpload, DEFAULT_MAX_BYTES};
    ///
    /// let upload = ImageUpload::new(Some("cat.png".into()), "image/png", vec![0x89, b'P', b'N', b'G']);
    /// let handle = ImageHandle::from_upload(upload, DEFAULT_MAX_BYTES)?;
    /// assert_eq!(handle.size(), 4);
    ///
    /// let text = ImageUpload::new(None, "text/plain", b"hello".to_vec());
    /// assert!(ImageHandle::from_upload(text, DEFAULT_MAX_BYTES).is_err());
    /// # Ok::<(), deepfake_detector::DetectorError>(())
    /// ```
    pub fn from_upload(upload: ImageUpload, max_bytes: u64) -> Result<Self> {
        let media_type = normalize_media_type(&upload.media_type);

        if !is_image_media_type(&media_type) {
            return Err(DetectorError::InvalidImage(format!(
                "unsupported media type {:?}, expected image/*",
                upload.media_type
            )));
        }

        if upload.bytes.is_empty() {
            return Err(DetectorError::InvalidImage("file is empty".to_string()));
        }

        let size = upload.bytes.len() as u64;
        if size > max_bytes {
            return Err(DetectorError::InvalidImage(format!(
                "file is {size} bytes, larger than the {max_bytes} byte limit"
            )));
        }

        Ok(Self {
            name: upload.name,
            media_type,
            bytes: upload.bytes.into(),
        })
    }

    /// File name reported by the source, if any.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Name for display, falling back to the media type.
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.media_type)
    }

    /// Normalized media type.
    #[must_use]
    pub fn media_type(&self) -> &str {
        &self.media_type
    }

    /// Image contents.
    #[must_use]
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Size in bytes.
    #[must_use]
    pub fn size(&self) -> u64 {
        self.bytes.len() as u64
    }
}

/// Wire form of an [`ImageHandle`] before validation.
#[derive(Deserialize)]
struct RawImageHandle {
    name: Option<String>,
    media_type: String,
    bytes: Vec<u8>,
}

impl TryFrom<RawImageHandle> for ImageHandle {
    type Error = DetectorError;

    fn try_from(raw: RawImageHandle) -> Result<Self> {
        Self::from_upload(
            ImageUpload::new(raw.name, raw.media_type, raw.bytes),
            DEFAULT_MAX_BYTES,
        )
    }
}

impl std::fmt::Debug for ImageHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImageHandle")
            .field("name", &self.name)
            .field("media_type", &self.media_type)
            .field("size", &self.bytes.len())
            .finish()
    }
}

/// Lowercases a media type and drops parameters.
fn normalize_media_type(media_type: &str) -> String {
    media_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase()
}

/// Returns `true` for `image/<subtype>` with a non-empty subtype.
///
/// Expects an already normalized media type.
#[must_use]
pub fn is_image_media_type(media_type: &str) -> bool {
    media_type
        .strip_prefix("image/")
        .is_some_and(|subtype| !subtype.is_empty() && !subtype.contains('/'))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn upload(media_type: &str, len: usize) -> ImageUpload {
        ImageUpload::new(Some("photo".into()), media_type, vec![7; len])
    }

    #[test]
    fn accepts_any_image_subtype() {
        for media_type in ["image/png", "image/jpeg", "image/webp", "IMAGE/GIF", "image/svg+xml"] {
            let handle = ImageHandle::from_upload(upload(media_type, 16), DEFAULT_MAX_BYTES)
                .unwrap_or_else(|e| panic!("{media_type} rejected: {e}"));
            assert!(handle.media_type().starts_with("image/"));
        }
    }

    #[test]
    fn strips_media_type_parameters() {
        let handle = ImageHandle::from_upload(upload("image/PNG; q=0.9", 4), DEFAULT_MAX_BYTES).unwrap();
        assert_eq!(handle.media_type(), "image/png");
    }

    #[test]
    fn rejects_non_image_media_types() {
        for media_type in ["text/plain", "application/octet-stream", "image/", "image", "", "video/mp4"] {
            let result = ImageHandle::from_upload(upload(media_type, 16), DEFAULT_MAX_BYTES);
            assert!(
                matches!(result, Err(DetectorError::InvalidImage(_))),
                "{media_type:?} should be rejected"
            );
        }
    }

    #[test]
    fn rejects_empty_buffer() {
        let result = ImageHandle::from_upload(upload("image/png", 0), DEFAULT_MAX_BYTES);
        assert!(matches!(result, Err(DetectorError::InvalidImage(msg)) if msg.contains("empty")));
    }

    #[test]
    fn size_ceiling_is_inclusive() {
        assert!(ImageHandle::from_upload(upload("image/png", 100), 100).is_ok());
        assert!(ImageHandle::from_upload(upload("image/png", 101), 100).is_err());
    }

    #[test]
    fn debug_output_omits_bytes() {
        let handle = ImageHandle::from_upload(upload("image/png", 3), DEFAULT_MAX_BYTES).unwrap();
        let debug = format!("{handle:?}");
        assert!(debug.contains("size: 3"));
        assert!(!debug.contains("[7, 7, 7]"));
    }

    #[test]
    fn deserialization_revalidates() {
        let handle = ImageHandle::from_upload(upload("image/png", 3), DEFAULT_MAX_BYTES).unwrap();
        let json = serde_json::to_string(&handle).unwrap();
        assert_eq!(serde_json::from_str::<ImageHandle>(&json).unwrap(), handle);

        for json in [
            r#"{"name":null,"media_type":"text/plain","bytes":[1,2]}"#,
            r#"{"name":"a.png","media_type":"image/png","bytes":[]}"#,
        ] {
            let err = serde_json::from_str::<ImageHandle>(json).unwrap_err();
            assert!(err.to_string().contains("Invalid image"), "{json}: {err}");
        }
    }
}
