//! Image source: turning a file on disk into an [`ImageUpload`].
//!
//! The declared media type is taken from the file signature (magic bytes)
//! when it is recognized, and from the extension otherwise. Validation against
//! the `image/*` pattern is left to [`ImageHandle::from_upload`]; this module
//! only refuses files that are too large to be worth reading.
//!
//! [`ImageHandle::from_upload`]: crate::domain::ImageHandle::from_upload

use crate::domain::{DetectorError, ImageUpload, Result};
use std::fs;
use std::path::Path;

/// Media type reported when neither signature nor extension is recognized.
const UNKNOWN_MEDIA_TYPE: &str = "application/octet-stream";

/// Reads an image file into an upload.
///
/// # Errors
///
/// Returns [`DetectorError::InvalidImage`] when the file is larger than
/// `max_bytes` (checked before reading) and [`DetectorError::Io`] when it
/// cannot be read.
///
/// # Examples
///
/// ```no_run
/// use deepfake_detector::source::load_upload;
/// use deepfake_detector::DEFAULT_MAX_BYTES;
///
/// let upload = load_upload("portrait.jpg", DEFAULT_MAX_BYTES)?;
/// println!("{} ({} bytes)", upload.media_type, upload.bytes.len());
/// # Ok::<(), deepfake_detector::DetectorError>(())
/// ```
pub fn load_upload(path: impl AsRef<Path>, max_bytes: u64) -> Result<ImageUpload> {
    let path = path.as_ref();
    let size = fs::metadata(path)?.len();

    if size > max_bytes {
        return Err(DetectorError::InvalidImage(format!(
            "{} is {size} bytes, larger than the {max_bytes} byte limit",
            path.display()
        )));
    }

    let bytes = fs::read(path)?;
    let media_type = sniff_media_type(&bytes, path);
    let name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned());

    tracing::debug!(
        path = %path.display(),
        media_type,
        size = bytes.len(),
        "loaded image file"
    );

    Ok(ImageUpload::new(name, media_type, bytes))
}

/// Determines the media type from the file signature, then the extension.
#[must_use]
pub fn sniff_media_type(bytes: &[u8], path: &Path) -> &'static str {
    if let Some(kind) = infer::get(bytes) {
        if kind.matcher_type() != infer::MatcherType::Image {
            tracing::debug!(detected = kind.mime_type(), "file signature is not an image");
        }
        return kind.mime_type();
    }

    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase);

    match extension.as_deref() {
        Some("png") => "image/png",
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("webp") => "image/webp",
        Some("gif") => "image/gif",
        Some("bmp") => "image/bmp",
        Some("svg") => "image/svg+xml",
        Some("tif" | "tiff") => "image/tiff",
        Some("avif") => "image/avif",
        Some("heic") => "image/heic",
        _ => UNKNOWN_MEDIA_TYPE,
    }
}
