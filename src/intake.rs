//! Reads the two input photos into encoded payloads.

use std::path::Path;

use image::ImageFormat;

use crate::error::TransferError;
use crate::params::{mime_from_extension, ACCEPTED_INPUT_TYPES};
use crate::ports::{EncodedImage, ImageRole};

/// Read an image file and encode it for the request.
///
/// The media type is sniffed from the file contents, falling back to the
/// extension when the contents are not recognized.
///
/// # Errors
///
/// Returns an error if the file cannot be read, is empty, or is not a PNG,
/// JPEG or WebP image.
pub fn load_image(path: &Path, role: ImageRole) -> Result<EncodedImage, TransferError> {
    let bytes = std::fs::read(path).map_err(|e| {
        TransferError::InvalidInput(format!("cannot read {role:?} image {}: {e}", path.display()))
    })?;

    if bytes.is_empty() {
        return Err(TransferError::InvalidInput(format!(
            "{role:?} image {} is empty",
            path.display()
        )));
    }

    let mime = sniff_mime(&bytes)
        .or_else(|| path.extension().and_then(|e| e.to_str()).and_then(mime_from_extension))
        .filter(|m| ACCEPTED_INPUT_TYPES.contains(m))
        .ok_or_else(|| {
            TransferError::InvalidInput(format!(
                "{role:?} image {} is not a supported type. Valid: {}",
                path.display(),
                ACCEPTED_INPUT_TYPES.join(", ")
            ))
        })?;

    tracing::debug!(?role, path = %path.display(), mime, bytes = bytes.len(), "loaded input image");
    Ok(EncodedImage::from_bytes(&bytes, mime))
}

/// Detect the media type from magic bytes.
fn sniff_mime(bytes: &[u8]) -> Option<&'static str> {
    match image::guess_format(bytes).ok()? {
        ImageFormat::Png => Some("image/png"),
        ImageFormat::Jpeg => Some("image/jpeg"),
        ImageFormat::WebP => Some("image/webp"),
        ImageFormat::Gif => Some("image/gif"),
        _ => None,
    }
}
