//! File naming, image saving, and format conversion.

use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use crate::error::TransferError;
use crate::mode::PrecisionMode;
use crate::params::format_extension;
use crate::ports::EncodedImage;

/// Stem used when the base photo name yields nothing usable.
const FALLBACK_STEM: &str = "barber-ai-styled-image";

/// Where the result should go.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputTarget {
    /// Write an image file.
    File(PathBuf),
    /// Print a `data:` URL on stdout.
    DataUrl,
}

/// Generate an output filename from the base photo, mode and format.
///
/// e.g. `customer-precise-1760000000.png`
#[must_use]
pub fn auto_filename(base: &Path, mode: PrecisionMode, format: &str) -> String {
    let stem = base.file_stem().map(|s| s.to_string_lossy()).unwrap_or_default();
    let sanitized = sanitize_for_filename(&stem, 40);
    let timestamp = SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or_default().as_secs();
    let ext = format_extension(format);
    format!("{sanitized}-{mode}-{timestamp}.{ext}")
}

/// Sanitize a string for use in a filename.
///
/// Lowercases, turns runs of other characters into single hyphens and
/// trims to `max_len`.
#[must_use]
pub fn sanitize_for_filename(input: &str, max_len: usize) -> String {
    let mut result = String::with_capacity(max_len);
    let mut last_was_hyphen = true; // no leading hyphen

    for ch in input.chars() {
        if result.len() >= max_len {
            break;
        }
        if ch.is_ascii_alphanumeric() {
            result.push(ch.to_ascii_lowercase());
            last_was_hyphen = false;
        } else if !last_was_hyphen {
            result.push('-');
            last_was_hyphen = true;
        }
    }

    while result.ends_with('-') {
        result.pop();
    }

    if result.is_empty() {
        FALLBACK_STEM.to_string()
    } else {
        result
    }
}

/// Resolve the output target: `-`, an explicit path, or an auto-generated name.
#[must_use]
pub fn resolve_output(
    explicit: Option<&str>,
    base: &Path,
    mode: PrecisionMode,
    format: &str,
) -> OutputTarget {
    match explicit {
        Some("-") => OutputTarget::DataUrl,
        Some(p) => OutputTarget::File(PathBuf::from(p)),
        None => OutputTarget::File(PathBuf::from(auto_filename(base, mode, format))),
    }
}

/// Save a generated image, converting to `target_format` if its type differs.
///
/// # Errors
///
/// Returns an error if the payload cannot be decoded, converted or written.
pub fn save_image(
    image: &EncodedImage,
    target_format: &str,
    output_path: &Path,
) -> Result<(), TransferError> {
    let data = image.decode()?;

    if mime_matches_format(&image.mime_type, target_format) {
        std::fs::write(output_path, data).map_err(TransferError::Io)
    } else {
        tracing::debug!(from = %image.mime_type, to = target_format, "converting output image");
        convert_and_save(&data, target_format, output_path)
    }
}

fn mime_matches_format(mime: &str, format: &str) -> bool {
    matches!((mime, format), ("image/jpeg", "jpeg") | ("image/png", "png") | ("image/webp", "webp"))
}

fn convert_and_save(
    data: &[u8],
    target_format: &str,
    output_path: &Path,
) -> Result<(), TransferError> {
    let img = image::load_from_memory(data)
        .map_err(|e| TransferError::ImageConversion(format!("Failed to decode image: {e}")))?;

    let image_format = match target_format {
        "jpeg" => image::ImageFormat::Jpeg,
        "png" => image::ImageFormat::Png,
        "webp" => image::ImageFormat::WebP,
        other => {
            return Err(TransferError::ImageConversion(format!("Unsupported format: {other}")));
        }
    };

    // JPEG has no alpha channel.
    let img = if image_format == image::ImageFormat::Jpeg {
        image::DynamicImage::ImageRgb8(img.to_rgb8())
    } else {
        img
    };

    img.save_with_format(output_path, image_format).map_err(|e| {
        TransferError::ImageConversion(format!("Failed to save as {target_format}: {e}"))
    })
}
