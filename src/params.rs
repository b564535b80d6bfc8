//! Generation parameters and output format helpers.

/// Resolution tier requested from the service (the highest it offers).
pub const GENERATION_SIZE: &str = "4K";

/// Aspect ratio requested from the service.
pub const GENERATION_ASPECT_RATIO: &str = "1:1";

/// Media types accepted for the two input photos.
pub const ACCEPTED_INPUT_TYPES: [&str; 3] = ["image/png", "image/jpeg", "image/webp"];

/// Validate the output format parameter.
///
/// # Errors
///
/// Returns an error if the format is not recognized.
pub fn validate_format(format: &str) -> Result<(), String> {
    match format {
        "jpeg" | "png" | "webp" => Ok(()),
        _ => Err(format!("Unsupported format '{format}'. Valid: jpeg, png, webp")),
    }
}

/// Get the file extension for an output format.
#[must_use]
pub fn format_extension(format: &str) -> &'static str {
    match format {
        "jpeg" => "jpg",
        "webp" => "webp",
        // png and any unknown format
        _ => "png",
    }
}

/// Guess a media type from a file extension.
#[must_use]
pub fn mime_from_extension(ext: &str) -> Option<&'static str> {
    match ext.to_ascii_lowercase().as_str() {
        "png" => Some("image/png"),
        "jpg" | "jpeg" => Some("image/jpeg"),
        "webp" => Some("image/webp"),
        _ => None,
    }
}
