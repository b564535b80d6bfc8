//! Turns two photos and a mode into one generation call.

use crate::error::TransferError;
use crate::mode::PrecisionMode;
use crate::params::{GENERATION_ASPECT_RATIO, GENERATION_SIZE};
use crate::ports::{EncodedImage, GenerationRequest, ImageGenerator};
use crate::prompt::build_instruction;

/// Assemble the request for a base/style pair.
///
/// The first image is always the base and the second always the style.
#[must_use]
pub fn build_request(
    model: &str,
    base: EncodedImage,
    style: EncodedImage,
    mode: PrecisionMode,
) -> GenerationRequest {
    GenerationRequest {
        model: model.to_string(),
        base,
        style,
        instruction: build_instruction(mode),
        aspect_ratio: GENERATION_ASPECT_RATIO.to_string(),
        size: GENERATION_SIZE.to_string(),
    }
}

/// Send one hairstyle transfer request and return the generated image.
///
/// Errors from the generator are returned as-is, so a transport failure and
/// a response without an image stay distinguishable. A successful result
/// always carries a non-empty payload.
///
/// # Errors
///
/// Returns [`TransferError::InvalidInput`] if either image is empty and
/// [`TransferError::NoImageProduced`] if the generator succeeds with an empty
/// payload, otherwise whatever the generator returns.
pub async fn dispatch(
    generator: &dyn ImageGenerator,
    model: &str,
    base: EncodedImage,
    style: EncodedImage,
    mode: PrecisionMode,
) -> Result<EncodedImage, TransferError> {
    if base.is_empty() || style.is_empty() {
        return Err(TransferError::InvalidInput(
            "Please provide both a customer photo and a style reference.".into(),
        ));
    }

    let request = build_request(model, base, style, mode);
    tracing::info!(
        model,
        %mode,
        overrides_color = mode.overrides_color_preservation(),
        size = %request.size,
        aspect_ratio = %request.aspect_ratio,
        "dispatching generation"
    );

    let image = generator.generate(&request).await?;
    if image.is_empty() {
        tracing::warn!(mime = %image.mime_type, "generator returned an empty payload");
        return Err(TransferError::NoImageProduced { detail: None });
    }
    tracing::debug!(mime = %image.mime_type, "generation returned an image");
    Ok(image)
}
