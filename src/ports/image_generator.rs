//! Image generator port for the hairstyle transfer service.

use std::future::Future;
use std::pin::Pin;

use base64::Engine;
use serde::{Deserialize, Serialize};

use crate::error::TransferError;

/// A self-describing image payload: media type plus base64 text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncodedImage {
    /// MIME type of the image (e.g., `"image/png"`).
    pub mime_type: String,
    /// Standard base64 encoding of the raw image bytes.
    pub data: String,
}

impl EncodedImage {
    /// Encode raw bytes with the given media type.
    #[must_use]
    pub fn from_bytes(bytes: &[u8], mime_type: impl Into<String>) -> Self {
        Self {
            mime_type: mime_type.into(),
            data: base64::engine::general_purpose::STANDARD.encode(bytes),
        }
    }

    /// Decode the payload back to raw bytes.
    ///
    /// # Errors
    ///
    /// Returns an error if the payload is not valid base64.
    pub fn decode(&self) -> Result<Vec<u8>, TransferError> {
        Ok(base64::engine::general_purpose::STANDARD.decode(&self.data)?)
    }

    /// Render as a `data:` URL, the form a browser can display directly.
    #[must_use]
    pub fn to_data_url(&self) -> String {
        format!("data:{};base64,{}", self.mime_type, self.data)
    }

    /// Whether the payload carries no bytes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

/// Which part an input photo plays in the transfer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageRole {
    /// Subject photo: identity, face and hair color.
    Base,
    /// Reference photo: hairstyle shape and texture only.
    Style,
}

/// A single hairstyle transfer request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationRequest {
    /// The resolved model identifier (e.g., `"gemini-3-pro-image-preview"`).
    pub model: String,
    /// Subject photo.
    pub base: EncodedImage,
    /// Style reference photo.
    pub style: EncodedImage,
    /// Composed instruction text.
    pub instruction: String,
    /// Aspect ratio of the output.
    pub aspect_ratio: String,
    /// Resolution tier of the output.
    pub size: String,
}

impl GenerationRequest {
    /// Input images in the order they are sent: base first, style second.
    #[must_use]
    pub fn parts(&self) -> [(ImageRole, &EncodedImage); 2] {
        [(ImageRole::Base, &self.base), (ImageRole::Style, &self.style)]
    }
}

/// Boxed future type returned by [`ImageGenerator::generate`].
pub type GenerateFuture<'a> =
    Pin<Box<dyn Future<Output = Result<EncodedImage, TransferError>> + Send + 'a>>;

/// Produces one composite image per request via an external API.
pub trait ImageGenerator: Send + Sync {
    /// Issue one generation call for the given request.
    fn generate(&self, request: &GenerationRequest) -> GenerateFuture<'_>;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn image(mime: &str, data: &str) -> EncodedImage {
        EncodedImage { mime_type: mime.into(), data: data.into() }
    }

    #[test]
    fn from_bytes_decodes_back() {
        let img = EncodedImage::from_bytes(&[0xFF, 0xD8, 0xFF, 0xE0], "image/jpeg");
        assert_eq!(img.data, "/9j/4A==");
        assert_eq!(img.decode().unwrap(), vec![0xFF, 0xD8, 0xFF, 0xE0]);
    }

    #[test]
    fn decode_rejects_garbage() {
        assert!(matches!(image("image/png", "not base64!").decode(), Err(TransferError::Decode(_))));
    }

    #[test]
    fn data_url_form() {
        assert_eq!(image("image/png", "AAAA").to_data_url(), "data:image/png;base64,AAAA");
    }

    #[test]
    fn parts_are_base_then_style() {
        let request = GenerationRequest {
            model: "gemini-3-pro-image-preview".into(),
            base: image("image/jpeg", "QkFTRQ=="),
            style: image("image/png", "U1RZTEU="),
            instruction: "swap".into(),
            aspect_ratio: "1:1".into(),
            size: "4K".into(),
        };
        let [(first_role, first), (second_role, second)] = request.parts();
        assert_eq!(first_role, ImageRole::Base);
        assert_eq!(first.data, "QkFTRQ==");
        assert_eq!(second_role, ImageRole::Style);
        assert_eq!(second.data, "U1RZTEU=");
    }

    #[test]
    fn request_serializes_roles_by_name() {
        let request = GenerationRequest {
            model: "m".into(),
            base: image("image/jpeg", "QQ=="),
            style: image("image/webp", "Qg=="),
            instruction: "i".into(),
            aspect_ratio: "1:1".into(),
            size: "4K".into(),
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["base"]["mime_type"], "image/jpeg");
        assert_eq!(json["style"]["mime_type"], "image/webp");
    }
}
