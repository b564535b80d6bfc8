//! Unified error type for barber.

use thiserror::Error;

/// Errors that can occur while transferring a hairstyle.
#[derive(Debug, Error)]
pub enum TransferError {
    /// The generation service answered with a failure status or an unreadable body.
    #[error("API error ({status}): {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Error message from the API.
        message: String,
    },

    /// The request never completed at the network layer.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The service answered successfully but returned no image part.
    #[error(
        "No image was generated by the API. The model may not have been able to fulfill \
         the request with the given images.{}",
        .detail.as_deref().map(|d| format!(" ({d})")).unwrap_or_default()
    )]
    NoImageProduced {
        /// Finish reason, block reason or model text, when the response carried one.
        detail: Option<String>,
    },

    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error.
    #[error("Config error: {0}")]
    Config(String),

    /// Invalid command-line argument.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// An input photo is missing, empty or not a supported image type.
    #[error("Invalid input image: {0}")]
    InvalidInput(String),

    /// Image payload could not be decoded from base64.
    #[error("Decode error: {0}")]
    Decode(#[from] base64::DecodeError),

    /// Image format conversion error.
    #[error("Image conversion error: {0}")]
    ImageConversion(String),

    /// No API key configured.
    #[error("No Gemini API key. Set {env_var} (environment or .env) or add [keys] gemini to the config file.")]
    MissingApiKey {
        /// The environment variable name.
        env_var: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_image_message_without_detail() {
        let e = TransferError::NoImageProduced { detail: None };
        let msg = e.to_string();
        assert!(msg.starts_with("No image was generated"));
        assert!(msg.ends_with("given images."));
    }

    #[test]
    fn no_image_message_with_detail() {
        let e = TransferError::NoImageProduced { detail: Some("finish reason: SAFETY".into()) };
        assert!(e.to_string().ends_with("(finish reason: SAFETY)"));
    }

    #[test]
    fn api_message_includes_status() {
        let e = TransferError::Api { status: 403, message: "API key not valid.".into() };
        assert_eq!(e.to_string(), "API error (403): API key not valid.");
    }
}
