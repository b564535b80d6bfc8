//! Live adapter for the Gemini image generation API.

use reqwest::Client;
use serde::Deserialize;

use crate::error::TransferError;
use crate::ports::image_generator::{
    EncodedImage, GenerateFuture, GenerationRequest, ImageGenerator,
};

/// Default endpoint prefix; the model name and method are appended.
pub const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta/models";

/// Live Gemini image generator that calls the Google AI API.
pub struct GeminiGenerator {
    client: Client,
    api_key: String,
    base_url: String,
}

impl GeminiGenerator {
    /// Create a generator for the endpoint prefix `base_url` (usually [`GEMINI_API_BASE`]).
    #[must_use]
    pub fn with_base_url(api_key: String, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { client: Client::new(), api_key, base_url }
    }
}

impl ImageGenerator for GeminiGenerator {
    fn generate(&self, request: &GenerationRequest) -> GenerateFuture<'_> {
        let request = request.clone();
        Box::pin(async move {
            let url = format!("{}/{}:generateContent", self.base_url, request.model);
            let body = build_body(&request);

            tracing::debug!(%url, "sending generateContent request");

            let response = self
                .client
                .post(&url)
                .header("x-goog-api-key", &self.api_key)
                .json(&body)
                .send()
                .await?;

            let status = response.status();
            let response_text = response.text().await?;
            tracing::debug!(%status, bytes = response_text.len(), "received response");

            if !status.is_success() {
                return Err(TransferError::Api {
                    status: status.as_u16(),
                    message: api_error_message(&response_text),
                });
            }

            let parsed: GeminiResponse = serde_json::from_str(&response_text).map_err(|e| {
                TransferError::Api {
                    status: status.as_u16(),
                    message: format!("Failed to parse response: {e}"),
                }
            })?;

            extract_image(parsed)
        })
    }
}

/// Build the `generateContent` body: base image, style image, then instruction.
fn build_body(request: &GenerationRequest) -> serde_json::Value {
    let mut parts: Vec<serde_json::Value> = request
        .parts()
        .iter()
        .map(|(_, image)| {
            serde_json::json!({
                "inlineData": {
                    "mimeType": image.mime_type,
                    "data": image.data,
                }
            })
        })
        .collect();
    parts.push(serde_json::json!({ "text": request.instruction }));

    serde_json::json!({
        "contents": [{ "parts": parts }],
        "generationConfig": {
            "responseModalities": ["TEXT", "IMAGE"],
            "imageConfig": {
                "imageSize": request.size,
                "aspectRatio": request.aspect_ratio,
            }
        }
    })
}

/// Return the first inline image found across candidates and their parts.
///
/// Text parts are skipped. A part whose payload or media type is empty does
/// not count.
fn extract_image(response: GeminiResponse) -> Result<EncodedImage, TransferError> {
    let mut notes = Vec::new();

    if let Some(reason) = response.prompt_feedback.and_then(|f| f.block_reason) {
        notes.push(format!("prompt blocked: {reason}"));
    }

    for candidate in response.candidates {
        for part in candidate.content.map(|c| c.parts).unwrap_or_default() {
            let inline = part.inline_data.filter(|d| !d.data.is_empty() && !d.mime_type.is_empty());
            if let Some(inline) = inline {
                return Ok(EncodedImage { mime_type: inline.mime_type, data: inline.data });
            }
            if let Some(text) = part.text {
                tracing::debug!(%text, "model returned text");
                notes.push(format!("model said: {}", truncate(&text, 200)));
            }
        }
        match (candidate.finish_reason.as_deref(), candidate.finish_message) {
            (_, Some(message)) => notes.push(message),
            (Some(reason), None) if reason != "STOP" => {
                notes.push(format!("finish reason: {reason}"));
            }
            _ => {}
        }
    }

    tracing::warn!(?notes, "response carried no image");
    let detail = if notes.is_empty() { None } else { Some(notes.join("; ")) };
    Err(TransferError::NoImageProduced { detail })
}

/// Pull `error.message` out of a Google error body, or fall back to the raw text.
fn api_error_message(body: &str) -> String {
    serde_json::from_str::<GeminiErrorResponse>(body)
        .map_or_else(|_| truncate(body, 500), |e| e.error.message)
}

fn truncate(text: &str, max: usize) -> String {
    if text.len() <= max {
        return text.to_string();
    }
    let mut end = max;
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}...", &text[..end])
}

// --- Gemini API response types ---

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
    prompt_feedback: Option<GeminiPromptFeedback>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiCandidate {
    content: Option<GeminiContent>,
    finish_reason: Option<String>,
    finish_message: Option<String>,
}

#[derive(Deserialize)]
struct GeminiContent {
    #[serde(default)]
    parts: Vec<GeminiPart>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiPart {
    text: Option<String>,
    #[serde(alias = "inline_data")]
    inline_data: Option<GeminiInlineData>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiInlineData {
    #[serde(default, alias = "mime_type")]
    mime_type: String,
    #[serde(default)]
    data: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiPromptFeedback {
    block_reason: Option<String>,
}

#[derive(Deserialize)]
struct GeminiErrorResponse {
    error: GeminiErrorBody,
}

#[derive(Deserialize)]
struct GeminiErrorBody {
    message: String,
}

#[cfg(test)]
mod tests {
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;
    use tokio::task::JoinHandle;

    use super::*;
    use crate::dispatch::build_request;
    use crate::mode::PrecisionMode;

    /// Answer a single HTTP request with `status` and `body`.
    ///
    /// Returns the endpoint prefix to hand to the generator and a handle that
    /// yields the raw request once it has been served.
    async fn serve_once(status: &'static str, body: &'static str) -> (String, JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let handle = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut received = Vec::new();
            let mut chunk = [0u8; 8192];
            loop {
                let n = socket.read(&mut chunk).await.unwrap();
                if n == 0 {
                    break;
                }
                received.extend_from_slice(&chunk[..n]);
                if let Some(end) = received.windows(4).position(|w| w == b"\r\n\r\n") {
                    let headers = String::from_utf8_lossy(&received[..end]).to_ascii_lowercase();
                    let content_length = headers
                        .lines()
                        .find_map(|line| line.strip_prefix("content-length:"))
                        .and_then(|v| v.trim().parse::<usize>().ok())
                        .unwrap_or(0);
                    if received.len() >= end + 4 + content_length {
                        break;
                    }
                }
            }
            let response = format!(
                "HTTP/1.1 {status}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len()
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            let _ = socket.shutdown().await;
            String::from_utf8_lossy(&received).into_owned()
        });
        (format!("http://{addr}/v1beta/models"), handle)
    }

    fn parse(json: &str) -> GeminiResponse {
        serde_json::from_str(json).unwrap()
    }

    fn sample_request() -> GenerationRequest {
        build_request(
            "gemini-3-pro-image-preview",
            EncodedImage { mime_type: "image/jpeg".into(), data: "QkFTRQ==".into() },
            EncodedImage { mime_type: "image/png".into(), data: "U1RZTEU=".into() },
            PrecisionMode::Moderate,
        )
    }

    #[test]
    fn body_orders_base_style_then_text() {
        let body = build_body(&sample_request());
        let parts = body["contents"][0]["parts"].as_array().unwrap();
        assert_eq!(parts.len(), 3);
        assert_eq!(parts[0]["inlineData"]["data"], "QkFTRQ==");
        assert_eq!(parts[0]["inlineData"]["mimeType"], "image/jpeg");
        assert_eq!(parts[1]["inlineData"]["data"], "U1RZTEU=");
        assert_eq!(parts[1]["inlineData"]["mimeType"], "image/png");
        assert!(parts[2]["text"].as_str().unwrap().contains("FAITHFUL REPLICATION"));
    }

    #[test]
    fn body_requests_4k_square() {
        let body = build_body(&sample_request());
        let image_config = &body["generationConfig"]["imageConfig"];
        assert_eq!(image_config["imageSize"], "4K");
        assert_eq!(image_config["aspectRatio"], "1:1");
    }

    #[test]
    fn extracts_single_inline_image() {
        let response = parse(
            r#"{"candidates":[{"content":{"parts":[{"inlineData":{"mimeType":"image/png","data":"AAAA"}}]}}]}"#,
        );
        let image = extract_image(response).unwrap();
        assert_eq!(image, EncodedImage { mime_type: "image/png".into(), data: "AAAA".into() });
    }

    #[test]
    fn image_after_text_part_is_found() {
        let response = parse(
            r#"{"candidates":[{"content":{"parts":[
                {"text":"Here is the styled photo."},
                {"inlineData":{"mimeType":"image/jpeg","data":"/9j/4A=="}},
                {"inlineData":{"mimeType":"image/png","data":"AAAA"}}
            ]}}]}"#,
        );
        let image = extract_image(response).unwrap();
        assert_eq!(image.mime_type, "image/jpeg");
        assert_eq!(image.data, "/9j/4A==");
    }

    #[test]
    fn empty_payload_does_not_count() {
        let response = parse(
            r#"{"candidates":[{"content":{"parts":[
                {"inlineData":{"mimeType":"image/png","data":""}},
                {"inlineData":{"mimeType":"image/png","data":"AAAA"}}
            ]}}]}"#,
        );
        assert_eq!(extract_image(response).unwrap().data, "AAAA");
    }

    #[test]
    fn text_only_response_is_no_image_error() {
        let response = parse(
            r#"{"candidates":[{"content":{"parts":[{"text":"I can't edit this photo."}]},"finishReason":"STOP"}]}"#,
        );
        match extract_image(response).unwrap_err() {
            TransferError::NoImageProduced { detail } => {
                assert!(detail.unwrap().contains("I can't edit this photo."));
            }
            other => panic!("expected NoImageProduced, got {other:?}"),
        }
    }

    #[test]
    fn inline_data_without_mime_type_is_skipped() {
        let response = parse(
            r#"{"candidates":[{"content":{"parts":[
                {"inlineData":{"data":"Zm9v"}},
                {"inlineData":{"mimeType":"image/png","data":"AAAA"}}
            ]}}]}"#,
        );
        assert_eq!(extract_image(response).unwrap().data, "AAAA");

        let response = parse(r#"{"candidates":[{"content":{"parts":[{"inlineData":{"data":"Zm9v"}}]}}]}"#);
        assert!(matches!(extract_image(response).unwrap_err(), TransferError::NoImageProduced { .. }));
    }

    #[test]
    fn no_candidates_is_no_image_error() {
        let err = extract_image(parse(r#"{"candidates":[]}"#)).unwrap_err();
        assert!(matches!(err, TransferError::NoImageProduced { detail: None }));
    }

    #[test]
    fn blocked_prompt_reports_reason() {
        let response = parse(r#"{"promptFeedback":{"blockReason":"SAFETY"}}"#);
        let err = extract_image(response).unwrap_err();
        assert!(err.to_string().contains("prompt blocked: SAFETY"));
    }

    #[test]
    fn refusal_finish_reason_reported() {
        let response = parse(r#"{"candidates":[{"finishReason":"IMAGE_SAFETY"}]}"#);
        let err = extract_image(response).unwrap_err();
        assert!(err.to_string().contains("finish reason: IMAGE_SAFETY"));
    }

    #[test]
    fn api_error_message_prefers_google_error_body() {
        let body = r#"{"error":{"code":400,"message":"API key not valid.","status":"INVALID_ARGUMENT"}}"#;
        assert_eq!(api_error_message(body), "API key not valid.");
        assert_eq!(api_error_message("Bad Gateway"), "Bad Gateway");
    }

    #[test]
    fn truncate_respects_char_boundaries() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("ééé", 3), "é...");
    }

    #[tokio::test]
    async fn connection_failure_is_network_error() {
        // Nothing listens on the discard port locally.
        let generator = GeminiGenerator::with_base_url("test-key".into(), "http://127.0.0.1:9/v1beta/models");
        let err = generator.generate(&sample_request()).await.unwrap_err();
        assert!(matches!(err, TransferError::Network(_)), "got {err:?}");
    }

    #[tokio::test]
    async fn generate_returns_image_after_text_part() {
        let (base_url, server) = serve_once(
            "200 OK",
            r#"{"candidates":[{"content":{"parts":[{"text":"Done."},{"inlineData":{"mimeType":"image/png","data":"AAAA"}}]},"finishReason":"STOP"}]}"#,
        )
        .await;
        let generator = GeminiGenerator::with_base_url("test-key".into(), base_url);

        let image = generator.generate(&sample_request()).await.unwrap();
        assert_eq!(image, EncodedImage { mime_type: "image/png".into(), data: "AAAA".into() });

        let raw = server.await.unwrap();
        assert!(raw.starts_with("POST /v1beta/models/gemini-3-pro-image-preview:generateContent "));
        assert!(raw.to_ascii_lowercase().contains("x-goog-api-key: test-key"));
        assert!(raw.contains(r#""imageSize":"4K""#));
    }

    #[tokio::test]
    async fn generate_maps_error_status_to_api_error() {
        let (base_url, _server) = serve_once(
            "429 Too Many Requests",
            r#"{"error":{"code":429,"message":"Resource has been exhausted (e.g. check quota).","status":"RESOURCE_EXHAUSTED"}}"#,
        )
        .await;
        let generator = GeminiGenerator::with_base_url("test-key".into(), base_url);

        match generator.generate(&sample_request()).await.unwrap_err() {
            TransferError::Api { status, message } => {
                assert_eq!(status, 429);
                assert_eq!(message, "Resource has been exhausted (e.g. check quota).");
            }
            other => panic!("expected Api, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn generate_text_only_success_is_no_image_error() {
        let (base_url, _server) = serve_once(
            "200 OK",
            r#"{"candidates":[{"content":{"parts":[{"text":"I can't edit this photo."}]},"finishReason":"STOP"}]}"#,
        )
        .await;
        let generator = GeminiGenerator::with_base_url("test-key".into(), base_url);

        let err = generator.generate(&sample_request()).await.unwrap_err();
        assert!(matches!(err, TransferError::NoImageProduced { detail: Some(_) }), "got {err:?}");
    }

    #[tokio::test]
    async fn generate_unparseable_success_body_is_api_error() {
        let (base_url, _server) = serve_once("200 OK", "<html>gateway</html>").await;
        let generator = GeminiGenerator::with_base_url("test-key".into(), base_url);

        match generator.generate(&sample_request()).await.unwrap_err() {
            TransferError::Api { status, message } => {
                assert_eq!(status, 200);
                assert!(message.starts_with("Failed to parse response"));
            }
            other => panic!("expected Api, got {other:?}"),
        }
    }
}
