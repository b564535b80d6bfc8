//! Recording adapter for the `ImageGenerator` port.

use std::sync::{Arc, Mutex};

use serde::Serialize;

use super::record_result;
use crate::cassette::recorder::CassetteRecorder;
use crate::ports::image_generator::{
    EncodedImage, GenerateFuture, GenerationRequest, ImageGenerator,
};

/// Records generation interactions while delegating to an inner implementation.
pub struct RecordingImageGenerator {
    inner: Box<dyn ImageGenerator>,
    recorder: Arc<Mutex<CassetteRecorder>>,
}

impl RecordingImageGenerator {
    /// Creates a new recording generator wrapping the given implementation.
    pub fn new(inner: Box<dyn ImageGenerator>, recorder: Arc<Mutex<CassetteRecorder>>) -> Self {
        Self { inner, recorder }
    }
}

/// What a cassette keeps of a request. Input photos are reduced to their
/// media type and payload length.
#[derive(Debug, Serialize)]
struct RecordedRequest<'a> {
    model: &'a str,
    base: RecordedImage<'a>,
    style: RecordedImage<'a>,
    instruction: &'a str,
    aspect_ratio: &'a str,
    size: &'a str,
}

#[derive(Debug, Serialize)]
struct RecordedImage<'a> {
    mime_type: &'a str,
    base64_len: usize,
}

impl<'a> From<&'a EncodedImage> for RecordedImage<'a> {
    fn from(image: &'a EncodedImage) -> Self {
        Self { mime_type: &image.mime_type, base64_len: image.data.len() }
    }
}

impl<'a> From<&'a GenerationRequest> for RecordedRequest<'a> {
    fn from(r: &'a GenerationRequest) -> Self {
        Self {
            model: &r.model,
            base: (&r.base).into(),
            style: (&r.style).into(),
            instruction: &r.instruction,
            aspect_ratio: &r.aspect_ratio,
            size: &r.size,
        }
    }
}

impl ImageGenerator for RecordingImageGenerator {
    fn generate(&self, request: &GenerationRequest) -> GenerateFuture<'_> {
        let request_clone = request.clone();
        let recorder = Arc::clone(&self.recorder);

        Box::pin(async move {
            let result = self.inner.generate(&request_clone).await;
            let recorded = RecordedRequest::from(&request_clone);
            record_result(&recorder, "image_generator", "generate", &recorded, &result);
            result
        })
    }
}
