//! Service context that picks the generator adapter for this run.

use std::path::Path;
use std::sync::{Arc, Mutex};

use crate::adapters::live::gemini::GeminiGenerator;
use crate::adapters::recording::image_generator::RecordingImageGenerator;
use crate::adapters::replaying::image_generator::ReplayingImageGenerator;
use crate::cassette::config::{load_cassette, recording_path, RECORDING_ROOT};
use crate::cassette::recorder::CassetteRecorder;
use crate::config::{Config, GEMINI_KEY_ENV};
use crate::error::TransferError;
use crate::ports::ImageGenerator;

/// Bundles the port trait objects for one run.
pub struct ServiceContext {
    /// Image generator port.
    pub generator: Box<dyn ImageGenerator>,
}

/// Handle to a recording session that must be finished after use.
pub struct RecordingSession {
    recorder: Arc<Mutex<CassetteRecorder>>,
}

impl RecordingSession {
    /// Finish the recording and write the cassette to disk.
    ///
    /// # Errors
    ///
    /// Returns an error if the cassette file cannot be written.
    pub fn finish(self) -> Result<std::path::PathBuf, String> {
        let recorder = Arc::try_unwrap(self.recorder)
            .map_err(|_| "Recording adapter still has references".to_string())?
            .into_inner()
            .map_err(|e| format!("Recorder lock poisoned: {e}"))?;
        recorder.finish().map_err(|e| format!("Failed to write cassette: {e}"))
    }
}

impl ServiceContext {
    /// Create a live context talking to the configured Gemini endpoint.
    ///
    /// # Errors
    ///
    /// Returns an error if the API key is not configured.
    pub fn live(config: &Config) -> Result<Self, TransferError> {
        let key = config
            .gemini_key()
            .ok_or_else(|| TransferError::MissingApiKey { env_var: GEMINI_KEY_ENV.into() })?;
        let generator = GeminiGenerator::with_base_url(key, config.api.base_url.clone());
        Ok(Self { generator: Box::new(generator) })
    }

    /// Create a recording context that wraps the live adapter with a recorder.
    ///
    /// # Errors
    ///
    /// Returns an error if the live context cannot be created.
    pub fn recording(config: &Config) -> Result<(Self, RecordingSession), TransferError> {
        let live_ctx = Self::live(config)?;

        let timestamp = chrono::Utc::now().format("%Y-%m-%dT%H-%M-%S").to_string();
        let path = recording_path(Path::new(RECORDING_ROOT), &timestamp);
        let recorder = Arc::new(Mutex::new(CassetteRecorder::new(
            path,
            format!("{timestamp}-hairstyle-transfer"),
            get_commit_hash(),
        )));

        let generator = RecordingImageGenerator::new(live_ctx.generator, Arc::clone(&recorder));
        Ok((Self { generator: Box::new(generator) }, RecordingSession { recorder }))
    }

    /// Create a replaying context from a cassette file. No API key is needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the cassette file cannot be loaded.
    pub fn replaying(path: &Path) -> Result<Self, TransferError> {
        let replayer = load_cassette(path)
            .map_err(|e| TransferError::Config(format!("Failed to load cassette: {e}")))?;
        tracing::debug!(
            remaining = replayer.remaining("image_generator", "generate"),
            "cassette ready"
        );
        let generator = ReplayingImageGenerator::new(Arc::new(Mutex::new(replayer)));
        Ok(Self { generator: Box::new(generator) })
    }
}

/// Get the current git commit hash, or "unknown" if unavailable.
fn get_commit_hash() -> String {
    std::process::Command::new("git")
        .args(["rev-parse", "HEAD"])
        .output()
        .ok()
        .filter(|o| o.status.success())
        .and_then(|o| String::from_utf8(o.stdout).ok())
        .map_or_else(|| "unknown".to_string(), |s| s.trim().to_string())
}
