//! Cassette locations and loading.

use std::path::{Path, PathBuf};

use super::format::Cassette;
use super::replayer::CassetteReplayer;

/// Directory recordings are written under, relative to the working directory.
pub const RECORDING_ROOT: &str = ".barber/cassettes";

/// Load a cassette file and create a replayer.
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed.
pub fn load_cassette(path: &Path) -> Result<CassetteReplayer, String> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| format!("Failed to read cassette file {}: {e}", path.display()))?;
    let cassette: Cassette = serde_yaml::from_str(&content)
        .map_err(|e| format!("Failed to parse cassette file {}: {e}", path.display()))?;
    tracing::debug!(
        path = %path.display(),
        interactions = cassette.interactions.len(),
        "loaded cassette"
    );
    Ok(CassetteReplayer::new(&cassette))
}

/// Where a recording started at `timestamp` is written.
#[must_use]
pub fn recording_path(root: &Path, timestamp: &str) -> PathBuf {
    root.join(timestamp).join("image_generator.cassette.yaml")
}
