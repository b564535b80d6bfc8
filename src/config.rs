//! Configuration file loading with environment variable overrides.
//!
//! The API key is never compiled in. It comes from `GEMINI_API_KEY` (the
//! process environment or a `.env` file loaded at startup) or from the
//! `[keys]` table of the config file.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::adapters::live::gemini::GEMINI_API_BASE;

/// Environment variable holding the Gemini API key.
pub const GEMINI_KEY_ENV: &str = "GEMINI_API_KEY";

/// Top-level configuration.
#[derive(Debug, Default, Deserialize)]
pub struct Config {
    /// API key configuration.
    #[serde(default)]
    pub keys: KeysConfig,

    /// Service endpoint configuration.
    #[serde(default)]
    pub api: ApiConfig,

    /// Default values for flags the user did not pass.
    #[serde(default)]
    pub defaults: DefaultsConfig,
}

/// API key configuration.
#[derive(Debug, Default, Deserialize)]
pub struct KeysConfig {
    /// Gemini API key.
    pub gemini: Option<String>,
}

/// Service endpoint configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Prefix the model name and `:generateContent` are appended to.
    pub base_url: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self { base_url: GEMINI_API_BASE.to_string() }
    }
}

/// Default parameter values from config file.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct DefaultsConfig {
    /// Default model name or alias.
    pub model: String,
    /// Default precision mode.
    pub mode: String,
    /// Default output format.
    pub format: String,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            model: "gemini-3-pro-image-preview".to_string(),
            mode: "moderate".to_string(),
            format: "png".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from the given path, or return defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be parsed.
    pub fn load(path: &Path) -> Result<Self, String> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }
        let contents = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read config {}: {e}", path.display()))?;
        toml::from_str(&contents)
            .map_err(|e| format!("Failed to parse config {}: {e}", path.display()))
    }

    /// Get the Gemini API key, preferring the environment variable.
    #[must_use]
    pub fn gemini_key(&self) -> Option<String> {
        std::env::var(GEMINI_KEY_ENV)
            .ok()
            .filter(|k| !k.trim().is_empty())
            .or_else(|| self.keys.gemini.clone().filter(|k| !k.trim().is_empty()))
    }
}

/// Discover the config file path using the resolution order:
/// 1. Explicit path (from `--config` flag)
/// 2. `BARBER_CONFIG` environment variable
/// 3. `~/.config/barber/config.toml`
#[must_use]
pub fn discover_config_path(explicit: Option<&str>) -> PathBuf {
    if let Some(p) = explicit {
        return PathBuf::from(p);
    }

    if let Ok(p) = std::env::var("BARBER_CONFIG") {
        return PathBuf::from(p);
    }

    default_config_path()
}

fn default_config_path() -> PathBuf {
    if let Ok(home) = std::env::var("HOME") {
        PathBuf::from(home).join(".config/barber/config.toml")
    } else {
        PathBuf::from("barber.toml")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = Config::default();
        assert!(config.keys.gemini.is_none());
        assert_eq!(config.api.base_url, GEMINI_API_BASE);
        assert_eq!(config.defaults.model, "gemini-3-pro-image-preview");
        assert_eq!(config.defaults.mode, "moderate");
        assert_eq!(config.defaults.format, "png");
    }

    #[test]
    fn load_nonexistent_returns_defaults() {
        let config = Config::load(Path::new("/nonexistent/path/config.toml")).unwrap();
        assert_eq!(config.defaults.mode, "moderate");
    }

    #[test]
    fn load_valid_toml() {
        let dir = std::env::temp_dir().join("barber_config_test");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("config.toml");
        std::fs::write(
            &path,
            r#"
[keys]
gemini = "test-gemini-key"

[api]
base_url = "http://localhost:8080/v1beta/models"

[defaults]
model = "nano-banana"
mode = "precise"
format = "jpeg"
"#,
        )
        .unwrap();

        let config = Config::load(&path).unwrap();
        assert_eq!(config.keys.gemini.as_deref(), Some("test-gemini-key"));
        assert_eq!(config.api.base_url, "http://localhost:8080/v1beta/models");
        assert_eq!(config.defaults.model, "nano-banana");
        assert_eq!(config.defaults.mode, "precise");
        assert_eq!(config.defaults.format, "jpeg");

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn partial_defaults_table_fills_in() {
        let config: Config = toml::from_str("[defaults]\nmode = \"auto\"\n").unwrap();
        assert_eq!(config.defaults.mode, "auto");
        assert_eq!(config.defaults.format, "png");
        assert_eq!(config.api.base_url, GEMINI_API_BASE);
    }

    #[test]
    fn load_invalid_toml() {
        let dir = std::env::temp_dir().join("barber_config_bad_test");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("bad.toml");
        std::fs::write(&path, "this is not valid toml {{{").unwrap();

        assert!(Config::load(&path).is_err());

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn blank_file_key_is_ignored() {
        let config = Config {
            keys: KeysConfig { gemini: Some("   ".into()) },
            ..Config::default()
        };
        if std::env::var(GEMINI_KEY_ENV).is_err() {
            assert!(config.gemini_key().is_none());
        }
    }

    #[test]
    fn discover_explicit_path() {
        let path = discover_config_path(Some("/tmp/my-config.toml"));
        assert_eq!(path, PathBuf::from("/tmp/my-config.toml"));
    }
}
