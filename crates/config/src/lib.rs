//! Configuration loading and validation for PaperChat.
//!
//! Loads configuration from `~/.paperchat/config.toml` with a `GEMINI_API_KEY`
//! environment variable override. A missing or placeholder API key is a
//! recoverable condition — the session routes to a setup-instruction message
//! instead of attempting calls, never a startup failure.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

/// The sentinel value shipped in the config template. A key equal to this
/// counts as "not configured".
pub const PLACEHOLDER_API_KEY: &str = "your-gemini-api-key-here";

/// Environment variable that overrides the file-based key.
pub const API_KEY_ENV: &str = "GEMINI_API_KEY";

/// Errors from loading or saving configuration files.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write config file {path}: {source}")]
    Write {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config file {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: toml::de::Error,
    },
}

/// The root configuration structure.
///
/// Maps directly to `~/.paperchat/config.toml`.
#[derive(Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Gemini API key. Overridden by `GEMINI_API_KEY` when set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Model to call on the generate-content endpoint
    #[serde(default = "default_model")]
    pub model: String,

    /// Maximum output tokens for plain chat responses
    #[serde(default = "default_max_output_tokens")]
    pub max_output_tokens: u32,

    /// Sampling temperature
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// How many turns the transcript retains before evicting the oldest
    #[serde(default = "default_history_limit")]
    pub history_limit: usize,
}

fn default_model() -> String {
    "gemini-1.5-flash-latest".into()
}
fn default_max_output_tokens() -> u32 {
    512
}
fn default_temperature() -> f32 {
    0.7
}
fn default_history_limit() -> usize {
    10
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: default_model(),
            max_output_tokens: default_max_output_tokens(),
            temperature: default_temperature(),
            history_limit: default_history_limit(),
        }
    }
}

fn redact(s: &Option<String>) -> &'static str {
    match s {
        Some(_) => "[REDACTED]",
        None => "None",
    }
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("api_key", &redact(&self.api_key))
            .field("model", &self.model)
            .field("max_output_tokens", &self.max_output_tokens)
            .field("temperature", &self.temperature)
            .field("history_limit", &self.history_limit)
            .finish()
    }
}

impl AppConfig {
    /// Default config file path: `~/.paperchat/config.toml`.
    pub fn default_path() -> PathBuf {
        let home = std::env::var("HOME").unwrap_or_else(|_| ".".into());
        Path::new(&home).join(".paperchat").join("config.toml")
    }

    /// Load from the given path, then apply the environment override.
    /// A missing file yields defaults — absence is not an error.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let mut config = if path.exists() {
            let raw = std::fs::read_to_string(path).map_err(|e| ConfigError::Read {
                path: path.display().to_string(),
                source: e,
            })?;
            toml::from_str(&raw).map_err(|e| ConfigError::Parse {
                path: path.display().to_string(),
                source: e,
            })?
        } else {
            debug!(path = %path.display(), "No config file, using defaults");
            Self::default()
        };

        if let Ok(key) = std::env::var(API_KEY_ENV) {
            if !key.trim().is_empty() {
                config.api_key = Some(key);
            }
        }

        Ok(config)
    }

    /// Write this config to the given path, creating parent directories.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let write_err = |e: std::io::Error| ConfigError::Write {
            path: path.display().to_string(),
            source: e,
        };
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(write_err)?;
        }
        let rendered = toml::to_string_pretty(self).unwrap_or_default();
        std::fs::write(path, rendered).map_err(write_err)
    }

    /// The API key, with sentinel and blank values treated as absent.
    pub fn resolved_api_key(&self) -> Option<&str> {
        match self.api_key.as_deref() {
            Some(key) if !key.trim().is_empty() && key != PLACEHOLDER_API_KEY => Some(key),
            _ => None,
        }
    }

    /// Whether a usable key is present.
    pub fn is_configured(&self) -> bool {
        self.resolved_api_key().is_some()
    }

    /// A commented template config for first-time setup.
    pub fn example() -> String {
        format!(
            "# PaperChat configuration\n\
             #\n\
             # Replace the placeholder with your Gemini API key, or set the\n\
             # {API_KEY_ENV} environment variable instead. Do not commit a real key.\n\
             api_key = \"{PLACEHOLDER_API_KEY}\"\n\
             model = \"{}\"\n\
             max_output_tokens = {}\n\
             temperature = {}\n\
             history_limit = {}\n",
            default_model(),
            default_max_output_tokens(),
            default_temperature(),
            default_history_limit(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn placeholder_key_counts_as_unconfigured() {
        let config = AppConfig {
            api_key: Some(PLACEHOLDER_API_KEY.into()),
            ..Default::default()
        };
        assert!(!config.is_configured());
        assert!(config.resolved_api_key().is_none());
    }

    #[test]
    fn blank_key_counts_as_unconfigured() {
        let config = AppConfig {
            api_key: Some("   ".into()),
            ..Default::default()
        };
        assert!(!config.is_configured());
    }

    #[test]
    fn real_key_is_resolved() {
        let config = AppConfig {
            api_key: Some("AIzaSy-real-key".into()),
            ..Default::default()
        };
        assert_eq!(config.resolved_api_key(), Some("AIzaSy-real-key"));
    }

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = AppConfig::load(&dir.path().join("nope.toml")).unwrap();
        assert_eq!(config.model, "gemini-1.5-flash-latest");
        assert_eq!(config.history_limit, 10);
    }

    #[test]
    fn save_load_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sub").join("config.toml");
        let config = AppConfig {
            api_key: Some("test-key".into()),
            model: "gemini-2.0-flash".into(),
            ..Default::default()
        };
        config.save(&path).unwrap();

        let loaded = AppConfig::load(&path).unwrap();
        assert_eq!(loaded.model, "gemini-2.0-flash");
        // api_key comes back unless the env var overrides it in this process
        if std::env::var(API_KEY_ENV).is_err() {
            assert_eq!(loaded.api_key.as_deref(), Some("test-key"));
        }
    }

    #[test]
    fn malformed_file_is_a_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "model = [not toml").unwrap();
        let err = AppConfig::load(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn example_template_carries_placeholder() {
        let example = AppConfig::example();
        assert!(example.contains(PLACEHOLDER_API_KEY));
        let parsed: AppConfig = toml::from_str(
            &example
                .lines()
                .filter(|l| !l.starts_with('#'))
                .collect::<Vec<_>>()
                .join("\n"),
        )
        .unwrap();
        assert!(!parsed.is_configured());
    }

    #[test]
    fn debug_redacts_api_key() {
        let config = AppConfig {
            api_key: Some("super-secret".into()),
            ..Default::default()
        };
        let debug = format!("{config:?}");
        assert!(!debug.contains("super-secret"));
        assert!(debug.contains("[REDACTED]"));
    }
}
