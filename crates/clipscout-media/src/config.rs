//! Media tool configuration.

use std::str::FromStr;
use std::time::Duration;

use crate::error::{MediaError, MediaResult};

/// Configuration for the acquisition and transcription tools.
#[derive(Debug, Clone)]
pub struct MediaConfig {
    pub ytdlp_binary: String,
    pub ytdlp_timeout: Duration,
    pub whisper_binary: String,
    /// Whisper model name (`tiny`, `base`, `small`, ...)
    pub whisper_model: String,
    pub whisper_language: Option<String>,
    pub whisper_timeout: Duration,
}

impl Default for MediaConfig {
    fn default() -> Self {
        Self {
            ytdlp_binary: "yt-dlp".to_string(),
            ytdlp_timeout: Duration::from_secs(600),
            whisper_binary: "whisper".to_string(),
            whisper_model: "base".to_string(),
            whisper_language: None,
            whisper_timeout: Duration::from_secs(1800),
        }
    }
}

fn env_secs(key: &str) -> MediaResult<Option<Duration>> {
    match std::env::var(key) {
        Ok(raw) if !raw.trim().is_empty() => u64::from_str(raw.trim())
            .map(|secs| Some(Duration::from_secs(secs)))
            .map_err(|_| MediaError::config(format!("{} has an invalid value '{}'", key, raw))),
        _ => Ok(None),
    }
}

impl MediaConfig {
    /// Create config from environment variables.
    pub fn from_env() -> MediaResult<Self> {
        let defaults = Self::default();

        Ok(Self {
            ytdlp_binary: std::env::var("YTDLP_BINARY").unwrap_or(defaults.ytdlp_binary),
            ytdlp_timeout: env_secs("YTDLP_TIMEOUT_SECS")?.unwrap_or(defaults.ytdlp_timeout),
            whisper_binary: std::env::var("WHISPER_BINARY").unwrap_or(defaults.whisper_binary),
            whisper_model: std::env::var("WHISPER_MODEL").unwrap_or(defaults.whisper_model),
            whisper_language: std::env::var("WHISPER_LANGUAGE")
                .ok()
                .filter(|s| !s.trim().is_empty()),
            whisper_timeout: env_secs("WHISPER_TIMEOUT_SECS")?
                .unwrap_or(defaults.whisper_timeout),
        })
    }
}
