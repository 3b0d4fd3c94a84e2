//! Oracle configuration.

use std::str::FromStr;
use std::time::Duration;

use crate::error::{OracleError, OracleResult};

/// Which scoring strategy to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OracleMode {
    /// Pseudo-random scores, no external calls
    #[default]
    Mock,
    /// External chat-completion rating
    Live,
}

impl FromStr for OracleMode {
    type Err = OracleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "mock" => Ok(OracleMode::Mock),
            "live" => Ok(OracleMode::Live),
            other => Err(OracleError::config(format!(
                "unknown oracle mode '{}', expected 'mock' or 'live'",
                other
            ))),
        }
    }
}

/// Configuration for the scoring oracle.
#[derive(Clone)]
pub struct OracleConfig {
    pub mode: OracleMode,
    /// API key for live mode
    pub api_key: Option<String>,
    /// Base URL of the OpenAI-compatible API
    pub base_url: String,
    /// Chat model used for ratings
    pub model: String,
    /// Per-request timeout
    pub timeout: Duration,
    /// Max retries for retryable failures
    pub max_retries: u32,
    /// Fixed seed for the mock strategy; OS entropy when unset
    pub mock_seed: Option<u64>,
}

impl std::fmt::Debug for OracleConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OracleConfig")
            .field("mode", &self.mode)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("timeout", &self.timeout)
            .field("max_retries", &self.max_retries)
            .field("mock_seed", &self.mock_seed)
            .finish()
    }
}

impl Default for OracleConfig {
    fn default() -> Self {
        Self {
            mode: OracleMode::Mock,
            api_key: None,
            base_url: "https://api.openai.com/v1".to_string(),
            model: "gpt-4o-mini".to_string(),
            timeout: Duration::from_secs(30),
            max_retries: 2,
            mock_seed: None,
        }
    }
}

/// Parse an optional environment value; a malformed value is an error.
fn env_parse<T: FromStr>(key: &str) -> OracleResult<Option<T>> {
    match std::env::var(key) {
        Ok(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| OracleError::config(format!("{} has an invalid value '{}'", key, raw))),
        _ => Ok(None),
    }
}

impl OracleConfig {
    /// Create config from environment variables.
    pub fn from_env() -> OracleResult<Self> {
        let defaults = Self::default();

        let mode = match std::env::var("ORACLE_MODE") {
            Ok(raw) => raw.parse()?,
            Err(_) => defaults.mode,
        };

        Ok(Self {
            mode,
            api_key: std::env::var("OPENAI_API_KEY")
                .ok()
                .filter(|k| !k.trim().is_empty()),
            base_url: std::env::var("ORACLE_BASE_URL").unwrap_or(defaults.base_url),
            model: std::env::var("ORACLE_MODEL").unwrap_or(defaults.model),
            timeout: env_parse::<u64>("ORACLE_TIMEOUT_SECS")?
                .map(Duration::from_secs)
                .unwrap_or(defaults.timeout),
            max_retries: env_parse("ORACLE_MAX_RETRIES")?.unwrap_or(defaults.max_retries),
            mock_seed: env_parse("ORACLE_MOCK_SEED")?,
        })
    }

    /// Check that the selected mode can run.
    pub fn validate(&self) -> OracleResult<()> {
        if self.mode == OracleMode::Live && self.api_key.is_none() {
            return Err(OracleError::config(
                "live oracle mode requires OPENAI_API_KEY",
            ));
        }
        if self.timeout.is_zero() {
            return Err(OracleError::config("oracle timeout must be positive"));
        }
        Ok(())
    }
}
