//! Discovery configuration.

use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use crate::error::{DiscoveryError, DiscoveryResult};

/// Default YouTube Data API endpoint.
pub const DEFAULT_YOUTUBE_BASE_URL: &str = "https://www.googleapis.com/youtube/v3";

/// Search terms used when `DISCOVERY_KEYWORDS` is unset.
pub const DEFAULT_KEYWORDS: &[&str] = &[
    "funniest",
    "insane",
    "rage",
    "rant",
    "roast",
    "explosive",
    "fails",
    "awkward",
    "called out",
    "drama",
    "craziest",
];

/// Where candidates come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DiscoverySource {
    #[default]
    YouTube,
    File,
}

impl FromStr for DiscoverySource {
    type Err = DiscoveryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "youtube" => Ok(Self::YouTube),
            "file" => Ok(Self::File),
            other => Err(DiscoveryError::config(format!(
                "unknown discovery source '{}', expected 'youtube' or 'file'",
                other
            ))),
        }
    }
}

#[derive(Clone)]
pub struct DiscoveryConfig {
    pub source: DiscoverySource,
    pub youtube_api_key: Option<String>,
    pub youtube_base_url: String,
    pub keywords: Vec<String>,
    pub results_per_keyword: u32,
    pub request_timeout: Duration,
    /// Candidate file for [`DiscoverySource::File`]
    pub file: Option<PathBuf>,
}

impl std::fmt::Debug for DiscoveryConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DiscoveryConfig")
            .field("source", &self.source)
            .field(
                "youtube_api_key",
                &self.youtube_api_key.as_ref().map(|_| "<redacted>"),
            )
            .field("youtube_base_url", &self.youtube_base_url)
            .field("keywords", &self.keywords)
            .field("results_per_keyword", &self.results_per_keyword)
            .field("request_timeout", &self.request_timeout)
            .field("file", &self.file)
            .finish()
    }
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            source: DiscoverySource::YouTube,
            youtube_api_key: None,
            youtube_base_url: DEFAULT_YOUTUBE_BASE_URL.to_string(),
            keywords: DEFAULT_KEYWORDS.iter().map(|k| k.to_string()).collect(),
            results_per_keyword: 5,
            request_timeout: Duration::from_secs(30),
            file: None,
        }
    }
}

/// Split a comma separated list, dropping blanks.
pub fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

fn env_parse<T: FromStr>(key: &str) -> DiscoveryResult<Option<T>> {
    match std::env::var(key) {
        Ok(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| DiscoveryError::config(format!("{} has an invalid value '{}'", key, raw))),
        _ => Ok(None),
    }
}

impl DiscoveryConfig {
    /// Create config from environment variables.
    pub fn from_env() -> DiscoveryResult<Self> {
        let defaults = Self::default();

        let source = match std::env::var("DISCOVERY_SOURCE") {
            Ok(raw) => raw.parse()?,
            Err(_) => defaults.source,
        };

        let keywords = std::env::var("DISCOVERY_KEYWORDS")
            .ok()
            .map(|raw| split_list(&raw))
            .filter(|list| !list.is_empty())
            .unwrap_or(defaults.keywords);

        Ok(Self {
            source,
            youtube_api_key: std::env::var("YOUTUBE_API_KEY")
                .ok()
                .filter(|k| !k.trim().is_empty()),
            youtube_base_url: std::env::var("YOUTUBE_BASE_URL")
                .unwrap_or(defaults.youtube_base_url),
            keywords,
            results_per_keyword: env_parse("DISCOVERY_RESULTS_PER_KEYWORD")?
                .unwrap_or(defaults.results_per_keyword),
            request_timeout: env_parse::<u64>("DISCOVERY_TIMEOUT_SECS")?
                .map(Duration::from_secs)
                .unwrap_or(defaults.request_timeout),
            file: std::env::var("DISCOVERY_FILE").ok().map(PathBuf::from),
        })
    }

    /// Check that the selected source can run.
    pub fn validate(&self) -> DiscoveryResult<()> {
        match self.source {
            DiscoverySource::YouTube => {
                if self.youtube_api_key.is_none() {
                    return Err(DiscoveryError::config(
                        "YouTube discovery requires YOUTUBE_API_KEY",
                    ));
                }
                if self.keywords.is_empty() {
                    return Err(DiscoveryError::config("no discovery keywords configured"));
                }
                if !(1..=50).contains(&self.results_per_keyword) {
                    return Err(DiscoveryError::config(
                        "DISCOVERY_RESULTS_PER_KEYWORD must be between 1 and 50",
                    ));
                }
            }
            DiscoverySource::File => {
                if self.file.is_none() {
                    return Err(DiscoveryError::config(
                        "file discovery requires DISCOVERY_FILE",
                    ));
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    fn test_split_list() {
        assert_eq!(split_list(" rant, ,called out ,"), vec!["rant", "called out"]);
        assert!(split_list("").is_empty());
    }

    #[test]
    fn test_validate() {
        let config = DiscoveryConfig::default();
        assert!(matches!(config.validate(), Err(DiscoveryError::Config(_))));

        let config = DiscoveryConfig {
            youtube_api_key: Some("key".into()),
            ..Default::default()
        };
        assert!(config.validate().is_ok());

        let config = DiscoveryConfig {
            source: DiscoverySource::File,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_debug_redacts_key() {
        let config = DiscoveryConfig {
            youtube_api_key: Some("AIza-secret".into()),
            ..Default::default()
        };
        assert!(!format!("{:?}", config).contains("AIza-secret"));
    }

    #[test]
    #[serial]
    fn test_from_env() {
        std::env::set_var("DISCOVERY_SOURCE", "file");
        std::env::set_var("DISCOVERY_FILE", "/tmp/candidates.json");
        std::env::set_var("DISCOVERY_KEYWORDS", "rant,roast");
        std::env::set_var("DISCOVERY_RESULTS_PER_KEYWORD", "10");

        let config = DiscoveryConfig::from_env().unwrap();
        assert_eq!(config.source, DiscoverySource::File);
        assert_eq!(config.file, Some(PathBuf::from("/tmp/candidates.json")));
        assert_eq!(config.keywords, vec!["rant", "roast"]);
        assert_eq!(config.results_per_keyword, 10);
        assert!(config.validate().is_ok());

        for key in [
            "DISCOVERY_SOURCE",
            "DISCOVERY_FILE",
            "DISCOVERY_KEYWORDS",
            "DISCOVERY_RESULTS_PER_KEYWORD",
        ] {
            std::env::remove_var(key);
        }

        let config = DiscoveryConfig::from_env().unwrap();
        assert_eq!(config.keywords.len(), DEFAULT_KEYWORDS.len());
    }

    #[test]
    #[serial]
    fn test_malformed_numbers_are_rejected() {
        std::env::set_var("DISCOVERY_RESULTS_PER_KEYWORD", "lots");
        assert!(matches!(DiscoveryConfig::from_env(), Err(DiscoveryError::Config(_))));
        std::env::remove_var("DISCOVERY_RESULTS_PER_KEYWORD");

        std::env::set_var("DISCOVERY_TIMEOUT_SECS", "-5");
        assert!(matches!(DiscoveryConfig::from_env(), Err(DiscoveryError::Config(_))));
        std::env::remove_var("DISCOVERY_TIMEOUT_SECS");
    }
}
