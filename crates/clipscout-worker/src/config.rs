//! Worker configuration.

use std::path::PathBuf;
use std::time::Duration;

use clipscout_discovery::{split_list, DiscoveryConfig};
use clipscout_media::MediaConfig;
use clipscout_oracle::OracleConfig;

use crate::error::{WorkerError, WorkerResult};

/// Titles containing any of these are never ranked.
pub const DEFAULT_UNWANTED_KEYWORDS: &[&str] = &[
    "official music video",
    "music video",
    "lyrics",
    "lyric video",
    "official audio",
    "trailer",
    "teaser",
    "promo",
    "full album",
];

/// Talk and reaction content the clip pipeline handles well.
pub const DEFAULT_DESIRABLE_KEYWORDS: &[&str] = &[
    "podcast",
    "interview",
    "reaction",
    "rant",
    "roast",
    "debate",
    "called out",
    "drama",
    "storytime",
];

/// Weights of the composite ranking score.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RankingWeights {
    /// Per thousand views
    pub views: f64,
    pub like_ratio: f64,
    /// Per desirable keyword match
    pub desirability: f64,
    /// Subtracted per day of age
    pub age: f64,
}

impl Default for RankingWeights {
    fn default() -> Self {
        Self {
            views: 1.0,
            like_ratio: 100.0,
            desirability: 5.0,
            age: 0.1,
        }
    }
}

/// Tunables of the candidate ranker.
#[derive(Debug, Clone, PartialEq)]
pub struct RankingConfig {
    pub weights: RankingWeights,
    /// Candidates scoring below this are dropped
    pub acceptance_threshold: f64,
    /// Age assigned when the publish date cannot be parsed
    pub unparseable_age_days: u32,
    pub unwanted_keywords: Vec<String>,
    pub desirable_keywords: Vec<String>,
}

impl Default for RankingConfig {
    fn default() -> Self {
        Self {
            weights: RankingWeights::default(),
            acceptance_threshold: 20.0,
            unparseable_age_days: 999,
            unwanted_keywords: DEFAULT_UNWANTED_KEYWORDS.iter().map(|k| k.to_string()).collect(),
            desirable_keywords: DEFAULT_DESIRABLE_KEYWORDS.iter().map(|k| k.to_string()).collect(),
        }
    }
}

/// Worker configuration.
#[derive(Debug, Clone)]
pub struct WorkerConfig {
    pub ranking: RankingConfig,
    /// Minimum segment length in seconds
    pub window_seconds: f64,
    /// Candidates taken from the top of the ranking per run
    pub max_items: usize,
    /// Candidates processed concurrently
    pub max_parallel: usize,
    /// Root of the per-candidate workspaces
    pub work_dir: PathBuf,
    /// Hard limit on a single oracle call
    pub oracle_timeout: Duration,
    pub oracle: OracleConfig,
    pub discovery: DiscoveryConfig,
    pub media: MediaConfig,
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            ranking: RankingConfig::default(),
            window_seconds: 15.0,
            max_items: 5,
            max_parallel: 1,
            work_dir: PathBuf::from("data/raw"),
            oracle_timeout: Duration::from_secs(60),
            oracle: OracleConfig::default(),
            discovery: DiscoveryConfig::default(),
            media: MediaConfig::default(),
        }
    }
}

fn env_parse<T: std::str::FromStr>(key: &str) -> WorkerResult<Option<T>> {
    match std::env::var(key) {
        Ok(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| WorkerError::config(format!("{} has an invalid value '{}'", key, raw))),
        _ => Ok(None),
    }
}

fn env_list(key: &str) -> Option<Vec<String>> {
    std::env::var(key).ok().map(|raw| {
        split_list(&raw)
            .into_iter()
            .map(|k| k.to_lowercase())
            .collect()
    })
}

impl WorkerConfig {
    /// Create config from environment variables.
    ///
    /// Malformed numeric values are configuration errors rather than silently
    /// replaced by defaults.
    pub fn from_env() -> WorkerResult<Self> {
        let defaults = Self::default();
        let weights = RankingWeights {
            views: env_parse("CLIPSCOUT_WEIGHT_VIEWS")?.unwrap_or(defaults.ranking.weights.views),
            like_ratio: env_parse("CLIPSCOUT_WEIGHT_LIKE_RATIO")?
                .unwrap_or(defaults.ranking.weights.like_ratio),
            desirability: env_parse("CLIPSCOUT_WEIGHT_DESIRABILITY")?
                .unwrap_or(defaults.ranking.weights.desirability),
            age: env_parse("CLIPSCOUT_WEIGHT_AGE")?.unwrap_or(defaults.ranking.weights.age),
        };

        let ranking = RankingConfig {
            weights,
            acceptance_threshold: env_parse("CLIPSCOUT_SCORE_THRESHOLD")?
                .unwrap_or(defaults.ranking.acceptance_threshold),
            unparseable_age_days: env_parse("CLIPSCOUT_UNPARSEABLE_AGE_DAYS")?
                .unwrap_or(defaults.ranking.unparseable_age_days),
            unwanted_keywords: env_list("CLIPSCOUT_UNWANTED_KEYWORDS")
                .unwrap_or(defaults.ranking.unwanted_keywords),
            desirable_keywords: env_list("CLIPSCOUT_DESIRABLE_KEYWORDS")
                .unwrap_or(defaults.ranking.desirable_keywords),
        };

        Ok(Self {
            ranking,
            window_seconds: env_parse("CLIPSCOUT_WINDOW_SECONDS")?.unwrap_or(defaults.window_seconds),
            max_items: env_parse("CLIPSCOUT_MAX_ITEMS")?.unwrap_or(defaults.max_items),
            max_parallel: env_parse("CLIPSCOUT_MAX_PARALLEL")?.unwrap_or(defaults.max_parallel),
            work_dir: std::env::var("CLIPSCOUT_WORK_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.work_dir),
            oracle_timeout: env_parse("CLIPSCOUT_ORACLE_TIMEOUT_SECS")?
                .map(Duration::from_secs)
                .unwrap_or(defaults.oracle_timeout),
            oracle: OracleConfig::from_env()?,
            discovery: DiscoveryConfig::from_env()?,
            media: MediaConfig::from_env()?,
        })
    }

    /// Check the core tunables. Collaborator configs are checked when their
    /// adapters are built.
    pub fn validate(&self) -> WorkerResult<()> {
        if !self.window_seconds.is_finite() || self.window_seconds <= 0.0 {
            return Err(WorkerError::config(format!(
                "window length must be a positive number of seconds, got {}",
                self.window_seconds
            )));
        }
        if self.max_parallel == 0 {
            return Err(WorkerError::config("max_parallel must be at least 1"));
        }
        if self.oracle_timeout.is_zero() {
            return Err(WorkerError::config("oracle timeout must be positive"));
        }
        if !self.ranking.acceptance_threshold.is_finite() {
            return Err(WorkerError::config("acceptance threshold must be finite"));
        }
        let w = &self.ranking.weights;
        if ![w.views, w.like_ratio, w.desirability, w.age]
            .iter()
            .all(|v| v.is_finite())
        {
            return Err(WorkerError::config("ranking weights must be finite"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    fn test_defaults_are_valid() {
        let config = WorkerConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.window_seconds, 15.0);
        assert_eq!(config.ranking.acceptance_threshold, 20.0);
        assert_eq!(config.ranking.unparseable_age_days, 999);
    }

    #[test]
    fn test_validate_rejects_bad_window() {
        for window in [0.0, -5.0, f64::NAN, f64::INFINITY] {
            let config = WorkerConfig {
                window_seconds: window,
                ..Default::default()
            };
            assert!(matches!(config.validate(), Err(WorkerError::Config(_))));
        }
    }

    #[test]
    fn test_validate_rejects_zero_parallelism() {
        let config = WorkerConfig {
            max_parallel: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    #[serial]
    fn test_from_env() {
        std::env::set_var("CLIPSCOUT_WINDOW_SECONDS", "30");
        std::env::set_var("CLIPSCOUT_SCORE_THRESHOLD", "12.5");
        std::env::set_var("CLIPSCOUT_UNWANTED_KEYWORDS", "Lyrics, Trailer");
        std::env::set_var("CLIPSCOUT_WEIGHT_AGE", "0.5");
        std::env::set_var("CLIPSCOUT_WORK_DIR", "/tmp/clipscout");

        let config = WorkerConfig::from_env().unwrap();
        assert_eq!(config.window_seconds, 30.0);
        assert_eq!(config.ranking.acceptance_threshold, 12.5);
        assert_eq!(config.ranking.unwanted_keywords, vec!["lyrics", "trailer"]);
        assert_eq!(config.ranking.weights.age, 0.5);
        assert_eq!(config.ranking.weights.views, 1.0);
        assert_eq!(config.work_dir, PathBuf::from("/tmp/clipscout"));

        std::env::set_var("CLIPSCOUT_MAX_ITEMS", "many");
        assert!(matches!(WorkerConfig::from_env(), Err(WorkerError::Config(_))));

        for key in [
            "CLIPSCOUT_WINDOW_SECONDS",
            "CLIPSCOUT_SCORE_THRESHOLD",
            "CLIPSCOUT_UNWANTED_KEYWORDS",
            "CLIPSCOUT_WEIGHT_AGE",
            "CLIPSCOUT_WORK_DIR",
            "CLIPSCOUT_MAX_ITEMS",
        ] {
            std::env::remove_var(key);
        }
    }
}
