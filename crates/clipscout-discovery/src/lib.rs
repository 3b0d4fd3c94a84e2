//! Candidate discovery feeds.
//!
//! A [`DiscoveryFeed`] returns raw candidate statistics for the ranker. Two
//! feeds are provided: keyword search against the YouTube Data API and a
//! static JSON file.

pub mod config;
pub mod error;
pub mod file;
pub mod youtube;

use std::sync::Arc;

use async_trait::async_trait;

use clipscout_models::DiscoveryCandidate;

pub use config::{split_list, DiscoveryConfig, DiscoverySource, DEFAULT_KEYWORDS};
pub use error::{DiscoveryError, DiscoveryResult};
pub use file::FileFeed;
pub use youtube::{YouTubeConfig, YouTubeFeed};

/// Source of unranked candidates.
#[async_trait]
pub trait DiscoveryFeed: Send + Sync {
    async fn discover(&self) -> DiscoveryResult<Vec<DiscoveryCandidate>>;

    /// Short feed name for logs.
    fn name(&self) -> &'static str;
}

/// Build the feed selected by `config`.
pub fn build_feed(config: &DiscoveryConfig) -> DiscoveryResult<Arc<dyn DiscoveryFeed>> {
    config.validate()?;

    Ok(match config.source {
        DiscoverySource::YouTube => {
            let api_key = config
                .youtube_api_key
                .clone()
                .ok_or_else(|| DiscoveryError::config("YouTube discovery requires YOUTUBE_API_KEY"))?;
            Arc::new(YouTubeFeed::new(YouTubeConfig {
                api_key,
                base_url: config.youtube_base_url.clone(),
                keywords: config.keywords.clone(),
                results_per_keyword: config.results_per_keyword,
                timeout: config.request_timeout,
            })?)
        }
        DiscoverySource::File => {
            let path = config
                .file
                .clone()
                .ok_or_else(|| DiscoveryError::config("file discovery requires DISCOVERY_FILE"))?;
            Arc::new(FileFeed::new(path))
        }
    })
}
