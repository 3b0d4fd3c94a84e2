//! YouTube Data API v3 discovery.
//!
//! Runs one `search.list` per keyword, then fetches snippet and statistics for
//! the collected ids with batched `videos.list` calls.

use std::collections::HashSet;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, info, warn};

use clipscout_models::DiscoveryCandidate;

use crate::error::{DiscoveryError, DiscoveryResult};
use crate::DiscoveryFeed;

/// `videos.list` accepts at most 50 ids per call.
const VIDEOS_BATCH_SIZE: usize = 50;

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    items: Vec<SearchItem>,
}

#[derive(Debug, Deserialize)]
struct SearchItem {
    id: SearchItemId,
}

#[derive(Debug, Deserialize)]
struct SearchItemId {
    #[serde(rename = "videoId")]
    video_id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct VideosResponse {
    #[serde(default)]
    items: Vec<VideoItem>,
}

#[derive(Debug, Deserialize)]
struct VideoItem {
    id: String,
    snippet: VideoSnippet,
    #[serde(default)]
    statistics: VideoStatistics,
}

#[derive(Debug, Deserialize)]
struct VideoSnippet {
    title: String,
    #[serde(rename = "channelTitle", default)]
    channel_title: String,
    #[serde(rename = "publishedAt")]
    published_at: Option<String>,
}

/// Counts arrive as decimal strings and may be hidden by the uploader.
#[derive(Debug, Default, Deserialize)]
struct VideoStatistics {
    #[serde(rename = "viewCount")]
    view_count: Option<String>,
    #[serde(rename = "likeCount")]
    like_count: Option<String>,
}

fn parse_count(raw: Option<&str>) -> u64 {
    raw.and_then(|s| s.trim().parse().ok()).unwrap_or(0)
}

impl From<VideoItem> for DiscoveryCandidate {
    fn from(item: VideoItem) -> Self {
        let mut candidate = DiscoveryCandidate::new(
            item.id,
            item.snippet.title,
            parse_count(item.statistics.view_count.as_deref()),
            parse_count(item.statistics.like_count.as_deref()),
        )
        .with_channel(item.snippet.channel_title);
        candidate.published_at = item.snippet.published_at;
        candidate
    }
}

/// Configuration for the YouTube client.
#[derive(Clone)]
pub struct YouTubeConfig {
    pub api_key: String,
    pub base_url: String,
    pub keywords: Vec<String>,
    pub results_per_keyword: u32,
    pub timeout: Duration,
}

impl std::fmt::Debug for YouTubeConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("YouTubeConfig")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("keywords", &self.keywords)
            .field("results_per_keyword", &self.results_per_keyword)
            .field("timeout", &self.timeout)
            .finish()
    }
}

/// Keyword-search discovery against the YouTube Data API.
pub struct YouTubeFeed {
    http: Client,
    config: YouTubeConfig,
}

impl YouTubeFeed {
    pub fn new(config: YouTubeConfig) -> DiscoveryResult<Self> {
        if config.api_key.trim().is_empty() {
            return Err(DiscoveryError::config("YOUTUBE_API_KEY is empty"));
        }
        if config.keywords.is_empty() {
            return Err(DiscoveryError::config("no discovery keywords configured"));
        }

        let http = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(DiscoveryError::Network)?;

        Ok(Self { http, config })
    }

    /// Video ids matching one keyword, in relevance order.
    async fn search(&self, keyword: &str) -> DiscoveryResult<Vec<String>> {
        let url = format!("{}/search", self.config.base_url.trim_end_matches('/'));
        let max_results = self.config.results_per_keyword.to_string();

        let response = self
            .http
            .get(&url)
            .query(&[
                ("part", "snippet"),
                ("q", keyword),
                ("type", "video"),
                ("videoDuration", "medium"),
                ("order", "relevance"),
                ("maxResults", max_results.as_str()),
                ("key", self.config.api_key.as_str()),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(DiscoveryError::request_failed(format!(
                "search for '{}' returned {}: {}",
                keyword, status, body
            )));
        }

        let body: SearchResponse = response.json().await?;
        Ok(body
            .items
            .into_iter()
            .filter_map(|item| item.id.video_id)
            .collect())
    }

    /// Snippet and statistics for up to [`VIDEOS_BATCH_SIZE`] ids.
    async fn fetch_videos(&self, ids: &[String]) -> DiscoveryResult<Vec<DiscoveryCandidate>> {
        let url = format!("{}/videos", self.config.base_url.trim_end_matches('/'));
        let joined = ids.join(",");

        let response = self
            .http
            .get(&url)
            .query(&[
                ("part", "snippet,statistics"),
                ("id", joined.as_str()),
                ("key", self.config.api_key.as_str()),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(DiscoveryError::request_failed(format!(
                "videos lookup returned {}: {}",
                status, body
            )));
        }

        let body: VideosResponse = response.json().await?;
        Ok(body.items.into_iter().map(DiscoveryCandidate::from).collect())
    }
}

#[async_trait]
impl DiscoveryFeed for YouTubeFeed {
    async fn discover(&self) -> DiscoveryResult<Vec<DiscoveryCandidate>> {
        let mut seen = HashSet::new();
        let mut ids = Vec::new();
        let mut last_error = None;
        let mut searched = 0usize;

        for keyword in &self.config.keywords {
            match self.search(keyword).await {
                Ok(found) => {
                    searched += 1;
                    debug!(keyword = %keyword, hits = found.len(), "Keyword search complete");
                    for id in found {
                        if seen.insert(id.clone()) {
                            ids.push(id);
                        }
                    }
                }
                Err(e) => {
                    warn!(keyword = %keyword, error = %e, "Keyword search failed, skipping");
                    last_error = Some(e);
                }
            }
        }

        if searched == 0 {
            return Err(last_error
                .unwrap_or_else(|| DiscoveryError::config("no discovery keywords configured")));
        }

        let mut candidates = Vec::with_capacity(ids.len());
        for batch in ids.chunks(VIDEOS_BATCH_SIZE) {
            candidates.extend(self.fetch_videos(batch).await?);
        }

        info!(
            keywords = self.config.keywords.len(),
            candidates = candidates.len(),
            "Discovered candidates from YouTube"
        );
        Ok(candidates)
    }

    fn name(&self) -> &'static str {
        "youtube"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn config_for(server: &MockServer, keywords: &[&str]) -> YouTubeConfig {
        YouTubeConfig {
            api_key: "yt-key".into(),
            base_url: server.uri(),
            keywords: keywords.iter().map(|k| k.to_string()).collect(),
            results_per_keyword: 5,
            timeout: Duration::from_secs(5),
        }
    }

    fn search_body(ids: &[&str]) -> serde_json::Value {
        serde_json::json!({
            "items": ids.iter().map(|id| serde_json::json!({"id": {"kind": "youtube#video", "videoId": id}})).collect::<Vec<_>>()
        })
    }

    #[tokio::test]
    async fn test_discover_dedupes_and_maps_statistics() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/search"))
            .and(query_param("q", "rant"))
            .respond_with(ResponseTemplate::new(200).set_body_json(search_body(&["aaa", "bbb"])))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/search"))
            .and(query_param("q", "roast"))
            .respond_with(ResponseTemplate::new(200).set_body_json(search_body(&["bbb", "ccc"])))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/videos"))
            .and(query_param("id", "aaa,bbb,ccc"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "items": [
                    {"id": "aaa", "snippet": {"title": "Epic rant", "channelTitle": "Chan", "publishedAt": "2024-01-01T00:00:00Z"},
                     "statistics": {"viewCount": "50000", "likeCount": "2500"}},
                    {"id": "bbb", "snippet": {"title": "Roast battle", "channelTitle": "Other"},
                     "statistics": {"viewCount": "1200"}},
                    {"id": "ccc", "snippet": {"title": "No stats"}}
                ]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let feed = YouTubeFeed::new(config_for(&server, &["rant", "roast"])).unwrap();
        let candidates = feed.discover().await.unwrap();

        assert_eq!(candidates.len(), 3);
        assert_eq!(candidates[0].id, "aaa");
        assert_eq!(candidates[0].views, 50_000);
        assert_eq!(candidates[0].likes, 2_500);
        assert_eq!(candidates[0].channel, "Chan");
        assert_eq!(candidates[1].likes, 0);
        assert!(candidates[1].published_at.is_none());
        assert_eq!(candidates[2].views, 0);
    }

    #[tokio::test]
    async fn test_failed_keyword_is_skipped() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/search"))
            .and(query_param("q", "broken"))
            .respond_with(ResponseTemplate::new(403).set_body_string("quota"))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/search"))
            .and(query_param("q", "drama"))
            .respond_with(ResponseTemplate::new(200).set_body_json(search_body(&["ddd"])))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/videos"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "items": [{"id": "ddd", "snippet": {"title": "Drama"}, "statistics": {"viewCount": "10"}}]
            })))
            .mount(&server)
            .await;

        let feed = YouTubeFeed::new(config_for(&server, &["broken", "drama"])).unwrap();
        let candidates = feed.discover().await.unwrap();
        assert_eq!(candidates.len(), 1);
    }

    #[tokio::test]
    async fn test_all_keywords_failing_is_an_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/search"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let feed = YouTubeFeed::new(config_for(&server, &["a", "b"])).unwrap();
        assert!(matches!(
            feed.discover().await,
            Err(DiscoveryError::RequestFailed(_))
        ));
    }

    #[test]
    fn test_rejects_missing_key() {
        let config = YouTubeConfig {
            api_key: String::new(),
            base_url: "http://localhost".into(),
            keywords: vec!["rant".into()],
            results_per_keyword: 5,
            timeout: Duration::from_secs(5),
        };
        assert!(matches!(YouTubeFeed::new(config), Err(DiscoveryError::Config(_))));
    }

    #[test]
    fn test_parse_count() {
        assert_eq!(parse_count(Some("123")), 123);
        assert_eq!(parse_count(Some("n/a")), 0);
        assert_eq!(parse_count(None), 0);
    }
}
