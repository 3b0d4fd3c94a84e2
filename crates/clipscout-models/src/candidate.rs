//! Discovery candidate models.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::{ModelError, ModelResult};
use crate::utils::youtube_watch_url;

/// A video returned by discovery, before ranking.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct DiscoveryCandidate {
    /// Platform video id
    pub id: String,

    /// Video title
    pub title: String,

    /// Channel / uploader name
    #[serde(default)]
    pub channel: String,

    /// View count
    #[serde(default)]
    pub views: u64,

    /// Like count
    #[serde(default)]
    pub likes: u64,

    /// Raw publish timestamp as reported by discovery (may be malformed)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub published_at: Option<String>,

    /// Source URL handed to acquisition; defaults to the YouTube watch URL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

impl DiscoveryCandidate {
    /// Create a new candidate with the given engagement numbers.
    pub fn new(id: impl Into<String>, title: impl Into<String>, views: u64, likes: u64) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            channel: String::new(),
            views,
            likes,
            published_at: None,
            url: None,
        }
    }

    pub fn with_channel(mut self, channel: impl Into<String>) -> Self {
        self.channel = channel.into();
        self
    }

    pub fn with_published_at(mut self, published_at: impl Into<String>) -> Self {
        self.published_at = Some(published_at.into());
        self
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    /// URL handed to the acquisition collaborator.
    pub fn source_url(&self) -> String {
        self.url
            .clone()
            .unwrap_or_else(|| youtube_watch_url(&self.id))
    }

    /// Check required fields.
    pub fn validate(&self) -> ModelResult<()> {
        if self.id.trim().is_empty() {
            return Err(ModelError::invalid("candidate id is empty"));
        }
        Ok(())
    }
}

/// Keyword-derived content suitability of a candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case", tag = "kind", content = "matches")]
pub enum Desirability {
    /// Title matched an unwanted keyword; never ranked.
    Rejected,
    /// Number of distinct desirable keywords matched (0 = neutral).
    Score(u32),
}

impl Desirability {
    pub fn is_rejected(&self) -> bool {
        matches!(self, Desirability::Rejected)
    }

    /// Number of desirable matches, zero for rejected candidates.
    pub fn matches(&self) -> u32 {
        match self {
            Desirability::Rejected => 0,
            Desirability::Score(n) => *n,
        }
    }
}

/// A candidate that survived ranking, with its computed signals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct RankedCandidate {
    #[serde(flatten)]
    pub candidate: DiscoveryCandidate,

    /// likes / max(1, views)
    pub like_ratio: f64,

    pub desirability: Desirability,

    /// Days since publish; a large sentinel when the date could not be parsed
    pub age_days: u32,

    /// Composite ranking score
    pub score: f64,

    /// 1-based position after sorting
    pub rank: usize,
}

impl RankedCandidate {
    pub fn id(&self) -> &str {
        &self.candidate.id
    }

    pub fn title(&self) -> &str {
        &self.candidate.title
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_url_defaults_to_watch_url() {
        let c = DiscoveryCandidate::new("dQw4w9WgXcQ", "Title", 10, 1);
        assert_eq!(c.source_url(), "https://www.youtube.com/watch?v=dQw4w9WgXcQ");

        let c = c.with_url("https://vimeo.com/1234");
        assert_eq!(c.source_url(), "https://vimeo.com/1234");
    }

    #[test]
    fn test_validate_rejects_blank_id() {
        assert!(DiscoveryCandidate::new("  ", "Title", 0, 0).validate().is_err());
        assert!(DiscoveryCandidate::new("abc", "", 0, 0).validate().is_ok());
    }

    #[test]
    fn test_candidate_deserializes_with_missing_stats() {
        let c: DiscoveryCandidate =
            serde_json::from_str(r#"{"id":"abc","title":"Hot take"}"#).unwrap();
        assert_eq!(c.views, 0);
        assert_eq!(c.likes, 0);
        assert!(c.published_at.is_none());
    }

    #[test]
    fn test_desirability_serialization() {
        let json = serde_json::to_string(&Desirability::Score(2)).unwrap();
        assert_eq!(json, r#"{"kind":"score","matches":2}"#);
        assert_eq!(Desirability::Rejected.matches(), 0);
    }
}
