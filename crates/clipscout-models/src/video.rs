//! Acquired video metadata.

use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::timestamp::parse_published_at;

/// Metadata written next to an acquired video (`metadata.json`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct VideoMetadata {
    #[serde(default)]
    pub id: Option<String>,

    #[serde(default)]
    pub title: Option<String>,

    #[serde(default)]
    pub description: Option<String>,

    /// Duration in seconds
    #[serde(default)]
    pub duration: Option<f64>,

    /// Upload date as reported by the source (`YYYYMMDD` for yt-dlp)
    #[serde(default)]
    pub upload_date: Option<String>,

    #[serde(default)]
    pub uploader: Option<String>,

    #[serde(default)]
    pub webpage_url: Option<String>,
}

impl VideoMetadata {
    /// Parsed upload date, if present and well-formed.
    pub fn uploaded_at(&self) -> Option<DateTime<Utc>> {
        self.upload_date.as_deref().and_then(parse_published_at)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metadata_from_info_json_subset() {
        let json = r#"{
            "id": "dQw4w9WgXcQ",
            "title": "Never Gonna",
            "duration": 212,
            "upload_date": "20091025",
            "uploader": "Rick",
            "webpage_url": "https://www.youtube.com/watch?v=dQw4w9WgXcQ",
            "formats": []
        }"#;
        let meta: VideoMetadata = serde_json::from_str(json).unwrap();
        assert_eq!(meta.duration, Some(212.0));
        assert!(meta.uploaded_at().is_some());
        assert!(meta.description.is_none());
    }
}
