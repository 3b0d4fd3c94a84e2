//! Source URL helpers.
//!
//! Resolves the identifier used to name a candidate's workspace directory and
//! builds canonical watch URLs for discovered video ids.

use sha2::{Digest, Sha256};
use url::Url;

/// Errors that can occur during YouTube ID extraction.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SourceIdError {
    /// URL could not be parsed or is not a YouTube URL
    #[error("URL is not a valid YouTube URL")]
    InvalidYoutubeUrl,
    /// Video ID has invalid format
    #[error("Video ID has invalid format")]
    InvalidVideoId,
    /// Video ID not found in URL
    #[error("Video ID not found in URL")]
    VideoIdNotFound,
}

/// Result type for source id extraction.
pub type SourceIdResult<T> = Result<T, SourceIdError>;

/// Extract the 11-character YouTube video id from a URL.
///
/// Supports `watch?v=`, `youtu.be/`, `/embed/`, `/v/` and `/shorts/` forms,
/// with or without extra query parameters and fragments.
pub fn extract_youtube_id(raw: &str) -> SourceIdResult<String> {
    let url = Url::parse(raw.trim()).map_err(|_| SourceIdError::InvalidYoutubeUrl)?;
    let host = url
        .host_str()
        .map(|h| h.to_ascii_lowercase())
        .ok_or(SourceIdError::InvalidYoutubeUrl)?;

    let is_short_host = host == "youtu.be";
    if !is_short_host && host != "youtube.com" && !host.ends_with(".youtube.com") {
        return Err(SourceIdError::InvalidYoutubeUrl);
    }

    if let Some((_, v)) = url.query_pairs().find(|(k, _)| k == "v") {
        return validate_youtube_id(&v);
    }

    let segments: Vec<&str> = url
        .path_segments()
        .map(|s| s.filter(|p| !p.is_empty()).collect())
        .unwrap_or_default();

    let candidate = if is_short_host {
        segments.first().copied()
    } else {
        match segments.as_slice() {
            ["embed", id, ..] | ["v", id, ..] | ["shorts", id, ..] => Some(*id),
            _ => None,
        }
    };

    match candidate {
        Some(id) => validate_youtube_id(id),
        None => Err(SourceIdError::VideoIdNotFound),
    }
}

fn validate_youtube_id(id: &str) -> SourceIdResult<String> {
    let id = id.trim();
    if id.len() != 11 {
        return Err(SourceIdError::InvalidVideoId);
    }
    if !id.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_') {
        return Err(SourceIdError::InvalidVideoId);
    }
    Ok(id.to_string())
}

/// Canonical watch URL for a YouTube video id.
pub fn youtube_watch_url(video_id: &str) -> String {
    format!("https://www.youtube.com/watch?v={}", video_id)
}

/// Stable directory-safe identifier for a source URL or bare id.
///
/// - YouTube URLs resolve to their video id
/// - Other URLs without a query use their last path segment when it is
///   filesystem safe
/// - Bare identifiers are used as-is when filesystem safe
/// - Anything else falls back to a SHA-256 of the input
pub fn workspace_id(source: &str) -> String {
    let source = source.trim();

    if let Ok(id) = extract_youtube_id(source) {
        return id;
    }

    let tail = match Url::parse(source) {
        Ok(url) if url.query().is_none() => url
            .path_segments()
            .and_then(|mut s| s.rfind(|p| !p.is_empty()))
            .map(str::to_string),
        Ok(_) => None,
        Err(_) => Some(source.to_string()),
    };

    if let Some(tail) = tail.filter(|t| is_path_safe(t)) {
        return tail;
    }

    format!("{:x}", Sha256::digest(source.as_bytes()))
}

fn is_path_safe(s: &str) -> bool {
    !s.is_empty()
        && s.len() <= 64
        && s != "."
        && s != ".."
        && s.chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_youtube_id_forms() {
        for url in [
            "https://youtube.com/watch?v=dQw4w9WgXcQ",
            "https://www.youtube.com/watch?v=dQw4w9WgXcQ&list=PLrAXtmRdnEQy4qtr",
            "https://m.youtube.com/watch?feature=share&v=dQw4w9WgXcQ",
            "https://youtu.be/dQw4w9WgXcQ?t=30",
            "https://youtube.com/embed/dQw4w9WgXcQ",
            "https://youtube.com/v/dQw4w9WgXcQ",
            "https://youtube.com/shorts/dQw4w9WgXcQ",
            "  https://YOUTUBE.COM/watch?v=dQw4w9WgXcQ  ",
        ] {
            assert_eq!(extract_youtube_id(url).unwrap(), "dQw4w9WgXcQ", "{url}");
        }
    }

    #[test]
    fn test_extract_youtube_id_errors() {
        assert_eq!(
            extract_youtube_id("https://vimeo.com/123"),
            Err(SourceIdError::InvalidYoutubeUrl)
        );
        assert_eq!(
            extract_youtube_id("not a url"),
            Err(SourceIdError::InvalidYoutubeUrl)
        );
        assert_eq!(
            extract_youtube_id("https://youtube.com"),
            Err(SourceIdError::VideoIdNotFound)
        );
        assert_eq!(
            extract_youtube_id("https://youtube.com/watch?v=abc123"),
            Err(SourceIdError::InvalidVideoId)
        );
        assert_eq!(
            extract_youtube_id("https://youtube.com/watch?v=abc123def!!"),
            Err(SourceIdError::InvalidVideoId)
        );
    }

    #[test]
    fn test_workspace_id_fallbacks() {
        assert_eq!(
            workspace_id("https://youtu.be/dQw4w9WgXcQ"),
            "dQw4w9WgXcQ"
        );
        assert_eq!(workspace_id("https://vimeo.com/channels/123456"), "123456");
        assert_eq!(workspace_id("abc-123_x"), "abc-123_x");

        let hashed = workspace_id("https://example.com/");
        assert_eq!(hashed.len(), 64);
        assert_eq!(hashed, workspace_id("https://example.com/"));

        assert_eq!(workspace_id("../../etc").len(), 64);

        let a = workspace_id("https://www.youtube.com/watch?v=short1");
        let b = workspace_id("https://www.youtube.com/watch?v=short2");
        assert_ne!(a, b);
        assert_ne!(a, "watch");
    }

    #[test]
    fn test_watch_url() {
        assert_eq!(
            youtube_watch_url("dQw4w9WgXcQ"),
            "https://www.youtube.com/watch?v=dQw4w9WgXcQ"
        );
    }
}
