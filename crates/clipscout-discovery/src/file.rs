//! Static candidate list read from a JSON file.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde_json::Value;
use tracing::info;

use clipscout_models::DiscoveryCandidate;

use crate::error::{DiscoveryError, DiscoveryResult};
use crate::DiscoveryFeed;

/// Replays a candidate list from disk.
///
/// Accepts either a bare JSON array of candidates or an object with a
/// `candidates` array.
#[derive(Debug, Clone)]
pub struct FileFeed {
    path: PathBuf,
}

impl FileFeed {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

fn parse_candidates(raw: &str) -> DiscoveryResult<Vec<DiscoveryCandidate>> {
    let value: Value = serde_json::from_str(raw)?;
    let list = match value {
        Value::Array(_) => value,
        Value::Object(mut map) => match map.remove("candidates") {
            Some(list @ Value::Array(_)) => list,
            _ => {
                return Err(DiscoveryError::InvalidResponse(
                    "expected a 'candidates' array".to_string(),
                ))
            }
        },
        _ => {
            return Err(DiscoveryError::InvalidResponse(
                "expected a JSON array of candidates".to_string(),
            ))
        }
    };
    Ok(serde_json::from_value(list)?)
}

#[async_trait]
impl DiscoveryFeed for FileFeed {
    async fn discover(&self) -> DiscoveryResult<Vec<DiscoveryCandidate>> {
        let raw = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|source| DiscoveryError::File {
                path: self.path.clone(),
                source,
            })?;

        let candidates = parse_candidates(&raw)?;
        info!(
            path = %self.path.display(),
            candidates = candidates.len(),
            "Loaded candidates from file"
        );
        Ok(candidates)
    }

    fn name(&self) -> &'static str {
        "file"
    }
}
