//! Per-candidate workspace directories and artifact files.
//!
//! Each candidate gets `work_dir/<workspace id>` with:
//! - `source.mp4`, written by acquisition
//! - `metadata.json`
//! - `transcript.json` and `transcript.srt`
//! - `clip_selection.json` and `handoff.json`

use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::debug;

use clipscout_models::{
    to_srt, workspace_id, ArtifactPaths, ClipHandoff, ScoredSegment, TranscriptDocument,
    TranscriptFragment, VideoMetadata,
};

use crate::error::WorkerResult;

pub const METADATA_FILE: &str = "metadata.json";
pub const TRANSCRIPT_JSON_FILE: &str = "transcript.json";
pub const TRANSCRIPT_SRT_FILE: &str = "transcript.srt";
pub const CLIP_SELECTION_FILE: &str = "clip_selection.json";
pub const HANDOFF_FILE: &str = "handoff.json";

/// One candidate's isolated directory.
#[derive(Debug, Clone)]
pub struct CandidateWorkspace {
    id: String,
    root: PathBuf,
}

impl CandidateWorkspace {
    /// Workspace location for `source` under `work_dir`, without touching disk.
    pub fn for_source(work_dir: &Path, source: &str) -> Self {
        let id = workspace_id(source);
        let root = work_dir.join(&id);
        Self { id, root }
    }

    /// Create the directory for `source` under `work_dir`.
    pub async fn create(work_dir: &Path, source: &str) -> WorkerResult<Self> {
        let ws = Self::for_source(work_dir, source);
        tokio::fs::create_dir_all(&ws.root).await?;
        debug!(workspace = %ws.root.display(), "Workspace ready");
        Ok(ws)
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn path(&self, file: &str) -> PathBuf {
        self.root.join(file)
    }

    async fn write_json<T: Serialize>(&self, file: &str, value: &T) -> WorkerResult<PathBuf> {
        let path = self.path(file);
        let bytes = serde_json::to_vec_pretty(value)?;
        tokio::fs::write(&path, bytes).await?;
        Ok(path)
    }

    pub async fn write_metadata(&self, metadata: &VideoMetadata) -> WorkerResult<PathBuf> {
        self.write_json(METADATA_FILE, metadata).await
    }

    /// Write `transcript.json` and its SRT view.
    pub async fn write_transcript(
        &self,
        fragments: &[TranscriptFragment],
    ) -> WorkerResult<(PathBuf, PathBuf)> {
        let doc = TranscriptDocument::new(fragments.to_vec());
        let json = self.write_json(TRANSCRIPT_JSON_FILE, &doc).await?;

        let srt = self.path(TRANSCRIPT_SRT_FILE);
        tokio::fs::write(&srt, to_srt(fragments)).await?;
        Ok((json, srt))
    }

    pub async fn read_transcript(&self) -> WorkerResult<Vec<TranscriptFragment>> {
        let raw = tokio::fs::read_to_string(self.path(TRANSCRIPT_JSON_FILE)).await?;
        let doc: TranscriptDocument = serde_json::from_str(&raw)?;
        doc.validate()?;
        Ok(doc.segments)
    }

    pub async fn write_selection(&self, selection: &ScoredSegment) -> WorkerResult<PathBuf> {
        self.write_json(CLIP_SELECTION_FILE, &selection.to_record()).await
    }

    pub async fn write_handoff(&self, handoff: &ClipHandoff) -> WorkerResult<PathBuf> {
        self.write_json(HANDOFF_FILE, handoff).await
    }

    /// Paths of every artifact, given where acquisition put the video.
    pub fn artifact_paths(&self, video: PathBuf) -> ArtifactPaths {
        ArtifactPaths {
            workspace: self.root.clone(),
            video,
            metadata: self.path(METADATA_FILE),
            transcript_json: self.path(TRANSCRIPT_JSON_FILE),
            transcript_srt: self.path(TRANSCRIPT_SRT_FILE),
            clip_selection: self.path(CLIP_SELECTION_FILE),
            handoff: self.path(HANDOFF_FILE),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clipscout_models::Segment;

    #[tokio::test]
    async fn test_workspace_uses_video_id() {
        let dir = tempfile::tempdir().unwrap();
        let ws = CandidateWorkspace::create(dir.path(), "https://www.youtube.com/watch?v=dQw4w9WgXcQ")
            .await
            .unwrap();
        assert_eq!(ws.id(), "dQw4w9WgXcQ");
        assert!(ws.root().is_dir());
    }

    #[tokio::test]
    async fn test_transcript_round_trip_and_srt() {
        let dir = tempfile::tempdir().unwrap();
        let ws = CandidateWorkspace::create(dir.path(), "abc").await.unwrap();
        let fragments = vec![
            TranscriptFragment::new(0.0, 1.5, " hello "),
            TranscriptFragment::new(1.5, 3.25, "world"),
        ];

        let (json, srt) = ws.write_transcript(&fragments).await.unwrap();
        assert_eq!(ws.read_transcript().await.unwrap(), fragments);

        let value: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(json).unwrap()).unwrap();
        assert_eq!(value["segments"][1]["end"], 3.25);

        let srt = std::fs::read_to_string(srt).unwrap();
        assert!(srt.starts_with("1\n00:00:00,000 --> 00:00:01,500\nhello\n\n"));
    }

    #[tokio::test]
    async fn test_selection_record_shape() {
        let dir = tempfile::tempdir().unwrap();
        let ws = CandidateWorkspace::create(dir.path(), "abc").await.unwrap();
        let selection = ScoredSegment::new(Segment::new(0.0, 15.0, "hi"), 8.0, "hook").degraded();

        let path = ws.write_selection(&selection).await.unwrap();
        let value: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(path).unwrap()).unwrap();
        assert_eq!(
            value,
            serde_json::json!({"start": 0.0, "end": 15.0, "text": "hi", "score": 8.0, "reason": "hook"})
        );
    }
}
