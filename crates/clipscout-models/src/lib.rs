//! Shared data models for the ClipScout pipeline.
//!
//! This crate provides Serde-serializable types for:
//! - Discovery candidates and their ranking signals
//! - Transcript fragments, segments and scored selections
//! - Renderer hand-off records and subtitle views
//! - Per-candidate pipeline states and batch results

pub mod candidate;
pub mod error;
pub mod pipeline;
pub mod selection;
pub mod subtitles;
pub mod timestamp;
pub mod transcript;
pub mod utils;
pub mod video;

// Re-export common types
pub use candidate::{Desirability, DiscoveryCandidate, RankedCandidate};
pub use error::{ModelError, ModelResult};
pub use pipeline::{ArtifactPaths, CandidateState, ClipOutcome, FailureRecord, PipelineResult};
pub use selection::{ClipHandoff, ClipRange, ClipSelectionRecord, ScoredSegment};
pub use subtitles::{captions_for_range, to_srt, Caption};
pub use timestamp::{age_in_days, format_srt_timestamp, parse_published_at};
pub use transcript::{Segment, TranscriptDocument, TranscriptFragment};
pub use utils::{extract_youtube_id, workspace_id, youtube_watch_url, SourceIdError};
pub use video::VideoMetadata;
