//! Candidate ranking and clip selection pipeline.
//!
//! This crate provides:
//! - Environment-driven worker configuration
//! - The engagement ranker, transcript segmenter and clip selector
//! - Per-candidate workspaces and artifact persistence
//! - The batch orchestrator with per-candidate failure isolation

pub mod config;
pub mod error;
pub mod logging;
pub mod metrics;
pub mod pipeline;
pub mod ranker;
pub mod segmenter;
pub mod selector;
pub mod workspace;

pub use config::{RankingConfig, RankingWeights, WorkerConfig};
pub use error::{WorkerError, WorkerResult};
pub use logging::CandidateLogger;
pub use pipeline::{Collaborators, PipelineOrchestrator};
pub use ranker::{like_ratio, CandidateRanker};
pub use segmenter::{segment, TranscriptSegmenter};
pub use selector::{best_index, ClipSelector};
pub use workspace::CandidateWorkspace;
