//! Per-candidate pipeline states and batch results.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::selection::ScoredSegment;

/// Where a candidate is in its pipeline run.
///
/// Stages advance strictly forward:
/// `Discovered → Acquired → Transcribed → Segmented → Selected → Done`.
/// `Failed` is terminal and reachable from any non-terminal state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum CandidateState {
    #[default]
    Discovered,
    Acquired,
    Transcribed,
    Segmented,
    Selected,
    Done,
    Failed,
}

impl CandidateState {
    pub fn as_str(&self) -> &'static str {
        match self {
            CandidateState::Discovered => "discovered",
            CandidateState::Acquired => "acquired",
            CandidateState::Transcribed => "transcribed",
            CandidateState::Segmented => "segmented",
            CandidateState::Selected => "selected",
            CandidateState::Done => "done",
            CandidateState::Failed => "failed",
        }
    }

    /// Check if this is a terminal state.
    pub fn is_terminal(&self) -> bool {
        matches!(self, CandidateState::Done | CandidateState::Failed)
    }

    /// The successor state on success, `None` for terminal states.
    pub fn next(&self) -> Option<CandidateState> {
        match self {
            CandidateState::Discovered => Some(CandidateState::Acquired),
            CandidateState::Acquired => Some(CandidateState::Transcribed),
            CandidateState::Transcribed => Some(CandidateState::Segmented),
            CandidateState::Segmented => Some(CandidateState::Selected),
            CandidateState::Selected => Some(CandidateState::Done),
            CandidateState::Done | CandidateState::Failed => None,
        }
    }

    /// Name of the work performed when leaving this state.
    pub fn pending_stage(&self) -> &'static str {
        match self {
            CandidateState::Discovered => "acquisition",
            CandidateState::Acquired => "transcription",
            CandidateState::Transcribed => "segmentation",
            CandidateState::Segmented => "selection",
            CandidateState::Selected => "persistence",
            CandidateState::Done | CandidateState::Failed => "none",
        }
    }
}

impl std::fmt::Display for CandidateState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Files produced in a candidate's workspace.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArtifactPaths {
    pub workspace: PathBuf,
    pub video: PathBuf,
    pub metadata: PathBuf,
    pub transcript_json: PathBuf,
    pub transcript_srt: PathBuf,
    pub clip_selection: PathBuf,
    pub handoff: PathBuf,
}

/// A candidate that made it through every stage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClipOutcome {
    pub candidate_id: String,
    pub title: String,
    pub rank: usize,
    pub selection: ScoredSegment,
    /// Number of windows that were scored
    pub segment_count: usize,
    pub artifacts: ArtifactPaths,
}

/// A candidate whose run stopped early.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FailureRecord {
    pub candidate_id: String,
    pub title: String,
    pub rank: usize,
    /// State the candidate was in when the failing stage started
    pub state: CandidateState,
    pub error: String,
}

impl FailureRecord {
    /// Stage that failed, e.g. `"acquisition"`.
    pub fn stage(&self) -> &'static str {
        self.state.pending_stage()
    }
}

/// Outcome of one candidate in a batch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum PipelineResult {
    Success(ClipOutcome),
    Failure(FailureRecord),
}

impl PipelineResult {
    pub fn is_success(&self) -> bool {
        matches!(self, PipelineResult::Success(_))
    }

    pub fn candidate_id(&self) -> &str {
        match self {
            PipelineResult::Success(o) => &o.candidate_id,
            PipelineResult::Failure(f) => &f.candidate_id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_machine_walks_forward() {
        let mut state = CandidateState::Discovered;
        let mut visited = vec![state];
        while let Some(next) = state.next() {
            state = next;
            visited.push(state);
        }
        assert_eq!(
            visited,
            vec![
                CandidateState::Discovered,
                CandidateState::Acquired,
                CandidateState::Transcribed,
                CandidateState::Segmented,
                CandidateState::Selected,
                CandidateState::Done,
            ]
        );
        assert!(state.is_terminal());
        assert_eq!(CandidateState::Failed.next(), None);
    }

    #[test]
    fn test_failure_stage_names() {
        let record = FailureRecord {
            candidate_id: "abc".into(),
            title: "t".into(),
            rank: 3,
            state: CandidateState::Discovered,
            error: "boom".into(),
        };
        assert_eq!(record.stage(), "acquisition");
        assert_eq!(CandidateState::Segmented.pending_stage(), "selection");
    }

    #[test]
    fn test_result_serialization_tag() {
        let result = PipelineResult::Failure(FailureRecord {
            candidate_id: "abc".into(),
            title: "t".into(),
            rank: 1,
            state: CandidateState::Acquired,
            error: "no captions".into(),
        });
        let value = serde_json::to_value(&result).unwrap();
        assert_eq!(value["status"], "failure");
        assert_eq!(value["state"], "acquired");
        assert_eq!(result.candidate_id(), "abc");
    }
}
