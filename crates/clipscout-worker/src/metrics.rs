//! Pipeline metrics.

use metrics::{counter, histogram};

use clipscout_models::PipelineResult;

// =============================================================================
// Metric Names
// =============================================================================

pub mod names {
    /// Candidates finished, by outcome and failing stage.
    pub const CANDIDATES_TOTAL: &str = "clipscout_candidates_total";

    /// Candidates dropped by the ranker, by reason.
    pub const CANDIDATES_DROPPED_TOTAL: &str = "clipscout_candidates_dropped_total";

    /// Segments scored by the selector.
    pub const SEGMENTS_SCORED_TOTAL: &str = "clipscout_segments_scored_total";

    /// Score of each selected clip.
    pub const SELECTED_SCORE: &str = "clipscout_selected_score";
}

// =============================================================================
// Recording Functions
// =============================================================================

pub fn record_result(result: &PipelineResult) {
    match result {
        PipelineResult::Success(outcome) => {
            counter!(names::CANDIDATES_TOTAL, "status" => "success", "stage" => "none").increment(1);
            histogram!(names::SELECTED_SCORE).record(outcome.selection.score);
        }
        PipelineResult::Failure(failure) => {
            counter!(names::CANDIDATES_TOTAL, "status" => "failure", "stage" => failure.stage())
                .increment(1);
        }
    }
}

pub fn record_dropped(reason: &'static str) {
    counter!(names::CANDIDATES_DROPPED_TOTAL, "reason" => reason).increment(1);
}

pub fn record_segments_scored(count: usize, degraded: usize) {
    counter!(names::SEGMENTS_SCORED_TOTAL, "degraded" => "false")
        .increment(count.saturating_sub(degraded) as u64);
    counter!(names::SEGMENTS_SCORED_TOTAL, "degraded" => "true").increment(degraded as u64);
}

// =============================================================================
// Tests
// =============================================================================
