//! Structured candidate logging utilities.
//!
//! Keeps the candidate id, rank and run id attached to every lifecycle event
//! so a batch can be followed candidate by candidate.

use tracing::{error, info, warn, Span};

use clipscout_models::{CandidateState, RankedCandidate};

/// Logger for one candidate's trip through the pipeline.
#[derive(Debug, Clone)]
pub struct CandidateLogger {
    run_id: String,
    candidate_id: String,
    rank: usize,
}

impl CandidateLogger {
    pub fn new(run_id: &str, candidate: &RankedCandidate) -> Self {
        Self {
            run_id: run_id.to_string(),
            candidate_id: candidate.id().to_string(),
            rank: candidate.rank,
        }
    }

    pub fn from_parts(run_id: &str, candidate_id: &str, rank: usize) -> Self {
        Self {
            run_id: run_id.to_string(),
            candidate_id: candidate_id.to_string(),
            rank,
        }
    }

    pub fn log_start(&self, title: &str) {
        info!(
            run_id = %self.run_id,
            candidate_id = %self.candidate_id,
            rank = self.rank,
            "Candidate started: {}", title
        );
    }

    /// Log entering a new state.
    pub fn log_transition(&self, state: CandidateState) {
        info!(
            run_id = %self.run_id,
            candidate_id = %self.candidate_id,
            rank = self.rank,
            state = %state,
            "Candidate advanced"
        );
    }

    pub fn log_warning(&self, message: &str) {
        warn!(
            run_id = %self.run_id,
            candidate_id = %self.candidate_id,
            rank = self.rank,
            "Candidate warning: {}", message
        );
    }

    pub fn log_failure(&self, state: CandidateState, error: &str) {
        error!(
            run_id = %self.run_id,
            candidate_id = %self.candidate_id,
            rank = self.rank,
            state = %state,
            stage = state.pending_stage(),
            error = %error,
            "Candidate failed"
        );
    }

    pub fn log_completion(&self, start: f64, end: f64, score: f64) {
        info!(
            run_id = %self.run_id,
            candidate_id = %self.candidate_id,
            rank = self.rank,
            start,
            end,
            score,
            "Candidate completed"
        );
    }

    pub fn candidate_id(&self) -> &str {
        &self.candidate_id
    }

    pub fn run_id(&self) -> &str {
        &self.run_id
    }

    /// Span carrying the candidate context, for instrumenting stage futures.
    pub fn create_span(&self) -> Span {
        tracing::info_span!(
            "candidate",
            run_id = %self.run_id,
            candidate_id = %self.candidate_id,
            rank = self.rank
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_candidate_logger_from_parts() {
        let logger = CandidateLogger::from_parts("run-1", "abc123", 2);
        assert_eq!(logger.candidate_id(), "abc123");
        assert_eq!(logger.run_id(), "run-1");
    }
}
