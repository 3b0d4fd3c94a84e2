//! Clip selection models and the renderer hand-off record.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::transcript::{Segment, TranscriptFragment};

/// A segment with the score the oracle gave it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ScoredSegment {
    #[serde(flatten)]
    pub segment: Segment,

    pub score: f64,

    pub reason: String,

    /// Score is a fallback substituted for an unparseable oracle answer
    #[serde(default, skip_serializing)]
    pub degraded: bool,
}

impl ScoredSegment {
    pub fn new(segment: Segment, score: f64, reason: impl Into<String>) -> Self {
        Self {
            segment,
            score,
            reason: reason.into(),
            degraded: false,
        }
    }

    pub fn degraded(mut self) -> Self {
        self.degraded = true;
        self
    }

    pub fn start(&self) -> f64 {
        self.segment.start
    }

    pub fn end(&self) -> f64 {
        self.segment.end
    }

    pub fn text(&self) -> &str {
        &self.segment.text
    }

    /// Persisted selection record (`clip_selection.json`).
    pub fn to_record(&self) -> ClipSelectionRecord {
        ClipSelectionRecord {
            start: self.segment.start,
            end: self.segment.end,
            text: self.segment.text.clone(),
            score: self.score,
            reason: self.reason.clone(),
        }
    }
}

/// On-disk clip selection: `{start, end, text, score, reason}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ClipSelectionRecord {
    pub start: f64,
    pub end: f64,
    pub text: String,
    pub score: f64,
    pub reason: String,
}

/// The `{start, end, text}` range handed to the renderer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ClipRange {
    pub start: f64,
    pub end: f64,
    pub text: String,
}

/// Everything the external renderer needs: the winning range, stripped of
/// score and reason, plus the full transcript so captions can be derived.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ClipHandoff {
    pub selection: ClipRange,
    pub transcript: Vec<TranscriptFragment>,
}

impl ClipHandoff {
    pub fn new(selected: &ScoredSegment, transcript: Vec<TranscriptFragment>) -> Self {
        Self {
            selection: ClipRange {
                start: selected.segment.start,
                end: selected.segment.end,
                text: selected.segment.text.clone(),
            },
            transcript,
        }
    }
}
