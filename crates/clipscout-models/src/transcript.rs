//! Transcript models.
//!
//! A transcript arrives from transcription as an ordered list of
//! [`TranscriptFragment`]s and is partitioned into [`Segment`]s for scoring.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::{ModelError, ModelResult};

/// One timestamped piece of transcribed speech.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct TranscriptFragment {
    /// Start time in seconds
    pub start: f64,
    /// End time in seconds
    pub end: f64,
    pub text: String,
}

impl TranscriptFragment {
    pub fn new(start: f64, end: f64, text: impl Into<String>) -> Self {
        Self {
            start,
            end,
            text: text.into(),
        }
    }

    /// Check timing fields: finite, non-negative start, end not before start.
    pub fn validate(&self, index: usize) -> ModelResult<()> {
        if !self.start.is_finite() || !self.end.is_finite() {
            return Err(ModelError::invalid_fragment(index, "timestamps must be finite"));
        }
        if self.start < 0.0 {
            return Err(ModelError::invalid_fragment(
                index,
                format!("negative start {}", self.start),
            ));
        }
        if self.end < self.start {
            return Err(ModelError::invalid_fragment(
                index,
                format!("end {} before start {}", self.end, self.start),
            ));
        }
        Ok(())
    }

    pub fn duration(&self) -> f64 {
        self.end - self.start
    }
}

/// A contiguous window of transcript, the unit of clip scoring.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Segment {
    pub start: f64,
    pub end: f64,
    /// Trimmed fragment texts joined by single spaces
    pub text: String,
}

impl Segment {
    pub fn new(start: f64, end: f64, text: impl Into<String>) -> Self {
        Self {
            start,
            end,
            text: text.into(),
        }
    }

    pub fn duration(&self) -> f64 {
        self.end - self.start
    }
}

/// Persisted transcript (`transcript.json`).
///
/// Only `segments` is required; extra fields written by transcription tools
/// are ignored on read.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct TranscriptDocument {
    pub segments: Vec<TranscriptFragment>,
}

impl TranscriptDocument {
    pub fn new(segments: Vec<TranscriptFragment>) -> Self {
        Self { segments }
    }

    /// Validate every fragment in order.
    pub fn validate(&self) -> ModelResult<()> {
        self.segments
            .iter()
            .enumerate()
            .try_for_each(|(i, f)| f.validate(i))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fragment_validation() {
        assert!(TranscriptFragment::new(0.0, 1.0, "a").validate(0).is_ok());
        assert!(TranscriptFragment::new(2.0, 2.0, "a").validate(0).is_ok());

        let err = TranscriptFragment::new(3.0, 1.0, "a").validate(4).unwrap_err();
        assert!(matches!(err, ModelError::InvalidFragment { index: 4, .. }));

        assert!(TranscriptFragment::new(-1.0, 1.0, "a").validate(0).is_err());
        assert!(TranscriptFragment::new(0.0, f64::INFINITY, "a").validate(0).is_err());
        assert!(TranscriptFragment::new(f64::NAN, 1.0, "a").validate(0).is_err());
    }

    #[test]
    fn test_document_reads_whisper_output() {
        let json = r#"{
            "text": " hello there",
            "language": "en",
            "segments": [
                {"id": 0, "seek": 0, "start": 0.0, "end": 2.5, "text": " hello", "tokens": [1, 2]},
                {"id": 1, "seek": 0, "start": 2.5, "end": 4.0, "text": " there", "tokens": [3]}
            ]
        }"#;
        let doc: TranscriptDocument = serde_json::from_str(json).unwrap();
        assert_eq!(doc.segments.len(), 2);
        assert_eq!(doc.segments[1], TranscriptFragment::new(2.5, 4.0, " there"));
        assert!(doc.validate().is_ok());
    }

    #[test]
    fn test_document_persisted_shape() {
        let doc = TranscriptDocument::new(vec![TranscriptFragment::new(0.0, 1.0, "hi")]);
        let value = serde_json::to_value(&doc).unwrap();
        assert_eq!(
            value,
            serde_json::json!({"segments": [{"start": 0.0, "end": 1.0, "text": "hi"}]})
        );
    }

    #[test]
    fn test_document_requires_segments() {
        assert!(serde_json::from_str::<TranscriptDocument>(r#"{"text": "x"}"#).is_err());
    }
}
