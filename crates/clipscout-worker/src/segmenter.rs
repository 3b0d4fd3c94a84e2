//! Fixed-duration transcript windows.

use tracing::debug;

use clipscout_models::{Segment, TranscriptFragment};

use crate::error::{WorkerError, WorkerResult};

/// Partitions transcript fragments into windows of at least `window_seconds`.
#[derive(Debug, Clone, Copy)]
pub struct TranscriptSegmenter {
    window_seconds: f64,
}

impl TranscriptSegmenter {
    pub fn new(window_seconds: f64) -> WorkerResult<Self> {
        if !window_seconds.is_finite() || window_seconds <= 0.0 {
            return Err(WorkerError::config(format!(
                "window length must be a positive number of seconds, got {}",
                window_seconds
            )));
        }
        Ok(Self { window_seconds })
    }

    pub fn window_seconds(&self) -> f64 {
        self.window_seconds
    }

    /// Split `fragments` into windows.
    ///
    /// A window starts at its first fragment's start and closes after the
    /// first fragment whose end reaches `window_seconds` past that start.
    /// Fragments left in an unclosed window at the end are dropped.
    pub fn segment(&self, fragments: &[TranscriptFragment]) -> WorkerResult<Vec<Segment>> {
        validate_fragments(fragments)?;

        let mut segments = Vec::new();
        let mut window_start: Option<f64> = None;
        let mut texts: Vec<&str> = Vec::new();

        for fragment in fragments {
            let start = *window_start.get_or_insert(fragment.start);

            let text = fragment.text.trim();
            if !text.is_empty() {
                texts.push(text);
            }

            if fragment.end - start >= self.window_seconds {
                segments.push(Segment::new(start, fragment.end, texts.join(" ")));
                window_start = None;
                texts.clear();
            }
        }

        if let Some(start) = window_start {
            debug!(
                remainder_start = start,
                window_seconds = self.window_seconds,
                "Dropping trailing transcript remainder shorter than a window"
            );
        }

        Ok(segments)
    }
}

/// Convenience wrapper for one-off segmentation.
pub fn segment(fragments: &[TranscriptFragment], window_seconds: f64) -> WorkerResult<Vec<Segment>> {
    TranscriptSegmenter::new(window_seconds)?.segment(fragments)
}

/// Every fragment must be well-formed and starts must not go backwards.
fn validate_fragments(fragments: &[TranscriptFragment]) -> WorkerResult<()> {
    let mut previous_start = f64::NEG_INFINITY;
    for (index, fragment) in fragments.iter().enumerate() {
        fragment.validate(index)?;
        if fragment.start < previous_start {
            return Err(WorkerError::input_validation(format!(
                "fragment #{} starts at {} before the previous fragment ({})",
                index, fragment.start, previous_start
            )));
        }
        previous_start = fragment.start;
    }
    Ok(())
}
