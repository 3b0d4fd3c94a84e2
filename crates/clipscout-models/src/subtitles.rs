//! Subtitle views over a transcript.
//!
//! The SRT export is a derived, non-authoritative rendering of
//! `transcript.json`; caption extraction serves the renderer hand-off.

use std::fmt::Write;

use serde::{Deserialize, Serialize};

use crate::timestamp::format_srt_timestamp;
use crate::transcript::TranscriptFragment;

/// Render fragments as an SRT document.
///
/// Each entry is a 1-based index, an `HH:MM:SS,mmm --> HH:MM:SS,mmm` line,
/// the trimmed text, and a blank separator line.
pub fn to_srt(fragments: &[TranscriptFragment]) -> String {
    let mut out = String::new();
    for (i, fragment) in fragments.iter().enumerate() {
        // Writing into a String cannot fail.
        let _ = write!(
            out,
            "{}\n{} --> {}\n{}\n\n",
            i + 1,
            format_srt_timestamp(fragment.start),
            format_srt_timestamp(fragment.end),
            fragment.text.trim()
        );
    }
    out
}

/// A caption positioned relative to the start of a clip.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Caption {
    pub start: f64,
    pub end: f64,
    pub text: String,
}

/// Captions for the clip `[start, end]`, clamped to the range and shifted so
/// the clip starts at zero. Fragments entirely outside the range are skipped.
pub fn captions_for_range(fragments: &[TranscriptFragment], start: f64, end: f64) -> Vec<Caption> {
    fragments
        .iter()
        .filter(|f| !(f.end < start || f.start > end))
        .map(|f| Caption {
            start: f.start.max(start) - start,
            end: f.end.min(end) - start,
            text: f.text.trim().to_string(),
        })
        .collect()
}
