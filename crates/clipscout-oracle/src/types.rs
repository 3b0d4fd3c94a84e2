//! Oracle score type and response parsing.

use serde::{Deserialize, Serialize};

/// Lowest score a genuine rating can have.
pub const SCORE_MIN: f64 = 1.0;

/// Highest score a genuine rating can have.
pub const SCORE_MAX: f64 = 10.0;

/// Score substituted when the oracle's answer cannot be parsed.
pub const FALLBACK_SCORE: f64 = 0.0;

/// Prefix of the reason attached to fallback scores.
pub const PARSE_FAILURE_REASON: &str = "parse failure";

/// A rating of one text span.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OracleScore {
    pub score: f64,
    pub reason: String,
    /// True when `score` is the fallback for an unparseable answer, so callers
    /// can tell it apart from a genuine low rating.
    #[serde(default)]
    pub degraded: bool,
}

impl OracleScore {
    pub fn new(score: f64, reason: impl Into<String>) -> Self {
        Self {
            score,
            reason: reason.into(),
            degraded: false,
        }
    }

    /// Fallback for an unparseable oracle answer.
    pub fn parse_failure(detail: impl std::fmt::Display) -> Self {
        Self {
            score: FALLBACK_SCORE,
            reason: format!("{}: {}", PARSE_FAILURE_REASON, detail),
            degraded: true,
        }
    }
}

#[derive(Debug, Deserialize)]
struct RatingPayload {
    score: f64,
    #[serde(default)]
    reason: String,
}

/// Parse the oracle's structured answer: `{"score": <1-10>, "reason": "..."}`.
///
/// Tolerates markdown code fences and prose around the JSON object. Scores
/// outside `[SCORE_MIN, SCORE_MAX]` are rejected.
pub fn parse_rating(content: &str) -> Result<OracleScore, String> {
    let text = strip_code_fence(content.trim());

    let payload: RatingPayload = match serde_json::from_str(text) {
        Ok(p) => p,
        Err(first_err) => {
            let object = extract_json_object(text).ok_or_else(|| first_err.to_string())?;
            serde_json::from_str(object).map_err(|e| e.to_string())?
        }
    };

    if !payload.score.is_finite() || !(SCORE_MIN..=SCORE_MAX).contains(&payload.score) {
        return Err(format!(
            "score {} outside {}..={}",
            payload.score, SCORE_MIN, SCORE_MAX
        ));
    }

    Ok(OracleScore::new(payload.score, payload.reason.trim()))
}

fn strip_code_fence(text: &str) -> &str {
    let text = text
        .strip_prefix("```json")
        .or_else(|| text.strip_prefix("```"))
        .unwrap_or(text);
    text.strip_suffix("```").unwrap_or(text).trim()
}

fn extract_json_object(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    (end > start).then(|| &text[start..=end])
}
