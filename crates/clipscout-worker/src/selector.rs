//! Best-segment selection.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, warn};

use clipscout_models::{ScoredSegment, Segment};
use clipscout_oracle::ScoringOracle;

use crate::error::{WorkerError, WorkerResult};
use crate::metrics;

/// Scores segments with an oracle and keeps the best one.
#[derive(Clone)]
pub struct ClipSelector {
    oracle: Arc<dyn ScoringOracle>,
    timeout: Duration,
}

impl std::fmt::Debug for ClipSelector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClipSelector")
            .field("oracle", &self.oracle.name())
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl ClipSelector {
    /// `timeout` bounds every single oracle call.
    pub fn new(oracle: Arc<dyn ScoringOracle>, timeout: Duration) -> Self {
        Self { oracle, timeout }
    }

    async fn score_one(&self, index: usize, segment: &Segment) -> WorkerResult<ScoredSegment> {
        let rating = tokio::time::timeout(self.timeout, self.oracle.score(&segment.text))
            .await
            .map_err(|_| WorkerError::OracleTimeout(self.timeout))??;

        debug!(
            index,
            start = segment.start,
            end = segment.end,
            score = rating.score,
            degraded = rating.degraded,
            "Segment scored"
        );

        let scored = ScoredSegment::new(segment.clone(), rating.score, rating.reason);
        Ok(if rating.degraded { scored.degraded() } else { scored })
    }

    /// Score every segment sequentially, in input order.
    pub async fn score_all(&self, segments: &[Segment]) -> WorkerResult<Vec<ScoredSegment>> {
        let mut scored = Vec::with_capacity(segments.len());
        for (index, segment) in segments.iter().enumerate() {
            scored.push(self.score_one(index, segment).await?);
        }

        let degraded = scored.iter().filter(|s| s.degraded).count();
        if degraded > 0 {
            warn!(
                oracle = self.oracle.name(),
                degraded,
                total = scored.len(),
                "Some segment scores are parse-failure fallbacks"
            );
        }
        metrics::record_segments_scored(scored.len(), degraded);

        Ok(scored)
    }

    /// Highest-scoring segment; the earliest one wins ties.
    pub async fn select_best(&self, segments: &[Segment]) -> WorkerResult<ScoredSegment> {
        if segments.is_empty() {
            return Err(WorkerError::empty_input("no segments to score"));
        }
        let scored = self.score_all(segments).await?;
        best_index(&scored)
            .and_then(|i| scored.into_iter().nth(i))
            .ok_or_else(|| WorkerError::empty_input("no segments to score"))
    }
}

/// Index of the first maximum score.
pub fn best_index(scored: &[ScoredSegment]) -> Option<usize> {
    let mut best: Option<usize> = None;
    for (i, candidate) in scored.iter().enumerate() {
        match best {
            Some(b) if candidate.score <= scored[b].score => {}
            _ => best = Some(i),
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    use async_trait::async_trait;
    use clipscout_oracle::{MockOracle, OracleError, OracleResult, OracleScore};

    /// Returns queued scores in order.
    struct ScriptedOracle {
        scores: Mutex<VecDeque<OracleScore>>,
    }

    impl ScriptedOracle {
        fn new(scores: &[f64]) -> Self {
            Self {
                scores: Mutex::new(
                    scores
                        .iter()
                        .map(|s| OracleScore::new(*s, format!("scored {}", s)))
                        .collect(),
                ),
            }
        }

        fn with_answers(answers: Vec<OracleScore>) -> Self {
            Self {
                scores: Mutex::new(answers.into()),
            }
        }
    }

    #[async_trait]
    impl ScoringOracle for ScriptedOracle {
        async fn score(&self, _text: &str) -> OracleResult<OracleScore> {
            self.scores
                .lock()
                .unwrap()
                .pop_front()
                .ok_or_else(|| OracleError::from_http_status(503, "script exhausted"))
        }

        fn name(&self) -> &'static str {
            "scripted"
        }
    }

    struct StuckOracle;

    #[async_trait]
    impl ScoringOracle for StuckOracle {
        async fn score(&self, _text: &str) -> OracleResult<OracleScore> {
            tokio::time::sleep(Duration::from_secs(30)).await;
            Ok(OracleScore::new(5.0, "late"))
        }

        fn name(&self) -> &'static str {
            "stuck"
        }
    }

    fn segments(n: usize) -> Vec<Segment> {
        (0..n)
            .map(|i| Segment::new(i as f64 * 10.0, i as f64 * 10.0 + 10.0, format!("seg {}", i)))
            .collect()
    }

    fn selector(oracle: impl ScoringOracle + 'static) -> ClipSelector {
        ClipSelector::new(Arc::new(oracle), Duration::from_secs(5))
    }

    #[tokio::test]
    async fn test_first_maximum_wins() {
        let s = selector(ScriptedOracle::new(&[7.0, 9.0, 9.0, 3.0]));
        let best = s.select_best(&segments(4)).await.unwrap();
        assert_eq!(best.start(), 10.0);
        assert_eq!(best.score, 9.0);
        assert_eq!(best.reason, "scored 9");
    }

    #[tokio::test]
    async fn test_empty_input() {
        let s = selector(ScriptedOracle::new(&[]));
        assert!(matches!(
            s.select_best(&[]).await,
            Err(WorkerError::EmptyInput(_))
        ));
    }

    #[tokio::test]
    async fn test_degraded_scores_are_flagged() {
        let s = selector(ScriptedOracle::with_answers(vec![
            OracleScore::parse_failure("not json"),
            OracleScore::new(2.0, "meh"),
        ]));
        let scored = s.score_all(&segments(2)).await.unwrap();
        assert!(scored[0].degraded);
        assert_eq!(scored[0].score, 0.0);
        assert!(!scored[1].degraded);

        let s = selector(ScriptedOracle::with_answers(vec![
            OracleScore::parse_failure("not json"),
            OracleScore::new(2.0, "meh"),
        ]));
        let best = s.select_best(&segments(2)).await.unwrap();
        assert_eq!(best.start(), 10.0);
    }

    #[tokio::test]
    async fn test_oracle_errors_propagate() {
        let s = selector(ScriptedOracle::new(&[4.0]));
        assert!(matches!(
            s.select_best(&segments(2)).await,
            Err(WorkerError::Oracle(OracleError::ServerError(503, _)))
        ));
    }

    #[tokio::test]
    async fn test_oracle_call_is_time_bounded() {
        let s = ClipSelector::new(Arc::new(StuckOracle), Duration::from_millis(50));
        assert!(matches!(
            s.select_best(&segments(1)).await,
            Err(WorkerError::OracleTimeout(_))
        ));
    }

    #[tokio::test]
    async fn test_seeded_mock_selection_is_reproducible() {
        let a = selector(MockOracle::seeded(11)).select_best(&segments(6)).await.unwrap();
        let b = selector(MockOracle::seeded(11)).select_best(&segments(6)).await.unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_best_index() {
        let scored: Vec<_> = [1.0, 5.0, 5.0, 0.0]
            .iter()
            .zip(segments(4))
            .map(|(s, seg)| ScoredSegment::new(seg, *s, ""))
            .collect();
        assert_eq!(best_index(&scored), Some(1));
        assert_eq!(best_index(&[]), None);
    }
}
