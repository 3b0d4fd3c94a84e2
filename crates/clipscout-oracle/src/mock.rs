//! Pseudo-random scoring strategy.

use std::sync::Mutex;

use async_trait::async_trait;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::error::OracleResult;
use crate::types::{OracleScore, SCORE_MAX, SCORE_MIN};
use crate::ScoringOracle;

/// Reason attached to every mock score.
pub const MOCK_REASON: &str = "mock score";

/// Returns a uniformly random integer score in `[SCORE_MIN, SCORE_MAX]`.
///
/// Deterministic when built with [`MockOracle::seeded`]: the same seed and the
/// same call sequence yield the same scores.
pub struct MockOracle {
    rng: Mutex<StdRng>,
}

impl MockOracle {
    /// Mock seeded from OS entropy.
    pub fn new() -> Self {
        Self {
            rng: Mutex::new(StdRng::from_entropy()),
        }
    }

    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }

    fn next_score(&self) -> f64 {
        let mut rng = match self.rng.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        rng.gen_range(SCORE_MIN as u32..=SCORE_MAX as u32) as f64
    }
}

impl Default for MockOracle {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ScoringOracle for MockOracle {
    async fn score(&self, _text: &str) -> OracleResult<OracleScore> {
        Ok(OracleScore::new(self.next_score(), MOCK_REASON))
    }

    fn name(&self) -> &'static str {
        "mock"
    }
}
