//! Text scoring oracles for clip selection.
//!
//! This crate provides:
//! - The [`ScoringOracle`] strategy trait
//! - A seedable pseudo-random mock strategy
//! - A live strategy calling an OpenAI-compatible chat completion API
//! - Structured response parsing with an explicit, flagged fallback

pub mod config;
pub mod error;
pub mod live;
pub mod mock;
pub mod types;

use std::sync::Arc;

use async_trait::async_trait;

pub use config::{OracleConfig, OracleMode};
pub use error::{OracleError, OracleResult};
pub use live::LiveOracle;
pub use mock::MockOracle;
pub use types::{parse_rating, OracleScore, FALLBACK_SCORE, SCORE_MAX, SCORE_MIN};

/// Metric name constants.
pub mod names {
    /// Oracle answers replaced by the parse-failure fallback.
    pub const DEGRADED_SCORES_TOTAL: &str = "oracle_degraded_scores_total";
}

/// Rates a span of transcript text.
///
/// Implementations must either return or fail; they never block forever.
/// An unparseable answer is not an error: it yields a degraded
/// [`OracleScore`] instead.
#[async_trait]
pub trait ScoringOracle: Send + Sync {
    async fn score(&self, text: &str) -> OracleResult<OracleScore>;

    /// Short strategy name for logs.
    fn name(&self) -> &'static str;
}

/// Build the strategy selected by `config`.
pub fn build_oracle(config: &OracleConfig) -> OracleResult<Arc<dyn ScoringOracle>> {
    config.validate()?;

    Ok(match config.mode {
        OracleMode::Mock => match config.mock_seed {
            Some(seed) => Arc::new(MockOracle::seeded(seed)),
            None => Arc::new(MockOracle::new()),
        },
        OracleMode::Live => Arc::new(LiveOracle::new(config.clone())?),
    })
}
