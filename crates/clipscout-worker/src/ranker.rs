//! Engagement-based candidate ranking.
//!
//! score = views/1000 * w_views + like_ratio * w_ratio
//!       + desirability * w_desire - age_days * w_age

use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

use clipscout_models::{
    age_in_days, parse_published_at, Desirability, DiscoveryCandidate, RankedCandidate,
};

use crate::config::RankingConfig;
use crate::metrics;

/// likes / max(1, views); zero when there are no views.
pub fn like_ratio(views: u64, likes: u64) -> f64 {
    if views == 0 {
        0.0
    } else {
        likes as f64 / views as f64
    }
}

/// Ranks discovery results by the composite engagement score.
#[derive(Debug, Clone)]
pub struct CandidateRanker {
    config: RankingConfig,
}

impl CandidateRanker {
    /// Keywords are matched case-insensitively; blanks are ignored.
    pub fn new(mut config: RankingConfig) -> Self {
        let normalize = |list: Vec<String>| -> Vec<String> {
            let mut out: Vec<String> = Vec::with_capacity(list.len());
            for k in list {
                let k = k.trim().to_lowercase();
                if !k.is_empty() && !out.contains(&k) {
                    out.push(k);
                }
            }
            out
        };
        config.unwanted_keywords = normalize(config.unwanted_keywords);
        config.desirable_keywords = normalize(config.desirable_keywords);
        Self { config }
    }

    pub fn config(&self) -> &RankingConfig {
        &self.config
    }

    /// Keyword classification of a title.
    pub fn desirability(&self, title: &str) -> Desirability {
        let title = title.to_lowercase();
        if self
            .config
            .unwanted_keywords
            .iter()
            .any(|k| title.contains(k.as_str()))
        {
            return Desirability::Rejected;
        }
        let matches = self
            .config
            .desirable_keywords
            .iter()
            .filter(|k| title.contains(k.as_str()))
            .count();
        Desirability::Score(matches as u32)
    }

    /// Age in whole days, or the configured sentinel when unparseable.
    pub fn age_days(&self, published_at: Option<&str>, now: DateTime<Utc>) -> u32 {
        published_at
            .and_then(parse_published_at)
            .map(|published| age_in_days(published, now))
            .unwrap_or(self.config.unparseable_age_days)
    }

    pub fn score(&self, views: u64, like_ratio: f64, desirability: u32, age_days: u32) -> f64 {
        let w = &self.config.weights;
        views as f64 / 1000.0 * w.views + like_ratio * w.like_ratio
            + desirability as f64 * w.desirability
            - age_days as f64 * w.age
    }

    /// Rank against the current time.
    pub fn rank(&self, candidates: &[DiscoveryCandidate]) -> Vec<RankedCandidate> {
        self.rank_at(candidates, Utc::now())
    }

    /// Rank with ages measured from `now`.
    ///
    /// Rejected and below-threshold candidates are dropped. The result is
    /// sorted by score descending; equal scores keep discovery order.
    pub fn rank_at(
        &self,
        candidates: &[DiscoveryCandidate],
        now: DateTime<Utc>,
    ) -> Vec<RankedCandidate> {
        let mut ranked = Vec::with_capacity(candidates.len());

        for candidate in candidates {
            if let Err(e) = candidate.validate() {
                warn!(title = %candidate.title, error = %e, "Skipping invalid candidate");
                metrics::record_dropped("invalid");
                continue;
            }

            let desirability = self.desirability(&candidate.title);
            if desirability.is_rejected() {
                debug!(candidate_id = %candidate.id, title = %candidate.title, "Rejected by keyword");
                metrics::record_dropped("unwanted_keyword");
                continue;
            }

            let like_ratio = like_ratio(candidate.views, candidate.likes);
            let age_days = self.age_days(candidate.published_at.as_deref(), now);
            let score = self.score(candidate.views, like_ratio, desirability.matches(), age_days);

            if score < self.config.acceptance_threshold {
                debug!(
                    candidate_id = %candidate.id,
                    score,
                    threshold = self.config.acceptance_threshold,
                    "Below acceptance threshold"
                );
                metrics::record_dropped("below_threshold");
                continue;
            }

            ranked.push(RankedCandidate {
                candidate: candidate.clone(),
                like_ratio,
                desirability,
                age_days,
                score,
                rank: 0,
            });
        }

        ranked.sort_by(|a, b| b.score.total_cmp(&a.score));
        for (i, r) in ranked.iter_mut().enumerate() {
            r.rank = i + 1;
        }

        info!(
            discovered = candidates.len(),
            accepted = ranked.len(),
            "Ranked candidates"
        );
        ranked
    }
}
