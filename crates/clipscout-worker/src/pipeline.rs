//! Candidate pipeline orchestration.
//!
//! Drives discovery, ranking and then, per candidate:
//! acquisition → transcription → segmentation → selection → persistence.
//! A failing stage turns into a [`FailureRecord`] for that candidate only.

use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::Arc;

use futures::stream::{self, StreamExt};
use tokio::sync::watch;
use tracing::{info, warn, Instrument};
use uuid::Uuid;

use clipscout_discovery::DiscoveryFeed;
use clipscout_media::{Transcriber, VideoSource};
use clipscout_models::{
    CandidateState, ClipHandoff, ClipOutcome, FailureRecord, PipelineResult, RankedCandidate,
};
use clipscout_oracle::ScoringOracle;

use crate::config::WorkerConfig;
use crate::error::{WorkerError, WorkerResult};
use crate::logging::CandidateLogger;
use crate::metrics;
use crate::ranker::CandidateRanker;
use crate::segmenter::TranscriptSegmenter;
use crate::selector::ClipSelector;
use crate::workspace::CandidateWorkspace;

/// External services the pipeline depends on.
#[derive(Clone)]
pub struct Collaborators {
    pub feed: Arc<dyn DiscoveryFeed>,
    pub source: Arc<dyn VideoSource>,
    pub transcriber: Arc<dyn Transcriber>,
    pub oracle: Arc<dyn ScoringOracle>,
}

/// Runs batches of candidates through the clip pipeline.
pub struct PipelineOrchestrator {
    ranker: CandidateRanker,
    segmenter: TranscriptSegmenter,
    selector: ClipSelector,
    feed: Arc<dyn DiscoveryFeed>,
    source: Arc<dyn VideoSource>,
    transcriber: Arc<dyn Transcriber>,
    work_dir: PathBuf,
    max_parallel: usize,
    cancel_rx: Option<watch::Receiver<bool>>,
}

impl PipelineOrchestrator {
    /// Fails with a configuration error when `config` is unusable.
    pub fn new(config: &WorkerConfig, collaborators: Collaborators) -> WorkerResult<Self> {
        config.validate()?;

        Ok(Self {
            ranker: CandidateRanker::new(config.ranking.clone()),
            segmenter: TranscriptSegmenter::new(config.window_seconds)?,
            selector: ClipSelector::new(collaborators.oracle, config.oracle_timeout),
            feed: collaborators.feed,
            source: collaborators.source,
            transcriber: collaborators.transcriber,
            work_dir: config.work_dir.clone(),
            max_parallel: config.max_parallel,
            cancel_rx: None,
        })
    }

    /// Stop between stages once `true` is sent on the channel.
    pub fn with_cancel(mut self, cancel_rx: watch::Receiver<bool>) -> Self {
        self.cancel_rx = Some(cancel_rx);
        self
    }

    fn is_cancelled(&self) -> bool {
        self.cancel_rx
            .as_ref()
            .map(|rx| *rx.borrow())
            .unwrap_or(false)
    }

    /// Discover, rank and process the top `max_items` candidates.
    ///
    /// Only a discovery failure is returned as an error; per-candidate
    /// failures are part of the result list.
    pub async fn run(&self, max_items: usize) -> WorkerResult<Vec<PipelineResult>> {
        if self.is_cancelled() {
            return Err(WorkerError::Cancelled);
        }

        let discovered = self.feed.discover().await?;
        info!(
            feed = self.feed.name(),
            discovered = discovered.len(),
            "Discovery complete"
        );

        let mut ranked = self.distinct_workspaces(self.ranker.rank(&discovered));
        ranked.truncate(max_items);

        Ok(self.run_ranked(ranked).await)
    }

    /// Process already-ranked candidates, in order.
    ///
    /// Results come back in input order even when `max_parallel > 1`.
    /// Candidates not yet started when cancellation arrives are left out.
    pub async fn run_ranked(&self, ranked: Vec<RankedCandidate>) -> Vec<PipelineResult> {
        let run_id = Uuid::new_v4().to_string();
        let ranked = self.distinct_workspaces(ranked);

        info!(
            run_id = %run_id,
            candidates = ranked.len(),
            max_parallel = self.max_parallel,
            "Starting pipeline run"
        );

        let run_id_ref = run_id.as_str();
        let results: Vec<PipelineResult> = stream::iter(ranked.iter())
            .map(move |candidate| self.process_candidate(run_id_ref, candidate))
            .buffered(self.max_parallel)
            .filter_map(futures::future::ready)
            .collect()
            .await;

        let succeeded = results.iter().filter(|r| r.is_success()).count();
        info!(
            run_id = %run_id,
            succeeded,
            failed = results.len() - succeeded,
            skipped = ranked.len() - results.len(),
            "Pipeline run finished"
        );

        results
    }

    /// Two candidates resolving to the same workspace would share files; keep
    /// the better-ranked one.
    fn distinct_workspaces(&self, ranked: Vec<RankedCandidate>) -> Vec<RankedCandidate> {
        let mut seen = HashSet::new();
        ranked
            .into_iter()
            .filter(|c| {
                let ws = CandidateWorkspace::for_source(&self.work_dir, &c.candidate.source_url());
                let fresh = seen.insert(ws.id().to_string());
                if !fresh {
                    warn!(
                        candidate_id = %c.id(),
                        workspace = %ws.id(),
                        "Duplicate workspace, skipping candidate"
                    );
                }
                fresh
            })
            .collect()
    }

    /// Run one candidate through every stage.
    ///
    /// Returns `None` when cancellation arrived before the candidate started.
    pub async fn process_candidate(
        &self,
        run_id: &str,
        candidate: &RankedCandidate,
    ) -> Option<PipelineResult> {
        if self.is_cancelled() {
            info!(candidate_id = %candidate.id(), "Run cancelled, not starting candidate");
            return None;
        }

        let logger = CandidateLogger::new(run_id, candidate);
        let span = logger.create_span();

        let result = async {
            logger.log_start(candidate.title());
            let mut state = CandidateState::Discovered;

            match self.drive(candidate, &logger, &mut state).await {
                Ok(outcome) => {
                    logger.log_completion(
                        outcome.selection.start(),
                        outcome.selection.end(),
                        outcome.selection.score,
                    );
                    PipelineResult::Success(outcome)
                }
                Err(e) => {
                    let error = e.to_string();
                    logger.log_failure(state, &error);
                    PipelineResult::Failure(FailureRecord {
                        candidate_id: candidate.id().to_string(),
                        title: candidate.title().to_string(),
                        rank: candidate.rank,
                        state,
                        error,
                    })
                }
            }
        }
        .instrument(span)
        .await;

        metrics::record_result(&result);
        Some(result)
    }

    /// Stage sequence. `state` always holds the last state reached, so the
    /// caller can attribute an error to the stage that was running.
    async fn drive(
        &self,
        candidate: &RankedCandidate,
        logger: &CandidateLogger,
        state: &mut CandidateState,
    ) -> WorkerResult<ClipOutcome> {
        let source_url = candidate.candidate.source_url();

        // Acquisition
        let workspace = CandidateWorkspace::create(&self.work_dir, &source_url).await?;
        let acquired = self.source.acquire(&source_url, workspace.root()).await?;
        workspace.write_metadata(&acquired.metadata).await?;
        self.advance(state, logger)?;

        // Transcription
        let fragments = self
            .transcriber
            .transcribe(&acquired.video_path, workspace.root())
            .await?;
        workspace.write_transcript(&fragments).await?;
        self.advance(state, logger)?;

        // Segmentation
        let segments = self.segmenter.segment(&fragments)?;
        if segments.is_empty() {
            logger.log_warning("transcript is shorter than one window");
        }
        self.advance(state, logger)?;

        // Selection
        let selection = self.selector.select_best(&segments).await?;
        self.advance(state, logger)?;

        // Persistence
        workspace.write_selection(&selection).await?;
        workspace
            .write_handoff(&ClipHandoff::new(&selection, fragments))
            .await?;
        self.advance(state, logger)?;

        Ok(ClipOutcome {
            candidate_id: candidate.id().to_string(),
            title: candidate.title().to_string(),
            rank: candidate.rank,
            selection,
            segment_count: segments.len(),
            artifacts: workspace.artifact_paths(acquired.video_path),
        })
    }

    /// Move to the next state, then stop if cancellation arrived.
    fn advance(&self, state: &mut CandidateState, logger: &CandidateLogger) -> WorkerResult<()> {
        if let Some(next) = state.next() {
            *state = next;
            logger.log_transition(next);
        }
        if !state.is_terminal() && self.is_cancelled() {
            return Err(WorkerError::Cancelled);
        }
        Ok(())
    }
}
