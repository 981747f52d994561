//! Pipeline orchestration.
//!
//! One [`ResearchPipeline`] runs a full cycle for one source:
//!
//! ```text
//! scan -> harvest -> (analyze)* -> normalize -> validate -> score -> publish
//! ```
//!
//! The orchestrator is a pure coordinator: all source behavior lives in
//! the injected [`SourceProfile`]. Per-item failures are counted, never
//! fatal; whole-stage failures classify the run outcome. The orchestrator
//! never retries, it reports upward via `retry_scheduled`.

mod publish;

pub use publish::{PublishOutcome, Publisher};

use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use research_pool::{ItemScorer, ResearchPool, ScoringInput};

use crate::compliance::{ComplianceValidator, PhraseClassifier};
use crate::error::HarvestError;
use crate::sources::SourceProfile;

/// Final classification of a pipeline run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineOutcome {
    /// Every discovered item reached publication.
    Complete,
    /// Some items failed; some published.
    Partial,
    /// Nothing could be produced (source unavailable, empty harvest, or
    /// cancellation); retry advised.
    Incomplete,
    /// A rate limiter tripped; retry after the hint.
    RateLimited,
    /// Unexpected error outside the per-stage error model.
    Failed,
}

impl PipelineOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            PipelineOutcome::Complete => "COMPLETE",
            PipelineOutcome::Partial => "PARTIAL",
            PipelineOutcome::Incomplete => "INCOMPLETE",
            PipelineOutcome::RateLimited => "RATE_LIMITED",
            PipelineOutcome::Failed => "FAILED",
        }
    }
}

/// Monotonic per-stage counters, incremented at each stage's exit.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PipelineStats {
    pub found: u32,
    pub enriched: u32,
    pub analyzed: u32,
    pub normalized: u32,
    pub validated: u32,
    pub scored: u32,
    pub published: u32,
    pub failed: u32,
    pub queries_executed: u32,
    pub queries_failed: u32,
}

/// Everything a consumer needs to render a progress dashboard.
#[derive(Debug, Clone)]
pub struct PipelineResult {
    pub outcome: PipelineOutcome,
    pub stats: PipelineStats,
    /// Concatenated safe error descriptions, if any.
    pub error: Option<String>,
    /// Populated for `RateLimited` outcomes.
    pub retry_after: Option<Duration>,
    pub retry_scheduled: bool,
    /// Identifiers of newly published items.
    pub published_ids: Vec<Uuid>,
}

/// Orchestrates one source's full pipeline cycle.
pub struct ResearchPipeline<P: SourceProfile, C: PhraseClassifier> {
    profile: P,
    validator: ComplianceValidator<C>,
    scorer: ItemScorer,
    publisher: Publisher,
    cancel: CancellationToken,
}

impl<P: SourceProfile, C: PhraseClassifier> ResearchPipeline<P, C> {
    pub fn new(
        profile: P,
        validator: ComplianceValidator<C>,
        scorer: ItemScorer,
        pool: Arc<dyn ResearchPool>,
    ) -> Self {
        Self {
            profile,
            validator,
            scorer,
            publisher: Publisher::new(pool),
            cancel: CancellationToken::new(),
        }
    }

    /// Honor an external cancellation token. On cancel the pipeline
    /// unwinds at the next stage boundary, keeps anything already
    /// published, and reports `Incomplete`.
    pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    /// Run one full cycle. Never panics and never returns `Err`: every
    /// failure mode is folded into the [`PipelineResult`].
    pub async fn run(&self) -> PipelineResult {
        let mut stats = PipelineStats::default();
        let mut errors: Vec<String> = Vec::new();
        let source = self.profile.source();
        tracing::info!("starting {source} research pipeline");

        // Stage 1: scan.
        if self.cancel.is_cancelled() {
            return cancelled_result(stats, Vec::new());
        }
        let scan = match self.profile.scan().await {
            Ok(scan) => scan,
            Err(e) => return error_result(e, stats, Vec::new()),
        };
        stats.found = scan.stats.unique_after_dedup;
        stats.queries_executed = scan.stats.queries_executed;
        stats.queries_failed = scan.stats.queries_failed;
        errors.extend(scan.errors);

        if scan.records.is_empty() {
            tracing::info!("{source} scan found nothing; retry advised");
            errors.push("no records discovered".to_string());
            return incomplete_result(stats, errors, Vec::new());
        }

        // Stage 2: harvest.
        if self.cancel.is_cancelled() {
            return cancelled_result(stats, Vec::new());
        }
        let harvest = match self.profile.harvest(scan.records).await {
            Ok(harvest) => harvest,
            Err(e) => return error_result(e, stats, Vec::new()),
        };
        stats.enriched = harvest.records.len() as u32;
        stats.failed += harvest.failed;

        if harvest.records.is_empty() {
            tracing::info!("{source} harvest produced nothing; retry advised");
            errors.push("empty harvest".to_string());
            return incomplete_result(stats, errors, Vec::new());
        }

        // Stage 3: optional analysis.
        if self.cancel.is_cancelled() {
            return cancelled_result(stats, Vec::new());
        }
        let analyses = self.profile.analyze(&harvest.records).await;
        stats.analyzed = analyses.iter().flatten().count() as u32;

        // Stage 4: normalize.
        let mut drafts = Vec::with_capacity(harvest.records.len());
        for (record, analysis) in harvest.records.iter().zip(&analyses) {
            match self.profile.normalize(record, analysis.as_ref()) {
                Ok(draft) => drafts.push(draft),
                Err(e) => {
                    stats.failed += 1;
                    tracing::warn!("normalization failed: {e}");
                    errors.push(e.safe_description());
                }
            }
        }
        stats.normalized = drafts.len() as u32;

        // Stage 5: compliance validation.
        if self.cancel.is_cancelled() {
            return cancelled_result(stats, Vec::new());
        }
        let (validated, validation_stats) = self.validator.validate_batch(drafts).await;
        stats.validated = validation_stats.validated;
        stats.failed += validation_stats.failed;

        // Stage 6: score. Pure computation, cannot fail per item.
        let mut scored = Vec::with_capacity(validated.len());
        for (mut draft, result) in validated {
            draft.compliance_status = result.status;
            draft
                .source_metadata
                .insert("compliance_notes".into(), result.notes.clone().into());
            let score = self
                .scorer
                .calculate(&ScoringInput::from_draft(&draft))
                .final_score;
            draft.score = score;
            scored.push(draft);
        }
        stats.scored = scored.len() as u32;

        // Stage 7: publish.
        if self.cancel.is_cancelled() {
            return cancelled_result(stats, Vec::new());
        }
        let publish = self.publisher.publish(scored, &self.cancel).await;
        stats.published = publish.ids.len() as u32;
        stats.failed += publish.failed;

        let outcome = if stats.failed == 0 {
            PipelineOutcome::Complete
        } else if stats.published > 0 {
            PipelineOutcome::Partial
        } else {
            // Every surviving item failed on the way in; retry advised.
            PipelineOutcome::Incomplete
        };

        tracing::info!(
            "{source} pipeline {}: published {}/{} ({} failed)",
            outcome.as_str(),
            stats.published,
            stats.found,
            stats.failed
        );

        PipelineResult {
            outcome,
            stats,
            error: join_errors(errors),
            retry_after: None,
            retry_scheduled: outcome == PipelineOutcome::Incomplete,
            published_ids: publish.ids,
        }
    }
}

fn join_errors(errors: Vec<String>) -> Option<String> {
    if errors.is_empty() {
        None
    } else {
        Some(errors.join("; "))
    }
}

fn cancelled_result(stats: PipelineStats, published_ids: Vec<Uuid>) -> PipelineResult {
    PipelineResult {
        outcome: PipelineOutcome::Incomplete,
        stats,
        error: Some("cancelled".to_string()),
        retry_after: None,
        retry_scheduled: true,
        published_ids,
    }
}

fn incomplete_result(
    stats: PipelineStats,
    errors: Vec<String>,
    published_ids: Vec<Uuid>,
) -> PipelineResult {
    PipelineResult {
        outcome: PipelineOutcome::Incomplete,
        stats,
        error: join_errors(errors),
        retry_after: None,
        retry_scheduled: true,
        published_ids,
    }
}

/// Map a whole-stage error onto the run outcome.
fn error_result(
    error: HarvestError,
    stats: PipelineStats,
    published_ids: Vec<Uuid>,
) -> PipelineResult {
    let (outcome, retry_after) = match &error {
        HarvestError::RateLimited { retry_after } => {
            (PipelineOutcome::RateLimited, Some(*retry_after))
        }
        HarvestError::SourceTransient(_) | HarvestError::Cancelled => {
            (PipelineOutcome::Incomplete, None)
        }
        _ => (PipelineOutcome::Failed, None),
    };
    if outcome == PipelineOutcome::Failed {
        tracing::error!("pipeline failed ({}): {error}", error.kind().as_str());
    } else {
        tracing::warn!("pipeline stopped ({}): {error}", outcome.as_str());
    }

    PipelineResult {
        outcome,
        stats,
        error: Some(error.safe_description()),
        retry_after,
        retry_scheduled: true,
        published_ids,
    }
}
