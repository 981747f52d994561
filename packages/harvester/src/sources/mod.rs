//! Per-source pipelines behind one behavior record.
//!
//! The orchestrator is parameterized by a [`SourceProfile`]: a bundle of
//! scan, harvest, optional analysis, and normalization behavior for one
//! source. Each source module provides its client trait (the behavioral
//! contract of the external API; concrete HTTP clients live outside this
//! crate), a validated config record, and the stage implementations.

use async_trait::async_trait;

use research_pool::{ResearchItemDraft, ResearchSource};

use crate::error::Result;
use crate::scan::{HarvestOutput, ScanOutput};

pub mod aggregator;
pub mod biomed;
pub mod image;
pub mod news;
pub mod video;

/// Behavior record for one source's pipeline stages.
///
/// Stage outputs flow strictly forward: scan produces raw discovery
/// records, harvest enriches them with detail payloads, analyze attaches
/// optional LLM-derived structure, normalize maps everything into a
/// canonical pool draft.
#[async_trait]
pub trait SourceProfile: Send + Sync {
    /// Minimal discovery payload.
    type Raw: Send + Sync;
    /// Record enriched with the detail fetch.
    type Harvested: Send + Sync;
    /// LLM-derived structure; `()` for sources without analyzers.
    type Analysis: Send + Sync;

    /// Which source this profile drives.
    fn source(&self) -> ResearchSource;

    /// Discover candidate records: run configured queries, threshold,
    /// dedupe by source-native id.
    async fn scan(&self) -> Result<ScanOutput<Self::Raw>>;

    /// Fetch per-item detail. Items the upstream reports deleted, or whose
    /// payload is empty after sanitization, are dropped (not failed).
    async fn harvest(&self, records: Vec<Self::Raw>) -> Result<HarvestOutput<Self::Harvested>>;

    /// Optional LLM analysis, one entry per harvested record. Analysis
    /// failures yield conservative defaults, never item failures.
    async fn analyze(&self, records: &[Self::Harvested]) -> Vec<Option<Self::Analysis>> {
        records.iter().map(|_| None).collect()
    }

    /// Deterministic mapping into a canonical pool draft.
    fn normalize(
        &self,
        record: &Self::Harvested,
        analysis: Option<&Self::Analysis>,
    ) -> Result<ResearchItemDraft>;
}
