//! Biomedical literature source: peer-reviewed research articles.
//!
//! The only source with two LLM stages: finding summarization and claim
//! assessment, both between harvest and normalization.

mod analyzers;
mod config;
mod harvester;
mod normalizer;
mod scanner;
mod types;

pub use analyzers::{
    BiomedAnalysis, ClaimAssessment, ClaimAssessor, FindingSummarizer, FindingSummary,
    CLAIM_ASSESSMENT_PROMPT, FINDING_CAVEAT, FINDING_SUMMARY_PROMPT,
};
pub use config::{
    BiomedConfig, DEFAULT_LOOKBACK_DAYS, DEFAULT_MAX_RESULTS_PER_QUERY,
    DEFAULT_RATE_LIMIT_PER_MINUTE,
};
pub use harvester::{classify_study_type, BiomedHarvester};
pub use normalizer::BiomedNormalizer;
pub use scanner::BiomedScanner;
pub use types::{BiomedApi, ContentPotential, HarvestedArticle, RawArticle, StudyType};

use std::num::NonZeroU32;
use std::sync::Arc;

use async_trait::async_trait;

use research_pool::{ResearchItemDraft, ResearchSource};

use crate::error::Result;
use crate::llm::LlmClient;
use crate::ratelimit::SourceRateLimiter;
use crate::scan::{HarvestOutput, ScanOutput};
use crate::sources::SourceProfile;

/// Behavior record wiring the biomed stages together.
pub struct BiomedProfile {
    scanner: BiomedScanner,
    harvester: BiomedHarvester,
    summarizer: FindingSummarizer<Arc<dyn LlmClient>>,
    assessor: ClaimAssessor<Arc<dyn LlmClient>>,
    normalizer: BiomedNormalizer,
}

impl BiomedProfile {
    /// Build a profile with its own rate limiter.
    pub fn new(
        config: BiomedConfig,
        client: Arc<dyn BiomedApi>,
        llm: Arc<dyn LlmClient>,
    ) -> Result<Self> {
        config.validate()?;
        let limiter = Arc::new(SourceRateLimiter::per_minute(
            NonZeroU32::new(config.rate_limit_per_minute).expect("validated rate limit"),
        ));
        Self::with_limiter(config, client, llm, limiter)
    }

    /// Build a profile sharing an existing per-source limiter.
    pub fn with_limiter(
        config: BiomedConfig,
        client: Arc<dyn BiomedApi>,
        llm: Arc<dyn LlmClient>,
        limiter: Arc<SourceRateLimiter>,
    ) -> Result<Self> {
        config.validate()?;
        let harvester = BiomedHarvester::new(config.article_url_base.clone());
        let scanner = BiomedScanner::new(config, client, limiter);
        Ok(Self {
            scanner,
            harvester,
            summarizer: FindingSummarizer::new(llm.clone()),
            assessor: ClaimAssessor::new(llm),
            normalizer: BiomedNormalizer::new(),
        })
    }
}

#[async_trait]
impl SourceProfile for BiomedProfile {
    type Raw = RawArticle;
    type Harvested = HarvestedArticle;
    type Analysis = BiomedAnalysis;

    fn source(&self) -> ResearchSource {
        ResearchSource::Biomed
    }

    async fn scan(&self) -> Result<ScanOutput<RawArticle>> {
        self.scanner.scan().await
    }

    async fn harvest(&self, records: Vec<RawArticle>) -> Result<HarvestOutput<HarvestedArticle>> {
        self.harvester.harvest(records).await
    }

    async fn analyze(&self, records: &[HarvestedArticle]) -> Vec<Option<BiomedAnalysis>> {
        let mut analyses = Vec::with_capacity(records.len());
        for article in records {
            let summary = self.summarizer.summarize(article).await;
            let claims = self.assessor.assess(&summary).await;
            analyses.push(Some(BiomedAnalysis { summary, claims }));
        }
        analyses
    }

    fn normalize(
        &self,
        record: &HarvestedArticle,
        analysis: Option<&BiomedAnalysis>,
    ) -> Result<ResearchItemDraft> {
        self.normalizer.normalize(record, analysis)
    }
}
