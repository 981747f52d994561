//! Image/caption platform source: hashtag-driven posts and competitor
//! monitoring, with theme extraction and claim detection.

mod analyzers;
mod config;
mod harvester;
mod normalizer;
mod scanner;
mod types;

pub use analyzers::{
    ClaimDetector, ClaimScan, DetectedClaim, ImageAnalysis, ThemeExtractor, ThemeSummary,
    CLAIM_DETECTION_PROMPT, THEME_EXTRACTION_PROMPT,
};
pub use config::{
    ImageConfig, DEFAULT_LOOKBACK_HOURS, DEFAULT_MAX_MEDIA_PER_SCAN, DEFAULT_MIN_LIKES,
    DEFAULT_RATE_LIMIT_PER_MINUTE,
};
pub use harvester::ImageHarvester;
pub use normalizer::ImageNormalizer;
pub use scanner::ImageScanner;
pub use types::{HarvestedMedia, ImageApi, MediaDetail, RawMedia};

use std::num::NonZeroU32;
use std::sync::Arc;

use async_trait::async_trait;

use research_pool::{ResearchItemDraft, ResearchSource};

use crate::error::Result;
use crate::llm::LlmClient;
use crate::ratelimit::SourceRateLimiter;
use crate::scan::{HarvestOutput, ScanOutput};
use crate::sources::SourceProfile;

/// Behavior record wiring the image stages together.
pub struct ImageProfile {
    scanner: ImageScanner,
    harvester: ImageHarvester,
    themes: ThemeExtractor<Arc<dyn LlmClient>>,
    claims: ClaimDetector<Arc<dyn LlmClient>>,
    normalizer: ImageNormalizer,
}

impl ImageProfile {
    /// Build a profile with its own rate limiter.
    pub fn new(
        config: ImageConfig,
        client: Arc<dyn ImageApi>,
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
        config: ImageConfig,
        client: Arc<dyn ImageApi>,
        llm: Arc<dyn LlmClient>,
        limiter: Arc<SourceRateLimiter>,
    ) -> Result<Self> {
        config.validate()?;
        let harvester = ImageHarvester::new(client.clone(), limiter.clone());
        let scanner = ImageScanner::new(config, client, limiter);
        Ok(Self {
            scanner,
            harvester,
            themes: ThemeExtractor::new(llm.clone()),
            claims: ClaimDetector::new(llm),
            normalizer: ImageNormalizer::new(),
        })
    }
}

#[async_trait]
impl SourceProfile for ImageProfile {
    type Raw = RawMedia;
    type Harvested = HarvestedMedia;
    type Analysis = ImageAnalysis;

    fn source(&self) -> ResearchSource {
        ResearchSource::Image
    }

    async fn scan(&self) -> Result<ScanOutput<RawMedia>> {
        self.scanner.scan().await
    }

    async fn harvest(&self, records: Vec<RawMedia>) -> Result<HarvestOutput<HarvestedMedia>> {
        self.harvester.harvest(records).await
    }

    async fn analyze(&self, records: &[HarvestedMedia]) -> Vec<Option<ImageAnalysis>> {
        let mut analyses = Vec::with_capacity(records.len());
        for media in records {
            let themes = self.themes.extract(media).await;
            let claims = self.claims.detect(media).await;
            analyses.push(Some(ImageAnalysis { themes, claims }));
        }
        analyses
    }

    fn normalize(
        &self,
        record: &HarvestedMedia,
        analysis: Option<&ImageAnalysis>,
    ) -> Result<ResearchItemDraft> {
        self.normalizer.normalize(record, analysis)
    }
}
