//! Video platform source: transcript-bearing uploads.

mod config;
mod stages;
mod types;

pub use config::{
    VideoConfig, DEFAULT_LOOKBACK_DAYS, DEFAULT_MAX_RESULTS_PER_QUERY, DEFAULT_MIN_VIEWS,
    DEFAULT_RATE_LIMIT_PER_MINUTE,
};
pub use stages::{VideoHarvester, VideoNormalizer, VideoScanner};
pub use types::{HarvestedVideo, RawVideo, VideoApi};

use std::num::NonZeroU32;
use std::sync::Arc;

use async_trait::async_trait;

use research_pool::{ResearchItemDraft, ResearchSource};

use crate::error::Result;
use crate::ratelimit::SourceRateLimiter;
use crate::scan::{HarvestOutput, ScanOutput};
use crate::sources::SourceProfile;

/// Behavior record wiring the video stages together.
pub struct VideoProfile {
    scanner: VideoScanner,
    harvester: VideoHarvester,
    normalizer: VideoNormalizer,
}

impl VideoProfile {
    /// Build a profile with its own rate limiter.
    pub fn new(config: VideoConfig, client: Arc<dyn VideoApi>) -> Result<Self> {
        config.validate()?;
        let limiter = Arc::new(SourceRateLimiter::per_minute(
            NonZeroU32::new(config.rate_limit_per_minute).expect("validated rate limit"),
        ));
        Self::with_limiter(config, client, limiter)
    }

    /// Build a profile sharing an existing per-source limiter.
    pub fn with_limiter(
        config: VideoConfig,
        client: Arc<dyn VideoApi>,
        limiter: Arc<SourceRateLimiter>,
    ) -> Result<Self> {
        config.validate()?;
        let harvester = VideoHarvester::new(
            client.clone(),
            limiter.clone(),
            config.watch_url_base.clone(),
        );
        let scanner = VideoScanner::new(config, client, limiter);
        Ok(Self {
            scanner,
            harvester,
            normalizer: VideoNormalizer,
        })
    }
}

#[async_trait]
impl SourceProfile for VideoProfile {
    type Raw = RawVideo;
    type Harvested = HarvestedVideo;
    type Analysis = ();

    fn source(&self) -> ResearchSource {
        ResearchSource::Video
    }

    async fn scan(&self) -> Result<ScanOutput<RawVideo>> {
        self.scanner.scan().await
    }

    async fn harvest(&self, records: Vec<RawVideo>) -> Result<HarvestOutput<HarvestedVideo>> {
        self.harvester.harvest(records).await
    }

    fn normalize(
        &self,
        record: &HarvestedVideo,
        _analysis: Option<&()>,
    ) -> Result<ResearchItemDraft> {
        self.normalizer.normalize(record)
    }
}
