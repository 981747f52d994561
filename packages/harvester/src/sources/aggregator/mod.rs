//! Social link aggregator source: upvote-driven community posts.

mod config;
mod harvester;
mod normalizer;
mod scanner;
mod types;

pub use config::{
    AggregatorConfig, DEFAULT_MAX_POSTS_PER_QUERY, DEFAULT_MIN_UPVOTES,
    DEFAULT_RATE_LIMIT_PER_MINUTE,
};
pub use harvester::AggregatorHarvester;
pub use normalizer::AggregatorNormalizer;
pub use scanner::AggregatorScanner;
pub use types::{AggregatorApi, HarvestedPost, PostDetail, RawPost};

use std::num::NonZeroU32;
use std::sync::Arc;

use async_trait::async_trait;

use research_pool::{ResearchItemDraft, ResearchSource};

use crate::error::Result;
use crate::ratelimit::SourceRateLimiter;
use crate::scan::{HarvestOutput, ScanOutput};
use crate::sources::SourceProfile;

/// Behavior record wiring the aggregator stages together.
pub struct AggregatorProfile {
    scanner: AggregatorScanner,
    harvester: AggregatorHarvester,
    normalizer: AggregatorNormalizer,
}

impl AggregatorProfile {
    /// Build a profile with its own rate limiter.
    pub fn new(config: AggregatorConfig, client: Arc<dyn AggregatorApi>) -> Result<Self> {
        config.validate()?;
        // validate() guarantees the rate limit is >= 1.
        let limiter = Arc::new(SourceRateLimiter::per_minute(
            NonZeroU32::new(config.rate_limit_per_minute).expect("validated rate limit"),
        ));
        Self::with_limiter(config, client, limiter)
    }

    /// Build a profile sharing an existing per-source limiter. Concurrent
    /// pipelines for the same source should share one limiter.
    pub fn with_limiter(
        config: AggregatorConfig,
        client: Arc<dyn AggregatorApi>,
        limiter: Arc<SourceRateLimiter>,
    ) -> Result<Self> {
        config.validate()?;
        let normalizer = AggregatorNormalizer::new(config.link_base.clone());
        let harvester = AggregatorHarvester::new(client.clone(), limiter.clone());
        let scanner = AggregatorScanner::new(config, client, limiter);
        Ok(Self {
            scanner,
            harvester,
            normalizer,
        })
    }
}

#[async_trait]
impl SourceProfile for AggregatorProfile {
    type Raw = RawPost;
    type Harvested = HarvestedPost;
    type Analysis = ();

    fn source(&self) -> ResearchSource {
        ResearchSource::Aggregator
    }

    async fn scan(&self) -> Result<ScanOutput<RawPost>> {
        self.scanner.scan().await
    }

    async fn harvest(&self, records: Vec<RawPost>) -> Result<HarvestOutput<HarvestedPost>> {
        self.harvester.harvest(records).await
    }

    fn normalize(
        &self,
        record: &HarvestedPost,
        _analysis: Option<&()>,
    ) -> Result<ResearchItemDraft> {
        self.normalizer.normalize(record)
    }
}
