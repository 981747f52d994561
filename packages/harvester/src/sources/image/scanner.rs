//! Image scanner: hashtag scans plus competitor account monitoring.

use std::collections::HashSet;
use std::sync::Arc;

use chrono::{Duration, Utc};

use crate::error::{HarvestError, Result, SourceError};
use crate::ratelimit::SourceRateLimiter;
use crate::scan::{ScanOutput, ScanStats};

use super::config::ImageConfig;
use super::types::{ImageApi, RawMedia};

pub struct ImageScanner {
    config: ImageConfig,
    client: Arc<dyn ImageApi>,
    limiter: Arc<SourceRateLimiter>,
}

impl ImageScanner {
    pub fn new(
        config: ImageConfig,
        client: Arc<dyn ImageApi>,
        limiter: Arc<SourceRateLimiter>,
    ) -> Self {
        Self {
            config,
            client,
            limiter,
        }
    }

    pub async fn scan(&self) -> Result<ScanOutput<RawMedia>> {
        let mut stats = ScanStats::default();
        let mut errors = Vec::new();
        let mut seen: HashSet<String> = HashSet::new();
        let mut records: Vec<RawMedia> = Vec::new();

        let recency_floor = Utc::now() - Duration::hours(i64::from(self.config.lookback_hours));
        let total_queries = self.config.hashtags.len() + self.config.competitor_accounts.len();
        tracing::info!(
            "scanning image platform: {} hashtags, {} competitor accounts",
            self.config.hashtags.len(),
            self.config.competitor_accounts.len()
        );

        let mut ingest = |found: Vec<RawMedia>, stats: &mut ScanStats| {
            stats.total_found += found.len() as u32;
            for media in found {
                if media.likes < self.config.min_likes || media.timestamp < recency_floor {
                    stats.filtered_out += 1;
                    continue;
                }
                if seen.insert(media.media_id.clone()) {
                    records.push(media);
                }
            }
        };

        for hashtag in &self.config.hashtags {
            self.limiter.try_acquire()?;
            match self
                .client
                .search_hashtag(hashtag, self.config.max_media_per_scan)
                .await
            {
                Ok(found) => {
                    stats.queries_executed += 1;
                    ingest(found, &mut stats);
                }
                Err(SourceError::RateLimited { retry_after }) => {
                    return Err(SourceError::RateLimited { retry_after }.into());
                }
                Err(SourceError::Auth(msg)) => return Err(HarvestError::SourceAuth(msg)),
                Err(e) => {
                    stats.queries_executed += 1;
                    stats.queries_failed += 1;
                    tracing::warn!("hashtag '{hashtag}' scan failed: {e}");
                    errors.push(format!("hashtag '{hashtag}' scan failed"));
                }
            }
        }

        for account in &self.config.competitor_accounts {
            self.limiter.try_acquire()?;
            match self
                .client
                .recent_media(account, self.config.max_media_per_scan)
                .await
            {
                Ok(found) => {
                    stats.queries_executed += 1;
                    // Mark competitor provenance before thresholds.
                    let found = found
                        .into_iter()
                        .map(|mut m| {
                            m.is_competitor = true;
                            m
                        })
                        .collect();
                    ingest(found, &mut stats);
                }
                Err(SourceError::RateLimited { retry_after }) => {
                    return Err(SourceError::RateLimited { retry_after }.into());
                }
                Err(SourceError::Auth(msg)) => return Err(HarvestError::SourceAuth(msg)),
                Err(e) => {
                    stats.queries_executed += 1;
                    stats.queries_failed += 1;
                    tracing::warn!("account '{account}' scan failed: {e}");
                    errors.push(format!("account '{account}' scan failed"));
                }
            }
        }

        if total_queries > 0 && stats.queries_failed as usize == total_queries {
            return Err(HarvestError::SourceTransient(format!(
                "all {total_queries} image scans failed"
            )));
        }

        stats.unique_after_dedup = records.len() as u32;
        Ok(ScanOutput {
            records,
            stats,
            errors,
        })
    }
}
