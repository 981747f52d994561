//! Video pipeline stages: scanner, harvester, normalizer.

use std::collections::HashSet;
use std::sync::Arc;

use research_pool::{Metadata, ResearchItemDraft, ResearchSource, MAX_CONTENT_LEN, MAX_TITLE_LEN};

use crate::error::{HarvestError, Result, SourceError};
use crate::ratelimit::SourceRateLimiter;
use crate::scan::{HarvestOutput, ScanOutput, ScanStats};
use crate::tags::generate_tags;
use crate::text::{truncate_with_ellipsis, Sanitizer};

use super::config::VideoConfig;
use super::types::{HarvestedVideo, RawVideo, VideoApi};

pub struct VideoScanner {
    config: VideoConfig,
    client: Arc<dyn VideoApi>,
    limiter: Arc<SourceRateLimiter>,
}

impl VideoScanner {
    pub fn new(
        config: VideoConfig,
        client: Arc<dyn VideoApi>,
        limiter: Arc<SourceRateLimiter>,
    ) -> Self {
        Self {
            config,
            client,
            limiter,
        }
    }

    pub async fn scan(&self) -> Result<ScanOutput<RawVideo>> {
        let mut stats = ScanStats::default();
        let mut errors = Vec::new();
        let mut seen: HashSet<String> = HashSet::new();
        let mut records: Vec<RawVideo> = Vec::new();

        for query in &self.config.search_queries {
            self.limiter.try_acquire()?;
            let found = match self
                .client
                .search(query, self.config.lookback_days, self.config.max_results_per_query)
                .await
            {
                Ok(videos) => videos,
                Err(SourceError::RateLimited { retry_after }) => {
                    return Err(SourceError::RateLimited { retry_after }.into());
                }
                Err(SourceError::Auth(msg)) => return Err(HarvestError::SourceAuth(msg)),
                Err(e) => {
                    stats.queries_executed += 1;
                    stats.queries_failed += 1;
                    tracing::warn!("video query '{query}' failed: {e}");
                    errors.push(format!("video query '{query}' failed"));
                    continue;
                }
            };
            stats.queries_executed += 1;
            stats.total_found += found.len() as u32;
            for video in found {
                if video.views < self.config.min_views {
                    stats.filtered_out += 1;
                    continue;
                }
                if seen.insert(video.id.clone()) {
                    records.push(video);
                }
            }
        }

        let total_queries = self.config.search_queries.len();
        if total_queries > 0 && stats.queries_failed as usize == total_queries {
            return Err(HarvestError::SourceTransient(format!(
                "all {total_queries} video queries failed"
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

/// Fetches and sanitizes transcripts. Videos without a usable transcript
/// are dropped.
pub struct VideoHarvester {
    client: Arc<dyn VideoApi>,
    limiter: Arc<SourceRateLimiter>,
    sanitizer: Sanitizer,
    watch_url_base: String,
}

impl VideoHarvester {
    pub fn new(
        client: Arc<dyn VideoApi>,
        limiter: Arc<SourceRateLimiter>,
        watch_url_base: impl Into<String>,
    ) -> Self {
        Self {
            client,
            limiter,
            sanitizer: Sanitizer::new(),
            watch_url_base: watch_url_base.into(),
        }
    }

    pub async fn harvest(&self, records: Vec<RawVideo>) -> Result<HarvestOutput<HarvestedVideo>> {
        let mut output = HarvestOutput::empty();

        for raw in records {
            self.limiter.acquire().await;
            let transcript = match self.client.fetch_transcript(&raw.id).await {
                Ok(Some(text)) => self.sanitizer.sanitize(&text),
                Ok(None) => {
                    output.dropped += 1;
                    continue;
                }
                Err(SourceError::RateLimited { retry_after }) => {
                    return Err(SourceError::RateLimited { retry_after }.into());
                }
                Err(SourceError::Auth(msg)) => return Err(HarvestError::SourceAuth(msg)),
                Err(e) => {
                    output.failed += 1;
                    tracing::warn!("failed to fetch transcript for {}: {e}", raw.id);
                    continue;
                }
            };
            if transcript.is_empty() {
                output.dropped += 1;
                continue;
            }

            let url = format!(
                "{}/{}",
                self.watch_url_base.trim_end_matches('/'),
                raw.id
            );
            output.records.push(HarvestedVideo {
                id: raw.id,
                title: raw.title,
                channel: raw.channel,
                views: raw.views,
                published_at: raw.published_at,
                transcript,
                url,
            });
        }

        Ok(output)
    }
}

/// Maps transcribed videos into pool drafts.
pub struct VideoNormalizer;

impl VideoNormalizer {
    pub fn normalize(&self, video: &HarvestedVideo) -> Result<ResearchItemDraft> {
        let title = truncate_with_ellipsis(&video.title, MAX_TITLE_LEN);
        let content = truncate_with_ellipsis(&video.transcript, MAX_CONTENT_LEN);
        let tags = generate_tags(&video.title, &video.transcript, ["video"]);

        let mut metadata = Metadata::new();
        metadata.insert("channel".into(), video.channel.clone().into());
        metadata.insert("views".into(), video.views.into());
        metadata.insert("video_id".into(), video.id.clone().into());

        let mut draft =
            ResearchItemDraft::new(ResearchSource::Video, title, content, video.url.clone())
                .with_tags(tags)
                .with_metadata(metadata)
                .with_created_at(video.published_at);
        draft.validate()?;
        Ok(draft)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MockVideoApi;
    use chrono::Utc;
    use nonzero_ext::nonzero;

    fn limiter() -> Arc<SourceRateLimiter> {
        Arc::new(SourceRateLimiter::per_minute(nonzero!(600u32)))
    }

    fn config() -> VideoConfig {
        VideoConfig::new(vec!["lion's mane review".into()], "https://video.example/watch")
    }

    fn video(id: &str, views: i64) -> RawVideo {
        RawVideo {
            id: id.into(),
            title: format!("Video {id}"),
            channel: "wellness_channel".into(),
            views,
            published_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn scan_filters_by_views_and_dedupes() {
        let client = MockVideoApi::new()
            .with_search_results(vec![video("a", 5_000), video("b", 10), video("a", 5_000)]);
        let scanner = VideoScanner::new(config(), Arc::new(client), limiter());
        let output = scanner.scan().await.unwrap();
        assert_eq!(output.records.len(), 1);
        assert_eq!(output.stats.filtered_out, 1);
    }

    #[tokio::test]
    async fn harvest_drops_missing_transcripts() {
        let client = MockVideoApi::new().with_transcript("a", "a useful transcript here");
        let harvester = VideoHarvester::new(Arc::new(client), limiter(), "https://video.example/watch");
        let output = harvester
            .harvest(vec![video("a", 5_000), video("no-transcript", 5_000)])
            .await
            .unwrap();
        assert_eq!(output.records.len(), 1);
        assert_eq!(output.dropped, 1);
        assert_eq!(output.records[0].url, "https://video.example/watch/a");
    }

    #[tokio::test]
    async fn normalize_builds_video_draft() {
        let harvested = HarvestedVideo {
            id: "a".into(),
            title: "Chaga deep dive".into(),
            channel: "wellness_channel".into(),
            views: 5_000,
            published_at: Utc::now(),
            transcript: "Today we talk about chaga and energy levels".into(),
            url: "https://video.example/watch/a".into(),
        };
        let draft = VideoNormalizer.normalize(&harvested).unwrap();
        assert_eq!(draft.source, ResearchSource::Video);
        assert!(draft.tags.contains(&"chaga".to_string()));
        assert!(draft.tags.contains(&"video".to_string()));
        assert_eq!(
            draft.source_metadata.get("views").unwrap().as_i64(),
            Some(5_000)
        );
    }
}
