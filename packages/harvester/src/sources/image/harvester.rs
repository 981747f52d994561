//! Image harvester: per-media detail fetch.

use std::sync::Arc;

use crate::error::{HarvestError, Result, SourceError};
use crate::ratelimit::SourceRateLimiter;
use crate::scan::HarvestOutput;

use super::types::{HarvestedMedia, ImageApi, RawMedia};

/// Enriches raw media with full captions and engagement counts.
///
/// Deleted or private media is dropped. Captionless media is kept: the
/// normalizer synthesizes an account-based title, and hashtags still
/// carry signal.
pub struct ImageHarvester {
    client: Arc<dyn ImageApi>,
    limiter: Arc<SourceRateLimiter>,
}

impl ImageHarvester {
    pub fn new(client: Arc<dyn ImageApi>, limiter: Arc<SourceRateLimiter>) -> Self {
        Self { client, limiter }
    }

    pub async fn harvest(&self, records: Vec<RawMedia>) -> Result<HarvestOutput<HarvestedMedia>> {
        let mut output = HarvestOutput::empty();
        tracing::info!("harvesting {} media items", records.len());

        for raw in records {
            self.limiter.acquire().await;
            let detail = match self.client.fetch_media(&raw.media_id).await {
                Ok(Some(detail)) => detail,
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
                    tracing::warn!("failed to fetch media {}: {e}", raw.media_id);
                    continue;
                }
            };

            output.records.push(HarvestedMedia {
                media_id: detail.media_id,
                caption: detail.caption,
                hashtags: detail.hashtags,
                likes: detail.likes,
                comments: detail.comments,
                media_type: detail.media_type,
                account: detail.account,
                account_type: detail.account_type,
                timestamp: detail.timestamp,
                permalink: detail.permalink,
                hashtag_source: raw.hashtag_source,
                is_competitor: raw.is_competitor,
            });
        }

        tracing::info!(
            "image harvest complete: {} enriched, {} dropped, {} failed",
            output.records.len(),
            output.dropped,
            output.failed
        );
        Ok(output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MockImageApi;
    use chrono::Utc;
    use nonzero_ext::nonzero;

    use super::super::types::MediaDetail;

    fn limiter() -> Arc<SourceRateLimiter> {
        Arc::new(SourceRateLimiter::per_minute(nonzero!(600u32)))
    }

    fn raw(id: &str) -> RawMedia {
        RawMedia {
            media_id: id.into(),
            account: "wellness_user".into(),
            likes: 100,
            timestamp: Utc::now(),
            hashtag_source: Some("chaga".into()),
            is_competitor: false,
        }
    }

    fn detail(id: &str) -> MediaDetail {
        MediaDetail {
            media_id: id.into(),
            caption: "Morning chaga ritual".into(),
            hashtags: vec!["chaga".into()],
            likes: 120,
            comments: 9,
            media_type: "image".into(),
            account: "wellness_user".into(),
            account_type: "business".into(),
            timestamp: Utc::now(),
            permalink: format!("https://img.example/p/{id}/"),
        }
    }

    #[tokio::test]
    async fn enriches_and_keeps_provenance() {
        let client = MockImageApi::new().with_media(detail("m1"));
        let harvester = ImageHarvester::new(Arc::new(client), limiter());
        let output = harvester.harvest(vec![raw("m1")]).await.unwrap();
        assert_eq!(output.records.len(), 1);
        assert_eq!(output.records[0].hashtag_source.as_deref(), Some("chaga"));
        assert_eq!(output.records[0].likes, 120);
    }

    #[tokio::test]
    async fn deleted_media_is_dropped() {
        let client = MockImageApi::new();
        let harvester = ImageHarvester::new(Arc::new(client), limiter());
        let output = harvester.harvest(vec![raw("gone")]).await.unwrap();
        assert_eq!(output.dropped, 1);
        assert_eq!(output.failed, 0);
    }

    #[tokio::test]
    async fn per_item_errors_continue_the_stage() {
        let client = MockImageApi::new()
            .with_media(detail("ok"))
            .failing_on_fetch("bad", SourceError::Transient("timeout".into()));
        let harvester = ImageHarvester::new(Arc::new(client), limiter());
        let output = harvester
            .harvest(vec![raw("bad"), raw("ok")])
            .await
            .unwrap();
        assert_eq!(output.records.len(), 1);
        assert_eq!(output.failed, 1);
    }
}
