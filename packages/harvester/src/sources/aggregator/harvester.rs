//! Aggregator harvester: per-post detail fetch and sanitization.

use std::sync::Arc;

use crate::error::{HarvestError, Result, SourceError};
use crate::ratelimit::SourceRateLimiter;
use crate::scan::HarvestOutput;
use crate::text::Sanitizer;

use super::types::{AggregatorApi, HarvestedPost, RawPost};

/// Enriches raw posts with their full bodies.
///
/// Per-item network errors are counted and the stage continues; deleted
/// posts and posts whose body is empty after sanitization are dropped.
pub struct AggregatorHarvester {
    client: Arc<dyn AggregatorApi>,
    limiter: Arc<SourceRateLimiter>,
    sanitizer: Sanitizer,
}

impl AggregatorHarvester {
    pub fn new(client: Arc<dyn AggregatorApi>, limiter: Arc<SourceRateLimiter>) -> Self {
        Self {
            client,
            limiter,
            sanitizer: Sanitizer::new(),
        }
    }

    pub async fn harvest(&self, records: Vec<RawPost>) -> Result<HarvestOutput<HarvestedPost>> {
        let mut output = HarvestOutput::empty();
        tracing::info!("harvesting {} aggregator posts", records.len());

        for raw in records {
            self.limiter.acquire().await;
            let detail = match self.client.fetch_post(&raw.id).await {
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
                    tracing::warn!("failed to fetch post {}: {e}", raw.id);
                    continue;
                }
            };

            if detail.removed {
                output.dropped += 1;
                continue;
            }
            let body = self.sanitizer.sanitize(&detail.body);
            if body.is_empty() {
                output.dropped += 1;
                continue;
            }

            output.records.push(HarvestedPost {
                id: detail.id,
                subspace: detail.subspace,
                title: detail.title,
                body,
                author: detail.author,
                upvotes: detail.upvotes,
                upvote_ratio: detail.upvote_ratio,
                comment_count: detail.comment_count,
                created_at: detail.created_at,
                permalink: detail.permalink,
            });
        }

        tracing::info!(
            "aggregator harvest complete: {} enriched, {} dropped, {} failed",
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
    use crate::testing::MockAggregatorApi;
    use chrono::Utc;
    use nonzero_ext::nonzero;

    use super::super::types::PostDetail;

    fn limiter() -> Arc<SourceRateLimiter> {
        Arc::new(SourceRateLimiter::per_minute(nonzero!(600u32)))
    }

    fn raw(id: &str) -> RawPost {
        RawPost {
            id: id.into(),
            subspace: "nootropics".into(),
            title: format!("post {id}"),
            upvotes: 42,
            created_at: Utc::now(),
            permalink: format!("/p/{id}"),
        }
    }

    fn detail(id: &str, body: &str) -> PostDetail {
        PostDetail {
            id: id.into(),
            subspace: "nootropics".into(),
            title: format!("post {id}"),
            body: body.into(),
            author: "user1".into(),
            upvotes: 42,
            upvote_ratio: 0.97,
            comment_count: 7,
            created_at: Utc::now(),
            permalink: format!("/p/{id}"),
            removed: false,
        }
    }

    #[tokio::test]
    async fn enriches_and_sanitizes_bodies() {
        let client =
            MockAggregatorApi::new().with_post(detail("a", "**bold** take on [chaga](https://x)"));
        let harvester = AggregatorHarvester::new(Arc::new(client), limiter());
        let output = harvester.harvest(vec![raw("a")]).await.unwrap();
        assert_eq!(output.records.len(), 1);
        assert_eq!(output.records[0].body, "bold take on chaga");
    }

    #[tokio::test]
    async fn deleted_posts_are_dropped_not_failed() {
        let client = MockAggregatorApi::new(); // no details registered => None
        let harvester = AggregatorHarvester::new(Arc::new(client), limiter());
        let output = harvester.harvest(vec![raw("gone")]).await.unwrap();
        assert!(output.records.is_empty());
        assert_eq!(output.dropped, 1);
        assert_eq!(output.failed, 0);
    }

    #[tokio::test]
    async fn removed_and_empty_bodies_are_dropped() {
        let mut removed = detail("r", "text");
        removed.removed = true;
        let client = MockAggregatorApi::new()
            .with_post(removed)
            .with_post(detail("e", "   "));
        let harvester = AggregatorHarvester::new(Arc::new(client), limiter());
        let output = harvester.harvest(vec![raw("r"), raw("e")]).await.unwrap();
        assert!(output.records.is_empty());
        assert_eq!(output.dropped, 2);
    }

    #[tokio::test]
    async fn per_item_errors_do_not_stop_the_stage() {
        let client = MockAggregatorApi::new()
            .with_post(detail("ok", "useful body"))
            .failing_on_fetch("bad", SourceError::Transient("timeout".into()));
        let harvester = AggregatorHarvester::new(Arc::new(client), limiter());
        let output = harvester.harvest(vec![raw("bad"), raw("ok")]).await.unwrap();
        assert_eq!(output.records.len(), 1);
        assert_eq!(output.failed, 1);
    }

    #[tokio::test]
    async fn rate_limit_aborts_the_stage() {
        let client = MockAggregatorApi::new().failing_on_fetch(
            "a",
            SourceError::RateLimited { retry_after: None },
        );
        let harvester = AggregatorHarvester::new(Arc::new(client), limiter());
        let err = harvester.harvest(vec![raw("a")]).await.expect_err("limited");
        assert!(matches!(err, HarvestError::RateLimited { .. }));
    }
}
