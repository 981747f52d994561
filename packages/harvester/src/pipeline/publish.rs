//! Publication into the Research Pool.
//!
//! Deduplicates against the pool by canonical URL (which embeds the
//! source-native id for every source), prefers bulk insert, and falls
//! back to per-item inserts when the bulk transaction fails. Per-item
//! failures are counted, never fatal.

use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use research_pool::{ResearchItemDraft, ResearchPool};

/// Result of a publish pass.
#[derive(Debug, Clone, Default)]
pub struct PublishOutcome {
    /// Identifiers of newly stored items.
    pub ids: Vec<Uuid>,
    /// Items that failed individual insertion.
    pub failed: u32,
    /// Items skipped because their URL is already in the pool.
    pub skipped_existing: u32,
}

pub struct Publisher {
    pool: Arc<dyn ResearchPool>,
}

impl Publisher {
    pub fn new(pool: Arc<dyn ResearchPool>) -> Self {
        Self { pool }
    }

    pub async fn publish(
        &self,
        mut drafts: Vec<ResearchItemDraft>,
        cancel: &CancellationToken,
    ) -> PublishOutcome {
        let mut outcome = PublishOutcome::default();
        if drafts.is_empty() {
            return outcome;
        }

        // Re-running the pipeline against unchanged upstream state must
        // publish nothing: skip items whose URL is already stored.
        let urls: Vec<String> = drafts.iter().map(|d| d.url.clone()).collect();
        match self.pool.find_urls(&urls).await {
            Ok(existing) => {
                let before = drafts.len();
                drafts.retain(|d| !existing.contains(&d.url));
                outcome.skipped_existing = (before - drafts.len()) as u32;
            }
            Err(e) => {
                tracing::warn!("duplicate check failed, inserting unconditionally: {e}");
            }
        }
        if drafts.is_empty() {
            tracing::info!(
                "nothing to publish ({} already present)",
                outcome.skipped_existing
            );
            return outcome;
        }

        // Assign identities up front so the bulk path knows them.
        for draft in &mut drafts {
            draft.id.get_or_insert_with(Uuid::new_v4);
        }
        let ids: Vec<Uuid> = drafts.iter().filter_map(|d| d.id).collect();

        match self.pool.bulk_add(drafts.clone()).await {
            Ok(count) => {
                tracing::info!("bulk published {count} items");
                outcome.ids = ids;
            }
            Err(e) => {
                tracing::warn!("bulk insert failed, falling back to per-item: {e}");
                for draft in drafts {
                    if cancel.is_cancelled() {
                        tracing::info!("publish cancelled, flushing partial results");
                        break;
                    }
                    match self.pool.add(draft).await {
                        Ok(item) => outcome.ids.push(item.id),
                        Err(e) => {
                            outcome.failed += 1;
                            tracing::error!("failed to publish item: {e}");
                        }
                    }
                }
            }
        }

        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use research_pool::{MemoryPool, QueryFilters, ResearchSource};

    fn draft(url: &str) -> ResearchItemDraft {
        ResearchItemDraft::new(
            ResearchSource::News,
            "Title",
            "Body text",
            url.to_string(),
        )
    }

    #[tokio::test]
    async fn publishes_and_returns_ids() {
        let pool = Arc::new(MemoryPool::new());
        let publisher = Publisher::new(pool.clone());
        let outcome = publisher
            .publish(
                vec![draft("https://news.example/1"), draft("https://news.example/2")],
                &CancellationToken::new(),
            )
            .await;
        assert_eq!(outcome.ids.len(), 2);
        assert_eq!(outcome.failed, 0);
        assert_eq!(pool.count(&QueryFilters::new()).await.unwrap(), 2);
    }

    #[tokio::test]
    async fn second_pass_skips_existing_urls() {
        let pool = Arc::new(MemoryPool::new());
        let publisher = Publisher::new(pool.clone());
        let first = publisher
            .publish(vec![draft("https://news.example/1")], &CancellationToken::new())
            .await;
        assert_eq!(first.ids.len(), 1);

        let second = publisher
            .publish(vec![draft("https://news.example/1")], &CancellationToken::new())
            .await;
        assert!(second.ids.is_empty());
        assert_eq!(second.skipped_existing, 1);
        assert_eq!(pool.count(&QueryFilters::new()).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn bulk_failure_falls_back_to_per_item() {
        let pool = Arc::new(MemoryPool::new());
        let publisher = Publisher::new(pool.clone());
        let mut bad = draft("https://news.example/bad");
        bad.title = "   ".into(); // fails validation, poisoning the bulk insert
        let outcome = publisher
            .publish(
                vec![draft("https://news.example/ok"), bad],
                &CancellationToken::new(),
            )
            .await;
        assert_eq!(outcome.ids.len(), 1);
        assert_eq!(outcome.failed, 1);
        assert_eq!(pool.count(&QueryFilters::new()).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn empty_input_is_a_noop() {
        let pool = Arc::new(MemoryPool::new());
        let publisher = Publisher::new(pool);
        let outcome = publisher.publish(Vec::new(), &CancellationToken::new()).await;
        assert!(outcome.ids.is_empty());
    }
}
