//! Biomed scanner: literature searches plus batched detail fetch.
//!
//! The database's search endpoint returns bare article ids, so the scanner
//! also performs the batched detail fetch; the harvest stage then does the
//! pure enrichment (study classification, sample size, URLs).

use std::collections::HashSet;
use std::sync::Arc;

use crate::error::{HarvestError, Result, SourceError};
use crate::ratelimit::SourceRateLimiter;
use crate::scan::{ScanOutput, ScanStats};

use super::config::BiomedConfig;
use super::types::{BiomedApi, RawArticle};

pub struct BiomedScanner {
    config: BiomedConfig,
    client: Arc<dyn BiomedApi>,
    limiter: Arc<SourceRateLimiter>,
}

impl BiomedScanner {
    pub fn new(
        config: BiomedConfig,
        client: Arc<dyn BiomedApi>,
        limiter: Arc<SourceRateLimiter>,
    ) -> Self {
        Self {
            config,
            client,
            limiter,
        }
    }

    pub async fn scan(&self) -> Result<ScanOutput<RawArticle>> {
        let mut stats = ScanStats::default();
        let mut errors = Vec::new();
        let mut ids: Vec<String> = Vec::new();
        let mut seen: HashSet<String> = HashSet::new();

        tracing::info!(
            "scanning literature: {} queries, lookback={} days",
            self.config.search_queries.len(),
            self.config.lookback_days
        );

        for query in &self.config.search_queries {
            self.limiter.try_acquire()?;
            let found = match self
                .client
                .search(
                    query,
                    self.config.lookback_days,
                    &self.config.publication_type_filters,
                    self.config.max_results_per_query,
                )
                .await
            {
                Ok(ids) => ids,
                Err(SourceError::RateLimited { retry_after }) => {
                    return Err(SourceError::RateLimited { retry_after }.into());
                }
                Err(SourceError::Auth(msg)) => return Err(HarvestError::SourceAuth(msg)),
                Err(e) => {
                    stats.queries_executed += 1;
                    stats.queries_failed += 1;
                    tracing::warn!("query '{query}' failed: {e}");
                    errors.push(format!("query '{query}' failed"));
                    continue;
                }
            };
            stats.queries_executed += 1;
            stats.total_found += found.len() as u32;
            for id in found {
                if seen.insert(id.clone()) {
                    ids.push(id);
                }
            }
        }

        let total_queries = self.config.search_queries.len();
        if total_queries > 0 && stats.queries_failed as usize == total_queries {
            return Err(HarvestError::SourceTransient(format!(
                "all {total_queries} literature queries failed"
            )));
        }

        stats.unique_after_dedup = ids.len() as u32;
        let records = self.fetch_details(&ids).await?;

        tracing::info!(
            "literature scan complete: {} queries, {} ids, {} unique, {} articles",
            stats.queries_executed,
            stats.total_found,
            stats.unique_after_dedup,
            records.len()
        );

        Ok(ScanOutput {
            records,
            stats,
            errors,
        })
    }

    async fn fetch_details(&self, ids: &[String]) -> Result<Vec<RawArticle>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        self.limiter.acquire().await;
        match self.client.fetch_details(ids).await {
            Ok(articles) => Ok(articles),
            Err(SourceError::RateLimited { retry_after }) => {
                Err(SourceError::RateLimited { retry_after }.into())
            }
            Err(SourceError::Auth(msg)) => Err(HarvestError::SourceAuth(msg)),
            Err(e) => {
                tracing::error!("failed to fetch article details: {e}");
                Err(HarvestError::SourceTransient(format!(
                    "detail fetch failed: {e}"
                )))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MockBiomedApi;
    use nonzero_ext::nonzero;

    fn limiter() -> Arc<SourceRateLimiter> {
        Arc::new(SourceRateLimiter::per_minute(nonzero!(600u32)))
    }

    fn config(queries: Vec<&str>) -> BiomedConfig {
        BiomedConfig::new(
            queries.into_iter().map(String::from).collect(),
            "https://lit.example/articles",
        )
    }

    fn article(id: &str) -> RawArticle {
        RawArticle {
            article_id: id.into(),
            title: format!("Study {id}"),
            abstract_text: "Abstract text".into(),
            authors: vec!["Author A".into()],
            journal: "J Res".into(),
            pub_date: Some(chrono::Utc::now()),
            doi: None,
            publication_types: vec!["Randomized Controlled Trial".into()],
            citation_count: Some(3),
        }
    }

    #[tokio::test]
    async fn dedupes_ids_across_queries() {
        let client = MockBiomedApi::new()
            .with_search_results("chaga", vec!["1", "2"])
            .with_search_results("reishi", vec!["2", "3"])
            .with_article(article("1"))
            .with_article(article("2"))
            .with_article(article("3"));
        let scanner = BiomedScanner::new(config(vec!["chaga", "reishi"]), Arc::new(client), limiter());
        let output = scanner.scan().await.unwrap();
        assert_eq!(output.stats.total_found, 4);
        assert_eq!(output.stats.unique_after_dedup, 3);
        assert_eq!(output.records.len(), 3);
    }

    #[tokio::test]
    async fn partial_query_failure_is_nonfatal() {
        let client = MockBiomedApi::new()
            .with_search_results("chaga", vec!["1"])
            .failing_on_query("reishi", SourceError::Transient("500".into()))
            .with_article(article("1"));
        let scanner = BiomedScanner::new(config(vec!["chaga", "reishi"]), Arc::new(client), limiter());
        let output = scanner.scan().await.unwrap();
        assert_eq!(output.stats.queries_failed, 1);
        assert_eq!(output.records.len(), 1);
    }

    #[tokio::test]
    async fn all_queries_failing_is_fatal() {
        let client =
            MockBiomedApi::new().failing_on_query("chaga", SourceError::Transient("500".into()));
        let scanner = BiomedScanner::new(config(vec!["chaga"]), Arc::new(client), limiter());
        assert!(matches!(
            scanner.scan().await,
            Err(HarvestError::SourceTransient(_))
        ));
    }

    #[tokio::test]
    async fn rate_limit_propagates_with_hint() {
        let client = MockBiomedApi::new().failing_on_query(
            "chaga",
            SourceError::RateLimited {
                retry_after: Some(std::time::Duration::from_secs(120)),
            },
        );
        let scanner = BiomedScanner::new(config(vec!["chaga"]), Arc::new(client), limiter());
        match scanner.scan().await {
            Err(HarvestError::RateLimited { retry_after }) => {
                assert_eq!(retry_after, std::time::Duration::from_secs(120));
            }
            other => panic!("unexpected: {other:?}"),
        }
    }
}
