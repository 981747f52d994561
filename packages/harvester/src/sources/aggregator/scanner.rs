//! Aggregator scanner: keyword searches across configured communities.

use std::collections::HashSet;
use std::sync::Arc;

use chrono::Utc;

use crate::error::{HarvestError, Result, SourceError};
use crate::ratelimit::SourceRateLimiter;
use crate::scan::{ScanOutput, ScanStats, TimeWindow};

use super::config::AggregatorConfig;
use super::types::{AggregatorApi, RawPost};

/// Discovers candidate posts. Queries are independent: one failing query
/// is counted and logged; the scan only fails when every query fails, or
/// on rate-limit and auth errors, which are fatal for the cycle.
pub struct AggregatorScanner {
    config: AggregatorConfig,
    client: Arc<dyn AggregatorApi>,
    limiter: Arc<SourceRateLimiter>,
}

impl AggregatorScanner {
    pub fn new(
        config: AggregatorConfig,
        client: Arc<dyn AggregatorApi>,
        limiter: Arc<SourceRateLimiter>,
    ) -> Self {
        Self {
            config,
            client,
            limiter,
        }
    }

    pub async fn scan(&self) -> Result<ScanOutput<RawPost>> {
        let mut stats = ScanStats::default();
        let mut errors = Vec::new();
        let mut seen: HashSet<String> = HashSet::new();
        let mut records: Vec<RawPost> = Vec::new();

        let total_queries = self.config.subspaces.len() * self.config.keywords.len();
        tracing::info!(
            "scanning aggregator: {} subspaces x {} keywords, window={}",
            self.config.subspaces.len(),
            self.config.keywords.len(),
            self.config.time_window.as_str()
        );

        // The server honors coarse windows; re-apply finer ones locally.
        let recency_floor = Utc::now()
            - chrono::Duration::from_std(self.config.time_window.duration())
                .unwrap_or_else(|_| chrono::Duration::days(1));

        for subspace in &self.config.subspaces {
            for keyword in &self.config.keywords {
                self.limiter.try_acquire()?;
                let found = match self
                    .client
                    .search(
                        subspace,
                        keyword,
                        self.config.time_window,
                        self.config.max_posts_per_query,
                    )
                    .await
                {
                    Ok(posts) => posts,
                    Err(SourceError::RateLimited { retry_after }) => {
                        return Err(SourceError::RateLimited { retry_after }.into());
                    }
                    Err(SourceError::Auth(msg)) => {
                        return Err(HarvestError::SourceAuth(msg));
                    }
                    Err(e) => {
                        stats.queries_executed += 1;
                        stats.queries_failed += 1;
                        tracing::warn!("query '{keyword}' in '{subspace}' failed: {e}");
                        errors.push(format!("query '{keyword}' in '{subspace}' failed"));
                        continue;
                    }
                };
                stats.queries_executed += 1;
                stats.total_found += found.len() as u32;

                // Thresholds apply before dedup.
                for post in found {
                    if post.upvotes < self.config.min_upvotes
                        || (self.needs_local_refilter() && post.created_at < recency_floor)
                    {
                        stats.filtered_out += 1;
                        continue;
                    }
                    if seen.insert(post.id.clone()) {
                        records.push(post);
                    }
                }
            }
        }

        if total_queries > 0 && stats.queries_failed as usize == total_queries {
            return Err(HarvestError::SourceTransient(format!(
                "all {total_queries} aggregator queries failed"
            )));
        }

        stats.unique_after_dedup = records.len() as u32;
        tracing::info!(
            "aggregator scan complete: {} queries, {} found, {} unique, {} filtered",
            stats.queries_executed,
            stats.total_found,
            stats.unique_after_dedup,
            stats.filtered_out
        );

        Ok(ScanOutput {
            records,
            stats,
            errors,
        })
    }

    /// The platform's day filter is its finest server-side granularity;
    /// sub-day windows are re-filtered locally. Coarser windows trust the
    /// server filter.
    fn needs_local_refilter(&self) -> bool {
        matches!(self.config.time_window, TimeWindow::Hour | TimeWindow::Day)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MockAggregatorApi;
    use chrono::Duration;
    use nonzero_ext::nonzero;

    fn limiter() -> Arc<SourceRateLimiter> {
        Arc::new(SourceRateLimiter::per_minute(nonzero!(600u32)))
    }

    fn config() -> AggregatorConfig {
        AggregatorConfig::new(
            vec!["nootropics".into()],
            vec!["chaga".into()],
            "https://agg.example",
        )
    }

    fn post(id: &str, upvotes: i64, age_hours: i64) -> RawPost {
        RawPost {
            id: id.into(),
            subspace: "nootropics".into(),
            title: format!("post {id}"),
            upvotes,
            created_at: Utc::now() - Duration::hours(age_hours),
            permalink: format!("/p/{id}"),
        }
    }

    #[tokio::test]
    async fn thresholds_apply_before_dedup() {
        let client = MockAggregatorApi::new()
            .with_search_results(vec![post("a", 50, 1), post("b", 2, 1), post("a", 50, 1)]);
        let scanner = AggregatorScanner::new(config(), Arc::new(client), limiter());
        let output = scanner.scan().await.unwrap();
        assert_eq!(output.records.len(), 1);
        assert_eq!(output.stats.filtered_out, 1);
        assert_eq!(output.stats.unique_after_dedup, 1);
        assert_eq!(output.stats.total_found, 3);
    }

    #[tokio::test]
    async fn day_window_refilters_stale_posts_locally() {
        let client = MockAggregatorApi::new()
            .with_search_results(vec![post("fresh", 50, 2), post("stale", 50, 40)]);
        let scanner = AggregatorScanner::new(config(), Arc::new(client), limiter());
        let output = scanner.scan().await.unwrap();
        assert_eq!(output.records.len(), 1);
        assert_eq!(output.records[0].id, "fresh");
    }

    #[tokio::test]
    async fn single_query_failure_is_nonfatal() {
        let mut cfg = config();
        cfg.keywords = vec!["chaga".into(), "reishi".into()];
        let client = MockAggregatorApi::new()
            .with_search_results(vec![post("a", 50, 1)])
            .failing_on_query("reishi", SourceError::Transient("timeout".into()));
        let scanner = AggregatorScanner::new(cfg, Arc::new(client), limiter());
        let output = scanner.scan().await.unwrap();
        assert_eq!(output.stats.queries_failed, 1);
        assert_eq!(output.records.len(), 1);
        assert_eq!(output.errors.len(), 1);
    }

    #[tokio::test]
    async fn all_queries_failing_is_fatal() {
        let client = MockAggregatorApi::new()
            .failing_on_query("chaga", SourceError::Transient("timeout".into()));
        let scanner = AggregatorScanner::new(config(), Arc::new(client), limiter());
        let err = scanner.scan().await.expect_err("scan should fail");
        assert!(matches!(err, HarvestError::SourceTransient(_)));
    }

    #[tokio::test]
    async fn upstream_rate_limit_propagates() {
        let client = MockAggregatorApi::new().failing_on_query(
            "chaga",
            SourceError::RateLimited {
                retry_after: Some(std::time::Duration::from_secs(30)),
            },
        );
        let scanner = AggregatorScanner::new(config(), Arc::new(client), limiter());
        let err = scanner.scan().await.expect_err("scan should fail");
        assert!(matches!(err, HarvestError::RateLimited { .. }));
    }

    #[tokio::test]
    async fn auth_failure_is_fatal() {
        let client = MockAggregatorApi::new()
            .failing_on_query("chaga", SourceError::Auth("bad token".into()));
        let scanner = AggregatorScanner::new(config(), Arc::new(client), limiter());
        let err = scanner.scan().await.expect_err("scan should fail");
        assert!(matches!(err, HarvestError::SourceAuth(_)));
    }

    #[tokio::test]
    async fn local_limiter_saturation_surfaces_rate_limit() {
        let client = MockAggregatorApi::new().with_search_results(vec![post("a", 50, 1)]);
        let tight = Arc::new(SourceRateLimiter::per_minute(nonzero!(1u32)));
        let mut cfg = config();
        cfg.keywords = vec!["chaga".into(), "reishi".into()];
        let scanner = AggregatorScanner::new(cfg, Arc::new(client), tight);
        let err = scanner.scan().await.expect_err("second query saturates");
        assert!(matches!(err, HarvestError::RateLimited { .. }));
    }
}
