//! News feed source: industry articles. No engagement metrics and no
//! LLM stages; the leanest pipeline.

use std::collections::HashSet;
use std::num::NonZeroU32;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use research_pool::{Metadata, ResearchItemDraft, ResearchSource, MAX_CONTENT_LEN, MAX_TITLE_LEN};

use crate::error::{HarvestError, Result, SourceError};
use crate::ratelimit::SourceRateLimiter;
use crate::scan::{HarvestOutput, ScanOutput, ScanStats};
use crate::sources::SourceProfile;
use crate::tags::generate_tags;
use crate::text::{truncate_with_ellipsis, Sanitizer};

/// Default lookback window for feed searches.
pub const DEFAULT_LOOKBACK_DAYS: u32 = 7;
/// Default per-query result cap.
pub const DEFAULT_MAX_RESULTS_PER_QUERY: u32 = 25;
/// Default API budget per sliding minute.
pub const DEFAULT_RATE_LIMIT_PER_MINUTE: u32 = 60;

/// Minimal discovery payload from a feed search.
#[derive(Debug, Clone, PartialEq)]
pub struct RawHeadline {
    /// Source-native article id.
    pub id: String,
    pub title: String,
    pub feed: String,
    pub url: String,
    pub published_at: DateTime<Utc>,
}

/// Article after body enrichment.
#[derive(Debug, Clone, PartialEq)]
pub struct HarvestedArticle {
    pub id: String,
    pub title: String,
    pub feed: String,
    pub url: String,
    pub published_at: DateTime<Utc>,
    /// Sanitized article body.
    pub body: String,
}

/// Behavioral contract of the news feed API.
#[async_trait]
pub trait NewsApi: Send + Sync {
    /// Search feeds for headlines matching a query within a lookback
    /// window.
    async fn search(
        &self,
        query: &str,
        lookback_days: u32,
        limit: u32,
    ) -> std::result::Result<Vec<RawHeadline>, SourceError>;

    /// Fetch the article body. `None` means the article is gone or
    /// paywalled away.
    async fn fetch_article(&self, id: &str) -> std::result::Result<Option<String>, SourceError>;
}

/// Scanner behavior for the news feeds.
#[derive(Debug, Clone)]
pub struct NewsConfig {
    pub search_queries: Vec<String>,
    pub lookback_days: u32,
    pub max_results_per_query: u32,
    pub rate_limit_per_minute: u32,
}

impl NewsConfig {
    pub fn new(search_queries: Vec<String>) -> Self {
        Self {
            search_queries,
            lookback_days: DEFAULT_LOOKBACK_DAYS,
            max_results_per_query: DEFAULT_MAX_RESULTS_PER_QUERY,
            rate_limit_per_minute: DEFAULT_RATE_LIMIT_PER_MINUTE,
        }
    }

    pub fn validate(&self) -> Result<()> {
        let mut errors = Vec::new();
        if self.search_queries.is_empty() {
            errors.push("search_queries list cannot be empty".to_string());
        }
        if self.lookback_days == 0 {
            errors.push("lookback_days must be >= 1".to_string());
        }
        if self.max_results_per_query == 0 {
            errors.push("max_results_per_query must be >= 1".to_string());
        }
        if self.rate_limit_per_minute == 0 {
            errors.push("rate_limit_per_minute must be >= 1".to_string());
        }
        if errors.is_empty() {
            Ok(())
        } else {
            Err(HarvestError::Validation(format!(
                "invalid news config: {}",
                errors.join("; ")
            )))
        }
    }
}

/// Behavior record for the news pipeline.
pub struct NewsProfile {
    config: NewsConfig,
    client: Arc<dyn NewsApi>,
    limiter: Arc<SourceRateLimiter>,
    sanitizer: Sanitizer,
}

impl NewsProfile {
    /// Build a profile with its own rate limiter.
    pub fn new(config: NewsConfig, client: Arc<dyn NewsApi>) -> Result<Self> {
        config.validate()?;
        let limiter = Arc::new(SourceRateLimiter::per_minute(
            NonZeroU32::new(config.rate_limit_per_minute).expect("validated rate limit"),
        ));
        Self::with_limiter(config, client, limiter)
    }

    /// Build a profile sharing an existing per-source limiter.
    pub fn with_limiter(
        config: NewsConfig,
        client: Arc<dyn NewsApi>,
        limiter: Arc<SourceRateLimiter>,
    ) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            client,
            limiter,
            sanitizer: Sanitizer::new(),
        })
    }
}

#[async_trait]
impl SourceProfile for NewsProfile {
    type Raw = RawHeadline;
    type Harvested = HarvestedArticle;
    type Analysis = ();

    fn source(&self) -> ResearchSource {
        ResearchSource::News
    }

    async fn scan(&self) -> Result<ScanOutput<RawHeadline>> {
        let mut stats = ScanStats::default();
        let mut errors = Vec::new();
        let mut seen: HashSet<String> = HashSet::new();
        let mut records: Vec<RawHeadline> = Vec::new();

        for query in &self.config.search_queries {
            self.limiter.try_acquire()?;
            let found = match self
                .client
                .search(
                    query,
                    self.config.lookback_days,
                    self.config.max_results_per_query,
                )
                .await
            {
                Ok(headlines) => headlines,
                Err(SourceError::RateLimited { retry_after }) => {
                    return Err(SourceError::RateLimited { retry_after }.into());
                }
                Err(SourceError::Auth(msg)) => return Err(HarvestError::SourceAuth(msg)),
                Err(e) => {
                    stats.queries_executed += 1;
                    stats.queries_failed += 1;
                    tracing::warn!("news query '{query}' failed: {e}");
                    errors.push(format!("news query '{query}' failed"));
                    continue;
                }
            };
            stats.queries_executed += 1;
            stats.total_found += found.len() as u32;
            for headline in found {
                if seen.insert(headline.id.clone()) {
                    records.push(headline);
                }
            }
        }

        let total_queries = self.config.search_queries.len();
        if total_queries > 0 && stats.queries_failed as usize == total_queries {
            return Err(HarvestError::SourceTransient(format!(
                "all {total_queries} news queries failed"
            )));
        }

        stats.unique_after_dedup = records.len() as u32;
        Ok(ScanOutput {
            records,
            stats,
            errors,
        })
    }

    async fn harvest(&self, records: Vec<RawHeadline>) -> Result<HarvestOutput<HarvestedArticle>> {
        let mut output = HarvestOutput::empty();

        for raw in records {
            self.limiter.acquire().await;
            let body = match self.client.fetch_article(&raw.id).await {
                Ok(Some(body)) => self.sanitizer.sanitize(&body),
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
                    tracing::warn!("failed to fetch article {}: {e}", raw.id);
                    continue;
                }
            };
            if body.is_empty() {
                output.dropped += 1;
                continue;
            }
            output.records.push(HarvestedArticle {
                id: raw.id,
                title: raw.title,
                feed: raw.feed,
                url: raw.url,
                published_at: raw.published_at,
                body,
            });
        }

        Ok(output)
    }

    fn normalize(
        &self,
        record: &HarvestedArticle,
        _analysis: Option<&()>,
    ) -> Result<ResearchItemDraft> {
        let title = truncate_with_ellipsis(&record.title, MAX_TITLE_LEN);
        let content = truncate_with_ellipsis(&record.body, MAX_CONTENT_LEN);
        let tags = generate_tags(&record.title, &record.body, ["news"]);

        let mut metadata = Metadata::new();
        metadata.insert("feed".into(), record.feed.clone().into());
        metadata.insert("article_id".into(), record.id.clone().into());

        let mut draft =
            ResearchItemDraft::new(ResearchSource::News, title, content, record.url.clone())
                .with_tags(tags)
                .with_metadata(metadata)
                .with_created_at(record.published_at);
        draft.validate()?;
        Ok(draft)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MockNewsApi;
    use nonzero_ext::nonzero;

    fn profile(client: MockNewsApi) -> NewsProfile {
        NewsProfile::with_limiter(
            NewsConfig::new(vec!["functional mushrooms".into()]),
            Arc::new(client),
            Arc::new(SourceRateLimiter::per_minute(nonzero!(600u32))),
        )
        .unwrap()
    }

    fn headline(id: &str) -> RawHeadline {
        RawHeadline {
            id: id.into(),
            title: "Mushroom market grows".into(),
            feed: "industry-daily".into(),
            url: format!("https://news.example/{id}"),
            published_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn scan_dedupes_headlines() {
        let client =
            MockNewsApi::new().with_search_results(vec![headline("n1"), headline("n1")]);
        let output = profile(client).scan().await.unwrap();
        assert_eq!(output.records.len(), 1);
        assert_eq!(output.stats.total_found, 2);
    }

    #[tokio::test]
    async fn harvest_drops_gone_articles() {
        let client = MockNewsApi::new().with_article("n1", "Full article body about chaga");
        let p = profile(client);
        let output = p
            .harvest(vec![headline("n1"), headline("gone")])
            .await
            .unwrap();
        assert_eq!(output.records.len(), 1);
        assert_eq!(output.dropped, 1);
    }

    #[tokio::test]
    async fn normalize_builds_news_draft() {
        let client = MockNewsApi::new();
        let p = profile(client);
        let article = HarvestedArticle {
            id: "n1".into(),
            title: "Chaga demand rises".into(),
            feed: "industry-daily".into(),
            url: "https://news.example/n1".into(),
            published_at: Utc::now(),
            body: "Retail demand for chaga extract grew again".into(),
        };
        let draft = p.normalize(&article, None).unwrap();
        assert_eq!(draft.source, ResearchSource::News);
        assert!(draft.tags.contains(&"news".to_string()));
        assert!(draft.tags.contains(&"chaga".to_string()));
    }

    #[test]
    fn empty_queries_refused() {
        assert!(NewsConfig::new(Vec::new()).validate().is_err());
    }
}
