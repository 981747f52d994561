//! Records and client contract for the social link aggregator.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::error::SourceError;
use crate::scan::TimeWindow;

/// Minimal discovery payload from a community search.
#[derive(Debug, Clone, PartialEq)]
pub struct RawPost {
    /// Source-native post id.
    pub id: String,
    pub subspace: String,
    pub title: String,
    /// Net upvotes at discovery time.
    pub upvotes: i64,
    pub created_at: DateTime<Utc>,
    /// Canonical link, possibly relative to the platform base.
    pub permalink: String,
}

/// Full post payload from the detail fetch.
#[derive(Debug, Clone, PartialEq)]
pub struct PostDetail {
    pub id: String,
    pub subspace: String,
    pub title: String,
    /// Self-text body; empty for pure link posts.
    pub body: String,
    pub author: String,
    pub upvotes: i64,
    pub upvote_ratio: f64,
    pub comment_count: i64,
    pub created_at: DateTime<Utc>,
    pub permalink: String,
    /// Upstream moderation marker.
    pub removed: bool,
}

/// Post after enrichment and sanitization.
#[derive(Debug, Clone, PartialEq)]
pub struct HarvestedPost {
    pub id: String,
    pub subspace: String,
    pub title: String,
    /// Sanitized body text (markup stripped, whitespace collapsed).
    pub body: String,
    pub author: String,
    pub upvotes: i64,
    pub upvote_ratio: f64,
    pub comment_count: i64,
    pub created_at: DateTime<Utc>,
    pub permalink: String,
}

/// Behavioral contract of the aggregator API.
///
/// Searches are paginated server-side up to the per-call limit and honor
/// the platform's coarse time filters; rate limits surface as
/// [`SourceError::RateLimited`].
#[async_trait]
pub trait AggregatorApi: Send + Sync {
    /// Search one community for posts matching a keyword query.
    async fn search(
        &self,
        subspace: &str,
        query: &str,
        window: TimeWindow,
        limit: u32,
    ) -> Result<Vec<RawPost>, SourceError>;

    /// Fetch the full post. `None` means deleted or otherwise absent.
    async fn fetch_post(&self, id: &str) -> Result<Option<PostDetail>, SourceError>;
}
