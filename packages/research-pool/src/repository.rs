//! Repository contract over the Research Pool.
//!
//! [`ResearchPool`] is the storage seam: the pipeline, the publisher, and
//! the scoring service all work against it, so tests run on the in-memory
//! store and production runs on PostgreSQL without code changes.

use std::collections::HashSet;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::error::Result;
use crate::models::{ComplianceStatus, ResearchItem, ResearchSource, DEFAULT_LIMIT};
use crate::schemas::{ResearchItemDraft, ResearchItemPatch};

/// Sort order for query results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortKey {
    /// `score DESC, created_at DESC` (default).
    #[default]
    Score,
    /// `created_at DESC`.
    Date,
    /// Text rank; only meaningful inside `search`, where the primary key is
    /// rank DESC with score DESC as tie-break. Plain queries fall back to
    /// the default sort.
    Relevance,
}

/// Query parameters for pool lookups.
///
/// All filter fields are optional and conjunctive. Score and date bounds
/// are inclusive; the tag filter matches on overlap (any shared tag), not
/// subset.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryFilters {
    pub source: Option<ResearchSource>,
    pub tags: Option<Vec<String>>,
    pub min_score: Option<f64>,
    pub max_score: Option<f64>,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    pub compliance_status: Option<ComplianceStatus>,
    pub limit: usize,
    pub offset: usize,
    pub sort_by: SortKey,
}

impl Default for QueryFilters {
    fn default() -> Self {
        Self {
            source: None,
            tags: None,
            min_score: None,
            max_score: None,
            start_date: None,
            end_date: None,
            compliance_status: None,
            limit: DEFAULT_LIMIT,
            offset: 0,
            sort_by: SortKey::default(),
        }
    }
}

impl QueryFilters {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_source(mut self, source: ResearchSource) -> Self {
        self.source = Some(source);
        self
    }

    pub fn with_tags(mut self, tags: Vec<String>) -> Self {
        self.tags = Some(tags);
        self
    }

    pub fn with_score_range(mut self, min: f64, max: f64) -> Self {
        self.min_score = Some(min);
        self.max_score = Some(max);
        self
    }

    pub fn with_min_score(mut self, min: f64) -> Self {
        self.min_score = Some(min);
        self
    }

    pub fn with_date_range(mut self, start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        self.start_date = Some(start);
        self.end_date = Some(end);
        self
    }

    pub fn with_compliance(mut self, status: ComplianceStatus) -> Self {
        self.compliance_status = Some(status);
        self
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    pub fn with_offset(mut self, offset: usize) -> Self {
        self.offset = offset;
        self
    }

    pub fn with_sort(mut self, sort_by: SortKey) -> Self {
        self.sort_by = sort_by;
        self
    }

    /// True when an item passes every set filter (ignoring pagination).
    pub fn matches(&self, item: &ResearchItem) -> bool {
        if let Some(source) = self.source {
            if item.source != source {
                return false;
            }
        }
        if let Some(tags) = &self.tags {
            if !tags.iter().any(|t| item.tags.iter().any(|it| it == t)) {
                return false;
            }
        }
        if let Some(min) = self.min_score {
            if item.score < min {
                return false;
            }
        }
        if let Some(max) = self.max_score {
            if item.score > max {
                return false;
            }
        }
        if let Some(start) = self.start_date {
            if item.created_at < start {
                return false;
            }
        }
        if let Some(end) = self.end_date {
            if item.created_at > end {
                return false;
            }
        }
        if let Some(status) = self.compliance_status {
            if item.compliance_status != status {
                return false;
            }
        }
        true
    }
}

/// Async repository over the Research Pool.
///
/// Every write is atomic; a failed write rolls back and surfaces a
/// classified [`crate::PoolError`].
#[async_trait]
pub trait ResearchPool: Send + Sync {
    /// Insert a validated draft, returning the stored item with identity
    /// and timestamp filled.
    async fn add(&self, draft: ResearchItemDraft) -> Result<ResearchItem>;

    /// Fetch an item by id.
    async fn get(&self, id: Uuid) -> Result<Option<ResearchItem>>;

    /// Query with optional filters, sorted and paginated.
    async fn query(&self, filters: &QueryFilters) -> Result<Vec<ResearchItem>>;

    /// Full-text search over title and content, ranked by relevance with
    /// score as tie-break. A blank query returns no results.
    async fn search(&self, query: &str, filters: &QueryFilters) -> Result<Vec<ResearchItem>>;

    /// Count items matching the filters (pagination ignored).
    async fn count(&self, filters: &QueryFilters) -> Result<u64>;

    /// Update an item's score. Errors with `NotFound` for absent ids.
    async fn update_score(&self, id: Uuid, score: f64) -> Result<()>;

    /// Update an item's compliance status. Moving an item to `Rejected`
    /// also forces its score to 0. Errors with `NotFound` for absent ids.
    async fn update_compliance(&self, id: Uuid, status: ComplianceStatus) -> Result<()>;

    /// Apply a partial update, returning the patched item or `None` when
    /// the id is absent.
    async fn update(&self, id: Uuid, patch: ResearchItemPatch) -> Result<Option<ResearchItem>>;

    /// Insert many drafts in a single transaction. Any invalid draft rolls
    /// the whole batch back. Returns the number inserted.
    async fn bulk_add(&self, drafts: Vec<ResearchItemDraft>) -> Result<u64>;

    /// Delete an item, returning whether it existed.
    async fn delete(&self, id: Uuid) -> Result<bool>;

    /// Which of the given URLs are already present in the pool. Used by
    /// the publisher to keep pipeline runs idempotent.
    async fn find_urls(&self, urls: &[String]) -> Result<HashSet<String>>;
}
