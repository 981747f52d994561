//! # Research Pool
//!
//! Central store for research items harvested from external sources, plus
//! the composite scoring engine that ranks them.
//!
//! ## Architecture
//!
//! ```text
//! ResearchItemDraft --validate--> ResearchPool (MemoryPool | PostgresPool)
//!                                      |
//!                     query / search / count / update / delete
//!                                      |
//!                               ScoringService
//!                        (ItemScorer: 4 components + compliance)
//! ```
//!
//! The repository is a trait so callers are storage-agnostic: tests and
//! development run on [`MemoryPool`], production runs on `PostgresPool`
//! (cargo feature `postgres`). Both uphold the same invariants:
//!
//! - scores stay within [0, 10]; rejected items always score 0
//! - URLs use an http(s) scheme
//! - tags are normalized, deduplicated, and capped at 10
//! - full-text search stays consistent with `title + content`
//!
//! ## Modules
//!
//! - [`models`] - canonical record, source and compliance enums
//! - [`schemas`] - validated creation and patch inputs
//! - [`repository`] - the `ResearchPool` trait and query filters
//! - [`stores`] - storage implementations
//! - [`scoring`] - weighted composite scoring engine

pub mod error;
pub mod models;
pub mod repository;
pub mod schemas;
pub mod scoring;
pub mod stores;

pub use error::{PoolError, PoolErrorKind, Result};
pub use models::{
    ComplianceStatus, Metadata, ResearchItem, ResearchSource, DEFAULT_LIMIT, MAX_CONTENT_LEN,
    MAX_SCORE, MAX_TAGS, MAX_TAG_LEN, MAX_TITLE_LEN, MAX_URL_LEN, MIN_SCORE, MIN_TAG_LEN,
};
pub use repository::{QueryFilters, ResearchPool, SortKey};
pub use schemas::{normalize_tags, validate_url, ResearchItemDraft, ResearchItemPatch};
pub use scoring::{
    ComponentScore, ItemScorer, ScoringConfig, ScoringInput, ScoringResult, ScoringService,
    ScoringWeights,
};
pub use stores::MemoryPool;

#[cfg(feature = "postgres")]
pub use stores::PostgresPool;
