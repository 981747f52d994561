//! Core data model for the Research Pool.
//!
//! Defines the canonical [`ResearchItem`] record together with the closed
//! source and compliance enums and the field limits the repository enforces.
//! The full-text search vector is a storage-layer derivation over
//! `title + content` and is never part of the in-memory record.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Free-form source-specific metadata document.
///
/// Only the citation keys `doi` and `pmid` are ever inspected outside of
/// source-specific code paths.
pub type Metadata = serde_json::Map<String, serde_json::Value>;

/// Lowest valid item score.
pub const MIN_SCORE: f64 = 0.0;
/// Highest valid item score.
pub const MAX_SCORE: f64 = 10.0;
/// Default page size for queries.
pub const DEFAULT_LIMIT: usize = 50;
/// Maximum title length in bytes.
pub const MAX_TITLE_LEN: usize = 500;
/// Maximum URL length in bytes.
pub const MAX_URL_LEN: usize = 2048;
/// Maximum content length in bytes.
pub const MAX_CONTENT_LEN: usize = 10_000;
/// Maximum number of tags per item.
pub const MAX_TAGS: usize = 10;
/// Minimum tag length in bytes.
pub const MIN_TAG_LEN: usize = 2;
/// Maximum tag length in bytes.
pub const MAX_TAG_LEN: usize = 50;

/// Where a research item was discovered.
///
/// This is a closed set: adding a source is a schema change, not a
/// configuration change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResearchSource {
    /// Social link aggregator (upvote-driven communities).
    Aggregator,
    /// Video platform (transcript-bearing uploads).
    Video,
    /// Image/caption platform (hashtag-driven posts).
    Image,
    /// Industry news feeds.
    News,
    /// Biomedical literature database.
    Biomed,
}

impl ResearchSource {
    /// Every valid source, in declaration order.
    pub const ALL: [ResearchSource; 5] = [
        ResearchSource::Aggregator,
        ResearchSource::Video,
        ResearchSource::Image,
        ResearchSource::News,
        ResearchSource::Biomed,
    ];

    /// Stable lowercase identifier used in storage and metadata.
    pub fn as_str(&self) -> &'static str {
        match self {
            ResearchSource::Aggregator => "aggregator",
            ResearchSource::Video => "video",
            ResearchSource::Image => "image",
            ResearchSource::News => "news",
            ResearchSource::Biomed => "biomed",
        }
    }

    /// Parse a stored identifier back into the enum.
    pub fn parse(value: &str) -> Option<ResearchSource> {
        ResearchSource::ALL
            .into_iter()
            .find(|s| s.as_str() == value)
    }
}

impl fmt::Display for ResearchSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Compliance check result attached to every item.
///
/// The status is advisory for downstream consumers; items stay in the pool
/// regardless of status. A `Rejected` item always carries score 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ComplianceStatus {
    /// Content passed the phrase check (possibly via citation relaxation).
    Compliant,
    /// Borderline content; usable with care.
    Warning,
    /// Content contains prohibited claims and no mitigating citation.
    Rejected,
}

impl ComplianceStatus {
    /// Stable uppercase identifier used in storage.
    pub fn as_str(&self) -> &'static str {
        match self {
            ComplianceStatus::Compliant => "COMPLIANT",
            ComplianceStatus::Warning => "WARNING",
            ComplianceStatus::Rejected => "REJECTED",
        }
    }

    /// Parse a stored identifier back into the enum.
    pub fn parse(value: &str) -> Option<ComplianceStatus> {
        match value {
            "COMPLIANT" => Some(ComplianceStatus::Compliant),
            "WARNING" => Some(ComplianceStatus::Warning),
            "REJECTED" => Some(ComplianceStatus::Rejected),
            _ => None,
        }
    }
}

impl fmt::Display for ComplianceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A research item persisted in the pool.
///
/// Invariants held after every repository operation:
/// - `score` is within `[MIN_SCORE, MAX_SCORE]`, and `Rejected` items score 0
/// - `url` starts with `http://` or `https://`
/// - `tags` are normalized, deduplicated, and at most [`MAX_TAGS`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResearchItem {
    pub id: Uuid,
    pub source: ResearchSource,
    pub title: String,
    pub content: String,
    pub url: String,
    pub tags: Vec<String>,
    pub source_metadata: Metadata,
    pub created_at: DateTime<Utc>,
    pub score: f64,
    pub compliance_status: ComplianceStatus,
}
