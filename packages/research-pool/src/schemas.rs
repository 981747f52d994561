//! Input schemas for creating and updating research items.
//!
//! Every write path goes through [`ResearchItemDraft`] or
//! [`ResearchItemPatch`], both of which validate the pool invariants before
//! anything touches storage.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{PoolError, Result};
use crate::models::{
    ComplianceStatus, Metadata, ResearchItem, ResearchSource, MAX_SCORE, MAX_TAGS, MAX_TAG_LEN,
    MAX_TITLE_LEN, MAX_URL_LEN, MIN_SCORE, MIN_TAG_LEN,
};

/// A research item ready to be inserted into the pool.
///
/// Identity and discovery timestamp are optional; the repository fills them
/// at insert time when absent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResearchItemDraft {
    pub id: Option<Uuid>,
    pub source: ResearchSource,
    pub title: String,
    pub content: String,
    pub url: String,
    pub tags: Vec<String>,
    pub source_metadata: Metadata,
    pub created_at: Option<DateTime<Utc>>,
    pub score: f64,
    pub compliance_status: ComplianceStatus,
}

impl ResearchItemDraft {
    /// Create a draft with the required fields and neutral defaults.
    pub fn new(
        source: ResearchSource,
        title: impl Into<String>,
        content: impl Into<String>,
        url: impl Into<String>,
    ) -> Self {
        Self {
            id: None,
            source,
            title: title.into(),
            content: content.into(),
            url: url.into(),
            tags: Vec::new(),
            source_metadata: Metadata::new(),
            created_at: None,
            score: MIN_SCORE,
            compliance_status: ComplianceStatus::Compliant,
        }
    }

    /// Set tags (normalized on validation).
    pub fn with_tags(mut self, tags: Vec<String>) -> Self {
        self.tags = tags;
        self
    }

    /// Set source metadata.
    pub fn with_metadata(mut self, metadata: Metadata) -> Self {
        self.source_metadata = metadata;
        self
    }

    /// Set the discovery timestamp.
    pub fn with_created_at(mut self, created_at: DateTime<Utc>) -> Self {
        self.created_at = Some(created_at);
        self
    }

    /// Set the score.
    pub fn with_score(mut self, score: f64) -> Self {
        self.score = score;
        self
    }

    /// Set the compliance status.
    pub fn with_compliance(mut self, status: ComplianceStatus) -> Self {
        self.compliance_status = status;
        self
    }

    /// Validate all invariants and normalize tags in place.
    pub fn validate(&mut self) -> Result<()> {
        validate_title(&self.title)?;
        validate_content(&self.content)?;
        validate_url(&self.url)?;
        validate_score(self.score)?;
        if self.compliance_status == ComplianceStatus::Rejected && self.score != MIN_SCORE {
            return Err(PoolError::validation(
                "score",
                "rejected items must carry score 0",
            ));
        }
        self.tags = normalize_tags(std::mem::take(&mut self.tags));
        Ok(())
    }

    /// Consume the draft into a stored item, filling identity and timestamp.
    pub(crate) fn into_item(self, now: DateTime<Utc>) -> ResearchItem {
        ResearchItem {
            id: self.id.unwrap_or_else(Uuid::new_v4),
            source: self.source,
            title: self.title,
            content: self.content,
            url: self.url,
            tags: self.tags,
            source_metadata: self.source_metadata,
            created_at: self.created_at.unwrap_or(now),
            score: self.score,
            compliance_status: self.compliance_status,
        }
    }
}

/// Partial update to an existing research item.
///
/// Only present fields are applied; each is validated individually.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResearchItemPatch {
    pub title: Option<String>,
    pub content: Option<String>,
    pub url: Option<String>,
    pub tags: Option<Vec<String>>,
    pub source_metadata: Option<Metadata>,
    pub score: Option<f64>,
    pub compliance_status: Option<ComplianceStatus>,
}

impl ResearchItemPatch {
    /// True when no field is set.
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.content.is_none()
            && self.url.is_none()
            && self.tags.is_none()
            && self.source_metadata.is_none()
            && self.score.is_none()
            && self.compliance_status.is_none()
    }

    /// Validate all present fields and normalize tags in place.
    pub fn validate(&mut self) -> Result<()> {
        if let Some(title) = &self.title {
            validate_title(title)?;
        }
        if let Some(content) = &self.content {
            validate_content(content)?;
        }
        if let Some(url) = &self.url {
            validate_url(url)?;
        }
        if let Some(score) = self.score {
            validate_score(score)?;
        }
        if let Some(tags) = self.tags.take() {
            self.tags = Some(normalize_tags(tags));
        }
        Ok(())
    }

    /// Apply the patch to an item, enforcing the rejected-score invariant.
    pub(crate) fn apply(self, item: &mut ResearchItem) {
        if let Some(title) = self.title {
            item.title = title;
        }
        if let Some(content) = self.content {
            item.content = content;
        }
        if let Some(url) = self.url {
            item.url = url;
        }
        if let Some(tags) = self.tags {
            item.tags = tags;
        }
        if let Some(metadata) = self.source_metadata {
            item.source_metadata = metadata;
        }
        if let Some(score) = self.score {
            item.score = score;
        }
        if let Some(status) = self.compliance_status {
            item.compliance_status = status;
        }
        if item.compliance_status == ComplianceStatus::Rejected {
            item.score = MIN_SCORE;
        }
    }
}

fn validate_title(title: &str) -> Result<()> {
    if title.trim().is_empty() {
        return Err(PoolError::validation("title", "must not be blank"));
    }
    if title.len() > MAX_TITLE_LEN {
        return Err(PoolError::validation(
            "title",
            format!("exceeds {MAX_TITLE_LEN} bytes"),
        ));
    }
    Ok(())
}

fn validate_content(content: &str) -> Result<()> {
    if content.trim().is_empty() {
        return Err(PoolError::validation("content", "must not be blank"));
    }
    Ok(())
}

/// URLs must use an http(s) scheme and fit the column.
pub fn validate_url(url: &str) -> Result<()> {
    if !(url.starts_with("http://") || url.starts_with("https://")) {
        return Err(PoolError::validation(
            "url",
            "must start with http:// or https://",
        ));
    }
    if url.len() > MAX_URL_LEN {
        return Err(PoolError::validation(
            "url",
            format!("exceeds {MAX_URL_LEN} bytes"),
        ));
    }
    Ok(())
}

fn validate_score(score: f64) -> Result<()> {
    if !(MIN_SCORE..=MAX_SCORE).contains(&score) {
        return Err(PoolError::validation(
            "score",
            format!("must be within [{MIN_SCORE}, {MAX_SCORE}], got {score}"),
        ));
    }
    Ok(())
}

/// Normalize a tag set: lowercase, interior spaces to underscores, ASCII
/// only, length within [2, 50] bytes, deduplicated, sorted, capped at 10.
pub fn normalize_tags(tags: impl IntoIterator<Item = String>) -> Vec<String> {
    let mut normalized: Vec<String> = tags
        .into_iter()
        .filter_map(|tag| {
            let tag: String = tag
                .trim()
                .to_lowercase()
                .chars()
                .map(|c| if c == ' ' { '_' } else { c })
                .filter(|c| c.is_ascii())
                .collect();
            if (MIN_TAG_LEN..=MAX_TAG_LEN).contains(&tag.len()) {
                Some(tag)
            } else {
                None
            }
        })
        .collect();
    normalized.sort();
    normalized.dedup();
    normalized.truncate(MAX_TAGS);
    normalized
}
