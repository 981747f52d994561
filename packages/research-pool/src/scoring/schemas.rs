//! Result and input types for the scoring engine.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::models::{ComplianceStatus, Metadata, ResearchItem, ResearchSource};
use crate::schemas::ResearchItemDraft;

/// Borrowed view of the fields the scorer reads.
///
/// Built from either a stored item or a pipeline draft so the scorer can
/// run both before publication and on re-score passes.
#[derive(Debug, Clone, Copy)]
pub struct ScoringInput<'a> {
    pub source: ResearchSource,
    pub title: &'a str,
    pub content: &'a str,
    pub source_metadata: &'a Metadata,
    pub created_at: Option<DateTime<Utc>>,
    pub compliance_status: ComplianceStatus,
}

impl<'a> ScoringInput<'a> {
    pub fn from_item(item: &'a ResearchItem) -> Self {
        Self {
            source: item.source,
            title: &item.title,
            content: &item.content,
            source_metadata: &item.source_metadata,
            created_at: Some(item.created_at),
            compliance_status: item.compliance_status,
        }
    }

    pub fn from_draft(draft: &'a ResearchItemDraft) -> Self {
        Self {
            source: draft.source,
            title: &draft.title,
            content: &draft.content,
            source_metadata: &draft.source_metadata,
            created_at: draft.created_at,
            compliance_status: draft.compliance_status,
        }
    }
}

/// Result from a single scoring component.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComponentScore {
    /// Component identifier ("relevance", "recency", ...).
    pub component: &'static str,
    /// Raw score on the 0-10 scale.
    pub raw: f64,
    /// Score after the component weight is applied.
    pub weighted: f64,
    /// Explanation of how the score was produced.
    pub notes: String,
}

impl ComponentScore {
    pub fn new(component: &'static str, raw: f64, notes: impl Into<String>) -> Self {
        Self {
            component,
            raw,
            weighted: 0.0,
            notes: notes.into(),
        }
    }
}

/// Combined result from composite scoring.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoringResult {
    /// Final score in [0, 10], rounded to two decimals.
    pub final_score: f64,
    /// Component breakdown in scoring order.
    pub components: Vec<ComponentScore>,
    /// Human-readable explanation of the score.
    pub reasoning: String,
    /// When scoring was performed.
    pub scored_at: DateTime<Utc>,
}
