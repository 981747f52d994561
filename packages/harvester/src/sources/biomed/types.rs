//! Records and client contract for the biomedical literature database.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::SourceError;

/// Study design classified from publication types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StudyType {
    Rct,
    MetaAnalysis,
    SystematicReview,
    Review,
    Other,
}

impl StudyType {
    /// Stable identifier stored in `source_metadata.study_type` and read
    /// by the source-quality scorer.
    pub fn as_str(&self) -> &'static str {
        match self {
            StudyType::Rct => "rct",
            StudyType::MetaAnalysis => "meta_analysis",
            StudyType::SystematicReview => "systematic_review",
            StudyType::Review => "review",
            StudyType::Other => "other",
        }
    }
}

/// How a research finding may be used in downstream content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentPotential {
    /// Cite the study with its identifier; make no claims.
    CitationOnly,
    /// Discuss the science generally.
    Educational,
    /// Signals a research direction in the field.
    TrendAwareness,
    /// Unusable for content.
    NoClaim,
}

impl ContentPotential {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContentPotential::CitationOnly => "citation_only",
            ContentPotential::Educational => "educational",
            ContentPotential::TrendAwareness => "trend_awareness",
            ContentPotential::NoClaim => "no_claim",
        }
    }

    pub fn parse(value: &str) -> Option<ContentPotential> {
        match value {
            "citation_only" => Some(ContentPotential::CitationOnly),
            "educational" => Some(ContentPotential::Educational),
            "trend_awareness" => Some(ContentPotential::TrendAwareness),
            "no_claim" => Some(ContentPotential::NoClaim),
            _ => None,
        }
    }
}

/// Raw article from the literature database's detail fetch.
#[derive(Debug, Clone, PartialEq)]
pub struct RawArticle {
    /// Database-native article id.
    pub article_id: String,
    pub title: String,
    /// May be empty; such articles are dropped at harvest.
    pub abstract_text: String,
    pub authors: Vec<String>,
    pub journal: String,
    pub pub_date: Option<DateTime<Utc>>,
    pub doi: Option<String>,
    /// Publication type labels as the database reports them.
    pub publication_types: Vec<String>,
    pub citation_count: Option<i64>,
}

/// Article after harvest: study design classified, sample size extracted,
/// canonical URL built.
#[derive(Debug, Clone, PartialEq)]
pub struct HarvestedArticle {
    pub article_id: String,
    pub title: String,
    pub abstract_text: String,
    /// Capped at the first ten authors.
    pub authors: Vec<String>,
    pub journal: String,
    pub pub_date: DateTime<Utc>,
    pub doi: Option<String>,
    pub study_type: StudyType,
    pub sample_size: Option<u32>,
    pub citation_count: Option<i64>,
    pub url: String,
}

/// Behavioral contract of the literature database API.
#[async_trait]
pub trait BiomedApi: Send + Sync {
    /// Search for article ids matching a query within a lookback window,
    /// optionally restricted to publication types.
    async fn search(
        &self,
        query: &str,
        lookback_days: u32,
        publication_types: &[String],
        max_results: u32,
    ) -> Result<Vec<String>, SourceError>;

    /// Fetch full article records. Unknown ids are silently absent from
    /// the result.
    async fn fetch_details(&self, ids: &[String]) -> Result<Vec<RawArticle>, SourceError>;
}
