//! Biomed harvester: pure enrichment of raw articles.
//!
//! Classifies study design from publication types, extracts sample size
//! from the abstract, and builds the canonical article URL. No network
//! calls; articles without an abstract are dropped.

use chrono::Utc;
use regex::Regex;

use crate::error::Result;
use crate::scan::HarvestOutput;

use super::types::{HarvestedArticle, RawArticle, StudyType};

/// Publication-type label fragments mapped to study types, checked in
/// order so the most specific label wins.
const STUDY_TYPE_MAPPINGS: [(&str, StudyType); 6] = [
    ("randomized controlled trial", StudyType::Rct),
    ("controlled clinical trial", StudyType::Rct),
    ("clinical trial", StudyType::Rct),
    ("meta-analysis", StudyType::MetaAnalysis),
    ("systematic review", StudyType::SystematicReview),
    ("review", StudyType::Review),
];

/// Sample-size phrasings, comma-tolerant (`n = 1,847`).
const SAMPLE_SIZE_PATTERNS: [&str; 8] = [
    r"(?i)n\s*=\s*([\d,]+)",
    r"(?i)([\d,]+)\s*participants",
    r"(?i)([\d,]+)\s*subjects",
    r"(?i)([\d,]+)\s*patients",
    r"(?i)([\d,]+)\s*individuals",
    r"(?i)sample\s*(?:size|of)\s*([\d,]+)",
    r"(?i)([\d,]+)\s*healthy\s*(?:adults|volunteers)",
    r"(?i)([\d,]+)\s*(?:men|women|people)",
];

/// Classify study design from the database's publication-type labels.
pub fn classify_study_type(publication_types: &[String]) -> StudyType {
    for (fragment, study_type) in STUDY_TYPE_MAPPINGS {
        if publication_types
            .iter()
            .any(|label| label.to_lowercase().contains(fragment))
        {
            return study_type;
        }
    }
    StudyType::Other
}

/// Extract the reported sample size from an abstract, if stated.
pub fn extract_sample_size(abstract_text: &str, patterns: &[Regex]) -> Option<u32> {
    for pattern in patterns {
        if let Some(captures) = pattern.captures(abstract_text) {
            let digits: String = captures
                .get(1)
                .map(|m| m.as_str().replace(',', ""))
                .unwrap_or_default();
            if let Ok(size) = digits.parse::<u32>() {
                if size > 0 {
                    return Some(size);
                }
            }
        }
    }
    None
}

/// Enriches raw articles. Stateless apart from compiled patterns.
pub struct BiomedHarvester {
    article_url_base: String,
    sample_patterns: Vec<Regex>,
}

impl BiomedHarvester {
    pub fn new(article_url_base: impl Into<String>) -> Self {
        Self {
            article_url_base: article_url_base.into(),
            sample_patterns: SAMPLE_SIZE_PATTERNS
                .iter()
                .map(|p| Regex::new(p).expect("valid sample-size pattern"))
                .collect(),
        }
    }

    pub async fn harvest(
        &self,
        records: Vec<RawArticle>,
    ) -> Result<HarvestOutput<HarvestedArticle>> {
        let mut output = HarvestOutput::empty();
        tracing::info!("harvesting {} articles", records.len());

        for raw in records {
            if raw.abstract_text.trim().is_empty() {
                output.dropped += 1;
                continue;
            }
            let study_type = classify_study_type(&raw.publication_types);
            let sample_size = extract_sample_size(&raw.abstract_text, &self.sample_patterns);
            let url = format!(
                "{}/{}/",
                self.article_url_base.trim_end_matches('/'),
                raw.article_id
            );

            output.records.push(HarvestedArticle {
                article_id: raw.article_id,
                title: raw.title,
                abstract_text: raw.abstract_text,
                authors: raw.authors.into_iter().take(10).collect(),
                journal: raw.journal,
                pub_date: raw.pub_date.unwrap_or_else(Utc::now),
                doi: raw.doi,
                study_type,
                sample_size,
                citation_count: raw.citation_count,
                url,
            });
        }

        tracing::info!(
            "biomed harvest complete: {} enriched, {} dropped",
            output.records.len(),
            output.dropped
        );
        Ok(output)
    }
}
