//! Source quality scoring: tiered base score plus study-type bonus.
//!
//! Tiers reflect editorial rigor: peer-reviewed literature at the top,
//! user-generated social content at the bottom. Biomedical items earn a
//! bonus for high-evidence study designs recorded in their metadata.

use std::collections::HashMap;

use crate::models::ResearchSource;
use crate::scoring::schemas::{ComponentScore, ScoringInput};

const MAX_SCORE: f64 = 10.0;

/// Configuration for source quality scoring.
#[derive(Debug, Clone)]
pub struct SourceQualityConfig {
    /// Base score per source.
    pub source_tiers: HashMap<ResearchSource, f64>,
    /// Bonus per `study_type` metadata value (biomed only).
    pub study_bonuses: HashMap<String, f64>,
}

impl Default for SourceQualityConfig {
    fn default() -> Self {
        Self {
            source_tiers: HashMap::from([
                (ResearchSource::Biomed, 8.0),
                (ResearchSource::News, 6.0),
                (ResearchSource::Video, 4.0),
                (ResearchSource::Aggregator, 3.0),
                (ResearchSource::Image, 3.0),
            ]),
            study_bonuses: HashMap::from([
                ("rct".to_string(), 2.0),
                ("meta_analysis".to_string(), 2.0),
                ("systematic_review".to_string(), 1.0),
            ]),
        }
    }
}

/// Scores items by source tier and study design.
pub struct SourceQualityScorer {
    config: SourceQualityConfig,
}

impl SourceQualityScorer {
    pub fn new(config: SourceQualityConfig) -> Self {
        Self { config }
    }

    pub fn score(&self, input: &ScoringInput<'_>) -> ComponentScore {
        let base = self
            .config
            .source_tiers
            .get(&input.source)
            .copied()
            .unwrap_or(5.0);

        let mut bonus = 0.0;
        let mut study_type = None;
        if input.source == ResearchSource::Biomed {
            study_type = input
                .source_metadata
                .get("study_type")
                .and_then(|v| v.as_str());
            if let Some(study) = study_type {
                bonus = self.config.study_bonuses.get(study).copied().unwrap_or(0.0);
            }
        }

        let raw = (base + bonus).min(MAX_SCORE);
        let notes = match study_type.filter(|_| bonus > 0.0) {
            Some(study) => format!(
                "Source: {} (tier score {base}) + {study} bonus (+{bonus})",
                input.source
            ),
            None => format!("Source: {} (tier score {base})", input.source),
        };

        ComponentScore::new("source_quality", raw, notes)
    }
}
