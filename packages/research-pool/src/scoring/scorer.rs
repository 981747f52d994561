//! Composite scorer combining all components.

use chrono::Utc;

use crate::error::Result;
use crate::scoring::components::{
    ComplianceAdjuster, EngagementScorer, RecencyScorer, RelevanceScorer, SourceQualityScorer,
};
use crate::scoring::config::{ScoringConfig, ScoringWeights};
use crate::scoring::round2;
use crate::scoring::schemas::{ComponentScore, ScoringInput, ScoringResult};

/// Composite scorer for research items.
///
/// Pure computation: the same input always produces the same score, so
/// batch callers can fan out freely.
pub struct ItemScorer {
    weights: ScoringWeights,
    source_overrides: std::collections::HashMap<crate::models::ResearchSource, ScoringWeights>,
    relevance: RelevanceScorer,
    recency: RecencyScorer,
    source_quality: SourceQualityScorer,
    engagement: EngagementScorer,
    adjuster: ComplianceAdjuster,
}

impl Default for ItemScorer {
    fn default() -> Self {
        // The default configuration is statically valid.
        let config = ScoringConfig::default();
        Self::build(config)
    }
}

impl ItemScorer {
    /// Build a scorer from a validated configuration.
    pub fn new(config: ScoringConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::build(config))
    }

    fn build(config: ScoringConfig) -> Self {
        Self {
            weights: config.weights,
            source_overrides: config.source_overrides,
            relevance: RelevanceScorer::new(config.relevance),
            recency: RecencyScorer::new(config.recency),
            source_quality: SourceQualityScorer::new(config.source_quality),
            engagement: EngagementScorer::new(config.engagement),
            adjuster: ComplianceAdjuster::new(),
        }
    }

    /// Calculate the composite score for one item.
    pub fn calculate(&self, input: &ScoringInput<'_>) -> ScoringResult {
        let weights = self
            .source_overrides
            .get(&input.source)
            .copied()
            .unwrap_or(self.weights);

        let mut relevance = self.relevance.score(input);
        let mut recency = self.recency.score(input);
        let mut source_quality = self.source_quality.score(input);
        let mut engagement = self.engagement.score(input);

        relevance.weighted = relevance.raw * weights.relevance;
        recency.weighted = recency.raw * weights.recency;
        source_quality.weighted = source_quality.raw * weights.source_quality;
        engagement.weighted = engagement.raw * weights.engagement;

        // Neutral compliance contribution inside the average; the status
        // itself acts afterwards as the non-linear adjustment.
        let compliance_base = 5.0 * weights.compliance;

        let weighted_sum = relevance.weighted
            + recency.weighted
            + source_quality.weighted
            + engagement.weighted
            + compliance_base;

        let adjustment = self.adjuster.adjust(input.compliance_status);
        let final_score = round2(self.adjuster.apply(weighted_sum, &adjustment)).clamp(0.0, 10.0);

        let components = vec![relevance, recency, source_quality, engagement];
        let reasoning = build_reasoning(final_score, &components, adjustment.notes);

        tracing::debug!(
            "scored {} item: {final_score} (rel={}, rec={}, sq={}, eng={})",
            input.source,
            components[0].raw,
            components[1].raw,
            components[2].raw,
            components[3].raw,
        );

        ScoringResult {
            final_score,
            components,
            reasoning,
            scored_at: Utc::now(),
        }
    }
}

fn build_reasoning(
    final_score: f64,
    components: &[ComponentScore],
    compliance_notes: &str,
) -> String {
    let mut parts = vec![format!("Final score: {final_score}/10"), "Components:".to_string()];
    for component in components {
        parts.push(format!(
            "  - {}: {} ({})",
            component.component, component.raw, component.notes
        ));
    }
    parts.push(format!("Compliance: {compliance_notes}"));
    parts.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ComplianceStatus, Metadata, ResearchSource};
    use chrono::{Duration, Utc};

    fn scorer() -> ItemScorer {
        ItemScorer::default()
    }

    #[test]
    fn invalid_config_is_refused() {
        let config = ScoringConfig {
            weights: ScoringWeights {
                relevance: 1.0,
                recency: 1.0,
                source_quality: 0.0,
                engagement: 0.0,
                compliance: 0.0,
            },
            ..Default::default()
        };
        assert!(ItemScorer::new(config).is_err());
    }

    #[test]
    fn biomed_rct_with_strong_signals_scores_at_least_eight() {
        let mut metadata = Metadata::new();
        metadata.insert("study_type".into(), "rct".into());
        metadata.insert("citation_count".into(), 30.into());
        let input = ScoringInput {
            source: ResearchSource::Biomed,
            title: "Lion's mane improves memory in adults",
            content: "Randomized trial of lion's mane, chaga and reishi on memory and focus",
            source_metadata: &metadata,
            created_at: Some(Utc::now() - Duration::days(2)),
            compliance_status: ComplianceStatus::Compliant,
        };
        let result = scorer().calculate(&input);
        assert!(
            result.final_score >= 8.0,
            "expected >= 8, got {}",
            result.final_score
        );
    }

    #[test]
    fn high_engagement_aggregator_warning_lands_mid_band() {
        let mut metadata = Metadata::new();
        metadata.insert("upvotes".into(), 150.into());
        let input = ScoringInput {
            source: ResearchSource::Aggregator,
            title: "Chaga megadose results",
            content: "It cured everything, trust me",
            source_metadata: &metadata,
            created_at: Some(Utc::now()),
            compliance_status: ComplianceStatus::Warning,
        };
        let result = scorer().calculate(&input);
        assert!(
            (4.0..=6.5).contains(&result.final_score),
            "expected [4, 6.5], got {}",
            result.final_score
        );
    }

    #[test]
    fn rejection_dominates_maxed_components() {
        let mut metadata = Metadata::new();
        metadata.insert("study_type".into(), "rct".into());
        metadata.insert("citation_count".into(), 500.into());
        let input = ScoringInput {
            source: ResearchSource::Biomed,
            title: "Lion's mane, chaga and reishi for memory and focus",
            content: "Energy, stamina, stress and sleep all improved",
            source_metadata: &metadata,
            created_at: Some(Utc::now()),
            compliance_status: ComplianceStatus::Rejected,
        };
        let result = scorer().calculate(&input);
        assert_eq!(result.final_score, 0.0);
    }

    #[test]
    fn compliant_bonus_clamps_at_ten() {
        // All weight on source quality so the weighted sum can reach 10.
        let config = ScoringConfig {
            weights: ScoringWeights {
                relevance: 0.0,
                recency: 0.0,
                source_quality: 1.0,
                engagement: 0.0,
                compliance: 0.0,
            },
            ..Default::default()
        };
        let scorer = ItemScorer::new(config).unwrap();
        let mut metadata = Metadata::new();
        metadata.insert("study_type".into(), "rct".into());
        let input = ScoringInput {
            source: ResearchSource::Biomed,
            title: "t",
            content: "c",
            source_metadata: &metadata,
            created_at: Some(Utc::now()),
            compliance_status: ComplianceStatus::Compliant,
        };
        let result = scorer.calculate(&input);
        assert_eq!(result.final_score, 10.0);
    }

    #[test]
    fn reasoning_lists_every_component() {
        let metadata = Metadata::new();
        let input = ScoringInput {
            source: ResearchSource::News,
            title: "t",
            content: "c",
            source_metadata: &metadata,
            created_at: Some(Utc::now()),
            compliance_status: ComplianceStatus::Warning,
        };
        let result = scorer().calculate(&input);
        for name in ["relevance", "recency", "source_quality", "engagement"] {
            assert!(result.reasoning.contains(name), "missing {name}");
        }
        assert!(result.reasoning.contains("WARNING"));
    }

    #[test]
    fn score_is_rounded_to_two_decimals() {
        let metadata = Metadata::new();
        let input = ScoringInput {
            source: ResearchSource::News,
            title: "t",
            content: "c",
            source_metadata: &metadata,
            created_at: Some(Utc::now() - Duration::days(7)),
            compliance_status: ComplianceStatus::Warning,
        };
        let result = scorer().calculate(&input);
        let scaled = result.final_score * 100.0;
        assert!((scaled - scaled.round()).abs() < 1e-9);
    }
}
