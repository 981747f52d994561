//! Compliance validation with citation-aware status adjustment.

use futures::stream::{self, StreamExt};
use serde::{Deserialize, Serialize};

use research_pool::{ComplianceStatus, ResearchItemDraft, ResearchSource};

use crate::compliance::citations::{CitationDetector, CitationInfo};
use crate::compliance::phrases::{FlaggedPhrase, PhraseClassifier};
use crate::error::Result;

/// Default bound on concurrent validations in a batch.
const DEFAULT_FAN_OUT: usize = 8;

/// Outcome of validating one item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationResult {
    /// Final status after citation adjustment.
    pub status: ComplianceStatus,
    pub flagged: Vec<FlaggedPhrase>,
    pub citation: CitationInfo,
    /// Human-readable explanation of the status.
    pub notes: String,
    /// Convenience flag for pool queries.
    pub has_scientific_citation: bool,
}

/// Statistics from a batch validation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ValidationStats {
    pub total: u32,
    pub validated: u32,
    pub compliant: u32,
    pub warned: u32,
    pub rejected: u32,
    pub failed: u32,
}

/// Validates normalized items before pool entry.
///
/// Shared by every source pipeline. The phrase classifier is injected;
/// citation detection is local regex work.
pub struct ComplianceValidator<C: PhraseClassifier> {
    classifier: C,
    detector: CitationDetector,
    fan_out: usize,
}

impl<C: PhraseClassifier> ComplianceValidator<C> {
    pub fn new(classifier: C) -> Self {
        Self {
            classifier,
            detector: CitationDetector::new(),
            fan_out: DEFAULT_FAN_OUT,
        }
    }

    /// Override the batch fan-out bound.
    pub fn with_fan_out(mut self, fan_out: usize) -> Self {
        self.fan_out = fan_out.max(1);
        self
    }

    /// Validate a single item.
    pub async fn validate(&self, draft: &ResearchItemDraft) -> Result<ValidationResult> {
        tracing::debug!(
            "validating item: source={}, title={:.50}",
            draft.source,
            draft.title
        );

        let citation = self
            .detector
            .detect(&draft.content, &draft.source_metadata);

        let text = self.compose_text(draft);
        let check = self.classifier.classify(&text).await?;

        let status = final_status(check.overall, &citation, draft.source);
        let notes = build_notes(status, &citation, check.flagged.len(), draft.source);

        Ok(ValidationResult {
            status,
            flagged: check.flagged,
            has_scientific_citation: citation.has_citation(),
            citation,
            notes,
        })
    }

    /// Validate a batch with bounded fan-out.
    ///
    /// Individual failures are logged and dropped; the surviving items are
    /// returned with their results, in input order, alongside statistics.
    pub async fn validate_batch(
        &self,
        drafts: Vec<ResearchItemDraft>,
    ) -> (Vec<(ResearchItemDraft, ValidationResult)>, ValidationStats) {
        let total = drafts.len() as u32;
        tracing::info!("validating batch of {total} items");

        let results: Vec<Option<(ResearchItemDraft, ValidationResult)>> = stream::iter(drafts)
            .map(|draft| async {
                match self.validate(&draft).await {
                    Ok(result) => Some((draft, result)),
                    Err(e) => {
                        tracing::error!(
                            "batch validation failed for '{:.50}': {e}",
                            draft.title
                        );
                        None
                    }
                }
            })
            .buffered(self.fan_out)
            .collect()
            .await;

        let validated: Vec<(ResearchItemDraft, ValidationResult)> =
            results.into_iter().flatten().collect();

        let mut stats = ValidationStats {
            total,
            validated: validated.len() as u32,
            failed: total - validated.len() as u32,
            ..Default::default()
        };
        for (_, result) in &validated {
            match result.status {
                ComplianceStatus::Compliant => stats.compliant += 1,
                ComplianceStatus::Warning => stats.warned += 1,
                ComplianceStatus::Rejected => stats.rejected += 1,
            }
        }

        tracing::info!(
            "batch validation complete: total={}, validated={}, compliant={}, warned={}, rejected={}, failed={}",
            stats.total,
            stats.validated,
            stats.compliant,
            stats.warned,
            stats.rejected,
            stats.failed
        );

        (validated, stats)
    }

    /// Text to check: title + content + any key findings in metadata.
    fn compose_text(&self, draft: &ResearchItemDraft) -> String {
        let mut parts = vec![draft.title.as_str(), draft.content.as_str()];
        if let Some(findings) = draft
            .source_metadata
            .get("key_findings")
            .and_then(|v| v.as_str())
        {
            parts.push(findings);
        }
        parts.join("\n\n")
    }
}

/// The citation-aware status machine.
///
/// Biomedical sources are intrinsically citable: a rejection becomes a
/// warning and anything else is compliant. For other sources, a detected
/// citation downgrades a rejection to a warning; warnings stay warnings.
fn final_status(
    base: ComplianceStatus,
    citation: &CitationInfo,
    source: ResearchSource,
) -> ComplianceStatus {
    if source == ResearchSource::Biomed {
        return match base {
            ComplianceStatus::Rejected => ComplianceStatus::Warning,
            _ => ComplianceStatus::Compliant,
        };
    }
    if base == ComplianceStatus::Rejected && citation.has_citation() {
        return ComplianceStatus::Warning;
    }
    base
}

fn build_notes(
    status: ComplianceStatus,
    citation: &CitationInfo,
    flagged_count: usize,
    source: ResearchSource,
) -> String {
    let mut notes = Vec::new();
    match status {
        ComplianceStatus::Compliant => {
            notes.push("Content passed the claims compliance check.".to_string());
        }
        ComplianceStatus::Warning => {
            notes.push(format!("Content has {flagged_count} flagged phrase(s)."));
            if citation.has_citation() {
                notes.push(
                    "Scientific citation present - can cite the study but cannot make health claims."
                        .to_string(),
                );
            }
        }
        ComplianceStatus::Rejected => {
            notes.push(format!(
                "Content contains {flagged_count} prohibited phrase(s)."
            ));
            notes.push("Cannot be used for marketing claims.".to_string());
        }
    }
    if source == ResearchSource::Biomed {
        notes.push("Source: peer-reviewed scientific publication.".to_string());
    }
    notes.join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compliance::phrases::LexiconClassifier;
    use crate::error::HarvestError;
    use async_trait::async_trait;
    use research_pool::Metadata;

    fn validator() -> ComplianceValidator<LexiconClassifier> {
        ComplianceValidator::new(LexiconClassifier::new())
    }

    fn draft(source: ResearchSource, content: &str) -> ResearchItemDraft {
        ResearchItemDraft::new(source, "Post title", content, "https://src.example/1")
    }

    #[tokio::test]
    async fn clean_item_is_compliant() {
        let result = validator()
            .validate(&draft(
                ResearchSource::Aggregator,
                "I tried chaga tea and liked the taste",
            ))
            .await
            .unwrap();
        assert_eq!(result.status, ComplianceStatus::Compliant);
        assert!(!result.has_scientific_citation);
    }

    #[tokio::test]
    async fn citation_downgrades_rejection_to_warning() {
        let result = validator()
            .validate(&draft(
                ResearchSource::Video,
                "This mushroom cures anxiety. DOI: 10.1016/j.x.2024",
            ))
            .await
            .unwrap();
        assert_eq!(result.status, ComplianceStatus::Warning);
        assert!(result.has_scientific_citation);
        assert!(result.notes.contains("cannot make health claims"));
    }

    #[tokio::test]
    async fn rejection_without_citation_stands() {
        let result = validator()
            .validate(&draft(
                ResearchSource::Aggregator,
                "Lion's mane cures depression, trust me",
            ))
            .await
            .unwrap();
        assert_eq!(result.status, ComplianceStatus::Rejected);
    }

    #[tokio::test]
    async fn warning_with_citation_stays_warning() {
        let result = validator()
            .validate(&draft(
                ResearchSource::Aggregator,
                "It boosts immunity, see 10.1000/abc",
            ))
            .await
            .unwrap();
        assert_eq!(result.status, ComplianceStatus::Warning);
    }

    #[tokio::test]
    async fn biomed_rejection_becomes_warning() {
        let result = validator()
            .validate(&draft(
                ResearchSource::Biomed,
                "The extract cures cognitive decline in mice",
            ))
            .await
            .unwrap();
        assert_eq!(result.status, ComplianceStatus::Warning);
        assert!(result.notes.contains("peer-reviewed"));
    }

    #[tokio::test]
    async fn biomed_warning_becomes_compliant() {
        let result = validator()
            .validate(&draft(
                ResearchSource::Biomed,
                "Results suggest the extract improves memory scores",
            ))
            .await
            .unwrap();
        assert_eq!(result.status, ComplianceStatus::Compliant);
    }

    #[tokio::test]
    async fn metadata_key_findings_are_checked() {
        let mut item = draft(ResearchSource::Aggregator, "Neutral body text");
        let mut metadata = Metadata::new();
        metadata.insert("key_findings".into(), "this cures insomnia".into());
        item.source_metadata = metadata;
        let result = validator().validate(&item).await.unwrap();
        assert_eq!(result.status, ComplianceStatus::Rejected);
    }

    struct FailingClassifier;

    #[async_trait]
    impl PhraseClassifier for FailingClassifier {
        async fn classify(&self, _text: &str) -> Result<PhraseCheck> {
            Err(HarvestError::SourceTransient("classifier down".into()))
        }
    }

    use crate::compliance::phrases::PhraseCheck;

    #[tokio::test]
    async fn batch_drops_failures_and_counts_them() {
        let validator = ComplianceValidator::new(FailingClassifier);
        let (validated, stats) = validator
            .validate_batch(vec![
                draft(ResearchSource::Aggregator, "one"),
                draft(ResearchSource::Aggregator, "two"),
            ])
            .await;
        assert!(validated.is_empty());
        assert_eq!(stats.total, 2);
        assert_eq!(stats.failed, 2);
        assert_eq!(stats.validated, 0);
    }

    #[tokio::test]
    async fn batch_preserves_input_order_and_tallies() {
        let (validated, stats) = validator()
            .validate_batch(vec![
                draft(ResearchSource::Aggregator, "plain tea notes"),
                draft(ResearchSource::Aggregator, "it boosts immunity"),
                draft(ResearchSource::Aggregator, "this cures cancer"),
            ])
            .await;
        assert_eq!(validated.len(), 3);
        assert_eq!(validated[0].1.status, ComplianceStatus::Compliant);
        assert_eq!(validated[1].1.status, ComplianceStatus::Warning);
        assert_eq!(validated[2].1.status, ComplianceStatus::Rejected);
        assert_eq!(stats.compliant, 1);
        assert_eq!(stats.warned, 1);
        assert_eq!(stats.rejected, 1);
        assert_eq!(stats.failed, 0);
    }
}
