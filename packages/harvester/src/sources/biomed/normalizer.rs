//! Biomed normalizer: articles plus analyses into pool drafts.

use research_pool::{Metadata, ResearchItemDraft, ResearchSource, MAX_CONTENT_LEN, MAX_TITLE_LEN};

use crate::error::Result;
use crate::tags::generate_tags;
use crate::text::{truncate_with_ellipsis, Sanitizer};

use super::analyzers::BiomedAnalysis;
use super::types::HarvestedArticle;

/// Maps enriched articles into pool drafts. The analysis sections are
/// appended under stable headings so downstream consumers can split them
/// back out.
pub struct BiomedNormalizer {
    sanitizer: Sanitizer,
}

impl Default for BiomedNormalizer {
    fn default() -> Self {
        Self::new()
    }
}

impl BiomedNormalizer {
    pub fn new() -> Self {
        Self {
            sanitizer: Sanitizer::new(),
        }
    }

    pub fn normalize(
        &self,
        article: &HarvestedArticle,
        analysis: Option<&BiomedAnalysis>,
    ) -> Result<ResearchItemDraft> {
        let title = truncate_with_ellipsis(&article.title, MAX_TITLE_LEN);
        let content = self.build_content(article, analysis);
        let tags = self.build_tags(article, analysis);
        let metadata = self.build_metadata(article, analysis);

        let mut draft = ResearchItemDraft::new(
            ResearchSource::Biomed,
            title,
            content,
            article.url.clone(),
        )
        .with_tags(tags)
        .with_metadata(metadata)
        .with_created_at(article.pub_date);
        draft.validate()?;
        Ok(draft)
    }

    fn build_content(
        &self,
        article: &HarvestedArticle,
        analysis: Option<&BiomedAnalysis>,
    ) -> String {
        let mut sections = vec![self.sanitizer.sanitize(&article.abstract_text)];
        if let Some(analysis) = analysis {
            sections.push(format!("Key findings: {}", analysis.summary.key_findings));
            sections.push(format!(
                "Usage guidance: {}",
                analysis.claims.usage_guidance
            ));
            sections.push(analysis.claims.caveat.clone());
        }
        truncate_with_ellipsis(&sections.join("\n\n"), MAX_CONTENT_LEN)
    }

    fn build_tags(
        &self,
        article: &HarvestedArticle,
        analysis: Option<&BiomedAnalysis>,
    ) -> Vec<String> {
        let mut extra = vec!["biomed", article.study_type.as_str()];
        let compound;
        if let Some(analysis) = analysis {
            compound = analysis.summary.compound_studied.clone();
            extra.push(compound.as_str());
        }
        generate_tags(&article.title, &article.abstract_text, extra)
    }

    fn build_metadata(
        &self,
        article: &HarvestedArticle,
        analysis: Option<&BiomedAnalysis>,
    ) -> Metadata {
        let mut metadata = Metadata::new();
        metadata.insert("pmid".into(), article.article_id.clone().into());
        metadata.insert(
            "authors".into(),
            article
                .authors
                .iter()
                .map(|a| serde_json::Value::from(a.clone()))
                .collect::<Vec<_>>()
                .into(),
        );
        metadata.insert("journal".into(), article.journal.clone().into());
        metadata.insert("study_type".into(), article.study_type.as_str().into());
        if let Some(doi) = &article.doi {
            metadata.insert("doi".into(), doi.clone().into());
        }
        if let Some(sample_size) = article.sample_size {
            metadata.insert("sample_size".into(), sample_size.into());
        }
        if let Some(citations) = article.citation_count {
            metadata.insert("citation_count".into(), citations.into());
        }
        if let Some(analysis) = analysis {
            metadata.insert(
                "key_findings".into(),
                analysis.summary.key_findings.clone().into(),
            );
            metadata.insert(
                "study_strength".into(),
                analysis.summary.study_strength.clone().into(),
            );
            metadata.insert(
                "content_potential".into(),
                analysis
                    .claims
                    .content_potential
                    .iter()
                    .map(|p| serde_json::Value::from(p.as_str()))
                    .collect::<Vec<_>>()
                    .into(),
            );
            metadata.insert(
                "can_make_claim".into(),
                analysis.claims.can_make_claim.into(),
            );
        }
        metadata
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sources::biomed::analyzers::{
        ClaimAssessment, FindingSummary, FINDING_CAVEAT,
    };
    use crate::sources::biomed::types::{ContentPotential, StudyType};
    use chrono::Utc;

    fn article() -> HarvestedArticle {
        HarvestedArticle {
            article_id: "12345".into(),
            title: "Hericium erinaceus improves recall in adults".into(),
            abstract_text: "A 12-week RCT of lion's mane on memory (n=77).".into(),
            authors: vec!["Author A".into(), "Author B".into()],
            journal: "J Cognitive Res".into(),
            pub_date: Utc::now(),
            doi: Some("10.1000/jcr.2024".into()),
            study_type: StudyType::Rct,
            sample_size: Some(77),
            citation_count: Some(30),
            url: "https://lit.example/articles/12345/".into(),
        }
    }

    fn analysis() -> BiomedAnalysis {
        BiomedAnalysis {
            summary: FindingSummary {
                compound_studied: "lion's mane".into(),
                effect_measured: "memory".into(),
                key_findings: "Recall scores improved versus placebo.".into(),
                statistical_significance: Some("p<0.05".into()),
                study_strength: "strong".into(),
                content_potential: vec!["citation_worthy".into()],
                caveat: FINDING_CAVEAT.into(),
            },
            claims: ClaimAssessment {
                content_potential: vec![ContentPotential::CitationOnly],
                usage_guidance: "Cite with the article link.".into(),
                claim_status: "no_approved_claim".into(),
                caveat: FINDING_CAVEAT.into(),
                can_cite_study: true,
                can_make_claim: false,
            },
        }
    }

    #[test]
    fn content_stitches_analysis_sections() {
        let draft = BiomedNormalizer::new()
            .normalize(&article(), Some(&analysis()))
            .unwrap();
        assert!(draft.content.contains("Key findings: Recall scores"));
        assert!(draft.content.contains("Usage guidance: Cite with"));
        assert!(draft.content.contains("not an approved health claim"));
    }

    #[test]
    fn metadata_carries_citation_keys_and_study_fields() {
        let draft = BiomedNormalizer::new()
            .normalize(&article(), Some(&analysis()))
            .unwrap();
        let m = &draft.source_metadata;
        assert_eq!(m.get("pmid").unwrap().as_str(), Some("12345"));
        assert_eq!(m.get("doi").unwrap().as_str(), Some("10.1000/jcr.2024"));
        assert_eq!(m.get("study_type").unwrap().as_str(), Some("rct"));
        assert_eq!(m.get("citation_count").unwrap().as_i64(), Some(30));
        assert_eq!(m.get("can_make_claim").unwrap().as_bool(), Some(false));
    }

    #[test]
    fn tags_include_source_study_type_and_compound() {
        let draft = BiomedNormalizer::new()
            .normalize(&article(), Some(&analysis()))
            .unwrap();
        assert!(draft.tags.contains(&"biomed".to_string()));
        assert!(draft.tags.contains(&"rct".to_string()));
        assert!(draft.tags.contains(&"lions_mane".to_string()));
    }

    #[test]
    fn normalizes_without_analysis() {
        let draft = BiomedNormalizer::new().normalize(&article(), None).unwrap();
        assert!(!draft.content.contains("Key findings:"));
        assert!(draft.source_metadata.get("key_findings").is_none());
    }
}
