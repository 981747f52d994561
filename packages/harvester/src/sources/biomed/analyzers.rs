//! LLM analyzers for biomedical articles.
//!
//! Two stages sit between harvest and normalization: a finding summarizer
//! that turns an abstract into a structured plain-language summary, and a
//! claim assessor that decides how the finding may be used in downstream
//! content. Both substitute conservative defaults on any parse or
//! transport failure; an analyzer never fails an item.

use serde::Deserialize;

use crate::llm::{cap_prompt_input, parse_json_response, LlmClient};

use super::types::{ContentPotential, HarvestedArticle};

/// Standard caveat attached to every finding.
pub const FINDING_CAVEAT: &str = "Research finding - not an approved health claim. \
     Can cite the study but cannot claim treatment, prevention, or cure.";

const SUMMARIZE_MAX_TOKENS: u32 = 800;
const ASSESS_MAX_TOKENS: u32 = 600;

/// Prompt for the finding summarizer.
pub const FINDING_SUMMARY_PROMPT: &str = r#"You are a scientific research summarizer for a wellness content team.

Analyze this abstract and extract key information:

TITLE: {title}
STUDY TYPE: {study_type}
ABSTRACT: {abstract}

Extract and summarize:
1. COMPOUND STUDIED: the main substance studied (include the scientific name if present)
2. EFFECT MEASURED: what health or wellness effect was investigated
3. KEY FINDINGS: a 2-3 sentence plain-language summary of the results
4. STATISTICAL SIGNIFICANCE: p-values, confidence intervals, sample size if stated
5. STUDY STRENGTH: "strong" (large RCT), "moderate" (smaller RCT, review), or "weak" (observational, case study)
6. CONTENT POTENTIAL: one or more of "educational", "citation_worthy", "trend_indicator"

All summaries are for content inspiration only and must carry the caveat that
findings are not approved health claims.

Respond in JSON:
{
    "compound_studied": "...",
    "effect_measured": "...",
    "key_findings": "...",
    "statistical_significance": "..." or null,
    "study_strength": "strong|moderate|weak",
    "content_potential": ["educational"],
    "caveat": "..."
}"#;

/// Prompt for the claim assessor.
pub const CLAIM_ASSESSMENT_PROMPT: &str = r#"You are a health-claims compliance expert.

Given this research finding summary, determine how it can be used in
marketing content under health-claims regulation:

COMPOUND: {compound}
EFFECT: {effect}
SUMMARY: {summary}
STUDY STRENGTH: {strength}

CRITICAL CONTEXT: there are currently no approved health claims for
functional mushrooms. Content using these findings cannot make claims.

Determine:
1. CONTENT POTENTIAL: one or more of "citation_only", "educational",
   "trend_awareness", "no_claim"
2. USAGE GUIDANCE: how to use this research compliantly
3. CLAIM STATUS: "no_approved_claim", "pending", or "approved"

Respond in JSON:
{
    "content_potential": ["citation_only"],
    "usage_guidance": "...",
    "claim_status": "no_approved_claim",
    "caveat": "...",
    "can_cite_study": true,
    "can_make_claim": false
}"#;

/// Structured summary of a research finding.
#[derive(Debug, Clone, PartialEq)]
pub struct FindingSummary {
    pub compound_studied: String,
    pub effect_measured: String,
    pub key_findings: String,
    pub statistical_significance: Option<String>,
    /// "strong", "moderate", or "weak"; "weak" on parse failure.
    pub study_strength: String,
    pub content_potential: Vec<String>,
    pub caveat: String,
}

/// Assessment of how a finding may be used.
#[derive(Debug, Clone, PartialEq)]
pub struct ClaimAssessment {
    pub content_potential: Vec<ContentPotential>,
    pub usage_guidance: String,
    pub claim_status: String,
    pub caveat: String,
    pub can_cite_study: bool,
    pub can_make_claim: bool,
}

/// Both analyses for one article.
#[derive(Debug, Clone, PartialEq)]
pub struct BiomedAnalysis {
    pub summary: FindingSummary,
    pub claims: ClaimAssessment,
}

#[derive(Debug, Deserialize)]
struct SummaryResponse {
    #[serde(default)]
    compound_studied: Option<String>,
    #[serde(default)]
    effect_measured: Option<String>,
    #[serde(default)]
    key_findings: Option<String>,
    #[serde(default)]
    statistical_significance: Option<String>,
    #[serde(default)]
    study_strength: Option<String>,
    #[serde(default)]
    content_potential: Vec<String>,
    #[serde(default)]
    caveat: Option<String>,
}

#[derive(Debug, Deserialize)]
struct AssessmentResponse {
    #[serde(default)]
    content_potential: Vec<String>,
    #[serde(default)]
    usage_guidance: Option<String>,
    #[serde(default)]
    claim_status: Option<String>,
    #[serde(default)]
    caveat: Option<String>,
    #[serde(default)]
    can_cite_study: Option<bool>,
    #[serde(default)]
    can_make_claim: Option<bool>,
}

/// Summarizes abstracts into structured findings.
pub struct FindingSummarizer<L: LlmClient> {
    llm: L,
}

impl<L: LlmClient> FindingSummarizer<L> {
    pub fn new(llm: L) -> Self {
        Self { llm }
    }

    pub async fn summarize(&self, article: &HarvestedArticle) -> FindingSummary {
        if article.abstract_text.trim().is_empty() {
            return default_summary(article);
        }

        let prompt = FINDING_SUMMARY_PROMPT
            .replace("{title}", &article.title)
            .replace("{study_type}", article.study_type.as_str())
            .replace("{abstract}", cap_prompt_input(&article.abstract_text));

        let response = match self.llm.generate(&prompt, SUMMARIZE_MAX_TOKENS).await {
            Ok(text) => text,
            Err(e) => {
                tracing::warn!("summarizer transport failed for {}: {e}", article.article_id);
                return default_summary(article);
            }
        };

        match parse_json_response::<SummaryResponse>(&response) {
            Ok(parsed) => FindingSummary {
                compound_studied: parsed
                    .compound_studied
                    .unwrap_or_else(|| "Unknown compound".to_string()),
                effect_measured: parsed
                    .effect_measured
                    .unwrap_or_else(|| "Unknown effect".to_string()),
                key_findings: parsed
                    .key_findings
                    .unwrap_or_else(|| excerpt(&article.abstract_text, 200)),
                statistical_significance: parsed.statistical_significance,
                study_strength: parsed.study_strength.unwrap_or_else(|| "weak".to_string()),
                content_potential: if parsed.content_potential.is_empty() {
                    vec!["educational".to_string()]
                } else {
                    parsed.content_potential
                },
                caveat: parsed.caveat.unwrap_or_else(|| FINDING_CAVEAT.to_string()),
            },
            Err(e) => {
                tracing::warn!(
                    "failed to parse summary for {}: {e}; payload: {:.200}",
                    article.article_id,
                    response
                );
                default_summary(article)
            }
        }
    }
}

/// Assesses claim usability of summarized findings.
pub struct ClaimAssessor<L: LlmClient> {
    llm: L,
}

impl<L: LlmClient> ClaimAssessor<L> {
    pub fn new(llm: L) -> Self {
        Self { llm }
    }

    pub async fn assess(&self, summary: &FindingSummary) -> ClaimAssessment {
        let prompt = CLAIM_ASSESSMENT_PROMPT
            .replace("{compound}", &summary.compound_studied)
            .replace("{effect}", &summary.effect_measured)
            .replace("{summary}", cap_prompt_input(&summary.key_findings))
            .replace("{strength}", &summary.study_strength);

        let response = match self.llm.generate(&prompt, ASSESS_MAX_TOKENS).await {
            Ok(text) => text,
            Err(e) => {
                tracing::warn!(
                    "claim assessor transport failed for {}: {e}",
                    summary.compound_studied
                );
                return default_assessment();
            }
        };

        match parse_json_response::<AssessmentResponse>(&response) {
            Ok(parsed) => {
                let content_potential: Vec<ContentPotential> = parsed
                    .content_potential
                    .iter()
                    .filter_map(|v| ContentPotential::parse(v))
                    .collect();
                ClaimAssessment {
                    content_potential: if content_potential.is_empty() {
                        vec![ContentPotential::NoClaim]
                    } else {
                        content_potential
                    },
                    usage_guidance: parsed
                        .usage_guidance
                        .unwrap_or_else(|| "Cite the study; make no claims.".to_string()),
                    claim_status: parsed
                        .claim_status
                        .unwrap_or_else(|| "no_approved_claim".to_string()),
                    caveat: parsed.caveat.unwrap_or_else(|| FINDING_CAVEAT.to_string()),
                    can_cite_study: parsed.can_cite_study.unwrap_or(true),
                    can_make_claim: parsed.can_make_claim.unwrap_or(false),
                }
            }
            Err(e) => {
                tracing::warn!(
                    "failed to parse claim assessment for {}: {e}; payload: {:.200}",
                    summary.compound_studied,
                    response
                );
                default_assessment()
            }
        }
    }
}

fn default_summary(article: &HarvestedArticle) -> FindingSummary {
    FindingSummary {
        compound_studied: "Functional mushroom compound".to_string(),
        effect_measured: "See abstract for details".to_string(),
        key_findings: if article.abstract_text.is_empty() {
            "No abstract available".to_string()
        } else {
            excerpt(&article.abstract_text, 300)
        },
        statistical_significance: None,
        study_strength: "weak".to_string(),
        content_potential: vec!["educational".to_string()],
        caveat: FINDING_CAVEAT.to_string(),
    }
}

fn default_assessment() -> ClaimAssessment {
    ClaimAssessment {
        content_potential: vec![ContentPotential::NoClaim],
        usage_guidance: "Assessment unavailable; do not use for claims.".to_string(),
        claim_status: "no_approved_claim".to_string(),
        caveat: FINDING_CAVEAT.to_string(),
        can_cite_study: true,
        can_make_claim: false,
    }
}

fn excerpt(text: &str, max_bytes: usize) -> String {
    crate::text::truncate_with_ellipsis(text, max_bytes)
}
