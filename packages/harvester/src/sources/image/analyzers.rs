//! LLM analyzers for image captions.
//!
//! A theme extractor classifies what a post is doing (content type,
//! messaging patterns, products mentioned); a claim detector flags health
//! claims for the compliance gate. Both default conservatively on failure.

use serde::Deserialize;

use crate::llm::{cap_prompt_input, parse_json_response, LlmClient};

use super::types::HarvestedMedia;

const THEME_MAX_TOKENS: u32 = 500;
const CLAIM_MAX_TOKENS: u32 = 400;

/// Prompt for the theme extractor.
pub const THEME_EXTRACTION_PROMPT: &str = r#"You analyze social wellness content.

Given this post caption and hashtags, classify the content:

CAPTION: {caption}
HASHTAGS: {hashtags}

Determine:
1. CONTENT TYPE: "educational", "promotional", "personal_story", "lifestyle", or "other"
2. MESSAGING PATTERNS: recurring angles (e.g. "morning_ritual", "before_after", "ingredient_spotlight")
3. DETECTED PRODUCTS: supplement or mushroom products mentioned
4. WELLNESS THEMES: themes the post leans on (focus, energy, sleep, immunity, stress)

Respond in JSON:
{
    "content_type": "educational",
    "messaging_patterns": ["morning_ritual"],
    "detected_products": ["lion's mane"],
    "wellness_themes": ["focus"]
}"#;

/// Prompt for the claim detector.
pub const CLAIM_DETECTION_PROMPT: &str = r#"You screen social wellness content for health claims.

Given this caption, list any phrases asserting a physiological effect:

CAPTION: {caption}

For each claim, categorize it as "treatment", "prevention", "function", or "general_wellbeing".

Respond in JSON:
{
    "has_health_claim": true,
    "claims": [
        {"phrase": "boosts immunity", "category": "function"}
    ]
}"#;

/// Structured theme summary of a post.
#[derive(Debug, Clone, PartialEq)]
pub struct ThemeSummary {
    pub content_type: String,
    pub messaging_patterns: Vec<String>,
    pub detected_products: Vec<String>,
    pub wellness_themes: Vec<String>,
}

/// A claim the detector surfaced.
#[derive(Debug, Clone, PartialEq)]
pub struct DetectedClaim {
    pub phrase: String,
    pub category: String,
}

/// Claim scan over one caption.
#[derive(Debug, Clone, PartialEq)]
pub struct ClaimScan {
    pub has_health_claim: bool,
    pub claims: Vec<DetectedClaim>,
}

/// Both analyses for one media item.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageAnalysis {
    pub themes: ThemeSummary,
    pub claims: ClaimScan,
}

#[derive(Debug, Deserialize)]
struct ThemeResponse {
    #[serde(default)]
    content_type: Option<String>,
    #[serde(default)]
    messaging_patterns: Vec<String>,
    #[serde(default)]
    detected_products: Vec<String>,
    #[serde(default)]
    wellness_themes: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct ClaimResponse {
    #[serde(default)]
    has_health_claim: Option<bool>,
    #[serde(default)]
    claims: Vec<ClaimEntry>,
}

#[derive(Debug, Deserialize)]
struct ClaimEntry {
    #[serde(default)]
    phrase: String,
    #[serde(default)]
    category: String,
}

/// Extracts content themes from captions.
pub struct ThemeExtractor<L: LlmClient> {
    llm: L,
}

impl<L: LlmClient> ThemeExtractor<L> {
    pub fn new(llm: L) -> Self {
        Self { llm }
    }

    pub async fn extract(&self, media: &HarvestedMedia) -> ThemeSummary {
        if media.caption.trim().is_empty() {
            return default_themes();
        }
        let prompt = THEME_EXTRACTION_PROMPT
            .replace("{caption}", cap_prompt_input(&media.caption))
            .replace("{hashtags}", &media.hashtags.join(", "));

        let response = match self.llm.generate(&prompt, THEME_MAX_TOKENS).await {
            Ok(text) => text,
            Err(e) => {
                tracing::warn!("theme extractor failed for {}: {e}", media.media_id);
                return default_themes();
            }
        };

        match parse_json_response::<ThemeResponse>(&response) {
            Ok(parsed) => ThemeSummary {
                content_type: parsed.content_type.unwrap_or_else(|| "other".to_string()),
                messaging_patterns: parsed.messaging_patterns,
                detected_products: parsed.detected_products,
                wellness_themes: parsed.wellness_themes,
            },
            Err(e) => {
                tracing::warn!(
                    "failed to parse themes for {}: {e}; payload: {:.200}",
                    media.media_id,
                    response
                );
                default_themes()
            }
        }
    }
}

/// Flags health claims in captions.
pub struct ClaimDetector<L: LlmClient> {
    llm: L,
}

impl<L: LlmClient> ClaimDetector<L> {
    pub fn new(llm: L) -> Self {
        Self { llm }
    }

    pub async fn detect(&self, media: &HarvestedMedia) -> ClaimScan {
        if media.caption.trim().is_empty() {
            return default_claims();
        }
        let prompt =
            CLAIM_DETECTION_PROMPT.replace("{caption}", cap_prompt_input(&media.caption));

        let response = match self.llm.generate(&prompt, CLAIM_MAX_TOKENS).await {
            Ok(text) => text,
            Err(e) => {
                tracing::warn!("claim detector failed for {}: {e}", media.media_id);
                return default_claims();
            }
        };

        match parse_json_response::<ClaimResponse>(&response) {
            Ok(parsed) => {
                let claims: Vec<DetectedClaim> = parsed
                    .claims
                    .into_iter()
                    .filter(|c| !c.phrase.is_empty())
                    .map(|c| DetectedClaim {
                        phrase: c.phrase,
                        category: c.category,
                    })
                    .collect();
                ClaimScan {
                    has_health_claim: parsed.has_health_claim.unwrap_or(!claims.is_empty()),
                    claims,
                }
            }
            Err(e) => {
                tracing::warn!(
                    "failed to parse claims for {}: {e}; payload: {:.200}",
                    media.media_id,
                    response
                );
                default_claims()
            }
        }
    }
}

fn default_themes() -> ThemeSummary {
    ThemeSummary {
        content_type: "other".to_string(),
        messaging_patterns: Vec::new(),
        detected_products: Vec::new(),
        wellness_themes: Vec::new(),
    }
}

/// The compliance gate scans the caption text itself, so a failed
/// detection reports no claims rather than guessing.
fn default_claims() -> ClaimScan {
    ClaimScan {
        has_health_claim: false,
        claims: Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MockLlm;
    use chrono::Utc;

    fn media(caption: &str) -> HarvestedMedia {
        HarvestedMedia {
            media_id: "m1".into(),
            caption: caption.into(),
            hashtags: vec!["lionsmane".into()],
            likes: 100,
            comments: 4,
            media_type: "image".into(),
            account: "wellness_user".into(),
            account_type: "business".into(),
            timestamp: Utc::now(),
            permalink: "https://img.example/p/m1/".into(),
            hashtag_source: Some("lionsmane".into()),
            is_competitor: false,
        }
    }

    #[tokio::test]
    async fn extracts_themes_from_valid_response() {
        let llm = MockLlm::new().with_response(
            r#"{"content_type": "educational",
                "messaging_patterns": ["morning_ritual"],
                "detected_products": ["lion's mane"],
                "wellness_themes": ["focus"]}"#,
        );
        let themes = ThemeExtractor::new(llm)
            .extract(&media("Lion's mane latte for focus"))
            .await;
        assert_eq!(themes.content_type, "educational");
        assert_eq!(themes.detected_products, vec!["lion's mane".to_string()]);
    }

    #[tokio::test]
    async fn theme_garbage_defaults() {
        let llm = MockLlm::new().with_response("not json");
        let themes = ThemeExtractor::new(llm).extract(&media("caption")).await;
        assert_eq!(themes.content_type, "other");
        assert!(themes.wellness_themes.is_empty());
    }

    #[tokio::test]
    async fn detects_claims_from_valid_response() {
        let llm = MockLlm::new().with_response(
            r#"{"has_health_claim": true,
                "claims": [{"phrase": "boosts immunity", "category": "function"}]}"#,
        );
        let scan = ClaimDetector::new(llm)
            .detect(&media("This boosts immunity!"))
            .await;
        assert!(scan.has_health_claim);
        assert_eq!(scan.claims[0].phrase, "boosts immunity");
    }

    #[tokio::test]
    async fn missing_flag_is_inferred_from_claims() {
        let llm = MockLlm::new()
            .with_response(r#"{"claims": [{"phrase": "cures colds", "category": "treatment"}]}"#);
        let scan = ClaimDetector::new(llm).detect(&media("caption")).await;
        assert!(scan.has_health_claim);
    }

    #[tokio::test]
    async fn transport_failure_defaults_quietly() {
        let llm = MockLlm::new().always_failing();
        let scan = ClaimDetector::new(llm).detect(&media("caption")).await;
        assert!(!scan.has_health_claim);
        assert!(scan.claims.is_empty());
    }

    #[tokio::test]
    async fn blank_caption_skips_the_model() {
        let llm = MockLlm::new().always_failing();
        let themes = ThemeExtractor::new(llm).extract(&media("   ")).await;
        assert_eq!(themes.content_type, "other");
    }
}
