//! Image normalizer: media plus analyses into pool drafts.

use research_pool::{Metadata, ResearchItemDraft, ResearchSource, MAX_CONTENT_LEN};

use crate::error::Result;
use crate::tags::generate_tags;
use crate::text::{truncate_chars_with_ellipsis, truncate_with_ellipsis, Sanitizer};

use super::analyzers::ImageAnalysis;
use super::types::HarvestedMedia;

/// Caption-derived titles are capped at 100 characters.
const MAX_CAPTION_TITLE_CHARS: usize = 100;

pub struct ImageNormalizer {
    sanitizer: Sanitizer,
}

impl Default for ImageNormalizer {
    fn default() -> Self {
        Self::new()
    }
}

impl ImageNormalizer {
    pub fn new() -> Self {
        Self {
            sanitizer: Sanitizer::new(),
        }
    }

    pub fn normalize(
        &self,
        media: &HarvestedMedia,
        analysis: Option<&ImageAnalysis>,
    ) -> Result<ResearchItemDraft> {
        let caption = self.sanitizer.sanitize(&media.caption);
        let title = self.build_title(&caption, &media.account);
        let content = self.build_content(&caption, media, analysis);
        let tags = self.build_tags(media, &caption, analysis);
        let metadata = self.build_metadata(media, analysis);

        let mut draft = ResearchItemDraft::new(
            ResearchSource::Image,
            title,
            content,
            media.permalink.clone(),
        )
        .with_tags(tags)
        .with_metadata(metadata)
        .with_created_at(media.timestamp);
        draft.validate()?;
        Ok(draft)
    }

    /// A caption that is empty after stripping gets an account-based
    /// title; otherwise the first 100 characters with an ellipsis.
    fn build_title(&self, caption: &str, account: &str) -> String {
        if caption.is_empty() {
            return format!("Post from @{account}");
        }
        truncate_chars_with_ellipsis(caption, MAX_CAPTION_TITLE_CHARS)
    }

    fn build_content(
        &self,
        caption: &str,
        media: &HarvestedMedia,
        analysis: Option<&ImageAnalysis>,
    ) -> String {
        let mut sections = Vec::new();
        if caption.is_empty() {
            sections.push(format!("Post from @{} (no caption)", media.account));
        } else {
            sections.push(caption.to_string());
        }
        if !media.hashtags.is_empty() {
            sections.push(format!("Hashtags: {}", media.hashtags.join(", ")));
        }
        if let Some(analysis) = analysis {
            sections.push(format!(
                "Content analysis: {} post",
                analysis.themes.content_type
            ));
            if !analysis.themes.wellness_themes.is_empty() {
                sections.push(format!(
                    "Themes: {}",
                    analysis.themes.wellness_themes.join(", ")
                ));
            }
            if analysis.claims.has_health_claim {
                let phrases: Vec<&str> = analysis
                    .claims
                    .claims
                    .iter()
                    .map(|c| c.phrase.as_str())
                    .collect();
                sections.push(format!("Detected claims: {}", phrases.join("; ")));
            }
        }
        truncate_with_ellipsis(&sections.join("\n\n"), MAX_CONTENT_LEN)
    }

    fn build_tags(
        &self,
        media: &HarvestedMedia,
        caption: &str,
        analysis: Option<&ImageAnalysis>,
    ) -> Vec<String> {
        let mut extra: Vec<&str> = vec!["image"];
        if media.is_competitor {
            extra.push("competitor");
        }
        let hashtags: Vec<&str> = media.hashtags.iter().map(String::as_str).collect();
        extra.extend(hashtags);
        let products: Vec<String>;
        if let Some(analysis) = analysis {
            products = analysis.themes.detected_products.clone();
            extra.extend(products.iter().map(String::as_str));
        }
        generate_tags("", caption, extra)
    }

    fn build_metadata(
        &self,
        media: &HarvestedMedia,
        analysis: Option<&ImageAnalysis>,
    ) -> Metadata {
        let mut metadata = Metadata::new();
        metadata.insert("account".into(), media.account.clone().into());
        metadata.insert("account_type".into(), media.account_type.clone().into());
        metadata.insert("likes".into(), media.likes.into());
        metadata.insert("comments".into(), media.comments.into());
        metadata.insert("media_type".into(), media.media_type.clone().into());
        metadata.insert("is_competitor".into(), media.is_competitor.into());
        if let Some(hashtag) = &media.hashtag_source {
            metadata.insert("hashtag_source".into(), hashtag.clone().into());
        }
        if let Some(analysis) = analysis {
            metadata.insert(
                "content_type".into(),
                analysis.themes.content_type.clone().into(),
            );
            metadata.insert(
                "has_health_claim".into(),
                analysis.claims.has_health_claim.into(),
            );
            if !analysis.claims.claims.is_empty() {
                metadata.insert(
                    "detected_claims".into(),
                    analysis
                        .claims
                        .claims
                        .iter()
                        .map(|c| serde_json::Value::from(c.phrase.clone()))
                        .collect::<Vec<_>>()
                        .into(),
                );
            }
        }
        metadata
    }
}
