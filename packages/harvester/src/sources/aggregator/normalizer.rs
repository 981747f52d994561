//! Aggregator normalizer: harvested posts to canonical pool drafts.

use research_pool::{Metadata, ResearchItemDraft, ResearchSource, MAX_CONTENT_LEN, MAX_TITLE_LEN};

use crate::error::Result;
use crate::tags::generate_tags;
use crate::text::truncate_with_ellipsis;

use super::types::HarvestedPost;

/// Maps sanitized posts into pool drafts. Pure transformation.
pub struct AggregatorNormalizer {
    link_base: String,
}

impl AggregatorNormalizer {
    pub fn new(link_base: impl Into<String>) -> Self {
        Self {
            link_base: link_base.into(),
        }
    }

    pub fn normalize(&self, post: &HarvestedPost) -> Result<ResearchItemDraft> {
        let title = truncate_with_ellipsis(&post.title, MAX_TITLE_LEN);
        let content = truncate_with_ellipsis(&post.body, MAX_CONTENT_LEN);
        let tags = generate_tags(&post.title, &post.body, ["aggregator"]);

        let mut metadata = Metadata::new();
        metadata.insert("subspace".into(), post.subspace.clone().into());
        metadata.insert("author".into(), post.author.clone().into());
        metadata.insert("upvotes".into(), post.upvotes.into());
        metadata.insert("upvote_ratio".into(), post.upvote_ratio.into());
        metadata.insert("comment_count".into(), post.comment_count.into());
        metadata.insert("permalink".into(), post.permalink.clone().into());

        let mut draft = ResearchItemDraft::new(
            ResearchSource::Aggregator,
            title,
            content,
            self.absolutize(&post.permalink),
        )
        .with_tags(tags)
        .with_metadata(metadata)
        .with_created_at(post.created_at);
        draft.validate()?;
        Ok(draft)
    }

    /// Absolutize a relative permalink against the platform base.
    fn absolutize(&self, permalink: &str) -> String {
        if permalink.starts_with("http://") || permalink.starts_with("https://") {
            return permalink.to_string();
        }
        format!(
            "{}/{}",
            self.link_base.trim_end_matches('/'),
            permalink.trim_start_matches('/')
        )
    }
}
