//! Engagement scoring: source-specific normalization of audience metrics.
//!
//! - aggregator: upvotes, linear to 100
//! - image: likes, linear to 500
//! - biomed: citation count, linear to 50
//! - video: views, log10 to 10 000
//! - news and missing metrics: neutral default of 5

use crate::models::{Metadata, ResearchSource};
use crate::scoring::round2;
use crate::scoring::schemas::{ComponentScore, ScoringInput};

const DEFAULT_SCORE: f64 = 5.0;
const MAX_SCORE: f64 = 10.0;
const MIN_SCORE: f64 = 0.0;

/// Saturation thresholds for engagement normalization.
#[derive(Debug, Clone)]
pub struct EngagementConfig {
    pub aggregator_max_upvotes: i64,
    pub video_max_views: i64,
    pub image_max_likes: i64,
    pub biomed_max_citations: i64,
}

impl Default for EngagementConfig {
    fn default() -> Self {
        Self {
            aggregator_max_upvotes: 100,
            video_max_views: 10_000,
            image_max_likes: 500,
            biomed_max_citations: 50,
        }
    }
}

/// Scores items by engagement metrics in their source metadata.
pub struct EngagementScorer {
    config: EngagementConfig,
}

impl EngagementScorer {
    pub fn new(config: EngagementConfig) -> Self {
        Self { config }
    }

    pub fn score(&self, input: &ScoringInput<'_>) -> ComponentScore {
        let (raw, notes) = match input.source {
            ResearchSource::Aggregator => {
                match metric(input.source_metadata, "upvotes") {
                    Some(upvotes) => (
                        linear(upvotes, self.config.aggregator_max_upvotes),
                        format!("Aggregator: {upvotes} upvotes"),
                    ),
                    None => (DEFAULT_SCORE, "Missing upvote data".to_string()),
                }
            }
            ResearchSource::Video => match metric(input.source_metadata, "views") {
                Some(views) => (
                    logarithmic(views, self.config.video_max_views),
                    format!("Video: {views} views (log scale)"),
                ),
                None => (DEFAULT_SCORE, "Missing view data".to_string()),
            },
            ResearchSource::Image => match metric(input.source_metadata, "likes") {
                Some(likes) => (
                    linear(likes, self.config.image_max_likes),
                    format!("Image: {likes} likes"),
                ),
                None => (DEFAULT_SCORE, "Missing like data".to_string()),
            },
            ResearchSource::Biomed => match metric(input.source_metadata, "citation_count") {
                Some(citations) => (
                    linear(citations, self.config.biomed_max_citations),
                    format!("Biomed: {citations} citations"),
                ),
                None => (DEFAULT_SCORE, "Missing citation data".to_string()),
            },
            ResearchSource::News => (
                DEFAULT_SCORE,
                "News source (no engagement metrics)".to_string(),
            ),
        };

        ComponentScore::new("engagement", raw, notes)
    }
}

fn metric(metadata: &Metadata, key: &str) -> Option<i64> {
    metadata.get(key).and_then(|v| v.as_i64())
}

fn linear(value: i64, saturation: i64) -> f64 {
    if value <= 0 {
        return MIN_SCORE;
    }
    if value >= saturation {
        return MAX_SCORE;
    }
    round2(value as f64 / saturation as f64 * MAX_SCORE)
}

fn logarithmic(value: i64, saturation: i64) -> f64 {
    if value <= 0 {
        return MIN_SCORE;
    }
    if value >= saturation {
        return MAX_SCORE;
    }
    let score = (value as f64).log10() / (saturation as f64).log10() * MAX_SCORE;
    round2(score.min(MAX_SCORE))
}
