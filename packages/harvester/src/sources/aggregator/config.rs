//! Aggregator scanner configuration.

use crate::error::{HarvestError, Result};
use crate::scan::TimeWindow;

/// Default minimum net upvotes for a post to be collected.
pub const DEFAULT_MIN_UPVOTES: i64 = 10;
/// Default per-query result cap (the platform caps at 100).
pub const DEFAULT_MAX_POSTS_PER_QUERY: u32 = 100;
/// Default API budget per sliding minute.
pub const DEFAULT_RATE_LIMIT_PER_MINUTE: u32 = 60;

/// Scanner behavior for the link aggregator.
///
/// Validated at construction; never re-read from the environment.
#[derive(Debug, Clone)]
pub struct AggregatorConfig {
    /// Communities to scan (without any leading sigil).
    pub subspaces: Vec<String>,
    /// Search keywords, combined with each subspace.
    pub keywords: Vec<String>,
    /// Minimum net upvotes to collect.
    pub min_upvotes: i64,
    /// Server-side recency filter. Windows coarser than a day are taken
    /// as authoritative; the scanner re-applies finer windows locally.
    pub time_window: TimeWindow,
    /// Per-query result cap, 1..=100.
    pub max_posts_per_query: u32,
    /// API budget per sliding minute.
    pub rate_limit_per_minute: u32,
    /// Base URL used to absolutize relative permalinks.
    pub link_base: String,
}

impl AggregatorConfig {
    /// Build a config with the required discovery space and defaults for
    /// the thresholds.
    pub fn new(
        subspaces: Vec<String>,
        keywords: Vec<String>,
        link_base: impl Into<String>,
    ) -> Self {
        Self {
            subspaces,
            keywords,
            min_upvotes: DEFAULT_MIN_UPVOTES,
            time_window: TimeWindow::Day,
            max_posts_per_query: DEFAULT_MAX_POSTS_PER_QUERY,
            rate_limit_per_minute: DEFAULT_RATE_LIMIT_PER_MINUTE,
            link_base: link_base.into(),
        }
    }

    /// Refuse empty discovery spaces and out-of-range thresholds.
    pub fn validate(&self) -> Result<()> {
        let mut errors = Vec::new();
        if self.subspaces.is_empty() {
            errors.push("subspaces list cannot be empty".to_string());
        }
        if self.keywords.is_empty() {
            errors.push("keywords list cannot be empty".to_string());
        }
        if self.min_upvotes < 0 {
            errors.push(format!("min_upvotes must be >= 0, got {}", self.min_upvotes));
        }
        if !(1..=100).contains(&self.max_posts_per_query) {
            errors.push(format!(
                "max_posts_per_query must be 1-100, got {}",
                self.max_posts_per_query
            ));
        }
        if self.rate_limit_per_minute < 1 {
            errors.push(format!(
                "rate_limit_per_minute must be >= 1, got {}",
                self.rate_limit_per_minute
            ));
        }
        if !(self.link_base.starts_with("http://") || self.link_base.starts_with("https://")) {
            errors.push("link_base must start with http:// or https://".to_string());
        }
        if errors.is_empty() {
            Ok(())
        } else {
            Err(HarvestError::Validation(format!(
                "invalid aggregator config: {}",
                errors.join("; ")
            )))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> AggregatorConfig {
        AggregatorConfig::new(
            vec!["nootropics".into(), "supplements".into()],
            vec!["lion's mane".into(), "chaga".into()],
            "https://agg.example",
        )
    }

    #[test]
    fn defaults_are_valid() {
        assert!(config().validate().is_ok());
    }

    #[test]
    fn empty_subspaces_refused() {
        let mut c = config();
        c.subspaces.clear();
        assert!(c.validate().is_err());
    }

    #[test]
    fn empty_keywords_refused() {
        let mut c = config();
        c.keywords.clear();
        assert!(c.validate().is_err());
    }

    #[test]
    fn negative_min_upvotes_refused() {
        let mut c = config();
        c.min_upvotes = -1;
        assert!(c.validate().is_err());
    }

    #[test]
    fn out_of_range_post_cap_refused() {
        let mut c = config();
        c.max_posts_per_query = 0;
        assert!(c.validate().is_err());
        c.max_posts_per_query = 101;
        assert!(c.validate().is_err());
    }

    #[test]
    fn bad_link_base_refused() {
        let mut c = config();
        c.link_base = "agg.example".into();
        assert!(c.validate().is_err());
    }
}
