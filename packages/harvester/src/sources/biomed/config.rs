//! Biomedical scanner configuration.

use crate::error::{HarvestError, Result};

/// Default lookback window for literature searches.
pub const DEFAULT_LOOKBACK_DAYS: u32 = 90;
/// Default per-query result cap.
pub const DEFAULT_MAX_RESULTS_PER_QUERY: u32 = 50;
/// Default API budget per sliding minute.
pub const DEFAULT_RATE_LIMIT_PER_MINUTE: u32 = 10;

/// Scanner behavior for the literature database.
#[derive(Debug, Clone)]
pub struct BiomedConfig {
    /// Search queries (compound and effect terms).
    pub search_queries: Vec<String>,
    /// Publication-type filters passed to the server; empty means all.
    pub publication_type_filters: Vec<String>,
    /// Lookback window in days.
    pub lookback_days: u32,
    /// Per-query result cap.
    pub max_results_per_query: u32,
    /// API budget per sliding minute.
    pub rate_limit_per_minute: u32,
    /// Base URL for canonical article links, e.g. the database's article
    /// path prefix; the article id is appended.
    pub article_url_base: String,
}

impl BiomedConfig {
    pub fn new(search_queries: Vec<String>, article_url_base: impl Into<String>) -> Self {
        Self {
            search_queries,
            publication_type_filters: vec![
                "randomized controlled trial".to_string(),
                "meta-analysis".to_string(),
                "systematic review".to_string(),
            ],
            lookback_days: DEFAULT_LOOKBACK_DAYS,
            max_results_per_query: DEFAULT_MAX_RESULTS_PER_QUERY,
            rate_limit_per_minute: DEFAULT_RATE_LIMIT_PER_MINUTE,
            article_url_base: article_url_base.into(),
        }
    }

    pub fn validate(&self) -> Result<()> {
        let mut errors = Vec::new();
        if self.search_queries.is_empty() {
            errors.push("search_queries list cannot be empty".to_string());
        }
        if self.lookback_days == 0 {
            errors.push("lookback_days must be >= 1".to_string());
        }
        if self.max_results_per_query == 0 {
            errors.push("max_results_per_query must be >= 1".to_string());
        }
        if self.rate_limit_per_minute == 0 {
            errors.push("rate_limit_per_minute must be >= 1".to_string());
        }
        if !(self.article_url_base.starts_with("http://")
            || self.article_url_base.starts_with("https://"))
        {
            errors.push("article_url_base must start with http:// or https://".to_string());
        }
        if errors.is_empty() {
            Ok(())
        } else {
            Err(HarvestError::Validation(format!(
                "invalid biomed config: {}",
                errors.join("; ")
            )))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> BiomedConfig {
        BiomedConfig::new(
            vec!["hericium erinaceus cognition".into()],
            "https://lit.example/articles",
        )
    }

    #[test]
    fn defaults_are_valid() {
        assert!(config().validate().is_ok());
    }

    #[test]
    fn empty_queries_refused() {
        let mut c = config();
        c.search_queries.clear();
        assert!(c.validate().is_err());
    }

    #[test]
    fn zero_lookback_refused() {
        let mut c = config();
        c.lookback_days = 0;
        assert!(c.validate().is_err());
    }

    #[test]
    fn bad_url_base_refused() {
        let mut c = config();
        c.article_url_base = "lit.example".into();
        assert!(c.validate().is_err());
    }
}
