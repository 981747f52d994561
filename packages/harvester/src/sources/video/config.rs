//! Video platform scanner configuration.

use crate::error::{HarvestError, Result};

/// Default minimum views for a video to be collected.
pub const DEFAULT_MIN_VIEWS: i64 = 100;
/// Default lookback window for searches.
pub const DEFAULT_LOOKBACK_DAYS: u32 = 7;
/// Default per-query result cap.
pub const DEFAULT_MAX_RESULTS_PER_QUERY: u32 = 25;
/// Default API budget per sliding minute.
pub const DEFAULT_RATE_LIMIT_PER_MINUTE: u32 = 30;

/// Scanner behavior for the video platform.
#[derive(Debug, Clone)]
pub struct VideoConfig {
    pub search_queries: Vec<String>,
    pub min_views: i64,
    pub lookback_days: u32,
    pub max_results_per_query: u32,
    pub rate_limit_per_minute: u32,
    /// Base URL for canonical watch links; the video id is appended.
    pub watch_url_base: String,
}

impl VideoConfig {
    pub fn new(search_queries: Vec<String>, watch_url_base: impl Into<String>) -> Self {
        Self {
            search_queries,
            min_views: DEFAULT_MIN_VIEWS,
            lookback_days: DEFAULT_LOOKBACK_DAYS,
            max_results_per_query: DEFAULT_MAX_RESULTS_PER_QUERY,
            rate_limit_per_minute: DEFAULT_RATE_LIMIT_PER_MINUTE,
            watch_url_base: watch_url_base.into(),
        }
    }

    pub fn validate(&self) -> Result<()> {
        let mut errors = Vec::new();
        if self.search_queries.is_empty() {
            errors.push("search_queries list cannot be empty".to_string());
        }
        if self.min_views < 0 {
            errors.push(format!("min_views must be >= 0, got {}", self.min_views));
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
        if !(self.watch_url_base.starts_with("http://")
            || self.watch_url_base.starts_with("https://"))
        {
            errors.push("watch_url_base must start with http:// or https://".to_string());
        }
        if errors.is_empty() {
            Ok(())
        } else {
            Err(HarvestError::Validation(format!(
                "invalid video config: {}",
                errors.join("; ")
            )))
        }
    }
}
