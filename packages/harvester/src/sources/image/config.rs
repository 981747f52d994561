//! Image platform scanner configuration.

use crate::error::{HarvestError, Result};

/// Default minimum likes for a post to be collected.
pub const DEFAULT_MIN_LIKES: i64 = 20;
/// Default per-scan result cap.
pub const DEFAULT_MAX_MEDIA_PER_SCAN: u32 = 50;
/// Default API budget per sliding minute.
pub const DEFAULT_RATE_LIMIT_PER_MINUTE: u32 = 30;
/// Default lookback window in hours.
pub const DEFAULT_LOOKBACK_HOURS: u32 = 48;

/// Scanner behavior for the image platform.
#[derive(Debug, Clone)]
pub struct ImageConfig {
    /// Hashtags to scan (without the leading '#').
    pub hashtags: Vec<String>,
    /// Competitor accounts to monitor; may be empty.
    pub competitor_accounts: Vec<String>,
    pub min_likes: i64,
    pub lookback_hours: u32,
    pub max_media_per_scan: u32,
    pub rate_limit_per_minute: u32,
}

impl ImageConfig {
    pub fn new(hashtags: Vec<String>) -> Self {
        Self {
            hashtags,
            competitor_accounts: Vec::new(),
            min_likes: DEFAULT_MIN_LIKES,
            lookback_hours: DEFAULT_LOOKBACK_HOURS,
            max_media_per_scan: DEFAULT_MAX_MEDIA_PER_SCAN,
            rate_limit_per_minute: DEFAULT_RATE_LIMIT_PER_MINUTE,
        }
    }

    pub fn with_competitors(mut self, accounts: Vec<String>) -> Self {
        self.competitor_accounts = accounts;
        self
    }

    pub fn validate(&self) -> Result<()> {
        let mut errors = Vec::new();
        if self.hashtags.is_empty() && self.competitor_accounts.is_empty() {
            errors.push("at least one hashtag or competitor account is required".to_string());
        }
        if self.min_likes < 0 {
            errors.push(format!("min_likes must be >= 0, got {}", self.min_likes));
        }
        if self.lookback_hours == 0 {
            errors.push("lookback_hours must be >= 1".to_string());
        }
        if self.max_media_per_scan == 0 {
            errors.push("max_media_per_scan must be >= 1".to_string());
        }
        if self.rate_limit_per_minute == 0 {
            errors.push("rate_limit_per_minute must be >= 1".to_string());
        }
        if errors.is_empty() {
            Ok(())
        } else {
            Err(HarvestError::Validation(format!(
                "invalid image config: {}",
                errors.join("; ")
            )))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hashtags_alone_are_valid() {
        assert!(ImageConfig::new(vec!["lionsmane".into()]).validate().is_ok());
    }

    #[test]
    fn competitors_alone_are_valid() {
        let config = ImageConfig::new(Vec::new()).with_competitors(vec!["rival".into()]);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn empty_discovery_space_refused() {
        assert!(ImageConfig::new(Vec::new()).validate().is_err());
    }

    #[test]
    fn negative_min_likes_refused() {
        let mut config = ImageConfig::new(vec!["chaga".into()]);
        config.min_likes = -5;
        assert!(config.validate().is_err());
    }
}
