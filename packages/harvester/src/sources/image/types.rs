//! Records and client contract for the image/caption platform.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::error::SourceError;

/// Minimal discovery payload from hashtag or account scans.
#[derive(Debug, Clone, PartialEq)]
pub struct RawMedia {
    /// Source-native media id.
    pub media_id: String,
    pub account: String,
    pub likes: i64,
    pub timestamp: DateTime<Utc>,
    /// Hashtag the scan found this under, when hashtag-driven.
    pub hashtag_source: Option<String>,
    /// Discovered via a monitored competitor account.
    pub is_competitor: bool,
}

/// Full media payload from the detail fetch.
#[derive(Debug, Clone, PartialEq)]
pub struct MediaDetail {
    pub media_id: String,
    pub caption: String,
    pub hashtags: Vec<String>,
    pub likes: i64,
    pub comments: i64,
    /// "image", "video", "carousel".
    pub media_type: String,
    pub account: String,
    pub account_type: String,
    pub timestamp: DateTime<Utc>,
    pub permalink: String,
}

/// Media after enrichment.
#[derive(Debug, Clone, PartialEq)]
pub struct HarvestedMedia {
    pub media_id: String,
    pub caption: String,
    pub hashtags: Vec<String>,
    pub likes: i64,
    pub comments: i64,
    pub media_type: String,
    pub account: String,
    pub account_type: String,
    pub timestamp: DateTime<Utc>,
    pub permalink: String,
    pub hashtag_source: Option<String>,
    pub is_competitor: bool,
}

/// Behavioral contract of the image platform API.
#[async_trait]
pub trait ImageApi: Send + Sync {
    /// Recent media tagged with a hashtag.
    async fn search_hashtag(&self, hashtag: &str, limit: u32)
        -> Result<Vec<RawMedia>, SourceError>;

    /// Recent media posted by an account.
    async fn recent_media(&self, account: &str, limit: u32) -> Result<Vec<RawMedia>, SourceError>;

    /// Fetch the full media record. `None` means deleted or private.
    async fn fetch_media(&self, media_id: &str) -> Result<Option<MediaDetail>, SourceError>;
}
