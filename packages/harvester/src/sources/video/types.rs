//! Records and client contract for the video platform.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::error::SourceError;

/// Minimal discovery payload from a video search.
#[derive(Debug, Clone, PartialEq)]
pub struct RawVideo {
    /// Source-native video id.
    pub id: String,
    pub title: String,
    pub channel: String,
    pub views: i64,
    pub published_at: DateTime<Utc>,
}

/// Video after transcript enrichment.
#[derive(Debug, Clone, PartialEq)]
pub struct HarvestedVideo {
    pub id: String,
    pub title: String,
    pub channel: String,
    pub views: i64,
    pub published_at: DateTime<Utc>,
    /// Sanitized transcript excerpt.
    pub transcript: String,
    pub url: String,
}

/// Behavioral contract of the video platform API.
#[async_trait]
pub trait VideoApi: Send + Sync {
    /// Search for videos matching a query within a lookback window.
    async fn search(
        &self,
        query: &str,
        lookback_days: u32,
        limit: u32,
    ) -> Result<Vec<RawVideo>, SourceError>;

    /// Fetch the transcript. `None` means the video is gone or has no
    /// transcript available.
    async fn fetch_transcript(&self, id: &str) -> Result<Option<String>, SourceError>;
}
