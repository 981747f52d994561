//! Mock implementations for testing pipelines without real network or
//! model calls. Deterministic and configurable through builder methods.

use std::collections::{HashMap, VecDeque};
use std::sync::RwLock;

use async_trait::async_trait;

use crate::error::{HarvestError, Result, SourceError};
use crate::llm::LlmClient;
use crate::scan::TimeWindow;
use crate::sources::aggregator::{AggregatorApi, PostDetail, RawPost};
use crate::sources::biomed::{BiomedApi, RawArticle};
use crate::sources::image::{ImageApi, MediaDetail, RawMedia};
use crate::sources::news::{NewsApi, RawHeadline};
use crate::sources::video::{RawVideo, VideoApi};

/// Mock LLM returning queued responses, then `{}` (which parses into
/// every analyzer's conservative defaults).
#[derive(Default)]
pub struct MockLlm {
    responses: RwLock<VecDeque<String>>,
    fail: bool,
}

impl MockLlm {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a canned response; responses are consumed in order.
    pub fn with_response(self, response: impl Into<String>) -> Self {
        self.responses.write().unwrap().push_back(response.into());
        self
    }

    /// Every call fails with a transport error.
    pub fn always_failing(mut self) -> Self {
        self.fail = true;
        self
    }
}

#[async_trait]
impl LlmClient for MockLlm {
    async fn generate(&self, _prompt: &str, _max_tokens: u32) -> Result<String> {
        if self.fail {
            return Err(HarvestError::LlmTransport("mock transport down".into()));
        }
        Ok(self
            .responses
            .write()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| "{}".to_string()))
    }
}

/// Mock aggregator API backed by fixed fixtures.
#[derive(Default)]
pub struct MockAggregatorApi {
    search_results: Vec<RawPost>,
    posts: HashMap<String, PostDetail>,
    query_failures: HashMap<String, SourceError>,
    fetch_failures: HashMap<String, SourceError>,
}

impl MockAggregatorApi {
    pub fn new() -> Self {
        Self::default()
    }

    /// Results returned for every successful search call.
    pub fn with_search_results(mut self, posts: Vec<RawPost>) -> Self {
        self.search_results = posts;
        self
    }

    /// Register the detail payload for a post id.
    pub fn with_post(mut self, detail: PostDetail) -> Self {
        self.posts.insert(detail.id.clone(), detail);
        self
    }

    /// Fail searches whose keyword matches.
    pub fn failing_on_query(mut self, query: &str, error: SourceError) -> Self {
        self.query_failures.insert(query.to_string(), error);
        self
    }

    /// Fail the detail fetch for a post id.
    pub fn failing_on_fetch(mut self, id: &str, error: SourceError) -> Self {
        self.fetch_failures.insert(id.to_string(), error);
        self
    }
}

#[async_trait]
impl AggregatorApi for MockAggregatorApi {
    async fn search(
        &self,
        _subspace: &str,
        query: &str,
        _window: TimeWindow,
        _limit: u32,
    ) -> std::result::Result<Vec<RawPost>, SourceError> {
        if let Some(error) = self.query_failures.get(query) {
            return Err(error.clone());
        }
        Ok(self.search_results.clone())
    }

    async fn fetch_post(
        &self,
        id: &str,
    ) -> std::result::Result<Option<PostDetail>, SourceError> {
        if let Some(error) = self.fetch_failures.get(id) {
            return Err(error.clone());
        }
        Ok(self.posts.get(id).cloned())
    }
}

/// Mock literature database API.
#[derive(Default)]
pub struct MockBiomedApi {
    search_results: HashMap<String, Vec<String>>,
    articles: HashMap<String, RawArticle>,
    query_failures: HashMap<String, SourceError>,
    details_failure: Option<SourceError>,
}

impl MockBiomedApi {
    pub fn new() -> Self {
        Self::default()
    }

    /// Article ids returned for a query.
    pub fn with_search_results(mut self, query: &str, ids: Vec<&str>) -> Self {
        self.search_results
            .insert(query.to_string(), ids.into_iter().map(String::from).collect());
        self
    }

    /// Register an article for detail fetches.
    pub fn with_article(mut self, article: RawArticle) -> Self {
        self.articles.insert(article.article_id.clone(), article);
        self
    }

    pub fn failing_on_query(mut self, query: &str, error: SourceError) -> Self {
        self.query_failures.insert(query.to_string(), error);
        self
    }

    /// Fail every detail fetch.
    pub fn failing_on_details(mut self, error: SourceError) -> Self {
        self.details_failure = Some(error);
        self
    }
}

#[async_trait]
impl BiomedApi for MockBiomedApi {
    async fn search(
        &self,
        query: &str,
        _lookback_days: u32,
        _publication_types: &[String],
        _max_results: u32,
    ) -> std::result::Result<Vec<String>, SourceError> {
        if let Some(error) = self.query_failures.get(query) {
            return Err(error.clone());
        }
        Ok(self.search_results.get(query).cloned().unwrap_or_default())
    }

    async fn fetch_details(
        &self,
        ids: &[String],
    ) -> std::result::Result<Vec<RawArticle>, SourceError> {
        if let Some(error) = &self.details_failure {
            return Err(error.clone());
        }
        Ok(ids
            .iter()
            .filter_map(|id| self.articles.get(id).cloned())
            .collect())
    }
}

/// Mock image platform API.
#[derive(Default)]
pub struct MockImageApi {
    hashtag_results: HashMap<String, Vec<RawMedia>>,
    account_results: HashMap<String, Vec<RawMedia>>,
    media: HashMap<String, MediaDetail>,
    hashtag_failures: HashMap<String, SourceError>,
    fetch_failures: HashMap<String, SourceError>,
}

impl MockImageApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_hashtag_results(mut self, hashtag: &str, media: Vec<RawMedia>) -> Self {
        self.hashtag_results.insert(hashtag.to_string(), media);
        self
    }

    pub fn with_account_results(mut self, account: &str, media: Vec<RawMedia>) -> Self {
        self.account_results.insert(account.to_string(), media);
        self
    }

    pub fn with_media(mut self, detail: MediaDetail) -> Self {
        self.media.insert(detail.media_id.clone(), detail);
        self
    }

    pub fn failing_on_hashtag(mut self, hashtag: &str, error: SourceError) -> Self {
        self.hashtag_failures.insert(hashtag.to_string(), error);
        self
    }

    pub fn failing_on_fetch(mut self, id: &str, error: SourceError) -> Self {
        self.fetch_failures.insert(id.to_string(), error);
        self
    }
}

#[async_trait]
impl ImageApi for MockImageApi {
    async fn search_hashtag(
        &self,
        hashtag: &str,
        _limit: u32,
    ) -> std::result::Result<Vec<RawMedia>, SourceError> {
        if let Some(error) = self.hashtag_failures.get(hashtag) {
            return Err(error.clone());
        }
        Ok(self.hashtag_results.get(hashtag).cloned().unwrap_or_default())
    }

    async fn recent_media(
        &self,
        account: &str,
        _limit: u32,
    ) -> std::result::Result<Vec<RawMedia>, SourceError> {
        Ok(self.account_results.get(account).cloned().unwrap_or_default())
    }

    async fn fetch_media(
        &self,
        media_id: &str,
    ) -> std::result::Result<Option<MediaDetail>, SourceError> {
        if let Some(error) = self.fetch_failures.get(media_id) {
            return Err(error.clone());
        }
        Ok(self.media.get(media_id).cloned())
    }
}

/// Mock video platform API.
#[derive(Default)]
pub struct MockVideoApi {
    search_results: Vec<RawVideo>,
    transcripts: HashMap<String, String>,
    query_failures: HashMap<String, SourceError>,
    fetch_failures: HashMap<String, SourceError>,
}

impl MockVideoApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_search_results(mut self, videos: Vec<RawVideo>) -> Self {
        self.search_results = videos;
        self
    }

    pub fn with_transcript(mut self, id: &str, transcript: &str) -> Self {
        self.transcripts.insert(id.to_string(), transcript.to_string());
        self
    }

    pub fn failing_on_query(mut self, query: &str, error: SourceError) -> Self {
        self.query_failures.insert(query.to_string(), error);
        self
    }

    pub fn failing_on_fetch(mut self, id: &str, error: SourceError) -> Self {
        self.fetch_failures.insert(id.to_string(), error);
        self
    }
}

#[async_trait]
impl VideoApi for MockVideoApi {
    async fn search(
        &self,
        query: &str,
        _lookback_days: u32,
        _limit: u32,
    ) -> std::result::Result<Vec<RawVideo>, SourceError> {
        if let Some(error) = self.query_failures.get(query) {
            return Err(error.clone());
        }
        Ok(self.search_results.clone())
    }

    async fn fetch_transcript(
        &self,
        id: &str,
    ) -> std::result::Result<Option<String>, SourceError> {
        if let Some(error) = self.fetch_failures.get(id) {
            return Err(error.clone());
        }
        Ok(self.transcripts.get(id).cloned())
    }
}

/// Mock news feed API.
#[derive(Default)]
pub struct MockNewsApi {
    search_results: Vec<RawHeadline>,
    articles: HashMap<String, String>,
    query_failures: HashMap<String, SourceError>,
}

impl MockNewsApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_search_results(mut self, headlines: Vec<RawHeadline>) -> Self {
        self.search_results = headlines;
        self
    }

    pub fn with_article(mut self, id: &str, body: &str) -> Self {
        self.articles.insert(id.to_string(), body.to_string());
        self
    }

    pub fn failing_on_query(mut self, query: &str, error: SourceError) -> Self {
        self.query_failures.insert(query.to_string(), error);
        self
    }
}

#[async_trait]
impl NewsApi for MockNewsApi {
    async fn search(
        &self,
        query: &str,
        _lookback_days: u32,
        _limit: u32,
    ) -> std::result::Result<Vec<RawHeadline>, SourceError> {
        if let Some(error) = self.query_failures.get(query) {
            return Err(error.clone());
        }
        Ok(self.search_results.clone())
    }

    async fn fetch_article(
        &self,
        id: &str,
    ) -> std::result::Result<Option<String>, SourceError> {
        Ok(self.articles.get(id).cloned())
    }
}
