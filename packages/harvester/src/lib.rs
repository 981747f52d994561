//! # Harvester
//!
//! Per-source research ingestion pipelines feeding the Research Pool.
//!
//! ## Architecture
//!
//! ```text
//! [ResearchPipeline]  --drives-->  scan -> harvest -> (analyze)* -> normalize
//!                                                                       |
//!                                                             ComplianceValidator
//!                                                                       |
//!                                                                  ItemScorer
//!                                                                       |
//!                                                            Publisher -> Pool
//! ```
//!
//! One pipeline runs one source's full cycle. Source behavior is bundled
//! in a [`SourceProfile`] (aggregator, video, image, news, biomed); the
//! orchestrator itself is source-agnostic. Per-item failures never fail
//! a run: they are counted in [`PipelineStats`] and reflected in the
//! final [`PipelineOutcome`].
//!
//! External collaborators enter as traits: source clients (per-source
//! `*Api` traits), the LLM (`LlmClient`), and the phrase taxonomy
//! (`PhraseClassifier`). Mock implementations live in [`testing`].
//!
//! ## Modules
//!
//! - [`sources`] - per-source scanners, harvesters, analyzers, normalizers
//! - [`compliance`] - phrase gate, citation detection, status machine
//! - [`pipeline`] - the orchestrator and publisher
//! - [`ratelimit`] - sliding-window per-source rate limiting
//! - [`llm`] - the model seam and fence-tolerant JSON parsing
//! - [`testing`] - mocks for every external seam

pub mod compliance;
pub mod error;
pub mod llm;
pub mod pipeline;
pub mod ratelimit;
pub mod scan;
pub mod sources;
pub mod tags;
pub mod testing;
pub mod text;

pub use compliance::{
    CitationDetector, CitationInfo, ComplianceValidator, FlaggedPhrase, LexiconClassifier,
    PhraseCategory, PhraseCheck, PhraseClassifier, ValidationResult, ValidationStats,
};
pub use error::{ErrorKind, HarvestError, Result, SourceError};
pub use llm::{cap_prompt_input, parse_json_response, LlmClient, MAX_PROMPT_INPUT};
pub use pipeline::{
    PipelineOutcome, PipelineResult, PipelineStats, PublishOutcome, Publisher, ResearchPipeline,
};
pub use ratelimit::SourceRateLimiter;
pub use scan::{HarvestOutput, ScanOutput, ScanStats, TimeWindow};
pub use sources::SourceProfile;
