//! Composite scoring engine for research items.
//!
//! Combines four component scores using a weighted average, adds a neutral
//! compliance base contribution, then applies the non-linear compliance
//! adjustment:
//!
//! ```text
//! weighted = relevance*w_rel + recency*w_rec + source_quality*w_sq
//!          + engagement*w_eng + 5.0*w_comp
//!
//! COMPLIANT => min(weighted + 1, 10)
//! WARNING   => weighted
//! REJECTED  => 0
//! ```
//!
//! Weights default to relevance 25%, recency 20%, source quality 25%,
//! engagement 20%, compliance 10%, with validated per-source overrides.

pub mod components;
mod config;
mod schemas;
mod scorer;
mod service;

pub use config::{ScoringConfig, ScoringWeights};
pub use schemas::{ComponentScore, ScoringInput, ScoringResult};
pub use scorer::ItemScorer;
pub use service::ScoringService;

/// Round to two decimal places for storage and presentation.
pub(crate) fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
