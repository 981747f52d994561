//! Individual scoring components.
//!
//! Each component maps an item to a raw score on the 0-10 scale plus
//! explanatory notes; the composite scorer applies weights and the final
//! compliance adjustment.

mod compliance;
mod engagement;
mod recency;
mod relevance;
mod source_quality;

pub use compliance::{ComplianceAdjuster, ComplianceAdjustment};
pub use engagement::{EngagementConfig, EngagementScorer};
pub use recency::{RecencyConfig, RecencyScorer};
pub use relevance::{RelevanceConfig, RelevanceScorer};
pub use source_quality::{SourceQualityConfig, SourceQualityScorer};
