//! Weight configuration for the composite scorer.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::{PoolError, Result};
use crate::models::ResearchSource;
use crate::scoring::components::{
    EngagementConfig, RecencyConfig, RelevanceConfig, SourceQualityConfig,
};

/// Weights must sum to 1.0 within this tolerance.
const WEIGHT_SUM_TOLERANCE: f64 = 1e-3;

/// Relative importance of each scoring component.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoringWeights {
    pub relevance: f64,
    pub recency: f64,
    pub source_quality: f64,
    pub engagement: f64,
    pub compliance: f64,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            relevance: 0.25,
            recency: 0.20,
            source_quality: 0.25,
            engagement: 0.20,
            compliance: 0.10,
        }
    }
}

impl ScoringWeights {
    /// Validate that each weight is within [0, 1] and the set sums to 1.0.
    pub fn validate(&self) -> Result<()> {
        for (name, value) in [
            ("relevance", self.relevance),
            ("recency", self.recency),
            ("source_quality", self.source_quality),
            ("engagement", self.engagement),
            ("compliance", self.compliance),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(PoolError::validation(
                    "weights",
                    format!("weight '{name}' must be within [0, 1], got {value}"),
                ));
            }
        }
        let total =
            self.relevance + self.recency + self.source_quality + self.engagement + self.compliance;
        if (total - 1.0).abs() > WEIGHT_SUM_TOLERANCE {
            return Err(PoolError::validation(
                "weights",
                format!("weights must sum to 1.0, got {total:.3}"),
            ));
        }
        Ok(())
    }
}

/// Full configuration for the scoring engine: default weights, per-source
/// overrides, and component settings.
#[derive(Debug, Clone, Default)]
pub struct ScoringConfig {
    pub weights: ScoringWeights,
    pub source_overrides: HashMap<ResearchSource, ScoringWeights>,
    pub relevance: RelevanceConfig,
    pub recency: RecencyConfig,
    pub source_quality: SourceQualityConfig,
    pub engagement: EngagementConfig,
}

impl ScoringConfig {
    /// Validate default weights and every override.
    pub fn validate(&self) -> Result<()> {
        self.weights.validate()?;
        for weights in self.source_overrides.values() {
            weights.validate()?;
        }
        Ok(())
    }

    /// Weights for a source: its override when present, else the default.
    pub fn weights_for(&self, source: ResearchSource) -> ScoringWeights {
        self.source_overrides
            .get(&source)
            .copied()
            .unwrap_or(self.weights)
    }
}
