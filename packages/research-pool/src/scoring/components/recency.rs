//! Recency scoring: linear decay over a configurable window.
//!
//! `10 * (1 - days_old / decay_days)`, clamped to [0, 10]. Items created
//! today score 10; items at or beyond the decay window score 0. A missing
//! timestamp scores the neutral default of 5.

use chrono::Utc;

use crate::scoring::round2;
use crate::scoring::schemas::{ComponentScore, ScoringInput};

const MAX_SCORE: f64 = 10.0;
const MIN_SCORE: f64 = 0.0;
const MISSING_TIMESTAMP_SCORE: f64 = 5.0;
const SECONDS_PER_DAY: f64 = 86_400.0;

/// Configuration for recency scoring.
#[derive(Debug, Clone)]
pub struct RecencyConfig {
    /// Days until the score decays to zero.
    pub decay_days: f64,
}

impl Default for RecencyConfig {
    fn default() -> Self {
        Self { decay_days: 30.0 }
    }
}

/// Scores items by age.
pub struct RecencyScorer {
    config: RecencyConfig,
}

impl RecencyScorer {
    pub fn new(config: RecencyConfig) -> Self {
        Self { config }
    }

    pub fn score(&self, input: &ScoringInput<'_>) -> ComponentScore {
        let Some(created_at) = input.created_at else {
            tracing::warn!("item missing created_at, defaulting recency to 5");
            return ComponentScore::new(
                "recency",
                MISSING_TIMESTAMP_SCORE,
                "Missing discovery timestamp",
            );
        };

        let days_old = (Utc::now() - created_at).num_seconds() as f64 / SECONDS_PER_DAY;
        let raw = MAX_SCORE * (1.0 - days_old / self.config.decay_days);
        let raw = round2(raw.clamp(MIN_SCORE, MAX_SCORE));

        let notes = if days_old < 1.0 {
            "Created today (max recency)".to_string()
        } else if days_old >= self.config.decay_days {
            format!(
                "Created {} days ago (beyond {}-day window)",
                days_old as i64, self.config.decay_days as i64
            )
        } else {
            format!("Created {} days ago", days_old as i64)
        };

        ComponentScore::new("recency", raw, notes)
    }
}
