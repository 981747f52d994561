//! Scoring service: score stored items and persist the result.

use std::sync::Arc;

use uuid::Uuid;

use crate::error::{PoolError, Result};
use crate::repository::ResearchPool;
use crate::scoring::schemas::{ScoringInput, ScoringResult};
use crate::scoring::scorer::ItemScorer;

/// Re-scores items already in the pool.
///
/// Loads the item, runs the composite scorer, and writes the new score
/// back through the repository.
pub struct ScoringService {
    pool: Arc<dyn ResearchPool>,
    scorer: ItemScorer,
}

impl ScoringService {
    pub fn new(pool: Arc<dyn ResearchPool>, scorer: ItemScorer) -> Self {
        Self { pool, scorer }
    }

    /// Score an item and persist the result.
    pub async fn score_and_update(&self, id: Uuid) -> Result<ScoringResult> {
        let item = self
            .pool
            .get(id)
            .await?
            .ok_or(PoolError::NotFound { id })?;

        let result = self.scorer.calculate(&ScoringInput::from_item(&item));
        self.pool.update_score(id, result.final_score).await?;

        tracing::info!("scored and updated item {id}: {}", result.final_score);
        Ok(result)
    }

    /// Score an item without touching storage (preview scoring).
    pub fn score_item(&self, input: &ScoringInput<'_>) -> ScoringResult {
        self.scorer.calculate(input)
    }
}
