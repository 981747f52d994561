//! In-memory Research Pool for testing and development.
//!
//! Keeps every item in a `RwLock`ed map and evaluates filters by scan.
//! At the contractual pool size (10^4 items) a full scan plus sort is well
//! inside the 500 ms latency budget, so no secondary indexes are kept.
//! Full-text search mirrors the PostgreSQL behavior: a lexeme bag over
//! `title + content`, conjunctive term matching, term-frequency rank.

use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};
use std::sync::RwLock;

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use crate::error::{PoolError, Result};
use crate::models::{ComplianceStatus, ResearchItem, MIN_SCORE};
use crate::repository::{QueryFilters, ResearchPool, SortKey};
use crate::schemas::{ResearchItemDraft, ResearchItemPatch};

/// Words too common to carry search signal.
const STOPWORDS: [&str; 16] = [
    "a", "an", "and", "are", "as", "at", "be", "for", "in", "is", "of", "on", "or", "the", "to",
    "with",
];

/// In-memory pool. Data is lost on drop; not for production use.
#[derive(Default)]
pub struct MemoryPool {
    items: RwLock<HashMap<Uuid, ResearchItem>>,
}

impl MemoryPool {
    /// Create an empty pool.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored items.
    pub fn len(&self) -> usize {
        self.items.read().unwrap().len()
    }

    /// True when the pool holds no items.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Remove all items.
    pub fn clear(&self) {
        self.items.write().unwrap().clear();
    }
}

/// Lowercased alphanumeric tokens minus stopwords.
fn lexemes(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty() && !STOPWORDS.contains(t))
        .map(String::from)
        .collect()
}

/// Term-frequency rank of the query terms in the item's lexeme bag.
/// Returns `None` unless every query term is present (conjunctive match,
/// like `plainto_tsquery`).
fn rank(item: &ResearchItem, terms: &[String]) -> Option<f64> {
    let bag = lexemes(&format!("{} {}", item.title, item.content));
    let mut counts: HashMap<&str, u32> = HashMap::new();
    for lexeme in &bag {
        *counts.entry(lexeme.as_str()).or_default() += 1;
    }
    let mut total = 0u32;
    for term in terms {
        let count = counts.get(term.as_str()).copied().unwrap_or(0);
        if count == 0 {
            return None;
        }
        total += count;
    }
    Some(f64::from(total))
}

fn default_sort(a: &ResearchItem, b: &ResearchItem) -> Ordering {
    b.score
        .partial_cmp(&a.score)
        .unwrap_or(Ordering::Equal)
        .then_with(|| b.created_at.cmp(&a.created_at))
}

fn sort_items(items: &mut [ResearchItem], sort_by: SortKey) {
    match sort_by {
        SortKey::Date => items.sort_by(|a, b| b.created_at.cmp(&a.created_at)),
        // Relevance outside `search` falls back to the default sort.
        SortKey::Score | SortKey::Relevance => items.sort_by(default_sort),
    }
}

fn paginate(items: Vec<ResearchItem>, filters: &QueryFilters) -> Vec<ResearchItem> {
    items
        .into_iter()
        .skip(filters.offset)
        .take(filters.limit)
        .collect()
}

#[async_trait]
impl ResearchPool for MemoryPool {
    async fn add(&self, mut draft: ResearchItemDraft) -> Result<ResearchItem> {
        draft.validate()?;
        let item = draft.into_item(Utc::now());
        let mut items = self.items.write().unwrap();
        items.insert(item.id, item.clone());
        Ok(item)
    }

    async fn get(&self, id: Uuid) -> Result<Option<ResearchItem>> {
        Ok(self.items.read().unwrap().get(&id).cloned())
    }

    async fn query(&self, filters: &QueryFilters) -> Result<Vec<ResearchItem>> {
        let mut matched: Vec<ResearchItem> = self
            .items
            .read()
            .unwrap()
            .values()
            .filter(|item| filters.matches(item))
            .cloned()
            .collect();
        sort_items(&mut matched, filters.sort_by);
        Ok(paginate(matched, filters))
    }

    async fn search(&self, query: &str, filters: &QueryFilters) -> Result<Vec<ResearchItem>> {
        let terms = lexemes(query);
        if terms.is_empty() {
            return Ok(Vec::new());
        }
        let mut ranked: Vec<(f64, ResearchItem)> = self
            .items
            .read()
            .unwrap()
            .values()
            .filter(|item| filters.matches(item))
            .filter_map(|item| rank(item, &terms).map(|r| (r, item.clone())))
            .collect();
        ranked.sort_by(|(ra, a), (rb, b)| {
            rb.partial_cmp(ra)
                .unwrap_or(Ordering::Equal)
                .then_with(|| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal))
        });
        Ok(paginate(
            ranked.into_iter().map(|(_, item)| item).collect(),
            filters,
        ))
    }

    async fn count(&self, filters: &QueryFilters) -> Result<u64> {
        Ok(self
            .items
            .read()
            .unwrap()
            .values()
            .filter(|item| filters.matches(item))
            .count() as u64)
    }

    async fn update_score(&self, id: Uuid, score: f64) -> Result<()> {
        if !(crate::models::MIN_SCORE..=crate::models::MAX_SCORE).contains(&score) {
            return Err(PoolError::validation(
                "score",
                format!("must be within [0, 10], got {score}"),
            ));
        }
        let mut items = self.items.write().unwrap();
        let item = items.get_mut(&id).ok_or(PoolError::NotFound { id })?;
        if item.compliance_status == ComplianceStatus::Rejected && score != MIN_SCORE {
            return Err(PoolError::validation(
                "score",
                "rejected items must carry score 0",
            ));
        }
        item.score = score;
        Ok(())
    }

    async fn update_compliance(&self, id: Uuid, status: ComplianceStatus) -> Result<()> {
        let mut items = self.items.write().unwrap();
        let item = items.get_mut(&id).ok_or(PoolError::NotFound { id })?;
        item.compliance_status = status;
        if status == ComplianceStatus::Rejected {
            item.score = MIN_SCORE;
        }
        Ok(())
    }

    async fn update(&self, id: Uuid, mut patch: ResearchItemPatch) -> Result<Option<ResearchItem>> {
        patch.validate()?;
        let mut items = self.items.write().unwrap();
        match items.get_mut(&id) {
            Some(item) => {
                patch.apply(item);
                Ok(Some(item.clone()))
            }
            None => Ok(None),
        }
    }

    async fn bulk_add(&self, drafts: Vec<ResearchItemDraft>) -> Result<u64> {
        // Validate everything first so one bad draft rolls back the batch.
        let now = Utc::now();
        let mut prepared = Vec::with_capacity(drafts.len());
        for mut draft in drafts {
            draft.validate()?;
            prepared.push(draft.into_item(now));
        }
        let count = prepared.len() as u64;
        let mut items = self.items.write().unwrap();
        for item in prepared {
            items.insert(item.id, item);
        }
        Ok(count)
    }

    async fn delete(&self, id: Uuid) -> Result<bool> {
        Ok(self.items.write().unwrap().remove(&id).is_some())
    }

    async fn find_urls(&self, urls: &[String]) -> Result<HashSet<String>> {
        let wanted: HashSet<&str> = urls.iter().map(String::as_str).collect();
        Ok(self
            .items
            .read()
            .unwrap()
            .values()
            .filter(|item| wanted.contains(item.url.as_str()))
            .map(|item| item.url.clone())
            .collect())
    }
}
