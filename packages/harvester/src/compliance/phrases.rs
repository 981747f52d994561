//! Phrase classification against the health-claims taxonomy.
//!
//! The classifier is a seam: the validator only depends on the
//! [`PhraseClassifier`] trait. [`LexiconClassifier`] is the default
//! implementation, matching curated prohibited and borderline phrase
//! lists case-insensitively. Prohibited phrases assert treatment,
//! prevention, or cure; borderline phrases imply physiological benefit
//! without asserting a medical outcome.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use research_pool::ComplianceStatus;

use crate::error::Result;

/// Classification of one flagged phrase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PhraseCategory {
    Prohibited,
    Borderline,
}

/// A phrase the classifier objected to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlaggedPhrase {
    pub phrase: String,
    pub category: PhraseCategory,
    /// Regulation clause backing the objection.
    pub regulation_ref: String,
}

/// Result of a phrase check over one text.
#[derive(Debug, Clone, PartialEq)]
pub struct PhraseCheck {
    /// Worst classification found: any prohibited phrase rejects, any
    /// borderline phrase warns, otherwise compliant.
    pub overall: ComplianceStatus,
    pub flagged: Vec<FlaggedPhrase>,
}

/// Classifies free text against the claims taxonomy.
#[async_trait]
pub trait PhraseClassifier: Send + Sync {
    async fn classify(&self, text: &str) -> Result<PhraseCheck>;
}

/// Phrases asserting treatment, prevention, or cure. Never permitted.
const PROHIBITED_PHRASES: [(&str, &str); 12] = [
    ("cures", "health claims regulation art. 7"),
    ("cure for", "health claims regulation art. 7"),
    ("treats", "health claims regulation art. 7"),
    ("treatment for", "health claims regulation art. 7"),
    ("heals", "health claims regulation art. 7"),
    ("prevents cancer", "disease risk claims art. 14"),
    ("fights cancer", "disease risk claims art. 14"),
    ("anti-cancer", "disease risk claims art. 14"),
    ("prevents disease", "disease risk claims art. 14"),
    ("reverses aging", "health claims regulation art. 7"),
    ("eliminates depression", "health claims regulation art. 10"),
    ("medically proven to cure", "health claims regulation art. 7"),
];

/// Phrases implying benefit without an authorized claim. Need review.
const BORDERLINE_PHRASES: [(&str, &str); 10] = [
    ("boosts immunity", "unauthorized function claim art. 10"),
    ("boosts your immune", "unauthorized function claim art. 10"),
    ("improves memory", "unauthorized function claim art. 10"),
    ("enhances focus", "unauthorized function claim art. 10"),
    ("improves cognition", "unauthorized function claim art. 10"),
    ("reduces stress", "unauthorized function claim art. 10"),
    ("reduces inflammation", "unauthorized function claim art. 10"),
    ("increases energy", "unauthorized function claim art. 10"),
    ("improves sleep", "unauthorized function claim art. 10"),
    ("clinically proven", "substantiation requirement art. 6"),
];

/// Default phrase classifier backed by static lexicons.
pub struct LexiconClassifier {
    prohibited: Vec<(String, String)>,
    borderline: Vec<(String, String)>,
}

impl Default for LexiconClassifier {
    fn default() -> Self {
        Self::new()
    }
}

impl LexiconClassifier {
    pub fn new() -> Self {
        let own = |list: &[(&str, &str)]| {
            list.iter()
                .map(|(p, r)| (p.to_string(), r.to_string()))
                .collect()
        };
        Self {
            prohibited: own(&PROHIBITED_PHRASES),
            borderline: own(&BORDERLINE_PHRASES),
        }
    }

    /// Build from custom phrase lists (phrase, regulation reference).
    pub fn with_lexicons(
        prohibited: Vec<(String, String)>,
        borderline: Vec<(String, String)>,
    ) -> Self {
        Self {
            prohibited: prohibited
                .into_iter()
                .map(|(p, r)| (p.to_lowercase(), r))
                .collect(),
            borderline: borderline
                .into_iter()
                .map(|(p, r)| (p.to_lowercase(), r))
                .collect(),
        }
    }

    fn scan(&self, text: &str) -> PhraseCheck {
        let lowered = text.to_lowercase();
        let mut flagged = Vec::new();

        for (phrase, regulation) in &self.prohibited {
            if lowered.contains(phrase.as_str()) {
                flagged.push(FlaggedPhrase {
                    phrase: phrase.clone(),
                    category: PhraseCategory::Prohibited,
                    regulation_ref: regulation.clone(),
                });
            }
        }
        for (phrase, regulation) in &self.borderline {
            if lowered.contains(phrase.as_str()) {
                flagged.push(FlaggedPhrase {
                    phrase: phrase.clone(),
                    category: PhraseCategory::Borderline,
                    regulation_ref: regulation.clone(),
                });
            }
        }

        let overall = if flagged
            .iter()
            .any(|f| f.category == PhraseCategory::Prohibited)
        {
            ComplianceStatus::Rejected
        } else if !flagged.is_empty() {
            ComplianceStatus::Warning
        } else {
            ComplianceStatus::Compliant
        };

        PhraseCheck { overall, flagged }
    }
}

#[async_trait]
impl PhraseClassifier for LexiconClassifier {
    async fn classify(&self, text: &str) -> Result<PhraseCheck> {
        Ok(self.scan(text))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn clean_text_is_compliant() {
        let check = LexiconClassifier::new()
            .classify("A study observed changes in cognition markers.")
            .await
            .unwrap();
        assert_eq!(check.overall, ComplianceStatus::Compliant);
        assert!(check.flagged.is_empty());
    }

    #[tokio::test]
    async fn borderline_phrase_warns() {
        let check = LexiconClassifier::new()
            .classify("This mushroom boosts immunity in winter")
            .await
            .unwrap();
        assert_eq!(check.overall, ComplianceStatus::Warning);
        assert_eq!(check.flagged.len(), 1);
        assert_eq!(check.flagged[0].category, PhraseCategory::Borderline);
    }

    #[tokio::test]
    async fn prohibited_phrase_rejects() {
        let check = LexiconClassifier::new()
            .classify("Chaga cures everything and boosts immunity")
            .await
            .unwrap();
        assert_eq!(check.overall, ComplianceStatus::Rejected);
        assert!(check
            .flagged
            .iter()
            .any(|f| f.category == PhraseCategory::Prohibited));
    }

    #[tokio::test]
    async fn matching_is_case_insensitive() {
        let check = LexiconClassifier::new()
            .classify("REISHI CURES INSOMNIA")
            .await
            .unwrap();
        assert_eq!(check.overall, ComplianceStatus::Rejected);
    }

    #[tokio::test]
    async fn flagged_phrases_carry_regulation_refs() {
        let check = LexiconClassifier::new()
            .classify("clinically proven results")
            .await
            .unwrap();
        assert!(check.flagged[0].regulation_ref.contains("art. 6"));
    }
}
