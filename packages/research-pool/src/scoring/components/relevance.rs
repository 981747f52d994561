//! Relevance scoring: lexicon matches in title and content.
//!
//! Primary lexicon (product names and Latin equivalents) scores +2 per
//! unique concept capped at +6; secondary lexicon (wellness themes) scores
//! +1 per unique concept capped at +4. Concepts are grouped by first word
//! so synonym variants never double-count. Matching is case-insensitive
//! and word-boundary aware ("focus" does not match inside "hocus-pocus").

use crate::scoring::schemas::{ComponentScore, ScoringInput};

const PRIMARY_BONUS: f64 = 2.0;
const SECONDARY_BONUS: f64 = 1.0;
const MAX_PRIMARY_BONUS: f64 = 6.0;
const MAX_SECONDARY_BONUS: f64 = 4.0;
const MAX_SCORE: f64 = 10.0;

/// Default product lexicon: functional mushrooms with Latin names.
pub const DEFAULT_PRIMARY_KEYWORDS: [&str; 15] = [
    "lion's mane",
    "lions mane",
    "hericium erinaceus",
    "chaga",
    "inonotus obliquus",
    "reishi",
    "ganoderma lucidum",
    "cordyceps",
    "cordyceps sinensis",
    "cordyceps militaris",
    "shiitake",
    "lentinula edodes",
    "maitake",
    "grifola frondosa",
    "turkey tail",
];

/// Default wellness theme lexicon.
pub const DEFAULT_SECONDARY_KEYWORDS: [&str; 19] = [
    "cognitive",
    "brain",
    "memory",
    "focus",
    "mental clarity",
    "immunity",
    "immune",
    "immune system",
    "energy",
    "stamina",
    "vitality",
    "fatigue",
    "stress",
    "adaptogen",
    "adaptogenic",
    "cortisol",
    "sleep",
    "insomnia",
    "rest",
];

/// Configuration for relevance scoring.
#[derive(Debug, Clone)]
pub struct RelevanceConfig {
    pub primary_keywords: Vec<String>,
    pub secondary_keywords: Vec<String>,
}

impl Default for RelevanceConfig {
    fn default() -> Self {
        Self {
            primary_keywords: DEFAULT_PRIMARY_KEYWORDS.map(String::from).to_vec(),
            secondary_keywords: DEFAULT_SECONDARY_KEYWORDS.map(String::from).to_vec(),
        }
    }
}

/// Scores items by lexicon matches.
pub struct RelevanceScorer {
    primary: Vec<String>,
    secondary: Vec<String>,
}

impl RelevanceScorer {
    pub fn new(config: RelevanceConfig) -> Self {
        // Pre-lowercase so matching never re-allocates keywords.
        Self {
            primary: config
                .primary_keywords
                .iter()
                .map(|k| k.to_lowercase())
                .collect(),
            secondary: config
                .secondary_keywords
                .iter()
                .map(|k| k.to_lowercase())
                .collect(),
        }
    }

    pub fn score(&self, input: &ScoringInput<'_>) -> ComponentScore {
        let text = format!("{} {}", input.title, input.content).to_lowercase();

        let primary_matched = matched_concepts(&text, &self.primary);
        let secondary_matched = matched_concepts(&text, &self.secondary);

        let primary_bonus = (primary_matched.len() as f64 * PRIMARY_BONUS).min(MAX_PRIMARY_BONUS);
        let secondary_bonus =
            (secondary_matched.len() as f64 * SECONDARY_BONUS).min(MAX_SECONDARY_BONUS);
        let raw = (primary_bonus + secondary_bonus).min(MAX_SCORE);

        let mut notes = Vec::new();
        if !primary_matched.is_empty() {
            notes.push(format!(
                "Primary: {}",
                primary_matched[..primary_matched.len().min(3)].join(", ")
            ));
        }
        if !secondary_matched.is_empty() {
            notes.push(format!(
                "Secondary: {}",
                secondary_matched[..secondary_matched.len().min(3)].join(", ")
            ));
        }
        let notes = if notes.is_empty() {
            "No relevant keywords found".to_string()
        } else {
            notes.join("; ")
        };

        tracing::debug!(
            "relevance score {raw} (primary: {}, secondary: {})",
            primary_matched.len(),
            secondary_matched.len()
        );

        ComponentScore::new("relevance", raw, notes)
    }
}

/// Keywords matched in the text, one representative per concept.
/// The concept identifier is the keyword's first word.
fn matched_concepts(text: &str, keywords: &[String]) -> Vec<String> {
    let mut matched = Vec::new();
    let mut seen = std::collections::HashSet::new();
    for keyword in keywords {
        if contains_word(text, keyword) {
            let concept = keyword.split_whitespace().next().unwrap_or(keyword);
            if seen.insert(concept.to_string()) {
                matched.push(keyword.clone());
            }
        }
    }
    matched
}

/// Word-boundary substring match: the occurrence must not be flanked by
/// alphanumeric characters on either side.
fn contains_word(text: &str, keyword: &str) -> bool {
    if keyword.is_empty() {
        return false;
    }
    let mut start = 0;
    while let Some(pos) = text[start..].find(keyword) {
        let begin = start + pos;
        let end = begin + keyword.len();
        let left_ok = text[..begin]
            .chars()
            .next_back()
            .map_or(true, |c| !c.is_alphanumeric());
        let right_ok = text[end..]
            .chars()
            .next()
            .map_or(true, |c| !c.is_alphanumeric());
        if left_ok && right_ok {
            return true;
        }
        // Step one character past the failed match.
        start = begin
            + text[begin..]
                .chars()
                .next()
                .map_or(1, char::len_utf8);
    }
    false
}
