//! Scientific citation detection.
//!
//! Pure regex work over content text plus the designated metadata keys
//! `doi` and `pmid`. A detected citation lets the validator downgrade a
//! rejection to a warning: the study can be referenced even where the
//! claim cannot be restated.

use regex::Regex;
use serde::{Deserialize, Serialize};

use research_pool::Metadata;

/// Citation detection result.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CitationInfo {
    pub has_doi: bool,
    pub has_pmid: bool,
    pub has_url: bool,
    pub doi: Option<String>,
    pub pmid: Option<String>,
    pub url: Option<String>,
}

impl CitationInfo {
    /// True when any citation form is present.
    pub fn has_citation(&self) -> bool {
        self.has_doi || self.has_pmid || self.has_url
    }
}

/// Compiled citation patterns. Build once and share.
pub struct CitationDetector {
    doi: Regex,
    pmid: Regex,
    scientific_urls: Vec<Regex>,
}

impl Default for CitationDetector {
    fn default() -> Self {
        Self::new()
    }
}

impl CitationDetector {
    pub fn new() -> Self {
        // Fixed literals; compilation cannot fail.
        Self {
            doi: Regex::new(r"10\.\d{4,}/\S+").expect("valid DOI pattern"),
            pmid: Regex::new(r"(?i)PMID[:\s]*(\d{7,})").expect("valid PMID pattern"),
            scientific_urls: [
                r"pubmed\.ncbi\.nlm\.nih\.gov/\d+",
                r"doi\.org/10\.\d{4,}",
                r"ncbi\.nlm\.nih\.gov/pmc/articles/PMC\d+",
            ]
            .into_iter()
            .map(|p| Regex::new(p).expect("valid scientific URL pattern"))
            .collect(),
        }
    }

    /// Detect citations in text and in the designated metadata keys.
    pub fn detect(&self, text: &str, metadata: &Metadata) -> CitationInfo {
        let mut info = CitationInfo::default();

        if let Some(m) = self.doi.find(text) {
            info.has_doi = true;
            info.doi = Some(m.as_str().to_string());
        }
        if let Some(captures) = self.pmid.captures(text) {
            info.has_pmid = true;
            info.pmid = captures.get(1).map(|m| m.as_str().to_string());
        }

        if let Some(doi) = metadata.get("doi").and_then(|v| v.as_str()) {
            if !doi.is_empty() {
                info.has_doi = true;
                info.doi.get_or_insert_with(|| doi.to_string());
            }
        }
        if let Some(pmid) = metadata.get("pmid") {
            let pmid = match pmid {
                serde_json::Value::String(s) if !s.is_empty() => Some(s.clone()),
                serde_json::Value::Number(n) => Some(n.to_string()),
                _ => None,
            };
            if let Some(pmid) = pmid {
                info.has_pmid = true;
                info.pmid.get_or_insert(pmid);
            }
        }

        for pattern in &self.scientific_urls {
            if let Some(m) = pattern.find(text) {
                info.has_url = true;
                info.url = Some(m.as_str().to_string());
                break;
            }
        }

        info
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn detect(text: &str) -> CitationInfo {
        CitationDetector::new().detect(text, &Metadata::new())
    }

    #[test]
    fn detects_inline_doi() {
        let info = detect("Study available at DOI: 10.1016/j.brainres.2024.01.001");
        assert!(info.has_doi);
        assert!(info.doi.as_ref().unwrap().starts_with("10.1016/"));
        assert!(info.has_citation());
    }

    #[test]
    fn detects_inline_pmid() {
        let info = detect("See PMID: 12345678 for details");
        assert!(info.has_pmid);
        assert_eq!(info.pmid.as_deref(), Some("12345678"));
    }

    #[test]
    fn short_pmid_is_ignored() {
        let info = detect("PMID: 123456");
        assert!(!info.has_pmid);
    }

    #[test]
    fn detects_scientific_urls() {
        for url in [
            "https://pubmed.ncbi.nlm.nih.gov/12345678/",
            "https://doi.org/10.1000/xyz123",
            "https://www.ncbi.nlm.nih.gov/pmc/articles/PMC1234567/",
        ] {
            let info = detect(&format!("reference: {url}"));
            assert!(info.has_url, "missed {url}");
        }
    }

    #[test]
    fn detects_doi_in_metadata() {
        let mut metadata = Metadata::new();
        metadata.insert("doi".into(), "10.1000/abc".into());
        let info = CitationDetector::new().detect("no inline citation", &metadata);
        assert!(info.has_doi);
        assert_eq!(info.doi.as_deref(), Some("10.1000/abc"));
    }

    #[test]
    fn detects_numeric_pmid_in_metadata() {
        let mut metadata = Metadata::new();
        metadata.insert("pmid".into(), 98765432.into());
        let info = CitationDetector::new().detect("plain text", &metadata);
        assert!(info.has_pmid);
        assert_eq!(info.pmid.as_deref(), Some("98765432"));
    }

    #[test]
    fn inline_doi_wins_over_metadata() {
        let mut metadata = Metadata::new();
        metadata.insert("doi".into(), "10.2000/meta".into());
        let info = CitationDetector::new().detect("text 10.1000/inline here", &metadata);
        assert_eq!(info.doi.as_deref(), Some("10.1000/inline"));
    }

    #[test]
    fn has_citation_is_a_disjunction() {
        assert!(!detect("no references here").has_citation());
        assert!(detect("10.1000/x").has_citation());
        assert!(detect("PMID 1234567").has_citation());
        assert!(detect("pubmed.ncbi.nlm.nih.gov/1").has_citation());
    }
}
