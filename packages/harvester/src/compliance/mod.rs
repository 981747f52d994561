//! Compliance gate for normalized research items.
//!
//! A phrase classifier maps free text onto the prohibited/borderline/
//! permitted taxonomy; local citation detection then relaxes the status
//! where a verifiable scientific reference exists. The result is advisory:
//! items stay in the pool regardless of status, and the scorer turns a
//! rejection into a zero score.

mod citations;
mod phrases;
mod validator;

pub use citations::{CitationDetector, CitationInfo};
pub use phrases::{
    FlaggedPhrase, LexiconClassifier, PhraseCategory, PhraseCheck, PhraseClassifier,
};
pub use validator::{ComplianceValidator, ValidationResult, ValidationStats};
