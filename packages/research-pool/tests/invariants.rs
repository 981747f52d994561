//! Property tests for the pool invariants that must survive arbitrary
//! input: tag normalization and draft validation.

use proptest::prelude::*;
use research_pool::{normalize_tags, ComplianceStatus, ResearchItemDraft, ResearchSource};

proptest! {
    #[test]
    fn normalized_tags_always_satisfy_the_tag_invariants(
        tags in proptest::collection::vec(".{0,60}", 0..30)
    ) {
        let normalized = normalize_tags(tags);
        prop_assert!(normalized.len() <= 10);
        let mut sorted = normalized.clone();
        sorted.sort();
        sorted.dedup();
        prop_assert_eq!(&sorted, &normalized, "tags must be sorted and deduplicated");
        for tag in &normalized {
            prop_assert!(tag.len() >= 2 && tag.len() <= 50);
            prop_assert!(tag.is_ascii());
            prop_assert_eq!(tag.to_lowercase(), tag.clone());
            prop_assert!(!tag.contains(' '));
        }
    }

    #[test]
    fn validated_drafts_always_carry_legal_scores(score in -5.0f64..15.0) {
        let mut draft = ResearchItemDraft::new(
            ResearchSource::News,
            "Title",
            "Body",
            "https://news.example/article",
        )
        .with_score(score);
        match draft.validate() {
            Ok(()) => prop_assert!((0.0..=10.0).contains(&draft.score)),
            Err(_) => prop_assert!(!(0.0..=10.0).contains(&score)),
        }
    }

    #[test]
    fn rejected_drafts_only_validate_with_zero_score(score in 0.0f64..10.0) {
        let mut draft = ResearchItemDraft::new(
            ResearchSource::News,
            "Title",
            "Body",
            "https://news.example/article",
        )
        .with_score(score)
        .with_compliance(ComplianceStatus::Rejected);
        let valid = draft.validate().is_ok();
        prop_assert_eq!(valid, score == 0.0);
    }
}
