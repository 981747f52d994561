//! End-to-end pipeline runs against in-memory mocks: outcome
//! classification, partial failure, rate limiting, idempotence, and
//! cancellation.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tokio_util::sync::CancellationToken;

use harvester::sources::aggregator::{
    AggregatorApi, AggregatorConfig, AggregatorProfile, PostDetail, RawPost,
};
use harvester::sources::biomed::{BiomedConfig, BiomedProfile, RawArticle};
use harvester::testing::{MockAggregatorApi, MockBiomedApi, MockLlm};
use harvester::{
    ComplianceValidator, LexiconClassifier, PipelineOutcome, ResearchPipeline, SourceError,
};
use research_pool::{ComplianceStatus, ItemScorer, MemoryPool, QueryFilters, ResearchPool};

fn post(id: &str, title: &str) -> RawPost {
    RawPost {
        id: id.into(),
        subspace: "nootropics".into(),
        title: title.into(),
        upvotes: 50,
        created_at: Utc::now(),
        permalink: format!("/p/{id}"),
    }
}

fn detail(id: &str, title: &str, body: &str) -> PostDetail {
    PostDetail {
        id: id.into(),
        subspace: "nootropics".into(),
        title: title.into(),
        body: body.into(),
        author: "user1".into(),
        upvotes: 50,
        upvote_ratio: 0.96,
        comment_count: 4,
        created_at: Utc::now(),
        permalink: format!("/p/{id}"),
        removed: false,
    }
}

fn aggregator_pipeline(
    client: MockAggregatorApi,
    pool: Arc<MemoryPool>,
) -> ResearchPipeline<AggregatorProfile, LexiconClassifier> {
    let config = AggregatorConfig::new(
        vec!["nootropics".into()],
        vec!["chaga".into()],
        "https://agg.example",
    );
    let profile = AggregatorProfile::new(config, Arc::new(client) as Arc<dyn AggregatorApi>)
        .expect("valid config");
    ResearchPipeline::new(
        profile,
        ComplianceValidator::new(LexiconClassifier::new()),
        ItemScorer::default(),
        pool,
    )
}

#[tokio::test]
async fn full_run_publishes_and_completes() {
    let pool = Arc::new(MemoryPool::new());
    let client = MockAggregatorApi::new()
        .with_search_results(vec![post("a", "Chaga results"), post("b", "Reishi notes")])
        .with_post(detail("a", "Chaga results", "Chaga tea gave me steady energy"))
        .with_post(detail("b", "Reishi notes", "Reishi before bed, slept well"));

    let result = aggregator_pipeline(client, pool.clone()).run().await;

    assert_eq!(result.outcome, PipelineOutcome::Complete);
    assert_eq!(result.stats.found, 2);
    assert_eq!(result.stats.published, 2);
    assert_eq!(result.stats.failed, 0);
    assert!(!result.retry_scheduled);
    assert_eq!(result.published_ids.len(), 2);
    assert_eq!(pool.count(&QueryFilters::new()).await.unwrap(), 2);
}

#[tokio::test]
async fn partial_failure_publishes_the_survivors() {
    // First item's detail fetch fails transiently; second succeeds.
    let pool = Arc::new(MemoryPool::new());
    let client = MockAggregatorApi::new()
        .with_search_results(vec![post("a", "Chaga results"), post("b", "Reishi notes")])
        .failing_on_fetch("a", SourceError::Transient("timeout".into()))
        .with_post(detail("b", "Reishi notes", "Reishi before bed, slept well"));

    let result = aggregator_pipeline(client, pool.clone()).run().await;

    assert_eq!(result.outcome, PipelineOutcome::Partial);
    assert_eq!(result.stats.published, 1);
    assert!(result.stats.failed >= 1);
    assert!(!result.retry_scheduled);
    assert_eq!(result.published_ids.len(), 1);
}

#[tokio::test]
async fn rate_limited_scan_reports_retry_hint() {
    let pool = Arc::new(MemoryPool::new());
    let client = MockAggregatorApi::new().failing_on_query(
        "chaga",
        SourceError::RateLimited {
            retry_after: Some(Duration::from_secs(45)),
        },
    );

    let result = aggregator_pipeline(client, pool).run().await;

    assert_eq!(result.outcome, PipelineOutcome::RateLimited);
    assert_eq!(result.retry_after, Some(Duration::from_secs(45)));
    assert!(result.retry_scheduled);
    assert!(result.published_ids.is_empty());
}

#[tokio::test]
async fn empty_scan_is_incomplete_with_retry() {
    let pool = Arc::new(MemoryPool::new());
    let client = MockAggregatorApi::new().with_search_results(vec![]);

    let result = aggregator_pipeline(client, pool).run().await;

    assert_eq!(result.outcome, PipelineOutcome::Incomplete);
    assert!(result.retry_scheduled);
    assert_eq!(result.stats.published, 0);
}

#[tokio::test]
async fn auth_failure_is_a_failed_outcome() {
    let pool = Arc::new(MemoryPool::new());
    let client = MockAggregatorApi::new()
        .failing_on_query("chaga", SourceError::Auth("credentials expired".into()));

    let result = aggregator_pipeline(client, pool).run().await;

    assert_eq!(result.outcome, PipelineOutcome::Failed);
    assert!(result.retry_scheduled);
    let summary = result.error.unwrap();
    assert!(summary.starts_with("source_auth:"), "summary: {summary}");
    // The safe description carries the kind tag, not internal detail.
    assert!(!summary.contains("stack"));
}

#[tokio::test]
async fn second_run_with_same_upstream_publishes_nothing() {
    let pool = Arc::new(MemoryPool::new());
    let build = || {
        MockAggregatorApi::new()
            .with_search_results(vec![post("a", "Chaga results")])
            .with_post(detail("a", "Chaga results", "Chaga tea gave me steady energy"))
    };

    let first = aggregator_pipeline(build(), pool.clone()).run().await;
    assert_eq!(first.stats.published, 1);

    let second = aggregator_pipeline(build(), pool.clone()).run().await;
    assert_eq!(second.outcome, PipelineOutcome::Complete);
    assert_eq!(second.stats.published, 0);
    assert_eq!(pool.count(&QueryFilters::new()).await.unwrap(), 1);
}

#[tokio::test]
async fn pre_cancelled_pipeline_unwinds_incomplete() {
    let pool = Arc::new(MemoryPool::new());
    let client = MockAggregatorApi::new()
        .with_search_results(vec![post("a", "Chaga results")])
        .with_post(detail("a", "Chaga results", "Chaga tea gave me steady energy"));

    let cancel = CancellationToken::new();
    cancel.cancel();
    let result = aggregator_pipeline(client, pool.clone())
        .with_cancellation(cancel)
        .run()
        .await;

    assert_eq!(result.outcome, PipelineOutcome::Incomplete);
    assert!(result.retry_scheduled);
    assert_eq!(pool.count(&QueryFilters::new()).await.unwrap(), 0);
}

#[tokio::test]
async fn rejected_items_are_published_with_zero_score() {
    let pool = Arc::new(MemoryPool::new());
    let client = MockAggregatorApi::new()
        .with_search_results(vec![post("a", "Miracle thread")])
        .with_post(detail(
            "a",
            "Miracle thread",
            "Chaga cures everything, no citation needed",
        ));

    let result = aggregator_pipeline(client, pool.clone()).run().await;
    assert_eq!(result.outcome, PipelineOutcome::Complete);
    assert_eq!(result.stats.published, 1);

    let items = pool.query(&QueryFilters::new()).await.unwrap();
    assert_eq!(items[0].compliance_status, ComplianceStatus::Rejected);
    assert_eq!(items[0].score, 0.0);
}

#[tokio::test]
async fn biomed_run_scores_a_strong_rct_highly() {
    let pool = Arc::new(MemoryPool::new());
    let article = RawArticle {
        article_id: "12345".into(),
        title: "Lion's mane and memory: a randomized trial".into(),
        abstract_text:
            "A 12-week randomized controlled trial (n=77) of lion's mane extract \
             found improved memory and focus scores versus placebo."
                .into(),
        authors: vec!["Author A".into()],
        journal: "J Cognitive Res".into(),
        pub_date: Some(Utc::now()),
        doi: Some("10.1000/jcr.2024".into()),
        publication_types: vec!["Randomized Controlled Trial".into()],
        citation_count: Some(30),
    };
    let client = MockBiomedApi::new()
        .with_search_results("hericium erinaceus", vec!["12345"])
        .with_article(article);
    let llm = MockLlm::new()
        .with_response(
            r#"{"compound_studied": "lion's mane",
                "effect_measured": "memory",
                "key_findings": "Memory scores improved significantly.",
                "study_strength": "strong",
                "content_potential": ["citation_worthy"]}"#,
        )
        .with_response(
            r#"{"content_potential": ["citation_only"],
                "usage_guidance": "Cite with the article link.",
                "can_cite_study": true,
                "can_make_claim": false}"#,
        );

    let config = BiomedConfig::new(
        vec!["hericium erinaceus".into()],
        "https://lit.example/articles",
    );
    let profile = BiomedProfile::new(config, Arc::new(client), Arc::new(llm)).unwrap();
    let pipeline = ResearchPipeline::new(
        profile,
        ComplianceValidator::new(LexiconClassifier::new()),
        ItemScorer::default(),
        pool.clone(),
    );

    let result = pipeline.run().await;
    assert_eq!(result.outcome, PipelineOutcome::Complete);
    assert_eq!(result.stats.analyzed, 1);
    assert_eq!(result.stats.published, 1);

    let items = pool.query(&QueryFilters::new()).await.unwrap();
    let item = &items[0];
    assert_eq!(item.compliance_status, ComplianceStatus::Compliant);
    assert!(item.score >= 8.0, "expected >= 8, got {}", item.score);
    assert_eq!(
        item.source_metadata.get("study_type").unwrap().as_str(),
        Some("rct")
    );
}
