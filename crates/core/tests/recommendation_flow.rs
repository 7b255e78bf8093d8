use pitchside_core::catalog::{CandidateSource, InMemoryCandidateSource, SourceUnavailable};
use pitchside_core::domain::intent::{RawIntent, SportPreference};
use pitchside_core::domain::inventory::InventoryRecord;
use pitchside_core::recommend::{IntentField, RecommendError, RecommendationService, ScoreWeights, TOP_K};
use serde_json::json;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

fn record(id: i64, location: &str, budget: f64, weeks: f64, min_imp: f64, max_imp: f64) -> InventoryRecord {
    serde_json::from_value(json!({
        "id": id,
        "sport_preference": "Football",
        "location_prefix": location,
        "min_campaign_budget": budget,
        "recommended_duration_weeks": weeks,
        "min_impressions": min_imp,
        "max_impressions": max_imp,
        "name": format!("Product {id}"),
    }))
    .unwrap()
}

fn intent() -> RawIntent {
    RawIntent::from_text("1000", "4", "SW1", "Football", "10000")
}

/// Counts calls and always fails.
#[derive(Default)]
struct DownSource {
    calls: AtomicUsize,
}

#[async_trait::async_trait]
impl CandidateSource for DownSource {
    fn backend_name(&self) -> &'static str {
        "down"
    }

    async fn fetch_by_sport_and_location(
        &self,
        _sport: SportPreference,
        _location_prefix: &str,
    ) -> Result<Vec<InventoryRecord>, SourceUnavailable> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(SourceUnavailable {
            backend: "down",
            detail: "connection refused".to_string(),
        })
    }
}

fn service(records: Vec<InventoryRecord>) -> RecommendationService {
    RecommendationService::new(
        Arc::new(InMemoryCandidateSource::new(records)),
        ScoreWeights::default(),
    )
}

#[tokio::test]
async fn worked_example_ranks_a_before_b() {
    let svc = service(vec![
        record(2, "SW1", 1000.0, 6.0, 9000.0, 11000.0),
        record(1, "SW1", 900.0, 4.0, 8000.0, 12000.0),
    ]);

    let result = svc.recommend(&intent()).await.unwrap();
    let got: Vec<(i64, f64)> = result
        .products
        .iter()
        .map(|p| (p.record.id, p.score))
        .collect();
    assert_eq!(got, vec![(1, 100.0), (2, 200.0)]);
}

#[tokio::test]
async fn returns_at_most_top_k_in_score_order() {
    let records = (0..12)
        .map(|i| record(i, "SW1", 1000.0 + (i as f64) * 37.0 % 400.0, 4.0, 10000.0, 10000.0))
        .collect();
    let result = service(records).recommend(&intent()).await.unwrap();

    assert_eq!(result.len(), TOP_K);
    assert!(result.products.windows(2).all(|w| w[0].score <= w[1].score));
}

#[tokio::test]
async fn only_exact_location_matches_are_candidates() {
    let svc = service(vec![
        record(1, "SW1A", 1000.0, 4.0, 10000.0, 10000.0),
        record(2, "sw1", 1000.0, 4.0, 10000.0, 10000.0),
    ]);

    let result = svc.recommend(&intent()).await.unwrap();
    assert!(result.is_empty());
    assert_eq!(serde_json::to_value(&result).unwrap(), json!({ "products": [] }));
}

#[tokio::test]
async fn tied_scores_keep_catalog_order() {
    let svc = service(vec![
        record(30, "SW1", 1100.0, 4.0, 10000.0, 10000.0),
        record(10, "SW1", 900.0, 4.0, 10000.0, 10000.0),
        record(20, "SW1", 1100.0, 4.0, 10000.0, 10000.0),
    ]);

    let result = svc.recommend(&intent()).await.unwrap();
    let ids: Vec<i64> = result.products.iter().map(|p| p.record.id).collect();
    assert_eq!(ids, vec![30, 10, 20]);
}

#[tokio::test]
async fn invalid_intent_never_reaches_the_source() {
    let source = Arc::new(DownSource::default());
    let svc = RecommendationService::new(source.clone(), ScoreWeights::default());

    let mut raw = intent();
    raw.campaign_budget = Some(json!("12.5"));
    raw.location = Some(json!("SW"));

    match svc.recommend(&raw).await {
        Err(RecommendError::Validation(err)) => {
            assert_eq!(
                err.invalid_fields(),
                vec![IntentField::Budget, IntentField::LocationPrefix]
            );
        }
        other => panic!("expected validation error, got {other:?}"),
    }
    assert_eq!(source.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn source_failure_is_surfaced_without_retry() {
    let source = Arc::new(DownSource::default());
    let svc = RecommendationService::new(source.clone(), ScoreWeights::default());

    match svc.recommend(&intent()).await {
        Err(RecommendError::SourceUnavailable(err)) => {
            assert_eq!(err.backend, "down");
            assert!(err.to_string().contains("connection refused"));
        }
        other => panic!("expected source error, got {other:?}"),
    }
    assert_eq!(source.calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn malformed_impression_ranges_are_scored_not_dropped() {
    let svc = RecommendationService::new(
        Arc::new(InMemoryCandidateSource::new(vec![
            record(1, "SW1", 1000.0, 4.0, 12000.0, 8000.0),
            record(2, "SW1", 1000.0, 4.0, 8000.0, 12000.0),
        ])),
        ScoreWeights::default(),
    );

    let result = svc.recommend(&intent()).await.unwrap();
    assert_eq!(result.len(), 2);
    assert!(result.products.iter().all(|p| p.score == 0.0));
    assert_eq!(result.products[0].record.id, 1);
}

#[tokio::test]
async fn custom_weights_change_the_ranking() {
    let records = vec![
        record(1, "SW1", 900.0, 4.0, 10000.0, 10000.0),
        record(2, "SW1", 1000.0, 6.0, 10000.0, 10000.0),
    ];
    let duration_blind = ScoreWeights {
        budget: 1.0,
        duration: 0.0,
        impressions: 0.1,
    };

    let default_ids: Vec<i64> = service(records.clone())
        .recommend(&intent())
        .await
        .unwrap()
        .products
        .iter()
        .map(|p| p.record.id)
        .collect();
    let svc = RecommendationService::new(Arc::new(InMemoryCandidateSource::new(records)), duration_blind);
    let blind_ids: Vec<i64> = svc
        .recommend(&intent())
        .await
        .unwrap()
        .products
        .iter()
        .map(|p| p.record.id)
        .collect();

    assert_eq!(default_ids, vec![1, 2]);
    assert_eq!(blind_ids, vec![2, 1]);
}
