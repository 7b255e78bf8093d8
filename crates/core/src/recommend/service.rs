use crate::catalog::CandidateSource;
use crate::domain::intent::{CampaignIntent, RawIntent};
use crate::domain::inventory::RecommendationResult;
use crate::recommend::error::RecommendError;
use crate::recommend::rank::rank;
use crate::recommend::score::{score_all, ScoreWeights};
use crate::recommend::validate::validate;
use std::sync::Arc;

/// Validate, fetch, score, rank. Holds no per-request state, so one instance can serve
/// concurrent requests behind an `Arc`.
#[derive(Clone)]
pub struct RecommendationService {
    source: Arc<dyn CandidateSource>,
    weights: ScoreWeights,
}

impl RecommendationService {
    pub fn new(source: Arc<dyn CandidateSource>, weights: ScoreWeights) -> Self {
        Self { source, weights }
    }

    pub fn backend_name(&self) -> &'static str {
        self.source.backend_name()
    }

    /// Entry point for raw form input. An invalid intent never reaches the catalog.
    pub async fn recommend(&self, raw: &RawIntent) -> Result<RecommendationResult, RecommendError> {
        let intent = validate(raw)?;
        self.recommend_intent(&intent).await
    }

    pub async fn recommend_intent(
        &self,
        intent: &CampaignIntent,
    ) -> Result<RecommendationResult, RecommendError> {
        let candidates = self
            .source
            .fetch_by_sport_and_location(intent.sport_preference, &intent.location_prefix)
            .await?;

        if candidates.is_empty() {
            tracing::debug!(
                sport = %intent.sport_preference,
                location_prefix = %intent.location_prefix,
                "no catalog rows matched"
            );
            return Ok(RecommendationResult::empty());
        }

        let candidates_len = candidates.len();
        let products = rank(score_all(intent, candidates, &self.weights));

        tracing::debug!(
            backend = self.source.backend_name(),
            candidates_len,
            returned = products.len(),
            "ranked recommendations"
        );

        Ok(RecommendationResult { products })
    }
}

impl std::fmt::Debug for RecommendationService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RecommendationService")
            .field("backend", &self.source.backend_name())
            .field("weights", &self.weights)
            .finish()
    }
}
