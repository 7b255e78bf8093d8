use crate::domain::intent::SportPreference;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

const SCORE_KEY: &str = "score";

/// One row of the sponsorship catalog. Read-only to the engine; display columns (`name`,
/// `description`, `imageUrl`, ...) are kept in `attributes` and serialized back unchanged,
/// nulls included.
///
/// No shape checks are applied here: a row with `min_impressions > max_impressions` is
/// accepted and scored as-is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InventoryRecord {
    pub id: i64,
    pub sport_preference: SportPreference,
    pub location_prefix: String,
    pub min_campaign_budget: f64,
    pub recommended_duration_weeks: f64,
    pub min_impressions: f64,
    pub max_impressions: f64,
    #[serde(flatten)]
    pub attributes: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredRecord {
    #[serde(flatten)]
    pub record: InventoryRecord,
    pub score: f64,
}

impl ScoredRecord {
    /// A catalog column named `score` is dropped so the computed score is the only one
    /// in the serialized row.
    pub fn new(mut record: InventoryRecord, score: f64) -> Self {
        record.attributes.remove(SCORE_KEY);
        Self { record, score }
    }
}

/// Best-first recommendations, at most [`crate::recommend::rank::TOP_K`] long.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RecommendationResult {
    pub products: Vec<ScoredRecord>,
}

impl RecommendationResult {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }
}
