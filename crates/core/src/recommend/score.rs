use crate::domain::intent::CampaignIntent;
use crate::domain::inventory::{InventoryRecord, ScoredRecord};
use anyhow::ensure;

pub const DEFAULT_BUDGET_WEIGHT: f64 = 1.0;
// Weeks are small integers, so a one-week miss has to outweigh large currency gaps.
pub const DEFAULT_DURATION_WEIGHT: f64 = 100.0;
// Impression counts run orders of magnitude above budgets.
pub const DEFAULT_IMPRESSIONS_WEIGHT: f64 = 0.1;

/// Weights of the three distance components. Policy constants, not derived values.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoreWeights {
    pub budget: f64,
    pub duration: f64,
    pub impressions: f64,
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self {
            budget: DEFAULT_BUDGET_WEIGHT,
            duration: DEFAULT_DURATION_WEIGHT,
            impressions: DEFAULT_IMPRESSIONS_WEIGHT,
        }
    }
}

impl ScoreWeights {
    pub fn from_env() -> anyhow::Result<Self> {
        let mut out = Self::default();

        if let Some(w) = weight_from_env("SCORE_BUDGET_WEIGHT")? {
            out.budget = w;
        }
        if let Some(w) = weight_from_env("SCORE_DURATION_WEIGHT")? {
            out.duration = w;
        }
        if let Some(w) = weight_from_env("SCORE_IMPRESSIONS_WEIGHT")? {
            out.impressions = w;
        }

        out.validate()?;
        Ok(out)
    }

    /// Negative or non-finite weights would break `score >= 0`.
    pub fn validate(&self) -> anyhow::Result<()> {
        for (name, w) in [
            ("budget", self.budget),
            ("duration", self.duration),
            ("impressions", self.impressions),
        ] {
            ensure!(
                w.is_finite() && w >= 0.0,
                "{name} weight must be a finite number >= 0 (got {w})"
            );
        }
        Ok(())
    }
}

fn weight_from_env(key: &str) -> anyhow::Result<Option<f64>> {
    let Ok(s) = std::env::var(key) else {
        return Ok(None);
    };
    let w = s
        .trim()
        .parse::<f64>()
        .map_err(|e| anyhow::anyhow!("{key} must be a number (got {s:?}): {e}"))?;
    Ok(Some(w))
}

/// Weighted distance between an intent and one record; lower is a better match.
///
/// The impressions target is the plain midpoint of the record's range, even when the
/// catalog row has `min_impressions > max_impressions`.
pub fn score(intent: &CampaignIntent, record: &InventoryRecord, weights: &ScoreWeights) -> f64 {
    let budget_distance = (intent.budget as f64 - record.min_campaign_budget).abs();
    let duration_distance = (intent.duration_weeks as f64 - record.recommended_duration_weeks).abs();
    let impressions_midpoint = (record.min_impressions + record.max_impressions) / 2.0;
    let impressions_distance = (intent.intended_impressions as f64 - impressions_midpoint).abs();

    budget_distance * weights.budget
        + duration_distance * weights.duration
        + impressions_distance * weights.impressions
}

pub fn score_all(
    intent: &CampaignIntent,
    records: Vec<InventoryRecord>,
    weights: &ScoreWeights,
) -> Vec<ScoredRecord> {
    records
        .into_iter()
        .map(|record| {
            let value = score(intent, &record, weights);
            ScoredRecord::new(record, value)
        })
        .collect()
}
