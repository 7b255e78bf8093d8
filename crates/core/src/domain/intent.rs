use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SportPreference {
    Cricket,
    Football,
    Golf,
}

impl SportPreference {
    pub const ALL: [SportPreference; 3] = [Self::Cricket, Self::Football, Self::Golf];

    /// Catalog value, matched case-sensitively against `sport_preference`.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Cricket => "Cricket",
            Self::Football => "Football",
            Self::Golf => "Golf",
        }
    }
}

impl fmt::Display for SportPreference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SportPreference {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|sport| sport.as_str() == s)
            .ok_or(())
    }
}

/// A fully validated campaign intent. Only produced by
/// [`crate::recommend::validate::validate`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CampaignIntent {
    pub budget: u64,
    pub duration_weeks: u64,
    pub location_prefix: String,
    pub sport_preference: SportPreference,
    pub intended_impressions: u64,
}

/// Intent as posted by the campaign form. Every field is optional and untyped so that the
/// validator can report all problems at once instead of failing on the first bad key.
///
/// Deserializes from a JSON object only; arrays and scalars are rejected.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RawIntent {
    #[serde(rename = "campaignBudget")]
    pub campaign_budget: Option<Value>,
    #[serde(rename = "campaignDuration")]
    pub campaign_duration: Option<Value>,
    pub location: Option<Value>,
    #[serde(rename = "sportsPreference")]
    pub sports_preference: Option<Value>,
    #[serde(rename = "intendedImpressions")]
    pub intended_impressions: Option<Value>,
}

impl<'de> Deserialize<'de> for RawIntent {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Map::<String, Value>::deserialize(deserializer).map(Self::from_object)
    }
}

impl RawIntent {
    /// Picks the form keys out of a posted object. Unknown keys are ignored; `null` counts
    /// as missing.
    pub fn from_object(mut object: Map<String, Value>) -> Self {
        let mut take = |key: &str| object.remove(key).filter(|v| !v.is_null());
        Self {
            campaign_budget: take("campaignBudget"),
            campaign_duration: take("campaignDuration"),
            location: take("location"),
            sports_preference: take("sportsPreference"),
            intended_impressions: take("intendedImpressions"),
        }
    }

    /// Convenience constructor for callers that already hold the form fields as text.
    pub fn from_text(
        campaign_budget: &str,
        campaign_duration: &str,
        location: &str,
        sports_preference: &str,
        intended_impressions: &str,
    ) -> Self {
        let text = |s: &str| Some(Value::String(s.to_string()));
        Self {
            campaign_budget: text(campaign_budget),
            campaign_duration: text(campaign_duration),
            location: text(location),
            sports_preference: text(sports_preference),
            intended_impressions: text(intended_impressions),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn sport_parses_exact_catalog_values_only() {
        assert_eq!("Golf".parse::<SportPreference>(), Ok(SportPreference::Golf));
        assert!("golf".parse::<SportPreference>().is_err());
        assert!("".parse::<SportPreference>().is_err());
        assert!("Tennis".parse::<SportPreference>().is_err());
    }

    #[test]
    fn raw_intent_reads_form_keys_and_tolerates_missing_ones() {
        let raw: RawIntent = serde_json::from_value(json!({
            "campaignBudget": "1000",
            "location": "SW1",
            "intendedImpressions": 10000,
        }))
        .unwrap();

        assert_eq!(raw.campaign_budget, Some(json!("1000")));
        assert_eq!(raw.location, Some(json!("SW1")));
        assert_eq!(raw.intended_impressions, Some(json!(10000)));
        assert!(raw.campaign_duration.is_none());
        assert!(raw.sports_preference.is_none());
    }

    #[test]
    fn raw_intent_only_reads_objects() {
        let positional = json!(["1000", "4", "SW1", "Football", "10000"]);
        assert!(serde_json::from_value::<RawIntent>(positional).is_err());
        assert!(serde_json::from_value::<RawIntent>(json!("1000")).is_err());
        assert!(serde_json::from_value::<RawIntent>(json!(null)).is_err());

        let raw: RawIntent = serde_json::from_value(json!({
            "sportsPreference": null,
            "extra": "ignored"
        }))
        .unwrap();
        assert!(raw.sports_preference.is_none());
    }
}
