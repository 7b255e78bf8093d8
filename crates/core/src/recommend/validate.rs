use crate::domain::intent::{CampaignIntent, RawIntent, SportPreference};
use crate::recommend::error::{FieldError, IntentField, ValidationError};
use serde_json::Value;
use std::borrow::Cow;

pub const LOCATION_PREFIX_LEN: usize = 3;

/// Turns a posted form into a [`CampaignIntent`]. All five fields are checked; the error
/// carries every failure, not just the first.
pub fn validate(raw: &RawIntent) -> Result<CampaignIntent, ValidationError> {
    let mut errors = Vec::new();

    let budget = collect(
        &mut errors,
        IntentField::Budget,
        whole_number(raw.campaign_budget.as_ref()),
    );
    let duration_weeks = collect(
        &mut errors,
        IntentField::DurationWeeks,
        whole_number(raw.campaign_duration.as_ref()),
    );
    let location_prefix = collect(
        &mut errors,
        IntentField::LocationPrefix,
        location_prefix(raw.location.as_ref()),
    );
    let sport_preference = collect(
        &mut errors,
        IntentField::SportPreference,
        sport(raw.sports_preference.as_ref()),
    );
    let intended_impressions = collect(
        &mut errors,
        IntentField::IntendedImpressions,
        whole_number(raw.intended_impressions.as_ref()),
    );

    match (
        budget,
        duration_weeks,
        location_prefix,
        sport_preference,
        intended_impressions,
    ) {
        (
            Some(budget),
            Some(duration_weeks),
            Some(location_prefix),
            Some(sport_preference),
            Some(intended_impressions),
        ) if errors.is_empty() => Ok(CampaignIntent {
            budget,
            duration_weeks,
            location_prefix,
            sport_preference,
            intended_impressions,
        }),
        _ => Err(ValidationError { fields: errors }),
    }
}

fn collect<T>(
    errors: &mut Vec<FieldError>,
    field: IntentField,
    res: Result<T, String>,
) -> Option<T> {
    match res {
        Ok(v) => Some(v),
        Err(reason) => {
            errors.push(FieldError { field, reason });
            None
        }
    }
}

/// Form fields arrive as strings; integers sent by scripted clients are rendered to text so
/// both go through the same pattern check.
fn text(value: Option<&Value>) -> Result<Cow<'_, str>, String> {
    match value {
        None | Some(Value::Null) => Err("is required".to_string()),
        Some(Value::String(s)) => Ok(Cow::Borrowed(s.as_str())),
        Some(Value::Number(n)) if n.is_u64() || n.is_i64() => Ok(Cow::Owned(n.to_string())),
        Some(other) => Err(format!("must be a string (got {})", type_name(other))),
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn whole_number(value: Option<&Value>) -> Result<u64, String> {
    let s = text(value)?;
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
        return Err(format!("must be a whole number with no decimals (got {s:?})"));
    }
    s.parse::<u64>()
        .map_err(|_| format!("is out of range (got {s:?})"))
}

fn location_prefix(value: Option<&Value>) -> Result<String, String> {
    let s = text(value)?;
    if s.chars().count() != LOCATION_PREFIX_LEN || !s.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err(format!(
            "must be exactly {LOCATION_PREFIX_LEN} letters or digits, e.g. SW1 (got {s:?})"
        ));
    }
    Ok(s.into_owned())
}

fn sport(value: Option<&Value>) -> Result<SportPreference, String> {
    let s = text(value)?;
    s.parse::<SportPreference>()
        .map_err(|()| format!("must be one of Cricket, Football, Golf (got {s:?})"))
}
