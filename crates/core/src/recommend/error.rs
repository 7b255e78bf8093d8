use crate::catalog::SourceUnavailable;
use std::fmt;

/// Intent fields, named by their form keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum IntentField {
    Budget,
    DurationWeeks,
    LocationPrefix,
    SportPreference,
    IntendedImpressions,
}

impl IntentField {
    pub fn key(self) -> &'static str {
        match self {
            Self::Budget => "campaignBudget",
            Self::DurationWeeks => "campaignDuration",
            Self::LocationPrefix => "location",
            Self::SportPreference => "sportsPreference",
            Self::IntendedImpressions => "intendedImpressions",
        }
    }
}

impl fmt::Display for IntentField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: IntentField,
    pub reason: String,
}

/// Every invalid field of a rejected intent, in form order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub fields: Vec<FieldError>,
}

impl ValidationError {
    pub fn contains(&self, field: IntentField) -> bool {
        self.fields.iter().any(|e| e.field == field)
    }

    pub fn invalid_fields(&self) -> Vec<IntentField> {
        self.fields.iter().map(|e| e.field).collect()
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid campaign intent: ")?;
        for (i, err) in self.fields.iter().enumerate() {
            if i > 0 {
                write!(f, "; ")?;
            }
            write!(f, "{}: {}", err.field, err.reason)?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationError {}

#[derive(Debug, Clone)]
pub enum RecommendError {
    Validation(ValidationError),
    SourceUnavailable(SourceUnavailable),
}

impl fmt::Display for RecommendError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Validation(err) => err.fmt(f),
            Self::SourceUnavailable(err) => err.fmt(f),
        }
    }
}

impl std::error::Error for RecommendError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::SourceUnavailable(err) => Some(err),
        }
    }
}

impl From<ValidationError> for RecommendError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<SourceUnavailable> for RecommendError {
    fn from(value: SourceUnavailable) -> Self {
        Self::SourceUnavailable(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_lists_every_field() {
        let err = ValidationError {
            fields: vec![
                FieldError {
                    field: IntentField::Budget,
                    reason: "must be a whole number".to_string(),
                },
                FieldError {
                    field: IntentField::LocationPrefix,
                    reason: "must be exactly 3 letters or digits".to_string(),
                },
            ],
        };

        assert_eq!(
            err.to_string(),
            "invalid campaign intent: campaignBudget: must be a whole number; \
             location: must be exactly 3 letters or digits"
        );
    }
}
