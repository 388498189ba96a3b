//! Journey entity type

use serde::{Deserialize, Serialize};

use crate::core::entity::{Draft, Entity, EntityKind, FieldSpec, FieldType};
use crate::core::validation::{Check, FieldRule};

/// Longest journey the portal accepts, in days
pub const MAX_DURATION_DAYS: i64 = 365;

/// A planned business journey
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Journey {
    pub journey_id: i64,

    #[serde(default)]
    pub journey_name: String,

    #[serde(default)]
    pub journey_description: String,

    #[serde(default)]
    pub destination: String,

    #[serde(default)]
    pub duration_in_days: i64,

    #[serde(default)]
    pub budget: f64,
}

#[derive(clap::Args, Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JourneyDraft {
    /// Journey ID (assigned by the server when omitted)
    #[arg(long = "id")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub journey_id: Option<i64>,

    /// Journey name
    #[arg(long = "name")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub journey_name: Option<String>,

    /// Description (at least 10 characters)
    #[arg(long = "description")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub journey_description: Option<String>,

    /// Destination
    #[arg(long)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub destination: Option<String>,

    /// Duration in days (1-365)
    #[arg(long = "days")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_in_days: Option<i64>,

    /// Budget amount
    #[arg(long)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub budget: Option<f64>,
}

impl Draft for JourneyDraft {
    const FIELDS: &'static [FieldSpec] = &[
        FieldSpec::new("journeyId", "Journey ID", FieldType::Integer),
        FieldSpec::new("journeyName", "Journey name", FieldType::Text),
        FieldSpec::new("journeyDescription", "Description", FieldType::Text),
        FieldSpec::new("destination", "Destination", FieldType::Text),
        FieldSpec::new("durationInDays", "Duration (days)", FieldType::Integer),
        FieldSpec::new("budget", "Budget", FieldType::Amount),
    ];

    const RULES: &'static [FieldRule] = &[
        FieldRule::new("journeyId", Check::PositiveId, "Please enter a valid positive ID"),
        FieldRule::new(
            "journeyName",
            Check::MinLen(3),
            "Please enter a valid journey name (at least 3 characters)",
        ),
        FieldRule::new(
            "journeyDescription",
            Check::MinLen(10),
            "Please enter a valid journey description (at least 10 characters)",
        ),
        FieldRule::new(
            "destination",
            Check::MinLen(2),
            "Please enter a valid destination (at least 2 characters)",
        ),
        FieldRule::new(
            "durationInDays",
            Check::Range(1, MAX_DURATION_DAYS),
            "Please enter a valid duration between 1 and 365 days",
        ),
        FieldRule::new(
            "budget",
            Check::Positive,
            "Please enter a valid budget amount greater than 0",
        ),
    ];

    fn id(&self) -> Option<i64> {
        self.journey_id
    }
}

impl Entity for Journey {
    type Draft = JourneyDraft;

    const KIND: EntityKind = EntityKind::Journey;

    fn id(&self) -> i64 {
        self.journey_id
    }

    fn to_draft(&self) -> JourneyDraft {
        JourneyDraft {
            journey_id: Some(self.journey_id),
            journey_name: Some(self.journey_name.clone()),
            journey_description: Some(self.journey_description.clone()),
            destination: Some(self.destination.clone()),
            duration_in_days: Some(self.duration_in_days),
            budget: Some(self.budget),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::validation::validate;

    fn draft(name: &str, description: &str, destination: &str, days: i64, budget: f64) -> JourneyDraft {
        JourneyDraft {
            journey_id: None,
            journey_name: Some(name.into()),
            journey_description: Some(description.into()),
            destination: Some(destination.into()),
            duration_in_days: Some(days),
            budget: Some(budget),
        }
    }

    #[test]
    fn test_name_checked_first() {
        let d = draft("Ab", "short", "X", 400, 10.0);
        let err = validate(&d, JourneyDraft::RULES).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Please enter a valid journey name (at least 3 characters)"
        );
    }

    #[test]
    fn test_duration_bound() {
        let d = draft("Onboarding", "Two weeks at headquarters", "London", 366, 10.0);
        let err = validate(&d, JourneyDraft::RULES).unwrap_err();
        assert_eq!(err.to_string(), "Please enter a valid duration between 1 and 365 days");

        let d = draft("Onboarding", "Two weeks at headquarters", "London", 365, 10.0);
        assert!(validate(&d, JourneyDraft::RULES).is_ok());
    }

    #[test]
    fn test_trimmed_lengths() {
        let d = draft("  Ab  ", "Two weeks at headquarters", "London", 14, 10.0);
        assert!(validate(&d, JourneyDraft::RULES).is_err());
    }

    #[test]
    fn test_wire_shape() {
        let d = draft("Onboarding", "Two weeks at headquarters", "London", 14, 2500.0);
        let json = serde_json::to_value(&d).unwrap();
        assert_eq!(json["journeyName"], "Onboarding");
        assert_eq!(json["durationInDays"], 14);
        assert!(json.get("journeyId").is_none());
    }
}
