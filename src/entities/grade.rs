//! Grade entity type

use serde::{Deserialize, Serialize};

use crate::core::entity::{Draft, Entity, EntityKind, FieldSpec, FieldType};
use crate::core::validation::{Check, FieldRule};

/// A pay/seniority grade
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Grade {
    pub grade_id: i64,

    #[serde(default)]
    pub grade_level: String,

    #[serde(default)]
    pub grade_description: String,
}

#[derive(clap::Args, Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GradeDraft {
    /// Grade ID (assigned by the server when omitted)
    #[arg(long = "id")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub grade_id: Option<i64>,

    /// Grade level (e.g. Junior, Senior)
    #[arg(long = "level")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub grade_level: Option<String>,

    /// Description (at least 5 characters)
    #[arg(long = "description")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub grade_description: Option<String>,
}

impl Draft for GradeDraft {
    const FIELDS: &'static [FieldSpec] = &[
        FieldSpec::new("gradeId", "Grade ID", FieldType::Integer),
        FieldSpec::new("gradeLevel", "Grade level", FieldType::Text),
        FieldSpec::new("gradeDescription", "Description", FieldType::Text),
    ];

    const RULES: &'static [FieldRule] = &[
        FieldRule::new("gradeId", Check::PositiveId, "Grade ID must be a positive number"),
        FieldRule::new(
            "gradeLevel",
            Check::MinLen(3),
            "Grade level must be at least 3 characters long",
        ),
        FieldRule::new(
            "gradeDescription",
            Check::MinLen(5),
            "Description must be at least 5 characters long",
        ),
    ];

    fn id(&self) -> Option<i64> {
        self.grade_id
    }
}

impl Entity for Grade {
    type Draft = GradeDraft;

    const KIND: EntityKind = EntityKind::Grade;

    fn id(&self) -> i64 {
        self.grade_id
    }

    fn to_draft(&self) -> GradeDraft {
        GradeDraft {
            grade_id: Some(self.grade_id),
            grade_level: Some(self.grade_level.clone()),
            grade_description: Some(self.grade_description.clone()),
        }
    }
}
