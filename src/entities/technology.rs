//! Technology entity type

use serde::{Deserialize, Serialize};

use crate::core::entity::{Draft, Entity, EntityKind, FieldSpec, FieldType};
use crate::core::validation::{Check, FieldRule};

/// A technology stack, stored as one comma-separated string
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Technology {
    pub id: i64,

    #[serde(default)]
    pub technology_stack: String,
}

impl Technology {
    /// Individual technologies in the stack, trimmed, blanks dropped
    pub fn stack_items(&self) -> Vec<&str> {
        self.technology_stack
            .split(',')
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .collect()
    }
}

#[derive(clap::Args, Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TechnologyDraft {
    /// Technology ID (assigned by the server when omitted)
    #[arg(long)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,

    /// Comma-separated stack (e.g. "Rust, Tokio, PostgreSQL")
    #[arg(long = "stack")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub technology_stack: Option<String>,
}

impl Draft for TechnologyDraft {
    const FIELDS: &'static [FieldSpec] = &[
        FieldSpec::new("id", "Technology ID", FieldType::Integer),
        FieldSpec::new("technologyStack", "Technology stack", FieldType::Text),
    ];

    const RULES: &'static [FieldRule] = &[
        FieldRule::new("id", Check::PositiveId, "Technology ID must be a positive number"),
        FieldRule::new(
            "technologyStack",
            Check::MinLen(3),
            "Technology stack must be at least 3 characters long",
        ),
    ];

    fn id(&self) -> Option<i64> {
        self.id
    }
}

impl Entity for Technology {
    type Draft = TechnologyDraft;

    const KIND: EntityKind = EntityKind::Technology;

    fn id(&self) -> i64 {
        self.id
    }

    fn to_draft(&self) -> TechnologyDraft {
        TechnologyDraft {
            id: Some(self.id),
            technology_stack: Some(self.technology_stack.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stack_items() {
        let tech = Technology {
            id: 1,
            technology_stack: "Angular, TypeScript,, RxJS ,".into(),
        };
        assert_eq!(tech.stack_items(), vec!["Angular", "TypeScript", "RxJS"]);
    }

    #[test]
    fn test_draft_set_and_overlay() {
        let mut draft = TechnologyDraft::default();
        assert!(draft.is_empty());

        draft.set("technologyStack", "Rust, Tokio").unwrap();
        draft.set("id", "9").unwrap();
        assert_eq!(draft.id(), Some(9));

        let patch = TechnologyDraft {
            id: None,
            technology_stack: Some("Rust, Axum".into()),
        };
        draft.overlay(&patch);
        assert_eq!(draft.id(), Some(9));
        assert_eq!(draft.technology_stack.as_deref(), Some("Rust, Axum"));

        assert!(draft.set("id", "nine").is_err());
        assert!(draft.set("unknown", "x").is_err());
    }
}
