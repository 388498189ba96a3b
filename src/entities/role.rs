//! Role entity type

use serde::{Deserialize, Serialize};

use crate::core::entity::{Draft, Entity, EntityKind, FieldSpec, FieldType};
use crate::core::validation::{Check, FieldRule};

/// A job role and the project it staffs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Role {
    #[serde(rename = "role_Id")]
    pub role_id: i64,

    #[serde(rename = "role_Title", default)]
    pub role_title: String,

    #[serde(rename = "project_Name", default)]
    pub project_name: String,
}

#[derive(clap::Args, Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RoleDraft {
    /// Role ID (assigned by the server when omitted)
    #[arg(long = "id")]
    #[serde(rename = "role_Id", skip_serializing_if = "Option::is_none")]
    pub role_id: Option<i64>,

    /// Role title
    #[arg(long = "title")]
    #[serde(rename = "role_Title", skip_serializing_if = "Option::is_none")]
    pub role_title: Option<String>,

    /// Project the role is assigned to
    #[arg(long = "project")]
    #[serde(rename = "project_Name", skip_serializing_if = "Option::is_none")]
    pub project_name: Option<String>,
}

impl Draft for RoleDraft {
    const FIELDS: &'static [FieldSpec] = &[
        FieldSpec::new("role_Id", "Role ID", FieldType::Integer),
        FieldSpec::new("role_Title", "Role title", FieldType::Text),
        FieldSpec::new("project_Name", "Project name", FieldType::Text),
    ];

    const RULES: &'static [FieldRule] = &[
        FieldRule::new("role_Id", Check::PositiveId, "Role ID must be a positive number"),
        FieldRule::new(
            "role_Title",
            Check::MinLen(3),
            "Role title must be at least 3 characters long",
        ),
        FieldRule::new(
            "project_Name",
            Check::MinLen(3),
            "Project name must be at least 3 characters long",
        ),
    ];

    fn id(&self) -> Option<i64> {
        self.role_id
    }
}

impl Entity for Role {
    type Draft = RoleDraft;

    const KIND: EntityKind = EntityKind::Role;

    fn id(&self) -> i64 {
        self.role_id
    }

    fn to_draft(&self) -> RoleDraft {
        RoleDraft {
            role_id: Some(self.role_id),
            role_title: Some(self.role_title.clone()),
            project_name: Some(self.project_name.clone()),
        }
    }
}
