//! Employee entity type

use serde::{Deserialize, Serialize};

use crate::core::entity::{Draft, Entity, EntityKind, FieldSpec, FieldType};
use crate::core::validation::{Check, FieldRule};

/// A staff member
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Employee {
    /// Backend-assigned identifier
    #[serde(rename = "employee_Id")]
    pub employee_id: i64,

    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub email: String,

    #[serde(default)]
    pub department: String,

    #[serde(default)]
    pub designation: String,
}

/// Add/edit form for an employee
#[derive(clap::Args, Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EmployeeDraft {
    /// Employee ID (assigned by the server when omitted)
    #[arg(long = "id")]
    #[serde(rename = "employee_Id", skip_serializing_if = "Option::is_none")]
    pub employee_id: Option<i64>,

    /// Full name
    #[arg(long)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Work e-mail address
    #[arg(long)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,

    /// Department
    #[arg(long)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub department: Option<String>,

    /// Designation (job title)
    #[arg(long)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub designation: Option<String>,
}

impl Draft for EmployeeDraft {
    const FIELDS: &'static [FieldSpec] = &[
        FieldSpec::new("employee_Id", "Employee ID", FieldType::Integer),
        FieldSpec::new("name", "Name", FieldType::Text),
        FieldSpec::new("email", "Email", FieldType::Text),
        FieldSpec::new("department", "Department", FieldType::Text),
        FieldSpec::new("designation", "Designation", FieldType::Text),
    ];

    const RULES: &'static [FieldRule] = &[
        FieldRule::new("employee_Id", Check::PositiveId, "Please enter a valid positive ID"),
        FieldRule::new("name", Check::MinLen(2), "Name must be at least 2 characters long"),
        FieldRule::new("email", Check::Email, "Please enter a valid email address"),
        FieldRule::new(
            "department",
            Check::MinLen(2),
            "Department must be at least 2 characters long",
        ),
        FieldRule::new(
            "designation",
            Check::MinLen(2),
            "Designation must be at least 2 characters long",
        ),
    ];

    fn id(&self) -> Option<i64> {
        self.employee_id
    }
}

impl Entity for Employee {
    type Draft = EmployeeDraft;

    const KIND: EntityKind = EntityKind::Employee;

    fn id(&self) -> i64 {
        self.employee_id
    }

    fn to_draft(&self) -> EmployeeDraft {
        EmployeeDraft {
            employee_id: Some(self.employee_id),
            name: Some(self.name.clone()),
            email: Some(self.email.clone()),
            department: Some(self.department.clone()),
            designation: Some(self.designation.clone()),
        }
    }
}
