//! Budget category entity type

use serde::{Deserialize, Serialize};

use crate::core::entity::{Draft, Entity, EntityKind, FieldSpec, FieldType};
use crate::core::validation::{Check, FieldRule};

/// Earliest and latest accepted financial year
pub const FINANCIAL_YEAR_RANGE: (i64, i64) = (1900, 2100);

/// A spending category with its yearly allocation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BudgetCategory {
    pub id: i64,

    #[serde(default)]
    pub category_type: String,

    #[serde(default)]
    pub budget_amount: f64,

    /// Calendar year the allocation applies to
    #[serde(default)]
    pub financial_year: i64,
}

#[derive(clap::Args, Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BudgetCategoryDraft {
    /// Category ID (assigned by the server when omitted)
    #[arg(long)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,

    /// Category type (e.g. Operations, Marketing)
    #[arg(long = "type")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_type: Option<String>,

    /// Budget amount
    #[arg(long = "amount")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub budget_amount: Option<f64>,

    /// Financial year (e.g. 2025)
    #[arg(long = "year")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub financial_year: Option<i64>,
}

impl Draft for BudgetCategoryDraft {
    const FIELDS: &'static [FieldSpec] = &[
        FieldSpec::new("id", "Category ID", FieldType::Integer),
        FieldSpec::new("categoryType", "Category type", FieldType::Text),
        FieldSpec::new("budgetAmount", "Budget amount", FieldType::Amount),
        FieldSpec::new("financialYear", "Financial year", FieldType::Integer),
    ];

    const RULES: &'static [FieldRule] = &[
        FieldRule::new("id", Check::PositiveId, "Please enter a valid positive ID"),
        FieldRule::new(
            "categoryType",
            Check::MinLen(3),
            "Category type must be at least 3 characters long",
        ),
        FieldRule::new(
            "budgetAmount",
            Check::Positive,
            "Please enter a valid budget amount greater than 0",
        ),
        FieldRule::new(
            "financialYear",
            Check::Range(FINANCIAL_YEAR_RANGE.0, FINANCIAL_YEAR_RANGE.1),
            "Financial year must be between 1900 and 2100",
        ),
    ];

    fn id(&self) -> Option<i64> {
        self.id
    }
}

impl Entity for BudgetCategory {
    type Draft = BudgetCategoryDraft;

    const KIND: EntityKind = EntityKind::BudgetCategory;

    fn id(&self) -> i64 {
        self.id
    }

    fn to_draft(&self) -> BudgetCategoryDraft {
        BudgetCategoryDraft {
            id: Some(self.id),
            category_type: Some(self.category_type.clone()),
            budget_amount: Some(self.budget_amount),
            financial_year: Some(self.financial_year),
        }
    }
}
