//! Table columns for each entity

use crate::cli::table::{CellValue, ColumnDef, TableRow};
use crate::core::entity::Entity;
use crate::entities::{BudgetCategory, Employee, Grade, Journey, Role, Technology};

/// An entity that can be shown as a table row
pub trait Tabular: Entity {
    const COLUMNS: &'static [ColumnDef];

    fn row(&self) -> TableRow;
}

impl Tabular for Employee {
    const COLUMNS: &'static [ColumnDef] = &[
        ColumnDef::new("id", "ID", 8),
        ColumnDef::new("name", "NAME", 24),
        ColumnDef::new("email", "EMAIL", 32),
        ColumnDef::new("department", "DEPARTMENT", 18),
        ColumnDef::new("designation", "DESIGNATION", 22),
    ];

    fn row(&self) -> TableRow {
        TableRow::new(self.employee_id)
            .cell("id", CellValue::Id(self.employee_id))
            .text("name", &self.name)
            .cell("email", CellValue::Email(self.email.clone()))
            .text("department", &self.department)
            .text("designation", &self.designation)
    }
}

impl Tabular for BudgetCategory {
    const COLUMNS: &'static [ColumnDef] = &[
        ColumnDef::new("id", "ID", 8),
        ColumnDef::new("category", "CATEGORY", 24),
        ColumnDef::new("amount", "AMOUNT", 16),
        ColumnDef::new("year", "YEAR", 6),
    ];

    fn row(&self) -> TableRow {
        TableRow::new(self.id)
            .cell("id", CellValue::Id(self.id))
            .text("category", &self.category_type)
            .cell("amount", CellValue::Amount(self.budget_amount))
            .cell("year", CellValue::Number(self.financial_year))
    }
}

impl Tabular for Journey {
    const COLUMNS: &'static [ColumnDef] = &[
        ColumnDef::new("id", "ID", 8),
        ColumnDef::new("name", "NAME", 24),
        ColumnDef::new("destination", "DESTINATION", 18),
        ColumnDef::new("days", "DAYS", 6),
        ColumnDef::new("budget", "BUDGET", 14),
        ColumnDef::new("description", "DESCRIPTION", 40),
    ];

    fn row(&self) -> TableRow {
        TableRow::new(self.journey_id)
            .cell("id", CellValue::Id(self.journey_id))
            .text("name", &self.journey_name)
            .text("destination", &self.destination)
            .cell("days", CellValue::Number(self.duration_in_days))
            .cell("budget", CellValue::Amount(self.budget))
            .text("description", &self.journey_description)
    }
}

impl Tabular for Grade {
    const COLUMNS: &'static [ColumnDef] = &[
        ColumnDef::new("id", "ID", 8),
        ColumnDef::new("level", "LEVEL", 16),
        ColumnDef::new("description", "DESCRIPTION", 48),
    ];

    fn row(&self) -> TableRow {
        TableRow::new(self.grade_id)
            .cell("id", CellValue::Id(self.grade_id))
            .text("level", &self.grade_level)
            .text("description", &self.grade_description)
    }
}

impl Tabular for Role {
    const COLUMNS: &'static [ColumnDef] = &[
        ColumnDef::new("id", "ID", 8),
        ColumnDef::new("title", "TITLE", 26),
        ColumnDef::new("project", "PROJECT", 30),
    ];

    fn row(&self) -> TableRow {
        TableRow::new(self.role_id)
            .cell("id", CellValue::Id(self.role_id))
            .text("title", &self.role_title)
            .text("project", &self.project_name)
    }
}

impl Tabular for Technology {
    const COLUMNS: &'static [ColumnDef] = &[
        ColumnDef::new("id", "ID", 8),
        ColumnDef::new("stack", "STACK", 56),
    ];

    fn row(&self) -> TableRow {
        let items: Vec<String> = self.stack_items().into_iter().map(String::from).collect();
        let stack = if items.is_empty() {
            CellValue::Empty
        } else {
            CellValue::Tags(items)
        };
        TableRow::new(self.id)
            .cell("id", CellValue::Id(self.id))
            .cell("stack", stack)
    }
}
