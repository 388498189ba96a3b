//! Entity type definitions
//!
//! The portal manages six flat reference-data entities:
//!
//! - [`Employee`] - staff members (listed page by page)
//! - [`BudgetCategory`] - spending categories per financial year
//! - [`Journey`] - planned business journeys
//! - [`Grade`] - seniority grades
//! - [`Role`] - job roles and their projects
//! - [`Technology`] - technology stacks
//!
//! Each entity comes with a `*Draft` counterpart holding the partially
//! filled add/edit form and its validation table.

pub mod budget_category;
pub mod employee;
pub mod grade;
pub mod journey;
pub mod role;
pub mod technology;

pub use budget_category::{BudgetCategory, BudgetCategoryDraft};
pub use employee::{Employee, EmployeeDraft};
pub use grade::{Grade, GradeDraft};
pub use journey::{Journey, JourneyDraft};
pub use role::{Role, RoleDraft};
pub use technology::{Technology, TechnologyDraft};
