//! Master Portal
//!
//! A terminal console for the staff reference-data service: employees,
//! budget categories, journeys, grades, roles and technologies, each
//! listed, searched, created, edited and deleted over the REST API.

pub mod cli;
pub mod core;
pub mod entities;
