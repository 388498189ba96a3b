//! Table-driven field validation for drafts
//!
//! Each entity declares an ordered list of [`FieldRule`]s keyed by wire
//! field name. Rules are evaluated against the draft's JSON form and the
//! first failing rule produces the single message shown to the user.

use regex::Regex;
use serde::Serialize;
use serde_json::Value as JsonValue;
use std::sync::OnceLock;

use crate::core::error::PortalError;

/// Constraint applied to one field
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Check {
    /// Optional identifier; when present it must be a positive integer
    PositiveId,
    /// Required text whose trimmed length is at least N characters
    MinLen(usize),
    /// Required number strictly greater than zero
    Positive,
    /// Required integer within an inclusive range
    Range(i64, i64),
    /// Required e-mail address
    Email,
}

/// One row of an entity's validation table
#[derive(Debug, Clone, Copy)]
pub struct FieldRule {
    /// Wire name of the field
    pub field: &'static str,
    pub check: Check,
    /// Message shown when the check fails
    pub message: &'static str,
}

impl FieldRule {
    pub const fn new(field: &'static str, check: Check, message: &'static str) -> Self {
        Self {
            field,
            check,
            message,
        }
    }

    /// Check this rule against the serialized draft
    pub fn passes(&self, draft: &JsonValue) -> bool {
        let value = draft.get(self.field).filter(|v| !v.is_null());
        match self.check {
            Check::PositiveId => match value {
                None => true,
                Some(v) => v.as_i64().is_some_and(|id| id > 0),
            },
            Check::MinLen(min) => value
                .and_then(JsonValue::as_str)
                .is_some_and(|s| s.trim().chars().count() >= min),
            Check::Positive => value
                .and_then(JsonValue::as_f64)
                .is_some_and(|n| n > 0.0),
            Check::Range(lo, hi) => value
                .and_then(JsonValue::as_i64)
                .is_some_and(|n| (lo..=hi).contains(&n)),
            Check::Email => value
                .and_then(JsonValue::as_str)
                .is_some_and(is_valid_email),
        }
    }
}

/// Validate a draft against an ordered rule table
///
/// Returns the first failing rule's message as [`PortalError::Validation`].
pub fn validate<D: Serialize>(draft: &D, rules: &[FieldRule]) -> Result<(), PortalError> {
    let json = serde_json::to_value(draft)
        .map_err(|e| PortalError::Validation(format!("Draft cannot be encoded: {}", e)))?;

    match rules.iter().find(|rule| !rule.passes(&json)) {
        Some(rule) => {
            tracing::debug!(field = rule.field, "validation failed");
            Err(PortalError::Validation(rule.message.to_string()))
        }
        None => Ok(()),
    }
}

/// Validate an id typed into a search box
pub fn validate_search_id(id: i64) -> Result<(), PortalError> {
    if id > 0 {
        Ok(())
    } else {
        Err(PortalError::Validation(
            "Please enter a valid positive ID".to_string(),
        ))
    }
}

pub fn is_valid_email(s: &str) -> bool {
    static EMAIL: OnceLock<Regex> = OnceLock::new();
    EMAIL
        .get_or_init(|| {
            Regex::new(r"^[^\s@]+@[^\s@]+\.[A-Za-z]{2,}$").expect("email pattern is valid")
        })
        .is_match(s)
}
