//! Entity and draft traits - the common interface of all managed records

use serde::{de::DeserializeOwned, Serialize};
use serde_json::{Map, Value as JsonValue};
use std::fmt::Debug;

use crate::core::validation::FieldRule;

/// The six reference-data entity types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Employee,
    BudgetCategory,
    Journey,
    Grade,
    Role,
    Technology,
}

/// How an entity's collection is listed by the backend
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListRoute {
    /// Full collection as a bare array
    Full(&'static str),
    /// Page envelope, with `page`/`pageSize` query parameters
    Paged(&'static str),
}

impl ListRoute {
    pub fn path(&self) -> &'static str {
        match self {
            ListRoute::Full(p) | ListRoute::Paged(p) => p,
        }
    }

    pub fn is_paged(&self) -> bool {
        matches!(self, ListRoute::Paged(_))
    }
}

impl EntityKind {
    pub fn all() -> &'static [EntityKind] {
        &[
            EntityKind::Employee,
            EntityKind::BudgetCategory,
            EntityKind::Journey,
            EntityKind::Grade,
            EntityKind::Role,
            EntityKind::Technology,
        ]
    }

    /// Lowercase display name used in messages ("budget category")
    pub fn name(&self) -> &'static str {
        match self {
            EntityKind::Employee => "employee",
            EntityKind::BudgetCategory => "budget category",
            EntityKind::Journey => "journey",
            EntityKind::Grade => "grade",
            EntityKind::Role => "role",
            EntityKind::Technology => "technology",
        }
    }

    pub fn plural(&self) -> &'static str {
        match self {
            EntityKind::Employee => "employees",
            EntityKind::BudgetCategory => "budget categories",
            EntityKind::Journey => "journeys",
            EntityKind::Grade => "grades",
            EntityKind::Role => "roles",
            EntityKind::Technology => "technologies",
        }
    }

    /// Capitalized name for success messages ("Budget category")
    pub fn title(&self) -> String {
        let name = self.name();
        let mut chars = name.chars();
        match chars.next() {
            Some(first) => first.to_uppercase().chain(chars).collect(),
            None => String::new(),
        }
    }

    /// REST resource segment for item routes
    pub fn resource(&self) -> &'static str {
        match self {
            EntityKind::Employee => "Employee",
            EntityKind::BudgetCategory => "BudgetCategory",
            EntityKind::Journey => "Journey",
            EntityKind::Grade => "Grade",
            EntityKind::Role => "Role",
            EntityKind::Technology => "Technologies",
        }
    }

    pub fn list_route(&self) -> ListRoute {
        match self {
            EntityKind::Employee => ListRoute::Paged("employee/paged"),
            other => ListRoute::Full(other.resource()),
        }
    }

    /// Path of a single record, relative to the base URL
    pub fn item_path(&self, id: i64) -> String {
        format!("{}/{}", self.resource(), id)
    }
}

impl std::fmt::Display for EntityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Kind of value a draft field holds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldType {
    Text,
    Integer,
    Amount,
}

/// Describes one editable draft field
#[derive(Debug, Clone, Copy)]
pub struct FieldSpec {
    /// Wire name (JSON key)
    pub key: &'static str,
    /// Prompt label
    pub label: &'static str,
    pub field_type: FieldType,
}

impl FieldSpec {
    pub const fn new(key: &'static str, label: &'static str, field_type: FieldType) -> Self {
        Self {
            key,
            label,
            field_type,
        }
    }

    /// Parse raw user input into the JSON value for this field
    ///
    /// Blank input clears the field.
    pub fn parse(&self, raw: &str) -> Result<JsonValue, String> {
        let raw = raw.trim();
        if raw.is_empty() {
            return Ok(JsonValue::Null);
        }
        match self.field_type {
            FieldType::Text => Ok(JsonValue::String(raw.to_string())),
            FieldType::Integer => raw
                .parse::<i64>()
                .map(JsonValue::from)
                .map_err(|_| format!("{} must be a whole number", self.label)),
            FieldType::Amount => raw
                .parse::<f64>()
                .ok()
                .filter(|n| n.is_finite())
                .map(JsonValue::from)
                .ok_or_else(|| format!("{} must be a number", self.label)),
        }
    }
}

/// A partially filled record bound to the add/edit form
///
/// Drafts double as the CLI's field flags and as the request body for
/// create/update calls. Unset fields are `None` and omitted on the wire.
pub trait Draft:
    clap::Args + Serialize + DeserializeOwned + Default + Clone + Debug + Send + Sync + 'static
{
    /// Editable fields in form order, identifier first
    const FIELDS: &'static [FieldSpec];

    /// Validation table, evaluated in order
    const RULES: &'static [FieldRule];

    /// Identifier proposed by the draft, if any
    fn id(&self) -> Option<i64>;

    /// Field values as a JSON object
    fn to_json(&self) -> Map<String, JsonValue> {
        match serde_json::to_value(self) {
            Ok(JsonValue::Object(map)) => map,
            _ => Map::new(),
        }
    }

    /// Current value of a field, for display or prompt defaults
    fn get(&self, key: &str) -> Option<String> {
        self.to_json().get(key).and_then(|v| match v {
            JsonValue::Null => None,
            JsonValue::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        })
    }

    /// Set a field from raw user input
    fn set(&mut self, key: &str, raw: &str) -> Result<(), String> {
        let spec = Self::FIELDS
            .iter()
            .find(|f| f.key == key)
            .ok_or_else(|| format!("Unknown field '{}'", key))?;
        let value = spec.parse(raw)?;

        let mut json = self.to_json();
        json.insert(key.to_string(), value);
        *self = serde_json::from_value(JsonValue::Object(json)).map_err(|e| e.to_string())?;
        Ok(())
    }

    /// Copy every field that is set in `patch` onto this draft
    fn overlay(&mut self, patch: &Self) {
        let mut json = self.to_json();
        for (key, value) in patch.to_json() {
            if !value.is_null() {
                json.insert(key, value);
            }
        }
        if let Ok(merged) = serde_json::from_value(JsonValue::Object(json)) {
            *self = merged;
        }
    }

    /// True when no field is set
    fn is_empty(&self) -> bool {
        self.to_json().values().all(JsonValue::is_null)
    }
}

/// A persisted record as returned by the backend
pub trait Entity: Serialize + DeserializeOwned + Clone + Debug + Send + Sync + 'static {
    type Draft: Draft;

    const KIND: EntityKind;

    /// Backend-assigned identifier
    fn id(&self) -> i64;

    /// Copy this record into an edit draft
    fn to_draft(&self) -> Self::Draft;
}
