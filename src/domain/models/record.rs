use serde::Serialize;
use std::fmt;

use super::level::Level;

/// Key under which `Event::err` stores an error.
pub const ERROR_FIELD: &str = "error";

/// Value of a structured field attached to a record.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FieldValue {
    Str(String),
    Int(i64),
    Uint(u64),
    Float(f64),
    Bool(bool),
    /// Any serializable value, already converted to JSON
    Json(serde_json::Value),
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Str(value) => f.write_str(value),
            Self::Int(value) => write!(f, "{value}"),
            Self::Uint(value) => write!(f, "{value}"),
            Self::Float(value) => write!(f, "{value}"),
            Self::Bool(value) => write!(f, "{value}"),
            Self::Json(value) => write!(f, "{value}"),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        Self::Str(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        Self::Str(value)
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<u64> for FieldValue {
    fn from(value: u64) -> Self {
        Self::Uint(value)
    }
}

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

/// A finalized log event, handed to every sink.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    pub level: Level,
    /// Timestamp, already rendered with the logger's time format
    pub time: String,
    /// Structured fields in insertion order
    pub fields: Vec<(String, FieldValue)>,
    pub message: Option<String>,
}

impl Record {
    /// Create a record with no fields and no message
    pub fn new(level: Level, time: impl Into<String>) -> Self {
        Self {
            level,
            time: time.into(),
            fields: Vec::new(),
            message: None,
        }
    }

    /// Look up the first field named `key`
    pub fn field(&self, key: &str) -> Option<&FieldValue> {
        self.fields
            .iter()
            .find(|(name, _)| name == key)
            .map(|(_, value)| value)
    }
}
