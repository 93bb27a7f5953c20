//! Type definitions for compiled paths.

use serde_json::Value;
use std::fmt;

/// A single access within a compiled path.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Step {
    /// Addresses a mapping entry by name. The empty string is a legal key.
    Key(String),
    /// Addresses a sequence entry by position.
    Index(usize),
}

impl Step {
    /// Check if this step addresses a mapping entry.
    pub fn is_key(&self) -> bool {
        matches!(self, Step::Key(_))
    }

    /// Check if this step addresses a sequence entry.
    pub fn is_index(&self) -> bool {
        matches!(self, Step::Index(_))
    }

    /// The kind of container this step can be applied to.
    pub fn expected_kind(&self) -> ValueKind {
        match self {
            Step::Key(_) => ValueKind::Mapping,
            Step::Index(_) => ValueKind::Sequence,
        }
    }

    /// Human readable form used in diagnostics: `key 'name'` or `index '3'`.
    pub fn describe(&self) -> String {
        match self {
            Step::Key(key) => format!("key '{key}'"),
            Step::Index(index) => format!("index '{index}'"),
        }
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Step::Key(key) => f.write_str(key),
            Step::Index(index) => write!(f, "[{index}]"),
        }
    }
}

impl From<usize> for Step {
    fn from(index: usize) -> Self {
        Step::Index(index)
    }
}

impl From<&str> for Step {
    fn from(key: &str) -> Self {
        Step::Key(key.to_string())
    }
}

impl From<String> for Step {
    fn from(key: String) -> Self {
        Step::Key(key)
    }
}

/// Runtime shape of a tree value, as reported by type mismatch errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    Mapping,
    Sequence,
    String,
    Number,
    Bool,
    Null,
}

impl ValueKind {
    /// Classify a value.
    pub fn of(value: &Value) -> Self {
        match value {
            Value::Object(_) => ValueKind::Mapping,
            Value::Array(_) => ValueKind::Sequence,
            Value::String(_) => ValueKind::String,
            Value::Number(_) => ValueKind::Number,
            Value::Bool(_) => ValueKind::Bool,
            Value::Null => ValueKind::Null,
        }
    }

    /// Mappings and sequences can be stepped into; everything else is a leaf.
    pub fn is_container(self) -> bool {
        matches!(self, ValueKind::Mapping | ValueKind::Sequence)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ValueKind::Mapping => "mapping",
            ValueKind::Sequence => "sequence",
            ValueKind::String => "string",
            ValueKind::Number => "number",
            ValueKind::Bool => "bool",
            ValueKind::Null => "null",
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
