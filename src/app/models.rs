//! Core data structures for CBF header extraction
//!
//! This module defines the types that flow through the extraction pipeline:
//! raw header entries from the tokenizer, the static field rules of
//! the dictionary, and the result and validation types handed to the
//! importer framework.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One `key value` line from the header region
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawHeaderEntry {
    /// Header key as written in the file (or a synthetic key for special lines)
    pub key: String,

    /// Value text following the key and its separator, trimmed
    pub raw_value: String,

    /// 1-based line number within the file
    pub line_number: usize,
}

impl RawHeaderEntry {
    pub fn new(key: impl Into<String>, raw_value: impl Into<String>, line_number: usize) -> Self {
        Self {
            key: key.into(),
            raw_value: raw_value.into(),
            line_number,
        }
    }
}

/// Declared value type of a dictionary field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    /// Passed through, trimmed
    Text,
    /// Decimal number rendered with exactly `decimals` fractional digits
    Float { decimals: usize },
    /// Whole number
    Integer,
    /// ISO-8601 acquisition time, rendered to millisecond precision
    Timestamp,
}

/// Which part of the raw value carries the datum
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Extract {
    /// The whole value
    Whole,
    /// First whitespace-separated token (numbers followed by a unit)
    FirstToken,
    /// The n-th comma-separated segment
    CommaField(usize),
}

/// Extraction and normalization rule for one recognised header key
#[derive(Debug, Clone, PartialEq)]
pub struct FieldSpec {
    /// Key as produced by the tokenizer; unique across the dictionary
    pub header_key: &'static str,

    /// Stable output field name
    pub output_name: &'static str,

    pub kind: ValueKind,

    pub extract: Extract,

    /// Multiplier converting the raw unit into the output unit
    pub unit_scale: Option<f64>,

    /// Unit the raw value must carry for `unit_scale` to apply
    pub source_unit: Option<&'static str>,

    /// Group this field renders under, if any
    pub group: Option<&'static str>,
}

/// Output unit handed to the importer framework
///
/// A leaf carries a formatted `value` and no children; a group parent has an
/// empty `value` and at least one child.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultField {
    pub name: String,

    #[serde(default)]
    pub value: String,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<ResultField>,
}

impl ResultField {
    /// Create a leaf field
    pub fn leaf(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            children: Vec::new(),
        }
    }

    /// Create a group field
    pub fn group(name: impl Into<String>, children: Vec<ResultField>) -> Self {
        Self {
            name: name.into(),
            value: String::new(),
            children,
        }
    }

    pub fn is_group(&self) -> bool {
        !self.children.is_empty()
    }

    /// Find a direct child by name
    pub fn child(&self, name: &str) -> Option<&ResultField> {
        self.children.iter().find(|child| child.name == name)
    }
}

/// Validation errors keyed by importer input field; empty means valid
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ValidationOutcome {
    errors: BTreeMap<String, String>,
}

impl ValidationOutcome {
    /// An outcome with no errors
    pub fn valid() -> Self {
        Self::default()
    }

    /// An outcome with a single error
    pub fn invalid(field: impl Into<String>, message: impl Into<String>) -> Self {
        let mut outcome = Self::default();
        outcome.add_error(field, message);
        outcome
    }

    pub fn add_error(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.errors.insert(field.into(), message.into());
    }

    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn error_for(&self, field: &str) -> Option<&str> {
        self.errors.get(field).map(String::as_str)
    }

    pub fn errors(&self) -> &BTreeMap<String, String> {
        &self.errors
    }
}

/// Kind of input the importer framework must collect
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FormFieldKind {
    File,
}

/// Descriptor of one importer form input
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FormField {
    pub key: String,
    pub kind: FormFieldKind,
    pub label: String,
    pub description: String,
    pub required: bool,
}
