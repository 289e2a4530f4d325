//! Parsing statistics and result structures for CBF header extraction
//!
//! This module provides types for tracking what happened to each header
//! line and for returning the assembled fields together with those counts.

use crate::app::models::ResultField;
use serde::Serialize;

/// Extraction result with assembled fields and statistics
#[derive(Debug, Clone, Serialize)]
pub struct ExtractionResult {
    /// Assembled output fields in declared order
    pub fields: Vec<ResultField>,

    /// Header parsing statistics
    pub stats: ParseStats,
}

/// Header parsing statistics
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParseStats {
    /// Lines consumed from the file
    pub lines_read: usize,

    /// Key/value entries produced by the tokenizer
    pub entries_seen: usize,

    /// Leaf values present in the output
    pub fields_extracted: usize,

    /// Entries whose key is not in the field dictionary
    pub unknown_keys: usize,

    /// Repeated occurrences of an already seen key
    pub duplicate_keys: usize,

    /// Recognised fields dropped because their value did not parse
    pub parse_failures: Vec<String>,
}

impl ParseStats {
    /// Create new empty statistics
    pub fn new() -> Self {
        Self {
            lines_read: 0,
            entries_seen: 0,
            fields_extracted: 0,
            unknown_keys: 0,
            duplicate_keys: 0,
            parse_failures: Vec::new(),
        }
    }

    /// Recognised entries, whether or not they parsed
    pub fn recognised(&self) -> usize {
        self.entries_seen - self.unknown_keys - self.duplicate_keys
    }

    /// True when no recognised field was dropped
    pub fn is_clean(&self) -> bool {
        self.parse_failures.is_empty()
    }
}

impl Default for ParseStats {
    fn default() -> Self {
        Self::new()
    }
}
