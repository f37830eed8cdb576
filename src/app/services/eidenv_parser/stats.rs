//! Scan statistics and result structures for `eidenv` output

use crate::app::models::CardRecord;
use serde::{Deserialize, Serialize};

/// Parsed record together with scan statistics
#[derive(Debug, Clone)]
pub struct ParseResult {
    /// The assembled card record
    pub record: CardRecord,

    /// What the scan encountered along the way
    pub stats: ParseStats,
}

/// Counters collected while scanning `eidenv` output
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParseStats {
    /// Non-blank lines seen
    pub lines_read: usize,

    /// Lines assigned to a record field
    pub fields_assigned: usize,

    /// Lines without a key/value separator
    pub noise_lines: usize,

    /// Keys the record does not model
    pub unknown_keys: Vec<String>,

    /// Keys whose value could not be parsed and were left empty
    pub degraded_fields: Vec<String>,
}

impl ParseStats {
    /// Create new empty statistics
    pub fn new() -> Self {
        Self::default()
    }

    /// Check if every recognized field parsed cleanly
    pub fn is_clean(&self) -> bool {
        self.degraded_fields.is_empty()
    }
}
