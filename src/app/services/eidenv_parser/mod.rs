//! Parser for the text output of OpenSC's `eidenv` utility
//!
//! `eidenv` prints one `KEY: value` pair per line for every field it reads
//! from a Belgian eID card. This module turns that output into a
//! [`CardRecord`](crate::app::models::CardRecord).
//!
//! ## Architecture
//!
//! - [`parser`] - Exit status handling, line scanning and field dispatch
//! - [`birth_date`] - Birth date normalization across card languages
//! - [`field_parsers`] - Per-field transforms applying the [`ParsePolicy`]
//! - [`stats`] - Scan statistics and result structures
//!
//! ## Usage
//!
//! ```rust
//! use eid_rest::{EidenvParser, ParsePolicy};
//!
//! let output = "BELPIC_CARDNUMBER: 591-1234567-89\nBELPIC_SEX: V\n";
//! let record = EidenvParser::new(ParsePolicy::Lenient)
//!     .parse(output, Some(1))
//!     .unwrap();
//!
//! assert_eq!(record.card_number(), "591-1234567-89");
//! ```

pub mod birth_date;
pub mod field_parsers;
pub mod parser;
pub mod stats;

#[cfg(test)]
pub mod tests;

use serde::{Deserialize, Serialize};

// Re-export main types for easy access
pub use birth_date::parse_birth_date;
pub use parser::EidenvParser;
pub use stats::{ParseResult, ParseStats};

/// How field values that fail to parse are handled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParsePolicy {
    /// Leave the field empty and keep reading (what `eidenv` consumers expect)
    #[default]
    Lenient,
    /// Fail the whole read on the first unparsable field
    Strict,
}

impl ParsePolicy {
    pub fn is_strict(self) -> bool {
        matches!(self, ParsePolicy::Strict)
    }
}
