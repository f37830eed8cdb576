//! Core `eidenv` output parser
//!
//! This module handles the exit status of the utility, the line scan and the
//! dispatch of each `KEY: value` pair to its record field.

use tracing::{debug, trace};

use super::ParsePolicy;
use super::field_parsers::{
    parse_card_date, parse_document_type, parse_localized_date, parse_special_status,
};
use super::stats::{ParseResult, ParseStats};
use crate::app::models::{CardRecord, CardRecordBuilder, Gender, ReaderOutput};
use crate::constants::{
    CARD_NOT_PRESENT_MARKER, DEFAULT_TOLERATED_EXIT_CODES, KEY_VALUE_SEPARATOR, keys,
};
use crate::{Error, Result};

/// Parser for `eidenv` output
///
/// The parser holds no state between calls and can be shared freely across
/// threads and tasks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EidenvParser {
    policy: ParsePolicy,
    tolerated_exit_codes: Vec<i32>,
}

impl Default for EidenvParser {
    fn default() -> Self {
        Self::new(ParsePolicy::default())
    }
}

impl EidenvParser {
    /// Create a parser with the given field policy
    pub fn new(policy: ParsePolicy) -> Self {
        Self {
            policy,
            tolerated_exit_codes: DEFAULT_TOLERATED_EXIT_CODES.to_vec(),
        }
    }

    /// Replace the set of non-zero exit codes treated as success
    pub fn with_tolerated_exit_codes(mut self, codes: impl Into<Vec<i32>>) -> Self {
        self.tolerated_exit_codes = codes.into();
        self
    }

    pub fn policy(&self) -> ParsePolicy {
        self.policy
    }

    /// Parse captured process output into a card record
    pub fn parse_output(&self, output: &ReaderOutput) -> Result<CardRecord> {
        self.parse(&output.text(), output.exit_code)
    }

    /// Parse `eidenv` text produced with the given exit code
    pub fn parse(&self, text: &str, exit_code: Option<i32>) -> Result<CardRecord> {
        self.parse_with_stats(text, exit_code).map(|result| result.record)
    }

    /// Parse `eidenv` text and report what the scan encountered
    pub fn parse_with_stats(&self, text: &str, exit_code: Option<i32>) -> Result<ParseResult> {
        self.check_exit_status(text, exit_code)?;

        // The marker wins over anything else in the output, wherever it is
        if text.lines().any(|line| line.contains(CARD_NOT_PRESENT_MARKER)) {
            debug!("eidenv reported no card in the reader");
            return Err(Error::CardNotPresent);
        }

        let mut stats = ParseStats::new();
        let mut builder = CardRecord::builder();

        for line in text.lines() {
            if line.trim().is_empty() {
                continue;
            }
            stats.lines_read += 1;

            let Some((key, value)) = split_key_value(line) else {
                trace!("Skipping noise line: {}", line);
                stats.noise_lines += 1;
                continue;
            };

            let (updated, outcome) = self.apply_field(builder, key, value)?;
            builder = updated;
            match outcome {
                FieldOutcome::Assigned => stats.fields_assigned += 1,
                FieldOutcome::Degraded => {
                    stats.fields_assigned += 1;
                    stats.degraded_fields.push(key.to_string());
                }
                FieldOutcome::Ignored => stats.unknown_keys.push(key.to_string()),
            }
        }

        debug!(
            "Parsed eidenv output: {} lines, {} fields, {} unknown keys, {} degraded",
            stats.lines_read,
            stats.fields_assigned,
            stats.unknown_keys.len(),
            stats.degraded_fields.len()
        );

        Ok(ParseResult {
            record: builder.build(),
            stats,
        })
    }

    /// Apply the exit status policy of `eidenv`
    ///
    /// `eidenv` exits with status 1 after a successful read, so the tolerated
    /// codes continue to text parsing. Every other non-zero status, or a
    /// process killed by a signal, is a failure carrying the captured output.
    fn check_exit_status(&self, text: &str, exit_code: Option<i32>) -> Result<()> {
        match exit_code {
            Some(0) => Ok(()),
            Some(code) if self.tolerated_exit_codes.contains(&code) => {
                trace!("Tolerating eidenv exit status {}", code);
                Ok(())
            }
            other => Err(Error::external_tool_failure(other, text)),
        }
    }

    /// Assign one key/value pair to the record under construction
    fn apply_field(
        &self,
        builder: CardRecordBuilder,
        key: &str,
        value: &str,
    ) -> Result<(CardRecordBuilder, FieldOutcome)> {
        let policy = self.policy;
        // A parsed field that came out empty from a non-empty value was degraded
        let outcome = |parsed: bool| {
            if parsed || value.is_empty() {
                FieldOutcome::Assigned
            } else {
                FieldOutcome::Degraded
            }
        };

        let updated = match key {
            keys::CARD_NUMBER => (builder.card_number(value), FieldOutcome::Assigned),
            keys::VALID_FROM => {
                let date = parse_card_date(key, value, policy)?;
                (builder.valid_from(date), outcome(date.is_some()))
            }
            keys::VALID_TILL => {
                let date = parse_card_date(key, value, policy)?;
                (builder.valid_till(date), outcome(date.is_some()))
            }
            keys::DELIVERING_MUNICIPALITY => (
                builder.delivering_municipality(value),
                FieldOutcome::Assigned,
            ),
            keys::NATIONAL_NUMBER => (builder.national_number(value), FieldOutcome::Assigned),
            keys::NAME => (builder.name(value), FieldOutcome::Assigned),
            keys::FIRST_NAMES => (builder.first_names(value), FieldOutcome::Assigned),
            keys::INITIAL => (builder.initial(value), FieldOutcome::Assigned),
            keys::NATIONALITY => (builder.nationality(value), FieldOutcome::Assigned),
            keys::BIRTH_LOCATION => (builder.birth_location(value), FieldOutcome::Assigned),
            keys::BIRTH_DATE => {
                let date = parse_localized_date(key, value, policy)?;
                (builder.birth_date(date), outcome(date.is_some()))
            }
            keys::SEX => (
                builder.gender(Gender::from_card_code(value)),
                FieldOutcome::Assigned,
            ),
            keys::NOBLE_CONDITION => (builder.noble_condition(value), FieldOutcome::Assigned),
            keys::DOCUMENT_TYPE => {
                let document_type = parse_document_type(key, value, policy)?;
                let known = document_type.is_some_and(|kind| kind.is_known());
                (builder.document_type(document_type), outcome(known))
            }
            keys::SPECIAL_STATUS => {
                let status = parse_special_status(key, value, policy)?;
                let known = status.is_some_and(|status| status.is_known());
                (builder.special_status(status), outcome(known))
            }
            keys::STREET_AND_NUMBER => (builder.address(value), FieldOutcome::Assigned),
            keys::ZIPCODE => (builder.zipcode(value), FieldOutcome::Assigned),
            keys::MUNICIPALITY => (builder.municipality(value), FieldOutcome::Assigned),
            _ => {
                trace!("Ignoring unmodelled key {}", key);
                (builder, FieldOutcome::Ignored)
            }
        };

        Ok(updated)
    }
}

/// What happened to a single key/value pair
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FieldOutcome {
    Assigned,
    Degraded,
    Ignored,
}

/// Split a line on its first separator, trimming key and value
///
/// Values may contain the separator themselves (addresses, times).
pub fn split_key_value(line: &str) -> Option<(&str, &str)> {
    line.split_once(KEY_VALUE_SEPARATOR)
        .map(|(key, value)| (key.trim(), value.trim()))
}
