//! Field parsing utilities for `eidenv` values
//!
//! Each helper turns a raw value into its typed form. A value that does not
//! parse is either degraded to `None` (lenient) or reported as
//! [`Error::FieldParse`] (strict). Empty values mean the card left the field
//! blank and are `None` under both policies.

use super::ParsePolicy;
use super::birth_date::parse_birth_date;
use crate::app::models::{DocumentType, SpecialStatus};
use crate::constants::CARD_DATE_FORMAT;
use crate::{Error, Result};
use chrono::NaiveDate;
use tracing::warn;

/// Parse a validity date written as `DD.MM.YYYY`
pub fn parse_card_date(key: &str, value: &str, policy: ParsePolicy) -> Result<Option<NaiveDate>> {
    if value.is_empty() {
        return Ok(None);
    }

    match NaiveDate::parse_from_str(value, CARD_DATE_FORMAT) {
        Ok(date) => Ok(Some(date)),
        Err(e) => degrade(key, value, &format!("expected DD.MM.YYYY: {}", e), policy),
    }
}

/// Parse a birth date in any of the card languages
pub fn parse_localized_date(
    key: &str,
    value: &str,
    policy: ParsePolicy,
) -> Result<Option<NaiveDate>> {
    if value.is_empty() {
        return Ok(None);
    }

    match parse_birth_date(value) {
        Some(date) => Ok(Some(date)),
        None => degrade(key, value, "unrecognized birth date", policy),
    }
}

/// Parse a numeric code field
pub fn parse_code(key: &str, value: &str, policy: ParsePolicy) -> Result<Option<u32>> {
    if value.is_empty() {
        return Ok(None);
    }

    match value.parse::<u32>() {
        Ok(code) => Ok(Some(code)),
        Err(e) => degrade(key, value, &format!("invalid code: {}", e), policy),
    }
}

/// Parse and look up a document type code
pub fn parse_document_type(
    key: &str,
    value: &str,
    policy: ParsePolicy,
) -> Result<Option<DocumentType>> {
    let Some(code) = parse_code(key, value, policy)? else {
        return Ok(None);
    };

    let document_type = DocumentType::from_code(code);
    if !document_type.is_known() {
        reject_unknown(key, value, "unrecognized document type code", policy)?;
    }
    Ok(Some(document_type))
}

/// Parse and look up a special status code
pub fn parse_special_status(
    key: &str,
    value: &str,
    policy: ParsePolicy,
) -> Result<Option<SpecialStatus>> {
    let Some(code) = parse_code(key, value, policy)? else {
        return Ok(None);
    };

    let status = SpecialStatus::from_code(code);
    if !status.is_known() {
        reject_unknown(key, value, "unrecognized special status code", policy)?;
    }
    Ok(Some(status))
}

/// Apply the parse policy to a value that failed to parse
fn degrade<T>(key: &str, value: &str, reason: &str, policy: ParsePolicy) -> Result<Option<T>> {
    if policy.is_strict() {
        return Err(Error::field_parse(key, value, reason));
    }

    warn!("Leaving {} empty, could not parse '{}' ({})", key, value, reason);
    Ok(None)
}

/// Unknown codes are kept as such when lenient
fn reject_unknown(key: &str, value: &str, reason: &str, policy: ParsePolicy) -> Result<()> {
    if policy.is_strict() {
        return Err(Error::field_parse(key, value, reason));
    }

    warn!("{} for {}: '{}'", reason, key, value);
    Ok(())
}
