//! Birth date normalization
//!
//! The card prints birth dates in the language of the issuing municipality,
//! either as `DD MMM YYYY` (French, Dutch, German) or as `DD.MMM.YYYY`
//! (German). Month names are three or four letter abbreviations, and some
//! cards carry more spaces than needed.

use crate::constants::{CARD_DATE_FORMAT, MONTH_ABBREVIATIONS, month_number};
use chrono::NaiveDate;
use tracing::trace;

/// Parse a birth date as printed on the card
///
/// Returns `None` when the string does not describe a valid date in any of
/// the supported forms.
pub fn parse_birth_date(input: &str) -> Option<NaiveDate> {
    let parts: Vec<&str> = input.split(' ').filter(|part| !part.trim().is_empty()).collect();

    let numeric = if let [day, month, year] = parts.as_slice() {
        format!("{}.{}.{}", day, translate_month(month), year)
    } else {
        // German form, the whole string is one dotted token
        replace_month_names(input.trim())
    };

    trace!("Normalized birth date '{}' to '{}'", input, numeric);
    NaiveDate::parse_from_str(&numeric, CARD_DATE_FORMAT).ok()
}

/// Translate a month token, trying an exact match before substrings
fn translate_month(token: &str) -> String {
    match month_number(token) {
        Some(number) => number.to_string(),
        None => replace_month_names(token),
    }
}

/// Replace every month abbreviation in `text` with its number
///
/// Longer abbreviations go first so SEPT is not read as SEP followed by T.
fn replace_month_names(text: &str) -> String {
    let mut by_length: Vec<&(&str, &str)> = MONTH_ABBREVIATIONS.iter().collect();
    by_length.sort_by_key(|(name, _)| std::cmp::Reverse(name.chars().count()));

    by_length
        .into_iter()
        .fold(text.to_string(), |acc, (name, number)| acc.replace(name, number))
}
