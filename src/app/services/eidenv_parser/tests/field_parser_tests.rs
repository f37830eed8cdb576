//! Tests for per-field parsing and the parse policy

use super::date;
use crate::Error;
use crate::app::models::{DocumentType, SpecialStatus};
use crate::app::services::eidenv_parser::ParsePolicy;
use crate::app::services::eidenv_parser::field_parsers::{
    parse_card_date, parse_code, parse_document_type, parse_localized_date, parse_special_status,
};

const KEY: &str = "BELPIC_TEST";

#[test]
fn test_card_date_is_day_month_year() {
    let parsed = parse_card_date(KEY, "01.06.2030", ParsePolicy::Lenient).unwrap();
    assert_eq!(parsed, Some(date(2030, 6, 1)));
}

#[test]
fn test_card_date_does_not_translate_month_names() {
    let parsed = parse_card_date(KEY, "01.JUN.2030", ParsePolicy::Lenient).unwrap();
    assert_eq!(parsed, None);
}

#[test]
fn test_bad_date_policy() {
    assert_eq!(
        parse_card_date(KEY, "2030-06-01", ParsePolicy::Lenient).unwrap(),
        None
    );

    let err = parse_card_date(KEY, "2030-06-01", ParsePolicy::Strict).unwrap_err();
    match err {
        Error::FieldParse { key, value, .. } => {
            assert_eq!(key, KEY);
            assert_eq!(value, "2030-06-01");
        }
        other => panic!("unexpected error: {:?}", other),
    }
}

#[test]
fn test_empty_values_are_absent_under_both_policies() {
    for policy in [ParsePolicy::Lenient, ParsePolicy::Strict] {
        assert_eq!(parse_card_date(KEY, "", policy).unwrap(), None);
        assert_eq!(parse_localized_date(KEY, "", policy).unwrap(), None);
        assert_eq!(parse_code(KEY, "", policy).unwrap(), None);
        assert_eq!(parse_document_type(KEY, "", policy).unwrap(), None);
    }
}

#[test]
fn test_localized_date_policy() {
    assert_eq!(
        parse_localized_date(KEY, "03 MEI 1985", ParsePolicy::Strict).unwrap(),
        Some(date(1985, 5, 3))
    );
    assert_eq!(
        parse_localized_date(KEY, "03 MAY 1985", ParsePolicy::Lenient).unwrap(),
        None
    );
    assert!(parse_localized_date(KEY, "03 MAY 1985", ParsePolicy::Strict).is_err());
}

#[test]
fn test_document_type_codes() {
    let lenient = ParsePolicy::Lenient;
    assert_eq!(
        parse_document_type(KEY, "11", lenient).unwrap(),
        parse_document_type(KEY, "33", lenient).unwrap()
    );
    assert_eq!(
        parse_document_type(KEY, "6", lenient).unwrap(),
        Some(DocumentType::KidsId)
    );
}

#[test]
fn test_unknown_document_type_is_explicit() {
    assert_eq!(
        parse_document_type(KEY, "99", ParsePolicy::Lenient).unwrap(),
        Some(DocumentType::Unknown(99))
    );
    assert!(parse_document_type(KEY, "99", ParsePolicy::Strict).is_err());
}

#[test]
fn test_non_numeric_codes() {
    assert_eq!(
        parse_document_type(KEY, "eID", ParsePolicy::Lenient).unwrap(),
        None
    );
    assert_eq!(
        parse_special_status(KEY, "-1", ParsePolicy::Lenient).unwrap(),
        None
    );
    assert!(parse_special_status(KEY, "none", ParsePolicy::Strict).is_err());
}

#[test]
fn test_special_status_codes() {
    let lenient = ParsePolicy::Lenient;
    assert_eq!(
        parse_special_status(KEY, "0", lenient).unwrap(),
        Some(SpecialStatus::NoStatus)
    );
    assert_eq!(
        parse_special_status(KEY, "4", lenient).unwrap(),
        Some(SpecialStatus::YellowCane)
    );
    assert_eq!(
        parse_special_status(KEY, "7", lenient).unwrap(),
        Some(SpecialStatus::Unknown(7))
    );
    assert!(parse_special_status(KEY, "7", ParsePolicy::Strict).is_err());
}
