//! Test utilities and fixtures for `eidenv` parser testing

use chrono::NaiveDate;

mod field_parser_tests;

/// Complete `eidenv` output for a Dutch-language eID card
pub fn create_full_eidenv_output() -> String {
    r#"eidenv 0.23.0 [OpenSC]
Using reader with a card: Alcor Micro AU9560 00 00

BELPIC_CARDNUMBER: 591-1234567-89
BELPIC_CHIPNUMBER: 534C4731B5F40E0C0F27194B4B2A2F31
BELPIC_VALIDFROM: 01.06.2020
BELPIC_VALIDTILL: 01.06.2030
BELPIC_DELIVERINGMUNICIPALITY: Gent
BELPIC_NATIONALNUMBER: 85050312345
BELPIC_NAME: Peeters
BELPIC_FIRSTNAMES: Marie Anne
BELPIC_INITIAL: J
BELPIC_NATIONALITY: Belg
BELPIC_BIRTHLOCATION: Antwerpen
BELPIC_BIRTHDATE: 03 MEI 1985
BELPIC_SEX: V
BELPIC_NOBLECONDITION: Gravin
BELPIC_DOCUMENTTYPE: 1
BELPIC_SPECIALSTATUS: 0
BELPIC_STREETANDNUMBER: Korenmarkt 1 bus 2
BELPIC_ZIPCODE: 9000
BELPIC_MUNICIPALITY: Gent
"#
    .to_string()
}

/// Output `eidenv` prints when the reader is empty
pub fn create_card_not_present_output() -> String {
    r#"eidenv 0.23.0 [OpenSC]
Using reader with a card: Alcor Micro AU9560 00 00
Card not present.
"#
    .to_string()
}

/// Helper to build a calendar date in tests
pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}
