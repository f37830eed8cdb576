//! Application constants for eID REST
//!
//! This module contains the `eidenv` output vocabulary, lookup tables and
//! default values used throughout the application.

// =============================================================================
// eidenv Output Vocabulary
// =============================================================================

/// Marker printed by `eidenv` when the reader holds no card
pub const CARD_NOT_PRESENT_MARKER: &str = "Card not present";

/// Separator between key and value on an `eidenv` output line
pub const KEY_VALUE_SEPARATOR: char = ':';

/// Exit codes `eidenv` returns on successful reads besides 0
pub const DEFAULT_TOLERATED_EXIT_CODES: &[i32] = &[1];

/// Keys recognized in `eidenv` output
pub mod keys {
    pub const CARD_NUMBER: &str = "BELPIC_CARDNUMBER";
    pub const VALID_FROM: &str = "BELPIC_VALIDFROM";
    pub const VALID_TILL: &str = "BELPIC_VALIDTILL";
    pub const DELIVERING_MUNICIPALITY: &str = "BELPIC_DELIVERINGMUNICIPALITY";
    pub const NATIONAL_NUMBER: &str = "BELPIC_NATIONALNUMBER";
    pub const NAME: &str = "BELPIC_NAME";
    pub const FIRST_NAMES: &str = "BELPIC_FIRSTNAMES";
    pub const INITIAL: &str = "BELPIC_INITIAL";
    pub const NATIONALITY: &str = "BELPIC_NATIONALITY";
    pub const BIRTH_LOCATION: &str = "BELPIC_BIRTHLOCATION";
    pub const BIRTH_DATE: &str = "BELPIC_BIRTHDATE";
    pub const SEX: &str = "BELPIC_SEX";
    pub const NOBLE_CONDITION: &str = "BELPIC_NOBLECONDITION";
    pub const DOCUMENT_TYPE: &str = "BELPIC_DOCUMENTTYPE";
    pub const SPECIAL_STATUS: &str = "BELPIC_SPECIALSTATUS";
    pub const STREET_AND_NUMBER: &str = "BELPIC_STREETANDNUMBER";
    pub const ZIPCODE: &str = "BELPIC_ZIPCODE";
    pub const MUNICIPALITY: &str = "BELPIC_MUNICIPALITY";

    /// Every key the parser assigns to a record field
    pub const ALL: &[&str] = &[
        CARD_NUMBER,
        VALID_FROM,
        VALID_TILL,
        DELIVERING_MUNICIPALITY,
        NATIONAL_NUMBER,
        NAME,
        FIRST_NAMES,
        INITIAL,
        NATIONALITY,
        BIRTH_LOCATION,
        BIRTH_DATE,
        SEX,
        NOBLE_CONDITION,
        DOCUMENT_TYPE,
        SPECIAL_STATUS,
        STREET_AND_NUMBER,
        ZIPCODE,
        MUNICIPALITY,
    ];
}

// =============================================================================
// Date Formats
// =============================================================================

/// chrono format of validity dates and normalized birth dates
pub const CARD_DATE_FORMAT: &str = "%d.%m.%Y";

/// Month abbreviations used on cards issued in French, Dutch and German
///
/// JAN FEV MARS AVR MAI JUIN JUIL AOUT SEPT OCT NOV DEC
/// JAN FEB MAAR APR MEI JUN JUL AUG SEP OKT NOV DEC
/// JAN FEB MÄR APR MAI JUN JUL AUG SEP OKT NOV DEZ
pub const MONTH_ABBREVIATIONS: &[(&str, &str)] = &[
    ("JAN", "01"),
    ("FEB", "02"),
    ("FEV", "02"),
    ("MÄR", "03"),
    ("MAAR", "03"),
    ("MARS", "03"),
    ("APR", "04"),
    ("AVR", "04"),
    ("MAI", "05"),
    ("MEI", "05"),
    ("JUN", "06"),
    ("JUIN", "06"),
    ("JUL", "07"),
    ("JUIL", "07"),
    ("AUG", "08"),
    ("AOUT", "08"),
    ("SEP", "09"),
    ("SEPT", "09"),
    ("OKT", "10"),
    ("OCT", "10"),
    ("NOV", "11"),
    ("DEZ", "12"),
    ("DEC", "12"),
];

// =============================================================================
// Gender Codes
// =============================================================================

/// Sex codes as written on the card
///
/// The card uses V, F or W for women depending on the card language.
pub mod sex_codes {
    pub const MALE: &str = "M";
    pub const OTHER: &str = "X";
}

// =============================================================================
// Document Types
// =============================================================================

/// Document type codes and their labels
pub mod document_types {
    pub const EID: &str = "eID";
    pub const KIDS_ID: &str = "Kids ID";
    pub const BOOTSTRAP_CARD: &str = "Bootstrap card";
    pub const HABILITATION_CARD: &str = "Habilitation/machtigings card";
    pub const A_CARD: &str = "A-card";
    pub const B_CARD: &str = "B-card";
    pub const C_CARD: &str = "C-card";
    pub const D_CARD: &str = "D-card";
    pub const E_CARD: &str = "E-card";
    pub const E_PLUS_CARD: &str = "E+-card";
    pub const F_CARD: &str = "F-card";
    pub const F_PLUS_CARD: &str = "F+-card";
    pub const H_CARD: &str = "H-card";
    pub const I_CARD: &str = "I-card";
    pub const J_CARD: &str = "J-card";
    pub const M_CARD: &str = "M-card";
    pub const N_CARD: &str = "N-card";
    pub const K_CARD: &str = "K-card";
    pub const L_CARD: &str = "L-card";
    pub const EU_CARD: &str = "EU-card";
    pub const EU_PLUS_CARD: &str = "EU+-card";

    /// Legally defined document type codes (several codes share a label)
    pub const CODES: &[(u32, &str)] = &[
        (1, EID),
        (6, KIDS_ID),
        (7, BOOTSTRAP_CARD),
        (8, HABILITATION_CARD),
        (11, A_CARD),
        (12, B_CARD),
        (13, C_CARD),
        (14, D_CARD),
        (15, E_CARD),
        (16, E_PLUS_CARD),
        (17, F_CARD),
        (18, F_PLUS_CARD),
        (19, H_CARD),
        (20, I_CARD),
        (21, J_CARD),
        (22, M_CARD),
        (23, N_CARD),
        (27, K_CARD),
        (28, L_CARD),
        (31, EU_CARD),
        (32, EU_PLUS_CARD),
        (33, A_CARD),
        (34, B_CARD),
        (35, F_CARD),
        (36, F_PLUS_CARD),
    ];
}

// =============================================================================
// Special Status
// =============================================================================

/// Special status codes as defined for the eID card
pub mod special_status {
    /// No status
    pub const NO_STATUS: u32 = 0;

    /// White cane (blind people)
    pub const WHITE_CANE: u32 = 1;

    /// Extended minority
    pub const EXTENDED_MINORITY: u32 = 2;

    /// White cane + extended minority
    pub const WHITE_CANE_EXTENDED_MINORITY: u32 = 3;

    /// Yellow cane (partially sighted people)
    pub const YELLOW_CANE: u32 = 4;

    /// Yellow cane + extended minority
    pub const YELLOW_CANE_EXTENDED_MINORITY: u32 = 5;
}

/// Label for a special status code, `None` when the code is not defined
pub fn special_status_label(code: u32) -> Option<&'static str> {
    match code {
        special_status::NO_STATUS => Some("No status"),
        special_status::WHITE_CANE => Some("White cane"),
        special_status::EXTENDED_MINORITY => Some("Extended minority"),
        special_status::WHITE_CANE_EXTENDED_MINORITY => Some("White cane + extended minority"),
        special_status::YELLOW_CANE => Some("Yellow cane"),
        special_status::YELLOW_CANE_EXTENDED_MINORITY => Some("Yellow cane + extended minority"),
        _ => None,
    }
}

/// Label for a document type code, `None` when the code is not defined
pub fn document_type_label(code: u32) -> Option<&'static str> {
    document_types::CODES
        .iter()
        .find(|(known, _)| *known == code)
        .map(|(_, label)| *label)
}

/// Numeric month for a month abbreviation (exact, case-sensitive match)
pub fn month_number(abbreviation: &str) -> Option<&'static str> {
    MONTH_ABBREVIATIONS
        .iter()
        .find(|(name, _)| *name == abbreviation)
        .map(|(_, number)| *number)
}

// =============================================================================
// Server Defaults
// =============================================================================

/// Default name of the card reading utility
pub const DEFAULT_EIDENV_PROGRAM: &str = "eidenv";

/// Default bind address of the HTTP server
pub const DEFAULT_BIND_ADDRESS: &str = "0.0.0.0";

/// Default port of the HTTP server
pub const DEFAULT_PORT: u16 = 8080;

/// Default time a single card read may take
pub const DEFAULT_READ_TIMEOUT_SECS: u64 = 30;

/// Body of the root endpoint
pub const ROOT_BANNER: &str = "EID API endpoint";

// =============================================================================
// Environment Variables
// =============================================================================

pub mod env_vars {
    pub const BIND_ADDRESS: &str = "EID_REST_BIND_ADDRESS";
    pub const PORT: &str = "EID_REST_PORT";
    pub const AUTH_TOKEN: &str = "EID_REST_AUTH_TOKEN";
    pub const EIDENV_PATH: &str = "EIDENV_PATH";
    pub const TIMEOUT_SECS: &str = "EID_REST_TIMEOUT_SECS";
    pub const STRICT: &str = "EID_REST_STRICT";
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_month_table_covers_every_month() {
        let months: HashSet<&str> = MONTH_ABBREVIATIONS.iter().map(|(_, n)| *n).collect();
        assert_eq!(months.len(), 12);
        assert_eq!(MONTH_ABBREVIATIONS.len(), 23);
    }

    #[test]
    fn test_month_number_is_exact() {
        assert_eq!(month_number("MÄR"), Some("03"));
        assert_eq!(month_number("SEPT"), Some("09"));
        assert_eq!(month_number("sept"), None);
        assert_eq!(month_number("SEPTEMBER"), None);
    }

    #[test]
    fn test_document_type_labels() {
        assert_eq!(document_types::CODES.len(), 25);
        assert_eq!(document_type_label(1), Some("eID"));
        assert_eq!(document_type_label(11), document_type_label(33));
        assert_eq!(document_type_label(99), None);
        assert_eq!(document_type_label(0), None);

        let labels: HashSet<&str> = document_types::CODES.iter().map(|(_, l)| *l).collect();
        assert_eq!(labels.len(), 21);
    }

    #[test]
    fn test_special_status_labels() {
        assert_eq!(special_status_label(0), Some("No status"));
        assert_eq!(
            special_status_label(5),
            Some("Yellow cane + extended minority")
        );
        assert_eq!(special_status_label(6), None);
    }

    #[test]
    fn test_all_keys_are_distinct() {
        let keys: HashSet<&str> = keys::ALL.iter().copied().collect();
        assert_eq!(keys.len(), keys::ALL.len());
        assert_eq!(keys.len(), 18);
    }
}
