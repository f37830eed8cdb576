//! Data models for eID card reads
//!
//! This module contains the card record produced by a single `eidenv` read and
//! the closed enumerations used for its coded fields.

use crate::constants::{self, document_types, sex_codes, special_status};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;

// =============================================================================
// Card Record
// =============================================================================

/// Identity data read from one Belgian eID card
///
/// A record is only obtainable through [`CardRecordBuilder::build`] or by
/// deserializing a previously serialized record; it offers no mutation.
/// Fields that `eidenv` did not print (or that failed to parse under the
/// lenient policy) are empty strings or `None`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardRecord {
    card_number: String,
    valid_from: Option<NaiveDate>,
    valid_till: Option<NaiveDate>,
    delivering_municipality: String,
    national_number: String,
    name: String,
    first_names: String,
    initial: String,
    nationality: String,
    birth_location: String,
    birth_date: Option<NaiveDate>,
    gender: Option<Gender>,
    noble_condition: String,
    document_type: Option<DocumentType>,
    special_status: Option<SpecialStatus>,
    address: String,
    zipcode: String,
    municipality: String,
}

impl CardRecord {
    /// Start building a record
    pub fn builder() -> CardRecordBuilder {
        CardRecordBuilder::default()
    }

    pub fn card_number(&self) -> &str {
        &self.card_number
    }

    pub fn valid_from(&self) -> Option<NaiveDate> {
        self.valid_from
    }

    pub fn valid_till(&self) -> Option<NaiveDate> {
        self.valid_till
    }

    pub fn delivering_municipality(&self) -> &str {
        &self.delivering_municipality
    }

    pub fn national_number(&self) -> &str {
        &self.national_number
    }

    /// Surname
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn first_names(&self) -> &str {
        &self.first_names
    }

    pub fn initial(&self) -> &str {
        &self.initial
    }

    pub fn nationality(&self) -> &str {
        &self.nationality
    }

    pub fn birth_location(&self) -> &str {
        &self.birth_location
    }

    pub fn birth_date(&self) -> Option<NaiveDate> {
        self.birth_date
    }

    pub fn gender(&self) -> Option<Gender> {
        self.gender
    }

    pub fn noble_condition(&self) -> &str {
        &self.noble_condition
    }

    pub fn document_type(&self) -> Option<DocumentType> {
        self.document_type
    }

    pub fn special_status(&self) -> Option<SpecialStatus> {
        self.special_status
    }

    /// Street and house number
    pub fn address(&self) -> &str {
        &self.address
    }

    pub fn zipcode(&self) -> &str {
        &self.zipcode
    }

    pub fn municipality(&self) -> &str {
        &self.municipality
    }

    /// Check if the card is valid on the given day
    ///
    /// Returns `None` when the validity window was not read from the card.
    pub fn is_valid_on(&self, day: NaiveDate) -> Option<bool> {
        match (self.valid_from, self.valid_till) {
            (Some(from), Some(till)) => Some(from <= day && day <= till),
            _ => None,
        }
    }
}

/// Accumulates fields while `eidenv` output is scanned
#[derive(Debug, Clone, Default)]
pub struct CardRecordBuilder {
    record: CardRecord,
}

impl CardRecordBuilder {
    pub fn card_number(mut self, value: impl Into<String>) -> Self {
        self.record.card_number = value.into();
        self
    }

    pub fn valid_from(mut self, value: Option<NaiveDate>) -> Self {
        self.record.valid_from = value;
        self
    }

    pub fn valid_till(mut self, value: Option<NaiveDate>) -> Self {
        self.record.valid_till = value;
        self
    }

    pub fn delivering_municipality(mut self, value: impl Into<String>) -> Self {
        self.record.delivering_municipality = value.into();
        self
    }

    pub fn national_number(mut self, value: impl Into<String>) -> Self {
        self.record.national_number = value.into();
        self
    }

    pub fn name(mut self, value: impl Into<String>) -> Self {
        self.record.name = value.into();
        self
    }

    pub fn first_names(mut self, value: impl Into<String>) -> Self {
        self.record.first_names = value.into();
        self
    }

    pub fn initial(mut self, value: impl Into<String>) -> Self {
        self.record.initial = value.into();
        self
    }

    pub fn nationality(mut self, value: impl Into<String>) -> Self {
        self.record.nationality = value.into();
        self
    }

    pub fn birth_location(mut self, value: impl Into<String>) -> Self {
        self.record.birth_location = value.into();
        self
    }

    pub fn birth_date(mut self, value: Option<NaiveDate>) -> Self {
        self.record.birth_date = value;
        self
    }

    pub fn gender(mut self, value: Gender) -> Self {
        self.record.gender = Some(value);
        self
    }

    pub fn noble_condition(mut self, value: impl Into<String>) -> Self {
        self.record.noble_condition = value.into();
        self
    }

    pub fn document_type(mut self, value: Option<DocumentType>) -> Self {
        self.record.document_type = value;
        self
    }

    pub fn special_status(mut self, value: Option<SpecialStatus>) -> Self {
        self.record.special_status = value;
        self
    }

    pub fn address(mut self, value: impl Into<String>) -> Self {
        self.record.address = value.into();
        self
    }

    pub fn zipcode(mut self, value: impl Into<String>) -> Self {
        self.record.zipcode = value.into();
        self
    }

    pub fn municipality(mut self, value: impl Into<String>) -> Self {
        self.record.municipality = value.into();
        self
    }

    /// Finish the record
    pub fn build(self) -> CardRecord {
        self.record
    }
}

// =============================================================================
// Reader Output
// =============================================================================

/// Captured result of one run of the card reading utility
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ReaderOutput {
    /// Raw standard output
    pub stdout: Vec<u8>,

    /// Process exit code, `None` when the process was terminated by a signal
    pub exit_code: Option<i32>,
}

impl ReaderOutput {
    pub fn new(stdout: impl Into<Vec<u8>>, exit_code: Option<i32>) -> Self {
        Self {
            stdout: stdout.into(),
            exit_code,
        }
    }

    /// Standard output decoded as UTF-8, invalid sequences replaced
    pub fn text(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.stdout)
    }
}

// =============================================================================
// Gender
// =============================================================================

/// Gender of the card holder, simplified to three values
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Gender {
    #[serde(rename = "M")]
    Male,
    #[serde(rename = "F")]
    Female,
    #[serde(rename = "X")]
    Other,
}

impl Gender {
    /// Normalize a sex code from the card
    ///
    /// Total over every input: women are written V, F or W depending on the
    /// card language, so everything except M and X is female.
    pub fn from_card_code(code: &str) -> Self {
        match code {
            sex_codes::MALE => Gender::Male,
            sex_codes::OTHER => Gender::Other,
            _ => Gender::Female,
        }
    }

    /// Single-letter code used in serialized records
    pub fn code(self) -> &'static str {
        match self {
            Gender::Male => "M",
            Gender::Female => "F",
            Gender::Other => "X",
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

// =============================================================================
// Document Type
// =============================================================================

/// Card category identified by the document type code
///
/// Codes missing from the legal table are kept as [`DocumentType::Unknown`]
/// so they never pass for a real category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum DocumentType {
    Eid,
    KidsId,
    BootstrapCard,
    HabilitationCard,
    ACard,
    BCard,
    CCard,
    DCard,
    ECard,
    EPlusCard,
    FCard,
    FPlusCard,
    HCard,
    ICard,
    JCard,
    MCard,
    NCard,
    KCard,
    LCard,
    EuCard,
    EuPlusCard,
    /// Code not present in the document type table
    Unknown(u32),
}

impl DocumentType {
    /// Every labelled document type
    pub const KNOWN: [DocumentType; 21] = [
        DocumentType::Eid,
        DocumentType::KidsId,
        DocumentType::BootstrapCard,
        DocumentType::HabilitationCard,
        DocumentType::ACard,
        DocumentType::BCard,
        DocumentType::CCard,
        DocumentType::DCard,
        DocumentType::ECard,
        DocumentType::EPlusCard,
        DocumentType::FCard,
        DocumentType::FPlusCard,
        DocumentType::HCard,
        DocumentType::ICard,
        DocumentType::JCard,
        DocumentType::MCard,
        DocumentType::NCard,
        DocumentType::KCard,
        DocumentType::LCard,
        DocumentType::EuCard,
        DocumentType::EuPlusCard,
    ];

    /// Look up a document type code
    pub fn from_code(code: u32) -> Self {
        match code {
            1 => DocumentType::Eid,
            6 => DocumentType::KidsId,
            7 => DocumentType::BootstrapCard,
            8 => DocumentType::HabilitationCard,
            11 | 33 => DocumentType::ACard,
            12 | 34 => DocumentType::BCard,
            13 => DocumentType::CCard,
            14 => DocumentType::DCard,
            15 => DocumentType::ECard,
            16 => DocumentType::EPlusCard,
            17 | 35 => DocumentType::FCard,
            18 | 36 => DocumentType::FPlusCard,
            19 => DocumentType::HCard,
            20 => DocumentType::ICard,
            21 => DocumentType::JCard,
            22 => DocumentType::MCard,
            23 => DocumentType::NCard,
            27 => DocumentType::KCard,
            28 => DocumentType::LCard,
            31 => DocumentType::EuCard,
            32 => DocumentType::EuPlusCard,
            other => DocumentType::Unknown(other),
        }
    }

    /// Human-readable label, `None` for unknown codes
    pub fn label(self) -> Option<&'static str> {
        let label = match self {
            DocumentType::Eid => document_types::EID,
            DocumentType::KidsId => document_types::KIDS_ID,
            DocumentType::BootstrapCard => document_types::BOOTSTRAP_CARD,
            DocumentType::HabilitationCard => document_types::HABILITATION_CARD,
            DocumentType::ACard => document_types::A_CARD,
            DocumentType::BCard => document_types::B_CARD,
            DocumentType::CCard => document_types::C_CARD,
            DocumentType::DCard => document_types::D_CARD,
            DocumentType::ECard => document_types::E_CARD,
            DocumentType::EPlusCard => document_types::E_PLUS_CARD,
            DocumentType::FCard => document_types::F_CARD,
            DocumentType::FPlusCard => document_types::F_PLUS_CARD,
            DocumentType::HCard => document_types::H_CARD,
            DocumentType::ICard => document_types::I_CARD,
            DocumentType::JCard => document_types::J_CARD,
            DocumentType::MCard => document_types::M_CARD,
            DocumentType::NCard => document_types::N_CARD,
            DocumentType::KCard => document_types::K_CARD,
            DocumentType::LCard => document_types::L_CARD,
            DocumentType::EuCard => document_types::EU_CARD,
            DocumentType::EuPlusCard => document_types::EU_PLUS_CARD,
            DocumentType::Unknown(_) => return None,
        };
        Some(label)
    }

    pub fn is_known(self) -> bool {
        !matches!(self, DocumentType::Unknown(_))
    }
}

impl fmt::Display for DocumentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DocumentType::Unknown(code) => write_unknown(f, *code),
            known => f.write_str(known.label().unwrap_or_default()),
        }
    }
}

impl FromStr for DocumentType {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let s = s.trim();
        DocumentType::KNOWN
            .into_iter()
            .find(|kind| kind.label() == Some(s))
            .or_else(|| parse_unknown(s).map(DocumentType::Unknown))
            .ok_or_else(|| format!("Invalid document type '{}'", s))
    }
}

impl From<DocumentType> for String {
    fn from(kind: DocumentType) -> Self {
        kind.to_string()
    }
}

impl TryFrom<String> for DocumentType {
    type Error = String;

    fn try_from(value: String) -> std::result::Result<Self, Self::Error> {
        value.parse()
    }
}

// =============================================================================
// Special Status
// =============================================================================

/// Special status printed on the card
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum SpecialStatus {
    NoStatus,
    WhiteCane,
    ExtendedMinority,
    WhiteCaneExtendedMinority,
    YellowCane,
    YellowCaneExtendedMinority,
    /// Code outside 0-5
    Unknown(u32),
}

impl SpecialStatus {
    /// Every labelled special status
    pub const KNOWN: [SpecialStatus; 6] = [
        SpecialStatus::NoStatus,
        SpecialStatus::WhiteCane,
        SpecialStatus::ExtendedMinority,
        SpecialStatus::WhiteCaneExtendedMinority,
        SpecialStatus::YellowCane,
        SpecialStatus::YellowCaneExtendedMinority,
    ];

    /// Look up a special status code
    pub fn from_code(code: u32) -> Self {
        match code {
            special_status::NO_STATUS => SpecialStatus::NoStatus,
            special_status::WHITE_CANE => SpecialStatus::WhiteCane,
            special_status::EXTENDED_MINORITY => SpecialStatus::ExtendedMinority,
            special_status::WHITE_CANE_EXTENDED_MINORITY => {
                SpecialStatus::WhiteCaneExtendedMinority
            }
            special_status::YELLOW_CANE => SpecialStatus::YellowCane,
            special_status::YELLOW_CANE_EXTENDED_MINORITY => {
                SpecialStatus::YellowCaneExtendedMinority
            }
            other => SpecialStatus::Unknown(other),
        }
    }

    /// Numeric code of this status
    pub fn code(self) -> u32 {
        match self {
            SpecialStatus::NoStatus => special_status::NO_STATUS,
            SpecialStatus::WhiteCane => special_status::WHITE_CANE,
            SpecialStatus::ExtendedMinority => special_status::EXTENDED_MINORITY,
            SpecialStatus::WhiteCaneExtendedMinority => {
                special_status::WHITE_CANE_EXTENDED_MINORITY
            }
            SpecialStatus::YellowCane => special_status::YELLOW_CANE,
            SpecialStatus::YellowCaneExtendedMinority => {
                special_status::YELLOW_CANE_EXTENDED_MINORITY
            }
            SpecialStatus::Unknown(code) => code,
        }
    }

    /// Human-readable label, `None` for unknown codes
    pub fn label(self) -> Option<&'static str> {
        match self {
            SpecialStatus::Unknown(_) => None,
            known => constants::special_status_label(known.code()),
        }
    }

    pub fn is_known(self) -> bool {
        !matches!(self, SpecialStatus::Unknown(_))
    }
}

impl fmt::Display for SpecialStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.label() {
            Some(label) => f.write_str(label),
            None => write_unknown(f, self.code()),
        }
    }
}

impl FromStr for SpecialStatus {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let s = s.trim();
        SpecialStatus::KNOWN
            .into_iter()
            .find(|status| status.label() == Some(s))
            .or_else(|| parse_unknown(s).map(SpecialStatus::Unknown))
            .ok_or_else(|| format!("Invalid special status '{}'", s))
    }
}

impl From<SpecialStatus> for String {
    fn from(status: SpecialStatus) -> Self {
        status.to_string()
    }
}

impl TryFrom<String> for SpecialStatus {
    type Error = String;

    fn try_from(value: String) -> std::result::Result<Self, Self::Error> {
        value.parse()
    }
}

// =============================================================================
// Unknown code rendering
// =============================================================================

const UNKNOWN_PREFIX: &str = "Unknown (";

fn write_unknown(f: &mut fmt::Formatter<'_>, code: u32) -> fmt::Result {
    write!(f, "{}{})", UNKNOWN_PREFIX, code)
}

fn parse_unknown(s: &str) -> Option<u32> {
    s.strip_prefix(UNKNOWN_PREFIX)?
        .strip_suffix(')')?
        .parse()
        .ok()
}
