//! Integration tests for the eidenv parser and card reader
//!
//! These tests drive the public API end to end: captured eidenv output from
//! cards issued in each language, and on unix a fake eidenv executable run
//! through the real process reader.

use chrono::NaiveDate;
use eid_rest::{
    CardReader, CardService, Config, DocumentType, EidenvParser, EidenvReader, Error, Gender,
    ParsePolicy, ReaderOutput, SpecialStatus,
};
use std::time::Duration;

/// Output of eidenv for a card issued in French
const FRENCH_CARD: &str = "\
eidenv 0.23.0 [OpenSC]
Using reader with a card: Gemalto PC Twin Reader 00 00
BELPIC_CARDNUMBER: 592-7654321-01
BELPIC_CHIPNUMBER: 534C4700000000000000000000000000
BELPIC_VALIDFROM: 14.02.2019
BELPIC_VALIDTILL: 14.02.2029
BELPIC_DELIVERINGMUNICIPALITY: Liège
BELPIC_NATIONALNUMBER: 78091512345
BELPIC_NAME: Dubois
BELPIC_FIRSTNAMES: Jean Luc
BELPIC_INITIAL: P
BELPIC_NATIONALITY: Belge
BELPIC_BIRTHLOCATION: Namur
BELPIC_BIRTHDATE: 15 SEPT 1978
BELPIC_SEX: M
BELPIC_NOBLECONDITION:
BELPIC_DOCUMENTTYPE: 1
BELPIC_SPECIALSTATUS: 1
BELPIC_STREETANDNUMBER: Rue de l'Université 7: 2e étage
BELPIC_ZIPCODE: 4000
BELPIC_MUNICIPALITY: Liège
";

/// Output of eidenv for a German residence card
const GERMAN_CARD: &str = "\
BELPIC_CARDNUMBER: B123456789
BELPIC_NAME: Müller
BELPIC_BIRTHDATE: 01 MÄR 1990
BELPIC_SEX: W
BELPIC_DOCUMENTTYPE: 33
BELPIC_SPECIALSTATUS: 0
";

fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

#[test]
fn test_parse_french_card() {
    let record = EidenvParser::default().parse(FRENCH_CARD, Some(1)).unwrap();

    assert_eq!(record.card_number(), "592-7654321-01");
    assert_eq!(record.valid_from(), Some(date(2019, 2, 14)));
    assert_eq!(record.valid_till(), Some(date(2029, 2, 14)));
    assert_eq!(record.delivering_municipality(), "Liège");
    assert_eq!(record.national_number(), "78091512345");
    assert_eq!(record.name(), "Dubois");
    assert_eq!(record.first_names(), "Jean Luc");
    assert_eq!(record.initial(), "P");
    assert_eq!(record.nationality(), "Belge");
    assert_eq!(record.birth_location(), "Namur");
    assert_eq!(record.birth_date(), Some(date(1978, 9, 15)));
    assert_eq!(record.gender(), Some(Gender::Male));
    assert_eq!(record.noble_condition(), "");
    assert_eq!(record.document_type(), Some(DocumentType::Eid));
    assert_eq!(record.special_status(), Some(SpecialStatus::WhiteCane));
    assert_eq!(record.address(), "Rue de l'Université 7: 2e étage");
    assert_eq!(record.zipcode(), "4000");
    assert_eq!(record.municipality(), "Liège");
    assert_eq!(record.is_valid_on(date(2024, 1, 1)), Some(true));
}

#[test]
fn test_parse_german_residence_card() {
    let record = EidenvParser::new(ParsePolicy::Strict)
        .parse(GERMAN_CARD, Some(0))
        .unwrap();

    assert_eq!(record.name(), "Müller");
    assert_eq!(record.birth_date(), Some(date(1990, 3, 1)));
    assert_eq!(record.gender(), Some(Gender::Female));
    assert_eq!(record.document_type(), Some(DocumentType::ACard));
    assert_eq!(record.special_status(), Some(SpecialStatus::NoStatus));
    assert_eq!(record.valid_from(), None);
}

#[test]
fn test_record_json_shape() {
    let record = EidenvParser::default().parse(FRENCH_CARD, Some(1)).unwrap();
    let json = serde_json::to_value(&record).unwrap();

    assert_eq!(json["cardNumber"], "592-7654321-01");
    assert_eq!(json["validFrom"], "2019-02-14");
    assert_eq!(json["birthDate"], "1978-09-15");
    assert_eq!(json["gender"], "M");
    assert_eq!(json["documentType"], "eID");
    assert_eq!(json["specialStatus"], "White cane");
    assert_eq!(json["nobleCondition"], "");
    assert_eq!(json.as_object().unwrap().len(), 18);
}

#[test]
fn test_card_not_present_wins_over_partial_output() {
    let text = "BELPIC_CARDNUMBER: 592-7654321-01\nCard not present\nBELPIC_VALIDFROM: garbage\n";

    let lenient = EidenvParser::default().parse(text, Some(1));
    assert!(matches!(lenient, Err(Error::CardNotPresent)));

    let strict = EidenvParser::new(ParsePolicy::Strict).parse(text, Some(1));
    assert!(matches!(strict, Err(Error::CardNotPresent)));
}

#[test]
fn test_policies_on_malformed_values() {
    let text = "BELPIC_NAME: Peeters\nBELPIC_VALIDTILL: 31.02.2030\nBELPIC_DOCUMENTTYPE: 99\n";

    let result = EidenvParser::default().parse_with_stats(text, Some(1)).unwrap();
    assert_eq!(result.record.name(), "Peeters");
    assert_eq!(result.record.valid_till(), None);
    assert_eq!(result.record.document_type(), Some(DocumentType::Unknown(99)));
    assert_eq!(
        result.stats.degraded_fields,
        vec!["BELPIC_VALIDTILL", "BELPIC_DOCUMENTTYPE"]
    );

    let strict = EidenvParser::new(ParsePolicy::Strict).parse(text, Some(1));
    assert!(matches!(
        strict,
        Err(Error::FieldParse { ref key, .. }) if key == "BELPIC_VALIDTILL"
    ));
}

#[test]
fn test_unexpected_exit_status() {
    let output = ReaderOutput::new("SCardEstablishContext failed\n", Some(3));
    let result = EidenvParser::default().parse_output(&output);

    match result {
        Err(Error::ExternalToolFailure { exit_code, output }) => {
            assert_eq!(exit_code, Some(3));
            assert!(output.contains("SCardEstablishContext"));
        }
        other => panic!("expected tool failure, got {:?}", other),
    }

    let tolerant = EidenvParser::default().with_tolerated_exit_codes(vec![1, 3]);
    assert!(tolerant.parse_output(&output).is_ok());
}

#[test]
fn test_parse_capture_from_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("capture.txt");
    std::fs::write(&path, FRENCH_CARD).unwrap();

    let output = ReaderOutput::new(std::fs::read(&path).unwrap(), Some(1));
    let record = Config::default().to_parser().parse_output(&output).unwrap();
    assert_eq!(record.name(), "Dubois");
}

#[tokio::test]
async fn test_missing_reader_program() {
    let reader = EidenvReader::new("/nonexistent/bin/eidenv", Duration::from_secs(1));
    let result = reader.read_output().await;
    assert!(matches!(result, Err(Error::ReaderNotFound { .. })));
}

#[cfg(unix)]
mod process {
    use super::*;
    use std::os::unix::fs::PermissionsExt;
    use std::path::{Path, PathBuf};

    fn install_fake_eidenv(dir: &Path, stdout: &str, exit_code: i32) -> PathBuf {
        let capture = dir.join("capture.txt");
        std::fs::write(&capture, stdout).unwrap();

        let script = dir.join("eidenv");
        std::fs::write(
            &script,
            format!("#!/bin/sh\ncat '{}'\nexit {}\n", capture.display(), exit_code),
        )
        .unwrap();
        std::fs::set_permissions(&script, std::fs::Permissions::from_mode(0o755)).unwrap();
        script
    }

    #[tokio::test]
    async fn test_read_card_through_fake_eidenv() {
        let dir = tempfile::tempdir().unwrap();
        let script = install_fake_eidenv(dir.path(), FRENCH_CARD, 1);

        let config = Config::default().with_eidenv_program(&script);
        let service = CardService::new(config.to_reader(), config.to_parser());

        let record = service.read_card().await.unwrap();
        assert_eq!(record.card_number(), "592-7654321-01");
        assert_eq!(record.birth_date(), Some(date(1978, 9, 15)));
    }

    #[tokio::test]
    async fn test_fake_eidenv_without_card() {
        let dir = tempfile::tempdir().unwrap();
        let script = install_fake_eidenv(dir.path(), "Card not present\n", 1);

        let config = Config::default().with_eidenv_program(&script);
        let service = CardService::new(config.to_reader(), config.to_parser());

        let result = service.read_card().await;
        assert!(matches!(result, Err(Error::CardNotPresent)));
        assert!(result.unwrap_err().is_retryable());
    }
}
