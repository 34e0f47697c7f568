//! Password locking.

use pdfsmith::config::{CompressionLevel, WriteOptions};
use pdfsmith::error::ErrorCategory;
use pdfsmith::ops;
use pdfsmith::request::{Credential, EncryptRequest, InputFile, MergeRequest, Request};
use pdfsmith::PdfSmithError;

use crate::common::{contains, open_locked, page_labels, pdf_input};

const PASSWORD: &str = "correct horse";

fn locked_bytes() -> Vec<u8> {
    ops::execute(
        &Request::Encrypt(EncryptRequest {
            file: pdf_input("plain.pdf", "private", 2),
            credential: Credential::new(PASSWORD).unwrap(),
        }),
        &WriteOptions::with_compression(CompressionLevel::None),
    )
    .unwrap()
    .bytes
}

#[test]
fn test_correct_password_opens_document() {
    let doc = open_locked(&locked_bytes(), PASSWORD).unwrap();
    assert_eq!(page_labels(&doc), vec!["private-1", "private-2"]);
}

#[test]
fn test_wrong_password_is_refused() {
    let bytes = locked_bytes();
    assert!(open_locked(&bytes, "incorrect horse").is_err());
    assert!(open_locked(&bytes, "").is_err());
}

#[test]
fn test_plaintext_does_not_leak() {
    let bytes = locked_bytes();
    assert!(contains(&bytes, b"/Encrypt"));
    assert!(!contains(&bytes, b"private-1"));
    assert!(!contains(&bytes, PASSWORD.as_bytes()));
}

#[test]
fn test_empty_password_is_a_validation_error() {
    let err = Credential::new("").unwrap_err();
    assert!(matches!(err, PdfSmithError::EmptyPassword));
    assert_eq!(err.category(), ErrorCategory::Validation);
}

#[test]
fn test_locked_output_cannot_be_merged() {
    let err = ops::execute(
        &Request::Merge(MergeRequest {
            files: vec![
                pdf_input("plain.pdf", "plain", 1),
                InputFile::new("locked.pdf", locked_bytes()),
            ],
        }),
        &WriteOptions::default(),
    )
    .unwrap_err();

    assert!(matches!(err, PdfSmithError::EncryptedPdf { ref name } if name == "locked.pdf"));
    assert_eq!(err.exit_code(), 3);
}

#[test]
fn test_password_is_redacted_in_debug_output() {
    let request = Request::Encrypt(EncryptRequest {
        file: pdf_input("plain.pdf", "plain", 1),
        credential: Credential::new(PASSWORD).unwrap(),
    });

    let rendered = format!("{request:?}");
    assert!(!rendered.contains(PASSWORD));
    assert!(rendered.contains("***"));
}
