//! Rejected requests and undecodable inputs.

use pdfsmith::config::WriteOptions;
use pdfsmith::error::ErrorCategory;
use pdfsmith::ops::{self, Merger, Operation, PageExtractor};
use pdfsmith::request::{ExtractRequest, ImagesRequest, InputFile, MergeRequest, Request};
use pdfsmith::{PageSelection, PdfSmithError};
use rstest::rstest;

use crate::common::{labels_of, pdf_input};

#[rstest]
#[case(b"definitely not a pdf".to_vec())]
#[case(Vec::new())]
fn test_undecodable_pdf(#[case] bytes: Vec<u8>) {
    let err = Merger::new()
        .execute(
            &MergeRequest {
                files: vec![InputFile::new("bad.pdf", bytes)],
            },
            &WriteOptions::default(),
        )
        .unwrap_err();

    assert!(matches!(err, PdfSmithError::FailedToLoadPdf { ref name, .. } if name == "bad.pdf"));
    assert_eq!(err.category(), ErrorCategory::Decode);
}

#[test]
fn test_page_out_of_range() {
    let err = ops::execute(
        &Request::Extract(ExtractRequest {
            file: pdf_input("doc.pdf", "p", 5),
            selection: PageSelection::new([2, 6]),
        }),
        &WriteOptions::default(),
    )
    .unwrap_err();

    assert!(matches!(err, PdfSmithError::PageOutOfRange { page: 6, total: 5 }));
    assert!(err.is_validation());
    assert_eq!(err.exit_code(), 1);
}

#[test]
fn test_handler_recovers_after_failure() {
    let extractor = PageExtractor::new();
    let options = WriteOptions::default();

    let failed = extractor.execute(
        &ExtractRequest {
            file: pdf_input("doc.pdf", "p", 2),
            selection: PageSelection::new([3]),
        },
        &options,
    );
    assert!(failed.is_err());

    let artifact = extractor
        .execute(
            &ExtractRequest {
                file: pdf_input("doc.pdf", "p", 2),
                selection: PageSelection::new([2]),
            },
            &options,
        )
        .unwrap();
    assert_eq!(labels_of(&artifact.bytes), vec!["p-2"]);
}

#[test]
fn test_empty_requests_select_nothing() {
    let options = WriteOptions::default();

    let err = ops::execute(&Request::Merge(MergeRequest { files: vec![] }), &options).unwrap_err();
    assert!(matches!(err, PdfSmithError::NoFilesSelected));

    let err =
        ops::execute(&Request::Images(ImagesRequest { images: vec![] }), &options).unwrap_err();
    assert!(matches!(err, PdfSmithError::NoFilesSelected));
}

#[test]
fn test_empty_selection_is_checked_before_decoding() {
    let err = ops::execute(
        &Request::Extract(ExtractRequest {
            file: InputFile::new("garbage.pdf", b"garbage".to_vec()),
            selection: PageSelection::empty(),
        }),
        &WriteOptions::default(),
    )
    .unwrap_err();
    assert!(matches!(err, PdfSmithError::NoPagesChosen));
}

#[rstest]
#[case("1-2-3")]
#[case("0")]
#[case("5-2")]
#[case("1,,x")]
#[case("-3")]
fn test_invalid_selection_strings(#[case] input: &str) {
    let err = PageSelection::parse(input).unwrap_err();
    assert!(err.is_validation(), "{input:?} gave {err:?}");
}
