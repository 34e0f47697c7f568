//! Page-level behaviour of merge, extract and delete.

use pdfsmith::config::WriteOptions;
use pdfsmith::ops::{self, OperationKind};
use pdfsmith::request::{DeleteRequest, ExtractRequest, InputFile, MergeRequest, Request};
use pdfsmith::{PageSelection, PdfSmithError};
use rstest::rstest;

use crate::common::{labels_of, nested_pdf, owner_locked_pdf, page_sizes, pages_of, pdf_input};

fn merge(files: Vec<InputFile>) -> pdfsmith::Result<pdfsmith::Artifact> {
    ops::execute(
        &Request::Merge(MergeRequest { files }),
        &WriteOptions::default(),
    )
}

fn extract(file: InputFile, pages: &[u32]) -> pdfsmith::Result<pdfsmith::Artifact> {
    ops::execute(
        &Request::Extract(ExtractRequest {
            file,
            selection: PageSelection::new(pages.iter().copied()),
        }),
        &WriteOptions::default(),
    )
}

fn delete(file: InputFile, pages: &[u32]) -> pdfsmith::Result<pdfsmith::Artifact> {
    ops::execute(
        &Request::Delete(DeleteRequest {
            file,
            selection: PageSelection::new(pages.iter().copied()),
        }),
        &WriteOptions::default(),
    )
}

#[test]
fn test_merge_keeps_file_and_page_order() {
    let artifact = merge(vec![
        pdf_input("a.pdf", "a", 2),
        pdf_input("b.pdf", "b", 3),
        pdf_input("c.pdf", "c", 1),
    ])
    .unwrap();

    assert_eq!(artifact.kind, OperationKind::Merge);
    assert_eq!(artifact.file_name, "merged.pdf");
    assert_eq!(artifact.mime_type, "application/pdf");
    assert_eq!(artifact.statistics.files_processed, 3);
    assert_eq!(
        labels_of(&artifact.bytes),
        vec!["a-1", "a-2", "b-1", "b-2", "b-3", "c-1"]
    );
}

#[rstest]
#[case(&[1])]
#[case(&[1, 1])]
#[case(&[4, 2, 7])]
#[case(&[1, 2, 3, 4, 5])]
fn test_merge_page_count_is_sum(#[case] counts: &[u32]) {
    let files = counts
        .iter()
        .enumerate()
        .map(|(i, &n)| pdf_input(&format!("f{i}.pdf"), &format!("f{i}"), n))
        .collect();

    let artifact = merge(files).unwrap();
    let expected: u32 = counts.iter().sum();
    assert_eq!(artifact.statistics.page_count, expected as usize);
    assert_eq!(labels_of(&artifact.bytes).len(), expected as usize);
}

#[test]
fn test_single_file_merge_keeps_pages() {
    let artifact = merge(vec![pdf_input("only.pdf", "only", 4)]).unwrap();
    assert_eq!(
        labels_of(&artifact.bytes),
        vec!["only-1", "only-2", "only-3", "only-4"]
    );
}

#[test]
fn test_delete_keeps_remaining_pages_in_order() {
    let artifact = delete(pdf_input("doc.pdf", "p", 5), &[2, 4]).unwrap();

    assert_eq!(artifact.file_name, "deleted.pdf");
    assert_eq!(labels_of(&artifact.bytes), vec!["p-1", "p-3", "p-5"]);
}

#[rstest]
#[case(6, &[1])]
#[case(6, &[6])]
#[case(6, &[3, 1, 5])]
#[case(9, &[2, 3, 4, 5, 6, 7, 8])]
fn test_delete_removes_exactly_the_selection(#[case] total: u32, #[case] removed: &[u32]) {
    let artifact = delete(pdf_input("doc.pdf", "p", total), removed).unwrap();
    let labels = labels_of(&artifact.bytes);

    assert_eq!(labels.len(), (total as usize) - removed.len());

    let kept: Vec<u32> = labels
        .iter()
        .map(|label| label.trim_start_matches("p-").parse().unwrap())
        .collect();
    assert!(kept.windows(2).all(|pair| pair[0] < pair[1]));
    assert!(kept.iter().all(|page| !removed.contains(page)));
}

#[test]
fn test_delete_every_page_is_rejected() {
    let err = delete(pdf_input("doc.pdf", "p", 3), &[1, 2, 3]).unwrap_err();
    assert!(matches!(err, PdfSmithError::AllPagesDeleted { total: 3 }));
    assert!(err.is_validation());
}

#[test]
fn test_extract_follows_selection_order() {
    let artifact = extract(pdf_input("doc.pdf", "p", 5), &[4, 1]).unwrap();

    assert_eq!(artifact.file_name, "extracted.pdf");
    assert_eq!(labels_of(&artifact.bytes), vec!["p-4", "p-1"]);
}

#[test]
fn test_extract_keeps_inherited_page_attributes() {
    let artifact = extract(InputFile::new("nested.pdf", nested_pdf("n")), &[3, 1]).unwrap();

    assert_eq!(labels_of(&artifact.bytes), vec!["n-3", "n-1"]);
    assert_eq!(
        page_sizes(&artifact.bytes),
        vec![(100.0, 100.0), (300.0, 400.0)]
    );

    let (doc, ids) = pages_of(&artifact.bytes);
    let first_page = doc.get_dictionary(ids[1]).unwrap();
    assert_eq!(first_page.get(b"Rotate").unwrap().as_i64().unwrap(), 90);
}

#[test]
fn test_owner_locked_input_is_copied_in_plain_text() {
    let file = || InputFile::new("owner.pdf", owner_locked_pdf("o", 4));

    let extracted = extract(file(), &[4, 2]).unwrap();
    assert_eq!(labels_of(&extracted.bytes), vec!["o-4", "o-2"]);

    let remaining = delete(file(), &[1]).unwrap();
    assert_eq!(labels_of(&remaining.bytes), vec!["o-2", "o-3", "o-4"]);

    let merged = merge(vec![file(), pdf_input("plain.pdf", "plain", 1)]).unwrap();
    assert_eq!(
        labels_of(&merged.bytes),
        vec!["o-1", "o-2", "o-3", "o-4", "plain-1"]
    );
}

#[test]
fn test_same_inputs_give_identical_output() {
    let run = || {
        merge(vec![pdf_input("a.pdf", "a", 2), pdf_input("b.pdf", "b", 2)])
            .unwrap()
            .bytes
    };
    assert_eq!(run(), run());
}

#[tokio::test]
async fn test_execute_blocking_matches_execute() {
    let request = Request::Extract(ExtractRequest {
        file: pdf_input("doc.pdf", "p", 3),
        selection: PageSelection::parse("2-3").unwrap(),
    });

    let direct = ops::execute(&request, &WriteOptions::default()).unwrap();
    let pooled = ops::execute_blocking(request, WriteOptions::default())
        .await
        .unwrap();

    assert_eq!(direct.bytes, pooled.bytes);
    assert_eq!(labels_of(&pooled.bytes), vec!["p-2", "p-3"]);
}
