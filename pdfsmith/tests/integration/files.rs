//! Reading uploads from disk and saving artifacts.

use pdfsmith::config::WriteOptions;
use pdfsmith::io::{PdfWriter, load_inputs};
use pdfsmith::ops::{self, OperationKind};
use pdfsmith::request::{InputFile, MergeRequest, Request};
use pdfsmith::utils::collect_paths_for_patterns;
use pdfsmith::validation::Validator;
use pdfsmith::PdfSmithError;
use tempfile::TempDir;

use crate::common::{labelled_pdf, labels_of, write_file};

#[tokio::test]
async fn test_merge_files_from_disk() {
    let temp_dir = TempDir::new().unwrap();
    let first = write_file(temp_dir.path(), "first.pdf", &labelled_pdf("first", 2));
    let second = write_file(temp_dir.path(), "second.pdf", &labelled_pdf("second", 1));

    let files = load_inputs(&[first, second], 2).await.unwrap();
    let artifact = ops::execute_blocking(
        Request::Merge(MergeRequest { files }),
        WriteOptions::default(),
    )
    .await
    .unwrap();

    let out_dir = temp_dir.path().join("out");
    std::fs::create_dir(&out_dir).unwrap();
    let stats = PdfWriter::new().save(&artifact, &out_dir).await.unwrap();

    assert_eq!(stats.output_path, out_dir.join("merged.pdf"));
    assert_eq!(stats.file_size, artifact.len() as u64);

    let written = std::fs::read(&stats.output_path).unwrap();
    assert_eq!(written, artifact.bytes);
    assert_eq!(labels_of(&written), vec!["first-1", "first-2", "second-1"]);
}

#[tokio::test]
async fn test_missing_file() {
    let temp_dir = TempDir::new().unwrap();
    let err = InputFile::from_path(&temp_dir.path().join("absent.pdf"))
        .await
        .unwrap_err();

    assert!(matches!(err, PdfSmithError::FileNotFound { .. }));
    assert_eq!(err.exit_code(), 2);
}

#[tokio::test]
async fn test_inspect_file_from_disk() {
    let temp_dir = TempDir::new().unwrap();
    let path = write_file(temp_dir.path(), "report.pdf", &labelled_pdf("r", 4));

    let validator = Validator::new();
    validator
        .validate_path(&path, OperationKind::Extract)
        .await
        .unwrap();

    let input = InputFile::from_path(&path).await.unwrap();
    let summary = validator.inspect(&input).unwrap();

    assert_eq!(summary.name, "report.pdf");
    assert_eq!(summary.page_count, 4);
    assert_eq!(summary.choices, vec![1, 2, 3, 4]);
    assert_eq!(summary.page_dimensions, Some((612.0, 792.0)));
}

#[tokio::test]
async fn test_glob_patterns_resolve_in_name_order() {
    let temp_dir = TempDir::new().unwrap();
    for name in ["c.pdf", "a.pdf", "b.pdf", "notes.txt"] {
        write_file(temp_dir.path(), name, &labelled_pdf(name, 1));
    }

    let pattern = temp_dir.path().join("*.pdf");
    let paths = collect_paths_for_patterns([pattern.to_string_lossy()]).unwrap();
    let names: Vec<String> = paths
        .iter()
        .map(|path| path.file_name().unwrap().to_string_lossy().into_owned())
        .collect();
    assert_eq!(names, vec!["a.pdf", "b.pdf", "c.pdf"]);

    let files = load_inputs(&paths, 3).await.unwrap();
    let artifact = ops::execute_blocking(
        Request::Merge(MergeRequest { files }),
        WriteOptions::default(),
    )
    .await
    .unwrap();
    assert_eq!(
        labels_of(&artifact.bytes),
        vec!["a.pdf-1", "b.pdf-1", "c.pdf-1"]
    );
}
