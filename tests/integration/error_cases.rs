//! Integration tests for error handling and edge cases.

use pdfmerge::merge::Merger;
use pdfmerge::{ErrorKind, FileList};
use std::path::PathBuf;
use tempfile::TempDir;

use crate::common::{page_widths, pdf_in, write_encrypted_pdf};

fn entries(dir: &TempDir) -> Vec<String> {
    let mut names: Vec<String> = std::fs::read_dir(dir.path())
        .unwrap()
        .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

#[test]
fn test_error_empty_input_list() {
    let dir = TempDir::new().unwrap();
    let output = dir.path().join("merged.pdf");

    let err = Merger::new().merge(&[], &output, |_| {}).unwrap_err();

    assert_eq!(err.kind(), ErrorKind::EmptyList);
    assert!(!output.exists());
}

#[test]
fn test_error_nonexistent_input() {
    let dir = TempDir::new().unwrap();
    let good = pdf_in(&dir, "good.pdf", &[1]);
    let missing = dir.path().join("missing.pdf");
    let output = dir.path().join("merged.pdf");

    let err = Merger::new()
        .merge(&[good, missing.clone()], &output, |_| {})
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::FileNotFound);
    assert_eq!(err.path(), Some(missing.as_path()));
    assert!(err.to_string().contains("missing.pdf"));
    assert_eq!(entries(&dir), vec!["good.pdf"]);
}

#[test]
fn test_error_corrupted_pdf() {
    let dir = TempDir::new().unwrap();
    let corrupted = dir.path().join("notes.pdf");
    std::fs::write(&corrupted, b"this is plain text, not a PDF").unwrap();
    let output = dir.path().join("merged.pdf");

    let err = Merger::new().merge(&[corrupted], &output, |_| {}).unwrap_err();

    assert_eq!(err.kind(), ErrorKind::InvalidFormat);
    assert_eq!(entries(&dir), vec!["notes.pdf"]);
}

#[test]
fn test_error_password_protected_pdf() {
    let dir = TempDir::new().unwrap();
    let good = pdf_in(&dir, "good.pdf", &[1]);
    let locked = dir.path().join("locked.pdf");
    write_encrypted_pdf(&locked, &[2, 3], "secret");
    let output = dir.path().join("merged.pdf");

    let err = Merger::new()
        .merge(&[good, locked.clone()], &output, |_| {})
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::PasswordProtected);
    assert_eq!(err.path(), Some(locked.as_path()));
    assert!(err.to_string().contains("locked.pdf"));
    assert_eq!(err.exit_code(), 3);
    assert_eq!(entries(&dir), vec!["good.pdf", "locked.pdf"]);
}

#[test]
fn test_error_empty_file() {
    let dir = TempDir::new().unwrap();
    let empty = dir.path().join("empty.pdf");
    std::fs::write(&empty, b"").unwrap();

    let err = Merger::new()
        .merge(&[empty], &dir.path().join("merged.pdf"), |_| {})
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::InvalidFormat);
}

#[test]
fn test_error_directory_as_input() {
    let dir = TempDir::new().unwrap();
    let folder = dir.path().join("folder.pdf");
    std::fs::create_dir(&folder).unwrap();

    let err = Merger::new()
        .merge(&[folder], &dir.path().join("merged.pdf"), |_| {})
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::InvalidFormat);
}

#[test]
fn test_failed_merge_leaves_existing_output_untouched() {
    let dir = TempDir::new().unwrap();
    let output = pdf_in(&dir, "merged.pdf", &[42]);
    let before = std::fs::read(&output).unwrap();

    let inputs = vec![pdf_in(&dir, "a.pdf", &[1]), dir.path().join("gone.pdf")];
    let err = Merger::new().merge(&inputs, &output, |_| {}).unwrap_err();

    assert_eq!(err.kind(), ErrorKind::FileNotFound);
    assert_eq!(std::fs::read(&output).unwrap(), before);
    assert_eq!(page_widths(&output), vec![42]);
    assert_eq!(entries(&dir), vec!["a.pdf", "merged.pdf"]);
}

#[test]
fn test_remove_out_of_range_leaves_list_unchanged() {
    let mut list = FileList::new();
    list.add([PathBuf::from("a.pdf"), PathBuf::from("b.pdf")]);
    let before = list.clone();

    assert_eq!(list.remove([2, 99]), 0);
    assert_eq!(list, before);
}

#[test]
fn test_list_accepts_missing_files_until_merge() {
    let dir = TempDir::new().unwrap();
    let mut list = FileList::new();
    list.add([dir.path().join("later.pdf")]);

    assert_eq!(list.len(), 1);
    assert_eq!(list.get(0).unwrap().size_bytes(), 0);

    let err = Merger::new()
        .merge(&list.paths(), &dir.path().join("merged.pdf"), |_| {})
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::FileNotFound);
}
