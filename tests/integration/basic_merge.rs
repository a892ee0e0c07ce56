//! Integration tests for the merge path from file list to written output.

use pdfmerge::FileList;
use pdfmerge::merge::Merger;
use rstest::rstest;
use tempfile::TempDir;

use crate::common::{page_widths, pdf_in};

#[rstest]
#[case(1)]
#[case(2)]
#[case(5)]
fn test_single_page_inputs_merge_in_list_order(#[case] count: i64) {
    let dir = TempDir::new().unwrap();
    let mut list = FileList::new();
    for i in 0..count {
        list.add([pdf_in(&dir, &format!("page_{i}.pdf"), &[100 + i])]);
    }
    let output = dir.path().join("merged.pdf");

    let report = Merger::new().merge(&list.paths(), &output, |_| {}).unwrap();

    assert_eq!(report.files_merged, count as usize);
    assert_eq!(report.total_pages, count as usize);
    let expected: Vec<i64> = (0..count).map(|i| 100 + i).collect();
    assert_eq!(page_widths(&output), expected);
}

#[test]
fn test_reordering_swaps_pages_in_output() {
    let dir = TempDir::new().unwrap();
    let mut list = FileList::new();
    list.add([
        pdf_in(&dir, "first.pdf", &[1, 2]),
        pdf_in(&dir, "second.pdf", &[3]),
    ]);
    assert!(list.move_down(0));

    let output = dir.path().join("merged.pdf");
    Merger::new().merge(&list.paths(), &output, |_| {}).unwrap();

    assert_eq!(page_widths(&output), vec![3, 1, 2]);
}

#[test]
fn test_sorted_list_merges_alphabetically() {
    let dir = TempDir::new().unwrap();
    let mut list = FileList::new();
    list.add([
        pdf_in(&dir, "c.pdf", &[3]),
        pdf_in(&dir, "a.pdf", &[1]),
        pdf_in(&dir, "b.pdf", &[2]),
    ]);
    list.sort_by_path();

    let output = dir.path().join("merged.pdf");
    Merger::new().merge(&list.paths(), &output, |_| {}).unwrap();

    assert_eq!(page_widths(&output), vec![1, 2, 3]);
}

#[test]
fn test_duplicate_entries_are_merged_twice() {
    let dir = TempDir::new().unwrap();
    let pdf = pdf_in(&dir, "twice.pdf", &[5, 6]);
    let mut list = FileList::new();
    list.add([pdf.clone(), pdf]);

    let output = dir.path().join("merged.pdf");
    let report = Merger::new().merge(&list.paths(), &output, |_| {}).unwrap();

    assert_eq!(report.total_pages, 4);
    assert_eq!(page_widths(&output), vec![5, 6, 5, 6]);
}

#[test]
fn test_output_directory_is_created() {
    let dir = TempDir::new().unwrap();
    let input = pdf_in(&dir, "in.pdf", &[10]);
    let output = dir.path().join("a").join("b").join("merged.pdf");

    let report = Merger::new().merge(&[input], &output, |_| {}).unwrap();

    assert!(output.is_file());
    assert_eq!(report.output_size, std::fs::metadata(&output).unwrap().len());
}

#[test]
fn test_existing_output_is_replaced_on_success() {
    let dir = TempDir::new().unwrap();
    let input = pdf_in(&dir, "in.pdf", &[10, 20]);
    let output = pdf_in(&dir, "merged.pdf", &[99]);

    Merger::new().merge(&[input], &output, |_| {}).unwrap();

    assert_eq!(page_widths(&output), vec![10, 20]);
}

#[test]
fn test_dry_run_plan_writes_nothing() {
    let dir = TempDir::new().unwrap();
    let inputs = vec![
        pdf_in(&dir, "a.pdf", &[1, 1]),
        pdf_in(&dir, "b.pdf", &[2, 2, 2]),
    ];

    let plan = Merger::new().plan(&inputs).unwrap();

    assert_eq!(plan.total_pages, 5);
    assert_eq!(
        plan.entries.iter().map(|e| e.pages).collect::<Vec<_>>(),
        vec![2, 3]
    );
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 2);
}
