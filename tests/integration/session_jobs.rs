//! Integration tests for background merge jobs driven through a session.

use pdfmerge::merge::{JobEvent, JobStatus};
use pdfmerge::{ErrorKind, Session};
use std::sync::{Arc, Mutex, mpsc};
use tempfile::TempDir;
use tokio::runtime::Handle;

use crate::common::{page_widths, pdf_in};

#[tokio::test]
async fn test_session_merge_reports_progress_and_result() {
    let dir = TempDir::new().unwrap();
    let mut session = Session::new(Handle::current());
    session
        .add_files([
            pdf_in(&dir, "one.pdf", &[1]),
            pdf_in(&dir, "two.pdf", &[2, 2]),
            pdf_in(&dir, "three.pdf", &[3]),
        ])
        .unwrap();
    session.move_up(&[2]).unwrap();

    let events = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&events);
    let output = dir.path().join("out").join("merged.pdf");

    let handle = session
        .start_merge(&output, move |event| sink.lock().unwrap().push(event))
        .unwrap();
    let job = handle.wait().await;

    let events = events.lock().unwrap().clone();
    for event in &events {
        session.handle_event(event);
    }

    assert_eq!(session.status(), "Merge completed! 3 files merged.");
    assert_eq!(page_widths(&output), vec![1, 3, 2, 2]);

    let report = job.report().unwrap();
    assert_eq!(report.total_pages, 4);

    let progress: Vec<(usize, String)> = events
        .iter()
        .filter_map(|event| match event {
            JobEvent::Progress(p) => Some((p.index, p.display_name())),
            _ => None,
        })
        .collect();
    assert_eq!(
        progress,
        vec![
            (1, "one.pdf".to_string()),
            (2, "three.pdf".to_string()),
            (3, "two.pdf".to_string())
        ]
    );
    assert!(matches!(events.first(), Some(JobEvent::Started { total: 3, .. })));
    assert!(matches!(events.last(), Some(JobEvent::Finished(_))));
}

#[tokio::test]
async fn test_failed_job_names_offending_file() {
    let dir = TempDir::new().unwrap();
    let corrupt = dir.path().join("broken.pdf");
    std::fs::write(&corrupt, b"%PDF-garbage").unwrap();

    let mut session = Session::new(Handle::current());
    session
        .add_files([pdf_in(&dir, "fine.pdf", &[1]), corrupt.clone()])
        .unwrap();

    let output = dir.path().join("merged.pdf");
    let job = session
        .start_merge(&output, |_| {})
        .unwrap()
        .wait()
        .await;
    session.record(job);

    assert_eq!(session.status(), "Merge failed.");
    let failure = session.last_job().unwrap().failure().unwrap().clone();
    assert_eq!(failure.kind, ErrorKind::InvalidFormat);
    assert_eq!(failure.path, Some(corrupt));
    assert!(failure.message.contains("broken.pdf"));
    assert!(!output.exists());
}

#[tokio::test]
async fn test_second_submission_is_busy() {
    let dir = TempDir::new().unwrap();
    let mut session = Session::new(Handle::current());
    session.add_files([pdf_in(&dir, "a.pdf", &[1])]).unwrap();

    let (entered_tx, entered_rx) = mpsc::channel();
    let (release_tx, release_rx) = mpsc::channel::<()>();

    let first = session
        .start_merge(dir.path().join("first.pdf"), move |event| {
            if let JobEvent::Started { .. } = event {
                entered_tx.send(()).unwrap();
                release_rx.recv().unwrap();
            }
        })
        .unwrap();
    entered_rx.recv().unwrap();

    let err = session
        .start_merge(dir.path().join("second.pdf"), |_| {})
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Busy);
    assert_eq!(err.exit_code(), 6);

    release_tx.send(()).unwrap();
    let job = first.wait().await;

    assert!(matches!(job.status(), JobStatus::Succeeded(_)));
    assert!(dir.path().join("first.pdf").exists());
    assert!(!dir.path().join("second.pdf").exists());
}

#[tokio::test]
async fn test_empty_session_cannot_merge() {
    let dir = TempDir::new().unwrap();
    let mut session = Session::new(Handle::current());
    let output = dir.path().join("merged.pdf");

    let err = session.start_merge(&output, |_| {}).unwrap_err();

    assert_eq!(err.kind(), ErrorKind::EmptyList);
    assert!(!output.exists());
}
