//! Per-run application state shared by the front-ends.
//!
//! A [`Session`] owns the file list and the merge worker. Front-ends keep one
//! and pass it to their handlers; nothing here is global. While a merge is
//! running every editing operation is refused with [`Error::Busy`], so the job
//! always sees the list exactly as it was when it was submitted.

use std::path::PathBuf;
use tokio::runtime::Handle;

use crate::error::{Error, Result};
use crate::list::FileList;
use crate::merge::{JobEvent, JobHandle, JobStatus, MergeJob, MergeWorker};

#[derive(Debug)]
pub struct Session {
    files: FileList,
    worker: MergeWorker,
    last_job: Option<MergeJob>,
    status: String,
}

impl Session {
    /// Create a session whose merges run on `runtime`.
    pub fn new(runtime: Handle) -> Self {
        Self::with_worker(MergeWorker::new(runtime))
    }

    pub fn with_worker(worker: MergeWorker) -> Self {
        Self {
            files: FileList::new(),
            worker,
            last_job: None,
            status: String::from("Ready"),
        }
    }

    pub fn files(&self) -> &FileList {
        &self.files
    }

    /// One-line description of the last thing that happened.
    pub fn status(&self) -> &str {
        &self.status
    }

    /// The most recent job that reached a terminal state.
    pub fn last_job(&self) -> Option<&MergeJob> {
        self.last_job.as_ref()
    }

    pub fn is_merging(&self) -> bool {
        self.worker.is_busy()
    }

    fn ensure_idle(&self) -> Result<()> {
        if self.is_merging() {
            return Err(Error::Busy);
        }
        Ok(())
    }

    /// Append `paths` to the list. Returns how many were added.
    pub fn add_files<I>(&mut self, paths: I) -> Result<usize>
    where
        I: IntoIterator,
        I::Item: Into<PathBuf>,
    {
        self.ensure_idle()?;
        let added = self.files.add(paths);
        if added > 0 {
            self.status = format!("Added {} PDF file(s). Total: {}", added, self.files.len());
        }
        Ok(added)
    }

    /// Remove the records at `indices`. Returns how many were removed.
    pub fn remove(&mut self, indices: &[usize]) -> Result<usize> {
        self.ensure_idle()?;
        let removed = self.files.remove(indices.iter().copied());
        if removed > 0 {
            self.status = format!("Removed {} file(s). Total: {}", removed, self.files.len());
        }
        Ok(removed)
    }

    /// Move the selected records up one place. Returns the new selection.
    pub fn move_up(&mut self, selection: &[usize]) -> Result<Vec<usize>> {
        self.ensure_idle()?;
        Ok(self.files.move_selection_up(selection))
    }

    /// Move the selected records down one place. Returns the new selection.
    pub fn move_down(&mut self, selection: &[usize]) -> Result<Vec<usize>> {
        self.ensure_idle()?;
        Ok(self.files.move_selection_down(selection))
    }

    pub fn sort_by_path(&mut self) -> Result<()> {
        self.ensure_idle()?;
        self.files.sort_by_path();
        Ok(())
    }

    pub fn clear(&mut self) -> Result<()> {
        self.ensure_idle()?;
        self.files.clear();
        self.status = String::from("All files cleared.");
        Ok(())
    }

    pub fn can_merge(&self) -> bool {
        !self.is_merging() && !self.files.is_empty()
    }

    pub fn can_remove(&self, selection: &[usize]) -> bool {
        !self.is_merging() && selection.iter().any(|&i| i < self.files.len())
    }

    pub fn can_move_up(&self, selection: &[usize]) -> bool {
        !self.is_merging()
            && selection
                .iter()
                .copied()
                .filter(|&i| i < self.files.len())
                .min()
                .is_some_and(|first| first > 0)
    }

    pub fn can_move_down(&self, selection: &[usize]) -> bool {
        !self.is_merging()
            && selection
                .iter()
                .copied()
                .filter(|&i| i < self.files.len())
                .max()
                .is_some_and(|last| last + 1 < self.files.len())
    }

    /// Submit the current list to the worker.
    ///
    /// # Errors
    ///
    /// [`Error::EmptyList`] when there is nothing to merge,
    /// [`Error::InvalidConfig`] when `output` is one of the listed files and
    /// [`Error::Busy`] when a job is already running.
    pub fn start_merge<F>(&mut self, output: impl Into<PathBuf>, on_event: F) -> Result<JobHandle>
    where
        F: FnMut(JobEvent) + Send + 'static,
    {
        if self.files.is_empty() {
            return Err(Error::EmptyList);
        }

        let output = output.into();
        if self.files.iter().any(|record| record.path() == output.as_path()) {
            return Err(Error::invalid_config(format!(
                "Output file cannot be the same as an input file: {}",
                output.display()
            )));
        }

        let handle = self.worker.submit(self.files.paths(), output, on_event)?;
        self.status = String::from("Merging PDF files...");
        Ok(handle)
    }

    /// Update the status line from a worker event. Terminal events are also
    /// recorded as the last job.
    pub fn handle_event(&mut self, event: &JobEvent) {
        match event {
            JobEvent::Started { .. } => {
                self.status = String::from("Merging PDF files...");
            }
            JobEvent::Progress(progress) => {
                self.status = format!(
                    "Processing file {}/{}: {}",
                    progress.index,
                    progress.total,
                    progress.display_name()
                );
            }
            JobEvent::Writing => {
                self.status = String::from("Writing merged PDF...");
            }
            JobEvent::Finished(job) => self.record(job.clone()),
        }
    }

    /// Store a finished job and describe its outcome in the status line.
    pub fn record(&mut self, job: MergeJob) {
        self.status = match job.status() {
            JobStatus::Succeeded(report) => {
                format!("Merge completed! {} files merged.", report.files_merged)
            }
            JobStatus::Failed(_) => String::from("Merge failed."),
            JobStatus::Pending | JobStatus::Running => return,
        };
        self.last_job = Some(job);
    }
}
