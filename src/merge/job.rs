//! Merge jobs and their lifecycle.

use serde::Serialize;
use std::fmt;
use std::path::{Path, PathBuf};

use crate::error::{Error, ErrorKind};
use crate::merge::MergeReport;

/// Why a job failed, in a form that can be cloned into UI events and
/// serialized.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JobFailure {
    pub kind: ErrorKind,
    pub message: String,
    /// The offending file, when the failure is about one.
    pub path: Option<PathBuf>,
}

impl JobFailure {
    pub fn exit_code(&self) -> i32 {
        self.kind.exit_code()
    }
}

impl fmt::Display for JobFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for JobFailure {}

impl From<&Error> for JobFailure {
    fn from(err: &Error) -> Self {
        Self {
            kind: err.kind(),
            message: err.to_string(),
            path: err.path().map(Path::to_path_buf),
        }
    }
}

impl From<Error> for JobFailure {
    fn from(err: Error) -> Self {
        Self::from(&err)
    }
}

/// Lifecycle state of a [`MergeJob`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum JobStatus {
    Pending,
    Running,
    Succeeded(MergeReport),
    Failed(JobFailure),
}

impl JobStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Succeeded(_) | Self::Failed(_))
    }
}

/// One execution of a merge.
///
/// Status only moves forward: `Pending` to `Running`, then once to either
/// `Succeeded` or `Failed`. Out-of-order transitions are ignored.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MergeJob {
    id: u64,
    input_order: Vec<PathBuf>,
    output_path: PathBuf,
    status: JobStatus,
}

impl MergeJob {
    pub fn new(id: u64, input_order: Vec<PathBuf>, output_path: PathBuf) -> Self {
        Self {
            id,
            input_order,
            output_path,
            status: JobStatus::Pending,
        }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn input_order(&self) -> &[PathBuf] {
        &self.input_order
    }

    pub fn output_path(&self) -> &Path {
        &self.output_path
    }

    pub fn status(&self) -> &JobStatus {
        &self.status
    }

    /// Move from `Pending` to `Running`. Returns whether the transition happened.
    pub fn start(&mut self) -> bool {
        if self.status != JobStatus::Pending {
            log::warn!("Job {} started twice", self.id);
            return false;
        }
        self.status = JobStatus::Running;
        true
    }

    /// Record the outcome of a running job. Returns whether the transition
    /// happened.
    pub fn complete(&mut self, outcome: Result<MergeReport, Error>) -> bool {
        if self.status != JobStatus::Running {
            log::warn!("Job {} completed while {:?}", self.id, self.status);
            return false;
        }
        self.status = match outcome {
            Ok(report) => JobStatus::Succeeded(report),
            Err(err) => JobStatus::Failed(JobFailure::from(err)),
        };
        true
    }

    pub fn is_finished(&self) -> bool {
        self.status.is_terminal()
    }

    pub fn report(&self) -> Option<&MergeReport> {
        match &self.status {
            JobStatus::Succeeded(report) => Some(report),
            _ => None,
        }
    }

    pub fn failure(&self) -> Option<&JobFailure> {
        match &self.status {
            JobStatus::Failed(failure) => Some(failure),
            _ => None,
        }
    }

    /// The outcome of a finished job. A job that never finished counts as a
    /// failure.
    pub fn into_result(self) -> Result<MergeReport, JobFailure> {
        match self.status {
            JobStatus::Succeeded(report) => Ok(report),
            JobStatus::Failed(failure) => Err(failure),
            JobStatus::Pending | JobStatus::Running => Err(JobFailure {
                kind: ErrorKind::Io,
                message: format!("Merge job {} did not finish", self.id),
                path: None,
            }),
        }
    }
}
