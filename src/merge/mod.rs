//! PDF merging.
//!
//! [`Merger`] does the work synchronously; [`MergeWorker`] runs it as a
//! [`MergeJob`] in the background and reports [`JobEvent`]s.

pub mod job;
pub mod merger;
pub mod worker;

pub use job::{JobFailure, JobStatus, MergeJob};
pub use merger::{MergePlan, MergeProgress, MergeReport, Merger, PlanEntry};
pub use worker::{JobEvent, JobHandle, MergeWorker};
