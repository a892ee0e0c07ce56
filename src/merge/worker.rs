//! Background execution of merge jobs.
//!
//! A [`MergeWorker`] runs at most one job at a time on the tokio blocking pool
//! so the caller's thread (a terminal loop or a GUI event loop) stays
//! responsive. Progress comes back through an event callback invoked on the
//! worker thread; front-ends forward it to wherever they render.

use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use tokio::runtime::Handle;
use tokio::task::JoinHandle;

use crate::error::{Error, Result};
use crate::merge::{MergeJob, MergeProgress, Merger};

/// Notifications emitted while a job runs, in this order: `Started`, one
/// `Progress` per input, `Writing`, `Finished`. A job that fails early skips
/// straight to `Finished`.
#[derive(Debug, Clone, PartialEq)]
pub enum JobEvent {
    Started { job_id: u64, total: usize },
    Progress(MergeProgress),
    /// Every input is appended and the output is being written.
    Writing,
    /// The job reached a terminal state. The worker is idle again by the
    /// time this is delivered.
    Finished(MergeJob),
}

/// Runs merge jobs one at a time off the calling thread.
#[derive(Debug)]
pub struct MergeWorker {
    runtime: Handle,
    merger: Arc<Merger>,
    busy: Arc<AtomicBool>,
    next_id: AtomicU64,
}

impl MergeWorker {
    /// Create a worker that spawns onto `runtime`.
    pub fn new(runtime: Handle) -> Self {
        Self::with_merger(runtime, Merger::new())
    }

    pub fn with_merger(runtime: Handle, merger: Merger) -> Self {
        Self {
            runtime,
            merger: Arc::new(merger),
            busy: Arc::new(AtomicBool::new(false)),
            next_id: AtomicU64::new(1),
        }
    }

    /// Whether a job is currently running.
    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }

    /// Start merging `inputs` into `output` in the background.
    ///
    /// `on_event` is called from the worker thread for every [`JobEvent`].
    ///
    /// # Errors
    ///
    /// [`Error::EmptyList`] if `inputs` is empty and [`Error::Busy`] if a job
    /// is already running. Failures of the merge itself are reported through
    /// the job, not here.
    pub fn submit<F>(
        &self,
        inputs: Vec<PathBuf>,
        output: PathBuf,
        mut on_event: F,
    ) -> Result<JobHandle>
    where
        F: FnMut(JobEvent) + Send + 'static,
    {
        if inputs.is_empty() {
            return Err(Error::EmptyList);
        }

        self.busy
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map_err(|_| Error::Busy)?;
        let guard = BusyGuard(Arc::clone(&self.busy));

        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let mut job = MergeJob::new(id, inputs, output);
        let fallback = job.clone();
        let merger = Arc::clone(&self.merger);

        log::info!(
            "Starting merge job {} ({} file(s) -> {})",
            id,
            job.input_order().len(),
            job.output_path().display()
        );

        let task = self.runtime.spawn_blocking(move || {
            job.start();
            on_event(JobEvent::Started {
                job_id: id,
                total: job.input_order().len(),
            });

            let outcome = merger.merge(job.input_order(), job.output_path(), |progress| {
                let last = progress.is_last();
                on_event(JobEvent::Progress(progress));
                if last {
                    on_event(JobEvent::Writing);
                }
            });

            if let Err(err) = &outcome {
                log::error!("Merge job {id} failed: {err}");
            }
            job.complete(outcome);

            drop(guard);
            on_event(JobEvent::Finished(job.clone()));
            job
        });

        Ok(JobHandle { id, task, fallback })
    }
}

/// Clears the busy flag however the job ends, including by panic.
struct BusyGuard(Arc<AtomicBool>);

impl Drop for BusyGuard {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Handle to a submitted job.
#[derive(Debug)]
pub struct JobHandle {
    id: u64,
    task: JoinHandle<MergeJob>,
    fallback: MergeJob,
}

impl JobHandle {
    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    /// Wait for the job to reach a terminal state.
    pub async fn wait(self) -> MergeJob {
        match self.task.await {
            Ok(job) => job,
            Err(join_err) => {
                let mut job = self.fallback;
                let output = job.output_path().to_path_buf();
                job.start();
                job.complete(Err(Error::io(
                    output,
                    io::Error::other(format!("merge task aborted: {join_err}")),
                )));
                job
            }
        }
    }
}
