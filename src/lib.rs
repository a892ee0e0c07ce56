//! pdfmerge - Merge PDF files into a single document.
//!
//! The library holds everything the two front-ends share:
//!
//! - [`list`]: the ordered list of files waiting to be merged
//! - [`merge`]: the merge itself, and a background worker that runs it
//! - [`session`]: per-run state tying the list and the worker together
//! - [`io`]: loading inputs and writing the output atomically
//!
//! # Examples
//!
//! ```no_run
//! use pdfmerge::merge::Merger;
//! use std::path::{Path, PathBuf};
//!
//! # fn example() -> pdfmerge::Result<()> {
//! let inputs = vec![PathBuf::from("a.pdf"), PathBuf::from("b.pdf")];
//! let report = Merger::new().merge(&inputs, Path::new("merged.pdf"), |progress| {
//!     println!("{}/{} {}", progress.index, progress.total, progress.display_name());
//! })?;
//! println!("Wrote {} pages", report.total_pages);
//! # Ok(())
//! # }
//! ```

#![warn(clippy::all)]

pub mod cli;
pub mod config;
pub mod error;
pub mod io;
pub mod list;
pub mod merge;
pub mod output;
pub mod session;
pub mod utils;

#[cfg(test)]
pub(crate) mod testing;

pub use error::{Error, ErrorKind, Result};
pub use list::{FileList, FileRecord};
pub use merge::{JobEvent, JobFailure, MergeJob, MergeReport, MergeWorker, Merger};
pub use session::Session;

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name.
pub const NAME: &str = env!("CARGO_PKG_NAME");
