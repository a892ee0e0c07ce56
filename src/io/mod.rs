//! PDF input/output.
//!
//! [`PdfReader`] opens and validates input documents; [`PdfWriter`] serializes
//! the merged document to disk.

pub mod reader;
pub mod writer;

pub use reader::{LoadedPdf, PdfReader};
pub use writer::{PdfWriter, WriteOptions, WriteStatistics};
