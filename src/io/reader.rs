//! PDF reading and loading operations.
//!
//! Loading is synchronous; callers that must stay responsive run it on the
//! merge worker. Each call opens, parses and closes the file, so no handle
//! outlives a load whether it succeeds or not.

use lopdf::Document;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// A loaded PDF document with metadata.
#[derive(Debug)]
pub struct LoadedPdf {
    /// The PDF document.
    pub document: Document,

    /// Path to the source file.
    pub path: PathBuf,

    /// Number of pages in the document.
    pub page_count: usize,

    /// File size in bytes.
    pub file_size: u64,
}

/// PDF reader with configurable loading behavior.
#[derive(Debug, Clone)]
pub struct PdfReader {
    /// Whether to reject documents that decode but have no pages.
    verify: bool,
}

impl PdfReader {
    /// Create a new PDF reader with default settings.
    pub fn new() -> Self {
        Self { verify: true }
    }

    /// Create a reader that accepts documents without pages.
    pub fn without_verification() -> Self {
        Self { verify: false }
    }

    /// Load a single PDF document.
    ///
    /// # Errors
    ///
    /// - [`Error::FileNotFound`] if nothing exists at `path`
    /// - [`Error::InvalidFormat`] if it is not a regular file, does not decode as a
    ///   PDF, or (when verifying) has no pages
    /// - [`Error::PasswordProtected`] if the document cannot be decrypted
    ///   without credentials
    /// - [`Error::Io`] if the file exists but cannot be inspected
    pub fn load(&self, path: &Path) -> Result<LoadedPdf> {
        let file_size = Self::check_path(path)?;

        let document =
            Document::load(path).map_err(|e| classify_load_error(path, e.to_string()))?;

        // lopdf falls back to the empty password and, when that fails, hands back
        // the document still encrypted with an unreadable page tree
        if document.is_encrypted() && document.encryption_state.is_none() {
            return Err(Error::password_protected(path));
        }

        let page_count = document.get_pages().len();
        if self.verify && page_count == 0 {
            return Err(Error::invalid_format(path, "PDF has no pages"));
        }

        log::debug!(
            "Loaded {} (version {}, {} pages, {} objects)",
            path.display(),
            document.version,
            page_count,
            document.objects.len()
        );

        Ok(LoadedPdf {
            document,
            path: path.to_path_buf(),
            page_count,
            file_size,
        })
    }

    /// Check that `path` names an existing regular file and return its size.
    pub fn check_path(path: &Path) -> Result<u64> {
        let metadata = std::fs::metadata(path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => Error::file_not_found(path),
            _ => Error::io(path, e),
        })?;

        if !metadata.is_file() {
            return Err(Error::invalid_format(path, "not a regular file"));
        }

        Ok(metadata.len())
    }
}

impl Default for PdfReader {
    fn default() -> Self {
        Self::new()
    }
}

/// Map a load failure reported by the PDF library onto the error taxonomy.
///
/// Encrypted files that load but cannot be decrypted are caught in
/// [`PdfReader::load`]; this only covers failures the library reports as
/// errors, matched on encryption-related wording.
fn classify_load_error(path: &Path, reason: String) -> Error {
    let lowered = reason.to_lowercase();
    if ["encrypt", "decrypt", "password"]
        .iter()
        .any(|needle| lowered.contains(needle))
    {
        Error::password_protected(path)
    } else {
        Error::invalid_format(path, reason)
    }
}
