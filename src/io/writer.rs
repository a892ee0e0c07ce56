//! PDF writing and saving operations.
//!
//! Writes are atomic by default: the document is serialized to a hidden
//! sibling file which is renamed over the destination only once everything has
//! been flushed. A failed write removes the temporary file and leaves whatever
//! was at the destination untouched.

use lopdf::Document;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use crate::error::{Error, Result};
use crate::utils::format_file_size;

/// Options for writing PDF files.
#[derive(Debug, Clone)]
pub struct WriteOptions {
    /// Use atomic writes (write to temp file, then rename).
    pub atomic: bool,

    /// Compress streams before writing.
    pub compress: bool,

    /// Create missing parent directories.
    pub create_dirs: bool,

    /// Buffer size for writing (in bytes).
    pub buffer_size: usize,
}

impl Default for WriteOptions {
    fn default() -> Self {
        Self {
            atomic: true,
            compress: true,
            create_dirs: true,
            buffer_size: 8192,
        }
    }
}

/// Statistics about a write operation.
#[derive(Debug, Clone)]
pub struct WriteStatistics {
    /// Time taken to write the file.
    pub write_time: Duration,

    /// Size of the written file in bytes.
    pub file_size: u64,

    /// Path where the file was written.
    pub output_path: PathBuf,
}

impl WriteStatistics {
    /// Format file size as human-readable string.
    pub fn format_file_size(&self) -> String {
        format_file_size(self.file_size)
    }
}

/// PDF writer with configurable behavior.
#[derive(Debug, Clone, Default)]
pub struct PdfWriter {
    options: WriteOptions,
}

impl PdfWriter {
    /// Create a new PDF writer with default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a writer with custom options.
    pub fn with_options(options: WriteOptions) -> Self {
        Self { options }
    }

    /// Save a PDF document to `path`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`] if the parent directory cannot be created, the file
    /// cannot be created, serialization fails, or the final rename fails.
    pub fn save(&self, doc: &mut Document, path: &Path) -> Result<WriteStatistics> {
        let start = Instant::now();

        if self.options.create_dirs
            && let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent).map_err(|e| Error::io(parent, e))?;
        }

        if self.options.compress {
            doc.compress();
        }

        let write_path = if self.options.atomic {
            temp_path_for(path)
        } else {
            path.to_path_buf()
        };

        if let Err(err) = self.write_to(doc, &write_path) {
            remove_partial(&write_path);
            return Err(err);
        }

        if self.options.atomic
            && let Err(e) = std::fs::rename(&write_path, path)
        {
            remove_partial(&write_path);
            return Err(Error::io(path, e));
        }

        let file_size = std::fs::metadata(path).map(|m| m.len()).unwrap_or(0);

        Ok(WriteStatistics {
            write_time: start.elapsed(),
            file_size,
            output_path: path.to_path_buf(),
        })
    }

    fn write_to(&self, doc: &mut Document, write_path: &Path) -> Result<()> {
        let file = File::create(write_path).map_err(|e| Error::io(write_path, e))?;
        let mut writer = BufWriter::with_capacity(self.options.buffer_size, file);

        doc.save_to(&mut writer)
            .map_err(|e| Error::io(write_path, std::io::Error::other(e)))?;

        // Flush before the rename so a full disk surfaces here
        let file = writer
            .into_inner()
            .map_err(|e| Error::io(write_path, e.into_error()))?;
        file.sync_all().map_err(|e| Error::io(write_path, e))?;

        Ok(())
    }
}

/// Hidden sibling of `path` used as the atomic write target.
fn temp_path_for(path: &Path) -> PathBuf {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "output.pdf".to_string());
    path.with_file_name(format!(".{name}.partial"))
}

fn remove_partial(path: &Path) {
    if let Err(e) = std::fs::remove_file(path)
        && e.kind() != std::io::ErrorKind::NotFound
    {
        log::warn!("Could not remove partial file {}: {}", path.display(), e);
    }
}
