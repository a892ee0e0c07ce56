//! Core PDF merging implementation.
//!
//! Inputs are appended one at a time: each document is loaded, its object ids
//! are shifted past everything already merged, and its page tree is hung under
//! a fresh root `Pages` node as one subtree. Keeping each input's page tree
//! intact preserves attributes its pages inherit (MediaBox, Resources, Rotate).

use lopdf::{Document, Object, ObjectId, dictionary};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::time::Instant;

use crate::error::{Error, Result};
use crate::io::{PdfReader, PdfWriter};
use crate::utils::{display_name, format_file_size};

/// Progress after one input has been appended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeProgress {
    /// 1-based position of the input just consumed.
    pub index: usize,
    /// Number of inputs in the job.
    pub total: usize,
    /// The input just consumed.
    pub path: PathBuf,
    /// Pages it contributed.
    pub pages: usize,
}

impl MergeProgress {
    /// Whether this was the final input (the write comes next).
    pub fn is_last(&self) -> bool {
        self.index == self.total
    }

    pub fn display_name(&self) -> String {
        display_name(&self.path)
    }
}

/// Outcome of a successful merge.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MergeReport {
    /// Number of input files merged.
    pub files_merged: usize,
    /// Total pages in the output.
    pub total_pages: usize,
    /// Where the output was written.
    pub output_path: PathBuf,
    /// Size of the output in bytes.
    pub output_size: u64,
    /// Wall time for load, merge and write.
    pub elapsed_secs: f64,
}

impl MergeReport {
    pub fn format_output_size(&self) -> String {
        format_file_size(self.output_size)
    }
}

/// One line of a dry-run plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlanEntry {
    pub path: PathBuf,
    pub pages: usize,
    pub size_bytes: u64,
}

/// What a merge would do, without writing anything.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MergePlan {
    pub entries: Vec<PlanEntry>,
    pub total_pages: usize,
}

/// PDF merger that combines multiple documents.
#[derive(Debug, Clone, Default)]
pub struct Merger {
    reader: PdfReader,
    writer: PdfWriter,
}

impl Merger {
    /// Create a new merger with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a merger with a custom reader and writer.
    pub fn with_io(reader: PdfReader, writer: PdfWriter) -> Self {
        Self { reader, writer }
    }

    /// Merge `paths` in order and write the result to `output`.
    ///
    /// `on_progress` is called after each input has been appended.
    ///
    /// # Errors
    ///
    /// [`Error::EmptyList`] for no inputs; otherwise the first load or write
    /// failure. Nothing is written at `output` unless the merge succeeds.
    pub fn merge<F>(&self, paths: &[PathBuf], output: &Path, on_progress: F) -> Result<MergeReport>
    where
        F: FnMut(MergeProgress),
    {
        let start = Instant::now();

        let (mut document, total_pages) = self.merge_documents(paths, on_progress)?;
        let stats = self.writer.save(&mut document, output)?;

        log::info!(
            "Merged {} file(s), {} pages into {} ({})",
            paths.len(),
            total_pages,
            output.display(),
            stats.format_file_size()
        );

        Ok(MergeReport {
            files_merged: paths.len(),
            total_pages,
            output_path: stats.output_path,
            output_size: stats.file_size,
            elapsed_secs: start.elapsed().as_secs_f64(),
        })
    }

    /// Merge `paths` in order into an in-memory document.
    ///
    /// Returns the document and its page count.
    pub fn merge_documents<F>(
        &self,
        paths: &[PathBuf],
        mut on_progress: F,
    ) -> Result<(Document, usize)>
    where
        F: FnMut(MergeProgress),
    {
        if paths.is_empty() {
            return Err(Error::EmptyList);
        }

        let mut merged = Document::with_version("1.4");
        let pages_id = merged.new_object_id();
        let mut kids = Vec::with_capacity(paths.len());
        let mut total_pages = 0;

        for (idx, path) in paths.iter().enumerate() {
            let loaded = self.reader.load(path)?;
            let pages = loaded.page_count;

            let subtree = append_document(&mut merged, loaded.document, pages_id)
                .map_err(|e| Error::invalid_format(path, format!("broken page tree: {e}")))?;
            kids.push(Object::Reference(subtree));
            total_pages += pages;

            log::debug!(
                "[{}/{}] Appended {} ({} pages)",
                idx + 1,
                paths.len(),
                path.display(),
                pages
            );

            on_progress(MergeProgress {
                index: idx + 1,
                total: paths.len(),
                path: path.clone(),
                pages,
            });
        }

        merged.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => kids,
                "Count" => total_pages as i64,
            }),
        );
        let catalog_id = merged.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        merged.trailer.set("Root", catalog_id);

        // Input catalogs, outlines and info dictionaries are now unreachable
        merged.prune_objects();
        merged.renumber_objects();

        Ok((merged, total_pages))
    }

    /// Validate every input and report its page count without merging.
    pub fn plan(&self, paths: &[PathBuf]) -> Result<MergePlan> {
        if paths.is_empty() {
            return Err(Error::EmptyList);
        }

        let mut entries = Vec::with_capacity(paths.len());
        for path in paths {
            let loaded = self.reader.load(path)?;
            entries.push(PlanEntry {
                path: path.clone(),
                pages: loaded.page_count,
                size_bytes: loaded.file_size,
            });
        }

        let total_pages = entries.iter().map(|e| e.pages).sum();
        Ok(MergePlan {
            entries,
            total_pages,
        })
    }
}

/// Move every object of `doc` into `merged` and attach its page tree under
/// `parent`. Returns the id of the attached subtree root.
fn append_document(
    merged: &mut Document,
    mut doc: Document,
    parent: ObjectId,
) -> lopdf::Result<ObjectId> {
    // Avoid object id collisions by renumbering the incoming document
    doc.renumber_objects_with(merged.max_id + 1);

    let subtree = doc.catalog()?.get(b"Pages")?.as_reference()?;
    doc.get_object_mut(subtree)?
        .as_dict_mut()?
        .set("Parent", Object::Reference(parent));

    if doc.version > merged.version {
        merged.version = doc.version.clone();
    }
    merged.max_id = merged.max_id.max(doc.max_id);
    merged.objects.extend(doc.objects);

    Ok(subtree)
}
