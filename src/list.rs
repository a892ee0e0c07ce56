//! Ordered list of files waiting to be merged.
//!
//! The list is a plain ordered sequence: nothing is validated when a file is
//! added, duplicates are allowed, and every editing operation silently ignores
//! indices it cannot act on. Whether a file is actually a readable PDF is only
//! decided when a merge runs.

use crate::utils::{display_name, format_file_size};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

/// One input file pending merge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileRecord {
    path: PathBuf,
    display_name: String,
    size_bytes: u64,
}

impl FileRecord {
    /// Build a record for `path`, reading its size from the filesystem.
    ///
    /// A file that cannot be inspected gets a size of zero; it stays in the
    /// list and fails later if it is still unreadable at merge time.
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let size_bytes = std::fs::metadata(&path).map(|m| m.len()).unwrap_or(0);
        Self::with_size(path, size_bytes)
    }

    /// Build a record with a known size.
    pub fn with_size(path: impl Into<PathBuf>, size_bytes: u64) -> Self {
        let path = path.into();
        Self {
            display_name: display_name(&path),
            path,
            size_bytes,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    pub fn size_bytes(&self) -> u64 {
        self.size_bytes
    }

    /// Size as shown in the file table, e.g. `1.5 KB`.
    pub fn formatted_size(&self) -> String {
        format_file_size(self.size_bytes)
    }
}

/// Ordered sequence of [`FileRecord`]s.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileList {
    records: Vec<FileRecord>,
}

impl FileList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a record for each path, in the order given.
    ///
    /// Returns the number of records added.
    pub fn add<I>(&mut self, paths: I) -> usize
    where
        I: IntoIterator,
        I::Item: Into<PathBuf>,
    {
        let before = self.records.len();
        self.records.extend(paths.into_iter().map(FileRecord::from_path));
        self.records.len() - before
    }

    /// Append already-built records.
    pub fn add_records<I: IntoIterator<Item = FileRecord>>(&mut self, records: I) -> usize {
        let before = self.records.len();
        self.records.extend(records);
        self.records.len() - before
    }

    /// Remove the records at `indices`.
    ///
    /// Indices refer to positions before the removal. Out-of-range and repeated
    /// indices are ignored. Returns the number of records removed.
    pub fn remove<I: IntoIterator<Item = usize>>(&mut self, indices: I) -> usize {
        let len = self.records.len();
        let doomed: BTreeSet<usize> = indices.into_iter().filter(|&i| i < len).collect();

        // Back to front so earlier indices stay valid
        for &index in doomed.iter().rev() {
            self.records.remove(index);
        }

        doomed.len()
    }

    /// Swap the record at `index` with the one above it.
    ///
    /// Returns false at the top of the list or for an out-of-range index.
    pub fn move_up(&mut self, index: usize) -> bool {
        if index == 0 || index >= self.records.len() {
            return false;
        }
        self.records.swap(index - 1, index);
        true
    }

    /// Swap the record at `index` with the one below it.
    ///
    /// Returns false at the bottom of the list or for an out-of-range index.
    pub fn move_down(&mut self, index: usize) -> bool {
        if index >= self.records.len().saturating_sub(1) {
            return false;
        }
        self.records.swap(index, index + 1);
        true
    }

    /// Move a selection of records one step up as a block.
    ///
    /// Returns the new positions of the selection. If the topmost selected record
    /// is already first, nothing moves and the (valid) selection comes back
    /// unchanged.
    pub fn move_selection_up(&mut self, indices: &[usize]) -> Vec<usize> {
        let selection = self.valid_selection(indices);

        match selection.first() {
            Some(&first) if first > 0 => {
                for &index in &selection {
                    self.records.swap(index - 1, index);
                }
                selection.iter().map(|i| i - 1).collect()
            }
            _ => selection,
        }
    }

    /// Move a selection of records one step down as a block.
    ///
    /// Mirror of [`FileList::move_selection_up`].
    pub fn move_selection_down(&mut self, indices: &[usize]) -> Vec<usize> {
        let selection = self.valid_selection(indices);

        match selection.last() {
            Some(&last) if last + 1 < self.records.len() => {
                for &index in selection.iter().rev() {
                    self.records.swap(index, index + 1);
                }
                selection.iter().map(|i| i + 1).collect()
            }
            _ => selection,
        }
    }

    /// Sorted, deduplicated, in-range subset of `indices`.
    fn valid_selection(&self, indices: &[usize]) -> Vec<usize> {
        let len = self.records.len();
        indices
            .iter()
            .copied()
            .filter(|&i| i < len)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Order records by path. Equal paths keep their relative order.
    pub fn sort_by_path(&mut self) {
        self.records.sort_by(|a, b| a.path.cmp(&b.path));
    }

    /// Remove every record.
    pub fn clear(&mut self) {
        self.records.clear();
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&FileRecord> {
        self.records.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, FileRecord> {
        self.records.iter()
    }

    /// Snapshot of the paths in merge order.
    pub fn paths(&self) -> Vec<PathBuf> {
        self.records.iter().map(|r| r.path.clone()).collect()
    }

    /// Combined size of all records in bytes.
    pub fn total_size(&self) -> u64 {
        self.records.iter().map(|r| r.size_bytes).sum()
    }
}

impl<'a> IntoIterator for &'a FileList {
    type Item = &'a FileRecord;
    type IntoIter = std::slice::Iter<'a, FileRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}
