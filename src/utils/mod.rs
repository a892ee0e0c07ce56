//! Utilities for path collection, size formatting and opening results.

use crate::error::{Error, Result};
use std::path::{Path, PathBuf};
use std::process::Command;
use walkdir::WalkDir;

/// Expand user-supplied inputs into an ordered list of file paths.
///
/// Each input is handled in turn, keeping the caller's order:
/// - an existing directory is searched recursively for `*.pdf` files, sorted by path;
/// - an input containing glob metacharacters is expanded with `glob`
///   (matches in the order `glob` yields them, which is alphabetical);
/// - anything else is passed through untouched, so a missing file is reported
///   later by the merge rather than here.
pub fn expand_inputs<T>(inputs: T) -> Result<Vec<PathBuf>>
where
    T: IntoIterator,
    T::Item: AsRef<Path>,
{
    let mut resolved = Vec::new();

    for input in inputs {
        let input = input.as_ref();

        if input.is_dir() {
            resolved.extend(collect_pdfs_in_dir(input));
        } else if is_glob_pattern(input) {
            resolved.extend(collect_paths_for_pattern(&input.to_string_lossy())?);
        } else {
            resolved.push(input.to_path_buf());
        }
    }

    Ok(resolved)
}

/// Expand a single glob pattern into filesystem paths.
///
/// Pattern examples:
/// - `"**/*.pdf"`
/// - `"./docs/*.pdf"`
fn collect_paths_for_pattern(pattern: &str) -> Result<Vec<PathBuf>> {
    let paths = glob::glob(pattern)
        .map_err(|err| Error::invalid_config(format!("Invalid pattern '{pattern}': {err}")))?;

    let mut resolved = Vec::new();
    for entry in paths {
        match entry {
            Ok(path) => resolved.push(path),
            // Unreadable entries are skipped, same as a shell glob would
            Err(err) => log::warn!("Skipping {}: {}", err.path().display(), err),
        }
    }

    Ok(resolved)
}

/// Recursively collect PDF files below `dir`, sorted by path.
pub fn collect_pdfs_in_dir(dir: &Path) -> Vec<PathBuf> {
    let mut found: Vec<PathBuf> = WalkDir::new(dir)
        .follow_links(true)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file() && has_pdf_extension(entry.path()))
        .map(|entry| entry.into_path())
        .collect();

    found.sort();
    found
}

fn is_glob_pattern(path: &Path) -> bool {
    path.to_string_lossy()
        .chars()
        .any(|c| matches!(c, '*' | '?' | '['))
}

/// Check whether a path ends in `.pdf` (case-insensitive).
pub fn has_pdf_extension(path: &Path) -> bool {
    path.extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("pdf"))
}

/// Name shown to the user for a path: its final component, or the whole path
/// when there is none.
pub fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Format file size as human-readable string.
pub fn format_file_size(size: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if size >= GB {
        format!("{:.1} GB", size as f64 / GB as f64)
    } else if size >= MB {
        format!("{:.1} MB", size as f64 / MB as f64)
    } else if size >= KB {
        format!("{:.1} KB", size as f64 / KB as f64)
    } else {
        format!("{size} B")
    }
}

/// Split the text of a drag-and-drop event into paths.
///
/// Entries are separated by newlines. `file://` URIs are turned back into
/// plain paths, including their `%XX` escapes.
pub fn parse_dropped_paths(text: &str) -> Vec<PathBuf> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(|line| match line.strip_prefix("file://") {
            Some(uri) => PathBuf::from(percent_decode(uri)),
            None => PathBuf::from(line),
        })
        .collect()
}

fn percent_decode(s: &str) -> String {
    let bytes = s.as_bytes();
    let mut decoded = Vec::with_capacity(bytes.len());
    let mut i = 0;

    while i < bytes.len() {
        if bytes[i] == b'%'
            && let Some(hex) = s.get(i + 1..i + 3)
            && let Ok(byte) = u8::from_str_radix(hex, 16)
        {
            decoded.push(byte);
            i += 3;
        } else {
            decoded.push(bytes[i]);
            i += 1;
        }
    }

    String::from_utf8_lossy(&decoded).into_owned()
}

/// Sort dropped paths into PDFs to add and entries to skip.
///
/// Directories contribute the PDFs below them; any other path is kept only if
/// it has a `.pdf` extension.
pub fn partition_dropped(paths: Vec<PathBuf>) -> (Vec<PathBuf>, Vec<PathBuf>) {
    let mut pdfs = Vec::new();
    let mut skipped = Vec::new();

    for path in paths {
        if path.is_dir() {
            pdfs.extend(collect_pdfs_in_dir(&path));
        } else if has_pdf_extension(&path) {
            pdfs.push(path);
        } else {
            log::warn!("Skipping non-PDF drop: {}", path.display());
            skipped.push(path);
        }
    }

    (pdfs, skipped)
}

/// Open a file with the desktop's default application.
///
/// The viewer is started detached; only a failure to launch it is reported.
pub fn open_in_default_app(path: &Path) -> std::io::Result<()> {
    #[cfg(target_os = "windows")]
    let mut command = {
        let mut cmd = Command::new("cmd");
        cmd.args(["/C", "start", ""]);
        cmd
    };

    #[cfg(target_os = "macos")]
    let mut command = Command::new("open");

    #[cfg(not(any(target_os = "windows", target_os = "macos")))]
    let mut command = Command::new("xdg-open");

    command.arg(path).spawn().map(|_| ())
}
