//! User-facing terminal output for the command-line front-end.
//!
//! Status messages go through [`OutputFormatter`], per-file progress through
//! [`ProgressBar`]. Diagnostics belong in the `log` facade instead.

pub mod formatter;
pub mod progress;

pub use formatter::{MessageLevel, OutputFormatter};
pub use progress::{ProgressBar, ProgressStyle};

use crate::merge::{MergePlan, MergeReport};
use crate::utils::{display_name, format_file_size};

/// Show what a dry run found.
pub fn display_plan(formatter: &OutputFormatter, plan: &MergePlan) {
    formatter.section("Merge plan:");
    for (i, entry) in plan.entries.iter().enumerate() {
        formatter.list_item(
            i + 1,
            &format!(
                "{} ({} pages, {})",
                entry.path.display(),
                entry.pages,
                format_file_size(entry.size_bytes)
            ),
        );
    }
    formatter.info(&format!(
        "\nTotal: {} file(s), {} pages",
        plan.entries.len(),
        plan.total_pages
    ));
}

/// Show the summary of a successful merge.
pub fn display_report(formatter: &OutputFormatter, report: &MergeReport) {
    formatter.success(&format!(
        "Merged {} file(s) into {}",
        report.files_merged,
        display_name(&report.output_path)
    ));
    formatter.info(&format!("  Total pages: {}", report.total_pages));
    formatter.info(&format!("  Output size: {}", report.format_output_size()));
    formatter.detail("Output path", &report.output_path.display().to_string());
    formatter.detail("Time", &format!("{:.2}s", report.elapsed_secs));
}
