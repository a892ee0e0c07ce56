//! Configuration for a command-line merge.
//!
//! [`Config`] is the validated form of the command-line arguments: inputs are
//! already expanded and ordered, and conflicting options have been resolved.

use std::path::PathBuf;

use crate::error::{Error, Result};

/// What to do when the output file already exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OverwriteMode {
    /// Ask the user before overwriting (default).
    #[default]
    Prompt,
    /// Always overwrite without asking.
    Force,
    /// Never overwrite, fail if the file exists.
    NoClobber,
}

/// Complete configuration for a merge run.
#[derive(Debug, Clone)]
pub struct Config {
    /// Input PDF file paths (in merge order).
    pub inputs: Vec<PathBuf>,

    /// Output PDF file path.
    pub output: PathBuf,

    /// File overwrite behavior.
    pub overwrite_mode: OverwriteMode,

    /// Inputs were sorted by path.
    pub sort: bool,

    /// Validate and print the plan without writing.
    pub dry_run: bool,

    pub verbose: bool,

    /// Suppress non-error output.
    pub quiet: bool,

    /// Print the result as JSON.
    pub json: bool,

    /// Open the merged file afterwards.
    pub open_after: bool,
}

impl Config {
    /// Create a configuration with defaults for everything but the paths.
    pub fn new(inputs: Vec<PathBuf>, output: impl Into<PathBuf>) -> Self {
        Self {
            inputs,
            output: output.into(),
            overwrite_mode: OverwriteMode::default(),
            sort: false,
            dry_run: false,
            verbose: false,
            quiet: false,
            json: false,
            open_after: false,
        }
    }

    /// Check the configuration for logical inconsistencies.
    ///
    /// # Errors
    ///
    /// [`Error::EmptyList`] when there are no inputs; [`Error::InvalidConfig`]
    /// for an empty output path, conflicting verbosity flags, or an output that
    /// is also an input.
    pub fn validate(&self) -> Result<()> {
        if self.inputs.is_empty() {
            return Err(Error::EmptyList);
        }

        if self.output.as_os_str().is_empty() {
            return Err(Error::invalid_config("Output path cannot be empty"));
        }

        if self.verbose && self.quiet {
            return Err(Error::invalid_config("Cannot use both --verbose and --quiet"));
        }

        if self.inputs.iter().any(|input| input == &self.output) {
            return Err(Error::invalid_config(format!(
                "Output file cannot be the same as an input file: {}",
                self.output.display()
            )));
        }

        Ok(())
    }

    /// Whether progress and summaries should be printed.
    ///
    /// JSON output replaces the human-readable summary.
    pub fn should_print(&self) -> bool {
        !self.quiet && !self.json
    }
}
