//! CLI argument parsing for pdfmerge.
//!
//! This module defines the command-line interface structure using `clap`.
//! It handles argument parsing, validation, and help text generation.
//!
//! # Examples
//!
//! ```no_run
//! use pdfmerge::cli::Cli;
//! use clap::Parser;
//!
//! let cli = Cli::parse();
//! println!("Merging {} files", cli.inputs.len());
//! ```

use clap::Parser;
use std::path::{Path, PathBuf};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};

use crate::config::{Config, OverwriteMode};
use crate::error::{Error, Result};
use crate::utils::expand_inputs;

/// Merge PDF files into a single document.
///
/// Pages are copied in the order the files are given: every page of the
/// first file, then every page of the second, and so on.
#[derive(Parser, Debug)]
#[command(name = "pdfmerge")]
#[command(version)]
#[command(about = "Merge PDF files into a single document", long_about = None)]
#[command(arg_required_else_help = true)]
pub struct Cli {
    /// Input PDF files to merge (in order)
    ///
    /// Glob patterns are expanded and directories are searched
    /// recursively for PDF files.
    ///
    /// Examples:
    ///   pdfmerge a.pdf b.pdf -o merged.pdf
    ///   pdfmerge 'chapters/*.pdf' -o book.pdf
    #[arg(value_name = "FILE", required_unless_present = "input_list")]
    pub inputs: Vec<PathBuf>,

    /// Output PDF file path
    ///
    /// Missing parent directories are created.
    #[arg(short, long, value_name = "FILE", env = "PDFMERGE_OUTPUT")]
    pub output: PathBuf,

    /// Sort inputs by path before merging
    #[arg(short, long)]
    pub sort: bool,

    /// Dry run - check every input and show the merge plan without writing
    #[arg(short = 'n', long)]
    pub dry_run: bool,

    /// Overwrite an existing output file without asking
    #[arg(short, long)]
    pub force: bool,

    /// Never overwrite an existing output file
    ///
    /// If the output file already exists, exit with an error
    /// instead of prompting or overwriting.
    #[arg(long, conflicts_with = "force")]
    pub no_clobber: bool,

    /// Show details about each input file
    #[arg(short, long)]
    pub verbose: bool,

    /// Suppress all non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Read more input paths from a file (one path per line)
    ///
    /// Lines starting with '#' and blank lines are ignored.
    /// Use '-' to read from stdin. Listed files come after the
    /// ones given on the command line.
    #[arg(long, value_name = "FILE")]
    pub input_list: Option<PathBuf>,

    /// Print the result as JSON
    #[arg(long)]
    pub json: bool,

    /// Open the merged file in the default viewer afterwards
    #[arg(long)]
    pub open: bool,
}

impl Cli {
    /// Early checks that need no file I/O.
    ///
    /// # Errors
    ///
    /// [`Error::EmptyList`] if there are neither inputs nor an input list,
    /// [`Error::InvalidConfig`] for an empty output path.
    pub fn validate(&self) -> Result<()> {
        if self.inputs.is_empty() && self.input_list.is_none() {
            return Err(Error::EmptyList);
        }

        if self.output.as_os_str().is_empty() {
            return Err(Error::invalid_config("Output path cannot be empty"));
        }

        Ok(())
    }

    /// Default log filter; `RUST_LOG` still overrides it.
    pub fn log_level(&self) -> log::LevelFilter {
        if self.verbose {
            log::LevelFilter::Debug
        } else if self.quiet {
            log::LevelFilter::Error
        } else {
            log::LevelFilter::Warn
        }
    }

    fn overwrite_mode(&self) -> OverwriteMode {
        if self.force {
            OverwriteMode::Force
        } else if self.no_clobber {
            OverwriteMode::NoClobber
        } else {
            OverwriteMode::Prompt
        }
    }

    /// Build a validated [`Config`] for the resolved `inputs`.
    ///
    /// # Errors
    ///
    /// Whatever [`Config::validate`] rejects.
    pub fn to_config(&self, inputs: Vec<PathBuf>) -> Result<Config> {
        let config = Config {
            inputs,
            output: self.output.clone(),
            overwrite_mode: self.overwrite_mode(),
            sort: self.sort,
            dry_run: self.dry_run,
            verbose: self.verbose,
            quiet: self.quiet,
            json: self.json,
            open_after: self.open,
        };

        config.validate()?;
        Ok(config)
    }

    /// All inputs in merge order: command-line inputs first, then the
    /// entries of `--input-list`. Globs and directories are expanded.
    ///
    /// # Errors
    ///
    /// [`Error::InputList`] if the list cannot be read, [`Error::EmptyList`]
    /// if nothing is left after expansion.
    pub async fn get_all_inputs(&self) -> Result<Vec<PathBuf>> {
        let mut all_inputs = expand_inputs(&self.inputs)?;

        if let Some(list_path) = &self.input_list {
            let listed = read_input_list(list_path).await?;
            log::debug!("Read {} entries from {}", listed.len(), list_path.display());
            all_inputs.extend(expand_inputs(&listed)?);
        }

        if all_inputs.is_empty() {
            return Err(Error::EmptyList);
        }

        Ok(all_inputs)
    }
}

/// Read input paths from a list file, or from stdin when `path` is `-`.
async fn read_input_list(path: &Path) -> Result<Vec<PathBuf>> {
    let to_error = |source| Error::InputList {
        path: path.to_path_buf(),
        source,
    };

    if path.as_os_str() == "-" {
        let stdin = BufReader::new(tokio::io::stdin());
        return parse_input_list(stdin).await.map_err(to_error);
    }

    let file = tokio::fs::File::open(path).await.map_err(to_error)?;
    parse_input_list(BufReader::new(file))
        .await
        .map_err(to_error)
}

/// One path per line; blank lines and `#` comments are skipped.
async fn parse_input_list<R>(reader: R) -> std::io::Result<Vec<PathBuf>>
where
    R: AsyncBufRead + Unpin,
{
    let mut lines = reader.lines();
    let mut paths = Vec::new();

    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        paths.push(PathBuf::from(line));
    }

    Ok(paths)
}
