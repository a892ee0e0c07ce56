//! Error types for pdfmerge.
//!
//! Every failure a merge job or a front-end can hit is a variant of [`Error`].
//! Variants that concern a specific file carry its path so the message shown to
//! the user can name it.

use serde::Serialize;
use std::io;
use std::path::{Path, PathBuf};

/// Result type alias for pdfmerge operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for pdfmerge operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Input file does not exist.
    #[error("File not found: {}", path.display())]
    FileNotFound {
        /// Path to the missing file.
        path: PathBuf,
    },

    /// Input file is not a readable PDF document.
    #[error("Not a valid PDF: {}\n  Reason: {reason}", path.display())]
    InvalidFormat {
        /// Path to the offending file.
        path: PathBuf,
        /// What the PDF library reported.
        reason: String,
    },

    /// Input file cannot be opened without a password.
    #[error(
        "PDF is password protected and cannot be merged: {}\n  \
         Hint: Decrypt the PDF first using 'qpdf --decrypt' or similar tools",
        path.display()
    )]
    PasswordProtected {
        /// Path to the protected file.
        path: PathBuf,
    },

    /// Reading or writing a file failed at the OS level.
    #[error("I/O error on: {}\n  Reason: {source}", path.display())]
    Io {
        /// Path being read or written.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// No files were given to merge.
    #[error("No input files to merge")]
    EmptyList,

    /// Output file already exists and overwriting is not allowed.
    #[error(
        "Output file already exists: {}\n  \
         Use --force to overwrite or choose a different output path",
        path.display()
    )]
    OutputExists {
        /// Path to the existing output.
        path: PathBuf,
    },

    /// Input list file could not be read.
    #[error("Failed to read input list file: {}\n  Reason: {source}", path.display())]
    InputList {
        /// Path to the list file.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// A merge job is already running.
    #[error("A merge is already in progress")]
    Busy,

    /// Invalid configuration.
    #[error("Invalid configuration: {message}")]
    InvalidConfig {
        /// What is wrong with the configuration.
        message: String,
    },

    /// User declined to continue.
    #[error("Operation cancelled by user")]
    Cancelled,
}

/// Coarse classification of an [`Error`], cheap to copy into job status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    FileNotFound,
    InvalidFormat,
    PasswordProtected,
    Io,
    EmptyList,
    OutputExists,
    InputList,
    Busy,
    InvalidConfig,
    Cancelled,
}

impl Error {
    /// Create a FileNotFound error.
    pub fn file_not_found(path: impl Into<PathBuf>) -> Self {
        Self::FileNotFound { path: path.into() }
    }

    /// Create an InvalidFormat error.
    pub fn invalid_format(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self::InvalidFormat {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Create a PasswordProtected error.
    pub fn password_protected(path: impl Into<PathBuf>) -> Self {
        Self::PasswordProtected { path: path.into() }
    }

    /// Create an Io error for `path`.
    pub fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Create an OutputExists error.
    pub fn output_exists(path: impl Into<PathBuf>) -> Self {
        Self::OutputExists { path: path.into() }
    }

    /// Create an InvalidConfig error.
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            message: message.into(),
        }
    }

    /// Classify this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::FileNotFound { .. } => ErrorKind::FileNotFound,
            Self::InvalidFormat { .. } => ErrorKind::InvalidFormat,
            Self::PasswordProtected { .. } => ErrorKind::PasswordProtected,
            Self::Io { .. } => ErrorKind::Io,
            Self::EmptyList => ErrorKind::EmptyList,
            Self::OutputExists { .. } => ErrorKind::OutputExists,
            Self::InputList { .. } => ErrorKind::InputList,
            Self::Busy => ErrorKind::Busy,
            Self::InvalidConfig { .. } => ErrorKind::InvalidConfig,
            Self::Cancelled => ErrorKind::Cancelled,
        }
    }

    /// The file this error is about, if any.
    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::FileNotFound { path }
            | Self::InvalidFormat { path, .. }
            | Self::PasswordProtected { path }
            | Self::Io { path, .. }
            | Self::OutputExists { path }
            | Self::InputList { path, .. } => Some(path),
            _ => None,
        }
    }

    /// Get the process exit code for this error.
    pub fn exit_code(&self) -> i32 {
        self.kind().exit_code()
    }
}

impl ErrorKind {
    /// Process exit code for errors of this kind.
    pub fn exit_code(self) -> i32 {
        match self {
            Self::EmptyList | Self::InvalidConfig => 1,
            Self::FileNotFound | Self::InputList => 2,
            Self::InvalidFormat | Self::PasswordProtected => 3,
            Self::OutputExists => 4,
            Self::Io => 5,
            Self::Busy => 6,
            Self::Cancelled => 130, // Standard exit code for SIGINT
        }
    }
}
