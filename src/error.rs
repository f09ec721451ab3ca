//! # Error Handling
//!
//! This module defines the centralized error type for `apt-components`. It uses
//! the `thiserror` library to describe every failure the rewrite engine can
//! report, each carrying enough context (usually the offending path) for the
//! operator to act on it.
//!
//! ## Key Components
//!
//! - **`Error`**: The enum of all failure modes.
//! - **`Result<T>`**: A type alias for `std::result::Result<T, Error>`.
//!
//! Errors fall into two groups:
//!
//! - **Per-file errors** (`Parse`, `Read`, `Write`): reported for the file in
//!   question, which is left untouched. Processing continues with the next
//!   file.
//! - **Run-level errors** (`Backup`, `Config`): fatal. A run whose backup could
//!   not be created never mutates anything.
//!
//! Format classification has no error variant: it is total.

use std::path::PathBuf;

use thiserror::Error;

/// Main error type for apt-components operations
#[derive(Error, Debug)]
pub enum Error {
    /// The file content does not conform to the format it was classified as.
    #[error("Parse error in {}{}: {message}", path.display(), line.map(|l| format!(" (line {})", l)).unwrap_or_default())]
    Parse {
        path: PathBuf,
        /// 1-based line number, when the problem is tied to a single line
        line: Option<usize>,
        message: String,
    },

    /// The file could not be read.
    #[error("Failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Creating, writing or renaming the replacement file failed.
    ///
    /// The original file is untouched when this is reported.
    #[error("Write error for {}: {message}", path.display())]
    Write { path: PathBuf, message: String },

    /// The pre-run backup could not be created.
    #[error("Backup failed: {message}")]
    Backup { message: String },

    /// The engine configuration is invalid.
    #[error("Configuration error: {message}{}", hint.as_ref().map(|h| format!("\n  hint: {}", h)).unwrap_or_default())]
    Config {
        message: String,
        /// Optional hint for how to fix the configuration issue
        hint: Option<String>,
    },

    /// The package index refresh command failed.
    #[error("Index refresh failed ({command}): {message}")]
    Refresh { command: String, message: String },

    /// A directory traversal error, wrapped from `walkdir::Error`.
    #[error("Directory traversal error: {0}")]
    WalkDir(#[from] walkdir::Error),
}

impl Error {
    /// Shorthand for a parse error tied to a line of a file.
    pub fn parse_at(path: impl Into<PathBuf>, line: usize, message: impl Into<String>) -> Self {
        Error::Parse {
            path: path.into(),
            line: Some(line),
            message: message.into(),
        }
    }
}

/// A convenient type alias for `Result<T, Error>`.
pub type Result<T> = std::result::Result<T, Error>;
