//! Error types for Stagehand
//!
//! Uses `thiserror` for library errors; the binary surfaces them through
//! `anyhow`.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for Stagehand operations
pub type StagehandResult<T> = Result<T, StagehandError>;

/// Main error type for Stagehand operations
///
/// There is deliberately no retry or recovery here: a failed filesystem
/// operation or generator invocation aborts the run.
#[derive(Error, Debug)]
pub enum StagehandError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid configuration file
    #[error("invalid config in {file}: {message}")]
    Config { file: PathBuf, message: String },

    /// Directory not found
    #[error("directory not found: {path}")]
    DirectoryNotFound { path: PathBuf },

    /// Template exclusion pattern failed to compile
    #[error("invalid exclude pattern '{pattern}': {message}")]
    InvalidExcludePattern { pattern: String, message: String },

    /// Generator command not found on PATH
    #[error("generator command '{command}' is not available")]
    GeneratorUnavailable { command: String },

    /// Generator exited with a non-zero status
    #[error("generator failed for target '{target}' (exit code: {code:?})")]
    GeneratorFailed { target: String, code: Option<i32> },

    /// Generator completed but an expected output path is missing
    #[error("expected generator output missing: {path}")]
    MissingOutput { path: PathBuf },

    /// Generated metadata file is not valid JSON
    #[error("invalid metadata in {file}: {message}")]
    InvalidMetadata { file: PathBuf, message: String },
}
