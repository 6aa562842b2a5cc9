//! Error types for the walker module.

use std::path::PathBuf;
use thiserror::Error;

use crate::pool::PoolError;

/// Fatal errors of a directory walk.
#[derive(Debug, Error)]
pub enum WalkError {
    /// Root path does not exist.
    #[error("Root directory not found: {path}")]
    RootNotFound { path: PathBuf },

    /// Root path is not a directory.
    #[error("Root path is not a directory: {path}")]
    NotADirectory { path: PathBuf },

    /// Root directory could not be listed.
    #[error("Failed to read root directory {path}: {reason}")]
    RootUnreadable { path: PathBuf, reason: String },

    /// The enumeration thread panicked or was cancelled.
    #[error("Enumeration of {path} aborted: {reason}")]
    EnumerationAborted { path: PathBuf, reason: String },

    /// The pool refused work.
    #[error("Worker pool error: {0}")]
    Pool(#[from] PoolError),
}
