//! Error types for the converter module.

use std::path::PathBuf;
use thiserror::Error;

use crate::format::ImageFormat;

/// Errors raised by an [`ImageCodec`](super::ImageCodec) implementation.
#[derive(Debug, Error)]
pub enum CodecError {
    /// The codec library rejected the input or failed to encode.
    #[error(transparent)]
    Image(#[from] image::ImageError),

    /// I/O error while reading the source or writing the target.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The codec has no encoder for this format.
    #[error("Unsupported format: {format}")]
    UnsupportedFormat { format: ImageFormat },
}

/// Per-file conversion errors.
///
/// None of these abort a directory walk; they are collected into the
/// walk report instead.
#[derive(Debug, Error)]
pub enum ConvertError {
    /// Path lacks a directory or extension component.
    #[error("Malformed path {path}: {reason}")]
    MalformedPath { path: String, reason: String },

    /// Source file does not exist.
    #[error("Source file not found: {path}")]
    SourceNotFound { path: PathBuf },

    /// Target file exists and overwriting is disabled.
    #[error("Target file already exists: {path}")]
    TargetExists { path: PathBuf },

    /// Decoding, encoding or writing the target failed.
    #[error("Conversion of {path} failed: {source}")]
    ConversionFailed {
        path: PathBuf,
        #[source]
        source: CodecError,
    },

    /// Target format has no extension or encoder.
    #[error("Unsupported target format: {format}")]
    UnsupportedFormat { format: ImageFormat },

    /// Source extension does not match the expected format.
    #[error("{path} is not a {expected} file (found {found})")]
    SourceFormatMismatch {
        path: PathBuf,
        expected: ImageFormat,
        found: ImageFormat,
    },
}

impl ConvertError {
    /// Creates a new malformed path error.
    pub fn malformed_path(path: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::MalformedPath {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Creates a new conversion failed error.
    pub fn conversion_failed(path: impl Into<PathBuf>, source: impl Into<CodecError>) -> Self {
        Self::ConversionFailed {
            path: path.into(),
            source: source.into(),
        }
    }

    /// Whether the file was skipped rather than failed.
    ///
    /// An existing target with overwrite disabled is the expected outcome of
    /// re-running a batch, so callers usually report it separately.
    pub fn is_skip(&self) -> bool {
        matches!(self, Self::TargetExists { .. })
    }

    /// Short machine-readable name of the error kind.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::MalformedPath { .. } => "malformed_path",
            Self::SourceNotFound { .. } => "source_not_found",
            Self::TargetExists { .. } => "target_exists",
            Self::ConversionFailed { .. } => "conversion_failed",
            Self::UnsupportedFormat { .. } => "unsupported_format",
            Self::SourceFormatMismatch { .. } => "source_format_mismatch",
        }
    }
}
