//! Types for the converter module.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::file::FileDescriptor;
use crate::format::ImageFormat;

/// Default encoder quality.
pub const DEFAULT_QUALITY: u8 = 100;

/// A single conversion request.
#[derive(Debug, Clone)]
pub struct ConversionRequest {
    /// The file to convert.
    pub source: FileDescriptor,
    /// Format of the file to produce.
    pub target_format: ImageFormat,
    /// Encoder quality, 1-100. Passed to the codec unchecked.
    pub quality: u8,
    /// Replace an existing target file.
    pub overwrite: bool,
}

/// Result of a successful conversion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversionOutcome {
    /// Source file path.
    pub source_path: PathBuf,
    /// Written target file path.
    pub target_path: PathBuf,
    /// Format written.
    pub target_format: ImageFormat,
    /// Size of the target file in bytes.
    pub bytes_written: u64,
    /// Conversion duration in milliseconds.
    pub duration_ms: u64,
}
