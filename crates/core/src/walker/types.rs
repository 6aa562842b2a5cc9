//! Types for the walker module.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::converter::{ConversionOutcome, ConvertError, DEFAULT_QUALITY};
use crate::format::ImageFormat;
use crate::pool::DEFAULT_MAX_CONCURRENCY;

/// Options for [`DirectoryWalker::walk_and_convert`](super::DirectoryWalker::walk_and_convert).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WalkOptions {
    /// Only files whose extension maps to this format are converted.
    /// `None` attempts every file.
    pub source_format: Option<ImageFormat>,
    /// Format to convert to.
    pub target_format: ImageFormat,
    /// Descend into subdirectories.
    pub recursive: bool,
    /// Encoder quality, passed through unchecked.
    pub quality: u8,
    /// Replace existing targets.
    pub overwrite: bool,
    /// Pool size used by [`DirectoryWalker::run`](super::DirectoryWalker::run).
    pub max_concurrency: usize,
}

impl Default for WalkOptions {
    fn default() -> Self {
        Self {
            source_format: Some(ImageFormat::Tiff),
            target_format: ImageFormat::Jpeg,
            recursive: true,
            quality: DEFAULT_QUALITY,
            overwrite: false,
            max_concurrency: DEFAULT_MAX_CONCURRENCY,
        }
    }
}

/// Result of converting one file during a walk.
#[derive(Debug)]
pub struct FileOutcome {
    /// The source file.
    pub source: PathBuf,
    /// Conversion result.
    pub result: Result<ConversionOutcome, ConvertError>,
}

impl FileOutcome {
    pub fn is_success(&self) -> bool {
        self.result.is_ok()
    }
}

/// Aggregated results of a directory walk.
///
/// Outcomes are listed in completion order, which differs from
/// enumeration order when the pool runs tasks in parallel.
#[derive(Debug, Default)]
pub struct WalkReport {
    /// One entry per submitted file.
    pub outcomes: Vec<FileOutcome>,
    /// Directory entries that could not be read.
    pub skipped_entries: usize,
    /// Wall time of the walk in milliseconds.
    pub duration_ms: u64,
}

impl WalkReport {
    /// Successful conversions.
    pub fn succeeded(&self) -> impl Iterator<Item = &ConversionOutcome> {
        self.outcomes.iter().filter_map(|o| o.result.as_ref().ok())
    }

    /// Failed conversions with their source paths.
    pub fn failed(&self) -> impl Iterator<Item = (&Path, &ConvertError)> {
        self.outcomes
            .iter()
            .filter_map(|o| o.result.as_ref().err().map(|e| (o.source.as_path(), e)))
    }

    pub fn success_count(&self) -> usize {
        self.succeeded().count()
    }

    /// Number of failures, including skipped files.
    pub fn failure_count(&self) -> usize {
        self.failed().count()
    }

    /// Number of files skipped because their target already existed.
    pub fn skipped_count(&self) -> usize {
        self.failed().filter(|(_, e)| e.is_skip()).count()
    }

    /// Looks up the outcome for a source path.
    pub fn outcome_for(&self, source: &Path) -> Option<&FileOutcome> {
        self.outcomes.iter().find(|o| o.source == source)
    }
}
