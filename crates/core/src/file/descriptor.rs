//! Snapshot of a single file's location and stat metadata.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::{is_separator, Path, PathBuf};

use super::EXTENSION_SEPARATOR;
use crate::converter::ConvertError;
use crate::format::{format_for_extension, ImageFormat};

/// Basic stat metadata of a file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileMetadata {
    /// File size in bytes.
    pub size_bytes: u64,
    /// Last modification time, when the platform reports one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub modified: Option<DateTime<Utc>>,
    /// Whether the file is read-only.
    pub readonly: bool,
}

impl FileMetadata {
    fn load(path: &Path) -> std::io::Result<Self> {
        let meta = std::fs::metadata(path)?;
        Ok(Self {
            size_bytes: meta.len(),
            modified: meta.modified().ok().map(DateTime::<Utc>::from),
            readonly: meta.permissions().readonly(),
        })
    }
}

/// A file path split into its parts, plus an existence/metadata snapshot.
///
/// `exists` and `metadata` are probed once at construction and never
/// refreshed, so they go stale if the file changes afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileDescriptor {
    full_path: PathBuf,
    directory: String,
    base_name: String,
    extension: String,
    exists: bool,
    metadata: Option<FileMetadata>,
}

impl FileDescriptor {
    /// Parses `path` and probes the filesystem.
    ///
    /// The path is split at its last path separator, then the file name at
    /// its first `.`. Either split failing yields
    /// [`ConvertError::MalformedPath`].
    pub fn new(path: &str) -> Result<Self, ConvertError> {
        let (directory, file_name) = path
            .rsplit_once(is_separator)
            .ok_or_else(|| ConvertError::malformed_path(path, "no path separator"))?;
        let (base_name, extension) = file_name
            .split_once(EXTENSION_SEPARATOR)
            .ok_or_else(|| ConvertError::malformed_path(path, "no extension separator"))?;

        let full_path = PathBuf::from(path);
        let exists = full_path.is_file();
        let metadata = if exists {
            match FileMetadata::load(&full_path) {
                Ok(metadata) => Some(metadata),
                Err(e) => {
                    tracing::warn!(path = %full_path.display(), error = %e, "Failed to load file metadata");
                    None
                }
            }
        } else {
            None
        };

        Ok(Self {
            full_path,
            directory: directory.to_string(),
            base_name: base_name.to_string(),
            extension: extension.to_string(),
            exists,
            metadata,
        })
    }

    /// Same as [`FileDescriptor::new`] for an OS path; non UTF-8 paths are
    /// rejected as malformed.
    pub fn from_path(path: &Path) -> Result<Self, ConvertError> {
        let path_str = path
            .to_str()
            .ok_or_else(|| ConvertError::malformed_path(path.to_string_lossy(), "not valid UTF-8"))?;
        Self::new(path_str)
    }

    pub fn full_path(&self) -> &Path {
        &self.full_path
    }

    pub fn directory(&self) -> &str {
        &self.directory
    }

    pub fn base_name(&self) -> &str {
        &self.base_name
    }

    /// Everything after the first `.` of the file name.
    pub fn extension(&self) -> &str {
        &self.extension
    }

    pub fn exists(&self) -> bool {
        self.exists
    }

    /// `None` if the file is missing or its metadata could not be read.
    pub fn metadata(&self) -> Option<&FileMetadata> {
        self.metadata.as_ref()
    }

    /// Image format implied by the extension.
    pub fn format(&self) -> ImageFormat {
        format_for_extension(&self.extension)
    }
}
