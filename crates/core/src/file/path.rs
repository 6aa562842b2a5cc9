//! Target path derivation.

use std::path::{Path, PathBuf};

use super::EXTENSION_SEPARATOR;
use crate::converter::ConvertError;
use crate::format::ImageFormat;

/// Derives the sibling path a conversion to `target_format` writes to.
///
/// The directory is kept, everything from the first `.` of the file name on
/// is replaced by the canonical extension of `target_format`.
pub fn derive_target_path(
    source_path: &Path,
    target_format: ImageFormat,
) -> Result<PathBuf, ConvertError> {
    let extension = target_format
        .canonical_extension()
        .as_str()
        .ok_or(ConvertError::UnsupportedFormat {
            format: target_format,
        })?;

    let file_name = source_path
        .file_name()
        .and_then(|name| name.to_str())
        .ok_or_else(|| {
            ConvertError::malformed_path(
                source_path.to_string_lossy(),
                "missing or non UTF-8 file name",
            )
        })?;

    let (base_name, _) = file_name.split_once(EXTENSION_SEPARATOR).ok_or_else(|| {
        ConvertError::malformed_path(source_path.to_string_lossy(), "no extension separator")
    })?;

    Ok(source_path.with_file_name(format!("{base_name}{EXTENSION_SEPARATOR}{extension}")))
}
