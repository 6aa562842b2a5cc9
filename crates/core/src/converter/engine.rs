//! Single-file conversion with overwrite policy.

use std::io::Write;
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use tempfile::Builder;
use tracing::{debug, info};

use super::error::{CodecError, ConvertError};
use super::image_rs::ImageRsCodec;
use super::traits::{ImageCodec, PassThrough, ResizePolicy};
use super::types::{ConversionOutcome, ConversionRequest, DEFAULT_QUALITY};
use crate::file::{derive_target_path, FileDescriptor};
use crate::format::ImageFormat;

/// Prefix of the in-progress file written next to the target.
const PARTIAL_PREFIX: &str = ".rasterbatch-";

/// Converts single files through an [`ImageCodec`].
///
/// The engine is cheap to clone; clones share the codec and resize policy.
/// A conversion either fully creates/replaces the target or leaves nothing
/// behind, and never touches the source file.
///
/// The target existence check and the final rename are not atomic together.
/// Two concurrent conversions that map to the same target (`a.tif` and
/// `a.tiff`) can both pass the check; the later rename wins.
pub struct ConversionEngine<C: ImageCodec = ImageRsCodec> {
    codec: Arc<C>,
    resize: Arc<dyn ResizePolicy>,
}

impl<C: ImageCodec> Clone for ConversionEngine<C> {
    fn clone(&self) -> Self {
        Self {
            codec: Arc::clone(&self.codec),
            resize: Arc::clone(&self.resize),
        }
    }
}

impl ConversionEngine<ImageRsCodec> {
    /// Creates an engine backed by the `image` crate.
    pub fn with_defaults() -> Self {
        Self::new(ImageRsCodec::new())
    }
}

impl<C: ImageCodec> ConversionEngine<C> {
    /// Creates a new engine that keeps image dimensions.
    pub fn new(codec: C) -> Self {
        Self {
            codec: Arc::new(codec),
            resize: Arc::new(PassThrough),
        }
    }

    /// Replaces the sizing step run between decode and encode.
    pub fn with_resize_policy(mut self, policy: impl ResizePolicy + 'static) -> Self {
        self.resize = Arc::new(policy);
        self
    }

    /// Returns the codec used by this engine.
    pub fn codec(&self) -> &C {
        &self.codec
    }

    /// Converts `source_path` into a sibling file of `target_format`.
    pub fn convert(
        &self,
        source_path: &Path,
        target_format: ImageFormat,
        quality: u8,
        overwrite: bool,
    ) -> Result<ConversionOutcome, ConvertError> {
        let request = ConversionRequest {
            source: FileDescriptor::from_path(source_path)?,
            target_format,
            quality,
            overwrite,
        };
        self.convert_request(&request)
    }

    /// Like [`convert`](Self::convert), but first rejects sources whose
    /// extension does not denote `expected_format`.
    pub fn convert_checked(
        &self,
        source_path: &Path,
        expected_format: ImageFormat,
        target_format: ImageFormat,
        quality: u8,
        overwrite: bool,
    ) -> Result<ConversionOutcome, ConvertError> {
        let source = FileDescriptor::from_path(source_path)?;
        let found = source.format();
        if found != expected_format {
            return Err(ConvertError::SourceFormatMismatch {
                path: source_path.to_path_buf(),
                expected: expected_format,
                found,
            });
        }

        self.convert_request(&ConversionRequest {
            source,
            target_format,
            quality,
            overwrite,
        })
    }

    /// Converts a TIFF file to a JPEG at full quality without overwriting.
    pub fn convert_tiff_to_jpeg(&self, source_path: &Path) -> Result<ConversionOutcome, ConvertError> {
        self.convert_checked(
            source_path,
            ImageFormat::Tiff,
            ImageFormat::Jpeg,
            DEFAULT_QUALITY,
            false,
        )
    }

    /// Runs a prepared request.
    pub fn convert_request(
        &self,
        request: &ConversionRequest,
    ) -> Result<ConversionOutcome, ConvertError> {
        let start = Instant::now();
        let source = &request.source;
        let source_path = source.full_path();

        if !source.exists() {
            return Err(ConvertError::SourceNotFound {
                path: source_path.to_path_buf(),
            });
        }

        let target_path = derive_target_path(source_path, request.target_format)?;
        if !self
            .codec
            .supported_output_formats()
            .contains(&request.target_format)
        {
            return Err(ConvertError::UnsupportedFormat {
                format: request.target_format,
            });
        }

        // A target equal to the source is never written, overwrite or not.
        if target_path == source_path || (!request.overwrite && target_path.exists()) {
            return Err(ConvertError::TargetExists { path: target_path });
        }

        debug!(
            source = %source_path.display(),
            target = %target_path.display(),
            codec = self.codec.name(),
            "Converting image"
        );

        let image = self
            .codec
            .decode(source_path)
            .map_err(|e| ConvertError::conversion_failed(source_path, e))?;
        let image = self.resize.apply(image);
        let bytes = self
            .codec
            .encode(&image, request.target_format, request.quality)
            .map_err(|e| ConvertError::conversion_failed(source_path, e))?;

        write_atomically(&target_path, &bytes)
            .map_err(|e| ConvertError::conversion_failed(source_path, e))?;

        let duration_ms = start.elapsed().as_millis() as u64;
        info!(
            source = %source_path.display(),
            target = %target_path.display(),
            bytes = bytes.len(),
            duration_ms,
            "Converted image"
        );

        Ok(ConversionOutcome {
            source_path: source_path.to_path_buf(),
            target_path,
            target_format: request.target_format,
            bytes_written: bytes.len() as u64,
            duration_ms,
        })
    }
}

/// Writes `bytes` to a temp file beside `target`, then renames it over
/// `target`. The temp file is removed if anything fails before the rename.
///
/// New targets get the mode of a normally created file (0o666 minus the
/// umask); a replaced target keeps its previous permissions.
fn write_atomically(target: &Path, bytes: &[u8]) -> Result<(), CodecError> {
    let directory = target
        .parent()
        .filter(|dir| !dir.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));

    let mut builder = Builder::new();
    builder.prefix(PARTIAL_PREFIX).suffix(".part");
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        builder.permissions(std::fs::Permissions::from_mode(0o666));
    }

    let mut partial = builder.tempfile_in(directory)?;
    partial.write_all(bytes)?;
    partial.as_file().sync_all()?;
    if let Ok(existing) = std::fs::metadata(target) {
        partial.as_file().set_permissions(existing.permissions())?;
    }
    partial.persist(target).map_err(|e| e.error)?;
    Ok(())
}
