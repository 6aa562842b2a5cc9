//! Trait definitions for the converter module.

use image::DynamicImage;
use std::path::Path;

use super::error::CodecError;
use crate::format::ImageFormat;

/// Decodes and encodes raster images.
///
/// Calls are blocking and may be CPU heavy; the directory walker runs them
/// on blocking worker threads.
pub trait ImageCodec: Send + Sync {
    /// Returns the name of this codec implementation.
    fn name(&self) -> &str;

    /// Opens and decodes the image at `path`.
    fn decode(&self, path: &Path) -> Result<DynamicImage, CodecError>;

    /// Encodes `image` as `format`.
    ///
    /// `quality` is handed through as given; implementations decide what to
    /// do with values outside 1-100 and which formats honour it.
    fn encode(
        &self,
        image: &DynamicImage,
        format: ImageFormat,
        quality: u8,
    ) -> Result<Vec<u8>, CodecError>;

    /// Returns the formats this codec can encode.
    fn supported_output_formats(&self) -> &[ImageFormat] {
        &ImageFormat::SUPPORTED
    }
}

/// Sizing step applied between decode and encode.
pub trait ResizePolicy: Send + Sync {
    fn apply(&self, image: DynamicImage) -> DynamicImage;
}

/// Keeps the original dimensions.
#[derive(Debug, Clone, Copy, Default)]
pub struct PassThrough;

impl ResizePolicy for PassThrough {
    fn apply(&self, image: DynamicImage) -> DynamicImage {
        image
    }
}
