//! [`ImageCodec`] backed by the `image` crate.

use image::codecs::jpeg::JpegEncoder;
use image::{DynamicImage, ImageReader};
use std::io::Cursor;
use std::path::Path;

use super::error::CodecError;
use super::traits::ImageCodec;
use crate::format::ImageFormat;

/// Codec using the pure-Rust decoders and encoders of the `image` crate.
#[derive(Debug, Clone, Copy, Default)]
pub struct ImageRsCodec;

impl ImageRsCodec {
    pub fn new() -> Self {
        Self
    }
}

impl ImageCodec for ImageRsCodec {
    fn name(&self) -> &str {
        "image-rs"
    }

    fn decode(&self, path: &Path) -> Result<DynamicImage, CodecError> {
        // Sniff the header too, so a mislabelled file still decodes.
        let image = ImageReader::open(path)?.with_guessed_format()?.decode()?;
        Ok(image)
    }

    fn encode(
        &self,
        image: &DynamicImage,
        format: ImageFormat,
        quality: u8,
    ) -> Result<Vec<u8>, CodecError> {
        let codec_format = format
            .to_codec_format()
            .ok_or(CodecError::UnsupportedFormat { format })?;

        let mut buffer = Vec::new();
        match format {
            ImageFormat::Jpeg => {
                // JPEG carries neither alpha nor 16-bit samples.
                let rgb = image.to_rgb8();
                let encoder = JpegEncoder::new_with_quality(&mut buffer, quality.clamp(1, 100));
                rgb.write_with_encoder(encoder)?;
            }
            _ => image.write_to(&mut Cursor::new(&mut buffer), codec_format)?,
        }
        Ok(buffer)
    }
}
