//! Testing utilities and mock implementations.
//!
//! Provides an instrumented [`ImageCodec`](crate::converter::ImageCodec)
//! stub and fixture helpers so conversion and walk behaviour can be tested
//! without real image data.
//!
//! # Example
//!
//! ```rust,ignore
//! use rasterbatch_core::testing::MockCodec;
//!
//! let codec = MockCodec::new();
//! codec.set_decode_delay(Duration::from_millis(20));
//!
//! let walker = DirectoryWalker::new(ConversionEngine::new(codec.clone()));
//! walker.run(root, &options).await?;
//!
//! assert!(codec.peak_concurrency() <= options.max_concurrency);
//! ```

mod mock_codec;

pub use mock_codec::{MockCodec, RecordedEncode};

/// Test fixtures and helper functions.
pub mod fixtures {
    use image::{DynamicImage, Rgb, RgbImage};
    use std::path::{Path, PathBuf};

    /// Create a small RGB gradient image.
    pub fn gradient(width: u32, height: u32) -> DynamicImage {
        DynamicImage::ImageRgb8(RgbImage::from_fn(width, height, |x, y| {
            Rgb([(x * 16 % 256) as u8, (y * 16 % 256) as u8, 96])
        }))
    }

    /// Write a valid image at `dir/name`, creating parent directories.
    ///
    /// The format follows the file extension.
    pub fn write_image(dir: &Path, name: &str, width: u32, height: u32) -> PathBuf {
        let path = dir.join(name);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("Failed to create fixture directory");
        }
        gradient(width, height)
            .save(&path)
            .expect("Failed to write fixture image");
        path
    }

    /// Write arbitrary bytes at `dir/name`, creating parent directories.
    pub fn write_bytes(dir: &Path, name: &str, bytes: &[u8]) -> PathBuf {
        let path = dir.join(name);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("Failed to create fixture directory");
        }
        std::fs::write(&path, bytes).expect("Failed to write fixture file");
        path
    }
}
