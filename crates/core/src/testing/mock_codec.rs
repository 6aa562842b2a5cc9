//! Mock codec for testing.

use image::DynamicImage;
use parking_lot::Mutex;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use crate::converter::{CodecError, ImageCodec};
use crate::format::ImageFormat;

/// A recorded encode call for test assertions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedEncode {
    /// Requested output format.
    pub format: ImageFormat,
    /// Quality as handed to the codec.
    pub quality: u8,
    /// Dimensions of the image being encoded.
    pub dimensions: (u32, u32),
}

/// Mock implementation of the ImageCodec trait.
///
/// Provides controllable behavior for testing:
/// - Track decode and encode calls
/// - Fail decoding for chosen paths, or every encode
/// - Simulate slow decodes
/// - Measure how many decodes ran at the same time
///
/// Decoding never reads the file; it returns a blank image. Encoding returns
/// the format name as bytes.
#[derive(Debug, Clone, Default)]
pub struct MockCodec {
    decoded: Arc<Mutex<Vec<PathBuf>>>,
    encodes: Arc<Mutex<Vec<RecordedEncode>>>,
    failing_decodes: Arc<Mutex<HashSet<PathBuf>>>,
    fail_encode: Arc<AtomicBool>,
    decode_delay: Arc<Mutex<Duration>>,
    dimensions: Arc<Mutex<Option<(u32, u32)>>>,
    active: Arc<AtomicUsize>,
    peak: Arc<AtomicUsize>,
}

impl MockCodec {
    /// Create a new mock codec.
    pub fn new() -> Self {
        Self::default()
    }

    /// Make decoding `path` fail.
    pub fn fail_decode_for(&self, path: impl AsRef<Path>) {
        self.failing_decodes
            .lock()
            .insert(path.as_ref().to_path_buf());
    }

    /// Make every encode fail (or succeed again).
    pub fn set_fail_encode(&self, fail: bool) {
        self.fail_encode.store(fail, Ordering::SeqCst);
    }

    /// Set how long each decode blocks.
    pub fn set_decode_delay(&self, delay: Duration) {
        *self.decode_delay.lock() = delay;
    }

    /// Set the dimensions of decoded images (default 2x2).
    pub fn set_dimensions(&self, width: u32, height: u32) {
        *self.dimensions.lock() = Some((width, height));
    }

    /// Paths decoded so far, in call order.
    pub fn decoded_paths(&self) -> Vec<PathBuf> {
        self.decoded.lock().clone()
    }

    /// Get the number of decode calls.
    pub fn decode_count(&self) -> usize {
        self.decoded.lock().len()
    }

    /// Encode calls so far, in call order.
    pub fn recorded_encodes(&self) -> Vec<RecordedEncode> {
        self.encodes.lock().clone()
    }

    /// Highest number of decodes observed running at once.
    pub fn peak_concurrency(&self) -> usize {
        self.peak.load(Ordering::SeqCst)
    }
}

impl ImageCodec for MockCodec {
    fn name(&self) -> &str {
        "mock"
    }

    fn decode(&self, path: &Path) -> Result<DynamicImage, CodecError> {
        let running = self.active.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(running, Ordering::SeqCst);

        let delay = *self.decode_delay.lock();
        if !delay.is_zero() {
            std::thread::sleep(delay);
        }

        self.decoded.lock().push(path.to_path_buf());
        let failing = self.failing_decodes.lock().contains(path);
        self.active.fetch_sub(1, Ordering::SeqCst);

        if failing {
            return Err(CodecError::Io(std::io::Error::new(
                std::io::ErrorKind::InvalidData,
                format!("mock decode failure for {}", path.display()),
            )));
        }

        let dimensions = *self.dimensions.lock();
        let (width, height) = dimensions.unwrap_or((2, 2));
        Ok(DynamicImage::new_rgb8(width, height))
    }

    fn encode(
        &self,
        image: &DynamicImage,
        format: ImageFormat,
        quality: u8,
    ) -> Result<Vec<u8>, CodecError> {
        self.encodes.lock().push(RecordedEncode {
            format,
            quality,
            dimensions: (image.width(), image.height()),
        });

        if self.fail_encode.load(Ordering::SeqCst) {
            return Err(CodecError::UnsupportedFormat { format });
        }
        if format == ImageFormat::Unknown {
            return Err(CodecError::UnsupportedFormat { format });
        }
        Ok(format.name().as_bytes().to_vec())
    }
}
