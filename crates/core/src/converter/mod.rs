//! Converter module for single-file image conversion.
//!
//! This module provides the [`ImageCodec`] trait, an implementation on top of
//! the `image` crate, and the [`ConversionEngine`] that applies the overwrite
//! policy around it.
//!
//! # Example
//!
//! ```ignore
//! use rasterbatch_core::converter::ConversionEngine;
//! use rasterbatch_core::format::ImageFormat;
//!
//! let engine = ConversionEngine::with_defaults();
//! let outcome = engine.convert(Path::new("/scans/page1.tiff"), ImageFormat::Jpeg, 90, false)?;
//! println!("Wrote {} in {} ms", outcome.target_path.display(), outcome.duration_ms);
//! ```

mod config;
mod engine;
mod error;
mod image_rs;
mod traits;
mod types;

pub use config::ConverterConfig;
pub use engine::ConversionEngine;
pub use error::{CodecError, ConvertError};
pub use image_rs::ImageRsCodec;
pub use traits::{ImageCodec, PassThrough, ResizePolicy};
pub use types::{ConversionOutcome, ConversionRequest, DEFAULT_QUALITY};
