//! Image format registry.
//!
//! Maps file extensions to image formats and back. Several extensions can map
//! to the same format (`jpg` and `jpeg`, `tif` and `tiff`), but every format
//! has exactly one canonical extension used when naming converted files.

mod registry;

pub use registry::{extension_for_format, format_for_extension, ImageFileExtension, ImageFormat};
