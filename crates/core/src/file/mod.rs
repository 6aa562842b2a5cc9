//! File descriptors and target path derivation.
//!
//! Both pieces split a file name at the *first* `.` of the file-name
//! component: `scan.v2.tiff` has base name `scan` and extension `v2.tiff`.
//! Dots in directory names never take part in the split.

mod descriptor;
mod path;

pub use descriptor::{FileDescriptor, FileMetadata};
pub use path::derive_target_path;

/// Separator between base name and extension.
pub const EXTENSION_SEPARATOR: char = '.';
