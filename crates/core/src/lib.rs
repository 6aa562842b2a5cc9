//! Batch raster image conversion across directory trees.
//!
//! Walks a directory, picks the files of one image format and writes a
//! converted sibling for each, running the conversions on a bounded pool.

pub mod config;
pub mod converter;
pub mod file;
pub mod format;
pub mod pool;
pub mod testing;
pub mod walker;

pub use config::{
    init_logging, load_config, load_config_from_str, validate_config, Config, ConfigError,
    LoggingConfig,
};
pub use converter::{
    CodecError, ConversionEngine, ConversionOutcome, ConversionRequest, ConvertError,
    ConverterConfig, ImageCodec, ImageRsCodec, PassThrough, ResizePolicy,
};
pub use file::{derive_target_path, FileDescriptor, FileMetadata};
pub use format::{extension_for_format, format_for_extension, ImageFileExtension, ImageFormat};
pub use pool::{BoundedPool, InlinePool, PoolError, PoolStatus, Task, WorkerPool};
pub use walker::{DirectoryWalker, FileOutcome, WalkError, WalkOptions, WalkReport};
