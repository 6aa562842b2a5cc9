//! Configuration for batch conversions.

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::types::DEFAULT_QUALITY;
use crate::format::ImageFormat;
use crate::pool::DEFAULT_MAX_CONCURRENCY;
use crate::walker::WalkOptions;

/// Config value of `source_format` that disables filtering.
const ANY_SOURCE_FORMAT: &str = "any";

/// Settings for a directory conversion run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConverterConfig {
    /// Only convert files of this format. `None` (or `"any"`) attempts
    /// every file.
    #[serde(
        default = "default_source_format",
        serialize_with = "serialize_source_format",
        deserialize_with = "deserialize_source_format"
    )]
    pub source_format: Option<ImageFormat>,

    /// Format to convert to.
    #[serde(default = "default_target_format")]
    pub target_format: ImageFormat,

    /// Descend into subdirectories.
    #[serde(default = "default_recursive")]
    pub recursive: bool,

    /// Encoder quality (1-100).
    #[serde(default = "default_quality")]
    pub quality: u8,

    /// Replace existing target files.
    #[serde(default)]
    pub overwrite: bool,

    /// Maximum parallel conversions.
    #[serde(default = "default_max_concurrency")]
    pub max_concurrency: usize,
}

fn default_source_format() -> Option<ImageFormat> {
    Some(ImageFormat::Tiff)
}

fn serialize_source_format<S>(format: &Option<ImageFormat>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    match format {
        Some(format) => format.serialize(serializer),
        None => serializer.serialize_str(ANY_SOURCE_FORMAT),
    }
}

fn deserialize_source_format<'de, D>(deserializer: D) -> Result<Option<ImageFormat>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    let format = match value.as_deref().map(str::trim) {
        None => None,
        Some(v) if v.eq_ignore_ascii_case(ANY_SOURCE_FORMAT) => None,
        Some(v) => v.parse().ok(),
    };
    Ok(format)
}

fn default_target_format() -> ImageFormat {
    ImageFormat::Jpeg
}

fn default_recursive() -> bool {
    true
}

fn default_quality() -> u8 {
    DEFAULT_QUALITY
}

fn default_max_concurrency() -> usize {
    DEFAULT_MAX_CONCURRENCY
}

impl Default for ConverterConfig {
    fn default() -> Self {
        Self {
            source_format: default_source_format(),
            target_format: default_target_format(),
            recursive: default_recursive(),
            quality: default_quality(),
            overwrite: false,
            max_concurrency: default_max_concurrency(),
        }
    }
}

impl ConverterConfig {
    /// Creates a new config converting `source_format` files to `target_format`.
    pub fn with_formats(source_format: Option<ImageFormat>, target_format: ImageFormat) -> Self {
        Self {
            source_format,
            target_format,
            ..Default::default()
        }
    }

    /// Sets the encoder quality.
    pub fn with_quality(mut self, quality: u8) -> Self {
        self.quality = quality;
        self
    }

    /// Sets whether subdirectories are walked.
    pub fn with_recursive(mut self, recursive: bool) -> Self {
        self.recursive = recursive;
        self
    }

    /// Sets whether existing targets are replaced.
    pub fn with_overwrite(mut self, overwrite: bool) -> Self {
        self.overwrite = overwrite;
        self
    }

    /// Sets the maximum parallel conversions.
    pub fn with_max_concurrency(mut self, max: usize) -> Self {
        self.max_concurrency = max;
        self
    }

    /// Builds the options for a directory walk.
    pub fn to_walk_options(&self) -> WalkOptions {
        WalkOptions {
            source_format: self.source_format,
            target_format: self.target_format,
            recursive: self.recursive,
            quality: self.quality,
            overwrite: self.overwrite,
            max_concurrency: self.max_concurrency,
        }
    }
}
