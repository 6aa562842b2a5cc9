//! Static extension/format lookup tables.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Raster image format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImageFormat {
    /// JPEG / JFIF
    Jpeg,
    /// Tagged Image File Format
    Tiff,
    /// Portable Network Graphics
    Png,
    /// Windows bitmap
    Bmp,
    /// Graphics Interchange Format
    Gif,
    /// Windows icon
    Ico,
    /// WebP
    #[serde(rename = "webp")]
    WebP,
    /// Anything without a raster codec mapping.
    Unknown,
}

impl ImageFormat {
    /// All formats that can actually be decoded or encoded.
    pub const SUPPORTED: [ImageFormat; 7] = [
        Self::Jpeg,
        Self::Tiff,
        Self::Png,
        Self::Bmp,
        Self::Gif,
        Self::Ico,
        Self::WebP,
    ];

    /// Returns the display name for this format.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Jpeg => "JPEG",
            Self::Tiff => "TIFF",
            Self::Png => "PNG",
            Self::Bmp => "BMP",
            Self::Gif => "GIF",
            Self::Ico => "ICO",
            Self::WebP => "WEBP",
            Self::Unknown => "UNKNOWN",
        }
    }

    /// Returns the canonical file extension for this format.
    pub fn canonical_extension(&self) -> ImageFileExtension {
        extension_for_format(*self)
    }

    /// Maps to the codec library's format identifier.
    pub fn to_codec_format(&self) -> Option<image::ImageFormat> {
        match self {
            Self::Jpeg => Some(image::ImageFormat::Jpeg),
            Self::Tiff => Some(image::ImageFormat::Tiff),
            Self::Png => Some(image::ImageFormat::Png),
            Self::Bmp => Some(image::ImageFormat::Bmp),
            Self::Gif => Some(image::ImageFormat::Gif),
            Self::Ico => Some(image::ImageFormat::Ico),
            Self::WebP => Some(image::ImageFormat::WebP),
            Self::Unknown => None,
        }
    }
}

impl fmt::Display for ImageFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ImageFormat {
    type Err = std::convert::Infallible;

    /// Accepts format names (`"JPEG"`) as well as extensions (`"jpg"`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_ascii_lowercase();
        let format = match lower.as_str() {
            "jpeg" | "jpg" => Self::Jpeg,
            "tiff" | "tif" => Self::Tiff,
            "png" => Self::Png,
            "bmp" => Self::Bmp,
            "gif" => Self::Gif,
            "ico" => Self::Ico,
            "webp" => Self::WebP,
            _ => Self::Unknown,
        };
        Ok(format)
    }
}

/// File extensions recognised by the registry (lowercase, without the dot).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImageFileExtension {
    Jpg,
    Jpeg,
    Tiff,
    Tif,
    Png,
    Gif,
    Bmp,
    Ico,
    Webp,
    Svg,
    Unknown,
}

impl ImageFileExtension {
    /// Returns the extension text, or `None` for [`ImageFileExtension::Unknown`].
    pub fn as_str(&self) -> Option<&'static str> {
        match self {
            Self::Jpg => Some("jpg"),
            Self::Jpeg => Some("jpeg"),
            Self::Tiff => Some("tiff"),
            Self::Tif => Some("tif"),
            Self::Png => Some("png"),
            Self::Gif => Some("gif"),
            Self::Bmp => Some("bmp"),
            Self::Ico => Some("ico"),
            Self::Webp => Some("webp"),
            Self::Svg => Some("svg"),
            Self::Unknown => None,
        }
    }

    /// The format this extension denotes.
    pub fn format(&self) -> ImageFormat {
        match self {
            Self::Jpg | Self::Jpeg => ImageFormat::Jpeg,
            Self::Tiff | Self::Tif => ImageFormat::Tiff,
            Self::Png => ImageFormat::Png,
            Self::Gif => ImageFormat::Gif,
            Self::Bmp => ImageFormat::Bmp,
            Self::Ico => ImageFormat::Ico,
            Self::Webp => ImageFormat::WebP,
            // Vector format, no raster codec behind it.
            Self::Svg => ImageFormat::Unknown,
            Self::Unknown => ImageFormat::Unknown,
        }
    }
}

impl fmt::Display for ImageFileExtension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str().unwrap_or("unknown"))
    }
}

impl FromStr for ImageFileExtension {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let lower = trimmed
            .strip_prefix('.')
            .unwrap_or(trimmed)
            .to_ascii_lowercase();
        let ext = match lower.as_str() {
            "jpg" => Self::Jpg,
            "jpeg" => Self::Jpeg,
            "tiff" => Self::Tiff,
            "tif" => Self::Tif,
            "png" => Self::Png,
            "gif" => Self::Gif,
            "bmp" => Self::Bmp,
            "ico" => Self::Ico,
            "webp" => Self::Webp,
            "svg" => Self::Svg,
            _ => Self::Unknown,
        };
        Ok(ext)
    }
}

/// Looks up the format for a file extension.
///
/// Case-insensitive, tolerates a leading dot, and returns
/// [`ImageFormat::Unknown`] for anything it does not recognise.
pub fn format_for_extension(ext: &str) -> ImageFormat {
    ext.parse::<ImageFileExtension>()
        .map(|ext| ext.format())
        .unwrap_or(ImageFormat::Unknown)
}

/// Returns the canonical extension for a format.
pub fn extension_for_format(format: ImageFormat) -> ImageFileExtension {
    match format {
        ImageFormat::Jpeg => ImageFileExtension::Jpg,
        ImageFormat::Tiff => ImageFileExtension::Tiff,
        ImageFormat::Png => ImageFileExtension::Png,
        ImageFormat::Bmp => ImageFileExtension::Bmp,
        ImageFormat::Gif => ImageFileExtension::Gif,
        ImageFormat::Ico => ImageFileExtension::Ico,
        ImageFormat::WebP => ImageFileExtension::Webp,
        ImageFormat::Unknown => ImageFileExtension::Unknown,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RECOGNISED: [&str; 9] = [
        "jpg", "jpeg", "tiff", "tif", "png", "gif", "bmp", "ico", "webp",
    ];

    #[test]
    fn test_format_for_extension() {
        assert_eq!(format_for_extension("jpg"), ImageFormat::Jpeg);
        assert_eq!(format_for_extension("jpeg"), ImageFormat::Jpeg);
        assert_eq!(format_for_extension("tif"), ImageFormat::Tiff);
        assert_eq!(format_for_extension("tiff"), ImageFormat::Tiff);
        assert_eq!(format_for_extension("png"), ImageFormat::Png);
        assert_eq!(format_for_extension("webp"), ImageFormat::WebP);
    }

    #[test]
    fn test_format_for_extension_case_and_dot() {
        assert_eq!(format_for_extension("TIFF"), ImageFormat::Tiff);
        assert_eq!(format_for_extension(".JpG"), ImageFormat::Jpeg);
    }

    #[test]
    fn test_unrecognised_extension_is_unknown() {
        assert_eq!(format_for_extension("txt"), ImageFormat::Unknown);
        assert_eq!(format_for_extension(""), ImageFormat::Unknown);
        assert_eq!(format_for_extension("v2.tiff"), ImageFormat::Unknown);
        assert_eq!(format_for_extension("svg"), ImageFormat::Unknown);
    }

    #[test]
    fn test_extension_for_format_is_canonical() {
        assert_eq!(extension_for_format(ImageFormat::Jpeg).as_str(), Some("jpg"));
        assert_eq!(extension_for_format(ImageFormat::Tiff).as_str(), Some("tiff"));
        assert_eq!(
            extension_for_format(ImageFormat::Unknown),
            ImageFileExtension::Unknown
        );
    }

    #[test]
    fn test_extension_round_trip_is_idempotent_per_class() {
        for ext in RECOGNISED {
            let format = format_for_extension(ext);
            let canonical = extension_for_format(format);
            let canonical_str = canonical.as_str().unwrap();

            assert_eq!(format_for_extension(canonical_str), format, "{ext}");
            assert_eq!(extension_for_format(format_for_extension(canonical_str)), canonical);
        }
        assert_eq!(
            extension_for_format(format_for_extension("jpeg")),
            ImageFileExtension::Jpg
        );
    }

    #[test]
    fn test_every_supported_format_has_codec_and_extension() {
        for format in ImageFormat::SUPPORTED {
            assert!(format.to_codec_format().is_some(), "{format}");
            assert!(format.canonical_extension().as_str().is_some(), "{format}");
        }
        assert!(ImageFormat::Unknown.to_codec_format().is_none());
    }

    #[test]
    fn test_format_from_str_accepts_names() {
        assert_eq!("JPEG".parse::<ImageFormat>().unwrap(), ImageFormat::Jpeg);
        assert_eq!("tif".parse::<ImageFormat>().unwrap(), ImageFormat::Tiff);
        assert_eq!("heic".parse::<ImageFormat>().unwrap(), ImageFormat::Unknown);
    }

    #[test]
    fn test_format_serde_names() {
        let json = serde_json::to_string(&ImageFormat::WebP).unwrap();
        assert_eq!(json, "\"webp\"");
        let parsed: ImageFormat = serde_json::from_str("\"tiff\"").unwrap();
        assert_eq!(parsed, ImageFormat::Tiff);
    }
}
