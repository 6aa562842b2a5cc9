use super::{types::Config, ConfigError};
use crate::format::ImageFormat;

/// Validate configuration
/// Currently validates:
/// - Quality is within 1-100
/// - At least one worker
/// - Source and target formats are known and differ
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    let converter = &config.converter;

    if !(1..=100).contains(&converter.quality) {
        return Err(ConfigError::ValidationError(format!(
            "converter.quality must be between 1 and 100, got {}",
            converter.quality
        )));
    }

    if converter.max_concurrency == 0 {
        return Err(ConfigError::ValidationError(
            "converter.max_concurrency cannot be 0".to_string(),
        ));
    }

    if converter.target_format == ImageFormat::Unknown {
        return Err(ConfigError::ValidationError(
            "converter.target_format must be a supported image format".to_string(),
        ));
    }

    match converter.source_format {
        Some(ImageFormat::Unknown) => {
            return Err(ConfigError::ValidationError(
                "converter.source_format is not a recognised image format".to_string(),
            ));
        }
        Some(source) if source == converter.target_format => {
            return Err(ConfigError::ValidationError(format!(
                "converter.source_format and converter.target_format are both {source}"
            )));
        }
        _ => {}
    }

    Ok(())
}
