use super::{types::Config, ConfigError};
use crate::encoder::OUTPUT_FORMATS;

/// Highest constant-quality value HandBrake accepts.
const MAX_QUALITY: u8 = 51;

/// Validate configuration
/// Currently validates:
/// - Both output directories are set
/// - Output format is one HandBrake can write
/// - Encoder and quality when no preset is used
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    if config.output.raw_dir.as_os_str().is_empty() {
        return Err(ConfigError::ValidationError(
            "output.raw_dir cannot be empty".to_string(),
        ));
    }
    if config.output.encoded_dir.as_os_str().is_empty() {
        return Err(ConfigError::ValidationError(
            "output.encoded_dir cannot be empty".to_string(),
        ));
    }

    let encode = &config.encode;
    if !OUTPUT_FORMATS.contains(&encode.output_format.as_str()) {
        return Err(ConfigError::ValidationError(format!(
            "encode.output_format must be one of {}, got '{}'",
            OUTPUT_FORMATS.join(", "),
            encode.output_format
        )));
    }

    if encode.uses_preset() {
        return Ok(());
    }

    if encode.encoder.trim().is_empty() {
        return Err(ConfigError::ValidationError(
            "encode.encoder is required unless a preset is used".to_string(),
        ));
    }
    if encode.encoder_preset.is_none() && encode.quality > MAX_QUALITY {
        return Err(ConfigError::ValidationError(format!(
            "encode.quality must be between 0 and {}, got {}",
            MAX_QUALITY, encode.quality
        )));
    }

    Ok(())
}
