use super::{types::Config, ConfigError};

/// Validate configuration
/// Currently validates:
/// - ffmpeg.path is not empty
/// - ffmpeg.device_format and ffmpeg.device_name are not blank
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    if config.ffmpeg.path.as_os_str().is_empty() {
        return Err(ConfigError::ValidationError(
            "ffmpeg.path cannot be empty".to_string(),
        ));
    }

    if config.ffmpeg.device_format.trim().is_empty() {
        return Err(ConfigError::ValidationError(
            "ffmpeg.device_format cannot be blank".to_string(),
        ));
    }

    if config.ffmpeg.device_name.trim().is_empty() {
        return Err(ConfigError::ValidationError(
            "ffmpeg.device_name cannot be blank".to_string(),
        ));
    }

    Ok(())
}
