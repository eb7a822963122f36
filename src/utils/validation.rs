use std::path::Path;
use crate::core::{CompressionConfig, RunConfig};
use crate::utils::{OptimizerError, OptimizerResult, ValidationError};

/// Validates a run configuration before any directory is touched
pub fn validate_config(config: &RunConfig) -> OptimizerResult<()> {
    validate_compression(&config.compression)?;

    if config.max_concurrent_encodes == 0 {
        return Err(OptimizerError::settings("Concurrent encode limit cannot be 0"));
    }

    Ok(())
}

/// Validates the quality back-off settings
pub fn validate_compression(config: &CompressionConfig) -> OptimizerResult<()> {
    for (name, quality) in [("start", config.start_quality), ("minimum", config.min_quality)] {
        if quality == 0 || quality > 100 {
            return Err(OptimizerError::settings(format!(
                "Invalid {} quality: {}. Must be between 1 and 100", name, quality
            )));
        }
    }

    if config.min_quality > config.start_quality {
        return Err(OptimizerError::settings(format!(
            "Minimum quality {} is above start quality {}",
            config.min_quality, config.start_quality
        )));
    }

    if config.quality_step == 0 {
        return Err(OptimizerError::settings("Quality step cannot be 0"));
    }

    if config.max_size_bytes == 0 {
        return Err(OptimizerError::settings("Size budget cannot be 0"));
    }

    Ok(())
}

/// Validates that the input path is an existing regular file
pub fn validate_input_path(path: &Path) -> OptimizerResult<()> {
    if !path.exists() {
        return Err(ValidationError::path_not_found(path).into());
    }

    if !path.is_file() {
        return Err(ValidationError::not_a_file(path).into());
    }

    Ok(())
}
