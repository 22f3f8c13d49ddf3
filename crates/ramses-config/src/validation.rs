//! Configuration validation
//!
//! This module provides validation logic to ensure configuration values are
//! consistent and within valid ranges before any snapshot is touched.

use crate::{ConfigError, ConfigResult, RamsesConfig};
use ramses_hilbert::MAX_BIT_LENGTH;

/// Log levels accepted by `logging.level`
pub const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// Log formats accepted by `logging.format`
pub const LOG_FORMATS: &[&str] = &["text", "json"];

/// Validation errors that can occur during config validation
#[derive(Debug, Clone)]
pub enum ConfigValidationError {
    BitLengthOutOfRange { bit_length: u32 },
    MissingFile { field: String, path: String },
    InvalidValue { field: String, reason: String },
}

impl std::fmt::Display for ConfigValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BitLengthOutOfRange { bit_length } => {
                write!(
                    f,
                    "hilbert.bit_length = {} is outside valid range (1-{})",
                    bit_length, MAX_BIT_LENGTH
                )
            }
            Self::MissingFile { field, path } => {
                write!(f, "{} points to a missing file: {}", field, path)
            }
            Self::InvalidValue { field, reason } => {
                write!(f, "Invalid configuration value for {}: {}", field, reason)
            }
        }
    }
}

/// Validate the complete configuration
///
/// Checks for:
/// - Hilbert bit length within exact key precision
/// - Snapshot path existence (when set)
/// - Known log level and format
///
/// # Errors
///
/// Returns `ConfigError::ValidationError` listing every problem found
pub fn validate_config(config: &RamsesConfig) -> ConfigResult<()> {
    let mut errors = Vec::new();

    validate_hilbert(config, &mut errors);
    validate_snapshot(config, &mut errors);
    validate_logging(config, &mut errors);

    if !errors.is_empty() {
        let error_messages = errors
            .iter()
            .map(|e| format!("  - {}", e))
            .collect::<Vec<_>>()
            .join("\n");

        return Err(ConfigError::ValidationError(format!(
            "Configuration validation failed:\n{}",
            error_messages
        )));
    }

    Ok(())
}

fn validate_hilbert(config: &RamsesConfig, errors: &mut Vec<ConfigValidationError>) {
    if let Some(bit_length) = config.hilbert.bit_length {
        if bit_length == 0 || bit_length > MAX_BIT_LENGTH {
            errors.push(ConfigValidationError::BitLengthOutOfRange { bit_length });
        }
    }
}

fn validate_snapshot(config: &RamsesConfig, errors: &mut Vec<ConfigValidationError>) {
    if let Some(path) = &config.snapshot.info_path {
        if !path.exists() {
            errors.push(ConfigValidationError::MissingFile {
                field: "snapshot.info_path".to_string(),
                path: path.display().to_string(),
            });
        }
    }
}

fn validate_logging(config: &RamsesConfig, errors: &mut Vec<ConfigValidationError>) {
    if !LOG_LEVELS.contains(&config.logging.level.to_lowercase().as_str()) {
        errors.push(ConfigValidationError::InvalidValue {
            field: "logging.level".to_string(),
            reason: format!("must be one of {}", LOG_LEVELS.join(", ")),
        });
    }

    if !LOG_FORMATS.contains(&config.logging.format.as_str()) {
        errors.push(ConfigValidationError::InvalidValue {
            field: "logging.format".to_string(),
            reason: "must be 'text' or 'json'".to_string(),
        });
    }
}
