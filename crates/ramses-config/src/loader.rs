// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Configuration file loading with override support
//!
//! This module implements the 3-tier configuration loading system:
//! 1. TOML file (base defaults)
//! 2. Environment variables (runtime overrides)
//! 3. CLI arguments (explicit user overrides)

use crate::{ConfigError, ConfigResult, RamsesConfig};
use ramses_hilbert::CoordinatePolicy;
use std::collections::HashMap;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

/// Default configuration file name
pub const CONFIG_FILE_NAME: &str = "ramses_locator.toml";

/// Find the configuration file
///
/// Search order:
/// 1. `RAMSES_CONFIG_PATH` environment variable
/// 2. Current working directory: `./ramses_locator.toml`
/// 3. Parent directories (up to 5 levels)
///
/// # Errors
///
/// Returns `ConfigError::FileNotFound` if no config file is found in any location
pub fn find_config_file() -> ConfigResult<PathBuf> {
    // 1. Check environment variable first
    if let Ok(env_path) = env::var("RAMSES_CONFIG_PATH") {
        let path = PathBuf::from(env_path);
        if path.exists() {
            return Ok(path);
        } else {
            return Err(ConfigError::FileNotFound(format!(
                "Config file specified by RAMSES_CONFIG_PATH not found: {}",
                path.display()
            )));
        }
    }

    // 2. Search current directory and its parents
    let mut search_paths = Vec::new();
    if let Ok(cwd) = env::current_dir() {
        search_paths.push(cwd.join(CONFIG_FILE_NAME));

        let mut current = cwd;
        for _ in 0..5 {
            match current.parent() {
                Some(parent) => {
                    search_paths.push(parent.join(CONFIG_FILE_NAME));
                    current = parent.to_path_buf();
                }
                None => break,
            }
        }
    }

    if let Some(path) = search_paths.iter().find(|p| p.exists()) {
        return Ok(path.clone());
    }

    let search_list = search_paths
        .iter()
        .map(|p| format!("  - {}", p.display()))
        .collect::<Vec<_>>()
        .join("\n");

    Err(ConfigError::FileNotFound(format!(
        "Configuration file '{}' not found in any of these locations:\n{}\n\nSet RAMSES_CONFIG_PATH environment variable to specify custom location.",
        CONFIG_FILE_NAME, search_list
    )))
}

/// Load configuration from TOML file
///
/// # Arguments
///
/// * `config_path` - Optional path to config file. If `None`, will search for config file.
/// * `cli_args` - Optional CLI argument overrides
///
/// # Errors
///
/// Returns error if config file is not found or contains invalid TOML
pub fn load_config(
    config_path: Option<&Path>,
    cli_args: Option<&HashMap<String, String>>,
) -> ConfigResult<RamsesConfig> {
    let config_file = match config_path {
        Some(path) => path.to_path_buf(),
        None => find_config_file()?,
    };

    let content = fs::read_to_string(&config_file)?;
    let mut config: RamsesConfig = toml::from_str(&content)?;

    apply_environment_overrides(&mut config);

    if let Some(cli) = cli_args {
        apply_cli_overrides(&mut config, cli);
    }

    Ok(config)
}

/// Apply environment variable overrides to configuration
///
/// Supported environment variables:
/// - `RAMSES_BIT_LENGTH` -> `hilbert.bit_length`
/// - `RAMSES_COORDINATE_POLICY` -> `hilbert.coordinate_policy`
/// - `RAMSES_PARALLEL_THRESHOLD` -> `hilbert.parallel_threshold`
/// - `RAMSES_INFO_PATH` -> `snapshot.info_path`
/// - `RAMSES_LOG_LEVEL` -> `logging.level`
/// - `RAMSES_LOG_FORMAT` -> `logging.format`
/// - `RAMSES_LOG_DIR` -> `logging.log_dir`
///
/// Values that fail to parse are ignored.
pub fn apply_environment_overrides(config: &mut RamsesConfig) {
    let vars: HashMap<String, String> = [
        ("bit_length", "RAMSES_BIT_LENGTH"),
        ("coordinate_policy", "RAMSES_COORDINATE_POLICY"),
        ("parallel_threshold", "RAMSES_PARALLEL_THRESHOLD"),
        ("info_path", "RAMSES_INFO_PATH"),
        ("log_level", "RAMSES_LOG_LEVEL"),
        ("log_format", "RAMSES_LOG_FORMAT"),
        ("log_dir", "RAMSES_LOG_DIR"),
    ]
    .into_iter()
    .filter_map(|(key, var)| env::var(var).ok().map(|value| (key.to_string(), value)))
    .collect();

    apply_overrides(config, &vars);
}

/// Apply CLI argument overrides to configuration
///
/// # Arguments
///
/// * `config` - Configuration to modify
/// * `cli_args` - HashMap of CLI arguments (e.g., `{"bit_length": "12", "coordinate_policy": "clamp"}`)
pub fn apply_cli_overrides(config: &mut RamsesConfig, cli_args: &HashMap<String, String>) {
    apply_overrides(config, cli_args);
}

fn apply_overrides(config: &mut RamsesConfig, values: &HashMap<String, String>) {
    // Hilbert settings
    if let Some(value) = values.get("bit_length") {
        if let Ok(bits) = value.parse::<u32>() {
            config.hilbert.bit_length = Some(bits);
        }
    }
    if let Some(value) = values.get("coordinate_policy") {
        if let Ok(policy) = value.parse::<CoordinatePolicy>() {
            config.hilbert.coordinate_policy = policy;
        }
    }
    if let Some(value) = values.get("parallel_threshold") {
        if let Ok(threshold) = value.parse::<usize>() {
            config.hilbert.parallel_threshold = threshold;
        }
    }

    // Snapshot settings
    if let Some(value) = values.get("info_path") {
        config.snapshot.info_path = Some(PathBuf::from(value));
    }

    // Logging settings
    if let Some(value) = values.get("log_level") {
        config.logging.level = value.clone();
    }
    if let Some(value) = values.get("log_format") {
        config.logging.format = value.to_lowercase();
    }
    if let Some(value) = values.get("log_dir") {
        config.logging.log_dir = Some(PathBuf::from(value));
    }
}
