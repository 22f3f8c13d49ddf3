// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Logging configuration types

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::str::FromStr;

/// Log format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(LogFormat::Text),
            "json" => Ok(LogFormat::Json),
            other => Err(format!("unknown log format '{}'", other)),
        }
    }
}

/// Options for `init_logging`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingOptions {
    /// Level for crates without a debug flag (trace, debug, info, warn, error)
    pub default_level: String,

    /// Console format
    pub format: LogFormat,

    /// Base directory for run log folders (requires `file-logging`)
    pub log_dir: Option<PathBuf>,

    /// Delete run folders older than this many days
    pub retention_days: u64,

    /// Keep at most this many run folders
    pub retention_runs: usize,
}

impl Default for LoggingOptions {
    fn default() -> Self {
        LoggingOptions {
            default_level: "info".to_string(),
            format: LogFormat::Text,
            log_dir: None,
            retention_days: 30,
            retention_runs: 10,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_format_from_str() {
        assert_eq!("text".parse::<LogFormat>(), Ok(LogFormat::Text));
        assert_eq!("JSON".parse::<LogFormat>(), Ok(LogFormat::Json));
        assert!("xml".parse::<LogFormat>().is_err());
    }
}
