// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Unified logging initialization for the RAMSES locator
//!
//! Console output always goes to stderr so stdout stays free for results.
//! With the `file-logging` feature and a `log_dir`, each run also gets its
//! own folder of JSON log files.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer, Registry};

use crate::cli::CrateDebugFlags;
use crate::config::{LogFormat, LoggingOptions};

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync>;

/// Logging initialization result
///
/// Holds the non-blocking writer guards; logs are flushed when it is dropped.
pub struct LoggingGuard {
    #[cfg(feature = "file-logging")]
    _file_guards: Vec<tracing_appender::non_blocking::WorkerGuard>,
    log_dir: Option<PathBuf>,
}

impl LoggingGuard {
    /// Run folder of this process, if file logging is active
    pub fn log_dir(&self) -> Option<&Path> {
        self.log_dir.as_deref()
    }
}

/// Initialize logging
///
/// With file logging enabled, creates a timestamped folder structure:
/// ```text
/// <log_dir>/
///   └── run_20250101_120000/
///       ├── ramses-hilbert.log
///       ├── ramses-domain.log
///       ├── ...
///       └── ramses-locator.log (combined)
/// ```
///
/// Fails if the filter is malformed, the log folder cannot be created, or a
/// global subscriber is already installed.
pub fn init_logging(debug_flags: &CrateDebugFlags, options: &LoggingOptions) -> Result<LoggingGuard> {
    let filter = debug_flags.to_filter_string(&options.default_level);
    let env_filter = EnvFilter::try_new(&filter)
        .with_context(|| format!("Invalid log filter: {}", filter))?;

    let mut layers: Vec<BoxedLayer> = Vec::new();

    let console_layer = match options.format {
        LogFormat::Text => tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(false)
            .with_filter(env_filter)
            .boxed(),
        LogFormat::Json => tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(true)
            .json()
            .with_filter(env_filter)
            .boxed(),
    };
    layers.push(console_layer);

    #[cfg(feature = "file-logging")]
    let (file_guards, log_dir) = match &options.log_dir {
        Some(base) => {
            let (run_folder, guards) = file::add_file_layers(&mut layers, base, &filter, options)?;
            (guards, Some(run_folder))
        }
        None => (Vec::new(), None),
    };

    #[cfg(not(feature = "file-logging"))]
    let log_dir: Option<PathBuf> = None;

    Registry::default()
        .with(layers)
        .try_init()
        .context("Failed to install global tracing subscriber")?;

    #[cfg(not(feature = "file-logging"))]
    if let Some(requested) = &options.log_dir {
        tracing::warn!(
            log_dir = %requested.display(),
            "File logging requested but the file-logging feature is disabled; logging to console only"
        );
    }

    Ok(LoggingGuard {
        #[cfg(feature = "file-logging")]
        _file_guards: file_guards,
        log_dir,
    })
}

/// Initialize text console logging at `default_level`, honoring per-crate debug flags
pub fn init_console_logging(debug_flags: &CrateDebugFlags, default_level: &str) -> Result<LoggingGuard> {
    let options = LoggingOptions {
        default_level: default_level.to_string(),
        ..LoggingOptions::default()
    };
    init_logging(debug_flags, &options)
}

#[cfg(feature = "file-logging")]
mod file {
    use super::BoxedLayer;
    use crate::config::LoggingOptions;
    use anyhow::{Context, Result};
    use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
    use std::path::{Path, PathBuf};
    use tracing_appender::non_blocking::WorkerGuard;
    use tracing_appender::rolling;
    use tracing_subscriber::{EnvFilter, Layer};

    const RUN_PREFIX: &str = "run_";
    const RUN_TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";
    const COMBINED_LOG: &str = "ramses-locator.log";

    pub(super) fn add_file_layers(
        layers: &mut Vec<BoxedLayer>,
        base_log_dir: &Path,
        filter: &str,
        options: &LoggingOptions,
    ) -> Result<(PathBuf, Vec<WorkerGuard>)> {
        let timestamp = Utc::now().format(RUN_TIMESTAMP_FORMAT);
        let run_folder = base_log_dir.join(format!("{}{}", RUN_PREFIX, timestamp));
        std::fs::create_dir_all(&run_folder)
            .with_context(|| format!("Failed to create log directory: {}", run_folder.display()))?;

        cleanup_old_logs(base_log_dir, options.retention_days, options.retention_runs)?;

        let mut guards = Vec::new();

        // One file per crate
        for crate_name in crate::KNOWN_CRATES {
            let appender = rolling::never(&run_folder, format!("{}.log", crate_name));
            let (writer, guard) = tracing_appender::non_blocking(appender);
            guards.push(guard);

            let target_filter = EnvFilter::try_new(format!("{}=debug", crate_name.replace('-', "_")))
                .with_context(|| format!("Invalid log filter for {}", crate_name))?;
            layers.push(
                tracing_subscriber::fmt::layer()
                    .with_writer(writer)
                    .with_ansi(false)
                    .with_target(true)
                    .with_file(true)
                    .with_line_number(true)
                    .json()
                    .with_filter(target_filter)
                    .boxed(),
            );
        }

        let appender = rolling::never(&run_folder, COMBINED_LOG);
        let (writer, guard) = tracing_appender::non_blocking(appender);
        guards.push(guard);
        layers.push(
            tracing_subscriber::fmt::layer()
                .with_writer(writer)
                .with_ansi(false)
                .with_target(true)
                .with_file(true)
                .with_line_number(true)
                .json()
                .with_filter(EnvFilter::try_new(filter)?)
                .boxed(),
        );

        Ok((run_folder, guards))
    }

    /// Remove run folders older than `retention_days`, then trim to the
    /// newest `retention_runs`.
    pub(crate) fn cleanup_old_logs(
        base_log_dir: &Path,
        retention_days: u64,
        retention_runs: usize,
    ) -> Result<()> {
        if !base_log_dir.exists() {
            return Ok(());
        }

        let cutoff_date = Utc::now() - chrono::Duration::days(retention_days as i64);

        let mut runs: Vec<(PathBuf, DateTime<Utc>)> = Vec::new();
        for entry in std::fs::read_dir(base_log_dir)? {
            let path = entry?.path();
            if !path.is_dir() {
                continue;
            }
            let Some(stamp) = path
                .file_name()
                .and_then(|n| n.to_str())
                .and_then(|n| n.strip_prefix(RUN_PREFIX))
            else {
                continue;
            };
            if let Ok(naive) = NaiveDateTime::parse_from_str(stamp, RUN_TIMESTAMP_FORMAT) {
                runs.push((path, Utc.from_utc_datetime(&naive)));
            }
        }

        // Newest first
        runs.sort_by(|a, b| b.1.cmp(&a.1));

        for (index, (path, dt)) in runs.iter().enumerate() {
            if *dt >= cutoff_date && index < retention_runs {
                continue;
            }
            if let Err(e) = std::fs::remove_dir_all(path) {
                eprintln!("Warning: Failed to remove old log directory {}: {}", path.display(), e);
            }
        }

        Ok(())
    }

}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_filter_is_rejected_before_install() {
        let options = LoggingOptions {
            default_level: "ramses_domain=verbose".to_string(),
            ..LoggingOptions::default()
        };
        assert!(init_logging(&CrateDebugFlags::default(), &options).is_err());
    }

    #[test]
    fn test_second_init_fails() {
        let flags = CrateDebugFlags::from_args(vec!["--debug-ramses-domain".to_string()]);
        let first = init_console_logging(&flags, "warn");
        assert!(first.is_ok());
        assert!(first.unwrap().log_dir().is_none());
        assert!(init_console_logging(&flags, "warn").is_err());
    }
}
