//! CLI argument parsing for per-crate debug flags
//!
//! Supports flags like `--debug-ramses-hilbert`, `--debug-ramses-domain`, etc.
//! to raise logging to DEBUG per crate.

use std::collections::HashMap;
use std::env;

use crate::KNOWN_CRATES;

/// Parse debug flags from command-line arguments
///
/// # Example
/// ```rust
/// use ramses_observability::CrateDebugFlags;
///
/// let flags = CrateDebugFlags::from_args(vec!["--debug-ramses-domain".to_string()]);
/// assert!(flags.is_enabled("ramses-domain"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct CrateDebugFlags {
    pub enabled_crates: HashMap<String, bool>,
}

impl CrateDebugFlags {
    /// Parse debug flags from command-line arguments
    ///
    /// Looks for arguments matching `--debug-{crate-name}` pattern.
    /// Also supports `--debug-all` to enable all crates.
    pub fn from_args<I>(args: I) -> Self
    where
        I: IntoIterator<Item = String>,
    {
        let mut enabled_crates = HashMap::new();
        let mut debug_all = false;

        for arg in args {
            if arg == "--debug-all" {
                debug_all = true;
                continue;
            }

            if let Some(crate_name) = arg.strip_prefix("--debug-") {
                enabled_crates.insert(crate_name.to_string(), true);
            }
        }

        if debug_all {
            for crate_name in KNOWN_CRATES {
                enabled_crates.insert(crate_name.to_string(), true);
            }
        }

        CrateDebugFlags { enabled_crates }
    }

    /// Check if debug is enabled for a specific crate
    pub fn is_enabled(&self, crate_name: &str) -> bool {
        self.enabled_crates.contains_key(crate_name)
    }

    /// Check if debug is enabled for any crate
    pub fn any_enabled(&self) -> bool {
        !self.enabled_crates.is_empty()
    }

    /// Get log level for a crate
    ///
    /// Returns `tracing::Level::DEBUG` if enabled, `tracing::Level::INFO` otherwise.
    pub fn log_level(&self, crate_name: &str) -> tracing::Level {
        if self.is_enabled(crate_name) {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        }
    }

    /// Create a tracing filter from debug flags
    ///
    /// Crate names are turned into tracing targets (`ramses-domain` ->
    /// `ramses_domain`). Format: "ramses_domain=debug,info", or just the
    /// default level if no flag is set.
    pub fn to_filter_string(&self, default_level: &str) -> String {
        let mut targets: Vec<String> = self
            .enabled_crates
            .keys()
            .map(|crate_name| format!("{}=debug", crate_name.replace('-', "_")))
            .collect();
        targets.sort();
        targets.push(default_level.to_lowercase());
        targets.join(",")
    }
}

/// Parse debug flags from process arguments and the `RAMSES_DEBUG` environment variable
///
/// Environment variable format: comma-separated crate names, e.g. "ramses-hilbert,ramses-domain",
/// or "all".
pub fn parse_debug_flags() -> CrateDebugFlags {
    let mut flags = CrateDebugFlags::from_args(env::args());

    if let Ok(env_var) = env::var("RAMSES_DEBUG") {
        flags.merge_env_value(&env_var);
    }

    flags
}

impl CrateDebugFlags {
    fn merge_env_value(&mut self, value: &str) {
        if value == "all" {
            for crate_name in KNOWN_CRATES {
                self.enabled_crates.insert(crate_name.to_string(), true);
            }
            return;
        }

        for crate_name in value.split(',') {
            let crate_name = crate_name.trim();
            if !crate_name.is_empty() {
                self.enabled_crates.insert(crate_name.to_string(), true);
            }
        }
    }
}

/// Generate help text for debug flags
pub fn debug_flags_help() -> String {
    format!(
        r#"Debug Flags:
  --debug-all                    Enable debug logging for all crates
  --debug-{{crate-name}}          Enable debug logging for specific crate

Available crates:
  {}

Environment Variable:
  RAMSES_DEBUG={{crate-name}}[,{{crate-name}}]  Enable debug for crates (comma-separated)
  RAMSES_DEBUG=all                               Enable debug for all crates
"#,
        KNOWN_CRATES.join(", ")
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_crate_flag() {
        let flags = CrateDebugFlags::from_args(vec!["--debug-ramses-hilbert".to_string()]);
        assert!(flags.is_enabled("ramses-hilbert"));
        assert!(!flags.is_enabled("ramses-domain"));
    }

    #[test]
    fn test_non_flag_arguments_ignored() {
        let flags = CrateDebugFlags::from_args(vec![
            "info_00042.txt".to_string(),
            "0.5".to_string(),
            "--bit-length".to_string(),
        ]);
        assert!(!flags.any_enabled());
    }

    #[test]
    fn test_debug_all() {
        let flags = CrateDebugFlags::from_args(vec!["--debug-all".to_string()]);
        for crate_name in KNOWN_CRATES {
            assert!(flags.is_enabled(crate_name), "{} should be enabled", crate_name);
        }
    }

    #[test]
    fn test_filter_string() {
        let flags = CrateDebugFlags::from_args(vec![
            "--debug-ramses-domain".to_string(),
            "--debug-ramses-hilbert".to_string(),
        ]);
        assert_eq!(
            flags.to_filter_string("warn"),
            "ramses_domain=debug,ramses_hilbert=debug,warn"
        );
        assert_eq!(CrateDebugFlags::default().to_filter_string("INFO"), "info");
    }

    #[test]
    fn test_log_level() {
        let flags = CrateDebugFlags::from_args(vec!["--debug-ramses-domain".to_string()]);
        assert_eq!(flags.log_level("ramses-domain"), tracing::Level::DEBUG);
        assert_eq!(flags.log_level("ramses-hilbert"), tracing::Level::INFO);
    }

    #[test]
    fn test_env_value_merge() {
        let mut flags = CrateDebugFlags::default();
        flags.merge_env_value("ramses-config, ramses-domain,");
        assert!(flags.is_enabled("ramses-config"));
        assert!(flags.is_enabled("ramses-domain"));
        assert_eq!(flags.enabled_crates.len(), 2);

        let mut flags = CrateDebugFlags::default();
        flags.merge_env_value("all");
        assert_eq!(flags.enabled_crates.len(), KNOWN_CRATES.len());
    }
}
