// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! # ramses-observability
//!
//! Logging infrastructure shared by the RAMSES locator crates.
//!
//! Provides consistent `tracing` setup with per-crate debug flag support.
//!
//! ## Features
//! - `file-logging`: per-run log folders with retention (desktop only)

/// Crate version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod cli;
pub mod config;
pub mod init;

// Re-export commonly used items
pub use cli::*;
pub use config::*;
pub use init::*;

/// Known crate names for debug flags
pub const KNOWN_CRATES: &[&str] = &[
    "ramses-locator",
    "ramses-hilbert",
    "ramses-domain",
    "ramses-config",
];
