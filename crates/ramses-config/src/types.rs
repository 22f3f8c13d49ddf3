// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Configuration type definitions
//!
//! This module defines all configuration structs that map to sections in
//! `ramses_locator.toml`.

use ramses_hilbert::{
    CoordinatePolicy, HilbertIndexer, HilbertResult, DEFAULT_PARALLEL_THRESHOLD, MAX_BIT_LENGTH,
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration structure
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct RamsesConfig {
    pub hilbert: HilbertConfig,
    pub snapshot: SnapshotConfig,
    pub logging: LoggingConfig,
}

/// Hilbert key computation
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct HilbertConfig {
    /// Bits per axis (1..=17); unset means the snapshot's key resolution
    pub bit_length: Option<u32>,
    /// `reject` or `clamp` for coordinates outside [0, 1)
    pub coordinate_policy: CoordinatePolicy,
    /// Batch size from which keys are computed on the rayon pool
    pub parallel_threshold: usize,
}

impl Default for HilbertConfig {
    fn default() -> Self {
        Self {
            bit_length: None,
            coordinate_policy: CoordinatePolicy::Reject,
            parallel_threshold: DEFAULT_PARALLEL_THRESHOLD,
        }
    }
}

impl HilbertConfig {
    /// Configured bit length, else `snapshot_key_bits` capped at `MAX_BIT_LENGTH`
    pub fn resolve_bit_length(&self, snapshot_key_bits: u32) -> u32 {
        self.bit_length
            .unwrap_or_else(|| snapshot_key_bits.min(MAX_BIT_LENGTH))
    }

    /// Indexer matching this section for a snapshot whose keys have
    /// `snapshot_key_bits` bits per axis
    pub fn build_indexer(&self, snapshot_key_bits: u32) -> HilbertResult<HilbertIndexer> {
        let bit_length = self.resolve_bit_length(snapshot_key_bits);
        Ok(HilbertIndexer::with_policy(bit_length, self.coordinate_policy)?
            .with_parallel_threshold(self.parallel_threshold))
    }
}

/// Snapshot metadata source
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct SnapshotConfig {
    /// Default `info_XXXXX.txt` when none is given on the command line
    pub info_path: Option<PathBuf>,
    /// Refuse snapshots whose ordering type is not `hilbert`
    pub require_hilbert_ordering: bool,
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    /// `text` or `json`
    pub format: String,
    /// Write log files under this directory as well as to the console
    pub log_dir: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "text".to_string(),
            log_dir: None,
        }
    }
}
