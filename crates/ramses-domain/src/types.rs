// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

/*!
Core types and errors for domain lookup.
*/

use ramses_hilbert::HilbertError;
use std::path::PathBuf;

/// 1-based domain (CPU) identifier, as numbered in RAMSES output
pub type DomainId = usize;

/// Result type for domain operations
pub type DomainResult<T> = Result<T, InfoError>;

/// Direction of a boundary table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Ascending,
    Descending,
}

/// Boundary tables that cannot partition the key space
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum BoundaryError {
    #[error("Boundary table needs at least 2 entries, got {0}")]
    TooFewBoundaries(usize),

    #[error("Boundary {index} is not finite: {value}")]
    NonFinite { index: usize, value: f64 },

    #[error("Boundary table not strictly monotonic at index {index}: {previous} then {value}")]
    NotMonotonic {
        index: usize,
        previous: f64,
        value: f64,
    },

    #[error("ind_min has {min} entries but ind_max has {max}")]
    LengthMismatch { min: usize, max: usize },

    #[error("Domain {domain} ends at {max} but the next domain starts at {next_min}")]
    NonContiguous {
        domain: DomainId,
        max: f64,
        next_min: f64,
    },
}

/// Errors reading a RAMSES info file
#[derive(Debug, thiserror::Error)]
pub enum InfoError {
    #[error("Cannot open info file '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Info file ended at line {line}, expected {expected}")]
    UnexpectedEof { line: usize, expected: String },

    #[error("Line {line}: invalid value '{value}' for {field}")]
    InvalidValue {
        line: usize,
        field: String,
        value: String,
    },

    #[error("Corrupt info file: line {line} holds domain {found}, expected {expected}")]
    DomainIdMismatch {
        line: usize,
        expected: DomainId,
        found: String,
    },

    #[error("Unsupported domain ordering '{0}', expected hilbert")]
    UnsupportedOrdering(String),

    #[error("Info file declares zero domains")]
    ZeroDomains,

    #[error("Invalid domain boundaries: {0}")]
    Boundaries(#[from] BoundaryError),

    #[error("No snapshot number in file name '{0}'")]
    NoSnapshotNumber(String),

    #[error("Key has {key_bits} bits per axis but the snapshot boundaries need at least {required_bits}")]
    KeyTooCoarse { key_bits: u32, required_bits: u32 },

    #[error(transparent)]
    Hilbert(#[from] HilbertError),
}
