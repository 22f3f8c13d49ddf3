// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! RAMSES `info_XXXXX.txt` loading
//!
//! The info file is a fixed-layout text header written by RAMSES at every
//! output. Each header line ends in its value; after the header come `ncpu`
//! lines of `<domain> <ind_min> <ind_max>` giving each CPU's Hilbert key
//! interval. The boundary table is validated here, once, so lookups can
//! assume a strictly monotonic, contiguous partition.

use crate::boundary::BoundaryTable;
use crate::types::{DomainId, DomainResult, InfoError};
use ramses_hilbert::{HilbertIndexer, HilbertKey, Point, MAX_BIT_LENGTH};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::str::{FromStr, Lines};
use tracing::{debug, info, warn};

/// Ordering name RAMSES writes for Hilbert decompositions
pub const HILBERT_ORDERING: &str = "hilbert";

/// Largest `levelmax` accepted; keys need `3 * (levelmax + 1)` bits
pub const MAX_LEVELMAX: u32 = 62;

/// Simulation header of a snapshot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InfoHeader {
    /// Number of CPUs, and thus computational domains
    pub ncpu: u32,
    /// Number of spatial dimensions
    pub ndim: u32,
    /// Coarsest refinement level (present everywhere)
    pub levelmin: u32,
    /// Finest refinement level allowed
    pub levelmax: u32,
    /// Maximum number of grids per CPU
    pub ngridmax: u32,
    /// Coarse time steps performed up to this snapshot
    pub nstep_coarse: u32,
    /// Box length in internal units
    pub boxlen: f64,
    pub time: f64,
    /// Cosmological expansion factor
    pub aexp: f64,
    #[serde(rename = "H0")]
    pub h0: f64,
    pub omega_m: f64,
    pub omega_l: f64,
    pub omega_k: f64,
    pub omega_b: f64,
    pub unit_l: f64,
    pub unit_d: f64,
    pub unit_t: f64,
}

/// Metadata of one RAMSES snapshot: header plus domain decomposition
#[derive(Debug, Clone)]
pub struct SnapshotInfo {
    filename: String,
    header: InfoHeader,
    ordering_type: String,
    ind_min: Vec<f64>,
    ind_max: Vec<f64>,
    boundaries: BoundaryTable,
}

impl SnapshotInfo {
    /// Load and validate an info file
    pub fn from_file(path: impl AsRef<Path>) -> DomainResult<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| InfoError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&content, &path.to_string_lossy())
    }

    /// Parse info file contents; `filename` is kept for the snapshot number
    pub fn parse(content: &str, filename: &str) -> DomainResult<Self> {
        let mut lines = InfoLines::new(content);

        let ncpu: u32 = lines.value("ncpu")?;
        let ndim = lines.value("ndim")?;
        let levelmin = lines.value("levelmin")?;
        let levelmax: u32 = lines.value("levelmax")?;
        if levelmax > MAX_LEVELMAX {
            return Err(lines.invalid("levelmax", &levelmax.to_string()));
        }
        let ngridmax = lines.value("ngridmax")?;
        let nstep_coarse = lines.value("nstep_coarse")?;
        lines.skip("blank line")?;

        let header = InfoHeader {
            ncpu,
            ndim,
            levelmin,
            levelmax,
            ngridmax,
            nstep_coarse,
            boxlen: lines.real("boxlen")?,
            time: lines.real("time")?,
            aexp: lines.real("aexp")?,
            h0: lines.real("H0")?,
            omega_m: lines.real("omega_m")?,
            omega_l: lines.real("omega_l")?,
            omega_k: lines.real("omega_k")?,
            omega_b: lines.real("omega_b")?,
            unit_l: lines.real("unit_l")?,
            unit_d: lines.real("unit_d")?,
            unit_t: lines.real("unit_t")?,
        };
        lines.skip("blank line")?;

        let ordering_line = lines.next_line("ordering type")?;
        let ordering_type = ordering_line
            .rsplit('=')
            .next()
            .map(str::trim)
            .unwrap_or_default()
            .to_string();
        if ordering_type != HILBERT_ORDERING {
            warn!(
                "Snapshot '{}' uses '{}' ordering; Hilbert lookups may be meaningless",
                filename, ordering_type
            );
        }
        lines.skip("domain column header")?;

        if ncpu == 0 {
            return Err(InfoError::ZeroDomains);
        }

        let mut ind_min = Vec::with_capacity(ncpu as usize);
        let mut ind_max = Vec::with_capacity(ncpu as usize);
        for expected in 1..=ncpu as DomainId {
            let (min, max) = lines.domain(expected)?;
            ind_min.push(min);
            ind_max.push(max);
        }

        let boundaries = BoundaryTable::from_domain_ranges(&ind_min, &ind_max)?;

        info!(
            "Loaded snapshot info '{}': ncpu={}, levelmax={}, ordering={}",
            filename, header.ncpu, header.levelmax, ordering_type
        );

        Ok(Self {
            filename: filename.to_string(),
            header,
            ordering_type,
            ind_min,
            ind_max,
            boundaries,
        })
    }

    pub fn filename(&self) -> &str {
        &self.filename
    }

    pub fn header(&self) -> &InfoHeader {
        &self.header
    }

    /// Value of the `ordering type=` line
    pub fn ordering_type(&self) -> &str {
        &self.ordering_type
    }

    /// Fail unless the decomposition is Hilbert-ordered
    pub fn ensure_hilbert_ordering(&self) -> DomainResult<()> {
        if self.ordering_type == HILBERT_ORDERING {
            Ok(())
        } else {
            Err(InfoError::UnsupportedOrdering(self.ordering_type.clone()))
        }
    }

    /// Minimum Hilbert key per domain (index 0 is domain 1)
    pub fn ind_min(&self) -> &[f64] {
        &self.ind_min
    }

    /// Maximum Hilbert key per domain (index 0 is domain 1)
    pub fn ind_max(&self) -> &[f64] {
        &self.ind_max
    }

    pub fn boundaries(&self) -> &BoundaryTable {
        &self.boundaries
    }

    /// Output number encoded in the file name (`info_00042.txt` -> 42)
    pub fn snapshot_number(&self) -> DomainResult<u32> {
        snapshot_number(&self.filename)
    }

    /// Bit length the file's boundary keys are expressed at
    pub fn key_bit_length(&self) -> u32 {
        self.header.levelmax + 1
    }

    /// Domain owning a key already in the file's key units
    pub fn owning_domain(&self, key: f64) -> DomainId {
        self.boundaries.owning_domain(key)
    }

    /// Fewest bits per axis a key needs to resolve every boundary exactly.
    ///
    /// The file resolution, capped at `MAX_BIT_LENGTH`.
    pub fn required_key_bits(&self) -> u32 {
        self.key_bit_length().min(MAX_BIT_LENGTH)
    }

    /// Domain owning a key computed at `required_key_bits()` bits or finer.
    ///
    /// # Errors
    ///
    /// `KeyTooCoarse` for coarser keys: a coarse cell can straddle a domain edge.
    pub fn domain_of_key(&self, key: HilbertKey) -> DomainResult<DomainId> {
        let required_bits = self.required_key_bits();
        if key.bit_length() < required_bits {
            return Err(InfoError::KeyTooCoarse {
                key_bits: key.bit_length(),
                required_bits,
            });
        }
        Ok(self.owning_domain(key.rescale(self.key_bit_length())))
    }

    /// Domain owning a normalized point
    pub fn domain_of_point(&self, indexer: &HilbertIndexer, point: Point) -> DomainResult<DomainId> {
        self.domain_of_key(indexer.key(point)?)
    }

    /// Domains owning a batch of normalized points, in input order
    pub fn domains_of_points(
        &self,
        indexer: &HilbertIndexer,
        points: &[Point],
    ) -> DomainResult<Vec<DomainId>> {
        let keys = indexer.compute_keys(points)?;
        debug!(count = keys.len(), "Resolving domains for point batch");
        keys.into_iter().map(|key| self.domain_of_key(key)).collect()
    }
}

/// Extract the five-digit output number following the last `info_` in `filename`
pub fn snapshot_number(filename: &str) -> DomainResult<u32> {
    let missing = || InfoError::NoSnapshotNumber(filename.to_string());

    let start = filename.rfind("info").ok_or_else(missing)? + "info_".len();
    let digits: String = filename
        .get(start..)
        .ok_or_else(missing)?
        .chars()
        .take(5)
        .take_while(char::is_ascii_digit)
        .collect();

    digits.parse().map_err(|_| missing())
}

/// Parse a Fortran real, accepting `D` exponents
fn parse_real(token: &str) -> Option<f64> {
    token.replace(['D', 'd'], "E").parse().ok()
}

/// Line cursor tracking 1-based line numbers for error reporting
struct InfoLines<'a> {
    lines: Lines<'a>,
    line: usize,
}

impl<'a> InfoLines<'a> {
    fn new(content: &'a str) -> Self {
        Self {
            lines: content.lines(),
            line: 0,
        }
    }

    fn next_line(&mut self, expected: &str) -> DomainResult<&'a str> {
        self.line += 1;
        self.lines.next().ok_or_else(|| InfoError::UnexpectedEof {
            line: self.line,
            expected: expected.to_string(),
        })
    }

    fn skip(&mut self, expected: &str) -> DomainResult<()> {
        self.next_line(expected).map(|_| ())
    }

    /// Right-most token of the next line
    fn last_token(&mut self, field: &str) -> DomainResult<&'a str> {
        let text = self.next_line(field)?;
        text.split_whitespace()
            .last()
            .ok_or_else(|| self.invalid(field, text))
    }

    fn value<T: FromStr>(&mut self, field: &str) -> DomainResult<T> {
        let token = self.last_token(field)?;
        token.parse().map_err(|_| self.invalid(field, token))
    }

    fn real(&mut self, field: &str) -> DomainResult<f64> {
        let token = self.last_token(field)?;
        parse_real(token).ok_or_else(|| self.invalid(field, token))
    }

    fn domain(&mut self, expected: DomainId) -> DomainResult<(f64, f64)> {
        let text = self.next_line(&format!("domain {}", expected))?;
        let mut tokens = text.split_whitespace();

        let id = tokens.next().unwrap_or_default();
        if id.parse::<DomainId>().ok() != Some(expected) {
            return Err(InfoError::DomainIdMismatch {
                line: self.line,
                expected,
                found: id.to_string(),
            });
        }

        let min = tokens.next().unwrap_or_default();
        let min = parse_real(min).ok_or_else(|| self.invalid("ind_min", min))?;
        let max = tokens.next().unwrap_or_default();
        let max = parse_real(max).ok_or_else(|| self.invalid("ind_max", max))?;
        Ok((min, max))
    }

    fn invalid(&self, field: &str, value: &str) -> InfoError {
        InfoError::InvalidValue {
            line: self.line,
            field: field.to_string(),
            value: value.to_string(),
        }
    }
}
