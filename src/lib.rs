//! # ramses-locator
//!
//! Finds which computational domain of a RAMSES adaptive-mesh snapshot owns a
//! given position. RAMSES splits the simulation box between CPUs along a 3D
//! Hilbert curve; each CPU owns one contiguous interval of curve keys, listed
//! in the snapshot's `info_XXXXX.txt`. This crate computes the keys and
//! bisects the interval table.
//!
//! ## Quick Start
//!
//! ```toml
//! [dependencies]
//! ramses-locator = "0.1"
//! ```
//!
//! ```rust
//! use ramses_locator::prelude::*;
//!
//! // One refinement bit per axis: 8 cells, keys 0..8
//! let keys = compute_keys(&[Point::new(0.6, 0.6, 0.6)], 1)?;
//! assert_eq!(keys[0].value(), 5);
//!
//! // Two domains: keys [0, 4) and [4, 8)
//! let domain = owning_domain(keys[0].as_f64(), &[0.0, 4.0, 8.0])?;
//! assert_eq!(domain, 2);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ### From a snapshot
//!
//! ```rust,no_run
//! use ramses_locator::prelude::*;
//!
//! let info = SnapshotInfo::from_file("output_00042/info_00042.txt")?;
//! let indexer = HilbertIndexer::new(info.required_key_bits())?;
//! let domain = info.domain_of_point(&indexer, Point::new(0.25, 0.5, 0.75))?;
//! println!("snapshot {} domain {}", info.snapshot_number()?, domain);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Feature Flags
//!
//! - **`parallel`** (default): compute large key batches on the rayon pool
//! - **`file-logging`**: per-run log folders with retention
//!
//! ## Crates
//!
//! - **ramses-hilbert**: state table and key computation
//! - **ramses-domain**: boundary table, bisection, info-file loader
//! - **ramses-config**: TOML configuration with env/CLI overrides
//! - **ramses-observability**: logging setup and per-crate debug flags
//!
//! ## License
//!
//! Apache-2.0

pub use ramses_config as config;
pub use ramses_domain as domain;
pub use ramses_hilbert as hilbert;
pub use ramses_observability as observability;

/// Prelude - commonly used types and functions
pub mod prelude {
    pub use crate::domain::{
        owning_domain, BoundaryError, BoundaryTable, DomainId, InfoError, SnapshotInfo,
    };
    pub use crate::hilbert::{
        compute_keys, CoordinatePolicy, HilbertError, HilbertIndexer, HilbertKey, Point,
        MAX_BIT_LENGTH,
    };
}
