// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

/*!
# RAMSES Domain

Finds which computational domain (CPU) of a RAMSES run owns a point of the
simulation volume.

RAMSES splits the Hilbert curve through the box into `ncpu` contiguous key
intervals and records them in `info_XXXXX.txt`. Ownership of a point is then:

```text
point ──HilbertIndexer──▶ key ──BoundaryTable::locate──▶ domain id (1-based)
```

## Modules

- `boundary` - validated boundary table and bisection lookup
- `info` - `info_XXXXX.txt` parsing (`SnapshotInfo`)
- `types` - errors and shared types

## Example

```rust,no_run
use ramses_domain::SnapshotInfo;
use ramses_hilbert::{HilbertIndexer, Point};

let info = SnapshotInfo::from_file("output_00042/info_00042.txt")?;
let indexer = HilbertIndexer::new(info.required_key_bits())?;
let domain = info.domain_of_point(&indexer, Point::new(0.5, 0.25, 0.75))?;
println!("snapshot {} domain {}", info.snapshot_number()?, domain);
# Ok::<(), Box<dyn std::error::Error>>(())
```
*/

/// Crate version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod boundary;
pub mod info;
pub mod types;

pub use boundary::{locate, owning_domain, BoundaryTable};
pub use info::{snapshot_number, InfoHeader, SnapshotInfo, HILBERT_ORDERING, MAX_LEVELMAX};
pub use types::{BoundaryError, Direction, DomainId, DomainResult, InfoError};
