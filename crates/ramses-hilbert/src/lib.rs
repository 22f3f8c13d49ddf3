// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

/*!
# RAMSES Hilbert

Maps normalized 3D points to keys along the 3D Hilbert space-filling curve
used by RAMSES to decompose the simulation volume across CPUs.

- `table` - the fixed 12-state generator (next state + emitted digit)
- `indexer` - `HilbertIndexer` and the `compute_keys` batch entry point
- `types` - `Point`, `HilbertKey`, `CoordinatePolicy`, errors

## Precision

Keys carry 3 bits per level and must stay exact when stored as `f64`
(RAMSES writes domain bounds as doubles), so the bit length is capped at
`MAX_BIT_LENGTH` = 17. Larger values are rejected, not truncated.

## Example

```rust
use ramses_hilbert::{compute_keys, Point};

let keys = compute_keys(&[Point::new(0.6, 0.6, 0.6)], 1)?;
assert_eq!(keys[0].value(), 5);
# Ok::<(), ramses_hilbert::HilbertError>(())
```
*/

/// Crate version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod indexer;
pub mod table;
pub mod types;

pub use indexer::{compute_keys, HilbertIndexer, DEFAULT_PARALLEL_THRESHOLD};
pub use table::STATE_DIAGRAM;
pub use types::{
    Axis, CoordinatePolicy, HilbertError, HilbertKey, HilbertResult, Point, MAX_BIT_LENGTH,
};
