// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

/*!
Hilbert key computation for batches of normalized points.

Each point is discretized to `bit_length` bits per axis and walked through
the state table from the most significant level down. Cost is O(bit_length)
per point with no allocation; points are independent, so large batches are
split across the rayon pool.
*/

use crate::table::{octant_code, transition};
use crate::types::{
    Axis, CoordinatePolicy, HilbertError, HilbertKey, HilbertResult, Point, MAX_BIT_LENGTH,
};
use tracing::{debug, trace};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Batches smaller than this are processed on the calling thread.
pub const DEFAULT_PARALLEL_THRESHOLD: usize = 4096;

/// Maps normalized points to Hilbert keys at a fixed bit length
#[derive(Debug, Clone, Copy)]
pub struct HilbertIndexer {
    bit_length: u32,
    scale: f64,
    policy: CoordinatePolicy,
    parallel_threshold: usize,
}

impl HilbertIndexer {
    /// Create an indexer rejecting out-of-range coordinates.
    ///
    /// # Errors
    ///
    /// `ZeroBitLength` for 0, `PrecisionOverflow` above `MAX_BIT_LENGTH`.
    pub fn new(bit_length: u32) -> HilbertResult<Self> {
        Self::with_policy(bit_length, CoordinatePolicy::default())
    }

    /// Create an indexer with an explicit out-of-range policy
    pub fn with_policy(bit_length: u32, policy: CoordinatePolicy) -> HilbertResult<Self> {
        if bit_length == 0 {
            return Err(HilbertError::ZeroBitLength);
        }
        if bit_length > MAX_BIT_LENGTH {
            return Err(HilbertError::PrecisionOverflow {
                bit_length,
                max: MAX_BIT_LENGTH,
            });
        }

        debug!(bit_length, %policy, "Created Hilbert indexer");

        Ok(Self {
            bit_length,
            scale: (1u64 << bit_length) as f64,
            policy,
            parallel_threshold: DEFAULT_PARALLEL_THRESHOLD,
        })
    }

    /// Set the batch size at which work moves to the rayon pool
    pub fn with_parallel_threshold(mut self, threshold: usize) -> Self {
        self.parallel_threshold = threshold;
        self
    }

    pub fn bit_length(&self) -> u32 {
        self.bit_length
    }

    pub fn policy(&self) -> CoordinatePolicy {
        self.policy
    }

    pub fn parallel_threshold(&self) -> usize {
        self.parallel_threshold
    }

    /// Number of cells per axis (`2^bit_length`)
    pub fn cells_per_axis(&self) -> u64 {
        1u64 << self.bit_length
    }

    /// Key of a single point
    pub fn key(&self, point: Point) -> HilbertResult<HilbertKey> {
        self.key_at(0, point)
    }

    /// Key of an already discretized cell (each index `< 2^bit_length`)
    pub fn key_of_cell(&self, x: u64, y: u64, z: u64) -> HilbertResult<HilbertKey> {
        let cells = self.cells_per_axis();
        if x >= cells || y >= cells || z >= cells {
            return Err(HilbertError::CellOutOfRange {
                x,
                y,
                z,
                bit_length: self.bit_length,
            });
        }
        Ok(self.encode_cell(x, y, z))
    }

    /// Keys for a batch of points, same length and order as the input.
    ///
    /// On failure one offending point is reported; with parallel execution it
    /// is not necessarily the first one.
    pub fn compute_keys(&self, points: &[Point]) -> HilbertResult<Vec<HilbertKey>> {
        self.collect_keys(points.len(), |i| self.key_at(i, points[i]))
    }

    /// Keys for points given as separate x, y and z arrays
    pub fn compute_keys_from_axes(
        &self,
        x: &[f64],
        y: &[f64],
        z: &[f64],
    ) -> HilbertResult<Vec<HilbertKey>> {
        if x.len() != y.len() || x.len() != z.len() {
            return Err(HilbertError::LengthMismatch {
                x: x.len(),
                y: y.len(),
                z: z.len(),
            });
        }
        self.collect_keys(x.len(), |i| self.key_at(i, Point::new(x[i], y[i], z[i])))
    }

    fn collect_keys<F>(&self, count: usize, key_fn: F) -> HilbertResult<Vec<HilbertKey>>
    where
        F: Fn(usize) -> HilbertResult<HilbertKey> + Send + Sync,
    {
        #[cfg(feature = "parallel")]
        if count >= self.parallel_threshold {
            debug!(count, bit_length = self.bit_length, "Computing Hilbert keys in parallel");
            return (0..count).into_par_iter().map(key_fn).collect();
        }

        trace!(count, bit_length = self.bit_length, "Computing Hilbert keys");
        (0..count).map(key_fn).collect()
    }

    fn key_at(&self, index: usize, point: Point) -> HilbertResult<HilbertKey> {
        let x = self.discretize(index, Axis::X, point.x)?;
        let y = self.discretize(index, Axis::Y, point.y)?;
        let z = self.discretize(index, Axis::Z, point.z)?;
        Ok(self.encode_cell(x, y, z))
    }

    fn discretize(&self, index: usize, axis: Axis, value: f64) -> HilbertResult<u64> {
        if (0.0..1.0).contains(&value) {
            // Scaling by a power of two is exact, so the floor stays below 2^b
            return Ok((value * self.scale) as u64);
        }

        match self.policy {
            CoordinatePolicy::Clamp if !value.is_nan() => {
                if value < 0.0 {
                    Ok(0)
                } else {
                    Ok(self.cells_per_axis() - 1)
                }
            }
            _ => Err(HilbertError::CoordinateOutOfRange { index, axis, value }),
        }
    }

    #[inline]
    fn encode_cell(&self, x: u64, y: u64, z: u64) -> HilbertKey {
        let mut state = 0usize;
        let mut key = 0u64;

        for level in (0..self.bit_length).rev() {
            let octant = octant_code((x >> level) & 1, (y >> level) & 1, (z >> level) & 1);
            let (next, digit) = transition(state, octant);
            key = (key << 3) | digit;
            state = next;
        }

        HilbertKey::new(key, self.bit_length)
    }
}

/// Compute Hilbert keys for `points` at `bit_length` bits per axis.
///
/// Out-of-range coordinates are rejected.
pub fn compute_keys(points: &[Point], bit_length: u32) -> HilbertResult<Vec<HilbertKey>> {
    HilbertIndexer::new(bit_length)?.compute_keys(points)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn all_cells(indexer: &HilbertIndexer) -> HashMap<u64, (u64, u64, u64)> {
        let n = indexer.cells_per_axis();
        let mut cells = HashMap::new();
        for x in 0..n {
            for y in 0..n {
                for z in 0..n {
                    let key = indexer.key_of_cell(x, y, z).unwrap();
                    cells.insert(key.value(), (x, y, z));
                }
            }
        }
        cells
    }

    #[test]
    fn test_single_level_reference_key() {
        // (0.6, 0.6, 0.6) at one bit is cell (1, 1, 1): octant 7 from state 0 emits digit 5
        let keys = compute_keys(&[Point::new(0.6, 0.6, 0.6)], 1).unwrap();
        assert_eq!(keys[0].value(), 5);
        assert_eq!(keys[0].bit_length(), 1);
        assert_eq!(keys[0].as_f64(), 5.0);
    }

    #[test]
    fn test_reference_keys() {
        let indexer = HilbertIndexer::new(2).unwrap();
        assert_eq!(indexer.key(Point::new(0.1, 0.2, 0.3)).unwrap().value(), 7);

        let indexer = HilbertIndexer::new(3).unwrap();
        assert_eq!(indexer.key(Point::new(0.9, 0.1, 0.5)).unwrap().value(), 447);
    }

    #[test]
    fn test_axis_order_at_one_bit() {
        let indexer = HilbertIndexer::new(1).unwrap();
        assert_eq!(indexer.key_of_cell(0, 0, 0).unwrap().value(), 0);
        assert_eq!(indexer.key_of_cell(0, 0, 1).unwrap().value(), 1);
        assert_eq!(indexer.key_of_cell(0, 1, 0).unwrap().value(), 3);
        assert_eq!(indexer.key_of_cell(1, 0, 0).unwrap().value(), 7);
    }

    #[test]
    fn test_keys_form_permutation_at_three_bits() {
        let indexer = HilbertIndexer::new(3).unwrap();
        let cells = all_cells(&indexer);
        assert_eq!(cells.len(), 512);
        for key in 0..512u64 {
            assert!(cells.contains_key(&key), "key {} never produced", key);
        }
    }

    #[test]
    fn test_consecutive_keys_are_face_neighbours() {
        for bit_length in 1..=4 {
            let indexer = HilbertIndexer::new(bit_length).unwrap();
            let cells = all_cells(&indexer);
            for key in 0..HilbertKey::max_value(bit_length) {
                let a = cells[&key];
                let b = cells[&(key + 1)];
                let d = [a.0.abs_diff(b.0), a.1.abs_diff(b.1), a.2.abs_diff(b.2)];
                let chebyshev = d.iter().copied().max().unwrap();
                let manhattan: u64 = d.iter().sum();
                assert_eq!(chebyshev, 1, "keys {} and {} not adjacent", key, key + 1);
                assert_eq!(manhattan, 1, "keys {} and {} not face-adjacent", key, key + 1);
            }
        }
    }

    #[test]
    fn test_curve_endpoints() {
        let indexer = HilbertIndexer::new(3).unwrap();
        let cells = all_cells(&indexer);
        assert_eq!(cells[&0], (0, 0, 0));
        assert_eq!(cells[&511], (7, 0, 0));
    }

    #[test]
    fn test_bit_length_limits() {
        assert_eq!(HilbertIndexer::new(0).unwrap_err(), HilbertError::ZeroBitLength);
        assert_eq!(
            HilbertIndexer::new(18).unwrap_err(),
            HilbertError::PrecisionOverflow {
                bit_length: 18,
                max: MAX_BIT_LENGTH
            }
        );
        assert!(HilbertIndexer::new(MAX_BIT_LENGTH).is_ok());
    }

    #[test]
    fn test_max_bit_length_key_is_exact_in_f64() {
        let indexer = HilbertIndexer::new(MAX_BIT_LENGTH).unwrap();
        let key = indexer.key(Point::new(0.999_999, 0.5, 0.25)).unwrap();
        assert!(key.value() <= HilbertKey::max_value(MAX_BIT_LENGTH));
        assert_eq!(key.as_f64() as u64, key.value());
    }

    #[test]
    fn test_reject_out_of_range() {
        let indexer = HilbertIndexer::new(4).unwrap();
        let points = [Point::new(0.5, 0.5, 0.5), Point::new(0.5, 1.0, 0.5)];
        let err = indexer.compute_keys(&points).unwrap_err();
        assert_eq!(
            err,
            HilbertError::CoordinateOutOfRange {
                index: 1,
                axis: Axis::Y,
                value: 1.0
            }
        );

        assert!(indexer.key(Point::new(-0.1, 0.0, 0.0)).is_err());
    }

    #[test]
    fn test_clamp_out_of_range() {
        let indexer = HilbertIndexer::with_policy(2, CoordinatePolicy::Clamp).unwrap();
        let clamped = indexer.key(Point::new(1.5, -3.0, 0.5)).unwrap();
        let expected = indexer.key_of_cell(3, 0, 2).unwrap();
        assert_eq!(clamped, expected);
    }

    #[test]
    fn test_nan_rejected_under_clamp() {
        let indexer = HilbertIndexer::with_policy(2, CoordinatePolicy::Clamp).unwrap();
        let err = indexer.key(Point::new(0.5, 0.5, f64::NAN)).unwrap_err();
        assert!(matches!(
            err,
            HilbertError::CoordinateOutOfRange { axis: Axis::Z, .. }
        ));
    }

    #[test]
    fn test_cell_out_of_range() {
        let indexer = HilbertIndexer::new(2).unwrap();
        assert!(matches!(
            indexer.key_of_cell(4, 0, 0),
            Err(HilbertError::CellOutOfRange { x: 4, .. })
        ));
    }

    #[test]
    fn test_axes_match_points() {
        let indexer = HilbertIndexer::new(5).unwrap();
        let x = [0.1, 0.7, 0.33];
        let y = [0.2, 0.05, 0.66];
        let z = [0.9, 0.4, 0.01];
        let points: Vec<Point> = (0..3).map(|i| Point::new(x[i], y[i], z[i])).collect();

        assert_eq!(
            indexer.compute_keys_from_axes(&x, &y, &z).unwrap(),
            indexer.compute_keys(&points).unwrap()
        );
    }

    #[test]
    fn test_axes_length_mismatch() {
        let indexer = HilbertIndexer::new(5).unwrap();
        let err = indexer
            .compute_keys_from_axes(&[0.1, 0.2], &[0.1], &[0.1, 0.2])
            .unwrap_err();
        assert_eq!(err, HilbertError::LengthMismatch { x: 2, y: 1, z: 2 });
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let points: Vec<Point> = (0..2000)
            .map(|i| {
                let t = i as f64 / 2000.0;
                Point::new(t, (t * 7.0).fract(), (t * 13.0).fract())
            })
            .collect();

        let sequential = HilbertIndexer::new(10)
            .unwrap()
            .with_parallel_threshold(usize::MAX)
            .compute_keys(&points)
            .unwrap();
        let parallel = HilbertIndexer::new(10)
            .unwrap()
            .with_parallel_threshold(1)
            .compute_keys(&points)
            .unwrap();

        assert_eq!(sequential, parallel);
    }

    #[test]
    fn test_empty_batch() {
        assert!(compute_keys(&[], 8).unwrap().is_empty());
    }
}
