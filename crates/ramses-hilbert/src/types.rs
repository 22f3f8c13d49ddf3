// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

/*!
Core types for Hilbert key computation.
*/

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Largest bit length whose keys (3 bits per level) stay exactly
/// representable in an `f64` mantissa (3 × 17 = 51 ≤ 53).
pub const MAX_BIT_LENGTH: u32 = 17;

/// Result type for Hilbert key operations
pub type HilbertResult<T> = Result<T, HilbertError>;

/// Errors that can occur while computing Hilbert keys
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum HilbertError {
    #[error("Bit length must be at least 1")]
    ZeroBitLength,

    #[error("Bit length {bit_length} exceeds exact key precision (max {max})")]
    PrecisionOverflow { bit_length: u32, max: u32 },

    #[error("Point {index}: {axis} = {value} is outside [0, 1)")]
    CoordinateOutOfRange {
        index: usize,
        axis: Axis,
        value: f64,
    },

    #[error("Cell ({x}, {y}, {z}) outside a {bit_length}-bit grid")]
    CellOutOfRange {
        x: u64,
        y: u64,
        z: u64,
        bit_length: u32,
    },

    #[error("Axis length mismatch: x={x}, y={y}, z={z}")]
    LengthMismatch { x: usize, y: usize, z: usize },

    #[error("Unknown coordinate policy: {0}")]
    UnknownPolicy(String),
}

/// Coordinate axis, used for error reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Axis::X => "x",
            Axis::Y => "y",
            Axis::Z => "z",
        };
        f.write_str(name)
    }
}

/// Normalized 3D position, each axis expected in `[0, 1)`
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Point {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    pub fn to_array(&self) -> [f64; 3] {
        [self.x, self.y, self.z]
    }
}

impl From<(f64, f64, f64)> for Point {
    fn from((x, y, z): (f64, f64, f64)) -> Self {
        Self::new(x, y, z)
    }
}

impl From<[f64; 3]> for Point {
    fn from([x, y, z]: [f64; 3]) -> Self {
        Self::new(x, y, z)
    }
}

/// What to do with a coordinate outside `[0, 1)`.
///
/// NaN is rejected under every policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CoordinatePolicy {
    /// Fail with `HilbertError::CoordinateOutOfRange`
    #[default]
    Reject,
    /// Clamp the discretized cell into `[0, 2^bit_length - 1]`
    Clamp,
}

impl FromStr for CoordinatePolicy {
    type Err = HilbertError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "reject" => Ok(CoordinatePolicy::Reject),
            "clamp" => Ok(CoordinatePolicy::Clamp),
            other => Err(HilbertError::UnknownPolicy(other.to_string())),
        }
    }
}

impl fmt::Display for CoordinatePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CoordinatePolicy::Reject => f.write_str("reject"),
            CoordinatePolicy::Clamp => f.write_str("clamp"),
        }
    }
}

/// Position of a grid cell along the Hilbert curve.
///
/// Carries the bit length it was computed at, so keys from different
/// resolutions are never compared by accident.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct HilbertKey {
    value: u64,
    bit_length: u32,
}

impl HilbertKey {
    pub(crate) fn new(value: u64, bit_length: u32) -> Self {
        Self { value, bit_length }
    }

    /// Integer key, at most `3 * bit_length` significant bits
    pub fn value(&self) -> u64 {
        self.value
    }

    pub fn bit_length(&self) -> u32 {
        self.bit_length
    }

    /// Exact floating-point form, as stored in RAMSES boundary tables
    pub fn as_f64(&self) -> f64 {
        self.value as f64
    }

    /// Largest key at this bit length
    pub fn max_value(bit_length: u32) -> u64 {
        (1u64 << (3 * bit_length)) - 1
    }

    /// Express this key in the units of a `target_bit_length` curve.
    ///
    /// A coarse key maps to the first fine cell it contains; a fine key maps
    /// to the coarse cell containing it. Powers of two keep this exact.
    pub fn rescale(&self, target_bit_length: u32) -> f64 {
        let shift = 3 * (i64::from(target_bit_length) - i64::from(self.bit_length));
        // Beyond the f64 exponent range the result is already 0 or infinite
        let shift = shift.clamp(-1074, 1023) as i32;
        let scaled = self.as_f64() * 2f64.powi(shift);
        if shift < 0 {
            scaled.floor()
        } else {
            scaled
        }
    }
}

impl From<HilbertKey> for f64 {
    fn from(key: HilbertKey) -> Self {
        key.as_f64()
    }
}

impl fmt::Display for HilbertKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_policy_from_str() {
        assert_eq!("reject".parse::<CoordinatePolicy>(), Ok(CoordinatePolicy::Reject));
        assert_eq!(" Clamp ".parse::<CoordinatePolicy>(), Ok(CoordinatePolicy::Clamp));
        assert!(matches!(
            "wrap".parse::<CoordinatePolicy>(),
            Err(HilbertError::UnknownPolicy(_))
        ));
    }

    #[test]
    fn test_key_rescale() {
        let key = HilbertKey::new(5, 1);
        assert_eq!(key.rescale(1), 5.0);
        assert_eq!(key.rescale(3), 5.0 * 64.0);

        let fine = HilbertKey::new(327, 3);
        assert_eq!(fine.rescale(2), 40.0);
        assert_eq!(fine.rescale(1), 5.0);
    }

    #[test]
    fn test_key_rescale_extreme_targets() {
        let key = HilbertKey::new(5, MAX_BIT_LENGTH);
        assert!(key.rescale(u32::MAX).is_infinite());
        assert_eq!(key.rescale(0), 0.0);
        assert_eq!(HilbertKey::new(0, 1).rescale(u32::MAX), 0.0);
        assert_eq!(HilbertKey::new(5, 1).rescale(63), 5.0 * 2f64.powi(186));
    }

    #[test]
    fn test_max_value() {
        assert_eq!(HilbertKey::max_value(1), 7);
        assert_eq!(HilbertKey::max_value(3), 511);
        assert_eq!(HilbertKey::max_value(MAX_BIT_LENGTH), (1u64 << 51) - 1);
    }

    #[test]
    fn test_point_conversions() {
        let p: Point = (0.1, 0.2, 0.3).into();
        assert_eq!(p, Point::from([0.1, 0.2, 0.3]));
        assert_eq!(p.to_array(), [0.1, 0.2, 0.3]);
    }
}
