//! Property tests for Hilbert key computation
//!
//! Checks determinism, grid bijectivity and the key range over random inputs.

use proptest::prelude::*;
use ramses_hilbert::{compute_keys, HilbertIndexer, HilbertKey, Point};

fn unit() -> impl Strategy<Value = f64> {
    0.0f64..1.0
}

fn point() -> impl Strategy<Value = Point> {
    (unit(), unit(), unit()).prop_map(Point::from)
}

fn cell_of(p: &Point, bit_length: u32) -> (u64, u64, u64) {
    let scale = (1u64 << bit_length) as f64;
    (
        (p.x * scale) as u64,
        (p.y * scale) as u64,
        (p.z * scale) as u64,
    )
}

proptest! {
    #[test]
    fn keys_are_deterministic(points in prop::collection::vec(point(), 0..64), bit_length in 1u32..=17) {
        let first = compute_keys(&points, bit_length).unwrap();
        let second = compute_keys(&points, bit_length).unwrap();
        prop_assert_eq!(first, second);
    }

    #[test]
    fn keys_stay_in_range(p in point(), bit_length in 1u32..=17) {
        let key = compute_keys(&[p], bit_length).unwrap()[0];
        prop_assert!(key.value() <= HilbertKey::max_value(bit_length));
        prop_assert_eq!(key.bit_length(), bit_length);
    }

    #[test]
    fn same_cell_same_key(a in point(), b in point(), bit_length in 1u32..=12) {
        let keys = compute_keys(&[a, b], bit_length).unwrap();
        let same_cell = cell_of(&a, bit_length) == cell_of(&b, bit_length);
        prop_assert_eq!(same_cell, keys[0] == keys[1]);
    }

    #[test]
    fn points_inside_a_cell_share_its_key(x in 0u64..256, y in 0u64..256, z in 0u64..256, offset in 0.0f64..0.999) {
        let indexer = HilbertIndexer::new(8).unwrap();
        let p = Point::new(
            (x as f64 + offset) / 256.0,
            (y as f64 + offset) / 256.0,
            (z as f64 + offset) / 256.0,
        );
        prop_assert_eq!(indexer.key(p).unwrap(), indexer.key_of_cell(x, y, z).unwrap());
    }

    #[test]
    fn output_order_matches_input(points in prop::collection::vec(point(), 1..32)) {
        let indexer = HilbertIndexer::new(9).unwrap();
        let batch = indexer.compute_keys(&points).unwrap();
        prop_assert_eq!(batch.len(), points.len());
        for (p, key) in points.iter().zip(&batch) {
            prop_assert_eq!(indexer.key(*p).unwrap(), *key);
        }
    }
}
