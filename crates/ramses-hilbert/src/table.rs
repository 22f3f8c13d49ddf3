// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

/*!
State transition table of the 3D Hilbert curve generator.

Each of the 12 states is one rotated/reflected orientation of the curve's
basic 2×2×2 motif. For a state and an octant code (`x<<2 | y<<1 | z`) the
table yields the state to descend into and the 3-bit digit emitted for that
level.
*/

/// Number of generator states.
pub const NUM_STATES: usize = 12;

/// Number of octants per refinement level.
pub const NUM_OCTANTS: usize = 8;

/// `(next_state, digit)` pairs indexed by `[state][octant]`.
///
/// Must stay identical to the generator RAMSES uses to write `ind_min` /
/// `ind_max`, otherwise keys no longer line up with boundary tables.
pub const STATE_DIAGRAM: [[(u8, u8); NUM_OCTANTS]; NUM_STATES] = [
    [(1, 0), (2, 1), (3, 3), (2, 2), (4, 7), (5, 6), (3, 4), (5, 5)],
    [(2, 0), (6, 7), (0, 1), (7, 6), (8, 3), (8, 4), (0, 2), (7, 5)],
    [(0, 0), (9, 3), (10, 7), (9, 4), (1, 1), (1, 2), (11, 6), (11, 5)],
    [(6, 2), (0, 3), (6, 1), (11, 0), (9, 5), (0, 4), (9, 6), (8, 7)],
    [(11, 4), (11, 3), (0, 5), (7, 2), (5, 7), (9, 0), (0, 6), (7, 1)],
    [(4, 6), (4, 5), (8, 1), (8, 2), (0, 7), (6, 4), (10, 0), (6, 3)],
    [(5, 4), (7, 7), (5, 3), (3, 0), (1, 5), (1, 6), (11, 2), (11, 1)],
    [(6, 6), (1, 7), (6, 5), (10, 4), (9, 1), (4, 0), (9, 2), (10, 3)],
    [(10, 2), (3, 5), (1, 3), (1, 4), (10, 1), (3, 6), (5, 0), (9, 7)],
    [(4, 2), (4, 1), (8, 5), (8, 6), (2, 3), (7, 0), (2, 4), (3, 7)],
    [(7, 4), (2, 5), (11, 7), (2, 6), (7, 3), (5, 2), (8, 0), (5, 1)],
    [(10, 6), (3, 1), (2, 7), (6, 0), (10, 5), (3, 2), (4, 4), (4, 3)],
];

/// Look up one transition.
#[inline(always)]
pub fn transition(state: usize, octant: usize) -> (usize, u64) {
    let (next, digit) = STATE_DIAGRAM[state][octant];
    (next as usize, digit as u64)
}

/// Octant code of three single bits.
#[inline(always)]
pub fn octant_code(x_bit: u64, y_bit: u64, z_bit: u64) -> usize {
    ((x_bit << 2) | (y_bit << 1) | z_bit) as usize
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_state_emits_a_permutation_of_digits() {
        for (state, row) in STATE_DIAGRAM.iter().enumerate() {
            let mut seen = [false; NUM_OCTANTS];
            for &(_, digit) in row {
                seen[digit as usize] = true;
            }
            assert!(seen.iter().all(|&s| s), "state {} digits are not a permutation", state);
        }
    }

    #[test]
    fn test_next_states_in_range() {
        for row in STATE_DIAGRAM.iter() {
            for &(next, _) in row {
                assert!((next as usize) < NUM_STATES);
            }
        }
    }

    #[test]
    fn test_state_zero_first_row() {
        let next: Vec<u8> = STATE_DIAGRAM[0].iter().map(|&(n, _)| n).collect();
        let digits: Vec<u8> = STATE_DIAGRAM[0].iter().map(|&(_, d)| d).collect();
        assert_eq!(next, vec![1, 2, 3, 2, 4, 5, 3, 5]);
        assert_eq!(digits, vec![0, 1, 3, 2, 7, 6, 4, 5]);
    }

    #[test]
    fn test_octant_code_order() {
        assert_eq!(octant_code(1, 0, 0), 4);
        assert_eq!(octant_code(0, 1, 0), 2);
        assert_eq!(octant_code(0, 0, 1), 1);
        assert_eq!(octant_code(1, 1, 1), 7);
    }
}
