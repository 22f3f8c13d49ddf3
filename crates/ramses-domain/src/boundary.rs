// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

/*!
Domain boundary table and bisection lookup.

RAMSES assigns each CPU a contiguous interval of Hilbert keys. The table
holds the `ncpu + 1` interval edges; `locate` finds the interval holding a
key in O(log ncpu). Monotonicity is checked once at construction so the
search never has to guess the table direction.
*/

use crate::types::{BoundaryError, Direction, DomainId};
use tracing::trace;

/// Validated, immutable table of domain interval edges
#[derive(Debug, Clone, PartialEq)]
pub struct BoundaryTable {
    edges: Vec<f64>,
    direction: Direction,
}

impl BoundaryTable {
    /// Build a table from interval edges.
    ///
    /// # Errors
    ///
    /// Fails unless there are at least 2 finite, strictly monotonic entries.
    pub fn new(edges: Vec<f64>) -> Result<Self, BoundaryError> {
        if edges.len() < 2 {
            return Err(BoundaryError::TooFewBoundaries(edges.len()));
        }

        if let Some((index, &value)) = edges.iter().enumerate().find(|(_, v)| !v.is_finite()) {
            return Err(BoundaryError::NonFinite { index, value });
        }

        let direction = if edges[edges.len() - 1] >= edges[0] {
            Direction::Ascending
        } else {
            Direction::Descending
        };

        for index in 1..edges.len() {
            let previous = edges[index - 1];
            let value = edges[index];
            let ordered = match direction {
                Direction::Ascending => value > previous,
                Direction::Descending => value < previous,
            };
            if !ordered {
                return Err(BoundaryError::NotMonotonic {
                    index,
                    previous,
                    value,
                });
            }
        }

        Ok(Self { edges, direction })
    }

    /// Build a table from per-domain `ind_min` / `ind_max` columns.
    ///
    /// Consecutive domains must share their boundary key.
    pub fn from_domain_ranges(ind_min: &[f64], ind_max: &[f64]) -> Result<Self, BoundaryError> {
        if ind_min.len() != ind_max.len() {
            return Err(BoundaryError::LengthMismatch {
                min: ind_min.len(),
                max: ind_max.len(),
            });
        }
        let Some(&last_max) = ind_max.last() else {
            return Err(BoundaryError::TooFewBoundaries(0));
        };

        for (d, (&max, &next_min)) in ind_max.iter().zip(&ind_min[1..]).enumerate() {
            if max != next_min {
                return Err(BoundaryError::NonContiguous {
                    domain: d + 1,
                    max,
                    next_min,
                });
            }
        }

        let mut edges = Vec::with_capacity(ind_min.len() + 1);
        edges.extend_from_slice(ind_min);
        edges.push(last_max);
        Self::new(edges)
    }

    /// Index `i` in `[0, n-2]` of the interval holding `key`.
    ///
    /// Ascending tables use `edges[i] <= key < edges[i+1]`, descending ones
    /// the mirror `edges[i+1] <= key < edges[i]`. Keys beyond either end
    /// clamp to the first or last interval.
    pub fn locate(&self, key: f64) -> usize {
        let ascending = self.direction == Direction::Ascending;
        let mut lower = 0;
        let mut upper = self.edges.len() - 1;

        while upper - lower > 1 {
            let mid = (lower + upper) >> 1;
            if (key >= self.edges[mid]) == ascending {
                lower = mid;
            } else {
                upper = mid;
            }
        }

        lower.min(self.edges.len() - 2)
    }

    /// 1-based id of the domain owning `key`
    pub fn owning_domain(&self, key: f64) -> DomainId {
        let domain = self.locate(key) + 1;
        trace!(key, domain, "Resolved domain");
        domain
    }

    /// Whether `key` falls inside the table at all (no clamping needed)
    pub fn contains(&self, key: f64) -> bool {
        let (low, high) = self.key_span();
        low <= key && key < high
    }

    /// Lowest and highest edge
    pub fn key_span(&self) -> (f64, f64) {
        let first = self.edges[0];
        let last = self.edges[self.edges.len() - 1];
        match self.direction {
            Direction::Ascending => (first, last),
            Direction::Descending => (last, first),
        }
    }

    /// `(start, end)` edges of a 1-based domain, in table order
    pub fn domain_range(&self, domain: DomainId) -> Option<(f64, f64)> {
        if domain == 0 || domain >= self.edges.len() {
            return None;
        }
        Some((self.edges[domain - 1], self.edges[domain]))
    }

    pub fn domain_count(&self) -> usize {
        self.edges.len() - 1
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn edges(&self) -> &[f64] {
        &self.edges
    }
}

/// Validate `boundaries` and return the index of the interval holding `key`
pub fn locate(key: f64, boundaries: &[f64]) -> Result<usize, BoundaryError> {
    Ok(BoundaryTable::new(boundaries.to_vec())?.locate(key))
}

/// Validate `boundaries` and return the 1-based domain owning `key`
pub fn owning_domain(key: f64, boundaries: &[f64]) -> Result<DomainId, BoundaryError> {
    Ok(BoundaryTable::new(boundaries.to_vec())?.owning_domain(key))
}
