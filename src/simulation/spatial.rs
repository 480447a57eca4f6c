//! # Uniform spatial hash grid (2D)
//!
//! This module implements the acceleration structure that replaces the naive
//! `O(N²)` all-pairs repulsion scan with a local query: bodies are bucketed
//! by grid cell, and "who is within the effect radius of this body" becomes
//! a lookup over a fixed 2×2 block of cells plus an exact distance filter.
//!
//! ## Core concepts
//!
//! - The plane is divided into square cells of side `cell_diameter`, fixed at
//!   construction to exactly twice the interaction radius.
//! - Because of that ratio, the interaction disc of any body fits inside a
//!   2×2 block of cells, so a neighbor query touches exactly 4 buckets.
//! - Buckets hold stable body indices into the tank's body arena, kept in a
//!   `BTreeSet` so removal never scans and iteration order is deterministic.
//! - Membership is maintained incrementally: a body is reindexed only when a
//!   step moves it across a cell boundary, which is a cheap `relocate`
//!   instead of a full rebuild per frame.
//!
//! The grid does not own bodies; callers pass the body slice into queries so
//! the exact-distance filter can read current positions.

use std::collections::{BTreeSet, HashMap};

use crate::simulation::error::InvariantViolation;
use crate::simulation::states::{Body, NVec2};

/// Grid bucketing body indices by discretized cell coordinate.
///
/// The invariant maintained across `insert`/`relocate` calls: every indexed
/// body appears in exactly one bucket, and that bucket is the one computed
/// from the position the grid was last told about. Violations surface as
/// [`InvariantViolation`] rather than being silently repaired.
pub struct SpatialGrid {
    cell_diameter: f64,
    buckets: HashMap<(i64, i64), BTreeSet<usize>>,
}

impl SpatialGrid {
    /// Create an empty grid for the given interaction radius.
    ///
    /// The cell diameter is fixed here at `2 * effect_radius` and must never
    /// change afterwards: the 2×2-block coverage in [`Self::neighbors_within`]
    /// is only exact under that ratio. Reconfiguring the radius means
    /// rebuilding the grid.
    pub fn new(effect_radius: f64) -> Self {
        Self {
            cell_diameter: effect_radius * 2.0,
            buckets: HashMap::new(),
        }
    }

    /// Discretize a position into its cell coordinate.
    ///
    /// Pure floor division, so negative positions land in negative cells
    /// (no clamping: the grid is unbounded even though the tank is not).
    pub fn cell_of(&self, position: &NVec2) -> (i64, i64) {
        (
            (position.x / self.cell_diameter).floor() as i64,
            (position.y / self.cell_diameter).floor() as i64,
        )
    }

    /// Index a body under its current position.
    ///
    /// Precondition: the body is not already indexed. A double insert is a
    /// programmer error and fails fast instead of silently duplicating.
    pub fn insert(&mut self, body: usize, position: &NVec2) -> Result<(), InvariantViolation> {
        let cell = self.cell_of(position);
        if !self.buckets.entry(cell).or_default().insert(body) {
            return Err(InvariantViolation::DoubleInsert { body, cell });
        }
        Ok(())
    }

    /// Move a body's bucket membership after its position changed.
    ///
    /// No-op when the old and new positions hash to the same cell. Otherwise
    /// the body is removed from the bucket derived from `previous` (failure
    /// there means the index is corrupt) and inserted under `current`.
    pub fn relocate(
        &mut self,
        body: usize,
        previous: &NVec2,
        current: &NVec2,
    ) -> Result<(), InvariantViolation> {
        let old_cell = self.cell_of(previous);
        let new_cell = self.cell_of(current);
        if old_cell == new_cell {
            return Ok(());
        }

        let removed = self
            .buckets
            .get_mut(&old_cell)
            .is_some_and(|bucket| bucket.remove(&body));
        if !removed {
            return Err(InvariantViolation::MissingFromBucket {
                body,
                cell: old_cell,
            });
        }
        // Drop empty buckets so the map tracks occupied cells only
        if self.buckets.get(&old_cell).is_some_and(|b| b.is_empty()) {
            self.buckets.remove(&old_cell);
        }

        if !self.buckets.entry(new_cell).or_default().insert(body) {
            // Present in the target bucket while absent from the old one:
            // the index desynchronized somewhere earlier
            return Err(InvariantViolation::DoubleInsert {
                body,
                cell: new_cell,
            });
        }
        Ok(())
    }

    /// Collect the indices of all bodies within `radius` of `body`, excluding
    /// `body` itself.
    ///
    /// The covered block is derived from the minimum corner of the square
    /// circumscribing the interaction disc: take the cell x of
    /// `position - (radius, 0)` and the cell y of `position - (0, radius)`,
    /// then scan the 2×2 block from there. This covers the full disc exactly
    /// because the cell diameter is twice the radius. The block
    /// over-approximates the disc with a square, so candidates go through an
    /// exact Euclidean distance filter before being returned.
    ///
    /// The querying body must itself show up among the candidates; if it does
    /// not, it was never indexed (or indexed under a stale position) and the
    /// query fails instead of returning a silently wrong answer. An index
    /// beyond the body slice is the same class of failure and reports the
    /// same error rather than panicking.
    pub fn neighbors_within(
        &self,
        body: usize,
        radius: f64,
        bodies: &[Body],
    ) -> Result<Vec<usize>, InvariantViolation> {
        let Some(anchor) = bodies.get(body) else {
            return Err(InvariantViolation::MissingFromNeighborhood { body });
        };
        let position = anchor.x;
        let (min_i, _) = self.cell_of(&(position - NVec2::new(radius, 0.0)));
        let (_, min_j) = self.cell_of(&(position - NVec2::new(0.0, radius)));

        let mut found_self = false;
        let mut neighbors = Vec::new();

        for i in min_i..=min_i + 1 {
            for j in min_j..=min_j + 1 {
                let Some(bucket) = self.buckets.get(&(i, j)) else {
                    continue;
                };
                for &candidate in bucket {
                    if candidate == body {
                        found_self = true;
                        continue;
                    }
                    if (bodies[candidate].x - position).norm() <= radius {
                        neighbors.push(candidate);
                    }
                }
            }
        }

        if !found_self {
            return Err(InvariantViolation::MissingFromNeighborhood { body });
        }
        Ok(neighbors)
    }

    /// Read-only view of the occupied buckets, for consistency checks and
    /// diagnostics.
    pub fn buckets(&self) -> impl Iterator<Item = ((i64, i64), &BTreeSet<usize>)> + '_ {
        self.buckets.iter().map(|(cell, bucket)| (*cell, bucket))
    }

    pub fn cell_diameter(&self) -> f64 {
        self.cell_diameter
    }
}
