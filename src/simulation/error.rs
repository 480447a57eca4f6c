//! Internal-consistency failures of the spatial index
//!
//! Every variant indicates that the grid and the body positions have
//! desynchronized. None of them is recoverable; hosts should treat a
//! returned error as fatal so the bug is caught instead of masked. No error
//! originates from the physics itself (the force singularity is clamped,
//! not rejected).

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum InvariantViolation {
    #[error("body {body} inserted into cell {cell:?} where it is already indexed")]
    DoubleInsert { body: usize, cell: (i64, i64) },

    #[error("body {body} missing from expected bucket {cell:?} during relocate")]
    MissingFromBucket { body: usize, cell: (i64, i64) },

    #[error("body {body} absent from its own neighbor candidate set")]
    MissingFromNeighborhood { body: usize },
}
