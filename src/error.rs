//! Typed errors for the clustering core

use thiserror::Error;

/// Errors raised by graph construction, label propagation, and matching.
///
/// Construction-time errors abort the build entirely; a partially built
/// adjacency matrix is never handed to the propagation engine.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ClusterError {
    /// A descriptor has zero norm, so cosine distance is undefined for it.
    /// Skipping it silently would corrupt adjacency symmetry.
    #[error("descriptor {index} has zero norm; cosine distance is undefined")]
    DegenerateVector { index: usize },

    /// Descriptors must all share one fixed embedding dimension.
    #[error("descriptor {index} has dimension {found}, expected {expected}")]
    DimensionMismatch {
        index: usize,
        expected: usize,
        found: usize,
    },

    /// A negative iteration budget was supplied to the propagation engine.
    #[error("propagation budget must be non-negative, got {0}")]
    InvalidIterationBudget(i64),

    /// The probe descriptor handed to the profile matcher has zero norm.
    #[error("probe descriptor has zero norm; cannot match against profiles")]
    DegenerateProbe,
}
