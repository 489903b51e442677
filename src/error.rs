//! Error types for distribution fitting and evaluation.

use thiserror::Error;

use crate::distributions::FamilyKind;

/// Errors raised by distribution operations.
///
/// Every error is reported at the call that violates the precondition.
/// Nothing is retried or recovered internally.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DistributionError {
    /// The sample is too small for the requested statistic.
    #[error("insufficient data: need at least {required} observation(s), got {got}")]
    InsufficientData { required: usize, got: usize },

    /// Parameters were read before any valid derivation, or the spread
    /// is zero where a density would divide by it.
    #[error("distribution is not initialized")]
    NotInitialized,

    /// `combine` was called across two different families.
    #[error("cannot combine a {left} distribution with a {right} distribution")]
    FamilyMismatch { left: FamilyKind, right: FamilyKind },

    /// Parameters or arguments violate the family's constraints.
    #[error("invalid distribution parameters: {0}")]
    InvalidParameters(String),

    /// An observation is NaN or infinite.
    #[error("observation {index} is not finite: {value}")]
    NonFiniteObservation { index: usize, value: f64 },
}

/// Convenience alias used across the crate.
pub type Result<T> = std::result::Result<T, DistributionError>;
