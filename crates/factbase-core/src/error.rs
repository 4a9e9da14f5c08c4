//! Error handling for factbase operations
//!
//! This module provides the structured error types raised by the fact store
//! and the retrieval engine. All failures are synchronous and locally raised;
//! nothing is retried internally. Asserting a duplicate fact or retracting an
//! absent one are defined no-ops, not errors.

use crate::types::FactId;
use std::fmt;
use thiserror::Error;

/// Distinguishes the two ways a fact id can be invalid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvalidIdKind {
    /// The id was never assigned by this store.
    OutOfRange,
    /// The id belonged to a fact that has been retracted.
    Retracted,
}

impl fmt::Display for InvalidIdKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OutOfRange => write!(f, "not a valid fact id"),
            Self::Retracted => write!(f, "the fact with this id was retracted"),
        }
    }
}

/// Error type for all fact store and retrieval operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FactBaseError {
    /// A tuple's length, or a predicate's parameter count, does not match the
    /// bound schema or field-list length.
    #[error("arity mismatch: expected {expected} fields, got {actual}")]
    ArityMismatch { expected: usize, actual: usize },

    /// A named field is not present in the store's schema.
    #[error("{field} is not defined as a field in this factbase")]
    UnknownField { field: String },

    /// A fact id outside `[0, next_fact_id)` or pointing at a tombstoned slot.
    #[error("invalid fact id {id}: {kind}")]
    InvalidId { id: FactId, kind: InvalidIdKind },

    /// `sample_one` found no facts satisfying the predicate.
    #[error("there are no facts satisfying the given predicate")]
    EmptyResult,

    /// `sample_n` was asked for more facts than the predicate matched.
    #[error("cannot pick {requested} facts from {available} matching facts")]
    SampleSizeExceeded { requested: usize, available: usize },

    /// The index intersection produced more than one candidate for a single
    /// tuple. This signals a broken internal invariant, not bad input; callers
    /// should treat it as fatal.
    #[error("index corruption: {detail}")]
    IndexCorruption { detail: String },

    /// A snapshot could not be encoded or decoded.
    #[error("serialization error: {detail}")]
    Serialization { detail: String },
}

/// Result type alias for factbase operations
pub type FactBaseResult<T> = Result<T, FactBaseError>;

/// Helper constructors for common error patterns
impl FactBaseError {
    /// Create an arity mismatch error
    pub fn arity_mismatch(expected: usize, actual: usize) -> Self {
        Self::ArityMismatch { expected, actual }
    }

    /// Create an unknown field error
    pub fn unknown_field(field: impl Into<String>) -> Self {
        Self::UnknownField { field: field.into() }
    }

    /// Create an invalid id error for an id this store never assigned
    pub fn id_out_of_range(id: FactId) -> Self {
        Self::InvalidId { id, kind: InvalidIdKind::OutOfRange }
    }

    /// Create an invalid id error for a retracted fact
    pub fn id_retracted(id: FactId) -> Self {
        Self::InvalidId { id, kind: InvalidIdKind::Retracted }
    }

    /// Create a sample size error
    pub fn sample_size_exceeded(requested: usize, available: usize) -> Self {
        Self::SampleSizeExceeded { requested, available }
    }

    /// Create an index corruption error
    pub fn index_corruption(detail: impl Into<String>) -> Self {
        Self::IndexCorruption { detail: detail.into() }
    }

    /// Create a serialization error
    pub fn serialization(detail: impl Into<String>) -> Self {
        Self::Serialization { detail: detail.into() }
    }

    /// Get the error category for logging and metrics
    pub fn category(&self) -> &'static str {
        match self {
            Self::ArityMismatch { .. } => "arity_mismatch",
            Self::UnknownField { .. } => "unknown_field",
            Self::InvalidId { .. } => "invalid_id",
            Self::EmptyResult => "empty_result",
            Self::SampleSizeExceeded { .. } => "sample_size_exceeded",
            Self::IndexCorruption { .. } => "index_corruption",
            Self::Serialization { .. } => "serialization",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_are_human_readable() {
        let err = FactBaseError::arity_mismatch(3, 2);
        assert_eq!(err.to_string(), "arity mismatch: expected 3 fields, got 2");

        let err = FactBaseError::unknown_field("colour");
        assert_eq!(
            err.to_string(),
            "colour is not defined as a field in this factbase"
        );

        let err = FactBaseError::id_retracted(1);
        assert_eq!(
            err.to_string(),
            "invalid fact id 1: the fact with this id was retracted"
        );
    }

    #[test]
    fn categories_cover_all_variants() {
        assert_eq!(FactBaseError::EmptyResult.category(), "empty_result");
        assert_eq!(
            FactBaseError::sample_size_exceeded(2, 1).category(),
            "sample_size_exceeded"
        );
        assert_eq!(
            FactBaseError::index_corruption("duplicate candidates").category(),
            "index_corruption"
        );
        assert_eq!(
            FactBaseError::serialization("bad json").category(),
            "serialization"
        );
        assert_eq!(FactBaseError::id_out_of_range(9).category(), "invalid_id");
    }
}
