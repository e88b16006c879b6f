//! Error types for snapshot loading and branch skipping.
//!
//! Flattening is best-effort: a branch that does not have the expected
//! shape is not an error for the caller, it is a [`SkipReason`] recorded
//! next to the records that were produced.

use serde::Serialize;
use thiserror::Error;

/// Why a branch of the nested snapshot produced no records.
///
/// `UnresolvableDate` is the exception: the sample is kept, and the reason
/// only marks that it is missing from date-ordered views.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum SkipReason {
    #[error("branch is null")]
    Null,

    #[error("expected an object")]
    NotAnObject,

    #[error("expected an array")]
    NotAnArray,

    #[error("year key is not an integer")]
    InvalidYear,

    #[error("depth key is not a finite number")]
    InvalidDepth,

    #[error("no calendar date could be resolved")]
    UnresolvableDate,

    #[error("no relevant numeric field")]
    NoNumericFields,
}

/// Errors raised while loading a snapshot from text.
#[derive(Error, Debug)]
pub enum SnapshotError {
    #[error("invalid snapshot JSON: {0}")]
    Json(#[from] serde_json::Error),
}
