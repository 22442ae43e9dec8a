//! # Layout Error Types
//!
//! All errors that can occur while packing or interpreting GPU records.
//!
//! Reserved bits never produce an error. They are passed through untouched.

use std::fmt;

use thiserror::Error;

use crate::schema::{SchemaRevision, WordView};

/// A semantic value does not fit the bit width allotted to it.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("{field} = {value} does not fit its encoding (valid range {min}..={max})")]
pub struct EncodingRangeError {
    /// Field that was being encoded.
    pub field: &'static str,
    /// The rejected value.
    pub value: f64,
    /// Smallest encodable value.
    pub min: f64,
    /// Largest encodable value.
    pub max: f64,
}

impl EncodingRangeError {
    /// Creates a range error for an integer field.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn int(field: &'static str, value: u64, min: u64, max: u64) -> Self {
        Self {
            field,
            value: value as f64,
            min: min as f64,
            max: max as f64,
        }
    }
}

/// A record was encoded for one schema revision and read with another.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("schema mismatch: expected revision {expected}, found revision {found}")]
pub struct SchemaMismatchError {
    /// Revision the caller asked for.
    pub expected: SchemaRevision,
    /// Revision the data actually carries.
    pub found: SchemaRevision,
}

/// Errors that can occur in the layout layer.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LayoutError {
    /// Value outside its bit width.
    #[error(transparent)]
    EncodingRange(#[from] EncodingRangeError),

    /// Producer and consumer disagree on the schema revision.
    #[error(transparent)]
    SchemaMismatch(#[from] SchemaMismatchError),

    /// Producer and consumer disagree on the BONE_DGS word arrangement.
    #[error("word view mismatch: expected {expected:?}, found {found:?}")]
    WordViewMismatch {
        /// View the caller asked for.
        expected: WordView,
        /// View the data was packed with.
        found: WordView,
    },

    /// Byte span handed to a decoder has the wrong length.
    #[error("{record}: expected {expected} bytes, got {actual}")]
    SpanLength {
        /// Record type name.
        record: &'static str,
        /// Exact record size.
        expected: usize,
        /// Length of the span that was passed.
        actual: usize,
    },

    /// Invalid schema configuration.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

impl LayoutError {
    /// Wraps any displayable config failure.
    pub(crate) fn config(err: impl fmt::Display) -> Self {
        Self::InvalidConfig(err.to_string())
    }
}

/// Result type for layout operations.
pub type LayoutResult<T> = Result<T, LayoutError>;
