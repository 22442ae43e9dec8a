//! # Buffer Error Types

use shaderbuf_layout::LayoutError;
use thiserror::Error;

/// Errors that can occur while building, writing or publishing buffers.
#[derive(Error, Debug)]
pub enum BufferError {
    /// Packing, decoding or schema failure in a record.
    #[error(transparent)]
    Layout(#[from] LayoutError),

    /// Record index past the end of the buffer.
    #[error("{record} index {index} out of range (len {len})")]
    IndexOutOfRange {
        /// Record type name.
        record: &'static str,
        /// Requested index.
        index: usize,
        /// Buffer length.
        len: usize,
    },

    /// A frame older than the one already held was offered.
    #[error("stale frame {offered}: slot already holds frame {current}")]
    StaleFrame {
        /// Frame number offered.
        offered: u64,
        /// Frame number currently held.
        current: u64,
    },

    /// Reading a fixture or writing buffer bytes failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl BufferError {
    /// True if the error is a schema revision or word view disagreement.
    #[must_use]
    pub fn is_schema_mismatch(&self) -> bool {
        matches!(
            self,
            Self::Layout(LayoutError::SchemaMismatch(_) | LayoutError::WordViewMismatch { .. })
        )
    }
}

/// Result type for buffer operations.
pub type BufferResult<T> = Result<T, BufferError>;
