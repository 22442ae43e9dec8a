//! # Immutable Buffers
//!
//! Written once at load, read-only afterwards.
//!
//! ```text
//!  ImmutableBufferBuilder ──push()──► Vec<R> ──build()──► Arc<[R]>
//!                                                         │
//!                                     clone() is an Arc bump
//! ```

use std::io::Write;
use std::sync::Arc;

use shaderbuf_layout::{GpuRecord, LayoutError, LayoutSchema};

use crate::error::{BufferError, BufferResult};

/// Collects records before the buffer is frozen.
#[derive(Debug)]
pub struct ImmutableBufferBuilder<R: GpuRecord> {
    schema: LayoutSchema,
    records: Vec<R>,
}

impl<R: GpuRecord> ImmutableBufferBuilder<R> {
    /// Creates an empty builder for `schema`.
    #[must_use]
    pub fn new(schema: LayoutSchema) -> Self {
        Self::with_capacity(schema, 0)
    }

    /// Creates an empty builder with room for `capacity` records.
    #[must_use]
    pub fn with_capacity(schema: LayoutSchema, capacity: usize) -> Self {
        Self {
            schema,
            records: Vec::with_capacity(capacity),
        }
    }

    /// Packs and appends a record. Returns its index.
    ///
    /// # Errors
    ///
    /// Returns the record's encoding error. Nothing is appended on failure.
    pub fn push(&mut self, value: &R::Value) -> BufferResult<usize> {
        let record = R::encode(value, &self.schema)?;
        Ok(self.push_raw(record))
    }

    /// Appends an already packed record. Returns its index.
    pub fn push_raw(&mut self, record: R) -> usize {
        self.records.push(record);
        self.records.len() - 1
    }

    /// Packs and appends every value.
    ///
    /// # Errors
    ///
    /// Stops at the first value that fails to encode.
    pub fn extend<'a, I>(&mut self, values: I) -> BufferResult<()>
    where
        I: IntoIterator<Item = &'a R::Value>,
        R::Value: 'a,
    {
        for value in values {
            self.push(value)?;
        }
        Ok(())
    }

    /// Records pushed so far.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// True if nothing was pushed.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Freezes the records.
    #[must_use]
    pub fn build(self) -> ImmutableBuffer<R> {
        tracing::debug!(
            record = R::NAME,
            count = self.records.len(),
            "immutable buffer built"
        );
        ImmutableBuffer {
            schema: self.schema,
            records: self.records.into(),
        }
    }
}

/// Frozen record array. Cloning shares the storage.
#[derive(Debug, Clone)]
pub struct ImmutableBuffer<R: GpuRecord> {
    schema: LayoutSchema,
    records: Arc<[R]>,
}

impl<R: GpuRecord> ImmutableBuffer<R> {
    /// Reads a buffer back from its GPU bytes.
    ///
    /// # Errors
    ///
    /// Returns `LayoutError::SpanLength` if `bytes` is not a whole number of records.
    pub fn from_bytes(bytes: &[u8], schema: LayoutSchema) -> BufferResult<Self> {
        if bytes.len() % R::SIZE != 0 {
            return Err(LayoutError::SpanLength {
                record: R::NAME,
                expected: bytes.len() - bytes.len() % R::SIZE,
                actual: bytes.len(),
            }
            .into());
        }
        let records = bytes
            .chunks_exact(R::SIZE)
            .map(bytemuck::pod_read_unaligned)
            .collect();
        Ok(Self { schema, records })
    }

    /// Schema the records were packed with.
    #[inline]
    #[must_use]
    pub fn schema(&self) -> &LayoutSchema {
        &self.schema
    }

    /// Number of records.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// True if the buffer holds no records.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Packed record at `index`.
    ///
    /// # Errors
    ///
    /// Returns `BufferError::IndexOutOfRange` past the end.
    pub fn get(&self, index: usize) -> BufferResult<&R> {
        self.records.get(index).ok_or(BufferError::IndexOutOfRange {
            record: R::NAME,
            index,
            len: self.records.len(),
        })
    }

    /// Unpacked record at `index`.
    ///
    /// # Errors
    ///
    /// Returns `BufferError::IndexOutOfRange` past the end.
    pub fn decode(&self, index: usize) -> BufferResult<R::Value> {
        Ok(self.get(index)?.decode(&self.schema))
    }

    /// All records.
    #[inline]
    #[must_use]
    pub fn records(&self) -> &[R] {
        &self.records
    }

    /// The buffer exactly as uploaded.
    #[inline]
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(self.records())
    }

    /// Writes the buffer bytes to `out`.
    ///
    /// # Errors
    ///
    /// Returns `BufferError::Io` if the write fails.
    pub fn write_to(&self, mut out: impl Write) -> BufferResult<()> {
        out.write_all(self.as_bytes())?;
        Ok(())
    }
}
