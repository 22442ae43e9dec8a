//! # Dynamic Buffers
//!
//! Rewritten every frame by a single producer, read by the GPU after an
//! explicit publish point.
//!
//! ```text
//!  update phase                    publish                upload
//! ┌──────────────┐  write()   ┌───────────────┐  copy  ┌─────────────────┐
//! │ FrameWriter  │──────────► │ DynamicBuffer │ ─────► │ PublishedFrame  │
//! │ (&mut borrow)│            │   Vec<R>      │        │ Arc<[R]>, frozen │
//! └──────────────┘            └───────────────┘        └─────────────────┘
//! ```
//!
//! The writer borrows the buffer mutably, so a frame cannot be published
//! while it is still being written. Published frames own their copy; the
//! producer can start the next frame immediately.

use std::io::Write;
use std::sync::Arc;

use shaderbuf_layout::{GpuRecord, LayoutSchema};

use crate::error::{BufferError, BufferResult};

/// Per-frame record array owned by the producer.
#[derive(Debug)]
pub struct DynamicBuffer<R: GpuRecord> {
    schema: LayoutSchema,
    records: Vec<R>,
    /// Number of the next frame to be published.
    frame: u64,
}

impl<R: GpuRecord> DynamicBuffer<R> {
    /// Creates a buffer of `len` zeroed records.
    #[must_use]
    pub fn new(schema: LayoutSchema, len: usize) -> Self {
        Self {
            schema,
            records: vec![R::zeroed(); len],
            frame: 0,
        }
    }

    /// Schema every frame is packed with.
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

    /// Number the next published frame will carry.
    #[inline]
    #[must_use]
    pub fn next_frame(&self) -> u64 {
        self.frame
    }

    /// Grows or shrinks the buffer. New records are zeroed.
    pub fn resize(&mut self, len: usize) {
        self.records.resize(len, R::zeroed());
    }

    /// Current records, including writes not yet published.
    #[inline]
    #[must_use]
    pub fn records(&self) -> &[R] {
        &self.records
    }

    /// Starts writing the next frame.
    ///
    /// Records keep their previous contents until overwritten.
    #[must_use]
    pub fn begin_frame(&mut self) -> FrameWriter<'_, R> {
        FrameWriter { buffer: self }
    }

    /// Freezes a copy of the current records as the next frame.
    pub fn publish(&mut self) -> PublishedFrame<R> {
        let frame = self.frame;
        self.frame += 1;

        tracing::debug!(
            record = R::NAME,
            frame,
            count = self.records.len(),
            bytes = self.records.len() * R::SIZE,
            "frame published"
        );

        PublishedFrame {
            frame,
            schema: self.schema,
            records: Arc::from(self.records.as_slice()),
        }
    }
}

/// Exclusive write access to a [`DynamicBuffer`] for one frame.
#[derive(Debug)]
pub struct FrameWriter<'a, R: GpuRecord> {
    buffer: &'a mut DynamicBuffer<R>,
}

impl<R: GpuRecord> FrameWriter<'_, R> {
    /// Number of records.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.buffer.records.len()
    }

    /// True if the buffer holds no records.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.buffer.records.is_empty()
    }

    /// Frame number being written.
    #[inline]
    #[must_use]
    pub fn frame(&self) -> u64 {
        self.buffer.frame
    }

    /// Packs `value` into slot `index`.
    ///
    /// # Errors
    ///
    /// `BufferError::IndexOutOfRange` past the end, or the record's encoding
    /// error. The slot is left untouched on failure.
    pub fn write(&mut self, index: usize, value: &R::Value) -> BufferResult<()> {
        let record = R::encode(value, &self.buffer.schema)?;
        self.write_raw(index, record)
    }

    /// Stores an already packed record in slot `index`.
    ///
    /// # Errors
    ///
    /// `BufferError::IndexOutOfRange` past the end.
    pub fn write_raw(&mut self, index: usize, record: R) -> BufferResult<()> {
        let len = self.buffer.records.len();
        let slot = self
            .buffer
            .records
            .get_mut(index)
            .ok_or(BufferError::IndexOutOfRange {
                record: R::NAME,
                index,
                len,
            })?;
        *slot = record;
        Ok(())
    }

    /// Unpacks the record currently in slot `index`.
    ///
    /// # Errors
    ///
    /// `BufferError::IndexOutOfRange` past the end.
    pub fn read(&self, index: usize) -> BufferResult<R::Value> {
        self.buffer
            .records
            .get(index)
            .map(|r| r.decode(&self.buffer.schema))
            .ok_or(BufferError::IndexOutOfRange {
                record: R::NAME,
                index,
                len: self.buffer.records.len(),
            })
    }

    /// Zeroes every record.
    pub fn clear(&mut self) {
        self.buffer.records.fill(R::zeroed());
    }
}

/// One frame of records, frozen at its publish point.
///
/// Cloning shares the storage.
#[derive(Debug)]
pub struct PublishedFrame<R: GpuRecord> {
    frame: u64,
    schema: LayoutSchema,
    records: Arc<[R]>,
}

impl<R: GpuRecord> Clone for PublishedFrame<R> {
    fn clone(&self) -> Self {
        Self {
            frame: self.frame,
            schema: self.schema,
            records: Arc::clone(&self.records),
        }
    }
}

impl<R: GpuRecord> PublishedFrame<R> {
    /// Frame number, counted from zero per buffer.
    #[inline]
    #[must_use]
    pub fn frame(&self) -> u64 {
        self.frame
    }

    /// Schema the frame was packed with.
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

    /// True if the frame holds no records.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Packed records.
    #[inline]
    #[must_use]
    pub fn records(&self) -> &[R] {
        &self.records
    }

    /// The frame exactly as uploaded.
    #[inline]
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(self.records())
    }

    /// Writes the frame bytes to `out`.
    ///
    /// # Errors
    ///
    /// Returns `BufferError::Io` if the write fails.
    pub fn write_to(&self, mut out: impl Write) -> BufferResult<()> {
        out.write_all(self.as_bytes())?;
        Ok(())
    }

    /// Fails unless the frame was packed with `expected`. The word view is
    /// only compared for records whose bytes depend on it.
    ///
    /// # Errors
    ///
    /// `LayoutError::SchemaMismatch` or `LayoutError::WordViewMismatch`.
    pub fn check_schema(&self, expected: &LayoutSchema) -> BufferResult<()> {
        expected.expect_bytes(&self.schema, R::USES_WORD_VIEW).map_err(|err| {
            tracing::warn!(
                record = R::NAME,
                frame = self.frame,
                %err,
                "published frame read with the wrong schema"
            );
            BufferError::from(err)
        })
    }

    /// Unpacks record `index` for a consumer running `expected`.
    ///
    /// # Errors
    ///
    /// A schema mismatch, or `BufferError::IndexOutOfRange` past the end.
    pub fn decode(&self, expected: &LayoutSchema, index: usize) -> BufferResult<R::Value> {
        self.check_schema(expected)?;
        self.records
            .get(index)
            .map(|r| r.decode(&self.schema))
            .ok_or(BufferError::IndexOutOfRange {
                record: R::NAME,
                index,
                len: self.records.len(),
            })
    }

    /// Unpacks every record for a consumer running `expected`.
    ///
    /// # Errors
    ///
    /// A schema mismatch.
    pub fn decode_all(&self, expected: &LayoutSchema) -> BufferResult<Vec<R::Value>> {
        self.check_schema(expected)?;
        Ok(self.records.iter().map(|r| r.decode(&self.schema)).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytemuck::Zeroable;
    use shaderbuf_layout::{
        BoneDgs, BonePose, LayoutError, SchemaRevision, SpriteDps, SpriteModifier, Vec3, WordView,
    };

    fn bones(len: usize) -> DynamicBuffer<BoneDgs> {
        DynamicBuffer::new(LayoutSchema::default(), len)
    }

    #[test]
    fn test_write_and_publish() {
        let mut buffer = bones(4);
        let pose = BonePose {
            pos: Vec3::new(1.0, 2.0, 3.0),
            ..BonePose::default()
        };

        {
            let mut writer = buffer.begin_frame();
            assert_eq!(writer.frame(), 0);
            writer.write(2, &pose).unwrap();
            assert_eq!(writer.read(2).unwrap(), pose);
        }

        let frame = buffer.publish();
        assert_eq!(frame.frame(), 0);
        assert_eq!(frame.len(), 4);
        assert_eq!(frame.as_bytes().len(), 4 * 56);
        assert_eq!(frame.decode(&LayoutSchema::default(), 2).unwrap(), pose);
        assert_eq!(buffer.next_frame(), 1);
    }

    #[test]
    fn test_published_frame_is_frozen() {
        let mut buffer = bones(1);
        let first = buffer.publish();

        let mut hidden = BonePose::default();
        hidden.hide();
        buffer.begin_frame().write(0, &hidden).unwrap();
        let second = buffer.publish();

        let schema = LayoutSchema::default();
        assert!(first.records()[0] == BoneDgs::zeroed());
        assert!(!second.decode(&schema, 0).unwrap().is_drawn());
        assert_eq!(second.frame(), 1);
    }

    #[test]
    fn test_write_out_of_range() {
        let mut buffer = bones(2);
        let err = buffer.begin_frame().write(2, &BonePose::default()).unwrap_err();
        assert!(matches!(
            err,
            BufferError::IndexOutOfRange {
                record: "BONE_DGS",
                index: 2,
                len: 2
            }
        ));
    }

    #[test]
    fn test_failed_write_leaves_slot() {
        let mut buffer = bones(1);
        let mut writer = buffer.begin_frame();
        writer.write(0, &BonePose::default()).unwrap();

        let mut bad = BonePose::default();
        bad.animation.frame_count = 0;
        assert!(matches!(
            writer.write(0, &bad),
            Err(BufferError::Layout(LayoutError::EncodingRange(_)))
        ));
        assert_eq!(writer.read(0).unwrap(), BonePose::default());
    }

    #[test]
    fn test_decode_rejects_other_schema() {
        let schema_b = LayoutSchema::new(SchemaRevision::B, WordView::ByteFields);
        let mut sprites = DynamicBuffer::<SpriteDps>::new(schema_b, 1);
        sprites
            .begin_frame()
            .write(0, &SpriteModifier::neutral(SchemaRevision::B))
            .unwrap();
        let frame = sprites.publish();

        let err = frame.decode(&LayoutSchema::default(), 0).unwrap_err();
        assert!(err.is_schema_mismatch());
        assert!(frame.decode_all(&LayoutSchema::default()).is_err());
        assert_eq!(frame.decode_all(&schema_b).unwrap().len(), 1);

        // Sprite bytes do not depend on the word view.
        let raw_bits = LayoutSchema::new(SchemaRevision::B, WordView::RawBits);
        assert!(frame.check_schema(&raw_bits).is_ok());
        assert_eq!(frame.decode_all(&raw_bits).unwrap().len(), 1);
    }

    #[test]
    fn test_bone_frame_checks_word_view() {
        let mut buffer = bones(1);
        let frame = buffer.publish();
        let raw_bits = LayoutSchema::new(SchemaRevision::A, WordView::RawBits);
        assert!(matches!(
            frame.check_schema(&raw_bits),
            Err(BufferError::Layout(LayoutError::WordViewMismatch { .. }))
        ));
    }

    #[test]
    fn test_clear_and_resize() {
        let mut buffer = bones(1);
        buffer.begin_frame().write(0, &BonePose::default()).unwrap();
        buffer.resize(3);
        assert_eq!(buffer.len(), 3);
        assert!(buffer.records()[2] == BoneDgs::zeroed());

        buffer.begin_frame().clear();
        assert!(buffer.records().iter().all(|r| *r == BoneDgs::zeroed()));
    }
}
