//! # Latest-Frame Slot
//!
//! Hand-off point between the producer and the uploader.
//!
//! The producer stores each published frame; the uploader clones whatever
//! is newest. Only the latest frame is kept; a frame the uploader never saw
//! is simply replaced.

use parking_lot::RwLock;

use shaderbuf_layout::GpuRecord;

use crate::dynamic::PublishedFrame;
use crate::error::{BufferError, BufferResult};

/// Shared mailbox holding the most recent published frame.
///
/// ## Usage
///
/// ```rust,ignore
/// let slot = Arc::new(FrameSlot::<BoneDgs>::new());
///
/// // Producer
/// slot.store(bones.publish())?;
///
/// // Uploader
/// if let Some(frame) = slot.latest() {
///     queue.write_buffer(&gpu_bones, 0, frame.as_bytes());
/// }
/// ```
#[derive(Debug)]
pub struct FrameSlot<R: GpuRecord> {
    latest: RwLock<Option<PublishedFrame<R>>>,
}

impl<R: GpuRecord> Default for FrameSlot<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: GpuRecord> FrameSlot<R> {
    /// Creates an empty slot.
    #[must_use]
    pub fn new() -> Self {
        Self {
            latest: RwLock::new(None),
        }
    }

    /// Replaces the held frame.
    ///
    /// # Errors
    ///
    /// Returns `BufferError::StaleFrame` if `frame` is older than the held
    /// frame. The held frame is kept.
    pub fn store(&self, frame: PublishedFrame<R>) -> BufferResult<()> {
        let mut latest = self.latest.write();
        if let Some(current) = latest.as_ref() {
            if frame.frame() < current.frame() {
                tracing::warn!(
                    record = R::NAME,
                    offered = frame.frame(),
                    current = current.frame(),
                    "stale frame rejected"
                );
                return Err(BufferError::StaleFrame {
                    offered: frame.frame(),
                    current: current.frame(),
                });
            }
        }
        *latest = Some(frame);
        Ok(())
    }

    /// Newest frame, if any. Shares storage with the slot.
    #[must_use]
    pub fn latest(&self) -> Option<PublishedFrame<R>> {
        self.latest.read().clone()
    }

    /// Frame number of the held frame.
    #[must_use]
    pub fn frame(&self) -> Option<u64> {
        self.latest.read().as_ref().map(PublishedFrame::frame)
    }

    /// Removes and returns the held frame.
    pub fn take(&self) -> Option<PublishedFrame<R>> {
        self.latest.write().take()
    }
}
