//! # GPU Records
//!
//! One module per structured-buffer element type.
//!
//! | Record | Size | Align | Buffer |
//! |---|---|---|---|
//! | [`ObjectIgs`] | 4 | 4 | immutable, predefined object headers |
//! | [`PartIgs`] | 68 | 4 | immutable, predefined object parts |
//! | [`BoneDgs`] | 56 | 8 | dynamic, entity bone states |
//! | [`SpriteDps`] | 16 | 16 | dynamic, sprite modifiers |
//!
//! Each record is a `Pod` type whose in-memory bytes are exactly what the
//! shader reads. Semantic values go in through [`GpuRecord::encode`] and come
//! out through [`GpuRecord::decode`]; the packed words are never exposed as
//! public fields.

pub mod bone;
pub mod object;
pub mod part;
pub mod sprite;

pub use bone::{BoneDgs, BonePose};
pub use object::{ObjectHeader, ObjectIgs};
pub use part::{PartDesc, PartIgs, PartShape};
pub use sprite::{SpriteDps, SpriteModifier};

use bytemuck::{Pod, Zeroable};

use crate::error::{LayoutError, LayoutResult};
use crate::layout::FieldLayout;
use crate::schema::LayoutSchema;

/// How often a buffer of this record is rewritten.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BufferCategory {
    /// Written once at load, read-only afterwards.
    Immutable,
    /// Rewritten every frame by the simulation.
    Dynamic,
}

/// A structured-buffer element with a fixed, shader-visible layout.
///
/// # Example
///
/// ```rust,ignore
/// let schema = LayoutSchema::default();
/// let header = ObjectHeader::new(7, 4);
/// let record = ObjectIgs::encode(&header, &schema)?;
/// assert_eq!(record.decode(&schema), header);
/// ```
pub trait GpuRecord: Pod + Zeroable + Send + Sync + 'static {
    /// Shader-side type name.
    const NAME: &'static str;

    /// Buffer category this record lives in.
    const CATEGORY: BufferCategory;

    /// Exact byte size (also the array stride).
    const SIZE: usize = std::mem::size_of::<Self>();

    /// Required alignment of every element.
    const ALIGN: usize = std::mem::align_of::<Self>();

    /// True if the packed bytes depend on [`LayoutSchema::word_view`].
    const USES_WORD_VIEW: bool = false;

    /// Unpacked, semantic form of the record.
    type Value;

    /// Packs a semantic value for `schema`.
    ///
    /// # Errors
    ///
    /// `LayoutError::EncodingRange` if a value exceeds its bit width,
    /// `LayoutError::SchemaMismatch` if the value is tagged with another revision.
    fn encode(value: &Self::Value, schema: &LayoutSchema) -> LayoutResult<Self>;

    /// Unpacks the record as `schema` describes it. Reserved bits are carried along.
    fn decode(&self, schema: &LayoutSchema) -> Self::Value;

    /// Field table in offset order under `schema`.
    fn fields(schema: &LayoutSchema) -> Vec<FieldLayout>;

    /// Reads a record from a span of exactly [`Self::SIZE`] bytes.
    ///
    /// The span does not need to be aligned.
    ///
    /// # Errors
    ///
    /// Returns `LayoutError::SpanLength` if the span has the wrong length.
    fn from_bytes(bytes: &[u8]) -> LayoutResult<Self> {
        if bytes.len() != Self::SIZE {
            return Err(LayoutError::SpanLength {
                record: Self::NAME,
                expected: Self::SIZE,
                actual: bytes.len(),
            });
        }
        Ok(bytemuck::pod_read_unaligned(bytes))
    }

    /// The record's bytes as the shader sees them.
    fn as_bytes(&self) -> &[u8] {
        bytemuck::bytes_of(self)
    }

    /// Reads and unpacks a record in one step.
    ///
    /// # Errors
    ///
    /// Same as [`GpuRecord::from_bytes`].
    fn decode_bytes(bytes: &[u8], schema: &LayoutSchema) -> LayoutResult<Self::Value> {
        Ok(Self::from_bytes(bytes)?.decode(schema))
    }
}
