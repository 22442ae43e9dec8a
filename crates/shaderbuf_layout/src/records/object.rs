//! OBJECT_IGS - predefined object header (4 bytes, al4).
//!
//! ```text
//!  31              16 15         5 4       0
//! ┌──────────────────┬────────────┬─────────┐
//! │ parent PART_IGS  │    ???     │ quads-1 │
//! └──────────────────┴────────────┴─────────┘
//! ```
//!
//! The 16-bit halves are also addressable on their own: the high half is the
//! parent index (`ppi`), the low half is the quad-count field (`qc`).

use bytemuck::{Pod, Zeroable};
use serde::{Deserialize, Serialize};

use super::{BufferCategory, GpuRecord};
use crate::error::{EncodingRangeError, LayoutResult};
use crate::layout::FieldLayout;
use crate::schema::LayoutSchema;

/// Largest quad count an object can carry.
pub const MAX_QUADS: u8 = 32;

const QUAD_MASK: u32 = 0x0000_001F;
const PARENT_SHIFT: u32 = 16;

/// Unknown bits 5-15.
pub const OBJECT_RESERVED_MASK: u32 = 0x0000_FFE0;

/// Packed object header.
#[repr(C, align(4))]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Pod, Zeroable)]
pub struct ObjectIgs {
    bits: u32,
}

const _: () = assert!(std::mem::size_of::<ObjectIgs>() == 4);
const _: () = assert!(std::mem::align_of::<ObjectIgs>() == 4);

impl ObjectIgs {
    /// Packs a header with zeroed reserved bits.
    ///
    /// # Errors
    ///
    /// Returns [`EncodingRangeError`] unless `quad_count` is 1..=32.
    pub fn pack(parent_part_index: u16, quad_count: u8) -> Result<Self, EncodingRangeError> {
        if !(1..=MAX_QUADS).contains(&quad_count) {
            return Err(EncodingRangeError::int(
                "quad_count",
                u64::from(quad_count),
                1,
                u64::from(MAX_QUADS),
            ));
        }
        let quads_minus_one = u32::from(quad_count - 1);
        Ok(Self {
            bits: (u32::from(parent_part_index) << PARENT_SHIFT) | (quads_minus_one & QUAD_MASK),
        })
    }

    /// Wraps a raw 32-bit value.
    #[inline]
    #[must_use]
    pub const fn from_bits(bits: u32) -> Self {
        Self { bits }
    }

    /// Whole-word view.
    #[inline]
    #[must_use]
    pub const fn bits(self) -> u32 {
        self.bits
    }

    /// High half: parent PART_IGS index.
    #[inline]
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub const fn ppi(self) -> u16 {
        (self.bits >> PARENT_SHIFT) as u16
    }

    /// Low half: quad count - 1 plus the unknown bits above it.
    #[inline]
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub const fn qc(self) -> u16 {
        self.bits as u16
    }

    /// Quad count - 1 (bits 0-4).
    #[inline]
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub const fn quad_count_minus_one(self) -> u8 {
        (self.bits & QUAD_MASK) as u8
    }

    /// Number of quads (1..=32).
    #[inline]
    #[must_use]
    pub const fn quad_count(self) -> u8 {
        self.quad_count_minus_one() + 1
    }

    /// Unknown bits, in place.
    #[inline]
    #[must_use]
    pub const fn reserved(self) -> u32 {
        self.bits & OBJECT_RESERVED_MASK
    }

    /// Replaces the unknown bits. Bits outside the reserved range are ignored.
    #[inline]
    #[must_use]
    pub const fn with_reserved(self, reserved: u32) -> Self {
        Self {
            bits: (self.bits & !OBJECT_RESERVED_MASK) | (reserved & OBJECT_RESERVED_MASK),
        }
    }
}

/// Unpacked object header.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ObjectHeader {
    /// Index into the PART_IGS buffer. Not range-checked here.
    pub parent_part_index: u16,
    /// Number of quads, 1..=32.
    pub quad_count: u8,
    /// Unknown bits 5-15, passed through in place.
    #[serde(default)]
    pub reserved: u32,
}

impl ObjectHeader {
    /// Creates a header with zeroed reserved bits.
    #[must_use]
    pub const fn new(parent_part_index: u16, quad_count: u8) -> Self {
        Self {
            parent_part_index,
            quad_count,
            reserved: 0,
        }
    }
}

impl GpuRecord for ObjectIgs {
    const NAME: &'static str = "OBJECT_IGS";
    const CATEGORY: BufferCategory = BufferCategory::Immutable;

    type Value = ObjectHeader;

    fn encode(value: &ObjectHeader, _schema: &LayoutSchema) -> LayoutResult<Self> {
        Ok(Self::pack(value.parent_part_index, value.quad_count)?.with_reserved(value.reserved))
    }

    fn decode(&self, _schema: &LayoutSchema) -> ObjectHeader {
        ObjectHeader {
            parent_part_index: self.ppi(),
            quad_count: self.quad_count(),
            reserved: self.reserved(),
        }
    }

    fn fields(_schema: &LayoutSchema) -> Vec<FieldLayout> {
        vec![
            FieldLayout::new("qc", 0, 2, "ui16: 0-4 quad count - 1, 5-15 ???"),
            FieldLayout::new("ppi", 2, 2, "ui16: parent PART_IGS index"),
        ]
    }
}
