//! BONE_DGS - per-frame bone/entity state (56 bytes, al8).
//!
//! ```text
//! offset  size  field
//!      0    12  pos      VEC3Df
//!     12    12  rot      VEC3Df
//!     24    12  size     VEC3Df   size.x == 0 -> not drawn
//!     36     4  lerp     float    recoil blend between pos and rot state
//!     40     8  tc       VEC4Du16
//!     48     4  afc_ft   animation frame count - 1 + frame time (16p8)
//!     52     4  afo_sai  animation frame offset + SPRITE_DPS index
//! ```
//!
//! The two trailing words have two documented arrangements, see
//! [`WordView`]. The view is part of the schema; the record itself does not
//! know which one it was packed with.

use bytemuck::{Pod, Zeroable};
use serde::{Deserialize, Serialize};

use super::{BufferCategory, GpuRecord};
use crate::channels::TextureChannels;
use crate::error::{EncodingRangeError, LayoutResult};
use crate::fixed_point::Q16_8;
use crate::layout::FieldLayout;
use crate::math::Vec3;
use crate::schema::{LayoutSchema, WordView};

/// Largest animation frame count (stored as count - 1 in one byte).
pub const MAX_FRAME_COUNT: u16 = 256;

/// A payload plus one byte sharing a 32-bit word.
#[derive(Clone, Copy)]
struct PackedWord {
    payload_shift: u32,
    payload_bits: u32,
    byte_shift: u32,
    reserved_mask: u32,
}

impl PackedWord {
    const fn payload_max(self) -> u32 {
        (1 << self.payload_bits) - 1
    }

    const fn pack(self, payload: u32, byte: u8, reserved: u32) -> u32 {
        ((payload & self.payload_max()) << self.payload_shift)
            | ((byte as u32) << self.byte_shift)
            | (reserved & self.reserved_mask)
    }

    const fn payload(self, word: u32) -> u32 {
        (word >> self.payload_shift) & self.payload_max()
    }

    #[allow(clippy::cast_possible_truncation)]
    const fn byte(self, word: u32) -> u8 {
        (word >> self.byte_shift) as u8
    }

    const fn reserved(self, word: u32) -> u32 {
        word & self.reserved_mask
    }
}

const fn timing_word(view: WordView) -> PackedWord {
    match view {
        // ft[3] then afc
        WordView::ByteFields => PackedWord {
            payload_shift: 0,
            payload_bits: 24,
            byte_shift: 24,
            reserved_mask: 0,
        },
        // 0-7 count, 8-31 frame time
        WordView::RawBits => PackedWord {
            payload_shift: 8,
            payload_bits: 24,
            byte_shift: 0,
            reserved_mask: 0,
        },
    }
}

const fn sprite_word(view: WordView) -> PackedWord {
    match view {
        // sai[3] (0-3 ???, 4-23 index) then afo
        WordView::ByteFields => PackedWord {
            payload_shift: 4,
            payload_bits: 20,
            byte_shift: 24,
            reserved_mask: 0x0000_000F,
        },
        // 0-7 offset, 8-11 ???, 12-31 sprite index
        WordView::RawBits => PackedWord {
            payload_shift: 12,
            payload_bits: 20,
            byte_shift: 0,
            reserved_mask: 0x0000_0F00,
        },
    }
}

/// Largest sprite index the view can address.
#[inline]
#[must_use]
pub const fn max_sprite_index(view: WordView) -> u32 {
    sprite_word(view).payload_max()
}

/// Unknown bits of the sprite word under `view`, in place.
#[inline]
#[must_use]
pub const fn bone_reserved_mask(view: WordView) -> u32 {
    sprite_word(view).reserved_mask
}

/// Packed bone state.
#[repr(C, align(8))]
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct BoneDgs {
    pos: [f32; 3],
    rot: [f32; 3],
    size: [f32; 3],
    lerp: f32,
    tc: [u16; 4],
    afc_ft: u32,
    afo_sai: u32,
}

const _: () = assert!(std::mem::size_of::<BoneDgs>() == 56);
const _: () = assert!(std::mem::align_of::<BoneDgs>() == 8);

impl BoneDgs {
    /// Animation timing word.
    #[inline]
    #[must_use]
    pub const fn afc_ft(&self) -> u32 {
        self.afc_ft
    }

    /// Sprite word.
    #[inline]
    #[must_use]
    pub const fn afo_sai(&self) -> u32 {
        self.afo_sai
    }

    /// False when `size.x` is zero.
    #[inline]
    #[must_use]
    pub fn is_drawn(&self) -> bool {
        self.size[0] != 0.0
    }
}

/// Animation fields packed into the two trailing words.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct AnimationState {
    /// Current frame time, 16p8 (0..=65535.996).
    pub frame_time: f32,
    /// Frames in the animation, 1..=256.
    pub frame_count: u16,
    /// First frame of the animation.
    pub frame_offset: u8,
    /// Index into the SPRITE_DPS buffer.
    pub sprite_index: u32,
}

impl Default for AnimationState {
    fn default() -> Self {
        Self {
            frame_time: 0.0,
            frame_count: 1,
            frame_offset: 0,
            sprite_index: 0,
        }
    }
}

/// Unpacked bone state.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct BonePose {
    /// Position.
    pub pos: Vec3,
    /// Rotation.
    pub rot: Vec3,
    /// Scale. `size.x == 0` hides the bone.
    pub size: Vec3,
    /// Recoil blend factor.
    #[serde(default)]
    pub lerp: f32,
    /// Texture channels for the active revision.
    #[serde(default)]
    pub tc: TextureChannels,
    /// Animation timing and sprite selection.
    #[serde(default)]
    pub animation: AnimationState,
    /// Unknown sprite-word bits, in place.
    #[serde(default)]
    pub reserved: u32,
}

impl Default for BonePose {
    fn default() -> Self {
        Self {
            pos: Vec3::ZERO,
            rot: Vec3::ZERO,
            size: Vec3::ONE,
            lerp: 0.0,
            tc: TextureChannels::default(),
            animation: AnimationState::default(),
            reserved: 0,
        }
    }
}

impl BonePose {
    /// False when the bone carries the not-drawn sentinel.
    #[inline]
    #[must_use]
    pub fn is_drawn(&self) -> bool {
        self.size.x != 0.0
    }

    /// Sets the not-drawn sentinel. The rest of the pose is kept.
    pub fn hide(&mut self) {
        self.size.x = 0.0;
    }
}

impl GpuRecord for BoneDgs {
    const NAME: &'static str = "BONE_DGS";
    const CATEGORY: BufferCategory = BufferCategory::Dynamic;
    const USES_WORD_VIEW: bool = true;

    type Value = BonePose;

    fn encode(value: &BonePose, schema: &LayoutSchema) -> LayoutResult<Self> {
        let anim = &value.animation;

        if !(1..=MAX_FRAME_COUNT).contains(&anim.frame_count) {
            return Err(EncodingRangeError::int(
                "frame_count",
                u64::from(anim.frame_count),
                1,
                u64::from(MAX_FRAME_COUNT),
            )
            .into());
        }
        let max_sprite = max_sprite_index(schema.word_view);
        if anim.sprite_index > max_sprite {
            return Err(EncodingRangeError::int(
                "sprite_index",
                u64::from(anim.sprite_index),
                0,
                u64::from(max_sprite),
            )
            .into());
        }
        let frame_time = Q16_8.encode("frame_time", anim.frame_time)?;

        #[allow(clippy::cast_possible_truncation)]
        let count_minus_one = (anim.frame_count - 1) as u8;

        Ok(Self {
            pos: value.pos.to_array(),
            rot: value.rot.to_array(),
            size: value.size.to_array(),
            lerp: value.lerp,
            tc: value.tc.lanes_for(schema.revision)?,
            afc_ft: timing_word(schema.word_view).pack(frame_time, count_minus_one, 0),
            afo_sai: sprite_word(schema.word_view).pack(
                anim.sprite_index,
                anim.frame_offset,
                value.reserved,
            ),
        })
    }

    fn decode(&self, schema: &LayoutSchema) -> BonePose {
        let timing = timing_word(schema.word_view);
        let sprite = sprite_word(schema.word_view);

        BonePose {
            pos: Vec3::from_array(self.pos),
            rot: Vec3::from_array(self.rot),
            size: Vec3::from_array(self.size),
            lerp: self.lerp,
            tc: TextureChannels::from_lanes(self.tc, schema.revision),
            animation: AnimationState {
                frame_time: Q16_8.decode(timing.payload(self.afc_ft)),
                frame_count: u16::from(timing.byte(self.afc_ft)) + 1,
                frame_offset: sprite.byte(self.afo_sai),
                sprite_index: sprite.payload(self.afo_sai),
            },
            reserved: sprite.reserved(self.afo_sai),
        }
    }

    fn fields(schema: &LayoutSchema) -> Vec<FieldLayout> {
        use std::mem::offset_of;

        let (timing, sprite) = match schema.word_view {
            WordView::ByteFields => (
                "ui32: 0-23 frame time 16p8, 24-31 frame count - 1",
                "ui32: 0-3 ???, 4-23 SPRITE_DPS index, 24-31 frame offset",
            ),
            WordView::RawBits => (
                "ui32: 0-7 frame count - 1, 8-31 frame time 16p8",
                "ui32: 0-7 frame offset, 8-11 ???, 12-31 SPRITE_DPS index",
            ),
        };
        vec![
            FieldLayout::new("pos", offset_of!(Self, pos), 12, "VEC3Df"),
            FieldLayout::new("rot", offset_of!(Self, rot), 12, "VEC3Df"),
            FieldLayout::new("size", offset_of!(Self, size), 12, "VEC3Df: x == 0 not drawn"),
            FieldLayout::new("lerp", offset_of!(Self, lerp), 4, "float"),
            FieldLayout::new("tc", offset_of!(Self, tc), 8, "VEC4Du16"),
            FieldLayout::new("afc_ft", offset_of!(Self, afc_ft), 4, timing),
            FieldLayout::new("afo_sai", offset_of!(Self, afo_sai), 4, sprite),
        ]
    }
}
