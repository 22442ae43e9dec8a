//! PART_IGS - static geometry of one renderable part (68 bytes, al4).
//!
//! ```text
//! offset  size  field
//!      0    12  pos    VEC3Df  relative to parent
//!     12    12  rot    VEC3Df  relative to parent
//!     24     8  size   VEC2Df  relative to parent
//!     32    24  trans  VEC6Df  max slide xyz, max rotation xyz
//!     56     4  bits   ui32    0 = shape (quad/tri), 1 = billboard, 2-31 = ???
//!     60     8  tc     VEC4Du16 texture channels (revision dependent)
//! ```

use bytemuck::{Pod, Zeroable};
use serde::{Deserialize, Serialize};

use super::{BufferCategory, GpuRecord};
use crate::channels::TextureChannels;
use crate::error::LayoutResult;
use crate::layout::FieldLayout;
use crate::math::{TransformBounds, Vec2, Vec3};
use crate::schema::{LayoutSchema, SchemaRevision};

const SHAPE_BIT: u32 = 1 << 0;
const BILLBOARD_BIT: u32 = 1 << 1;

/// Unknown bits 2-31 of the flags word.
pub const PART_RESERVED_MASK: u32 = !(SHAPE_BIT | BILLBOARD_BIT);

/// Primitive a part is drawn with.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[repr(u8)]
pub enum PartShape {
    /// Two triangles.
    #[default]
    Quad = 0,
    /// One triangle.
    Triangle = 1,
}

/// Packed part description.
#[repr(C, align(4))]
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct PartIgs {
    pos: [f32; 3],
    rot: [f32; 3],
    size: [f32; 2],
    trans: [f32; 6],
    bits: u32,
    tc: [u16; 4],
}

const _: () = assert!(std::mem::size_of::<PartIgs>() == 68);
const _: () = assert!(std::mem::align_of::<PartIgs>() == 4);

impl PartIgs {
    /// Flags word.
    #[inline]
    #[must_use]
    pub const fn bits(&self) -> u32 {
        self.bits
    }

    /// Raw texture-channel lanes.
    #[inline]
    #[must_use]
    pub const fn tc(&self) -> [u16; 4] {
        self.tc
    }

    /// Shape selector (bit 0).
    #[inline]
    #[must_use]
    pub const fn shape(&self) -> PartShape {
        if self.bits & SHAPE_BIT == 0 {
            PartShape::Quad
        } else {
            PartShape::Triangle
        }
    }

    /// Billboard flag (bit 1).
    #[inline]
    #[must_use]
    pub const fn is_billboard(&self) -> bool {
        self.bits & BILLBOARD_BIT != 0
    }
}

/// Unpacked part description.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PartDesc {
    /// Position relative to parent.
    pub pos: Vec3,
    /// Rotation relative to parent.
    pub rot: Vec3,
    /// Size relative to parent.
    pub size: Vec2,
    /// Maximum transformation.
    #[serde(default)]
    pub trans: TransformBounds,
    /// Primitive shape.
    #[serde(default)]
    pub shape: PartShape,
    /// Always faces the camera.
    #[serde(default)]
    pub billboard: bool,
    /// Texture channels for the active revision.
    #[serde(default)]
    pub tc: TextureChannels,
    /// Unknown flag bits 2-31, passed through in place.
    #[serde(default)]
    pub reserved: u32,
}

impl GpuRecord for PartIgs {
    const NAME: &'static str = "PART_IGS";
    const CATEGORY: BufferCategory = BufferCategory::Immutable;

    type Value = PartDesc;

    fn encode(value: &PartDesc, schema: &LayoutSchema) -> LayoutResult<Self> {
        let mut bits = value.reserved & PART_RESERVED_MASK;
        if value.shape == PartShape::Triangle {
            bits |= SHAPE_BIT;
        }
        if value.billboard {
            bits |= BILLBOARD_BIT;
        }

        Ok(Self {
            pos: value.pos.to_array(),
            rot: value.rot.to_array(),
            size: value.size.to_array(),
            trans: value.trans.to_array(),
            bits,
            tc: value.tc.lanes_for(schema.revision)?,
        })
    }

    fn decode(&self, schema: &LayoutSchema) -> PartDesc {
        PartDesc {
            pos: Vec3::from_array(self.pos),
            rot: Vec3::from_array(self.rot),
            size: Vec2::from_array(self.size),
            trans: TransformBounds::from_array(self.trans),
            shape: self.shape(),
            billboard: self.is_billboard(),
            tc: TextureChannels::from_lanes(self.tc, schema.revision),
            reserved: self.bits & PART_RESERVED_MASK,
        }
    }

    fn fields(schema: &LayoutSchema) -> Vec<FieldLayout> {
        use std::mem::offset_of;

        let tc = match schema.revision {
            SchemaRevision::A => "VEC4Du16: paint, emission, phong, damage",
            SchemaRevision::B => "VEC4Du16: paint, emission, highlight, occlusion",
        };
        vec![
            FieldLayout::new("pos", offset_of!(Self, pos), 12, "VEC3Df"),
            FieldLayout::new("rot", offset_of!(Self, rot), 12, "VEC3Df"),
            FieldLayout::new("size", offset_of!(Self, size), 8, "VEC2Df"),
            FieldLayout::new("trans", offset_of!(Self, trans), 24, "VEC6Df: slide xyz, rotate xyz"),
            FieldLayout::new(
                "bits",
                offset_of!(Self, bits),
                4,
                "ui32: 0 shape, 1 billboard, 2-31 ???",
            ),
            FieldLayout::new("tc", offset_of!(Self, tc), 8, tc),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::LayoutError;
    use crate::schema::WordView;

    fn sample(tc: TextureChannels) -> PartDesc {
        PartDesc {
            pos: Vec3::new(1.0, -2.0, 3.5),
            rot: Vec3::new(0.0, 1.57, 0.0),
            size: Vec2::new(0.5, 2.0),
            trans: TransformBounds::new(Vec3::new(0.0, 0.25, 0.0), Vec3::new(0.0, 0.0, 0.785)),
            shape: PartShape::Triangle,
            billboard: true,
            tc,
            reserved: 0,
        }
    }

    #[test]
    fn test_roundtrip_both_revisions() {
        for revision in SchemaRevision::ALL {
            let schema = LayoutSchema::new(revision, WordView::ByteFields);
            let desc = sample(TextureChannels::from_lanes([3, 4, 5, 6], revision));
            let record = PartIgs::encode(&desc, &schema).unwrap();
            assert_eq!(record.decode(&schema), desc);
        }
    }

    #[test]
    fn test_flags() {
        let schema = LayoutSchema::default();
        let record = PartIgs::encode(&sample(TextureChannels::default()), &schema).unwrap();
        assert_eq!(record.bits(), 0b11);
        assert_eq!(record.shape(), PartShape::Triangle);
        assert!(record.is_billboard());

        let quad = PartDesc {
            shape: PartShape::Quad,
            billboard: false,
            ..sample(TextureChannels::default())
        };
        assert_eq!(PartIgs::encode(&quad, &schema).unwrap().bits(), 0);
    }

    #[test]
    fn test_byte_offsets() {
        let schema = LayoutSchema::default();
        let tc = TextureChannels::from_lanes([3, 4, 5, 6], SchemaRevision::A);
        let record = PartIgs::encode(&sample(tc), &schema).unwrap();
        let bytes = record.as_bytes();
        assert_eq!(bytes.len(), 68);
        assert_eq!(&bytes[0..4], &1.0f32.to_le_bytes());
        assert_eq!(&bytes[24..28], &0.5f32.to_le_bytes());
        assert_eq!(&bytes[56..60], &3u32.to_le_bytes());
        assert_eq!(&bytes[60..62], &3u16.to_le_bytes());
        assert_eq!(&bytes[66..68], &6u16.to_le_bytes());
    }

    #[test]
    fn test_mixed_revision_rejected() {
        let schema = LayoutSchema::new(SchemaRevision::B, WordView::ByteFields);
        let desc = sample(TextureChannels::from_lanes([1, 2, 3, 4], SchemaRevision::A));
        let err = PartIgs::encode(&desc, &schema).unwrap_err();
        assert!(matches!(err, LayoutError::SchemaMismatch(_)));
    }

    #[test]
    fn test_reserved_passthrough() {
        let schema = LayoutSchema::default();
        let mut bytes = [0u8; 68];
        bytes[56..60].copy_from_slice(&0xDEAD_BEEFu32.to_le_bytes());
        let desc = PartIgs::decode_bytes(&bytes, &schema).unwrap();
        assert_eq!(desc.reserved, 0xDEAD_BEEC);
        assert_eq!(desc.shape, PartShape::Triangle);
        assert!(desc.billboard);

        let again = PartIgs::encode(&desc, &schema).unwrap();
        assert_eq!(again.as_bytes(), &bytes[..]);
    }
}
