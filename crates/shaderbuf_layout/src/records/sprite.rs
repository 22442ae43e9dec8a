//! SPRITE_DPS - per-sprite colour/emission modifiers (16 bytes, al16).
//!
//! Read by the fragment stage. The two revisions share nothing but the size:
//!
//! ```text
//! offset  revision A                 revision B
//!      0  gev  float                 pmc  VEC4Du8 (value - 1)
//!      4  pmc  VEC4Du8 (value - 1)   dmc  VEC4Du8 occlusion (value - 1)
//!      8  dmc  VEC4Du8 (value - 1)   nms  6p10 | gev 6p10
//!     12  dma  8p8 | dms 1p15        dme  6p10 | dms 6p10
//! ```

use bytemuck::{Pod, Zeroable};
use serde::{Deserialize, Serialize};

use super::{BufferCategory, GpuRecord};
use crate::error::LayoutResult;
use crate::fixed_point::{decode_color, encode_color, Q1_15, Q6_10, Q8_8};
use crate::layout::FieldLayout;
use crate::math::Color4;
use crate::schema::{LayoutSchema, SchemaRevision};

/// Packed sprite modifiers as four little-endian words.
#[repr(C, align(16))]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Pod, Zeroable)]
pub struct SpriteDps {
    words: [u32; 4],
}

const _: () = assert!(std::mem::size_of::<SpriteDps>() == 16);
const _: () = assert!(std::mem::align_of::<SpriteDps>() == 16);

#[inline]
const fn join(lo: u16, hi: u16) -> u32 {
    (lo as u32) | ((hi as u32) << 16)
}

#[inline]
#[allow(clippy::cast_possible_truncation)]
const fn split(word: u32) -> (u16, u16) {
    (word as u16, (word >> 16) as u16)
}

impl SpriteDps {
    /// The four raw words.
    #[inline]
    #[must_use]
    pub const fn words(&self) -> [u32; 4] {
        self.words
    }
}

/// Unpacked sprite modifiers, tagged with their revision.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "revision", rename_all = "lowercase")]
pub enum SpriteModifier {
    /// Revision A layout.
    A {
        /// `gev`: global emission value.
        global_emission: f32,
        /// `pmc`: paint map colour.
        paint_color: Color4,
        /// `dmc`: damage map colour.
        damage_color: Color4,
        /// `dma`: damage map emission additive, 8p8.
        damage_emission: f32,
        /// `dms`: damage map scalar, 1p15.
        damage_scalar: f32,
    },
    /// Revision B layout.
    B {
        /// `pmc`: paint map colour.
        paint_color: Color4,
        /// `dmc`: occlusion map colour.
        occlusion_color: Color4,
        /// `nms`: normal map scale, 6p10.
        normal_scale: f32,
        /// `gev`: global emission, 6p10.
        global_emission: f32,
        /// `dme`: occlusion map emission additive, 6p10.
        occlusion_emission: f32,
        /// `dms`: occlusion map scalar, 6p10.
        occlusion_scalar: f32,
    },
}

impl SpriteModifier {
    /// Neutral modifiers for `revision`: white colours, unit scalars, no emission.
    #[must_use]
    pub const fn neutral(revision: SchemaRevision) -> Self {
        match revision {
            SchemaRevision::A => Self::A {
                global_emission: 0.0,
                paint_color: Color4::WHITE,
                damage_color: Color4::WHITE,
                damage_emission: 0.0,
                damage_scalar: 1.0,
            },
            SchemaRevision::B => Self::B {
                paint_color: Color4::WHITE,
                occlusion_color: Color4::WHITE,
                normal_scale: 1.0,
                global_emission: 0.0,
                occlusion_emission: 0.0,
                occlusion_scalar: 1.0,
            },
        }
    }

    /// Revision this value belongs to.
    #[inline]
    #[must_use]
    pub const fn revision(&self) -> SchemaRevision {
        match self {
            Self::A { .. } => SchemaRevision::A,
            Self::B { .. } => SchemaRevision::B,
        }
    }
}

impl GpuRecord for SpriteDps {
    const NAME: &'static str = "SPRITE_DPS";
    const CATEGORY: BufferCategory = BufferCategory::Dynamic;

    type Value = SpriteModifier;

    fn encode(value: &SpriteModifier, schema: &LayoutSchema) -> LayoutResult<Self> {
        schema.revision.expect(value.revision())?;

        let words = match *value {
            SpriteModifier::A {
                global_emission,
                paint_color,
                damage_color,
                damage_emission,
                damage_scalar,
            } => [
                global_emission.to_bits(),
                u32::from_le_bytes(encode_color("pmc", paint_color)?),
                u32::from_le_bytes(encode_color("dmc", damage_color)?),
                join(
                    Q8_8.encode_u16("dma", damage_emission)?,
                    Q1_15.encode_u16("dms", damage_scalar)?,
                ),
            ],
            SpriteModifier::B {
                paint_color,
                occlusion_color,
                normal_scale,
                global_emission,
                occlusion_emission,
                occlusion_scalar,
            } => [
                u32::from_le_bytes(encode_color("pmc", paint_color)?),
                u32::from_le_bytes(encode_color("dmc", occlusion_color)?),
                join(
                    Q6_10.encode_u16("nms", normal_scale)?,
                    Q6_10.encode_u16("gev", global_emission)?,
                ),
                join(
                    Q6_10.encode_u16("dme", occlusion_emission)?,
                    Q6_10.encode_u16("dms", occlusion_scalar)?,
                ),
            ],
        };

        Ok(Self { words })
    }

    fn decode(&self, schema: &LayoutSchema) -> SpriteModifier {
        let [w0, w1, w2, w3] = self.words;
        match schema.revision {
            SchemaRevision::A => {
                let (dma, dms) = split(w3);
                SpriteModifier::A {
                    global_emission: f32::from_bits(w0),
                    paint_color: decode_color(w1.to_le_bytes()),
                    damage_color: decode_color(w2.to_le_bytes()),
                    damage_emission: Q8_8.decode(u32::from(dma)),
                    damage_scalar: Q1_15.decode(u32::from(dms)),
                }
            }
            SchemaRevision::B => {
                let (nms, gev) = split(w2);
                let (dme, dms) = split(w3);
                SpriteModifier::B {
                    paint_color: decode_color(w0.to_le_bytes()),
                    occlusion_color: decode_color(w1.to_le_bytes()),
                    normal_scale: Q6_10.decode(u32::from(nms)),
                    global_emission: Q6_10.decode(u32::from(gev)),
                    occlusion_emission: Q6_10.decode(u32::from(dme)),
                    occlusion_scalar: Q6_10.decode(u32::from(dms)),
                }
            }
        }
    }

    fn fields(schema: &LayoutSchema) -> Vec<FieldLayout> {
        match schema.revision {
            SchemaRevision::A => vec![
                FieldLayout::new("gev", 0, 4, "float: global emission"),
                FieldLayout::new("pmc", 4, 4, "VEC4Du8: paint map colour, value - 1"),
                FieldLayout::new("dmc", 8, 4, "VEC4Du8: damage map colour, value - 1"),
                FieldLayout::new("dma", 12, 2, "ui16: damage map emission additive 8p8"),
                FieldLayout::new("dms", 14, 2, "ui16: damage map scalar 1p15"),
            ],
            SchemaRevision::B => vec![
                FieldLayout::new("pmc", 0, 4, "VEC4Du8: paint map colour, value - 1"),
                FieldLayout::new("dmc", 4, 4, "VEC4Du8: occlusion map colour, value - 1"),
                FieldLayout::new("nms", 8, 2, "ui16: normal map scale 6p10"),
                FieldLayout::new("gev", 10, 2, "ui16: global emission 6p10"),
                FieldLayout::new("dme", 12, 2, "ui16: occlusion map emission additive 6p10"),
                FieldLayout::new("dms", 14, 2, "ui16: occlusion map scalar 6p10"),
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::LayoutError;
    use crate::schema::WordView;

    fn schema(revision: SchemaRevision) -> LayoutSchema {
        LayoutSchema::new(revision, WordView::ByteFields)
    }

    fn sample_a() -> SpriteModifier {
        SpriteModifier::A {
            global_emission: 2.75,
            paint_color: Color4::new(256, 128, 1, 255),
            damage_color: Color4::new(64, 64, 64, 256),
            damage_emission: 1.5,
            damage_scalar: 0.5,
        }
    }

    fn sample_b() -> SpriteModifier {
        SpriteModifier::B {
            paint_color: Color4::new(256, 128, 1, 255),
            occlusion_color: Color4::new(10, 20, 30, 40),
            normal_scale: 1.0,
            global_emission: 4.25,
            occlusion_emission: 0.5,
            occlusion_scalar: 63.0,
        }
    }

    #[test]
    fn test_roundtrip_revision_a() {
        let schema = schema(SchemaRevision::A);
        let record = SpriteDps::encode(&sample_a(), &schema).unwrap();
        assert_eq!(record.decode(&schema), sample_a());
    }

    #[test]
    fn test_roundtrip_revision_b() {
        let schema = schema(SchemaRevision::B);
        let record = SpriteDps::encode(&sample_b(), &schema).unwrap();
        assert_eq!(record.decode(&schema), sample_b());
    }

    #[test]
    fn test_revision_a_bytes() {
        let record = SpriteDps::encode(&sample_a(), &schema(SchemaRevision::A)).unwrap();
        let bytes = record.as_bytes();
        assert_eq!(&bytes[0..4], &2.75f32.to_le_bytes());
        assert_eq!(&bytes[4..8], &[255, 127, 0, 254]);
        assert_eq!(&bytes[8..12], &[63, 63, 63, 255]);
        assert_eq!(&bytes[12..14], &0x0180u16.to_le_bytes());
        assert_eq!(&bytes[14..16], &0x4000u16.to_le_bytes());
    }

    #[test]
    fn test_revision_b_bytes() {
        let record = SpriteDps::encode(&sample_b(), &schema(SchemaRevision::B)).unwrap();
        let bytes = record.as_bytes();
        assert_eq!(&bytes[0..4], &[255, 127, 0, 254]);
        assert_eq!(&bytes[4..8], &[9, 19, 29, 39]);
        assert_eq!(&bytes[8..10], &1024u16.to_le_bytes());
        assert_eq!(&bytes[10..12], &4352u16.to_le_bytes());
        assert_eq!(&bytes[12..14], &512u16.to_le_bytes());
        assert_eq!(&bytes[14..16], &64512u16.to_le_bytes());
    }

    #[test]
    fn test_bias_decode() {
        let mut bytes = [0u8; 16];
        bytes[4] = 254;
        let decoded = SpriteDps::decode_bytes(&bytes, &schema(SchemaRevision::A)).unwrap();
        match decoded {
            SpriteModifier::A { paint_color, .. } => assert_eq!(paint_color.r, 255),
            SpriteModifier::B { .. } => panic!("decoded wrong revision"),
        }
    }

    #[test]
    fn test_6p10_decode() {
        let mut bytes = [0u8; 16];
        bytes[8..10].copy_from_slice(&1024u16.to_le_bytes());
        let decoded = SpriteDps::decode_bytes(&bytes, &schema(SchemaRevision::B)).unwrap();
        match decoded {
            SpriteModifier::B { normal_scale, .. } => assert_eq!(normal_scale, 1.0),
            SpriteModifier::A { .. } => panic!("decoded wrong revision"),
        }
    }

    #[test]
    fn test_schema_mismatch() {
        let err = SpriteDps::encode(&sample_a(), &schema(SchemaRevision::B)).unwrap_err();
        assert!(matches!(err, LayoutError::SchemaMismatch(_)));
    }

    #[test]
    fn test_range_rejection() {
        let too_bright = SpriteModifier::B {
            paint_color: Color4::WHITE,
            occlusion_color: Color4::WHITE,
            normal_scale: 1.0,
            global_emission: 64.0,
            occlusion_emission: 0.0,
            occlusion_scalar: 1.0,
        };
        assert!(SpriteDps::encode(&too_bright, &schema(SchemaRevision::B)).is_err());

        let zero_color = SpriteModifier::A {
            global_emission: 0.0,
            paint_color: Color4::new(0, 1, 1, 1),
            damage_color: Color4::WHITE,
            damage_emission: 0.0,
            damage_scalar: 0.0,
        };
        assert!(SpriteDps::encode(&zero_color, &schema(SchemaRevision::A)).is_err());
    }

    #[test]
    fn test_neutral() {
        for revision in SchemaRevision::ALL {
            let neutral = SpriteModifier::neutral(revision);
            assert_eq!(neutral.revision(), revision);
            let schema = schema(revision);
            let record = SpriteDps::encode(&neutral, &schema).unwrap();
            assert_eq!(record.decode(&schema), neutral);
        }
    }
}
