//! Texture-channel index lanes (`tc`) shared by PART_IGS and BONE_DGS.
//!
//! The four `u16` lanes select texture-array channels. Which map each lane
//! feeds depends on the schema revision:
//!
//! | Lane | Revision A | Revision B |
//! |---|---|---|
//! | r | paint | paint |
//! | g | emission | emission |
//! | b | phong | highlight |
//! | a | damage | occlusion |
//!
//! The shader samples the emission lane at `index + 0.5`; the stored value is
//! the plain index.

use serde::{Deserialize, Serialize};

use crate::error::SchemaMismatchError;
use crate::schema::SchemaRevision;

/// Revision-tagged texture-channel indices.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "revision", rename_all = "lowercase")]
pub enum TextureChannels {
    /// Revision A lane assignment.
    A {
        /// Paint map channel.
        paint: u16,
        /// Emission map channel.
        emission: u16,
        /// Phong map channel.
        phong: u16,
        /// Damage map channel.
        damage: u16,
    },
    /// Revision B lane assignment.
    B {
        /// Paint map channel.
        paint: u16,
        /// Emission map channel.
        emission: u16,
        /// Highlight map channel.
        highlight: u16,
        /// Occlusion map channel.
        occlusion: u16,
    },
}

impl Default for TextureChannels {
    fn default() -> Self {
        Self::from_lanes([0; 4], SchemaRevision::A)
    }
}

impl TextureChannels {
    /// Revision this assignment belongs to.
    #[inline]
    #[must_use]
    pub const fn revision(&self) -> SchemaRevision {
        match self {
            Self::A { .. } => SchemaRevision::A,
            Self::B { .. } => SchemaRevision::B,
        }
    }

    /// Interprets raw lanes under `revision`.
    #[must_use]
    pub const fn from_lanes(lanes: [u16; 4], revision: SchemaRevision) -> Self {
        let [r, g, b, a] = lanes;
        match revision {
            SchemaRevision::A => Self::A {
                paint: r,
                emission: g,
                phong: b,
                damage: a,
            },
            SchemaRevision::B => Self::B {
                paint: r,
                emission: g,
                highlight: b,
                occlusion: a,
            },
        }
    }

    /// Raw lanes, regardless of revision.
    #[must_use]
    pub const fn lanes(&self) -> [u16; 4] {
        match *self {
            Self::A {
                paint,
                emission,
                phong,
                damage,
            } => [paint, emission, phong, damage],
            Self::B {
                paint,
                emission,
                highlight,
                occlusion,
            } => [paint, emission, highlight, occlusion],
        }
    }

    /// Raw lanes for a buffer built with `target`.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaMismatchError`] if this assignment belongs to the other revision.
    pub fn lanes_for(&self, target: SchemaRevision) -> Result<[u16; 4], SchemaMismatchError> {
        target.expect(self.revision())?;
        Ok(self.lanes())
    }

    /// Paint map channel (same lane in both revisions).
    #[inline]
    #[must_use]
    pub const fn paint(&self) -> u16 {
        self.lanes()[0]
    }

    /// Emission map channel (same lane in both revisions).
    #[inline]
    #[must_use]
    pub const fn emission(&self) -> u16 {
        self.lanes()[1]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lane_assignment() {
        let a = TextureChannels::from_lanes([1, 2, 3, 4], SchemaRevision::A);
        assert_eq!(
            a,
            TextureChannels::A {
                paint: 1,
                emission: 2,
                phong: 3,
                damage: 4
            }
        );

        let b = TextureChannels::from_lanes([1, 2, 3, 4], SchemaRevision::B);
        assert_eq!(
            b,
            TextureChannels::B {
                paint: 1,
                emission: 2,
                highlight: 3,
                occlusion: 4
            }
        );
        assert_eq!(b.lanes(), [1, 2, 3, 4]);
        assert_eq!(b.paint(), 1);
        assert_eq!(b.emission(), 2);
    }

    #[test]
    fn test_lanes_for_rejects_other_revision() {
        let a = TextureChannels::from_lanes([1, 2, 3, 4], SchemaRevision::A);
        assert_eq!(a.lanes_for(SchemaRevision::A).unwrap(), [1, 2, 3, 4]);

        let err = a.lanes_for(SchemaRevision::B).unwrap_err();
        assert_eq!(err.expected, SchemaRevision::B);
        assert_eq!(err.found, SchemaRevision::A);
    }

    #[test]
    fn test_toml_tagged() {
        #[derive(Deserialize)]
        struct Fixture {
            tc: TextureChannels,
        }

        let fixture: Fixture = toml::from_str(
            "[tc]\nrevision = \"b\"\npaint = 7\nemission = 8\nhighlight = 9\nocclusion = 10\n",
        )
        .unwrap();
        assert_eq!(fixture.tc.revision(), SchemaRevision::B);
        assert_eq!(fixture.tc.lanes(), [7, 8, 9, 10]);
    }
}
