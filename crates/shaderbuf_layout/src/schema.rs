//! # Schema Revisions
//!
//! Two revisions of the record layouts exist and a build must pick exactly one.
//!
//! | Revision | PART_IGS / BONE_DGS `tc` lanes | SPRITE_DPS layout |
//! |---|---|---|
//! | A | paint, emission, phong, damage | `gev` f32, damage-map 8p8 / 1p15 |
//! | B | paint, emission, highlight, occlusion | all-16-bit 6p10 channels |
//!
//! The BONE_DGS packed words are documented two contradictory ways. Both are
//! available through [`WordView`]; the schema selects one.
//!
//! The schema is loaded once at startup from TOML:
//!
//! ```toml
//! revision = "b"
//! word_view = "raw_bits"
//! ```

use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{LayoutError, LayoutResult, SchemaMismatchError};

/// Layout revision shared by producer and consumer.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[repr(u8)]
pub enum SchemaRevision {
    /// Paint / emission / phong / damage channels, float global emission.
    #[default]
    A = 0,
    /// Paint / emission / highlight / occlusion channels, 6p10 modifiers.
    B = 1,
}

impl SchemaRevision {
    /// Both revisions, in declaration order.
    pub const ALL: [Self; 2] = [Self::A, Self::B];

    /// Fails unless `self` equals `found`.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaMismatchError`] when the revisions differ.
    #[inline]
    pub fn expect(self, found: Self) -> Result<(), SchemaMismatchError> {
        if self == found {
            Ok(())
        } else {
            Err(SchemaMismatchError {
                expected: self,
                found,
            })
        }
    }
}

impl fmt::Display for SchemaRevision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::A => f.write_str("A"),
            Self::B => f.write_str("B"),
        }
    }
}

/// Bit arrangement used for the two packed 32-bit words of BONE_DGS.
///
/// ```text
/// ByteFields  afc_ft : [ frame time 16p8 : 0-23 ][ frame count - 1 : 24-31 ]
///             afo_sai: [ ??? : 0-3 ][ sprite index : 4-23 ][ frame offset : 24-31 ]
///
/// RawBits     afc_ft : [ frame count - 1 : 0-7 ][ frame time 16p8 : 8-31 ]
///             afo_sai: [ frame offset : 0-7 ][ ??? : 8-11 ][ sprite index : 12-31 ]
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WordView {
    /// Little-endian byte members: three low bytes of payload, high byte of count/offset.
    #[default]
    ByteFields,
    /// Raw bit-range comments: low byte of count/offset, payload above it.
    RawBits,
}

/// The complete layout contract a build runs with.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LayoutSchema {
    /// Active schema revision.
    pub revision: SchemaRevision,
    /// BONE_DGS packed word arrangement.
    pub word_view: WordView,
}

impl LayoutSchema {
    /// Creates a schema.
    #[must_use]
    pub const fn new(revision: SchemaRevision, word_view: WordView) -> Self {
        Self {
            revision,
            word_view,
        }
    }

    /// Parses a schema from TOML text. Missing keys take their defaults.
    ///
    /// # Errors
    ///
    /// Returns `LayoutError::InvalidConfig` on malformed TOML or unknown values.
    pub fn from_toml_str(text: &str) -> LayoutResult<Self> {
        let schema: Self = toml::from_str(text).map_err(LayoutError::config)?;
        tracing::info!(
            revision = %schema.revision,
            word_view = ?schema.word_view,
            "layout schema loaded"
        );
        Ok(schema)
    }

    /// Loads a schema from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns `LayoutError::InvalidConfig` if the file cannot be read or parsed.
    pub fn from_toml_file(path: impl AsRef<Path>) -> LayoutResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .map_err(|e| LayoutError::InvalidConfig(format!("{}: {e}", path.display())))?;
        Self::from_toml_str(&text)
    }

    /// Serializes the schema back to TOML.
    ///
    /// # Errors
    ///
    /// Returns `LayoutError::InvalidConfig` if serialization fails.
    pub fn to_toml_string(&self) -> LayoutResult<String> {
        toml::to_string(self).map_err(LayoutError::config)
    }

    /// Fails unless `other` describes the same contract.
    ///
    /// # Errors
    ///
    /// Returns `LayoutError::SchemaMismatch` when the revisions differ and
    /// `LayoutError::WordViewMismatch` when only the word views differ.
    pub fn expect(&self, other: &Self) -> LayoutResult<()> {
        self.revision.expect(other.revision)?;
        if self.word_view != other.word_view {
            return Err(LayoutError::WordViewMismatch {
                expected: self.word_view,
                found: other.word_view,
            });
        }
        Ok(())
    }

    /// Like [`LayoutSchema::expect`], but ignores the word view when
    /// `uses_word_view` is false.
    ///
    /// # Errors
    ///
    /// As [`LayoutSchema::expect`].
    pub fn expect_bytes(&self, other: &Self, uses_word_view: bool) -> LayoutResult<()> {
        if uses_word_view {
            self.expect(other)
        } else {
            Ok(self.revision.expect(other.revision)?)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_schema() {
        let schema = LayoutSchema::default();
        assert_eq!(schema.revision, SchemaRevision::A);
        assert_eq!(schema.word_view, WordView::ByteFields);
    }

    #[test]
    fn test_from_toml() {
        let schema =
            LayoutSchema::from_toml_str("revision = \"b\"\nword_view = \"raw_bits\"\n").unwrap();
        assert_eq!(schema, LayoutSchema::new(SchemaRevision::B, WordView::RawBits));
    }

    #[test]
    fn test_from_toml_partial() {
        let schema = LayoutSchema::from_toml_str("revision = \"b\"").unwrap();
        assert_eq!(schema.word_view, WordView::ByteFields);
    }

    #[test]
    fn test_from_toml_rejects_unknown_revision() {
        let err = LayoutSchema::from_toml_str("revision = \"c\"").unwrap_err();
        assert!(matches!(err, LayoutError::InvalidConfig(_)));
    }

    #[test]
    fn test_from_toml_rejects_unknown_key() {
        let err = LayoutSchema::from_toml_str("revisoin = \"a\"").unwrap_err();
        assert!(matches!(err, LayoutError::InvalidConfig(_)));
    }

    #[test]
    fn test_toml_roundtrip() {
        let schema = LayoutSchema::new(SchemaRevision::B, WordView::RawBits);
        let text = schema.to_toml_string().unwrap();
        assert_eq!(LayoutSchema::from_toml_str(&text).unwrap(), schema);
    }

    #[test]
    fn test_revision_expect() {
        assert!(SchemaRevision::A.expect(SchemaRevision::A).is_ok());
        let err = SchemaRevision::A.expect(SchemaRevision::B).unwrap_err();
        assert_eq!(err.expected, SchemaRevision::A);
        assert_eq!(err.found, SchemaRevision::B);
    }

    #[test]
    fn test_schema_expect_word_view() {
        let a = LayoutSchema::new(SchemaRevision::A, WordView::ByteFields);
        let b = LayoutSchema::new(SchemaRevision::A, WordView::RawBits);
        assert!(a.expect(&a).is_ok());
        assert!(matches!(a.expect(&b), Err(LayoutError::WordViewMismatch { .. })));
        assert!(a.expect_bytes(&b, false).is_ok());
        assert!(a.expect_bytes(&b, true).is_err());
    }
}
