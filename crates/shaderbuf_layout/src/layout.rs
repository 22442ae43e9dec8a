//! Field tables for tooling.
//!
//! Shader authors declare the same structs by hand. These tables are what
//! they check against: every field with its byte offset, size and encoding,
//! for the schema the build runs with.

use std::fmt;

use crate::records::{BoneDgs, BufferCategory, GpuRecord, ObjectIgs, PartIgs, SpriteDps};
use crate::schema::LayoutSchema;

/// One field of a record as the shader sees it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FieldLayout {
    /// Shader-side field name.
    pub name: &'static str,
    /// Byte offset from the start of the record.
    pub offset: usize,
    /// Size in bytes.
    pub size: usize,
    /// Storage type and decode rule.
    pub encoding: &'static str,
}

impl FieldLayout {
    /// Creates a field entry.
    #[must_use]
    pub const fn new(
        name: &'static str,
        offset: usize,
        size: usize,
        encoding: &'static str,
    ) -> Self {
        Self {
            name,
            offset,
            size,
            encoding,
        }
    }

    /// First byte after the field.
    #[inline]
    #[must_use]
    pub const fn end(&self) -> usize {
        self.offset + self.size
    }
}

/// A record with its size, alignment and field table.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RecordLayout {
    /// Shader-side type name.
    pub name: &'static str,
    /// Size in bytes.
    pub size: usize,
    /// Alignment in bytes.
    pub align: usize,
    /// Buffer category.
    pub category: BufferCategory,
    /// Fields in offset order.
    pub fields: Vec<FieldLayout>,
}

impl RecordLayout {
    /// Describes `R` under `schema`.
    #[must_use]
    pub fn of<R: GpuRecord>(schema: &LayoutSchema) -> Self {
        Self {
            name: R::NAME,
            size: R::SIZE,
            align: R::ALIGN,
            category: R::CATEGORY,
            fields: R::fields(schema),
        }
    }

    /// Looks up a field by name.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&FieldLayout> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// True if the fields tile the record with no gaps or overlaps.
    #[must_use]
    pub fn is_dense(&self) -> bool {
        let mut cursor = 0;
        for field in &self.fields {
            if field.offset != cursor {
                return false;
            }
            cursor = field.end();
        }
        cursor == self.size
    }
}

impl fmt::Display for RecordLayout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{} ({} bytes, al{}, {:?})",
            self.name, self.size, self.align, self.category
        )?;
        for field in &self.fields {
            writeln!(
                f,
                "  {:>3}  {:>2}  {:<8} {}",
                field.offset, field.size, field.name, field.encoding
            )?;
        }
        Ok(())
    }
}

/// Describes all four records under `schema`.
#[must_use]
pub fn describe_all(schema: &LayoutSchema) -> [RecordLayout; 4] {
    [
        RecordLayout::of::<ObjectIgs>(schema),
        RecordLayout::of::<PartIgs>(schema),
        RecordLayout::of::<BoneDgs>(schema),
        RecordLayout::of::<SpriteDps>(schema),
    ]
}
