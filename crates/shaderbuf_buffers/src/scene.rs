//! # Predefined Scenes
//!
//! Object headers and parts loaded from a TOML fixture at startup and
//! frozen into the two immutable buffers.
//!
//! ```toml
//! [[objects]]
//! parent_part_index = 0
//! quad_count = 2
//!
//! [[parts]]
//! pos = { x = 0.0, y = 1.0, z = 0.0 }
//! rot = { x = 0.0, y = 0.0, z = 0.0 }
//! size = { x = 1.0, y = 1.0 }
//! billboard = true
//! tc = { revision = "a", paint = 1, emission = 2, phong = 0, damage = 3 }
//! ```
//!
//! Parent indices are not checked against the part count.

use std::path::Path;

use serde::{Deserialize, Serialize};
use shaderbuf_layout::{LayoutError, LayoutSchema, ObjectHeader, ObjectIgs, PartDesc, PartIgs};

use crate::error::BufferResult;
use crate::immutable::{ImmutableBuffer, ImmutableBufferBuilder};

/// Scene fixture as written on disk.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SceneFixture {
    /// OBJECT_IGS entries in buffer order.
    pub objects: Vec<ObjectHeader>,
    /// PART_IGS entries in buffer order.
    pub parts: Vec<PartDesc>,
}

impl SceneFixture {
    /// Parses a fixture from TOML text.
    ///
    /// # Errors
    ///
    /// Returns `LayoutError::InvalidConfig` on malformed TOML.
    pub fn from_toml_str(text: &str) -> BufferResult<Self> {
        toml::from_str(text).map_err(|e| LayoutError::InvalidConfig(e.to_string()).into())
    }

    /// Reads and parses a fixture file.
    ///
    /// # Errors
    ///
    /// Returns `BufferError::Io` if the file cannot be read, otherwise as
    /// [`SceneFixture::from_toml_str`].
    pub fn from_toml_file(path: impl AsRef<Path>) -> BufferResult<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }
}

/// The immutable buffers of a loaded scene.
#[derive(Clone, Debug)]
pub struct PredefinedScene {
    /// Object headers.
    pub objects: ImmutableBuffer<ObjectIgs>,
    /// Object parts.
    pub parts: ImmutableBuffer<PartIgs>,
}

impl PredefinedScene {
    /// Packs a fixture for `schema`.
    ///
    /// # Errors
    ///
    /// Returns the first encoding or schema error.
    pub fn build(fixture: &SceneFixture, schema: LayoutSchema) -> BufferResult<Self> {
        let mut objects =
            ImmutableBufferBuilder::<ObjectIgs>::with_capacity(schema, fixture.objects.len());
        objects.extend(&fixture.objects)?;

        let mut parts =
            ImmutableBufferBuilder::<PartIgs>::with_capacity(schema, fixture.parts.len());
        parts.extend(&fixture.parts)?;

        let scene = Self {
            objects: objects.build(),
            parts: parts.build(),
        };
        tracing::info!(
            objects = scene.objects.len(),
            parts = scene.parts.len(),
            revision = %schema.revision,
            "predefined scene loaded"
        );
        Ok(scene)
    }

    /// Loads and packs a fixture file.
    ///
    /// # Errors
    ///
    /// As [`SceneFixture::from_toml_file`] and [`PredefinedScene::build`].
    pub fn load(path: impl AsRef<Path>, schema: LayoutSchema) -> BufferResult<Self> {
        Self::build(&SceneFixture::from_toml_file(path)?, schema)
    }
}
