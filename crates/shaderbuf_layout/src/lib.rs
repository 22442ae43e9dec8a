//! # SHADERBUF Layout
//!
//! Bit-exact element types for the engine's GPU structured buffers.
//!
//! ## Buffers
//!
//! ```text
//! ┌──────────────────────┬─────────────┬───────────┬─────────────────────┐
//! │ Buffer               │ Record      │ Written   │ Read by             │
//! ├──────────────────────┼─────────────┼───────────┼─────────────────────┤
//! │ Predefined objects   │ OBJECT_IGS  │ once      │ vertex / geometry   │
//! │ Predefined parts     │ PART_IGS    │ once      │ vertex / geometry   │
//! │ Entity bone states   │ BONE_DGS    │ per frame │ vertex / skinning   │
//! │ Sprite modifiers     │ SPRITE_DPS  │ per frame │ fragment            │
//! └──────────────────────┴─────────────┴───────────┴─────────────────────┘
//! ```
//!
//! ## Rules
//!
//! 1. **The bytes are the contract** - sizes and alignments are asserted at compile time
//! 2. **One schema per build** - revision A and B records never meet
//! 3. **Unknown bits survive** - reserved bits are carried through decode/encode untouched
//!
//! ## Example
//!
//! ```rust,ignore
//! use shaderbuf_layout::{GpuRecord, LayoutSchema, ObjectHeader, ObjectIgs};
//!
//! let schema = LayoutSchema::from_toml_file("config/schema.toml")?;
//! let record = ObjectIgs::encode(&ObjectHeader::new(3, 12), &schema)?;
//! upload(record.as_bytes());
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

#[cfg(target_endian = "big")]
compile_error!("GPU structured buffers are little-endian; big-endian hosts are not supported");

pub mod channels;
pub mod error;
pub mod fixed_point;
pub mod layout;
pub mod math;
pub mod records;
pub mod schema;

pub use channels::TextureChannels;
pub use error::{EncodingRangeError, LayoutError, LayoutResult, SchemaMismatchError};
pub use fixed_point::{FixedFormat, Q16_8, Q1_15, Q6_10, Q8_8};
pub use layout::{describe_all, FieldLayout, RecordLayout};
pub use math::{Color4, TransformBounds, Vec2, Vec3};
pub use records::bone::{max_sprite_index, AnimationState};
pub use records::{
    BoneDgs, BonePose, BufferCategory, GpuRecord, ObjectHeader, ObjectIgs, PartDesc, PartIgs,
    PartShape, SpriteDps, SpriteModifier,
};
pub use schema::{LayoutSchema, SchemaRevision, WordView};
