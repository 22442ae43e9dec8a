//! # SHADERBUF Buffers
//!
//! Record arrays on their way to the GPU.
//!
//! ## Architecture
//!
//! ```text
//!   load time                          every frame
//! ┌───────────────────┐        ┌────────────────────────┐
//! │  SceneFixture     │        │ DynamicBuffer<BoneDgs> │
//! │  (TOML)           │        │ DynamicBuffer<Sprite>  │
//! └────────┬──────────┘        └───────────┬────────────┘
//!          │ build                         │ publish
//!          ▼                               ▼
//! ┌───────────────────┐        ┌────────────────────────┐
//! │ ImmutableBuffer   │        │ PublishedFrame         │
//! │ OBJECT / PART     │        │ (frozen Arc)           │
//! └───────────────────┘        └───────────┬────────────┘
//!                                          │ store
//!                                          ▼
//!                                      FrameSlot ──► uploader
//! ```
//!
//! Every buffer carries the [`LayoutSchema`] it was packed with. Reading a
//! frame under a different schema is an error, never a silent reinterpretation.

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]

pub mod dynamic;
pub mod error;
pub mod immutable;
pub mod scene;
pub mod slot;

pub use dynamic::{DynamicBuffer, FrameWriter, PublishedFrame};
pub use error::{BufferError, BufferResult};
pub use immutable::{ImmutableBuffer, ImmutableBufferBuilder};
pub use scene::{PredefinedScene, SceneFixture};
pub use slot::FrameSlot;

pub use shaderbuf_layout::LayoutSchema;
