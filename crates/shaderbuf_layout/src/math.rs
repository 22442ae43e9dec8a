//! Vector types used by the semantic (unpacked) record values.
//!
//! These mirror the shader's `VEC*` types one-to-one so a record field can be
//! written with a single `to_array` call.

use bytemuck::{Pod, Zeroable};
use serde::{Deserialize, Serialize};

/// 3D vector - position, rotation, scale
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable, Serialize, Deserialize)]
pub struct Vec3 {
    /// X component
    pub x: f32,
    /// Y component
    pub y: f32,
    /// Z component
    pub z: f32,
}

impl Vec3 {
    /// Creates a new Vec3
    #[must_use]
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    /// Zero vector
    pub const ZERO: Self = Self::new(0.0, 0.0, 0.0);

    /// Unit scale
    pub const ONE: Self = Self::new(1.0, 1.0, 1.0);

    /// Converts to array
    #[must_use]
    pub const fn to_array(self) -> [f32; 3] {
        [self.x, self.y, self.z]
    }

    /// Creates from array
    #[must_use]
    pub const fn from_array(arr: [f32; 3]) -> Self {
        Self::new(arr[0], arr[1], arr[2])
    }
}

/// 2D vector - part size
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable, Serialize, Deserialize)]
pub struct Vec2 {
    /// X component
    pub x: f32,
    /// Y component
    pub y: f32,
}

impl Vec2 {
    /// Creates a new Vec2
    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Converts to array
    #[must_use]
    pub const fn to_array(self) -> [f32; 2] {
        [self.x, self.y]
    }

    /// Creates from array
    #[must_use]
    pub const fn from_array(arr: [f32; 2]) -> Self {
        Self::new(arr[0], arr[1])
    }
}

/// Maximum transformation of a part: slide vector then rotation vector.
///
/// Stored as the shader's `VEC6Df`.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable, Serialize, Deserialize)]
pub struct TransformBounds {
    /// Maximum slide
    pub slide: Vec3,
    /// Maximum rotation
    pub rotate: Vec3,
}

impl TransformBounds {
    /// Creates new bounds
    #[must_use]
    pub const fn new(slide: Vec3, rotate: Vec3) -> Self {
        Self { slide, rotate }
    }

    /// Converts to the packed 6-lane array
    #[must_use]
    pub const fn to_array(self) -> [f32; 6] {
        [
            self.slide.x,
            self.slide.y,
            self.slide.z,
            self.rotate.x,
            self.rotate.y,
            self.rotate.z,
        ]
    }

    /// Creates from the packed 6-lane array
    #[must_use]
    pub const fn from_array(arr: [f32; 6]) -> Self {
        Self::new(
            Vec3::new(arr[0], arr[1], arr[2]),
            Vec3::new(arr[3], arr[4], arr[5]),
        )
    }
}

/// RGBA colour with channels in 1..=256.
///
/// Stored as `value - 1` bytes, see [`crate::fixed_point::encode_color`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Color4 {
    /// Red
    pub r: u16,
    /// Green
    pub g: u16,
    /// Blue
    pub b: u16,
    /// Alpha
    pub a: u16,
}

impl Default for Color4 {
    fn default() -> Self {
        Self::WHITE
    }
}

impl Color4 {
    /// Creates a colour
    #[must_use]
    pub const fn new(r: u16, g: u16, b: u16, a: u16) -> Self {
        Self { r, g, b, a }
    }

    /// Full intensity on every channel (stored as `0xFF` bytes)
    pub const WHITE: Self = Self::new(256, 256, 256, 256);

    /// Converts to array
    #[must_use]
    pub const fn to_array(self) -> [u16; 4] {
        [self.r, self.g, self.b, self.a]
    }
}
