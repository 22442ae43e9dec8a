//! # Fixed-Point and Bias Codecs
//!
//! Every packed scalar in the records uses one of these encodings. The shader
//! applies the exact inverse, so encode and decode live side by side here and
//! nowhere else.
//!
//! ## Formats
//!
//! | Format | Bits | Decode | Max |
//! |---|---|---|---|
//! | `16p8` | 24 | `raw / 256` | 65535.99609375 |
//! | `8p8` | 16 | `raw / 256` | 255.99609375 |
//! | `1p15` | 16 | `raw / 32768` | 1.999969482421875 |
//! | `6p10` | 16 | `raw / 1024` | 63.9990234375 |
//!
//! All formats are unsigned. Encoding rounds to the nearest step.
//!
//! ## Value - 1 Bias
//!
//! Colour and count bytes store `value - 1`, so 0..=255 covers 1..=256.

use crate::error::EncodingRangeError;
use crate::math::Color4;

/// An unsigned `NpM` fixed-point format.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct FixedFormat {
    /// Integer bits (N).
    pub int_bits: u32,
    /// Fractional bits (M).
    pub frac_bits: u32,
}

/// Animation frame time.
pub const Q16_8: FixedFormat = FixedFormat::new(16, 8);

/// Damage-map emission additive (revision A).
pub const Q8_8: FixedFormat = FixedFormat::new(8, 8);

/// Damage-map scalar (revision A).
pub const Q1_15: FixedFormat = FixedFormat::new(1, 15);

/// Sprite modifiers (revision B).
pub const Q6_10: FixedFormat = FixedFormat::new(6, 10);

impl FixedFormat {
    /// Creates a format. `int_bits + frac_bits` must not exceed 32.
    #[must_use]
    pub const fn new(int_bits: u32, frac_bits: u32) -> Self {
        assert!(int_bits + frac_bits <= 32, "fixed-point format wider than 32 bits");
        Self { int_bits, frac_bits }
    }

    /// Total storage width in bits.
    #[inline]
    #[must_use]
    pub const fn bits(self) -> u32 {
        self.int_bits + self.frac_bits
    }

    /// Largest raw value.
    #[inline]
    #[must_use]
    pub const fn max_raw(self) -> u32 {
        if self.bits() == 32 {
            u32::MAX
        } else {
            (1u32 << self.bits()) - 1
        }
    }

    /// Raw steps per unit (2^M).
    #[inline]
    #[must_use]
    pub fn scale(self) -> f64 {
        f64::from(1u32 << self.frac_bits)
    }

    /// Largest representable value.
    #[inline]
    #[must_use]
    pub fn max_value(self) -> f64 {
        f64::from(self.max_raw()) / self.scale()
    }

    /// Decodes a raw value. Bits above the format width are ignored.
    #[inline]
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn decode(self, raw: u32) -> f32 {
        (f64::from(raw & self.max_raw()) / self.scale()) as f32
    }

    /// Encodes a value, rounding to the nearest step.
    ///
    /// # Errors
    ///
    /// Returns [`EncodingRangeError`] for negative, non-finite or too-large values.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn encode(self, field: &'static str, value: f32) -> Result<u32, EncodingRangeError> {
        // Checked before rounding so tiny negatives do not collapse to zero.
        let scaled = (f64::from(value) * self.scale()).round();
        if value < 0.0 || !scaled.is_finite() || scaled > f64::from(self.max_raw()) {
            return Err(EncodingRangeError {
                field,
                value: f64::from(value),
                min: 0.0,
                max: self.max_value(),
            });
        }
        Ok(scaled as u32)
    }

    /// Encodes into a 16-bit lane.
    ///
    /// # Errors
    ///
    /// Same as [`FixedFormat::encode`].
    ///
    /// # Panics
    ///
    /// Panics if the format is wider than 16 bits.
    #[allow(clippy::cast_possible_truncation)]
    pub fn encode_u16(self, field: &'static str, value: f32) -> Result<u16, EncodingRangeError> {
        assert!(self.bits() <= 16, "format does not fit a 16-bit lane");
        self.encode(field, value).map(|raw| raw as u16)
    }
}

/// Encodes a `value - 1` biased byte. Valid values are 1..=256.
///
/// # Errors
///
/// Returns [`EncodingRangeError`] outside 1..=256.
#[inline]
#[allow(clippy::cast_possible_truncation)]
pub fn encode_biased(field: &'static str, value: u16) -> Result<u8, EncodingRangeError> {
    if (1..=256).contains(&value) {
        Ok((value - 1) as u8)
    } else {
        Err(EncodingRangeError::int(field, u64::from(value), 1, 256))
    }
}

/// Decodes a `value - 1` biased byte.
#[inline]
#[must_use]
pub const fn decode_biased(stored: u8) -> u16 {
    stored as u16 + 1
}

/// Encodes a biased RGBA colour.
///
/// # Errors
///
/// Returns [`EncodingRangeError`] if any channel is outside 1..=256.
pub fn encode_color(field: &'static str, color: Color4) -> Result<[u8; 4], EncodingRangeError> {
    let [r, g, b, a] = color.to_array();
    Ok([
        encode_biased(field, r)?,
        encode_biased(field, g)?,
        encode_biased(field, b)?,
        encode_biased(field, a)?,
    ])
}

/// Decodes a biased RGBA colour.
#[inline]
#[must_use]
pub const fn decode_color(stored: [u8; 4]) -> Color4 {
    Color4::new(
        decode_biased(stored[0]),
        decode_biased(stored[1]),
        decode_biased(stored[2]),
        decode_biased(stored[3]),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_16p8_decode() {
        assert_eq!(Q16_8.decode(0x0180), 1.5);
        assert_eq!(Q16_8.decode(0), 0.0);
    }

    #[test]
    fn test_6p10_decode() {
        assert_eq!(Q6_10.decode(1024), 1.0);
        assert_eq!(Q6_10.decode(512), 0.5);
    }

    #[test]
    fn test_max_values() {
        assert_eq!(Q16_8.max_raw(), 0x00FF_FFFF);
        assert_eq!(Q16_8.max_value(), 65535.996_093_75);
        assert_eq!(Q8_8.max_raw(), 0xFFFF);
        assert_eq!(Q1_15.max_value(), 1.999_969_482_421_875);
        assert_eq!(Q6_10.max_value(), 63.999_023_437_5);
    }

    #[test]
    fn test_encode_exact() {
        assert_eq!(Q16_8.encode("ft", 1.5).unwrap(), 0x0180);
        assert_eq!(Q6_10.encode("gev", 1.0).unwrap(), 1024);
        assert_eq!(Q1_15.encode("dms", 1.0).unwrap(), 0x8000);
    }

    #[test]
    fn test_encode_rounds_to_nearest() {
        // 0.3 * 256 = 76.8
        assert_eq!(Q8_8.encode("dma", 0.3).unwrap(), 77);
    }

    #[test]
    fn test_encode_rejects_out_of_range() {
        assert!(Q16_8.encode("ft", -0.01).is_err());
        assert!(Q16_8.encode("ft", 65536.0).is_err());
        assert!(Q1_15.encode("dms", 2.0).is_err());
        assert!(Q6_10.encode("nms", f32::NAN).is_err());
        assert!(Q6_10.encode("nms", f32::INFINITY).is_err());
    }

    #[test]
    fn test_encode_rejects_small_negatives() {
        assert!(Q16_8.encode("ft", -0.001).is_err());
        assert!(Q1_15.encode("dms", -0.000_01).is_err());
        assert!(Q6_10.encode("nms", -f32::MIN_POSITIVE).is_err());
        assert_eq!(Q16_8.encode("ft", 0.001).unwrap(), 0);
    }

    #[test]
    fn test_encode_max_accepted() {
        let max = Q6_10.max_value() as f32;
        assert_eq!(Q6_10.encode("nms", max).unwrap(), 0xFFFF);
    }

    #[test]
    fn test_decode_ignores_high_bits() {
        assert_eq!(Q8_8.decode(0x1_0100), 1.0);
    }

    #[test]
    fn test_bias_decode() {
        assert_eq!(decode_biased(254), 255);
        assert_eq!(decode_biased(0), 1);
        assert_eq!(decode_biased(255), 256);
    }

    #[test]
    fn test_bias_encode() {
        assert_eq!(encode_biased("pmc", 255).unwrap(), 254);
        assert_eq!(encode_biased("pmc", 256).unwrap(), 255);
        assert!(encode_biased("pmc", 0).is_err());
        assert!(encode_biased("pmc", 257).is_err());
    }

    #[test]
    fn test_color_roundtrip() {
        let color = Color4::new(1, 128, 255, 256);
        let stored = encode_color("pmc", color).unwrap();
        assert_eq!(stored, [0, 127, 254, 255]);
        assert_eq!(decode_color(stored), color);
    }
}
