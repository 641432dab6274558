//! 8-bit RGBA color used by the element table and the color atlas.

use serde::{Deserialize, Serialize};

/// An 8-bit-per-channel RGBA color, laid out exactly as one `Rgba8Unorm`
/// texel.
#[repr(C)]
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    bytemuck::Pod,
    bytemuck::Zeroable,
)]
pub struct Rgba8 {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
    /// Alpha channel.
    pub a: u8,
}

impl Rgba8 {
    /// Fully transparent black; fills unused atlas texels.
    pub const TRANSPARENT: Self = Self::new(0, 0, 0, 0);

    /// Neutral gray used when an element has no color entry.
    pub const NEUTRAL_GRAY: Self = Self::opaque(0x80, 0x80, 0x80);

    /// Color from all four channels.
    #[must_use]
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Opaque color from RGB channels.
    #[must_use]
    pub const fn opaque(r: u8, g: u8, b: u8) -> Self {
        Self::new(r, g, b, 0xFF)
    }

    /// Opaque color from a packed `0xRRGGBB` value.
    #[must_use]
    pub const fn from_hex(rgb: u32) -> Self {
        Self::opaque((rgb >> 16) as u8, (rgb >> 8) as u8, rgb as u8)
    }

    /// Channels as `[r, g, b, a]`.
    #[must_use]
    pub const fn to_array(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }

    /// Channels normalized to `0.0..=1.0`.
    #[must_use]
    pub fn to_f32(self) -> [f32; 4] {
        self.to_array().map(|c| f32::from(c) / 255.0)
    }
}

impl From<[u8; 3]> for Rgba8 {
    fn from([r, g, b]: [u8; 3]) -> Self {
        Self::opaque(r, g, b)
    }
}

impl From<[u8; 4]> for Rgba8 {
    fn from([r, g, b, a]: [u8; 4]) -> Self {
        Self::new(r, g, b, a)
    }
}
