//! Color atlas: one texel per instance, packed row-major into a square.
//!
//! Both the packer and the attribute extractors derive texel addresses from
//! [`ColorAtlas::side_for`] and [`ColorAtlas::texel_uv`], so the two agree
//! without sharing a table. UVs address texel centers; consumers must
//! sample with nearest filtering.

use crate::color::Rgba8;

/// Square RGBA8 texture holding one color per instance index.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ColorAtlas {
    side: usize,
    texels: Vec<Rgba8>,
}

impl ColorAtlas {
    /// Atlas side length for `count` instances: `ceil(sqrt(count))`.
    #[must_use]
    pub fn side_for(count: usize) -> usize {
        let mut side = (count as f64).sqrt() as usize;
        while side * side < count {
            side += 1;
        }
        while side > 0 && (side - 1) * (side - 1) >= count {
            side -= 1;
        }
        side
    }

    /// Texel `(x, y)` holding instance `index`.
    #[must_use]
    pub fn texel_coord(index: usize, side: usize) -> (usize, usize) {
        if side == 0 {
            return (0, 0);
        }
        (index % side, index / side)
    }

    /// Texel-center UV for instance `index`, in `[0, 1)`.
    #[must_use]
    pub fn texel_uv(index: usize, side: usize) -> [f32; 2] {
        if side == 0 {
            return [0.0, 0.0];
        }
        let (x, y) = Self::texel_coord(index, side);
        let side = side as f32;
        [(x as f32 + 0.5) / side, (y as f32 + 0.5) / side]
    }

    /// Pack colors in index order. Unused trailing texels are transparent.
    #[must_use]
    pub fn pack(colors: &[Rgba8]) -> Self {
        let side = Self::side_for(colors.len());
        let mut texels = vec![Rgba8::TRANSPARENT; side * side];
        texels[..colors.len()].copy_from_slice(colors);
        Self { side, texels }
    }

    /// Side length in texels (0 when empty).
    #[must_use]
    pub fn side(&self) -> usize {
        self.side
    }

    /// Texels, row-major, `side * side` long.
    #[must_use]
    pub fn texels(&self) -> &[Rgba8] {
        &self.texels
    }

    /// Texel `(x, y)` a nearest-filtered sample at `uv` lands on.
    #[must_use]
    pub fn texel_at(&self, uv: [f32; 2]) -> (usize, usize) {
        let max = self.side.saturating_sub(1);
        let to_texel =
            |c: f32| ((c * self.side as f32).floor().max(0.0) as usize).min(max);
        (to_texel(uv[0]), to_texel(uv[1]))
    }

    /// Color a nearest-filtered sample at `uv` returns.
    #[must_use]
    pub fn sample(&self, uv: [f32; 2]) -> Option<Rgba8> {
        if self.side == 0 {
            return None;
        }
        let (x, y) = self.texel_at(uv);
        self.texels.get(y * self.side + x).copied()
    }
}
