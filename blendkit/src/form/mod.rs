//! Rounded-rectangle geometry.
//!
//! Nearly every drawable view is a rectangle with some corners rounded, an
//! optional outline, and an optional flat gradient. This module turns
//! `(size, border, round type, radius, shading)` into two flat float buffers:
//!
//! - **inner**: a triangle fan (center, outline..., first outline vertex again)
//! - **outer**: a triangle strip pairing the inset outline with the full one,
//!   which is what strokes the border
//!
//! Generation is a pure function of its inputs; [`RoundedForm`] caches the
//! result and reuses its allocations between regenerations.

mod rounded;
mod vertices;

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

pub use rounded::{RoundedForm, ShadedVertex, Vertex2};
pub use vertices::{
    generate_shaded_vertices, generate_vertices, make_shaded_offset, outline_vertex_count,
    Shading,
};

/// Number of vertices emitted for one rounded corner.
pub const CURVE_RESOLUTION: usize = 9;

/// Quarter-arc approximation shared by every rounded corner, scaled by the
/// corner radius. Not a true circle.
pub const CORNER_VEC: [[f32; 2]; CURVE_RESOLUTION] = [
    [0.0, 0.0],
    [0.195, 0.02],
    [0.383, 0.067],
    [0.55, 0.169],
    [0.707, 0.293],
    [0.831, 0.45],
    [0.924, 0.617],
    [0.98, 0.805],
    [1.0, 1.0],
];

bitflags! {
    /// Which corners of a rectangle are rounded.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
    pub struct RoundType: u8 {
        const TOP_LEFT = 1 << 0;
        const TOP_RIGHT = 1 << 1;
        const BOTTOM_RIGHT = 1 << 2;
        const BOTTOM_LEFT = 1 << 3;

        const TOP = Self::TOP_LEFT.bits() | Self::TOP_RIGHT.bits();
        const BOTTOM = Self::BOTTOM_LEFT.bits() | Self::BOTTOM_RIGHT.bits();
        const LEFT = Self::TOP_LEFT.bits() | Self::BOTTOM_LEFT.bits();
        const RIGHT = Self::TOP_RIGHT.bits() | Self::BOTTOM_RIGHT.bits();
        const ALL = 0x0F;
    }
}

impl RoundType {
    pub const NONE: Self = Self::empty();

    /// Build a mask from a raw integer, dropping anything above the 4 corner bits.
    #[inline]
    pub fn from_raw(raw: u32) -> Self {
        Self::from_bits_truncate((raw & 0x0F) as u8)
    }

    /// Number of rounded corners.
    #[inline]
    pub fn rounded_corners(self) -> usize {
        self.bits().count_ones() as usize
    }
}

/// Axis along which a shaded fill interpolates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Orientation {
    Horizontal,
    #[default]
    Vertical,
}
