//! Core primitive types for blendkit.
//!
//! View geometry is integral (pixel positions and sizes). Colors and vertex
//! data are floating point.

use std::ops::{Add, Neg, Sub};

use serde::{Deserialize, Serialize};

/// A point in 2D pixel space (Y grows upwards).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const ORIGIN: Self = Self { x: 0, y: 0 };

    #[inline]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

impl From<(i32, i32)> for Point {
    fn from((x, y): (i32, i32)) -> Self {
        Self { x, y }
    }
}

impl Add for Point {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        Self {
            x: self.x + rhs.x,
            y: self.y + rhs.y,
        }
    }
}

impl Sub for Point {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self {
        Self {
            x: self.x - rhs.x,
            y: self.y - rhs.y,
        }
    }
}

impl Neg for Point {
    type Output = Self;
    fn neg(self) -> Self {
        Self {
            x: -self.x,
            y: -self.y,
        }
    }
}

/// A 2D size in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Size {
    pub width: i32,
    pub height: i32,
}

impl Size {
    pub const ZERO: Self = Self {
        width: 0,
        height: 0,
    };

    #[inline]
    pub const fn new(width: i32, height: i32) -> Self {
        Self { width, height }
    }

    /// True when either dimension is zero or negative.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.width <= 0 || self.height <= 0
    }

    /// Component-wise maximum.
    #[inline]
    pub fn max(self, other: Size) -> Size {
        Size {
            width: self.width.max(other.width),
            height: self.height.max(other.height),
        }
    }
}

impl From<(i32, i32)> for Size {
    fn from((width, height): (i32, i32)) -> Self {
        Self { width, height }
    }
}

/// An axis-aligned rectangle. `x`/`y` is the bottom-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Rect {
    pub const ZERO: Self = Self {
        x: 0,
        y: 0,
        width: 0,
        height: 0,
    };

    #[inline]
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self { x, y, width, height }
    }

    #[inline]
    pub fn from_origin_size(origin: Point, size: Size) -> Self {
        Self {
            x: origin.x,
            y: origin.y,
            width: size.width,
            height: size.height,
        }
    }

    /// Check if a point is inside this rectangle (right and top edges exclusive).
    #[inline]
    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.x
            && point.x < self.x + self.width
            && point.y >= self.y
            && point.y < self.y + self.height
    }

    #[inline]
    pub fn origin(&self) -> Point {
        Point { x: self.x, y: self.y }
    }

    #[inline]
    pub fn size(&self) -> Size {
        Size {
            width: self.width,
            height: self.height,
        }
    }

    #[inline]
    pub fn right(&self) -> i32 {
        self.x + self.width
    }

    #[inline]
    pub fn top(&self) -> i32 {
        self.y + self.height
    }

    #[inline]
    pub fn translate(&self, offset: Point) -> Self {
        Self {
            x: self.x + offset.x,
            y: self.y + offset.y,
            ..*self
        }
    }
}

/// RGBA color with components in 0.0-1.0 range.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const TRANSPARENT: Self = Self {
        r: 0.0,
        g: 0.0,
        b: 0.0,
        a: 0.0,
    };
    pub const BLACK: Self = Self {
        r: 0.0,
        g: 0.0,
        b: 0.0,
        a: 1.0,
    };
    pub const WHITE: Self = Self {
        r: 1.0,
        g: 1.0,
        b: 1.0,
        a: 1.0,
    };

    #[inline]
    pub const fn rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Create a color from RGBA values (0-255).
    #[inline]
    pub fn rgba8(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self {
            r: r as f32 / 255.0,
            g: g as f32 / 255.0,
            b: b as f32 / 255.0,
            a: a as f32 / 255.0,
        }
    }

    /// Create a color from a packed `0xRRGGBBAA` value, the notation used by
    /// theme tables.
    #[inline]
    pub fn from_hex(rgba: u32) -> Self {
        Self::rgba8(
            (rgba >> 24) as u8,
            (rgba >> 16) as u8,
            (rgba >> 8) as u8,
            rgba as u8,
        )
    }

    /// Pack this color into a u32 (RGBA8 format: R in lowest byte).
    #[inline]
    pub fn pack(&self) -> u32 {
        let r = (self.r.clamp(0.0, 1.0) * 255.0) as u32;
        let g = (self.g.clamp(0.0, 1.0) * 255.0) as u32;
        let b = (self.b.clamp(0.0, 1.0) * 255.0) as u32;
        let a = (self.a.clamp(0.0, 1.0) * 255.0) as u32;
        r | (g << 8) | (b << 16) | (a << 24)
    }

    /// Add `delta` to the RGB channels, clamping to the valid range.
    #[inline]
    pub fn offset(self, delta: f32) -> Self {
        Self {
            r: (self.r + delta).clamp(0.0, 1.0),
            g: (self.g + delta).clamp(0.0, 1.0),
            b: (self.b + delta).clamp(0.0, 1.0),
            a: self.a,
        }
    }

    #[inline]
    pub const fn with_alpha(self, a: f32) -> Self {
        Self { a, ..self }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // =========================================================================
    // Point tests
    // =========================================================================

    #[test]
    fn point_arithmetic() {
        let a = Point::new(10, 20);
        let b = Point::new(5, 15);
        assert_eq!(a + b, Point::new(15, 35));
        assert_eq!(a - b, Point::new(5, 5));
        assert_eq!(-a, Point::new(-10, -20));
    }

    #[test]
    fn point_from_tuple() {
        let p: Point = (5, 10).into();
        assert_eq!(p, Point::new(5, 10));
        assert_eq!(Point::default(), Point::ORIGIN);
    }

    // =========================================================================
    // Size tests
    // =========================================================================

    #[test]
    fn size_is_empty() {
        assert!(Size::ZERO.is_empty());
        assert!(Size::new(10, 0).is_empty());
        assert!(!Size::new(1, 1).is_empty());
    }

    #[test]
    fn size_max() {
        assert_eq!(Size::new(10, 50).max(Size::new(30, 20)), Size::new(30, 50));
    }

    // =========================================================================
    // Rect tests
    // =========================================================================

    #[test]
    fn rect_contains() {
        let rect = Rect::new(10, 20, 100, 50);

        assert!(rect.contains(Point::new(10, 20))); // Bottom-left corner
        assert!(rect.contains(Point::new(50, 40)));
        assert!(rect.contains(Point::new(109, 69)));

        assert!(!rect.contains(Point::new(110, 70))); // Top-right (exclusive)
        assert!(!rect.contains(Point::new(5, 40)));
        assert!(!rect.contains(Point::new(50, 80)));
    }

    #[test]
    fn rect_edges() {
        let r = Rect::new(10, 20, 100, 50);
        assert_eq!(r.right(), 110);
        assert_eq!(r.top(), 70);
        assert_eq!(r.origin(), Point::new(10, 20));
        assert_eq!(r.size(), Size::new(100, 50));
    }

    #[test]
    fn rect_translate() {
        let r = Rect::new(10, 20, 100, 50);
        assert_eq!(r.translate(Point::new(5, -10)), Rect::new(15, 10, 100, 50));
    }

    // =========================================================================
    // Color tests
    // =========================================================================

    #[test]
    fn color_from_hex() {
        let c = Color::from_hex(0xFF800040);
        assert!((c.r - 1.0).abs() < 0.01);
        assert!((c.g - 0.5).abs() < 0.01);
        assert_eq!(c.b, 0.0);
        assert!((c.a - 0.25).abs() < 0.01);
    }

    #[test]
    fn color_offset_clamps() {
        let c = Color::rgba(0.95, 0.5, 0.02, 0.7).offset(0.1);
        assert_eq!(c.r, 1.0);
        assert!((c.g - 0.6).abs() < 1e-6);
        assert!((c.b - 0.12).abs() < 1e-6);
        assert_eq!(c.a, 0.7);

        let d = Color::rgba(0.05, 0.5, 0.5, 1.0).offset(-0.1);
        assert_eq!(d.r, 0.0);
    }

    #[test]
    fn color_pack() {
        assert_eq!(Color::WHITE.pack(), 0xFFFF_FFFF);
        assert_eq!(Color::TRANSPARENT.pack(), 0);
    }
}
