//! Outline synthesis for rounded rectangles.

use super::{CORNER_VEC, CURVE_RESOLUTION, Orientation, RoundType};
use crate::primitives::Size;
use crate::theme::ColorScheme;

/// Upper bound on outline vertices (all four corners rounded).
const MAX_OUTLINE: usize = 4 * CURVE_RESOLUTION;

/// Gradient parameters for a shaded inner fill.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Shading {
    pub orientation: Orientation,
    /// Delta at the far end of the axis (top, or right), in 1/255 steps.
    pub shadetop: i16,
    /// Delta at the near end of the axis (bottom, or left), in 1/255 steps.
    pub shadedown: i16,
}

impl Shading {
    pub fn from_scheme(scheme: &ColorScheme, orientation: Orientation) -> Self {
        Self {
            orientation,
            shadetop: scheme.shadetop,
            shadedown: scheme.shadedown,
        }
    }
}

/// Number of outline vertices for a corner mask:
/// one per sharp corner, [`CURVE_RESOLUTION`] per rounded one.
#[inline]
pub fn outline_vertex_count(round_type: RoundType) -> usize {
    let rounded = (round_type & RoundType::ALL).rounded_corners();
    4 - rounded + rounded * CURVE_RESOLUTION
}

/// Blend the theme's shade deltas by `fact` (0 at the near edge, 1 at the far edge).
#[inline]
pub fn make_shaded_offset(shadetop: i16, shadedown: i16, fact: f32) -> f32 {
    let faci = (fact - 0.5 / 255.0).clamp(0.0, 1.0);
    let facm = 1.0 - fact;
    faci * (shadetop as f32 / 255.0) + facm * (shadedown as f32 / 255.0)
}

/// Generate unshaded geometry. `inner` receives `(x, y)` pairs laid out as a
/// triangle fan; `outer` receives the border triangle strip, or is cleared
/// when `border` is zero. Returns the outline vertex count.
pub fn generate_vertices(
    size: Size,
    border: f32,
    round_type: RoundType,
    radius: f32,
    inner: Option<&mut Vec<f32>>,
    outer: Option<&mut Vec<f32>>,
) -> usize {
    generate(size, border, round_type, radius, None, inner, outer)
}

/// Generate shaded geometry. Identical to [`generate_vertices`] except that
/// every inner vertex carries a third component: its shade offset.
pub fn generate_shaded_vertices(
    size: Size,
    border: f32,
    round_type: RoundType,
    radius: f32,
    shading: &Shading,
    inner: Option<&mut Vec<f32>>,
    outer: Option<&mut Vec<f32>>,
) -> usize {
    generate(size, border, round_type, radius, Some(shading), inner, outer)
}

/// Axis-aligned bounds in float space.
#[derive(Debug, Clone, Copy)]
struct Bounds {
    minx: f32,
    miny: f32,
    maxx: f32,
    maxy: f32,
}

impl Bounds {
    fn inset(self, by: f32) -> Self {
        Self {
            minx: self.minx + by,
            miny: self.miny + by,
            maxx: self.maxx - by,
            maxy: self.maxy - by,
        }
    }

    fn center(&self) -> [f32; 2] {
        [(self.minx + self.maxx) * 0.5, (self.miny + self.maxy) * 0.5]
    }
}

/// An outline walked anti-clockwise from the bottom-left corner.
struct Outline {
    points: [[f32; 2]; MAX_OUTLINE],
    len: usize,
}

impl Outline {
    fn build(b: Bounds, radius: f32, round_type: RoundType) -> Self {
        let mut vec = [[0.0f32; 2]; CURVE_RESOLUTION];
        for (v, c) in vec.iter_mut().zip(CORNER_VEC.iter()) {
            *v = [radius * c[0], radius * c[1]];
        }

        let mut outline = Self {
            points: [[0.0; 2]; MAX_OUTLINE],
            len: 0,
        };

        if round_type.contains(RoundType::BOTTOM_LEFT) {
            for v in &vec {
                outline.push(b.minx + v[1], b.miny + radius - v[0]);
            }
        } else {
            outline.push(b.minx, b.miny);
        }

        if round_type.contains(RoundType::BOTTOM_RIGHT) {
            for v in &vec {
                outline.push(b.maxx - radius + v[0], b.miny + v[1]);
            }
        } else {
            outline.push(b.maxx, b.miny);
        }

        if round_type.contains(RoundType::TOP_RIGHT) {
            for v in &vec {
                outline.push(b.maxx - v[1], b.maxy - radius + v[0]);
            }
        } else {
            outline.push(b.maxx, b.maxy);
        }

        if round_type.contains(RoundType::TOP_LEFT) {
            for v in &vec {
                outline.push(b.minx + radius - v[0], b.maxy - v[1]);
            }
        } else {
            outline.push(b.minx, b.maxy);
        }

        outline
    }

    #[inline]
    fn push(&mut self, x: f32, y: f32) {
        self.points[self.len] = [x, y];
        self.len += 1;
    }

    fn as_slice(&self) -> &[[f32; 2]] {
        &self.points[..self.len]
    }
}

/// Shrink the outer and inner radii so opposite corners never overlap.
///
/// The limiting dimension depends on which corners are rounded: when two
/// rounded corners share an edge the radius may use at most half of it,
/// otherwise a whole edge is available.
fn clamp_radii(size: Size, border: f32, round_type: RoundType, radius: f32) -> (f32, f32) {
    let both = |mask: RoundType| round_type.contains(mask);

    let hnum = if both(RoundType::TOP) || both(RoundType::BOTTOM) { 1 } else { 2 };
    let vnum = if both(RoundType::LEFT) || both(RoundType::RIGHT) { 1 } else { 2 };

    let minsize = (size.width.max(0) * hnum).min(size.height.max(0) * vnum) as f32;

    let mut rad = radius.max(0.0);
    let mut radi = rad - border;

    if 2.0 * rad > minsize {
        rad = 0.5 * minsize;
    }
    if 2.0 * (radi + border) > minsize {
        radi = 0.5 * minsize - border;
    }

    (rad, radi.max(0.0))
}

fn generate(
    size: Size,
    border: f32,
    round_type: RoundType,
    radius: f32,
    shading: Option<&Shading>,
    inner: Option<&mut Vec<f32>>,
    outer: Option<&mut Vec<f32>>,
) -> usize {
    let round_type = round_type & RoundType::ALL;
    let border = border.max(0.0);
    let count = outline_vertex_count(round_type);

    if inner.is_none() && outer.is_none() {
        return count;
    }

    let (rad, radi) = clamp_radii(size, border, round_type, radius);

    let full = Bounds {
        minx: 0.0,
        miny: 0.0,
        maxx: size.width as f32,
        maxy: size.height as f32,
    };
    let inset = full.inset(border);
    let inner_outline = Outline::build(inset, radi, round_type);
    debug_assert_eq!(inner_outline.len, count);

    if let Some(inner) = inner {
        write_fan(inner, &inner_outline, inset, shading);
    }

    if let Some(outer) = outer {
        outer.clear();
        if border > 0.0 {
            let edge = Outline::build(full, rad, round_type);
            write_strip(outer, &inner_outline, &edge);
        }
    }

    count
}

/// Triangle fan: center, outline, first outline vertex again.
fn write_fan(buf: &mut Vec<f32>, outline: &Outline, bounds: Bounds, shading: Option<&Shading>) {
    let components = if shading.is_some() { 3 } else { 2 };
    buf.clear();
    buf.reserve((outline.len + 2) * components);

    let Some(shading) = shading else {
        buf.extend_from_slice(&bounds.center());
        for p in outline.as_slice() {
            buf.extend_from_slice(p);
        }
        buf.extend_from_slice(&outline.points[0]);
        return;
    };

    // Degenerate bounds shade with factor 0 instead of dividing by zero.
    let facx = if bounds.maxx != bounds.minx { 1.0 / (bounds.maxx - bounds.minx) } else { 0.0 };
    let facy = if bounds.maxy != bounds.miny { 1.0 / (bounds.maxy - bounds.miny) } else { 0.0 };

    let shade = |p: [f32; 2]| {
        let fact = match shading.orientation {
            Orientation::Vertical => facy * (p[1] - bounds.miny),
            Orientation::Horizontal => facx * (p[0] - bounds.minx),
        };
        make_shaded_offset(shading.shadetop, shading.shadedown, fact)
    };

    let center = bounds.center();
    buf.extend_from_slice(&[center[0], center[1], shade(center)]);
    for &p in outline.as_slice() {
        buf.extend_from_slice(&[p[0], p[1], shade(p)]);
    }
    let first = outline.points[0];
    buf.extend_from_slice(&[first[0], first[1], shade(first)]);
}

/// Triangle strip alternating inner and outer outline points, closed by
/// repeating the first pair.
fn write_strip(buf: &mut Vec<f32>, inner: &Outline, outer: &Outline) {
    buf.reserve((inner.len * 2 + 2) * 2);
    for (i, o) in inner.as_slice().iter().zip(outer.as_slice()) {
        buf.extend_from_slice(i);
        buf.extend_from_slice(o);
    }
    buf.extend_from_slice(&inner.points[0]);
    buf.extend_from_slice(&outer.points[0]);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn all_masks() -> impl Iterator<Item = RoundType> {
        (0u32..16).map(RoundType::from_raw)
    }

    // =========================================================================
    // Vertex counts
    // =========================================================================

    #[test]
    fn inner_fan_has_outline_plus_two_vertices() {
        for mask in all_masks() {
            let mut inner = Vec::new();
            let n = generate_vertices(Size::new(80, 24), 1.0, mask, 5.0, Some(&mut inner), None);
            let k = mask.bits().count_ones() as usize;
            assert_eq!(n, 4 - k + k * CURVE_RESOLUTION, "mask {:?}", mask);
            assert_eq!(inner.len(), (n + 2) * 2, "mask {:?}", mask);
        }
    }

    #[test]
    fn outer_strip_doubles_outline_plus_two() {
        for mask in all_masks() {
            let mut outer = Vec::new();
            let n = generate_vertices(Size::new(80, 24), 1.0, mask, 5.0, None, Some(&mut outer));
            assert_eq!(outer.len(), (2 * n + 2) * 2, "mask {:?}", mask);
        }
    }

    #[test]
    fn shaded_fan_has_three_components() {
        let shading = Shading {
            orientation: Orientation::Vertical,
            shadetop: 15,
            shadedown: -15,
        };
        let mut inner = Vec::new();
        let n = generate_shaded_vertices(
            Size::new(80, 24),
            1.0,
            RoundType::ALL,
            5.0,
            &shading,
            Some(&mut inner),
            None,
        );
        assert_eq!(n, 36);
        assert_eq!(inner.len(), (n + 2) * 3);
    }

    #[test]
    fn zero_border_clears_outer() {
        let mut outer = vec![1.0; 12];
        generate_vertices(Size::new(10, 10), 0.0, RoundType::ALL, 3.0, None, Some(&mut outer));
        assert!(outer.is_empty());
    }

    // =========================================================================
    // Shape
    // =========================================================================

    #[test]
    fn sharp_rectangle_outline() {
        let mut inner = Vec::new();
        generate_vertices(Size::new(100, 50), 0.0, RoundType::NONE, 0.0, Some(&mut inner), None);
        assert_eq!(
            inner,
            vec![
                50.0, 25.0, // center
                0.0, 0.0, // bottom-left
                100.0, 0.0, // bottom-right
                100.0, 50.0, // top-right
                0.0, 50.0, // top-left
                0.0, 0.0, // closing vertex
            ]
        );
    }

    #[test]
    fn border_insets_inner_outline() {
        let mut inner = Vec::new();
        let mut outer = Vec::new();
        generate_vertices(
            Size::new(100, 50),
            2.0,
            RoundType::NONE,
            0.0,
            Some(&mut inner),
            Some(&mut outer),
        );
        assert_eq!(&inner[2..4], &[2.0, 2.0]);
        // Strip starts with the inset point, then the matching full-size point.
        assert_eq!(&outer[0..4], &[2.0, 2.0, 0.0, 0.0]);
        // And closes on the same pair.
        let len = outer.len();
        assert_eq!(&outer[len - 4..], &[2.0, 2.0, 0.0, 0.0]);
    }

    #[test]
    fn rounded_corner_starts_and_ends_on_edges() {
        let mut inner = Vec::new();
        generate_vertices(
            Size::new(100, 50),
            0.0,
            RoundType::BOTTOM_LEFT,
            10.0,
            Some(&mut inner),
            None,
        );
        // First arc vertex sits on the left edge, one radius up.
        assert_eq!(&inner[2..4], &[0.0, 10.0]);
        // Last arc vertex sits on the bottom edge, one radius in.
        let last = 2 + (CURVE_RESOLUTION - 1) * 2;
        assert_eq!(&inner[last..last + 2], &[10.0, 0.0]);
    }

    #[test]
    fn radius_is_clamped_to_half_the_short_side() {
        let mut inner = Vec::new();
        generate_vertices(Size::new(100, 20), 0.0, RoundType::ALL, 50.0, Some(&mut inner), None);
        // Bottom-left arc begins at y = radius, radius clamped to 10.
        assert_eq!(&inner[2..4], &[0.0, 10.0]);
    }

    #[test]
    fn single_corner_may_use_whole_edge() {
        let mut inner = Vec::new();
        generate_vertices(
            Size::new(100, 20),
            0.0,
            RoundType::BOTTOM_LEFT,
            15.0,
            Some(&mut inner),
            None,
        );
        // hnum = vnum = 2, so min(200, 40) / 2 = 20 and the radius survives.
        assert_eq!(&inner[2..4], &[0.0, 15.0]);
    }

    // =========================================================================
    // Shading
    // =========================================================================

    #[test]
    fn shaded_offset_runs_from_down_to_top() {
        let bottom = make_shaded_offset(15, -15, 0.0);
        let top = make_shaded_offset(15, -15, 1.0);
        assert!((bottom - (-15.0 / 255.0)).abs() < 1e-6);
        assert!((top - (15.0 / 255.0) * (1.0 - 0.5 / 255.0)).abs() < 1e-6);
    }

    #[test]
    fn vertical_shading_follows_y() {
        let shading = Shading {
            orientation: Orientation::Vertical,
            shadetop: 20,
            shadedown: 0,
        };
        let mut inner = Vec::new();
        generate_shaded_vertices(
            Size::new(40, 40),
            0.0,
            RoundType::NONE,
            0.0,
            &shading,
            Some(&mut inner),
            None,
        );
        // Vertices 1 and 2 are on the bottom edge, 3 and 4 on the top edge.
        let shade = |i: usize| inner[i * 3 + 2];
        assert_eq!(shade(1), shade(2));
        assert_eq!(shade(3), shade(4));
        assert!(shade(3) > shade(1));
    }

    // =========================================================================
    // Determinism and degenerate input
    // =========================================================================

    #[test]
    fn identical_input_gives_identical_output() {
        let shading = Shading {
            orientation: Orientation::Horizontal,
            shadetop: 10,
            shadedown: -10,
        };
        let run = || {
            let mut inner = Vec::new();
            let mut outer = Vec::new();
            generate_shaded_vertices(
                Size::new(73, 31),
                1.5,
                RoundType::TOP | RoundType::BOTTOM_LEFT,
                6.5,
                &shading,
                Some(&mut inner),
                Some(&mut outer),
            );
            (inner, outer)
        };
        let (a_inner, a_outer) = run();
        let (b_inner, b_outer) = run();
        let bits = |v: &[f32]| v.iter().map(|f| f.to_bits()).collect::<Vec<_>>();
        assert_eq!(bits(&a_inner), bits(&b_inner));
        assert_eq!(bits(&a_outer), bits(&b_outer));
    }

    #[test]
    fn zero_size_is_finite() {
        let shading = Shading::default();
        let mut inner = Vec::new();
        let mut outer = Vec::new();
        let n = generate_shaded_vertices(
            Size::ZERO,
            1.0,
            RoundType::ALL,
            5.0,
            &shading,
            Some(&mut inner),
            Some(&mut outer),
        );
        assert_eq!(n, 36);
        assert!(inner.iter().all(|v| v.is_finite()));
        assert!(outer.iter().all(|v| v.is_finite()));
    }

    #[test]
    fn border_wider_than_half_the_size_is_finite() {
        let shading = Shading::default();
        let mut inner = Vec::new();
        let mut outer = Vec::new();
        generate_shaded_vertices(
            Size::new(10, 6),
            5.0,
            RoundType::ALL,
            4.0,
            &shading,
            Some(&mut inner),
            Some(&mut outer),
        );
        assert!(inner.iter().all(|v| v.is_finite()));
        assert_eq!(outer.len(), (2 * 36 + 2) * 2);
    }

    #[test]
    fn buffers_are_reused_between_calls() {
        let mut inner = Vec::with_capacity(512);
        let ptr = inner.as_ptr();
        generate_vertices(Size::new(50, 20), 1.0, RoundType::ALL, 4.0, Some(&mut inner), None);
        generate_vertices(Size::new(60, 20), 1.0, RoundType::ALL, 4.0, Some(&mut inner), None);
        assert_eq!(inner.as_ptr(), ptr);
    }
}
