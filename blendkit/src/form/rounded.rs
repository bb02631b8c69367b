//! Cached rounded-rectangle geometry owned by a view.

use super::vertices::{generate_shaded_vertices, generate_vertices, Shading};
use super::RoundType;
use crate::primitives::Size;

/// A plain 2D vertex as laid out in an unshaded inner buffer or any outer buffer.
#[derive(Debug, Clone, Copy, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
#[repr(C)]
pub struct Vertex2 {
    pub x: f32,
    pub y: f32,
}

/// A vertex in a shaded inner buffer: position plus shade offset.
#[derive(Debug, Clone, Copy, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
#[repr(C)]
pub struct ShadedVertex {
    pub x: f32,
    pub y: f32,
    pub shade: f32,
}

/// Rounded-rectangle parameters plus the vertex buffers generated from them.
///
/// Setters only record the new value; [`RoundedForm::regenerate`] rebuilds
/// the buffers when something changed, reusing their allocations.
#[derive(Debug, Clone)]
pub struct RoundedForm {
    size: Size,
    border: f32,
    round_type: RoundType,
    radius: f32,
    shading: Option<Shading>,
    inner: Vec<f32>,
    outer: Vec<f32>,
    outline_count: usize,
    dirty: bool,
}

impl Default for RoundedForm {
    fn default() -> Self {
        Self::new(Size::ZERO)
    }
}

impl RoundedForm {
    pub fn new(size: Size) -> Self {
        Self {
            size,
            border: 1.0,
            round_type: RoundType::NONE,
            radius: 5.0,
            shading: None,
            inner: Vec::new(),
            outer: Vec::new(),
            outline_count: 0,
            dirty: true,
        }
    }

    pub fn size(&self) -> Size {
        self.size
    }

    pub fn border(&self) -> f32 {
        self.border
    }

    pub fn round_type(&self) -> RoundType {
        self.round_type
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }

    pub fn shading(&self) -> Option<&Shading> {
        self.shading.as_ref()
    }

    pub fn set_size(&mut self, size: Size) {
        if self.size != size {
            self.size = size;
            self.dirty = true;
        }
    }

    pub fn set_border(&mut self, border: f32) {
        if self.border != border {
            self.border = border;
            self.dirty = true;
        }
    }

    pub fn set_round_type(&mut self, round_type: RoundType) {
        let round_type = round_type & RoundType::ALL;
        if self.round_type != round_type {
            self.round_type = round_type;
            self.dirty = true;
        }
    }

    pub fn set_radius(&mut self, radius: f32) {
        if self.radius != radius {
            self.radius = radius;
            self.dirty = true;
        }
    }

    pub fn set_shading(&mut self, shading: Option<Shading>) {
        if self.shading != shading {
            self.shading = shading;
            self.dirty = true;
        }
    }

    #[inline]
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Rebuild the buffers if any parameter changed since the last call.
    ///
    /// `pixel` scales border and radius (high-DPI themes). Returns whether
    /// anything was regenerated.
    pub fn regenerate(&mut self, pixel: f32) -> bool {
        if !self.dirty {
            return false;
        }
        let border = self.border * pixel;
        let radius = self.radius * pixel;
        self.outline_count = match &self.shading {
            Some(shading) => generate_shaded_vertices(
                self.size,
                border,
                self.round_type,
                radius,
                shading,
                Some(&mut self.inner),
                Some(&mut self.outer),
            ),
            None => generate_vertices(
                self.size,
                border,
                self.round_type,
                radius,
                Some(&mut self.inner),
                Some(&mut self.outer),
            ),
        };
        self.dirty = false;
        true
    }

    /// Number of outline vertices of the last generated shape.
    pub fn outline_count(&self) -> usize {
        self.outline_count
    }

    /// Floats per inner vertex: 3 when shaded, otherwise 2.
    pub fn inner_components(&self) -> usize {
        if self.shading.is_some() { 3 } else { 2 }
    }

    /// Raw inner triangle-fan buffer.
    pub fn inner(&self) -> &[f32] {
        &self.inner
    }

    /// Raw outer triangle-strip buffer (empty without a border).
    pub fn outer(&self) -> &[f32] {
        &self.outer
    }

    /// Inner fan as typed vertices, when unshaded.
    pub fn inner_vertices(&self) -> Option<&[Vertex2]> {
        if self.shading.is_some() {
            return None;
        }
        bytemuck::try_cast_slice(&self.inner).ok()
    }

    /// Inner fan as typed shaded vertices, when shaded.
    pub fn shaded_vertices(&self) -> Option<&[ShadedVertex]> {
        self.shading.as_ref()?;
        bytemuck::try_cast_slice(&self.inner).ok()
    }

    /// Outer strip as typed vertices.
    pub fn outer_vertices(&self) -> &[Vertex2] {
        bytemuck::cast_slice(&self.outer)
    }

    /// Inner buffer as bytes, ready for a vertex buffer upload.
    pub fn inner_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.inner)
    }

    /// Outer buffer as bytes, ready for a vertex buffer upload.
    pub fn outer_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.outer)
    }
}
