//! Stock containers built on the geometry protocol.
//!
//! [`LinearLayout`] places its children in a row or column and re-lays them
//! out whenever its own size changes or a child resizes itself.
//! [`ScrollView`] shifts its children with the node offset, clamped to
//! their extent.

use crate::form::Orientation;
use crate::input::{Key, KeyEvent, MouseEvent, NamedKey};
use crate::primitives::{Point, Rect, Size};
use crate::view::{Response, UpdateKind, UpdateRequest, View, ViewCx, ViewId, ViewTree};

// =========================================================================
// LinearLayout
// =========================================================================

/// Children flow left to right (horizontal) or top to bottom (vertical).
///
/// Each child keeps its length along the main axis and is stretched across
/// the other one. Coordinates are Y-up, so the first child of a vertical
/// layout sits against the top edge.
#[derive(Debug, Clone, Default)]
pub struct LinearLayout {
    orientation: Orientation,
    spacing: i32,
    padding: i32,
}

impl LinearLayout {
    pub fn new(orientation: Orientation) -> Self {
        Self {
            orientation,
            spacing: 0,
            padding: 0,
        }
    }

    pub fn horizontal() -> Self {
        Self::new(Orientation::Horizontal)
    }

    pub fn vertical() -> Self {
        Self::new(Orientation::Vertical)
    }

    /// Gap between neighbouring children.
    pub fn spacing(mut self, spacing: i32) -> Self {
        self.spacing = spacing.max(0);
        self
    }

    /// Gap between the edges and the children.
    pub fn padding(mut self, padding: i32) -> Self {
        self.padding = padding.max(0);
        self
    }

    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    /// Target rects for `sizes` inside a container of `size`, in child space.
    pub fn arrange(&self, size: Size, sizes: &[Size]) -> Vec<Rect> {
        let pad = self.padding;
        let mut cursor = pad;
        sizes
            .iter()
            .map(|child| {
                let rect = match self.orientation {
                    Orientation::Horizontal => Rect::new(
                        cursor,
                        pad,
                        child.width,
                        (size.height - 2 * pad).max(0),
                    ),
                    Orientation::Vertical => Rect::new(
                        pad,
                        size.height - cursor - child.height,
                        (size.width - 2 * pad).max(0),
                        child.height,
                    ),
                };
                cursor += match self.orientation {
                    Orientation::Horizontal => child.width,
                    Orientation::Vertical => child.height,
                } + self.spacing;
                rect
            })
            .collect()
    }

    /// Smallest size that fits `sizes` without stretching any of them.
    pub fn content_size(&self, sizes: &[Size]) -> Size {
        let gaps = self.spacing * (sizes.len().saturating_sub(1)) as i32;
        let (main, cross) = sizes.iter().fold((0, 0), |(main, cross), s| match self.orientation {
            Orientation::Horizontal => (main + s.width, cross.max(s.height)),
            Orientation::Vertical => (main + s.height, cross.max(s.width)),
        });
        let pad = 2 * self.padding;
        match self.orientation {
            Orientation::Horizontal => Size::new(main + gaps + pad, cross + pad),
            Orientation::Vertical => Size::new(cross + pad, main + gaps + pad),
        }
    }

    fn layout(&self, cx: &mut ViewCx<'_>) {
        let children = cx.children();
        let sizes: Vec<Size> = children
            .iter()
            .map(|c| cx.tree().size(*c).unwrap_or_default())
            .collect();
        let rects = self.arrange(cx.size(), &sizes);
        for (child, rect) in children.into_iter().zip(rects) {
            cx.resize_subview(child, rect.size());
            cx.move_subview_to(child, rect.origin());
        }
        tracing::trace!("Laid out {:?} ({:?})", cx.id(), self.orientation);
    }

    /// Lay out the children of `id` now, e.g. after pushing new subviews.
    ///
    /// Returns `false` if `id` is not a `LinearLayout`.
    pub fn relayout(tree: &mut ViewTree, id: ViewId) -> bool {
        tree.with_behavior(id, |view, cx| {
            match view.as_any_mut().downcast_mut::<LinearLayout>() {
                Some(layout) => {
                    layout.layout(cx);
                    true
                }
                None => false,
            }
        })
        .unwrap_or(false)
    }
}

impl View for LinearLayout {
    fn perform_update(&mut self, cx: &mut ViewCx<'_>, request: &UpdateRequest) {
        if matches!(request.kind, UpdateKind::Size(_)) {
            self.layout(cx);
        }
    }

    fn on_child_changed(&mut self, cx: &mut ViewCx<'_>, request: &UpdateRequest) {
        if matches!(request.kind, UpdateKind::Size(_) | UpdateKind::Visibility(_)) {
            self.layout(cx);
        }
    }

    fn after_added(&mut self, cx: &mut ViewCx<'_>) {
        self.layout(cx);
    }
}

// =========================================================================
// ScrollView
// =========================================================================

/// Viewport over children that may extend past its bounds.
///
/// The node offset is the scroll position; it stays within the range that
/// keeps the union of the children's rects and the viewport in view.
#[derive(Debug, Clone)]
pub struct ScrollView {
    /// Pixels moved per arrow key.
    step: i32,
}

impl Default for ScrollView {
    fn default() -> Self {
        Self::new()
    }
}

impl ScrollView {
    pub fn new() -> Self {
        Self { step: 20 }
    }

    pub fn step(mut self, step: i32) -> Self {
        self.step = step.max(1);
        self
    }

    /// Shift the content of `id` by `delta`, clamped. Returns whether the
    /// offset changed.
    pub fn scroll_by(tree: &mut ViewTree, id: ViewId, delta: Point) -> bool {
        let target = tree.offset(id) + delta;
        Self::scroll_to(tree, id, target)
    }

    /// Set the offset of `id`, clamped to its content extent.
    pub fn scroll_to(tree: &mut ViewTree, id: ViewId, offset: Point) -> bool {
        let Some((lo, hi)) = Self::offset_range(tree, id) else {
            return false;
        };
        let clamped = Point::new(offset.x.clamp(lo.x, hi.x), offset.y.clamp(lo.y, hi.y));
        tree.set_offset(id, clamped)
    }

    /// Inclusive range of valid offsets for `id`.
    pub fn offset_range(tree: &ViewTree, id: ViewId) -> Option<(Point, Point)> {
        let size = tree.size(id)?;
        let content = tree
            .children(id)
            .filter(|c| tree.is_visible(*c))
            .filter_map(|c| tree.rect(c))
            .fold(Rect::from_origin_size(Point::ORIGIN, size), union);
        let lo = Point::new(size.width - content.right(), size.height - content.top());
        let hi = Point::new(-content.x, -content.y);
        Some((lo, hi))
    }

    fn clamp_current(cx: &mut ViewCx<'_>) {
        let current = cx.tree().offset(cx.id());
        let id = cx.id();
        Self::scroll_to(cx.tree_mut(), id, current);
    }
}

fn union(a: Rect, b: Rect) -> Rect {
    let x = a.x.min(b.x);
    let y = a.y.min(b.y);
    Rect::new(x, y, a.right().max(b.right()) - x, a.top().max(b.top()) - y)
}

impl View for ScrollView {
    fn perform_update(&mut self, cx: &mut ViewCx<'_>, request: &UpdateRequest) {
        if matches!(request.kind, UpdateKind::Size(_)) {
            Self::clamp_current(cx);
        }
    }

    fn on_child_changed(&mut self, cx: &mut ViewCx<'_>, _request: &UpdateRequest) {
        Self::clamp_current(cx);
    }

    fn on_mouse_press(&mut self, _cx: &mut ViewCx<'_>, _event: &MouseEvent) -> Response {
        // Take focus so arrow keys scroll.
        Response::Finish
    }

    fn on_key_press(&mut self, cx: &mut ViewCx<'_>, event: &KeyEvent) -> Response {
        let delta = match event.key {
            Key::Named(NamedKey::ArrowUp) => Point::new(0, -self.step),
            Key::Named(NamedKey::ArrowDown) => Point::new(0, self.step),
            Key::Named(NamedKey::ArrowLeft) => Point::new(self.step, 0),
            Key::Named(NamedKey::ArrowRight) => Point::new(-self.step, 0),
            Key::Named(NamedKey::PageUp) => Point::new(0, -cx.size().height),
            Key::Named(NamedKey::PageDown) => Point::new(0, cx.size().height),
            _ => return Response::Ignore,
        };
        let id = cx.id();
        Self::scroll_by(cx.tree_mut(), id, delta);
        Response::Finish
    }
}
