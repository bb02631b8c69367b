use super::{ViewId, ViewTree};
use crate::primitives::{Point, Rect, Size};

/// Handle given to view hooks: the tree plus the id of the view being called.
pub struct ViewCx<'a> {
    tree: &'a mut ViewTree,
    id: ViewId,
}

impl<'a> ViewCx<'a> {
    pub(crate) fn new(tree: &'a mut ViewTree, id: ViewId) -> Self {
        Self { tree, id }
    }

    #[inline]
    pub fn id(&self) -> ViewId {
        self.id
    }

    pub fn tree(&self) -> &ViewTree {
        self.tree
    }

    pub fn tree_mut(&mut self) -> &mut ViewTree {
        self.tree
    }

    pub fn parent(&self) -> Option<ViewId> {
        self.tree.parent(self.id)
    }

    pub fn size(&self) -> Size {
        self.tree.size(self.id).unwrap_or_default()
    }

    pub fn position(&self) -> Point {
        self.tree.position(self.id).unwrap_or_default()
    }

    pub fn rect(&self) -> Rect {
        self.tree.rect(self.id).unwrap_or_default()
    }

    /// Snapshot of the children, safe to iterate while mutating the tree.
    pub fn children(&self) -> Vec<ViewId> {
        self.tree.children(self.id).collect()
    }

    pub fn is_hovered(&self) -> bool {
        self.tree.is_hovered(self.id)
    }

    pub fn is_focused(&self) -> bool {
        self.tree.is_focused(self.id)
    }

    pub fn request_redraw(&mut self) {
        self.tree.mark_refresh(self.id);
    }

    /// Resize this view; the parent is told afterwards.
    pub fn resize(&mut self, size: Size) -> bool {
        self.tree.resize(self.id, size)
    }

    /// Move this view; the parent is told afterwards.
    pub fn move_to(&mut self, position: Point) -> bool {
        self.tree.move_to(self.id, position)
    }

    /// Resize one of this view's children without it reporting back.
    pub fn resize_subview(&mut self, child: ViewId, size: Size) -> bool {
        self.tree.resize_subview(self.id, child, size)
    }

    /// Move one of this view's children without it reporting back.
    pub fn move_subview_to(&mut self, child: ViewId, position: Point) -> bool {
        self.tree.move_subview_to(self.id, child, position)
    }

    pub fn set_subview_visible(&mut self, child: ViewId, visible: bool) -> bool {
        self.tree.set_subview_visible(self.id, child, visible)
    }

    /// Shift this view's children (scrolling, panning).
    pub fn set_offset(&mut self, offset: Point) -> bool {
        self.tree.set_offset(self.id, offset)
    }
}
