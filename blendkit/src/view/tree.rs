//! Arena storage, structural operations and removal watches.

use std::collections::HashSet;

use slotmap::SlotMap;

use super::cx::ViewCx;
use super::node::ViewNode;
use super::{Ownership, View, ViewFlags, ViewId, ViewType};
use crate::error::TreeError;
use crate::primitives::{Point, Rect, Size};

/// Which dispatch-state slot of a watcher refers to a watched node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WatchSlot {
    /// `hovered` of a frame (widget) or window (frame).
    Hovered,
    /// `focused` of a frame (widget) or window (frame).
    Focused,
}

/// "When `target` leaves the tree, clear `slot` of `watcher`."
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct RemovalWatch {
    target: ViewId,
    watcher: ViewId,
    slot: WatchSlot,
}

#[derive(Debug, Clone, Copy)]
enum LinkAt {
    Front,
    Back,
    Before(ViewId),
}

/// The arena holding every view of a window.
pub struct ViewTree {
    pub(crate) nodes: SlotMap<ViewId, ViewNode>,
    watches: Vec<RemovalWatch>,
    pub(crate) in_flight: Vec<(ViewId, u8)>,
    default_round_radius: f32,
}

impl Default for ViewTree {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for ViewTree {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ViewTree")
            .field("nodes", &self.nodes.len())
            .field("watches", &self.watches.len())
            .finish()
    }
}

impl ViewTree {
    pub fn new() -> Self {
        Self {
            nodes: SlotMap::with_key(),
            watches: Vec::new(),
            in_flight: Vec::new(),
            default_round_radius: 5.0,
        }
    }

    /// Corner radius given to newly inserted nodes.
    pub fn set_default_round_radius(&mut self, radius: f32) {
        self.default_round_radius = radius.max(0.0);
    }

    // ========================================================================
    // Insertion and lookup
    // ========================================================================

    /// Insert a detached node owned by the tree.
    pub fn insert(&mut self, view: impl View + 'static) -> ViewId {
        self.insert_boxed(Box::new(view), Ownership::Managed)
    }

    /// Insert a detached node that survives removal from its parent.
    pub fn insert_external(&mut self, view: impl View + 'static) -> ViewId {
        self.insert_boxed(Box::new(view), Ownership::External)
    }

    pub fn insert_boxed(&mut self, view: Box<dyn View>, ownership: Ownership) -> ViewId {
        let id = self
            .nodes
            .insert(ViewNode::new(view, ownership, self.default_round_radius));
        tracing::trace!("Inserted {:?} as {:?}", id, ownership);
        id
    }

    /// Number of live nodes, attached or not.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    #[inline]
    pub fn contains(&self, id: ViewId) -> bool {
        self.nodes.contains_key(id)
    }

    pub fn node(&self, id: ViewId) -> Option<&ViewNode> {
        self.nodes.get(id)
    }

    pub(crate) fn node_mut(&mut self, id: ViewId) -> Option<&mut ViewNode> {
        self.nodes.get_mut(id)
    }

    fn live(&self, id: ViewId) -> Result<&ViewNode, TreeError> {
        self.nodes.get(id).ok_or(TreeError::StaleHandle(id))
    }

    /// Borrow a node's behaviour as its concrete type.
    ///
    /// Returns `None` for stale handles, type mismatches, and while the
    /// behaviour is checked out to run one of its own hooks.
    pub fn view<T: View>(&self, id: ViewId) -> Option<&T> {
        self.nodes
            .get(id)?
            .behavior
            .as_deref()?
            .as_any()
            .downcast_ref::<T>()
    }

    pub fn view_mut<T: View>(&mut self, id: ViewId) -> Option<&mut T> {
        self.nodes
            .get_mut(id)?
            .behavior
            .as_deref_mut()?
            .as_any_mut()
            .downcast_mut::<T>()
    }

    /// Run `f` with the node's behaviour checked out of the arena.
    ///
    /// Returns `None` if the node is gone or its behaviour is already
    /// checked out further up the stack.
    pub(crate) fn with_behavior<R>(
        &mut self,
        id: ViewId,
        f: impl FnOnce(&mut dyn View, &mut ViewCx<'_>) -> R,
    ) -> Option<R> {
        let mut behavior = self.nodes.get_mut(id)?.behavior.take()?;
        let result = {
            let mut cx = ViewCx::new(self, id);
            f(behavior.as_mut(), &mut cx)
        };
        // The hook may have destroyed its own node; the behaviour drops here then.
        if let Some(node) = self.nodes.get_mut(id) {
            node.behavior = Some(behavior);
        }
        Some(result)
    }

    // ========================================================================
    // Attribute accessors
    // ========================================================================

    pub fn view_type(&self, id: ViewId) -> Option<ViewType> {
        self.nodes.get(id).map(|n| n.view_type)
    }

    pub fn flags(&self, id: ViewId) -> ViewFlags {
        self.nodes.get(id).map(|n| n.flags).unwrap_or_default()
    }

    pub fn position(&self, id: ViewId) -> Option<Point> {
        self.nodes.get(id).map(|n| n.position)
    }

    pub fn size(&self, id: ViewId) -> Option<Size> {
        self.nodes.get(id).map(|n| n.size)
    }

    /// Bounds in the parent's child space.
    pub fn rect(&self, id: ViewId) -> Option<Rect> {
        self.nodes.get(id).map(|n| n.rect())
    }

    pub fn offset(&self, id: ViewId) -> Point {
        self.nodes.get(id).map(|n| n.offset).unwrap_or_default()
    }

    /// Shift the children of `id` by `offset` (scrolling, canvas panning).
    pub fn set_offset(&mut self, id: ViewId, offset: Point) -> bool {
        match self.nodes.get_mut(id) {
            Some(node) if node.offset != offset => {
                node.offset = offset;
                self.mark_refresh(id);
                true
            }
            _ => false,
        }
    }

    pub fn is_visible(&self, id: ViewId) -> bool {
        self.flags(id).contains(ViewFlags::VISIBLE)
    }

    pub fn is_hovered(&self, id: ViewId) -> bool {
        self.flags(id).contains(ViewFlags::HOVER)
    }

    pub fn is_focused(&self, id: ViewId) -> bool {
        self.flags(id).contains(ViewFlags::FOCUS)
    }

    pub fn needs_refresh(&self, id: ViewId) -> bool {
        self.flags(id).contains(ViewFlags::REFRESH)
    }

    /// Mark `id` and its ancestors as needing a redraw.
    pub fn mark_refresh(&mut self, id: ViewId) {
        let mut current = Some(id);
        while let Some(cur) = current {
            let Some(node) = self.nodes.get_mut(cur) else {
                break;
            };
            node.flags.insert(ViewFlags::REFRESH);
            current = node.parent;
        }
    }

    pub(crate) fn clear_refresh(&mut self, id: ViewId) {
        if let Some(node) = self.nodes.get_mut(id) {
            node.flags.remove(ViewFlags::REFRESH);
        }
    }

    /// Window-space origin of `id`'s own coordinate space.
    pub fn global_position(&self, id: ViewId) -> Option<Point> {
        let node = self.nodes.get(id)?;
        let mut origin = node.position;
        let mut current = node.parent;
        while let Some(parent) = current {
            let parent_node = self.nodes.get(parent)?;
            origin = origin + parent_node.position + parent_node.offset;
            current = parent_node.parent;
        }
        Some(origin)
    }

    /// Window-space origin of the space `id`'s children are positioned in.
    pub fn content_origin(&self, id: ViewId) -> Option<Point> {
        Some(self.global_position(id)? + self.offset(id))
    }

    /// Convert a window-space point into `id`'s own space.
    pub fn to_local(&self, id: ViewId, global: Point) -> Option<Point> {
        Some(global - self.global_position(id)?)
    }

    // ========================================================================
    // Traversal
    // ========================================================================

    pub fn parent(&self, id: ViewId) -> Option<ViewId> {
        self.nodes.get(id)?.parent
    }

    pub fn first_subview(&self, id: ViewId) -> Option<ViewId> {
        self.nodes.get(id)?.first_child
    }

    pub fn last_subview(&self, id: ViewId) -> Option<ViewId> {
        self.nodes.get(id)?.last_child
    }

    pub fn next_subview(&self, id: ViewId) -> Option<ViewId> {
        self.nodes.get(id)?.next
    }

    pub fn previous_subview(&self, id: ViewId) -> Option<ViewId> {
        self.nodes.get(id)?.previous
    }

    pub fn subview_count(&self, id: ViewId) -> usize {
        self.nodes.get(id).map_or(0, |n| n.subview_count)
    }

    /// The `index`-th child, counting from the back of the draw order.
    pub fn subview_at(&self, id: ViewId, index: usize) -> Option<ViewId> {
        self.children(id).nth(index)
    }

    /// Position of `child` among its siblings.
    pub fn index_of(&self, child: ViewId) -> Option<usize> {
        let parent = self.parent(child)?;
        self.children(parent).position(|c| c == child)
    }

    /// Children in draw order (bottom first). Double-ended.
    pub fn children(&self, id: ViewId) -> Children<'_> {
        let node = self.nodes.get(id);
        Children {
            tree: self,
            front: node.and_then(|n| n.first_child),
            back: node.and_then(|n| n.last_child),
            remaining: node.map_or(0, |n| n.subview_count),
        }
    }

    /// Parent, grandparent, ... up to the root. Excludes `id` itself.
    pub fn ancestors(&self, id: ViewId) -> Ancestors<'_> {
        Ancestors {
            tree: self,
            next: self.parent(id),
        }
    }

    /// Whether `ancestor` is `id` or lies on its parent chain.
    pub fn is_ancestor_of(&self, ancestor: ViewId, id: ViewId) -> bool {
        id == ancestor || self.ancestors(id).any(|a| a == ancestor)
    }

    /// Number of ancestors.
    pub fn depth(&self, id: ViewId) -> usize {
        self.ancestors(id).count()
    }

    /// Topmost ancestor (or `id` itself when detached).
    pub fn root_of(&self, id: ViewId) -> ViewId {
        self.ancestors(id).last().unwrap_or(id)
    }

    /// `id` and everything below it, pre-order.
    pub fn descendants(&self, id: ViewId) -> Vec<ViewId> {
        let mut out = Vec::new();
        if !self.contains(id) {
            return out;
        }
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            out.push(current);
            // Reverse so the first child is visited first.
            stack.extend(self.children(current).rev());
        }
        out
    }

    /// Nearest ancestor that is a frame or window.
    pub fn dispatch_root_of(&self, id: ViewId) -> Option<ViewId> {
        self.ancestors(id)
            .find(|a| self.nodes.get(*a).is_some_and(|n| n.dispatch.is_some()))
    }

    // ========================================================================
    // Structural operations
    // ========================================================================

    /// Attach `child` as the last (topmost) subview of `parent`.
    pub fn push_back_subview(&mut self, parent: ViewId, child: ViewId) -> Result<(), TreeError> {
        self.attach(parent, child, LinkAt::Back)
    }

    /// Attach `child` as the first (bottommost) subview of `parent`.
    pub fn push_front_subview(&mut self, parent: ViewId, child: ViewId) -> Result<(), TreeError> {
        self.attach(parent, child, LinkAt::Front)
    }

    /// Attach `child` so it ends up at `index` among the subviews of `parent`.
    pub fn insert_subview(
        &mut self,
        parent: ViewId,
        index: usize,
        child: ViewId,
    ) -> Result<(), TreeError> {
        self.check_attach(parent, child)?;
        let count = self.subview_count(parent);
        if index > count {
            tracing::warn!("insert_subview: index {} out of range ({} subviews)", index, count);
            return Err(TreeError::IndexOutOfRange { index, count });
        }
        match self.subview_at(parent, index) {
            Some(anchor) => self.attach(parent, child, LinkAt::Before(anchor)),
            None => self.attach(parent, child, LinkAt::Back),
        }
    }

    fn check_attach(&self, parent: ViewId, child: ViewId) -> Result<(), TreeError> {
        self.live(parent)?;
        let child_node = self.live(child)?;
        let err = if parent == child {
            TreeError::SelfAttach(child)
        } else if child_node.parent == Some(parent) {
            TreeError::AlreadyChild { parent, child }
        } else if self.is_ancestor_of(child, parent) {
            TreeError::WouldCycle { parent, child }
        } else {
            return Ok(());
        };
        tracing::warn!("Rejected attach: {}", err);
        Err(err)
    }

    fn attach(&mut self, parent: ViewId, child: ViewId, at: LinkAt) -> Result<(), TreeError> {
        self.check_attach(parent, child)?;
        if self.parent(child).is_some() {
            self.detach(child);
            // A before_removed hook may have reattached or destroyed it.
            self.check_attach(parent, child)?;
            if self.parent(child).is_some() {
                return Err(TreeError::Attached(child));
            }
        }
        self.check_anchor(parent, at)?;
        self.link(parent, child, at);
        self.mark_refresh(child);
        self.with_behavior(child, |view, cx| view.after_added(cx));
        Ok(())
    }

    fn check_anchor(&self, parent: ViewId, at: LinkAt) -> Result<(), TreeError> {
        match at {
            LinkAt::Before(anchor) if self.parent(anchor) != Some(parent) => {
                Err(TreeError::NotAChild { parent, child: anchor })
            }
            _ => Ok(()),
        }
    }

    fn link(&mut self, parent: ViewId, child: ViewId, at: LinkAt) {
        let (previous, next) = match at {
            LinkAt::Front => (None, self.first_subview(parent)),
            LinkAt::Back => (self.last_subview(parent), None),
            LinkAt::Before(anchor) => (self.previous_subview(anchor), Some(anchor)),
        };
        if let Some(node) = self.nodes.get_mut(child) {
            node.parent = Some(parent);
            node.previous = previous;
            node.next = next;
        }
        match previous.and_then(|p| self.nodes.get_mut(p)) {
            Some(prev) => prev.next = Some(child),
            None => {
                if let Some(p) = self.nodes.get_mut(parent) {
                    p.first_child = Some(child);
                }
            }
        }
        match next.and_then(|n| self.nodes.get_mut(n)) {
            Some(next) => next.previous = Some(child),
            None => {
                if let Some(p) = self.nodes.get_mut(parent) {
                    p.last_child = Some(child);
                }
            }
        }
        if let Some(p) = self.nodes.get_mut(parent) {
            p.subview_count += 1;
        }
    }

    fn unlink(&mut self, child: ViewId) {
        let Some(node) = self.nodes.get_mut(child) else {
            return;
        };
        let (parent, previous, next) = (node.parent.take(), node.previous.take(), node.next.take());
        let Some(parent) = parent else {
            return;
        };
        match previous.and_then(|p| self.nodes.get_mut(p)) {
            Some(prev) => prev.next = next,
            None => {
                if let Some(p) = self.nodes.get_mut(parent) {
                    p.first_child = next;
                }
            }
        }
        match next.and_then(|n| self.nodes.get_mut(n)) {
            Some(n) => n.previous = previous,
            None => {
                if let Some(p) = self.nodes.get_mut(parent) {
                    p.last_child = previous;
                }
            }
        }
        if let Some(p) = self.nodes.get_mut(parent) {
            p.subview_count -= 1;
        }
    }

    /// Unlink `child` from its parent without destroying it.
    fn detach(&mut self, child: ViewId) {
        let Some(parent) = self.parent(child) else {
            return;
        };
        self.with_behavior(child, |view, cx| view.before_removed(cx));
        if self.parent(child) != Some(parent) {
            return;
        }
        self.unlink(child);
        self.clear_watches_into(child, false);
        self.mark_refresh(parent);
    }

    /// Detach `child` from `parent`.
    ///
    /// A managed child is destroyed afterwards (deferred while it is
    /// retained); an external child stays alive, detached.
    pub fn remove_subview(&mut self, parent: ViewId, child: ViewId) -> Result<(), TreeError> {
        self.live(parent)?;
        let node = self.live(child)?;
        if node.parent != Some(parent) {
            tracing::warn!("remove_subview: {:?} is not a child of {:?}", child, parent);
            return Err(TreeError::NotAChild { parent, child });
        }
        let ownership = node.ownership;
        self.detach(child);
        if ownership == Ownership::Managed && self.parent(child).is_none() {
            self.destroy_or_defer(child);
        }
        Ok(())
    }

    /// Remove every subview of `id`, destroying the managed ones.
    pub fn clear_subviews(&mut self, id: ViewId) -> Result<(), TreeError> {
        self.live(id)?;
        // Re-read the first child every step: hooks may unlink siblings.
        while let Some(first) = self.first_subview(id) {
            self.remove_subview(id, first)?;
        }
        Ok(())
    }

    /// Move `child` to the front of its siblings (drawn first, lowest).
    pub fn move_subview_to_back(&mut self, child: ViewId) -> Result<(), TreeError> {
        self.restack(child, LinkAt::Front)
    }

    /// Move `child` to the end of its siblings (drawn last, on top).
    pub fn move_subview_to_front(&mut self, child: ViewId) -> Result<(), TreeError> {
        self.restack(child, LinkAt::Back)
    }

    /// Move `child` right before `anchor`, a sibling.
    pub(crate) fn move_subview_before(&mut self, child: ViewId, anchor: ViewId) -> Result<(), TreeError> {
        if child == anchor {
            return Ok(());
        }
        self.restack(child, LinkAt::Before(anchor))
    }

    /// Reorder without running removal hooks or clearing watches.
    fn restack(&mut self, child: ViewId, at: LinkAt) -> Result<(), TreeError> {
        let Some(parent) = self.live(child)?.parent else {
            return Err(TreeError::Detached(child));
        };
        self.check_anchor(parent, at)?;
        self.unlink(child);
        self.link(parent, child, at);
        self.mark_refresh(child);
        Ok(())
    }

    /// Position a detached node without running the geometry protocol.
    pub fn set_initial_geometry(
        &mut self,
        id: ViewId,
        position: Point,
        size: Size,
    ) -> Result<(), TreeError> {
        let node = self.nodes.get_mut(id).ok_or(TreeError::StaleHandle(id))?;
        if node.parent.is_some() {
            return Err(TreeError::Attached(id));
        }
        node.position = position;
        node.size = size;
        Ok(())
    }

    // ========================================================================
    // Lifetime
    // ========================================================================

    /// Hold an extra reference; destruction is deferred until [`release`](Self::release).
    pub fn retain(&mut self, id: ViewId) -> Result<u32, TreeError> {
        let node = self.nodes.get_mut(id).ok_or(TreeError::StaleHandle(id))?;
        node.retain_count += 1;
        Ok(node.retain_count)
    }

    /// Drop a reference taken with [`retain`](Self::retain).
    ///
    /// Performs a pending destruction when the count reaches zero.
    pub fn release(&mut self, id: ViewId) -> Result<u32, TreeError> {
        let node = self.nodes.get_mut(id).ok_or(TreeError::StaleHandle(id))?;
        node.retain_count = node.retain_count.saturating_sub(1);
        let remaining = node.retain_count;
        if remaining == 0 && node.flags.contains(ViewFlags::DESTROYING) {
            self.destroy(id)?;
        }
        Ok(remaining)
    }

    pub fn retain_count(&self, id: ViewId) -> u32 {
        self.nodes.get(id).map_or(0, |n| n.retain_count)
    }

    /// Detach and destroy `id` and its managed subtree.
    ///
    /// External descendants are detached and left alive. Retained nodes are
    /// only detached and flagged; they go away on their final release.
    pub fn destroy(&mut self, id: ViewId) -> Result<(), TreeError> {
        self.live(id)?;
        self.detach(id);
        if self.parent(id).is_some() {
            return Err(TreeError::Attached(id));
        }
        self.destroy_or_defer(id);
        Ok(())
    }

    fn destroy_or_defer(&mut self, id: ViewId) {
        let Some(node) = self.nodes.get_mut(id) else {
            return;
        };
        if node.retain_count > 0 {
            node.flags.insert(ViewFlags::DESTROYING);
            tracing::debug!("Deferring destruction of retained {:?}", id);
            return;
        }
        // Children first, while this node is still alive for their hooks.
        while let Some(first) = self.first_subview(id) {
            if self.remove_subview(id, first).is_err() {
                break;
            }
        }
        debug_assert!(self.parent(id).is_none(), "destroying an attached view");
        self.clear_watches_for(id);
        if let Some(node) = self.nodes.remove(id) {
            tracing::trace!("Destroyed {:?} ({:?})", id, node.view_type);
        }
    }

    // ========================================================================
    // Removal watches
    // ========================================================================

    /// Clear `slot` of `watcher` when `target` is removed, destroyed or hidden.
    pub fn watch_removal(&mut self, target: ViewId, watcher: ViewId, slot: WatchSlot) {
        let watch = RemovalWatch {
            target,
            watcher,
            slot,
        };
        if !self.watches.contains(&watch) {
            self.watches.push(watch);
        }
    }

    pub fn unwatch_removal(&mut self, target: ViewId, watcher: ViewId, slot: WatchSlot) {
        self.watches
            .retain(|w| !(w.target == target && w.watcher == watcher && w.slot == slot));
    }

    /// Fire the watches pointing into the subtree rooted at `root`.
    ///
    /// Watchers inside the subtree keep their watches unless `include_inner`
    /// is set: a detached frame still owns its hovered widget.
    pub(crate) fn clear_watches_into(&mut self, root: ViewId, include_inner: bool) {
        if self.watches.is_empty() {
            return;
        }
        let subtree: HashSet<ViewId> = self.descendants(root).into_iter().collect();
        let (fired, kept): (Vec<_>, Vec<_>) = std::mem::take(&mut self.watches)
            .into_iter()
            .partition(|w| {
                subtree.contains(&w.target) && (include_inner || !subtree.contains(&w.watcher))
            });
        self.watches = kept;
        for watch in fired {
            self.clear_slot(watch);
        }
    }

    fn clear_watches_for(&mut self, id: ViewId) {
        let (fired, kept): (Vec<_>, Vec<_>) = std::mem::take(&mut self.watches)
            .into_iter()
            .partition(|w| w.target == id || w.watcher == id);
        self.watches = kept;
        for watch in fired.into_iter().filter(|w| w.watcher != id) {
            self.clear_slot(watch);
        }
    }

    fn clear_slot(&mut self, watch: RemovalWatch) {
        let Some(state) = self
            .nodes
            .get_mut(watch.watcher)
            .and_then(|n| n.dispatch.as_mut())
        else {
            return;
        };
        let (slot, flag) = match watch.slot {
            WatchSlot::Hovered => (&mut state.hovered, ViewFlags::HOVER),
            WatchSlot::Focused => (&mut state.focused, ViewFlags::FOCUS),
        };
        if *slot != Some(watch.target) {
            return;
        }
        *slot = None;
        if watch.slot == WatchSlot::Focused {
            state.widget_gesture = false;
        }
        tracing::debug!(
            "{:?} left the tree; cleared {:?} of {:?}",
            watch.target,
            watch.slot,
            watch.watcher
        );
        if let Some(target) = self.nodes.get_mut(watch.target) {
            target.flags.remove(flag);
        }
    }
}

/// Iterator over the children of a node. See [`ViewTree::children`].
pub struct Children<'a> {
    tree: &'a ViewTree,
    front: Option<ViewId>,
    back: Option<ViewId>,
    remaining: usize,
}

impl Iterator for Children<'_> {
    type Item = ViewId;

    fn next(&mut self) -> Option<ViewId> {
        if self.remaining == 0 {
            return None;
        }
        let current = self.front?;
        self.remaining -= 1;
        self.front = self.tree.next_subview(current);
        Some(current)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl DoubleEndedIterator for Children<'_> {
    fn next_back(&mut self) -> Option<ViewId> {
        if self.remaining == 0 {
            return None;
        }
        let current = self.back?;
        self.remaining -= 1;
        self.back = self.tree.previous_subview(current);
        Some(current)
    }
}

impl ExactSizeIterator for Children<'_> {}

/// Iterator up the parent chain. See [`ViewTree::ancestors`].
pub struct Ancestors<'a> {
    tree: &'a ViewTree,
    next: Option<ViewId>,
}

impl Iterator for Ancestors<'_> {
    type Item = ViewId;

    fn next(&mut self) -> Option<ViewId> {
        let current = self.next?;
        self.next = self.tree.parent(current);
        Some(current)
    }
}
