//! Hover resolution.

use super::{classify_cursor, CursorPosition, FrameKind};
use crate::input::MouseEvent;
use crate::primitives::Point;
use crate::view::{ViewFlags, ViewId, ViewTree, WatchSlot};

impl ViewTree {
    /// Work out which widget of `frame` is under the cursor and fire
    /// hover-out / hover-in on a change.
    ///
    /// `event.position` is in window coordinates. Floating frames classify
    /// the cursor against their border band of `threshold` pixels; while the
    /// cursor sits on a border nothing inside is hovered. A frame nested in
    /// `frame` becomes its hovered view and resolves its own hover.
    pub fn dispatch_mouse_hover(
        &mut self,
        frame: ViewId,
        event: &MouseEvent,
        threshold: i32,
    ) -> Option<ViewId> {
        let cursor = event.position;
        let kind = self.frame_kind(frame)?;
        let position = match self.global_rect(frame) {
            Some(rect) if self.is_visible(frame) => match kind {
                FrameKind::Floating => classify_cursor(rect, cursor, threshold),
                FrameKind::Regular if rect.contains(cursor) => CursorPosition::Inside,
                FrameKind::Regular => CursorPosition::Outside,
            },
            _ => CursorPosition::Outside,
        };
        if let Some(state) = self.dispatch_state_mut(frame) {
            state.cursor_position = position;
        }
        if position != CursorPosition::Inside {
            self.set_hovered_widget(frame, None, event);
            return None;
        }

        let previous = self.hovered_widget(frame);
        let hovered = match previous {
            Some(widget) if self.dispatch_root_of(widget) == Some(frame) => self
                .recheck_hover(frame, widget, cursor)
                .or_else(|| self.find_widget_under_cursor(frame, cursor)),
            _ => self.find_widget_under_cursor(frame, cursor),
        };
        self.set_hovered_widget(frame, hovered, event);
        if let Some(inner) = hovered.filter(|h| self.is_dispatch_root(*h)) {
            self.dispatch_mouse_hover(inner, event, threshold);
        }
        hovered
    }

    /// Fresh top-down search: topmost child first, descending into the
    /// deepest view that contains the cursor.
    pub fn find_widget_under_cursor(&self, container: ViewId, cursor: Point) -> Option<ViewId> {
        let hit = self
            .children(container)
            .rev()
            .find(|child| self.hits(*child, cursor))?;
        Some(self.descend(hit, cursor))
    }

    /// Incremental recheck starting from the previously hovered widget.
    ///
    /// Returns `None` when the ancestor chain cannot be walked back to
    /// `frame`; the caller then does a fresh search.
    fn recheck_hover(&self, frame: ViewId, previous: ViewId, cursor: Point) -> Option<ViewId> {
        if self.hits_within(frame, previous, cursor) {
            return Some(self.descend(previous, cursor));
        }
        for ancestor in self.ancestors(previous) {
            if ancestor == frame {
                return self.find_widget_under_cursor(frame, cursor);
            }
            if self.hits_within(frame, ancestor, cursor) {
                // A sibling of the old hovered widget may be under the cursor.
                return Some(self.descend(ancestor, cursor));
            }
        }
        None
    }

    /// `id` and every ancestor below `frame` contain the cursor.
    ///
    /// Content scrolled or overflowing out of a container is not hit
    /// outside that container's bounds.
    fn hits_within(&self, frame: ViewId, id: ViewId, cursor: Point) -> bool {
        self.hits(id, cursor)
            && self
                .ancestors(id)
                .take_while(|a| *a != frame)
                .all(|a| self.hits(a, cursor))
    }

    /// Deepest view under the cursor starting at `current`, stopping at
    /// nested frames.
    fn descend(&self, mut current: ViewId, cursor: Point) -> ViewId {
        while !self.is_dispatch_root(current) {
            let Some(child) = self
                .children(current)
                .rev()
                .find(|child| self.hits(*child, cursor))
            else {
                break;
            };
            current = child;
        }
        current
    }

    /// Whether the window-space `cursor` hits visible view `id`.
    fn hits(&self, id: ViewId, cursor: Point) -> bool {
        let Some(node) = self.node(id) else {
            return false;
        };
        if !node.is_visible() {
            return false;
        }
        let Some(local) = self.to_local(id, cursor) else {
            return false;
        };
        match node.behavior.as_deref() {
            Some(view) => view.contains(local, node.size()),
            None => node.rect().translate(-node.position()).contains(local),
        }
    }

    /// Replace the hovered widget of `frame`, firing hover-out then hover-in.
    pub fn set_hovered_widget(&mut self, frame: ViewId, widget: Option<ViewId>, event: &MouseEvent) {
        let Some(previous) = self.dispatch_state(frame).map(|s| s.hovered) else {
            return;
        };
        if previous == widget {
            return;
        }
        if let Some(old) = previous {
            if let Some(state) = self.dispatch_state_mut(frame) {
                state.hovered = None;
            }
            if self.is_dispatch_root(old) {
                // Leaving a nested frame clears its own hover chain first.
                self.set_hovered_widget(old, None, event);
                if let Some(state) = self.dispatch_state_mut(old) {
                    state.cursor_position = CursorPosition::Outside;
                }
            }
            self.unwatch_removal(old, frame, WatchSlot::Hovered);
            if let Some(node) = self.node_mut(old) {
                node.set_flag(ViewFlags::HOVER, false);
            }
            let local = self.localize(old, event);
            self.with_behavior(old, |view, cx| view.on_hover_out(cx, &local));
            self.mark_refresh(old);
        }
        if let Some(new) = widget.filter(|w| self.contains(*w)) {
            if let Some(state) = self.dispatch_state_mut(frame) {
                state.hovered = Some(new);
            }
            self.watch_removal(new, frame, WatchSlot::Hovered);
            if let Some(node) = self.node_mut(new) {
                node.set_flag(ViewFlags::HOVER, true);
            }
            let local = self.localize(new, event);
            self.with_behavior(new, |view, cx| view.on_hover_in(cx, &local));
            self.mark_refresh(new);
        }
        tracing::debug!("Hover in {:?}: {:?} -> {:?}", frame, previous, widget);
    }

    pub(crate) fn localize(&self, id: ViewId, event: &MouseEvent) -> MouseEvent {
        event.localized(self.global_position(id).unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::Modifiers;
    use crate::primitives::Size;
    use crate::view::{EmptyView, View, ViewCx, ViewType};
    use std::cell::RefCell;
    use std::rc::Rc;

    type Log = Rc<RefCell<Vec<String>>>;

    struct Hoverable {
        name: &'static str,
        log: Log,
    }

    impl View for Hoverable {
        fn on_hover_in(&mut self, _cx: &mut ViewCx<'_>, event: &MouseEvent) {
            self.log
                .borrow_mut()
                .push(format!("in:{}@{},{}", self.name, event.local.x, event.local.y));
        }

        fn on_hover_out(&mut self, _cx: &mut ViewCx<'_>, _event: &MouseEvent) {
            self.log.borrow_mut().push(format!("out:{}", self.name));
        }
    }

    fn add(
        tree: &mut ViewTree,
        parent: ViewId,
        view: impl View + 'static,
        position: (i32, i32),
        size: (i32, i32),
    ) -> ViewId {
        let id = tree.insert(view);
        tree.set_initial_geometry(id, position.into(), size.into())
            .unwrap();
        tree.push_back_subview(parent, id).unwrap();
        id
    }

    fn hover(tree: &mut ViewTree, frame: ViewId, x: i32, y: i32) -> Option<ViewId> {
        tree.dispatch_mouse_hover(frame, &MouseEvent::moved(Point::new(x, y), Modifiers::NONE), 4)
    }

    fn frame(tree: &mut ViewTree) -> ViewId {
        let frame = tree.insert(EmptyView(ViewType::Frame));
        tree.set_initial_geometry(frame, Point::ORIGIN, Size::new(400, 300))
            .unwrap();
        frame
    }

    #[test]
    fn hover_moves_between_siblings_once() {
        let log = Log::default();
        let mut tree = ViewTree::new();
        let frame = frame(&mut tree);
        let a = add(&mut tree, frame, Hoverable { name: "a", log: log.clone() }, (0, 0), (100, 100));
        let b = add(&mut tree, frame, Hoverable { name: "b", log: log.clone() }, (100, 0), (100, 100));

        assert_eq!(hover(&mut tree, frame, 50, 50), Some(a));
        assert_eq!(hover(&mut tree, frame, 60, 50), Some(a));
        assert_eq!(hover(&mut tree, frame, 150, 50), Some(b));
        assert_eq!(*log.borrow(), vec!["in:a@50,50", "out:a", "in:b@50,50"]);
        assert!(!tree.is_hovered(a));
        assert!(tree.is_hovered(b));
    }

    #[test]
    fn descends_into_nested_children_with_offset() {
        let log = Log::default();
        let mut tree = ViewTree::new();
        let frame = frame(&mut tree);
        let panel = add(&mut tree, frame, EmptyView(ViewType::Widget), (50, 50), (200, 200));
        let inner = add(&mut tree, panel, Hoverable { name: "inner", log: log.clone() }, (10, 10), (20, 20));
        tree.set_offset(panel, Point::new(0, 30));

        // inner sits at 50 + 0 + 10 = 60 horizontally, 50 + 30 + 10 = 90 vertically.
        assert_eq!(hover(&mut tree, frame, 65, 95), Some(inner));
        assert_eq!(*log.borrow(), vec!["in:inner@5,5"]);
        assert_eq!(hover(&mut tree, frame, 65, 65), Some(panel));
    }

    #[test]
    fn panned_canvas_remaps_node_coordinates() {
        let log = Log::default();
        let mut tree = ViewTree::new();
        let frame = frame(&mut tree);
        let canvas = add(&mut tree, frame, EmptyView(ViewType::Widget), (0, 0), (400, 300));
        let node = add(&mut tree, canvas, EmptyView(ViewType::Node), (150, 100), (80, 60));
        let socket = add(&mut tree, node, Hoverable { name: "socket", log: log.clone() }, (0, 20), (10, 10));
        tree.set_offset(canvas, Point::new(-100, -50));

        // socket: 150 - 100 = 50 across, 100 - 50 + 20 = 70 up.
        assert_eq!(hover(&mut tree, frame, 52, 72), Some(socket));
        assert_eq!(hover(&mut tree, frame, 80, 80), Some(node));
        tree.set_offset(canvas, Point::ORIGIN);
        assert_eq!(hover(&mut tree, frame, 80, 80), Some(canvas));
        assert_eq!(*log.borrow(), vec!["in:socket@2,2", "out:socket"]);
    }

    #[test]
    fn topmost_sibling_wins() {
        let mut tree = ViewTree::new();
        let frame = frame(&mut tree);
        let _below = add(&mut tree, frame, EmptyView(ViewType::Widget), (0, 0), (100, 100));
        let above = add(&mut tree, frame, EmptyView(ViewType::Widget), (50, 0), (100, 100));
        assert_eq!(hover(&mut tree, frame, 75, 10), Some(above));
    }

    #[test]
    fn recheck_finds_child_that_appeared() {
        let mut tree = ViewTree::new();
        let frame = frame(&mut tree);
        let panel = add(&mut tree, frame, EmptyView(ViewType::Widget), (0, 0), (100, 100));
        assert_eq!(hover(&mut tree, frame, 10, 10), Some(panel));

        let child = add(&mut tree, panel, EmptyView(ViewType::Widget), (0, 0), (50, 50));
        assert_eq!(hover(&mut tree, frame, 11, 11), Some(child));
        assert!(!tree.is_hovered(panel));
    }

    #[test]
    fn leaving_every_widget_clears_hover() {
        let mut tree = ViewTree::new();
        let frame = frame(&mut tree);
        let a = add(&mut tree, frame, EmptyView(ViewType::Widget), (0, 0), (100, 100));
        hover(&mut tree, frame, 10, 10);
        assert_eq!(hover(&mut tree, frame, 300, 200), None);
        assert!(!tree.is_hovered(a));
        assert_eq!(hover(&mut tree, frame, 500, 500), None);
        assert_eq!(tree.cursor_position(frame), CursorPosition::Outside);
    }

    #[test]
    fn hidden_views_are_skipped() {
        let mut tree = ViewTree::new();
        let frame = frame(&mut tree);
        let below = add(&mut tree, frame, EmptyView(ViewType::Widget), (0, 0), (100, 100));
        let above = add(&mut tree, frame, EmptyView(ViewType::Widget), (0, 0), (100, 100));
        assert_eq!(hover(&mut tree, frame, 10, 10), Some(above));

        tree.set_visible(above, false);
        assert_eq!(tree.hovered_widget(frame), None);
        assert_eq!(hover(&mut tree, frame, 10, 10), Some(below));
    }

    #[test]
    fn removed_hovered_widget_is_forgotten() {
        let mut tree = ViewTree::new();
        let frame = frame(&mut tree);
        let a = add(&mut tree, frame, EmptyView(ViewType::Widget), (0, 0), (100, 100));
        hover(&mut tree, frame, 10, 10);

        tree.destroy(a).unwrap();
        assert_eq!(tree.hovered_widget(frame), None);
        assert_eq!(hover(&mut tree, frame, 10, 10), None);
    }

    #[test]
    fn floating_border_suppresses_hover() {
        let mut tree = ViewTree::new();
        let frame = frame(&mut tree);
        tree.dispatch_state_mut(frame).unwrap().kind = FrameKind::Floating;
        let a = add(&mut tree, frame, EmptyView(ViewType::Widget), (0, 0), (100, 100));

        assert_eq!(hover(&mut tree, frame, 1, 50), None);
        assert_eq!(tree.cursor_position(frame), CursorPosition::Left);
        assert_eq!(hover(&mut tree, frame, 10, 50), Some(a));
    }

    #[test]
    fn nested_frame_resolves_its_own_hover() {
        let log = Log::default();
        let mut tree = ViewTree::new();
        let outer = frame(&mut tree);
        let inner = add(&mut tree, outer, EmptyView(ViewType::Frame), (100, 100), (200, 200));
        let leaf = add(&mut tree, inner, Hoverable { name: "leaf", log: log.clone() }, (10, 10), (50, 50));

        assert_eq!(hover(&mut tree, outer, 120, 120), Some(inner));
        assert_eq!(tree.hovered_widget(outer), Some(inner));
        assert_eq!(tree.hovered_widget(inner), Some(leaf));
        assert_eq!(tree.cursor_position(inner), CursorPosition::Inside);

        // Incremental recheck keeps both levels.
        assert_eq!(hover(&mut tree, outer, 130, 130), Some(inner));
        assert_eq!(tree.hovered_widget(inner), Some(leaf));

        assert_eq!(hover(&mut tree, outer, 50, 50), None);
        assert_eq!(tree.hovered_widget(inner), None);
        assert_eq!(tree.cursor_position(inner), CursorPosition::Outside);
        assert!(!tree.is_hovered(leaf));
        assert_eq!(*log.borrow(), vec!["in:leaf@10,10", "out:leaf"]);
    }

    #[test]
    fn overflowing_content_is_not_hit_outside_its_container() {
        let mut tree = ViewTree::new();
        let frame = frame(&mut tree);
        let behind = add(&mut tree, frame, EmptyView(ViewType::Widget), (0, 150), (100, 100));
        let viewport = add(&mut tree, frame, EmptyView(ViewType::Widget), (0, 0), (100, 100));
        let content = add(&mut tree, viewport, EmptyView(ViewType::Widget), (0, 0), (100, 400));

        assert_eq!(tree.find_widget_under_cursor(frame, Point::new(50, 200)), Some(behind));
        assert_eq!(hover(&mut tree, frame, 50, 50), Some(content));
        // Coming from inside the viewport gives the same answer as a fresh search.
        assert_eq!(hover(&mut tree, frame, 50, 200), Some(behind));
        assert!(!tree.is_hovered(content));
    }
}
