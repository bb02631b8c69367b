//! The window: frame stacking and top-level input routing.
//!
//! A [`Window`] owns the [`ViewTree`]. Its root node holds the frames as
//! children; later children draw on top, and every floating frame stays
//! above every regular one. Input is offered to frames from the topmost
//! down and stops at the first that answers [`Response::Finish`].

use crate::config::UiConfig;
use crate::dispatch::{DispatchState, FrameKind};
use crate::error::TreeError;
use crate::input::{Key, KeyAction, KeyEvent, Modifiers, MouseAction, MouseButton, MouseEvent};
use crate::primitives::{Point, Rect, Size};
use crate::redraw::RedrawHandle;
use crate::render::{DrawList, RenderContext};
use crate::view::{EmptyView, Ownership, Response, View, ViewFlags, ViewId, ViewTree, ViewType, WatchSlot};

/// A top-level window and everything in it.
pub struct Window {
    tree: ViewTree,
    root: ViewId,
    config: UiConfig,
    cursor: Point,
    modifiers: Modifiers,
    redraw: RedrawHandle,
}

impl std::fmt::Debug for Window {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Window")
            .field("root", &self.root)
            .field("size", &self.size())
            .field("frames", &self.frames().len())
            .field("cursor", &self.cursor)
            .finish()
    }
}

impl Window {
    pub fn new(size: Size, config: UiConfig) -> Self {
        let mut tree = ViewTree::new();
        tree.set_default_round_radius(config.default_round_radius);
        let root = tree.insert(EmptyView(ViewType::Window));
        if let Some(node) = tree.node_mut(root) {
            node.size = size;
        }
        tracing::debug!("Created {}x{} window", size.width, size.height);
        Self {
            tree,
            root,
            config,
            cursor: Point::ORIGIN,
            modifiers: Modifiers::NONE,
            redraw: RedrawHandle::new(),
        }
    }

    pub fn tree(&self) -> &ViewTree {
        &self.tree
    }

    pub fn tree_mut(&mut self) -> &mut ViewTree {
        &mut self.tree
    }

    pub fn root(&self) -> ViewId {
        self.root
    }

    pub fn config(&self) -> &UiConfig {
        &self.config
    }

    pub fn size(&self) -> Size {
        self.tree.size(self.root).unwrap_or_default()
    }

    /// Last cursor position seen, in window coordinates.
    pub fn cursor(&self) -> Point {
        self.cursor
    }

    /// Resize the window itself.
    ///
    /// Regular frames that covered the whole window keep covering it;
    /// every other frame keeps its bounds.
    pub fn resize(&mut self, size: Size) -> bool {
        let old = Rect::from_origin_size(Point::ORIGIN, self.size());
        if !self.tree.resize(self.root, size) {
            return false;
        }
        let filling: Vec<ViewId> = self
            .tree
            .children(self.root)
            .filter(|f| {
                self.tree.frame_kind(*f) == Some(FrameKind::Regular)
                    && self.tree.rect(*f) == Some(old)
            })
            .collect();
        for frame in filling {
            self.tree.resize_subview(self.root, frame, size);
        }
        true
    }

    // ========================================================================
    // Frames
    // ========================================================================

    /// Insert `view` as a frame with window-space bounds `rect`.
    ///
    /// Floating frames go on top of everything; regular frames go on top of
    /// the other regular frames but below the floating ones.
    pub fn add_frame(
        &mut self,
        view: impl View + 'static,
        kind: FrameKind,
        rect: Rect,
    ) -> Result<ViewId, TreeError> {
        let frame = self.tree.insert_boxed(Box::new(view), Ownership::Managed);
        if let Some(node) = self.tree.node_mut(frame) {
            node.view_type = ViewType::Frame;
            node.dispatch = Some(DispatchState {
                kind,
                ..DispatchState::default()
            });
        }
        self.tree
            .set_initial_geometry(frame, rect.origin(), rect.size())?;
        let attached = match (kind, self.first_floating_frame()) {
            (FrameKind::Regular, Some(floating)) => {
                let index = self.tree.index_of(floating).unwrap_or_default();
                self.tree.insert_subview(self.root, index, frame)
            }
            _ => self.tree.push_back_subview(self.root, frame),
        };
        if let Err(err) = attached {
            let _ = self.tree.destroy(frame);
            return Err(err);
        }
        tracing::debug!("Added {:?} frame {:?}", kind, frame);
        Ok(frame)
    }

    /// Remove (and destroy) a frame.
    pub fn remove_frame(&mut self, frame: ViewId) -> Result<(), TreeError> {
        self.ensure_frame(frame)?;
        self.tree.remove_subview(self.root, frame)
    }

    /// Frames bottom to top.
    pub fn frames(&self) -> Vec<ViewId> {
        self.tree.children(self.root).collect()
    }

    pub fn focused_frame(&self) -> Option<ViewId> {
        self.tree.focused_widget(self.root)
    }

    /// The frame under the cursor as of the last hover pass.
    pub fn hovered_frame(&self) -> Option<ViewId> {
        self.tree.hovered_widget(self.root)
    }

    /// The frame holding an unfinished press, if any.
    pub fn pressed_frame(&self) -> Option<ViewId> {
        self.tree
            .children(self.root)
            .rev()
            .find(|f| self.tree.is_pressed(*f))
    }

    fn first_floating_frame(&self) -> Option<ViewId> {
        self.tree
            .children(self.root)
            .find(|f| self.tree.frame_kind(*f) == Some(FrameKind::Floating))
    }

    fn ensure_frame(&self, frame: ViewId) -> Result<(), TreeError> {
        if !self.tree.contains(frame) {
            return Err(TreeError::StaleHandle(frame));
        }
        if self.tree.parent(frame) != Some(self.root) {
            return Err(TreeError::NotAFrame(frame));
        }
        Ok(())
    }

    /// Give `frame` keyboard focus and raise it within its stacking class.
    pub fn set_focused_frame(&mut self, frame: ViewId) -> Result<(), TreeError> {
        self.ensure_frame(frame)?;
        match self.tree.frame_kind(frame) {
            Some(FrameKind::Floating) => self.tree.move_subview_to_front(frame)?,
            _ => {
                let floating = self
                    .tree
                    .children(self.root)
                    .find(|f| *f != frame && self.tree.frame_kind(*f) == Some(FrameKind::Floating));
                match floating {
                    Some(anchor) => self.tree.move_subview_before(frame, anchor)?,
                    None => self.tree.move_subview_to_front(frame)?,
                }
            }
        }

        let root = self.root;
        let previous = self.focused_frame();
        if previous == Some(frame) {
            return Ok(());
        }
        if let Some(old) = previous {
            if let Some(state) = self.tree.dispatch_state_mut(root) {
                state.focused = None;
            }
            self.tree.unwatch_removal(old, root, WatchSlot::Focused);
            if let Some(node) = self.tree.node_mut(old) {
                node.set_flag(ViewFlags::FOCUS, false);
            }
            self.tree.with_behavior(old, |view, cx| view.on_focus_out(cx));
        }
        if let Some(state) = self.tree.dispatch_state_mut(root) {
            state.focused = Some(frame);
        }
        self.tree.watch_removal(frame, root, WatchSlot::Focused);
        if let Some(node) = self.tree.node_mut(frame) {
            node.set_flag(ViewFlags::FOCUS, true);
        }
        self.tree.with_behavior(frame, |view, cx| view.on_focus_in(cx));
        tracing::debug!("Focused frame {:?} -> {:?}", previous, frame);
        Ok(())
    }

    // ========================================================================
    // Routing
    // ========================================================================

    /// Update which frame, and which widget inside it, is under the cursor.
    ///
    /// Skipped while a frame holds a press so a drag keeps its grip.
    pub fn dispatch_mouse_hover(&mut self, event: &MouseEvent) {
        if self.pressed_frame().is_some() {
            return;
        }
        let top = self.tree.children(self.root).rev().find(|f| {
            self.tree.is_visible(*f)
                && self
                    .tree
                    .global_rect(*f)
                    .is_some_and(|r| r.contains(event.position))
        });

        // Leaving a frame also clears the hover inside it.
        self.tree.set_hovered_widget(self.root, top, event);
        if let Some(frame) = top {
            self.tree
                .dispatch_mouse_hover(frame, event, self.config.border_threshold);
        }
    }

    pub fn perform_mouse_press(&mut self, event: &MouseEvent) -> Response {
        for frame in self.frames().into_iter().rev() {
            if self.tree.frame_mouse_press(frame, event).is_finish() {
                if let Err(err) = self.set_focused_frame(frame) {
                    tracing::warn!("Could not focus {:?}: {}", frame, err);
                }
                return Response::Finish;
            }
        }
        Response::Ignore
    }

    pub fn perform_mouse_move(&mut self, event: &MouseEvent) -> Response {
        match self.pressed_frame().or_else(|| self.hovered_frame()) {
            Some(frame) => self.tree.frame_mouse_move(frame, event, &self.config),
            None => Response::Ignore,
        }
    }

    pub fn perform_mouse_release(&mut self, event: &MouseEvent) -> Response {
        match self.pressed_frame().or_else(|| self.hovered_frame()) {
            Some(frame) => self.tree.frame_mouse_release(frame, event),
            None => Response::Ignore,
        }
    }

    /// Keys go to the focused frame only.
    pub fn perform_key_press(&mut self, event: &KeyEvent) -> Response {
        match self.focused_frame() {
            Some(frame) => self.tree.frame_key_press(frame, event),
            None => Response::Ignore,
        }
    }

    // ========================================================================
    // Raw input from the platform layer
    // ========================================================================

    pub fn set_modifiers(&mut self, modifiers: Modifiers) {
        self.modifiers = modifiers;
    }

    /// Cursor moved to `position` (window coordinates, Y up).
    pub fn process_cursor_moved(&mut self, position: Point) -> Response {
        self.cursor = position;
        let event = MouseEvent::moved(position, self.modifiers);
        self.dispatch_mouse_hover(&event);
        self.perform_mouse_move(&event)
    }

    /// A mouse button changed at the last known cursor position.
    ///
    /// A release ends any drag, so hover is resolved again afterwards.
    pub fn process_mouse_button(&mut self, button: MouseButton, action: MouseAction) -> Response {
        let event = MouseEvent::button(self.cursor, button, action, self.modifiers);
        self.dispatch_mouse_hover(&event);
        match action {
            MouseAction::Press | MouseAction::Repeat => self.perform_mouse_press(&event),
            MouseAction::Release => {
                let response = self.perform_mouse_release(&event);
                self.dispatch_mouse_hover(&event);
                response
            }
        }
    }

    pub fn process_key(&mut self, key: Key, action: KeyAction, text: Option<String>) -> Response {
        if action == KeyAction::Release {
            return Response::Ignore;
        }
        let event = KeyEvent {
            key,
            action,
            modifiers: self.modifiers,
            text,
        };
        self.perform_key_press(&event)
    }

    // ========================================================================
    // Drawing
    // ========================================================================

    /// Handle for other threads to request a redraw.
    pub fn redraw_handle(&self) -> RedrawHandle {
        self.redraw.clone()
    }

    /// Whether anything changed since the last draw, consuming thread requests.
    pub fn take_redraw_request(&mut self) -> bool {
        let requested = self.redraw.take();
        requested || self.tree.needs_refresh(self.root)
    }

    /// Draw every visible frame back to front.
    pub fn draw(&mut self) -> DrawList {
        let mut render = RenderContext::new(&self.config.theme);
        self.tree.draw(self.root, &mut render);
        render.into_list()
    }
}
