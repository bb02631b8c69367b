//! Press, move, release and key routing inside a frame, plus widget focus.

use super::{CursorPosition, FrameKind};
use crate::config::UiConfig;
use crate::input::{KeyEvent, MouseEvent};
use crate::primitives::{Point, Rect, Size};
use crate::view::{Response, View, ViewCx, ViewFlags, ViewId, ViewTree, WatchSlot};

#[derive(Clone, Copy)]
enum MouseHook {
    Press,
    Move,
    Release,
}

impl MouseHook {
    fn call(self, view: &mut dyn View, cx: &mut ViewCx<'_>, event: &MouseEvent) -> Response {
        match self {
            MouseHook::Press => view.on_mouse_press(cx, event),
            MouseHook::Move => view.on_mouse_move(cx, event),
            MouseHook::Release => view.on_mouse_release(cx, event),
        }
    }
}

impl ViewTree {
    // ========================================================================
    // Mouse
    // ========================================================================

    /// Route a press into `frame`.
    ///
    /// The press bubbles from the hovered widget up towards the frame; the
    /// first view returning [`Response::Finish`] takes focus and the rest of
    /// the gesture. If nobody accepts, the frame records the press itself and
    /// a floating frame starts a move or resize drag. A hovered nested frame
    /// gets the press routed through its own dispatch state and, when it
    /// takes it, becomes the focused view of `frame`.
    pub fn frame_mouse_press(&mut self, frame: ViewId, event: &MouseEvent) -> Response {
        let Some(state) = self.dispatch_state(frame) else {
            return Response::Ignore;
        };
        let position = state.cursor_position;
        let hovered = state.hovered;
        if position == CursorPosition::Outside {
            return Response::Ignore;
        }

        let accepted = match (position, hovered) {
            (CursorPosition::Inside, Some(inner)) if self.is_dispatch_root(inner) => self
                .frame_mouse_press(inner, event)
                .is_finish()
                .then_some(inner),
            (CursorPosition::Inside, Some(hovered)) => {
                self.bubble_mouse(frame, hovered, event, MouseHook::Press)
            }
            _ => None,
        };
        if let Some(accepted) = accepted {
            self.set_focused_widget(frame, Some(accepted));
            if let Some(node) = self.node_mut(accepted) {
                node.set_flag(ViewFlags::PRESSED, true);
            }
            if let Some(state) = self.dispatch_state_mut(frame) {
                state.pressed = true;
                state.widget_gesture = true;
            }
            return Response::Finish;
        }

        let rect = self.global_rect(frame).unwrap_or_default();
        if let Some(state) = self.dispatch_state_mut(frame) {
            state.pressed = true;
            state.widget_gesture = false;
            state.press_origin = event.position;
            state.press_rect = rect;
        }
        tracing::trace!("{:?} took the press itself at {:?}", frame, position);
        Response::Finish
    }

    /// Route cursor movement into `frame`.
    ///
    /// During a gesture the focused widget gets every move; a frame-level
    /// drag on a floating frame moves or resizes it. Otherwise the move
    /// bubbles from the hovered widget.
    pub fn frame_mouse_move(
        &mut self,
        frame: ViewId,
        event: &MouseEvent,
        config: &UiConfig,
    ) -> Response {
        let Some(state) = self.dispatch_state(frame).cloned() else {
            return Response::Ignore;
        };
        if !state.pressed {
            return match state.hovered {
                Some(inner)
                    if state.cursor_position == CursorPosition::Inside
                        && self.is_dispatch_root(inner) =>
                {
                    self.frame_mouse_move(inner, event, config)
                }
                Some(hovered) if state.cursor_position == CursorPosition::Inside => self
                    .bubble_mouse(frame, hovered, event, MouseHook::Move)
                    .map_or(Response::Ignore, |_| Response::Finish),
                _ => Response::Ignore,
            };
        }
        if state.widget_gesture {
            match state.focused {
                Some(inner) if self.is_dispatch_root(inner) => {
                    self.frame_mouse_move(inner, event, config);
                }
                Some(focused) => {
                    let local = self.localize(focused, event);
                    self.with_behavior(focused, |view, cx| view.on_mouse_move(cx, &local));
                }
                None => {}
            }
            return Response::Finish;
        }
        if state.kind == FrameKind::Floating {
            let delta = event.position - state.press_origin;
            let target = drag_rect(
                state.press_rect,
                state.cursor_position,
                delta,
                config.min_frame_size,
            );
            self.apply_frame_rect(frame, target);
        }
        Response::Finish
    }

    /// Route a release into `frame`, ending any gesture.
    pub fn frame_mouse_release(&mut self, frame: ViewId, event: &MouseEvent) -> Response {
        let Some(state) = self.dispatch_state(frame).cloned() else {
            return Response::Ignore;
        };
        if !state.pressed {
            return match state.hovered {
                Some(inner)
                    if state.cursor_position == CursorPosition::Inside
                        && self.is_dispatch_root(inner) =>
                {
                    self.frame_mouse_release(inner, event)
                }
                Some(hovered) if state.cursor_position == CursorPosition::Inside => self
                    .bubble_mouse(frame, hovered, event, MouseHook::Release)
                    .map_or(Response::Ignore, |_| Response::Finish),
                _ => Response::Ignore,
            };
        }
        if let Some(state) = self.dispatch_state_mut(frame) {
            state.pressed = false;
            state.widget_gesture = false;
        }
        if let Some(focused) = state.focused.filter(|_| state.widget_gesture) {
            if let Some(node) = self.node_mut(focused) {
                node.set_flag(ViewFlags::PRESSED, false);
            }
            if self.is_dispatch_root(focused) {
                self.frame_mouse_release(focused, event);
            } else {
                let local = self.localize(focused, event);
                self.with_behavior(focused, |view, cx| view.on_mouse_release(cx, &local));
            }
        }
        Response::Finish
    }

    /// Whether `frame` holds an unfinished press.
    pub fn is_pressed(&self, frame: ViewId) -> bool {
        self.dispatch_state(frame).is_some_and(|s| s.pressed)
    }

    /// Call `hook` on `start` and its ancestors below `frame` until one accepts.
    fn bubble_mouse(
        &mut self,
        frame: ViewId,
        start: ViewId,
        event: &MouseEvent,
        hook: MouseHook,
    ) -> Option<ViewId> {
        let mut current = Some(start);
        while let Some(id) = current.filter(|id| *id != frame) {
            let local = self.localize(id, event);
            let response = self.with_behavior(id, |view, cx| hook.call(view, cx, &local));
            if response == Some(Response::Finish) {
                return Some(id);
            }
            current = self.parent(id);
        }
        None
    }

    fn apply_frame_rect(&mut self, frame: ViewId, global: Rect) {
        let parent_origin = self
            .parent(frame)
            .and_then(|p| self.content_origin(p))
            .unwrap_or_default();
        self.move_to(frame, global.origin() - parent_origin);
        self.resize(frame, global.size());
    }

    // ========================================================================
    // Keys
    // ========================================================================

    /// Deliver a key to the focused widget of `frame`, bubbling up to and
    /// including the frame. `Ignore` when nothing is focused.
    ///
    /// A focused nested frame routes the key to its own focused widget
    /// first; if nothing there takes it, bubbling continues above it.
    pub fn frame_key_press(&mut self, frame: ViewId, event: &KeyEvent) -> Response {
        let Some(focused) = self.focused_widget(frame) else {
            return Response::Ignore;
        };
        let mut current = Some(focused);
        while let Some(id) = current {
            let response = if id != frame && self.is_dispatch_root(id) {
                Some(self.frame_key_press(id, event))
            } else {
                self.with_behavior(id, |view, cx| view.on_key_press(cx, event))
            };
            if response == Some(Response::Finish) {
                return Response::Finish;
            }
            if id == frame {
                break;
            }
            current = self.parent(id);
        }
        Response::Ignore
    }

    // ========================================================================
    // Focus
    // ========================================================================

    /// Make `widget` the focused widget of `frame`, firing focus-out on the
    /// previous one first.
    pub fn set_focused_widget(&mut self, frame: ViewId, widget: Option<ViewId>) {
        let Some(previous) = self.dispatch_state(frame).map(|s| s.focused) else {
            return;
        };
        if previous == widget {
            return;
        }
        if let Some(old) = previous {
            if let Some(state) = self.dispatch_state_mut(frame) {
                state.focused = None;
                state.widget_gesture = false;
            }
            self.unwatch_removal(old, frame, WatchSlot::Focused);
            if let Some(node) = self.node_mut(old) {
                node.set_flag(ViewFlags::FOCUS, false);
                node.set_flag(ViewFlags::PRESSED, false);
            }
            self.with_behavior(old, |view, cx| view.on_focus_out(cx));
            self.mark_refresh(old);
        }
        if let Some(new) = widget.filter(|w| self.contains(*w)) {
            if let Some(state) = self.dispatch_state_mut(frame) {
                state.focused = Some(new);
            }
            self.watch_removal(new, frame, WatchSlot::Focused);
            if let Some(node) = self.node_mut(new) {
                node.set_flag(ViewFlags::FOCUS, true);
            }
            self.with_behavior(new, |view, cx| view.on_focus_in(cx));
            self.mark_refresh(new);
        }
        tracing::debug!("Focus in {:?}: {:?} -> {:?}", frame, previous, widget);
    }
}

/// Frame bounds after dragging by `delta` from `start` with the given grip.
///
/// Resizing never shrinks below `min`; the opposite edge stays put.
pub fn drag_rect(start: Rect, grip: CursorPosition, delta: Point, min: Size) -> Rect {
    if grip == CursorPosition::Inside {
        return start.translate(delta);
    }
    let mut rect = start;
    if grip.grabs_left() {
        rect.width = (start.width - delta.x).max(min.width);
        rect.x = start.right() - rect.width;
    } else if grip.grabs_right() {
        rect.width = (start.width + delta.x).max(min.width);
    }
    if grip.grabs_bottom() {
        rect.height = (start.height - delta.y).max(min.height);
        rect.y = start.top() - rect.height;
    } else if grip.grabs_top() {
        rect.height = (start.height + delta.y).max(min.height);
    }
    rect
}
