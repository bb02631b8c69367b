//! Hover, focus, mouse and key dispatch inside a frame.
//!
//! Each frame (and the window root) carries a [`DispatchState`] naming its
//! hovered and focused descendant. Both references are registered as
//! removal watches, so removing, hiding or destroying the referenced view
//! clears the slot instead of leaving a stale handle behind.

mod hover;
mod press;

pub use press::drag_rect;

use serde::{Deserialize, Serialize};

use crate::primitives::{Point, Rect};
use crate::view::{ViewId, ViewTree};

/// How a frame is stacked among its siblings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FrameKind {
    /// Workspace panel: fixed, below every floating frame.
    #[default]
    Regular,
    /// Dialog or popup: draggable, resizable, always above regular frames.
    Floating,
}

/// Where the cursor sits relative to a frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CursorPosition {
    #[default]
    Outside,
    Inside,
    Left,
    Right,
    Top,
    Bottom,
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

impl CursorPosition {
    /// On an edge or corner band of a floating frame.
    pub fn is_border(self) -> bool {
        !matches!(self, CursorPosition::Outside | CursorPosition::Inside)
    }

    pub fn grabs_left(self) -> bool {
        matches!(
            self,
            CursorPosition::Left | CursorPosition::TopLeft | CursorPosition::BottomLeft
        )
    }

    pub fn grabs_right(self) -> bool {
        matches!(
            self,
            CursorPosition::Right | CursorPosition::TopRight | CursorPosition::BottomRight
        )
    }

    pub fn grabs_top(self) -> bool {
        matches!(
            self,
            CursorPosition::Top | CursorPosition::TopLeft | CursorPosition::TopRight
        )
    }

    pub fn grabs_bottom(self) -> bool {
        matches!(
            self,
            CursorPosition::Bottom | CursorPosition::BottomLeft | CursorPosition::BottomRight
        )
    }
}

/// Classify `point` against `rect` (Y-up: `rect.y` is the bottom edge).
///
/// Points within `threshold` pixels of an edge land on that edge; within
/// `threshold` of two edges, on the corner.
pub fn classify_cursor(rect: Rect, point: Point, threshold: i32) -> CursorPosition {
    if !rect.contains(point) {
        return CursorPosition::Outside;
    }
    let left = point.x < rect.x + threshold;
    let right = point.x >= rect.right() - threshold;
    let bottom = point.y < rect.y + threshold;
    let top = point.y >= rect.top() - threshold;
    match (left, right, bottom, top) {
        (true, _, _, true) => CursorPosition::TopLeft,
        (_, true, _, true) => CursorPosition::TopRight,
        (true, _, true, _) => CursorPosition::BottomLeft,
        (_, true, true, _) => CursorPosition::BottomRight,
        (true, ..) => CursorPosition::Left,
        (_, true, ..) => CursorPosition::Right,
        (.., true, _) => CursorPosition::Bottom,
        (.., true) => CursorPosition::Top,
        _ => CursorPosition::Inside,
    }
}

/// Hover/focus/press state of a frame or window.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DispatchState {
    pub(crate) kind: FrameKind,
    pub(crate) hovered: Option<ViewId>,
    pub(crate) focused: Option<ViewId>,
    /// A press landed in this frame and the button is still down.
    pub(crate) pressed: bool,
    /// The press was accepted by `focused`, which receives the gesture.
    pub(crate) widget_gesture: bool,
    pub(crate) cursor_position: CursorPosition,
    /// Cursor and frame bounds when the press started, for frame drags.
    pub(crate) press_origin: Point,
    pub(crate) press_rect: Rect,
}

impl DispatchState {
    pub fn kind(&self) -> FrameKind {
        self.kind
    }

    pub fn hovered(&self) -> Option<ViewId> {
        self.hovered
    }

    pub fn focused(&self) -> Option<ViewId> {
        self.focused
    }

    pub fn is_pressed(&self) -> bool {
        self.pressed
    }

    pub fn cursor_position(&self) -> CursorPosition {
        self.cursor_position
    }

    pub fn press_origin(&self) -> Point {
        self.press_origin
    }
}

impl ViewTree {
    /// Dispatch state of a frame or window.
    pub fn dispatch_state(&self, id: ViewId) -> Option<&DispatchState> {
        self.node(id)?.dispatch.as_ref()
    }

    pub(crate) fn dispatch_state_mut(&mut self, id: ViewId) -> Option<&mut DispatchState> {
        self.node_mut(id)?.dispatch.as_mut()
    }

    /// Whether `id` keeps its own dispatch state (a frame or window).
    ///
    /// Dispatch inside an enclosing frame stops at such a node and hands
    /// the event on to it.
    pub fn is_dispatch_root(&self, id: ViewId) -> bool {
        self.node(id).is_some_and(|n| n.dispatch.is_some())
    }

    /// The widget under the cursor inside `frame`.
    pub fn hovered_widget(&self, frame: ViewId) -> Option<ViewId> {
        self.dispatch_state(frame)?.hovered
    }

    /// The widget receiving key input inside `frame`.
    pub fn focused_widget(&self, frame: ViewId) -> Option<ViewId> {
        self.dispatch_state(frame)?.focused
    }

    pub fn cursor_position(&self, frame: ViewId) -> CursorPosition {
        self.dispatch_state(frame)
            .map(|s| s.cursor_position)
            .unwrap_or_default()
    }

    pub fn frame_kind(&self, frame: ViewId) -> Option<FrameKind> {
        self.dispatch_state(frame).map(|s| s.kind)
    }

    /// Window-space bounds of `id`.
    pub fn global_rect(&self, id: ViewId) -> Option<Rect> {
        Some(Rect::from_origin_size(
            self.global_position(id)?,
            self.size(id)?,
        ))
    }
}
