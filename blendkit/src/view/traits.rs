//! The behaviour contract implemented by every concrete view.

use std::any::Any;

use super::cx::ViewCx;
use super::update::UpdateRequest;
use super::ViewType;
use crate::input::{KeyEvent, MouseEvent};
use crate::primitives::{Point, Rect, Size};
use crate::render::DrawCx;

/// Result of an input or draw handler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Response {
    /// Not handled; keep propagating.
    #[default]
    Ignore,
    /// Handled; stop propagating.
    Finish,
}

impl Response {
    #[inline]
    pub fn is_finish(self) -> bool {
        matches!(self, Response::Finish)
    }
}

/// Downcasting support for boxed views.
///
/// Implemented for every `'static` type, so views never implement it by hand.
pub trait AsAny: Any {
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<T: Any> AsAny for T {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// Behaviour of a node in the view tree.
///
/// Every hook has a default, so a view only overrides what it reacts to.
/// Hooks that receive a [`ViewCx`] may mutate the tree; while one runs the
/// view itself is checked out of the arena.
///
/// # Example
///
/// ```ignore
/// struct Label;
///
/// impl View for Label {
///     fn size_hint(&self) -> Size {
///         Size::new(80, 20)
///     }
/// }
/// ```
#[allow(unused_variables)]
pub trait View: AsAny {
    /// Category used by routing. Fixed for the lifetime of the node.
    fn view_type(&self) -> ViewType {
        ViewType::Widget
    }

    /// Size given to the node when it is inserted into the tree.
    fn size_hint(&self) -> Size {
        Size::ZERO
    }

    // ------------------------------------------------------------------
    // Geometry protocol
    // ------------------------------------------------------------------

    /// Asked before a change to this node is applied. Returning `false` vetoes it.
    fn update_test(&mut self, request: &UpdateRequest) -> bool {
        true
    }

    /// Asked before a change that a direct child initiated on itself is applied.
    fn child_update_test(&mut self, request: &UpdateRequest) -> bool {
        true
    }

    /// Called after the tree stored the new value for this node.
    ///
    /// Regenerate derived state here; containers re-layout their children
    /// with [`ViewCx::resize_subview`] and friends.
    fn perform_update(&mut self, cx: &mut ViewCx<'_>, request: &UpdateRequest) {}

    /// Called on the parent after a child applied a change it initiated itself.
    fn on_child_changed(&mut self, cx: &mut ViewCx<'_>, request: &UpdateRequest) {}

    // ------------------------------------------------------------------
    // Tree membership
    // ------------------------------------------------------------------

    /// Called once the node has been linked under a parent.
    fn after_added(&mut self, cx: &mut ViewCx<'_>) {}

    /// Called while the node is still linked, right before it is detached.
    fn before_removed(&mut self, cx: &mut ViewCx<'_>) {}

    // ------------------------------------------------------------------
    // Hit testing and drawing
    // ------------------------------------------------------------------

    /// Whether `local` (in this view's own space) hits the view.
    fn contains(&self, local: Point, size: Size) -> bool {
        Rect::from_origin_size(Point::ORIGIN, size).contains(local)
    }

    /// Emit draw commands. `Finish` skips the subviews.
    fn draw(&mut self, cx: &mut DrawCx<'_, '_>) -> Response {
        Response::Ignore
    }

    // ------------------------------------------------------------------
    // Input
    // ------------------------------------------------------------------

    fn on_hover_in(&mut self, cx: &mut ViewCx<'_>, event: &MouseEvent) {}

    fn on_hover_out(&mut self, cx: &mut ViewCx<'_>, event: &MouseEvent) {}

    fn on_focus_in(&mut self, cx: &mut ViewCx<'_>) {}

    fn on_focus_out(&mut self, cx: &mut ViewCx<'_>) {}

    /// `Finish` accepts the press: the view gets focus and the rest of the gesture.
    fn on_mouse_press(&mut self, cx: &mut ViewCx<'_>, event: &MouseEvent) -> Response {
        Response::Ignore
    }

    fn on_mouse_move(&mut self, cx: &mut ViewCx<'_>, event: &MouseEvent) -> Response {
        Response::Ignore
    }

    fn on_mouse_release(&mut self, cx: &mut ViewCx<'_>, event: &MouseEvent) -> Response {
        Response::Ignore
    }

    fn on_key_press(&mut self, cx: &mut ViewCx<'_>, event: &KeyEvent) -> Response {
        Response::Ignore
    }
}

/// Behaviour-less view used for plain containers and the window root.
#[derive(Debug, Default, Clone, Copy)]
pub struct EmptyView(pub ViewType);

impl View for EmptyView {
    fn view_type(&self) -> ViewType {
        self.0
    }
}
