use super::{Ownership, View, ViewFlags, ViewId, ViewType};
use crate::dispatch::DispatchState;
use crate::form::{RoundType, RoundedForm};
use crate::primitives::{Point, Rect, Size};

/// One entry of the view arena.
///
/// All fields are owned by the tree; views read them through
/// [`ViewTree`](super::ViewTree) accessors and change them through the
/// geometry protocol.
pub struct ViewNode {
    pub(crate) view_type: ViewType,
    pub(crate) ownership: Ownership,
    pub(crate) flags: ViewFlags,
    pub(crate) retain_count: u32,

    pub(crate) position: Point,
    pub(crate) size: Size,
    pub(crate) round_type: RoundType,
    pub(crate) round_radius: f32,
    /// Translation applied between this node's space and its children's.
    pub(crate) offset: Point,

    pub(crate) parent: Option<ViewId>,
    pub(crate) previous: Option<ViewId>,
    pub(crate) next: Option<ViewId>,
    pub(crate) first_child: Option<ViewId>,
    pub(crate) last_child: Option<ViewId>,
    pub(crate) subview_count: usize,

    /// Hover/focus state. Present on windows and frames only.
    pub(crate) dispatch: Option<DispatchState>,

    /// Background geometry reused across draws.
    pub(crate) form: Option<RoundedForm>,

    /// `None` while the behaviour is checked out to run one of its hooks.
    pub(crate) behavior: Option<Box<dyn View>>,
}

impl ViewNode {
    pub(crate) fn new(behavior: Box<dyn View>, ownership: Ownership, round_radius: f32) -> Self {
        let view_type = behavior.view_type();
        let size = behavior.size_hint();
        Self {
            view_type,
            ownership,
            flags: ViewFlags::VISIBLE | ViewFlags::REFRESH,
            retain_count: 0,
            position: Point::ORIGIN,
            size,
            round_type: RoundType::NONE,
            round_radius,
            offset: Point::ORIGIN,
            parent: None,
            previous: None,
            next: None,
            first_child: None,
            last_child: None,
            subview_count: 0,
            dispatch: view_type
                .is_dispatch_root()
                .then(DispatchState::default),
            form: None,
            behavior: Some(behavior),
        }
    }

    pub fn view_type(&self) -> ViewType {
        self.view_type
    }

    pub fn ownership(&self) -> Ownership {
        self.ownership
    }

    pub fn flags(&self) -> ViewFlags {
        self.flags
    }

    pub fn position(&self) -> Point {
        self.position
    }

    pub fn size(&self) -> Size {
        self.size
    }

    /// Bounds in the parent's child space.
    pub fn rect(&self) -> Rect {
        Rect::from_origin_size(self.position, self.size)
    }

    pub fn round_type(&self) -> RoundType {
        self.round_type
    }

    pub fn round_radius(&self) -> f32 {
        self.round_radius
    }

    pub fn offset(&self) -> Point {
        self.offset
    }

    pub fn parent(&self) -> Option<ViewId> {
        self.parent
    }

    pub fn subview_count(&self) -> usize {
        self.subview_count
    }

    #[inline]
    pub fn is_visible(&self) -> bool {
        self.flags.contains(ViewFlags::VISIBLE)
    }

    #[inline]
    pub fn is_hovered(&self) -> bool {
        self.flags.contains(ViewFlags::HOVER)
    }

    #[inline]
    pub fn is_focused(&self) -> bool {
        self.flags.contains(ViewFlags::FOCUS)
    }

    #[inline]
    pub fn needs_refresh(&self) -> bool {
        self.flags.contains(ViewFlags::REFRESH)
    }

    pub(crate) fn set_flag(&mut self, flag: ViewFlags, on: bool) {
        self.flags.set(flag, on);
    }
}

impl std::fmt::Debug for ViewNode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ViewNode")
            .field("view_type", &self.view_type)
            .field("ownership", &self.ownership)
            .field("flags", &self.flags)
            .field("position", &self.position)
            .field("size", &self.size)
            .field("parent", &self.parent)
            .field("subview_count", &self.subview_count)
            .field("checked_out", &self.behavior.is_none())
            .finish()
    }
}
