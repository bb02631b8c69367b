//! The view tree.
//!
//! Every window, frame, widget and node-graph node is a [`ViewNode`] stored in
//! one [`ViewTree`] arena and addressed by a generational [`ViewId`]. Links
//! between nodes (parent, siblings, first/last child) are handles, so a view
//! that was removed or destroyed turns into a stale handle rather than a
//! dangling pointer.
//!
//! Behaviour lives in a boxed [`View`] per node. The tree owns all
//! structural state (links, geometry, flags, dispatch state) and calls into
//! the behaviour through hooks.

mod cx;
mod node;
mod traits;
mod tree;
mod update;

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

pub use cx::ViewCx;
pub use node::ViewNode;
pub use traits::{AsAny, EmptyView, Response, View};
pub use tree::{Ancestors, Children, ViewTree, WatchSlot};
pub use update::{UpdateKind, UpdateOrigin, UpdateRequest};

slotmap::new_key_type! {
    /// Handle to a node in a [`ViewTree`].
    pub struct ViewId;
}

/// Coarse classification of a view, used for fast routing decisions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViewType {
    Window,
    Frame,
    #[default]
    Widget,
    /// A node inside a node-graph canvas.
    Node,
}

impl ViewType {
    /// Windows and frames keep their own hover/focus dispatch state.
    #[inline]
    pub fn is_dispatch_root(self) -> bool {
        matches!(self, ViewType::Window | ViewType::Frame)
    }
}

bitflags! {
    /// Per-node state bits.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct ViewFlags: u16 {
        const VISIBLE = 1 << 0;
        /// Needs to be drawn again.
        const REFRESH = 1 << 1;
        /// Destroy requested while still retained.
        const DESTROYING = 1 << 2;
        /// The single hovered widget of its frame.
        const HOVER = 1 << 3;
        /// The focused widget of its frame, or the focused frame of its window.
        const FOCUS = 1 << 4;
        /// Accepted the current mouse press and receives the drag.
        const PRESSED = 1 << 5;
    }
}

/// Who destroys a node once it leaves the tree.
///
/// Fixed at insertion time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Ownership {
    /// Destroyed with its parent, or as soon as it is removed from it.
    #[default]
    Managed,
    /// Survives removal; the creator calls [`ViewTree::destroy`].
    External,
}
