//! The geometry-update protocol.
//!
//! Every change to a node's size, position, corner rounding or visibility
//! runs the same three steps:
//!
//! 1. **Test**: the node's [`View::update_test`] and, for changes the node
//!    initiated itself, its parent's [`View::child_update_test`] may veto.
//! 2. **Perform**: the tree stores the value, marks the node for redraw and
//!    calls [`View::perform_update`] so the node can regenerate derived
//!    state and lay out its own children (downward propagation).
//! 3. **Report**: for self-initiated changes only, the parent's
//!    [`View::on_child_changed`] runs (upward propagation).
//!
//! Container-driven changes ([`ViewTree::resize_subview`] and friends) stop
//! after Perform, so a parent laying out its children never hears back
//! about its own decisions.
//!
//! [`View::update_test`]: super::View::update_test
//! [`View::child_update_test`]: super::View::child_update_test
//! [`View::perform_update`]: super::View::perform_update
//! [`View::on_child_changed`]: super::View::on_child_changed

use super::{ViewFlags, ViewId, ViewTree};
use crate::form::RoundType;
use crate::primitives::{Point, Size};

/// The attribute being changed and its requested value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum UpdateKind {
    Size(Size),
    Position(Point),
    RoundType(RoundType),
    RoundRadius(f32),
    Visibility(bool),
}

impl UpdateKind {
    fn tag(&self) -> u8 {
        match self {
            UpdateKind::Size(_) => 0,
            UpdateKind::Position(_) => 1,
            UpdateKind::RoundType(_) => 2,
            UpdateKind::RoundRadius(_) => 3,
            UpdateKind::Visibility(_) => 4,
        }
    }
}

/// Where a change came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateOrigin {
    /// The node changed itself; its parent gets a report.
    SelfInitiated,
    /// The parent changed the node while laying out; no report.
    Parent,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UpdateRequest {
    /// The node that asked for the change.
    pub source: ViewId,
    /// The node whose attribute changes.
    pub target: ViewId,
    pub origin: UpdateOrigin,
    pub kind: UpdateKind,
}

impl UpdateRequest {
    #[inline]
    pub fn is_self_initiated(&self) -> bool {
        self.origin == UpdateOrigin::SelfInitiated
    }

    pub fn size(&self) -> Option<Size> {
        match self.kind {
            UpdateKind::Size(size) => Some(size),
            _ => None,
        }
    }

    pub fn position(&self) -> Option<Point> {
        match self.kind {
            UpdateKind::Position(position) => Some(position),
            _ => None,
        }
    }

    pub fn visibility(&self) -> Option<bool> {
        match self.kind {
            UpdateKind::Visibility(visible) => Some(visible),
            _ => None,
        }
    }
}

impl ViewTree {
    // ========================================================================
    // Self-initiated changes: Test -> Perform -> Report
    // ========================================================================

    /// Resize `id`. Returns whether the new size was applied.
    pub fn resize(&mut self, id: ViewId, size: Size) -> bool {
        self.request_update(id, id, UpdateOrigin::SelfInitiated, UpdateKind::Size(size))
    }

    pub fn move_to(&mut self, id: ViewId, position: Point) -> bool {
        self.request_update(
            id,
            id,
            UpdateOrigin::SelfInitiated,
            UpdateKind::Position(position),
        )
    }

    pub fn set_round_type(&mut self, id: ViewId, round_type: RoundType) -> bool {
        self.request_update(
            id,
            id,
            UpdateOrigin::SelfInitiated,
            UpdateKind::RoundType(round_type & RoundType::ALL),
        )
    }

    pub fn set_round_radius(&mut self, id: ViewId, radius: f32) -> bool {
        self.request_update(
            id,
            id,
            UpdateOrigin::SelfInitiated,
            UpdateKind::RoundRadius(radius.max(0.0)),
        )
    }

    /// Show or hide `id`. Hiding clears hover and focus inside its subtree.
    pub fn set_visible(&mut self, id: ViewId, visible: bool) -> bool {
        self.request_update(
            id,
            id,
            UpdateOrigin::SelfInitiated,
            UpdateKind::Visibility(visible),
        )
    }

    // ========================================================================
    // Container-driven changes: Test -> Perform
    // ========================================================================

    pub fn resize_subview(&mut self, parent: ViewId, child: ViewId, size: Size) -> bool {
        self.parent_update(parent, child, UpdateKind::Size(size))
    }

    pub fn move_subview_to(&mut self, parent: ViewId, child: ViewId, position: Point) -> bool {
        self.parent_update(parent, child, UpdateKind::Position(position))
    }

    pub fn set_subview_visible(&mut self, parent: ViewId, child: ViewId, visible: bool) -> bool {
        self.parent_update(parent, child, UpdateKind::Visibility(visible))
    }

    pub fn set_subview_round_type(
        &mut self,
        parent: ViewId,
        child: ViewId,
        round_type: RoundType,
    ) -> bool {
        self.parent_update(parent, child, UpdateKind::RoundType(round_type & RoundType::ALL))
    }

    fn parent_update(&mut self, parent: ViewId, child: ViewId, kind: UpdateKind) -> bool {
        if self.parent(child) != Some(parent) {
            tracing::warn!("{:?} asked to update {:?}, which is not its child", parent, child);
            return false;
        }
        self.request_update(parent, child, UpdateOrigin::Parent, kind)
    }

    // ========================================================================
    // Protocol driver
    // ========================================================================

    fn request_update(
        &mut self,
        source: ViewId,
        target: ViewId,
        origin: UpdateOrigin,
        kind: UpdateKind,
    ) -> bool {
        let Some(node) = self.nodes.get(target) else {
            return false;
        };
        if self.current_matches(target, &kind) {
            return false;
        }
        let guard = (target, kind.tag());
        if self.in_flight.contains(&guard) {
            tracing::warn!("Dropping re-entrant {:?} on {:?}", kind, target);
            return false;
        }
        // Checked out: the target itself is asking from inside one of its hooks.
        let running = node.behavior.is_none();
        let request = UpdateRequest {
            source,
            target,
            origin,
            kind,
        };

        // Test
        if !running
            && !self
                .with_behavior(target, |view, _| view.update_test(&request))
                .unwrap_or(true)
        {
            tracing::trace!("{:?} vetoed {:?}", target, kind);
            return false;
        }
        let reported_to = match origin {
            UpdateOrigin::SelfInitiated => self.parent(target),
            UpdateOrigin::Parent => None,
        };
        if let Some(parent) = reported_to {
            let accepted = self
                .with_behavior(parent, |view, _| view.child_update_test(&request))
                .unwrap_or(true);
            if !accepted {
                tracing::trace!("{:?} vetoed {:?} of child {:?}", parent, kind, target);
                return false;
            }
        }

        // Perform
        self.in_flight.push(guard);
        self.apply(target, &kind);
        tracing::trace!("Applied {:?} to {:?}", kind, target);
        if !running {
            self.with_behavior(target, |view, cx| view.perform_update(cx, &request));
        }
        if let Some(pos) = self.in_flight.iter().rposition(|g| *g == guard) {
            self.in_flight.remove(pos);
        }

        // Report
        if origin == UpdateOrigin::SelfInitiated {
            if let Some(parent) = self.parent(target) {
                let reported = self
                    .with_behavior(parent, |view, cx| view.on_child_changed(cx, &request));
                if reported.is_none() {
                    tracing::trace!("{:?} busy; report of {:?} skipped", parent, target);
                }
            }
        }
        true
    }

    fn current_matches(&self, id: ViewId, kind: &UpdateKind) -> bool {
        let Some(node) = self.nodes.get(id) else {
            return true;
        };
        match *kind {
            UpdateKind::Size(size) => node.size == size,
            UpdateKind::Position(position) => node.position == position,
            UpdateKind::RoundType(round_type) => node.round_type == round_type,
            UpdateKind::RoundRadius(radius) => node.round_radius == radius,
            UpdateKind::Visibility(visible) => node.flags.contains(ViewFlags::VISIBLE) == visible,
        }
    }

    fn apply(&mut self, id: ViewId, kind: &UpdateKind) {
        let Some(node) = self.nodes.get_mut(id) else {
            return;
        };
        match *kind {
            UpdateKind::Size(size) => node.size = size,
            UpdateKind::Position(position) => node.position = position,
            UpdateKind::RoundType(round_type) => node.round_type = round_type,
            UpdateKind::RoundRadius(radius) => node.round_radius = radius,
            UpdateKind::Visibility(visible) => {
                node.flags.set(ViewFlags::VISIBLE, visible);
                if !visible {
                    self.clear_watches_into(id, true);
                }
            }
        }
        self.mark_refresh(id);
    }
}
