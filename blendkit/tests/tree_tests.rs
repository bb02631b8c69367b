//! Integration tests for the view tree and the geometry protocol.

use std::cell::Cell;
use std::rc::Rc;

use blendkit::{
    EmptyView, LinearLayout, Point, Rect, Size, TreeError, UpdateRequest, View, ViewCx, ViewId,
    ViewTree, ViewType,
};

/// Counts how often the protocol reached Perform on this view.
struct Counting {
    performed: Rc<Cell<usize>>,
}

impl View for Counting {
    fn perform_update(&mut self, _cx: &mut ViewCx<'_>, _request: &UpdateRequest) {
        self.performed.set(self.performed.get() + 1);
    }
}

/// Refuses to grow wider than `max_width`.
struct Capped {
    max_width: i32,
}

impl View for Capped {
    fn update_test(&mut self, request: &UpdateRequest) -> bool {
        request.size().is_none_or(|s| s.width <= self.max_width)
    }
}

fn widget(tree: &mut ViewTree) -> ViewId {
    tree.insert(EmptyView(ViewType::Widget))
}

/// Every node's parent chain ends, and its child count matches its list.
fn assert_well_formed(tree: &ViewTree, ids: &[ViewId]) {
    for id in ids.iter().copied().filter(|id| tree.contains(*id)) {
        assert!(
            tree.ancestors(id).count() < ids.len(),
            "ancestor chain of {:?} does not terminate",
            id
        );
        assert!(!tree.ancestors(id).any(|a| a == id));
        assert_eq!(tree.subview_count(id), tree.children(id).count());
        for child in tree.children(id) {
            assert_eq!(tree.parent(child), Some(id));
        }
    }
}

#[test]
fn structural_edits_keep_tree_well_formed() {
    let mut tree = ViewTree::new();
    let ids: Vec<ViewId> = (0..6).map(|_| widget(&mut tree)).collect();
    let [a, b, c, d, e, f] = [ids[0], ids[1], ids[2], ids[3], ids[4], ids[5]];

    tree.push_back_subview(a, b).unwrap();
    tree.push_back_subview(a, c).unwrap();
    tree.push_back_subview(b, d).unwrap();
    tree.push_front_subview(d, e).unwrap();
    tree.insert_subview(a, 1, f).unwrap();
    assert_well_formed(&tree, &ids);
    assert_eq!(tree.children(a).collect::<Vec<_>>(), vec![b, f, c]);

    // Every attempt to close a loop is refused and changes nothing.
    assert_eq!(
        tree.push_back_subview(e, a),
        Err(TreeError::WouldCycle { parent: e, child: a })
    );
    assert_eq!(
        tree.push_back_subview(d, b),
        Err(TreeError::WouldCycle { parent: d, child: b })
    );
    assert_eq!(tree.push_back_subview(c, c), Err(TreeError::SelfAttach(c)));
    assert_well_formed(&tree, &ids);

    // Reparent a whole branch, then tear part of it down.
    tree.push_back_subview(c, b).unwrap();
    assert_eq!(tree.parent(b), Some(c));
    assert_eq!(tree.subview_count(a), 2);
    assert_well_formed(&tree, &ids);

    tree.remove_subview(c, b).unwrap();
    assert!(!tree.contains(b));
    assert!(!tree.contains(d));
    assert!(!tree.contains(e));
    assert_well_formed(&tree, &ids);
    assert_eq!(tree.len(), 3);
}

#[test]
fn resize_to_same_size_is_a_no_op() {
    let performed = Rc::new(Cell::new(0));
    let mut tree = ViewTree::new();
    let id = tree.insert(Counting {
        performed: performed.clone(),
    });

    assert!(tree.resize(id, Size::new(40, 20)));
    assert_eq!(performed.get(), 1);
    assert!(!tree.resize(id, Size::new(40, 20)));
    assert_eq!(performed.get(), 1);
    assert!(!tree.move_to(id, Point::ORIGIN));
    assert_eq!(performed.get(), 1);
}

#[test]
fn veto_leaves_geometry_untouched() {
    let mut tree = ViewTree::new();
    let id = tree.insert(Capped { max_width: 100 });
    assert!(tree.resize(id, Size::new(80, 10)));
    assert!(!tree.resize(id, Size::new(120, 10)));
    assert_eq!(tree.size(id), Some(Size::new(80, 10)));
}

#[test]
fn stale_handles_are_rejected() {
    let mut tree = ViewTree::new();
    let parent = widget(&mut tree);
    let child = widget(&mut tree);
    tree.destroy(child).unwrap();

    assert_eq!(
        tree.push_back_subview(parent, child),
        Err(TreeError::StaleHandle(child))
    );
    assert!(!tree.resize(child, Size::new(1, 1)));
    assert_eq!(tree.parent(child), None);
    assert!(tree.children(parent).next().is_none());
}

#[test]
fn external_child_outlives_container() {
    let mut tree = ViewTree::new();
    let container = widget(&mut tree);
    let shared = tree.insert_external(EmptyView(ViewType::Widget));
    tree.push_back_subview(container, shared).unwrap();

    tree.destroy(container).unwrap();
    assert!(!tree.contains(container));
    assert!(tree.contains(shared));
    assert_eq!(tree.parent(shared), None);
}

#[test]
fn nested_layouts_follow_outer_resize() {
    let mut tree = ViewTree::new();
    let column = tree.insert(LinearLayout::vertical());
    tree.set_initial_geometry(column, Point::ORIGIN, Size::new(100, 100))
        .unwrap();
    let row = tree.insert(LinearLayout::horizontal().spacing(10));
    tree.set_initial_geometry(row, Point::ORIGIN, Size::new(100, 40))
        .unwrap();
    let left = widget(&mut tree);
    let right = widget(&mut tree);
    tree.set_initial_geometry(left, Point::ORIGIN, Size::new(20, 40))
        .unwrap();
    tree.set_initial_geometry(right, Point::ORIGIN, Size::new(30, 40))
        .unwrap();
    tree.push_back_subview(row, left).unwrap();
    tree.push_back_subview(row, right).unwrap();
    tree.push_back_subview(column, row).unwrap();
    LinearLayout::relayout(&mut tree, column);

    assert_eq!(tree.rect(row), Some(Rect::new(0, 60, 100, 40)));
    assert_eq!(tree.rect(right), Some(Rect::new(30, 0, 30, 40)));

    // Widening the column stretches the row, which re-lays out its cells.
    tree.resize(column, Size::new(300, 100));
    assert_eq!(tree.rect(row), Some(Rect::new(0, 60, 300, 40)));
    assert_eq!(tree.global_position(right), Some(Point::new(30, 60)));
}
