//! Integration tests for input routing through a whole window.
//!
//! Every test builds a [`Window`] with real frames and logging widgets, then
//! drives it either through the `process_*` entry points or an
//! [`EventPump`], exactly like a platform backend would.

use std::cell::RefCell;
use std::rc::Rc;

use blendkit::{
    EmptyView, EventPump, FrameKind, InputEvent, Key, KeyAction, KeyEvent, MouseAction,
    MouseButton, MouseEvent, Point, Rect, Response, Size, UiConfig, View, ViewCx, ViewFlags,
    ViewId, ViewType, Window,
};

type Log = Rc<RefCell<Vec<String>>>;

/// Widget that records every hook it receives.
struct Recorder {
    name: &'static str,
    log: Log,
}

impl Recorder {
    fn push(&self, what: &str) {
        self.log.borrow_mut().push(format!("{}:{}", what, self.name));
    }
}

impl View for Recorder {
    fn on_hover_in(&mut self, _cx: &mut ViewCx<'_>, _event: &MouseEvent) {
        self.push("hover_in");
    }

    fn on_hover_out(&mut self, _cx: &mut ViewCx<'_>, _event: &MouseEvent) {
        self.push("hover_out");
    }

    fn on_focus_in(&mut self, _cx: &mut ViewCx<'_>) {
        self.push("focus_in");
    }

    fn on_focus_out(&mut self, _cx: &mut ViewCx<'_>) {
        self.push("focus_out");
    }

    fn on_mouse_press(&mut self, _cx: &mut ViewCx<'_>, _event: &MouseEvent) -> Response {
        self.push("press");
        Response::Finish
    }

    fn on_key_press(&mut self, _cx: &mut ViewCx<'_>, event: &KeyEvent) -> Response {
        self.push(&format!("key({})", event.text.as_deref().unwrap_or("")));
        Response::Finish
    }
}

/// Window with one regular frame holding widgets A and B side by side.
struct Harness {
    window: Window,
    frame: ViewId,
    a: ViewId,
    b: ViewId,
    log: Log,
}

impl Harness {
    fn new() -> Self {
        let log = Log::default();
        let mut window = Window::new(Size::new(400, 300), UiConfig::default());
        let frame = window
            .add_frame(
                EmptyView(ViewType::Frame),
                FrameKind::Regular,
                Rect::new(0, 0, 400, 300),
            )
            .expect("frame");
        let a = Self::widget(&mut window, frame, "A", &log, Rect::new(0, 0, 100, 100));
        let b = Self::widget(&mut window, frame, "B", &log, Rect::new(100, 0, 100, 100));
        Self {
            window,
            frame,
            a,
            b,
            log,
        }
    }

    fn widget(window: &mut Window, parent: ViewId, name: &'static str, log: &Log, rect: Rect) -> ViewId {
        let tree = window.tree_mut();
        let id = tree.insert(Recorder {
            name,
            log: log.clone(),
        });
        tree.set_initial_geometry(id, rect.origin(), rect.size())
            .expect("geometry");
        tree.push_back_subview(parent, id).expect("attach");
        id
    }

    fn take_log(&self) -> Vec<String> {
        std::mem::take(&mut *self.log.borrow_mut())
    }

    fn hovered_count(&self) -> usize {
        let tree = self.window.tree();
        tree.descendants(self.frame)
            .into_iter()
            .filter(|id| *id != self.frame && tree.flags(*id).contains(ViewFlags::HOVER))
            .count()
    }
}

#[test]
fn hover_press_and_key_reach_the_right_widget() {
    let mut h = Harness::new();

    h.window.process_cursor_moved(Point::new(50, 50));
    assert_eq!(h.take_log(), vec!["hover_in:A"]);
    assert_eq!(h.window.tree().hovered_widget(h.frame), Some(h.a));

    h.window.process_cursor_moved(Point::new(150, 50));
    assert_eq!(h.take_log(), vec!["hover_out:A", "hover_in:B"]);

    let response = h
        .window
        .process_mouse_button(MouseButton::Left, MouseAction::Press);
    assert_eq!(response, Response::Finish);
    assert_eq!(h.take_log(), vec!["press:B", "focus_in:B"]);
    assert_eq!(h.window.tree().focused_widget(h.frame), Some(h.b));
    assert_eq!(h.window.focused_frame(), Some(h.frame));
    h.window
        .process_mouse_button(MouseButton::Left, MouseAction::Release);

    let response = h
        .window
        .process_key(Key::character("k"), KeyAction::Press, Some("k".into()));
    assert_eq!(response, Response::Finish);
    assert_eq!(h.take_log(), vec!["key(k):B"]);
}

#[test]
fn at_most_one_widget_is_hovered() {
    let mut h = Harness::new();
    for (x, y) in [(10, 10), (150, 10), (99, 99), (100, 99), (350, 250), (120, 20), (500, 500)] {
        h.window.process_cursor_moved(Point::new(x, y));
        assert!(h.hovered_count() <= 1, "several widgets hovered at {},{}", x, y);
    }
    assert_eq!(h.hovered_count(), 0);
}

#[test]
fn destroying_focused_widget_is_safe() {
    let mut h = Harness::new();
    h.window.process_cursor_moved(Point::new(150, 50));
    h.window
        .process_mouse_button(MouseButton::Left, MouseAction::Press);
    h.window
        .process_mouse_button(MouseButton::Left, MouseAction::Release);

    h.window.tree_mut().destroy(h.b).expect("destroy");
    assert_eq!(h.window.tree().focused_widget(h.frame), None);
    assert_eq!(h.window.tree().hovered_widget(h.frame), None);

    // Nothing routes to the stale handle any more.
    assert_eq!(
        h.window
            .process_key(Key::character("x"), KeyAction::Press, None),
        Response::Ignore
    );
    h.window.process_cursor_moved(Point::new(151, 50));
    h.window.process_cursor_moved(Point::new(50, 50));
    assert_eq!(h.window.tree().hovered_widget(h.frame), Some(h.a));
}

#[test]
fn hiding_hovered_widget_clears_hover() {
    let mut h = Harness::new();
    h.window.process_cursor_moved(Point::new(50, 50));
    h.take_log();

    assert!(h.window.tree_mut().set_visible(h.a, false));
    assert_eq!(h.window.tree().hovered_widget(h.frame), None);
    assert!(!h.window.tree().is_hovered(h.a));

    h.window.process_cursor_moved(Point::new(51, 50));
    assert_eq!(h.window.tree().hovered_widget(h.frame), None);
}

#[test]
fn dialog_above_panel_takes_input() {
    let mut h = Harness::new();
    let dialog = h
        .window
        .add_frame(
            EmptyView(ViewType::Frame),
            FrameKind::Floating,
            Rect::new(20, 20, 200, 120),
        )
        .expect("dialog");

    h.window.process_cursor_moved(Point::new(50, 50));
    assert_eq!(h.window.hovered_frame(), Some(dialog));
    // Widget A is under the dialog and never hears about the cursor.
    assert!(h.take_log().is_empty());

    h.window
        .process_mouse_button(MouseButton::Left, MouseAction::Press);
    assert_eq!(h.window.focused_frame(), Some(dialog));
    h.window.process_cursor_moved(Point::new(70, 40));
    h.window
        .process_mouse_button(MouseButton::Left, MouseAction::Release);
    assert_eq!(
        h.window.tree().rect(dialog),
        Some(Rect::new(40, 10, 200, 120))
    );
}

#[test]
fn scripted_session_through_pump() {
    let mut h = Harness::new();
    let script = r#"[
        { "type": "cursor_moved", "x": 50, "y": 50 },
        { "type": "cursor_moved", "x": 150, "y": 50 },
        { "type": "mouse_button", "button": "left", "action": "press" },
        { "type": "mouse_button", "button": "left", "action": "release" },
        { "type": "key", "key": { "character": "z" } }
    ]"#;
    let mut pump = EventPump::from_json_str(script).expect("script");
    let report = pump.dispatch_all(&mut h.window);

    assert_eq!(report.processed, 5);
    assert_eq!(
        h.take_log(),
        vec![
            "hover_in:A",
            "hover_out:A",
            "hover_in:B",
            "press:B",
            "focus_in:B",
            "key(z):B",
        ]
    );
    assert!(pump.is_empty());
    pump.push(InputEvent::cursor(500, 500));
    pump.dispatch_all(&mut h.window);
    assert_eq!(h.window.hovered_frame(), None);
}
