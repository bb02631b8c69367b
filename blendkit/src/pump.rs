//! Replayable platform input.
//!
//! [`InputEvent`] is the serialisable form of what a platform backend hands
//! to a [`Window`]. An [`EventPump`] queues them in arrival order and feeds
//! them to the window one at a time, which is how the demo replays scripts
//! and how integration tests drive whole sessions.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::input::{Key, KeyAction, Modifiers, MouseAction, MouseButton};
use crate::primitives::{Point, Size};
use crate::view::Response;
use crate::window::Window;

/// One raw input event, in window coordinates (Y up).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum InputEvent {
    CursorMoved {
        x: i32,
        y: i32,
    },
    MouseButton {
        button: MouseButton,
        action: MouseAction,
    },
    Key {
        key: Key,
        #[serde(default)]
        action: KeyAction,
        #[serde(default)]
        text: Option<String>,
    },
    Modifiers {
        modifiers: Modifiers,
    },
    Resize {
        width: i32,
        height: i32,
    },
}

impl InputEvent {
    pub fn cursor(x: i32, y: i32) -> Self {
        InputEvent::CursorMoved { x, y }
    }

    pub fn press(button: MouseButton) -> Self {
        InputEvent::MouseButton {
            button,
            action: MouseAction::Press,
        }
    }

    pub fn release(button: MouseButton) -> Self {
        InputEvent::MouseButton {
            button,
            action: MouseAction::Release,
        }
    }

    pub fn key(key: Key) -> Self {
        InputEvent::Key {
            key,
            action: KeyAction::Press,
            text: None,
        }
    }
}

/// Outcome of draining a pump.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PumpReport {
    /// Events taken off the queue.
    pub processed: usize,
    /// Events some view or frame answered with [`Response::Finish`].
    pub accepted: usize,
}

/// FIFO of pending input events.
#[derive(Debug, Default)]
pub struct EventPump {
    queue: VecDeque<InputEvent>,
}

impl EventPump {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a JSON array of events.
    pub fn from_json_str(json: &str) -> serde_json::Result<Self> {
        let events: Vec<InputEvent> = serde_json::from_str(json)?;
        Ok(Self {
            queue: events.into(),
        })
    }

    pub fn push(&mut self, event: InputEvent) {
        self.queue.push_back(event);
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Deliver one event. `None` when the queue is empty.
    pub fn dispatch_one(&mut self, window: &mut Window) -> Option<Response> {
        let event = self.queue.pop_front()?;
        tracing::trace!("Dispatching {:?}", event);
        Some(dispatch_event(window, event))
    }

    /// Deliver every queued event in order.
    pub fn dispatch_all(&mut self, window: &mut Window) -> PumpReport {
        let mut report = PumpReport::default();
        while let Some(response) = self.dispatch_one(window) {
            report.processed += 1;
            if response.is_finish() {
                report.accepted += 1;
            }
        }
        tracing::debug!(
            "Pumped {} events ({} accepted)",
            report.processed,
            report.accepted
        );
        report
    }
}

impl Extend<InputEvent> for EventPump {
    fn extend<T: IntoIterator<Item = InputEvent>>(&mut self, iter: T) {
        self.queue.extend(iter);
    }
}

impl FromIterator<InputEvent> for EventPump {
    fn from_iter<T: IntoIterator<Item = InputEvent>>(iter: T) -> Self {
        Self {
            queue: iter.into_iter().collect(),
        }
    }
}

fn dispatch_event(window: &mut Window, event: InputEvent) -> Response {
    match event {
        InputEvent::CursorMoved { x, y } => window.process_cursor_moved(Point::new(x, y)),
        InputEvent::MouseButton { button, action } => window.process_mouse_button(button, action),
        InputEvent::Key { key, action, text } => {
            let text = text.or_else(|| match &key {
                Key::Character(c) => Some(c.clone()),
                Key::Named(_) => None,
            });
            window.process_key(key, action, text)
        }
        InputEvent::Modifiers { modifiers } => {
            window.set_modifiers(modifiers);
            Response::Ignore
        }
        InputEvent::Resize { width, height } => {
            if window.resize(Size::new(width, height)) {
                Response::Finish
            } else {
                Response::Ignore
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::UiConfig;
    use crate::dispatch::FrameKind;
    use crate::input::NamedKey;
    use crate::primitives::Rect;
    use crate::view::{EmptyView, ViewType};

    #[test]
    fn parses_tagged_events() {
        let json = r#"[
            { "type": "cursor_moved", "x": 10, "y": 20 },
            { "type": "mouse_button", "button": "left", "action": "press" },
            { "type": "key", "key": { "named": "Enter" } },
            { "type": "key", "key": { "character": "q" }, "action": "release" },
            { "type": "modifiers", "modifiers": "SHIFT" },
            { "type": "resize", "width": 640, "height": 480 }
        ]"#;
        let pump = EventPump::from_json_str(json).unwrap();
        assert_eq!(pump.len(), 6);
        assert_eq!(pump.queue[0], InputEvent::cursor(10, 20));
        assert_eq!(pump.queue[1], InputEvent::press(MouseButton::Left));
        assert_eq!(pump.queue[2], InputEvent::key(Key::named(NamedKey::Enter)));
        assert_eq!(
            pump.queue[4],
            InputEvent::Modifiers {
                modifiers: Modifiers::SHIFT
            }
        );
    }

    #[test]
    fn unknown_event_type_is_rejected() {
        assert!(EventPump::from_json_str(r#"[{ "type": "scroll", "dy": 3 }]"#).is_err());
    }

    #[test]
    fn dispatch_all_drains_in_order() {
        let mut window = Window::new(Size::new(200, 200), UiConfig::default());
        let frame = window
            .add_frame(
                EmptyView(ViewType::Frame),
                FrameKind::Regular,
                Rect::new(0, 0, 200, 200),
            )
            .unwrap();
        let mut pump: EventPump = [
            InputEvent::cursor(50, 50),
            InputEvent::press(MouseButton::Left),
            InputEvent::release(MouseButton::Left),
            InputEvent::Resize {
                width: 300,
                height: 300,
            },
        ]
        .into_iter()
        .collect();

        let report = pump.dispatch_all(&mut window);
        assert!(pump.is_empty());
        assert_eq!(report.processed, 4);
        // Press and release are taken by the frame; so is the resize.
        assert_eq!(report.accepted, 3);
        assert_eq!(window.focused_frame(), Some(frame));
        assert_eq!(window.size(), Size::new(300, 300));
    }

    #[test]
    fn empty_pump_dispatches_nothing() {
        let mut window = Window::new(Size::new(10, 10), UiConfig::default());
        let mut pump = EventPump::new();
        assert_eq!(pump.dispatch_one(&mut window), None);
        assert_eq!(pump.dispatch_all(&mut window), PumpReport::default());
    }
}
