//! Input events as seen by views.
//!
//! The window layer hands raw primitives (cursor position, button + action,
//! key + modifiers) to [`Window`](crate::window::Window). The dispatch engine
//! wraps them in [`MouseEvent`] / [`KeyEvent`] and rewrites
//! [`MouseEvent::local`] for each receiver, so a handler always sees the
//! cursor in its own coordinate space.

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

use crate::primitives::Point;

/// Mouse button types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MouseButton {
    Left,
    Right,
    Middle,
    Back,
    Forward,
    Other(u16),
}

/// What happened to a mouse button.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MouseAction {
    Press,
    Release,
    /// Auto-repeat from the platform; routed like a press.
    Repeat,
}

/// What happened to a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeyAction {
    #[default]
    Press,
    Release,
    Repeat,
}

bitflags! {
    /// Keyboard modifier keys.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
    pub struct Modifiers: u8 {
        const SHIFT = 1 << 0;
        const CTRL = 1 << 1;
        const ALT = 1 << 2;
        /// Command on macOS, Windows key on Windows.
        const META = 1 << 3;
    }
}

impl Modifiers {
    pub const NONE: Self = Self::empty();

    /// Check if the command key is pressed (Ctrl on non-Mac, Meta on Mac).
    #[cfg(target_os = "macos")]
    pub fn command(&self) -> bool {
        self.contains(Self::META)
    }

    #[cfg(not(target_os = "macos"))]
    pub fn command(&self) -> bool {
        self.contains(Self::CTRL)
    }
}

/// Named keys (non-character keys).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NamedKey {
    // Navigation
    ArrowUp,
    ArrowDown,
    ArrowLeft,
    ArrowRight,
    Home,
    End,
    PageUp,
    PageDown,

    // Editing
    Backspace,
    Delete,
    Insert,
    Enter,
    Tab,

    // Modifiers (for key events, not Modifiers)
    Shift,
    Control,
    Alt,
    Meta,

    // Function keys
    F1,
    F2,
    F3,
    F4,
    F5,
    F6,
    F7,
    F8,
    F9,
    F10,
    F11,
    F12,

    // Special
    Escape,
    Space,

    Unknown,
}

/// A keyboard key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Key {
    /// A named (special) key.
    Named(NamedKey),

    /// A character key.
    Character(String),
}

impl Key {
    /// Create a named key.
    pub fn named(key: NamedKey) -> Self {
        Self::Named(key)
    }

    /// Create a character key.
    pub fn character(c: impl Into<String>) -> Self {
        Self::Character(c.into())
    }
}

/// Mouse state delivered to a view.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MouseEvent {
    /// Cursor in window coordinates.
    pub position: Point,
    /// Cursor in the receiving view's own coordinates.
    pub local: Point,
    /// Button for press/release, `None` for plain movement.
    pub button: Option<MouseButton>,
    pub action: Option<MouseAction>,
    pub modifiers: Modifiers,
}

impl MouseEvent {
    /// Cursor movement with no button change.
    pub fn moved(position: Point, modifiers: Modifiers) -> Self {
        Self {
            position,
            local: position,
            button: None,
            action: None,
            modifiers,
        }
    }

    pub fn button(
        position: Point,
        button: MouseButton,
        action: MouseAction,
        modifiers: Modifiers,
    ) -> Self {
        Self {
            position,
            local: position,
            button: Some(button),
            action: Some(action),
            modifiers,
        }
    }

    /// Same event re-expressed for a receiver whose space starts at `origin`.
    pub fn localized(&self, origin: Point) -> Self {
        Self {
            local: self.position - origin,
            ..*self
        }
    }
}

/// A key event delivered to the focused view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyEvent {
    pub key: Key,
    pub action: KeyAction,
    pub modifiers: Modifiers,
    /// The text produced by the key press (OS-level, handles shift/compose/dead keys).
    pub text: Option<String>,
}

impl KeyEvent {
    pub fn pressed(key: Key, modifiers: Modifiers) -> Self {
        let text = match &key {
            Key::Character(c) => Some(c.clone()),
            Key::Named(NamedKey::Space) => Some(" ".to_string()),
            Key::Named(_) => None,
        };
        Self {
            key,
            action: KeyAction::Press,
            modifiers,
            text,
        }
    }
}
