//! Blendkit: the core of a retained-mode GUI toolkit.
//!
//! Blendkit keeps every window, frame and widget in one arena-backed view
//! tree and gives them a uniform way to change geometry, receive input and
//! emit draw commands:
//!
//! - **View tree** ([`view`]): generational handles, ordered children,
//!   managed vs external ownership, deferred destruction of retained views.
//! - **Geometry protocol** ([`view`]): every size/position/rounding/visibility
//!   change runs Test, Perform and Report, so parents can veto and re-layout.
//! - **Dispatch** ([`dispatch`], [`window`]): hover, focus, press, drag and
//!   key routing from the window down through frames to widgets.
//! - **Forms** ([`form`]): rounded-rectangle vertex buffers for the renderer.
//!
//! # Usage
//!
//! ```ignore
//! use blendkit::{FrameKind, Rect, Size, UiConfig, Window};
//!
//! let mut window = Window::new(Size::new(800, 600), UiConfig::default());
//! let frame = window.add_frame(MyPanel::new(), FrameKind::Regular, Rect::new(0, 0, 800, 600))?;
//! window.tree_mut().push_back_subview(frame, button)?;
//! window.process_cursor_moved(Point::new(40, 40));
//! let commands = window.draw();
//! ```

// Core primitives
pub mod primitives;
pub mod error;
pub mod config;
pub mod theme;

// Geometry
pub mod form;

// View tree and geometry protocol
pub mod view;

// Input and dispatch
pub mod input;
pub mod dispatch;
pub mod window;
pub mod pump;

// Drawing
pub mod render;
pub mod redraw;

// Stock containers
pub mod containers;

// Re-export core types
pub use primitives::{Color, Point, Rect, Size};
pub use error::{ConfigError, TreeError};
pub use config::UiConfig;
pub use theme::{ColorScheme, Theme, WidgetCategory};
pub use form::{Orientation, RoundType, RoundedForm, Shading};
pub use view::{
    EmptyView, Ownership, Response, UpdateKind, UpdateOrigin, UpdateRequest, View, ViewCx,
    ViewFlags, ViewId, ViewTree, ViewType, WatchSlot,
};
pub use input::{Key, KeyAction, KeyEvent, Modifiers, MouseAction, MouseButton, MouseEvent, NamedKey};
pub use dispatch::{classify_cursor, drag_rect, CursorPosition, DispatchState, FrameKind};
pub use window::Window;
pub use pump::{EventPump, InputEvent, PumpReport};
pub use render::{DrawCommand, DrawCx, DrawList, RenderContext};
pub use redraw::RedrawHandle;
pub use containers::{LinearLayout, ScrollView};
