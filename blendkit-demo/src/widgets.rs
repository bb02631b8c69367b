//! Widgets used by the demo scene.

use blendkit::{
    DrawCx, KeyEvent, MouseEvent, Response, Size, View, ViewCx, ViewType, WidgetCategory,
};

/// Frame background.
pub struct Panel {
    pub name: &'static str,
    pub category: WidgetCategory,
}

impl View for Panel {
    fn view_type(&self) -> ViewType {
        ViewType::Frame
    }

    fn draw(&mut self, cx: &mut DrawCx<'_, '_>) -> Response {
        cx.draw_background(self.category, 1.0);
        Response::Ignore
    }

    fn on_focus_in(&mut self, _cx: &mut ViewCx<'_>) {
        tracing::info!(frame = self.name, "frame focused");
    }
}

/// Clickable, focusable button that counts its clicks and typed characters.
pub struct Button {
    pub label: &'static str,
    pub clicks: u32,
    pub typed: String,
}

impl Button {
    pub fn new(label: &'static str) -> Self {
        Self {
            label,
            clicks: 0,
            typed: String::new(),
        }
    }
}

impl View for Button {
    fn size_hint(&self) -> Size {
        Size::new(100, 24)
    }

    fn draw(&mut self, cx: &mut DrawCx<'_, '_>) -> Response {
        cx.draw_background(WidgetCategory::Tool, 1.0);
        Response::Ignore
    }

    fn on_hover_in(&mut self, cx: &mut ViewCx<'_>, event: &MouseEvent) {
        tracing::info!(button = self.label, x = event.local.x, y = event.local.y, "hover in");
        cx.request_redraw();
    }

    fn on_hover_out(&mut self, cx: &mut ViewCx<'_>, _event: &MouseEvent) {
        tracing::info!(button = self.label, "hover out");
        cx.request_redraw();
    }

    fn on_mouse_press(&mut self, _cx: &mut ViewCx<'_>, _event: &MouseEvent) -> Response {
        Response::Finish
    }

    fn on_mouse_release(&mut self, cx: &mut ViewCx<'_>, event: &MouseEvent) -> Response {
        // A release outside the button cancels the click.
        if self.contains(event.local, cx.size()) {
            self.clicks += 1;
            tracing::info!(button = self.label, clicks = self.clicks, "clicked");
        }
        Response::Finish
    }

    fn on_focus_in(&mut self, _cx: &mut ViewCx<'_>) {
        tracing::info!(button = self.label, "focus in");
    }

    fn on_focus_out(&mut self, _cx: &mut ViewCx<'_>) {
        tracing::info!(button = self.label, "focus out");
    }

    fn on_key_press(&mut self, _cx: &mut ViewCx<'_>, event: &KeyEvent) -> Response {
        match event.text.as_deref() {
            Some(text) => {
                self.typed.push_str(text);
                tracing::info!(button = self.label, typed = %self.typed, "key");
                Response::Finish
            }
            None => Response::Ignore,
        }
    }
}
