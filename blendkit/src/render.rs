//! Draw-list recording.
//!
//! Drawing is split from any GPU backend: views emit [`DrawCommand`]s into a
//! [`DrawList`] held by a [`RenderContext`], already translated to window
//! coordinates and with colors packed as RGBA8. A backend uploads the list
//! as it is; tests inspect it directly.

use crate::form::{Orientation, RoundType, RoundedForm, Shading};
use crate::primitives::{Color, Point, Size};
use crate::theme::{ColorScheme, Theme, WidgetCategory};
use crate::view::{Response, ViewFlags, ViewId, ViewTree};

/// One recorded primitive.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    /// Triangle fan with one color per vertex.
    Fan {
        view: ViewId,
        vertices: Vec<[f32; 2]>,
        colors: Vec<u32>,
    },
    /// Triangle strip in a single color (outlines).
    Strip {
        view: ViewId,
        vertices: Vec<[f32; 2]>,
        color: u32,
    },
}

impl DrawCommand {
    pub fn view(&self) -> ViewId {
        match self {
            DrawCommand::Fan { view, .. } | DrawCommand::Strip { view, .. } => *view,
        }
    }

    pub fn vertex_count(&self) -> usize {
        match self {
            DrawCommand::Fan { vertices, .. } | DrawCommand::Strip { vertices, .. } => {
                vertices.len()
            }
        }
    }
}

/// Commands recorded for one frame, back to front.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DrawList {
    commands: Vec<DrawCommand>,
}

impl DrawList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clear commands for a new frame.
    pub fn clear(&mut self) {
        self.commands.clear();
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.commands.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    pub fn push(&mut self, command: DrawCommand) {
        self.commands.push(command);
    }

    /// Views in the order they drew, one entry per view.
    pub fn draw_order(&self) -> Vec<ViewId> {
        let mut order: Vec<ViewId> = Vec::new();
        for command in &self.commands {
            if order.last() != Some(&command.view()) {
                order.push(command.view());
            }
        }
        order
    }
}

/// Explicit render state threaded through a draw pass.
pub struct RenderContext<'t> {
    theme: &'t Theme,
    list: DrawList,
}

impl<'t> RenderContext<'t> {
    pub fn new(theme: &'t Theme) -> Self {
        Self {
            theme,
            list: DrawList::new(),
        }
    }

    pub fn theme(&self) -> &'t Theme {
        self.theme
    }

    pub fn list(&self) -> &DrawList {
        &self.list
    }

    pub fn into_list(self) -> DrawList {
        self.list
    }
}

/// What a view sees while drawing: its own geometry plus the render context.
pub struct DrawCx<'r, 't> {
    render: &'r mut RenderContext<'t>,
    id: ViewId,
    origin: Point,
    size: Size,
    flags: ViewFlags,
    round_type: RoundType,
    round_radius: f32,
    /// The node's background form, kept between draws.
    form: Option<RoundedForm>,
}

impl<'r, 't> DrawCx<'r, 't> {
    pub(crate) fn new(
        render: &'r mut RenderContext<'t>,
        id: ViewId,
        origin: Point,
        node: &crate::view::ViewNode,
        form: Option<RoundedForm>,
    ) -> Self {
        Self {
            render,
            id,
            origin,
            size: node.size(),
            flags: node.flags(),
            round_type: node.round_type(),
            round_radius: node.round_radius(),
            form,
        }
    }

    pub(crate) fn into_form(self) -> Option<RoundedForm> {
        self.form
    }

    pub fn id(&self) -> ViewId {
        self.id
    }

    /// Window-space position of the view's bottom-left corner.
    pub fn origin(&self) -> Point {
        self.origin
    }

    pub fn size(&self) -> Size {
        self.size
    }

    pub fn is_hovered(&self) -> bool {
        self.flags.contains(ViewFlags::HOVER)
    }

    pub fn is_focused(&self) -> bool {
        self.flags.contains(ViewFlags::FOCUS)
    }

    pub fn is_pressed(&self) -> bool {
        self.flags.contains(ViewFlags::PRESSED)
    }

    pub fn round_type(&self) -> RoundType {
        self.round_type
    }

    pub fn round_radius(&self) -> f32 {
        self.round_radius
    }

    pub fn theme(&self) -> &'t Theme {
        self.render.theme
    }

    pub fn list_mut(&mut self) -> &mut DrawList {
        &mut self.render.list
    }

    /// Emit a generated form's fill and outline at the view's origin.
    ///
    /// Shaded forms get one color per vertex from `scheme`; the outline uses
    /// `scheme.outline`.
    pub fn draw_form(&mut self, form: &RoundedForm, scheme: &ColorScheme, fill: Color) {
        let offset = [self.origin.x as f32, self.origin.y as f32];
        let stride = form.inner_components();
        let mut vertices = Vec::with_capacity(form.inner().len() / stride);
        let mut colors = Vec::with_capacity(vertices.capacity());
        for chunk in form.inner().chunks_exact(stride) {
            vertices.push([chunk[0] + offset[0], chunk[1] + offset[1]]);
            let shade = if stride == 3 { chunk[2] } else { 0.0 };
            colors.push(scheme.shaded_color(fill, shade).pack());
        }
        if !vertices.is_empty() {
            self.render.list.push(DrawCommand::Fan {
                view: self.id,
                vertices,
                colors,
            });
        }

        let outline: Vec<[f32; 2]> = form
            .outer_vertices()
            .iter()
            .map(|v| [v.x + offset[0], v.y + offset[1]])
            .collect();
        if !outline.is_empty() {
            self.render.list.push(DrawCommand::Strip {
                view: self.id,
                vertices: outline,
                color: scheme.outline.pack(),
            });
        }
    }

    /// Stock background: the view's rounded rect in the colors of `category`,
    /// highlighted while hovered or pressed.
    ///
    /// The form is cached on the node and only regenerated when its inputs
    /// change.
    pub fn draw_background(&mut self, category: WidgetCategory, border: f32) {
        let scheme = *self.theme().scheme(category);
        let mut form = self
            .form
            .take()
            .unwrap_or_else(|| RoundedForm::new(self.size));
        form.set_size(self.size);
        form.set_border(border);
        form.set_round_type(self.round_type);
        form.set_radius(self.round_radius);
        form.set_shading(
            scheme
                .shaded
                .then(|| Shading::from_scheme(&scheme, Orientation::Vertical)),
        );
        form.regenerate(self.theme().pixel);

        let mut fill = scheme.fill(self.is_pressed());
        if self.is_hovered() && !self.is_pressed() {
            fill = fill.offset(15.0 / 255.0);
        }
        self.draw_form(&form, &scheme, fill);
        self.form = Some(form);
    }
}

impl ViewTree {
    /// Draw `root` and its visible subtree back to front, clearing the
    /// refresh flag of everything visited.
    /// Background form cached on `id` by its last draw.
    pub fn cached_form(&self, id: ViewId) -> Option<&RoundedForm> {
        self.node(id)?.form.as_ref()
    }

    pub fn draw(&mut self, root: ViewId, render: &mut RenderContext<'_>) {
        let origin = self
            .parent(root)
            .and_then(|p| self.content_origin(p))
            .unwrap_or_default();
        self.draw_node(root, origin, render);
    }

    /// `parent_origin` is the window-space origin of the parent's child space.
    fn draw_node(&mut self, id: ViewId, parent_origin: Point, render: &mut RenderContext<'_>) {
        let Some(node) = self.node(id) else {
            return;
        };
        if !node.is_visible() {
            return;
        }
        let origin = parent_origin + node.position();
        let content_origin = origin + node.offset();

        let response = match self.node_mut(id).and_then(|n| n.behavior.take()) {
            Some(mut view) => {
                let form = self.node_mut(id).and_then(|n| n.form.take());
                let (response, form) = match self.node(id) {
                    Some(node) => {
                        let mut cx = DrawCx::new(render, id, origin, node, form);
                        let response = view.draw(&mut cx);
                        (response, cx.into_form())
                    }
                    None => (Response::Ignore, form),
                };
                if let Some(node) = self.node_mut(id) {
                    node.behavior = Some(view);
                    node.form = form;
                }
                response
            }
            None => Response::Ignore,
        };
        self.clear_refresh(id);
        if response.is_finish() {
            return;
        }
        let children: Vec<ViewId> = self.children(id).collect();
        for child in children {
            self.draw_node(child, content_origin, render);
        }
    }
}
