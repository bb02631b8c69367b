//! Theme data read by draw calls and the geometry generator.
//!
//! blendkit does not load theme files itself; a [`Theme`] is plain data that
//! arrives through [`UiConfig`](crate::config::UiConfig) or is built in code.
//! Defaults are a dark palette with shaded tool buttons.

use serde::{Deserialize, Serialize};

use crate::primitives::Color;

/// Colors and shading parameters for one widget category.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColorScheme {
    pub outline: Color,
    pub inner: Color,
    pub inner_sel: Color,
    pub item: Color,
    pub text: Color,
    pub text_sel: Color,
    /// Whether the inner fill uses the shade gradient at all.
    pub shaded: bool,
    /// Shade delta at the top (or right) edge, in 1/255 steps.
    pub shadetop: i16,
    /// Shade delta at the bottom (or left) edge, in 1/255 steps.
    pub shadedown: i16,
    /// Draw a checkerboard behind translucent inner colors.
    pub alpha_check: bool,
}

impl ColorScheme {
    /// Color for one inner vertex given its shade offset from the geometry
    /// generator. Unshaded schemes return `base` untouched.
    pub fn shaded_color(&self, base: Color, shade_offset: f32) -> Color {
        if self.shaded {
            base.offset(shade_offset)
        } else {
            base
        }
    }

    /// Inner fill color for the given selection state.
    pub fn fill(&self, selected: bool) -> Color {
        if selected { self.inner_sel } else { self.inner }
    }
}

impl Default for ColorScheme {
    fn default() -> Self {
        REGULAR.build()
    }
}

/// Compact table form of a [`ColorScheme`] so the defaults below stay readable.
struct RawScheme {
    colors: [u32; 6],
    shaded: bool,
    shadetop: i16,
    shadedown: i16,
}

impl RawScheme {
    #[allow(clippy::too_many_arguments)]
    const fn new(
        outline: u32,
        inner: u32,
        inner_sel: u32,
        item: u32,
        text: u32,
        text_sel: u32,
        shaded: bool,
        shadetop: i16,
        shadedown: i16,
    ) -> Self {
        Self {
            colors: [outline, inner, inner_sel, item, text, text_sel],
            shaded,
            shadetop,
            shadedown,
        }
    }

    fn build(&self) -> ColorScheme {
        let [outline, inner, inner_sel, item, text, text_sel] = self.colors.map(Color::from_hex);
        ColorScheme {
            outline,
            inner,
            inner_sel,
            item,
            text,
            text_sel,
            shaded: self.shaded,
            shadetop: self.shadetop,
            shadedown: self.shadedown,
            alpha_check: false,
        }
    }
}

const REGULAR: RawScheme = RawScheme::new(
    0x191919FF, 0x999999FF, 0x646464FF, 0x191919FF, 0x000000FF, 0xFFFFFFFF, false, 0, 0,
);
const TOOL: RawScheme = RawScheme::new(
    0x191919FF, 0x999999FF, 0x646464FF, 0x191919FF, 0x000000FF, 0xFFFFFFFF, true, 15, -15,
);
const TEXT: RawScheme = RawScheme::new(
    0x191919FF, 0x999999FF, 0x999999FF, 0x5A5A5AFF, 0x000000FF, 0xFFFFFFFF, true, 0, 25,
);
const OPTION: RawScheme = RawScheme::new(
    0x000000FF, 0x464646FF, 0x464646FF, 0xFFFFFFFF, 0x000000FF, 0xFFFFFFFF, true, 15, -15,
);
const TOGGLE: RawScheme = RawScheme::new(
    0x191919FF, 0x999999FF, 0x646464FF, 0x191919FF, 0x000000FF, 0xFFFFFFFF, false, 0, 0,
);
const RADIO: RawScheme = RawScheme::new(
    0x000000FF, 0x464646FF, 0x5680C2FF, 0xFFFFFFFF, 0xFFFFFFFF, 0x000000FF, true, 15, -15,
);
const NUMBER: RawScheme = RawScheme::new(
    0x191919FF, 0xB4B4B4FF, 0x999999FF, 0xFAFAFAFF, 0x000000FF, 0xFFFFFFFF, true, -20, 0,
);
const SLIDER: RawScheme = RawScheme::new(
    0x191919FF, 0xB4B4B4FF, 0x999999FF, 0x808080FF, 0x000000FF, 0xFFFFFFFF, true, -20, 0,
);
const MENU: RawScheme = RawScheme::new(
    0x000000FF, 0x464646FF, 0x464646FF, 0xFFFFFFFF, 0xFFFFFFFF, 0xCCCCCCFF, true, 15, -15,
);
const MENU_ITEM: RawScheme = RawScheme::new(
    0x000000FF, 0x00000000, 0x5680C2FF, 0xACACAC80, 0xFFFFFFFF, 0x000000FF, true, 38, 0,
);
const TAB: RawScheme = RawScheme::new(
    0x191919FF, 0x787878FF, 0x999999FF, 0x191919FF, 0x000000FF, 0xFFFFFFFF, true, 10, -10,
);
const BOX: RawScheme = RawScheme::new(
    0x191919FF, 0x808080FF, 0x646464FF, 0x191919FF, 0x000000FF, 0xFFFFFFFF, false, 0, 0,
);
const SCROLL_BAR: RawScheme = RawScheme::new(
    0x323232FF, 0x505050B4, 0x646464B4, 0x808080FF, 0x000000FF, 0xFFFFFFFF, true, 5, -5,
);
const TOOLTIP: RawScheme = RawScheme::new(
    0x000000FF, 0x191919E6, 0x2D2D2DE6, 0x646464FF, 0xFFFFFFFF, 0xFFFFFFFF, false, 0, 0,
);

/// Widget category selecting a [`ColorScheme`] from the [`Theme`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WidgetCategory {
    Regular,
    Tool,
    Text,
    Option,
    Toggle,
    Radio,
    Number,
    Slider,
    Menu,
    MenuItem,
    Tab,
    Box,
    ScrollBar,
    Tooltip,
}

/// One color scheme per widget category plus the global pixel scale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Theme {
    /// Pixel density multiplier applied to borders and radii.
    pub pixel: f32,
    pub regular: ColorScheme,
    pub tool: ColorScheme,
    pub text: ColorScheme,
    pub option: ColorScheme,
    pub toggle: ColorScheme,
    pub radio: ColorScheme,
    pub number: ColorScheme,
    pub slider: ColorScheme,
    pub menu: ColorScheme,
    pub menu_item: ColorScheme,
    pub tab: ColorScheme,
    #[serde(rename = "box")]
    pub box_: ColorScheme,
    pub scroll_bar: ColorScheme,
    pub tooltip: ColorScheme,
}

impl Theme {
    pub fn scheme(&self, category: WidgetCategory) -> &ColorScheme {
        match category {
            WidgetCategory::Regular => &self.regular,
            WidgetCategory::Tool => &self.tool,
            WidgetCategory::Text => &self.text,
            WidgetCategory::Option => &self.option,
            WidgetCategory::Toggle => &self.toggle,
            WidgetCategory::Radio => &self.radio,
            WidgetCategory::Number => &self.number,
            WidgetCategory::Slider => &self.slider,
            WidgetCategory::Menu => &self.menu,
            WidgetCategory::MenuItem => &self.menu_item,
            WidgetCategory::Tab => &self.tab,
            WidgetCategory::Box => &self.box_,
            WidgetCategory::ScrollBar => &self.scroll_bar,
            WidgetCategory::Tooltip => &self.tooltip,
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            pixel: 1.0,
            regular: REGULAR.build(),
            tool: TOOL.build(),
            text: TEXT.build(),
            option: OPTION.build(),
            toggle: TOGGLE.build(),
            radio: RADIO.build(),
            number: NUMBER.build(),
            slider: SLIDER.build(),
            menu: MENU.build(),
            menu_item: MENU_ITEM.build(),
            tab: TAB.build(),
            box_: BOX.build(),
            scroll_bar: SCROLL_BAR.build(),
            tooltip: TOOLTIP.build(),
        }
    }
}
