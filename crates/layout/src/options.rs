use crate::kinsoku::LineBreakRule;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Alignment {
    #[default]
    Left,
    Center,
    Right,
    /// Spread free space over inner spaces of wrapped lines.
    Justify,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum VerticalAlignment {
    #[default]
    Top,
    Middle,
    Bottom,
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Padding {
    pub left: f32,
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
}

impl Padding {
    pub const fn uniform(v: f32) -> Self {
        Self {
            left: v,
            top: v,
            right: v,
            bottom: v,
        }
    }

    pub fn horizontal(&self) -> f32 {
        self.left + self.right
    }

    pub fn vertical(&self) -> f32 {
        self.top + self.bottom
    }
}

/// Per-layout configuration for `break_into_lines`.
#[derive(Clone, Debug, PartialEq)]
pub struct LayoutOptions {
    /// Container width; `f32::INFINITY` disables wrapping.
    pub width: f32,
    /// Container height, used for vertical alignment only. `0` disables it.
    pub height: f32,
    pub break_rule: LineBreakRule,
    pub alignment: Alignment,
    pub vertical_alignment: VerticalAlignment,
    /// Extra space between a line's descent and the next line's ascent.
    pub line_gap: f32,
    /// Place baselines at a fixed step instead of from font metrics.
    pub line_height_fixed: bool,
    /// Fixed baseline step as a ratio of the base font size.
    pub fixed_line_height: f32,
    pub padding: Padding,
}

impl Default for LayoutOptions {
    fn default() -> Self {
        Self {
            width: f32::INFINITY,
            height: 0.0,
            break_rule: LineBreakRule::default(),
            alignment: Alignment::default(),
            vertical_alignment: VerticalAlignment::default(),
            line_gap: 0.0,
            line_height_fixed: false,
            fixed_line_height: 1.2,
            padding: Padding::default(),
        }
    }
}

impl LayoutOptions {
    /// Width available to line content.
    pub fn content_width(&self) -> f32 {
        (self.width - self.padding.horizontal()).max(0.0)
    }

    pub fn content_height(&self) -> f32 {
        (self.height - self.padding.vertical()).max(0.0)
    }
}
