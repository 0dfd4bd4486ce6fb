use std::hash::{Hash, Hasher};
use std::ops::Range;

use style::{Color, FontStyle};

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

/// One physical line.
#[derive(Clone, Debug, PartialEq)]
pub struct TextLine {
    /// Range into `TextLayout::glyphs`.
    pub glyph_range: Range<usize>,
    /// Baseline in layout coordinates.
    pub y: f32,
    pub ascent: f32,
    pub descent: f32,
    /// Content width, trailing whitespace excluded.
    pub width: f32,
    /// What `width` leaves out: trailing whitespace and the spacing after
    /// the last content unit.
    pub trailing_width: f32,
    /// Left edge of the content relative to the padded content box.
    pub x_offset: f32,
    /// The line starts where an overflow forced a wrap.
    pub is_auto_line_break: bool,
}

impl TextLine {
    pub fn height(&self) -> f32 {
        self.ascent + self.descent
    }

    pub fn top(&self) -> f32 {
        self.y - self.ascent
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.descent
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct PlacedGlyph {
    pub ch: char,
    /// Left edge of the advance box.
    pub x: f32,
    /// Baseline.
    pub y: f32,
    pub advance: f32,
    /// Letter spacing added after this glyph when another follows on the line.
    pub spacing: f32,
    pub font_size: f32,
    pub font_style: FontStyle,
    pub color: Color,
    /// Color explicitly set by markup; `None` keeps the view default.
    pub modified_color: Option<Color>,
    pub line: usize,
    pub is_ruby: bool,
    pub is_line_head: bool,
}

/// Where an inline image is drawn. Compared and hashed structurally so
/// placement sets can be diffed.
#[derive(Clone, Debug)]
pub struct InlineImagePlacement {
    /// Line the image sits on.
    pub line: usize,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub source: String,
    pub name: Option<String>,
}

impl InlineImagePlacement {
    /// `path` or `path#name`, as written in markup.
    pub fn identifier(&self) -> String {
        match &self.name {
            Some(name) => format!("{}#{name}", self.source),
            None => self.source.clone(),
        }
    }
}

impl PartialEq for InlineImagePlacement {
    fn eq(&self, other: &Self) -> bool {
        self.line == other.line
            && self.x.to_bits() == other.x.to_bits()
            && self.y.to_bits() == other.y.to_bits()
            && self.width.to_bits() == other.width.to_bits()
            && self.height.to_bits() == other.height.to_bits()
            && self.source == other.source
            && self.name == other.name
    }
}

impl Eq for InlineImagePlacement {}

impl Hash for InlineImagePlacement {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.line.hash(state);
        self.x.to_bits().hash(state);
        self.y.to_bits().hash(state);
        self.width.to_bits().hash(state);
        self.height.to_bits().hash(state);
        self.source.hash(state);
        self.name.hash(state);
    }
}

/// Extent of one ruby unit: the wider of its base and annotation.
#[derive(Clone, Debug, PartialEq)]
pub struct RubyGroup {
    pub line: usize,
    pub x: f32,
    pub width: f32,
    /// Base glyphs of the group in `TextLayout::glyphs`.
    pub glyph_range: Range<usize>,
}

/// Result of one `break_into_lines` call.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TextLayout {
    pub lines: Vec<TextLine>,
    /// Base text glyphs in source order.
    pub glyphs: Vec<PlacedGlyph>,
    /// Ruby annotation glyphs.
    pub ruby_glyphs: Vec<PlacedGlyph>,
    pub ruby_groups: Vec<RubyGroup>,
    pub images: Vec<InlineImagePlacement>,
    /// Content box left edge (padding applied).
    pub origin_x: f32,
    /// Padding the measurement helpers add back.
    pub padding_horizontal: f32,
    pub padding_vertical: f32,
    pub line_gap: f32,
    /// Baseline step when line height is fixed.
    pub fixed_line_step: Option<f32>,
    pub bounds: Rect,
}

impl TextLayout {
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn line_of_glyph(&self, glyph: usize) -> Option<usize> {
        self.glyphs.get(glyph).map(|g| g.line)
    }
}
