use layout::FontMetrics;
use style::FontStyle;

/// Glyphs of one size and style a view needs from its font's atlas.
#[derive(Clone, Debug, PartialEq)]
pub struct GlyphRequest {
    pub font_size: f32,
    pub font_style: FontStyle,
    /// Distinct characters in first-seen order.
    pub characters: String,
}

/// A font's glyph atlas, shared by every view using that font.
///
/// Adding glyphs may rebuild the atlas, which invalidates glyph handles
/// handed out earlier. A rebuild must bump `generation`.
pub trait GlyphAtlas: FontMetrics {
    fn request_characters(&mut self, characters: &str, font_size: f32, style: FontStyle);

    fn generation(&self) -> u64;
}
