use style::FontStyle;

use crate::kinsoku::is_wide;

/// Font measurement the line breaker depends on.
///
/// Layout never touches glyph atlases or rasterizers directly; hosts plug
/// their font backend in through this trait.
pub trait FontMetrics {
    /// Horizontal advance of `ch` at `font_size` px.
    fn advance(&self, ch: char, font_size: f32, style: FontStyle) -> f32;

    /// Distance from the baseline to the top of the em box.
    fn ascent(&self, font_size: f32) -> f32;

    /// Distance from the baseline to the bottom of the em box.
    fn descent(&self, font_size: f32) -> f32;

    fn line_height(&self, font_size: f32) -> f32 {
        self.ascent(font_size) + self.descent(font_size)
    }
}

/// Deterministic metrics: narrow characters advance half an em, wide (CJK)
/// characters a full em. The em box splits 80/20 around the baseline.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MonospaceMetrics {
    pub narrow_ratio: f32,
    pub wide_ratio: f32,
    pub ascent_ratio: f32,
    /// Extra advance ratio for bold glyphs.
    pub bold_extra_ratio: f32,
}

impl Default for MonospaceMetrics {
    fn default() -> Self {
        Self {
            narrow_ratio: 0.5,
            wide_ratio: 1.0,
            ascent_ratio: 0.8,
            bold_extra_ratio: 0.0,
        }
    }
}

impl FontMetrics for MonospaceMetrics {
    fn advance(&self, ch: char, font_size: f32, style: FontStyle) -> f32 {
        let font_size = font_size.max(0.0);
        let mut ratio = if is_wide(ch) {
            self.wide_ratio
        } else {
            self.narrow_ratio
        };
        if style.contains(FontStyle::BOLD) {
            ratio += self.bold_extra_ratio;
        }
        font_size * ratio
    }

    fn ascent(&self, font_size: f32) -> f32 {
        font_size.max(0.0) * self.ascent_ratio
    }

    fn descent(&self, font_size: f32) -> f32 {
        font_size.max(0.0) * (1.0 - self.ascent_ratio)
    }
}
