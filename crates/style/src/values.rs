use bitflags::bitflags;

/// Straight (non-premultiplied) RGBA color.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const WHITE: Color = Color::rgb(255, 255, 255);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn with_alpha(self, a: u8) -> Self {
        Self { a, ..self }
    }
}

impl Default for Color {
    fn default() -> Self {
        Color::BLACK
    }
}

/// Parse `#rgb`, `#rgba`, `#rrggbb`, `#rrggbbaa` or a basic color name.
pub fn parse_color(value: &str) -> Option<Color> {
    let s = value.trim().to_ascii_lowercase();
    if let Some(hex) = s.strip_prefix('#') {
        if !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
            return None;
        }
        let short = |i: usize| u8::from_str_radix(&hex[i..i + 1], 16).ok().map(|v| v * 17);
        let long = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
        return match hex.len() {
            3 => Some(Color::rgb(short(0)?, short(1)?, short(2)?)),
            4 => Some(Color::rgba(short(0)?, short(1)?, short(2)?, short(3)?)),
            6 => Some(Color::rgb(long(0)?, long(2)?, long(4)?)),
            8 => Some(Color::rgba(long(0)?, long(2)?, long(4)?, long(6)?)),
            _ => None,
        };
    }

    let named = match s.as_str() {
        "black" => Color::rgb(0, 0, 0),
        "blue" => Color::rgb(0, 0, 255),
        "cyan" | "aqua" => Color::rgb(0, 255, 255),
        "gray" | "grey" => Color::rgb(128, 128, 128),
        "green" => Color::rgb(0, 128, 0),
        "lime" => Color::rgb(0, 255, 0),
        "magenta" | "fuchsia" => Color::rgb(255, 0, 255),
        "maroon" => Color::rgb(128, 0, 0),
        "navy" => Color::rgb(0, 0, 128),
        "olive" => Color::rgb(128, 128, 0),
        "orange" => Color::rgb(255, 165, 0),
        "purple" => Color::rgb(128, 0, 128),
        "red" => Color::rgb(255, 0, 0),
        "silver" => Color::rgb(192, 192, 192),
        "teal" => Color::rgb(0, 128, 128),
        "white" => Color::rgb(255, 255, 255),
        "yellow" => Color::rgb(255, 255, 0),
        "clear" | "transparent" => Color::rgba(0, 0, 0, 0),
        _ => return None,
    };
    Some(named)
}

bitflags! {
    /// Font style bits. Inherited styles combine with `|`.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct FontStyle: u8 {
        const BOLD = 0b01;
        const ITALIC = 0b10;
    }
}

impl FontStyle {
    pub const NORMAL: FontStyle = FontStyle::empty();
}

/// Parse `normal`, `bold`, `italic`, `bolditalic` (also `bold-italic`,
/// `bold italic`, `italicbold`).
pub fn parse_font_style(value: &str) -> Option<FontStyle> {
    let s = value.trim().to_ascii_lowercase();
    let compact: String = s.chars().filter(|c| !matches!(c, ' ' | '-' | '_')).collect();
    match compact.as_str() {
        "normal" => Some(FontStyle::NORMAL),
        "bold" => Some(FontStyle::BOLD),
        "italic" => Some(FontStyle::ITALIC),
        "bolditalic" | "italicbold" => Some(FontStyle::BOLD | FontStyle::ITALIC),
        _ => None,
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LetterCase {
    Upper,
    Lower,
    /// Lowercase letters are drawn as uppercase at a reduced size.
    Smaller,
}

impl LetterCase {
    /// Size factor applied to lowercase letters under `Smaller`.
    pub const SMALLER_SCALE: f32 = 0.8;
}

pub fn parse_letter_case(value: &str) -> Option<LetterCase> {
    match value.trim().to_ascii_lowercase().as_str() {
        "upper" | "uppercase" => Some(LetterCase::Upper),
        "lower" | "lowercase" => Some(LetterCase::Lower),
        "smaller" | "smallcaps" | "small-caps" => Some(LetterCase::Smaller),
        _ => None,
    }
}

/// A font size as written in markup, resolved against the inherited size.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum FontSizeValue {
    Absolute(f32),
    /// `+n` / `-n`: added to the inherited size.
    Relative(f32),
    /// `n%` of the inherited size.
    Percent(f32),
}

impl FontSizeValue {
    pub fn apply(self, inherited: f32) -> f32 {
        let size = match self {
            FontSizeValue::Absolute(size) => size,
            FontSizeValue::Relative(delta) => inherited + delta,
            FontSizeValue::Percent(pct) => inherited * pct / 100.0,
        };
        size.max(0.0)
    }
}

pub fn parse_font_size(value: &str) -> Option<FontSizeValue> {
    let v = value.trim();
    if let Some(pct) = v.strip_suffix('%') {
        return parse_number(pct).map(FontSizeValue::Percent);
    }
    let v = v.strip_suffix("px").unwrap_or(v).trim_end();
    if v.starts_with('+') || v.starts_with('-') {
        return parse_number(v).map(FontSizeValue::Relative);
    }
    parse_number(v)
        .filter(|size| *size >= 0.0)
        .map(FontSizeValue::Absolute)
}

/// Parse a finite number; `+` prefixes are accepted.
pub fn parse_number(value: &str) -> Option<f32> {
    let v = value.trim();
    let v = v.strip_prefix('+').unwrap_or(v);
    v.parse::<f32>().ok().filter(|n| n.is_finite())
}
