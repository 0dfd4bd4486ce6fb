use crate::values::{
    Color, FontSizeValue, FontStyle, LetterCase, parse_color, parse_font_size, parse_font_style,
    parse_letter_case, parse_number,
};
use markup::{Node, SHORTHAND_ATTRIBUTE_KEY};

/// Style delta carried by one element. Unset fields inherit.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TextModifier {
    pub font_size: Option<FontSizeValue>,
    pub color: Option<Color>,
    pub font_style: Option<FontStyle>,
    pub letter_case: Option<LetterCase>,
    pub ruby_color: Option<Color>,
    pub ruby_font_scale: Option<f32>,
    pub ruby_font_style: Option<FontStyle>,
    pub ruby_offset: Option<f32>,
    pub spacing: Option<f32>,
}

/// What an element contributes to layout besides its modifier.
#[derive(Clone, Debug, PartialEq)]
pub enum ElementRole {
    /// Only styles its children.
    Span,
    /// Children are the base text; `annotation` is drawn above it.
    Ruby { annotation: String },
    InlineImage {
        source: String,
        width: Option<f32>,
        height: Option<f32>,
    },
    LineBreak,
    /// Unrecognised tag: children are laid out unstyled.
    Unknown,
}

impl TextModifier {
    pub fn is_empty(&self) -> bool {
        *self == TextModifier::default()
    }

    /// Interpret an element. Tag and attribute names match ASCII
    /// case-insensitively; values that fail to parse are ignored.
    pub fn from_element(name: &str, attributes: &[(String, String)]) -> (Option<Self>, ElementRole) {
        let attr = |key: &str| {
            attributes
                .iter()
                .find(|(k, _)| k.eq_ignore_ascii_case(key))
                .map(|(_, v)| v.as_str())
        };
        // `<color='red'>` stores its value under the shorthand key.
        let value = || attr(SHORTHAND_ATTRIBUTE_KEY);

        let mut m = TextModifier::default();
        let tag = name.to_ascii_lowercase();
        let role = match tag.as_str() {
            "b" => {
                m.font_style = Some(FontStyle::BOLD);
                ElementRole::Span
            }
            "i" => {
                m.font_style = Some(FontStyle::ITALIC);
                ElementRole::Span
            }
            "color" => {
                m.color = value().and_then(|v| parsed(name, v, parse_color(v)));
                ElementRole::Span
            }
            "size" => {
                m.font_size = value().and_then(|v| parsed(name, v, parse_font_size(v)));
                ElementRole::Span
            }
            "case" => {
                m.letter_case = value().and_then(|v| parsed(name, v, parse_letter_case(v)));
                ElementRole::Span
            }
            "space" => {
                m.spacing = value().and_then(|v| parsed(name, v, parse_number(v)));
                ElementRole::Span
            }
            "font" => {
                m.font_size = attr("size").and_then(|v| parsed(name, v, parse_font_size(v)));
                m.color = attr("color").and_then(|v| parsed(name, v, parse_color(v)));
                m.font_style = attr("style").and_then(|v| parsed(name, v, parse_font_style(v)));
                m.spacing = attr("spacing").and_then(|v| parsed(name, v, parse_number(v)));
                ElementRole::Span
            }
            "ruby" => {
                m.ruby_color = attr("color").and_then(|v| parsed(name, v, parse_color(v)));
                m.ruby_font_scale = attr("scale")
                    .and_then(|v| parsed(name, v, parse_number(v)))
                    .filter(|scale| *scale > 0.0);
                m.ruby_font_style = attr("style").and_then(|v| parsed(name, v, parse_font_style(v)));
                m.ruby_offset = attr("offset").and_then(|v| parsed(name, v, parse_number(v)));
                let annotation = attr("rt").or_else(value).unwrap_or_default().to_string();
                ElementRole::Ruby { annotation }
            }
            "img" | "sprite" => {
                let source = attr("src").or_else(value).unwrap_or_default().to_string();
                ElementRole::InlineImage {
                    source,
                    width: attr("width").and_then(|v| parsed(name, v, parse_number(v))),
                    height: attr("height").and_then(|v| parsed(name, v, parse_number(v))),
                }
            }
            "br" => ElementRole::LineBreak,
            _ => {
                log::debug!(target: "style.modifier", "unknown tag <{name}> applies no style");
                ElementRole::Unknown
            }
        };

        let modifier = (!m.is_empty()).then_some(m);
        (modifier, role)
    }

    /// `from_element` for a tree node; non-elements have no modifier.
    pub fn from_node(node: &Node) -> (Option<Self>, ElementRole) {
        match node {
            Node::Element {
                name, attributes, ..
            } => Self::from_element(name, attributes),
            _ => (None, ElementRole::Span),
        }
    }
}

fn parsed<T>(tag: &str, raw: &str, value: Option<T>) -> Option<T> {
    if value.is_none() {
        log::debug!(target: "style.modifier", "ignoring unparsable value {raw:?} on <{tag}>");
    }
    value
}

#[cfg(test)]
mod tests {
    use super::*;

    fn attrs(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn bold_and_italic_set_style_bits() {
        let (b, role) = TextModifier::from_element("b", &[]);
        assert_eq!(b.and_then(|m| m.font_style), Some(FontStyle::BOLD));
        assert_eq!(role, ElementRole::Span);
        let (i, _) = TextModifier::from_element("I", &[]);
        assert_eq!(i.and_then(|m| m.font_style), Some(FontStyle::ITALIC));
    }

    #[test]
    fn shorthand_value_feeds_single_value_tags() {
        let (m, _) = TextModifier::from_element("color", &attrs(&[("Value", "#00ff00")]));
        assert_eq!(m.and_then(|m| m.color), Some(Color::rgb(0, 255, 0)));
        let (m, _) = TextModifier::from_element("size", &attrs(&[("Value", "+6")]));
        assert_eq!(m.and_then(|m| m.font_size), Some(FontSizeValue::Relative(6.0)));
        let (m, _) = TextModifier::from_element("case", &attrs(&[("value", "smaller")]));
        assert_eq!(m.and_then(|m| m.letter_case), Some(LetterCase::Smaller));
    }

    #[test]
    fn font_tag_combines_attributes() {
        let (m, _) = TextModifier::from_element(
            "font",
            &attrs(&[("size", "30"), ("COLOR", "red"), ("style", "bolditalic"), ("spacing", "2")]),
        );
        let m = m.expect("font carries a modifier");
        assert_eq!(m.font_size, Some(FontSizeValue::Absolute(30.0)));
        assert_eq!(m.color, Some(Color::rgb(255, 0, 0)));
        assert_eq!(m.font_style, Some(FontStyle::BOLD | FontStyle::ITALIC));
        assert_eq!(m.spacing, Some(2.0));
    }

    #[test]
    fn ruby_sets_ruby_fields_and_annotation() {
        let (m, role) = TextModifier::from_element(
            "ruby",
            &attrs(&[("rt", "かんじ"), ("color", "blue"), ("scale", "0.4"), ("offset", "3")]),
        );
        let m = m.expect("ruby carries a modifier");
        assert_eq!(m.ruby_color, Some(Color::rgb(0, 0, 255)));
        assert_eq!(m.ruby_font_scale, Some(0.4));
        assert_eq!(m.ruby_offset, Some(3.0));
        assert_eq!(
            role,
            ElementRole::Ruby {
                annotation: "かんじ".to_string()
            }
        );
    }

    #[test]
    fn image_role_reads_source_and_size() {
        let (m, role) = TextModifier::from_element(
            "img",
            &attrs(&[("src", "icons.png#star"), ("width", "16"), ("height", "x")]),
        );
        assert!(m.is_none());
        assert_eq!(
            role,
            ElementRole::InlineImage {
                source: "icons.png#star".to_string(),
                width: Some(16.0),
                height: None,
            }
        );
    }

    #[test]
    fn unknown_tags_and_bad_values_apply_nothing() {
        assert_eq!(
            TextModifier::from_element("blink", &[]),
            (None, ElementRole::Unknown)
        );
        assert_eq!(
            TextModifier::from_element("color", &attrs(&[("Value", "not-a-color")])),
            (None, ElementRole::Span)
        );
        assert_eq!(TextModifier::from_element("br", &[]), (None, ElementRole::LineBreak));
    }
}
