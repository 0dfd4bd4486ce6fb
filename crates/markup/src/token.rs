//! Markup token model.

/// Name used for the attribute key synthesized from `<tag="value">` shorthand.
pub const SHORTHAND_ATTRIBUTE_KEY: &str = "Value";

/// One token of the flat stream produced by the tokenizer.
///
/// Determinism contract:
/// - Tokens are stored in source order.
/// - `AttributeKey` is always immediately followed by its `AttributeValue`.
/// - A self-closing tag is emitted as `BeginTag`, its attributes, then an
///   `EndTag` with `allow_empty == true`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Token {
    Text {
        text: String,
    },
    BeginTag {
        name: String,
        /// Byte offset of the opening `<`.
        position: usize,
        /// Direct `Text` and `BeginTag` children; filled by the annotation pass.
        children_count: u32,
        /// Direct `AttributeKey` tokens; filled by the annotation pass.
        attribute_count: u32,
    },
    EndTag {
        name: String,
        /// Byte offset of the opening `<` (of `</` or of the self-closing tag).
        position: usize,
        /// Set when synthesized from `/>` syntax.
        allow_empty: bool,
    },
    AttributeKey {
        name: String,
    },
    AttributeValue {
        value: String,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum TokenKind {
    Text,
    BeginTag,
    EndTag,
    AttributeKey,
    AttributeValue,
}

impl Token {
    pub(crate) fn kind(&self) -> TokenKind {
        match self {
            Token::Text { .. } => TokenKind::Text,
            Token::BeginTag { .. } => TokenKind::BeginTag,
            Token::EndTag { .. } => TokenKind::EndTag,
            Token::AttributeKey { .. } => TokenKind::AttributeKey,
            Token::AttributeValue { .. } => TokenKind::AttributeValue,
        }
    }
}
