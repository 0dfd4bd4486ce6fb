//! Deterministic token formatting for golden tests and debug dumps.

use crate::token::Token;

/// One-line rendering of a token.
///
/// Strings are printed with Rust debug escaping so whitespace and quotes stay
/// visible in snapshots.
pub fn format_token(token: &Token) -> String {
    match token {
        Token::Text { text } => format!("Text({text:?})"),
        Token::BeginTag {
            name,
            position,
            children_count,
            attribute_count,
        } => format!(
            "BeginTag({name} @{position} children={children_count} attrs={attribute_count})"
        ),
        Token::EndTag {
            name,
            position,
            allow_empty,
        } => {
            if *allow_empty {
                format!("EndTag({name} @{position} empty)")
            } else {
                format!("EndTag({name} @{position})")
            }
        }
        Token::AttributeKey { name } => format!("Key({name})"),
        Token::AttributeValue { value } => format!("Value({value:?})"),
    }
}

/// Format every token of a stream, one per entry.
pub fn format_tokens(tokens: &[Token]) -> Vec<String> {
    tokens.iter().map(format_token).collect()
}
