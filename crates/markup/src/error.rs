//! Syntax errors reported by the tokenizer and the node builder.

use std::fmt;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SyntaxErrorCode {
    UnterminatedTag,
    UnterminatedEndTag,
    UnterminatedAttribute,
    UnterminatedAttributeValue,
    UnterminatedCharacterReference,
    EmptyCharacterReference,
    UnknownCharacterReference,
    InvalidEscape,
    MissingTagName,
    MissingAttributeAssignment,
    MissingQuote,
    UnexpectedCharacter,
    UnexpectedEndTag,
    MismatchedEndTag,
    UnclosedElement,
}

impl SyntaxErrorCode {
    pub const fn label(self) -> &'static str {
        match self {
            Self::UnterminatedTag => "unterminated tag",
            Self::UnterminatedEndTag => "unterminated end tag",
            Self::UnterminatedAttribute => "unterminated attribute",
            Self::UnterminatedAttributeValue => "unterminated attribute value",
            Self::UnterminatedCharacterReference => "unterminated character reference",
            Self::EmptyCharacterReference => "empty character reference",
            Self::UnknownCharacterReference => "unknown character reference",
            Self::InvalidEscape => "invalid escape sequence",
            Self::MissingTagName => "missing tag name",
            Self::MissingAttributeAssignment => "attribute name must be followed by '='",
            Self::MissingQuote => "attribute value must be quoted",
            Self::UnexpectedCharacter => "unexpected character",
            Self::UnexpectedEndTag => "end tag without matching begin tag",
            Self::MismatchedEndTag => "mismatched end tag",
            Self::UnclosedElement => "element is never closed",
        }
    }
}

/// Malformed markup. Parsing stops at the first one; there is no recovered tree.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SyntaxError {
    pub code: SyntaxErrorCode,
    /// Byte offset of the offending construct in the source text.
    pub position: usize,
    pub detail: Option<String>,
}

impl SyntaxError {
    pub fn new(code: SyntaxErrorCode, position: usize) -> Self {
        Self {
            code,
            position,
            detail: None,
        }
    }

    pub fn with_detail(code: SyntaxErrorCode, position: usize, detail: impl Into<String>) -> Self {
        Self {
            code,
            position,
            detail: Some(detail.into()),
        }
    }

    /// Human-readable message, the same text `Display` produces.
    pub fn message(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for SyntaxError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} at byte {}", self.code.label(), self.position)?;
        if let Some(detail) = &self.detail {
            write!(f, ": {detail}")?;
        }
        Ok(())
    }
}

impl std::error::Error for SyntaxError {}
