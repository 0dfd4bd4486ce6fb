//! Tokenizer modes.
//!
//! Each mode is a sub-tokenizer; they hand control to each other by switching
//! the shared mode value while reading from the shared cursor.

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TokenizerMode {
    Text,
    Tag,
    EndTag,
    Attribute,
    AttributeValue,
    CharacterReference,
}
