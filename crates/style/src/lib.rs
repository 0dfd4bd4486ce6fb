//! Text modifiers carried by markup elements and the scope tree that resolves
//! them into effective text style.

pub mod modifier;
pub mod scope;
pub mod values;

pub use modifier::{ElementRole, TextModifier};
pub use scope::{BaseStyle, ResolvedStyle, ScopeId, ScopeTree};
pub use values::{Color, FontSizeValue, FontStyle, LetterCase, parse_color};
