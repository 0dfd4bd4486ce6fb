//! Shared scan position threaded through every tokenizer mode.

/// Byte position into the text being tokenized.
///
/// Invariant: `pos` always sits on a UTF-8 char boundary of the current input.
/// Every mode reads and advances the same cursor; none keeps a private copy.
#[derive(Clone, Copy, Debug, Default)]
pub(crate) struct Cursor {
    pos: usize,
}

impl Cursor {
    pub(crate) fn reset(&mut self) {
        self.pos = 0;
    }

    pub(crate) fn pos(&self) -> usize {
        self.pos
    }

    pub(crate) fn set_pos(&mut self, input: &str, pos: usize) {
        debug_assert!(input.is_char_boundary(pos), "cursor must stay on char boundary");
        self.pos = pos.min(input.len());
    }

    pub(crate) fn peek(&self, input: &str) -> Option<char> {
        input[self.pos..].chars().next()
    }

    /// The char after the one under the cursor.
    pub(crate) fn peek_next(&self, input: &str) -> Option<char> {
        let mut chars = input[self.pos..].chars();
        chars.next()?;
        chars.next()
    }

    pub(crate) fn advance(&mut self, input: &str) -> Option<char> {
        let ch = self.peek(input)?;
        self.pos += ch.len_utf8();
        Some(ch)
    }

    pub(crate) fn consume_if(&mut self, input: &str, expected: char) -> bool {
        if self.peek(input) == Some(expected) {
            self.pos += expected.len_utf8();
            true
        } else {
            false
        }
    }

    pub(crate) fn skip_whitespace(&mut self, input: &str) {
        while let Some(ch) = self.peek(input) {
            if !ch.is_whitespace() {
                break;
            }
            self.pos += ch.len_utf8();
        }
    }

    /// Consume `[A-Za-z][A-Za-z0-9_-]*` and return it, or `None` (without moving)
    /// if the cursor is not on a letter.
    pub(crate) fn consume_identifier<'i>(&mut self, input: &'i str) -> Option<&'i str> {
        let bytes = input.as_bytes();
        let start = self.pos;
        if !bytes.get(start).is_some_and(|b| is_identifier_start(*b)) {
            return None;
        }
        let mut end = start + 1;
        while end < bytes.len() && is_identifier_char(bytes[end]) {
            end += 1;
        }
        // ASCII-only scan, so `end` is a char boundary.
        self.pos = end;
        Some(&input[start..end])
    }

    pub(crate) fn at_identifier_start(&self, input: &str) -> bool {
        input
            .as_bytes()
            .get(self.pos)
            .is_some_and(|b| is_identifier_start(*b))
    }
}

fn is_identifier_start(b: u8) -> bool {
    b.is_ascii_alphabetic()
}

fn is_identifier_char(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'-' || b == b'_'
}
