//! Markup tokenizer.
//!
//! An explicit state machine over a single shared cursor. The modes (text, tag,
//! end tag, attribute key, attribute value, character reference) are separate
//! step handlers that switch the shared mode to hand off control.
//!
//! Invariants:
//! - The cursor only moves forward and stays on UTF-8 boundaries.
//! - The first syntax error stops tokenization; no partial token stream is
//!   reported as success.
//! - Reaching end of input in any mode other than `Text` is an error that
//!   points at the opening `<` or `&` of the unclosed construct.

use crate::context::ParseContext;
use crate::entities::resolve_character_reference;
use crate::error::{SyntaxError, SyntaxErrorCode};
use crate::token::{SHORTHAND_ATTRIBUTE_KEY, Token, TokenKind};
use memchr::memchr2;

mod cursor;
mod modes;

pub(crate) use cursor::Cursor;
pub use modes::TokenizerMode;

/// Tokenize `text` into `ctx`'s token buffer and return the tokens.
///
/// Begin tags come back annotated with their direct child and attribute
/// counts. On error the buffer contents are unspecified.
pub fn tokenize<'c>(ctx: &'c mut ParseContext, text: &str) -> Result<&'c [Token], SyntaxError> {
    ctx.reset();
    ctx.stats.parses = ctx.stats.parses.saturating_add(1);
    if let Err(err) = Tokenizer::new(ctx, text).run() {
        ctx.stats.failures = ctx.stats.failures.saturating_add(1);
        log::debug!(target: "markup.tokenizer", "tokenize failed: {err}");
        return Err(err);
    }
    annotate_counts(ctx);
    Ok(&ctx.tokens)
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Step {
    Continue,
    EndOfInput,
}

struct Tokenizer<'c, 'i> {
    ctx: &'c mut ParseContext,
    input: &'i str,
    mode: TokenizerMode,
    /// Byte offset of the `<` or `&` that opened the current construct.
    construct_start: usize,
    /// Name of the begin tag currently being read (for `/>` synthesis).
    current_tag: String,
    /// Whether the current begin tag already has an attribute.
    tag_has_attribute: bool,
}

impl<'c, 'i> Tokenizer<'c, 'i> {
    fn new(ctx: &'c mut ParseContext, input: &'i str) -> Self {
        Self {
            ctx,
            input,
            mode: TokenizerMode::Text,
            construct_start: 0,
            current_tag: String::new(),
            tag_has_attribute: false,
        }
    }

    fn run(mut self) -> Result<(), SyntaxError> {
        loop {
            let step = match self.mode {
                TokenizerMode::Text => self.step_text(),
                TokenizerMode::Tag => self.step_tag(),
                TokenizerMode::EndTag => self.step_end_tag(),
                TokenizerMode::Attribute => self.step_attribute(),
                TokenizerMode::AttributeValue => self.step_attribute_value(),
                TokenizerMode::CharacterReference => self.step_character_reference(),
            }?;
            if step == Step::EndOfInput {
                return Ok(());
            }
        }
    }

    fn transition_to(&mut self, next: TokenizerMode) {
        if self.mode == next {
            return;
        }
        if self.ctx.config.log_transitions {
            log::trace!(
                target: "markup.tokenizer",
                "mode {:?} -> {:?} @{}",
                self.mode,
                next,
                self.ctx.cursor.pos()
            );
        }
        self.mode = next;
        self.ctx.stats.mode_transitions = self.ctx.stats.mode_transitions.saturating_add(1);
    }

    fn emit(&mut self, token: Token) {
        #[cfg(feature = "debug-stats")]
        log::trace!(target: "markup.tokenizer", "emit token: {token:?}");
        self.ctx.tokens.push(token);
        self.ctx.stats.tokens_emitted = self.ctx.stats.tokens_emitted.saturating_add(1);
    }

    fn flush_pending_text(&mut self) {
        if self.ctx.pending_text.is_empty() {
            return;
        }
        let text = std::mem::take(&mut self.ctx.pending_text);
        self.emit(Token::Text { text });
    }

    fn unterminated(&self, code: SyntaxErrorCode) -> SyntaxError {
        SyntaxError::new(code, self.construct_start)
    }

    fn unexpected(&self, ch: char) -> SyntaxError {
        SyntaxError::with_detail(
            SyntaxErrorCode::UnexpectedCharacter,
            self.ctx.cursor.pos(),
            format!("'{ch}'"),
        )
    }

    fn step_text(&mut self) -> StepResult {
        let input = self.input;
        let pos = self.ctx.cursor.pos();
        let bytes = &input.as_bytes()[pos..];

        // `<` and `&` are ASCII, so they never match inside a UTF-8 sequence.
        let run_len = memchr2(b'<', b'&', bytes).unwrap_or(bytes.len());
        if run_len > 0 {
            self.ctx.pending_text.push_str(&input[pos..pos + run_len]);
            self.ctx.cursor.set_pos(input, pos + run_len);
        }

        match self.ctx.cursor.peek(input) {
            None => {
                self.flush_pending_text();
                Ok(Step::EndOfInput)
            }
            Some('<') => {
                self.flush_pending_text();
                self.construct_start = self.ctx.cursor.pos();
                self.ctx.cursor.advance(input);
                if self.ctx.cursor.consume_if(input, '/') {
                    self.transition_to(TokenizerMode::EndTag);
                } else {
                    self.tag_has_attribute = false;
                    self.transition_to(TokenizerMode::Tag);
                }
                Ok(Step::Continue)
            }
            // The text run only stops at `<`, `&`, or end of input.
            Some(_) => {
                self.flush_pending_text();
                self.construct_start = self.ctx.cursor.pos();
                self.ctx.cursor.advance(input);
                self.transition_to(TokenizerMode::CharacterReference);
                Ok(Step::Continue)
            }
        }
    }

    fn step_tag(&mut self) -> StepResult {
        let input = self.input;
        self.ctx.cursor.skip_whitespace(input);
        let Some(name) = self.ctx.cursor.consume_identifier(input) else {
            return match self.ctx.cursor.peek(input) {
                None => Err(self.unterminated(SyntaxErrorCode::UnterminatedTag)),
                Some(ch) => Err(SyntaxError::with_detail(
                    SyntaxErrorCode::MissingTagName,
                    self.ctx.cursor.pos(),
                    format!("found '{ch}'"),
                )),
            };
        };

        self.current_tag.clear();
        self.current_tag.push_str(name);
        self.emit(Token::BeginTag {
            name: name.to_string(),
            position: self.construct_start,
            children_count: 0,
            attribute_count: 0,
        });
        self.dispatch_in_tag()
    }

    /// Shared continuation after a tag name or a quoted attribute value.
    fn dispatch_in_tag(&mut self) -> StepResult {
        let input = self.input;
        self.ctx.cursor.skip_whitespace(input);
        match self.ctx.cursor.peek(input) {
            None => Err(self.unterminated(SyntaxErrorCode::UnterminatedTag)),
            Some('>') => {
                self.ctx.cursor.advance(input);
                self.transition_to(TokenizerMode::Text);
                Ok(Step::Continue)
            }
            Some('/') => {
                if self.ctx.cursor.peek_next(input) != Some('>') {
                    if self.ctx.cursor.peek_next(input).is_none() {
                        return Err(self.unterminated(SyntaxErrorCode::UnterminatedTag));
                    }
                    return Err(self.unexpected('/'));
                }
                self.ctx.cursor.advance(input);
                self.ctx.cursor.advance(input);
                let name = self.current_tag.clone();
                self.emit(Token::EndTag {
                    name,
                    position: self.construct_start,
                    allow_empty: true,
                });
                self.transition_to(TokenizerMode::Text);
                Ok(Step::Continue)
            }
            Some('=') if !self.tag_has_attribute => {
                self.ctx.cursor.advance(input);
                self.tag_has_attribute = true;
                self.emit(Token::AttributeKey {
                    name: SHORTHAND_ATTRIBUTE_KEY.to_string(),
                });
                self.transition_to(TokenizerMode::AttributeValue);
                Ok(Step::Continue)
            }
            Some(_) if self.ctx.cursor.at_identifier_start(input) => {
                self.transition_to(TokenizerMode::Attribute);
                Ok(Step::Continue)
            }
            Some(ch) => Err(self.unexpected(ch)),
        }
    }

    fn step_attribute(&mut self) -> StepResult {
        let input = self.input;
        self.ctx.cursor.skip_whitespace(input);
        let Some(name) = self.ctx.cursor.consume_identifier(input) else {
            return match self.ctx.cursor.peek(input) {
                None => Err(self.unterminated(SyntaxErrorCode::UnterminatedAttribute)),
                Some(ch) => Err(self.unexpected(ch)),
            };
        };
        let name = name.to_string();

        self.ctx.cursor.skip_whitespace(input);
        match self.ctx.cursor.peek(input) {
            Some('=') => {
                self.ctx.cursor.advance(input);
            }
            None => return Err(self.unterminated(SyntaxErrorCode::UnterminatedAttribute)),
            Some(_) => {
                return Err(SyntaxError::with_detail(
                    SyntaxErrorCode::MissingAttributeAssignment,
                    self.ctx.cursor.pos(),
                    name,
                ));
            }
        }

        self.tag_has_attribute = true;
        self.emit(Token::AttributeKey { name });
        self.transition_to(TokenizerMode::AttributeValue);
        Ok(Step::Continue)
    }

    fn step_attribute_value(&mut self) -> StepResult {
        let input = self.input;
        self.ctx.cursor.skip_whitespace(input);
        let quote = match self.ctx.cursor.peek(input) {
            Some(q @ ('\'' | '"')) => q,
            None => return Err(self.unterminated(SyntaxErrorCode::UnterminatedAttributeValue)),
            Some(ch) => {
                return Err(SyntaxError::with_detail(
                    SyntaxErrorCode::MissingQuote,
                    self.ctx.cursor.pos(),
                    format!("found '{ch}'"),
                ));
            }
        };
        self.ctx.cursor.advance(input);

        self.ctx.scratch.clear();
        loop {
            let escape_pos = self.ctx.cursor.pos();
            match self.ctx.cursor.advance(input) {
                None => return Err(self.unterminated(SyntaxErrorCode::UnterminatedAttributeValue)),
                Some(ch) if ch == quote => break,
                Some('\\') => match self.ctx.cursor.advance(input) {
                    Some(escaped @ ('\'' | '"')) => self.ctx.scratch.push(escaped),
                    None => {
                        return Err(self.unterminated(SyntaxErrorCode::UnterminatedAttributeValue));
                    }
                    Some(other) => {
                        return Err(SyntaxError::with_detail(
                            SyntaxErrorCode::InvalidEscape,
                            escape_pos,
                            format!("'\\{other}'"),
                        ));
                    }
                },
                Some(ch) => self.ctx.scratch.push(ch),
            }
        }

        let value = std::mem::take(&mut self.ctx.scratch);
        self.emit(Token::AttributeValue { value });
        self.dispatch_in_tag()
    }

    fn step_end_tag(&mut self) -> StepResult {
        let input = self.input;
        self.ctx.cursor.skip_whitespace(input);
        let Some(name) = self.ctx.cursor.consume_identifier(input) else {
            return match self.ctx.cursor.peek(input) {
                None => Err(self.unterminated(SyntaxErrorCode::UnterminatedEndTag)),
                Some(ch) => Err(SyntaxError::with_detail(
                    SyntaxErrorCode::MissingTagName,
                    self.ctx.cursor.pos(),
                    format!("found '{ch}'"),
                )),
            };
        };
        let name = name.to_string();

        self.ctx.cursor.skip_whitespace(input);
        match self.ctx.cursor.peek(input) {
            Some('>') => {
                self.ctx.cursor.advance(input);
            }
            None => return Err(self.unterminated(SyntaxErrorCode::UnterminatedEndTag)),
            Some(ch) => return Err(self.unexpected(ch)),
        }

        self.emit(Token::EndTag {
            name,
            position: self.construct_start,
            allow_empty: false,
        });
        self.transition_to(TokenizerMode::Text);
        Ok(Step::Continue)
    }

    fn step_character_reference(&mut self) -> StepResult {
        let input = self.input;
        let body_start = self.ctx.cursor.pos();
        loop {
            match self.ctx.cursor.peek(input) {
                Some(';') => break,
                None => {
                    return Err(self.unterminated(SyntaxErrorCode::UnterminatedCharacterReference));
                }
                Some(ch) if ch.is_whitespace() || ch == '<' || ch == '&' => {
                    return Err(self.unterminated(SyntaxErrorCode::UnterminatedCharacterReference));
                }
                Some(_) => {
                    self.ctx.cursor.advance(input);
                    if self.ctx.cursor.pos() - body_start > self.ctx.config.max_character_reference_len {
                        return Err(SyntaxError::with_detail(
                            SyntaxErrorCode::UnterminatedCharacterReference,
                            self.construct_start,
                            "reference body too long",
                        ));
                    }
                }
            }
        }
        let body = &input[body_start..self.ctx.cursor.pos()];
        self.ctx.cursor.advance(input);

        let resolved = resolve_character_reference(body).map_err(|code| {
            SyntaxError::with_detail(code, self.construct_start, format!("&{body};"))
        })?;
        if let Some(ch) = resolved {
            self.emit(Token::Text {
                text: ch.to_string(),
            });
        }
        self.transition_to(TokenizerMode::Text);
        Ok(Step::Continue)
    }
}

type StepResult = Result<Step, SyntaxError>;

/// Fill `children_count` / `attribute_count` of every begin tag by walking a
/// stack of open tags over the finished token stream.
fn annotate_counts(ctx: &mut ParseContext) {
    let ParseContext {
        tokens,
        open_tags,
        root_children,
        ..
    } = ctx;
    open_tags.clear();
    *root_children = 0;

    for index in 0..tokens.len() {
        let kind = tokens[index].kind();
        match kind {
            TokenKind::Text | TokenKind::BeginTag => {
                match open_tags.last() {
                    Some(&open) => {
                        if let Token::BeginTag { children_count, .. } = &mut tokens[open] {
                            *children_count += 1;
                        }
                    }
                    None => *root_children += 1,
                }
                if kind == TokenKind::BeginTag {
                    open_tags.push(index);
                }
            }
            TokenKind::AttributeKey => {
                if let Some(&open) = open_tags.last()
                    && let Token::BeginTag {
                        attribute_count, ..
                    } = &mut tokens[open]
                {
                    *attribute_count += 1;
                }
            }
            TokenKind::EndTag => {
                open_tags.pop();
            }
            TokenKind::AttributeValue => {}
        }
    }
}

#[cfg(test)]
mod tests;
