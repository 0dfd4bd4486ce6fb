//! Caller-owned parse context.

use crate::token::Token;
use crate::tokenizer::Cursor;

/// Configuration for the tokenizer.
#[derive(Clone, Debug)]
pub struct TokenizerConfig {
    /// Longest accepted body of a character reference (between `&` and `;`).
    pub max_character_reference_len: usize,
    /// Trace every mode transition under the `markup.tokenizer` target.
    pub log_transitions: bool,
}

impl Default for TokenizerConfig {
    fn default() -> Self {
        Self {
            max_character_reference_len: 32,
            log_transitions: false,
        }
    }
}

/// Minimal parse instrumentation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ParseStats {
    pub parses: u64,
    pub failures: u64,
    pub tokens_emitted: u64,
    pub mode_transitions: u64,
}

/// Reusable buffers for tokenizing and tree building.
///
/// One context serves any number of sequential parses; its buffers keep their
/// capacity between calls. Taking `&mut ParseContext` makes a parse
/// non-reentrant: a second parse cannot begin until the first has returned.
#[derive(Debug, Default)]
pub struct ParseContext {
    pub(crate) config: TokenizerConfig,
    pub(crate) cursor: Cursor,
    pub(crate) tokens: Vec<Token>,
    pub(crate) pending_text: String,
    pub(crate) scratch: String,
    pub(crate) open_tags: Vec<usize>,
    pub(crate) root_children: u32,
    pub(crate) stats: ParseStats,
}

impl ParseContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: TokenizerConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    pub fn config(&self) -> &TokenizerConfig {
        &self.config
    }

    /// Tokens produced by the last successful `tokenize` call that were not yet
    /// consumed by `build_tree`.
    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    /// Number of direct children of the synthetic document root.
    pub fn root_children(&self) -> u32 {
        self.root_children
    }

    pub fn stats(&self) -> ParseStats {
        self.stats
    }

    pub(crate) fn reset(&mut self) {
        self.cursor.reset();
        self.tokens.clear();
        self.pending_text.clear();
        self.scratch.clear();
        self.open_tags.clear();
        self.root_children = 0;
    }
}
