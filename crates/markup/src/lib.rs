pub mod token_fmt;

mod context;
mod entities;
mod error;
mod node;
mod token;
mod tokenizer;
mod tree_builder;

pub use context::{ParseContext, ParseStats, TokenizerConfig};
pub use error::{SyntaxError, SyntaxErrorCode};
pub use node::Node;
pub use token::{SHORTHAND_ATTRIBUTE_KEY, Token};
pub use token_fmt::{format_token, format_tokens};
pub use tokenizer::{TokenizerMode, tokenize};
pub use tree_builder::build_tree;

/// Tokenize `text` and build its tree, reusing the buffers held by `ctx`.
pub fn parse(ctx: &mut ParseContext, text: &str) -> Result<Node, SyntaxError> {
    tokenize(ctx, text)?;
    build_tree(ctx).inspect_err(|err| {
        ctx.stats.failures = ctx.stats.failures.saturating_add(1);
        log::debug!(target: "markup.tree_builder", "build failed: {err}");
    })
}
