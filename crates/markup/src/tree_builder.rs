//! Node builder: turns the annotated token stream into a `Node` tree.

use crate::context::ParseContext;
use crate::error::{SyntaxError, SyntaxErrorCode};
use crate::node::Node;
use crate::token::Token;

struct OpenElement {
    name: String,
    position: usize,
    attributes: Vec<(String, String)>,
    children: Vec<Node>,
}

/// Consume the tokens held by `ctx` and build the tree.
///
/// Each end tag must close the innermost open element (names compared ASCII
/// case-insensitively). Elements still open when the tokens run out are an
/// error; there is no implicit closing.
pub fn build_tree(ctx: &mut ParseContext) -> Result<Node, SyntaxError> {
    let mut root_children: Vec<Node> = Vec::with_capacity(ctx.root_children as usize);
    let mut stack: Vec<OpenElement> = Vec::new();
    let mut pending_key: Option<String> = None;

    for token in ctx.tokens.drain(..) {
        match token {
            Token::Text { text } => {
                let node = Node::Text { text };
                match stack.last_mut() {
                    Some(open) => open.children.push(node),
                    None => root_children.push(node),
                }
            }
            Token::BeginTag {
                name,
                position,
                children_count,
                attribute_count,
            } => {
                stack.push(OpenElement {
                    name,
                    position,
                    attributes: Vec::with_capacity(attribute_count as usize),
                    children: Vec::with_capacity(children_count as usize),
                });
            }
            Token::AttributeKey { name } => pending_key = Some(name),
            Token::AttributeValue { value } => {
                if let (Some(key), Some(open)) = (pending_key.take(), stack.last_mut()) {
                    open.attributes.push((key, value));
                }
            }
            Token::EndTag {
                name,
                position,
                allow_empty,
            } => {
                let Some(open) = stack.pop() else {
                    return Err(SyntaxError::with_detail(
                        SyntaxErrorCode::UnexpectedEndTag,
                        position,
                        format!("</{name}>"),
                    ));
                };
                if !allow_empty && !open.name.eq_ignore_ascii_case(&name) {
                    return Err(SyntaxError::with_detail(
                        SyntaxErrorCode::MismatchedEndTag,
                        position,
                        format!("expected </{}>, found </{name}>", open.name),
                    ));
                }
                let node = Node::Element {
                    name: open.name,
                    attributes: open.attributes,
                    children: open.children,
                };
                match stack.last_mut() {
                    Some(parent) => parent.children.push(node),
                    None => root_children.push(node),
                }
            }
        }
    }

    if let Some(open) = stack.pop() {
        return Err(SyntaxError::with_detail(
            SyntaxErrorCode::UnclosedElement,
            open.position,
            format!("<{}>", open.name),
        ));
    }

    Ok(Node::Document {
        children: root_children,
    })
}
