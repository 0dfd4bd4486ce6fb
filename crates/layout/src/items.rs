use markup::Node;
use style::{ElementRole, FontSizeValue, LetterCase, ScopeId, ScopeTree, TextModifier};

/// Flattened layout input built from a markup tree.
#[derive(Clone, Debug, PartialEq)]
pub enum LayoutItem {
    Glyph {
        ch: char,
        scope: ScopeId,
    },
    /// Base text with an annotation laid out above it as one unbreakable unit.
    Ruby {
        base: Vec<(char, ScopeId)>,
        annotation: String,
        scope: ScopeId,
        ruby_scope: ScopeId,
    },
    Image {
        source: String,
        name: Option<String>,
        width: Option<f32>,
        height: Option<f32>,
        scope: ScopeId,
    },
    Break,
}

/// Walk `root` and emit layout items, pushing one scope per element into
/// `scopes` (which is cleared first).
///
/// Letter case is applied here, so the breaker only sees final characters.
/// `\n` and `<br/>` become `Break`; `\r` is dropped.
pub fn collect_items(root: &Node, scopes: &mut ScopeTree) -> Vec<LayoutItem> {
    scopes.clear();
    let root_scope = scopes.push(None, None);
    let mut items = Vec::new();
    let mut collector = Collector {
        scopes,
        smaller_scopes: Vec::new(),
    };
    for child in root.children() {
        collector.node(child, root_scope, &mut items);
    }
    items
}

struct Collector<'a> {
    scopes: &'a mut ScopeTree,
    /// `(scope, child scope at the reduced size)` for `LetterCase::Smaller`.
    smaller_scopes: Vec<(ScopeId, ScopeId)>,
}

impl Collector<'_> {
    fn node(&mut self, node: &Node, parent: ScopeId, items: &mut Vec<LayoutItem>) {
        match node {
            Node::Text { text } => {
                for ch in text.chars() {
                    match ch {
                        '\r' => {}
                        '\n' => items.push(LayoutItem::Break),
                        _ => self.cased(ch, parent, |ch, scope| {
                            items.push(LayoutItem::Glyph { ch, scope })
                        }),
                    }
                }
            }
            Node::Document { children } => {
                for child in children {
                    self.node(child, parent, items);
                }
            }
            Node::Element { children, .. } => {
                let (modifier, role) = TextModifier::from_node(node);
                let scope = self.scopes.push(Some(parent), modifier);
                match role {
                    ElementRole::Span | ElementRole::Unknown => {
                        for child in children {
                            self.node(child, scope, items);
                        }
                    }
                    ElementRole::LineBreak => {
                        items.push(LayoutItem::Break);
                        for child in children {
                            self.node(child, scope, items);
                        }
                    }
                    ElementRole::Ruby { annotation } if !annotation.is_empty() => {
                        let mut inner = Vec::new();
                        for child in children {
                            self.node(child, scope, &mut inner);
                        }
                        let (base, trailing) = split_ruby_base(inner);
                        let ruby_scope = self.scopes.ruby_scope(scope);
                        items.push(LayoutItem::Ruby {
                            base,
                            annotation,
                            scope,
                            ruby_scope,
                        });
                        items.extend(trailing);
                    }
                    ElementRole::Ruby { .. } => {
                        log::debug!(target: "layout.items", "ruby without annotation laid out as plain text");
                        for child in children {
                            self.node(child, scope, items);
                        }
                    }
                    ElementRole::InlineImage {
                        source,
                        width,
                        height,
                    } => {
                        if source.is_empty() {
                            log::debug!(target: "layout.items", "inline image without source skipped");
                            return;
                        }
                        let (source, name) = match source.split_once('#') {
                            Some((path, name)) => (path.to_string(), Some(name.to_string())),
                            None => (source, None),
                        };
                        items.push(LayoutItem::Image {
                            source,
                            name,
                            width,
                            height,
                            scope,
                        });
                    }
                }
            }
        }
    }

    /// Apply the scope's letter case to `ch`, emitting one or more characters.
    fn cased(&mut self, ch: char, scope: ScopeId, mut emit: impl FnMut(char, ScopeId)) {
        match self.scopes.letter_case(scope) {
            None => emit(ch, scope),
            Some(LetterCase::Upper) => ch.to_uppercase().for_each(|c| emit(c, scope)),
            Some(LetterCase::Lower) => ch.to_lowercase().for_each(|c| emit(c, scope)),
            Some(LetterCase::Smaller) if ch.is_lowercase() => {
                let smaller = self.smaller_scope(scope);
                ch.to_uppercase().for_each(|c| emit(c, smaller));
            }
            Some(LetterCase::Smaller) => emit(ch, scope),
        }
    }

    fn smaller_scope(&mut self, scope: ScopeId) -> ScopeId {
        if let Some((_, smaller)) = self.smaller_scopes.iter().find(|(s, _)| *s == scope) {
            return *smaller;
        }
        let smaller = self.scopes.push(
            Some(scope),
            Some(TextModifier {
                font_size: Some(FontSizeValue::Percent(LetterCase::SMALLER_SCALE * 100.0)),
                ..TextModifier::default()
            }),
        );
        self.smaller_scopes.push((scope, smaller));
        smaller
    }
}

/// Base characters of a ruby group, each with its own scope. A ruby group
/// never breaks, so line breaks inside it are dropped and a nested group
/// contributes only its base. Images follow the group.
fn split_ruby_base(inner: Vec<LayoutItem>) -> (Vec<(char, ScopeId)>, Vec<LayoutItem>) {
    let mut base = Vec::new();
    let mut trailing = Vec::new();
    for item in inner {
        match item {
            LayoutItem::Glyph { ch, scope } => base.push((ch, scope)),
            LayoutItem::Ruby {
                base: nested,
                annotation,
                ..
            } => {
                log::debug!(
                    target: "layout.items",
                    "nested ruby {annotation:?} flattened into its parent"
                );
                base.extend(nested);
            }
            LayoutItem::Break => {}
            image @ LayoutItem::Image { .. } => trailing.push(image),
        }
    }
    (base, trailing)
}
