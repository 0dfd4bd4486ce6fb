//! Modifier scope tree.
//!
//! Scopes live in an arena and link to their parent by index. Effective values
//! are computed by folding the chain from the root down, so a scope never holds
//! a reference to its parent.

use crate::modifier::TextModifier;
use crate::values::{Color, FontSizeValue, FontStyle, LetterCase};

/// View-level defaults every scope chain starts from.
#[derive(Clone, Debug, PartialEq)]
pub struct BaseStyle {
    pub font_size: f32,
    pub color: Color,
    pub font_style: FontStyle,
    pub spacing: f32,
    pub ruby_font_scale: f32,
    pub ruby_offset: f32,
}

impl Default for BaseStyle {
    fn default() -> Self {
        Self {
            font_size: 20.0,
            color: Color::BLACK,
            font_style: FontStyle::NORMAL,
            spacing: 0.0,
            ruby_font_scale: 0.5,
            ruby_offset: 0.0,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ScopeId(u32);

impl ScopeId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

#[derive(Clone, Debug)]
struct Scope {
    parent: Option<ScopeId>,
    modifier: Option<TextModifier>,
    /// Own `font_style` replaces the inherited bits instead of OR-ing.
    replaces_font_style: bool,
}

/// Effective style of one scope.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ResolvedStyle {
    pub font_size: f32,
    pub color: Color,
    pub font_style: FontStyle,
    pub letter_case: Option<LetterCase>,
    pub spacing: f32,
    pub ruby_color: Color,
    pub ruby_font_scale: f32,
    pub ruby_font_style: FontStyle,
    pub ruby_offset: f32,
}

#[derive(Clone, Debug, Default)]
pub struct ScopeTree {
    base: BaseStyle,
    scopes: Vec<Scope>,
}

impl ScopeTree {
    pub fn new(base: BaseStyle) -> Self {
        Self {
            base,
            scopes: Vec::new(),
        }
    }

    pub fn base(&self) -> &BaseStyle {
        &self.base
    }

    pub fn len(&self) -> usize {
        self.scopes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scopes.is_empty()
    }

    /// Drop every scope, keeping the base style and the allocation.
    pub fn clear(&mut self) {
        self.scopes.clear();
    }

    pub fn push(&mut self, parent: Option<ScopeId>, modifier: Option<TextModifier>) -> ScopeId {
        self.push_scope(parent, modifier, false)
    }

    fn push_scope(
        &mut self,
        parent: Option<ScopeId>,
        modifier: Option<TextModifier>,
        replaces_font_style: bool,
    ) -> ScopeId {
        debug_assert!(
            parent.is_none_or(|p| p.index() < self.scopes.len()),
            "parent scope must already exist"
        );
        let id = ScopeId(self.scopes.len() as u32);
        self.scopes.push(Scope {
            parent,
            modifier,
            replaces_font_style,
        });
        id
    }

    pub fn parent(&self, id: ScopeId) -> Option<ScopeId> {
        self.scopes.get(id.index()).and_then(|s| s.parent)
    }

    pub fn modifier(&self, id: ScopeId) -> Option<&TextModifier> {
        self.scopes.get(id.index()).and_then(|s| s.modifier.as_ref())
    }

    /// Fold the chain root-first into effective values.
    pub fn resolve(&self, id: ScopeId) -> ResolvedStyle {
        let mut chain = Vec::new();
        let mut cursor = Some(id);
        while let Some(current) = cursor {
            let Some(scope) = self.scopes.get(current.index()) else {
                break;
            };
            chain.push(scope);
            cursor = scope.parent;
        }

        let base = &self.base;
        let mut font_size = base.font_size;
        let mut color = base.color;
        let mut font_style = base.font_style;
        let mut letter_case = None;
        let mut spacing = base.spacing;
        let mut ruby_color = None;
        let mut ruby_font_scale = base.ruby_font_scale;
        let mut ruby_font_style = None;
        let mut ruby_offset = base.ruby_offset;

        for scope in chain.iter().rev() {
            let Some(m) = &scope.modifier else {
                continue;
            };
            if let Some(size) = m.font_size {
                font_size = size.apply(font_size);
            }
            if let Some(c) = m.color {
                color = c;
            }
            if let Some(style) = m.font_style {
                font_style = if scope.replaces_font_style {
                    style
                } else {
                    font_style | style
                };
            }
            if let Some(case) = m.letter_case {
                letter_case = Some(case);
            }
            if let Some(s) = m.spacing {
                spacing = s;
            }
            if let Some(c) = m.ruby_color {
                ruby_color = Some(c);
            }
            if let Some(scale) = m.ruby_font_scale {
                ruby_font_scale = scale;
            }
            if let Some(style) = m.ruby_font_style {
                ruby_font_style = Some(style);
            }
            if let Some(offset) = m.ruby_offset {
                ruby_offset = offset;
            }
        }

        ResolvedStyle {
            font_size,
            color,
            font_style,
            letter_case,
            spacing,
            ruby_color: ruby_color.unwrap_or(color),
            ruby_font_scale,
            ruby_font_style: ruby_font_style.unwrap_or(font_style),
            ruby_offset,
        }
    }

    pub fn font_size(&self, id: ScopeId) -> f32 {
        self.resolve(id).font_size
    }

    pub fn color(&self, id: ScopeId) -> Color {
        self.resolve(id).color
    }

    pub fn font_style(&self, id: ScopeId) -> FontStyle {
        self.resolve(id).font_style
    }

    pub fn letter_case(&self, id: ScopeId) -> Option<LetterCase> {
        self.resolve(id).letter_case
    }

    pub fn spacing(&self, id: ScopeId) -> f32 {
        self.resolve(id).spacing
    }

    pub fn ruby_color(&self, id: ScopeId) -> Color {
        self.resolve(id).ruby_color
    }

    pub fn ruby_font_scale(&self, id: ScopeId) -> f32 {
        self.resolve(id).ruby_font_scale
    }

    pub fn ruby_font_style(&self, id: ScopeId) -> FontStyle {
        self.resolve(id).ruby_font_style
    }

    pub fn ruby_offset(&self, id: ScopeId) -> f32 {
        self.resolve(id).ruby_offset
    }

    /// Child scope used for ruby annotation text: color, size and style come
    /// from the ruby settings of `id`.
    pub fn ruby_scope(&mut self, id: ScopeId) -> ScopeId {
        let resolved = self.resolve(id);
        let modifier = TextModifier {
            color: Some(resolved.ruby_color),
            font_size: Some(FontSizeValue::Absolute(
                (resolved.font_size * resolved.ruby_font_scale).floor(),
            )),
            font_style: Some(resolved.ruby_font_style),
            ..TextModifier::default()
        };
        self.push_scope(Some(id), Some(modifier), true)
    }

    /// Color explicitly set by markup, if any.
    ///
    /// `None` at a root scope means the view's default color applies as is.
    pub fn modified_color(&self, id: ScopeId) -> Option<Color> {
        let mut cursor = id;
        loop {
            let scope = self.scopes.get(cursor.index())?;
            let parent = scope.parent?;
            if let Some(color) = scope.modifier.as_ref().and_then(|m| m.color) {
                return Some(color);
            }
            cursor = parent;
        }
    }

    /// Ruby annotation color explicitly set by markup: the nearest ruby
    /// color, else the markup color it falls back to.
    pub fn modified_ruby_color(&self, id: ScopeId) -> Option<Color> {
        let mut cursor = Some(id);
        while let Some(current) = cursor {
            let scope = self.scopes.get(current.index())?;
            if scope.parent.is_some()
                && let Some(color) = scope.modifier.as_ref().and_then(|m| m.ruby_color)
            {
                return Some(color);
            }
            cursor = scope.parent;
        }
        self.modified_color(id)
    }
}
