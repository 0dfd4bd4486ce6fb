use std::ops::Range;

use style::{ResolvedStyle, ScopeId, ScopeTree};

use crate::align::{block_offset, line_offset};
use crate::items::LayoutItem;
use crate::kinsoku::LineBreakRule;
use crate::metrics::FontMetrics;
use crate::options::LayoutOptions;
use crate::types::{InlineImagePlacement, PlacedGlyph, Rect, RubyGroup, TextLayout, TextLine};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum UnitKind {
    Glyph,
    Space,
    Ruby,
    Image,
    Break,
}

/// Measured, unbreakable piece of a line.
///
/// Invariants:
/// - `width` includes the trailing letter `spacing`; a unit that ends a line
///   does not count its spacing toward the line width.
/// - `Space` units never cause an overflow; they hang at the end of a line.
#[derive(Clone, Copy, Debug)]
struct Unit {
    kind: UnitKind,
    item: usize,
    ch: Option<char>,
    width: f32,
    spacing: f32,
    ascent: f32,
    descent: f32,
}

impl Unit {
    fn content_width(&self) -> f32 {
        self.width - self.spacing
    }
}

#[derive(Clone, Debug, PartialEq)]
struct LineSpan {
    units: Range<usize>,
    is_auto: bool,
    ends_with_break: bool,
}

/// Resolves each scope once per layout.
struct StyleCache<'s> {
    tree: &'s ScopeTree,
    resolved: Vec<Option<ResolvedStyle>>,
}

impl<'s> StyleCache<'s> {
    fn new(tree: &'s ScopeTree) -> Self {
        Self {
            tree,
            resolved: vec![None; tree.len()],
        }
    }

    fn get(&mut self, id: ScopeId) -> ResolvedStyle {
        match self.resolved.get(id.index()).copied().flatten() {
            Some(style) => style,
            None => {
                let style = self.tree.resolve(id);
                if let Some(slot) = self.resolved.get_mut(id.index()) {
                    *slot = Some(style);
                }
                style
            }
        }
    }
}

/// Break `items` into lines and position every glyph, ruby annotation and
/// inline image.
///
/// The whole layout is recomputed on every call.
pub fn break_into_lines(
    items: &[LayoutItem],
    scopes: &ScopeTree,
    metrics: &dyn FontMetrics,
    options: &LayoutOptions,
) -> TextLayout {
    let mut styles = StyleCache::new(scopes);
    let units = measure_units(items, &mut styles, metrics);
    let spans = break_lines(&units, options.content_width(), options.break_rule);
    let layout = place_lines(items, &units, &spans, &mut styles, metrics, options);
    log::trace!(
        target: "layout.lines",
        "{} items -> {} units -> {} lines",
        items.len(),
        units.len(),
        layout.lines.len()
    );
    layout
}

fn measure_units(
    items: &[LayoutItem],
    styles: &mut StyleCache<'_>,
    metrics: &dyn FontMetrics,
) -> Vec<Unit> {
    let mut units = Vec::with_capacity(items.len());
    for (index, item) in items.iter().enumerate() {
        let unit = match item {
            LayoutItem::Glyph { ch, scope } => {
                let style = styles.get(*scope);
                let advance = metrics.advance(*ch, style.font_size, style.font_style);
                Unit {
                    kind: if ch.is_whitespace() {
                        UnitKind::Space
                    } else {
                        UnitKind::Glyph
                    },
                    item: index,
                    ch: Some(*ch),
                    width: advance + style.spacing,
                    spacing: style.spacing,
                    ascent: metrics.ascent(style.font_size),
                    descent: metrics.descent(style.font_size),
                }
            }
            LayoutItem::Ruby {
                base,
                annotation,
                scope,
                ruby_scope,
            } => {
                let ruby = measure_ruby(base, annotation, *scope, *ruby_scope, styles, metrics);
                Unit {
                    kind: UnitKind::Ruby,
                    item: index,
                    ch: None,
                    width: ruby.width + ruby.spacing,
                    spacing: ruby.spacing,
                    ascent: ruby.base_ascent + ruby.offset + ruby.annotation_height,
                    descent: ruby.base_descent,
                }
            }
            LayoutItem::Image {
                width,
                height,
                scope,
                ..
            } => {
                let style = styles.get(*scope);
                let (w, h) = image_size(*width, *height, style.font_size);
                Unit {
                    kind: UnitKind::Image,
                    item: index,
                    ch: None,
                    width: w,
                    spacing: 0.0,
                    ascent: h,
                    descent: 0.0,
                }
            }
            LayoutItem::Break => Unit {
                kind: UnitKind::Break,
                item: index,
                ch: None,
                width: 0.0,
                spacing: 0.0,
                ascent: 0.0,
                descent: 0.0,
            },
        };
        units.push(unit);
    }
    units
}

/// Missing image dimensions follow the other one, else the font size.
fn image_size(width: Option<f32>, height: Option<f32>, font_size: f32) -> (f32, f32) {
    let w = width.or(height).unwrap_or(font_size).max(0.0);
    let h = height.or(width).unwrap_or(font_size).max(0.0);
    (w, h)
}

struct RubyMetrics {
    /// Width of the group without trailing spacing.
    width: f32,
    base_width: f32,
    annotation_width: f32,
    spacing: f32,
    base_ascent: f32,
    base_descent: f32,
    annotation_height: f32,
    annotation_descent: f32,
    offset: f32,
}

fn measure_ruby(
    base: &[(char, ScopeId)],
    annotation: &str,
    scope: ScopeId,
    ruby_scope: ScopeId,
    styles: &mut StyleCache<'_>,
    metrics: &dyn FontMetrics,
) -> RubyMetrics {
    let group = styles.get(scope);
    let mut base_width = 0.0;
    let mut base_ascent = metrics.ascent(group.font_size);
    let mut base_descent = metrics.descent(group.font_size);
    let mut last_spacing = 0.0;
    for (ch, glyph_scope) in base {
        let style = styles.get(*glyph_scope);
        base_width += metrics.advance(*ch, style.font_size, style.font_style) + style.spacing;
        base_ascent = f32::max(base_ascent, metrics.ascent(style.font_size));
        base_descent = f32::max(base_descent, metrics.descent(style.font_size));
        last_spacing = style.spacing;
    }
    base_width -= last_spacing;

    let ruby = styles.get(ruby_scope);
    let annotation_width: f32 = annotation
        .chars()
        .map(|ch| metrics.advance(ch, ruby.font_size, ruby.font_style))
        .sum();

    RubyMetrics {
        width: f32::max(base_width, annotation_width),
        base_width,
        annotation_width,
        spacing: last_spacing,
        base_ascent,
        base_descent,
        annotation_height: metrics.line_height(ruby.font_size),
        annotation_descent: metrics.descent(ruby.font_size),
        offset: group.ruby_offset,
    }
}

/// Break opportunity between two adjacent units.
fn can_break_between(prev: &Unit, next: &Unit, rule: LineBreakRule) -> bool {
    if next.kind == UnitKind::Space {
        return false;
    }
    if next.ch.is_some_and(|ch| rule.is_forbidden_line_start(ch)) {
        return false;
    }
    if prev.kind != UnitKind::Space && prev.ch.is_some_and(|ch| rule.is_forbidden_line_end(ch)) {
        return false;
    }
    match (prev.kind, next.kind) {
        (UnitKind::Space, _) => true,
        (UnitKind::Ruby | UnitKind::Image, _) | (_, UnitKind::Ruby | UnitKind::Image) => true,
        _ => match (prev.ch, next.ch) {
            (Some(a), Some(b)) => rule.is_breakable_wide(a) && rule.is_breakable_wide(b),
            _ => false,
        },
    }
}

fn break_lines(units: &[Unit], max_width: f32, rule: LineBreakRule) -> Vec<LineSpan> {
    let mut lines = Vec::new();
    if units.is_empty() {
        return lines;
    }

    let mut line_start = 0;
    let mut is_auto = false;
    let mut x = 0.0;
    let mut last_opportunity: Option<usize> = None;
    let mut i = 0;

    while i < units.len() {
        let unit = &units[i];
        if unit.kind == UnitKind::Break {
            lines.push(LineSpan {
                units: line_start..i,
                is_auto,
                ends_with_break: true,
            });
            line_start = i + 1;
            is_auto = false;
            x = 0.0;
            last_opportunity = None;
            i += 1;
            continue;
        }

        if i > line_start && can_break_between(&units[i - 1], unit, rule) {
            last_opportunity = Some(i);
        }

        let overflows =
            unit.kind != UnitKind::Space && i > line_start && x + unit.content_width() > max_width;
        if overflows {
            // Without an opportunity the overflowing unit alone moves down.
            let brk = match last_opportunity {
                Some(b) if b > line_start => b,
                _ => i,
            };
            lines.push(LineSpan {
                units: line_start..brk,
                is_auto,
                ends_with_break: false,
            });
            line_start = brk;
            is_auto = true;
            x = 0.0;
            last_opportunity = None;
            i = brk;
            continue;
        }

        x += unit.width;
        i += 1;
    }

    lines.push(LineSpan {
        units: line_start..units.len(),
        is_auto,
        ends_with_break: false,
    });
    lines
}

fn place_lines(
    items: &[LayoutItem],
    units: &[Unit],
    spans: &[LineSpan],
    styles: &mut StyleCache<'_>,
    metrics: &dyn FontMetrics,
    options: &LayoutOptions,
) -> TextLayout {
    let padding = options.padding;
    let base_size = styles.tree.base().font_size;
    let base_ascent = metrics.ascent(base_size);
    let base_descent = metrics.descent(base_size);
    let fixed_step = options
        .line_height_fixed
        .then(|| base_size * options.fixed_line_height);
    let content_width = options.content_width();

    let mut layout = TextLayout {
        origin_x: padding.left,
        padding_horizontal: padding.horizontal(),
        padding_vertical: padding.vertical(),
        line_gap: options.line_gap,
        fixed_line_step: fixed_step,
        ..TextLayout::default()
    };

    let mut prev: Option<(f32, f32)> = None;
    for (line_index, span) in spans.iter().enumerate() {
        let line_units = &units[span.units.clone()];
        let content_end = line_units
            .iter()
            .rposition(|u| u.kind != UnitKind::Space)
            .map_or(0, |p| p + 1);
        let content = &line_units[..content_end];
        let width = content.iter().map(|u| u.width).sum::<f32>()
            - content.last().map_or(0.0, |u| u.spacing);
        let trailing_width = line_units.iter().map(|u| u.width).sum::<f32>() - width;

        let (ascent, descent) = if line_units.is_empty() {
            (base_ascent, base_descent)
        } else {
            line_units.iter().fold((0.0f32, 0.0f32), |(a, d), u| {
                (a.max(u.ascent), d.max(u.descent))
            })
        };

        let y = match (prev, fixed_step) {
            (None, _) => padding.top + ascent,
            (Some((prev_y, _)), Some(step)) => prev_y + step,
            (Some((prev_y, prev_descent)), None) => {
                prev_y + prev_descent + options.line_gap + ascent
            }
        };
        prev = Some((y, descent));

        // Inner spaces: after the first non-space unit, before the content end.
        let first_content = content.iter().position(|u| u.kind != UnitKind::Space);
        let num_spaces = first_content.map_or(0, |first| {
            content[first..]
                .iter()
                .filter(|u| u.kind == UnitKind::Space)
                .count()
        });
        // Only lines that wrapped into a following line are justified.
        let justifiable = !span.ends_with_break && line_index + 1 < spans.len();
        let (x_offset, extra_per_space) =
            line_offset(options.alignment, content_width - width, justifiable, num_spaces);

        let glyph_start = layout.glyphs.len();
        let mut x = padding.left + x_offset;
        for (pos, unit) in line_units.iter().enumerate() {
            let in_content = pos < content_end;
            let pen = Pen {
                x,
                y,
                line: line_index,
                line_glyph_start: glyph_start,
            };
            place_unit(&items[unit.item], unit, pen, styles, metrics, &mut layout);
            x += unit.width;
            if unit.kind == UnitKind::Space
                && in_content
                && first_content.is_some_and(|first| pos > first)
            {
                if let Some(glyph) = layout.glyphs.last_mut() {
                    glyph.advance += extra_per_space;
                }
                x += extra_per_space;
            }
        }

        layout.lines.push(TextLine {
            glyph_range: glyph_start..layout.glyphs.len(),
            y,
            ascent,
            descent,
            width,
            trailing_width,
            x_offset,
            is_auto_line_break: span.is_auto,
        });
    }

    finish_block(&mut layout, options);
    layout
}

/// Position of the unit being placed.
#[derive(Clone, Copy, Debug)]
struct Pen {
    x: f32,
    /// Baseline.
    y: f32,
    line: usize,
    /// First glyph index of the current line.
    line_glyph_start: usize,
}

fn place_unit(
    item: &LayoutItem,
    unit: &Unit,
    pen: Pen,
    styles: &mut StyleCache<'_>,
    metrics: &dyn FontMetrics,
    layout: &mut TextLayout,
) {
    let Pen {
        x,
        y,
        line,
        line_glyph_start,
    } = pen;
    match item {
        LayoutItem::Glyph { ch, scope } => {
            let style = styles.get(*scope);
            let is_line_head = layout.glyphs.len() == line_glyph_start;
            layout.glyphs.push(PlacedGlyph {
                ch: *ch,
                x,
                y,
                advance: unit.content_width(),
                spacing: unit.spacing,
                font_size: style.font_size,
                font_style: style.font_style,
                color: style.color,
                modified_color: styles.tree.modified_color(*scope),
                line,
                is_ruby: false,
                is_line_head,
            });
        }
        LayoutItem::Ruby {
            base,
            annotation,
            scope,
            ruby_scope,
        } => {
            let ruby = measure_ruby(base, annotation, *scope, *ruby_scope, styles, metrics);
            let base_start = layout.glyphs.len();
            let mut base_x = x + (ruby.width - ruby.base_width) * 0.5;
            for (ch, glyph_scope) in base {
                let style = styles.get(*glyph_scope);
                let advance = metrics.advance(*ch, style.font_size, style.font_style);
                let is_line_head = layout.glyphs.len() == line_glyph_start;
                layout.glyphs.push(PlacedGlyph {
                    ch: *ch,
                    x: base_x,
                    y,
                    advance,
                    spacing: style.spacing,
                    font_size: style.font_size,
                    font_style: style.font_style,
                    color: style.color,
                    modified_color: styles.tree.modified_color(*glyph_scope),
                    line,
                    is_ruby: false,
                    is_line_head,
                });
                base_x += advance + style.spacing;
            }

            let ruby_style = styles.get(*ruby_scope);
            let ruby_y = y - ruby.base_ascent - ruby.offset - ruby.annotation_descent;
            let mut ruby_x = x + (ruby.width - ruby.annotation_width) * 0.5;
            for ch in annotation.chars() {
                let advance = metrics.advance(ch, ruby_style.font_size, ruby_style.font_style);
                layout.ruby_glyphs.push(PlacedGlyph {
                    ch,
                    x: ruby_x,
                    y: ruby_y,
                    advance,
                    spacing: 0.0,
                    font_size: ruby_style.font_size,
                    font_style: ruby_style.font_style,
                    color: ruby_style.color,
                    modified_color: styles.tree.modified_ruby_color(*scope),
                    line,
                    is_ruby: true,
                    is_line_head: false,
                });
                ruby_x += advance;
            }
            layout.ruby_groups.push(RubyGroup {
                line,
                x,
                width: ruby.width,
                glyph_range: base_start..layout.glyphs.len(),
            });
        }
        LayoutItem::Image { source, name, .. } => {
            layout.images.push(InlineImagePlacement {
                line,
                x,
                y: y - unit.ascent,
                width: unit.width,
                height: unit.ascent,
                source: source.clone(),
                name: name.clone(),
            });
        }
        LayoutItem::Break => {}
    }
}

/// Apply vertical alignment and compute bounds.
fn finish_block(layout: &mut TextLayout, options: &LayoutOptions) {
    let (Some(first), Some(last)) = (layout.lines.first(), layout.lines.last()) else {
        return;
    };
    let top = first.top().min(options.padding.top);
    let content_height = last.bottom() - top;
    let shift = block_offset(
        options.vertical_alignment,
        options.content_height(),
        content_height,
    );

    if shift != 0.0 {
        for line in &mut layout.lines {
            line.y += shift;
        }
        for glyph in layout.glyphs.iter_mut().chain(layout.ruby_glyphs.iter_mut()) {
            glyph.y += shift;
        }
        for image in &mut layout.images {
            image.y += shift;
        }
    }

    let width = layout.lines.iter().map(|l| l.width).fold(0.0, f32::max);
    layout.bounds = Rect {
        x: options.padding.left,
        y: top + shift,
        width,
        height: content_height,
    };
}
