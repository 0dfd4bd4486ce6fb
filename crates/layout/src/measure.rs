//! Preferred-size measurement with per-mode caches.
//!
//! Each mode caches its last value together with the inputs its formula
//! read. A cache is reused only while those inputs are unchanged and no new
//! layout has arrived (`invalidate`). Changing an input a mode does not read
//! never recomputes that mode.

use crate::types::{TextLayout, TextLine};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum WidthMode {
    FirstLine,
    AllLine,
    /// Auto-wrapped physical lines merged back into their logical line.
    AllLogicalLine,
    /// Only glyphs revealed so far.
    Visibled,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum HeightMode {
    AllLine,
    AllLogicalLine,
    Visibled,
}

/// View state the measurements may read.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MeasureInputs {
    /// Measure line heights from recorded baselines instead of font metrics.
    pub line_height_fixed: bool,
    /// Number of glyphs revealed; `usize::MAX` reveals everything.
    pub visible_length: usize,
    /// First line index taking part in `Visibled` measurement.
    pub visible_line_start: usize,
}

impl Default for MeasureInputs {
    fn default() -> Self {
        Self {
            line_height_fixed: false,
            visible_length: usize::MAX,
            visible_line_start: 0,
        }
    }
}

/// Which inputs a formula reads.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct Dependencies {
    line_height_fixed: bool,
    visible_length: bool,
    visible_line_start: bool,
}

impl Dependencies {
    const NONE: Self = Self {
        line_height_fixed: false,
        visible_length: false,
        visible_line_start: false,
    };

    fn key(self, inputs: &MeasureInputs) -> DependencyKey {
        DependencyKey {
            line_height_fixed: self.line_height_fixed.then_some(inputs.line_height_fixed),
            visible_length: self.visible_length.then_some(inputs.visible_length),
            visible_line_start: self.visible_line_start.then_some(inputs.visible_line_start),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct DependencyKey {
    line_height_fixed: Option<bool>,
    visible_length: Option<usize>,
    visible_line_start: Option<usize>,
}

impl WidthMode {
    const ALL: [WidthMode; 4] = [
        WidthMode::FirstLine,
        WidthMode::AllLine,
        WidthMode::AllLogicalLine,
        WidthMode::Visibled,
    ];

    fn dependencies(self) -> Dependencies {
        match self {
            WidthMode::FirstLine | WidthMode::AllLine | WidthMode::AllLogicalLine => {
                Dependencies::NONE
            }
            WidthMode::Visibled => Dependencies {
                line_height_fixed: false,
                visible_length: true,
                visible_line_start: true,
            },
        }
    }

    fn slot(self) -> usize {
        self as usize
    }
}

impl HeightMode {
    const ALL: [HeightMode; 3] = [
        HeightMode::AllLine,
        HeightMode::AllLogicalLine,
        HeightMode::Visibled,
    ];

    fn dependencies(self) -> Dependencies {
        match self {
            HeightMode::AllLine | HeightMode::AllLogicalLine => Dependencies {
                line_height_fixed: true,
                visible_length: false,
                visible_line_start: false,
            },
            HeightMode::Visibled => Dependencies {
                line_height_fixed: true,
                visible_length: true,
                visible_line_start: true,
            },
        }
    }

    fn slot(self) -> usize {
        self as usize
    }
}

#[derive(Clone, Copy, Debug, Default)]
struct CachedValue {
    value: f32,
    /// `None` until computed, and after invalidation.
    key: Option<DependencyKey>,
}

/// Cached preferred sizes of one view.
#[derive(Clone, Debug, Default)]
pub struct PreferredSize {
    widths: [CachedValue; WidthMode::ALL.len()],
    heights: [CachedValue; HeightMode::ALL.len()],
    recomputes: u64,
}

impl PreferredSize {
    pub fn new() -> Self {
        Self::default()
    }

    /// Forget every cached value; call after each new layout.
    pub fn invalidate(&mut self) {
        for cache in self.widths.iter_mut().chain(self.heights.iter_mut()) {
            cache.key = None;
        }
    }

    /// Number of formula evaluations so far.
    pub fn recompute_count(&self) -> u64 {
        self.recomputes
    }

    pub fn width(&mut self, layout: &TextLayout, mode: WidthMode, inputs: &MeasureInputs) -> f32 {
        let key = mode.dependencies().key(inputs);
        let cache = &mut self.widths[mode.slot()];
        if cache.key == Some(key) {
            return cache.value;
        }
        let value = measure_width(layout, mode, inputs);
        *cache = CachedValue {
            value,
            key: Some(key),
        };
        self.recomputes += 1;
        log::trace!(target: "layout.measure", "width {mode:?} recomputed: {value}");
        value
    }

    pub fn height(&mut self, layout: &TextLayout, mode: HeightMode, inputs: &MeasureInputs) -> f32 {
        let key = mode.dependencies().key(inputs);
        let cache = &mut self.heights[mode.slot()];
        if cache.key == Some(key) {
            return cache.value;
        }
        let value = measure_height(layout, mode, inputs);
        *cache = CachedValue {
            value,
            key: Some(key),
        };
        self.recomputes += 1;
        log::trace!(target: "layout.measure", "height {mode:?} recomputed: {value}");
        value
    }
}

/// Preferred width including horizontal padding.
pub fn measure_width(layout: &TextLayout, mode: WidthMode, inputs: &MeasureInputs) -> f32 {
    let content = match mode {
        WidthMode::FirstLine => layout.lines.first().map_or(0.0, |line| line.width),
        WidthMode::AllLine => layout.lines.iter().map(|line| line.width).fold(0.0, f32::max),
        WidthMode::AllLogicalLine => logical_runs(&layout.lines)
            .map(logical_width)
            .fold(0.0, f32::max),
        WidthMode::Visibled => visible_width(layout, inputs),
    };
    content + layout.padding_horizontal
}

/// Preferred height including vertical padding.
pub fn measure_height(layout: &TextLayout, mode: HeightMode, inputs: &MeasureInputs) -> f32 {
    let content = match mode {
        HeightMode::AllLine => lines_height(layout, &layout.lines, inputs.line_height_fixed),
        HeightMode::AllLogicalLine => logical_height(layout, inputs.line_height_fixed),
        HeightMode::Visibled => {
            let lines = visible_lines(layout, inputs);
            lines_height(layout, lines, inputs.line_height_fixed)
        }
    };
    content + layout.padding_vertical
}

/// Runs of lines forming one logical line: a line plus every following
/// auto-wrapped line.
fn logical_runs(lines: &[TextLine]) -> impl Iterator<Item = &[TextLine]> {
    lines.chunk_by(|_, next| next.is_auto_line_break)
}

/// Width of a logical line had it never wrapped: every line but the last
/// gives back what it dropped at the wrap point.
fn logical_width(run: &[TextLine]) -> f32 {
    let Some((last, wrapped)) = run.split_last() else {
        return 0.0;
    };
    wrapped
        .iter()
        .map(|line| line.width + line.trailing_width)
        .sum::<f32>()
        + last.width
}

fn lines_height(layout: &TextLayout, lines: &[TextLine], line_height_fixed: bool) -> f32 {
    let (Some(first), Some(last)) = (lines.first(), lines.last()) else {
        return 0.0;
    };
    if line_height_fixed {
        // Placement: read the recorded baselines.
        (last.y - first.y) + first.ascent + last.descent
    } else {
        let gaps = (lines.len() - 1) as f32 * layout.line_gap;
        lines.iter().map(TextLine::height).sum::<f32>() + gaps
    }
}

fn logical_height(layout: &TextLayout, line_height_fixed: bool) -> f32 {
    let extents: Vec<(f32, f32)> = logical_runs(&layout.lines)
        .map(|run| {
            run.iter().fold((0.0f32, 0.0f32), |(a, d), line| {
                (a.max(line.ascent), d.max(line.descent))
            })
        })
        .collect();
    let (Some(first), Some(last)) = (extents.first(), extents.last()) else {
        return 0.0;
    };
    let gaps = (extents.len() - 1) as f32;
    match (line_height_fixed, layout.fixed_line_step) {
        (true, Some(step)) => first.0 + gaps * step + last.1,
        _ => extents.iter().map(|(a, d)| a + d).sum::<f32>() + gaps * layout.line_gap,
    }
}

/// Lines from `visible_line_start` through the line of the last revealed glyph.
fn visible_lines<'a>(layout: &'a TextLayout, inputs: &MeasureInputs) -> &'a [TextLine] {
    if inputs.visible_length == 0 || layout.lines.is_empty() {
        return &[];
    }
    let last_line = if inputs.visible_length >= layout.glyphs.len() {
        layout.lines.len() - 1
    } else {
        layout.glyphs[inputs.visible_length - 1].line
    };
    let start = inputs.visible_line_start;
    if start > last_line {
        return &[];
    }
    &layout.lines[start..=last_line]
}

/// Per line: the right edge of the last revealed unit. Images and ruby
/// groups count once the glyphs around them are revealed; with everything
/// revealed each line measures its full width.
fn visible_width(layout: &TextLayout, inputs: &MeasureInputs) -> f32 {
    let everything = inputs.visible_length > 0 && inputs.visible_length >= layout.glyphs.len();
    let mut widest = 0.0f32;
    for (index, line) in layout.lines.iter().enumerate().skip(inputs.visible_line_start) {
        if everything {
            widest = widest.max(line.width);
            continue;
        }
        let end = line.glyph_range.end.min(inputs.visible_length);
        if end <= line.glyph_range.start {
            continue;
        }
        // The last revealed glyph is the line tail: its spacing does not count.
        let tail = &layout.glyphs[end - 1];
        let mut right = tail.x + tail.advance;
        for image in layout.images.iter().filter(|i| i.line == index && i.x < tail.x) {
            right = right.max(image.x + image.width);
        }
        for group in layout
            .ruby_groups
            .iter()
            .filter(|g| g.line == index && g.glyph_range.end <= end)
        {
            right = right.max(group.x + group.width);
        }
        let left = layout.origin_x + line.x_offset;
        widest = widest.max(right - left);
    }
    widest
}
