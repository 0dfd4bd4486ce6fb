//! Line breaking, alignment and preferred-size measurement for marked-up text.
//!
//! Pipeline: `collect_items` flattens a parsed tree into glyph / ruby / image
//! items while building the modifier scope tree; `break_into_lines` measures
//! those items through a `FontMetrics` implementation and produces a
//! `TextLayout`; `PreferredSize` answers size queries against a layout.

mod align;
mod engine;
mod items;
mod kinsoku;
mod measure;
mod metrics;
mod options;
mod types;

pub use engine::break_into_lines;
pub use items::{LayoutItem, collect_items};
pub use kinsoku::{LineBreakRule, is_hangul, is_wide};
pub use measure::{
    HeightMode, MeasureInputs, PreferredSize, WidthMode, measure_height, measure_width,
};
pub use metrics::{FontMetrics, MonospaceMetrics};
pub use options::{Alignment, LayoutOptions, Padding, VerticalAlignment};
pub use types::{InlineImagePlacement, PlacedGlyph, Rect, RubyGroup, TextLayout, TextLine};
