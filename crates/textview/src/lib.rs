//! Text views and the frame scheduler that drives them.
//!
//! A [`TextView`] owns its markup text and everything derived from it: the
//! parsed tree, layout items, the laid out lines and the preferred-size
//! caches. A [`TextViewScheduler`] owns many views and, once per frame,
//! parses changed text, feeds missing glyphs to each font's atlas and
//! re-lays out the views whose inputs changed.

mod atlas;
mod config;
mod scheduler;
mod view;

pub use atlas::{GlyphAtlas, GlyphRequest};
pub use config::TextViewConfig;
pub use scheduler::{SchedulerState, TextViewScheduler, TickReport};
pub use view::TextView;
