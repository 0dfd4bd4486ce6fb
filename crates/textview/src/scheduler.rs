//! Per-frame driver for many text views sharing glyph atlases.
//!
//! A tick runs three passes in order. Parsing handles views whose text
//! changed. GlyphPass asks each font's atlas for every glyph its dirty
//! views need, re-running a font's batch when the atlas rebuilds under it.
//! LayoutPass re-lays out dirty views and reconciles their images.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use core_types::{FontId, FrameId, ViewId};
use inline_image::{ImagePool, ImageRepository, InlineImageProvider};
use markup::{ParseContext, TokenizerConfig};

use crate::atlas::GlyphAtlas;
use crate::view::TextView;

/// Upper bound on parse sweeps per tick.
const MAX_PARSE_PASSES: usize = 8;
/// Upper bound on glyph batch runs per font per tick.
const MAX_GLYPH_PASSES: usize = 4;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SchedulerState {
    #[default]
    Idle,
    Parsing,
    GlyphPass,
    LayoutPass,
}

/// What one tick did.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TickReport {
    pub frame: FrameId,
    pub parsed: usize,
    pub parse_failures: usize,
    pub glyph_batches: usize,
    /// Batches re-run because the atlas rebuilt mid-pass.
    pub glyph_retries: usize,
    pub laid_out: usize,
    /// Views whose images appeared or failed this tick.
    pub image_updates: usize,
}

/// Owns registered views and drives them once per frame.
///
/// Created and owned by the host; `reset` recreates everything when the host
/// changes run mode.
#[derive(Debug, Default)]
pub struct TextViewScheduler {
    state: SchedulerState,
    views: BTreeMap<ViewId, TextView>,
    next_view: u32,
    ctx: ParseContext,
    pool: ImagePool,
    glyph_pass_invalidated: bool,
    frame: FrameId,
}

impl TextViewScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_tokenizer_config(config: TokenizerConfig) -> Self {
        Self {
            ctx: ParseContext::with_config(config),
            ..Self::default()
        }
    }

    pub fn state(&self) -> SchedulerState {
        self.state
    }

    /// Number of completed ticks.
    pub fn frame(&self) -> FrameId {
        self.frame
    }

    pub fn len(&self) -> usize {
        self.views.len()
    }

    pub fn is_empty(&self) -> bool {
        self.views.is_empty()
    }

    pub fn parse_context(&self) -> &ParseContext {
        &self.ctx
    }

    pub fn pool(&self) -> &ImagePool {
        &self.pool
    }

    pub fn register(&mut self, view: TextView) -> ViewId {
        self.next_view += 1;
        let id = ViewId(self.next_view);
        log::debug!(target: "textview.scheduler", "registered {id:?} on {:?}", view.font());
        self.views.insert(id, view);
        id
    }

    /// Remove a view, cancelling its image loads and hiding its images.
    pub fn unregister<P: InlineImageProvider>(
        &mut self,
        id: ViewId,
        images: &mut ImageRepository<P>,
    ) -> Option<TextView> {
        let mut view = self.views.remove(&id)?;
        view.release_images(images, &mut self.pool);
        log::debug!(target: "textview.scheduler", "unregistered {id:?}");
        Some(view)
    }

    pub fn view(&self, id: ViewId) -> Option<&TextView> {
        self.views.get(&id)
    }

    pub fn view_mut(&mut self, id: ViewId) -> Option<&mut TextView> {
        self.views.get_mut(&id)
    }

    pub fn views(&self) -> impl Iterator<Item = (ViewId, &TextView)> {
        self.views.iter().map(|(id, view)| (*id, view))
    }

    /// The atlas of `font` was rebuilt. Mid-GlyphPass this re-runs the
    /// current batch; at any other time the font's views are re-laid out on
    /// the next tick.
    pub fn on_atlas_rebuilt(&mut self, font: FontId) {
        for view in self.views.values_mut().filter(|v| v.font() == font) {
            view.mark_layout_dirty();
        }
        if self.state == SchedulerState::GlyphPass {
            log::trace!(target: "textview.scheduler", "{font:?} atlas rebuilt mid-pass");
            self.glyph_pass_invalidated = true;
        } else {
            log::debug!(target: "textview.scheduler", "{font:?} atlas rebuilt; views marked dirty");
        }
    }

    pub fn tick<A, P>(
        &mut self,
        atlases: &mut HashMap<FontId, A>,
        images: &mut ImageRepository<P>,
    ) -> TickReport
    where
        A: GlyphAtlas,
        P: InlineImageProvider,
    {
        let mut report = TickReport {
            frame: self.frame,
            ..TickReport::default()
        };
        self.parse_pass(&mut report);
        self.glyph_pass(atlases, &mut report);
        self.layout_pass(atlases, images, &mut report);
        self.state = SchedulerState::Idle;
        self.frame += 1;
        if report.laid_out > 0 || report.image_updates > 0 {
            log::debug!(target: "textview.scheduler", "{report:?}");
        }
        report
    }

    fn parse_pass(&mut self, report: &mut TickReport) {
        self.state = SchedulerState::Parsing;
        for _ in 0..MAX_PARSE_PASSES {
            let pending: Vec<ViewId> = self
                .views
                .iter()
                .filter(|(_, v)| v.needs_parse())
                .map(|(id, _)| *id)
                .collect();
            if pending.is_empty() {
                return;
            }
            for id in pending {
                let Some(view) = self.views.get_mut(&id) else {
                    continue;
                };
                report.parsed += 1;
                if let Err(err) = view.parse(&mut self.ctx) {
                    report.parse_failures += 1;
                    log::warn!(target: "textview.scheduler", "{id:?}: {err}");
                }
            }
        }
    }

    fn glyph_pass<A: GlyphAtlas>(
        &mut self,
        atlases: &mut HashMap<FontId, A>,
        report: &mut TickReport,
    ) {
        self.state = SchedulerState::GlyphPass;
        let fonts: BTreeSet<FontId> = self
            .views
            .values()
            .filter(|v| v.needs_layout())
            .map(TextView::font)
            .collect();

        for font in fonts {
            let Some(atlas) = atlases.get_mut(&font) else {
                log::warn!(target: "textview.scheduler", "no glyph atlas for {font:?}");
                continue;
            };
            for attempt in 1..=MAX_GLYPH_PASSES {
                self.glyph_pass_invalidated = false;
                let generation = atlas.generation();
                report.glyph_batches += 1;
                for view in self
                    .views
                    .values()
                    .filter(|v| v.font() == font && v.needs_layout())
                {
                    for request in view.glyph_requests() {
                        atlas.request_characters(
                            &request.characters,
                            request.font_size,
                            request.font_style,
                        );
                    }
                }
                if atlas.generation() != generation {
                    self.on_atlas_rebuilt(font);
                }
                if !self.glyph_pass_invalidated {
                    break;
                }
                if attempt == MAX_GLYPH_PASSES {
                    log::warn!(
                        target: "textview.scheduler",
                        "{font:?} atlas kept rebuilding; giving up after {attempt} passes"
                    );
                    break;
                }
                report.glyph_retries += 1;
            }
        }
        self.glyph_pass_invalidated = false;
    }

    fn layout_pass<A, P>(
        &mut self,
        atlases: &HashMap<FontId, A>,
        images: &mut ImageRepository<P>,
        report: &mut TickReport,
    ) where
        A: GlyphAtlas,
        P: InlineImageProvider,
    {
        self.state = SchedulerState::LayoutPass;
        for view in self.views.values_mut().filter(|v| v.needs_layout()) {
            let Some(atlas) = atlases.get(&view.font()) else {
                continue;
            };
            view.relayout(atlas);
            view.place_images(images, &mut self.pool);
            report.laid_out += 1;
        }

        let deliveries = images.pump();
        if deliveries.is_empty() {
            return;
        }
        for view in self.views.values_mut() {
            if view.receive_images(&deliveries, &mut self.pool) {
                report.image_updates += 1;
            }
        }
    }

    /// Drop every view and recreate all state, releasing images first.
    pub fn reset<P: InlineImageProvider>(&mut self, images: &mut ImageRepository<P>) {
        log::debug!(
            target: "textview.scheduler",
            "reset with {} registered views",
            self.views.len()
        );
        for view in self.views.values_mut() {
            view.release_images(images, &mut self.pool);
        }
        let config = self.ctx.config().clone();
        *self = Self::with_tokenizer_config(config);
    }
}

#[cfg(test)]
mod tests;
