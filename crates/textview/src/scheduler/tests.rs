use std::collections::{HashMap, HashSet};

use super::*;
use crate::config::TextViewConfig;
use inline_image::{
    GraphicKind, ImageIdentifier, InlineImage, InlineImageProvider, Responder, Ticket,
};
use layout::{FontMetrics, MonospaceMetrics};
use markup::SyntaxErrorCode;
use style::FontStyle;

/// Atlas that optionally "rebuilds" whenever it has to add glyphs.
#[derive(Default)]
struct TestAtlas {
    metrics: MonospaceMetrics,
    glyphs: HashSet<(char, u32, u8)>,
    generation: u64,
    rebuild_on_growth: bool,
    request_calls: usize,
}

impl FontMetrics for TestAtlas {
    fn advance(&self, ch: char, font_size: f32, style: FontStyle) -> f32 {
        self.metrics.advance(ch, font_size, style)
    }

    fn ascent(&self, font_size: f32) -> f32 {
        self.metrics.ascent(font_size)
    }

    fn descent(&self, font_size: f32) -> f32 {
        self.metrics.descent(font_size)
    }
}

impl GlyphAtlas for TestAtlas {
    fn request_characters(&mut self, characters: &str, font_size: f32, style: FontStyle) {
        self.request_calls += 1;
        let mut grew = false;
        for ch in characters.chars() {
            grew |= self.glyphs.insert((ch, font_size.to_bits(), style.bits()));
        }
        if grew && self.rebuild_on_growth {
            self.generation += 1;
        }
    }

    fn generation(&self) -> u64 {
        self.generation
    }
}

/// Answers every request immediately with a 16x16 texture.
#[derive(Default)]
struct InstantProvider {
    requests: Vec<ImageIdentifier>,
    cancels: usize,
}

impl InlineImageProvider for InstantProvider {
    fn request(&mut self, identifier: &ImageIdentifier, responder: Responder) {
        self.requests.push(identifier.clone());
        responder.send(InlineImage {
            width: 16,
            height: 16,
            kind: GraphicKind::Texture,
            region: None,
        });
    }

    fn cancel(&mut self, _identifier: &ImageIdentifier, _ticket: Ticket) {
        self.cancels += 1;
    }
}

fn atlases(fonts: &[u32]) -> HashMap<FontId, TestAtlas> {
    fonts
        .iter()
        .map(|f| (FontId(*f), TestAtlas::default()))
        .collect()
}

fn view_on(font: u32, text: &str) -> TextView {
    let config = TextViewConfig {
        font: FontId(font),
        ..TextViewConfig::default()
    };
    TextView::with_text(config, text)
}

#[test]
fn tick_parses_and_lays_out_dirty_views_once() {
    let mut scheduler = TextViewScheduler::new();
    let mut atlases = atlases(&[0]);
    let mut images = ImageRepository::new(InstantProvider::default());
    let hello = scheduler.register(view_on(0, "Hello <b>World</b>!"));
    let kana = scheduler.register(view_on(0, "あいう"));
    assert_ne!(hello, kana);

    let report = scheduler.tick(&mut atlases, &mut images);
    assert_eq!(report.frame, 0);
    assert_eq!(report.parsed, 2);
    assert_eq!(report.laid_out, 2);
    assert_eq!(report.glyph_batches, 1);
    assert_eq!(scheduler.state(), SchedulerState::Idle);
    assert_eq!(scheduler.frame(), 1);

    let view = scheduler.view(hello).expect("registered view");
    assert_eq!(view.layout().lines.len(), 1);
    assert_eq!(view.layout().glyphs.len(), 12);

    let idle = scheduler.tick(&mut atlases, &mut images);
    assert_eq!((idle.parsed, idle.laid_out, idle.glyph_batches), (0, 0, 0));
}

#[test]
fn glyphs_are_requested_per_size_and_style() {
    let mut scheduler = TextViewScheduler::new();
    let mut atlases = atlases(&[0]);
    let mut images = ImageRepository::new(InstantProvider::default());
    scheduler.register(view_on(0, "ab<b>b</b>"));

    scheduler.tick(&mut atlases, &mut images);
    let atlas = &atlases[&FontId(0)];
    assert_eq!(atlas.request_calls, 2);
    assert_eq!(atlas.glyphs.len(), 3);
}

#[test]
fn atlas_rebuild_mid_pass_reruns_the_font_batch() {
    let mut scheduler = TextViewScheduler::new();
    let mut atlases = atlases(&[0]);
    if let Some(atlas) = atlases.get_mut(&FontId(0)) {
        atlas.rebuild_on_growth = true;
    }
    let mut images = ImageRepository::new(InstantProvider::default());
    scheduler.register(view_on(0, "Hello <b>World</b>!"));

    let report = scheduler.tick(&mut atlases, &mut images);
    assert_eq!(report.glyph_batches, 2, "got: {report:?}");
    assert_eq!(report.glyph_retries, 1);
    assert_eq!(report.laid_out, 1);
    // Two style groups, each requested on both runs.
    assert_eq!(atlases[&FontId(0)].request_calls, 4);
}

#[test]
fn rebuild_outside_a_tick_marks_that_fonts_views_dirty() {
    let mut scheduler = TextViewScheduler::new();
    let mut atlases = atlases(&[0, 1]);
    let mut images = ImageRepository::new(InstantProvider::default());
    let on_zero = scheduler.register(view_on(0, "abc"));
    let on_one = scheduler.register(view_on(1, "xyz"));
    scheduler.tick(&mut atlases, &mut images);

    scheduler.on_atlas_rebuilt(FontId(0));
    assert_eq!(scheduler.state(), SchedulerState::Idle);
    assert!(scheduler.view(on_zero).is_some_and(TextView::needs_layout));
    assert!(!scheduler.view(on_one).is_some_and(TextView::needs_layout));

    let report = scheduler.tick(&mut atlases, &mut images);
    assert_eq!(report.parsed, 0);
    assert_eq!(report.laid_out, 1);
}

#[test]
fn parse_failures_are_reported_per_view() {
    let mut scheduler = TextViewScheduler::new();
    let mut atlases = atlases(&[0]);
    let mut images = ImageRepository::new(InstantProvider::default());
    let broken = scheduler.register(view_on(0, "<b>oops"));
    let fine = scheduler.register(view_on(0, "fine"));

    let report = scheduler.tick(&mut atlases, &mut images);
    assert_eq!(report.parsed, 2);
    assert_eq!(report.parse_failures, 1);
    let view = scheduler.view(broken).expect("registered view");
    assert_eq!(
        view.last_error().map(|e| e.code),
        Some(SyntaxErrorCode::UnclosedElement)
    );
    assert!(view.layout().is_empty());
    assert_eq!(
        scheduler.view(fine).map(|v| v.layout().glyphs.len()),
        Some(4)
    );

    if let Some(view) = scheduler.view_mut(broken) {
        view.set_text("<b>fixed</b>");
    }
    let report = scheduler.tick(&mut atlases, &mut images);
    assert_eq!((report.parsed, report.parse_failures), (1, 0));
    assert!(scheduler.view(broken).is_some_and(|v| v.last_error().is_none()));
}

#[test]
fn views_share_image_requests_and_receive_them_in_the_same_tick() {
    let mut scheduler = TextViewScheduler::new();
    let mut atlases = atlases(&[0]);
    let mut images = ImageRepository::new(InstantProvider::default());
    let a = scheduler.register(view_on(0, "a<img src='icon.png'/>"));
    let b = scheduler.register(view_on(0, "b<img src='icon.png'/>"));

    let report = scheduler.tick(&mut atlases, &mut images);
    assert_eq!(images.provider().requests, vec![ImageIdentifier::new("icon.png")]);
    assert_eq!(report.image_updates, 2);
    for id in [a, b] {
        let placed = scheduler.view(id).map(|v| v.placer().placed_count());
        assert_eq!(placed, Some(1), "view {id:?}");
    }

    let removed = scheduler.unregister(a, &mut images).expect("view a");
    assert_eq!(removed.placer().placed_count(), 0);
    assert_eq!(scheduler.pool().free_count(GraphicKind::Texture), 1);
    assert_eq!(scheduler.len(), 1);
}

#[test]
fn views_without_an_atlas_stay_dirty() {
    let mut scheduler = TextViewScheduler::new();
    let mut atlases = atlases(&[0]);
    let mut images = ImageRepository::new(InstantProvider::default());
    let orphan = scheduler.register(view_on(9, "abc"));

    let report = scheduler.tick(&mut atlases, &mut images);
    assert_eq!(report.parsed, 1);
    assert_eq!(report.laid_out, 0);
    assert!(scheduler.view(orphan).is_some_and(TextView::needs_layout));
}

#[test]
fn reset_recreates_everything() {
    let mut scheduler = TextViewScheduler::new();
    let mut atlases = atlases(&[0]);
    let mut images = ImageRepository::new(InstantProvider::default());
    scheduler.register(view_on(0, "<img src='icon.png'/>"));
    scheduler.tick(&mut atlases, &mut images);
    assert_eq!(scheduler.parse_context().stats().parses, 1);

    scheduler.reset(&mut images);
    assert!(scheduler.is_empty());
    assert_eq!(scheduler.frame(), 0);
    assert_eq!(scheduler.state(), SchedulerState::Idle);
    assert_eq!(scheduler.parse_context().stats().parses, 0);
    assert_eq!(scheduler.pool().created(), 0);
    let id = scheduler.register(view_on(0, "again"));
    assert_eq!(id, ViewId(1));
}
