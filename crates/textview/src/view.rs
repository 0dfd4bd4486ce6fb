use std::collections::BTreeMap;

use core_types::FontId;
use inline_image::{Delivery, ImageError, ImagePlacer, ImagePool, ImageRepository, InlineImageProvider};
use layout::{
    FontMetrics, HeightMode, LayoutItem, LayoutOptions, MeasureInputs, PreferredSize, TextLayout,
    WidthMode, break_into_lines, collect_items,
};
use markup::{Node, ParseContext, SyntaxError};
use style::{BaseStyle, ScopeId, ScopeTree};

use crate::atlas::GlyphRequest;
use crate::config::TextViewConfig;

/// One block of markup text and everything derived from it.
///
/// Setters only flag the stage they affect: text and base style need a new
/// parse, layout options need a new layout, and the visibility counters
/// need neither (the preferred-size caches notice them on their own).
#[derive(Debug)]
pub struct TextView {
    config: TextViewConfig,
    text: String,
    tree: Option<Node>,
    scopes: ScopeTree,
    items: Vec<LayoutItem>,
    layout: TextLayout,
    preferred: PreferredSize,
    placer: ImagePlacer,
    needs_parse: bool,
    needs_layout: bool,
    visible_length: usize,
    visible_line_start: usize,
    last_error: Option<SyntaxError>,
}

impl Default for TextView {
    fn default() -> Self {
        Self::new(TextViewConfig::default())
    }
}

impl TextView {
    pub fn new(config: TextViewConfig) -> Self {
        let scopes = ScopeTree::new(config.style.clone());
        Self {
            config,
            text: String::new(),
            tree: None,
            scopes,
            items: Vec::new(),
            layout: TextLayout::default(),
            preferred: PreferredSize::new(),
            placer: ImagePlacer::new(),
            needs_parse: true,
            needs_layout: true,
            visible_length: usize::MAX,
            visible_line_start: 0,
            last_error: None,
        }
    }

    pub fn with_text(config: TextViewConfig, text: impl Into<String>) -> Self {
        let mut view = Self::new(config);
        view.text = text.into();
        view
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        let text = text.into();
        if text != self.text {
            self.text = text;
            self.needs_parse = true;
        }
    }

    pub fn config(&self) -> &TextViewConfig {
        &self.config
    }

    pub fn font(&self) -> FontId {
        self.config.font
    }

    pub fn set_font(&mut self, font: FontId) {
        if font != self.config.font {
            self.config.font = font;
            self.needs_layout = true;
        }
    }

    pub fn set_base_style(&mut self, style: BaseStyle) {
        if style != self.config.style {
            self.scopes = ScopeTree::new(style.clone());
            self.config.style = style;
            self.needs_parse = true;
        }
    }

    pub fn set_layout_options(&mut self, options: LayoutOptions) {
        if options != self.config.layout {
            self.config.layout = options;
            self.needs_layout = true;
        }
    }

    pub fn set_width(&mut self, width: f32) {
        let options = LayoutOptions {
            width,
            ..self.config.layout.clone()
        };
        self.set_layout_options(options);
    }

    pub fn set_line_height_fixed(&mut self, fixed: bool) {
        let options = LayoutOptions {
            line_height_fixed: fixed,
            ..self.config.layout.clone()
        };
        self.set_layout_options(options);
    }

    pub fn visible_length(&self) -> usize {
        self.visible_length
    }

    /// Reveal only the first `length` glyphs; `usize::MAX` reveals all.
    pub fn set_visible_length(&mut self, length: usize) {
        self.visible_length = length;
    }

    pub fn visible_line_start(&self) -> usize {
        self.visible_line_start
    }

    pub fn set_visible_line_start(&mut self, line: usize) {
        self.visible_line_start = line;
    }

    pub fn needs_parse(&self) -> bool {
        self.needs_parse
    }

    pub fn needs_layout(&self) -> bool {
        self.needs_parse || self.needs_layout
    }

    pub fn mark_layout_dirty(&mut self) {
        self.needs_layout = true;
    }

    /// Error from the latest parse, if it failed.
    pub fn last_error(&self) -> Option<&SyntaxError> {
        self.last_error.as_ref()
    }

    pub fn tree(&self) -> Option<&Node> {
        self.tree.as_ref()
    }

    pub fn layout(&self) -> &TextLayout {
        &self.layout
    }

    pub fn placer(&self) -> &ImagePlacer {
        &self.placer
    }

    pub fn set_image_error_hook(&mut self, hook: impl FnMut(&ImageError) + 'static) {
        self.placer.set_error_hook(hook);
    }

    /// Parse the current text. On failure the view shows nothing until the
    /// text changes.
    pub fn parse(&mut self, ctx: &mut ParseContext) -> Result<(), SyntaxError> {
        self.needs_parse = false;
        self.needs_layout = true;
        match markup::parse(ctx, &self.text) {
            Ok(tree) => {
                self.items = collect_items(&tree, &mut self.scopes);
                self.tree = Some(tree);
                self.last_error = None;
                Ok(())
            }
            Err(err) => {
                self.tree = None;
                self.items.clear();
                self.scopes.clear();
                self.last_error = Some(err.clone());
                Err(err)
            }
        }
    }

    /// Distinct characters per font size and style, ruby annotations
    /// included.
    pub fn glyph_requests(&self) -> Vec<GlyphRequest> {
        let mut groups: BTreeMap<(u32, u8), GlyphRequest> = BTreeMap::new();
        let mut add = |ch: char, scope: ScopeId| {
            let resolved = self.scopes.resolve(scope);
            let request = groups
                .entry((resolved.font_size.to_bits(), resolved.font_style.bits()))
                .or_insert_with(|| GlyphRequest {
                    font_size: resolved.font_size,
                    font_style: resolved.font_style,
                    characters: String::new(),
                });
            if !request.characters.contains(ch) {
                request.characters.push(ch);
            }
        };
        for item in &self.items {
            match item {
                LayoutItem::Glyph { ch, scope } => add(*ch, *scope),
                LayoutItem::Ruby {
                    base,
                    annotation,
                    ruby_scope,
                    ..
                } => {
                    for (ch, scope) in base {
                        add(*ch, *scope);
                    }
                    for ch in annotation.chars() {
                        add(ch, *ruby_scope);
                    }
                }
                LayoutItem::Image { .. } | LayoutItem::Break => {}
            }
        }
        groups.into_values().collect()
    }

    /// Break the parsed items into lines and reserve image slots.
    pub fn relayout(&mut self, metrics: &dyn FontMetrics) {
        self.layout = break_into_lines(&self.items, &self.scopes, metrics, &self.config.layout);
        self.preferred.invalidate();
        self.placer.reserve(&self.layout.images);
        self.needs_layout = false;
        log::trace!(
            target: "textview.view",
            "laid out {} glyphs on {} lines",
            self.layout.glyphs.len(),
            self.layout.lines.len()
        );
    }

    /// Parse and lay out whatever is stale, without a scheduler.
    pub fn refresh(
        &mut self,
        ctx: &mut ParseContext,
        metrics: &dyn FontMetrics,
    ) -> Result<(), SyntaxError> {
        let parsed = if self.needs_parse {
            self.parse(ctx)
        } else {
            Ok(())
        };
        if self.needs_layout {
            self.relayout(metrics);
        }
        parsed
    }

    pub fn place_images<P: InlineImageProvider>(
        &mut self,
        repo: &mut ImageRepository<P>,
        pool: &mut ImagePool,
    ) {
        self.placer.place(repo, pool);
    }

    pub fn receive_images(&mut self, deliveries: &[Delivery], pool: &mut ImagePool) -> bool {
        self.placer.receive(deliveries, pool)
    }

    pub fn release_images<P: InlineImageProvider>(
        &mut self,
        repo: &mut ImageRepository<P>,
        pool: &mut ImagePool,
    ) {
        self.placer.teardown(repo, pool);
    }

    pub fn measure_inputs(&self) -> MeasureInputs {
        MeasureInputs {
            line_height_fixed: self.config.layout.line_height_fixed,
            visible_length: self.visible_length,
            visible_line_start: self.visible_line_start,
        }
    }

    /// Preferred width of the latest layout, cached per mode.
    pub fn preferred_width(&mut self, mode: WidthMode) -> f32 {
        let inputs = self.measure_inputs();
        self.preferred.width(&self.layout, mode, &inputs)
    }

    pub fn preferred_height(&mut self, mode: HeightMode) -> f32 {
        let inputs = self.measure_inputs();
        self.preferred.height(&self.layout, mode, &inputs)
    }

    pub fn preferred_recompute_count(&self) -> u64 {
        self.preferred.recompute_count()
    }
}
