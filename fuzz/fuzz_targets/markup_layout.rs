#![no_main]

use layout::{LayoutOptions, MonospaceMetrics, break_into_lines, collect_items};
use libfuzzer_sys::fuzz_target;
use markup::{ParseContext, parse};
use style::{BaseStyle, ScopeTree};

fuzz_target!(|input: (u16, &str)| {
    let (width, text) = input;
    let mut ctx = ParseContext::new();
    let Ok(tree) = parse(&mut ctx, text) else {
        return;
    };
    let mut scopes = ScopeTree::new(BaseStyle::default());
    let items = collect_items(&tree, &mut scopes);
    let options = LayoutOptions {
        width: f32::from(width.max(1)),
        ..LayoutOptions::default()
    };
    let layout = break_into_lines(&items, &scopes, &MonospaceMetrics::default(), &options);
    let mut next = 0;
    for line in &layout.lines {
        assert_eq!(line.glyph_range.start, next);
        next = line.glyph_range.end;
    }
    assert_eq!(next, layout.glyphs.len());
});
