use criterion::{Criterion, black_box, criterion_group, criterion_main};
use layout::{
    HeightMode, LayoutOptions, MeasureInputs, MonospaceMetrics, PreferredSize, break_into_lines,
    collect_items,
};
use markup::{ParseContext, parse};
use style::{BaseStyle, ScopeTree};

const PARAGRAPHS: usize = 2_000;

fn make_text(paragraphs: usize) -> String {
    let paragraph = "吾輩は<b>猫</b>である。名前はまだ無い。<color='#336699'>どこで生れたか</color>\
                     とんと見当がつかぬ。 The quick brown fox <ruby rt='じゃんぷ'>跳</ruby> over.\n";
    paragraph.repeat(paragraphs)
}

fn bench_break_into_lines(c: &mut Criterion) {
    let text = make_text(PARAGRAPHS);
    let mut ctx = ParseContext::new();
    let Ok(tree) = parse(&mut ctx, &text) else {
        return;
    };
    let mut scopes = ScopeTree::new(BaseStyle::default());
    let items = collect_items(&tree, &mut scopes);
    let metrics = MonospaceMetrics::default();
    let options = LayoutOptions {
        width: 480.0,
        ..LayoutOptions::default()
    };
    c.bench_function("bench_break_into_lines", |b| {
        b.iter(|| {
            let layout = break_into_lines(black_box(&items), &scopes, &metrics, &options);
            black_box(layout.lines.len());
        });
    });
}

fn bench_preferred_height_cold(c: &mut Criterion) {
    let text = make_text(PARAGRAPHS);
    let mut ctx = ParseContext::new();
    let Ok(tree) = parse(&mut ctx, &text) else {
        return;
    };
    let mut scopes = ScopeTree::new(BaseStyle::default());
    let items = collect_items(&tree, &mut scopes);
    let options = LayoutOptions {
        width: 480.0,
        ..LayoutOptions::default()
    };
    let layout = break_into_lines(&items, &scopes, &MonospaceMetrics::default(), &options);
    let inputs = MeasureInputs::default();
    let mut size = PreferredSize::new();
    c.bench_function("bench_preferred_height_cold", |b| {
        b.iter(|| {
            size.invalidate();
            black_box(size.height(&layout, HeightMode::AllLogicalLine, &inputs));
        });
    });
}

criterion_group!(benches, bench_break_into_lines, bench_preferred_height_cold);
criterion_main!(benches);
