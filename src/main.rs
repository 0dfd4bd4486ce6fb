use std::error::Error;
use std::io::Read;
use std::path::{Path, PathBuf};

use clap::{Parser, ValueEnum};
use inline_image::{FileImageProvider, ImagePool, ImageRepository};
use layout::{Alignment, HeightMode, LayoutOptions, LineBreakRule, MonospaceMetrics, WidthMode};
use markup::ParseContext;
use textview::{TextView, TextViewConfig};

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

#[derive(Clone, Copy, Debug, ValueEnum)]
enum AlignArg {
    Left,
    Center,
    Right,
    Justify,
}

impl From<AlignArg> for Alignment {
    fn from(arg: AlignArg) -> Self {
        match arg {
            AlignArg::Left => Alignment::Left,
            AlignArg::Center => Alignment::Center,
            AlignArg::Right => Alignment::Right,
            AlignArg::Justify => Alignment::Justify,
        }
    }
}

/// Lay out a markup file with monospace metrics and print the lines.
#[derive(Debug, Parser)]
#[command(name = "textview-dump", version)]
struct Args {
    /// Markup file to read; `-` reads stdin.
    input: PathBuf,

    /// Content width in pixels. Unbounded when omitted.
    #[arg(long)]
    width: Option<f32>,

    /// Base font size in pixels.
    #[arg(long, default_value_t = 20.0)]
    font_size: f32,

    /// Line break rule: japanese, simplified-chinese, traditional-chinese or korean.
    #[arg(long, default_value = "japanese", value_parser = parse_rule)]
    rule: LineBreakRule,

    #[arg(long, value_enum, default_value_t = AlignArg::Left)]
    align: AlignArg,

    /// Extra space between lines.
    #[arg(long, default_value_t = 0.0)]
    line_gap: f32,

    /// Reveal only this many glyphs when reporting visible sizes.
    #[arg(long)]
    visible_length: Option<usize>,

    /// Resolve inline images against this directory.
    #[arg(long)]
    images: Option<PathBuf>,
}

fn parse_rule(value: &str) -> Result<LineBreakRule, String> {
    LineBreakRule::parse(value).ok_or_else(|| format!("unknown line break rule {value:?}"))
}

fn read_input(path: &Path) -> std::io::Result<String> {
    if path.as_os_str() == "-" {
        let mut text = String::new();
        std::io::stdin().read_to_string(&mut text)?;
        return Ok(text);
    }
    std::fs::read_to_string(path)
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();
    let args = Args::parse();
    let text = read_input(&args.input)?;

    let mut config = TextViewConfig {
        layout: LayoutOptions {
            width: args.width.unwrap_or(f32::INFINITY),
            break_rule: args.rule,
            alignment: args.align.into(),
            line_gap: args.line_gap,
            ..LayoutOptions::default()
        },
        ..TextViewConfig::default()
    };
    config.style.font_size = args.font_size;

    let mut view = TextView::with_text(config, text);
    if let Some(length) = args.visible_length {
        view.set_visible_length(length);
    }
    let mut ctx = ParseContext::new();
    view.refresh(&mut ctx, &MonospaceMetrics::default())?;
    log::debug!(target: "textview.cli", "parse stats: {:?}", ctx.stats());

    let layout = view.layout();
    for (index, line) in layout.lines.iter().enumerate() {
        let text: String = layout.glyphs[line.glyph_range.clone()]
            .iter()
            .map(|g| g.ch)
            .collect();
        let marker = if line.is_auto_line_break { '~' } else { ' ' };
        println!(
            "{index:>3}{marker} y={:<7.1} x={:<6.1} w={:<7.1} {text:?}",
            line.y, line.x_offset, line.width
        );
    }
    for image in &layout.images {
        println!(
            "img {} at ({:.1}, {:.1}) {:.1}x{:.1}",
            image.identifier(),
            image.x,
            image.y,
            image.width,
            image.height
        );
    }

    if let Some(root) = args.images {
        let mut repo = ImageRepository::new(FileImageProvider::new(root));
        let mut pool = ImagePool::new();
        view.set_image_error_hook(|err| eprintln!("warning: {err}"));
        view.place_images(&mut repo, &mut pool);
        let deliveries = repo.pump();
        view.receive_images(&deliveries, &mut pool);
        println!("images placed: {}", view.placer().placed_count());
    }

    println!(
        "preferred width: first={:.1} all={:.1} logical={:.1} visible={:.1}",
        view.preferred_width(WidthMode::FirstLine),
        view.preferred_width(WidthMode::AllLine),
        view.preferred_width(WidthMode::AllLogicalLine),
        view.preferred_width(WidthMode::Visibled),
    );
    println!(
        "preferred height: all={:.1} logical={:.1} visible={:.1}",
        view.preferred_height(HeightMode::AllLine),
        view.preferred_height(HeightMode::AllLogicalLine),
        view.preferred_height(HeightMode::Visibled),
    );
    Ok(())
}
