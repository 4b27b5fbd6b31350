//! dumplayout - Dump column bands and table regions from a page dump.
//!
//! Consumes the JSON page-dump format (text blocks with bounding boxes and
//! font sizes) and prints the detected layout structure as JSON: column
//! bands, merged block rectangles and clustered table regions.

use clap::{ArgAction, Parser};
use pagegrid_core::columns::{BlockKind, LayoutSettings, PageBlock, PageLayout, analyze_page};
use pagegrid_core::geometry::BBox;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

/// Dump column bands and table regions from a page dump.
#[derive(Parser, Debug)]
#[command(name = "dumplayout")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to a JSON page dump
    file: PathBuf,

    /// Use debug logging level
    #[arg(short = 'd', long, action = ArgAction::SetTrue)]
    debug: bool,

    // === Layout options ===
    /// Band at the top of each page excluded from analysis
    #[arg(long = "header-margin", default_value = "50.0")]
    header_margin: f64,

    /// Band at the bottom of each page excluded from analysis
    #[arg(long = "footer-margin", default_value = "50.0")]
    footer_margin: f64,

    // === Output options ===
    /// Path to file where output is written, or "-" for stdout
    #[arg(short = 'o', long, default_value = "-")]
    outfile: String,
}

#[derive(Debug, Deserialize)]
struct Dump {
    pages: Vec<PageDump>,
}

#[derive(Debug, Deserialize)]
struct PageDump {
    width: f64,
    height: f64,
    #[serde(default)]
    blocks: Vec<BlockDump>,
}

#[derive(Debug, Deserialize)]
struct BlockDump {
    x0: f64,
    top: f64,
    x1: f64,
    bottom: f64,
    #[serde(default)]
    text: String,
    #[serde(default = "default_font_size")]
    font_size: f64,
}

fn default_font_size() -> f64 {
    12.0
}

#[derive(Debug, Serialize)]
struct LayoutOut {
    page: usize,
    columns: Vec<RectOut>,
    blocks: Vec<BlockOut>,
    regions: Vec<RectOut>,
}

#[derive(Debug, Serialize)]
struct RectOut {
    x0: f64,
    top: f64,
    x1: f64,
    bottom: f64,
}

#[derive(Debug, Serialize)]
struct BlockOut {
    #[serde(flatten)]
    rect: RectOut,
    kind: &'static str,
    column: Option<usize>,
}

fn rect_out(b: &BBox) -> RectOut {
    RectOut {
        x0: b.x0,
        top: b.top,
        x1: b.x1,
        bottom: b.bottom,
    }
}

fn layout_out(page: usize, layout: &PageLayout) -> LayoutOut {
    LayoutOut {
        page: page + 1,
        columns: layout.column_boxes().iter().map(rect_out).collect(),
        blocks: layout
            .blocks
            .iter()
            .map(|b| BlockOut {
                rect: rect_out(&b.bbox),
                kind: match b.kind {
                    BlockKind::Text => "text",
                    BlockKind::Image => "image",
                    BlockKind::TableCell => "table_cell",
                },
                column: b.column_id,
            })
            .collect(),
        regions: layout.regions.iter().map(|r| rect_out(&r.bbox)).collect(),
    }
}

fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    if args.debug {
        tracing_subscriber::fmt()
            .with_max_level(tracing::Level::DEBUG)
            .with_writer(io::stderr)
            .init();
    }

    let file = File::open(&args.file)?;
    let dump: Dump = serde_json::from_reader(io::BufReader::new(file))?;

    let settings = LayoutSettings {
        header_margin: args.header_margin,
        footer_margin: args.footer_margin,
    };

    let mut out: Box<dyn Write> = if args.outfile == "-" {
        Box::new(io::stdout())
    } else {
        Box::new(BufWriter::new(File::create(&args.outfile)?))
    };

    let mut results = Vec::with_capacity(dump.pages.len());
    for (page, page_dump) in dump.pages.iter().enumerate() {
        let blocks: Vec<PageBlock> = page_dump
            .blocks
            .iter()
            .map(|b| {
                PageBlock::new(
                    BBox::new(b.x0, b.top, b.x1, b.bottom),
                    b.text.clone(),
                    b.font_size,
                )
            })
            .collect();
        let layout = analyze_page(blocks, page_dump.width, page_dump.height, &settings);
        results.push(layout_out(page, &layout));
    }

    serde_json::to_writer_pretty(&mut out, &results)?;
    writeln!(out)?;
    out.flush()?;
    Ok(())
}
