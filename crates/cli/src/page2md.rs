//! page2md - Render tables found in an extracted page dump as markdown.
//!
//! Consumes the JSON page-dump format produced by a text/graphics
//! extractor (ordered characters with bounding boxes, plus optional
//! vector-path rectangles) and prints one markdown grid per detected
//! table.

use clap::{ArgAction, Parser, ValueEnum};
use pagegrid_core::geometry::BBox;
use pagegrid_core::page::PageSource;
use pagegrid_core::table::{Char, Strategy, TableFinder, TableSettings, to_markdown};
use pagegrid_core::{LayoutError, Result};
use serde::Deserialize;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

/// Edge-source strategy for one table axis.
#[derive(Debug, Clone, Copy, ValueEnum, Default)]
enum StrategyArg {
    /// Use vector-path rectangles when the dump carries them
    #[default]
    Lines,
    /// Infer gridlines from word alignment
    Text,
}

impl From<StrategyArg> for Strategy {
    fn from(value: StrategyArg) -> Self {
        match value {
            StrategyArg::Lines => Strategy::Lines,
            StrategyArg::Text => Strategy::Text,
        }
    }
}

/// Render tables found in an extracted page dump as markdown.
#[derive(Parser, Debug)]
#[command(name = "page2md")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to a JSON page dump
    file: PathBuf,

    /// Use debug logging level
    #[arg(short = 'd', long, action = ArgAction::SetTrue)]
    debug: bool,

    // === Table-finder options ===
    /// Edge source for vertical gridlines
    #[arg(long = "vertical-strategy", value_enum, default_value = "lines")]
    vertical_strategy: StrategyArg,

    /// Edge source for horizontal gridlines
    #[arg(long = "horizontal-strategy", value_enum, default_value = "lines")]
    horizontal_strategy: StrategyArg,

    /// Snap tolerance for near-collinear edges
    #[arg(long = "snap-tolerance", default_value = "3.0")]
    snap_tolerance: f64,

    /// Join tolerance for near-adjacent collinear edges
    #[arg(long = "join-tolerance", default_value = "3.0")]
    join_tolerance: f64,

    /// Minimum edge length kept after cleanup
    #[arg(long = "edge-min-length", default_value = "3.0")]
    edge_min_length: f64,

    /// Minimum words supporting a vertical text edge
    #[arg(long = "min-words-vertical", default_value = "3")]
    min_words_vertical: usize,

    /// Minimum words supporting a horizontal text edge
    #[arg(long = "min-words-horizontal", default_value = "1")]
    min_words_horizontal: usize,

    /// A comma-separated list of page numbers to process (1-indexed)
    #[arg(short = 'p', long = "pages")]
    pages: Option<String>,

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
    chars: Vec<CharDump>,
    #[serde(default)]
    paths: Vec<[f64; 4]>,
}

#[derive(Debug, Deserialize)]
struct CharDump {
    text: String,
    x0: f64,
    top: f64,
    x1: f64,
    bottom: f64,
    size: f64,
    #[serde(default = "default_upright")]
    upright: bool,
    #[serde(default)]
    font: String,
}

fn default_upright() -> bool {
    true
}

struct DumpSource {
    dump: Dump,
}

impl DumpSource {
    fn page(&self, page: usize) -> Result<&PageDump> {
        self.dump
            .pages
            .get(page)
            .ok_or(LayoutError::InvalidPage(page))
    }
}

impl PageSource for DumpSource {
    fn page_count(&self) -> usize {
        self.dump.pages.len()
    }

    fn page_bbox(&self, page: usize) -> Result<BBox> {
        let p = self.page(page)?;
        Ok(BBox::new(0.0, 0.0, p.width, p.height))
    }

    fn page_chars(&self, page: usize) -> Result<Vec<Char>> {
        let p = self.page(page)?;
        Ok(p.chars
            .iter()
            .map(|c| Char {
                text: c.text.clone(),
                bbox: BBox::new(c.x0, c.top, c.x1, c.bottom),
                doctop: c.top,
                fontname: c.font.clone(),
                size: c.size,
                upright: c.upright,
                page,
            })
            .collect())
    }

    fn vector_paths(&self, page: usize) -> Result<Vec<BBox>> {
        let p = self.page(page)?;
        Ok(p.paths
            .iter()
            .map(|r| BBox::new(r[0], r[1], r[2], r[3]))
            .collect())
    }
}

fn parse_pages(spec: &str, page_count: usize) -> std::result::Result<Vec<usize>, String> {
    let mut pages = Vec::new();
    for part in spec.split(',') {
        let number: usize = part
            .trim()
            .parse()
            .map_err(|_| format!("invalid page number: {part}"))?;
        if number == 0 || number > page_count {
            return Err(format!("page {number} out of range (1-{page_count})"));
        }
        pages.push(number - 1);
    }
    Ok(pages)
}

fn settings_from_args(args: &Args) -> TableSettings {
    TableSettings {
        vertical_strategy: args.vertical_strategy.into(),
        horizontal_strategy: args.horizontal_strategy.into(),
        snap_tolerance: args.snap_tolerance,
        join_tolerance: args.join_tolerance,
        edge_min_length: args.edge_min_length,
        min_words_vertical: args.min_words_vertical,
        min_words_horizontal: args.min_words_horizontal,
        ..TableSettings::default()
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
    let source = DumpSource { dump };

    let selected = match &args.pages {
        Some(spec) => Some(parse_pages(spec, source.page_count())?),
        None => None,
    };

    let settings = settings_from_args(&args);

    let mut out: Box<dyn Write> = if args.outfile == "-" {
        Box::new(io::stdout())
    } else {
        Box::new(BufWriter::new(File::create(&args.outfile)?))
    };

    for page in 0..source.page_count() {
        if let Some(selected) = &selected {
            if !selected.contains(&page) {
                continue;
            }
        }
        let bbox = source.page_bbox(page)?;
        let chars = source.page_chars(page)?;
        let paths = source.vector_paths(page)?;
        let finder = TableFinder::new(bbox, chars, &paths, &settings);
        let tables = match finder.find_tables() {
            Ok(tables) => tables,
            Err(err @ LayoutError::BufferLimit { .. }) => {
                eprintln!("page {}: {err}; skipped", page + 1);
                continue;
            }
            Err(err) => return Err(err.into()),
        };
        let provider = finder.text_provider();
        for table in &tables {
            writeln!(out, "<!-- page {} -->", page + 1)?;
            out.write_all(to_markdown(table, &provider).as_bytes())?;
            writeln!(out)?;
        }
    }
    out.flush()?;
    Ok(())
}
