use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, bail};
use clap::{Parser, ValueEnum};
use fontab_engine::{FontContainer, FontTable, TableRow, TtfSource, generate_fixed, generate_grouped, load_glcd, render_string};

const DEFAULT_DEMO_TEXT: &str = "World!q01";
const DEFAULT_CHARS: &str = "0x20-0x7E";

#[derive(Parser)]
#[command(about = "Generate embedded display font tables from TTF or GLCD sources")]
pub struct Cli {
    #[arg(help = "Font file to convert (.ttf/.otf, or a GLCD C header)", required = true)]
    input: PathBuf,

    #[arg(help = "Source kind; inferred from the file extension when omitted.", long, value_enum)]
    source: Option<Source>,

    #[arg(help = "Font size in points (not pixels).", short, long, default_value_t = 8)]
    size: u32,

    #[arg(help = "Table format to emit.", short, long, value_enum, default_value = "new")]
    format: Format,

    #[arg(help = "Pad every glyph to the shared font width.", long, default_value_t = false)]
    fixed_width: bool,

    #[arg(help = "Pad every glyph to the shared font height.", long, default_value_t = false)]
    fixed_height: bool,

    #[arg(help = "Cut descenders until the font is at most this many pixels tall.", long, value_name = "PIXELS", default_value_t = 0)]
    limit_bottom: usize,

    #[arg(
        help = "Code point ranges to rasterize (TTF only), e.g. 0x20-0x7E,0x410-0x44F. Each range becomes one glyph group.",
        long,
        default_value = DEFAULT_CHARS
    )]
    chars: String,

    #[arg(
        help = "Render a demo text above the table.",
        short,
        long,
        value_name = "TEXT",
        num_args = 0..=1,
        require_equals = true,
        default_missing_value = DEFAULT_DEMO_TEXT
    )]
    demo: Option<String>,

    #[arg(help = "Render the demo text and skip the table.", long, default_value_t = false)]
    demo_only: bool,

    #[arg(help = "Output file (stdout when omitted).", short, long)]
    output: Option<PathBuf>,
}

#[derive(ValueEnum, Clone, Copy, PartialEq, Eq, Debug)]
enum Source {
    Ttf,
    Glcd,
}

#[derive(ValueEnum, Clone, Copy, PartialEq, Eq, Debug)]
enum Format {
    /// Legacy fixed-cell layout (library versions 1.7.6 and below)
    Old,
    /// Grouped variable-size layout (1.7.8 and above)
    New,
}

fn main() -> anyhow::Result<()> {
    let args = Cli::parse();
    let _logger = flexi_logger::Logger::try_with_env_or_str("info")?.start()?;

    let source = args.source.unwrap_or_else(|| detect_source(&args.input));
    log::info!("loading {} as {source:?} source", args.input.display());

    let mut font = match source {
        Source::Glcd => load_glcd(&args.input, args.size)?,
        Source::Ttf => {
            let ttf = TtfSource::load(&args.input, args.size)?;
            let mut font = FontContainer::new(TtfSource::font_name(&args.input), args.size);
            for (first, last) in parse_ranges(&args.chars)? {
                ttf.add_range(&mut font, first, last)?;
            }
            font
        }
    };

    if args.fixed_width {
        font.expand_h();
    }
    if args.fixed_height {
        font.expand_v();
    }
    if args.limit_bottom > 0 {
        font.deflate_bottom(args.limit_bottom);
    }

    let mut out: Box<dyn Write> = match &args.output {
        Some(path) => Box::new(BufWriter::new(
            File::create(path).with_context(|| format!("cannot create {}", path.display()))?,
        )),
        None => Box::new(io::stdout().lock()),
    };

    let demo = args
        .demo
        .clone()
        .or_else(|| args.demo_only.then(|| DEFAULT_DEMO_TEXT.to_string()));

    match args.format {
        Format::Old => {
            // the legacy layout needs full cells; expand before the demo so
            // the preview shows what actually gets encoded
            font.expand();
            if let Some(text) = &demo {
                write_demo(&mut out, &font, text)?;
            }
            if !args.demo_only {
                let plain = generate_fixed(&mut font, false)?;
                let unicode = generate_fixed(&mut font, true)?;
                write_fixed_table(&mut out, &plain, &unicode)?;
            }
        }
        Format::New => {
            if let Some(text) = &demo {
                write_demo(&mut out, &font, text)?;
            }
            if !args.demo_only {
                let table = generate_grouped(&mut font)?;
                write_table(&mut out, &table)?;
            }
        }
    }
    out.flush()?;
    Ok(())
}

fn detect_source(path: &Path) -> Source {
    match path.extension().map(|e| e.to_string_lossy().to_ascii_lowercase()).as_deref() {
        Some("h" | "c") => Source::Glcd,
        _ => Source::Ttf,
    }
}

/// Parse `0x20-0x7E,0x410-0x44F` style range lists. Codes are hex with a
/// `0x` prefix or plain decimal; both ends are inclusive.
fn parse_ranges(text: &str) -> anyhow::Result<Vec<(u32, u32)>> {
    let mut ranges = Vec::new();
    for part in text.split(',') {
        let part = part.trim();
        let Some((first, last)) = part.split_once('-') else {
            bail!("invalid character range {part:?}, expected FIRST-LAST");
        };
        let first = parse_code(first.trim())?;
        let last = parse_code(last.trim())?;
        if first > last {
            bail!("invalid character range {part:?}, first exceeds last");
        }
        ranges.push((first, last));
    }
    Ok(ranges)
}

fn parse_code(text: &str) -> anyhow::Result<u32> {
    let parsed = match text.strip_prefix("0x").or_else(|| text.strip_prefix("0X")) {
        Some(hex) => u32::from_str_radix(hex, 16),
        None => text.parse(),
    };
    parsed.with_context(|| format!("invalid code point {text:?}"))
}

fn write_demo(out: &mut dyn Write, font: &FontContainer, text: &str) -> io::Result<()> {
    for line in render_string(font, text).lines() {
        writeln!(out, "// {line}")?;
    }
    writeln!(out)
}

fn write_row(out: &mut dyn Write, row: &TableRow) -> io::Result<()> {
    write!(out, "    ")?;
    for byte in &row.bytes {
        write!(out, "0x{byte:02X}, ")?;
    }
    match &row.comment {
        Some(comment) => writeln!(out, "// {comment}"),
        None => writeln!(out),
    }
}

/// Emit one table as a C byte array.
fn write_table(out: &mut dyn Write, table: &FontTable) -> io::Result<()> {
    writeln!(out, "extern const uint8_t {}[] PROGMEM;", table.name)?;
    writeln!(out, "const uint8_t {}[] PROGMEM =", table.name)?;
    writeln!(out, "{{")?;
    for row in &table.rows {
        write_row(out, row)?;
    }
    writeln!(out, "}};")
}

/// Emit the legacy layout with both header variants: the unicode header
/// and terminator sit behind `CONFIG_SSD1306_UNICODE_ENABLE`, the glyph
/// data is shared by both branches.
fn write_fixed_table(out: &mut dyn Write, plain: &FontTable, unicode: &FontTable) -> io::Result<()> {
    writeln!(out, "extern const uint8_t {}[] PROGMEM;", plain.name)?;
    writeln!(out, "const uint8_t {}[] PROGMEM =", plain.name)?;
    writeln!(out, "{{")?;
    writeln!(out, "#ifdef CONFIG_SSD1306_UNICODE_ENABLE")?;
    write_row(out, &unicode.rows[0])?;
    write_row(out, &unicode.rows[1])?;
    writeln!(out, "#else")?;
    write_row(out, &plain.rows[0])?;
    writeln!(out, "#endif")?;
    for row in &plain.rows[1..] {
        write_row(out, row)?;
    }
    writeln!(out, "#ifdef CONFIG_SSD1306_UNICODE_ENABLE")?;
    write_row(out, &unicode.rows[unicode.rows.len() - 1])?;
    writeln!(out, "#endif")?;
    writeln!(out, "}};")
}
