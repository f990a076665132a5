//! CLI binary for edgequake-mdblocks.
//!
//! A thin shim over the library crate that maps CLI flags
//! to `ConversionConfig` and moves text between files and stdio.

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use edgequake_mdblocks::convert::write_atomic;
use edgequake_mdblocks::{convert_str, ConversionConfig, Direction, InlineMode, ListNumbering};
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use tracing::debug;
use tracing_subscriber::EnvFilter;

const AFTER_HELP: &str = r#"EXAMPLES:
  # Markdown file → block JSON on stdout
  mdblocks to-blocks notes.md --pretty

  # Pipe block JSON fetched from the API back to Markdown
  curl ... | jq '.results' | mdblocks to-markdown -

  # Searchable text of a page
  mdblocks plain-text page.json

  # Keep original list numbering and legacy inline parsing
  mdblocks --numbering sequential --inline-mode toggle to-markdown page.json -o page.md

INLINE MODES:
  paired   Markers pair up like Markdown renderers expect; a stray `*` or
           unclosed `**` stays literal. Code spans are opaque. (default)
  toggle   Every marker flips its style on or off. Unclosed markers style
           the rest of the line.

ENVIRONMENT VARIABLES:
  MDBLOCKS_INLINE_MODE    paired | toggle
  MDBLOCKS_NUMBERING      one | sequential
  MDBLOCKS_INDENT_WIDTH   spaces per list level (1–8)
  MDBLOCKS_NO_NORMALIZE   true to skip input cleanup
  MDBLOCKS_ESCAPE_MARKERS true for backslash escapes in both directions
  MDBLOCKS_VERBOSE        true for debug logs
  MDBLOCKS_QUIET          true to log errors only
  RUST_LOG                tracing filter, overrides -v / -q
"#;

/// Convert Markdown to block JSON and back.
#[derive(Parser, Debug)]
#[command(
    name = "mdblocks",
    version,
    about = "Convert Markdown to and from block-structured rich-text documents",
    arg_required_else_help = true,
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    #[command(flatten)]
    options: GlobalOptions,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Parse Markdown into a JSON array of blocks.
    ToBlocks {
        #[command(flatten)]
        io: IoArgs,

        /// Indent the JSON output.
        #[arg(long)]
        pretty: bool,
    },
    /// Render a JSON array of blocks as Markdown.
    ToMarkdown {
        #[command(flatten)]
        io: IoArgs,
    },
    /// Extract plain text from a JSON array of blocks.
    PlainText {
        #[command(flatten)]
        io: IoArgs,
    },
}

#[derive(Args, Debug)]
struct IoArgs {
    /// Input file, or `-` for stdin.
    input: PathBuf,

    /// Write output to this file instead of stdout.
    #[arg(short, long)]
    output: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct GlobalOptions {
    /// Inline marker matching.
    #[arg(long, global = true, env = "MDBLOCKS_INLINE_MODE", value_enum, default_value = "paired")]
    inline_mode: InlineModeArg,

    /// Ordinals for numbered list items.
    #[arg(long, global = true, env = "MDBLOCKS_NUMBERING", value_enum, default_value = "one")]
    numbering: NumberingArg,

    /// Spaces per list indent level (1–8).
    #[arg(long, global = true, env = "MDBLOCKS_INDENT_WIDTH", default_value_t = 2,
          value_parser = clap::value_parser!(u8).range(1..=8))]
    indent_width: u8,

    /// Parse Markdown as-is, without CRLF / invisible-character cleanup.
    #[arg(long, global = true, env = "MDBLOCKS_NO_NORMALIZE")]
    no_normalize: bool,

    /// Honour `\*`-style escapes when parsing and escape literal markers when rendering.
    #[arg(long, global = true, env = "MDBLOCKS_ESCAPE_MARKERS")]
    escape_markers: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, global = true, env = "MDBLOCKS_VERBOSE")]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long, global = true, env = "MDBLOCKS_QUIET")]
    quiet: bool,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum InlineModeArg {
    Paired,
    Toggle,
}

impl From<InlineModeArg> for InlineMode {
    fn from(v: InlineModeArg) -> Self {
        match v {
            InlineModeArg::Paired => InlineMode::Paired,
            InlineModeArg::Toggle => InlineMode::Toggle,
        }
    }
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum NumberingArg {
    One,
    Sequential,
}

impl From<NumberingArg> for ListNumbering {
    fn from(v: NumberingArg) -> Self {
        match v {
            NumberingArg::One => ListNumbering::AlwaysOne,
            NumberingArg::Sequential => ListNumbering::Sequential,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    let filter = if cli.options.quiet {
        "error"
    } else if cli.options.verbose {
        "debug"
    } else {
        "warn"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    let config = build_config(&cli.options)?;
    debug!(?config, "resolved configuration");

    let (io_args, direction) = match &cli.command {
        Command::ToBlocks { io, pretty } => (io, Direction::ToBlocks { pretty: *pretty }),
        Command::ToMarkdown { io } => (io, Direction::ToMarkdown),
        Command::PlainText { io } => (io, Direction::PlainText),
    };

    let input = read_input(&io_args.input)?;
    let output = convert_str(&input, direction, &config).context("Conversion failed")?;

    match &io_args.output {
        Some(path) => {
            write_atomic(path, &with_final_newline(output))
                .with_context(|| format!("Failed to write {}", path.display()))?;
            if !cli.options.quiet {
                eprintln!("✔ wrote {}", path.display());
            }
        }
        None => {
            let stdout = io::stdout();
            let mut handle = stdout.lock();
            handle
                .write_all(with_final_newline(output).as_bytes())
                .context("Failed to write to stdout")?;
        }
    }

    Ok(())
}

/// Map CLI args to `ConversionConfig`.
fn build_config(options: &GlobalOptions) -> Result<ConversionConfig> {
    ConversionConfig::builder()
        .inline_mode(options.inline_mode.into())
        .list_numbering(options.numbering.into())
        .indent_width(options.indent_width as usize)
        .normalize_input(!options.no_normalize)
        .escape_markers(options.escape_markers)
        .build()
        .context("Invalid configuration")
}

/// Read the whole input, from stdin when the path is `-`.
fn read_input(path: &Path) -> Result<String> {
    if path == Path::new("-") {
        let mut buf = String::new();
        io::stdin()
            .read_to_string(&mut buf)
            .context("Failed to read stdin")?;
        return Ok(buf);
    }
    std::fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))
}

fn with_final_newline(mut s: String) -> String {
    if !s.ends_with('\n') {
        s.push('\n');
    }
    s
}
