//! Conversion entry points.
//!
//! Three layers, from innermost to outermost:
//!
//! 1. **Typed** — [`markdown_to_blocks`] / [`blocks_to_markdown`] over `&str`
//!    and `&[Block]`. Infallible: bad Markdown degrades to literal text and
//!    unsupported blocks are dropped.
//! 2. **Boundary** — the same operations over `serde_json::Value` / JSON text,
//!    as received from a tool layer or the storage API. These validate shape
//!    and fail with [`MdBlocksError::Shape`].
//! 3. **Files** — [`convert_file`] reads UTF-8, converts, and writes the
//!    result atomically.

use crate::config::ConversionConfig;
use crate::error::{MdBlocksError, Result};
use crate::model::Block;
use crate::pipeline::{assemble, plain, render};
use crate::wire;
use serde_json::Value;
use std::io::Write;
use std::path::Path;
use tracing::{debug, info};

// ── Typed ────────────────────────────────────────────────────────────────────

/// Parse Markdown into blocks with the default configuration.
///
/// # Example
/// ```rust
/// use edgequake_mdblocks::{markdown_to_blocks, Block};
///
/// let blocks = markdown_to_blocks("# Title\n\n- one\n- two");
/// assert_eq!(blocks.len(), 3);
/// assert!(matches!(blocks[1], Block::BulletedListItem { .. }));
/// ```
pub fn markdown_to_blocks(markdown: &str) -> Vec<Block> {
    markdown_to_blocks_with(markdown, &ConversionConfig::default())
}

/// Parse Markdown into blocks.
pub fn markdown_to_blocks_with(markdown: &str, config: &ConversionConfig) -> Vec<Block> {
    assemble::assemble(markdown, config)
}

/// Render blocks to Markdown with the default configuration.
///
/// # Example
/// ```rust
/// use edgequake_mdblocks::{blocks_to_markdown, Block};
///
/// assert_eq!(blocks_to_markdown(&[Block::Divider]), "---");
/// ```
pub fn blocks_to_markdown(blocks: &[Block]) -> String {
    blocks_to_markdown_with(blocks, &ConversionConfig::default())
}

/// Render blocks to Markdown.
pub fn blocks_to_markdown_with(blocks: &[Block], config: &ConversionConfig) -> String {
    render::render_blocks(blocks, config)
}

/// Plain text of a block sequence, one line per non-empty block.
pub fn blocks_to_plain_text(blocks: &[Block]) -> String {
    plain::document_plain_text(blocks)
}

// ── Boundary ─────────────────────────────────────────────────────────────────

/// Parse a boundary value that must be a JSON string of Markdown.
///
/// # Errors
/// [`MdBlocksError::Shape`] if `value` is not a string.
pub fn markdown_value_to_blocks(value: &Value, config: &ConversionConfig) -> Result<Vec<Block>> {
    let markdown = value
        .as_str()
        .ok_or_else(|| MdBlocksError::shape("text", value))?;
    Ok(markdown_to_blocks_with(markdown, config))
}

/// Decode a boundary value that must be a JSON array of blocks.
pub fn blocks_from_value(value: &Value) -> Result<Vec<Block>> {
    wire::decode_blocks(value)
}

/// Decode JSON text that must hold an array of blocks.
pub fn blocks_from_json(json: &str) -> Result<Vec<Block>> {
    let value: Value = serde_json::from_str(json)?;
    blocks_from_value(&value)
}

/// Encode blocks in the storage API's JSON shape.
pub fn blocks_to_value(blocks: &[Block], config: &ConversionConfig) -> Value {
    wire::encode_blocks(blocks, config.max_text_length)
}

/// Encode blocks as JSON text.
pub fn blocks_to_json(blocks: &[Block], config: &ConversionConfig, pretty: bool) -> Result<String> {
    let value = blocks_to_value(blocks, config);
    let json = if pretty {
        serde_json::to_string_pretty(&value)?
    } else {
        serde_json::to_string(&value)?
    };
    Ok(json)
}

/// Decode a JSON block array and render it to Markdown.
pub fn json_to_markdown(json: &str, config: &ConversionConfig) -> Result<String> {
    let blocks = blocks_from_json(json)?;
    Ok(blocks_to_markdown_with(&blocks, config))
}

// ── Files ────────────────────────────────────────────────────────────────────

/// Which way a text-level conversion goes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Markdown in, block JSON out.
    ToBlocks { pretty: bool },
    /// Block JSON in, Markdown out.
    ToMarkdown,
    /// Block JSON in, plain text out.
    PlainText,
}

/// Convert document text in the given direction.
pub fn convert_str(input: &str, direction: Direction, config: &ConversionConfig) -> Result<String> {
    match direction {
        Direction::ToBlocks { pretty } => {
            let blocks = markdown_to_blocks_with(input, config);
            blocks_to_json(&blocks, config, pretty)
        }
        Direction::ToMarkdown => json_to_markdown(input, config),
        Direction::PlainText => Ok(blocks_to_plain_text(&blocks_from_json(input)?)),
    }
}

/// Convert a file and write the result to `output`.
///
/// Uses atomic write (temp file + rename) to prevent partial files.
pub fn convert_file(
    input: impl AsRef<Path>,
    output: impl AsRef<Path>,
    direction: Direction,
    config: &ConversionConfig,
) -> Result<()> {
    let input = input.as_ref();
    let output = output.as_ref();
    info!("Converting {} → {}", input.display(), output.display());

    let text = std::fs::read_to_string(input).map_err(|e| MdBlocksError::InputReadFailed {
        path: input.to_path_buf(),
        source: e,
    })?;
    let converted = convert_str(&text, direction, config)?;
    write_atomic(output, &converted)?;

    debug!(bytes = converted.len(), "wrote {}", output.display());
    Ok(())
}

/// Write `contents` to `path` via a temp file in the same directory.
pub fn write_atomic(path: &Path, contents: &str) -> Result<()> {
    let fail = |source: std::io::Error| MdBlocksError::OutputWriteFailed {
        path: path.to_path_buf(),
        source,
    };

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(dir).map_err(fail)?;

    let mut tmp = tempfile::NamedTempFile::new_in(dir).map_err(fail)?;
    tmp.write_all(contents.as_bytes()).map_err(fail)?;
    tmp.persist(path).map_err(|e| fail(e.error))?;
    Ok(())
}
