//! # edgequake-mdblocks
//!
//! Convert Markdown to and from the block document model used by
//! Notion-style content stores.
//!
//! A page in such a store is a flat, ordered list of blocks (headings,
//! paragraphs, list items, quotes, code, dividers), each holding rich-text
//! spans with independent style flags. This crate is the bidirectional
//! converter between that model and human-readable Markdown. It performs no
//! network I/O: callers upload the blocks it produces, or hand it the
//! blocks they fetched.
//!
//! ## Pipeline Overview
//!
//! ```text
//! Markdown
//!  │
//!  ├─ 1. Normalize  CRLF → LF, strip BOM / zero-width characters
//!  ├─ 2. Classify   heading / fence / list / quote / divider / paragraph
//!  ├─ 3. Tokenize   **bold** *italic* `code` ~~strike~~ [links](url)
//!  └─ 4. Assemble   Vec<Block>
//!
//! Vec<Block> ──▶ Render ──▶ Markdown (one block per line)
//! ```
//!
//! ## Quick Start
//!
//! ```rust
//! use edgequake_mdblocks::{blocks_to_markdown, markdown_to_blocks, plain_text};
//!
//! let blocks = markdown_to_blocks("## Notes\n\n- **bold** and *italic*\n");
//! assert_eq!(blocks.len(), 2);
//!
//! let spans = blocks[1].rich_text().unwrap();
//! assert_eq!(plain_text(spans), "bold and italic");
//!
//! assert_eq!(blocks_to_markdown(&blocks), "## Notes\n- **bold** and *italic*");
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `mdblocks` binary (clap + anyhow + tracing-subscriber) |
//!
//! Disable `cli` when using only the library:
//! ```toml
//! edgequake-mdblocks = { version = "0.1", default-features = false }
//! ```
//!
//! ## What round-trips
//!
//! Headings 1–3, paragraphs, bulleted and numbered lists (numbers normalise
//! to `1.` unless [`ListNumbering::Sequential`] is set), quotes, fenced code
//! and dividers. Inline styles round-trip as a set, not as the original
//! marker order. Tables, images and toggles have no Markdown form here:
//! they decode to [`Block::Unsupported`] and are skipped on render.

// ── Modules ──────────────────────────────────────────────────────────────

pub mod config;
pub mod convert;
pub mod error;
pub mod model;
pub mod pipeline;
pub mod wire;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{ConversionConfig, ConversionConfigBuilder, InlineMode, ListNumbering};
pub use convert::{
    blocks_from_json, blocks_from_value, blocks_to_json, blocks_to_markdown,
    blocks_to_markdown_with, blocks_to_plain_text, blocks_to_value, convert_file, convert_str,
    json_to_markdown, markdown_to_blocks, markdown_to_blocks_with, markdown_value_to_blocks,
    Direction,
};
pub use error::{MdBlocksError, Result};
pub use model::{Annotations, Block, Color, HeadingLevel, RichTextSpan};
pub use pipeline::inline::{tokenize, tokenize_with};
pub use pipeline::plain::plain_text;
