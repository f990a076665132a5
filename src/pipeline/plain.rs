//! Plain-text extraction: spans → display/search string.
//!
//! The degenerate rendering mode. Annotations and link targets are dropped,
//! and only span content survives.

use crate::model::{Block, RichTextSpan};

/// Concatenate span content, discarding annotations and links.
pub fn plain_text(spans: &[RichTextSpan]) -> String {
    spans.iter().map(|s| s.content.as_str()).collect()
}

/// Text of one block: span text, raw code, or empty for dividers and
/// unsupported blocks.
pub fn block_plain_text(block: &Block) -> String {
    match block {
        Block::Code { text, .. } => text.clone(),
        other => other.rich_text().map(plain_text).unwrap_or_default(),
    }
}

/// Text of a whole document: non-empty block texts joined by newlines.
pub fn document_plain_text(blocks: &[Block]) -> String {
    blocks
        .iter()
        .map(block_plain_text)
        .filter(|t| !t.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}
