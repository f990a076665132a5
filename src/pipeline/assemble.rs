//! Block assembly: Markdown document → flat `Vec<Block>`.
//!
//! Walks the document line by line, asks [`super::classify`] what each line
//! is, and builds the block. Two constructs need state across lines:
//!
//! - **Fenced code.** After an opener every line is taken verbatim (blank
//!   lines included) until a line starting with three backticks or the end
//!   of input. The interior is never tokenized.
//! - **List runs.** Consecutive list items form a run; a blank line or any
//!   other block ends it. Runs are only counted for diagnostics: the block
//!   sequence has no separator between list items, so a blank line between
//!   two items leaves them adjacent.

use super::classify::{self, LineKind};
use super::inline::tokenize_with;
use super::normalize::normalize;
use crate::config::ConversionConfig;
use crate::model::Block;
use std::borrow::Cow;
use tracing::{debug, trace};

/// Parse a Markdown document into blocks.
///
/// Never fails. An empty or all-blank document yields an empty vector.
pub fn assemble(markdown: &str, config: &ConversionConfig) -> Vec<Block> {
    let text: Cow<'_, str> = if config.normalize_input {
        normalize(markdown)
    } else {
        Cow::Borrowed(markdown)
    };

    let mut blocks = Vec::new();
    let mut lines = text.lines().enumerate();
    let mut in_list_run = false;
    let mut list_runs = 0usize;

    while let Some((line_no, line)) = lines.next() {
        let kind = classify::classify(line, config.indent_width);
        trace!(line = line_no + 1, ?kind, "classified line");

        let is_list_item = matches!(kind, LineKind::Bulleted { .. } | LineKind::Numbered { .. });
        if is_list_item && !in_list_run {
            list_runs += 1;
        }
        in_list_run = is_list_item;

        let spans = |text: &str| tokenize_with(text, config);
        let block = match kind {
            LineKind::Blank => continue,
            LineKind::Heading { level, text } => Block::heading(level, spans(text)),
            LineKind::FenceOpen { language } => {
                let mut body: Vec<&str> = Vec::new();
                let mut closed = false;
                for (_, inner) in lines.by_ref() {
                    if classify::is_fence_close(inner) {
                        closed = true;
                        break;
                    }
                    body.push(inner);
                }
                if !closed {
                    debug!(
                        line = line_no + 1,
                        "unterminated code fence; consuming rest of document"
                    );
                }
                Block::code(language, body.join("\n"))
            }
            LineKind::Bulleted { indent_level, text } => Block::BulletedListItem {
                spans: spans(text),
                indent_level,
            },
            LineKind::Numbered { indent_level, text } => Block::NumberedListItem {
                spans: spans(text),
                indent_level,
            },
            LineKind::Quote { text } => Block::quote(spans(text)),
            LineKind::Divider => Block::Divider,
            LineKind::Paragraph { text } => Block::paragraph(spans(text)),
        };
        blocks.push(block);
    }

    debug!(
        blocks = blocks.len(),
        list_runs,
        mode = ?config.inline_mode,
        "assembled markdown into blocks"
    );
    blocks
}

// ── Tests ────────────────────────────────────────────────────────────────────
