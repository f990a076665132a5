//! Block rendering: `&[Block]` → Markdown, one block per line.
//!
//! ## Wrapper order
//!
//! Annotations are an unordered set, so the original marker nesting cannot
//! be recovered. Spans are always wrapped in the fixed order of
//! [`WRAP_ORDER`]: link outermost, then bold, italic, code, strikethrough.
//! A span that is bold, italic and linked renders as `[***x***](url)`.
//!
//! ## Span content
//!
//! Span text is emitted as is. With [`ConversionConfig::escape_markers`] set,
//! literal marker characters are backslash-escaped instead, so that parsing
//! with the same setting yields the same text.
//!
//! Code content is never escaped. The code delimiter is a backtick run one
//! longer than the longest run inside the content, padded with a space when
//! the content would otherwise touch the delimiter ambiguously.
//!
//! ## Unsupported blocks
//!
//! [`Block::Unsupported`] contributes no line. Callers rely on partial
//! rendering of mixed collections, so this is never an error.

use crate::config::{ConversionConfig, ListNumbering};
use crate::model::{Block, RichTextSpan};
use tracing::debug;

/// One layer of inline syntax around span text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Wrapper {
    Link,
    Bold,
    Italic,
    Code,
    Strikethrough,
}

/// Outermost first.
pub const WRAP_ORDER: [Wrapper; 5] = [
    Wrapper::Link,
    Wrapper::Bold,
    Wrapper::Italic,
    Wrapper::Code,
    Wrapper::Strikethrough,
];

/// Render blocks to a Markdown document.
///
/// Lines are joined with `\n`; there is no trailing newline.
pub fn render_blocks(blocks: &[Block], config: &ConversionConfig) -> String {
    let mut lines: Vec<String> = Vec::with_capacity(blocks.len());
    let mut numbering = Numbering::default();
    let escape = config.escape_markers;
    let inline = |spans: &[RichTextSpan]| render_spans(spans, escape);

    for block in blocks {
        let indent = |level: u8| " ".repeat(level as usize * config.indent_width);
        let line = match block {
            Block::Heading { level, spans } => {
                format!("{} {}", "#".repeat(level.as_u8() as usize), inline(spans))
            }
            Block::Paragraph { spans } => inline(spans),
            Block::BulletedListItem {
                spans,
                indent_level,
            } => {
                numbering.interrupt(*indent_level);
                format!("{}- {}", indent(*indent_level), inline(spans))
            }
            Block::NumberedListItem {
                spans,
                indent_level,
            } => {
                let ordinal = match config.list_numbering {
                    ListNumbering::AlwaysOne => 1,
                    ListNumbering::Sequential => numbering.next(*indent_level),
                };
                format!("{}{}. {}", indent(*indent_level), ordinal, inline(spans))
            }
            Block::Quote { spans } => format!("> {}", inline(spans)),
            Block::Code { language, text } => format!("```{language}\n{text}\n```"),
            Block::Divider => "---".to_string(),
            Block::Unsupported { block_type } => {
                debug!(block_type = %block_type, "skipping unsupported block");
                continue;
            }
        };

        if !matches!(
            block,
            Block::BulletedListItem { .. } | Block::NumberedListItem { .. }
        ) {
            numbering.reset();
        }
        lines.push(line);
    }

    lines.join("\n")
}

/// Render spans to inline Markdown. `escape` backslash-escapes literal
/// marker characters in non-code text.
pub fn render_spans(spans: &[RichTextSpan], escape: bool) -> String {
    spans.iter().map(|span| render_span(span, escape)).collect()
}

/// Render one span, applying [`WRAP_ORDER`] from the innermost layer out.
///
/// Outside code, leading and trailing whitespace is kept outside the markers;
/// `** x **` would not parse back as bold. Code spans keep their whitespace.
pub fn render_span(span: &RichTextSpan, escape: bool) -> String {
    let a = &span.annotations;
    let text = |s: &str| {
        if escape {
            escape_text(s)
        } else {
            s.to_string()
        }
    };
    let styled = a.bold || a.italic || a.code || a.strikethrough || span.link.is_some();
    if !styled || span.content.is_empty() {
        return text(&span.content);
    }

    let (lead, core, trail) = if a.code {
        ("", span.content.as_str(), "")
    } else {
        let core = span.content.trim();
        if core.is_empty() {
            return text(&span.content);
        }
        let start = span.content.len() - span.content.trim_start().len();
        (
            &span.content[..start],
            core,
            &span.content[start + core.len()..],
        )
    };

    let mut out = if a.code { core.to_string() } else { text(core) };
    for wrapper in WRAP_ORDER.iter().rev() {
        out = match wrapper {
            Wrapper::Strikethrough if a.strikethrough => format!("~~{out}~~"),
            Wrapper::Code if a.code => code_span(&out),
            Wrapper::Italic if a.italic => format!("*{out}*"),
            Wrapper::Bold if a.bold => format!("**{out}**"),
            Wrapper::Link => match &span.link {
                Some(url) => format!("[{out}]({url})"),
                None => out,
            },
            _ => out,
        };
    }
    format!("{lead}{out}{trail}")
}

/// Delimit `content` as a code span that parses back to exactly `content`.
fn code_span(content: &str) -> String {
    let longest = content
        .split(|c: char| c != '`')
        .map(str::len)
        .max()
        .unwrap_or(0);
    let fence = "`".repeat(longest + 1);
    let spaced = content.len() >= 2
        && content.starts_with(' ')
        && content.ends_with(' ')
        && !content.bytes().all(|b| b == b' ');
    if content.starts_with('`') || content.ends_with('`') || spaced {
        format!("{fence} {content} {fence}")
    } else {
        format!("{fence}{content}{fence}")
    }
}

/// Backslash-escape characters the inline tokenizer would treat as syntax.
///
/// A lone `~` is not a marker and stays as is; only `~` next to another `~`
/// is escaped.
pub fn escape_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut prev: Option<char> = None;
    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        let needs_escape = match c {
            '\\' | '*' | '`' | '[' | ']' => true,
            '~' => prev == Some('~') || chars.peek() == Some(&'~'),
            _ => false,
        };
        if needs_escape {
            out.push('\\');
        }
        out.push(c);
        prev = Some(c);
    }
    out
}

/// Ordinal counters per indent level for [`ListNumbering::Sequential`].
#[derive(Debug, Default)]
struct Numbering {
    counters: Vec<u32>,
}

impl Numbering {
    fn next(&mut self, level: u8) -> u32 {
        let level = level as usize;
        self.counters.truncate(level + 1);
        self.counters.resize(level + 1, 0);
        self.counters[level] += 1;
        self.counters[level]
    }

    /// A bullet at `level` ends numbered runs at that level and deeper.
    fn interrupt(&mut self, level: u8) {
        self.counters.truncate(level as usize);
    }

    fn reset(&mut self) {
        self.counters.clear();
    }
}

// ── Tests ────────────────────────────────────────────────────────────────────
