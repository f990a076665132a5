//! Line classification: decide which block variant one physical line opens.
//!
//! Classification is local: each line is inspected on its own. Multi-line
//! state (inside a code fence) belongs to [`super::assemble`], which stops
//! calling the classifier until the fence closes.
//!
//! ## Precedence
//!
//! First match wins:
//! 1. `# `, `## `, `### ` → heading
//! 2. exactly three backticks → fence opener (trailing text is the language)
//! 3. `- ` / `* ` → bulleted item; digits + `. ` → numbered item
//!    (leading whitespace sets the indent level)
//! 4. `> ` → quote
//! 5. three or more `-` or three or more `*`, nothing else → divider
//! 6. blank → separator
//! 7. anything else → paragraph

use crate::model::HeadingLevel;
use once_cell::sync::Lazy;
use regex::Regex;

/// What a single line contributes to the document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineKind<'a> {
    Blank,
    Heading { level: HeadingLevel, text: &'a str },
    FenceOpen { language: &'a str },
    Bulleted { indent_level: u8, text: &'a str },
    Numbered { indent_level: u8, text: &'a str },
    Quote { text: &'a str },
    Divider,
    Paragraph { text: &'a str },
}

static RE_HEADING: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(#{1,3}) (.*)$").unwrap());

static RE_BULLETED: Lazy<Regex> = Lazy::new(|| Regex::new(r"^([ \t]*)[-*] (.*)$").unwrap());

static RE_NUMBERED: Lazy<Regex> = Lazy::new(|| Regex::new(r"^([ \t]*)[0-9]+\. (.*)$").unwrap());

static RE_DIVIDER: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(?:-{3,}|\*{3,})$").unwrap());

/// Fence delimiter: a line starting with three backticks.
pub const FENCE: &str = "```";

/// Classify one line (without its trailing newline).
///
/// `indent_width` is the number of leading spaces per list indent level.
pub fn classify(line: &str, indent_width: usize) -> LineKind<'_> {
    if let Some(caps) = RE_HEADING.captures(line) {
        let level = HeadingLevel::from_u8(caps[1].len() as u8).unwrap_or(HeadingLevel::H3);
        return LineKind::Heading {
            level,
            text: capture(line, &caps, 2),
        };
    }

    if let Some(language) = fence_language(line) {
        return LineKind::FenceOpen { language };
    }

    if let Some(caps) = RE_BULLETED.captures(line) {
        return LineKind::Bulleted {
            indent_level: indent_level(&caps[1], indent_width),
            text: capture(line, &caps, 2),
        };
    }

    if let Some(caps) = RE_NUMBERED.captures(line) {
        return LineKind::Numbered {
            indent_level: indent_level(&caps[1], indent_width),
            text: capture(line, &caps, 2),
        };
    }

    if let Some(text) = line.strip_prefix("> ") {
        return LineKind::Quote { text };
    }

    if RE_DIVIDER.is_match(line) {
        return LineKind::Divider;
    }

    if line.trim().is_empty() {
        return LineKind::Blank;
    }

    LineKind::Paragraph { text: line }
}

/// Language tag of a fence opener, or `None` if `line` does not open a fence.
///
/// Four or more backticks do not open a fence.
pub fn fence_language(line: &str) -> Option<&str> {
    let rest = line.strip_prefix(FENCE)?;
    if rest.starts_with('`') {
        return None;
    }
    Some(rest.trim())
}

/// Whether `line` closes an open fence.
pub fn is_fence_close(line: &str) -> bool {
    line.starts_with(FENCE)
}

/// Borrow a capture group from the original line so it outlives the `Captures`.
fn capture<'a>(line: &'a str, caps: &regex::Captures<'_>, group: usize) -> &'a str {
    caps.get(group).map_or("", |m| &line[m.range()])
}

/// Tabs count one level each; spaces count one level per `indent_width`.
fn indent_level(prefix: &str, indent_width: usize) -> u8 {
    let tabs = prefix.chars().filter(|&c| c == '\t').count();
    let spaces = prefix.chars().filter(|&c| c == ' ').count();
    let level = tabs + spaces / indent_width.max(1);
    level.min(u8::MAX as usize) as u8
}

// ── Tests ────────────────────────────────────────────────────────────────────
