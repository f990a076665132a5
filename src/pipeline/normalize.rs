//! Input normalisation: deterministic cleanup before line classification.
//!
//! Markdown pasted from editors and web pages routinely carries Windows line
//! endings, a UTF-8 BOM, or zero-width characters. Left in place they turn
//! `# Title` into a paragraph (BOM before `#`) or leave `\r` in span content.
//!
//! Both rules run in one scan over the input. Clean input (the common case)
//! is returned borrowed.

use std::borrow::Cow;

/// Characters dropped from the input: BOM, zero-width space / non-joiner /
/// joiner, word joiner and soft hyphen.
const INVISIBLE: [char; 6] = [
    '\u{FEFF}', '\u{200B}', '\u{200C}', '\u{200D}', '\u{2060}', '\u{00AD}',
];

/// Normalise a Markdown document.
///
/// - CRLF and lone CR become LF.
/// - Invisible Unicode characters are removed.
pub fn normalize(input: &str) -> Cow<'_, str> {
    if !input.contains(|c: char| c == '\r' || INVISIBLE.contains(&c)) {
        return Cow::Borrowed(input);
    }

    let mut out = String::with_capacity(input.len());
    let mut chars = input.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '\r' => {
                chars.next_if_eq(&'\n');
                out.push('\n');
            }
            c if INVISIBLE.contains(&c) => {}
            c => out.push(c),
        }
    }
    Cow::Owned(out)
}

// ── Tests ────────────────────────────────────────────────────────────────────
