//! Inline span tokenizer: one line of text → ordered [`RichTextSpan`]s.
//!
//! ## Two passes
//!
//! ```text
//! line ──▶ lex ──▶ [pair] ──▶ emit ──▶ merge
//!          events   roles     spans    adjacent equal spans joined
//! ```
//!
//! The lexer turns the line into a flat event stream: text, formatting
//! markers (`**`, `*`, `~~`, and `` ` `` in toggle mode), code spans, and
//! well-formed `[text](url)` links. `*` is resolved greedily: two adjacent
//! asterisks are always bold.
//!
//! A code span opens with a run of backticks and closes at the next run of
//! the same length, so ``` ``a`b`` ``` holds a literal backtick. When the
//! content both starts and ends with a space (and is not all spaces) one
//! space is dropped from each side.
//!
//! Backslash escapes are off unless [`ConversionConfig::escape_markers`] is
//! set; by default a backslash is ordinary text.
//!
//! [`InlineMode::Toggle`] skips pairing: every marker flips one boolean, so
//! `**a *b** c*` yields `a` bold, `b` bold+italic, ` c` italic, and an
//! unclosed marker formats the rest of the line.
//!
//! [`InlineMode::Paired`] pairs each closer with the most recent open marker
//! of the same kind (one stack per kind). A marker can open when followed by
//! non-whitespace and close when preceded by non-whitespace. Markers left
//! unpaired are emitted as literal text. Code spans are opaque.
//!
//! Neither mode ever fails: malformed syntax degrades to literal text.

use crate::config::{ConversionConfig, InlineMode};
use crate::model::{Annotations, RichTextSpan};
use std::mem;

/// Characters that a preceding backslash turns into literal text when
/// escapes are enabled.
pub const ESCAPABLE: [char; 6] = ['\\', '*', '~', '`', '[', ']'];

/// Tokenize one line (no embedded newline) into spans, without escapes.
///
/// Empty input yields no spans. A line with no recognised syntax yields
/// exactly one unformatted span equal to the line.
pub fn tokenize(line: &str, mode: InlineMode) -> Vec<RichTextSpan> {
    let syntax = Syntax {
        mode,
        escapes: false,
    };
    merge_adjacent(tokenize_from(line, syntax, Annotations::default()))
}

/// Tokenize one line with the inline settings of `config`.
pub fn tokenize_with(line: &str, config: &ConversionConfig) -> Vec<RichTextSpan> {
    let syntax = Syntax {
        mode: config.inline_mode,
        escapes: config.escape_markers,
    };
    merge_adjacent(tokenize_from(line, syntax, Annotations::default()))
}

#[derive(Debug, Clone, Copy)]
struct Syntax {
    mode: InlineMode,
    escapes: bool,
}

fn tokenize_from(line: &str, syntax: Syntax, base: Annotations) -> Vec<RichTextSpan> {
    let events = lex(line, syntax);
    match syntax.mode {
        InlineMode::Toggle => emit(&events, None, base, syntax),
        InlineMode::Paired => {
            let roles = pair_markers(&events);
            emit(&events, Some(&roles), base, syntax)
        }
    }
}

// ── Events ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MarkerKind {
    Bold,
    Italic,
    Strikethrough,
    Code,
}

impl MarkerKind {
    fn token(self) -> &'static str {
        match self {
            MarkerKind::Bold => "**",
            MarkerKind::Italic => "*",
            MarkerKind::Strikethrough => "~~",
            MarkerKind::Code => "`",
        }
    }

    fn slot(self) -> usize {
        match self {
            MarkerKind::Bold => 0,
            MarkerKind::Italic => 1,
            MarkerKind::Strikethrough => 2,
            MarkerKind::Code => 3,
        }
    }

    fn is_set(self, a: &Annotations) -> bool {
        match self {
            MarkerKind::Bold => a.bold,
            MarkerKind::Italic => a.italic,
            MarkerKind::Strikethrough => a.strikethrough,
            MarkerKind::Code => a.code,
        }
    }

    fn flag(self, a: &mut Annotations) -> &mut bool {
        match self {
            MarkerKind::Bold => &mut a.bold,
            MarkerKind::Italic => &mut a.italic,
            MarkerKind::Strikethrough => &mut a.strikethrough,
            MarkerKind::Code => &mut a.code,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Event<'a> {
    Text(String),
    Marker {
        kind: MarkerKind,
        can_open: bool,
        can_close: bool,
    },
    CodeSpan(&'a str),
    Link {
        text: &'a str,
        url: &'a str,
    },
}

// ── Lexer ────────────────────────────────────────────────────────────────────

fn lex(line: &str, syntax: Syntax) -> Vec<Event<'_>> {
    let mut events = Vec::new();
    let mut text = String::new();
    let mut i = 0;

    while let Some(c) = line[i..].chars().next() {
        let rest = &line[i..];
        match c {
            '\\' if syntax.escapes => {
                if let Some(next) = rest[1..].chars().next().filter(|n| ESCAPABLE.contains(n)) {
                    text.push(next);
                    i += 1 + next.len_utf8();
                    continue;
                }
            }
            '*' | '~' => {
                let kind = if rest.starts_with("**") {
                    Some(MarkerKind::Bold)
                } else if c == '*' {
                    Some(MarkerKind::Italic)
                } else if rest.starts_with("~~") {
                    Some(MarkerKind::Strikethrough)
                } else {
                    None
                };
                if let Some(kind) = kind {
                    flush_text(&mut events, &mut text);
                    events.push(marker_event(line, i, kind));
                    i += kind.token().len();
                    continue;
                }
            }
            '`' => match syntax.mode {
                InlineMode::Toggle => {
                    flush_text(&mut events, &mut text);
                    events.push(marker_event(line, i, MarkerKind::Code));
                    i += 1;
                    continue;
                }
                InlineMode::Paired => {
                    let run = backtick_run(rest);
                    if let Some((code, len)) = scan_code_span(rest, run) {
                        flush_text(&mut events, &mut text);
                        events.push(Event::CodeSpan(code));
                        i += len;
                    } else {
                        // An unmatched run stays literal as a whole.
                        text.push_str(&rest[..run]);
                        i += run;
                    }
                    continue;
                }
            },
            '[' => {
                if let Some(link) = scan_link(rest, syntax.escapes) {
                    flush_text(&mut events, &mut text);
                    events.push(Event::Link {
                        text: link.text,
                        url: link.url,
                    });
                    i += link.len;
                    continue;
                }
            }
            _ => {}
        }
        text.push(c);
        i += c.len_utf8();
    }

    flush_text(&mut events, &mut text);
    events
}

fn flush_text(events: &mut Vec<Event<'_>>, text: &mut String) {
    if !text.is_empty() {
        events.push(Event::Text(mem::take(text)));
    }
}

fn marker_event(line: &str, at: usize, kind: MarkerKind) -> Event<'static> {
    let before = line[..at].chars().next_back();
    let after = line[at + kind.token().len()..].chars().next();
    Event::Marker {
        kind,
        can_open: after.is_some_and(|c| !c.is_whitespace()),
        can_close: before.is_some_and(|c| !c.is_whitespace()),
    }
}

fn backtick_run(s: &str) -> usize {
    s.bytes().take_while(|&b| b == b'`').count()
}

/// Match a code span opened by the `run` backticks at the start of `rest`.
///
/// Returns the content and the byte length of the whole span.
fn scan_code_span(rest: &str, run: usize) -> Option<(&str, usize)> {
    let body = &rest[run..];
    let mut at = 0;
    while let Some(offset) = body[at..].find('`') {
        let start = at + offset;
        let len = backtick_run(&body[start..]);
        if len == run {
            return Some((strip_code_padding(&body[..start]), run + start + len));
        }
        at = start + len;
    }
    None
}

fn strip_code_padding(s: &str) -> &str {
    let padded = s.len() >= 2 && s.starts_with(' ') && s.ends_with(' ');
    if padded && !s.bytes().all(|b| b == b' ') {
        &s[1..s.len() - 1]
    } else {
        s
    }
}

struct LinkMatch<'a> {
    text: &'a str,
    url: &'a str,
    len: usize,
}

/// Match `[text](url)` at the start of `rest`.
///
/// The first `]` (unescaped, when escapes are on) closes the text and must be
/// followed directly by `(`; the first `)` after that closes the URL. Both
/// parts must be non-empty.
fn scan_link(rest: &str, escapes: bool) -> Option<LinkMatch<'_>> {
    let close = find_closing_bracket(rest, escapes)?;
    let after = rest[close + 1..].strip_prefix('(')?;
    let url_end = after.find(')')?;

    let text = &rest[1..close];
    let url = after[..url_end].trim();
    if text.is_empty() || url.is_empty() {
        return None;
    }
    Some(LinkMatch {
        text,
        url,
        len: close + 2 + url_end + 1,
    })
}

fn find_closing_bracket(s: &str, escapes: bool) -> Option<usize> {
    let mut escaped = false;
    for (i, c) in s.char_indices().skip(1) {
        if escaped {
            escaped = false;
            continue;
        }
        match c {
            '\\' if escapes => escaped = true,
            ']' => return Some(i),
            _ => {}
        }
    }
    None
}

// ── Pairing ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Role {
    Literal,
    Open,
    Close,
}

fn pair_markers(events: &[Event<'_>]) -> Vec<Role> {
    let mut roles = vec![Role::Literal; events.len()];
    let mut stacks: [Vec<usize>; 4] = Default::default();

    for (i, event) in events.iter().enumerate() {
        if let &Event::Marker {
            kind,
            can_open,
            can_close,
        } = event
        {
            let stack = &mut stacks[kind.slot()];
            if can_close && !stack.is_empty() {
                if let Some(open) = stack.pop() {
                    roles[open] = Role::Open;
                    roles[i] = Role::Close;
                }
            } else if can_open {
                stack.push(i);
            }
        }
    }
    roles
}

// ── Emission ─────────────────────────────────────────────────────────────────

/// Turn events into spans. `roles == None` means toggle semantics.
fn emit(
    events: &[Event<'_>],
    roles: Option<&[Role]>,
    base: Annotations,
    syntax: Syntax,
) -> Vec<RichTextSpan> {
    let mut spans = Vec::new();
    let mut active = base;
    let mut depth = [0u32; 4];
    let mut buf = String::new();

    for (i, event) in events.iter().enumerate() {
        match event {
            Event::Text(t) => buf.push_str(t),
            Event::Marker { kind, .. } => match roles.map(|r| r[i]) {
                None => {
                    flush_span(&mut spans, &mut buf, active);
                    *kind.flag(&mut active) = !kind.is_set(&active);
                }
                Some(Role::Literal) => buf.push_str(kind.token()),
                Some(Role::Open) => {
                    flush_span(&mut spans, &mut buf, active);
                    depth[kind.slot()] += 1;
                    *kind.flag(&mut active) = true;
                }
                Some(Role::Close) => {
                    flush_span(&mut spans, &mut buf, active);
                    let slot = kind.slot();
                    depth[slot] = depth[slot].saturating_sub(1);
                    *kind.flag(&mut active) = depth[slot] > 0 || kind.is_set(&base);
                }
            },
            Event::CodeSpan(code) => {
                flush_span(&mut spans, &mut buf, active);
                let mut annotations = active;
                annotations.code = true;
                spans.push(RichTextSpan::styled(*code, annotations));
            }
            Event::Link { text, url } => {
                flush_span(&mut spans, &mut buf, active);
                spans.extend(
                    tokenize_from(text, syntax, active)
                        .into_iter()
                        .map(|span| span.with_link(*url)),
                );
            }
        }
    }

    flush_span(&mut spans, &mut buf, active);
    spans
}

fn flush_span(spans: &mut Vec<RichTextSpan>, buf: &mut String, active: Annotations) {
    if !buf.is_empty() {
        spans.push(RichTextSpan::styled(mem::take(buf), active));
    }
}

fn merge_adjacent(spans: Vec<RichTextSpan>) -> Vec<RichTextSpan> {
    let mut out: Vec<RichTextSpan> = Vec::with_capacity(spans.len());
    for span in spans {
        match out.last_mut() {
            Some(last) if last.same_format(&span) => last.content.push_str(&span.content),
            _ => out.push(span),
        }
    }
    out
}

// ── Tests ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn paired(line: &str) -> Vec<RichTextSpan> {
        tokenize(line, InlineMode::Paired)
    }

    fn toggle(line: &str) -> Vec<RichTextSpan> {
        tokenize(line, InlineMode::Toggle)
    }

    fn text_of(spans: &[RichTextSpan]) -> String {
        spans.iter().map(|s| s.content.as_str()).collect()
    }

    fn bold() -> Annotations {
        Annotations {
            bold: true,
            ..Annotations::default()
        }
    }

    fn italic() -> Annotations {
        Annotations {
            italic: true,
            ..Annotations::default()
        }
    }

    #[test]
    fn test_plain_line_is_one_span() {
        for mode in [InlineMode::Paired, InlineMode::Toggle] {
            let spans = tokenize("just some words, café — naïve 🚀", mode);
            assert_eq!(spans, vec![RichTextSpan::plain("just some words, café — naïve 🚀")]);
        }
    }

    #[test]
    fn test_empty_line_has_no_spans() {
        assert!(paired("").is_empty());
        assert!(toggle("").is_empty());
    }

    #[test]
    fn test_bold_and_italic() {
        for mode in [InlineMode::Paired, InlineMode::Toggle] {
            let spans = tokenize("**bold** and *italic*", mode);
            assert_eq!(text_of(&spans), "bold and italic");
            assert_eq!(spans[0], RichTextSpan::styled("bold", bold()));
            assert_eq!(spans[1], RichTextSpan::plain(" and "));
            assert_eq!(spans[2], RichTextSpan::styled("italic", italic()));
        }
    }

    #[test]
    fn test_toggle_follows_flip_sequence() {
        let spans = toggle("**a *b** c*");
        let both = Annotations {
            bold: true,
            italic: true,
            ..Annotations::default()
        };
        assert_eq!(
            spans,
            vec![
                RichTextSpan::styled("a ", bold()),
                RichTextSpan::styled("b", both),
                RichTextSpan::styled(" c", italic()),
            ]
        );
    }

    #[test]
    fn test_paired_allows_overlap() {
        // Each kind has its own stack, so crossing pairs still match.
        assert_eq!(paired("**a *b** c*"), toggle("**a *b** c*"));
    }

    #[test]
    fn test_toggle_unclosed_marker_runs_to_end() {
        assert_eq!(toggle("**bold"), vec![RichTextSpan::styled("bold", bold())]);
        assert_eq!(
            toggle("x *y"),
            vec![RichTextSpan::plain("x "), RichTextSpan::styled("y", italic())]
        );
    }

    #[test]
    fn test_paired_unclosed_marker_is_literal() {
        assert_eq!(paired("**bold"), vec![RichTextSpan::plain("**bold")]);
        assert_eq!(paired("a ~~b"), vec![RichTextSpan::plain("a ~~b")]);
    }

    #[test]
    fn test_paired_spaced_asterisks_are_literal() {
        assert_eq!(paired("2 * 3 * 4"), vec![RichTextSpan::plain("2 * 3 * 4")]);
    }

    #[test]
    fn test_toggle_spaced_asterisks_flip() {
        assert_eq!(
            toggle("2 * 3 * 4"),
            vec![
                RichTextSpan::plain("2 "),
                RichTextSpan::styled(" 3 ", italic()),
                RichTextSpan::plain(" 4"),
            ]
        );
    }

    #[test]
    fn test_paired_code_span_is_opaque() {
        let code = Annotations {
            code: true,
            ..Annotations::default()
        };
        assert_eq!(
            paired("use `a*b` here"),
            vec![
                RichTextSpan::plain("use "),
                RichTextSpan::styled("a*b", code),
                RichTextSpan::plain(" here"),
            ]
        );
    }

    #[test]
    fn test_toggle_code_marker_flips() {
        let spans = toggle("run `cargo` now");
        assert_eq!(spans.len(), 3);
        assert!(spans[1].annotations.code);
        assert_eq!(spans[1].content, "cargo");
    }

    #[test]
    fn test_lone_backtick_is_literal_when_paired() {
        assert_eq!(paired("it`s"), vec![RichTextSpan::plain("it`s")]);
        assert_eq!(paired("``"), vec![RichTextSpan::plain("``")]);
    }

    #[test]
    fn test_strikethrough_and_single_tilde() {
        let spans = paired("~~gone~~ ~5 min");
        assert!(spans[0].annotations.strikethrough);
        assert_eq!(spans[0].content, "gone");
        assert_eq!(spans[1], RichTextSpan::plain(" ~5 min"));
    }

    #[test]
    fn test_triple_asterisk_is_bold_italic() {
        for mode in [InlineMode::Paired, InlineMode::Toggle] {
            let spans = tokenize("***both***", mode);
            assert_eq!(spans.len(), 1);
            assert!(spans[0].annotations.bold && spans[0].annotations.italic);
            assert_eq!(spans[0].content, "both");
        }
    }

    #[test]
    fn test_link_becomes_linked_span() {
        for mode in [InlineMode::Paired, InlineMode::Toggle] {
            let spans = tokenize("see [the docs](https://example.org/a) now", mode);
            assert_eq!(
                spans,
                vec![
                    RichTextSpan::plain("see "),
                    RichTextSpan::plain("the docs").with_link("https://example.org/a"),
                    RichTextSpan::plain(" now"),
                ]
            );
        }
    }

    #[test]
    fn test_link_inherits_active_annotations() {
        let spans = paired("**[a](u)**");
        assert_eq!(spans, vec![RichTextSpan::styled("a", bold()).with_link("u")]);
    }

    #[test]
    fn test_link_text_is_tokenized() {
        let spans = paired("[**a** b](u)");
        assert_eq!(
            spans,
            vec![
                RichTextSpan::styled("a", bold()).with_link("u"),
                RichTextSpan::plain(" b").with_link("u"),
            ]
        );
    }

    #[test]
    fn test_malformed_links_are_literal() {
        for line in ["[a](b", "[a] (b)", "[a]", "[](u)", "[a]()", "[ no close"] {
            assert_eq!(paired(line), vec![RichTextSpan::plain(line)], "line: {line}");
        }
    }

    fn escaping(mode: InlineMode) -> ConversionConfig {
        ConversionConfig::builder()
            .inline_mode(mode)
            .escape_markers(true)
            .build()
            .unwrap()
    }

    #[test]
    fn test_backslashes_are_text_by_default() {
        for line in [r"UNC path \\server\share", r"a\b \\ c", r"C:\tmp [draft]"] {
            assert_eq!(paired(line), vec![RichTextSpan::plain(line)], "line: {line}");
        }
    }

    #[test]
    fn test_escapes_produce_literal_markers_when_enabled() {
        assert_eq!(
            tokenize_with(r"\*not\* \[x\]", &escaping(InlineMode::Paired)),
            vec![RichTextSpan::plain("*not* [x]")]
        );
        assert_eq!(
            tokenize_with(r"a \*\* b", &escaping(InlineMode::Toggle)),
            vec![RichTextSpan::plain("a ** b")]
        );
    }

    #[test]
    fn test_non_escapable_backslash_is_kept() {
        let line = r"C:\path\to";
        assert_eq!(
            tokenize_with(line, &escaping(InlineMode::Paired)),
            vec![RichTextSpan::plain(line)]
        );
    }

    #[test]
    fn test_escaped_bracket_does_not_close_link_text() {
        let spans = tokenize_with(r"[a\]b](u)", &escaping(InlineMode::Paired));
        assert_eq!(spans, vec![RichTextSpan::plain("a]b").with_link("u")]);
    }

    #[test]
    fn test_double_backtick_code_span_holds_a_backtick() {
        let code = Annotations {
            code: true,
            ..Annotations::default()
        };
        assert_eq!(paired("``a`b``"), vec![RichTextSpan::styled("a`b", code)]);
        assert_eq!(paired("`` `x` ``"), vec![RichTextSpan::styled("`x`", code)]);
        assert_eq!(paired("``a`"), vec![RichTextSpan::plain("``a`")]);
    }

    #[test]
    fn test_code_span_padding_is_stripped_once() {
        let code = Annotations {
            code: true,
            ..Annotations::default()
        };
        assert_eq!(paired("`  a  `"), vec![RichTextSpan::styled(" a ", code)]);
        assert_eq!(paired("` `"), vec![RichTextSpan::styled(" ", code)]);
        assert_eq!(paired("` a`"), vec![RichTextSpan::styled(" a", code)]);
    }

    #[test]
    fn test_multibyte_text_next_to_markers() {
        assert_eq!(
            paired("**é**ü"),
            vec![RichTextSpan::styled("é", bold()), RichTextSpan::plain("ü")]
        );
    }

    #[test]
    fn test_nested_same_kind_stays_formatted() {
        let spans = paired("**a **b** c**");
        assert_eq!(spans, vec![RichTextSpan::styled("a b c", bold())]);
    }
}
