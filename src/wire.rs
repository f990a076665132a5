//! JSON interchange in the content-storage API's block shape.
//!
//! ```json
//! {
//!   "object": "block",
//!   "type": "paragraph",
//!   "paragraph": {
//!     "rich_text": [{
//!       "type": "text",
//!       "text": { "content": "Hi", "link": null },
//!       "annotations": { "bold": true, "italic": false, "strikethrough": false,
//!                        "underline": false, "code": false, "color": "default" },
//!       "plain_text": "Hi",
//!       "href": null
//!     }]
//!   }
//! }
//! ```
//!
//! Encoding always emits the full shape. Decoding is lenient: `object`,
//! `plain_text`, `href` and individual annotation fields may be absent, and
//! non-`text` rich-text objects (mentions, equations) fall back to their
//! `plain_text`. Unknown block types decode to [`Block::Unsupported`] rather
//! than failing, so mixed collections survive a decode → render pass.

use crate::config::DEFAULT_MAX_TEXT_LENGTH;
use crate::error::{json_kind, MdBlocksError, Result};
use crate::model::{Annotations, Block, HeadingLevel, RichTextSpan};
use crate::pipeline::plain::plain_text;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{json, Map, Value};

/// Language the storage API uses for untagged code blocks.
pub const PLAIN_TEXT_LANGUAGE: &str = "plain text";

// ── Encoding ─────────────────────────────────────────────────────────────────

/// Encode a block sequence as a JSON array.
pub fn encode_blocks(blocks: &[Block], max_text_length: usize) -> Value {
    Value::Array(
        blocks
            .iter()
            .map(|b| encode_block(b, max_text_length))
            .collect(),
    )
}

/// Encode one block. Spans longer than `max_text_length` characters are split.
pub fn encode_block(block: &Block, max_text_length: usize) -> Value {
    let payload = match block {
        Block::Heading { spans, .. } | Block::Paragraph { spans } | Block::Quote { spans } => {
            json!({ "rich_text": encode_spans(spans, max_text_length) })
        }
        Block::BulletedListItem {
            spans,
            indent_level,
        }
        | Block::NumberedListItem {
            spans,
            indent_level,
        } => {
            let mut payload = json!({ "rich_text": encode_spans(spans, max_text_length) });
            if *indent_level > 0 {
                payload["indent_level"] = json!(indent_level);
            }
            payload
        }
        Block::Code { language, text } => {
            let language = if language.is_empty() {
                PLAIN_TEXT_LANGUAGE
            } else {
                language.as_str()
            };
            json!({
                "rich_text": encode_spans(&[RichTextSpan::plain(text.as_str())], max_text_length),
                "language": language,
            })
        }
        Block::Divider | Block::Unsupported { .. } => json!({}),
    };

    let type_name = block.type_name();
    let mut obj = Map::new();
    obj.insert("object".into(), json!("block"));
    obj.insert("type".into(), json!(type_name));
    obj.insert(type_name.to_string(), payload);
    Value::Object(obj)
}

/// Encode spans, skipping empty ones and splitting long ones.
pub fn encode_spans(spans: &[RichTextSpan], max_text_length: usize) -> Vec<Value> {
    spans
        .iter()
        .filter(|s| !s.content.is_empty())
        .flat_map(|span| {
            chunk_chars(&span.content, max_text_length)
                .into_iter()
                .map(move |chunk| encode_text(chunk, &span.annotations, span.link.as_deref()))
        })
        .collect()
}

fn encode_text(content: &str, annotations: &Annotations, link: Option<&str>) -> Value {
    json!({
        "type": "text",
        "text": {
            "content": content,
            "link": link.map(|url| json!({ "url": url })),
        },
        "annotations": {
            "bold": annotations.bold,
            "italic": annotations.italic,
            "strikethrough": annotations.strikethrough,
            "underline": annotations.underline,
            "code": annotations.code,
            "color": annotations.color.as_str(),
        },
        "plain_text": content,
        "href": link,
    })
}

/// Split `s` into pieces of at most `max` characters, on char boundaries.
fn chunk_chars(s: &str, max: usize) -> Vec<&str> {
    let max = max.max(1);
    let mut out = Vec::new();
    let mut start = 0;
    let mut count = 0;
    for (i, _) in s.char_indices() {
        if count == max {
            out.push(&s[start..i]);
            start = i;
            count = 0;
        }
        count += 1;
    }
    out.push(&s[start..]);
    out
}

// ── Decoding ─────────────────────────────────────────────────────────────────

/// Decode a JSON array of blocks.
///
/// # Errors
/// [`MdBlocksError::Shape`] if `value` is not an array;
/// [`MdBlocksError::InvalidBlock`] if an element is not a typed block object.
pub fn decode_blocks(value: &Value) -> Result<Vec<Block>> {
    let items = value
        .as_array()
        .ok_or_else(|| MdBlocksError::shape("sequence of blocks", value))?;
    items
        .iter()
        .enumerate()
        .map(|(index, item)| decode_block(index, item))
        .collect()
}

/// Decode one block. `index` is only used in error messages.
pub fn decode_block(index: usize, value: &Value) -> Result<Block> {
    let obj = value.as_object().ok_or_else(|| MdBlocksError::InvalidBlock {
        index,
        detail: format!("expected an object, found {}", json_kind(value)),
    })?;
    let block_type = obj
        .get("type")
        .and_then(Value::as_str)
        .ok_or_else(|| MdBlocksError::InvalidBlock {
            index,
            detail: "missing string field \"type\"".into(),
        })?;
    let payload = obj.get(block_type);
    let spans = || decode_spans(index, payload);

    let block = match block_type {
        "heading_1" => Block::heading(HeadingLevel::H1, spans()?),
        "heading_2" => Block::heading(HeadingLevel::H2, spans()?),
        "heading_3" => Block::heading(HeadingLevel::H3, spans()?),
        "paragraph" => Block::paragraph(spans()?),
        "bulleted_list_item" => Block::BulletedListItem {
            spans: spans()?,
            indent_level: indent_level(payload),
        },
        "numbered_list_item" => Block::NumberedListItem {
            spans: spans()?,
            indent_level: indent_level(payload),
        },
        "quote" => Block::quote(spans()?),
        "code" => {
            let language = payload
                .and_then(|p| p.get("language"))
                .and_then(Value::as_str)
                .filter(|l| *l != PLAIN_TEXT_LANGUAGE)
                .unwrap_or("");
            Block::code(language, plain_text(&spans()?))
        }
        "divider" => Block::Divider,
        other => Block::Unsupported {
            block_type: other.to_string(),
        },
    };
    Ok(block)
}

fn decode_spans(index: usize, payload: Option<&Value>) -> Result<Vec<RichTextSpan>> {
    let Some(rich_text) = payload
        .and_then(|p| p.get("rich_text"))
        .filter(|v| !v.is_null())
    else {
        return Ok(Vec::new());
    };
    let wire = Vec::<WireRichText>::deserialize(rich_text).map_err(|e| {
        MdBlocksError::InvalidBlock {
            index,
            detail: format!("malformed rich_text: {e}"),
        }
    })?;
    Ok(wire.into_iter().map(RichTextSpan::from).collect())
}

fn indent_level(payload: Option<&Value>) -> u8 {
    payload
        .and_then(|p| p.get("indent_level"))
        .and_then(Value::as_u64)
        .map_or(0, |n| n.min(u8::MAX as u64) as u8)
}

#[derive(Debug, Deserialize)]
struct WireRichText {
    #[serde(default)]
    text: Option<WireText>,
    #[serde(default)]
    annotations: Annotations,
    #[serde(default)]
    plain_text: Option<String>,
    #[serde(default)]
    href: Option<String>,
}

#[derive(Debug, Deserialize)]
struct WireText {
    content: String,
    #[serde(default)]
    link: Option<WireLink>,
}

#[derive(Debug, Deserialize)]
struct WireLink {
    url: String,
}

impl From<WireRichText> for RichTextSpan {
    fn from(wire: WireRichText) -> Self {
        match wire.text {
            Some(text) => RichTextSpan {
                content: text.content,
                annotations: wire.annotations,
                link: text.link.map(|l| l.url).or(wire.href),
            },
            None => RichTextSpan {
                content: wire.plain_text.unwrap_or_default(),
                annotations: wire.annotations,
                link: wire.href,
            },
        }
    }
}

// ── serde impls ──────────────────────────────────────────────────────────────

impl Serialize for Block {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        encode_block(self, DEFAULT_MAX_TEXT_LENGTH).serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Block {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        decode_block(0, &value).map_err(serde::de::Error::custom)
    }
}

impl Serialize for RichTextSpan {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        encode_text(&self.content, &self.annotations, self.link.as_deref()).serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for RichTextSpan {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        WireRichText::deserialize(deserializer).map(RichTextSpan::from)
    }
}

// ── Tests ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Color;

    #[test]
    fn test_encodes_paragraph_shape() {
        let bold = Annotations {
            bold: true,
            ..Annotations::default()
        };
        let block = Block::paragraph(vec![RichTextSpan::styled("Hi", bold)]);
        let v = encode_block(&block, 2000);
        assert_eq!(v["object"], "block");
        assert_eq!(v["type"], "paragraph");
        let rt = &v["paragraph"]["rich_text"][0];
        assert_eq!(rt["type"], "text");
        assert_eq!(rt["text"]["content"], "Hi");
        assert_eq!(rt["text"]["link"], Value::Null);
        assert_eq!(rt["annotations"]["bold"], true);
        assert_eq!(rt["annotations"]["color"], "default");
        assert_eq!(rt["plain_text"], "Hi");
    }

    #[test]
    fn test_encodes_link() {
        let block = Block::paragraph(vec![RichTextSpan::plain("x").with_link("https://e.org")]);
        let v = encode_block(&block, 2000);
        let rt = &v["paragraph"]["rich_text"][0];
        assert_eq!(rt["text"]["link"]["url"], "https://e.org");
        assert_eq!(rt["href"], "https://e.org");
    }

    #[test]
    fn test_encodes_code_divider_and_headings() {
        let code = encode_block(&Block::code("", "a\nb"), 2000);
        assert_eq!(code["code"]["language"], PLAIN_TEXT_LANGUAGE);
        assert_eq!(code["code"]["rich_text"][0]["text"]["content"], "a\nb");

        let divider = encode_block(&Block::Divider, 2000);
        assert_eq!(divider, json!({"object": "block", "type": "divider", "divider": {}}));

        let h2 = encode_block(&Block::heading(HeadingLevel::H2, vec![]), 2000);
        assert_eq!(h2["type"], "heading_2");
        assert_eq!(h2["heading_2"]["rich_text"], json!([]));
    }

    #[test]
    fn test_empty_code_has_no_rich_text() {
        let code = encode_block(&Block::code("rust", ""), 2000);
        assert_eq!(code["code"]["rich_text"], json!([]));
        assert_eq!(code["code"]["language"], "rust");
    }

    #[test]
    fn test_indent_level_only_when_nested() {
        let flat = encode_block(&Block::bulleted(vec![RichTextSpan::plain("a")]), 2000);
        assert!(flat["bulleted_list_item"].get("indent_level").is_none());

        let nested = Block::NumberedListItem {
            spans: vec![RichTextSpan::plain("a")],
            indent_level: 2,
        };
        let v = encode_block(&nested, 2000);
        assert_eq!(v["numbered_list_item"]["indent_level"], 2);
        assert_eq!(decode_block(0, &v).unwrap(), nested);
    }

    #[test]
    fn test_long_spans_are_split_on_char_boundaries() {
        let text = "é".repeat(5);
        let block = Block::paragraph(vec![RichTextSpan::plain(text)]);
        let v = encode_block(&block, 2);
        let parts: Vec<&str> = v["paragraph"]["rich_text"]
            .as_array()
            .unwrap()
            .iter()
            .map(|rt| rt["text"]["content"].as_str().unwrap())
            .collect();
        assert_eq!(parts, vec!["éé", "éé", "é"]);
    }

    #[test]
    fn test_decodes_minimal_rich_text() {
        let v = json!({
            "type": "quote",
            "quote": { "rich_text": [{ "text": { "content": "said" } }] }
        });
        assert_eq!(
            decode_block(0, &v).unwrap(),
            Block::quote(vec![RichTextSpan::plain("said")])
        );
    }

    #[test]
    fn test_decodes_mention_via_plain_text() {
        let v = json!({
            "type": "paragraph",
            "paragraph": { "rich_text": [{
                "type": "mention",
                "mention": { "type": "user", "user": { "id": "u1" } },
                "annotations": { "italic": true, "color": "red_background" },
                "plain_text": "@Ada",
                "href": null
            }] }
        });
        let block = decode_block(0, &v).unwrap();
        let spans = block.rich_text().unwrap();
        assert_eq!(spans[0].content, "@Ada");
        assert!(spans[0].annotations.italic);
        assert_eq!(spans[0].annotations.color, Color::Red);
    }

    #[test]
    fn test_decodes_plain_text_code_language() {
        let v = encode_block(&Block::code("", "x"), 2000);
        assert_eq!(decode_block(0, &v).unwrap(), Block::code("", "x"));
    }

    #[test]
    fn test_unknown_type_is_unsupported() {
        let v = json!({"object": "block", "type": "table", "table": {"table_width": 2}});
        assert_eq!(
            decode_block(0, &v).unwrap(),
            Block::Unsupported {
                block_type: "table".into()
            }
        );
    }

    #[test]
    fn test_missing_payload_decodes_to_empty_spans() {
        let v = json!({"type": "paragraph"});
        assert_eq!(decode_block(0, &v).unwrap(), Block::paragraph(vec![]));
    }

    #[test]
    fn test_non_array_is_shape_error() {
        let err = decode_blocks(&json!({"type": "paragraph"})).unwrap_err();
        assert!(matches!(
            err,
            MdBlocksError::Shape {
                expected: "sequence of blocks",
                found: "object"
            }
        ));
    }

    #[test]
    fn test_bad_elements_are_pinpointed() {
        let err = decode_blocks(&json!([{"type": "divider"}, 7])).unwrap_err();
        assert!(matches!(err, MdBlocksError::InvalidBlock { index: 1, .. }));

        let err = decode_blocks(&json!([{"paragraph": {}}])).unwrap_err();
        assert!(matches!(err, MdBlocksError::InvalidBlock { index: 0, .. }));

        let err = decode_blocks(&json!([{"type": "paragraph", "paragraph": {"rich_text": "x"}}]))
            .unwrap_err();
        assert!(err.to_string().contains("malformed rich_text"));
    }

    #[test]
    fn test_serde_impls_delegate_to_wire_shape() {
        let blocks = vec![
            Block::heading(HeadingLevel::H1, vec![RichTextSpan::plain("T")]),
            Block::Divider,
        ];
        let json = serde_json::to_string(&blocks).unwrap();
        let back: Vec<Block> = serde_json::from_str(&json).unwrap();
        assert_eq!(back, blocks);
    }
}
