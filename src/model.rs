//! Value types shared by the parser, the renderer and the JSON encoding.
//!
//! A document is a flat `Vec<Block>` in document order. Blocks have no
//! identity and no parent/child links; list nesting is expressed by the
//! `indent_level` field on list items.

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Text colour carried on a span.
///
/// Markdown has no syntax for colour, so the parser always produces
/// [`Color::Default`]; the other values survive JSON decode → encode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Color {
    #[default]
    Default,
    Gray,
    Brown,
    Orange,
    Yellow,
    Green,
    Blue,
    Purple,
    Pink,
    Red,
}

impl Color {
    pub fn as_str(self) -> &'static str {
        match self {
            Color::Default => "default",
            Color::Gray => "gray",
            Color::Brown => "brown",
            Color::Orange => "orange",
            Color::Yellow => "yellow",
            Color::Green => "green",
            Color::Blue => "blue",
            Color::Purple => "purple",
            Color::Pink => "pink",
            Color::Red => "red",
        }
    }

    /// Parse a colour name. `<name>_background` maps to `<name>`; anything
    /// unknown maps to [`Color::Default`].
    pub fn from_name(name: &str) -> Self {
        match name.strip_suffix("_background").unwrap_or(name) {
            "gray" => Color::Gray,
            "brown" => Color::Brown,
            "orange" => Color::Orange,
            "yellow" => Color::Yellow,
            "green" => Color::Green,
            "blue" => Color::Blue,
            "purple" => Color::Purple,
            "pink" => Color::Pink,
            "red" => Color::Red,
            _ => Color::Default,
        }
    }
}

impl Serialize for Color {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Color {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let name = String::deserialize(deserializer)?;
        Ok(Color::from_name(&name))
    }
}

/// Independent style flags plus a colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Annotations {
    pub bold: bool,
    pub italic: bool,
    pub strikethrough: bool,
    pub underline: bool,
    pub code: bool,
    pub color: Color,
}

impl Annotations {
    /// True when no flag is set and the colour is default.
    pub fn is_plain(&self) -> bool {
        *self == Annotations::default()
    }
}

/// A contiguous run of text sharing one formatting state.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RichTextSpan {
    pub content: String,
    pub annotations: Annotations,
    pub link: Option<String>,
}

impl RichTextSpan {
    /// Unformatted, unlinked text.
    pub fn plain(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            ..Self::default()
        }
    }

    pub fn styled(content: impl Into<String>, annotations: Annotations) -> Self {
        Self {
            content: content.into(),
            annotations,
            link: None,
        }
    }

    pub fn with_link(mut self, url: impl Into<String>) -> Self {
        self.link = Some(url.into());
        self
    }

    /// Whether `other` could be appended to this span without changing meaning.
    pub fn same_format(&self, other: &RichTextSpan) -> bool {
        self.annotations == other.annotations && self.link == other.link
    }
}

/// Heading depth. Only three levels exist in the block model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum HeadingLevel {
    H1,
    H2,
    H3,
}

impl HeadingLevel {
    pub fn from_u8(level: u8) -> Option<Self> {
        match level {
            1 => Some(HeadingLevel::H1),
            2 => Some(HeadingLevel::H2),
            3 => Some(HeadingLevel::H3),
            _ => None,
        }
    }

    pub fn as_u8(self) -> u8 {
        match self {
            HeadingLevel::H1 => 1,
            HeadingLevel::H2 => 2,
            HeadingLevel::H3 => 3,
        }
    }
}

/// One atomic content unit.
///
/// Serialises to and from the storage API's block JSON; see [`crate::wire`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Block {
    Heading {
        level: HeadingLevel,
        spans: Vec<RichTextSpan>,
    },
    Paragraph {
        spans: Vec<RichTextSpan>,
    },
    BulletedListItem {
        spans: Vec<RichTextSpan>,
        indent_level: u8,
    },
    NumberedListItem {
        spans: Vec<RichTextSpan>,
        indent_level: u8,
    },
    Quote {
        spans: Vec<RichTextSpan>,
    },
    /// Literal, untokenized text.
    Code {
        language: String,
        text: String,
    },
    Divider,
    /// A block decoded from JSON whose `type` is outside the set above
    /// (tables, images, toggles, …). Never produced by the Markdown parser
    /// and skipped by the renderer.
    Unsupported {
        block_type: String,
    },
}

impl Block {
    pub fn heading(level: HeadingLevel, spans: Vec<RichTextSpan>) -> Self {
        Block::Heading { level, spans }
    }

    pub fn paragraph(spans: Vec<RichTextSpan>) -> Self {
        Block::Paragraph { spans }
    }

    pub fn bulleted(spans: Vec<RichTextSpan>) -> Self {
        Block::BulletedListItem {
            spans,
            indent_level: 0,
        }
    }

    pub fn numbered(spans: Vec<RichTextSpan>) -> Self {
        Block::NumberedListItem {
            spans,
            indent_level: 0,
        }
    }

    pub fn quote(spans: Vec<RichTextSpan>) -> Self {
        Block::Quote { spans }
    }

    pub fn code(language: impl Into<String>, text: impl Into<String>) -> Self {
        Block::Code {
            language: language.into(),
            text: text.into(),
        }
    }

    /// The storage API's name for this block's type.
    pub fn type_name(&self) -> &str {
        match self {
            Block::Heading { level, .. } => match level {
                HeadingLevel::H1 => "heading_1",
                HeadingLevel::H2 => "heading_2",
                HeadingLevel::H3 => "heading_3",
            },
            Block::Paragraph { .. } => "paragraph",
            Block::BulletedListItem { .. } => "bulleted_list_item",
            Block::NumberedListItem { .. } => "numbered_list_item",
            Block::Quote { .. } => "quote",
            Block::Code { .. } => "code",
            Block::Divider => "divider",
            Block::Unsupported { block_type } => block_type,
        }
    }

    /// Spans of a text-bearing block; `None` for code, divider and unsupported blocks.
    pub fn rich_text(&self) -> Option<&[RichTextSpan]> {
        match self {
            Block::Heading { spans, .. }
            | Block::Paragraph { spans }
            | Block::BulletedListItem { spans, .. }
            | Block::NumberedListItem { spans, .. }
            | Block::Quote { spans } => Some(spans),
            Block::Code { .. } | Block::Divider | Block::Unsupported { .. } => None,
        }
    }

    /// Display/search text of this block; see [`crate::pipeline::plain`].
    pub fn plain_text(&self) -> String {
        crate::pipeline::plain::block_plain_text(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_names_round_trip() {
        for c in [
            Color::Default,
            Color::Gray,
            Color::Brown,
            Color::Orange,
            Color::Yellow,
            Color::Green,
            Color::Blue,
            Color::Purple,
            Color::Pink,
            Color::Red,
        ] {
            assert_eq!(Color::from_name(c.as_str()), c);
        }
    }

    #[test]
    fn test_color_background_and_unknown() {
        assert_eq!(Color::from_name("blue_background"), Color::Blue);
        assert_eq!(Color::from_name("chartreuse"), Color::Default);
    }

    #[test]
    fn test_annotations_deserialise_with_missing_fields() {
        let a: Annotations = serde_json::from_str(r#"{"bold":true}"#).unwrap();
        assert!(a.bold);
        assert!(!a.italic);
        assert_eq!(a.color, Color::Default);
    }

    #[test]
    fn test_heading_level_bounds() {
        assert_eq!(HeadingLevel::from_u8(2), Some(HeadingLevel::H2));
        assert_eq!(HeadingLevel::from_u8(0), None);
        assert_eq!(HeadingLevel::from_u8(4), None);
        assert_eq!(HeadingLevel::H3.as_u8(), 3);
    }

    #[test]
    fn test_rich_text_accessor() {
        let p = Block::paragraph(vec![RichTextSpan::plain("x")]);
        assert_eq!(p.rich_text().map(<[_]>::len), Some(1));
        assert!(Block::Divider.rich_text().is_none());
        assert!(Block::code("rust", "fn main() {}").rich_text().is_none());
    }

    #[test]
    fn test_type_names() {
        assert_eq!(Block::heading(HeadingLevel::H2, vec![]).type_name(), "heading_2");
        assert_eq!(Block::Divider.type_name(), "divider");
        let u = Block::Unsupported {
            block_type: "table".into(),
        };
        assert_eq!(u.type_name(), "table");
    }
}
