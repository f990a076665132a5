//! Configuration types for Markdown ⇄ block conversion.
//!
//! All conversion behaviour is controlled through [`ConversionConfig`], built
//! via its [`ConversionConfigBuilder`]. The plain entry points
//! ([`crate::markdown_to_blocks`], [`crate::blocks_to_markdown`]) use
//! [`ConversionConfig::default()`]; the `_with` variants take an explicit one.

use crate::error::MdBlocksError;
use serde::{Deserialize, Serialize};

/// Per-object character limit imposed by the content-storage API.
pub const DEFAULT_MAX_TEXT_LENGTH: usize = 2000;

/// Configuration for a conversion in either direction.
///
/// # Example
/// ```rust
/// use edgequake_mdblocks::{ConversionConfig, InlineMode, ListNumbering};
///
/// let config = ConversionConfig::builder()
///     .inline_mode(InlineMode::Toggle)
///     .list_numbering(ListNumbering::Sequential)
///     .indent_width(4)
///     .build()
///     .unwrap();
/// assert_eq!(config.indent_width, 4);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConversionConfig {
    /// How inline markers (`**`, `*`, `` ` ``, `~~`) are matched. Default: [`InlineMode::Paired`].
    pub inline_mode: InlineMode,

    /// How numbered list items are numbered on render. Default: [`ListNumbering::AlwaysOne`].
    pub list_numbering: ListNumbering,

    /// Leading spaces per list indent level, in both directions. Range: 1–8. Default: 2.
    ///
    /// A leading tab always counts as one level.
    pub indent_width: usize,

    /// Normalise line endings and strip invisible Unicode before parsing. Default: true.
    pub normalize_input: bool,

    /// Treat `\` before a marker character as an escape when parsing, and
    /// escape literal marker characters when rendering. Default: false.
    ///
    /// Off, span text passes through both directions untouched, so a
    /// backslash or bracket in API content renders as itself.
    pub escape_markers: bool,

    /// Maximum characters per rich-text object in the JSON encoding. Default: 2000.
    ///
    /// Longer spans are split into consecutive objects sharing the same
    /// annotations and link, which is what the storage API accepts.
    pub max_text_length: usize,
}

impl Default for ConversionConfig {
    fn default() -> Self {
        Self {
            inline_mode: InlineMode::default(),
            list_numbering: ListNumbering::default(),
            indent_width: 2,
            normalize_input: true,
            escape_markers: false,
            max_text_length: DEFAULT_MAX_TEXT_LENGTH,
        }
    }
}

impl ConversionConfig {
    /// Create a new builder for `ConversionConfig`.
    pub fn builder() -> ConversionConfigBuilder {
        ConversionConfigBuilder {
            config: Self::default(),
        }
    }
}

/// Builder for [`ConversionConfig`].
#[derive(Debug)]
pub struct ConversionConfigBuilder {
    config: ConversionConfig,
}

impl ConversionConfigBuilder {
    pub fn inline_mode(mut self, mode: InlineMode) -> Self {
        self.config.inline_mode = mode;
        self
    }

    pub fn list_numbering(mut self, numbering: ListNumbering) -> Self {
        self.config.list_numbering = numbering;
        self
    }

    pub fn indent_width(mut self, width: usize) -> Self {
        self.config.indent_width = width.clamp(1, 8);
        self
    }

    pub fn normalize_input(mut self, v: bool) -> Self {
        self.config.normalize_input = v;
        self
    }

    pub fn escape_markers(mut self, v: bool) -> Self {
        self.config.escape_markers = v;
        self
    }

    pub fn max_text_length(mut self, n: usize) -> Self {
        self.config.max_text_length = n.max(1);
        self
    }

    /// Build the configuration, validating constraints.
    ///
    /// The setters already clamp, so this only fails for configs that were
    /// deserialised or mutated directly before being fed back in.
    pub fn build(self) -> Result<ConversionConfig, MdBlocksError> {
        self.config.validate()?;
        Ok(self.config)
    }
}

impl ConversionConfig {
    /// Check field ranges. Called by [`ConversionConfigBuilder::build`].
    pub fn validate(&self) -> Result<(), MdBlocksError> {
        if !(1..=8).contains(&self.indent_width) {
            return Err(MdBlocksError::InvalidConfig(format!(
                "indent width must be 1–8, got {}",
                self.indent_width
            )));
        }
        if self.max_text_length == 0 {
            return Err(MdBlocksError::InvalidConfig(
                "max text length must be ≥ 1".into(),
            ));
        }
        Ok(())
    }
}

// ── Enums ────────────────────────────────────────────────────────────────

/// How the inline tokenizer matches formatting markers.
///
/// | Mode | `**bold` (unclosed) | `2 * 3 * 4` | `` `a*b` `` |
/// |------|---------------------|-------------|-------------|
/// | `Paired` | literal `**bold` | literal | code `a*b` |
/// | `Toggle` | bold `bold` | italic ` 3 ` | flips italic inside code |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InlineMode {
    /// Openers are paired with closers through a stack per annotation kind;
    /// unmatched markers stay literal text. Code spans are opaque. (default)
    #[default]
    Paired,
    /// Every marker flips one boolean. Unclosed markers format the rest of
    /// the line. Kept for compatibility with existing documents.
    Toggle,
}

/// Ordinal written in front of numbered list items.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ListNumbering {
    /// Every item renders as `1.`; Markdown viewers renumber on display. (default)
    #[default]
    AlwaysOne,
    /// Items count up within a run of numbered items at the same indent level.
    ///
    /// A run ends at any block that is not a list item, or at a bullet on the
    /// same or a shallower level. Blank source lines do not end a run: the
    /// block sequence has nothing between two adjacent list items, exactly as
    /// the storage API sees it.
    Sequential,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let c = ConversionConfig::default();
        assert_eq!(c.inline_mode, InlineMode::Paired);
        assert_eq!(c.list_numbering, ListNumbering::AlwaysOne);
        assert_eq!(c.indent_width, 2);
        assert!(c.normalize_input);
        assert!(!c.escape_markers);
        assert_eq!(c.max_text_length, 2000);
    }

    #[test]
    fn test_builder_clamps() {
        let c = ConversionConfig::builder()
            .indent_width(0)
            .max_text_length(0)
            .build()
            .unwrap();
        assert_eq!(c.indent_width, 1);
        assert_eq!(c.max_text_length, 1);

        let c = ConversionConfig::builder().indent_width(40).build().unwrap();
        assert_eq!(c.indent_width, 8);
    }

    #[test]
    fn test_validate_rejects_out_of_range() {
        let c = ConversionConfig {
            indent_width: 0,
            ..ConversionConfig::default()
        };
        assert!(matches!(c.validate(), Err(MdBlocksError::InvalidConfig(_))));

        let c = ConversionConfig {
            max_text_length: 0,
            ..ConversionConfig::default()
        };
        assert!(c.validate().is_err());
    }

    #[test]
    fn test_deserialises_partial_json() {
        let c: ConversionConfig =
            serde_json::from_str(r#"{"inline_mode":"toggle","list_numbering":"sequential"}"#)
                .unwrap();
        assert_eq!(c.inline_mode, InlineMode::Toggle);
        assert_eq!(c.list_numbering, ListNumbering::Sequential);
        assert_eq!(c.indent_width, 2);
    }
}
