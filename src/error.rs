//! Error types for the edgequake-mdblocks library.
//!
//! The converter itself is a pure transform, so the taxonomy is narrow:
//!
//! * [`MdBlocksError::Shape`] — the boundary value is not the expected
//!   kind (text for Markdown, an ordered sequence for blocks). Raised
//!   immediately and surfaced verbatim to the caller.
//!
//! * Everything else is I/O or JSON decoding around the converter, used by
//!   the file helpers and the CLI.
//!
//! Malformed Markdown (unclosed `**`, broken `[link](`) and unsupported block
//! types never produce an error. The former degrades to literal text, the
//! latter is dropped by the renderer.

use std::path::PathBuf;
use thiserror::Error;

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, MdBlocksError>;

/// All errors returned by the edgequake-mdblocks library.
#[derive(Debug, Error)]
pub enum MdBlocksError {
    // ── Boundary shape errors ─────────────────────────────────────────────
    /// Input does not match the expected text/sequence shape.
    #[error("Shape error: expected {expected}, found {found}")]
    Shape {
        expected: &'static str,
        found: &'static str,
    },

    /// One element of a block array is not a block object.
    #[error("Invalid block at index {index}: {detail}")]
    InvalidBlock { index: usize, detail: String },

    /// The boundary text is not valid JSON.
    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    // ── I/O errors ────────────────────────────────────────────────────────
    /// Could not read the input document.
    #[error("Failed to read input '{path}': {source}")]
    InputReadFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Could not create or write the output file.
    #[error("Failed to write output file '{path}': {source}")]
    OutputWriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl MdBlocksError {
    /// Build a [`MdBlocksError::Shape`] naming the JSON kind actually received.
    pub fn shape(expected: &'static str, found: &serde_json::Value) -> Self {
        MdBlocksError::Shape {
            expected,
            found: json_kind(found),
        }
    }
}

/// Human-readable name of a JSON value's kind.
pub fn json_kind(value: &serde_json::Value) -> &'static str {
    use serde_json::Value;
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_shape_display_names_both_sides() {
        let e = MdBlocksError::shape("sequence of blocks", &json!({"type": "paragraph"}));
        let msg = e.to_string();
        assert!(msg.contains("sequence of blocks"), "got: {msg}");
        assert!(msg.contains("object"), "got: {msg}");
    }

    #[test]
    fn test_invalid_block_display() {
        let e = MdBlocksError::InvalidBlock {
            index: 4,
            detail: "missing \"type\"".into(),
        };
        assert!(e.to_string().contains("index 4"));
    }

    #[test]
    fn test_json_error_converts() {
        let err = serde_json::from_str::<serde_json::Value>("[1,").unwrap_err();
        let e: MdBlocksError = err.into();
        assert!(e.to_string().starts_with("Invalid JSON"));
    }

    #[test]
    fn test_json_kind_covers_every_variant() {
        assert_eq!(json_kind(&json!(null)), "null");
        assert_eq!(json_kind(&json!(true)), "boolean");
        assert_eq!(json_kind(&json!(1.5)), "number");
        assert_eq!(json_kind(&json!("x")), "string");
        assert_eq!(json_kind(&json!([])), "array");
        assert_eq!(json_kind(&json!({})), "object");
    }
}
