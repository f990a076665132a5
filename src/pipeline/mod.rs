//! Pipeline stages for Markdown ⇄ block conversion.
//!
//! Each submodule implements exactly one transformation step. Every stage is
//! a pure, synchronous function over borrowed input: no I/O, no shared state,
//! safe to call from any number of threads at once.
//!
//! ## Data Flow
//!
//! ```text
//! markdown ──▶ normalize ──▶ classify ──▶ assemble ──▶ Vec<Block>
//!                              (per line)    │
//!                                            └── inline (per text line)
//!
//! Vec<Block> ──▶ render ──▶ markdown
//!            └─▶ plain  ──▶ display / search text
//! ```
//!
//! 1. [`normalize`] — CRLF → LF, strip BOM and zero-width characters
//! 2. [`classify`]  — decide which block variant one line opens
//! 3. [`inline`]    — tokenize a line's text into formatted spans
//! 4. [`assemble`]  — drive classification, own fence state, build blocks
//! 5. [`render`]    — blocks back to one Markdown line each
//! 6. [`plain`]     — strip all formatting

pub mod assemble;
pub mod classify;
pub mod inline;
pub mod normalize;
pub mod plain;
pub mod render;
