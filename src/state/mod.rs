//! Cursor state module
//!
//! Tracks per-subject collection progress between runs.
//!
//! # Overview
//!
//! The state module provides:
//! - `Cursor` - High/low watermark of the identifiers collected for a subject
//! - `CursorStore` - File-based persistence of cursors inside a group directory
//!
//! A cursor is written whole (temp file, then rename) and never patched in place.

mod store;
mod types;

pub use store::{CursorStore, CURSOR_FILE};
pub use types::Cursor;
