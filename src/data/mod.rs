//! Data layer - Static markers and patterns
//!
//! This module contains the tag vocabulary of the input format:
//! - Structural line markers (caption, table, row, cell)
//! - Span marker and inline decoration patterns
//! - Default keys and separators used by the record builder

pub mod patterns;

// Re-export commonly used items
pub use patterns::{
    DEFAULT_CONCAT_SEPARATOR, DEFAULT_GROUP_KEY, INLINE_SEPARATOR, KEY_SEPARATOR, TABLE_MARKER,
};
