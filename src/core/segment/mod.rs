//! Tokenization and segmentation
//!
//! Turns a flat stream of tagged lines into per-table cell specs:
//!
//! ```text
//! Raw text -> classify_line -> LineKind -> TableSegmenter -> Vec<TableSpec>
//! ```
//!
//! # Example
//!
//! ```
//! use tagtable::core::segment::parse_tables;
//!
//! let text = "<\"表1\">\n<\"行\">\n<\"G\">A\n<\"G\">B\n";
//! let tables = parse_tables(text, false);
//! assert_eq!(tables.len(), 1);
//! assert_eq!(tables[0].rows[0].cells.len(), 2);
//! ```

mod cell;
mod line;
mod segmenter;


// Re-export public API
pub use cell::{normalize_content, parse_span, CellSpec};
pub use line::{classify_line, LineKind};
pub use segmenter::{parse_tables, sanitize_name, RowSpec, TableSegmenter, TableSpec};
