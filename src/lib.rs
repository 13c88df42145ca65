//! # tagtable
//!
//! Table reconstruction for tagged Japanese manuscript text.
//!
//! ## Features
//!
//! - **Segmentation**: captions, table starts, row separators and cells from a flat tagged stream
//! - **Grid Placement**: rowspan/colspan markers placed without overlap
//! - **Header Paths**: multi-row headers flattened into `親|子` column keys
//! - **Classification**: vertical spans exposed as a column or as record groups
//! - **Sinks**: JSON record documents and xlsx workbooks with native merges
//! - **Check Mode**: markup diagnostics with line numbers
//!
//! ## Usage Examples
//!
//! ### JSON Records
//!
//! ```rust
//! use tagtable::{tables_to_json, TableOptions};
//!
//! let input = r#"<"図表ネーム">表1 基準値
//! <"表1">
//! <"行">
//! <"G＝C2_C1">項目
//! <"G＝C1_C2">血清脂質
//! <"行">
//! <"G">C
//! <"G">TG
//! <"行">
//! <"G">基準
//! <"G">220
//! <"G">150
//! "#;
//!
//! let json = tables_to_json(input, &TableOptions::default()).unwrap().value;
//! assert!(json.contains("\"血清脂質|C\": \"220\""));
//! ```
//!
//! ### Grouped Records
//!
//! ```rust
//! use tagtable::{convert_document, TableOptions};
//!
//! let input = "<\"表1\">\n<\"行\">\n<\"G\">区分\n<\"G\">値\n\
//!              <\"行\">\n<\"G＝C2_C1\">高値群\n<\"G\">180\n<\"行\">\n<\"G\">200\n";
//! let doc = convert_document(input, &TableOptions::grouped()).value;
//! let groups = doc.tables[0].groups().unwrap();
//! assert_eq!(groups[0].label, "高値群");
//! assert_eq!(groups[0].rows.len(), 2);
//! ```

/// Core reconstruction modules
pub mod core;

/// Data layer - tag vocabulary and patterns
pub mod data;

/// Feature modules - output sinks
pub mod features;

/// Utility modules
pub mod utils;

use std::path::Path;

// Re-export core types and functions
pub use core::grid::{Grid, LogicalColumn, Merge, PlacedGrid};
pub use core::options::{HeaderDepth, TableOptions};
pub use core::records::{
    build_document, build_table_output, reconstruct_table, ColumnOutput, Record, RecordGroup,
    TableBody, TableDocument, TableOutput, ValuePolicy,
};
pub use core::segment::{parse_tables, CellSpec, RowSpec, TableSpec};

// Re-export feature modules
pub use features::sheet_names;
pub use features::xlsx;
pub use features::xlsx::SheetData;

// Re-export utilities
pub use utils::config;
pub use utils::diagnostics;
pub use utils::error::{ConversionError, ConversionOutput, ConversionResult, ConversionWarning};

/// Reconstruct every table of a tagged document
pub fn convert_document(input: &str, options: &TableOptions) -> ConversionOutput<TableDocument> {
    let tables = parse_tables(input, options.keep_dividers);
    build_document(&tables, options)
}

/// Reconstruct every table and render the record document as JSON
///
/// # Returns
/// Pretty-printed JSON with non-ASCII text kept as is, plus any warnings
pub fn tables_to_json(input: &str, options: &TableOptions) -> ConversionResult<ConversionOutput<String>> {
    let ConversionOutput { value, warnings } = convert_document(input, options);
    let json = value.to_json()?;
    Ok(ConversionOutput::with_warnings(json, warnings))
}

/// Reconstruct every table and write one worksheet per table to `path`
///
/// Fails with [`ConversionError::InvalidInput`] when the input has no tables.
pub fn tables_to_xlsx(
    input: &str,
    path: impl AsRef<Path>,
    options: &TableOptions,
) -> ConversionResult<ConversionOutput<Vec<SheetData>>> {
    let tables = parse_tables(input, options.keep_dividers);
    xlsx::write_tables_to_xlsx(path, &tables, options)
}
