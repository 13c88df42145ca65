//! Record extraction
//!
//! Turns a placed grid into output records:
//!
//! ```text
//! TableSpec -> reconstruct_table -> columns + classification spans
//!           -> materialize_rows -> flat rows | grouped rows -> TableOutput
//! ```
//!
//! # Example
//!
//! ```
//! use tagtable::core::options::TableOptions;
//! use tagtable::core::records::build_document;
//! use tagtable::core::segment::parse_tables;
//!
//! let text = "<\"表1\">\n<\"行\">\n<\"G\">項目\n<\"G\">値\n<\"行\">\n<\"G\">LDL\n<\"G\">140\n";
//! let tables = parse_tables(text, false);
//! let doc = build_document(&tables, &TableOptions::default()).value;
//! let rows = doc.tables[0].rows().unwrap();
//! assert_eq!(rows[0].get("値"), Some("140"));
//! ```

mod builder;
mod classification;
mod extract;
mod output;

#[cfg(test)]
mod tests;

// Re-export public API
pub use builder::{build_document, build_table_output, reconstruct_table, ReconstructedTable};
pub use classification::{
    classification_for_row, detect_classification_spans, group_records, ClassificationSpan,
};
pub use extract::{extract_value, materialize_rows, ExtractSettings, ValuePolicy};
pub use output::{ColumnOutput, Record, RecordGroup, TableBody, TableDocument, TableOutput};
