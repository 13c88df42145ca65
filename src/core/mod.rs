//! Core reconstruction modules
//!
//! This module contains the table reconstruction pipeline:
//! - `segment`: line classification and table segmentation
//! - `grid`: cell placement, header paths and logical columns
//! - `records`: value extraction, classification and output documents
//! - `options`: reconstruction options

pub mod grid;
pub mod options;
pub mod records;
pub mod segment;

// Re-export main types and functions
pub use options::{HeaderDepth, TableOptions};
pub use records::{
    build_document, build_table_output, reconstruct_table, Record, RecordGroup, TableBody,
    TableDocument, TableOutput, ValuePolicy,
};
pub use segment::{parse_tables, TableSpec};
