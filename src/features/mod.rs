//! Feature modules - Output sinks beyond JSON records
//!
//! This module contains the spreadsheet sink:
//! - Workbook writing with native merged ranges
//! - Sheet name sanitizing and de-duplication

pub mod sheet_names;
pub mod xlsx;

// Re-export commonly used types
pub use sheet_names::{sanitize_sheet_name, SheetNames, MAX_SHEET_NAME_CHARS};
pub use xlsx::{write_tables_to_xlsx, write_workbook, SheetData, XlsxWriter};
