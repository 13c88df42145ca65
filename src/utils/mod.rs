//! Utility modules
//!
//! This module contains utilities and helpers:
//! - Error, warning and result types
//! - Markup diagnostics for check mode
//! - Option files

pub mod config;
pub mod diagnostics;
pub mod error;

// Re-export commonly used items
pub use config::{HeaderDepthSetting, OptionsFile};
pub use diagnostics::{check_document, format_diagnostics, CheckResult, Diagnostic, DiagnosticLevel};
pub use error::{ConversionError, ConversionOutput, ConversionResult, ConversionWarning};

#[cfg(feature = "config-file")]
pub use config::{load_options, parse_options};
