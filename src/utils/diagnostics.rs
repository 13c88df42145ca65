//! Manuscript diagnostics
//!
//! Reports markup that reconstruction silently tolerates:
//!
//! - Cells outside any table
//! - Span markers that cannot be parsed
//! - Rowspans reaching past the last authored row
//! - Colspans clipped by an earlier rowspan
//! - Ragged rows and tables without cells
//!
//! ## Example
//!
//! ```rust
//! use tagtable::diagnostics::check_document;
//! use tagtable::TableOptions;
//!
//! let result = check_document("<\"G\">stray\n<\"表1\">\n", &TableOptions::default());
//! assert_eq!(result.warnings, 2);
//! ```

use std::fmt;

use crate::core::options::TableOptions;
use crate::core::records::reconstruct_table;
use crate::core::segment::{classify_line, parse_tables, LineKind};
use crate::data::patterns::SPAN_MARKER;

/// Diagnostic severity level
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum DiagnosticLevel {
    /// Informational note
    Info,
    /// Warning - output is produced but may not match the author's intent
    Warning,
    /// Error - input cannot be reconstructed
    Error,
}

impl fmt::Display for DiagnosticLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiagnosticLevel::Info => write!(f, "info"),
            DiagnosticLevel::Warning => write!(f, "warning"),
            DiagnosticLevel::Error => write!(f, "error"),
        }
    }
}

/// A single diagnostic message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    /// Severity level
    pub level: DiagnosticLevel,
    /// Human-readable message
    pub message: String,
    /// Line number (1-indexed)
    pub line: Option<usize>,
    /// Name of the table concerned
    pub table: Option<String>,
    /// Offending input line
    pub source_text: Option<String>,
    /// Suggested fix
    pub suggestion: Option<String>,
}

impl Diagnostic {
    /// Create a new diagnostic
    pub fn new(level: DiagnosticLevel, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
            line: None,
            table: None,
            source_text: None,
            suggestion: None,
        }
    }

    pub fn with_line(mut self, line: usize) -> Self {
        self.line = Some(line);
        self
    }

    pub fn with_table(mut self, table: impl Into<String>) -> Self {
        self.table = Some(table.into());
        self
    }

    pub fn with_source(mut self, text: impl Into<String>) -> Self {
        self.source_text = Some(text.into());
        self
    }

    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Format: level: message
        //         --> line 12 (table '表1')
        //         | source text
        //         = help: suggestion

        write!(f, "{}: {}", self.level, self.message)?;

        match (self.line, &self.table) {
            (Some(line), Some(table)) => write!(f, "\n  --> line {} (table '{}')", line, table)?,
            (Some(line), None) => write!(f, "\n  --> line {}", line)?,
            (None, Some(table)) => write!(f, "\n  --> table '{}'", table)?,
            (None, None) => {}
        }

        if let Some(ref source) = self.source_text {
            write!(f, "\n  |\n  | {}", source)?;
        }

        if let Some(ref suggestion) = self.suggestion {
            write!(f, "\n  = help: {}", suggestion)?;
        }

        Ok(())
    }
}

/// Check result with summary
#[derive(Debug, Default)]
pub struct CheckResult {
    /// All diagnostics
    pub diagnostics: Vec<Diagnostic>,
    /// Number of errors
    pub errors: usize,
    /// Number of warnings
    pub warnings: usize,
    /// Number of info messages
    pub infos: usize,
    /// Number of tables found
    pub tables: usize,
}

impl CheckResult {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a diagnostic
    pub fn add(&mut self, diag: Diagnostic) {
        match diag.level {
            DiagnosticLevel::Error => self.errors += 1,
            DiagnosticLevel::Warning => self.warnings += 1,
            DiagnosticLevel::Info => self.infos += 1,
        }
        self.diagnostics.push(diag);
    }

    /// Check if there are any errors
    pub fn has_errors(&self) -> bool {
        self.errors > 0
    }

    /// Check if there are any issues at all
    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }

    /// Get summary string
    pub fn summary(&self) -> String {
        let mut parts = vec![format!(
            "{} table{}",
            self.tables,
            if self.tables == 1 { "" } else { "s" }
        )];
        if self.errors > 0 {
            parts.push(format!(
                "{} error{}",
                self.errors,
                if self.errors == 1 { "" } else { "s" }
            ));
        }
        if self.warnings > 0 {
            parts.push(format!(
                "{} warning{}",
                self.warnings,
                if self.warnings == 1 { "" } else { "s" }
            ));
        }
        if self.infos > 0 {
            parts.push(format!(
                "{} note{}",
                self.infos,
                if self.infos == 1 { "" } else { "s" }
            ));
        }
        if self.is_empty() {
            parts.push("no issues found".to_string());
        }
        parts.join(", ")
    }
}

/// Check a tagged manuscript for markup issues
pub fn check_document(input: &str, options: &TableOptions) -> CheckResult {
    let mut result = CheckResult::new();

    check_lines(input, &mut result);

    let tables = parse_tables(input, options.keep_dividers);
    result.tables = tables.len();

    for spec in &tables {
        if spec.is_empty() {
            result.add(
                Diagnostic::new(DiagnosticLevel::Warning, "table has no cells")
                    .with_table(&spec.name),
            );
            continue;
        }

        let reconstructed = reconstruct_table(spec, options);
        for warning in reconstructed.warnings {
            let mut diag = Diagnostic::new(DiagnosticLevel::Warning, warning.message)
                .with_table(&spec.name);
            if let Some(suggestion) = warning.suggestion {
                diag = diag.with_suggestion(suggestion);
            }
            result.add(diag);
        }
        let Some(table) = reconstructed.value else {
            continue;
        };

        let authored = table.rows.len();
        let placed_rows = table.placed.grid.row_count();
        if placed_rows > authored {
            result.add(
                Diagnostic::new(
                    DiagnosticLevel::Warning,
                    format!(
                        "rowspan reaches row {} but only {} row{} authored",
                        placed_rows,
                        authored,
                        if authored == 1 { " is" } else { "s are" }
                    ),
                )
                .with_table(&table.name),
            );
        }

        let width = table.placed.grid.col_count();
        for r in 1..=placed_rows {
            if table.placed.is_divider(r) {
                continue;
            }
            let covered = table.placed.grid.row(r).len();
            if covered != width {
                result.add(
                    Diagnostic::new(
                        DiagnosticLevel::Info,
                        format!("grid row {} covers {} of {} columns", r, covered, width),
                    )
                    .with_table(&table.name),
                );
            }
        }
    }

    result
}

/// Line-level checks that need input positions
fn check_lines(input: &str, result: &mut CheckResult) {
    let mut in_table = false;

    for (idx, raw) in input.lines().enumerate() {
        let line_no = idx + 1;
        match classify_line(raw) {
            LineKind::TableStart(_) => in_table = true,
            LineKind::Cell { tag, .. } => {
                if !in_table {
                    result.add(
                        Diagnostic::new(DiagnosticLevel::Warning, "cell outside of any table")
                            .with_line(line_no)
                            .with_source(raw.trim())
                            .with_suggestion("add a table-start line before it or remove it"),
                    );
                }
                if tag.contains(['＝', '=']) && !SPAN_MARKER.is_match(tag) {
                    result.add(
                        Diagnostic::new(
                            DiagnosticLevel::Warning,
                            "unrecognized span marker, cell treated as 1x1",
                        )
                        .with_line(line_no)
                        .with_source(raw.trim())
                        .with_suggestion("expected ＝C<rows>_C<cols>"),
                    );
                }
            }
            LineKind::Caption(_) | LineKind::RowSeparator | LineKind::Ignored => {}
        }
    }
}

/// Format check results for terminal output
pub fn format_diagnostics(result: &CheckResult, use_color: bool) -> String {
    let mut output = String::new();

    for diag in &result.diagnostics {
        if use_color {
            let color = match diag.level {
                DiagnosticLevel::Error => "\x1b[31m",   // Red
                DiagnosticLevel::Warning => "\x1b[33m", // Yellow
                DiagnosticLevel::Info => "\x1b[34m",    // Blue
            };
            output.push_str(color);
            output.push_str(&format!("{}", diag));
            output.push_str("\x1b[0m\n\n");
        } else {
            output.push_str(&format!("{}\n\n", diag));
        }
    }

    if use_color {
        if result.has_errors() {
            output.push_str("\x1b[31m");
        } else if result.warnings > 0 {
            output.push_str("\x1b[33m");
        } else {
            output.push_str("\x1b[32m");
        }
    }

    output.push_str(&format!("Summary: {}", result.summary()));

    if use_color {
        output.push_str("\x1b[0m");
    }

    output
}
