//! Table segmenter: classified lines in, table specs out

use super::cell::{normalize_content, CellSpec};
use super::line::{classify_line, LineKind};
use crate::data::patterns::TABLE_MARKER;

/// One authored row, cells in left-to-right order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RowSpec {
    pub cells: Vec<CellSpec>,
}

impl RowSpec {
    pub fn new(cells: Vec<CellSpec>) -> Self {
        RowSpec { cells }
    }

    /// A row with no cells, kept only when dividers are preserved
    pub fn is_divider(&self) -> bool {
        self.cells.is_empty()
    }
}

/// A table as authored: id, display name and rows of cell specs
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableSpec {
    /// Inner text of the table-start marker
    pub id: String,
    /// Caption text when it names a table, otherwise the id
    pub name: String,
    pub rows: Vec<RowSpec>,
}

impl TableSpec {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        TableSpec {
            id: id.into(),
            name: name.into(),
            rows: Vec::new(),
        }
    }

    /// Rows that carry at least one cell
    pub fn non_empty_rows(&self) -> impl Iterator<Item = &RowSpec> {
        self.rows.iter().filter(|row| !row.is_divider())
    }

    pub fn is_empty(&self) -> bool {
        self.non_empty_rows().next().is_none()
    }
}

/// Segmenter state threaded through the input lines
///
/// Holds the most recent caption, the table being built and the row being
/// accumulated. Each call to [`TableSegmenter::push_line`] is one state
/// transition and yields the table it closed, if any.
#[derive(Debug, Default)]
pub struct TableSegmenter {
    keep_dividers: bool,
    current_caption: Option<String>,
    current_table: Option<TableSpec>,
    current_row: Vec<CellSpec>,
}

impl TableSegmenter {
    pub fn new(keep_dividers: bool) -> Self {
        TableSegmenter {
            keep_dividers,
            ..Default::default()
        }
    }

    /// Feed one raw line; returns a finished table when a new one starts
    pub fn push_line(&mut self, line: &str) -> Option<TableSpec> {
        match classify_line(line) {
            LineKind::Caption(text) => {
                self.current_caption = Some(normalize_content(text));
                None
            }
            LineKind::TableStart(id) => {
                let finished = self.flush_table();
                let name = match self.current_caption {
                    Some(ref caption) if caption.contains(TABLE_MARKER) => caption.as_str(),
                    _ => id,
                };
                self.current_table = Some(TableSpec::new(id, sanitize_name(name)));
                finished
            }
            LineKind::RowSeparator => {
                self.flush_row();
                None
            }
            LineKind::Cell { tag, content } => {
                if self.current_table.is_some() {
                    self.current_row.push(CellSpec::parse(tag, content));
                }
                None
            }
            LineKind::Ignored => None,
        }
    }

    /// Close the open row and table at end of input
    pub fn finish(mut self) -> Option<TableSpec> {
        self.flush_table()
    }

    fn flush_row(&mut self) {
        let cells = std::mem::take(&mut self.current_row);
        if let Some(table) = self.current_table.as_mut() {
            if !cells.is_empty() || self.keep_dividers {
                table.rows.push(RowSpec::new(cells));
            }
        }
    }

    fn flush_table(&mut self) -> Option<TableSpec> {
        self.flush_row();
        self.current_table.take()
    }
}

/// Split a whole document into tables, in table-start order
pub fn parse_tables(text: &str, keep_dividers: bool) -> Vec<TableSpec> {
    let mut segmenter = TableSegmenter::new(keep_dividers);
    let mut tables: Vec<TableSpec> = text
        .lines()
        .filter(|line| !line.trim().is_empty())
        .filter_map(|line| segmenter.push_line(line))
        .collect();
    tables.extend(segmenter.finish());

    log::debug!("segmented {} table(s)", tables.len());
    tables
}

/// Replace characters that table names may not carry
///
/// `:` becomes the full-width `：`; `\ / * ? [ ]` become spaces.
pub fn sanitize_name(name: &str) -> String {
    name.chars()
        .map(|c| match c {
            ':' => '：',
            '\\' | '/' | '*' | '?' | '[' | ']' => ' ',
            other => other,
        })
        .collect()
}
