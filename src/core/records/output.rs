//! Output document model

use indexmap::IndexMap;
use serde::Serialize;

/// One data row: column key to value, or a preserved divider
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Record {
    Values(IndexMap<String, String>),
    Divider { divider: bool },
}

impl Record {
    pub fn divider() -> Self {
        Record::Divider { divider: true }
    }

    pub fn is_divider(&self) -> bool {
        matches!(self, Record::Divider { .. })
    }

    /// Value under `key`, if this is a value record carrying it
    pub fn get(&self, key: &str) -> Option<&str> {
        match self {
            Record::Values(values) => values.get(key).map(String::as_str),
            Record::Divider { .. } => None,
        }
    }
}

/// Schema entry for one logical column
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ColumnOutput {
    pub path: Vec<String>,
    pub key: String,
}

/// Records sharing one classification label
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecordGroup {
    pub label: String,
    pub rows: Vec<Record>,
}

impl RecordGroup {
    pub fn new(label: String, rows: Vec<Record>) -> Self {
        RecordGroup { label, rows }
    }
}

/// Flat `rows` or nested `groups`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum TableBody {
    #[serde(rename = "rows")]
    Rows(Vec<Record>),
    #[serde(rename = "groups")]
    Groups(Vec<RecordGroup>),
}

/// One reconstructed table
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TableOutput {
    pub id: String,
    pub name: String,
    /// Absent for tables without any cells
    #[serde(skip_serializing_if = "Option::is_none")]
    pub header_depth: Option<usize>,
    pub columns: Vec<ColumnOutput>,
    #[serde(flatten)]
    pub body: TableBody,
}

impl TableOutput {
    /// Output for a table that has no cells at all
    pub fn empty(id: impl Into<String>, name: impl Into<String>) -> Self {
        TableOutput {
            id: id.into(),
            name: name.into(),
            header_depth: None,
            columns: Vec::new(),
            body: TableBody::Rows(Vec::new()),
        }
    }

    /// Flat records, or `None` when the table is grouped
    pub fn rows(&self) -> Option<&[Record]> {
        match &self.body {
            TableBody::Rows(rows) => Some(rows),
            TableBody::Groups(_) => None,
        }
    }

    /// Record groups, or `None` when the table is flat
    pub fn groups(&self) -> Option<&[RecordGroup]> {
        match &self.body {
            TableBody::Groups(groups) => Some(groups),
            TableBody::Rows(_) => None,
        }
    }
}

/// The whole output: every table in document order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TableDocument {
    pub tables: Vec<TableOutput>,
}

impl TableDocument {
    /// Pretty-printed JSON with non-ASCII text kept as is
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
