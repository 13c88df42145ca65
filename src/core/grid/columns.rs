//! Logical columns: contiguous same-path grid columns, with unique keys

use fxhash::{FxHashMap, FxHashSet};

use super::header::header_path;
use super::placement::Grid;
use crate::data::patterns::KEY_SEPARATOR;

/// One output field backed by a run of grid columns
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogicalColumn {
    /// Header labels from top to bottom
    pub path: Vec<String>,
    /// Path joined by `|`, suffixed `_2`, `_3`, ... on collision
    pub key: String,
    /// 1-based inclusive grid column range; `None` for the synthetic
    /// classification column
    pub col_range: Option<(usize, usize)>,
}

impl LogicalColumn {
    pub fn new(path: Vec<String>, start: usize, end: usize) -> Self {
        let key = path.join(KEY_SEPARATOR);
        LogicalColumn {
            path,
            key,
            col_range: Some((start, end)),
        }
    }

    /// Column holding classification labels, not backed by the grid
    pub fn classification(group_key: &str) -> Self {
        LogicalColumn {
            path: vec![group_key.to_string()],
            key: group_key.to_string(),
            col_range: None,
        }
    }
}

/// Group adjacent columns with identical header paths
///
/// The returned ranges cover `1..=labels.col_count()` left to right with no
/// gaps. Equal paths that are not adjacent stay separate columns.
pub fn build_logical_columns(labels: &Grid, header_depth: usize) -> Vec<LogicalColumn> {
    let col_count = labels.col_count();
    let mut columns: Vec<LogicalColumn> = Vec::new();

    let mut col = 1;
    while col <= col_count {
        let path = header_path(labels, col, header_depth);
        let start = col;
        while col < col_count && header_path(labels, col + 1, header_depth) == path {
            col += 1;
        }
        columns.push(LogicalColumn::new(path, start, col));
        col += 1;
    }

    assign_unique_keys(&mut columns);
    columns
}

/// Make keys unique in column order
///
/// The first column with a given path keeps the bare key; later ones get
/// `_2`, `_3`, ... The counter skips values already taken by other keys.
pub fn assign_unique_keys(columns: &mut [LogicalColumn]) {
    let mut counts: FxHashMap<String, usize> = FxHashMap::default();
    let mut used: FxHashSet<String> = FxHashSet::default();

    for column in columns.iter_mut() {
        let base = column.path.join(KEY_SEPARATOR);
        let seen = counts.entry(base.clone()).or_insert(0);
        *seen += 1;

        let mut key = if *seen == 1 {
            base.clone()
        } else {
            format!("{}_{}", base, seen)
        };
        while used.contains(&key) {
            *seen += 1;
            key = format!("{}_{}", base, seen);
        }

        used.insert(key.clone());
        column.key = key;
    }
}
