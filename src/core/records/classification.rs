//! Classification spans: vertical single-column merges below the header

use super::output::{Record, RecordGroup};
use crate::core::grid::{Grid, Merge};

/// Rows `r1..=r2` (1-based grid rows) grouped under one label
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassificationSpan {
    pub label: String,
    pub r1: usize,
    pub r2: usize,
}

impl ClassificationSpan {
    pub fn contains(&self, row: usize) -> bool {
        (self.r1..=self.r2).contains(&row)
    }
}

/// Find classification spans in `target_col`
///
/// A span is a merge exactly one column wide, at least two rows tall,
/// starting strictly below the header rows. Its label is read from the
/// label grid at the merge's top-left slot.
pub fn detect_classification_spans(
    merges: &[Merge],
    labels: &Grid,
    header_depth: usize,
    target_col: usize,
) -> Vec<ClassificationSpan> {
    merges
        .iter()
        .filter(|m| m.is_vertical_strip() && m.c1 == target_col && m.r1 > header_depth)
        .map(|m| ClassificationSpan {
            label: labels.get(m.r1, m.c1).to_string(),
            r1: m.r1,
            r2: m.r2,
        })
        .collect()
}

/// Label of the span covering `row`, or `""` outside every span
pub fn classification_for_row(row: usize, spans: &[ClassificationSpan]) -> &str {
    spans
        .iter()
        .find(|span| span.contains(row))
        .map_or("", |span| span.label.as_str())
}

/// Partition records by span, in span order
///
/// Records outside every span form a leading group with an empty label,
/// omitted when there are none. Spans covering no record are dropped.
pub fn group_records(rows: &[(usize, Record)], spans: &[ClassificationSpan]) -> Vec<RecordGroup> {
    let mut groups: Vec<RecordGroup> = spans
        .iter()
        .filter_map(|span| {
            let members: Vec<Record> = rows
                .iter()
                .filter(|(r, _)| span.contains(*r))
                .map(|(_, record)| record.clone())
                .collect();
            (!members.is_empty()).then(|| RecordGroup::new(span.label.clone(), members))
        })
        .collect();

    let ungrouped: Vec<Record> = rows
        .iter()
        .filter(|(r, _)| !spans.iter().any(|span| span.contains(*r)))
        .map(|(_, record)| record.clone())
        .collect();
    if !ungrouped.is_empty() {
        groups.insert(0, RecordGroup::new(String::new(), ungrouped));
    }

    groups
}
