//! Per-row value extraction across logical column ranges

use std::fmt;
use std::str::FromStr;

use indexmap::IndexMap;
use serde::Deserialize;

use super::classification::{classification_for_row, ClassificationSpan};
use super::output::Record;
use crate::core::grid::{LogicalColumn, PlacedGrid};
use crate::utils::error::ConversionError;

/// How the cells under one logical column combine into one value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
pub enum ValuePolicy {
    /// First non-blank value
    #[serde(rename = "first_nonempty")]
    FirstNonEmpty,
    /// Last non-blank value
    #[serde(rename = "last_nonempty")]
    LastNonEmpty,
    /// All non-blank values joined by the configured separator
    #[default]
    #[serde(rename = "concat")]
    Concat,
}

impl ValuePolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            ValuePolicy::FirstNonEmpty => "first_nonempty",
            ValuePolicy::LastNonEmpty => "last_nonempty",
            ValuePolicy::Concat => "concat",
        }
    }
}

impl fmt::Display for ValuePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ValuePolicy {
    type Err = ConversionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "first_nonempty" => Ok(ValuePolicy::FirstNonEmpty),
            "last_nonempty" => Ok(ValuePolicy::LastNonEmpty),
            "concat" => Ok(ValuePolicy::Concat),
            other => Err(ConversionError::invalid(format!(
                "unknown value policy '{}' (expected first_nonempty, last_nonempty or concat)",
                other
            ))),
        }
    }
}

/// Combine the values of `row_cells` over a 1-based inclusive column range
///
/// Blank and whitespace-only values are discarded first; columns past the
/// end of the row count as blank.
pub fn extract_value(
    row_cells: &[String],
    col_range: (usize, usize),
    policy: ValuePolicy,
    separator: &str,
) -> String {
    let (start, end) = col_range;
    let mut values = (start..=end)
        .filter_map(|c| c.checked_sub(1).and_then(|idx| row_cells.get(idx)))
        .map(String::as_str)
        .filter(|v| !v.trim().is_empty());

    match policy {
        ValuePolicy::FirstNonEmpty => values.next().unwrap_or_default().to_string(),
        ValuePolicy::LastNonEmpty => values.last().unwrap_or_default().to_string(),
        ValuePolicy::Concat => values.collect::<Vec<_>>().join(separator),
    }
}

/// Settings the row materializer needs from the table options
#[derive(Debug, Clone, Copy)]
pub struct ExtractSettings<'a> {
    pub policy: ValuePolicy,
    pub separator: &'a str,
    pub keep_dividers: bool,
}

/// One record per grid row below the header, tagged with its grid row
///
/// Synthetic columns take the classification label of their row; divider
/// rows become `{"divider": true}` when dividers are kept.
pub fn materialize_rows(
    placed: &PlacedGrid,
    columns: &[LogicalColumn],
    header_depth: usize,
    spans: &[ClassificationSpan],
    settings: ExtractSettings<'_>,
) -> Vec<(usize, Record)> {
    let row_count = placed.grid.row_count();
    (header_depth + 1..=row_count)
        .map(|r| {
            if settings.keep_dividers && placed.is_divider(r) {
                return (r, Record::divider());
            }

            let cells = placed.grid.row(r);
            let values: IndexMap<String, String> = columns
                .iter()
                .map(|column| {
                    let value = match column.col_range {
                        Some(range) => {
                            extract_value(cells, range, settings.policy, settings.separator)
                        }
                        None => classification_for_row(r, spans).to_string(),
                    };
                    (column.key.clone(), value)
                })
                .collect();
            (r, Record::Values(values))
        })
        .collect()
}
