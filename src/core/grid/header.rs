//! Header depth inference and per-column header paths

use super::placement::{Grid, Merge};
use crate::core::options::{HeaderDepth, TableOptions};
use crate::core::segment::RowSpec;
use crate::data::patterns::{CLASSIFICATION_LABEL, MAX_SPAN};

/// Infer the header depth from a table's authored rows
///
/// The depth is the largest rowspan in the first non-empty row, at least 1.
/// With `classification_bump`, one more row is counted when the row right
/// after the header opens with a "分類" cell.
pub fn infer_header_depth(rows: &[RowSpec], classification_bump: bool) -> usize {
    let mut non_empty = rows.iter().filter(|row| !row.is_divider());
    let Some(first) = non_empty.next() else {
        return 1;
    };

    let depth = first
        .cells
        .iter()
        .map(|cell| if cell.rowspan > MAX_SPAN { 1 } else { cell.rowspan })
        .max()
        .unwrap_or(1)
        .max(1);

    if classification_bump {
        // `first` was already consumed, so the next header row is depth - 1 away
        let opens_with_classification = non_empty
            .nth(depth - 1)
            .and_then(|row| row.cells.first())
            .map(|cell| {
                cell.value
                    .chars()
                    .filter(|c| *c != ' ' && *c != '\u{3000}')
                    .collect::<String>()
                    .contains(CLASSIFICATION_LABEL)
            })
            .unwrap_or(false);
        if opens_with_classification {
            return depth + 1;
        }
    }

    depth
}

/// Header depth for one table under the given options
pub fn resolve_header_depth(rows: &[RowSpec], options: &TableOptions) -> usize {
    match options.header_depth {
        HeaderDepth::Fixed(depth) => depth.max(1),
        HeaderDepth::Auto => infer_header_depth(rows, options.classification_row_header_bump),
    }
}

/// Grid with every merge filled from its top-left label
///
/// Only used to derive header paths and classification labels.
pub fn label_grid(grid: &Grid, merges: &[Merge]) -> Grid {
    grid.fill_merges(merges)
}

/// Header path of one 1-based column
///
/// Reads the first `header_depth` rows top to bottom and keeps each
/// non-empty label that differs from the one kept just before it. A column
/// with no labels gets the synthetic path `col<N>`.
pub fn header_path(labels: &Grid, col: usize, header_depth: usize) -> Vec<String> {
    let mut path: Vec<String> = Vec::new();
    for row in 1..=header_depth {
        let label = labels.get(row, col).trim();
        if label.is_empty() || path.last().map(String::as_str) == Some(label) {
            continue;
        }
        path.push(label.to_string());
    }

    if path.is_empty() {
        path.push(format!("col{}", col));
    }
    path
}
