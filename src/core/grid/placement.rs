//! Span-aware cell placement with occupancy tracking

use fxhash::FxHashSet;
use indexmap::IndexMap;

use crate::core::segment::RowSpec;
use crate::data::patterns::MAX_SPAN;

/// Dense grid of display strings, addressed 1-based
///
/// Rows may have different lengths; reads past a row's end yield `""`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Grid {
    rows: Vec<Vec<String>>,
}

impl Grid {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a grid from 0-based rows
    pub fn from_rows(rows: Vec<Vec<String>>) -> Self {
        Grid { rows }
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Width of the widest row
    pub fn col_count(&self) -> usize {
        self.rows.iter().map(Vec::len).max().unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Value at `(row, col)`, or `""` outside the populated area
    pub fn get(&self, row: usize, col: usize) -> &str {
        if row == 0 || col == 0 {
            return "";
        }
        self.rows
            .get(row - 1)
            .and_then(|r| r.get(col - 1))
            .map_or("", String::as_str)
    }

    /// Populated values of one row (empty slice outside the grid)
    pub fn row(&self, row: usize) -> &[String] {
        if row == 0 {
            return &[];
        }
        self.rows.get(row - 1).map(Vec::as_slice).unwrap_or(&[])
    }

    /// All rows, 0-based
    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    /// Grow to at least `row` rows and make that row at least `len` long
    fn ensure(&mut self, row: usize, len: usize) {
        if self.rows.len() < row {
            self.rows.resize_with(row, Vec::new);
        }
        let cells = &mut self.rows[row - 1];
        if cells.len() < len {
            cells.resize(len, String::new());
        }
    }

    fn set(&mut self, row: usize, col: usize, value: &str) {
        self.ensure(row, col);
        self.rows[row - 1][col - 1] = value.to_string();
    }

    /// Copy with every merge rectangle flood-filled from its top-left value
    pub fn fill_merges(&self, merges: &[Merge]) -> Grid {
        let mut filled = self.clone();
        for merge in merges {
            let label = self.get(merge.r1, merge.c1).to_string();
            for r in merge.r1..=merge.r2 {
                filled.ensure(r, merge.c2);
                for c in merge.c1..=merge.c2 {
                    filled.rows[r - 1][c - 1] = label.clone();
                }
            }
        }
        filled
    }
}

/// Merged rectangle, 1-based and inclusive
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Merge {
    pub r1: usize,
    pub c1: usize,
    pub r2: usize,
    pub c2: usize,
}

impl Merge {
    pub fn new(r1: usize, c1: usize, r2: usize, c2: usize) -> Self {
        Merge { r1, c1, r2, c2 }
    }

    pub fn overlaps(&self, other: &Merge) -> bool {
        self.r1 <= other.r2 && other.r1 <= self.r2 && self.c1 <= other.c2 && other.c1 <= self.c2
    }

    /// One column wide and more than one row tall
    pub fn is_vertical_strip(&self) -> bool {
        self.c1 == self.c2 && self.r2 > self.r1
    }
}

/// Span metadata recorded at a placed cell's top-left slot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellAnchor {
    pub rowspan: usize,
    pub colspan: usize,
    pub header_hint: bool,
}

/// Result of placing one table's rows
#[derive(Debug, Clone, Default)]
pub struct PlacedGrid {
    pub grid: Grid,
    pub merges: Vec<Merge>,
    /// Top-left `(row, col)` of every placed cell, in placement order
    pub anchors: IndexMap<(usize, usize), CellAnchor>,
    /// Grid rows that came from cell-less divider rows
    pub dividers: FxHashSet<usize>,
    /// Cells whose colspan ran into an occupied slot and was cut short
    pub clipped: Vec<(usize, usize)>,
    /// Cells whose declared span exceeded [`MAX_SPAN`] and was placed as 1
    pub oversized: Vec<(usize, usize)>,
}

impl PlacedGrid {
    pub fn is_divider(&self, row: usize) -> bool {
        self.dividers.contains(&row)
    }
}

/// Slots already covered by a placed cell's span
#[derive(Debug, Default)]
struct Occupancy {
    slots: FxHashSet<(usize, usize)>,
}

impl Occupancy {
    fn is_occupied(&self, row: usize, col: usize) -> bool {
        self.slots.contains(&(row, col))
    }

    fn mark(&mut self, merge: &Merge) {
        for r in merge.r1..=merge.r2 {
            for c in merge.c1..=merge.c2 {
                self.slots.insert((r, c));
            }
        }
    }
}

/// Place every row's cells into a grid, honoring rowspan and colspan
///
/// Each row starts its cursor at column 1; before a cell lands, the cursor
/// skips every slot a taller cell from an earlier row still covers. The
/// placement never looks ahead, so it depends only on authoring order.
pub fn place_cells(rows: &[RowSpec]) -> PlacedGrid {
    let mut placed = PlacedGrid::default();
    let mut occupancy = Occupancy::default();

    for (idx, row) in rows.iter().enumerate() {
        let r = idx + 1;
        if placed.grid.row_count() < r {
            placed.grid.ensure(r, 0);
        }
        if row.is_divider() {
            placed.dividers.insert(r);
            continue;
        }

        let mut c = 1;
        for cell in &row.cells {
            while occupancy.is_occupied(r, c) {
                c += 1;
            }

            let rowspan = bounded(cell.rowspan);
            let requested = bounded(cell.colspan);
            if cell.span_fallback || cell.rowspan > MAX_SPAN || cell.colspan > MAX_SPAN {
                log::warn!(
                    "cell '{}' at ({}, {}) declares a span above {}; placing it as 1",
                    cell.value,
                    r,
                    c,
                    MAX_SPAN
                );
                placed.oversized.push((r, c));
            }

            // A slot free in row r is free in every row below it, so only the
            // width can collide with an earlier span.
            let free_width = (c..c.saturating_add(requested))
                .take_while(|&cc| !occupancy.is_occupied(r, cc))
                .count();
            if free_width < requested {
                log::warn!(
                    "cell '{}' at ({}, {}) spans {} columns but only {} are free; clipping",
                    cell.value,
                    r,
                    c,
                    requested,
                    free_width
                );
                placed.clipped.push((r, c));
            }
            let colspan = free_width;
            let rect = Merge::new(
                r,
                c,
                r.saturating_add(rowspan - 1),
                c.saturating_add(colspan - 1),
            );

            for rr in rect.r1..=rect.r2 {
                placed.grid.ensure(rr, rect.c2);
            }
            placed.grid.set(r, c, &cell.value);
            placed.anchors.insert(
                (r, c),
                CellAnchor {
                    rowspan,
                    colspan,
                    header_hint: cell.header_hint,
                },
            );
            occupancy.mark(&rect);
            if rowspan > 1 || colspan > 1 {
                placed.merges.push(rect);
            }
            c += colspan;
        }
    }

    debug_assert!(merges_are_disjoint(&placed.merges));
    placed
}

/// Span counts outside `1..=MAX_SPAN` are placed as 1
fn bounded(span: usize) -> usize {
    if (1..=MAX_SPAN).contains(&span) {
        span
    } else {
        1
    }
}

/// No two rectangles share a slot
pub fn merges_are_disjoint(merges: &[Merge]) -> bool {
    merges
        .iter()
        .enumerate()
        .all(|(i, a)| merges[i + 1..].iter().all(|b| !a.overlaps(b)))
}
