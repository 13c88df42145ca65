//! Grid reconstruction
//!
//! Places authored cells into a 2D grid and derives a column schema from
//! the header rows:
//!
//! ```text
//! TableSpec rows -> place_cells -> Grid + Merges -> label grid
//!                -> header paths -> logical columns (path, key, range)
//! ```
//!
//! # Example
//!
//! ```
//! use tagtable::core::grid::{build_logical_columns, label_grid, place_cells};
//! use tagtable::core::segment::{CellSpec, RowSpec};
//!
//! let rows = vec![
//!     RowSpec::new(vec![CellSpec::with_span("血清脂質", 1, 2)]),
//!     RowSpec::new(vec![CellSpec::new("C"), CellSpec::new("TG")]),
//! ];
//! let placed = place_cells(&rows);
//! let labels = label_grid(&placed.grid, &placed.merges);
//! let columns = build_logical_columns(&labels, 2);
//! assert_eq!(columns[0].key, "血清脂質|C");
//! assert_eq!(columns[1].key, "血清脂質|TG");
//! ```

mod columns;
mod header;
mod placement;

#[cfg(test)]
mod tests;

// Re-export public API
pub use columns::{assign_unique_keys, build_logical_columns, LogicalColumn};
pub use header::{header_path, infer_header_depth, label_grid, resolve_header_depth};
pub use placement::{merges_are_disjoint, place_cells, CellAnchor, Grid, Merge, PlacedGrid};
