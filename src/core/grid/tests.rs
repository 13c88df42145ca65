//! Regression tests for grid placement and column derivation

use super::*;
use crate::core::options::{HeaderDepth, TableOptions};
use crate::core::segment::{CellSpec, RowSpec};
use pretty_assertions::assert_eq;

fn row(cells: Vec<CellSpec>) -> RowSpec {
    RowSpec::new(cells)
}

fn cell(v: &str) -> CellSpec {
    CellSpec::new(v)
}

fn span(v: &str, rowspan: usize, colspan: usize) -> CellSpec {
    CellSpec::with_span(v, rowspan, colspan)
}

fn grid_rows(grid: &Grid) -> Vec<Vec<&str>> {
    grid.rows()
        .iter()
        .map(|r| r.iter().map(String::as_str).collect())
        .collect()
}

/// Every merge lies inside the grid and no two share a slot
fn assert_merges_consistent(placed: &PlacedGrid) {
    assert!(merges_are_disjoint(&placed.merges));
    for m in &placed.merges {
        assert!(m.r1 <= m.r2 && m.c1 <= m.c2);
        assert!(m.r2 <= placed.grid.row_count());
        for r in m.r1..=m.r2 {
            assert!(m.c2 <= placed.grid.row(r).len(), "merge {:?} exceeds row {}", m, r);
        }
    }
}

/// Column ranges partition 1..=max_col in order
fn assert_partition(columns: &[LogicalColumn], col_count: usize) {
    let mut next = 1;
    for column in columns {
        let (start, end) = column.col_range.unwrap();
        assert_eq!(start, next);
        assert!(end >= start);
        next = end + 1;
    }
    assert_eq!(next, col_count + 1);
}

#[test]
fn test_basic_placement() {
    let rows = vec![
        row(vec![cell("A"), cell("B")]),
        row(vec![cell("1"), cell("2")]),
    ];
    let placed = place_cells(&rows);
    assert_eq!(grid_rows(&placed.grid), vec![vec!["A", "B"], vec!["1", "2"]]);
    assert!(placed.merges.is_empty());
    assert_eq!(placed.anchors.len(), 4);
}

#[test]
fn test_rowspan_skips_covered_column() {
    // X spans two rows; Z in the second row must land in column 2
    let rows = vec![
        row(vec![span("X", 2, 1), cell("Y")]),
        row(vec![cell("Z")]),
        row(vec![cell("W")]),
    ];
    let placed = place_cells(&rows);

    assert_eq!(
        grid_rows(&placed.grid),
        vec![vec!["X", "Y"], vec!["", "Z"], vec!["W"]]
    );
    assert_eq!(placed.merges, vec![Merge::new(1, 1, 2, 1)]);
    assert_eq!(
        placed.anchors.get(&(1, 1)),
        Some(&CellAnchor {
            rowspan: 2,
            colspan: 1,
            header_hint: true
        })
    );
    assert_merges_consistent(&placed);
}

#[test]
fn test_two_level_header() {
    // LDL | 血清脂質 (C, TG) | 判定
    let rows = vec![
        row(vec![span("LDL", 2, 1), span("血清脂質", 1, 2), span("判定", 2, 1)]),
        row(vec![cell("C"), cell("TG")]),
        row(vec![cell("140以上"), cell("→"), cell("↑"), cell("高")]),
    ];
    let placed = place_cells(&rows);
    assert_eq!(
        grid_rows(&placed.grid),
        vec![
            vec!["LDL", "血清脂質", "", "判定"],
            vec!["", "C", "TG", ""],
            vec!["140以上", "→", "↑", "高"],
        ]
    );
    assert_merges_consistent(&placed);

    let labels = label_grid(&placed.grid, &placed.merges);
    assert_eq!(
        grid_rows(&labels)[..2].to_vec(),
        vec![
            vec!["LDL", "血清脂質", "血清脂質", "判定"],
            vec!["LDL", "C", "TG", "判定"],
        ]
    );

    let columns = build_logical_columns(&labels, 2);
    let keys: Vec<&str> = columns.iter().map(|c| c.key.as_str()).collect();
    assert_eq!(keys, vec!["LDL", "血清脂質|C", "血清脂質|TG", "判定"]);
    assert_eq!(columns[0].path, vec!["LDL"]);
    assert_partition(&columns, 4);
}

#[test]
fn test_colspan_clipped_against_earlier_rowspan() {
    // B covers (1..2, 2); C asks for two columns at row 2 but only one is free
    let rows = vec![
        row(vec![cell("A"), span("B", 2, 1), cell("D")]),
        row(vec![span("C", 1, 2), cell("E")]),
    ];
    let placed = place_cells(&rows);

    assert_eq!(placed.clipped, vec![(2, 1)]);
    assert_eq!(placed.merges, vec![Merge::new(1, 2, 2, 2)]);
    assert_eq!(grid_rows(&placed.grid)[1], vec!["C", "", "E"]);
    assert_merges_consistent(&placed);
}

#[test]
fn test_oversized_spans_are_placed_as_one() {
    let huge = CellSpec::parse(r#"<"G＝C18446744073709551615_C1"#, "X");
    let tall = CellSpec::parse(r#"<"G＝C100000000_C2"#, "Y");
    let raw = CellSpec {
        rowspan: usize::MAX,
        colspan: usize::MAX,
        ..CellSpec::new("Z")
    };
    let rows = vec![row(vec![huge, tall, raw]), row(vec![cell("a")])];
    let placed = place_cells(&rows);

    assert_eq!(placed.oversized, vec![(1, 1), (1, 2), (1, 4)]);
    assert_eq!(placed.merges, vec![Merge::new(1, 2, 1, 3)]);
    assert_eq!(placed.grid.row_count(), 2);
    assert_eq!(grid_rows(&placed.grid)[0], vec!["X", "Y", "", "Z"]);
    assert_eq!(infer_header_depth(&rows, false), 1);
    assert_merges_consistent(&placed);
}

#[test]
fn test_rowspan_beyond_last_row_extends_grid() {
    let rows = vec![row(vec![span("A", 3, 2)])];
    let placed = place_cells(&rows);
    assert_eq!(placed.grid.row_count(), 3);
    assert_eq!(placed.merges, vec![Merge::new(1, 1, 3, 2)]);
    assert_merges_consistent(&placed);
}

#[test]
fn test_divider_rows_hold_a_grid_row() {
    let rows = vec![row(vec![cell("H")]), RowSpec::default(), row(vec![cell("v")])];
    let placed = place_cells(&rows);
    assert_eq!(placed.grid.row_count(), 3);
    assert!(placed.is_divider(2));
    assert!(!placed.is_divider(3));
    assert_eq!(placed.grid.get(3, 1), "v");
}

#[test]
fn test_out_of_range_reads_are_empty() {
    let placed = place_cells(&[row(vec![cell("A")])]);
    assert_eq!(placed.grid.get(1, 5), "");
    assert_eq!(placed.grid.get(9, 1), "");
    assert_eq!(placed.grid.get(0, 0), "");
    assert!(placed.grid.row(4).is_empty());
}

#[test]
fn test_ragged_irregular_markup_stays_consistent() {
    let rows = vec![
        row(vec![span("a", 3, 1), span("b", 1, 3), span("c", 2, 2)]),
        row(vec![span("d", 2, 2), cell("e"), span("f", 1, 4)]),
        row(vec![span("g", 1, 5), cell("h")]),
        row(vec![cell("i"), span("j", 2, 3)]),
    ];
    let placed = place_cells(&rows);
    assert_merges_consistent(&placed);
}

#[test]
fn test_header_path_collapses_repeats() {
    let labels = Grid::from_rows(vec![
        vec!["A".into(), "A".into()],
        vec!["A".into(), "".into()],
        vec!["B".into(), "A".into()],
    ]);
    assert_eq!(header_path(&labels, 1, 3), vec!["A", "B"]);
    // an empty label between two equal labels does not split them
    assert_eq!(header_path(&labels, 2, 3), vec!["A"]);
    assert_eq!(header_path(&labels, 3, 3), vec!["col3"]);
}

#[test]
fn test_header_path_beyond_grid_rows() {
    let labels = Grid::from_rows(vec![vec!["A".into()]]);
    assert_eq!(header_path(&labels, 1, 5), vec!["A"]);
}

#[test]
fn test_adjacent_identical_paths_coalesce() {
    let labels = Grid::from_rows(vec![vec![
        "X".into(),
        "X".into(),
        "Y".into(),
        "X".into(),
    ]]);
    let columns = build_logical_columns(&labels, 1);
    assert_eq!(columns.len(), 3);
    assert_eq!(columns[0].col_range, Some((1, 2)));
    assert_eq!(columns[1].col_range, Some((3, 3)));
    assert_eq!(columns[2].col_range, Some((4, 4)));
    assert_eq!(columns[2].key, "X_2");
    assert_partition(&columns, 4);
}

#[test]
fn test_keys_unique_when_suffix_already_taken() {
    let labels = Grid::from_rows(vec![vec![
        "A".into(),
        "B".into(),
        "A_2".into(),
        "C".into(),
        "A".into(),
    ]]);
    let columns = build_logical_columns(&labels, 1);
    let keys: Vec<&str> = columns.iter().map(|c| c.key.as_str()).collect();
    assert_eq!(keys, vec!["A", "B", "A_2", "C", "A_3"]);
}

#[test]
fn test_empty_grid_has_no_columns() {
    assert!(build_logical_columns(&Grid::new(), 1).is_empty());
}

#[test]
fn test_infer_header_depth() {
    let rows = vec![
        row(vec![span("a", 2, 1), span("b", 1, 2), span("c", 3, 1)]),
        row(vec![cell("x")]),
    ];
    assert_eq!(infer_header_depth(&rows, false), 3);
    assert_eq!(infer_header_depth(&[], false), 1);
    assert_eq!(infer_header_depth(&[RowSpec::default()], false), 1);
}

#[test]
fn test_infer_header_depth_skips_leading_dividers() {
    let rows = vec![RowSpec::default(), row(vec![span("a", 2, 1)])];
    assert_eq!(infer_header_depth(&rows, false), 2);
}

#[test]
fn test_classification_header_bump() {
    let rows = vec![
        row(vec![span("項目", 2, 1), span("値", 1, 2)]),
        row(vec![cell("上限"), cell("下限")]),
        row(vec![cell("分　類 A")]),
        row(vec![cell("x")]),
    ];
    assert_eq!(infer_header_depth(&rows, false), 2);
    assert_eq!(infer_header_depth(&rows, true), 3);

    let options = TableOptions {
        classification_row_header_bump: true,
        ..Default::default()
    };
    assert_eq!(resolve_header_depth(&rows, &options), 3);
}

#[test]
fn test_fixed_header_depth_wins() {
    let rows = vec![row(vec![span("a", 4, 1)])];
    let options = TableOptions {
        header_depth: HeaderDepth::Fixed(1),
        ..Default::default()
    };
    assert_eq!(resolve_header_depth(&rows, &options), 1);
}
