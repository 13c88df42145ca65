//! Regression tests for record extraction

use super::*;
use crate::core::options::{HeaderDepth, TableOptions};
use crate::core::segment::{parse_tables, TableSpec};
use pretty_assertions::assert_eq;
use serde_json::json;

fn doc(lines: &[&str]) -> String {
    lines.join("\n")
}

fn cells(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| v.to_string()).collect()
}

fn single_table(text: &str, keep_dividers: bool) -> TableSpec {
    let mut tables = parse_tables(text, keep_dividers);
    assert_eq!(tables.len(), 1);
    tables.remove(0)
}

fn keys(output: &TableOutput) -> Vec<&str> {
    output.columns.iter().map(|c| c.key.as_str()).collect()
}

/// Two header rows, a 高値群 span over grid rows 3..=5 and one plain row
fn classified_table() -> TableSpec {
    let text = doc(&[
        r#"<"表1">"#,
        r#"<"行">"#,
        r#"<"G＝C2_C1">区分"#,
        r#"<"G＝C1_C2">検査値"#,
        r#"<"行">"#,
        r#"<"G">LDL"#,
        r#"<"G">HDL"#,
        r#"<"行">"#,
        r#"<"G＝C3_C1">高値群"#,
        r#"<"G">160"#,
        r#"<"G">40"#,
        r#"<"行">"#,
        r#"<"G">170"#,
        r#"<"G">35"#,
        r#"<"行">"#,
        r#"<"G">180"#,
        r#"<"G">30"#,
        r#"<"行">"#,
        r#"<"G">正常"#,
        r#"<"G">120"#,
        r#"<"G">60"#,
    ]);
    single_table(&text, false)
}

// ============================================================================
// Value policies
// ============================================================================

#[test]
fn test_policies_skip_blank_values() {
    let row = cells(&["", "A", " "]);
    for policy in [
        ValuePolicy::FirstNonEmpty,
        ValuePolicy::LastNonEmpty,
        ValuePolicy::Concat,
    ] {
        assert_eq!(extract_value(&row, (1, 3), policy, " / "), "A", "{}", policy);
    }
}

#[test]
fn test_concat_joins_with_separator() {
    let row = cells(&["A", "B"]);
    assert_eq!(extract_value(&row, (1, 2), ValuePolicy::Concat, " / "), "A / B");
    assert_eq!(extract_value(&row, (1, 2), ValuePolicy::Concat, ";"), "A;B");
    assert_eq!(extract_value(&row, (1, 2), ValuePolicy::FirstNonEmpty, " / "), "A");
    assert_eq!(extract_value(&row, (1, 2), ValuePolicy::LastNonEmpty, " / "), "B");
}

#[test]
fn test_range_past_row_end_is_blank() {
    let row = cells(&["A"]);
    assert_eq!(extract_value(&row, (2, 4), ValuePolicy::Concat, " / "), "");
    assert_eq!(extract_value(&[], (1, 1), ValuePolicy::FirstNonEmpty, " / "), "");
}

#[test]
fn test_value_policy_names() {
    assert_eq!("first_nonempty".parse::<ValuePolicy>().unwrap(), ValuePolicy::FirstNonEmpty);
    assert_eq!("last_nonempty".parse::<ValuePolicy>().unwrap(), ValuePolicy::LastNonEmpty);
    assert_eq!("concat".parse::<ValuePolicy>().unwrap(), ValuePolicy::Concat);
    assert!("longest".parse::<ValuePolicy>().is_err());
    assert_eq!(ValuePolicy::LastNonEmpty.to_string(), "last_nonempty");
}

// ============================================================================
// Table outputs
// ============================================================================

#[test]
fn test_rowspan_header_scenario() {
    let text = doc(&[
        r#"<"表1">"#,
        r#"<"行">"#,
        r#"<"G＝C2_C1">X"#,
        r#"<"G">Y"#,
        r#"<"行">"#,
        r#"<"G">Z"#,
        r#"<"行">"#,
        r#"<"G">W"#,
    ]);
    let output = build_table_output(&single_table(&text, false), &TableOptions::default());
    assert!(!output.has_warnings());
    let output = output.value;

    assert_eq!(output.header_depth, Some(2));
    assert_eq!(keys(&output), vec!["X", "Y|Z"]);
    assert_eq!(output.columns[1].path, vec!["Y", "Z"]);

    let rows = output.rows().unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].get("X"), Some("W"));
    assert_eq!(rows[0].get("Y|Z"), Some(""));
}

#[test]
fn test_flat_classification_column() {
    let output = build_table_output(&classified_table(), &TableOptions::flat_classified()).value;

    assert_eq!(keys(&output), vec!["分類", "区分", "検査値|LDL", "検査値|HDL"]);
    assert_eq!(output.columns[0].path, vec!["分類"]);

    let rows = output.rows().unwrap();
    assert_eq!(rows.len(), 4);
    for record in &rows[..3] {
        assert_eq!(record.get("分類"), Some("高値群"));
    }
    assert_eq!(rows[3].get("分類"), Some(""));
    assert_eq!(rows[0].get("区分"), Some("高値群"));
    assert_eq!(rows[1].get("区分"), Some(""));
    assert_eq!(rows[1].get("検査値|LDL"), Some("170"));
    assert_eq!(rows[3].get("区分"), Some("正常"));
}

#[test]
fn test_no_classification_column_without_option() {
    let output = build_table_output(&classified_table(), &TableOptions::default()).value;
    assert_eq!(keys(&output), vec!["区分", "検査値|LDL", "検査値|HDL"]);
    assert_eq!(output.rows().unwrap().len(), 4);
}

#[test]
fn test_classification_key_collision_renames_data_column() {
    let options = TableOptions {
        group_key: "区分".to_string(),
        ..TableOptions::flat_classified()
    };
    let output = build_table_output(&classified_table(), &options).value;
    assert_eq!(keys(&output), vec!["区分", "区分_2", "検査値|LDL", "検査値|HDL"]);

    let rows = output.rows().unwrap();
    assert_eq!(rows[3].get("区分"), Some(""));
    assert_eq!(rows[3].get("区分_2"), Some("正常"));
}

#[test]
fn test_nested_groups() {
    let output = build_table_output(&classified_table(), &TableOptions::grouped()).value;

    assert_eq!(keys(&output), vec!["区分", "検査値|LDL", "検査値|HDL"]);
    assert!(output.rows().is_none());

    let groups = output.groups().unwrap();
    let labels: Vec<&str> = groups.iter().map(|g| g.label.as_str()).collect();
    assert_eq!(labels, vec!["", "高値群"]);
    assert_eq!(groups[0].rows.len(), 1);
    assert_eq!(groups[0].rows[0].get("区分"), Some("正常"));
    assert_eq!(groups[1].rows.len(), 3);
    assert_eq!(groups[1].rows[2].get("検査値|HDL"), Some("30"));
}

#[test]
fn test_nested_without_spans_stays_flat() {
    let text = doc(&[
        r#"<"表1">"#,
        r#"<"行">"#,
        r#"<"G">項目"#,
        r#"<"行">"#,
        r#"<"G">A"#,
    ]);
    let output = build_table_output(&single_table(&text, false), &TableOptions::grouped()).value;
    assert_eq!(keys(&output), vec!["項目"]);
    assert_eq!(output.rows().unwrap().len(), 1);
}

#[test]
fn test_span_at_header_boundary() {
    // The span opens on grid row 3: it is data under depth 2, header under depth 3
    let table = classified_table();

    let options = TableOptions {
        header_depth: HeaderDepth::Fixed(2),
        ..TableOptions::grouped()
    };
    let groups = build_table_output(&table, &options).value;
    let groups = groups.groups().unwrap();
    assert_eq!(groups[1].label, "高値群");
    assert_eq!(groups[1].rows.len(), 3);

    let options = TableOptions {
        header_depth: HeaderDepth::Fixed(3),
        ..TableOptions::grouped()
    };
    let output = build_table_output(&table, &options).value;
    assert!(output.groups().is_none());
    assert_eq!(output.rows().unwrap().len(), 3);
}

#[test]
fn test_grouped_rows_never_include_header_rows() {
    let table = classified_table();
    let reconstructed = reconstruct_table(&table, &TableOptions::grouped())
        .value
        .unwrap();
    assert_eq!(reconstructed.header_depth, 2);
    assert_eq!(
        reconstructed.spans,
        vec![ClassificationSpan {
            label: "高値群".to_string(),
            r1: 3,
            r2: 5,
        }]
    );
    for span in &reconstructed.spans {
        assert!(span.r1 > reconstructed.header_depth);
    }
    assert_eq!(reconstructed.data_row_count(), 4);
}

#[test]
fn test_classification_lookup() {
    let spans = vec![
        ClassificationSpan {
            label: "a".to_string(),
            r1: 2,
            r2: 3,
        },
        ClassificationSpan {
            label: "b".to_string(),
            r1: 5,
            r2: 6,
        },
    ];
    assert_eq!(classification_for_row(1, &spans), "");
    assert_eq!(classification_for_row(3, &spans), "a");
    assert_eq!(classification_for_row(4, &spans), "");
    assert_eq!(classification_for_row(6, &spans), "b");
}

#[test]
fn test_dividers_preserved() {
    let text = doc(&[
        r#"<"表1">"#,
        r#"<"行">"#,
        r#"<"G">項目"#,
        r#"<"G">値"#,
        r#"<"行">"#,
        r#"<"G">A"#,
        r#"<"G">1"#,
        r#"<"行">"#,
        r#"<"行_罫なし">"#,
        r#"<"G">B"#,
        r#"<"G">2"#,
    ]);
    let table = single_table(&text, true);

    let options = TableOptions {
        keep_dividers: true,
        ..Default::default()
    };
    let output = build_table_output(&table, &options).value;
    assert_eq!(output.header_depth, Some(1));
    assert_eq!(keys(&output), vec!["項目", "値"]);
    assert_eq!(
        serde_json::to_value(output.rows().unwrap()).unwrap(),
        json!([
            {"項目": "A", "値": "1"},
            {"divider": true},
            {"項目": "B", "値": "2"}
        ])
    );

    // Segmented with dividers but built without: they are dropped
    let output = build_table_output(&table, &TableOptions::default()).value;
    assert_eq!(output.rows().unwrap().len(), 2);
    assert!(!output.rows().unwrap().iter().any(Record::is_divider));
}

#[test]
fn test_empty_table_output() {
    let text = doc(&[
        r#"<"表1">"#,
        r#"<"表2">"#,
        r#"<"行">"#,
        r#"<"G">A"#,
    ]);
    let tables = parse_tables(&text, false);
    let document = build_document(&tables, &TableOptions::default()).value;
    assert_eq!(document.tables.len(), 2);
    assert_eq!(
        serde_json::to_value(&document.tables[0]).unwrap(),
        json!({"id": "表1", "name": "表1", "columns": [], "rows": []})
    );
    assert_eq!(document.tables[1].header_depth, Some(1));
}

#[test]
fn test_fixed_depth_beyond_grid_warns() {
    let text = doc(&[
        r#"<"表1">"#,
        r#"<"行">"#,
        r#"<"G">A"#,
        r#"<"行">"#,
        r#"<"G">B"#,
    ]);
    let options = TableOptions {
        header_depth: HeaderDepth::Fixed(5),
        ..Default::default()
    };
    let output = build_table_output(&single_table(&text, false), &options);
    assert!(output.has_warnings());
    assert_eq!(output.warnings[0].table.as_deref(), Some("表1"));
    assert_eq!(keys(&output.value), vec!["A|B"]);
    assert!(output.value.rows().unwrap().is_empty());
}

#[test]
fn test_clipped_span_is_reported() {
    let text = doc(&[
        r#"<"表1">"#,
        r#"<"行">"#,
        r#"<"G">A"#,
        r#"<"G＝C2_C1">B"#,
        r#"<"行">"#,
        r#"<"G＝C1_C2">C"#,
    ]);
    let output = build_table_output(&single_table(&text, false), &TableOptions::default());
    assert_eq!(output.warnings.len(), 1);
    assert!(output.warnings[0].message.contains("row 2 column 1"));
}

#[test]
fn test_oversized_span_is_reported() {
    let text = doc(&[
        r#"<"表1">"#,
        r#"<"行">"#,
        r#"<"G">項目"#,
        r#"<"G">値"#,
        r#"<"行">"#,
        r#"<"G＝C18446744073709551615_C1">LDL"#,
        r#"<"G">140"#,
    ]);
    let output = build_table_output(&single_table(&text, false), &TableOptions::default());
    assert_eq!(output.warnings.len(), 1);
    assert!(output.warnings[0].message.contains("row 2 column 1"));
    assert_eq!(
        serde_json::to_value(output.value.rows().unwrap()).unwrap(),
        json!([{"項目": "LDL", "値": "140"}])
    );
}

#[test]
fn test_document_json_shape() {
    let tables = vec![classified_table()];
    let document = build_document(&tables, &TableOptions::grouped()).value;
    let value = serde_json::to_value(&document).unwrap();

    assert_eq!(value["tables"][0]["id"], json!("表1"));
    assert_eq!(value["tables"][0]["header_depth"], json!(2));
    assert_eq!(value["tables"][0]["groups"][1]["label"], json!("高値群"));
    assert!(value["tables"][0].get("rows").is_none());
    assert_eq!(
        value["tables"][0]["columns"][1],
        json!({"path": ["検査値", "LDL"], "key": "検査値|LDL"})
    );
}

#[test]
fn test_record_keys_follow_column_order() {
    let output = build_table_output(&classified_table(), &TableOptions::flat_classified()).value;
    let json = serde_json::to_string(&output.rows().unwrap()[0]).unwrap();
    assert_eq!(
        json,
        r#"{"分類":"高値群","区分":"高値群","検査値|LDL":"160","検査値|HDL":"40"}"#
    );
}

#[test]
fn test_pipeline_is_idempotent() {
    let tables = vec![classified_table()];
    let options = TableOptions::flat_classified();
    let first = build_document(&tables, &options).value.to_json().unwrap();
    let second = build_document(&tables, &options).value.to_json().unwrap();
    assert_eq!(first, second);
}
