//! Table reconstruction pipeline: authored rows to output records

use super::classification::{detect_classification_spans, group_records, ClassificationSpan};
use super::extract::{materialize_rows, ExtractSettings};
use super::output::{ColumnOutput, Record, TableBody, TableDocument, TableOutput};
use crate::core::grid::{
    assign_unique_keys, build_logical_columns, label_grid, place_cells, resolve_header_depth,
    Grid, LogicalColumn, PlacedGrid,
};
use crate::core::options::{HeaderDepth, TableOptions};
use crate::core::segment::{RowSpec, TableSpec};
use crate::data::patterns::MAX_SPAN;
use crate::utils::error::{ConversionOutput, ConversionWarning};

/// Intermediate state of one table after placement and column derivation
#[derive(Debug, Clone)]
pub struct ReconstructedTable {
    pub id: String,
    pub name: String,
    /// Authored rows the grid was built from (dividers only when kept)
    pub rows: Vec<RowSpec>,
    pub placed: PlacedGrid,
    /// Grid with merges filled from their top-left labels
    pub labels: Grid,
    pub header_depth: usize,
    /// Data columns, without the synthetic classification column
    pub columns: Vec<LogicalColumn>,
    pub spans: Vec<ClassificationSpan>,
}

impl ReconstructedTable {
    /// Grid rows below the header
    pub fn data_row_count(&self) -> usize {
        self.placed.grid.row_count().saturating_sub(self.header_depth)
    }
}

/// Place a table's cells and derive its header and columns
///
/// Returns `None` when the table has no cells.
pub fn reconstruct_table(
    spec: &TableSpec,
    options: &TableOptions,
) -> ConversionOutput<Option<ReconstructedTable>> {
    if spec.is_empty() {
        log::debug!("table '{}' has no cells", spec.id);
        return ConversionOutput::new(None);
    }

    // Dividers ahead of the first real row would become empty header rows
    let rows: Vec<RowSpec> = if options.keep_dividers {
        spec.rows
            .iter()
            .skip_while(|row| row.is_divider())
            .cloned()
            .collect()
    } else {
        spec.non_empty_rows().cloned().collect()
    };

    let mut warnings = Vec::new();
    let placed = place_cells(&rows);
    for (row, col) in &placed.clipped {
        warnings.push(
            ConversionWarning::for_table(
                &spec.name,
                format!("cell at row {} column {} overlaps an earlier span", row, col),
            )
            .with_suggestion("colspan clipped to the free width"),
        );
    }
    for (row, col) in &placed.oversized {
        warnings.push(
            ConversionWarning::for_table(
                &spec.name,
                format!(
                    "cell at row {} column {} declares a span above {}",
                    row, col, MAX_SPAN
                ),
            )
            .with_suggestion("span count replaced by 1"),
        );
    }

    let header_depth = resolve_header_depth(&rows, options);
    let row_count = placed.grid.row_count();
    if matches!(options.header_depth, HeaderDepth::Fixed(_)) && header_depth >= row_count {
        let warning = ConversionWarning::for_table(
            &spec.name,
            format!(
                "header depth {} leaves no data rows in a {}-row grid",
                header_depth, row_count
            ),
        );
        log::warn!("{}", warning);
        warnings.push(warning);
    }

    let labels = label_grid(&placed.grid, &placed.merges);
    let columns = build_logical_columns(&labels, header_depth);

    let spans = if options.add_classification {
        let spans = detect_classification_spans(
            &placed.merges,
            &labels,
            header_depth,
            options.classification_target_column,
        );
        if spans.is_empty() {
            log::info!(
                "table '{}': no classification spans in column {}",
                spec.name,
                options.classification_target_column
            );
        }
        spans
    } else {
        Vec::new()
    };

    log::debug!(
        "table '{}': {} grid rows, header_depth = {}, {} columns, {} spans",
        spec.name,
        row_count,
        header_depth,
        columns.len(),
        spans.len()
    );

    ConversionOutput::with_warnings(
        Some(ReconstructedTable {
            id: spec.id.clone(),
            name: spec.name.clone(),
            rows,
            placed,
            labels,
            header_depth,
            columns,
            spans,
        }),
        warnings,
    )
}

/// Build the output for one table
pub fn build_table_output(spec: &TableSpec, options: &TableOptions) -> ConversionOutput<TableOutput> {
    let ConversionOutput { value, warnings } = reconstruct_table(spec, options);
    let Some(table) = value else {
        return ConversionOutput::with_warnings(TableOutput::empty(&spec.id, &spec.name), warnings);
    };

    let grouped = options.groups_records() && !table.spans.is_empty();

    let mut columns = table.columns.clone();
    if !grouped && !table.spans.is_empty() {
        columns.insert(0, LogicalColumn::classification(&options.group_key));
        assign_unique_keys(&mut columns);
    }

    let settings = ExtractSettings {
        policy: options.value_policy,
        separator: &options.concat_separator,
        keep_dividers: options.keep_dividers,
    };
    let records = materialize_rows(
        &table.placed,
        &columns,
        table.header_depth,
        &table.spans,
        settings,
    );

    let body = if grouped {
        TableBody::Groups(group_records(&records, &table.spans))
    } else {
        TableBody::Rows(records.into_iter().map(|(_, record)| record).collect::<Vec<Record>>())
    };

    let output = TableOutput {
        id: table.id,
        name: table.name,
        header_depth: Some(table.header_depth),
        columns: columns
            .into_iter()
            .map(|c| ColumnOutput {
                path: c.path,
                key: c.key,
            })
            .collect(),
        body,
    };
    ConversionOutput::with_warnings(output, warnings)
}

/// Build the output document for every table, in document order
pub fn build_document(tables: &[TableSpec], options: &TableOptions) -> ConversionOutput<TableDocument> {
    let mut warnings = Vec::new();
    let tables = tables
        .iter()
        .map(|spec| {
            let output = build_table_output(spec, options);
            warnings.extend(output.warnings);
            output.value
        })
        .collect();
    ConversionOutput::with_warnings(TableDocument { tables }, warnings)
}
