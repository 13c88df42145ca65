//! Spreadsheet sink
//!
//! Writes each reconstructed grid to its own worksheet of an Office Open
//! XML workbook. Spans become native merged ranges and columns are sized
//! from their longest value.

use std::fs::File;
use std::io::{BufWriter, Seek, Write};
use std::path::Path;

use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use super::sheet_names::SheetNames;
use crate::core::grid::{Grid, Merge};
use crate::core::options::TableOptions;
use crate::core::records::reconstruct_table;
use crate::core::segment::TableSpec;
use crate::utils::error::{ConversionError, ConversionOutput, ConversionResult};

const NS_MAIN: &str = "http://schemas.openxmlformats.org/spreadsheetml/2006/main";
const NS_DOC_RELS: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships";
const NS_PKG_RELS: &str = "http://schemas.openxmlformats.org/package/2006/relationships";
const NS_CONTENT_TYPES: &str = "http://schemas.openxmlformats.org/package/2006/content-types";

const REL_OFFICE_DOCUMENT: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument";
const REL_WORKSHEET: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet";
const REL_STYLES: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/styles";

const CT_RELS: &str = "application/vnd.openxmlformats-package.relationships+xml";
const CT_WORKBOOK: &str = "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml";
const CT_WORKSHEET: &str = "application/vnd.openxmlformats-officedocument.spreadsheetml.worksheet+xml";
const CT_STYLES: &str = "application/vnd.openxmlformats-officedocument.spreadsheetml.styles+xml";

const MIN_COLUMN_WIDTH: usize = 8;
const MAX_COLUMN_WIDTH: usize = 50;
const COLUMN_PADDING: usize = 2;

/// One worksheet's worth of content
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SheetData {
    /// Table name; made unique and host-safe when written
    pub name: String,
    /// Display values, header rows included
    pub grid: Grid,
    pub merges: Vec<Merge>,
    /// Header depth of the table, `None` for tables without cells
    pub header_depth: Option<usize>,
}

impl SheetData {
    /// Reconstruct a table's grid for the spreadsheet
    pub fn from_table(spec: &TableSpec, options: &TableOptions) -> ConversionOutput<Self> {
        let ConversionOutput { value, warnings } = reconstruct_table(spec, options);
        let sheet = match value {
            Some(table) => SheetData {
                name: table.name,
                grid: table.placed.grid,
                merges: table.placed.merges,
                header_depth: Some(table.header_depth),
            },
            None => SheetData {
                name: spec.name.clone(),
                grid: Grid::new(),
                merges: Vec::new(),
                header_depth: None,
            },
        };
        ConversionOutput::with_warnings(sheet, warnings)
    }
}

/// Column letters for a 1-based column number (1 -> A, 27 -> AA)
pub fn column_letter(col: usize) -> String {
    let mut letters = Vec::new();
    let mut n = col;
    while n > 0 {
        let rem = (n - 1) % 26;
        letters.push(b'A' + rem as u8);
        n = (n - 1) / 26;
    }
    letters.reverse();
    String::from_utf8_lossy(&letters).into_owned()
}

/// A1-style reference for a 1-based row and column
pub fn cell_reference(row: usize, col: usize) -> String {
    format!("{}{}", column_letter(col), row)
}

fn range_reference(merge: &Merge) -> String {
    format!(
        "{}:{}",
        cell_reference(merge.r1, merge.c1),
        cell_reference(merge.r2, merge.c2)
    )
}

/// Width per column: longest value plus padding, clamped to 8..=50
pub fn column_widths(grid: &Grid) -> Vec<usize> {
    (1..=grid.col_count())
        .map(|col| {
            let longest = (1..=grid.row_count())
                .map(|row| grid.get(row, col).chars().count())
                .max()
                .unwrap_or(0);
            (longest + COLUMN_PADDING).clamp(MIN_COLUMN_WIDTH, MAX_COLUMN_WIDTH)
        })
        .collect()
}

fn xml_writer() -> ConversionResult<Writer<Vec<u8>>> {
    let mut writer = Writer::new(Vec::new());
    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), Some("yes"))))?;
    Ok(writer)
}

fn worksheet_xml(sheet: &SheetData) -> ConversionResult<Vec<u8>> {
    let mut writer = xml_writer()?;
    writer.write_event(Event::Start(
        BytesStart::new("worksheet").with_attributes([("xmlns", NS_MAIN), ("xmlns:r", NS_DOC_RELS)]),
    ))?;

    let widths = column_widths(&sheet.grid);
    if !widths.is_empty() {
        writer.write_event(Event::Start(BytesStart::new("cols")))?;
        for (idx, width) in widths.iter().enumerate() {
            let col = (idx + 1).to_string();
            let width = width.to_string();
            writer.write_event(Event::Empty(BytesStart::new("col").with_attributes([
                ("min", col.as_str()),
                ("max", col.as_str()),
                ("width", width.as_str()),
                ("customWidth", "1"),
            ])))?;
        }
        writer.write_event(Event::End(BytesEnd::new("cols")))?;
    }

    writer.write_event(Event::Start(BytesStart::new("sheetData")))?;
    for (row_idx, cells) in sheet.grid.rows().iter().enumerate() {
        if cells.iter().all(|value| value.is_empty()) {
            continue;
        }
        let row = row_idx + 1;
        let row_ref = row.to_string();
        writer.write_event(Event::Start(
            BytesStart::new("row").with_attributes([("r", row_ref.as_str())]),
        ))?;
        for (col_idx, value) in cells.iter().enumerate() {
            if value.is_empty() {
                continue;
            }
            let reference = cell_reference(row, col_idx + 1);
            writer.write_event(Event::Start(
                BytesStart::new("c").with_attributes([("r", reference.as_str()), ("t", "inlineStr")]),
            ))?;
            writer.write_event(Event::Start(BytesStart::new("is")))?;
            writer.write_event(Event::Start(
                BytesStart::new("t").with_attributes([("xml:space", "preserve")]),
            ))?;
            writer.write_event(Event::Text(BytesText::new(value)))?;
            writer.write_event(Event::End(BytesEnd::new("t")))?;
            writer.write_event(Event::End(BytesEnd::new("is")))?;
            writer.write_event(Event::End(BytesEnd::new("c")))?;
        }
        writer.write_event(Event::End(BytesEnd::new("row")))?;
    }
    writer.write_event(Event::End(BytesEnd::new("sheetData")))?;

    if !sheet.merges.is_empty() {
        let count = sheet.merges.len().to_string();
        writer.write_event(Event::Start(
            BytesStart::new("mergeCells").with_attributes([("count", count.as_str())]),
        ))?;
        for merge in &sheet.merges {
            let reference = range_reference(merge);
            writer.write_event(Event::Empty(
                BytesStart::new("mergeCell").with_attributes([("ref", reference.as_str())]),
            ))?;
        }
        writer.write_event(Event::End(BytesEnd::new("mergeCells")))?;
    }

    writer.write_event(Event::End(BytesEnd::new("worksheet")))?;
    Ok(writer.into_inner())
}

fn workbook_xml(sheet_names: &[String]) -> ConversionResult<Vec<u8>> {
    let mut writer = xml_writer()?;
    writer.write_event(Event::Start(
        BytesStart::new("workbook").with_attributes([("xmlns", NS_MAIN), ("xmlns:r", NS_DOC_RELS)]),
    ))?;
    writer.write_event(Event::Start(BytesStart::new("sheets")))?;
    for (idx, name) in sheet_names.iter().enumerate() {
        let sheet_id = (idx + 1).to_string();
        let rel_id = format!("rId{}", idx + 1);
        writer.write_event(Event::Empty(BytesStart::new("sheet").with_attributes([
            ("name", name.as_str()),
            ("sheetId", sheet_id.as_str()),
            ("r:id", rel_id.as_str()),
        ])))?;
    }
    writer.write_event(Event::End(BytesEnd::new("sheets")))?;
    writer.write_event(Event::End(BytesEnd::new("workbook")))?;
    Ok(writer.into_inner())
}

fn relationships_xml(relations: &[(String, &str, String)]) -> ConversionResult<Vec<u8>> {
    let mut writer = xml_writer()?;
    writer.write_event(Event::Start(
        BytesStart::new("Relationships").with_attributes([("xmlns", NS_PKG_RELS)]),
    ))?;
    for (id, kind, target) in relations {
        writer.write_event(Event::Empty(BytesStart::new("Relationship").with_attributes([
            ("Id", id.as_str()),
            ("Type", *kind),
            ("Target", target.as_str()),
        ])))?;
    }
    writer.write_event(Event::End(BytesEnd::new("Relationships")))?;
    Ok(writer.into_inner())
}

fn content_types_xml(sheet_count: usize) -> ConversionResult<Vec<u8>> {
    let mut writer = xml_writer()?;
    writer.write_event(Event::Start(
        BytesStart::new("Types").with_attributes([("xmlns", NS_CONTENT_TYPES)]),
    ))?;
    writer.write_event(Event::Empty(
        BytesStart::new("Default").with_attributes([("Extension", "rels"), ("ContentType", CT_RELS)]),
    ))?;
    writer.write_event(Event::Empty(BytesStart::new("Default").with_attributes([
        ("Extension", "xml"),
        ("ContentType", "application/xml"),
    ])))?;
    writer.write_event(Event::Empty(BytesStart::new("Override").with_attributes([
        ("PartName", "/xl/workbook.xml"),
        ("ContentType", CT_WORKBOOK),
    ])))?;
    writer.write_event(Event::Empty(BytesStart::new("Override").with_attributes([
        ("PartName", "/xl/styles.xml"),
        ("ContentType", CT_STYLES),
    ])))?;
    for idx in 1..=sheet_count {
        let part = format!("/xl/worksheets/sheet{}.xml", idx);
        writer.write_event(Event::Empty(BytesStart::new("Override").with_attributes([
            ("PartName", part.as_str()),
            ("ContentType", CT_WORKSHEET),
        ])))?;
    }
    writer.write_event(Event::End(BytesEnd::new("Types")))?;
    Ok(writer.into_inner())
}

fn styles_xml() -> ConversionResult<Vec<u8>> {
    let mut writer = xml_writer()?;
    writer.write_event(Event::Start(
        BytesStart::new("styleSheet").with_attributes([("xmlns", NS_MAIN)]),
    ))?;
    for (list, item) in [("fonts", "font"), ("fills", "fill"), ("borders", "border")] {
        writer.write_event(Event::Start(
            BytesStart::new(list).with_attributes([("count", "1")]),
        ))?;
        writer.write_event(Event::Empty(BytesStart::new(item)))?;
        writer.write_event(Event::End(BytesEnd::new(list)))?;
    }
    for list in ["cellStyleXfs", "cellXfs"] {
        writer.write_event(Event::Start(
            BytesStart::new(list).with_attributes([("count", "1")]),
        ))?;
        writer.write_event(Event::Empty(BytesStart::new("xf").with_attributes([
            ("numFmtId", "0"),
            ("fontId", "0"),
            ("fillId", "0"),
            ("borderId", "0"),
        ])))?;
        writer.write_event(Event::End(BytesEnd::new(list)))?;
    }
    writer.write_event(Event::End(BytesEnd::new("styleSheet")))?;
    Ok(writer.into_inner())
}

/// Streaming workbook writer: add sheets one by one, then finish
pub struct XlsxWriter<W: Write + Seek> {
    zip: ZipWriter<W>,
    options: SimpleFileOptions,
    names: SheetNames,
    sheets: Vec<String>,
}

impl<W: Write + Seek> XlsxWriter<W> {
    pub fn new(inner: W) -> Self {
        XlsxWriter {
            zip: ZipWriter::new(inner),
            options: SimpleFileOptions::default().compression_method(CompressionMethod::Deflated),
            names: SheetNames::new(),
            sheets: Vec::new(),
        }
    }

    fn write_part(&mut self, path: &str, bytes: &[u8]) -> ConversionResult<()> {
        self.zip.start_file(path, self.options)?;
        self.zip.write_all(bytes)?;
        Ok(())
    }

    /// Write one worksheet; returns the sheet name actually used
    pub fn add_sheet(&mut self, sheet: &SheetData) -> ConversionResult<String> {
        let name = self.names.claim(&sheet.name);
        let path = format!("xl/worksheets/sheet{}.xml", self.sheets.len() + 1);
        let xml = worksheet_xml(sheet)?;
        self.write_part(&path, &xml)?;

        log::debug!(
            "sheet '{}': {} rows, {} merges",
            name,
            sheet.grid.row_count(),
            sheet.merges.len()
        );
        self.sheets.push(name.clone());
        Ok(name)
    }

    /// Names of the sheets written so far, in order
    pub fn sheet_names(&self) -> &[String] {
        &self.sheets
    }

    /// Write the workbook parts and close the archive
    pub fn finish(mut self) -> ConversionResult<W> {
        if self.sheets.is_empty() {
            return Err(ConversionError::invalid(
                "a workbook needs at least one sheet",
            ));
        }

        let sheet_count = self.sheets.len();
        let workbook = workbook_xml(&self.sheets)?;
        self.write_part("xl/workbook.xml", &workbook)?;

        let mut workbook_rels: Vec<(String, &str, String)> = (1..=sheet_count)
            .map(|idx| {
                (
                    format!("rId{}", idx),
                    REL_WORKSHEET,
                    format!("worksheets/sheet{}.xml", idx),
                )
            })
            .collect();
        workbook_rels.push((
            format!("rId{}", sheet_count + 1),
            REL_STYLES,
            "styles.xml".to_string(),
        ));
        let rels = relationships_xml(&workbook_rels)?;
        self.write_part("xl/_rels/workbook.xml.rels", &rels)?;

        let styles = styles_xml()?;
        self.write_part("xl/styles.xml", &styles)?;

        let root_rels = relationships_xml(&[(
            "rId1".to_string(),
            REL_OFFICE_DOCUMENT,
            "xl/workbook.xml".to_string(),
        )])?;
        self.write_part("_rels/.rels", &root_rels)?;

        let content_types = content_types_xml(sheet_count)?;
        self.write_part("[Content_Types].xml", &content_types)?;

        Ok(self.zip.finish()?)
    }
}

/// Write all sheets into `inner`; returns the writer and the sheet names used
pub fn write_workbook<W: Write + Seek>(
    inner: W,
    sheets: &[SheetData],
) -> ConversionResult<(W, Vec<String>)> {
    let mut writer = XlsxWriter::new(inner);
    for sheet in sheets {
        writer.add_sheet(sheet)?;
    }
    let names = writer.sheet_names().to_vec();
    Ok((writer.finish()?, names))
}

/// Reconstruct every table and save them as one workbook at `path`
pub fn write_tables_to_xlsx(
    path: impl AsRef<Path>,
    tables: &[TableSpec],
    options: &TableOptions,
) -> ConversionResult<ConversionOutput<Vec<SheetData>>> {
    if tables.is_empty() {
        return Err(ConversionError::invalid("no tables detected"));
    }

    let mut warnings = Vec::new();
    let sheets: Vec<SheetData> = tables
        .iter()
        .map(|spec| {
            let output = SheetData::from_table(spec, options);
            warnings.extend(output.warnings);
            output.value
        })
        .collect();

    let file = BufWriter::new(File::create(path.as_ref())?);
    let (mut file, _) = write_workbook(file, &sheets)?;
    file.flush()?;

    Ok(ConversionOutput::with_warnings(sheets, warnings))
}
