//! Line classification for tagged manuscript text

use crate::data::patterns::{CAPTION, CELL, ROW_SEPARATOR, TABLE_START};

/// Structural role of one trimmed input line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind<'a> {
    /// `<"図表ネーム">TEXT` with the raw caption text
    Caption(&'a str),
    /// `<"表ID">` with the marker's inner text
    TableStart(&'a str),
    /// `<"行...">`, whatever the suffix
    RowSeparator,
    /// `<"G...">CONTENT` split into the tag and the raw content
    Cell { tag: &'a str, content: &'a str },
    /// Figure descriptions, notes and any other line
    Ignored,
}

/// Classify one line of input
///
/// The line is trimmed before matching, so callers may pass raw lines.
/// Checks run in a fixed order: caption, table start, row separator, cell.
pub fn classify_line(line: &str) -> LineKind<'_> {
    let line = line.trim();

    if let Some(caps) = CAPTION.captures(line) {
        let text = caps.get(1).map_or("", |m| m.as_str());
        return LineKind::Caption(text);
    }

    if let Some(caps) = TABLE_START.captures(line) {
        let id = caps.get(1).map_or("", |m| m.as_str());
        return LineKind::TableStart(id);
    }

    if ROW_SEPARATOR.is_match(line) {
        return LineKind::RowSeparator;
    }

    if let Some(caps) = CELL.captures(line) {
        // Everything before the first `">` is the tag; spans and hints live there
        let tag = line.split_once("\">").map_or(line, |(tag, _)| tag);
        let content = caps.get(1).map_or("", |m| m.as_str());
        return LineKind::Cell { tag, content };
    }

    LineKind::Ignored
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_caption() {
        assert_eq!(
            classify_line(r#"<"図表ネーム">表3a 脂質異常症診断基準"#),
            LineKind::Caption("表3a 脂質異常症診断基準")
        );
    }

    #[test]
    fn test_classify_table_start() {
        assert_eq!(
            classify_line(r#"  <"表2023_0016_3a">  "#),
            LineKind::TableStart("表2023_0016_3a")
        );
    }

    #[test]
    fn test_classify_row_separator() {
        assert_eq!(classify_line(r#"<"行">"#), LineKind::RowSeparator);
        assert_eq!(classify_line(r#"<"行_罫なし">"#), LineKind::RowSeparator);
    }

    #[test]
    fn test_classify_cell_splits_tag_and_content() {
        assert_eq!(
            classify_line(r#"<"G＝C2_C1">LDL<KG>mg/dL"#),
            LineKind::Cell {
                tag: r#"<"G＝C2_C1"#,
                content: "LDL<KG>mg/dL",
            }
        );
        assert_eq!(
            classify_line(r#"<"G">"#),
            LineKind::Cell {
                tag: r#"<"G"#,
                content: "",
            }
        );
    }

    #[test]
    fn test_classify_ignored() {
        assert_eq!(classify_line(r#"<"図">概念図"#), LineKind::Ignored);
        assert_eq!(classify_line("plain text"), LineKind::Ignored);
        assert_eq!(classify_line(r#"<"表1">extra"#), LineKind::Ignored);
    }
}
