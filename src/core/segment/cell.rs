//! Cell specs, span markers and inline content normalization

use crate::data::patterns::{
    HEADER_HINT, INLINE_SEPARATOR, INLINE_SEPARATOR_TAG, INLINE_TAG, MAX_SPAN, SPAN_MARKER,
    WHITESPACE_RUN,
};

/// One authored cell: display value plus declared spans
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CellSpec {
    /// Normalized display text
    pub value: String,
    /// Number of rows this cell spans (always >= 1)
    pub rowspan: usize,
    /// Number of columns this cell spans (always >= 1)
    pub colspan: usize,
    /// Tag carried a color marker, or the cell spans more than one slot
    pub header_hint: bool,
    /// A declared count above [`MAX_SPAN`] was replaced by 1
    pub span_fallback: bool,
}

impl CellSpec {
    /// Create a 1x1 cell with the given display value
    pub fn new(value: impl Into<String>) -> Self {
        CellSpec {
            value: value.into(),
            rowspan: 1,
            colspan: 1,
            header_hint: false,
            span_fallback: false,
        }
    }

    /// Create a cell with explicit spans
    ///
    /// Values below 1 and values above [`MAX_SPAN`] become 1.
    pub fn with_span(value: impl Into<String>, rowspan: usize, colspan: usize) -> Self {
        let span_fallback = rowspan > MAX_SPAN || colspan > MAX_SPAN;
        let rowspan = bounded_span(Some(rowspan));
        let colspan = bounded_span(Some(colspan));
        CellSpec {
            value: value.into(),
            rowspan,
            colspan,
            header_hint: rowspan > 1 || colspan > 1,
            span_fallback,
        }
    }

    /// Build a cell from a classified cell line's tag and raw content
    pub fn parse(tag: &str, content: &str) -> Self {
        let (rows, cols) = read_span(tag);
        let span_fallback = rows.is_none() || cols.is_none();
        let rowspan = bounded_span(rows);
        let colspan = bounded_span(cols);
        CellSpec {
            value: normalize_content(content),
            rowspan,
            colspan,
            header_hint: HEADER_HINT.is_match(tag) || rowspan > 1 || colspan > 1,
            span_fallback,
        }
    }

    /// Whether the cell covers more than its own slot
    pub fn is_spanning(&self) -> bool {
        self.rowspan > 1 || self.colspan > 1
    }
}

/// Turn raw cell content into display text
///
/// `<KG>` becomes `" / "`, every other `<...>` decoration is dropped and
/// whitespace runs collapse to one space.
pub fn normalize_content(raw: &str) -> String {
    let text = raw.replace(INLINE_SEPARATOR_TAG, INLINE_SEPARATOR);
    let text = INLINE_TAG.replace_all(&text, "");
    WHITESPACE_RUN.replace_all(&text, " ").trim().to_string()
}

/// Extract `(rowspan, colspan)` from a cell tag
///
/// Only the numbers matter; the `C`/`T` letters in front of them are not
/// distinguished, and full-width digits count like ASCII ones. An absent
/// marker gives `(1, 1)`; a zero count or one above [`MAX_SPAN`] gives 1.
pub fn parse_span(tag: &str) -> (usize, usize) {
    let (rows, cols) = read_span(tag);
    (bounded_span(rows), bounded_span(cols))
}

/// Declared counts of a tag, `None` where a count exceeds [`MAX_SPAN`]
fn read_span(tag: &str) -> (Option<usize>, Option<usize>) {
    let Some(caps) = SPAN_MARKER.captures(tag) else {
        return (Some(1), Some(1));
    };
    let count = |idx: usize| caps.get(idx).and_then(|m| parse_count(m.as_str()));
    (count(2), count(4))
}

fn parse_count(digits: &str) -> Option<usize> {
    digits
        .chars()
        .try_fold(0usize, |acc, ch| {
            let digit = match ch {
                '0'..='9' => ch as u32 - '0' as u32,
                '０'..='９' => ch as u32 - '０' as u32,
                _ => return None,
            };
            acc.checked_mul(10)?.checked_add(digit as usize)
        })
        .filter(|&n| n <= MAX_SPAN)
}

fn bounded_span(count: Option<usize>) -> usize {
    match count {
        Some(n) if n <= MAX_SPAN => n.max(1),
        _ => 1,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_separator_token() {
        assert_eq!(normalize_content("140<KG>mg/dL"), "140 / mg/dL");
    }

    #[test]
    fn test_normalize_strips_decorations() {
        assert_eq!(normalize_content("HbA<sub>1c</sub>"), "HbA1c");
        assert_eq!(normalize_content("<b>  太字 </b>   です"), "太字 です");
    }

    #[test]
    fn test_normalize_collapses_full_width_space() {
        assert_eq!(normalize_content("分\u{3000}\u{3000}類"), "分 類");
    }

    #[test]
    fn test_parse_span() {
        assert_eq!(parse_span(r#"<"G＝C2_C1"#), (2, 1));
        assert_eq!(parse_span(r#"<"G＝C1_T3"#), (1, 3));
        assert_eq!(parse_span(r#"<"Gこ色"#), (1, 1));
        assert_eq!(parse_span(r#"<"G＝C0_C0"#), (1, 1));
        assert_eq!(parse_span(r#"<"G＝C99999999999999999999999_C2"#), (1, 2));
    }

    #[test]
    fn test_parse_span_full_width_digits() {
        assert_eq!(parse_span(r#"<"G＝C２_C１"#), (2, 1));
        assert_eq!(parse_span(r#"<"G＝C1_T１２"#), (1, 12));
    }

    #[test]
    fn test_oversized_span_falls_back_to_one() {
        assert_eq!(parse_span(r#"<"G＝C18446744073709551615_C1"#), (1, 1));
        assert_eq!(parse_span(r#"<"G＝C100000000_C3"#), (1, 3));
        assert_eq!(parse_span(r#"<"G＝C1000_C1"#), (1000, 1));

        let cell = CellSpec::parse(r#"<"G＝C100000000_C3"#, "x");
        assert!(cell.span_fallback);
        assert_eq!((cell.rowspan, cell.colspan), (1, 3));
        assert!(!CellSpec::parse(r#"<"G＝C0_C2"#, "x").span_fallback);

        let cell = CellSpec::with_span("x", usize::MAX, 2);
        assert!(cell.span_fallback);
        assert_eq!((cell.rowspan, cell.colspan), (1, 2));
    }

    #[test]
    fn test_header_hint() {
        assert!(CellSpec::parse(r#"<"Gこ色"#, "見出し").header_hint);
        assert!(CellSpec::parse(r#"<"G＝C1_C2"#, "x").header_hint);
        assert!(!CellSpec::parse(r#"<"G"#, "x").header_hint);
    }

    #[test]
    fn test_with_span_clamps() {
        let cell = CellSpec::with_span("x", 0, 3);
        assert_eq!((cell.rowspan, cell.colspan), (1, 3));
        assert!(cell.is_spanning());
    }
}
