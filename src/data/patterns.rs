//! Tag markers and compiled patterns for the tagged manuscript format
//!
//! Every line of an input document is either one of the structural tags
//! below or free text that the table reconstruction ignores:
//!
//! ```text
//! <"図表ネーム">表3a 脂質異常症診断基準   caption
//! <"表2023_0016_3a">                    table start
//! <"行"> / <"行_罫なし">                 row separator
//! <"G＝C2_C1">LDLコレステロール           cell with rowspan 2, colspan 1
//! ```

use lazy_static::lazy_static;
use regex::Regex;

/// Substring a caption must contain to be used as the table name
pub const TABLE_MARKER: &str = "表";

/// Inline token rendered as a literal separator
pub const INLINE_SEPARATOR_TAG: &str = "<KG>";

/// Text substituted for [`INLINE_SEPARATOR_TAG`]
pub const INLINE_SEPARATOR: &str = " / ";

/// Separator joining header path segments into a column key
pub const KEY_SEPARATOR: &str = "|";

/// Default key of the synthetic classification column
pub const DEFAULT_GROUP_KEY: &str = "分類";

/// Label looked for by the classification header bump
pub const CLASSIFICATION_LABEL: &str = "分類";

/// Default separator used by the `concat` value policy
pub const DEFAULT_CONCAT_SEPARATOR: &str = " / ";

/// Largest rowspan or colspan taken from markup; larger counts become 1
pub const MAX_SPAN: usize = 1000;

lazy_static! {
    /// `<"図表ネーム">TEXT`
    pub static ref CAPTION: Regex = Regex::new(r#"^<"図表ネーム">(.*)$"#).unwrap();

    /// `<"表ID">` on a line of its own
    pub static ref TABLE_START: Regex = Regex::new(r#"^<"(表[^"]*)">$"#).unwrap();

    /// `<"行">`, `<"行_罫なし">` and any other suffix
    pub static ref ROW_SEPARATOR: Regex = Regex::new(r#"^<"行[^"]*">$"#).unwrap();

    /// `<"G...">CONTENT`
    pub static ref CELL: Regex = Regex::new(r#"^<"G[^"]*">(.*)$"#).unwrap();

    /// `＝C2_C1`, `＝C1_T2`: the two numbers are rowspan and colspan,
    /// written in ASCII or full-width digits
    pub static ref SPAN_MARKER: Regex =
        Regex::new(r"[＝=]([CT])([0-9０-９]+)_([CT])([0-9０-９]+)").unwrap();

    /// Color/style marker flagging a header-looking cell
    pub static ref HEADER_HINT: Regex = Regex::new(r"こ色").unwrap();

    /// Any remaining `<...>` decoration inside cell content
    pub static ref INLINE_TAG: Regex = Regex::new(r"<[^>]+>").unwrap();

    /// Runs of whitespace, full-width spaces included
    pub static ref WHITESPACE_RUN: Regex = Regex::new(r"\s+").unwrap();
}
