//! Table reconstruction options

use crate::core::records::ValuePolicy;
use crate::data::patterns::{DEFAULT_CONCAT_SEPARATOR, DEFAULT_GROUP_KEY};
use crate::utils::error::ConversionWarning;

/// How many leading grid rows are header rows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HeaderDepth {
    /// Max rowspan of the first non-empty authored row
    #[default]
    Auto,
    /// Fixed depth, always >= 1
    Fixed(usize),
}

impl HeaderDepth {
    /// Fixed depth from a user-supplied value
    ///
    /// Values below 1 are corrected to 1 and reported back as a warning.
    pub fn from_override(depth: i64) -> (Self, Option<ConversionWarning>) {
        if depth < 1 {
            let warning = ConversionWarning::new(format!("header depth {} is invalid", depth))
                .with_suggestion("corrected to 1");
            log::warn!("{}", warning);
            (HeaderDepth::Fixed(1), Some(warning))
        } else {
            (HeaderDepth::Fixed(depth as usize), None)
        }
    }
}

/// Options controlling table reconstruction and record extraction
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableOptions {
    /// Header depth: inferred per table or fixed for all tables
    /// Default: Auto
    pub header_depth: HeaderDepth,

    /// How a logical column spanning several grid columns yields one value
    /// Default: Concat
    pub value_policy: ValuePolicy,

    /// Separator used by [`ValuePolicy::Concat`]
    /// Default: " / "
    pub concat_separator: String,

    /// Detect vertical classification spans and expose them
    /// Default: false
    pub add_classification: bool,

    /// Key of the synthetic classification column in flat mode
    /// Default: "分類"
    pub group_key: String,

    /// Group records by classification span instead of adding a column
    /// Only applies together with `add_classification`
    /// Default: false
    pub nested: bool,

    /// Preserve cell-less rows as `{"divider": true}` records
    /// Default: false
    pub keep_dividers: bool,

    /// 1-based grid column searched for classification spans
    /// Default: 1
    pub classification_target_column: usize,

    /// Add one header row when the row after the inferred header starts
    /// with a "分類" cell (spreadsheet exports relied on this)
    /// Default: false
    pub classification_row_header_bump: bool,
}

impl Default for TableOptions {
    fn default() -> Self {
        Self {
            header_depth: HeaderDepth::Auto,
            value_policy: ValuePolicy::Concat,
            concat_separator: DEFAULT_CONCAT_SEPARATOR.to_string(),
            add_classification: false,
            group_key: DEFAULT_GROUP_KEY.to_string(),
            nested: false,
            keep_dividers: false,
            classification_target_column: 1,
            classification_row_header_bump: false,
        }
    }
}

impl TableOptions {
    /// Create new options with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Classification spans exposed as a leading flat column
    pub fn flat_classified() -> Self {
        Self {
            add_classification: true,
            nested: false,
            ..Self::default()
        }
    }

    /// Records grouped under their classification span labels
    pub fn grouped() -> Self {
        Self {
            add_classification: true,
            nested: true,
            ..Self::default()
        }
    }

    /// Whether output groups records instead of listing them flat
    pub fn groups_records(&self) -> bool {
        self.add_classification && self.nested
    }
}
