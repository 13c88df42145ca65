//! Option files
//!
//! A TOML file may set any [`TableOptions`] field; unset fields keep the
//! value they already had. Example:
//!
//! ```toml
//! header_depth = "auto"        # or an integer >= 1
//! value_policy = "first_nonempty"
//! add_classification = true
//! nested = true
//! ```

use serde::Deserialize;

use crate::core::options::{HeaderDepth, TableOptions};
use crate::core::records::ValuePolicy;
use crate::utils::error::{ConversionError, ConversionOutput, ConversionResult};

/// `header_depth` as written in a file: a number or `"auto"`
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum HeaderDepthSetting {
    Depth(i64),
    Keyword(String),
}

/// Options as read from a file, every field optional
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OptionsFile {
    pub header_depth: Option<HeaderDepthSetting>,
    pub value_policy: Option<ValuePolicy>,
    pub concat_separator: Option<String>,
    pub add_classification: Option<bool>,
    pub group_key: Option<String>,
    pub nested: Option<bool>,
    pub keep_dividers: Option<bool>,
    pub classification_target_column: Option<usize>,
    pub classification_row_header_bump: Option<bool>,
}

impl OptionsFile {
    /// Overlay the fields that are set onto `base`
    pub fn apply(self, base: TableOptions) -> ConversionResult<ConversionOutput<TableOptions>> {
        let mut options = base;
        let mut warnings = Vec::new();

        match self.header_depth {
            Some(HeaderDepthSetting::Depth(depth)) => {
                let (depth, warning) = HeaderDepth::from_override(depth);
                options.header_depth = depth;
                warnings.extend(warning);
            }
            Some(HeaderDepthSetting::Keyword(keyword)) if keyword == "auto" => {
                options.header_depth = HeaderDepth::Auto;
            }
            Some(HeaderDepthSetting::Keyword(keyword)) => {
                return Err(ConversionError::invalid(format!(
                    "header_depth must be \"auto\" or an integer, got \"{}\"",
                    keyword
                )));
            }
            None => {}
        }

        if let Some(column) = self.classification_target_column {
            if column == 0 {
                return Err(ConversionError::invalid(
                    "classification_target_column is 1-based and must be at least 1",
                ));
            }
            options.classification_target_column = column;
        }

        if let Some(policy) = self.value_policy {
            options.value_policy = policy;
        }
        if let Some(separator) = self.concat_separator {
            options.concat_separator = separator;
        }
        if let Some(flag) = self.add_classification {
            options.add_classification = flag;
        }
        if let Some(key) = self.group_key {
            options.group_key = key;
        }
        if let Some(flag) = self.nested {
            options.nested = flag;
        }
        if let Some(flag) = self.keep_dividers {
            options.keep_dividers = flag;
        }
        if let Some(flag) = self.classification_row_header_bump {
            options.classification_row_header_bump = flag;
        }

        Ok(ConversionOutput::with_warnings(options, warnings))
    }
}

/// Parse TOML option text on top of `base`
#[cfg(feature = "config-file")]
pub fn parse_options(
    text: &str,
    base: TableOptions,
) -> ConversionResult<ConversionOutput<TableOptions>> {
    let file: OptionsFile = toml::from_str(text).map_err(|err| {
        let message = err.message().to_string();
        match err.span() {
            Some(span) => {
                let line = text[..span.start].matches('\n').count() + 1;
                ConversionError::parse_at(message, line)
            }
            None => ConversionError::parse(message),
        }
    })?;
    file.apply(base)
}

/// Read a TOML option file on top of `base`
#[cfg(feature = "config-file")]
pub fn load_options(
    path: impl AsRef<std::path::Path>,
    base: TableOptions,
) -> ConversionResult<ConversionOutput<TableOptions>> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path)?;
    log::debug!("loading options from {}", path.display());
    parse_options(&text, base)
}
