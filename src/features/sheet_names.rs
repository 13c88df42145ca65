//! Worksheet naming
//!
//! Spreadsheet hosts cap sheet names at 31 characters, forbid `: \ / * ? [ ]`
//! and compare names case-insensitively. Table names are mapped onto that
//! space here; collisions get a numeric suffix on a 28-character base.

use fxhash::FxHashSet;

use crate::core::segment::sanitize_name;

/// Longest sheet name a workbook accepts, in characters
pub const MAX_SHEET_NAME_CHARS: usize = 31;

/// Characters kept from a colliding name before `_N` is appended; fewer
/// when the suffix would push the name past [`MAX_SHEET_NAME_CHARS`]
const DEDUPE_BASE_CHARS: usize = 28;

const FALLBACK_SHEET_NAME: &str = "Sheet";

fn truncate_chars(name: &str, max: usize) -> &str {
    match name.char_indices().nth(max) {
        Some((idx, _)) => &name[..idx],
        None => name,
    }
}

/// Sanitize and truncate a table name for use as a sheet name
pub fn sanitize_sheet_name(name: &str) -> String {
    let sanitized = sanitize_name(name);
    let truncated = truncate_chars(sanitized.trim(), MAX_SHEET_NAME_CHARS);
    if truncated.is_empty() {
        FALLBACK_SHEET_NAME.to_string()
    } else {
        truncated.to_string()
    }
}

/// Sheet names handed out so far in one workbook
#[derive(Debug, Default)]
pub struct SheetNames {
    used: FxHashSet<String>,
}

impl SheetNames {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reserve a unique sheet name derived from `name`
    pub fn claim(&mut self, name: &str) -> String {
        let sanitized = sanitize_sheet_name(name);
        let mut candidate = sanitized.clone();

        let mut n = 2;
        while self.used.contains(&candidate.to_lowercase()) {
            let suffix = format!("_{}", n);
            let keep = DEDUPE_BASE_CHARS.min(MAX_SHEET_NAME_CHARS - suffix.len());
            candidate = format!("{}{}", truncate_chars(&sanitized, keep), suffix);
            n += 1;
        }

        self.used.insert(candidate.to_lowercase());
        candidate
    }

    pub fn len(&self) -> usize {
        self.used.len()
    }

    pub fn is_empty(&self) -> bool {
        self.used.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_sanitize_sheet_name() {
        assert_eq!(sanitize_sheet_name("表1: 基準"), "表1： 基準");
        assert_eq!(sanitize_sheet_name("a/b*c?[d]"), "a b c  d");
        assert_eq!(sanitize_sheet_name("  "), "Sheet");
    }

    #[test]
    fn test_truncates_by_characters() {
        let long = "表".repeat(40);
        let name = sanitize_sheet_name(&long);
        assert_eq!(name.chars().count(), MAX_SHEET_NAME_CHARS);
    }

    #[test]
    fn test_duplicates_get_suffix() {
        let mut names = SheetNames::new();
        assert_eq!(names.claim("表1"), "表1");
        assert_eq!(names.claim("表1"), "表1_2");
        assert_eq!(names.claim("表1"), "表1_3");
        assert_eq!(names.len(), 3);
    }

    #[test]
    fn test_duplicate_of_long_name_stays_within_limit() {
        let mut names = SheetNames::new();
        let long = "脂質異常症診断基準".repeat(5);
        let first = names.claim(&long);
        let second = names.claim(&long);
        assert_eq!(first.chars().count(), 31);
        assert!(second.ends_with("_2"));
        assert_eq!(second.chars().count(), 30);
    }

    #[test]
    fn test_long_suffixes_shorten_the_base() {
        let mut names = SheetNames::new();
        let long = "脂質異常症診断基準".repeat(5);
        let claimed: Vec<String> = (0..1001).map(|_| names.claim(&long)).collect();

        assert!(claimed.iter().all(|name| name.chars().count() <= MAX_SHEET_NAME_CHARS));
        assert_eq!(claimed[99].chars().count(), 31);
        assert!(claimed[99].ends_with("_100"));
        assert!(claimed[1000].ends_with("_1001"));
        assert_eq!(claimed[1000].chars().count(), 31);
        assert_eq!(names.len(), 1001);
    }

    #[test]
    fn test_collisions_ignore_case() {
        let mut names = SheetNames::new();
        assert_eq!(names.claim("Table"), "Table");
        assert_eq!(names.claim("TABLE"), "TABLE_2");
    }
}
