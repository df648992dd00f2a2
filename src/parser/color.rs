//! Colour-code detection for raw production sheets

use regex::Regex;
use std::path::Path;
use std::sync::LazyLock;

/// Product reference (`R` + 6-10 digits) followed by a 3-6 character token
static COLOR_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)R\d{6,10}\s+([A-Z0-9]{3,6})\s+").expect("static regex must compile")
});

/// Tokens shaped like `123A` are size/grade codes, not colours
static NOT_A_COLOR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{3}[A-Z]$").expect("static regex must compile"));

/// Where a detected colour came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorSource {
    Pattern,
    FileName,
    Default,
}

/// Scan rows in document order for the first acceptable colour token
pub fn detect_in_rows(rows: &[Vec<String>]) -> Option<String> {
    rows.iter().find_map(|row| {
        let text = row.join(" ");
        COLOR_PATTERN
            .captures_iter(&text)
            .filter_map(|c| c.get(1))
            .map(|m| m.as_str().to_uppercase())
            .find(|token| !NOT_A_COLOR.is_match(token))
    })
}

/// Last `-`/`_`/space separated segment of the file stem, upper-cased
pub fn from_file_name(file_name: &str) -> Option<String> {
    let stem = Path::new(file_name)
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| file_name.to_string());

    let parts: Vec<&str> = stem.split(['-', '_', ' ']).collect();
    if parts.len() < 2 {
        return None;
    }
    parts
        .last()
        .map(|s| s.trim().to_uppercase())
        .filter(|s| !s.is_empty())
}

/// Pattern match first, then the file name, then `default_color`
pub fn resolve(rows: &[Vec<String>], file_name: &str, default_color: &str) -> (String, ColorSource) {
    if let Some(color) = detect_in_rows(rows) {
        return (color, ColorSource::Pattern);
    }
    if let Some(color) = from_file_name(file_name) {
        return (color, ColorSource::FileName);
    }
    (default_color.to_string(), ColorSource::Default)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rows(lines: &[&[&str]]) -> Vec<Vec<String>> {
        lines
            .iter()
            .map(|r| r.iter().map(|s| s.to_string()).collect())
            .collect()
    }

    #[test]
    fn test_detects_token_after_reference() {
        let doc = rows(&[
            &["Production sheet"],
            &["Article", "R12345678 blk01 T-shirt basic"],
        ]);
        assert_eq!(detect_in_rows(&doc), Some("BLK01".to_string()));
    }

    #[test]
    fn test_skips_size_grade_tokens() {
        let doc = rows(&[
            &["R1234567 123A something"],
            &["R1234567 NAVY more text"],
        ]);
        assert_eq!(detect_in_rows(&doc), Some("NAVY".to_string()));
    }

    #[test]
    fn test_no_match_without_trailing_whitespace() {
        let doc = rows(&[&["R1234567 NAVY"]]);
        assert_eq!(detect_in_rows(&doc), None);
    }

    #[test]
    fn test_file_name_fallback() {
        assert_eq!(from_file_name("style-4021_red.csv"), Some("RED".to_string()));
        assert_eq!(from_file_name("sheet navy.txt"), Some("NAVY".to_string()));
        assert_eq!(from_file_name("sheet.csv"), None);
        assert_eq!(from_file_name("sheet-.csv"), None);
    }

    #[test]
    fn test_resolve_falls_back_to_default() {
        let (color, source) = resolve(&rows(&[&["010", "Join"]]), "sheet.csv", "STD");
        assert_eq!(color, "STD");
        assert_eq!(source, ColorSource::Default);
    }
}
