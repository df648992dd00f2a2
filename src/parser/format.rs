//! Document shape detection from the first row

use serde::Serialize;
use std::fmt;

/// Accepted spellings of the first summary header cell
pub const SUMMARY_HEADER_TOKENS: [&str; 2] = ["OP", "STT"];

/// The two CSV layouts the parser understands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentFormat {
    /// Flat, one row per material item, as written by the exporter
    ExportedSummary,
    /// Nested, label-driven production sheet from the upstream system
    RawSheet,
}

impl DocumentFormat {
    /// Single-row lookahead: a first cell of exactly `OP` or `STT` means summary
    pub fn detect(first_row: Option<&[String]>) -> Self {
        match first_row.and_then(|row| row.first()) {
            Some(cell) if SUMMARY_HEADER_TOKENS.contains(&cell.as_str()) => {
                DocumentFormat::ExportedSummary
            }
            _ => DocumentFormat::RawSheet,
        }
    }
}

impl fmt::Display for DocumentFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DocumentFormat::ExportedSummary => write!(f, "summary"),
            DocumentFormat::RawSheet => write!(f, "raw sheet"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(cells: &[&str]) -> Vec<String> {
        cells.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_summary_header_tokens_select_summary() {
        for token in ["STT", "OP"] {
            let r = row(&[token, "Variant", "Section"]);
            assert_eq!(
                DocumentFormat::detect(Some(&r)),
                DocumentFormat::ExportedSummary
            );
        }
    }

    #[test]
    fn test_detection_is_case_sensitive() {
        let r = row(&["op", "Variant"]);
        assert_eq!(DocumentFormat::detect(Some(&r)), DocumentFormat::RawSheet);
    }

    #[test]
    fn test_other_first_cells_select_raw() {
        for token in ["010", "Production section: SEWING", "", "OPERATION"] {
            let r = row(&[token]);
            assert_eq!(DocumentFormat::detect(Some(&r)), DocumentFormat::RawSheet);
        }
        assert_eq!(DocumentFormat::detect(None), DocumentFormat::RawSheet);
    }
}
