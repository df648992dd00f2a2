//! The merged colour-variant collection and batch file ingestion

use miette::Diagnostic;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, warn};

use crate::entities::ProductVariant;
use crate::parser::{self, ColorSource, DocumentFormat, ParseError, ParseOptions};

/// File extensions accepted for ingestion (compared case-insensitively)
pub const INGEST_EXTENSIONS: [&str; 2] = ["csv", "txt"];

/// Why a single file could not be ingested
#[derive(Debug, Error, Diagnostic)]
pub enum IngestError {
    #[error("path does not exist")]
    #[diagnostic(code(opmx::ingest::not_found))]
    NotFound,

    #[error("could not read file: {0}")]
    #[diagnostic(code(opmx::ingest::io))]
    Io(#[from] std::io::Error),

    #[error("could not walk directory: {0}")]
    #[diagnostic(code(opmx::ingest::walk))]
    Walk(#[from] walkdir::Error),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Parse(#[from] ParseError),
}

/// A file that parsed successfully
#[derive(Debug, Clone, Serialize)]
pub struct LoadedFile {
    pub path: PathBuf,
    pub format: DocumentFormat,
    pub colors: Vec<String>,
    pub operations: usize,
    #[serde(skip)]
    pub color_source: Option<ColorSource>,
}

/// Outcome of one batch: what loaded, what failed, what was passed over
#[derive(Debug, Default)]
pub struct IngestReport {
    pub loaded: Vec<LoadedFile>,
    pub failures: Vec<(PathBuf, IngestError)>,
    pub skipped: Vec<PathBuf>,
}

impl IngestReport {
    pub fn has_failures(&self) -> bool {
        !self.failures.is_empty()
    }
}

/// Colour variants in upload order, at most one per colour code
#[derive(Debug, Clone, Default, Serialize)]
#[serde(transparent)]
pub struct VariantCollection {
    variants: Vec<ProductVariant>,
}

impl VariantCollection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn variants(&self) -> &[ProductVariant] {
        &self.variants
    }

    pub fn len(&self) -> usize {
        self.variants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.variants.is_empty()
    }

    pub fn get(&self, color: &str) -> Option<&ProductVariant> {
        self.variants.iter().find(|v| v.color == color)
    }

    /// Fold `incoming` in: a variant whose colour already exists replaces the
    /// existing one in place, otherwise it is appended.
    pub fn merge(&mut self, incoming: Vec<ProductVariant>) {
        for variant in incoming {
            match self.variants.iter_mut().find(|v| v.color == variant.color) {
                Some(existing) => {
                    debug!(color = %variant.color, file = %variant.file_name, "replacing variant");
                    *existing = variant;
                }
                None => self.variants.push(variant),
            }
        }
    }

    /// Parse every accepted file under `paths` and merge the results.
    ///
    /// Failures are recorded per file and never abort the batch. The merged
    /// result is committed once, after the last file.
    pub fn ingest_paths(&mut self, paths: &[PathBuf], options: &ParseOptions) -> IngestReport {
        let mut report = IngestReport::default();
        let mut working = self.clone();

        for path in collect_files(paths, &mut report) {
            match ingest_file(&path, options) {
                Ok(doc) => {
                    let colors: Vec<String> = doc.variants.iter().map(|v| v.color.clone()).collect();
                    let operations = doc.variants.iter().map(|v| v.operations.len()).sum();
                    debug!(
                        file = %path.display(),
                        format = %doc.format,
                        colors = ?colors,
                        operations,
                        "loaded file"
                    );
                    working.merge(doc.variants);
                    report.loaded.push(LoadedFile {
                        path,
                        format: doc.format,
                        colors,
                        operations,
                        color_source: doc.color_source,
                    });
                }
                Err(e) => {
                    warn!(file = %path.display(), error = %e, "failed to ingest file");
                    report.failures.push((path, e));
                }
            }
        }

        *self = working;
        report
    }
}

/// Read and parse one file. The parser sees only the file's own name.
///
/// Bytes that are not UTF-8 are replaced with U+FFFD rather than rejecting
/// the file.
pub fn ingest_file(path: &Path, options: &ParseOptions) -> Result<parser::ParsedDocument, IngestError> {
    let bytes = fs::read(path)?;
    let content = decode_lossy(&bytes, path);
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());

    Ok(parser::parse_document(&content, &file_name, options)?)
}

fn decode_lossy(bytes: &[u8], path: &Path) -> String {
    if let Err(e) = std::str::from_utf8(bytes) {
        warn!(
            file = %path.display(),
            offset = e.valid_up_to(),
            "file is not valid UTF-8, replacing invalid bytes"
        );
    }
    String::from_utf8_lossy(bytes).into_owned()
}

/// Whether a path's extension is one we ingest
pub fn is_ingestable(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| INGEST_EXTENSIONS.iter().any(|ok| ext.eq_ignore_ascii_case(ok)))
}

/// Expand directories (recursively, in file-name order) and filter by extension
fn collect_files(paths: &[PathBuf], report: &mut IngestReport) -> Vec<PathBuf> {
    let mut files = Vec::new();

    for path in paths {
        if path.is_dir() {
            for entry in walkdir::WalkDir::new(path).sort_by_file_name() {
                let entry = match entry {
                    Ok(e) => e,
                    Err(e) => {
                        let at = e.path().map(Path::to_path_buf).unwrap_or_else(|| path.clone());
                        report.failures.push((at, IngestError::Walk(e)));
                        continue;
                    }
                };
                if !entry.file_type().is_file() {
                    continue;
                }
                push_candidate(entry.into_path(), &mut files, report);
            }
        } else if path.exists() {
            push_candidate(path.clone(), &mut files, report);
        } else {
            report.failures.push((path.clone(), IngestError::NotFound));
        }
    }

    files
}

fn push_candidate(path: PathBuf, files: &mut Vec<PathBuf>, report: &mut IngestReport) {
    if is_ingestable(&path) {
        files.push(path);
    } else {
        debug!(file = %path.display(), "skipping file with unsupported extension");
        report.skipped.push(path);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::OperationData;
    use tempfile::tempdir;

    fn variant(color: &str, file: &str, stts: &[&str]) -> ProductVariant {
        let mut v = ProductVariant::new(format!("{file}-{color}"), file, color);
        for stt in stts {
            v.operations.push(OperationData::new(*stt, "op", "SEWING"));
        }
        v
    }

    #[test]
    fn test_merge_appends_new_colours_in_order() {
        let mut collection = VariantCollection::new();
        collection.merge(vec![variant("RED", "a.csv", &["010"])]);
        collection.merge(vec![variant("BLUE", "b.csv", &["010"])]);

        let colors: Vec<&str> = collection.variants().iter().map(|v| v.color.as_str()).collect();
        assert_eq!(colors, vec!["RED", "BLUE"]);
    }

    #[test]
    fn test_merge_replaces_same_colour_entirely() {
        let mut collection = VariantCollection::new();
        collection.merge(vec![
            variant("RED", "a.csv", &["010", "020"]),
            variant("BLUE", "a.csv", &["010"]),
        ]);
        collection.merge(vec![variant("RED", "b.csv", &["030"])]);

        assert_eq!(collection.len(), 2);
        assert_eq!(collection.variants()[0].color, "RED");
        let red = collection.get("RED").unwrap();
        assert_eq!(red.file_name, "b.csv");
        assert_eq!(red.operations.len(), 1);
        assert_eq!(red.operations[0].stt, "030");
    }

    #[test]
    fn test_ingest_two_files_same_colour_keeps_last() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("a-red.csv"), "010,,Join\n").unwrap();
        fs::write(dir.path().join("b-red.csv"), "020,,Hem\n030,,Label\n").unwrap();

        let mut collection = VariantCollection::new();
        let report = collection.ingest_paths(&[dir.path().to_path_buf()], &ParseOptions::default());

        assert_eq!(report.loaded.len(), 2);
        assert_eq!(collection.len(), 1);
        let red = collection.get("RED").unwrap();
        assert_eq!(red.file_name, "b-red.csv");
        assert_eq!(red.operations.len(), 2);
    }

    #[test]
    fn test_latin1_sheet_loads_with_replacement_chars() {
        crate::logging::init_test();
        let dir = tempdir().unwrap();
        fs::write(
            dir.path().join("style-red.csv"),
            b"010,,Couture \xe9paule\nVariant: 1,S M\nMachine : Flatlock\n",
        )
        .unwrap();

        let mut collection = VariantCollection::new();
        let report = collection.ingest_paths(&[dir.path().to_path_buf()], &ParseOptions::default());

        assert!(!report.has_failures());
        assert_eq!(report.loaded.len(), 1);
        let red = collection.get("RED").unwrap();
        let op = red.operation("010").unwrap();
        assert_eq!(op.description, "Couture \u{fffd}paule");
        assert_eq!(op.config("001").unwrap().machine, "Flatlock");
    }

    #[test]
    fn test_failed_file_does_not_block_others() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("empty-navy.csv"), "OP,Variant,Section\n").unwrap();
        fs::write(dir.path().join("good-red.csv"), "010,,Join\n").unwrap();
        fs::write(dir.path().join("notes.pdf"), "ignored").unwrap();

        let mut collection = VariantCollection::new();
        let report = collection.ingest_paths(&[dir.path().to_path_buf()], &ParseOptions::default());

        assert_eq!(report.loaded.len(), 1);
        assert_eq!(report.failures.len(), 1);
        assert!(matches!(
            report.failures[0].1,
            IngestError::Parse(ParseError::EmptySummary { .. })
        ));
        assert_eq!(report.skipped.len(), 1);
        assert!(collection.get("RED").is_some());
        assert!(collection.get("NAVY").is_none());
    }

    #[test]
    fn test_missing_path_is_a_failure() {
        let mut collection = VariantCollection::new();
        let report = collection.ingest_paths(
            &[PathBuf::from("/definitely/not/here.csv")],
            &ParseOptions::default(),
        );
        assert!(report.has_failures());
        assert!(matches!(report.failures[0].1, IngestError::NotFound));
        assert!(collection.is_empty());
    }

    #[test]
    fn test_is_ingestable() {
        assert!(is_ingestable(Path::new("a.csv")));
        assert!(is_ingestable(Path::new("a.TXT")));
        assert!(!is_ingestable(Path::new("a.xlsx")));
        assert!(!is_ingestable(Path::new("README")));
    }
}
