//! Production sheet parser
//!
//! Text flows strictly downward through the submodules:
//! [`tokenizer`] → [`format`] → [`summary`] or [`raw_sheet`] (+ [`color`]) →
//! [`sizes`] reconciliation. Parsing is pure and synchronous: it performs no
//! I/O and reads no configuration beyond the [`ParseOptions`] it is handed.

pub mod color;
pub mod format;
pub mod raw_sheet;
pub mod sizes;
pub mod summary;
pub mod tokenizer;

use miette::Diagnostic;
use thiserror::Error;
use tracing::debug;

use crate::entities::ProductVariant;

pub use color::ColorSource;
pub use format::DocumentFormat;

/// Colour used when neither the sheet nor the file name yields one
pub const DEFAULT_COLOR: &str = "STD";

/// Section assumed until a raw sheet names one
pub const DEFAULT_SECTION: &str = "SEWING";

/// Material rows whose label contains this are vendor banners, not materials
pub const DEFAULT_VENDOR_FILTER: &str = "inteos";

/// Knobs the caller may turn; defaults reproduce the stock behaviour
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseOptions {
    pub default_color: String,
    pub default_section: String,
    pub vendor_filter: String,
    /// Union sizes of repeated summary materials instead of keeping the first
    pub merge_material_sizes: bool,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            default_color: DEFAULT_COLOR.to_string(),
            default_section: DEFAULT_SECTION.to_string(),
            vendor_filter: DEFAULT_VENDOR_FILTER.to_string(),
            merge_material_sizes: false,
        }
    }
}

/// Parse failures that reject a whole document
#[derive(Debug, Error, Diagnostic)]
pub enum ParseError {
    #[error("summary file '{file_name}' has a header but no usable data rows")]
    #[diagnostic(
        code(opmx::parse::empty_summary),
        help("summary rows need at least 8 comma-separated fields")
    )]
    EmptySummary { file_name: String },
}

/// Parser output together with how it was obtained
#[derive(Debug, Clone)]
pub struct ParsedDocument {
    pub format: DocumentFormat,
    pub variants: Vec<ProductVariant>,
    /// Set for raw sheets only
    pub color_source: Option<ColorSource>,
}

/// Parse one file's text into one or more colour variants. Never returns an empty list.
pub fn parse(
    content: &str,
    file_name: &str,
    options: &ParseOptions,
) -> Result<Vec<ProductVariant>, ParseError> {
    parse_document(content, file_name, options).map(|doc| doc.variants)
}

/// Like [`parse`], but also reports the detected format and colour source
pub fn parse_document(
    content: &str,
    file_name: &str,
    options: &ParseOptions,
) -> Result<ParsedDocument, ParseError> {
    let rows = tokenizer::split_rows(content);
    let format = DocumentFormat::detect(rows.first().map(Vec::as_slice));
    debug!(file = file_name, rows = rows.len(), %format, "detected document format");

    match format {
        DocumentFormat::ExportedSummary => {
            let mut variants = summary::reconstruct(&rows[1..], file_name, options);
            if variants.is_empty() {
                return Err(ParseError::EmptySummary {
                    file_name: file_name.to_string(),
                });
            }
            for variant in variants.iter_mut() {
                finish(variant);
            }
            Ok(ParsedDocument {
                format,
                variants,
                color_source: None,
            })
        }
        DocumentFormat::RawSheet => {
            let (color, source) = color::resolve(&rows, file_name, &options.default_color);
            debug!(file = file_name, color = %color, ?source, "resolved colour code");

            let mut variant =
                ProductVariant::new(format!("{}-{}", file_name, color), file_name, color);
            variant.operations = raw_sheet::walk(&rows, options);
            finish(&mut variant);

            Ok(ParsedDocument {
                format,
                variants: vec![variant],
                color_source: Some(source),
            })
        }
    }
}

/// Size reconciliation and the variant-level size union
fn finish(variant: &mut ProductVariant) {
    sizes::reconcile(&mut variant.operations);
    variant.unique_sizes = sizes::unique_sizes(&variant.operations);
}
