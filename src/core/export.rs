//! Summary CSV export
//!
//! The output is itself a valid summary document: re-parsing it rebuilds the
//! same colour / operation / sub-variant structure.

use chrono::NaiveDate;
use miette::Diagnostic;
use std::io::Write;
use thiserror::Error;

use crate::core::matrix::MatrixRow;

/// Column header of the summary format
pub const EXPORT_HEADER: [&str; 11] = [
    "OP",
    "Variant",
    "Section",
    "Color Code",
    "Description",
    "Machine",
    "Material",
    "Technical Specs",
    "Sizes",
    "Mod",
    "Wage",
];

const UTF8_BOM: &str = "\u{feff}";

#[derive(Debug, Error, Diagnostic)]
pub enum ExportError {
    #[error("failed to write export: {0}")]
    #[diagnostic(code(opmx::export::io))]
    Io(#[from] std::io::Error),

    #[error("failed to encode CSV record: {0}")]
    #[diagnostic(code(opmx::export::csv))]
    Csv(#[from] csv::Error),
}

/// Write BOM, header and one fully-quoted record per matrix row
pub fn write_summary_csv<W: Write>(rows: &[MatrixRow], mut writer: W) -> Result<(), ExportError> {
    writeln!(writer, "{}{}", UTF8_BOM, EXPORT_HEADER.join(","))?;

    let mut csv_writer = csv::WriterBuilder::new()
        .quote_style(csv::QuoteStyle::Always)
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(&mut writer);

    for row in rows {
        csv_writer.write_record(record(row))?;
    }
    csv_writer.flush()?;
    drop(csv_writer);

    writer.flush()?;
    Ok(())
}

/// The export as an in-memory string
pub fn export_to_string(rows: &[MatrixRow]) -> Result<String, ExportError> {
    let mut buf = Vec::new();
    write_summary_csv(rows, &mut buf)?;
    // Every piece written above is UTF-8
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

fn record(row: &MatrixRow) -> [String; 11] {
    [
        row.stt.clone(),
        row.variant_id.clone(),
        row.section.clone(),
        row.color.clone(),
        row.description.clone(),
        row.machine.clone(),
        row.material.clone(),
        row.tech_specs.to_string(),
        row.sizes.join(" "),
        row.mod_level.clone().unwrap_or_default(),
        row.wage_group.clone().unwrap_or_default(),
    ]
}

/// `ops_matrix_<COLORS>_<YYYY-MM-DD>.csv`, with `No_Colors` for an empty selection
pub fn export_file_name(selected: &[String], date: NaiveDate) -> String {
    let colors = if selected.is_empty() {
        "No_Colors".to_string()
    } else {
        selected.join("_")
    };
    format!("ops_matrix_{}_{}.csv", colors, date.format("%Y-%m-%d"))
}
