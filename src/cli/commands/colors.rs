//! `opmx colors` command - List colour codes in the merged collection

use miette::{IntoDiagnostic, Result};
use serde::Serialize;

use crate::cli::commands::utils::{self, SourceArgs};
use crate::cli::table::{CellValue, ColumnDef, TableConfig, TableFormatter, TableRow};
use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::MatrixView;

#[derive(clap::Args, Debug)]
pub struct ColorsArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    /// Only colours containing this text (case-insensitive)
    #[arg(long, short = 's')]
    pub search: Option<String>,
}

const COLUMNS: &[ColumnDef] = &[
    ColumnDef::new("color", "COLOR", 10),
    ColumnDef::new("file", "FILE", 36),
    ColumnDef::new("operations", "OPS", 6),
    ColumnDef::new("configs", "CONFIGS", 8),
    ColumnDef::new("sizes", "SIZES", 40),
];

#[derive(Serialize)]
struct ColorEntry<'a> {
    color: &'a str,
    file_name: &'a str,
    operations: usize,
    configs: usize,
    sizes: Vec<String>,
}

pub fn run(args: ColorsArgs, global: &GlobalOpts) -> Result<()> {
    let loaded = utils::load_non_empty(&args.source, global.quiet)?;
    let format = global
        .format
        .resolve(loaded.config.default_format.as_deref(), OutputFormat::Tsv);

    let mut view = MatrixView::new(loaded.collection.variants());
    if let Some(search) = &args.search {
        view.set_search(search.as_str());
    }

    let entries: Vec<ColorEntry> = view
        .filtered_colors()
        .iter()
        .filter_map(|color| loaded.collection.get(color))
        .map(|v| {
            let mut sizes = v.unique_sizes.clone();
            sizes.sort_by(|a, b| crate::parser::sizes::natural_cmp(a, b));
            ColorEntry {
                color: &v.color,
                file_name: &v.file_name,
                operations: v.operations.len(),
                configs: v.config_count(),
                sizes,
            }
        })
        .collect();

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&entries).into_diagnostic()?);
        }
        OutputFormat::Yaml => print!("{}", serde_yml::to_string(&entries).into_diagnostic()?),
        _ => {
            let rows: Vec<TableRow> = entries
                .iter()
                .map(|e| {
                    TableRow::new()
                        .cell("color", CellValue::Color(e.color.to_string()))
                        .cell("file", CellValue::Text(e.file_name.to_string()))
                        .cell("operations", CellValue::Number(e.operations))
                        .cell("configs", CellValue::Number(e.configs))
                        .cell("sizes", CellValue::Sizes(e.sizes.clone()))
                })
                .collect();

            let config = if global.quiet {
                TableConfig::for_pipe()
            } else {
                TableConfig::default()
            };
            let keys: Vec<&str> = COLUMNS.iter().map(|c| c.key).collect();
            TableFormatter::new(COLUMNS, "colour")
                .with_config(config)
                .output(&rows, format, &keys);
        }
    }
    Ok(())
}
