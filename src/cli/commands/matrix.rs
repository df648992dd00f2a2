//! `opmx matrix` command - Show the operation matrix

use console::style;
use miette::{IntoDiagnostic, Result};
use serde::Serialize;

use crate::cli::commands::utils::{self, SelectionArgs, SourceArgs};
use crate::cli::table::{CellValue, ColumnDef, TableConfig, TableFormatter, TableRow};
use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::{MatrixFooter, MatrixRow};

#[derive(clap::Args, Debug)]
pub struct MatrixArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    #[command(flatten)]
    pub selection: SelectionArgs,

    /// Only OP, variant, colour, description, machine and sizes
    #[arg(long)]
    pub compact: bool,

    /// Wrap long text columns at this width
    #[arg(long, short = 'w')]
    pub wrap: Option<usize>,
}

pub(crate) const MATRIX_COLUMNS: &[ColumnDef] = &[
    ColumnDef::new("op", "OP", 6),
    ColumnDef::new("variant", "VAR", 5),
    ColumnDef::new("section", "SECTION", 12),
    ColumnDef::new("color", "COLOR", 10),
    ColumnDef::new("description", "DESCRIPTION", 34),
    ColumnDef::new("machine", "MACHINE", 18),
    ColumnDef::new("material", "MATERIAL", 30),
    ColumnDef::new("tech", "TECH SPECS", 30),
    ColumnDef::new("sizes", "SIZES", 24),
    ColumnDef::new("mod", "MOD", 5),
    ColumnDef::new("wage", "WAGE", 5),
];

pub(crate) const COMPACT_KEYS: &[&str] = &["op", "variant", "color", "description", "machine", "sizes"];

pub(crate) fn visible_keys(compact: bool) -> Vec<&'static str> {
    if compact {
        COMPACT_KEYS.to_vec()
    } else {
        MATRIX_COLUMNS.iter().map(|c| c.key).collect()
    }
}

pub(crate) fn to_table_row(row: &MatrixRow) -> TableRow {
    TableRow::new()
        .cell(
            "op",
            CellValue::Step {
                stt: row.stt.clone(),
                first: row.first_of_stt,
            },
        )
        .cell("variant", CellValue::Text(row.variant_id.clone()))
        .cell("section", CellValue::Text(row.section.clone()))
        .cell("color", CellValue::Color(row.color.clone()))
        .cell("description", CellValue::Text(row.description.clone()))
        .cell("machine", CellValue::Machine(row.machine.clone()))
        .cell("material", CellValue::Material(row.material.clone()))
        .cell("tech", CellValue::Tech(row.tech_specs.clone()))
        .cell("sizes", CellValue::Sizes(row.display_sizes()))
        .cell("mod", CellValue::Optional(row.mod_level.clone()))
        .cell("wage", CellValue::Optional(row.wage_group.clone()))
}

pub(crate) fn footer_line(footer: &MatrixFooter) -> String {
    format!(
        "Colours: {}/{}  Process steps: {}",
        footer.colors_viewed, footer.colors_total, footer.process_steps
    )
}

#[derive(Serialize)]
struct MatrixJson<'a> {
    colors: Vec<String>,
    rows: &'a [MatrixRow],
    footer: MatrixFooter,
}

pub fn run(args: MatrixArgs, global: &GlobalOpts) -> Result<()> {
    let loaded = utils::load_non_empty(&args.source, global.quiet)?;
    let format = global
        .format
        .resolve(loaded.config.default_format.as_deref(), OutputFormat::Tsv);

    let mut view = utils::select(&loaded.collection, &args.selection)?;
    view.set_compact(args.compact);
    let rows = view.rows();
    let footer = view.footer();

    match format {
        OutputFormat::Json | OutputFormat::Yaml => {
            let doc = MatrixJson {
                colors: view.selected_colors(),
                rows: &rows,
                footer,
            };
            if format == OutputFormat::Json {
                println!("{}", serde_json::to_string_pretty(&doc).into_diagnostic()?);
            } else {
                print!("{}", serde_yml::to_string(&doc).into_diagnostic()?);
            }
        }
        _ => {
            let wrap = args.wrap.or(loaded.config.wrap_width);
            let config = wrap.map(TableConfig::with_wrap).unwrap_or_else(TableConfig::for_pipe);
            let table_rows: Vec<TableRow> = rows.iter().map(to_table_row).collect();
            TableFormatter::new(MATRIX_COLUMNS, "row")
                .with_config(config)
                .output(&table_rows, format, &visible_keys(view.is_compact()));

            if format == OutputFormat::Tsv && !global.quiet {
                println!();
                println!("{}", style(footer_line(&footer)).dim());
            }
        }
    }
    Ok(())
}
