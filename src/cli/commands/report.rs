//! `opmx report` command - Printable Markdown report of the matrix

use chrono::Local;
use miette::Result;
use std::path::PathBuf;
use tabled::{builder::Builder, settings::Style};

use crate::cli::commands::matrix::{to_table_row, visible_keys, MATRIX_COLUMNS};
use crate::cli::commands::utils::{self, SelectionArgs, SourceArgs};
use crate::cli::GlobalOpts;
use crate::core::MatrixView;

#[derive(clap::Args, Debug)]
pub struct ReportArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    #[command(flatten)]
    pub selection: SelectionArgs,

    /// Only OP, variant, colour, description, machine and sizes
    #[arg(long)]
    pub compact: bool,

    /// Output to file instead of stdout
    #[arg(long, short = 'o')]
    pub output: Option<PathBuf>,
}

pub fn run(args: ReportArgs, global: &GlobalOpts) -> Result<()> {
    let loaded = utils::load_non_empty(&args.source, global.quiet)?;
    let mut view = utils::select(&loaded.collection, &args.selection)?;
    view.set_compact(args.compact);

    let content = render(&view, &Local::now().format("%Y-%m-%d").to_string());
    utils::write_output(&content, args.output.as_ref(), global.quiet)
}

/// Markdown document: title, matrix table, footer counts
pub(crate) fn render(view: &MatrixView<'_>, date: &str) -> String {
    let keys = visible_keys(view.is_compact());
    let columns: Vec<_> = MATRIX_COLUMNS
        .iter()
        .filter(|c| keys.contains(&c.key))
        .collect();

    let mut output = String::new();
    output.push_str("# Operation Matrix\n\n");
    output.push_str(&format!(
        "Colours: {}  \nGenerated: {}\n\n",
        view.selected_colors().join(", "),
        date
    ));

    let mut builder = Builder::default();
    builder.push_record(columns.iter().map(|c| c.header.to_string()));
    for row in view.rows() {
        let table_row = to_table_row(&row);
        builder.push_record(columns.iter().map(|c| {
            table_row
                .get(c.key)
                .map(|v| v.format_md())
                .unwrap_or_else(|| "-".to_string())
        }));
    }
    output.push_str(&builder.build().with(Style::markdown()).to_string());

    let footer = view.footer();
    output.push_str("\n\n## Summary\n\n");
    output.push_str(&format!(
        "- **Colours:** {} of {}\n",
        footer.colors_viewed, footer.colors_total
    ));
    output.push_str(&format!("- **Process Steps:** {}\n", footer.process_steps));
    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::{parse, ParseOptions};

    #[test]
    fn test_report_contains_table_and_footer() {
        let sheet = "010,,Join Shoulder\nVariant: 1,S M\nMachine : Flatlock\n020,,Hem\nVariant: 1,S\n";
        let variants = parse(sheet, "style-red.csv", &ParseOptions::default()).unwrap();
        let view = MatrixView::new(&variants);

        let report = render(&view, "2024-03-07");
        assert!(report.starts_with("# Operation Matrix"));
        assert!(report.contains("Generated: 2024-03-07"));
        assert!(report.contains("| OP "));
        assert!(report.contains("Join Shoulder"));
        assert!(report.contains("**RED**"));
        assert!(report.contains("- **Colours:** 1 of 1"));
        assert!(report.contains("- **Process Steps:** 2"));
    }

    #[test]
    fn test_compact_report_drops_tech_columns() {
        let sheet = "010,,Join\nVariant: 1,S\n";
        let variants = parse(sheet, "style-red.csv", &ParseOptions::default()).unwrap();
        let mut view = MatrixView::new(&variants);
        view.set_compact(true);

        let report = render(&view, "2024-03-07");
        assert!(!report.contains("TECH SPECS"));
        assert!(report.contains("MACHINE"));
    }
}
