//! `opmx export` command - Write the summary CSV

use chrono::Local;
use console::style;
use miette::{IntoDiagnostic, Result};
use std::fs::File;
use std::io::{self, BufWriter};
use std::path::PathBuf;

use crate::cli::commands::utils::{self, SelectionArgs, SourceArgs};
use crate::cli::GlobalOpts;
use crate::core::{export_file_name, write_summary_csv};

#[derive(clap::Args, Debug)]
pub struct ExportArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    #[command(flatten)]
    pub selection: SelectionArgs,

    /// Output file (default: stdout)
    #[arg(long, short = 'o', conflicts_with = "auto_name")]
    pub output: Option<PathBuf>,

    /// Name the file ops_matrix_<COLORS>_<DATE>.csv in the current directory
    #[arg(long)]
    pub auto_name: bool,
}

pub fn run(args: ExportArgs, global: &GlobalOpts) -> Result<()> {
    let loaded = utils::load_non_empty(&args.source, global.quiet)?;
    let view = utils::select(&loaded.collection, &args.selection)?;
    let rows = view.rows();

    let target = if args.auto_name {
        Some(PathBuf::from(export_file_name(
            &view.selected_colors(),
            Local::now().date_naive(),
        )))
    } else {
        args.output
    };

    match target {
        Some(path) => {
            let file = File::create(&path).into_diagnostic()?;
            write_summary_csv(&rows, BufWriter::new(file))?;
            if !global.quiet {
                eprintln!(
                    "{} Exported {} row(s) to {}",
                    style("✓").green(),
                    rows.len(),
                    style(path.display()).cyan()
                );
            }
        }
        None => write_summary_csv(&rows, io::stdout().lock())?,
    }
    Ok(())
}
