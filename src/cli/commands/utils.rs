//! Shared utilities for CLI commands

use console::style;
use dialoguer::{theme::ColorfulTheme, MultiSelect};
use miette::{IntoDiagnostic, Result};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;

use crate::cli::helpers::short_path;
use crate::core::{Config, IngestReport, MatrixView, VariantCollection};

/// Input files or directories, shared by every data command
#[derive(clap::Args, Debug, Clone)]
pub struct SourceArgs {
    /// Sheet files or directories (directories are searched for .csv/.txt)
    #[arg(required = true)]
    pub paths: Vec<PathBuf>,
}

/// Colour selection, shared by matrix/export/report
#[derive(clap::Args, Debug, Clone, Default)]
pub struct SelectionArgs {
    /// Colour code to include (repeatable; default: all)
    #[arg(long = "color", short = 'c')]
    pub colors: Vec<String>,

    /// Keep only colours containing this text (case-insensitive)
    #[arg(long, short = 's')]
    pub search: Option<String>,

    /// Choose colours interactively
    #[arg(long)]
    pub pick: bool,
}

/// Everything a data command starts from
pub struct Loaded {
    pub config: Config,
    pub collection: VariantCollection,
    pub report: IngestReport,
}

/// Load config, ingest `source`, and print per-file failures to stderr
pub fn load(source: &SourceArgs, quiet: bool) -> Result<Loaded> {
    let config = Config::load();
    let mut collection = VariantCollection::new();
    let report = collection.ingest_paths(&source.paths, &config.parse_options());

    print_failures(&report, quiet);

    Ok(Loaded {
        config,
        collection,
        report,
    })
}

/// Like [`load`], but an empty collection is an error
pub fn load_non_empty(source: &SourceArgs, quiet: bool) -> Result<Loaded> {
    let loaded = load(source, quiet)?;
    if loaded.collection.is_empty() {
        return Err(miette::miette!(
            "No colour variants could be loaded from the given paths"
        ));
    }
    Ok(loaded)
}

pub fn print_failures(report: &IngestReport, quiet: bool) {
    for (path, err) in &report.failures {
        eprintln!("{} {}: {}", style("✗").red(), short_path(path), err);
    }
    if !quiet {
        for path in &report.skipped {
            eprintln!(
                "{} {}: unsupported file type, skipped",
                style("○").dim(),
                short_path(path)
            );
        }
    }
}

/// Build the matrix view and apply the selection options to it
pub fn select<'a>(collection: &'a VariantCollection, args: &SelectionArgs) -> Result<MatrixView<'a>> {
    let mut view = MatrixView::new(collection.variants());
    let known = view.all_colors();

    if !args.colors.is_empty() {
        let mut chosen = Vec::new();
        for wanted in &args.colors {
            let found = known
                .iter()
                .find(|c| c.eq_ignore_ascii_case(wanted.trim()))
                .ok_or_else(|| {
                    miette::miette!(
                        "Unknown colour '{}'. Available: {}",
                        wanted,
                        known.join(", ")
                    )
                })?;
            chosen.push(found.clone());
        }
        view.select(chosen);
    }

    if let Some(search) = &args.search {
        view.set_search(search.as_str());
        view.restrict_to_search();
    }

    if args.pick {
        pick_colors(&mut view)?;
    }

    Ok(view)
}

/// Interactive multi-select over the colours still matching the search text
fn pick_colors(view: &mut MatrixView<'_>) -> Result<()> {
    if !console::Term::stderr().is_term() {
        return Err(miette::miette!("--pick needs an interactive terminal"));
    }

    let options = view.filtered_colors();
    let defaults: Vec<bool> = options.iter().map(|c| view.is_selected(c)).collect();

    let picked = MultiSelect::with_theme(&ColorfulTheme::default())
        .with_prompt("Select colour codes")
        .items(&options)
        .defaults(&defaults)
        .interact()
        .into_diagnostic()?;

    view.select(picked.into_iter().map(|idx| options[idx].clone()));
    Ok(())
}

/// Write `content` to a file, or to stdout when no path is given
pub fn write_output(content: &str, output_path: Option<&PathBuf>, quiet: bool) -> Result<()> {
    match output_path {
        Some(path) => {
            let file = File::create(path).into_diagnostic()?;
            let mut writer = BufWriter::new(file);
            writer.write_all(content.as_bytes()).into_diagnostic()?;
            writer.flush().into_diagnostic()?;
            if !quiet {
                eprintln!("{} Written to {}", style("✓").green(), style(path.display()).cyan());
            }
        }
        None => print!("{}", content),
    }
    Ok(())
}
