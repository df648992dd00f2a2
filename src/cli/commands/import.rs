//! `opmx import` command - Parse and merge production sheets

use console::style;
use miette::{IntoDiagnostic, Result};

use crate::cli::commands::utils::{self, SourceArgs};
use crate::cli::helpers::short_path;
use crate::cli::{GlobalOpts, OutputFormat};
use crate::parser::ColorSource;

#[derive(clap::Args, Debug)]
pub struct ImportArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    /// Exit successfully even when some files failed
    #[arg(long)]
    pub skip_errors: bool,
}

pub fn run(args: ImportArgs, global: &GlobalOpts) -> Result<()> {
    let loaded = utils::load(&args.source, global.quiet)?;
    let format = global
        .format
        .resolve(loaded.config.default_format.as_deref(), OutputFormat::Tsv);

    match format {
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&loaded.collection).into_diagnostic()?;
            println!("{}", json);
        }
        OutputFormat::Yaml => {
            let yaml = serde_yml::to_string(&loaded.collection).into_diagnostic()?;
            print!("{}", yaml);
        }
        _ => print_report(&loaded, global.quiet),
    }

    let failures = loaded.report.failures.len();
    if failures > 0 && !args.skip_errors {
        return Err(miette::miette!("Import completed with {} failed file(s)", failures));
    }
    Ok(())
}

fn print_report(loaded: &utils::Loaded, quiet: bool) {
    let report = &loaded.report;

    for file in &report.loaded {
        let source_note = match file.color_source {
            Some(ColorSource::FileName) => style(" (colour from file name)").dim().to_string(),
            Some(ColorSource::Default) => style(" (default colour)").yellow().to_string(),
            _ => String::new(),
        };
        println!(
            "{} {} [{}] → {} ({} operation(s)){}",
            style("✓").green(),
            short_path(&file.path),
            file.format,
            style(file.colors.join(", ")).cyan(),
            file.operations,
            source_note
        );
    }

    if quiet {
        return;
    }

    let collection = &loaded.collection;
    let operations: usize = collection.variants().iter().map(|v| v.operations.len()).sum();

    println!();
    println!("{}", style("─".repeat(50)).dim());
    println!("{}", style("Import Summary").bold());
    println!("{}", style("─".repeat(50)).dim());
    println!("  Files loaded:     {}", style(report.loaded.len()).cyan());
    println!("  Colours:          {}", style(collection.len()).green());
    println!("  Operations:       {}", style(operations).cyan());
    if report.has_failures() {
        println!("  Failed:           {}", style(report.failures.len()).red());
    }
    if !report.skipped.is_empty() {
        println!("  Skipped:          {}", style(report.skipped.len()).dim());
    }
}
