//! CLI argument definitions using clap derive

use clap::{Parser, Subcommand, ValueEnum};

use crate::cli::commands::{
    colors::ColorsArgs, completions::CompletionsArgs, config::ConfigCommands, export::ExportArgs,
    import::ImportArgs, matrix::MatrixArgs, report::ReportArgs,
};

#[derive(Parser)]
#[command(name = "opmx")]
#[command(author, version, about = "Garment operation matrix toolkit")]
#[command(long_about = "Reads production-sheet CSV exports (raw sheets or flat summaries), merges them by colour code, and renders or re-exports the operation matrix.")]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[command(flatten)]
    pub global: GlobalOpts,
}

#[derive(clap::Args, Clone, Debug)]
pub struct GlobalOpts {
    /// Output format
    #[arg(long, short = 'f', global = true, default_value = "auto")]
    pub format: OutputFormat,

    /// Suppress non-essential output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Enable verbose output
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Parse and merge sheets, reporting what each file produced
    Import(ImportArgs),

    /// List colour codes in the merged collection
    Colors(ColorsArgs),

    /// Show the operation matrix
    Matrix(MatrixArgs),

    /// Write the summary CSV for the selected colours
    Export(ExportArgs),

    /// Printable Markdown report of the matrix
    Report(ReportArgs),

    /// Show configuration
    #[command(subcommand)]
    Config(ConfigCommands),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Pick per command (tsv for tables)
    #[default]
    Auto,
    /// Aligned columns for the terminal
    Tsv,
    /// CSV format (for spreadsheets)
    Csv,
    /// Markdown tables
    Md,
    /// JSON format (for programming)
    Json,
    /// YAML format (full fidelity)
    Yaml,
}

impl OutputFormat {
    /// Resolve `auto` against a configured default, then against `fallback`
    pub fn resolve(self, configured: Option<&str>, fallback: OutputFormat) -> OutputFormat {
        if self != OutputFormat::Auto {
            return self;
        }
        configured
            .and_then(|name| OutputFormat::from_str(name, true).ok())
            .filter(|f| *f != OutputFormat::Auto)
            .unwrap_or(fallback)
    }
}
