//! `opmx config` command - Inspect configuration
//!
//! Values come from, in increasing priority: built-in defaults, the global
//! config file, `./.opmx.yaml`, then `OPMX_*` environment variables.

use clap::Subcommand;
use console::style;
use miette::{IntoDiagnostic, Result};

use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::config::CONFIG_KEYS;
use crate::core::Config;

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show effective configuration values
    Show(ShowArgs),

    /// Show paths to configuration files
    Path,

    /// List all available configuration keys
    Keys,
}

#[derive(clap::Args, Debug)]
pub struct ShowArgs {
    /// Show only this key's value
    pub key: Option<String>,
}

pub fn run(cmd: ConfigCommands, global: &GlobalOpts) -> Result<()> {
    match cmd {
        ConfigCommands::Show(args) => run_show(args, global),
        ConfigCommands::Path => run_path(),
        ConfigCommands::Keys => run_keys(),
    }
}

fn run_show(args: ShowArgs, global: &GlobalOpts) -> Result<()> {
    let config = Config::load();

    if let Some(key) = &args.key {
        if !CONFIG_KEYS.iter().any(|(k, _)| *k == key.as_str()) {
            return Err(miette::miette!(
                "Unknown key '{}'. Run 'opmx config keys' for the list",
                key
            ));
        }
        return match config.value_of(key) {
            Some(v) => {
                println!("{}", v);
                Ok(())
            }
            None => Err(miette::miette!("Key '{}' is not set", key)),
        };
    }

    match global.format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&config).into_diagnostic()?);
        }
        OutputFormat::Yaml => print!("{}", serde_yml::to_string(&config).into_diagnostic()?),
        _ => {
            println!("{}", style("Effective Configuration").bold().underlined());
            println!();
            for (key, _) in CONFIG_KEYS {
                print_config_value(key, config.value_of(key).as_deref());
            }
            println!();
            println!("{}", style("Config Sources (in priority order):").dim());
            println!("  1. Environment variables (OPMX_DEFAULT_COLOR, OPMX_DEFAULT_SECTION, OPMX_FORMAT)");
            println!("  2. Local config (./.opmx.yaml)");
            println!("  3. Global config (~/.config/opmx/config.yaml)");
        }
    }
    Ok(())
}

fn run_path() -> Result<()> {
    let global_path = Config::global_config_path()
        .ok_or_else(|| miette::miette!("Could not determine global config directory"))?;
    let local_path = Config::local_config_path();

    println!("{}", style("Configuration file paths:").bold());
    println!();
    for (label, path) in [("Global:", global_path), ("Local: ", local_path)] {
        let state = if path.exists() {
            style("(exists)").green()
        } else {
            style("(not created)").dim()
        };
        println!("  {} {} {}", style(label).cyan(), path.display(), state);
    }
    Ok(())
}

fn run_keys() -> Result<()> {
    println!("{}", style("Available configuration keys:").bold());
    println!();
    for (key, description) in CONFIG_KEYS {
        println!("  {:<22} {}", style(key).cyan(), style(description).dim());
    }
    Ok(())
}

fn print_config_value(key: &str, value: Option<&str>) {
    match value {
        Some(v) => println!("  {}: {}", style(key).cyan(), style(v).yellow()),
        None => println!("  {}: {}", style(key).cyan(), style("(not set)").dim()),
    }
}
