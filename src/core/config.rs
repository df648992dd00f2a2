//! Configuration management with layered hierarchy

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::warn;

use crate::parser::{ParseOptions, DEFAULT_COLOR, DEFAULT_SECTION, DEFAULT_VENDOR_FILTER};

/// File name of the per-directory config
pub const LOCAL_CONFIG_FILE: &str = ".opmx.yaml";

/// opmx configuration with layered hierarchy
#[derive(Debug, Default, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    /// Colour code used when a sheet yields none
    pub default_color: Option<String>,

    /// Section assumed before a raw sheet names one
    pub default_section: Option<String>,

    /// Material rows containing this text are skipped
    pub vendor_filter: Option<String>,

    /// Union sizes of repeated materials in summary files
    pub merge_material_sizes: Option<bool>,

    /// Default output format
    pub default_format: Option<String>,

    /// Wrap width for wide text columns
    pub wrap_width: Option<usize>,
}

impl Config {
    /// Load configuration from all sources, merging in priority order
    pub fn load() -> Self {
        let mut config = Config::default();

        // 1. Built-in defaults (resolved lazily by the accessors)

        // 2. Global user config (~/.config/opmx/config.yaml)
        if let Some(global_path) = Self::global_config_path() {
            if let Some(global) = Self::read_file(&global_path) {
                config.merge(global);
            }
        }

        // 3. Local config (./.opmx.yaml)
        if let Some(local) = Self::read_file(&Self::local_config_path()) {
            config.merge(local);
        }

        // 4. Environment variables
        config.merge(Self::from_env(|key| std::env::var(key).ok()));

        config
    }

    /// Get the path to the global config file
    pub fn global_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("", "", "opmx")
            .map(|dirs| dirs.config_dir().join("config.yaml"))
    }

    /// Path of the config file in the working directory
    pub fn local_config_path() -> PathBuf {
        PathBuf::from(LOCAL_CONFIG_FILE)
    }

    /// Read one YAML layer; a missing file is silent, a broken one is logged and ignored
    fn read_file(path: &Path) -> Option<Config> {
        if !path.exists() {
            return None;
        }
        let contents = match std::fs::read_to_string(path) {
            Ok(c) => c,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "could not read config file");
                return None;
            }
        };
        match serde_yml::from_str::<Config>(&contents) {
            Ok(config) => Some(config),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "ignoring malformed config file");
                None
            }
        }
    }

    /// Environment layer, read through `lookup` so tests need not touch the process env
    fn from_env(lookup: impl Fn(&str) -> Option<String>) -> Config {
        Config {
            default_color: lookup("OPMX_DEFAULT_COLOR").filter(|v| !v.trim().is_empty()),
            default_section: lookup("OPMX_DEFAULT_SECTION").filter(|v| !v.trim().is_empty()),
            default_format: lookup("OPMX_FORMAT").filter(|v| !v.trim().is_empty()),
            ..Config::default()
        }
    }

    /// Merge another config into this one (other takes precedence)
    pub fn merge(&mut self, other: Config) {
        if other.default_color.is_some() {
            self.default_color = other.default_color;
        }
        if other.default_section.is_some() {
            self.default_section = other.default_section;
        }
        if other.vendor_filter.is_some() {
            self.vendor_filter = other.vendor_filter;
        }
        if other.merge_material_sizes.is_some() {
            self.merge_material_sizes = other.merge_material_sizes;
        }
        if other.default_format.is_some() {
            self.default_format = other.default_format;
        }
        if other.wrap_width.is_some() {
            self.wrap_width = other.wrap_width;
        }
    }

    /// Parser knobs with built-in defaults filled in
    pub fn parse_options(&self) -> ParseOptions {
        ParseOptions {
            default_color: self
                .default_color
                .clone()
                .unwrap_or_else(|| DEFAULT_COLOR.to_string()),
            default_section: self
                .default_section
                .clone()
                .unwrap_or_else(|| DEFAULT_SECTION.to_string()),
            vendor_filter: self
                .vendor_filter
                .clone()
                .unwrap_or_else(|| DEFAULT_VENDOR_FILTER.to_string()),
            merge_material_sizes: self.merge_material_sizes.unwrap_or(false),
        }
    }

    /// Look up a key by name for `config show <key>`
    pub fn value_of(&self, key: &str) -> Option<String> {
        let options = self.parse_options();
        match key {
            "default_color" => Some(options.default_color),
            "default_section" => Some(options.default_section),
            "vendor_filter" => Some(options.vendor_filter),
            "merge_material_sizes" => Some(options.merge_material_sizes.to_string()),
            "default_format" => self.default_format.clone(),
            "wrap_width" => self.wrap_width.map(|w| w.to_string()),
            _ => None,
        }
    }
}

/// Configuration keys and what they control
pub const CONFIG_KEYS: &[(&str, &str)] = &[
    ("default_color", "Fallback colour code when none is detected"),
    ("default_section", "Section assumed before a sheet names one"),
    ("vendor_filter", "Material rows containing this text are skipped"),
    (
        "merge_material_sizes",
        "Union sizes of repeated summary materials (true/false)",
    ),
    ("default_format", "Default output format (tsv, csv, md, json, yaml)"),
    ("wrap_width", "Wrap width for description/material columns"),
];

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_defaults_reproduce_parser_defaults() {
        assert_eq!(Config::default().parse_options(), ParseOptions::default());
    }

    #[test]
    fn test_merge_other_takes_precedence() {
        let mut base = Config {
            default_color: Some("STD".to_string()),
            vendor_filter: Some("inteos".to_string()),
            ..Config::default()
        };
        base.merge(Config {
            default_color: Some("NOCOL".to_string()),
            merge_material_sizes: Some(true),
            ..Config::default()
        });

        assert_eq!(base.default_color.as_deref(), Some("NOCOL"));
        assert_eq!(base.vendor_filter.as_deref(), Some("inteos"));
        assert_eq!(base.merge_material_sizes, Some(true));
    }

    #[test]
    fn test_yaml_layer_parses_partial_file() {
        let config: Config =
            serde_yml::from_str("default_section: CUTTING\nwrap_width: 30\n").unwrap();
        assert_eq!(config.default_section.as_deref(), Some("CUTTING"));
        assert_eq!(config.wrap_width, Some(30));
        assert!(config.default_color.is_none());
    }

    #[test]
    fn test_env_layer_ignores_blank_values() {
        let env: HashMap<&str, &str> = [("OPMX_DEFAULT_COLOR", "NAVY"), ("OPMX_FORMAT", " ")]
            .into_iter()
            .collect();
        let config = Config::from_env(|k| env.get(k).map(|v| v.to_string()));
        assert_eq!(config.default_color.as_deref(), Some("NAVY"));
        assert!(config.default_format.is_none());
    }

    #[test]
    fn test_read_file_skips_malformed_yaml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        std::fs::write(&path, "default_color: [unclosed").unwrap();
        assert!(Config::read_file(&path).is_none());

        std::fs::write(&path, "default_color: BLK\n").unwrap();
        assert_eq!(
            Config::read_file(&path).and_then(|c| c.default_color),
            Some("BLK".to_string())
        );
    }

    #[test]
    fn test_value_of_reports_effective_values() {
        let config = Config::default();
        assert_eq!(config.value_of("default_color").as_deref(), Some("STD"));
        assert_eq!(config.value_of("merge_material_sizes").as_deref(), Some("false"));
        assert!(config.value_of("wrap_width").is_none());
        assert!(config.value_of("nope").is_none());
    }
}
