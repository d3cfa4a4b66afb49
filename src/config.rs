//! Configuration file handling.
//!
//! This module handles loading and merging configuration from
//! `.quote-analyzer.toml` files.

use crate::cli::OutputFormat;
use crate::models::default_carriers;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default configuration file name, looked up in the working directory.
pub const CONFIG_FILE_NAME: &str = ".quote-analyzer.toml";

/// Root configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// General settings.
    #[serde(default)]
    pub general: GeneralConfig,

    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Dataset settings.
    #[serde(default)]
    pub dataset: DatasetConfig,
}

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Submission log to analyze.
    #[serde(default = "default_input")]
    pub input: String,

    /// Report format.
    #[serde(default)]
    pub output_format: OutputFormat,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            input: default_input(),
            output_format: OutputFormat::default(),
        }
    }
}

fn default_input() -> String {
    "Evolution Master Submission Log.xlsx".to_string()
}

/// Log output settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Also append log entries to `file`.
    #[serde(default = "default_true")]
    pub file_enabled: bool,

    /// Log file path.
    #[serde(default = "default_log_file")]
    pub file: String,

    /// Enable debug logging by default.
    #[serde(default)]
    pub verbose: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            file_enabled: true,
            file: default_log_file(),
            verbose: false,
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_log_file() -> String {
    "insurance_analysis.log".to_string()
}

/// Dataset layout settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatasetConfig {
    /// Worksheet to read from workbook inputs (first sheet if unset).
    #[serde(default)]
    pub sheet: Option<String>,

    /// Carrier columns to analyze, in report order.
    #[serde(default = "default_carriers")]
    pub carriers: Vec<String>,
}

impl Default for DatasetConfig {
    fn default() -> Self {
        Self {
            sheet: None,
            carriers: default_carriers(),
        }
    }
}

impl Config {
    /// Load configuration from a file path.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Try to load configuration from the default location.
    ///
    /// Returns `Ok(None)` if the file doesn't exist, `Err` if it exists but can't be parsed.
    pub fn load_default() -> Result<Option<Self>> {
        let default_path = Path::new(CONFIG_FILE_NAME);

        if default_path.exists() {
            Ok(Some(Self::load(default_path)?))
        } else {
            Ok(None)
        }
    }

    /// Merge this configuration with CLI arguments.
    ///
    /// Only values the user actually passed override the file.
    pub fn merge_with_args(&mut self, args: &crate::cli::Args) {
        if let Some(ref input) = args.input {
            self.general.input = input.display().to_string();
        }
        if let Some(format) = args.format {
            self.general.output_format = format;
        }

        if let Some(ref sheet) = args.sheet {
            self.dataset.sheet = Some(sheet.clone());
        }
        if let Some(ref carriers) = args.carriers {
            self.dataset.carriers = carriers.clone();
        }

        if let Some(ref log_file) = args.log_file {
            self.logging.file = log_file.display().to_string();
            self.logging.file_enabled = true;
        }
        if args.no_log_file {
            self.logging.file_enabled = false;
        }
        if args.verbose {
            self.logging.verbose = true;
        }
    }

    /// Input path as a `PathBuf`.
    pub fn input_path(&self) -> PathBuf {
        PathBuf::from(&self.general.input)
    }

    /// Log file path, if file logging is on.
    pub fn log_file(&self) -> Option<PathBuf> {
        self.logging
            .file_enabled
            .then(|| PathBuf::from(&self.logging.file))
    }

    /// Generate a default configuration file content.
    pub fn default_toml() -> String {
        let config = Config::default();
        toml::to_string_pretty(&config).unwrap_or_else(|_| String::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::Args;
    use clap::Parser;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.general.input, "Evolution Master Submission Log.xlsx");
        assert_eq!(config.general.output_format, OutputFormat::Text);
        assert_eq!(config.dataset.carriers.len(), 18);
        assert_eq!(
            config.log_file(),
            Some(PathBuf::from("insurance_analysis.log"))
        );
    }

    #[test]
    fn test_parse_config() {
        let toml_content = r#"
[general]
input = "submissions.csv"
output_format = "json"

[logging]
file_enabled = false
verbose = true

[dataset]
sheet = "2024"
carriers = ["Chubb", "Travelers"]
"#;

        let config: Config = toml::from_str(toml_content).unwrap();
        assert_eq!(config.general.input, "submissions.csv");
        assert_eq!(config.general.output_format, OutputFormat::Json);
        assert!(config.logging.verbose);
        assert_eq!(config.log_file(), None);
        assert_eq!(config.dataset.sheet.as_deref(), Some("2024"));
        assert_eq!(config.dataset.carriers, vec!["Chubb", "Travelers"]);
    }

    #[test]
    fn test_partial_config_keeps_defaults() {
        let config: Config = toml::from_str("[dataset]\nsheet = \"Log\"\n").unwrap();
        assert_eq!(config.dataset.carriers, default_carriers());
        assert_eq!(config.logging.file, "insurance_analysis.log");
    }

    #[test]
    fn test_args_override_config() {
        let mut config = Config::default();
        let args = Args::parse_from([
            "quote-analyzer",
            "data.csv",
            "--format",
            "markdown",
            "--carriers",
            "Chubb,CNA",
            "--no-log-file",
            "--verbose",
        ]);

        config.merge_with_args(&args);

        assert_eq!(config.general.input, "data.csv");
        assert_eq!(config.general.output_format, OutputFormat::Markdown);
        assert_eq!(config.dataset.carriers, vec!["Chubb", "CNA"]);
        assert_eq!(config.log_file(), None);
        assert!(config.logging.verbose);
    }

    #[test]
    fn test_unset_args_keep_config() {
        let mut config: Config = toml::from_str("[general]\ninput = \"kept.xlsx\"\n").unwrap();
        config.merge_with_args(&Args::parse_from(["quote-analyzer"]));
        assert_eq!(config.general.input, "kept.xlsx");
    }

    #[test]
    fn test_default_toml_generation() {
        let toml_str = Config::default_toml();
        assert!(toml_str.contains("[general]"));
        assert!(toml_str.contains("[logging]"));
        assert!(toml_str.contains("[dataset]"));

        let reparsed: Config = toml::from_str(&toml_str).unwrap();
        assert_eq!(reparsed.dataset.carriers, default_carriers());
    }
}
