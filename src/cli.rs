//! Command-line interface argument parsing.
//!
//! This module handles all CLI argument parsing using clap,
//! including validation and default values.

use clap::Parser;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Quote Analyzer - carrier quote statistics for insurance submission logs
///
/// Reads a submission log (xlsx, xls, ods or csv) and reports, per carrier,
/// how many submissions it quoted, and per line of business, which carriers
/// responded.
///
/// Examples:
///   quote-analyzer "Evolution Master Submission Log.xlsx"
///   quote-analyzer submissions.csv --format json --output report.json
///   quote-analyzer log.xlsx --sheet 2024 --carriers Chubb,Travelers
///   quote-analyzer --init-config
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Args {
    /// Submission log to analyze
    ///
    /// Defaults to the `general.input` config value.
    #[arg(value_name = "FILE")]
    pub input: Option<PathBuf>,

    /// Worksheet to read from a workbook (defaults to the first sheet)
    #[arg(long, value_name = "NAME")]
    pub sheet: Option<String>,

    /// Path to configuration file
    ///
    /// If not specified, looks for .quote-analyzer.toml in the current directory
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Report format (text, markdown, json)
    #[arg(long, value_name = "FORMAT")]
    pub format: Option<OutputFormat>,

    /// Write the report to this file instead of stdout
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Append log entries to this file
    #[arg(long, value_name = "FILE", env = "QUOTE_ANALYZER_LOG")]
    pub log_file: Option<PathBuf>,

    /// Disable the log file (log to stderr only)
    #[arg(long)]
    pub no_log_file: bool,

    /// Carrier columns to analyze (comma-separated, in report order)
    ///
    /// Example: --carriers "Chubb,Liberty Mutual,UFG"
    #[arg(long, value_name = "NAMES", value_delimiter = ',')]
    pub carriers: Option<Vec<String>>,

    /// Enable verbose logging output
    #[arg(short, long)]
    pub verbose: bool,

    /// Run in quiet mode (errors only)
    #[arg(short, long)]
    pub quiet: bool,

    /// Generate a default .quote-analyzer.toml configuration file
    #[arg(long)]
    pub init_config: bool,
}

/// Output format for the report.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Plain text console report (default)
    #[default]
    Text,
    /// Markdown tables
    Markdown,
    /// JSON document
    Json,
}

impl Args {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Validate the parsed arguments.
    pub fn validate(&self) -> Result<(), String> {
        // Skip validation for --init-config
        if self.init_config {
            return Ok(());
        }

        if self.verbose && self.quiet {
            return Err("Cannot use both --verbose and --quiet".to_string());
        }

        if let Some(ref carriers) = self.carriers {
            if carriers.iter().any(|c| c.trim().is_empty()) {
                return Err("Carrier names must not be empty".to_string());
            }
        }

        if let Some(ref sheet) = self.sheet {
            if sheet.trim().is_empty() {
                return Err("Worksheet name must not be empty".to_string());
            }
        }

        if let Some(ref output) = self.output {
            if output.is_dir() {
                return Err(format!("Output path is a directory: {}", output.display()));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_args() -> Args {
        Args {
            input: Some(PathBuf::from("log.xlsx")),
            sheet: None,
            config: None,
            format: None,
            output: None,
            log_file: None,
            no_log_file: false,
            carriers: None,
            verbose: false,
            quiet: false,
            init_config: false,
        }
    }

    #[test]
    fn test_parse_carrier_list() {
        let args = Args::parse_from(["quote-analyzer", "--carriers", "Chubb,Liberty Mutual"]);
        assert_eq!(
            args.carriers,
            Some(vec!["Chubb".to_string(), "Liberty Mutual".to_string()])
        );
        assert_eq!(args.input, None);
    }

    #[test]
    fn test_parse_format() {
        let args = Args::parse_from(["quote-analyzer", "log.csv", "--format", "json"]);
        assert_eq!(args.format, Some(OutputFormat::Json));
        assert_eq!(args.input, Some(PathBuf::from("log.csv")));
    }

    #[test]
    fn test_validation_conflicting_options() {
        let mut args = make_args();
        args.verbose = true;
        args.quiet = true;
        assert!(args.validate().is_err());
    }

    #[test]
    fn test_validation_blank_carrier() {
        let mut args = make_args();
        args.carriers = Some(vec!["Chubb".to_string(), " ".to_string()]);
        assert!(args.validate().is_err());
    }

    #[test]
    fn test_validation_output_directory() {
        let dir = tempfile::TempDir::new().unwrap();
        let mut args = make_args();
        args.output = Some(dir.path().to_path_buf());
        assert!(args.validate().is_err());
    }

    #[test]
    fn test_validation_skipped_for_init_config() {
        let mut args = make_args();
        args.verbose = true;
        args.quiet = true;
        args.init_config = true;
        assert!(args.validate().is_ok());
    }
}
